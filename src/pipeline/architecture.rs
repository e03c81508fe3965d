//! Architecture strings: `Actor(2)->Aggregator->FeedbackCritic->Formatter`.
//!
//! Tokens are separated by `->`; each is `Name` or `Name(count)` with a
//! positive count. Parsing is pure and never touches the LLM.

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;

use crate::error::{Result, RevfeedError};

use super::stage::StageKind;

/// Separator between stage tokens.
pub const SEQUENCE_DELIMITER: &str = "->";

/// Two actors, then aggregate, critique and format.
pub const DEFAULT_ARCHITECTURE: &str = "Actor(2)->Aggregator->FeedbackCritic->Formatter";

/// Largest repetition count a single token may carry.
pub const MAX_STAGE_COUNT: usize = 64;

/// Largest number of steps a parsed sequence may expand to.
pub const MAX_SEQUENCE_LEN: usize = 256;

static TOKEN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([A-Za-z0-9_]+)(?:\(([0-9]+)\))?$").expect("token pattern is valid"));

/// One `Name(count)` token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageToken {
    pub name: String,
    pub count: usize,
}

/// Split an architecture string into validated tokens, without resolving names.
pub fn tokenize(spec: &str) -> Result<Vec<StageToken>> {
    if spec.trim().is_empty() {
        return Err(RevfeedError::InvalidSpec("architecture is empty".to_string()));
    }

    let tokens: Vec<StageToken> = spec
        .split(SEQUENCE_DELIMITER)
        .map(|part| parse_token(part.trim()))
        .collect::<Result<_>>()?;

    let total = tokens.iter().map(|t| t.count).sum::<usize>();
    if total > MAX_SEQUENCE_LEN {
        return Err(RevfeedError::InvalidSpec(format!(
            "architecture expands to {} steps, at most {} allowed",
            total, MAX_SEQUENCE_LEN
        )));
    }

    Ok(tokens)
}

fn parse_token(token: &str) -> Result<StageToken> {
    let caps = TOKEN_RE
        .captures(token)
        .ok_or_else(|| RevfeedError::InvalidSpec(format!("'{}' is not Name or Name(count)", token)))?;

    let count = match caps.get(2) {
        Some(m) => m
            .as_str()
            .parse::<usize>()
            .map_err(|_| RevfeedError::InvalidSpec(format!("count in '{}' is out of range", token)))?,
        None => 1,
    };
    if count == 0 {
        return Err(RevfeedError::InvalidSpec(format!("count in '{}' must be positive", token)));
    }
    if count > MAX_STAGE_COUNT {
        return Err(RevfeedError::InvalidSpec(format!(
            "count in '{}' exceeds {}",
            token, MAX_STAGE_COUNT
        )));
    }

    Ok(StageToken {
        name: caps[1].to_string(),
        count,
    })
}

/// Parse `spec` into a stage sequence, resolving names against `known`.
///
/// Each token expands to `count` clones of the registered value, so with
/// `Arc` values every repetition refers to the same stage instance.
pub fn parse<S: Clone>(spec: &str, known: &HashMap<String, S>) -> Result<Vec<S>> {
    let mut sequence = Vec::new();
    for token in tokenize(spec)? {
        let stage = known
            .get(&token.name)
            .ok_or_else(|| RevfeedError::UnknownStage(token.name.clone()))?;
        sequence.extend(std::iter::repeat_n(stage.clone(), token.count));
    }
    Ok(sequence)
}

/// Parse `spec` against the built-in stage names.
pub fn parse_kinds(spec: &str) -> Result<Vec<StageKind>> {
    parse(spec, &StageKind::registry())
}
