//! Pipeline executor: runs a parsed stage sequence against fresh state.
//!
//! Stages run strictly one after another. A stage whose precondition does
//! not hold aborts the run with an error naming its step; LLM errors are
//! returned unchanged. There is no partial result.

use std::collections::HashMap;
use std::sync::Arc;

use crate::error::Result;
use crate::llm::LlmClient;
use crate::prompt::{PromptRenderer, PromptSet};

use super::architecture::{self, DEFAULT_ARCHITECTURE};
use super::observer::{NoopObserver, PipelineObserver};
use super::stage::{Stage, StageKind};
use super::state::{FeedbackReport, FeedbackState};

/// A feedback pipeline built from an architecture string.
pub struct FeedbackPipeline<L: LlmClient> {
    /// One stage per known name
    registry: HashMap<String, Arc<Stage<L>>>,
    /// Parsed order; repeated names point at the same registry entry
    sequence: Vec<Arc<Stage<L>>>,
    observer: Box<dyn PipelineObserver>,
}

impl<L: LlmClient> FeedbackPipeline<L> {
    /// Build a pipeline with built-in prompts and no observer.
    pub fn new(llm: Arc<L>, architecture: &str) -> Result<Self> {
        Self::builder(llm).architecture(architecture).build()
    }

    pub fn builder(llm: Arc<L>) -> PipelineBuilder<L> {
        PipelineBuilder::new(llm)
    }

    /// Stage kinds in execution order.
    pub fn sequence(&self) -> Vec<StageKind> {
        self.sequence.iter().map(|stage| stage.kind()).collect()
    }

    /// Registered stage for a name.
    pub fn stage(&self, name: &str) -> Option<&Arc<Stage<L>>> {
        self.registry.get(name)
    }

    /// Number of steps in a run.
    pub fn len(&self) -> usize {
        self.sequence.len()
    }

    /// Always false: parsing rejects empty architectures.
    pub fn is_empty(&self) -> bool {
        self.sequence.is_empty()
    }

    /// Run every stage over `paper` and `review` and return the outputs.
    pub async fn run(&self, paper: &str, review: &str) -> Result<FeedbackReport> {
        let mut state = FeedbackState::new(paper, review);

        for (index, stage) in self.sequence.iter().enumerate() {
            let step = index + 1;
            let kind = stage.kind();
            self.observer.stage_started(step, kind);

            if let Err(e) = self.run_stage(step, stage, &mut state).await {
                self.observer.stage_failed(step, kind, &e);
                return Err(e);
            }

            self.observer.stage_finished(step, kind);
        }

        Ok(state.into_report())
    }

    async fn run_stage(&self, step: usize, stage: &Stage<L>, state: &mut FeedbackState) -> Result<()> {
        let kind = stage.kind();
        let input = kind.check(state).map_err(|unmet| unmet.at(step, kind))?;
        let output = stage.execute(input, state).await?;

        match kind {
            StageKind::Generate => state.push_feedback(output),
            StageKind::Aggregate => state.set_aggregated(output),
            StageKind::Refine => state.set_critiqued(output),
            StageKind::Format => state.set_formatted(output),
        }
        Ok(())
    }
}

/// Builder for [`FeedbackPipeline`].
pub struct PipelineBuilder<L: LlmClient> {
    llm: Arc<L>,
    architecture: String,
    prompts: PromptSet,
    observer: Box<dyn PipelineObserver>,
}

impl<L: LlmClient> PipelineBuilder<L> {
    fn new(llm: Arc<L>) -> Self {
        Self {
            llm,
            architecture: DEFAULT_ARCHITECTURE.to_string(),
            prompts: PromptSet::builtin(),
            observer: Box::new(NoopObserver),
        }
    }

    pub fn architecture(mut self, architecture: impl Into<String>) -> Self {
        self.architecture = architecture.into();
        self
    }

    pub fn prompts(mut self, prompts: PromptSet) -> Self {
        self.prompts = prompts;
        self
    }

    pub fn observer(mut self, observer: impl PipelineObserver + 'static) -> Self {
        self.observer = Box::new(observer);
        self
    }

    /// Create one stage per known name and parse the architecture against them.
    pub fn build(self) -> Result<FeedbackPipeline<L>> {
        let renderer = Arc::new(PromptRenderer::new());

        let registry: HashMap<String, Arc<Stage<L>>> = StageKind::ALL
            .into_iter()
            .map(|kind| {
                let stage = Stage::new(
                    kind,
                    self.prompts.get(kind.role()).clone(),
                    Arc::clone(&self.llm),
                    Arc::clone(&renderer),
                );
                (kind.name().to_string(), Arc::new(stage))
            })
            .collect();

        let sequence = architecture::parse(&self.architecture, &registry)?;

        Ok(FeedbackPipeline {
            registry,
            sequence,
            observer: self.observer,
        })
    }
}
