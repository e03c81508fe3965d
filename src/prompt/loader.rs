//! Prompt override files
//!
//! A prompts directory holds Markdown files named `<role>_system.md` and
//! `<role>_user.md`. Any file that is present replaces the built-in prompt
//! for that role and part; missing files leave the built-in in place.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::error::{Result, RevfeedError};

/// Reads prompt override files from a directory
#[derive(Debug, Clone)]
pub struct PromptLoader {
    templates_dir: PathBuf,
}

impl PromptLoader {
    pub fn new(templates_dir: impl AsRef<Path>) -> Self {
        Self {
            templates_dir: templates_dir.as_ref().to_path_buf(),
        }
    }

    /// Read `<name>.md`, or `None` if there is no such file.
    pub fn load_optional(&self, name: &str) -> Result<Option<String>> {
        let path = self.template_path(name);
        match std::fs::read_to_string(&path) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(RevfeedError::Template(format!(
                "Failed to read prompt '{}' from {}: {}",
                name,
                path.display(),
                e
            ))),
        }
    }

    fn template_path(&self, name: &str) -> PathBuf {
        self.templates_dir.join(format!("{}.md", name))
    }

    /// Names (without `.md`) of every Markdown file in the directory, sorted.
    pub fn list_available(&self) -> Result<Vec<String>> {
        let entries = std::fs::read_dir(&self.templates_dir).map_err(|e| {
            RevfeedError::Template(format!(
                "Failed to read prompts directory {}: {}",
                self.templates_dir.display(),
                e
            ))
        })?;

        let mut names: Vec<String> = entries
            .flatten()
            .map(|entry| entry.path())
            .filter(|path| path.extension().is_some_and(|ext| ext == "md"))
            .filter_map(|path| path.file_stem().and_then(|s| s.to_str()).map(String::from))
            .collect();

        names.sort();
        Ok(names)
    }

    pub fn templates_dir(&self) -> &Path {
        &self.templates_dir
    }
}
