use eyre::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use revfeed::audit::AuditProperty;
use revfeed::ingest::{DEFAULT_API_URL, DEFAULT_PDF_URL};
use revfeed::llm::AnthropicConfig;
use revfeed::pipeline::DEFAULT_ARCHITECTURE;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub llm: LlmConfig,
    pub pipeline: PipelineConfig,
    pub openreview: OpenReviewConfig,
    pub audit: AuditConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    pub model: String,
    pub max_tokens: u32,
    pub timeout_ms: u64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        let anthropic = AnthropicConfig::default();
        Self {
            model: anthropic.model,
            max_tokens: anthropic.max_tokens,
            timeout_ms: 300000,
        }
    }
}

impl LlmConfig {
    pub fn to_anthropic(&self) -> AnthropicConfig {
        AnthropicConfig {
            model: self.model.clone(),
            max_tokens: self.max_tokens,
            timeout: Duration::from_millis(self.timeout_ms),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub architecture: String,
    pub prompts_dir: Option<PathBuf>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            architecture: DEFAULT_ARCHITECTURE.to_string(),
            prompts_dir: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OpenReviewConfig {
    pub api_url: String,
    pub pdf_url: String,
    pub timeout_ms: u64,
}

impl Default for OpenReviewConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            pdf_url: DEFAULT_PDF_URL.to_string(),
            timeout_ms: 60000,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AuditConfig {
    pub enabled: bool,
    pub properties: Vec<String>,
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            properties: AuditProperty::ALL.iter().map(|p| p.name().to_string()).collect(),
        }
    }
}

impl AuditConfig {
    pub fn properties(&self) -> Result<Vec<AuditProperty>> {
        self.properties
            .iter()
            .map(|name| AuditProperty::from_name(name).map_err(eyre::Report::from))
            .collect()
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            llm: LlmConfig::default(),
            pipeline: PipelineConfig::default(),
            openreview: OpenReviewConfig::default(),
            audit: AuditConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration with fallback chain
    pub fn load(config_path: Option<&PathBuf>) -> Result<Self> {
        if let Some(path) = config_path {
            return Self::load_from_file(path).context(format!("Failed to load config from {}", path.display()));
        }

        // ~/.config/revfeed/revfeed.yml
        if let Some(config_dir) = dirs::config_dir() {
            let project_name = env!("CARGO_PKG_NAME");
            let primary_config = config_dir.join(project_name).join(format!("{}.yml", project_name));
            if primary_config.exists() {
                match Self::load_from_file(&primary_config) {
                    Ok(config) => return Ok(config),
                    Err(e) => {
                        log::warn!("Failed to load config from {}: {}", primary_config.display(), e);
                    }
                }
            }
        }

        // ./revfeed.yml
        let project_name = env!("CARGO_PKG_NAME");
        let fallback_config = PathBuf::from(format!("{}.yml", project_name));
        if fallback_config.exists() {
            match Self::load_from_file(&fallback_config) {
                Ok(config) => return Ok(config),
                Err(e) => {
                    log::warn!("Failed to load config from {}: {}", fallback_config.display(), e);
                }
            }
        }

        log::info!("No config file found, using defaults");
        Ok(Self::default())
    }

    fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path).context("Failed to read config file")?;

        let config: Self = serde_yaml::from_str(&content).context("Failed to parse config file")?;

        log::info!("Loaded config from: {}", path.as_ref().display());
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.pipeline.architecture, "Actor(2)->Aggregator->FeedbackCritic->Formatter");
        assert!(config.pipeline.prompts_dir.is_none());
        assert_eq!(config.openreview.api_url, "https://api2.openreview.net");
        assert!(!config.audit.enabled);
        assert_eq!(config.audit.properties().unwrap(), AuditProperty::ALL.to_vec());
    }

    #[test]
    fn test_load_partial_file_keeps_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("revfeed.yml");
        fs::write(
            &path,
            "llm:\n  model: claude-test\npipeline:\n  architecture: Actor->Formatter\n  prompts_dir: /tmp/prompts\n",
        )
        .unwrap();

        let config = Config::load(Some(&path)).unwrap();

        assert_eq!(config.llm.model, "claude-test");
        assert_eq!(config.llm.max_tokens, LlmConfig::default().max_tokens);
        assert_eq!(config.pipeline.architecture, "Actor->Formatter");
        assert_eq!(config.pipeline.prompts_dir, Some(PathBuf::from("/tmp/prompts")));
        assert_eq!(config.openreview.pdf_url, "https://openreview.net/pdf");
    }

    #[test]
    fn test_load_missing_explicit_path_fails() {
        let path = PathBuf::from("/nonexistent/revfeed.yml");
        assert!(Config::load(Some(&path)).is_err());
    }

    #[test]
    fn test_load_invalid_yaml_fails() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("revfeed.yml");
        fs::write(&path, "llm: [not, a, map").unwrap();

        assert!(Config::load(Some(&path)).is_err());
    }

    #[test]
    fn test_llm_config_to_anthropic() {
        let llm = LlmConfig {
            model: "m".to_string(),
            max_tokens: 100,
            timeout_ms: 1500,
        };
        let anthropic = llm.to_anthropic();
        assert_eq!(anthropic.model, "m");
        assert_eq!(anthropic.max_tokens, 100);
        assert_eq!(anthropic.timeout, Duration::from_millis(1500));
    }

    #[test]
    fn test_unknown_audit_property() {
        let audit = AuditConfig {
            enabled: true,
            properties: vec!["praise_feedback".to_string(), "tone".to_string()],
        };
        assert!(audit.properties().is_err());
    }
}
