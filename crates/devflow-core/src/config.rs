use crate::error::{DevflowError, Result};
use crate::paths;
use crate::types::Stage;
use serde::{Deserialize, Serialize};
use std::path::Path;

// ---------------------------------------------------------------------------
// ConfigWarning / WarnLevel
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigWarning {
    pub level: WarnLevel,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarnLevel {
    Warning,
    Error,
}

// ---------------------------------------------------------------------------
// GeneratorConfig
// ---------------------------------------------------------------------------

/// Settings for the external text-completion provider. The API key is
/// never stored here; it comes from the `DEVFLOW_API_KEY` environment
/// variable at call time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratorConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    #[serde(default = "default_temperature")]
    pub temperature: f32,
}

fn default_base_url() -> String {
    "https://api.openai.com".to_string()
}

fn default_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_max_tokens() -> u32 {
    2048
}

fn default_temperature() -> f32 {
    0.7
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            model: default_model(),
            max_tokens: default_max_tokens(),
            temperature: default_temperature(),
        }
    }
}

// ---------------------------------------------------------------------------
// StagesConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StagesConfig {
    #[serde(default = "default_enabled_stages")]
    pub enabled: Vec<Stage>,
}

fn default_enabled_stages() -> Vec<Stage> {
    Stage::all().to_vec()
}

impl Default for StagesConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled_stages(),
        }
    }
}

impl StagesConfig {
    pub fn is_enabled(&self, stage: Stage) -> bool {
        self.enabled.contains(&stage)
    }
}

// ---------------------------------------------------------------------------
// WorkspaceConfig / Config (top-level)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkspaceConfig {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_version")]
    pub version: u32,
    pub workspace: WorkspaceConfig,
    #[serde(default)]
    pub generator: GeneratorConfig,
    #[serde(default)]
    pub stages: StagesConfig,
}

fn default_version() -> u32 {
    1
}

impl Config {
    pub fn new(workspace_name: impl Into<String>) -> Self {
        Self {
            version: 1,
            workspace: WorkspaceConfig {
                name: workspace_name.into(),
                description: None,
            },
            generator: GeneratorConfig::default(),
            stages: StagesConfig::default(),
        }
    }

    pub fn load(root: &Path) -> Result<Self> {
        let path = paths::config_path(root);
        if !path.exists() {
            return Err(DevflowError::NotInitialized);
        }
        let data = std::fs::read_to_string(&path)?;
        let cfg: Config = serde_yaml::from_str(&data)?;
        Ok(cfg)
    }

    pub fn save(&self, root: &Path) -> Result<()> {
        let path = paths::config_path(root);
        let data = serde_yaml::to_string(self)?;
        crate::io::atomic_write(&path, data.as_bytes())
    }

    // -----------------------------------------------------------------------
    // Validation
    // -----------------------------------------------------------------------

    pub fn validate(&self) -> Vec<ConfigWarning> {
        let mut warnings = Vec::new();

        if self.generator.base_url.trim().is_empty() {
            warnings.push(ConfigWarning {
                level: WarnLevel::Error,
                message: "generator.base_url is empty".to_string(),
            });
        }

        if self.generator.model.trim().is_empty() {
            warnings.push(ConfigWarning {
                level: WarnLevel::Error,
                message: "generator.model is empty".to_string(),
            });
        }

        if !(0.0..=2.0).contains(&self.generator.temperature) {
            warnings.push(ConfigWarning {
                level: WarnLevel::Warning,
                message: format!(
                    "generator.temperature={} is outside the usual 0.0–2.0 range",
                    self.generator.temperature
                ),
            });
        }

        if self.generator.max_tokens == 0 {
            warnings.push(ConfigWarning {
                level: WarnLevel::Error,
                message: "generator.max_tokens is 0; generation calls would return nothing"
                    .to_string(),
            });
        }

        if !self.stages.is_enabled(Stage::Requirements) {
            warnings.push(ConfigWarning {
                level: WarnLevel::Warning,
                message: "stages.enabled omits 'requirements', the workflow entry stage"
                    .to_string(),
            });
        }

        warnings
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
