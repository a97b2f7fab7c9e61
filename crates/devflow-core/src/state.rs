use crate::error::{DevflowError, Result};
use crate::paths;
use crate::types::Stage;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;
use uuid::Uuid;

// ---------------------------------------------------------------------------
// GenerationEntry
// ---------------------------------------------------------------------------

/// One completed (or failed) generation call, kept for history display.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationEntry {
    pub id: Uuid,
    pub project: String,
    pub stage: Stage,
    pub model: String,
    /// "ok" or a short failure description.
    pub outcome: String,
    pub timestamp: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// State
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct State {
    #[serde(default = "default_version")]
    pub version: u32,
    pub workspace: String,
    pub active_projects: Vec<String>,
    #[serde(default)]
    pub generations: Vec<GenerationEntry>,
    pub last_updated: DateTime<Utc>,
}

fn default_version() -> u32 {
    1
}

impl State {
    pub fn new(workspace: impl Into<String>) -> Self {
        Self {
            version: 1,
            workspace: workspace.into(),
            active_projects: Vec::new(),
            generations: Vec::new(),
            last_updated: Utc::now(),
        }
    }

    // -----------------------------------------------------------------------
    // Persistence
    // -----------------------------------------------------------------------

    pub fn load(root: &Path) -> Result<Self> {
        let path = paths::state_path(root);
        if !path.exists() {
            return Err(DevflowError::NotInitialized);
        }
        let data = std::fs::read_to_string(&path)?;
        let state: State = serde_yaml::from_str(&data)?;
        Ok(state)
    }

    pub fn save(&self, root: &Path) -> Result<()> {
        let path = paths::state_path(root);
        let data = serde_yaml::to_string(self)?;
        crate::io::atomic_write(&path, data.as_bytes())
    }

    // -----------------------------------------------------------------------
    // Mutations
    // -----------------------------------------------------------------------

    pub fn add_active_project(&mut self, slug: &str) {
        if !self.active_projects.iter().any(|s| s == slug) {
            self.active_projects.push(slug.to_string());
        }
        self.last_updated = Utc::now();
    }

    pub fn remove_active_project(&mut self, slug: &str) {
        self.active_projects.retain(|s| s != slug);
        self.last_updated = Utc::now();
    }

    pub fn record_generation(&mut self, project: &str, stage: Stage, model: &str, outcome: &str) {
        self.generations.push(GenerationEntry {
            id: Uuid::new_v4(),
            project: project.to_string(),
            stage,
            model: model.to_string(),
            outcome: outcome.to_string(),
            timestamp: Utc::now(),
        });
        // Trim history to the last 200 entries.
        if self.generations.len() > 200 {
            self.generations.drain(..self.generations.len() - 200);
        }
        self.last_updated = Utc::now();
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
