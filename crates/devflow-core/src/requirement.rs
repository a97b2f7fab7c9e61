use crate::types::{Priority, RequirementStatus};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Requirement {
    pub id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
    pub priority: Priority,
    pub status: RequirementStatus,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
}

impl Requirement {
    pub fn new(id: impl Into<String>, title: impl Into<String>, priority: Priority) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            detail: None,
            priority,
            status: RequirementStatus::Open,
            created_at: Utc::now(),
            completed_at: None,
        }
    }

    pub fn is_done(&self) -> bool {
        self.status == RequirementStatus::Done
    }
}

/// Human-readable summary: "2/5 done".
pub fn summarize(requirements: &[Requirement]) -> String {
    let total = requirements.len();
    let done = requirements.iter().filter(|r| r.is_done()).count();
    format!("{done}/{total} done")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
