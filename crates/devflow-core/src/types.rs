use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// Stage
// ---------------------------------------------------------------------------

/// The six workflow stages, in fixed forward order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Requirements,
    Specification,
    Design,
    Code,
    Documentation,
    Testing,
}

impl Stage {
    pub fn all() -> &'static [Stage] {
        &[
            Stage::Requirements,
            Stage::Specification,
            Stage::Design,
            Stage::Code,
            Stage::Documentation,
            Stage::Testing,
        ]
    }

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn next(self) -> Option<Stage> {
        let all = Stage::all();
        all.get(self.index() + 1).copied()
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Stage::Requirements => "requirements",
            Stage::Specification => "specification",
            Stage::Design => "design",
            Stage::Code => "code",
            Stage::Documentation => "documentation",
            Stage::Testing => "testing",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Stage {
    type Err = crate::error::DevflowError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "requirements" => Ok(Stage::Requirements),
            "specification" => Ok(Stage::Specification),
            "design" => Ok(Stage::Design),
            "code" => Ok(Stage::Code),
            "documentation" => Ok(Stage::Documentation),
            "testing" => Ok(Stage::Testing),
            _ => Err(crate::error::DevflowError::InvalidStage(s.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// StageStatus
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StageStatus {
    Pending,
    Draft,
    Complete,
}

impl fmt::Display for StageStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            StageStatus::Pending => "pending",
            StageStatus::Draft => "draft",
            StageStatus::Complete => "complete",
        };
        f.write_str(s)
    }
}

// ---------------------------------------------------------------------------
// Priority / RequirementStatus
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Must,
    Should,
    Could,
}

impl Priority {
    pub fn as_str(self) -> &'static str {
        match self {
            Priority::Must => "must",
            Priority::Should => "should",
            Priority::Could => "could",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Priority {
    type Err = crate::error::DevflowError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "must" => Ok(Priority::Must),
            "should" => Ok(Priority::Should),
            "could" => Ok(Priority::Could),
            _ => Err(crate::error::DevflowError::InvalidPriority(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequirementStatus {
    Open,
    Done,
}

impl fmt::Display for RequirementStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            RequirementStatus::Open => "open",
            RequirementStatus::Done => "done",
        };
        f.write_str(s)
    }
}

// ---------------------------------------------------------------------------
// DesignKind
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DesignKind {
    Architecture,
    EntityRelation,
    Sequence,
    Flowchart,
}

impl DesignKind {
    pub fn as_str(self) -> &'static str {
        match self {
            DesignKind::Architecture => "architecture",
            DesignKind::EntityRelation => "entity_relation",
            DesignKind::Sequence => "sequence",
            DesignKind::Flowchart => "flowchart",
        }
    }

    /// The Mermaid header a diagram of this kind normally opens with.
    pub fn mermaid_header(self) -> &'static str {
        match self {
            DesignKind::Architecture => "graph TD",
            DesignKind::EntityRelation => "erDiagram",
            DesignKind::Sequence => "sequenceDiagram",
            DesignKind::Flowchart => "flowchart TD",
        }
    }
}

impl fmt::Display for DesignKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for DesignKind {
    type Err = crate::error::DevflowError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "architecture" => Ok(DesignKind::Architecture),
            "entity_relation" | "entity-relation" | "er" => Ok(DesignKind::EntityRelation),
            "sequence" => Ok(DesignKind::Sequence),
            "flowchart" => Ok(DesignKind::Flowchart),
            _ => Err(crate::error::DevflowError::InvalidDesignKind(s.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// TestKind
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TestKind {
    Unit,
    Integration,
    EndToEnd,
}

impl TestKind {
    pub fn as_str(self) -> &'static str {
        match self {
            TestKind::Unit => "unit",
            TestKind::Integration => "integration",
            TestKind::EndToEnd => "end_to_end",
        }
    }
}

impl fmt::Display for TestKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for TestKind {
    type Err = crate::error::DevflowError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "unit" => Ok(TestKind::Unit),
            "integration" => Ok(TestKind::Integration),
            "end_to_end" | "end-to-end" | "e2e" => Ok(TestKind::EndToEnd),
            _ => Err(crate::error::DevflowError::InvalidTestKind(s.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// DocKind
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocKind {
    Readme,
    Api,
    Guide,
}

impl DocKind {
    pub fn as_str(self) -> &'static str {
        match self {
            DocKind::Readme => "readme",
            DocKind::Api => "api",
            DocKind::Guide => "guide",
        }
    }
}

impl fmt::Display for DocKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for DocKind {
    type Err = crate::error::DevflowError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "readme" => Ok(DocKind::Readme),
            "api" => Ok(DocKind::Api),
            "guide" | "user-guide" | "user_guide" => Ok(DocKind::Guide),
            _ => Err(crate::error::DevflowError::InvalidDocKind(s.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
