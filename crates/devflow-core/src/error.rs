use thiserror::Error;

#[derive(Debug, Error)]
pub enum DevflowError {
    #[error("not initialized: run 'devflow init'")]
    NotInitialized,

    #[error("project not found: {0}")]
    ProjectNotFound(String),

    #[error("project already exists: {0}")]
    ProjectExists(String),

    #[error("no specification recorded for project: {0}")]
    SpecificationNotFound(String),

    #[error("requirement not found: {0}")]
    RequirementNotFound(String),

    #[error("{kind} record not found: {id}")]
    RecordNotFound { kind: &'static str, id: String },

    #[error("invalid slug '{0}': must be lowercase alphanumeric with hyphens")]
    InvalidSlug(String),

    #[error("invalid stage: {0}")]
    InvalidStage(String),

    #[error("invalid section: {0}")]
    InvalidSection(String),

    #[error("invalid priority: {0}")]
    InvalidPriority(String),

    #[error("invalid design kind: {0}")]
    InvalidDesignKind(String),

    #[error("invalid test kind: {0}")]
    InvalidTestKind(String),

    #[error("invalid doc kind: {0}")]
    InvalidDocKind(String),

    #[error("invalid stage transition from {from} to {to}: {reason}")]
    InvalidStageTransition {
        from: String,
        to: String,
        reason: String,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, DevflowError>;
