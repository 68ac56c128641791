use thiserror::Error;

#[derive(Error, Debug)]
pub enum ActionflowError {
    #[error("Workflow '{0}' not found")]
    WorkflowNotFound(String),

    #[error("Variant '{variant}' not found for workflow '{workflow}'")]
    VariantNotFound { workflow: String, variant: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CLI error: {0}")]
    Cli(String),
}

pub type Result<T> = std::result::Result<T, ActionflowError>;
