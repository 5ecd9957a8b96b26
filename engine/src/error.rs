use thiserror::Error;

/// Batch-related errors
///
#[derive(Debug, Error)]
pub enum BatchError {
    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Batch is not a list of case records.")]
    NotAList,
}
