use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DashboardError {
    /// Fetching tiles or color meanings failed (network or non-2xx).
    #[error("Load failed: {0}")]
    Load(String),
    /// Writing tiles or color meanings failed.
    #[error("Save failed: {0}")]
    Save(String),
    /// Malformed import file or invalid user input.
    #[error("Invalid input: {0}")]
    Validation(String),
    /// A tile id that does not exist.
    #[error("Not found: {0}")]
    NotFound(String),
}
