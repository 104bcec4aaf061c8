/// Errors surfaced by the persistence collaborator
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("not found: {0}")]
    NotFound(String),

    #[error("transport failure: {0}")]
    Transport(String),

    #[error("conflict: {0}")]
    Conflict(String),
}

impl StoreError {
    /// Server-provided detail when available, for user-facing messages
    pub fn detail(&self) -> &str {
        match self {
            StoreError::NotFound(d) | StoreError::Transport(d) | StoreError::Conflict(d) => d,
        }
    }
}
