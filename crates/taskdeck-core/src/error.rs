use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("network error: {0}")]
    Network(String),

    #[error("{message}")]
    Server { status: u16, message: String },

    #[error("{message}")]
    Auth { status: u16, message: String },

    #[error("validation error: {0}")]
    Validation(String),

    #[error("invalid task status: {0}")]
    InvalidStatus(String),

    #[error("invalid priority: {0}")]
    InvalidPriority(String),

    #[error("invalid role: {0}")]
    InvalidRole(String),

    #[error("config error: {0}")]
    Config(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),
}

impl ApiError {
    /// True for 401/403 responses, which carry the identity-clearing
    /// side effect.
    pub fn is_auth(&self) -> bool {
        matches!(self, ApiError::Auth { .. })
    }

    /// The single human-readable string a slice stores on failure.
    pub fn display_message(&self) -> String {
        self.to_string()
    }
}

pub type Result<T> = std::result::Result<T, ApiError>;
