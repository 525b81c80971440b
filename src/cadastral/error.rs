use thiserror::Error;

#[derive(Debug, Error)]
pub enum CadastralError {
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("Invalid cadastral reference: {0:?}")]
    InvalidReference(String),
    #[error("Network error: {0}")]
    Network(String),
    #[error("Registry returned HTTP {0}: {1}")]
    Status(u16, String),
    #[error("JSON parse error: {0}")]
    JsonParse(String),
}

impl CadastralError {
    /// Network hiccups and server-side errors are worth another attempt.
    pub fn is_retryable(&self) -> bool {
        match self {
            CadastralError::Network(_) => true,
            CadastralError::Status(code, _) => *code >= 500 || *code == 429,
            _ => false,
        }
    }
}
