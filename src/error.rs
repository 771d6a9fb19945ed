use thiserror::Error;

/// Shown when the server rejects a search without explaining why
pub const GENERIC_SEARCH_ERROR: &str = "Error en la búsqueda";
/// Shown when the server cannot be reached and sent no detail
pub const GENERIC_CONNECTION_ERROR: &str = "Error al conectar con el servidor";

/// Failure talking to the backend: unreachable, non-2xx, or unparseable
#[derive(Error, Debug)]
pub enum TransportError {
    #[error("server responded with status {status}")]
    Status { status: u16, detail: Option<String> },

    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("malformed response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("login response carried no token")]
    MissingToken,
}

impl TransportError {
    /// Structured detail supplied by the server, if any
    pub fn detail(&self) -> Option<&str> {
        match self {
            TransportError::Status { detail, .. } => detail.as_deref(),
            _ => None,
        }
    }
}

/// Why the last search produced no results. The message is user-facing.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SearchFailure {
    /// Server was reachable and answered `success: false`
    #[error("{0}")]
    Rejected(String),

    #[error("{0}")]
    Transport(String),
}

impl SearchFailure {
    pub fn rejected(message: Option<String>) -> Self {
        SearchFailure::Rejected(
            message
                .filter(|m| !m.is_empty())
                .unwrap_or_else(|| GENERIC_SEARCH_ERROR.to_string()),
        )
    }

    pub fn from_transport(err: &TransportError) -> Self {
        SearchFailure::Transport(
            err.detail()
                .filter(|d| !d.is_empty())
                .unwrap_or(GENERIC_CONNECTION_ERROR)
                .to_string(),
        )
    }

    pub fn message(&self) -> &str {
        match self {
            SearchFailure::Rejected(m) | SearchFailure::Transport(m) => m,
        }
    }
}
