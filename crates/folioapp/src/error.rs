use crate::store::Collection;
use thiserror::Error;

/// Closed classification of every failure the repository layer can produce.
///
/// Callers (HTTP transport, CLI) switch on this exhaustively to pick a status
/// code or message. Error text is for humans only and is never inspected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// A specific id was addressed that does not exist in its collection.
    NotFound,
    /// Storage could not be read or written, or held malformed data.
    BackendUnavailable,
    /// The supplied payload does not have the shape of the content type.
    ValidationFailure,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::NotFound => "not_found",
            ErrorKind::BackendUnavailable => "backend_unavailable",
            ErrorKind::ValidationFailure => "validation_failure",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Error, Debug)]
pub enum FolioError {
    #[error("{collection} record not found: {id}")]
    NotFound { collection: Collection, id: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Store error: {0}")]
    Store(String),

    #[error("Backend did not respond within {0} ms")]
    Timeout(u64),

    #[error("Invalid {collection} payload: {message}")]
    Validation {
        collection: Collection,
        message: String,
    },

    #[error("Config error: {0}")]
    Config(String),

    /// A caller named something that does not exist, such as a collection
    /// slug or a backend kind.
    #[error("{0}")]
    InvalidInput(String),
}

impl FolioError {
    pub fn not_found(collection: Collection, id: impl Into<String>) -> Self {
        FolioError::NotFound {
            collection,
            id: id.into(),
        }
    }

    pub fn validation(collection: Collection, message: impl Into<String>) -> Self {
        FolioError::Validation {
            collection,
            message: message.into(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            FolioError::NotFound { .. } => ErrorKind::NotFound,
            FolioError::Validation { .. } | FolioError::InvalidInput(_) => {
                ErrorKind::ValidationFailure
            }
            FolioError::Io(_)
            | FolioError::Serialization(_)
            | FolioError::Database(_)
            | FolioError::Store(_)
            | FolioError::Timeout(_)
            | FolioError::Config(_) => ErrorKind::BackendUnavailable,
        }
    }
}

pub type Result<T> = std::result::Result<T, FolioError>;
