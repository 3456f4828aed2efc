pub mod ai;
pub mod media;
pub mod notes;

use thiserror::Error;

#[derive(Error, Debug, Clone)]
pub enum ZapError {
    #[error("Note not found: {0}")]
    NoteNotFound(uuid::Uuid),

    #[error("Wrong content type: {0}")]
    WrongContentType(String),

    #[error("Invalid media reference: {0}")]
    InvalidMediaRef(String),

    #[error("Media file missing: {0}")]
    MediaMissing(String),

    #[error("Persistence error: {0}")]
    PersistenceError(String),

    #[error("Transcription error: {0}")]
    TranscriptionError(String),

    #[error("Summarization error: {0}")]
    SummarizationError(String),

    #[error("Organization error: {0}")]
    OrganizationError(String),

    #[error("Proxy error: {0}")]
    ProxyError(String),

    #[error("Response parse error: {0}")]
    ParseError(String),

    #[error("IO error: {0}")]
    IOError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl From<std::io::Error> for ZapError {
    fn from(e: std::io::Error) -> Self {
        ZapError::IOError(e.to_string())
    }
}

impl From<reqwest::Error> for ZapError {
    fn from(e: reqwest::Error) -> Self {
        ZapError::ProxyError(e.to_string())
    }
}

impl ZapError {
    /// Check if this error is recoverable
    pub fn is_recoverable(&self) -> bool {
        match self {
            // Precondition misses clear up once the caller fixes its input
            ZapError::NoteNotFound(_) => true,
            ZapError::WrongContentType(_) => true,
            ZapError::InvalidMediaRef(_) => false,
            // A missing blob stays missing until the user re-captures it
            ZapError::MediaMissing(_) => false,
            ZapError::PersistenceError(_) => false,
            // Provider failures are typically transient
            ZapError::TranscriptionError(_) => true,
            ZapError::SummarizationError(_) => true,
            ZapError::OrganizationError(_) => true,
            ZapError::ProxyError(_) => true,
            ZapError::ParseError(_) => true,
            ZapError::IOError(_) => false,
            ZapError::ConfigError(_) => false,
        }
    }

    /// Get a user-friendly description
    pub fn user_message(&self) -> String {
        match self {
            ZapError::NoteNotFound(_) => "That note no longer exists.".to_string(),
            ZapError::WrongContentType(_) => {
                "This edit is not supported for that note type.".to_string()
            }
            ZapError::InvalidMediaRef(_) => "Attachment reference is invalid.".to_string(),
            ZapError::MediaMissing(_) => {
                "Attachment file is missing from storage.".to_string()
            }
            ZapError::PersistenceError(_) => {
                "Failed to save your notes. Recent changes may be lost.".to_string()
            }
            ZapError::TranscriptionError(_) => {
                "Audio transcription failed. Please try again.".to_string()
            }
            ZapError::SummarizationError(_) => {
                "Summarizing your notes failed. Please try again.".to_string()
            }
            ZapError::OrganizationError(_) => {
                "Organizing your notes failed. Please try again.".to_string()
            }
            ZapError::ProxyError(_) => {
                "Could not reach the AI service. Please check your connection.".to_string()
            }
            ZapError::ParseError(_) => {
                "The AI service returned an unexpected response.".to_string()
            }
            ZapError::IOError(_) => "File system error occurred.".to_string(),
            ZapError::ConfigError(_) => "Configuration error. Please check settings.".to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ZapError>;
