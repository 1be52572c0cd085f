use thiserror::Error;

pub const VALIDATION_MESSAGE: &str = "Please enter a YouTube URL";
pub const UNKNOWN_ERROR_MESSAGE: &str = "Unknown error";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AppError {
    #[error("{}", VALIDATION_MESSAGE)]
    InvalidInput,

    /// Non-2xx answer from the conversion backend, message already derived.
    #[error("{0}")]
    Server(String),

    #[error("{0}")]
    Transport(String),

    /// A 2xx answer that could not be turned into a download.
    #[error("{0}")]
    InvalidResponse(String),

    #[error("I/O error: {0}")]
    Io(String),

    #[error("Download cancelled")]
    Cancelled,

    #[error("{}", UNKNOWN_ERROR_MESSAGE)]
    Unknown,
}

impl AppError {
    /// Text shown in the form's error slot.
    pub fn user_message(&self) -> String {
        let message = self.to_string();
        if message.trim().is_empty() {
            AppError::Unknown.to_string()
        } else {
            message
        }
    }
}
