use std::path::PathBuf;

use bytes::Bytes;

use super::AppError;

/// Used when the backend does not suggest a filename.
pub const DEFAULT_FILENAME: &str = "audio.m4a";

/// Audio payload returned by a successful conversion.
#[derive(Debug, Clone)]
pub struct ConvertedAudio {
    pub bytes: Bytes,
    pub filename: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitPhase {
    Idle,
    Requesting,
    Succeeded,
    Failed,
}

/// Everything the form shows. Each submission step is one method call so the
/// four fields always change together.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormState {
    pub url: String,
    pub loading: bool,
    pub error: Option<String>,
    pub success: bool,
}

impl FormState {
    /// Starts a submission. Returns the URL to send, or `None` when the input
    /// was rejected locally (the error slot is filled and loading stays off).
    pub fn begin_submission(&mut self) -> Option<String> {
        self.error = None;
        self.success = false;

        let url = self.url.trim();
        if url.is_empty() {
            self.error = Some(AppError::InvalidInput.user_message());
            return None;
        }

        self.loading = true;
        Some(url.to_string())
    }

    /// Settles a submission started with [`FormState::begin_submission`].
    pub fn finish_submission(&mut self, result: Result<PathBuf, AppError>) {
        match result {
            Ok(_) => {
                self.success = true;
                self.url.clear();
            }
            Err(e) => {
                self.error = Some(e.user_message());
            }
        }
        self.loading = false;
    }

    pub fn phase(&self) -> SubmitPhase {
        if self.loading {
            SubmitPhase::Requesting
        } else if self.success {
            SubmitPhase::Succeeded
        } else if self.error.is_some() {
            SubmitPhase::Failed
        } else {
            SubmitPhase::Idle
        }
    }
}
