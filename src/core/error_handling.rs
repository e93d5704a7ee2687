//! Submission error taxonomy
//!
//! Every failure the controller can observe is folded into one of a small set
//! of kinds. Each kind carries a fixed user-facing message and severity; the
//! detailed error is only ever written to the diagnostic log.
//!
//! Nothing here retries. Retrying is left to the user re-submitting the form.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::models::{RejectReason, Severity};

pub const EMPTY_INPUT_MESSAGE: &str = "Please enter a TikTok video URL";
pub const PATTERN_MISMATCH_MESSAGE: &str = "Please enter a valid TikTok video URL";
pub const DOWNLOAD_FAILED_MESSAGE: &str = "Download failed. Please try again.";
pub const DOWNLOAD_STARTED_MESSAGE: &str = "Download started! Check your downloads folder.";

/// Error kinds surfaced to the user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    /// Blank input, caught before submission
    EmptyInput,
    /// Input is not a recognised TikTok link, caught before submission
    PatternMismatch,
    /// The asynchronous request could not be completed
    TransportFailure,
    /// The retrieval endpoint answered with a non-success status
    ServerFailure,
    /// The payload arrived but could not be handed to the local save
    SaveFailure,
}

impl ErrorKind {
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::EmptyInput => EMPTY_INPUT_MESSAGE,
            Self::PatternMismatch => PATTERN_MISMATCH_MESSAGE,
            Self::TransportFailure | Self::ServerFailure | Self::SaveFailure => {
                DOWNLOAD_FAILED_MESSAGE
            }
        }
    }

    pub fn severity(&self) -> Severity {
        Severity::Error
    }

    /// Whether the error was caught locally, before any network traffic
    pub fn is_pre_submission(&self) -> bool {
        matches!(self, Self::EmptyInput | Self::PatternMismatch)
    }
}

impl From<RejectReason> for ErrorKind {
    fn from(reason: RejectReason) -> Self {
        match reason {
            RejectReason::EmptyInput => Self::EmptyInput,
            RejectReason::PatternMismatch => Self::PatternMismatch,
        }
    }
}

/// Transport failure categories, for diagnostics only
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TransportCategory {
    Connect,
    Timeout,
    Body,
    Request,
    Other,
}

impl std::fmt::Display for TransportCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Connect => "connect",
            Self::Timeout => "timeout",
            Self::Body => "body",
            Self::Request => "request",
            Self::Other => "other",
        };
        f.write_str(name)
    }
}

/// Detailed submission error
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmissionError {
    #[error("Input rejected: {0:?}")]
    Rejected(RejectReason),

    #[error("Transport error ({category}): {message}")]
    Transport {
        message: String,
        category: TransportCategory,
    },

    #[error("Server responded with status {status}")]
    Server { status: u16 },

    #[error("Save error: {message}")]
    Save { message: String },
}

impl SubmissionError {
    pub fn transport(message: impl Into<String>, category: TransportCategory) -> Self {
        Self::Transport {
            message: message.into(),
            category,
        }
    }

    pub fn save(message: impl Into<String>) -> Self {
        Self::Save {
            message: message.into(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Rejected(reason) => ErrorKind::from(*reason),
            Self::Transport { .. } => ErrorKind::TransportFailure,
            Self::Server { .. } => ErrorKind::ServerFailure,
            Self::Save { .. } => ErrorKind::SaveFailure,
        }
    }

    pub fn user_message(&self) -> &'static str {
        self.kind().user_message()
    }
}

impl From<reqwest::Error> for SubmissionError {
    fn from(error: reqwest::Error) -> Self {
        if let Some(status) = error.status() {
            return Self::Server {
                status: status.as_u16(),
            };
        }
        Self::transport(error.to_string(), classify_transport(&error))
    }
}

/// Categorise a reqwest failure for the diagnostic log
pub fn classify_transport(error: &reqwest::Error) -> TransportCategory {
    if error.is_timeout() {
        TransportCategory::Timeout
    } else if error.is_connect() {
        TransportCategory::Connect
    } else if error.is_body() || error.is_decode() {
        TransportCategory::Body
    } else if error.is_request() || error.is_builder() {
        TransportCategory::Request
    } else {
        TransportCategory::Other
    }
}
