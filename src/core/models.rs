//! Core data models for the download submission controller

use serde::{Deserialize, Serialize};

use crate::core::error_handling::ErrorKind;

/// A single submission attempt, captured from the URL input

#[derive(Debug, Clone, PartialEq, Eq)]

pub struct SubmissionRequest {
    pub raw_url: String,
}

impl SubmissionRequest {
    pub fn new(raw_url: impl Into<String>) -> Self {
        Self {
            raw_url: raw_url.into(),
        }
    }
}

/// Why an input was refused before it could reach the network

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]

pub enum RejectReason {
    EmptyInput,

    PatternMismatch,
}

/// Outcome of running the validator over a raw input

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]

pub enum ValidationResult {
    Accepted(String),

    Rejected(RejectReason),
}

impl ValidationResult {
    pub fn is_accepted(&self) -> bool {
        matches!(self, Self::Accepted(_))
    }

    pub fn reject_reason(&self) -> Option<RejectReason> {
        match self {
            Self::Rejected(reason) => Some(*reason),
            Self::Accepted(_) => None,
        }
    }
}

/// Submission controller state

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]

pub enum SubmissionState {
    Idle,

    Validating,

    Submitting,

    Succeeded,

    Failed(ErrorKind),
}

impl SubmissionState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Succeeded | Self::Failed(_))
    }
}

impl std::fmt::Display for SubmissionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Idle => write!(f, "idle"),
            Self::Validating => write!(f, "validating"),
            Self::Submitting => write!(f, "submitting"),
            Self::Succeeded => write!(f, "succeeded"),
            Self::Failed(kind) => write!(f, "failed({kind:?})"),
        }
    }
}

/// Notification severity

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]

pub enum Severity {
    Info,

    Success,

    Warning,

    Error,
}

impl Severity {
    /// Alert style class; errors render as `danger`
    pub fn alert_class(&self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Success => "success",
            Self::Warning => "warning",
            Self::Error => "danger",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            Self::Error => "exclamation-triangle",
            _ => "info-circle",
        }
    }
}

/// A transient user-facing message

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]

pub struct Notification {
    pub message: String,

    pub severity: Severity,
}

impl Notification {
    pub fn new(message: impl Into<String>, severity: Severity) -> Self {
        Self {
            message: message.into(),
            severity,
        }
    }
}

/// Identifier of a notification element inserted into the surface
pub type NotificationId = u64;

/// Visual state of the submission control

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]

pub enum ControlAppearance {
    /// Enabled, labelled "Download"
    Ready,

    /// Disabled, labelled "Processing..."
    Loading,
}

impl ControlAppearance {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Ready => "Download",
            Self::Loading => "Processing...",
        }
    }

    pub fn is_enabled(&self) -> bool {
        matches!(self, Self::Ready)
    }
}

/// The form submission the host page should let through when the native
/// strategy is selected

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]

pub struct NativeSubmission {
    pub action: String,

    pub field_name: String,

    pub video_url: String,
}

/// What the host must do with the submit event it forwarded

#[derive(Debug, Clone, PartialEq, Eq)]

pub enum SubmitDisposition {
    /// Prevent the default action; the input was rejected
    Cancelled(RejectReason),

    /// A submission is already in flight
    Ignored,

    /// Let the default form navigation proceed
    Navigate(NativeSubmission),

    /// The asynchronous strategy finished in the given state
    Resolved(SubmissionState),
}

/// Keyboard input the controller reacts to

#[derive(Debug, Clone, Copy, PartialEq, Eq)]

pub struct KeyPress {
    pub key: Key,

    pub ctrl: bool,

    pub meta: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Enter,
    Escape,
    Other,
}

impl KeyPress {
    pub fn plain(key: Key) -> Self {
        Self {
            key,
            ctrl: false,
            meta: false,
        }
    }

    pub fn ctrl(key: Key) -> Self {
        Self {
            key,
            ctrl: true,
            meta: false,
        }
    }

    pub fn meta(key: Key) -> Self {
        Self {
            key,
            ctrl: false,
            meta: true,
        }
    }

    /// Ctrl+Enter or Cmd+Enter
    pub fn is_submit_accelerator(&self) -> bool {
        self.key == Key::Enter && (self.ctrl || self.meta)
    }
}

/// Application error types

#[derive(Debug, thiserror::Error)]

pub enum AppError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Missing page element: {0}")]
    MissingElement(String),

    #[error("Invalid state transition: {from} -> {to}")]
    InvalidTransition {
        from: SubmissionState,
        to: SubmissionState,
    },

    #[error("Save error: {0}")]
    Save(String),
}

/// Result type alias for application operations

pub type AppResult<T> = Result<T, AppError>;
