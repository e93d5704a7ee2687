//! TikTok Downloader - Core Library
//!
//! Client-side controller for the "paste a TikTok link, get the video" page:
//! URL validation, the download submission state machine, notifications and
//! the asynchronous fetch-and-save path used by mobile clients.

pub mod core;
pub mod utils;

// Re-export commonly used types
pub use crate::core::{
    capability::{CapabilityDetector, StaticCapability, UserAgentDetector},
    config::{AppConfig, ControllerSettings},
    controller::{PageContext, SubmissionController},
    error_handling::{ErrorKind, SubmissionError},
    models::{
        AppError, AppResult, ControlAppearance, KeyPress, Notification, Severity,
        SubmissionState, SubmitDisposition, ValidationResult,
    },
    navigation::NativeNavigator,
    notifier::Notifier,
    retrieval::{HttpRetrievalClient, RetrievalClient},
    saver::{FileSaver, LocalSaver, SaveHandle},
    surface::{ElementIds, MemorySurface, RenderingSurface},
    validator::{is_valid_tiktok_url, validate},
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// Initialize logging with default settings
pub fn init() -> anyhow::Result<()> {
    utils::logging::init_tracing();
    tracing::info!("📚 {} v{} initialized", NAME, VERSION);
    Ok(())
}
