//! Core business logic module
//!
//! URL validation, the submission state machine and the collaborators the
//! controller drives: rendering surface, notifier, retrieval client and local
//! saver.

pub mod capability;
pub mod config;
pub mod controller;
pub mod error_handling;
pub mod models;
pub mod navigation;
pub mod notifier;
pub mod retrieval;
pub mod saver;
pub mod state_machine;
pub mod surface;
pub mod validator;

#[cfg(test)]
mod config_test;


// Re-export commonly used types
pub use config::AppConfig;
pub use controller::{PageContext, SubmissionController};
