//! Filesystem, HTTP client, endpoint and logging helpers shared by the
//! controller and the CLI host

pub mod file_utils;
pub mod logging;
pub mod network;
pub mod validation;

pub use file_utils::*;
pub use logging::*;
pub use network::*;
pub use validation::*;
