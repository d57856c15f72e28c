//! Characters Core - shared configuration, errors, logging and record types
//!
//! Everything here is consumed by both the storage layer and the web server.

pub mod config;
pub mod error;
pub mod logging;
pub mod types;

pub use config::*;
pub use error::*;
pub use logging::*;
pub use types::*;

// Re-export commonly used external types
pub use tracing;
