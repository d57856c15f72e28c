//! HTTP request handlers

pub mod characters;
pub mod error;
pub mod root;
pub mod types;

pub use characters::*;
pub use error::ApiError;
pub use root::*;

pub use types::*;
