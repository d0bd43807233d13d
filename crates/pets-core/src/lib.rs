//! Core types and utilities for the pets tensor preprocessing project.
//!
//! This crate provides the foundational types, configuration, and error
//! handling used across the pets preprocessing workspace.

pub mod config;
pub mod error;
pub mod types;

pub use config::*;
pub use error::{Error, Result};
pub use types::*;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::config::*;
    pub use crate::error::{Error, Result};
    pub use crate::types::*;
}
