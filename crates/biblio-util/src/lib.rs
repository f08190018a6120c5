//! Shared utilities for biblio
//!
//! This crate provides:
//! - ID types (Isbn, MemberId)
//! - Money as integer cents
//! - Time utilities (wall-clock date with mock-time support)
//! - Error types
//! - Default paths for config and data directories

mod error;
mod ids;
mod money;
mod paths;
mod time;

pub use error::*;
pub use ids::*;
pub use money::*;
pub use paths::*;
pub use time::*;
