//! # sharenote-core
//!
//! Core types, traits, and abstractions for the sharenote backend.
//!
//! This crate provides the domain models, the error taxonomy, and the
//! repository traits that the storage and API crates build on.

pub mod error;
pub mod ids;
pub mod models;
pub mod traits;

// Re-export commonly used types at crate root
pub use error::{Error, Result};
pub use ids::{new_v7, parse_note_id, parse_user_id};
pub use models::*;
pub use traits::*;
