//! Database models for the PharmTrack platform
//!
//! Re-exports models from the shared crate and adds backend-specific models

pub use shared::models::*;
