//! Shared types and core logic for the PharmTrack platform
//!
//! This crate contains the domain models and the pure batch-lifecycle,
//! inventory-aggregation and expiry-classification logic shared between the
//! backend and other components of the system.

pub mod expiry;
pub mod models;
pub mod validation;

pub use expiry::*;
pub use models::*;
pub use validation::*;
