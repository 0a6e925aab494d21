//! HTTP handlers for the PharmTrack platform

mod auth;
mod batch;
mod health;
mod inventory;
mod medicine;
mod scan;

pub use auth::*;
pub use batch::*;
pub use health::*;
pub use inventory::*;
pub use medicine::*;
pub use scan::*;
