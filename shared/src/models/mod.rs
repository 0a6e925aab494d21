//! Domain models for the PharmTrack platform

mod batch;
mod history;
mod medicine;
mod stock;
mod user;

pub use batch::*;
pub use history::*;
pub use medicine::*;
pub use stock::*;
pub use user::*;
