//! Business logic services for the PharmTrack platform

pub mod auth;
pub mod batch;
pub mod inventory;
pub mod medicine;

pub use auth::AuthService;
pub use batch::BatchService;
pub use inventory::InventoryService;
pub use medicine::MedicineService;
