//! Batch and lifecycle models

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Lifecycle status of a batch in the supply chain
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BatchStatus {
    Created,
    InTransit,
    Delivered,
    Received,
}

impl BatchStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BatchStatus::Created => "created",
            BatchStatus::InTransit => "in_transit",
            BatchStatus::Delivered => "delivered",
            BatchStatus::Received => "received",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "created" => Some(BatchStatus::Created),
            "in_transit" => Some(BatchStatus::InTransit),
            "delivered" => Some(BatchStatus::Delivered),
            "received" => Some(BatchStatus::Received),
            _ => None,
        }
    }

    /// Position in the lifecycle ordering
    pub fn position(&self) -> u8 {
        match self {
            BatchStatus::Created => 0,
            BatchStatus::InTransit => 1,
            BatchStatus::Delivered => 2,
            BatchStatus::Received => 3,
        }
    }

    /// Whether a manufacturer may move a batch from `self` to `to`.
    ///
    /// Only forward moves are allowed; skipping stages is permitted.
    pub fn can_advance_to(&self, to: BatchStatus) -> bool {
        to.position() > self.position()
    }

    /// Human-readable label: title case with underscores as spaces
    pub fn label(&self) -> &'static str {
        match self {
            BatchStatus::Created => "Created",
            BatchStatus::InTransit => "In Transit",
            BatchStatus::Delivered => "Delivered",
            BatchStatus::Received => "Received",
        }
    }
}

impl std::fmt::Display for BatchStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Location recorded on a batch once a pharmacist confirms delivery
pub const PHARMACY_INVENTORY_LOCATION: &str = "Pharmacy Inventory";

/// A medicine batch tracked through the supply chain
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Batch {
    pub id: Uuid,
    pub medicine_id: Uuid,
    pub manufacturer_id: Uuid,
    pub batch_number: String,
    pub quantity: i32,
    /// Unique traceability code (e.g. "PHARM-1735689600000-4F2A81C3D"),
    /// immutable after creation and the sole key for scan operations
    pub qr_code: String,
    pub manufacturing_date: NaiveDate,
    pub expiry_date: NaiveDate,
    pub status: BatchStatus,
    pub current_location: Option<String>,
    /// Set when the batch transitions to `received`
    pub pharmacist_id: Option<Uuid>,
    /// Set when the batch transitions to `received`
    pub delivery_confirmed_at: Option<DateTime<Utc>>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Generate a batch traceability code: PHARM-<unix millis>-<random suffix>
///
/// Generation never fails and performs no uniqueness check; the storage
/// layer's unique constraint on `qr_code` is the backstop. Collision odds
/// across concurrent creations are negligible (millisecond timestamp plus
/// nine random hex characters).
pub fn generate_qr_code() -> String {
    let millis = Utc::now().timestamp_millis();
    let entropy = Uuid::new_v4().simple().to_string();
    format!("PHARM-{}-{}", millis, entropy[..9].to_uppercase())
}
