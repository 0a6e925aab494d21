//! Medicine catalog models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A medicine registered by a manufacturer
///
/// Immutable in practice once batches reference it; there is no delete path.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Medicine {
    pub id: Uuid,
    pub manufacturer_id: Uuid,
    pub name: String,
    pub generic_name: Option<String>,
    pub description: Option<String>,
    /// e.g. "Tablet", "Capsule", "Syrup"
    pub dosage_form: String,
    /// e.g. "500mg"
    pub strength: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Medicine fields shown alongside a batch
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MedicineSummary {
    pub name: String,
    pub dosage_form: String,
    pub strength: String,
}
