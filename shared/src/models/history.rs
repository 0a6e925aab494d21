//! Batch status audit trail

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::BatchStatus;

/// An append-only record of a single status transition
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchStatusChange {
    pub id: Uuid,
    pub batch_id: Uuid,
    pub status: BatchStatus,
    /// User who applied the transition
    pub changed_by: Uuid,
    pub location: Option<String>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}
