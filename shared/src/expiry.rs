//! Expiry-risk classification
//!
//! Pure calendar-date arithmetic; callers derive `today` once at the edge
//! (midnight-aligned) so repeated classification within one computation
//! cannot straddle a day boundary.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Urgency tier for an expiry date, most severe first
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExpiryTier {
    Expired,
    Critical,
    Warning,
    Normal,
}

impl ExpiryTier {
    /// Expired and critical stock is flagged for highlighting
    pub fn is_urgent(&self) -> bool {
        matches!(self, ExpiryTier::Expired | ExpiryTier::Critical)
    }
}

/// Classification of an expiry date relative to a reference day
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpiryStatus {
    pub tier: ExpiryTier,
    pub label: String,
    pub urgent: bool,
}

/// Classify an expiry date against `today`.
///
/// A batch expiring exactly today is critical with zero days remaining, not
/// expired; only dates strictly in the past are expired.
pub fn classify_expiry(expiry_date: NaiveDate, today: NaiveDate) -> ExpiryStatus {
    if expiry_date < today {
        return ExpiryStatus {
            tier: ExpiryTier::Expired,
            label: "Expired".to_string(),
            urgent: true,
        };
    }

    let days_until = (expiry_date - today).num_days();
    if days_until <= 30 {
        ExpiryStatus {
            tier: ExpiryTier::Critical,
            label: format!("Expires in {} days", days_until),
            urgent: true,
        }
    } else if days_until <= 90 {
        ExpiryStatus {
            tier: ExpiryTier::Warning,
            label: format!("{} days left", days_until),
            urgent: false,
        }
    } else {
        ExpiryStatus {
            tier: ExpiryTier::Normal,
            label: expiry_date.format("%b %d, %Y").to_string(),
            urgent: false,
        }
    }
}
