//! User profile and role models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Role of a platform account
///
/// Manufacturers create medicines and batches and move batches through the
/// supply chain; pharmacists confirm deliveries and hold received inventory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    Manufacturer,
    Pharmacist,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Manufacturer => "manufacturer",
            UserRole::Pharmacist => "pharmacist",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "manufacturer" => Some(UserRole::Manufacturer),
            "pharmacist" => Some(UserRole::Pharmacist),
            _ => None,
        }
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UserRole::Manufacturer => write!(f, "Manufacturer"),
            UserRole::Pharmacist => write!(f, "Pharmacist"),
        }
    }
}

/// A user account profile
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Profile {
    pub id: Uuid,
    pub email: String,
    pub full_name: String,
    pub role: UserRole,
    pub created_at: DateTime<Utc>,
}
