//! Validation utilities for the PharmTrack platform

use chrono::NaiveDate;

use crate::models::{BatchStatus, UserRole};

// ============================================================================
// Batch Validations
// ============================================================================

/// Validate that a batch quantity is positive
pub fn validate_quantity(quantity: i32) -> Result<(), &'static str> {
    if quantity <= 0 {
        return Err("Quantity must be positive");
    }
    Ok(())
}

/// Validate that the expiry date is on or after the manufacturing date
pub fn validate_date_range(
    manufacturing_date: NaiveDate,
    expiry_date: NaiveDate,
) -> Result<(), &'static str> {
    if expiry_date < manufacturing_date {
        return Err("Expiry date must be on or after the manufacturing date");
    }
    Ok(())
}

/// Validate a batch number (non-empty, reasonable length)
pub fn validate_batch_number(batch_number: &str) -> Result<(), &'static str> {
    let trimmed = batch_number.trim();
    if trimmed.is_empty() {
        return Err("Batch number cannot be empty");
    }
    if trimmed.len() > 64 {
        return Err("Batch number is too long");
    }
    Ok(())
}

/// Validate a status transition for the given actor role.
///
/// Manufacturers may only move a batch forward through the lifecycle; the
/// pharmacist path is the scan-confirm operation, which is validated
/// separately against the batch's current status.
pub fn validate_status_transition(
    role: UserRole,
    from: BatchStatus,
    to: BatchStatus,
) -> Result<(), &'static str> {
    match role {
        UserRole::Manufacturer => {
            if from.can_advance_to(to) {
                Ok(())
            } else {
                Err("Batches can only move forward through the lifecycle")
            }
        }
        UserRole::Pharmacist => Err("Pharmacists confirm deliveries by scanning the QR code"),
    }
}

// ============================================================================
// General Validations
// ============================================================================

/// Validate email format (basic check)
pub fn validate_email(email: &str) -> Result<(), &'static str> {
    if email.contains('@') && email.contains('.') && email.len() >= 5 {
        Ok(())
    } else {
        Err("Invalid email format")
    }
}

/// Validate password strength (minimum length)
pub fn validate_password(password: &str) -> Result<(), &'static str> {
    if password.len() < 8 {
        return Err("Password must be at least 8 characters");
    }
    Ok(())
}

/// Validate a required text field is non-empty
pub fn validate_non_empty(value: &str) -> Result<(), &'static str> {
    if value.trim().is_empty() {
        return Err("Field cannot be empty");
    }
    Ok(())
}
