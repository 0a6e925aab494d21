//! Batch lifecycle tests
//!
//! Tests for the batch state machine including:
//! - Status serialization and display labels
//! - Forward-only manufacturer transitions
//! - Scan-confirm idempotence

use proptest::prelude::*;

use shared::models::{BatchStatus, UserRole, PHARMACY_INVENTORY_LOCATION};
use shared::validation::validate_status_transition;

const ALL_STATUSES: [BatchStatus; 4] = [
    BatchStatus::Created,
    BatchStatus::InTransit,
    BatchStatus::Delivered,
    BatchStatus::Received,
];

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod unit_tests {
    use super::*;

    /// Status values round-trip through their storage representation
    #[test]
    fn test_status_str_round_trip() {
        for status in ALL_STATUSES {
            assert_eq!(BatchStatus::from_str(status.as_str()), Some(status));
        }
        assert_eq!(BatchStatus::from_str("returned"), None);
        assert_eq!(BatchStatus::from_str(""), None);
    }

    /// Storage representation is snake_case
    #[test]
    fn test_status_str_snake_case() {
        for status in ALL_STATUSES {
            assert!(status
                .as_str()
                .chars()
                .all(|c| c.is_ascii_lowercase() || c == '_'));
        }
    }

    /// Display labels are title case with underscores as spaces
    #[test]
    fn test_status_labels() {
        assert_eq!(BatchStatus::Created.label(), "Created");
        assert_eq!(BatchStatus::InTransit.label(), "In Transit");
        assert_eq!(BatchStatus::Delivered.label(), "Delivered");
        assert_eq!(BatchStatus::Received.label(), "Received");

        assert_eq!(BatchStatus::InTransit.to_string(), "In Transit");
    }

    /// Lifecycle positions are strictly increasing
    #[test]
    fn test_status_ordering() {
        for pair in ALL_STATUSES.windows(2) {
            assert!(pair[0].position() < pair[1].position());
        }
    }

    /// Manufacturers may move a batch to any later stage, including skips
    #[test]
    fn test_manufacturer_forward_transitions() {
        let valid = [
            (BatchStatus::Created, BatchStatus::InTransit),
            (BatchStatus::Created, BatchStatus::Delivered),
            (BatchStatus::Created, BatchStatus::Received),
            (BatchStatus::InTransit, BatchStatus::Delivered),
            (BatchStatus::InTransit, BatchStatus::Received),
            (BatchStatus::Delivered, BatchStatus::Received),
        ];

        for (from, to) in valid {
            assert!(
                validate_status_transition(UserRole::Manufacturer, from, to).is_ok(),
                "{} -> {} should be allowed",
                from,
                to
            );
        }
    }

    /// Backward and same-status manufacturer moves are rejected
    #[test]
    fn test_manufacturer_backward_transitions_rejected() {
        let invalid = [
            (BatchStatus::Received, BatchStatus::Created),
            (BatchStatus::Received, BatchStatus::Delivered),
            (BatchStatus::Delivered, BatchStatus::InTransit),
            (BatchStatus::InTransit, BatchStatus::Created),
            (BatchStatus::Created, BatchStatus::Created),
            (BatchStatus::Received, BatchStatus::Received),
        ];

        for (from, to) in invalid {
            assert!(
                validate_status_transition(UserRole::Manufacturer, from, to).is_err(),
                "{} -> {} should be rejected",
                from,
                to
            );
        }
    }

    /// Pharmacists never use the direct transition path
    #[test]
    fn test_pharmacist_direct_transition_rejected() {
        for from in ALL_STATUSES {
            for to in ALL_STATUSES {
                assert!(validate_status_transition(UserRole::Pharmacist, from, to).is_err());
            }
        }
    }
}

// ============================================================================
// Scan-Confirm Simulation
// ============================================================================

#[cfg(test)]
mod scan_confirm_tests {
    use super::*;
    use chrono::{DateTime, Utc};
    use uuid::Uuid;

    /// Minimal batch state touched by a scan confirmation
    #[derive(Debug, Clone, PartialEq)]
    struct ScanState {
        status: BatchStatus,
        pharmacist_id: Option<Uuid>,
        delivery_confirmed_at: Option<DateTime<Utc>>,
        current_location: Option<String>,
    }

    #[derive(Debug, PartialEq)]
    enum Outcome {
        Confirmed,
        AlreadyReceived,
    }

    /// Mirror of the conditional-update semantics: the transition applies
    /// only if the batch is not already received
    fn apply_scan(state: &mut ScanState, pharmacist: Uuid, now: DateTime<Utc>) -> Outcome {
        if state.status == BatchStatus::Received {
            return Outcome::AlreadyReceived;
        }
        state.status = BatchStatus::Received;
        state.pharmacist_id = Some(pharmacist);
        state.delivery_confirmed_at = Some(now);
        state.current_location = Some(PHARMACY_INVENTORY_LOCATION.to_string());
        Outcome::Confirmed
    }

    fn fresh_state(status: BatchStatus) -> ScanState {
        ScanState {
            status,
            pharmacist_id: None,
            delivery_confirmed_at: None,
            current_location: None,
        }
    }

    /// A first scan binds the pharmacist, timestamp, and location
    #[test]
    fn test_scan_confirm_binds_ownership() {
        let pharmacist = Uuid::new_v4();
        let now = Utc::now();
        let mut state = fresh_state(BatchStatus::Delivered);

        assert_eq!(apply_scan(&mut state, pharmacist, now), Outcome::Confirmed);
        assert_eq!(state.status, BatchStatus::Received);
        assert_eq!(state.pharmacist_id, Some(pharmacist));
        assert_eq!(state.delivery_confirmed_at, Some(now));
        assert_eq!(
            state.current_location.as_deref(),
            Some(PHARMACY_INVENTORY_LOCATION)
        );
    }

    /// Scan-confirm works from any non-received status
    #[test]
    fn test_scan_confirm_from_any_status() {
        for status in [
            BatchStatus::Created,
            BatchStatus::InTransit,
            BatchStatus::Delivered,
        ] {
            let mut state = fresh_state(status);
            assert_eq!(
                apply_scan(&mut state, Uuid::new_v4(), Utc::now()),
                Outcome::Confirmed
            );
        }
    }

    /// A second scan reports already-received and changes nothing
    #[test]
    fn test_scan_confirm_idempotent() {
        let first_pharmacist = Uuid::new_v4();
        let first_time = Utc::now();
        let mut state = fresh_state(BatchStatus::InTransit);

        assert_eq!(
            apply_scan(&mut state, first_pharmacist, first_time),
            Outcome::Confirmed
        );
        let after_first = state.clone();

        let second_time = first_time + chrono::Duration::seconds(5);
        assert_eq!(
            apply_scan(&mut state, Uuid::new_v4(), second_time),
            Outcome::AlreadyReceived
        );

        // No second timestamp, no new owner
        assert_eq!(state, after_first);
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================

#[cfg(test)]
mod property_tests {
    use super::*;

    fn status_strategy() -> impl Strategy<Value = BatchStatus> {
        prop_oneof![
            Just(BatchStatus::Created),
            Just(BatchStatus::InTransit),
            Just(BatchStatus::Delivered),
            Just(BatchStatus::Received),
        ]
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// A manufacturer transition is valid exactly when it moves forward
        #[test]
        fn prop_manufacturer_transition_matches_ordering(
            from in status_strategy(),
            to in status_strategy()
        ) {
            let allowed = validate_status_transition(UserRole::Manufacturer, from, to).is_ok();
            prop_assert_eq!(allowed, to.position() > from.position());
        }

        /// can_advance_to is irreflexive and antisymmetric
        #[test]
        fn prop_forward_only_is_strict(
            from in status_strategy(),
            to in status_strategy()
        ) {
            prop_assert!(!from.can_advance_to(from));
            if from.can_advance_to(to) {
                prop_assert!(!to.can_advance_to(from));
            }
        }
    }
}
