//! Inventory aggregation tests
//!
//! Tests for grouping received batches into per-medicine stock including:
//! - Quantity totals across batches
//! - Nearest-expiry selection
//! - Stable grouping order

use chrono::{Duration, NaiveDate, Utc};
use proptest::prelude::*;
use uuid::Uuid;

use shared::expiry::{classify_expiry, ExpiryTier};
use shared::models::{aggregate_stock, ReceivedBatch};

fn received_batch(
    medicine_id: Uuid,
    name: &str,
    batch_number: &str,
    quantity: i32,
    expiry_date: NaiveDate,
) -> ReceivedBatch {
    ReceivedBatch {
        medicine_id,
        medicine_name: name.to_string(),
        generic_name: None,
        dosage_form: "Tablet".to_string(),
        strength: "500mg".to_string(),
        batch_number: batch_number.to_string(),
        quantity,
        expiry_date,
        manufacturing_date: expiry_date - Duration::days(365),
    }
}

fn today() -> NaiveDate {
    Utc::now().date_naive()
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod unit_tests {
    use super::*;

    #[test]
    fn test_empty_input_yields_no_stock() {
        assert!(aggregate_stock(&[]).is_empty());
    }

    /// A single received batch produces one stock row carrying its quantity
    /// and expiry
    #[test]
    fn test_single_batch_single_row() {
        let medicine = Uuid::new_v4();
        let expiry = today() + Duration::days(10);
        let stock = aggregate_stock(&[received_batch(medicine, "Amoxicillin", "B1", 100, expiry)]);

        assert_eq!(stock.len(), 1);
        assert_eq!(stock[0].medicine_id, medicine);
        assert_eq!(stock[0].total_quantity, 100);
        assert_eq!(stock[0].nearest_expiry, expiry);
        assert_eq!(stock[0].batches.len(), 1);
        assert_eq!(stock[0].batches[0].batch_number, "B1");

        // Ten days out classifies as critical on the stock view
        let status = classify_expiry(stock[0].nearest_expiry, today());
        assert_eq!(status.tier, ExpiryTier::Critical);
    }

    /// Batches of the same medicine collapse into one row; the nearest
    /// expiry wins
    #[test]
    fn test_same_medicine_batches_grouped() {
        let medicine = Uuid::new_v4();
        let near = today() + Duration::days(5);
        let far = today() + Duration::days(200);

        let stock = aggregate_stock(&[
            received_batch(medicine, "Amoxicillin", "B1", 50, near),
            received_batch(medicine, "Amoxicillin", "B2", 30, far),
        ]);

        assert_eq!(stock.len(), 1);
        assert_eq!(stock[0].total_quantity, 80);
        assert_eq!(stock[0].nearest_expiry, near);
        assert_eq!(stock[0].batches.len(), 2);

        // Classification follows the nearest expiry, not the furthest
        let status = classify_expiry(stock[0].nearest_expiry, today());
        assert_eq!(status.tier, ExpiryTier::Critical);
    }

    /// Distinct medicines stay in distinct rows ordered by first appearance
    #[test]
    fn test_distinct_medicines_stable_order() {
        let first = Uuid::new_v4();
        let second = Uuid::new_v4();
        let expiry = today() + Duration::days(120);

        let stock = aggregate_stock(&[
            received_batch(first, "Amoxicillin", "A1", 10, expiry),
            received_batch(second, "Ibuprofen", "I1", 20, expiry),
            received_batch(first, "Amoxicillin", "A2", 5, expiry),
        ]);

        assert_eq!(stock.len(), 2);
        assert_eq!(stock[0].medicine_id, first);
        assert_eq!(stock[0].total_quantity, 15);
        assert_eq!(stock[1].medicine_id, second);
        assert_eq!(stock[1].total_quantity, 20);
    }

    /// Equal expiry dates keep the first-seen date; only a strictly earlier
    /// one replaces it
    #[test]
    fn test_nearest_expiry_tie_keeps_first() {
        let medicine = Uuid::new_v4();
        let expiry = today() + Duration::days(60);

        let stock = aggregate_stock(&[
            received_batch(medicine, "Amoxicillin", "B1", 10, expiry),
            received_batch(medicine, "Amoxicillin", "B2", 10, expiry),
            received_batch(medicine, "Amoxicillin", "B3", 10, expiry - Duration::days(1)),
        ]);

        assert_eq!(stock[0].nearest_expiry, expiry - Duration::days(1));
    }

    /// Totals are widened to i64 so large batch counts cannot overflow
    #[test]
    fn test_total_quantity_widens() {
        let medicine = Uuid::new_v4();
        let expiry = today() + Duration::days(365);

        let batches: Vec<ReceivedBatch> = (0..3)
            .map(|i| {
                received_batch(
                    medicine,
                    "Amoxicillin",
                    &format!("B{}", i),
                    i32::MAX,
                    expiry,
                )
            })
            .collect();

        let stock = aggregate_stock(&batches);
        assert_eq!(stock[0].total_quantity, i64::from(i32::MAX) * 3);
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================

#[cfg(test)]
mod property_tests {
    use super::*;
    use std::collections::HashSet;

    fn batch_strategy(medicine_pool: Vec<Uuid>) -> impl Strategy<Value = ReceivedBatch> {
        (
            0..medicine_pool.len(),
            1..10_000i32,
            0i64..730,
        )
            .prop_map(move |(idx, quantity, expiry_offset)| {
                received_batch(
                    medicine_pool[idx],
                    "Medicine",
                    "BN",
                    quantity,
                    today() + Duration::days(expiry_offset),
                )
            })
    }

    fn batches_strategy() -> impl Strategy<Value = Vec<ReceivedBatch>> {
        let pool: Vec<Uuid> = (0..4).map(|_| Uuid::new_v4()).collect();
        proptest::collection::vec(batch_strategy(pool), 0..32)
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// The sum of stock totals equals the sum of input quantities
        #[test]
        fn prop_totals_conserved(batches in batches_strategy()) {
            let stock = aggregate_stock(&batches);
            let input_sum: i64 = batches.iter().map(|b| i64::from(b.quantity)).sum();
            let stock_sum: i64 = stock.iter().map(|s| s.total_quantity).sum();
            prop_assert_eq!(input_sum, stock_sum);
        }

        /// Every input batch lands in exactly one stock row
        #[test]
        fn prop_batches_conserved(batches in batches_strategy()) {
            let stock = aggregate_stock(&batches);
            let grouped: usize = stock.iter().map(|s| s.batches.len()).sum();
            prop_assert_eq!(grouped, batches.len());
        }

        /// One row per distinct medicine, and nearest_expiry is the group
        /// minimum
        #[test]
        fn prop_grouping_and_minimum(batches in batches_strategy()) {
            let stock = aggregate_stock(&batches);

            let distinct: HashSet<Uuid> = batches.iter().map(|b| b.medicine_id).collect();
            prop_assert_eq!(stock.len(), distinct.len());

            for row in &stock {
                let group_min = batches
                    .iter()
                    .filter(|b| b.medicine_id == row.medicine_id)
                    .map(|b| b.expiry_date)
                    .min();
                prop_assert_eq!(Some(row.nearest_expiry), group_min);
            }
        }
    }
}
