//! Derived pharmacy stock views
//!
//! `MedicineStock` is never persisted: it is recomputed on demand by folding
//! over the current snapshot of a pharmacist's received batches.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

/// One received batch joined with its medicine, as fetched for aggregation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReceivedBatch {
    pub medicine_id: Uuid,
    pub medicine_name: String,
    pub generic_name: Option<String>,
    pub dosage_form: String,
    pub strength: String,
    pub batch_number: String,
    pub quantity: i32,
    pub expiry_date: NaiveDate,
    pub manufacturing_date: NaiveDate,
}

/// Per-batch detail inside a stock row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockBatch {
    pub batch_number: String,
    pub quantity: i32,
    pub expiry_date: NaiveDate,
    pub manufacturing_date: NaiveDate,
}

/// Aggregated stock of one medicine across a pharmacist's received batches
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MedicineStock {
    pub medicine_id: Uuid,
    pub medicine_name: String,
    pub generic_name: Option<String>,
    pub strength: String,
    pub dosage_form: String,
    pub total_quantity: i64,
    pub batches: Vec<StockBatch>,
    pub nearest_expiry: NaiveDate,
}

/// Fold received batches into one stock row per distinct medicine.
///
/// Rows group by `medicine_id` in first-seen order; quantities sum into
/// `total_quantity`; `nearest_expiry` tracks the minimum expiry date with a
/// strict less-than comparison, so ties keep the first-seen date. Medicines
/// with no received batches never appear.
pub fn aggregate_stock(batches: &[ReceivedBatch]) -> Vec<MedicineStock> {
    let mut stocks: Vec<MedicineStock> = Vec::new();
    let mut index: HashMap<Uuid, usize> = HashMap::new();

    for batch in batches {
        let detail = StockBatch {
            batch_number: batch.batch_number.clone(),
            quantity: batch.quantity,
            expiry_date: batch.expiry_date,
            manufacturing_date: batch.manufacturing_date,
        };

        match index.get(&batch.medicine_id) {
            Some(&i) => {
                let stock = &mut stocks[i];
                stock.total_quantity += i64::from(batch.quantity);
                if batch.expiry_date < stock.nearest_expiry {
                    stock.nearest_expiry = batch.expiry_date;
                }
                stock.batches.push(detail);
            }
            None => {
                index.insert(batch.medicine_id, stocks.len());
                stocks.push(MedicineStock {
                    medicine_id: batch.medicine_id,
                    medicine_name: batch.medicine_name.clone(),
                    generic_name: batch.generic_name.clone(),
                    strength: batch.strength.clone(),
                    dosage_form: batch.dosage_form.clone(),
                    total_quantity: i64::from(batch.quantity),
                    batches: vec![detail],
                    nearest_expiry: batch.expiry_date,
                });
            }
        }
    }

    stocks
}
