//! Pharmacy inventory service
//!
//! Re-derives the per-medicine stock view from the current snapshot of a
//! pharmacist's received batches on every call. The fold itself lives in the
//! shared crate; this service only fetches the snapshot and attaches the
//! expiry classification.

use chrono::{NaiveDate, Utc};
use serde::Serialize;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::error::AppResult;
use shared::expiry::{classify_expiry, ExpiryStatus};
use shared::models::{aggregate_stock, MedicineStock, ReceivedBatch};

/// Inventory service for the pharmacist stock dashboard
#[derive(Clone)]
pub struct InventoryService {
    db: PgPool,
}

/// One aggregated stock row with its expiry classification
#[derive(Debug, Clone, Serialize)]
pub struct StockView {
    #[serde(flatten)]
    pub stock: MedicineStock,
    pub expiry: ExpiryStatus,
}

/// Row for the received-batch snapshot query
#[derive(Debug, FromRow)]
struct ReceivedRow {
    medicine_id: Uuid,
    medicine_name: String,
    generic_name: Option<String>,
    dosage_form: String,
    strength: String,
    batch_number: String,
    quantity: i32,
    expiry_date: NaiveDate,
    manufacturing_date: NaiveDate,
}

impl InventoryService {
    /// Create a new InventoryService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Aggregate a pharmacist's received batches into per-medicine stock,
    /// classified against today's date
    pub async fn get_stock(&self, pharmacist_id: Uuid) -> AppResult<Vec<StockView>> {
        let snapshot = self.fetch_received(pharmacist_id).await?;
        let today = Utc::now().date_naive();

        Ok(aggregate_stock(&snapshot)
            .into_iter()
            .map(|stock| {
                let expiry = classify_expiry(stock.nearest_expiry, today);
                StockView { stock, expiry }
            })
            .collect())
    }

    /// Fetch the current received-batch snapshot joined with medicines
    async fn fetch_received(&self, pharmacist_id: Uuid) -> AppResult<Vec<ReceivedBatch>> {
        let rows = sqlx::query_as::<_, ReceivedRow>(
            r#"
            SELECT b.medicine_id, m.name AS medicine_name, m.generic_name, m.dosage_form,
                   m.strength, b.batch_number, b.quantity, b.expiry_date, b.manufacturing_date
            FROM batches b
            JOIN medicines m ON m.id = b.medicine_id
            WHERE b.pharmacist_id = $1 AND b.status = 'received'
            ORDER BY b.delivery_confirmed_at ASC, b.created_at ASC
            "#,
        )
        .bind(pharmacist_id)
        .fetch_all(&self.db)
        .await?;

        Ok(rows
            .into_iter()
            .map(|r| ReceivedBatch {
                medicine_id: r.medicine_id,
                medicine_name: r.medicine_name,
                generic_name: r.generic_name,
                dosage_form: r.dosage_form,
                strength: r.strength,
                batch_number: r.batch_number,
                quantity: r.quantity,
                expiry_date: r.expiry_date,
                manufacturing_date: r.manufacturing_date,
            })
            .collect())
    }
}
