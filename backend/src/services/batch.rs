//! Batch lifecycle service
//!
//! Creation with QR-code assignment, manufacturer status transitions,
//! pharmacist scan-confirmation, and the per-batch audit trail.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::notify::{ChangeNotifier, InventoryEvent};
use shared::models::{
    generate_qr_code, Batch, BatchStatus, BatchStatusChange, MedicineSummary, UserRole,
    PHARMACY_INVENTORY_LOCATION,
};
use shared::validation::{
    validate_batch_number, validate_date_range, validate_quantity, validate_status_transition,
};

/// Batch service for lifecycle operations
#[derive(Clone)]
pub struct BatchService {
    db: PgPool,
    notifier: ChangeNotifier,
}

/// Input for creating a batch
#[derive(Debug, Deserialize)]
pub struct CreateBatchInput {
    pub medicine_id: Uuid,
    pub batch_number: String,
    pub quantity: i32,
    pub manufacturing_date: NaiveDate,
    pub expiry_date: NaiveDate,
    pub current_location: Option<String>,
    pub notes: Option<String>,
}

/// Input for a manufacturer-initiated status transition
#[derive(Debug, Deserialize)]
pub struct UpdateStatusInput {
    pub status: BatchStatus,
    pub location: Option<String>,
    pub notes: Option<String>,
}

/// A batch joined with its medicine's display fields
#[derive(Debug, Clone, Serialize)]
pub struct BatchWithMedicine {
    #[serde(flatten)]
    pub batch: Batch,
    pub medicine: MedicineSummary,
}

/// Result of a pharmacist scan-confirmation
///
/// Confirming an already-received batch is not an error; it is a distinct
/// outcome the caller reports as "already received".
#[derive(Debug, Clone)]
pub enum ScanOutcome {
    Confirmed(BatchWithMedicine),
    AlreadyReceived(BatchWithMedicine),
}

/// Database row for a batch
#[derive(Debug, FromRow)]
struct BatchRow {
    id: Uuid,
    medicine_id: Uuid,
    manufacturer_id: Uuid,
    batch_number: String,
    quantity: i32,
    qr_code: String,
    manufacturing_date: NaiveDate,
    expiry_date: NaiveDate,
    status: String,
    current_location: Option<String>,
    pharmacist_id: Option<Uuid>,
    delivery_confirmed_at: Option<DateTime<Utc>>,
    notes: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Database row for a batch joined with its medicine
#[derive(Debug, FromRow)]
struct BatchJoinRow {
    #[sqlx(flatten)]
    batch: BatchRow,
    medicine_name: String,
    dosage_form: String,
    strength: String,
}

const BATCH_COLUMNS: &str = "b.id, b.medicine_id, b.manufacturer_id, b.batch_number, b.quantity, \
     b.qr_code, b.manufacturing_date, b.expiry_date, b.status, b.current_location, \
     b.pharmacist_id, b.delivery_confirmed_at, b.notes, b.created_at, b.updated_at";

impl BatchService {
    /// Create a new BatchService instance
    pub fn new(db: PgPool, notifier: ChangeNotifier) -> Self {
        Self { db, notifier }
    }

    /// Create a batch with a freshly generated QR code
    ///
    /// A storage-level collision on the code surfaces as `DuplicateEntry`;
    /// re-submitting generates a fresh code.
    pub async fn create_batch(
        &self,
        manufacturer_id: Uuid,
        input: CreateBatchInput,
    ) -> AppResult<Batch> {
        validate_batch_number(&input.batch_number)
            .map_err(|msg| AppError::validation("batch_number", msg))?;
        validate_quantity(input.quantity).map_err(|msg| AppError::validation("quantity", msg))?;
        validate_date_range(input.manufacturing_date, input.expiry_date)
            .map_err(|msg| AppError::validation("expiry_date", msg))?;

        // The medicine must belong to the calling manufacturer
        let medicine_exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM medicines WHERE id = $1 AND manufacturer_id = $2)",
        )
        .bind(input.medicine_id)
        .bind(manufacturer_id)
        .fetch_one(&self.db)
        .await?;

        if !medicine_exists {
            return Err(AppError::NotFound("Medicine".to_string()));
        }

        let qr_code = generate_qr_code();

        let mut tx = self.db.begin().await?;

        let row = sqlx::query_as::<_, BatchRow>(
            r#"
            INSERT INTO batches (medicine_id, manufacturer_id, batch_number, quantity, qr_code,
                                 manufacturing_date, expiry_date, status, current_location, notes)
            VALUES ($1, $2, $3, $4, $5, $6, $7, 'created', $8, $9)
            RETURNING id, medicine_id, manufacturer_id, batch_number, quantity, qr_code,
                      manufacturing_date, expiry_date, status, current_location,
                      pharmacist_id, delivery_confirmed_at, notes, created_at, updated_at
            "#,
        )
        .bind(input.medicine_id)
        .bind(manufacturer_id)
        .bind(input.batch_number.trim())
        .bind(input.quantity)
        .bind(&qr_code)
        .bind(input.manufacturing_date)
        .bind(input.expiry_date)
        .bind(&input.current_location)
        .bind(&input.notes)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| Self::map_unique_violation(e, "qr_code"))?;

        Self::append_history(
            &mut tx,
            row.id,
            BatchStatus::Created,
            manufacturer_id,
            input.current_location.as_deref(),
            input.notes.as_deref(),
        )
        .await?;

        tx.commit().await?;

        tracing::info!(batch_id = %row.id, qr_code = %qr_code, "Batch created");
        Self::batch_from_row(row)
    }

    /// Get all batches for a manufacturer, newest first
    pub async fn get_batches(&self, manufacturer_id: Uuid) -> AppResult<Vec<BatchWithMedicine>> {
        let rows = sqlx::query_as::<_, BatchJoinRow>(&format!(
            r#"
            SELECT {BATCH_COLUMNS}, m.name AS medicine_name, m.dosage_form, m.strength
            FROM batches b
            JOIN medicines m ON m.id = b.medicine_id
            WHERE b.manufacturer_id = $1
            ORDER BY b.created_at DESC
            "#
        ))
        .bind(manufacturer_id)
        .fetch_all(&self.db)
        .await?;

        rows.into_iter().map(Self::joined_from_row).collect()
    }

    /// Get one batch owned by the manufacturer
    pub async fn get_batch(
        &self,
        manufacturer_id: Uuid,
        batch_id: Uuid,
    ) -> AppResult<BatchWithMedicine> {
        let row = sqlx::query_as::<_, BatchJoinRow>(&format!(
            r#"
            SELECT {BATCH_COLUMNS}, m.name AS medicine_name, m.dosage_form, m.strength
            FROM batches b
            JOIN medicines m ON m.id = b.medicine_id
            WHERE b.id = $1 AND b.manufacturer_id = $2
            "#
        ))
        .bind(batch_id)
        .bind(manufacturer_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Batch".to_string()))?;

        Self::joined_from_row(row)
    }

    /// Get a pharmacist's received batches, most recently confirmed first
    pub async fn get_received_batches(
        &self,
        pharmacist_id: Uuid,
    ) -> AppResult<Vec<BatchWithMedicine>> {
        let rows = sqlx::query_as::<_, BatchJoinRow>(&format!(
            r#"
            SELECT {BATCH_COLUMNS}, m.name AS medicine_name, m.dosage_form, m.strength
            FROM batches b
            JOIN medicines m ON m.id = b.medicine_id
            WHERE b.pharmacist_id = $1
            ORDER BY b.delivery_confirmed_at DESC
            "#
        ))
        .bind(pharmacist_id)
        .fetch_all(&self.db)
        .await?;

        rows.into_iter().map(Self::joined_from_row).collect()
    }

    /// Apply a manufacturer-initiated status transition (forward-only)
    pub async fn update_status(
        &self,
        manufacturer_id: Uuid,
        batch_id: Uuid,
        input: UpdateStatusInput,
    ) -> AppResult<Batch> {
        let current = sqlx::query_scalar::<_, String>(
            "SELECT status FROM batches WHERE id = $1 AND manufacturer_id = $2",
        )
        .bind(batch_id)
        .bind(manufacturer_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Batch".to_string()))?;

        let from = Self::parse_status(&current)?;
        validate_status_transition(UserRole::Manufacturer, from, input.status).map_err(|msg| {
            AppError::InvalidStateTransition(format!(
                "Cannot move batch from {} to {}: {}",
                from.label(),
                input.status.label(),
                msg
            ))
        })?;

        let mut tx = self.db.begin().await?;

        // Conditional update: the transition applies only if the status we
        // validated against is still the stored one. A concurrent change
        // means our read was stale and the caller must retry.
        let row = sqlx::query_as::<_, BatchRow>(
            r#"
            UPDATE batches
            SET status = $1, current_location = COALESCE($2, current_location), updated_at = now()
            WHERE id = $3 AND manufacturer_id = $4 AND status = $5
            RETURNING id, medicine_id, manufacturer_id, batch_number, quantity, qr_code,
                      manufacturing_date, expiry_date, status, current_location,
                      pharmacist_id, delivery_confirmed_at, notes, created_at, updated_at
            "#,
        )
        .bind(input.status.as_str())
        .bind(&input.location)
        .bind(batch_id)
        .bind(manufacturer_id)
        .bind(from.as_str())
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| {
            AppError::InvalidStateTransition(
                "Batch status changed concurrently; reload and retry".to_string(),
            )
        })?;

        Self::append_history(
            &mut tx,
            batch_id,
            input.status,
            manufacturer_id,
            input.location.as_deref(),
            input.notes.as_deref(),
        )
        .await?;

        tx.commit().await?;

        tracing::info!(batch_id = %batch_id, status = input.status.as_str(), "Batch status updated");
        Self::batch_from_row(row)
    }

    /// Look up a batch (with medicine) by its QR code
    pub async fn find_by_qr_code(&self, qr_code: &str) -> AppResult<BatchWithMedicine> {
        let row = sqlx::query_as::<_, BatchJoinRow>(&format!(
            r#"
            SELECT {BATCH_COLUMNS}, m.name AS medicine_name, m.dosage_form, m.strength
            FROM batches b
            JOIN medicines m ON m.id = b.medicine_id
            WHERE b.qr_code = $1
            "#
        ))
        .bind(qr_code)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Batch".to_string()))?;

        Self::joined_from_row(row)
    }

    /// Confirm delivery of a batch by QR code, binding it to the pharmacist.
    ///
    /// The UPDATE is conditional on the batch not already being received, so
    /// two concurrent scans serialize at the database: exactly one applies
    /// the transition and the other reports "already received". The
    /// in-memory status check is never the authority.
    pub async fn confirm_delivery(
        &self,
        pharmacist_id: Uuid,
        qr_code: &str,
    ) -> AppResult<ScanOutcome> {
        let mut tx = self.db.begin().await?;

        let updated = sqlx::query_as::<_, BatchRow>(
            r#"
            UPDATE batches
            SET status = 'received', pharmacist_id = $2, delivery_confirmed_at = now(),
                current_location = $3, updated_at = now()
            WHERE qr_code = $1 AND status <> 'received'
            RETURNING id, medicine_id, manufacturer_id, batch_number, quantity, qr_code,
                      manufacturing_date, expiry_date, status, current_location,
                      pharmacist_id, delivery_confirmed_at, notes, created_at, updated_at
            "#,
        )
        .bind(qr_code)
        .bind(pharmacist_id)
        .bind(PHARMACY_INVENTORY_LOCATION)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(row) = updated else {
            tx.commit().await?;
            // Either the code matches nothing, or the batch is already
            // received; the latter is a no-op outcome, not an error.
            let existing = self.find_by_qr_code(qr_code).await?;
            return Ok(ScanOutcome::AlreadyReceived(existing));
        };

        Self::append_history(
            &mut tx,
            row.id,
            BatchStatus::Received,
            pharmacist_id,
            Some(PHARMACY_INVENTORY_LOCATION),
            None,
        )
        .await?;

        tx.commit().await?;

        let batch_id = row.id;
        let confirmed = self.find_by_qr_code(qr_code).await?;

        tracing::info!(batch_id = %batch_id, pharmacist_id = %pharmacist_id, "Delivery confirmed");
        self.notifier.publish(InventoryEvent {
            pharmacist_id,
            batch_id,
        });

        Ok(ScanOutcome::Confirmed(confirmed))
    }

    /// Get the status history of a batch visible to the caller
    pub async fn get_history(
        &self,
        user_id: Uuid,
        batch_id: Uuid,
    ) -> AppResult<Vec<BatchStatusChange>> {
        // Visible to the owning manufacturer and, once received, the
        // pharmacist it was delivered to
        let visible = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM batches WHERE id = $1 AND (manufacturer_id = $2 OR pharmacist_id = $2))",
        )
        .bind(batch_id)
        .bind(user_id)
        .fetch_one(&self.db)
        .await?;

        if !visible {
            return Err(AppError::NotFound("Batch".to_string()));
        }

        let rows = sqlx::query_as::<_, (Uuid, Uuid, String, Uuid, Option<String>, Option<String>, DateTime<Utc>)>(
            r#"
            SELECT id, batch_id, status, changed_by, location, notes, created_at
            FROM batch_status_history
            WHERE batch_id = $1
            ORDER BY created_at ASC
            "#,
        )
        .bind(batch_id)
        .fetch_all(&self.db)
        .await?;

        rows.into_iter()
            .map(|r| {
                Ok(BatchStatusChange {
                    id: r.0,
                    batch_id: r.1,
                    status: Self::parse_status(&r.2)?,
                    changed_by: r.3,
                    location: r.4,
                    notes: r.5,
                    created_at: r.6,
                })
            })
            .collect()
    }

    async fn append_history(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        batch_id: Uuid,
        status: BatchStatus,
        changed_by: Uuid,
        location: Option<&str>,
        notes: Option<&str>,
    ) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO batch_status_history (batch_id, status, changed_by, location, notes)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(batch_id)
        .bind(status.as_str())
        .bind(changed_by)
        .bind(location)
        .bind(notes)
        .execute(&mut **tx)
        .await?;

        Ok(())
    }

    fn parse_status(s: &str) -> AppResult<BatchStatus> {
        BatchStatus::from_str(s)
            .ok_or_else(|| AppError::Internal(format!("Unknown batch status in storage: {}", s)))
    }

    fn batch_from_row(row: BatchRow) -> AppResult<Batch> {
        Ok(Batch {
            id: row.id,
            medicine_id: row.medicine_id,
            manufacturer_id: row.manufacturer_id,
            batch_number: row.batch_number,
            quantity: row.quantity,
            qr_code: row.qr_code,
            manufacturing_date: row.manufacturing_date,
            expiry_date: row.expiry_date,
            status: Self::parse_status(&row.status)?,
            current_location: row.current_location,
            pharmacist_id: row.pharmacist_id,
            delivery_confirmed_at: row.delivery_confirmed_at,
            notes: row.notes,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }

    fn joined_from_row(row: BatchJoinRow) -> AppResult<BatchWithMedicine> {
        let medicine = MedicineSummary {
            name: row.medicine_name,
            dosage_form: row.dosage_form,
            strength: row.strength,
        };
        Ok(BatchWithMedicine {
            batch: Self::batch_from_row(row.batch)?,
            medicine,
        })
    }

    fn map_unique_violation(e: sqlx::Error, field: &str) -> AppError {
        match &e {
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                AppError::DuplicateEntry(field.to_string())
            }
            _ => AppError::DatabaseError(e),
        }
    }
}
