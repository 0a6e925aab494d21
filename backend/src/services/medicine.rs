//! Medicine catalog service

use chrono::{DateTime, Utc};
use serde::Deserialize;
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use shared::models::Medicine;
use shared::validation::validate_non_empty;

type MedicineRow = (
    Uuid,
    Uuid,
    String,
    Option<String>,
    Option<String>,
    String,
    String,
    DateTime<Utc>,
    DateTime<Utc>,
);

/// Medicine service for managing a manufacturer's catalog
#[derive(Clone)]
pub struct MedicineService {
    db: PgPool,
}

/// Input for registering a medicine
#[derive(Debug, Deserialize)]
pub struct CreateMedicineInput {
    pub name: String,
    pub generic_name: Option<String>,
    pub description: Option<String>,
    pub dosage_form: String,
    pub strength: String,
}

impl MedicineService {
    /// Create a new MedicineService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Register a new medicine owned by the calling manufacturer
    pub async fn create_medicine(
        &self,
        manufacturer_id: Uuid,
        input: CreateMedicineInput,
    ) -> AppResult<Medicine> {
        validate_non_empty(&input.name)
            .map_err(|_| AppError::validation("name", "Medicine name cannot be empty"))?;
        validate_non_empty(&input.dosage_form)
            .map_err(|_| AppError::validation("dosage_form", "Dosage form cannot be empty"))?;
        validate_non_empty(&input.strength)
            .map_err(|_| AppError::validation("strength", "Strength cannot be empty"))?;

        let row = sqlx::query_as::<_, MedicineRow>(
            r#"
            INSERT INTO medicines (manufacturer_id, name, generic_name, description, dosage_form, strength)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, manufacturer_id, name, generic_name, description, dosage_form, strength,
                      created_at, updated_at
            "#,
        )
        .bind(manufacturer_id)
        .bind(input.name.trim())
        .bind(&input.generic_name)
        .bind(&input.description)
        .bind(input.dosage_form.trim())
        .bind(input.strength.trim())
        .fetch_one(&self.db)
        .await?;

        Ok(Self::medicine_from_row(row))
    }

    /// Get all medicines owned by a manufacturer
    pub async fn get_medicines(&self, manufacturer_id: Uuid) -> AppResult<Vec<Medicine>> {
        let rows = sqlx::query_as::<_, MedicineRow>(
            r#"
            SELECT id, manufacturer_id, name, generic_name, description, dosage_form, strength,
                   created_at, updated_at
            FROM medicines
            WHERE manufacturer_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(manufacturer_id)
        .fetch_all(&self.db)
        .await?;

        Ok(rows.into_iter().map(Self::medicine_from_row).collect())
    }

    /// Get a medicine by ID, scoped to its manufacturer
    pub async fn get_medicine(&self, manufacturer_id: Uuid, medicine_id: Uuid) -> AppResult<Medicine> {
        let row = sqlx::query_as::<_, MedicineRow>(
            r#"
            SELECT id, manufacturer_id, name, generic_name, description, dosage_form, strength,
                   created_at, updated_at
            FROM medicines
            WHERE id = $1 AND manufacturer_id = $2
            "#,
        )
        .bind(medicine_id)
        .bind(manufacturer_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Medicine".to_string()))?;

        Ok(Self::medicine_from_row(row))
    }

    fn medicine_from_row(row: MedicineRow) -> Medicine {
        Medicine {
            id: row.0,
            manufacturer_id: row.1,
            name: row.2,
            generic_name: row.3,
            description: row.4,
            dosage_form: row.5,
            strength: row.6,
            created_at: row.7,
            updated_at: row.8,
        }
    }
}
