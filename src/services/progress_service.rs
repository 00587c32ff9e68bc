use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

use crate::error::{FieldErrors, GymError, GymResult};
use crate::models::{ProgressEntry, ProgressForm};

const PROGRESS_COLUMNS: &str = "id, user_id, recorded_on, weight_kg, body_fat_pct, muscle_mass_kg, \
     waist_cm, chest_cm, arms_cm, legs_cm, photo_url, notes, created_at";

#[derive(Clone)]
pub struct ProgressService {
    db: PgPool,
}

impl ProgressService {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    pub async fn log_progress(&self, user_id: Uuid, form: &ProgressForm) -> GymResult<ProgressEntry> {
        form.validate()?;
        let weight = form.weight_kg.ok_or_else(|| {
            GymError::Validation(FieldErrors::single("weight_kg", "El peso es obligatorio."))
        })?;

        let query = format!(
            "INSERT INTO progress_entries (id, user_id, recorded_on, weight_kg, body_fat_pct,
                                           muscle_mass_kg, waist_cm, chest_cm, arms_cm, legs_cm,
                                           photo_url, notes)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
             RETURNING {}",
            PROGRESS_COLUMNS
        );

        let entry = sqlx::query_as::<_, ProgressEntry>(&query)
            .bind(Uuid::new_v4())
            .bind(user_id)
            .bind(form.recorded_on.unwrap_or_else(|| Utc::now().date_naive()))
            .bind(weight)
            .bind(form.body_fat_pct)
            .bind(form.muscle_mass_kg)
            .bind(form.waist_cm)
            .bind(form.chest_cm)
            .bind(form.arms_cm)
            .bind(form.legs_cm)
            .bind(form.photo_url.trim())
            .bind(form.notes.trim())
            .fetch_one(&self.db)
            .await?;

        Ok(entry)
    }

    /// Most recent entries, newest first.
    pub async fn recent(&self, user_id: Uuid, limit: i64) -> GymResult<Vec<ProgressEntry>> {
        let query = format!(
            "SELECT {} FROM progress_entries WHERE user_id = $1
             ORDER BY recorded_on DESC, created_at DESC LIMIT $2",
            PROGRESS_COLUMNS
        );
        let entries = sqlx::query_as::<_, ProgressEntry>(&query)
            .bind(user_id)
            .bind(limit)
            .fetch_all(&self.db)
            .await?;

        Ok(entries)
    }

    pub async fn latest(&self, user_id: Uuid) -> GymResult<Option<ProgressEntry>> {
        Ok(self.recent(user_id, 1).await?.into_iter().next())
    }
}
