use std::collections::HashSet;

use sqlx::PgPool;
use uuid::Uuid;

use crate::catalog::CatalogExercise;
use crate::error::{GymError, GymResult};
use crate::models::{Exercise, NewExercise};

const EXERCISE_COLUMNS: &str = "id, external_id, name, image_url, gif_url, video_url, equipment, \
     body_parts, primary_muscles, secondary_muscles, description, instructions, tips, variations, \
     risk_level, warnings, created_at";

#[derive(Clone)]
pub struct ExerciseService {
    db: PgPool,
}

impl ExerciseService {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Local row for a catalog exercise, inserted on first reference.
    ///
    /// Existing rows are returned as they are; catalog changes never overwrite them.
    /// The no-op update makes a concurrent first reference wait for and return the
    /// row the other transaction inserted.
    pub async fn materialize(&self, catalog: &CatalogExercise) -> GymResult<Exercise> {
        let new = NewExercise::from(catalog);

        let query = format!(
            "INSERT INTO exercises (
                 external_id, name, image_url, gif_url, video_url, equipment, body_parts,
                 primary_muscles, secondary_muscles, description, instructions, tips, variations
             )
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
             ON CONFLICT (external_id) DO UPDATE SET external_id = EXCLUDED.external_id
             RETURNING {cols}",
            cols = EXERCISE_COLUMNS
        );

        let exercise = sqlx::query_as::<_, Exercise>(&query)
            .bind(&new.external_id)
            .bind(&new.name)
            .bind(&new.image_url)
            .bind(&new.gif_url)
            .bind(&new.video_url)
            .bind(&new.equipment)
            .bind(&new.body_parts)
            .bind(&new.primary_muscles)
            .bind(&new.secondary_muscles)
            .bind(&new.description)
            .bind(&new.instructions)
            .bind(&new.tips)
            .bind(&new.variations)
            .fetch_one(&self.db)
            .await?;

        Ok(exercise)
    }

    pub async fn get(&self, exercise_id: Uuid) -> GymResult<Exercise> {
        let query = format!("SELECT {} FROM exercises WHERE id = $1", EXERCISE_COLUMNS);
        sqlx::query_as::<_, Exercise>(&query)
            .bind(exercise_id)
            .fetch_optional(&self.db)
            .await?
            .ok_or_else(|| GymError::not_found("Ejercicio no encontrado."))
    }

    pub async fn get_by_external_id(&self, external_id: &str) -> GymResult<Option<Exercise>> {
        let query = format!("SELECT {} FROM exercises WHERE external_id = $1", EXERCISE_COLUMNS);
        let exercise = sqlx::query_as::<_, Exercise>(&query)
            .bind(external_id)
            .fetch_optional(&self.db)
            .await?;

        Ok(exercise)
    }

    /// Catalog ids of the exercises the user has marked as favorite.
    pub async fn favorite_external_ids(&self, user_id: Uuid) -> GymResult<HashSet<String>> {
        let ids: Vec<String> = sqlx::query_scalar(
            "SELECT e.external_id FROM favorites f
             JOIN exercises e ON e.id = f.exercise_id
             WHERE f.user_id = $1",
        )
        .bind(user_id)
        .fetch_all(&self.db)
        .await?;

        Ok(ids.into_iter().collect())
    }

    pub async fn count(&self) -> GymResult<i64> {
        let count = sqlx::query_scalar("SELECT COUNT(*) FROM exercises")
            .fetch_one(&self.db)
            .await?;
        Ok(count)
    }
}
