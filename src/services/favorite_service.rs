use sqlx::PgPool;
use uuid::Uuid;

use crate::error::GymResult;
use crate::models::{FavoriteExercise, FavoriteRoutine, FavoriteToggle};

#[derive(Clone)]
pub struct FavoriteService {
    db: PgPool,
}

impl FavoriteService {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Remove the (user, exercise) favorite if present, otherwise create it.
    pub async fn toggle_exercise(&self, user_id: Uuid, exercise_id: Uuid) -> GymResult<FavoriteToggle> {
        let removed = sqlx::query("DELETE FROM favorites WHERE user_id = $1 AND exercise_id = $2")
            .bind(user_id)
            .bind(exercise_id)
            .execute(&self.db)
            .await?
            .rows_affected();

        if removed > 0 {
            return Ok(FavoriteToggle::Removed);
        }

        sqlx::query(
            "INSERT INTO favorites (id, user_id, exercise_id) VALUES ($1, $2, $3)
             ON CONFLICT DO NOTHING",
        )
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(exercise_id)
        .execute(&self.db)
        .await?;

        Ok(FavoriteToggle::Added)
    }

    pub async fn is_exercise_favorite(&self, user_id: Uuid, exercise_id: Uuid) -> GymResult<bool> {
        let found: Option<i32> =
            sqlx::query_scalar("SELECT 1 FROM favorites WHERE user_id = $1 AND exercise_id = $2")
                .bind(user_id)
                .bind(exercise_id)
                .fetch_optional(&self.db)
                .await?;
        Ok(found.is_some())
    }

    pub async fn exercises(&self, user_id: Uuid) -> GymResult<Vec<FavoriteExercise>> {
        let favorites = sqlx::query_as::<_, FavoriteExercise>(
            "SELECT f.id AS favorite_id, e.id AS exercise_id, e.external_id, e.name, e.gif_url,
                    e.body_parts, f.created_at
             FROM favorites f
             JOIN exercises e ON e.id = f.exercise_id
             WHERE f.user_id = $1
             ORDER BY f.created_at DESC",
        )
        .bind(user_id)
        .fetch_all(&self.db)
        .await?;

        Ok(favorites)
    }

    pub async fn routines(&self, user_id: Uuid) -> GymResult<Vec<FavoriteRoutine>> {
        let favorites = sqlx::query_as::<_, FavoriteRoutine>(
            "SELECT f.id AS favorite_id, r.id AS routine_id, r.name, f.created_at
             FROM favorites f
             JOIN routines r ON r.id = f.routine_id
             WHERE f.user_id = $1
             ORDER BY f.created_at DESC",
        )
        .bind(user_id)
        .fetch_all(&self.db)
        .await?;

        Ok(favorites)
    }

    pub async fn count_for_user(&self, user_id: Uuid) -> GymResult<i64> {
        let count = sqlx::query_scalar("SELECT COUNT(*) FROM favorites WHERE user_id = $1")
            .bind(user_id)
            .fetch_one(&self.db)
            .await?;
        Ok(count)
    }
}
