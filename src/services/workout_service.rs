use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

use crate::auth::{ensure_owner, UserSession};
use crate::error::GymResult;
use crate::models::{WorkoutForm, WorkoutLog, WorkoutWithRoutine};
use crate::services::RoutineService;

#[derive(Clone)]
pub struct WorkoutService {
    db: PgPool,
}

impl WorkoutService {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Record a completed session of one of the caller's routines.
    pub async fn log_workout(
        &self,
        session: &UserSession,
        routine_id: Uuid,
        form: &WorkoutForm,
    ) -> GymResult<WorkoutLog> {
        form.validate()?;

        let routine = RoutineService::new(self.db.clone()).get(routine_id).await?;
        ensure_owner(session, routine.user_id)?;

        let log = sqlx::query_as::<_, WorkoutLog>(
            "INSERT INTO workout_logs (id, user_id, routine_id, duration_min, calories, effort,
                                       notes, completed)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
             RETURNING id, user_id, routine_id, logged_at, duration_min, calories, effort, notes,
                       completed",
        )
        .bind(Uuid::new_v4())
        .bind(session.user_id)
        .bind(routine_id)
        .bind(form.duration_min)
        .bind(form.calories)
        .bind(form.effort)
        .bind(form.notes.trim())
        .bind(form.completed)
        .fetch_one(&self.db)
        .await?;

        Ok(log)
    }

    pub async fn recent(&self, user_id: Uuid, limit: i64) -> GymResult<Vec<WorkoutWithRoutine>> {
        let workouts = sqlx::query_as::<_, WorkoutWithRoutine>(
            "SELECT w.id, w.routine_id, r.name AS routine_name, w.logged_at, w.duration_min,
                    w.effort, w.completed
             FROM workout_logs w
             JOIN routines r ON r.id = w.routine_id
             WHERE w.user_id = $1
             ORDER BY w.logged_at DESC
             LIMIT $2",
        )
        .bind(user_id)
        .bind(limit)
        .fetch_all(&self.db)
        .await?;

        Ok(workouts)
    }

    pub async fn count_for_user(&self, user_id: Uuid) -> GymResult<i64> {
        let count = sqlx::query_scalar("SELECT COUNT(*) FROM workout_logs WHERE user_id = $1")
            .bind(user_id)
            .fetch_one(&self.db)
            .await?;
        Ok(count)
    }
}
