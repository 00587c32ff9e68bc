use sqlx::PgPool;
use uuid::Uuid;

use crate::auth::{ensure_owner, require_routine_manager, UserSession};
use crate::error::{GymError, GymResult};
use crate::models::{
    EntryForm, EntryWithExercise, Routine, RoutineEntry, RoutineFilter, RoutineForm,
    RoutineSummary,
};

pub(crate) const ROUTINE_COLUMNS: &str = "id, name, description, user_id, trainer_id, difficulty, \
     duration_min, goal, is_public, is_active, created_at, updated_at";

#[derive(Clone)]
pub struct RoutineService {
    db: PgPool,
}

impl RoutineService {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// The user's routines with their entry counts, newest first.
    pub async fn list_for_user(
        &self,
        user_id: Uuid,
        filter: RoutineFilter,
    ) -> GymResult<Vec<RoutineSummary>> {
        let routines = sqlx::query_as::<_, RoutineSummary>(
            "SELECT r.id, r.name, r.description, r.user_id, r.trainer_id, r.difficulty,
                    r.duration_min, r.goal, r.is_public, r.is_active, r.created_at, r.updated_at,
                    COUNT(e.id) AS entry_count
             FROM routines r
             LEFT JOIN routine_entries e ON e.routine_id = r.id
             WHERE r.user_id = $1 AND ($2::BOOLEAN IS NULL OR r.is_active = $2)
             GROUP BY r.id
             ORDER BY r.created_at DESC",
        )
        .bind(user_id)
        .bind(filter.active_flag())
        .fetch_all(&self.db)
        .await?;

        Ok(routines)
    }

    pub async fn recent_active(&self, user_id: Uuid, limit: i64) -> GymResult<Vec<Routine>> {
        let query = format!(
            "SELECT {} FROM routines WHERE user_id = $1 AND is_active
             ORDER BY created_at DESC LIMIT $2",
            ROUTINE_COLUMNS
        );
        let routines = sqlx::query_as::<_, Routine>(&query)
            .bind(user_id)
            .bind(limit)
            .fetch_all(&self.db)
            .await?;

        Ok(routines)
    }

    pub async fn get(&self, routine_id: Uuid) -> GymResult<Routine> {
        let query = format!("SELECT {} FROM routines WHERE id = $1", ROUTINE_COLUMNS);
        sqlx::query_as::<_, Routine>(&query)
            .bind(routine_id)
            .fetch_optional(&self.db)
            .await?
            .ok_or_else(|| GymError::not_found("Rutina no encontrada."))
    }

    /// A routine the caller may read: their own, or a public one.
    pub async fn get_visible(&self, session: &UserSession, routine_id: Uuid) -> GymResult<Routine> {
        let routine = self.get(routine_id).await?;
        if routine.user_id == session.user_id || routine.is_public {
            Ok(routine)
        } else {
            Err(GymError::not_found("Rutina no encontrada."))
        }
    }

    /// A routine the caller owns and may change.
    pub async fn get_managed(&self, session: &UserSession, routine_id: Uuid) -> GymResult<Routine> {
        require_routine_manager(session)?;
        let routine = self.get(routine_id).await?;
        ensure_owner(session, routine.user_id)?;
        Ok(routine)
    }

    pub async fn create(&self, session: &UserSession, form: &RoutineForm) -> GymResult<Routine> {
        require_routine_manager(session)?;

        let query = format!(
            "INSERT INTO routines (id, name, description, user_id, difficulty, duration_min, goal,
                                   is_public, is_active)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
             RETURNING {}",
            ROUTINE_COLUMNS
        );

        let routine = sqlx::query_as::<_, Routine>(&query)
            .bind(Uuid::new_v4())
            .bind(form.name.trim())
            .bind(form.description.trim())
            .bind(session.user_id)
            .bind(form.difficulty.as_str())
            .bind(form.duration_min)
            .bind(form.goal.trim())
            .bind(form.is_public)
            .bind(form.is_active)
            .fetch_one(&self.db)
            .await?;

        tracing::info!("User {} created routine {}", session.username, routine.id);
        Ok(routine)
    }

    pub async fn update(
        &self,
        session: &UserSession,
        routine_id: Uuid,
        form: &RoutineForm,
    ) -> GymResult<Routine> {
        self.get_managed(session, routine_id).await?;

        let query = format!(
            "UPDATE routines SET
                 name = $2, description = $3, difficulty = $4, duration_min = $5, goal = $6,
                 is_public = $7, is_active = $8, updated_at = NOW()
             WHERE id = $1
             RETURNING {}",
            ROUTINE_COLUMNS
        );

        let routine = sqlx::query_as::<_, Routine>(&query)
            .bind(routine_id)
            .bind(form.name.trim())
            .bind(form.description.trim())
            .bind(form.difficulty.as_str())
            .bind(form.duration_min)
            .bind(form.goal.trim())
            .bind(form.is_public)
            .bind(form.is_active)
            .fetch_one(&self.db)
            .await?;

        Ok(routine)
    }

    /// Delete a routine; entries, logs and favorites go with it.
    pub async fn delete(&self, session: &UserSession, routine_id: Uuid) -> GymResult<Routine> {
        let routine = self.get_managed(session, routine_id).await?;

        sqlx::query("DELETE FROM routines WHERE id = $1")
            .bind(routine_id)
            .execute(&self.db)
            .await?;

        tracing::info!("User {} deleted routine {}", session.username, routine_id);
        Ok(routine)
    }

    /// Entries of a routine in ascending order.
    pub async fn entries(&self, routine_id: Uuid) -> GymResult<Vec<EntryWithExercise>> {
        let entries = sqlx::query_as::<_, EntryWithExercise>(
            "SELECT re.id, re.position, re.sets, re.reps, re.weight_kg, re.rest_seconds, re.notes,
                    e.id AS exercise_id, e.external_id, e.name AS exercise_name, e.gif_url,
                    e.body_parts
             FROM routine_entries re
             JOIN exercises e ON e.id = re.exercise_id
             WHERE re.routine_id = $1
             ORDER BY re.position ASC, re.id ASC",
        )
        .bind(routine_id)
        .fetch_all(&self.db)
        .await?;

        Ok(entries)
    }

    pub async fn entry_count(&self, routine_id: Uuid) -> GymResult<i64> {
        let count = sqlx::query_scalar("SELECT COUNT(*) FROM routine_entries WHERE routine_id = $1")
            .bind(routine_id)
            .fetch_one(&self.db)
            .await?;
        Ok(count)
    }

    /// Place an exercise in a routine the caller manages.
    pub async fn add_entry(
        &self,
        session: &UserSession,
        routine_id: Uuid,
        exercise_id: Uuid,
        form: &EntryForm,
    ) -> GymResult<RoutineEntry> {
        self.get_managed(session, routine_id).await?;

        let entry = sqlx::query_as::<_, RoutineEntry>(
            "INSERT INTO routine_entries (routine_id, exercise_id, position, sets, reps, weight_kg,
                                          rest_seconds, notes)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
             RETURNING id, routine_id, exercise_id, position, sets, reps, weight_kg,
                       rest_seconds, notes",
        )
        .bind(routine_id)
        .bind(exercise_id)
        .bind(form.position)
        .bind(form.sets)
        .bind(form.reps)
        .bind(form.weight_kg)
        .bind(form.rest_seconds)
        .bind(form.notes.trim())
        .fetch_one(&self.db)
        .await?;

        sqlx::query("UPDATE routines SET updated_at = NOW() WHERE id = $1")
            .bind(routine_id)
            .execute(&self.db)
            .await?;

        Ok(entry)
    }

    pub async fn count_for_user(&self, user_id: Uuid) -> GymResult<i64> {
        let count = sqlx::query_scalar("SELECT COUNT(*) FROM routines WHERE user_id = $1")
            .bind(user_id)
            .fetch_one(&self.db)
            .await?;
        Ok(count)
    }
}
