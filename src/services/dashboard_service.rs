use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::error::GymResult;
use crate::models::{ProgressEntry, Routine, UserSummary, WorkoutWithRoutine};
use crate::services::routine_service::ROUTINE_COLUMNS;
use crate::services::{
    AssignedRoutine, AssignmentService, FavoriteService, ProgressService, RoutineService,
    WorkoutService,
};

const RECENT: i64 = 5;

#[derive(Debug, Serialize)]
pub struct UserDashboard {
    pub routine_count: i64,
    pub workout_count: i64,
    pub favorite_count: i64,
    pub recent_routines: Vec<Routine>,
    pub recent_workouts: Vec<WorkoutWithRoutine>,
    pub latest_progress: Option<ProgressEntry>,
}

#[derive(Debug, Serialize)]
pub struct ClientName {
    pub id: Uuid,
    pub username: String,
}

#[derive(Debug, Serialize)]
pub struct TrainerDashboard {
    pub created_count: i64,
    pub assigned_count: i64,
    pub client_count: i64,
    pub recent_routines: Vec<Routine>,
    pub recent_assignments: Vec<AssignedRoutine>,
    pub clients: Vec<ClientName>,
}

#[derive(Debug, Serialize, FromRow)]
pub struct RoutineUsage {
    pub id: Uuid,
    pub name: String,
    pub workout_count: i64,
}

#[derive(Debug, Serialize, FromRow)]
pub struct TrainerActivity {
    pub user_id: Uuid,
    pub username: String,
    pub assigned_count: i64,
}

#[derive(Debug, Serialize)]
pub struct AdminDashboard {
    pub user_count: i64,
    pub trainer_count: i64,
    pub routine_count: i64,
    pub exercise_count: i64,
    pub workout_count: i64,
    pub newest_users: Vec<UserSummary>,
    pub most_logged_routines: Vec<RoutineUsage>,
    pub busiest_trainers: Vec<TrainerActivity>,
    pub generated_at: DateTime<Utc>,
}

#[derive(Clone)]
pub struct DashboardService {
    db: PgPool,
}

impl DashboardService {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    pub async fn user_dashboard(&self, user_id: Uuid) -> GymResult<UserDashboard> {
        let routines = RoutineService::new(self.db.clone());
        let workouts = WorkoutService::new(self.db.clone());

        Ok(UserDashboard {
            routine_count: routines.count_for_user(user_id).await?,
            workout_count: workouts.count_for_user(user_id).await?,
            favorite_count: FavoriteService::new(self.db.clone()).count_for_user(user_id).await?,
            recent_routines: routines.recent_active(user_id, RECENT).await?,
            recent_workouts: workouts.recent(user_id, RECENT).await?,
            latest_progress: ProgressService::new(self.db.clone()).latest(user_id).await?,
        })
    }

    pub async fn trainer_dashboard(&self, trainer_id: Uuid) -> GymResult<TrainerDashboard> {
        let created_count = RoutineService::new(self.db.clone())
            .count_for_user(trainer_id)
            .await?;

        let assigned_count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM routines WHERE trainer_id = $1 AND user_id <> $1",
        )
        .bind(trainer_id)
        .fetch_one(&self.db)
        .await?;

        let client_count: i64 = sqlx::query_scalar(
            "SELECT COUNT(DISTINCT user_id) FROM routines WHERE trainer_id = $1 AND user_id <> $1",
        )
        .bind(trainer_id)
        .fetch_one(&self.db)
        .await?;

        let query = format!(
            "SELECT {} FROM routines WHERE user_id = $1 ORDER BY created_at DESC LIMIT $2",
            ROUTINE_COLUMNS
        );
        let recent_routines = sqlx::query_as::<_, Routine>(&query)
            .bind(trainer_id)
            .bind(RECENT)
            .fetch_all(&self.db)
            .await?;

        let recent_assignments = AssignmentService::new(self.db.clone())
            .assigned_by(trainer_id, Some(RECENT))
            .await?;

        let clients = sqlx::query_as::<_, (Uuid, String)>(
            "SELECT DISTINCT u.id, u.username
             FROM routines r
             JOIN users u ON u.id = r.user_id
             WHERE r.trainer_id = $1 AND r.user_id <> $1
             ORDER BY u.username
             LIMIT $2",
        )
        .bind(trainer_id)
        .bind(RECENT)
        .fetch_all(&self.db)
        .await?
        .into_iter()
        .map(|(id, username)| ClientName { id, username })
        .collect();

        Ok(TrainerDashboard {
            created_count,
            assigned_count,
            client_count,
            recent_routines,
            recent_assignments,
            clients,
        })
    }

    pub async fn admin_dashboard(&self) -> GymResult<AdminDashboard> {
        let (user_count, trainer_count): (i64, i64) = sqlx::query_as(
            "SELECT COUNT(*) FILTER (WHERE role = 'user'), COUNT(*) FILTER (WHERE role = 'trainer')
             FROM profiles",
        )
        .fetch_one(&self.db)
        .await?;

        let routine_count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM routines")
            .fetch_one(&self.db)
            .await?;
        let exercise_count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM exercises")
            .fetch_one(&self.db)
            .await?;
        let workout_count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM workout_logs")
            .fetch_one(&self.db)
            .await?;

        let newest_users = sqlx::query_as::<_, UserSummary>(
            "SELECT u.id, u.username, u.email, COALESCE(p.role, 'user') AS role, u.created_at
             FROM users u
             LEFT JOIN profiles p ON p.user_id = u.id
             ORDER BY u.created_at DESC
             LIMIT $1",
        )
        .bind(RECENT)
        .fetch_all(&self.db)
        .await?;

        let most_logged_routines = sqlx::query_as::<_, RoutineUsage>(
            "SELECT r.id, r.name, COUNT(w.id) AS workout_count
             FROM routines r
             JOIN workout_logs w ON w.routine_id = r.id
             GROUP BY r.id, r.name
             ORDER BY workout_count DESC, r.name
             LIMIT $1",
        )
        .bind(RECENT)
        .fetch_all(&self.db)
        .await?;

        let busiest_trainers = sqlx::query_as::<_, TrainerActivity>(
            "SELECT u.id AS user_id, u.username, COUNT(r.id) AS assigned_count
             FROM profiles p
             JOIN users u ON u.id = p.user_id
             LEFT JOIN routines r ON r.trainer_id = u.id AND r.user_id <> u.id
             WHERE p.role = 'trainer'
             GROUP BY u.id, u.username
             ORDER BY assigned_count DESC, u.username
             LIMIT $1",
        )
        .bind(RECENT)
        .fetch_all(&self.db)
        .await?;

        Ok(AdminDashboard {
            user_count,
            trainer_count,
            routine_count,
            exercise_count,
            workout_count,
            newest_users,
            most_logged_routines,
            busiest_trainers,
            generated_at: Utc::now(),
        })
    }
}
