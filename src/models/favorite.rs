use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Favorite {
    pub id: Uuid,
    pub user_id: Uuid,
    pub exercise_id: Option<Uuid>,
    pub routine_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct FavoriteExercise {
    pub favorite_id: Uuid,
    pub exercise_id: Uuid,
    pub external_id: String,
    pub name: String,
    pub gif_url: String,
    pub body_parts: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct FavoriteRoutine {
    pub favorite_id: Uuid,
    pub routine_id: Uuid,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

/// Outcome of a favorite toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FavoriteToggle {
    Added,
    Removed,
}
