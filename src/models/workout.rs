use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

use super::{checkbox, empty_as_none};

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct WorkoutLog {
    pub id: Uuid,
    pub user_id: Uuid,
    pub routine_id: Uuid,
    pub logged_at: DateTime<Utc>,
    pub duration_min: Option<i32>,
    pub calories: Option<i32>,
    pub effort: i16,
    pub notes: String,
    pub completed: bool,
}

/// Workout history row with the routine name.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct WorkoutWithRoutine {
    pub id: Uuid,
    pub routine_id: Uuid,
    pub routine_name: String,
    pub logged_at: DateTime<Utc>,
    pub duration_min: Option<i32>,
    pub effort: i16,
    pub completed: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct WorkoutForm {
    #[serde(default, deserialize_with = "empty_as_none")]
    #[validate(range(min = 1, message = "La duración debe ser de al menos 1 minuto."))]
    pub duration_min: Option<i32>,

    #[serde(default, deserialize_with = "empty_as_none")]
    #[validate(range(min = 0, message = "Las calorías no pueden ser negativas."))]
    pub calories: Option<i32>,

    #[serde(default = "default_effort")]
    #[validate(range(min = 1, max = 10, message = "El nivel de esfuerzo debe estar entre 1 y 10."))]
    pub effort: i16,

    #[serde(default)]
    pub notes: String,

    #[serde(default = "default_completed", deserialize_with = "checkbox")]
    pub completed: bool,
}

fn default_effort() -> i16 {
    5
}

fn default_completed() -> bool {
    true
}

impl Default for WorkoutForm {
    fn default() -> Self {
        Self {
            duration_min: None,
            calories: None,
            effort: default_effort(),
            notes: String::new(),
            completed: default_completed(),
        }
    }
}

impl WorkoutForm {
    /// Form prefilled with the routine's planned duration.
    pub fn for_duration(duration_min: i32) -> Self {
        Self {
            duration_min: Some(duration_min),
            ..Self::default()
        }
    }
}
