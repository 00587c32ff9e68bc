use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

use super::{checkbox, empty_as_none, UnknownVariant};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    #[default]
    Intermediate,
    Hard,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Intermediate => "intermediate",
            Difficulty::Hard => "hard",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Difficulty::Easy => "Fácil",
            Difficulty::Intermediate => "Intermedio",
            Difficulty::Hard => "Difícil",
        }
    }
}

impl TryFrom<String> for Difficulty {
    type Error = UnknownVariant;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.as_str() {
            "easy" => Ok(Difficulty::Easy),
            "intermediate" => Ok(Difficulty::Intermediate),
            "hard" => Ok(Difficulty::Hard),
            _ => Err(UnknownVariant {
                kind: "difficulty",
                value,
            }),
        }
    }
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Routine {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub user_id: Uuid,
    pub trainer_id: Option<Uuid>,
    #[sqlx(try_from = "String")]
    pub difficulty: Difficulty,
    pub duration_min: i32,
    pub goal: String,
    pub is_public: bool,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Routine list row with its number of entries.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct RoutineSummary {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub routine: Routine,
    pub entry_count: i64,
}

/// Which routines the list shows.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum RoutineFilter {
    #[default]
    All,
    Active,
    Inactive,
}

impl RoutineFilter {
    pub fn parse(value: Option<&str>) -> Self {
        match value.map(str::trim) {
            Some("active") => RoutineFilter::Active,
            Some("inactive") => RoutineFilter::Inactive,
            _ => RoutineFilter::All,
        }
    }

    /// Required value of `is_active`, if any.
    pub fn active_flag(&self) -> Option<bool> {
        match self {
            RoutineFilter::All => None,
            RoutineFilter::Active => Some(true),
            RoutineFilter::Inactive => Some(false),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RoutineForm {
    #[serde(default)]
    #[validate(length(min = 1, max = 200, message = "El nombre es obligatorio (máximo 200 caracteres)."))]
    pub name: String,

    #[serde(default)]
    pub description: String,

    #[serde(default)]
    pub difficulty: Difficulty,

    #[serde(default = "default_duration")]
    #[validate(range(min = 1, message = "La duración debe ser de al menos 1 minuto."))]
    pub duration_min: i32,

    #[serde(default)]
    pub goal: String,

    #[serde(default, deserialize_with = "checkbox")]
    pub is_public: bool,

    #[serde(default, deserialize_with = "checkbox")]
    pub is_active: bool,
}

fn default_duration() -> i32 {
    60
}

impl Default for RoutineForm {
    fn default() -> Self {
        Self {
            name: String::new(),
            description: String::new(),
            difficulty: Difficulty::default(),
            duration_min: default_duration(),
            goal: String::new(),
            is_public: false,
            is_active: true,
        }
    }
}

impl RoutineForm {
    pub fn from_routine(routine: &Routine) -> Self {
        Self {
            name: routine.name.clone(),
            description: routine.description.clone(),
            difficulty: routine.difficulty,
            duration_min: routine.duration_min,
            goal: routine.goal.clone(),
            is_public: routine.is_public,
            is_active: routine.is_active,
        }
    }
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct RoutineEntry {
    pub id: Uuid,
    pub routine_id: Uuid,
    pub exercise_id: Uuid,
    pub position: i32,
    pub sets: i32,
    pub reps: i32,
    pub weight_kg: Option<f64>,
    pub rest_seconds: i32,
    pub notes: String,
}

/// Entry joined with the exercise it places.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct EntryWithExercise {
    pub id: Uuid,
    pub position: i32,
    pub sets: i32,
    pub reps: i32,
    pub weight_kg: Option<f64>,
    pub rest_seconds: i32,
    pub notes: String,
    pub exercise_id: Uuid,
    pub external_id: String,
    pub exercise_name: String,
    pub gif_url: String,
    pub body_parts: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct EntryForm {
    #[serde(default = "default_position")]
    #[validate(range(min = 1, message = "El orden debe ser 1 o mayor."))]
    pub position: i32,

    #[serde(default = "default_sets")]
    #[validate(range(min = 1, message = "Debe haber al menos 1 serie."))]
    pub sets: i32,

    #[serde(default = "default_reps")]
    #[validate(range(min = 1, message = "Debe haber al menos 1 repetición."))]
    pub reps: i32,

    #[serde(default, deserialize_with = "empty_as_none")]
    #[validate(range(min = 0.0, message = "El peso no puede ser negativo."))]
    pub weight_kg: Option<f64>,

    #[serde(default = "default_rest")]
    #[validate(range(min = 0, message = "El descanso no puede ser negativo."))]
    pub rest_seconds: i32,

    #[serde(default)]
    pub notes: String,
}

fn default_position() -> i32 {
    1
}

fn default_sets() -> i32 {
    3
}

fn default_reps() -> i32 {
    10
}

fn default_rest() -> i32 {
    60
}

impl EntryForm {
    /// Blank entry form placed after the routine's current entries.
    pub fn suggested(entry_count: i64) -> Self {
        Self {
            position: i32::try_from(entry_count).unwrap_or(i32::MAX - 1) + 1,
            sets: default_sets(),
            reps: default_reps(),
            weight_kg: None,
            rest_seconds: default_rest(),
            notes: String::new(),
        }
    }
}
