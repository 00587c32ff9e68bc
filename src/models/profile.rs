use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

use super::{checkbox, empty_as_none, UnknownVariant};
use crate::auth::Role;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ExperienceLevel {
    #[default]
    Beginner,
    Intermediate,
    Advanced,
}

impl ExperienceLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExperienceLevel::Beginner => "beginner",
            ExperienceLevel::Intermediate => "intermediate",
            ExperienceLevel::Advanced => "advanced",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ExperienceLevel::Beginner => "Principiante",
            ExperienceLevel::Intermediate => "Intermedio",
            ExperienceLevel::Advanced => "Avanzado",
        }
    }
}

impl TryFrom<String> for ExperienceLevel {
    type Error = UnknownVariant;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.as_str() {
            "beginner" => Ok(ExperienceLevel::Beginner),
            "intermediate" => Ok(ExperienceLevel::Intermediate),
            "advanced" => Ok(ExperienceLevel::Advanced),
            _ => Err(UnknownVariant {
                kind: "experience level",
                value,
            }),
        }
    }
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Profile {
    pub id: Uuid,
    pub user_id: Uuid,
    #[sqlx(try_from = "String")]
    pub role: Role,
    pub photo_url: String,
    pub phone: String,
    pub birth_date: Option<NaiveDate>,
    pub height_cm: Option<f64>,
    pub weight_kg: Option<f64>,
    #[sqlx(try_from = "String")]
    pub experience_level: ExperienceLevel,
    pub goal: String,
    pub certification: String,
    pub specialty: String,
    pub years_experience: Option<i32>,
    pub bio: String,
    pub schedule: String,
    pub available: bool,
    pub client_capacity: i32,
    pub is_active: bool,
    pub registered_at: DateTime<Utc>,
}

/// Trainer directory card: trainer profile plus account name.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct TrainerCard {
    pub profile_id: Uuid,
    pub user_id: Uuid,
    pub username: String,
    pub photo_url: String,
    pub certification: String,
    pub specialty: String,
    pub years_experience: Option<i32>,
    pub bio: String,
    pub schedule: String,
    pub available: bool,
    pub client_capacity: i32,
}

/// Own-profile edit form. Trainer fields are ignored for other roles.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct ProfileForm {
    #[serde(default)]
    #[validate(length(max = 500, message = "La URL de la foto es demasiado larga."))]
    pub photo_url: String,

    #[serde(default)]
    #[validate(length(max = 20, message = "El teléfono admite como máximo 20 caracteres."))]
    pub phone: String,

    #[serde(default, deserialize_with = "empty_as_none")]
    pub birth_date: Option<NaiveDate>,

    #[serde(default, deserialize_with = "empty_as_none")]
    #[validate(range(min = 50.0, max = 260.0, message = "La altura debe estar entre 50 y 260 cm."))]
    pub height_cm: Option<f64>,

    #[serde(default, deserialize_with = "empty_as_none")]
    #[validate(range(min = 20.0, max = 400.0, message = "El peso debe estar entre 20 y 400 kg."))]
    pub weight_kg: Option<f64>,

    #[serde(default)]
    pub experience_level: ExperienceLevel,

    #[serde(default)]
    pub goal: String,

    #[serde(default)]
    #[validate(length(max = 200))]
    pub certification: String,

    #[serde(default)]
    #[validate(length(max = 200))]
    pub specialty: String,

    #[serde(default, deserialize_with = "empty_as_none")]
    #[validate(range(min = 0, max = 70, message = "Años de experiencia no válidos."))]
    pub years_experience: Option<i32>,

    #[serde(default)]
    pub bio: String,

    #[serde(default)]
    pub schedule: String,

    #[serde(default, deserialize_with = "checkbox")]
    pub available: bool,
}

impl ProfileForm {
    pub fn from_profile(profile: &Profile) -> Self {
        Self {
            photo_url: profile.photo_url.clone(),
            phone: profile.phone.clone(),
            birth_date: profile.birth_date,
            height_cm: profile.height_cm,
            weight_kg: profile.weight_kg,
            experience_level: profile.experience_level,
            goal: profile.goal.clone(),
            certification: profile.certification.clone(),
            specialty: profile.specialty.clone(),
            years_experience: profile.years_experience,
            bio: profile.bio.clone(),
            schedule: profile.schedule.clone(),
            available: profile.available,
        }
    }
}
