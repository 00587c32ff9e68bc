use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

use super::empty_as_none;

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct ProgressEntry {
    pub id: Uuid,
    pub user_id: Uuid,
    pub recorded_on: NaiveDate,
    pub weight_kg: f64,
    pub body_fat_pct: Option<f64>,
    pub muscle_mass_kg: Option<f64>,
    pub waist_cm: Option<f64>,
    pub chest_cm: Option<f64>,
    pub arms_cm: Option<f64>,
    pub legs_cm: Option<f64>,
    pub photo_url: String,
    pub notes: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct ProgressForm {
    #[serde(default, deserialize_with = "empty_as_none")]
    pub recorded_on: Option<NaiveDate>,

    #[serde(default, deserialize_with = "empty_as_none")]
    #[validate(
        required(message = "El peso es obligatorio."),
        range(exclusive_min = 0.0, message = "El peso debe ser mayor que 0.")
    )]
    pub weight_kg: Option<f64>,

    #[serde(default, deserialize_with = "empty_as_none")]
    #[validate(range(min = 0.0, max = 100.0, message = "El porcentaje de grasa debe estar entre 0 y 100."))]
    pub body_fat_pct: Option<f64>,

    #[serde(default, deserialize_with = "empty_as_none")]
    #[validate(range(min = 0.0, message = "La masa muscular no puede ser negativa."))]
    pub muscle_mass_kg: Option<f64>,

    #[serde(default, deserialize_with = "empty_as_none")]
    #[validate(range(min = 0.0, message = "La medida no puede ser negativa."))]
    pub waist_cm: Option<f64>,

    #[serde(default, deserialize_with = "empty_as_none")]
    #[validate(range(min = 0.0, message = "La medida no puede ser negativa."))]
    pub chest_cm: Option<f64>,

    #[serde(default, deserialize_with = "empty_as_none")]
    #[validate(range(min = 0.0, message = "La medida no puede ser negativa."))]
    pub arms_cm: Option<f64>,

    #[serde(default, deserialize_with = "empty_as_none")]
    #[validate(range(min = 0.0, message = "La medida no puede ser negativa."))]
    pub legs_cm: Option<f64>,

    #[serde(default)]
    #[validate(length(max = 500))]
    pub photo_url: String,

    #[serde(default)]
    pub notes: String,
}
