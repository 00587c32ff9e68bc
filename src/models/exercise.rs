use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::UnknownVariant;
use crate::catalog::CatalogExercise;

static YOUTUBE_ID: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?:youtube\.com/(?:watch\?(?:.*&)?v=|embed/|shorts/)|youtu\.be/)([A-Za-z0-9_-]{11})")
        .expect("youtube pattern is valid")
});

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    #[default]
    Low,
    Medium,
    High,
}

impl RiskLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Low => "low",
            RiskLevel::Medium => "medium",
            RiskLevel::High => "high",
        }
    }
}

impl TryFrom<String> for RiskLevel {
    type Error = UnknownVariant;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.as_str() {
            "low" => Ok(RiskLevel::Low),
            "medium" => Ok(RiskLevel::Medium),
            "high" => Ok(RiskLevel::High),
            _ => Err(UnknownVariant {
                kind: "risk level",
                value,
            }),
        }
    }
}

/// Locally materialized catalog exercise.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Exercise {
    pub id: Uuid,
    pub external_id: String,
    pub name: String,
    pub image_url: String,
    pub gif_url: String,
    pub video_url: String,
    pub equipment: String,
    pub body_parts: String,
    pub primary_muscles: String,
    pub secondary_muscles: String,
    pub description: String,
    pub instructions: String,
    pub tips: String,
    pub variations: String,
    #[sqlx(try_from = "String")]
    pub risk_level: RiskLevel,
    pub warnings: String,
    pub created_at: DateTime<Utc>,
}

impl Exercise {
    /// Embeddable player URL when the video is hosted on YouTube.
    pub fn embed_video_url(&self) -> Option<String> {
        youtube_embed_url(&self.video_url)
    }
}

/// Row written the first time a catalog exercise is referenced.
#[derive(Debug, Clone, PartialEq)]
pub struct NewExercise {
    pub external_id: String,
    pub name: String,
    pub image_url: String,
    pub gif_url: String,
    pub video_url: String,
    pub equipment: String,
    pub body_parts: String,
    pub primary_muscles: String,
    pub secondary_muscles: String,
    pub description: String,
    pub instructions: String,
    pub tips: String,
    pub variations: String,
}

impl From<&CatalogExercise> for NewExercise {
    fn from(exercise: &CatalogExercise) -> Self {
        Self {
            external_id: exercise.id.clone(),
            name: exercise.name.clone(),
            image_url: exercise.image_url.clone(),
            gif_url: exercise.gif_url.clone(),
            video_url: exercise.video_url.clone(),
            equipment: exercise.equipment.clone(),
            body_parts: exercise.body_parts.clone(),
            primary_muscles: exercise.target_muscles.clone(),
            secondary_muscles: exercise.secondary_muscles.clone(),
            description: exercise.overview.clone(),
            instructions: exercise.instructions.join("\n"),
            tips: exercise.tips.join("\n"),
            variations: exercise.variations.join("\n"),
        }
    }
}

pub fn youtube_embed_url(url: &str) -> Option<String> {
    YOUTUBE_ID
        .captures(url)
        .and_then(|captures| captures.get(1))
        .map(|id| format!("https://www.youtube.com/embed/{}", id.as_str()))
}
