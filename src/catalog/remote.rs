use reqwest::{header, Client, StatusCode};
use serde::Deserialize;
use tracing::{debug, warn};

use super::translation::translate;
use super::{CatalogError, CatalogExercise};
use crate::config::CatalogConfig;

const USER_AGENT: &str = "GymFlow/1.0";
const MAX_PAGE_SIZE: usize = 500;

/// HTTP client for the remote exercise catalog.
///
/// Listing and single-item requests share one base endpoint.
#[derive(Debug, Clone)]
pub struct RemoteCatalog {
    client: Client,
    base_url: String,
    media_url: String,
    api_key: Option<String>,
    list_timeout: std::time::Duration,
    item_timeout: std::time::Duration,
}

/// Exercise record as served by the remote catalog.
#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RemoteExercise {
    pub exercise_id: String,
    pub name: String,
    pub image_url: String,
    pub gif_url: String,
    pub video_url: String,
    pub equipments: Vec<String>,
    pub body_parts: Vec<String>,
    pub target_muscles: Vec<String>,
    pub secondary_muscles: Vec<String>,
    pub overview: String,
    pub instructions: Vec<String>,
    pub exercise_tips: Vec<String>,
    pub variations: Vec<String>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ListingPayload {
    Wrapped { data: Vec<serde_json::Value> },
    Bare(Vec<serde_json::Value>),
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ItemPayload {
    Wrapped { data: RemoteExercise },
    Bare(RemoteExercise),
}

impl RemoteCatalog {
    pub fn new(config: &CatalogConfig) -> Result<Self, CatalogError> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(config.list_timeout)
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            media_url: config.media_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            list_timeout: config.list_timeout,
            item_timeout: config.item_timeout,
        })
    }

    /// Fetch up to `limit` exercises, already mapped to local fields.
    pub async fn fetch_all(&self, limit: usize) -> Result<Vec<CatalogExercise>, CatalogError> {
        let url = format!("{}/exercises", self.base_url);
        let page_size = limit.min(MAX_PAGE_SIZE);

        let response = self
            .request(&url)
            .query(&[("limit", page_size)])
            .timeout(self.list_timeout)
            .send()
            .await?;

        let status = response.status();
        debug!("Remote catalog listing answered {}", status);
        if !status.is_success() {
            return Err(CatalogError::Status(status));
        }

        let body = response.text().await?;
        let payload: ListingPayload = serde_json::from_str(&body)
            .map_err(|e| CatalogError::Malformed(e.to_string()))?;
        let items = match payload {
            ListingPayload::Wrapped { data } => data,
            ListingPayload::Bare(data) => data,
        };

        let exercises = items
            .into_iter()
            .filter_map(|item| {
                if !item.is_object() {
                    warn!("Skipping non-object catalog item");
                    return None;
                }
                match serde_json::from_value::<RemoteExercise>(item) {
                    Ok(remote) => Some(remote.into_catalog(&self.media_url)),
                    Err(e) => {
                        warn!("Skipping unreadable catalog item: {}", e);
                        None
                    }
                }
            })
            .collect();

        Ok(exercises)
    }

    /// Fetch one exercise; a 404 is reported as `Ok(None)`.
    pub async fn fetch_one(&self, id: &str) -> Result<Option<CatalogExercise>, CatalogError> {
        let url = format!("{}/exercises/{}", self.base_url, id);

        let response = self
            .request(&url)
            .timeout(self.item_timeout)
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !status.is_success() {
            return Err(CatalogError::Status(status));
        }

        let body = response.text().await?;
        let remote = match serde_json::from_str::<ItemPayload>(&body)
            .map_err(|e| CatalogError::Malformed(e.to_string()))?
        {
            ItemPayload::Wrapped { data } => data,
            ItemPayload::Bare(data) => data,
        };

        if remote.exercise_id.is_empty() {
            return Err(CatalogError::Malformed("exercise without id".to_string()));
        }

        Ok(Some(remote.into_catalog(&self.media_url)))
    }

    fn request(&self, url: &str) -> reqwest::RequestBuilder {
        let builder = self
            .client
            .get(url)
            .header(header::ACCEPT, "application/json");

        match &self.api_key {
            Some(key) => builder.header("X-Api-Key", key),
            None => builder,
        }
    }
}

impl RemoteExercise {
    pub fn into_catalog(self, media_url: &str) -> CatalogExercise {
        let image_url = complete_media_url(media_url, &self.image_url);
        let gif_url = if self.gif_url.is_empty() {
            image_url.clone()
        } else {
            complete_media_url(media_url, &self.gif_url)
        };
        let video_url = complete_media_url(media_url, &self.video_url);

        CatalogExercise {
            id: self.exercise_id,
            name: translate(&self.name),
            image_url,
            gif_url,
            video_url,
            equipment: translate(&join_or(&self.equipments, "N/A")),
            body_parts: translate(&join_or(&self.body_parts, "N/A")),
            target_muscles: translate(&join_or(&self.target_muscles, "N/A")),
            secondary_muscles: translate(&self.secondary_muscles.join(", ")),
            // Long-form prose stays in the source language
            overview: self.overview,
            instructions: self.instructions,
            tips: self.exercise_tips,
            variations: self.variations,
        }
    }
}

fn join_or(values: &[String], empty: &str) -> String {
    if values.is_empty() {
        empty.to_string()
    } else {
        values.join(", ")
    }
}

/// Media may be served as bare file names relative to the catalog's media root.
fn complete_media_url(media_url: &str, value: &str) -> String {
    if value.is_empty() || value.starts_with("http://") || value.starts_with("https://") {
        value.to_string()
    } else {
        format!("{}/{}", media_url, value.trim_start_matches('/'))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_remote_record_mapping() {
        let remote: RemoteExercise = serde_json::from_value(serde_json::json!({
            "exerciseId": "ex-1",
            "name": "barbell bench press",
            "imageUrl": "bench.png",
            "equipments": ["barbell"],
            "bodyParts": ["chest"],
            "targetMuscles": ["pectorals"],
            "secondaryMuscles": [],
            "overview": "Classic press",
            "instructions": ["Lie down", "Press"],
            "exerciseTips": ["Keep feet planted"]
        }))
        .unwrap();

        let exercise = remote.into_catalog("https://media.example.com");

        assert_eq!(exercise.id, "ex-1");
        assert_eq!(exercise.name, "Press de Banca con Barra");
        assert_eq!(exercise.image_url, "https://media.example.com/bench.png");
        assert_eq!(exercise.gif_url, exercise.image_url);
        assert_eq!(exercise.equipment, "Barra");
        assert_eq!(exercise.body_parts, "Pecho");
        assert_eq!(exercise.target_muscles, "pectorals");
        assert_eq!(exercise.secondary_muscles, "");
        assert_eq!(exercise.tips, vec!["Keep feet planted"]);
    }

    #[test]
    fn test_missing_lists_become_placeholders() {
        let exercise = RemoteExercise {
            exercise_id: "ex-2".to_string(),
            name: "olympic snatch".to_string(),
            ..RemoteExercise::default()
        }
        .into_catalog("https://media.example.com");

        assert_eq!(exercise.equipment, "N/A");
        assert_eq!(exercise.body_parts, "N/A");
        assert_eq!(exercise.name, "olympic snatch");
    }

    #[test]
    fn test_absolute_media_urls_are_kept() {
        assert_eq!(
            complete_media_url("https://cdn", "https://other/x.gif"),
            "https://other/x.gif"
        );
        assert_eq!(complete_media_url("https://cdn", "/x.gif"), "https://cdn/x.gif");
        assert_eq!(complete_media_url("https://cdn", ""), "");
    }
}
