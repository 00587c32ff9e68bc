//! Exercise catalog provider.
//!
//! Resolves exercise metadata from the remote catalog service or from the bundled
//! fallback list. Remote failures are logged and never surfaced to callers.

pub mod cache;
pub mod fallback;
pub mod remote;
pub mod translation;
pub mod zone;

use std::time::Duration;

use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::config::{CatalogConfig, CatalogMode};

pub use cache::TtlCache;
pub use fallback::{fallback_exercises, find_fallback};
pub use remote::RemoteCatalog;
pub use translation::translate;
pub use zone::{filter_by_zone, Zone};

/// Pool size used when searching the catalog.
pub const SEARCH_POOL: usize = 500;

const CACHE_TTL: Duration = Duration::from_secs(24 * 60 * 60);

const GYM_EQUIPMENT: &[&str] = &[
    "barbell",
    "dumbbell",
    "body weight",
    "machine",
    "cable",
    "barra",
    "mancuerna",
    "peso corporal",
    "máquina",
    "polea",
];

/// Exercise record as served by the catalog, already in the display language.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CatalogExercise {
    pub id: String,
    pub name: String,
    pub image_url: String,
    pub gif_url: String,
    pub video_url: String,
    pub equipment: String,
    pub body_parts: String,
    pub target_muscles: String,
    pub secondary_muscles: String,
    pub overview: String,
    pub instructions: Vec<String>,
    pub tips: Vec<String>,
    pub variations: Vec<String>,
}

impl CatalogExercise {
    /// Case-insensitive match on name, body part, target muscle or equipment.
    pub fn matches(&self, query: &str) -> bool {
        let query = query.to_lowercase();
        [
            &self.name,
            &self.body_parts,
            &self.target_muscles,
            &self.equipment,
        ]
        .iter()
        .any(|field| field.to_lowercase().contains(&query))
    }

    fn uses_gym_equipment(&self) -> bool {
        let equipment = self.equipment.to_lowercase();
        GYM_EQUIPMENT.iter().any(|term| equipment.contains(term))
    }
}

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Catalog request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Catalog answered with status {0}")]
    Status(StatusCode),

    #[error("Malformed catalog payload: {0}")]
    Malformed(String),
}

/// Process-wide exercise catalog.
#[derive(Debug, Clone)]
pub struct ExerciseCatalog {
    remote: Option<RemoteCatalog>,
    listings: TtlCache<usize, Vec<CatalogExercise>>,
    items: TtlCache<String, CatalogExercise>,
}

impl ExerciseCatalog {
    pub fn new(config: &CatalogConfig) -> Result<Self, CatalogError> {
        let remote = match config.mode {
            CatalogMode::Remote => {
                info!("Exercise catalog using remote source {}", config.base_url);
                Some(RemoteCatalog::new(config)?)
            }
            CatalogMode::FallbackOnly => {
                info!("Exercise catalog using the bundled fallback list");
                None
            }
        };

        Ok(Self {
            remote,
            listings: TtlCache::new(CACHE_TTL),
            items: TtlCache::new(CACHE_TTL),
        })
    }

    pub fn fallback_only() -> Self {
        Self {
            remote: None,
            listings: TtlCache::new(CACHE_TTL),
            items: TtlCache::new(CACHE_TTL),
        }
    }

    pub fn is_remote(&self) -> bool {
        self.remote.is_some()
    }

    /// Up to `limit` exercises from the configured source.
    pub async fn get_all(&self, limit: usize) -> Vec<CatalogExercise> {
        let Some(remote) = &self.remote else {
            return fallback_list(limit);
        };

        if let Some(cached) = self.listings.get(&limit) {
            debug!("Catalog listing cache hit for limit {}", limit);
            return cached;
        }

        match remote.fetch_all(limit).await {
            Ok(exercises) => {
                let exercises = keep_gym_equipment(exercises, limit);
                if exercises.is_empty() {
                    // Nothing usable came back; not cached so the next call retries.
                    warn!("Remote catalog returned no gym exercises, serving fallback list");
                    return fallback_list(limit);
                }
                self.listings.insert(limit, exercises.clone());
                exercises
            }
            Err(e) => {
                warn!("Remote catalog unavailable, serving fallback list: {}", e);
                fallback_list(limit)
            }
        }
    }

    /// One exercise by catalog id. The fallback list is consulted first.
    pub async fn get_by_id(&self, id: &str) -> Option<CatalogExercise> {
        if let Some(exercise) = find_fallback(id) {
            return Some(exercise.clone());
        }

        let remote = self.remote.as_ref()?;

        if let Some(cached) = self.items.get(&id.to_string()) {
            return Some(cached);
        }

        match remote.fetch_one(id).await {
            Ok(Some(exercise)) => {
                self.items.insert(id.to_string(), exercise.clone());
                Some(exercise)
            }
            Ok(None) => None,
            Err(e) => {
                warn!("Remote catalog lookup for {} failed: {}", id, e);
                None
            }
        }
    }

    /// Every exercise in the search pool matching `query`.
    pub async fn search(&self, query: &str) -> Vec<CatalogExercise> {
        self.get_all(SEARCH_POOL)
            .await
            .into_iter()
            .filter(|exercise| exercise.matches(query))
            .collect()
    }
}

fn fallback_list(limit: usize) -> Vec<CatalogExercise> {
    fallback_exercises().iter().take(limit).cloned().collect()
}

/// Keep only common gym equipment when the listing has enough of it.
fn keep_gym_equipment(exercises: Vec<CatalogExercise>, limit: usize) -> Vec<CatalogExercise> {
    let threshold = limit.min(50);
    let gym: Vec<CatalogExercise> = exercises
        .iter()
        .filter(|exercise| exercise.uses_gym_equipment())
        .cloned()
        .collect();

    if gym.len() >= threshold {
        gym
    } else {
        exercises
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn exercise(id: &str, equipment: &str) -> CatalogExercise {
        CatalogExercise {
            id: id.to_string(),
            name: id.to_string(),
            equipment: equipment.to_string(),
            ..CatalogExercise::default()
        }
    }

    #[tokio::test]
    async fn test_fallback_mode_respects_limit() {
        let catalog = ExerciseCatalog::fallback_only();

        let exercises = catalog.get_all(50).await;
        assert!(!exercises.is_empty());
        assert!(exercises.len() <= 50);

        let few = catalog.get_all(5).await;
        assert_eq!(few.len(), 5);
        assert_eq!(few[0].id, "bench-press");
    }

    #[tokio::test]
    async fn test_search_matches_every_field() {
        let catalog = ExerciseCatalog::fallback_only();

        let by_name = catalog.search("sentadilla").await;
        assert!(!by_name.is_empty());
        assert!(by_name.iter().all(|e| e.matches("sentadilla")));

        let by_equipment = catalog.search("polea").await;
        assert!(by_equipment.iter().any(|e| e.equipment == "Polea"));

        assert!(catalog.search("zzz-no-such-exercise").await.is_empty());
    }

    #[tokio::test]
    async fn test_squat_results_contain_query() {
        let catalog = ExerciseCatalog::fallback_only();
        for exercise in catalog.search("squat").await {
            assert!(exercise.matches("squat"));
        }
    }

    #[tokio::test]
    async fn test_get_by_id_without_remote() {
        let catalog = ExerciseCatalog::fallback_only();
        assert_eq!(
            catalog.get_by_id("deadlift").await.map(|e| e.name),
            Some("Peso Muerto".to_string())
        );
        assert!(catalog.get_by_id("0001").await.is_none());
    }

    #[test]
    fn test_gym_filter_needs_enough_matches() {
        let mut listing: Vec<CatalogExercise> = (0..3)
            .map(|i| exercise(&format!("gym-{}", i), "barbell"))
            .collect();
        listing.push(exercise("band", "resistance band"));

        assert_eq!(keep_gym_equipment(listing.clone(), 3).len(), 3);
        assert_eq!(keep_gym_equipment(listing, 10).len(), 4);
    }

    proptest! {
        #[test]
        fn prop_search_results_contain_query(query in "[a-zA-Z]{1,6}") {
            let runtime = tokio::runtime::Runtime::new().unwrap();
            let results = runtime.block_on(ExerciseCatalog::fallback_only().search(&query));
            let needle = query.to_lowercase();
            for exercise in results {
                let hit = [&exercise.name, &exercise.body_parts, &exercise.target_muscles, &exercise.equipment]
                    .iter()
                    .any(|field| field.to_lowercase().contains(&needle));
                prop_assert!(hit);
            }
        }
    }
}
