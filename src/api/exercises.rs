use std::collections::HashSet;

use axum::{
    extract::{rejection::PathRejection, Path, Query, State},
    response::Response,
    routing::get,
    Extension, Router,
};
use serde::{Deserialize, Serialize};

use super::page::AppState;
use crate::auth::UserSession;
use crate::catalog::{filter_by_zone, CatalogExercise, ExerciseCatalog, Zone};
use crate::error::{GymError, GymResult};
use crate::models::Exercise;

/// Default number of catalog items on the exercise list.
pub const LIST_SIZE: usize = 100;
/// Pool drawn from when only a zone is requested.
pub const ZONE_POOL: usize = 150;

pub fn exercise_routes(state: AppState) -> Router {
    Router::new()
        .route("/exercises", get(list_exercises))
        .route("/exercises/:id", get(exercise_detail))
        .with_state(state)
}

#[derive(Debug, Default, Deserialize)]
pub struct CatalogQuery {
    #[serde(default)]
    pub q: String,
    #[serde(default)]
    pub zona: String,
}

#[derive(Debug, Serialize)]
pub struct CatalogListing {
    pub exercises: Vec<CatalogExercise>,
    pub query: String,
    pub zone: String,
    pub zones: Vec<&'static str>,
    pub total: usize,
}

#[derive(Debug, Serialize)]
struct ExerciseList {
    #[serde(flatten)]
    listing: CatalogListing,
    favorite_ids: HashSet<String>,
}

#[derive(Debug, Serialize)]
struct ExerciseDetail {
    exercise: Exercise,
    catalog: CatalogExercise,
    embed_video_url: Option<String>,
    is_favorite: bool,
}

/// Catalog search shared by the exercise list and the add-to-routine step.
pub async fn browse_catalog(catalog: &ExerciseCatalog, query: &CatalogQuery) -> CatalogListing {
    let text = query.q.trim();
    let zone = query.zona.trim();

    let exercises = match (text.is_empty(), zone.is_empty()) {
        (false, _) => filter_by_zone(catalog.search(text).await, zone),
        (true, false) => filter_by_zone(catalog.get_all(ZONE_POOL).await, zone),
        (true, true) => catalog.get_all(LIST_SIZE).await,
    };

    CatalogListing {
        total: exercises.len(),
        exercises,
        query: text.to_string(),
        zone: zone.to_string(),
        zones: Zone::ALL.iter().map(|z| z.label()).collect(),
    }
}

#[tracing::instrument(skip_all)]
async fn list_exercises(
    State(state): State<AppState>,
    Extension(session): Extension<UserSession>,
    Query(query): Query<CatalogQuery>,
) -> Response {
    let listing = browse_catalog(&state.catalog, &query).await;

    let result = state
        .exercises
        .favorite_external_ids(session.user_id)
        .await
        .map(|favorite_ids| {
            state.page(
                &session,
                "exercises/list",
                ExerciseList {
                    listing,
                    favorite_ids,
                },
            )
        });
    state.respond(&session, result, "/dashboard")
}

#[tracing::instrument(skip_all)]
async fn exercise_detail(
    State(state): State<AppState>,
    Extension(session): Extension<UserSession>,
    id: Result<Path<String>, PathRejection>,
) -> Response {
    let id = match id {
        Ok(Path(id)) => id,
        Err(rejection) => return state.unknown_path(&session, &rejection, "/exercises"),
    };

    let result: GymResult<_> = async {
        let catalog = state
            .catalog
            .get_by_id(&id)
            .await
            .ok_or_else(|| GymError::not_found("Ejercicio no encontrado."))?;

        let exercise = state.exercises.materialize(&catalog).await?;
        let is_favorite = state
            .favorites
            .is_exercise_favorite(session.user_id, exercise.id)
            .await?;

        Ok(state.page(
            &session,
            "exercises/detail",
            ExerciseDetail {
                embed_video_url: exercise.embed_video_url(),
                exercise,
                catalog,
                is_favorite,
            },
        ))
    }
    .await;

    state.respond(&session, result, "/exercises")
}
