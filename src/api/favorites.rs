use axum::{
    extract::{rejection::PathRejection, Path, State},
    response::Response,
    routing::{get, post},
    Extension, Router,
};
use serde::Serialize;

use super::page::{AppState, Notice};
use crate::auth::UserSession;
use crate::error::{GymError, GymResult};
use crate::models::{FavoriteExercise, FavoriteRoutine, FavoriteToggle};

pub fn favorite_routes(state: AppState) -> Router {
    Router::new()
        .route("/favorites", get(list_favorites))
        .route("/favorites/:exercise_id/toggle", post(toggle_favorite))
        .with_state(state)
}

#[derive(Debug, Serialize)]
struct FavoriteList {
    exercises: Vec<FavoriteExercise>,
    routines: Vec<FavoriteRoutine>,
}

#[tracing::instrument(skip_all)]
async fn list_favorites(
    State(state): State<AppState>,
    Extension(session): Extension<UserSession>,
) -> Response {
    let result: GymResult<_> = async {
        let exercises = state.favorites.exercises(session.user_id).await?;
        let routines = state.favorites.routines(session.user_id).await?;
        Ok(state.page(&session, "favorites/list", FavoriteList { exercises, routines }))
    }
    .await;

    state.respond(&session, result, session.role.dashboard_path())
}

/// Add or remove a catalog exercise from the caller's favorites.
#[tracing::instrument(skip_all)]
async fn toggle_favorite(
    State(state): State<AppState>,
    Extension(session): Extension<UserSession>,
    exercise_id: Result<Path<String>, PathRejection>,
) -> Response {
    let exercise_id = match exercise_id {
        Ok(Path(id)) => id,
        Err(rejection) => return state.unknown_path(&session, &rejection, "/exercises"),
    };
    let detail = format!("/exercises/{}", exercise_id);

    let result: GymResult<_> = async {
        let catalog = state
            .catalog
            .get_by_id(&exercise_id)
            .await
            .ok_or_else(|| GymError::not_found("Ejercicio no encontrado."))?;
        let exercise = state.exercises.materialize(&catalog).await?;

        let notice = match state
            .favorites
            .toggle_exercise(session.user_id, exercise.id)
            .await?
        {
            FavoriteToggle::Added => Notice::success(format!("{} añadido a favoritos.", exercise.name)),
            FavoriteToggle::Removed => Notice::info(format!("{} eliminado de favoritos.", exercise.name)),
        };
        Ok(state.redirect(&session, detail.as_str(), notice))
    }
    .await;

    state.respond(&session, result, "/exercises")
}
