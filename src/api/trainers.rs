use axum::{
    extract::{rejection::PathRejection, Path, State},
    response::Response,
    routing::get,
    Extension, Router,
};
use serde_json::json;
use uuid::Uuid;

use super::page::AppState;
use crate::auth::UserSession;

pub fn trainer_routes(state: AppState) -> Router {
    Router::new()
        .route("/trainers", get(list_trainers))
        .route("/trainers/:profile_id", get(trainer_detail))
        .with_state(state)
}

#[tracing::instrument(skip_all)]
async fn list_trainers(
    State(state): State<AppState>,
    Extension(session): Extension<UserSession>,
) -> Response {
    let result = state
        .profiles
        .list_trainers()
        .await
        .map(|trainers| state.page(&session, "trainers/list", json!({ "trainers": trainers })));
    state.respond(&session, result, session.role.dashboard_path())
}

#[tracing::instrument(skip_all)]
async fn trainer_detail(
    State(state): State<AppState>,
    Extension(session): Extension<UserSession>,
    profile_id: Result<Path<Uuid>, PathRejection>,
) -> Response {
    let profile_id = match profile_id {
        Ok(Path(id)) => id,
        Err(rejection) => return state.unknown_path(&session, &rejection, "/trainers"),
    };

    let result = state
        .profiles
        .get_trainer(profile_id)
        .await
        .map(|trainer| state.page(&session, "trainers/detail", json!({ "trainer": trainer })));
    state.respond(&session, result, "/trainers")
}
