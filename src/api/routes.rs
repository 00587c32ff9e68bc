use axum::{middleware, routing::get, Router};
use tower_http::trace::TraceLayer;

use super::admin::admin_routes;
use super::assignments::assignment_routes;
use super::auth::auth_routes;
use super::dashboard::dashboard_routes;
use super::exercises::exercise_routes;
use super::favorites::favorite_routes;
use super::health::health_check;
use super::page::AppState;
use super::profile::profile_routes;
use super::progress::progress_routes;
use super::routines::routine_routes;
use super::trainers::trainer_routes;
use super::workouts::workout_routes;
use crate::auth::{cors_layer, frame_options_layer, nosniff_layer, session_middleware};

pub fn create_routes(state: AppState) -> Router {
    let protected = Router::new()
        .merge(dashboard_routes(state.clone()))
        .merge(exercise_routes(state.clone()))
        .merge(routine_routes(state.clone()))
        .merge(workout_routes(state.clone()))
        .merge(assignment_routes(state.clone()))
        .merge(progress_routes(state.clone()))
        .merge(favorite_routes(state.clone()))
        .merge(trainer_routes(state.clone()))
        .merge(profile_routes(state.clone()))
        .merge(admin_routes(state.clone()))
        .route_layer(middleware::from_fn_with_state(
            state.auth_service.clone(),
            session_middleware,
        ));

    Router::new()
        .route("/health", get(health_check))
        .merge(auth_routes(state))
        .merge(protected)
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer())
        .layer(nosniff_layer())
        .layer(frame_options_layer())
}
