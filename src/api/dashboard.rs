use axum::{
    extract::State,
    response::{IntoResponse, Response},
    routing::get,
    Extension, Router,
};

use super::page::{AppState, Notice, Redirect};
use crate::auth::{require_dashboard, Role, UserSession};

pub fn dashboard_routes(state: AppState) -> Router {
    Router::new()
        .route("/dashboard", get(dispatch))
        .route("/dashboard/user", get(user_dashboard))
        .route("/dashboard/trainer", get(trainer_dashboard))
        .route("/dashboard/admin", get(admin_dashboard))
        .with_state(state)
}

async fn dispatch(Extension(session): Extension<UserSession>) -> Redirect {
    Redirect::to(session.role.dashboard_path())
}

/// Redirect to the caller's own dashboard when they ask for another role's.
fn wrong_dashboard(state: &AppState, session: &UserSession, requested: Role) -> Option<Response> {
    let error = require_dashboard(session, requested).err()?;
    Some(
        state
            .redirect(session, session.role.dashboard_path(), Notice::error(error.notice_text()))
            .into_response(),
    )
}

#[tracing::instrument(skip_all)]
async fn user_dashboard(
    State(state): State<AppState>,
    Extension(session): Extension<UserSession>,
) -> Response {
    if let Some(redirect) = wrong_dashboard(&state, &session, Role::User) {
        return redirect;
    }

    let result = state
        .dashboards
        .user_dashboard(session.user_id)
        .await
        .map(|data| state.page(&session, "dashboard/user", data));
    state.respond(&session, result, "/profile")
}

#[tracing::instrument(skip_all)]
async fn trainer_dashboard(
    State(state): State<AppState>,
    Extension(session): Extension<UserSession>,
) -> Response {
    if let Some(redirect) = wrong_dashboard(&state, &session, Role::Trainer) {
        return redirect;
    }

    let result = state
        .dashboards
        .trainer_dashboard(session.user_id)
        .await
        .map(|data| state.page(&session, "dashboard/trainer", data));
    state.respond(&session, result, "/profile")
}

#[tracing::instrument(skip_all)]
async fn admin_dashboard(
    State(state): State<AppState>,
    Extension(session): Extension<UserSession>,
) -> Response {
    if let Some(redirect) = wrong_dashboard(&state, &session, Role::Admin) {
        return redirect;
    }

    let result = state
        .dashboards
        .admin_dashboard()
        .await
        .map(|data| state.page(&session, "dashboard/admin", data));
    state.respond(&session, result, "/profile")
}
