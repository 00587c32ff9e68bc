use axum::{
    extract::{rejection::FormRejection, State},
    response::{IntoResponse, Response},
    routing::get,
    Extension, Form, Router,
};
use serde::Serialize;

use super::page::{AppState, FormPage, Notice};
use crate::auth::UserSession;
use crate::error::GymError;
use crate::models::{ProgressEntry, ProgressForm};

/// Entries shown on the progress page.
const HISTORY: i64 = 10;

pub fn progress_routes(state: AppState) -> Router {
    Router::new()
        .route("/progress", get(progress_history).post(log_progress))
        .with_state(state)
}

#[derive(Debug, Serialize)]
struct ProgressHistory {
    entries: Vec<ProgressEntry>,
    form: ProgressForm,
}

#[tracing::instrument(skip_all)]
async fn progress_history(
    State(state): State<AppState>,
    Extension(session): Extension<UserSession>,
) -> Response {
    let result = state
        .progress
        .recent(session.user_id, HISTORY)
        .await
        .map(|entries| {
            state.page(
                &session,
                "progress/list",
                ProgressHistory {
                    entries,
                    form: ProgressForm::default(),
                },
            )
        });
    state.respond(&session, result, session.role.dashboard_path())
}

async fn recent_entries(state: &AppState, session: &UserSession) -> Vec<ProgressEntry> {
    state
        .progress
        .recent(session.user_id, HISTORY)
        .await
        .unwrap_or_default()
}

#[tracing::instrument(skip_all)]
async fn log_progress(
    State(state): State<AppState>,
    Extension(session): Extension<UserSession>,
    form: Result<Form<ProgressForm>, FormRejection>,
) -> Response {
    let form = match form {
        Ok(Form(form)) => form,
        Err(rejection) => {
            let entries = recent_entries(&state, &session).await;
            return FormPage::unreadable("progress/list", ProgressForm::default(), &rejection)
                .with_context(serde_json::json!({ "entries": entries }))
                .into_response();
        }
    };

    match state.progress.log_progress(session.user_id, &form).await {
        Ok(entry) => state
            .redirect(
                &session,
                "/progress",
                Notice::success(format!("Progreso del {} registrado.", entry.recorded_on)),
            )
            .into_response(),
        Err(GymError::Validation(errors)) => {
            let entries = recent_entries(&state, &session).await;
            FormPage::invalid("progress/list", form, errors)
                .with_context(serde_json::json!({ "entries": entries }))
                .into_response()
        }
        Err(error) => state.fail(&session, error, "/progress"),
    }
}
