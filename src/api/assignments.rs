use axum::{
    extract::{
        rejection::{FormRejection, PathRejection},
        Path, State,
    },
    response::{IntoResponse, Response},
    routing::get,
    Extension, Form, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use uuid::Uuid;

use super::page::{AppState, FormPage, Notice};
use crate::auth::{ensure_owner, require_trainer, UserSession};
use crate::error::{FieldErrors, GymError, GymResult};
use crate::models::{empty_as_none, Routine, UserSummary};

pub fn assignment_routes(state: AppState) -> Router {
    Router::new()
        .route("/routines/:id/assign", get(assign_form).post(assign_routine))
        .route("/clients", get(my_clients))
        .with_state(state)
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct AssignForm {
    #[serde(default, deserialize_with = "empty_as_none")]
    pub recipient_id: Option<Uuid>,
}

#[derive(Debug, Serialize)]
struct AssignContext {
    routine: Routine,
    users: Vec<UserSummary>,
}

async fn assign_context(state: &AppState, session: &UserSession, routine_id: Uuid) -> GymResult<AssignContext> {
    require_trainer(session)?;
    let routine = state.routines.get(routine_id).await?;
    ensure_owner(session, routine.user_id)?;
    let users = state.profiles.assignable_users(session.user_id).await?;
    Ok(AssignContext { routine, users })
}

#[tracing::instrument(skip_all)]
async fn assign_form(
    State(state): State<AppState>,
    Extension(session): Extension<UserSession>,
    routine_id: Result<Path<Uuid>, PathRejection>,
) -> Response {
    let routine_id = match routine_id {
        Ok(Path(id)) => id,
        Err(rejection) => return state.unknown_path(&session, &rejection, "/routines"),
    };

    let result = assign_context(&state, &session, routine_id)
        .await
        .map(|context| {
            state.form(
                &session,
                FormPage::fresh("assignments/form", AssignForm::default()).with_context(context),
            )
        });
    state.respond(&session, result, &format!("/routines/{}", routine_id))
}

#[tracing::instrument(skip_all)]
async fn assign_routine(
    State(state): State<AppState>,
    Extension(session): Extension<UserSession>,
    routine_id: Result<Path<Uuid>, PathRejection>,
    form: Result<Form<AssignForm>, FormRejection>,
) -> Response {
    let routine_id = match routine_id {
        Ok(Path(id)) => id,
        Err(rejection) => return state.unknown_path(&session, &rejection, "/routines"),
    };
    let fallback = format!("/routines/{}", routine_id);

    // An unparsable recipient id is treated like no selection.
    let form = match form {
        Ok(Form(form)) => form,
        Err(rejection) => {
            tracing::debug!("Assignment form rejected: {}", rejection.body_text());
            AssignForm::default()
        }
    };

    let Some(recipient_id) = form.recipient_id else {
        let result = assign_context(&state, &session, routine_id).await.map(|context| {
            FormPage::invalid(
                "assignments/form",
                form,
                FieldErrors::single("recipient_id", "Selecciona un usuario."),
            )
            .with_context(context)
        });
        return state.respond(&session, result, &fallback);
    };

    match state.assignments.assign(&session, routine_id, recipient_id).await {
        Ok(copy) => state
            .redirect(
                &session,
                "/clients",
                Notice::success(format!("Rutina \"{}\" asignada.", copy.name)),
            )
            .into_response(),
        Err(GymError::Validation(errors)) => {
            let result = assign_context(&state, &session, routine_id).await.map(|context| {
                FormPage::invalid(
                    "assignments/form",
                    AssignForm { recipient_id: Some(recipient_id) },
                    errors,
                )
                .with_context(context)
            });
            state.respond(&session, result, &fallback)
        }
        Err(error) => state.fail(&session, error, &fallback),
    }
}

#[tracing::instrument(skip_all)]
async fn my_clients(
    State(state): State<AppState>,
    Extension(session): Extension<UserSession>,
) -> Response {
    let result: GymResult<_> = async {
        require_trainer(&session)?;
        let overview = state.assignments.clients_of(session.user_id).await?;
        Ok(state.page(&session, "assignments/clients", json!({ "overview": overview })))
    }
    .await;

    state.respond(&session, result, session.role.dashboard_path())
}
