use axum::{
    extract::{
        rejection::{FormRejection, PathRejection},
        Path, State,
    },
    response::{IntoResponse, Response},
    routing::get,
    Extension, Form, Router,
};
use serde_json::json;
use uuid::Uuid;

use super::page::{AppState, FormPage, Notice};
use crate::auth::{ensure_owner, UserSession};
use crate::error::{GymError, GymResult};
use crate::models::WorkoutForm;

pub fn workout_routes(state: AppState) -> Router {
    Router::new()
        .route("/routines/:id/workouts", get(workout_form).post(log_workout))
        .with_state(state)
}

#[tracing::instrument(skip_all)]
async fn workout_form(
    State(state): State<AppState>,
    Extension(session): Extension<UserSession>,
    routine_id: Result<Path<Uuid>, PathRejection>,
) -> Response {
    let routine_id = match routine_id {
        Ok(Path(id)) => id,
        Err(rejection) => return state.unknown_path(&session, &rejection, "/routines"),
    };

    let result: GymResult<_> = async {
        let routine = state.routines.get(routine_id).await?;
        ensure_owner(&session, routine.user_id)?;

        Ok(state.form(
            &session,
            FormPage::fresh("workouts/form", WorkoutForm::for_duration(routine.duration_min))
                .with_context(json!({ "routine": routine })),
        ))
    }
    .await;

    state.respond(&session, result, "/routines")
}

#[tracing::instrument(skip_all)]
async fn log_workout(
    State(state): State<AppState>,
    Extension(session): Extension<UserSession>,
    routine_id: Result<Path<Uuid>, PathRejection>,
    form: Result<Form<WorkoutForm>, FormRejection>,
) -> Response {
    let routine_id = match routine_id {
        Ok(Path(id)) => id,
        Err(rejection) => return state.unknown_path(&session, &rejection, "/routines"),
    };
    let form = match form {
        Ok(Form(form)) => form,
        Err(rejection) => {
            return FormPage::unreadable("workouts/form", WorkoutForm::default(), &rejection)
                .with_context(json!({ "routine_id": routine_id }))
                .into_response()
        }
    };

    match state.workouts.log_workout(&session, routine_id, &form).await {
        Ok(log) => {
            tracing::info!("User {} logged workout {}", session.username, log.id);
            state
                .redirect(
                    &session,
                    session.role.dashboard_path(),
                    Notice::success("¡Entrenamiento registrado!"),
                )
                .into_response()
        }
        Err(GymError::Validation(errors)) => FormPage::invalid("workouts/form", form, errors)
            .with_context(json!({ "routine_id": routine_id }))
            .into_response(),
        Err(error) => state.fail(&session, error, &format!("/routines/{}", routine_id)),
    }
}
