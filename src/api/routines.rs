use axum::{
    extract::{
        rejection::{FormRejection, PathRejection},
        Path, Query, State,
    },
    response::{IntoResponse, Response},
    routing::{get, post},
    Extension, Form, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use uuid::Uuid;
use validator::Validate;

use super::exercises::{browse_catalog, CatalogListing, CatalogQuery};
use super::page::{AppState, FormPage, Notice};
use crate::auth::{require_routine_manager, UserSession};
use crate::catalog::CatalogExercise;
use crate::error::{GymError, GymResult};
use crate::models::{Difficulty, EntryForm, EntryWithExercise, Routine, RoutineFilter, RoutineForm, RoutineSummary};

pub fn routine_routes(state: AppState) -> Router {
    Router::new()
        .route("/routines", get(list_routines))
        .route("/routines/new", get(new_routine_form).post(create_routine))
        .route("/routines/:id", get(routine_detail))
        .route("/routines/:id/edit", get(edit_routine_form).post(update_routine))
        .route("/routines/:id/delete", post(delete_routine))
        .route("/routines/:id/exercises", get(search_exercises))
        .route(
            "/routines/:id/exercises/:exercise_id",
            get(entry_form).post(add_entry),
        )
        .with_state(state)
}

#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    pub filter: Option<String>,
}

#[derive(Debug, Serialize)]
struct RoutineList {
    routines: Vec<RoutineSummary>,
    filter: RoutineFilter,
    can_create: bool,
}

#[derive(Debug, Serialize)]
struct RoutineDetail {
    routine: Routine,
    entries: Vec<EntryWithExercise>,
    difficulty_label: &'static str,
    can_manage: bool,
    can_log: bool,
    can_assign: bool,
}

#[derive(Debug, Serialize)]
struct AddExerciseSearch {
    routine: Routine,
    #[serde(flatten)]
    listing: CatalogListing,
}

fn routine_path(routine_id: Uuid) -> String {
    format!("/routines/{}", routine_id)
}

fn difficulty_choices() -> serde_json::Value {
    let difficulties: Vec<serde_json::Value> =
        [Difficulty::Easy, Difficulty::Intermediate, Difficulty::Hard]
            .iter()
            .map(|d| json!({"value": d.as_str(), "label": d.label()}))
            .collect();

    json!({ "difficulties": difficulties })
}

#[tracing::instrument(skip_all)]
async fn list_routines(
    State(state): State<AppState>,
    Extension(session): Extension<UserSession>,
    Query(query): Query<ListQuery>,
) -> Response {
    let filter = RoutineFilter::parse(query.filter.as_deref());

    let result = state
        .routines
        .list_for_user(session.user_id, filter)
        .await
        .map(|routines| {
            state.page(
                &session,
                "routines/list",
                RoutineList {
                    routines,
                    filter,
                    can_create: session.role.can_manage_routines(),
                },
            )
        });
    state.respond(&session, result, session.role.dashboard_path())
}

#[tracing::instrument(skip_all)]
async fn new_routine_form(
    State(state): State<AppState>,
    Extension(session): Extension<UserSession>,
) -> Response {
    let result = require_routine_manager(&session).map(|_| {
        state.form(
            &session,
            FormPage::fresh("routines/form", RoutineForm::default()).with_context(difficulty_choices()),
        )
    });
    state.respond(&session, result, "/routines")
}

#[tracing::instrument(skip_all)]
async fn create_routine(
    State(state): State<AppState>,
    Extension(session): Extension<UserSession>,
    form: Result<Form<RoutineForm>, FormRejection>,
) -> Response {
    if let Err(error) = require_routine_manager(&session) {
        return state.fail(&session, error, "/routines");
    }
    let form = match form {
        Ok(Form(form)) => form,
        Err(rejection) => {
            return FormPage::unreadable("routines/form", RoutineForm::default(), &rejection)
                .with_context(difficulty_choices())
                .into_response()
        }
    };
    if let Err(errors) = form.validate() {
        return FormPage::invalid("routines/form", form, errors.into())
            .with_context(difficulty_choices())
            .into_response();
    }

    let result = state.routines.create(&session, &form).await.map(|routine| {
        state.redirect(
            &session,
            routine_path(routine.id),
            Notice::success(format!("Rutina \"{}\" creada.", routine.name)),
        )
    });
    state.respond(&session, result, "/routines")
}

#[tracing::instrument(skip_all)]
async fn routine_detail(
    State(state): State<AppState>,
    Extension(session): Extension<UserSession>,
    routine_id: Result<Path<Uuid>, PathRejection>,
) -> Response {
    let routine_id = match routine_id {
        Ok(Path(id)) => id,
        Err(rejection) => return state.unknown_path(&session, &rejection, "/routines"),
    };

    let result: GymResult<_> = async {
        let routine = state.routines.get_visible(&session, routine_id).await?;
        let entries = state.routines.entries(routine_id).await?;
        let is_owner = routine.user_id == session.user_id;

        Ok(state.page(
            &session,
            "routines/detail",
            RoutineDetail {
                difficulty_label: routine.difficulty.label(),
                can_manage: is_owner && session.role.can_manage_routines(),
                can_log: is_owner,
                can_assign: is_owner && session.role.can_assign(),
                routine,
                entries,
            },
        ))
    }
    .await;

    state.respond(&session, result, "/routines")
}

#[tracing::instrument(skip_all)]
async fn edit_routine_form(
    State(state): State<AppState>,
    Extension(session): Extension<UserSession>,
    routine_id: Result<Path<Uuid>, PathRejection>,
) -> Response {
    let routine_id = match routine_id {
        Ok(Path(id)) => id,
        Err(rejection) => return state.unknown_path(&session, &rejection, "/routines"),
    };

    let result = state
        .routines
        .get_managed(&session, routine_id)
        .await
        .map(|routine| {
            state.form(
                &session,
                FormPage::fresh("routines/form", RoutineForm::from_routine(&routine))
                    .with_context(json!({
                        "routine_id": routine.id,
                        "choices": difficulty_choices(),
                    })),
            )
        });
    state.respond(&session, result, "/routines")
}

#[tracing::instrument(skip_all)]
async fn update_routine(
    State(state): State<AppState>,
    Extension(session): Extension<UserSession>,
    routine_id: Result<Path<Uuid>, PathRejection>,
    form: Result<Form<RoutineForm>, FormRejection>,
) -> Response {
    let routine_id = match routine_id {
        Ok(Path(id)) => id,
        Err(rejection) => return state.unknown_path(&session, &rejection, "/routines"),
    };
    let form = match form {
        Ok(Form(form)) => form,
        Err(rejection) => {
            let routine = match state.routines.get_managed(&session, routine_id).await {
                Ok(routine) => routine,
                Err(error) => return state.fail(&session, error, "/routines"),
            };
            return FormPage::unreadable("routines/form", RoutineForm::from_routine(&routine), &rejection)
                .with_context(json!({
                    "routine_id": routine_id,
                    "choices": difficulty_choices(),
                }))
                .into_response();
        }
    };

    if let Err(errors) = form.validate() {
        // Ownership is still checked before the form is echoed back.
        if let Err(error) = state.routines.get_managed(&session, routine_id).await {
            return state.fail(&session, error, "/routines");
        }
        return FormPage::invalid("routines/form", form, errors.into())
            .with_context(json!({
                "routine_id": routine_id,
                "choices": difficulty_choices(),
            }))
            .into_response();
    }

    let result = state
        .routines
        .update(&session, routine_id, &form)
        .await
        .map(|routine| {
            state.redirect(
                &session,
                routine_path(routine.id),
                Notice::success("Rutina actualizada."),
            )
        });
    state.respond(&session, result, "/routines")
}

#[tracing::instrument(skip_all)]
async fn delete_routine(
    State(state): State<AppState>,
    Extension(session): Extension<UserSession>,
    routine_id: Result<Path<Uuid>, PathRejection>,
) -> Response {
    let routine_id = match routine_id {
        Ok(Path(id)) => id,
        Err(rejection) => return state.unknown_path(&session, &rejection, "/routines"),
    };

    let result = state.routines.delete(&session, routine_id).await.map(|routine| {
        state.redirect(
            &session,
            "/routines",
            Notice::success(format!("Rutina \"{}\" eliminada.", routine.name)),
        )
    });
    state.respond(&session, result, "/routines")
}

#[tracing::instrument(skip_all)]
async fn search_exercises(
    State(state): State<AppState>,
    Extension(session): Extension<UserSession>,
    routine_id: Result<Path<Uuid>, PathRejection>,
    Query(query): Query<CatalogQuery>,
) -> Response {
    let routine_id = match routine_id {
        Ok(Path(id)) => id,
        Err(rejection) => return state.unknown_path(&session, &rejection, "/routines"),
    };

    let result: GymResult<_> = async {
        let routine = state.routines.get_managed(&session, routine_id).await?;
        let listing = browse_catalog(&state.catalog, &query).await;
        Ok(state.page(
            &session,
            "routines/add_exercise",
            AddExerciseSearch { routine, listing },
        ))
    }
    .await;

    state.respond(&session, result, &routine_path(routine_id))
}

async fn catalog_item(state: &AppState, external_id: &str) -> GymResult<CatalogExercise> {
    state
        .catalog
        .get_by_id(external_id)
        .await
        .ok_or_else(|| GymError::not_found("Ejercicio no encontrado."))
}

#[tracing::instrument(skip_all)]
async fn entry_form(
    State(state): State<AppState>,
    Extension(session): Extension<UserSession>,
    params: Result<Path<(Uuid, String)>, PathRejection>,
) -> Response {
    let (routine_id, exercise_id) = match params {
        Ok(Path(params)) => params,
        Err(rejection) => return state.unknown_path(&session, &rejection, "/routines"),
    };

    let result: GymResult<_> = async {
        let routine = state.routines.get_managed(&session, routine_id).await?;
        let exercise = catalog_item(&state, &exercise_id).await?;
        let count = state.routines.entry_count(routine_id).await?;

        Ok(state.form(
            &session,
            FormPage::fresh("routines/entry_form", EntryForm::suggested(count))
                .with_context(json!({ "routine": routine, "exercise": exercise })),
        ))
    }
    .await;

    state.respond(&session, result, &routine_path(routine_id))
}

#[tracing::instrument(skip_all)]
async fn add_entry(
    State(state): State<AppState>,
    Extension(session): Extension<UserSession>,
    params: Result<Path<(Uuid, String)>, PathRejection>,
    form: Result<Form<EntryForm>, FormRejection>,
) -> Response {
    let (routine_id, exercise_id) = match params {
        Ok(Path(params)) => params,
        Err(rejection) => return state.unknown_path(&session, &rejection, "/routines"),
    };

    let result: GymResult<_> = async {
        let routine = state.routines.get_managed(&session, routine_id).await?;
        let catalog = catalog_item(&state, &exercise_id).await?;

        let form = match form {
            Ok(Form(form)) => form,
            Err(rejection) => {
                let count = state.routines.entry_count(routine_id).await?;
                let blank = EntryForm::suggested(count);
                return Ok(FormPage::unreadable("routines/entry_form", blank, &rejection)
                    .with_context(json!({ "routine": routine, "exercise": catalog }))
                    .into_response());
            }
        };

        if let Err(errors) = form.validate() {
            return Ok(FormPage::invalid("routines/entry_form", form, errors.into())
                .with_context(json!({ "routine": routine, "exercise": catalog }))
                .into_response());
        }

        let exercise = state.exercises.materialize(&catalog).await?;
        state
            .routines
            .add_entry(&session, routine_id, exercise.id, &form)
            .await?;

        Ok(state
            .redirect(
                &session,
                routine_path(routine_id),
                Notice::success(format!("{} añadido a la rutina.", exercise.name)),
            )
            .into_response())
    }
    .await;

    state.respond(&session, result, &routine_path(routine_id))
}
