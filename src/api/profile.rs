use axum::{
    extract::{rejection::FormRejection, State},
    response::{IntoResponse, Response},
    routing::get,
    Extension, Form, Router,
};
use serde_json::json;
use validator::Validate;

use super::page::{AppState, FormPage, Notice};
use crate::auth::{Role, UserSession};
use crate::models::ProfileForm;

pub fn profile_routes(state: AppState) -> Router {
    Router::new()
        .route("/profile", get(profile_form).post(update_profile))
        .with_state(state)
}

fn profile_context(session: &UserSession) -> serde_json::Value {
    json!({
        "username": session.username,
        "role": session.role,
        "role_label": session.role.label(),
        "trainer_fields": session.role == Role::Trainer,
    })
}

#[tracing::instrument(skip_all)]
async fn profile_form(
    State(state): State<AppState>,
    Extension(session): Extension<UserSession>,
) -> Response {
    let result = state
        .profiles
        .ensure_profile(session.user_id)
        .await
        .map(|(profile, _)| {
            state.form(
                &session,
                FormPage::fresh("profile/form", ProfileForm::from_profile(&profile))
                    .with_context(profile_context(&session)),
            )
        });
    state.respond(&session, result, session.role.dashboard_path())
}

#[tracing::instrument(skip_all)]
async fn update_profile(
    State(state): State<AppState>,
    Extension(session): Extension<UserSession>,
    form: Result<Form<ProfileForm>, FormRejection>,
) -> Response {
    let form = match form {
        Ok(Form(form)) => form,
        Err(rejection) => {
            return FormPage::unreadable("profile/form", ProfileForm::default(), &rejection)
                .with_context(profile_context(&session))
                .into_response()
        }
    };

    if let Err(errors) = form.validate() {
        return FormPage::invalid("profile/form", form, errors.into())
            .with_context(profile_context(&session))
            .into_response();
    }

    let result = state
        .profiles
        .update_profile(session.user_id, session.role, &form)
        .await
        .map(|_| state.redirect(&session, "/profile", Notice::success("Perfil actualizado.")));
    state.respond(&session, result, "/profile")
}
