use axum::{
    extract::{
        rejection::{FormRejection, PathRejection},
        Path, State,
    },
    response::Response,
    routing::post,
    Extension, Form, Router,
};
use uuid::Uuid;

use super::page::{AppState, Notice};
use crate::auth::{require_admin, Role, UserSession};
use crate::error::{FieldErrors, GymError, GymResult};
use crate::models::SetRoleForm;

pub fn admin_routes(state: AppState) -> Router {
    Router::new()
        .route("/admin/users/:id/role", post(set_role))
        .with_state(state)
}

#[tracing::instrument(skip_all)]
async fn set_role(
    State(state): State<AppState>,
    Extension(session): Extension<UserSession>,
    user_id: Result<Path<Uuid>, PathRejection>,
    form: Result<Form<SetRoleForm>, FormRejection>,
) -> Response {
    let fallback = session.role.dashboard_path();
    let user_id = match user_id {
        Ok(Path(id)) => id,
        Err(rejection) => return state.unknown_path(&session, &rejection, fallback),
    };

    let result: GymResult<_> = async {
        require_admin(&session)?;
        let Form(form) = form.map_err(|rejection| {
            tracing::debug!("Role form rejected: {}", rejection.body_text());
            GymError::Validation(FieldErrors::single("role", "Rol no válido."))
        })?;
        let role = Role::from_str(&form.role).ok_or_else(|| {
            GymError::Validation(FieldErrors::single("role", "Rol no válido."))
        })?;

        state.profiles.set_role(user_id, role).await?;
        tracing::info!("Admin {} set role of {} to {}", session.username, user_id, role);

        Ok(state.redirect(
            &session,
            "/dashboard/admin",
            Notice::success(format!("Rol actualizado a {}.", role.label())),
        ))
    }
    .await;

    state.respond(&session, result, fallback)
}
