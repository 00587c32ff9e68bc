use axum::{
    extract::{rejection::FormRejection, Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Form, Router,
};
use axum_extra::extract::cookie::CookieJar;
use serde::Deserialize;
use serde_json::json;
use validator::Validate;

use super::page::{AppState, FormPage, Notice, Page, Redirect};
use crate::auth::{
    removal_cookie, session_cookie, session_token, AuthError, LoginForm, PasswordResetConfirmForm,
    PasswordResetRequestForm, RegisterForm, SignedIn,
};
use crate::error::FieldErrors;

/// Pages reachable without a session.
pub fn auth_routes(state: AppState) -> Router {
    Router::new()
        .route("/login", get(login_form).post(login))
        .route("/register", get(register_form).post(register))
        .route("/logout", post(logout))
        .route("/password-reset", get(reset_request_form).post(reset_request))
        .route("/password-reset/done", get(reset_done))
        .route(
            "/password-reset/confirm",
            get(reset_confirm_form).post(reset_confirm),
        )
        .with_state(state)
}

#[derive(Debug, Deserialize)]
pub struct ResetTokenQuery {
    #[serde(default)]
    pub token: String,
}

async fn login_form() -> FormPage<LoginForm> {
    FormPage::fresh("auth/login", LoginForm::default())
}

#[tracing::instrument(skip_all)]
async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    form: Result<Form<LoginForm>, FormRejection>,
) -> Response {
    let form = match form {
        Ok(Form(form)) => form,
        Err(rejection) => {
            return FormPage::unreadable("auth/login", LoginForm::default(), &rejection).into_response()
        }
    };

    match state.auth_service.login(&form).await {
        Ok(signed_in) => {
            if signed_in.profile_created {
                state.notices.push(
                    signed_in.session.user_id,
                    Notice::info("Se ha creado tu perfil con el rol de usuario."),
                );
            }
            let welcome = Notice::success(format!("¡Bienvenido, {}!", signed_in.session.username));
            start_session(&state, jar, signed_in, welcome)
        }
        Err(AuthError::InvalidCredentials) => {
            tracing::info!("Rejected login");
            let echoed = LoginForm {
                username: form.username,
                password: String::new(),
            };
            FormPage::invalid(
                "auth/login",
                echoed,
                FieldErrors::single("__all__", AuthError::InvalidCredentials.to_string()),
            )
            .with_status(StatusCode::UNAUTHORIZED)
            .into_response()
        }
        Err(e) => e.into_response(),
    }
}

async fn register_form() -> FormPage<RegisterForm> {
    FormPage::fresh("auth/register", RegisterForm::default())
}

#[tracing::instrument(skip_all)]
async fn register(
    State(state): State<AppState>,
    jar: CookieJar,
    form: Result<Form<RegisterForm>, FormRejection>,
) -> Response {
    let form = match form {
        Ok(Form(form)) => form,
        Err(rejection) => {
            return FormPage::unreadable("auth/register", RegisterForm::default(), &rejection).into_response()
        }
    };
    if let Err(errors) = form.validate() {
        return FormPage::invalid("auth/register", form, errors.into()).into_response();
    }

    match state.auth_service.register(&form).await {
        Ok(signed_in) => {
            let welcome = Notice::success("Cuenta creada. ¡Bienvenido a GymFlow!");
            start_session(&state, jar, signed_in, welcome)
        }
        Err(AuthError::UsernameTaken) => FormPage::invalid(
            "auth/register",
            form,
            FieldErrors::single("username", AuthError::UsernameTaken.to_string()),
        )
        .into_response(),
        Err(AuthError::PasswordValidation(message)) => {
            FormPage::invalid("auth/register", form, FieldErrors::single("password2", message))
                .into_response()
        }
        Err(e) => e.into_response(),
    }
}

fn start_session(state: &AppState, jar: CookieJar, signed_in: SignedIn, notice: Notice) -> Response {
    let cookie = session_cookie(
        signed_in.token,
        state.auth_service.session_expires_in_seconds(),
        state.secure_cookies,
    );
    let redirect = state.redirect(
        &signed_in.session,
        signed_in.session.role.dashboard_path(),
        notice,
    );
    (jar.add(cookie), redirect).into_response()
}

#[tracing::instrument(skip_all)]
async fn logout(State(state): State<AppState>, jar: CookieJar, headers: HeaderMap) -> Response {
    if let Ok(token) = session_token(&jar, &headers) {
        if let Err(e) = state.auth_service.logout(&token).await {
            tracing::debug!("Logout with unusable token: {}", e);
        }
    }

    let redirect = Redirect::to("/login").with_notice(Notice::info("Has cerrado sesión."));
    (jar.remove(removal_cookie()), redirect).into_response()
}

async fn reset_request_form() -> FormPage<PasswordResetRequestForm> {
    FormPage::fresh("auth/password_reset", PasswordResetRequestForm::default())
}

/// Always ends on the same page whether or not the address is known.
#[tracing::instrument(skip_all)]
async fn reset_request(
    State(state): State<AppState>,
    form: Result<Form<PasswordResetRequestForm>, FormRejection>,
) -> Response {
    let form = match form {
        Ok(Form(form)) => form,
        Err(rejection) => {
            return FormPage::unreadable("auth/password_reset", PasswordResetRequestForm::default(), &rejection).into_response()
        }
    };
    if let Err(errors) = form.validate() {
        return FormPage::invalid("auth/password_reset", form, errors.into()).into_response();
    }

    match state.auth_service.request_password_reset(&form.email).await {
        Ok(Some((user, token))) => {
            let to = user.email.as_deref().unwrap_or(form.email.as_str());
            if let Err(e) = state.mailer.send_password_reset(to, &user.username, &token).await {
                tracing::warn!("Could not send password reset email: {}", e);
            }
        }
        Ok(None) => tracing::debug!("Password reset requested for an unknown address"),
        Err(e) => tracing::error!("Password reset request failed: {}", e),
    }

    Redirect::to("/password-reset/done").into_response()
}

async fn reset_done() -> Page<serde_json::Value> {
    Page {
        view: "auth/password_reset_done",
        notices: Vec::new(),
        data: json!({
            "message": "Si la dirección corresponde a una cuenta, recibirás un correo con instrucciones.",
        }),
    }
}

async fn reset_confirm_form(Query(query): Query<ResetTokenQuery>) -> FormPage<PasswordResetConfirmForm> {
    FormPage::fresh(
        "auth/password_reset_confirm",
        PasswordResetConfirmForm {
            token: query.token,
            ..PasswordResetConfirmForm::default()
        },
    )
}

#[tracing::instrument(skip_all)]
async fn reset_confirm(
    State(state): State<AppState>,
    form: Result<Form<PasswordResetConfirmForm>, FormRejection>,
) -> Response {
    let form = match form {
        Ok(Form(form)) => form,
        Err(rejection) => {
            return FormPage::unreadable("auth/password_reset_confirm", PasswordResetConfirmForm::default(), &rejection).into_response()
        }
    };
    if let Err(errors) = form.validate() {
        return FormPage::invalid("auth/password_reset_confirm", form, errors.into()).into_response();
    }

    match state.auth_service.confirm_password_reset(&form).await {
        Ok(()) => Redirect::to("/login")
            .with_notice(Notice::success(
                "Contraseña actualizada. Ya puedes iniciar sesión.",
            ))
            .into_response(),
        Err(AuthError::InvalidResetToken) => FormPage::invalid(
            "auth/password_reset_confirm",
            form,
            FieldErrors::single("token", AuthError::InvalidResetToken.to_string()),
        )
        .into_response(),
        Err(AuthError::PasswordValidation(message)) => FormPage::invalid(
            "auth/password_reset_confirm",
            form,
            FieldErrors::single("new_password2", message),
        )
        .into_response(),
        Err(e) => e.into_response(),
    }
}
