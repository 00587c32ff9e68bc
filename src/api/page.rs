use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::{
    extract::{
        rejection::{FormRejection, PathRejection},
        FromRef,
    },
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::json;
use sqlx::PgPool;
use uuid::Uuid;

use crate::auth::{AuthService, UserSession};
use crate::catalog::ExerciseCatalog;
use crate::error::{FieldErrors, GymError, GymResult};
use crate::services::{
    AssignmentService, DashboardService, ExerciseService, FavoriteService, Mailer, ProfileService,
    ProgressService, RoutineService, WorkoutService,
};

/// Error key for messages about the whole form rather than one field.
pub const FORM_ERRORS_KEY: &str = "__all__";

const UNREADABLE_FORM: &str = "Revisa los datos del formulario: algún campo tiene un valor no válido.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeLevel {
    Success,
    Info,
    Warning,
    Error,
}

/// One-shot message shown on the next rendered page.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn success(message: impl Into<String>) -> Self {
        Self { level: NoticeLevel::Success, message: message.into() }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self { level: NoticeLevel::Info, message: message.into() }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self { level: NoticeLevel::Warning, message: message.into() }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self { level: NoticeLevel::Error, message: message.into() }
    }
}

/// Pending notices per user, drained when the next page renders.
#[derive(Debug, Clone, Default)]
pub struct NoticeBoard {
    pending: Arc<Mutex<HashMap<Uuid, Vec<Notice>>>>,
}

impl NoticeBoard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, user_id: Uuid, notice: Notice) {
        if let Ok(mut pending) = self.pending.lock() {
            pending.entry(user_id).or_default().push(notice);
        }
    }

    pub fn drain(&self, user_id: Uuid) -> Vec<Notice> {
        self.pending
            .lock()
            .ok()
            .and_then(|mut pending| pending.remove(&user_id))
            .unwrap_or_default()
    }
}

/// Rendered view model: `{view, notices, data}`.
#[derive(Debug, Serialize)]
pub struct Page<T: Serialize> {
    pub view: &'static str,
    pub notices: Vec<Notice>,
    pub data: T,
}

impl<T: Serialize> IntoResponse for Page<T> {
    fn into_response(self) -> Response {
        Json(self).into_response()
    }
}

/// Form redisplayed with field-level messages.
#[derive(Debug, Serialize)]
pub struct FormPage<F: Serialize> {
    #[serde(skip)]
    pub status: StatusCode,
    pub view: &'static str,
    pub notices: Vec<Notice>,
    pub form: F,
    pub errors: FieldErrors,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<serde_json::Value>,
}

impl<F: Serialize> FormPage<F> {
    pub fn invalid(view: &'static str, form: F, errors: FieldErrors) -> Self {
        Self {
            status: StatusCode::UNPROCESSABLE_ENTITY,
            view,
            notices: Vec::new(),
            form,
            errors,
            context: None,
        }
    }

    /// Body that could not be decoded; `form` is redisplayed in its place.
    pub fn unreadable(view: &'static str, form: F, rejection: &FormRejection) -> Self {
        tracing::debug!("Form body for {} rejected: {}", view, rejection.body_text());
        Self::invalid(view, form, FieldErrors::single(FORM_ERRORS_KEY, UNREADABLE_FORM))
    }

    /// Blank or prefilled form, rendered with 200.
    pub fn fresh(view: &'static str, form: F) -> Self {
        Self {
            status: StatusCode::OK,
            view,
            notices: Vec::new(),
            form,
            errors: FieldErrors::new(),
            context: None,
        }
    }

    pub fn with_status(mut self, status: StatusCode) -> Self {
        self.status = status;
        self
    }

    pub fn with_notices(mut self, notices: Vec<Notice>) -> Self {
        self.notices = notices;
        self
    }

    pub fn with_context(mut self, context: impl Serialize) -> Self {
        self.context = serde_json::to_value(context).ok();
        self
    }
}

impl<F: Serialize> IntoResponse for FormPage<F> {
    fn into_response(self) -> Response {
        let status = self.status;
        (status, Json(self)).into_response()
    }
}

/// `303 See Other` to `location`, naming the notice queued for the next page.
#[derive(Debug, Clone)]
pub struct Redirect {
    pub location: String,
    pub notice: Option<Notice>,
}

impl Redirect {
    pub fn to(location: impl Into<String>) -> Self {
        Self { location: location.into(), notice: None }
    }

    pub fn with_notice(mut self, notice: Notice) -> Self {
        self.notice = Some(notice);
        self
    }
}

impl IntoResponse for Redirect {
    fn into_response(self) -> Response {
        let body = Json(json!({
            "redirect": self.location,
            "notice": self.notice,
        }));
        (StatusCode::SEE_OTHER, [(header::LOCATION, self.location)], body).into_response()
    }
}

/// Shared handler state.
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub auth_service: AuthService,
    pub catalog: ExerciseCatalog,
    pub notices: NoticeBoard,
    pub mailer: Mailer,
    pub secure_cookies: bool,
    pub profiles: ProfileService,
    pub exercises: ExerciseService,
    pub routines: RoutineService,
    pub assignments: AssignmentService,
    pub workouts: WorkoutService,
    pub progress: ProgressService,
    pub favorites: FavoriteService,
    pub dashboards: DashboardService,
}

impl FromRef<AppState> for AuthService {
    fn from_ref(state: &AppState) -> Self {
        state.auth_service.clone()
    }
}

impl AppState {
    pub fn new(
        db: PgPool,
        auth_service: AuthService,
        catalog: ExerciseCatalog,
        mailer: Mailer,
        secure_cookies: bool,
    ) -> Self {
        Self {
            profiles: ProfileService::new(db.clone()),
            exercises: ExerciseService::new(db.clone()),
            routines: RoutineService::new(db.clone()),
            assignments: AssignmentService::new(db.clone()),
            workouts: WorkoutService::new(db.clone()),
            progress: ProgressService::new(db.clone()),
            favorites: FavoriteService::new(db.clone()),
            dashboards: DashboardService::new(db.clone()),
            notices: NoticeBoard::new(),
            db,
            auth_service,
            catalog,
            mailer,
            secure_cookies,
        }
    }

    /// View model for `session`, carrying the notices queued for them.
    pub fn page<T: Serialize>(&self, session: &UserSession, view: &'static str, data: T) -> Page<T> {
        Page {
            view,
            notices: self.notices.drain(session.user_id),
            data,
        }
    }

    /// Form page for `session`, carrying the notices queued for them.
    pub fn form<F: Serialize>(&self, session: &UserSession, form: FormPage<F>) -> FormPage<F> {
        form.with_notices(self.notices.drain(session.user_id))
    }

    /// Redirect whose notice is queued for the caller's next page.
    pub fn redirect(&self, session: &UserSession, location: impl Into<String>, notice: Notice) -> Redirect {
        self.notices.push(session.user_id, notice.clone());
        Redirect::to(location).with_notice(notice)
    }

    /// Turn a handler outcome into a response; failures redirect to `fallback`.
    pub fn respond<R: IntoResponse>(
        &self,
        session: &UserSession,
        result: GymResult<R>,
        fallback: &str,
    ) -> Response {
        match result {
            Ok(response) => response.into_response(),
            Err(error) => self.fail(session, error, fallback),
        }
    }

    /// Path parameters that do not parse cannot name an existing record.
    pub fn unknown_path(&self, session: &UserSession, rejection: &PathRejection, fallback: &str) -> Response {
        tracing::debug!("Path parameters rejected: {}", rejection.body_text());
        self.fail(session, GymError::not_found("La página solicitada no existe."), fallback)
    }

    pub fn fail(&self, session: &UserSession, error: GymError, fallback: &str) -> Response {
        if error.is_unexpected() {
            tracing::error!("Request by {} failed: {}", session.username, error);
        } else {
            tracing::debug!("Request by {} refused: {}", session.username, error);
        }
        self.redirect(session, fallback, Notice::error(error.notice_text()))
            .into_response()
    }
}
