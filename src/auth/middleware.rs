use axum::{
    extract::{Request, State},
    http::{
        header::{self, AUTHORIZATION},
        HeaderMap, HeaderValue,
    },
    middleware::Next,
    response::Response,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use tower_http::cors::{Any, CorsLayer};
use tower_http::set_header::SetResponseHeaderLayer;

use crate::auth::{extract_bearer_token, AuthError, AuthService};

pub const SESSION_COOKIE: &str = "gymflow_session";

/// Session token from the session cookie or, failing that, a bearer header.
pub fn session_token(jar: &CookieJar, headers: &HeaderMap) -> Result<String, AuthError> {
    if let Some(cookie) = jar.get(SESSION_COOKIE) {
        if !cookie.value().is_empty() {
            return Ok(cookie.value().to_string());
        }
    }

    let auth_header = headers
        .get(AUTHORIZATION)
        .and_then(|header| header.to_str().ok())
        .ok_or(AuthError::MissingSession)?;

    extract_bearer_token(auth_header).map(str::to_string)
}

/// Session middleware: resolves the caller or sends them to the login page.
pub async fn session_middleware(
    State(auth_service): State<AuthService>,
    jar: CookieJar,
    mut request: Request,
    next: Next,
) -> Result<Response, AuthError> {
    let token = session_token(&jar, request.headers())?;

    let session = auth_service.validate_session(&token).await.map_err(|e| {
        tracing::debug!("Rejected session: {}", e);
        e
    })?;

    request.extensions_mut().insert(session);

    Ok(next.run(request).await)
}

pub fn session_cookie(token: String, max_age_seconds: i64, secure: bool) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, token))
        .path("/")
        .http_only(true)
        .secure(secure)
        .same_site(SameSite::Lax)
        .max_age(
            std::time::Duration::from_secs(max_age_seconds.max(0) as u64)
                .try_into()
                .unwrap_or_default(),
        )
        .build()
}

pub fn removal_cookie() -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, "")).path("/").build()
}

/// Cross-origin access for bearer-token clients; cookies stay same-origin.
pub fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any)
}

pub fn nosniff_layer() -> SetResponseHeaderLayer<HeaderValue> {
    SetResponseHeaderLayer::overriding(
        header::X_CONTENT_TYPE_OPTIONS,
        HeaderValue::from_static("nosniff"),
    )
}

pub fn frame_options_layer() -> SetResponseHeaderLayer<HeaderValue> {
    SetResponseHeaderLayer::overriding(header::X_FRAME_OPTIONS, HeaderValue::from_static("DENY"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cookie_takes_precedence_over_header() {
        let jar = CookieJar::new().add(Cookie::new(SESSION_COOKIE, "from-cookie"));
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer from-header"));

        assert_eq!(session_token(&jar, &headers).unwrap(), "from-cookie");
        assert_eq!(
            session_token(&CookieJar::new(), &headers).unwrap(),
            "from-header"
        );
    }

    #[test]
    fn test_missing_token_is_a_session_failure() {
        let error = session_token(&CookieJar::new(), &HeaderMap::new()).unwrap_err();
        assert!(error.is_session_failure());
    }

    #[test]
    fn test_session_cookie_flags() {
        let cookie = session_cookie("abc".to_string(), 3600, false);
        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(cookie.path(), Some("/"));
        assert_eq!(cookie.value(), "abc");
    }
}
