use axum::{
    Form, Router,
    http::{HeaderMap, header::SET_COOKIE},
    response::{IntoResponse, Redirect, Response},
    routing::{get, post},
};
use cookie::{Cookie, SameSite};
use secrecy::SecretString;
use serde::Deserialize;
use types::{LOGIN_PATH, Result, SESSION_COOKIE_NAME, UserData};

use crate::{BACKEND, CONFIG, purge_expired_sessions, session_token, storage::Session};

pub fn auth_router() -> Router {
    Router::new()
        .route("/auth/login", post(login))
        .route("/auth/logout", get(logout))
}

#[derive(Deserialize)]
struct LoginForm {
    email: String,
    password: SecretString,
}

async fn login(Form(form): Form<LoginForm>) -> Response {
    match login_inner(form).await {
        Ok(response) => response,
        Err(error) => {
            tracing::warn!(?error, "login failed");
            AuthError::from_status(error.status()).into_response()
        }
    }
}

async fn login_inner(form: LoginForm) -> Result<Response> {
    let email = form.email.trim();
    let access_token = BACKEND.login(email, &form.password).await?;
    let user = BACKEND.me(&access_token).await?;

    tracing::info!(user = %user.id, role = %user.role, "signed in");
    let landing = user.role.default_landing();

    // Store session server-side and hand out a signed token
    let session = Session::open(UserData { user, access_token }).await?;
    if let Err(error) = purge_expired_sessions().await {
        tracing::warn!(?error, "failed to purge expired sessions");
    }
    let cookie = session_cookie(session.as_token()?);

    Ok(([(SET_COOKIE, cookie.to_string())], Redirect::to(landing)).into_response())
}

async fn logout(headers: HeaderMap) -> impl IntoResponse {
    if let Some(token) = session_token(&headers)
        && let Err(error) = Session::revoke_token(token).await
    {
        tracing::warn!(?error, "failed to delete session");
    }

    // Clear the session cookie
    let mut cookie = session_cookie(String::new());
    cookie.set_max_age(cookie::time::Duration::ZERO);

    ([(SET_COOKIE, cookie.to_string())], Redirect::to(LOGIN_PATH))
}

fn session_cookie(value: String) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE_NAME, value))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(CONFIG.secure_cookies())
        .build()
}

/// Login failures send the browser back to the login page with a message.
#[derive(Debug, PartialEq)]
enum AuthError {
    InvalidCredentials,
    Unavailable,
}

impl AuthError {
    fn from_status(status: u16) -> Self {
        match status {
            400 | 401 | 403 => AuthError::InvalidCredentials,
            _ => AuthError::Unavailable,
        }
    }

    /// Query value understood by the login page.
    fn code(&self) -> &'static str {
        match self {
            AuthError::InvalidCredentials => "invalid-credentials",
            AuthError::Unavailable => "unavailable",
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        Redirect::to(&format!("{LOGIN_PATH}?error={}", self.code())).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejected_credentials_are_reported_as_such() {
        assert_eq!(AuthError::from_status(401), AuthError::InvalidCredentials);
        assert_eq!(AuthError::from_status(500), AuthError::Unavailable);
    }

    #[test]
    fn failures_redirect_to_login() {
        let response = AuthError::InvalidCredentials.into_response();
        assert_eq!(
            response.headers()["location"],
            "/login?error=invalid-credentials"
        );
    }
}
