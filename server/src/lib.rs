mod auth_routes;
mod backend;
mod config;
pub mod storage;
mod uuid_v7;

use axum::Router;
use axum::http::HeaderMap;
use dioxus::fullstack::FullstackContext;
use jiff::Timestamp;
use tracing_subscriber::EnvFilter;
use types::{
    Access, AccessGate, CurrentUser, Error, Result, RouteRequirement, SESSION_COOKIE_NAME,
    Session as AccessSession, UserData,
};

use crate::auth_routes::auth_router;
pub use crate::backend::{BACKEND, BackendClient};
pub use crate::config::{CONFIG, Config};
use crate::storage::Session;

pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();
}

pub async fn init() -> Result<Router> {
    storage::migrate().await?;
    purge_expired_sessions().await?;
    tracing::info!(
        backend = %CONFIG.backend_url,
        caretaker_policy = ?CONFIG.caretaker_policy,
        "server initialized"
    );

    Ok(auth_router())
}

/// Sessions are only checked for expiry when presented; this clears out the
/// ones nobody comes back for.
pub(crate) async fn purge_expired_sessions() -> Result<()> {
    let purged = Session::purge_expired(Timestamp::now(), CONFIG.session_ttl()).await?;
    if purged > 0 {
        tracing::info!(purged, "removed expired sessions");
    }
    Ok(())
}

/// The gate with the configured caretaker policy.
pub fn access_gate() -> AccessGate {
    AccessGate::new(CONFIG.caretaker_policy)
}

/// Find our session token among the request cookies.
pub(crate) fn session_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get_all(axum::http::header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|header| header.split(';'))
        .find_map(|cookie| {
            cookie
                .trim()
                .strip_prefix(SESSION_COOKIE_NAME)
                .and_then(|rest| rest.strip_prefix('='))
        })
}

/// Resolve the stored session for the current request.
///
/// Expired sessions are deleted and reported as unauthorized.
pub async fn get_session_from_cookie() -> Result<Session> {
    let headers: HeaderMap = FullstackContext::extract().await?;
    let token = session_token(&headers).ok_or_else(|| Error::unauthorized("not signed in"))?;

    let session = Session::lookup(token)
        .await
        .map_err(|error| {
            tracing::debug!(?error, "session lookup failed");
            Error::unauthorized("session not found")
        })?;

    if session.is_expired_at(Timestamp::now(), CONFIG.session_ttl()) {
        session.revoke().await?;
        return Err(Error::unauthorized("session expired"));
    }

    Ok(session)
}

/// The signed-in user, or `None` for any failure to resolve one.
pub async fn get_current_user() -> Option<CurrentUser> {
    match get_session_from_cookie().await {
        Ok(session) => Some(CurrentUser {
            user: session.into_user_data().user,
            policy: CONFIG.caretaker_policy,
        }),
        Err(error) => {
            tracing::debug!(?error, "no current user");
            None
        }
    }
}

/// Run the access gate for a server function, returning the caller's session data.
pub async fn require_access(requirement: &RouteRequirement) -> Result<UserData> {
    let data = get_session_from_cookie().await?.into_user_data();
    let session = AccessSession::Authenticated(data.user.clone());

    match access_gate().decide(&session, requirement) {
        Access::Allow => Ok(data),
        decision => {
            tracing::warn!(
                user = %data.user.id,
                role = %data.user.role,
                ?requirement,
                ?decision,
                "access denied"
            );
            Err(Error::forbidden("access denied"))
        }
    }
}

#[cfg(test)]
mod tests {
    use axum::http::{HeaderValue, header::COOKIE};

    use super::*;

    fn headers(values: &[&str]) -> HeaderMap {
        let mut headers = HeaderMap::new();
        for value in values {
            headers.append(COOKIE, HeaderValue::from_str(value).unwrap());
        }
        headers
    }

    #[test]
    fn finds_session_cookie() {
        let headers = headers(&["theme=dark; rentit_session=abc.def ; other=1"]);
        assert_eq!(session_token(&headers), Some("abc.def"));
    }

    #[test]
    fn finds_cookie_in_later_header() {
        let headers = headers(&["theme=dark", "rentit_session=xyz"]);
        assert_eq!(session_token(&headers), Some("xyz"));
    }

    #[test]
    fn ignores_similarly_named_cookies() {
        let headers = headers(&["rentit_session_old=stale"]);
        assert_eq!(session_token(&headers), None);
        assert_eq!(session_token(&HeaderMap::new()), None);
    }
}
