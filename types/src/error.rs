use std::fmt;

use dioxus::prelude::ServerFnError;
use serde_json::json;

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// An error with an HTTP status attached.
///
/// Anything convertible to `anyhow::Error` converts into this with status 500,
/// so `?` works on library errors. Use the constructors to pick another status.
pub struct Error {
    inner: anyhow::Error,
    status: u16,
}

impl Error {
    pub fn with_status(status: u16, inner: anyhow::Error) -> Self {
        Self { inner, status }
    }

    /// The caller has no usable session.
    pub fn unauthorized(message: impl fmt::Display) -> Self {
        Self::with_status(401, anyhow::anyhow!("{message}"))
    }

    /// The caller's session does not grant access.
    pub fn forbidden(message: impl fmt::Display) -> Self {
        Self::with_status(403, anyhow::anyhow!("{message}"))
    }

    pub fn conflict(message: impl fmt::Display) -> Self {
        Self::with_status(409, anyhow::anyhow!("{message}"))
    }

    pub fn status(&self) -> u16 {
        self.status
    }

    pub fn context(self, context: impl fmt::Display + Send + Sync + 'static) -> Self {
        Self {
            inner: self.inner.context(context),
            status: self.status,
        }
    }
}

impl<E> From<E> for Error
where
    E: Into<anyhow::Error>,
{
    fn from(error: E) -> Self {
        Self::with_status(500, error.into())
    }
}

impl fmt::Debug for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.inner, f)
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.inner, f)
    }
}

impl From<Error> for ServerFnError {
    fn from(error: Error) -> Self {
        let chain: Vec<String> = error.inner.chain().map(|e| e.to_string()).collect();
        let backtrace = error.inner.backtrace().to_string();

        ServerFnError::ServerError {
            message: error.inner.to_string(),
            code: error.status,
            details: Some(json!({
                "chain": chain,
                "backtrace": backtrace,
            })),
        }
    }
}

/// Build an [`Error`] from a format string, like `anyhow!`.
#[macro_export]
macro_rules! err {
    ($($arg:tt)*) => {
        $crate::Error::from($crate::internal_anyhow_dont_use!($($arg)*))
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn library_errors_default_to_internal() {
        let error: Error = "nope".parse::<u32>().unwrap_err().into();
        assert_eq!(error.status(), 500);
    }

    #[test]
    fn server_fn_error_keeps_status_and_chain() {
        let error = Error::forbidden("no access").context("loading requests");

        match ServerFnError::from(error) {
            ServerFnError::ServerError {
                message,
                code,
                details,
            } => {
                assert_eq!(code, 403);
                assert_eq!(message, "loading requests");
                let chain = details.unwrap()["chain"].clone();
                assert_eq!(chain, json!(["loading requests", "no access"]));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn err_macro_formats() {
        let error = crate::err!("missing {}", "cookie");
        assert_eq!(error.to_string(), "missing cookie");
        assert_eq!(error.status(), 500);
    }
}
