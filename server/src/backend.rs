use std::sync::LazyLock;

use reqwest::{Client, Method, RequestBuilder, StatusCode, Url};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, de::DeserializeOwned};
use serde_json::json;
use types::{
    Error, Result, User,
    maintenance::{MaintenanceRequest, ServiceProvider},
};

use crate::CONFIG;

pub static BACKEND: LazyLock<BackendClient> =
    LazyLock::new(|| BackendClient::new(CONFIG.backend_url.clone()));

pub(crate) trait ReqwestExt {
    async fn try_send<T: DeserializeOwned>(self) -> Result<T>;
}

impl ReqwestExt for RequestBuilder {
    async fn try_send<T: DeserializeOwned>(self) -> Result<T> {
        let response = self.send().await?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED {
            return Err(Error::unauthorized("the backend rejected the credentials"));
        }
        if status.is_client_error() || status.is_server_error() {
            return Err(Error::with_status(
                status.as_u16(),
                anyhow::anyhow!("backend responded with {status}"),
            ));
        }

        let body = response.bytes().await?;

        // Mutations may answer with an empty body.
        let body = if body.is_empty() { &b"null"[..] } else { &body[..] };

        match serde_json::from_slice(body) {
            Ok(r) => Ok(r),
            Err(error) => {
                tracing::debug!(%error, len = body.len(), "failed to parse backend response");
                Err(error.into())
            }
        }
    }
}

#[derive(Deserialize)]
struct LoginResponse {
    #[serde(alias = "accessToken")]
    token: SecretString,
}

/// Typed client for the property-management REST backend.
///
/// Every call except [`BackendClient::login`] runs on behalf of a user and
/// carries that user's bearer token.
#[derive(Clone)]
pub struct BackendClient {
    client: Client,
    base_url: Url,
}

impl BackendClient {
    pub fn new(mut base_url: Url) -> Self {
        // `Url::join` drops the last path segment unless it ends in a slash.
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        Self {
            client: Client::new(),
            base_url,
        }
    }

    fn url(&self, path: &str) -> Result<Url> {
        Ok(self.base_url.join(path.trim_start_matches('/'))?)
    }

    fn request(&self, method: Method, path: &str, token: &SecretString) -> Result<RequestBuilder> {
        Ok(self
            .client
            .request(method, self.url(path)?)
            .bearer_auth(token.expose_secret()))
    }

    fn get(&self, path: impl AsRef<str>, token: &SecretString) -> Result<RequestBuilder> {
        self.request(Method::GET, path.as_ref(), token)
    }

    fn put(&self, path: impl AsRef<str>, token: &SecretString) -> Result<RequestBuilder> {
        self.request(Method::PUT, path.as_ref(), token)
    }

    /// Exchange credentials for a bearer token.
    pub async fn login(&self, email: &str, password: &SecretString) -> Result<SecretString> {
        let response: LoginResponse = self
            .client
            .post(self.url("auth/login")?)
            .json(&json!({
                "email": email,
                "password": password.expose_secret(),
            }))
            .try_send()
            .await
            .map_err(|e| e.context("signing in"))?;

        Ok(response.token)
    }

    pub async fn me(&self, token: &SecretString) -> Result<User> {
        self.get("auth/me", token)?.try_send().await
    }

    pub async fn maintenance_requests(&self, token: &SecretString) -> Result<Vec<MaintenanceRequest>> {
        self.get("maintenance", token)?.try_send().await
    }

    pub async fn maintenance_request(
        &self,
        token: &SecretString,
        request_id: &str,
    ) -> Result<MaintenanceRequest> {
        self.get(format!("maintenance/{request_id}"), token)?
            .try_send()
            .await
    }

    pub async fn service_providers(&self, token: &SecretString) -> Result<Vec<ServiceProvider>> {
        self.get("service-providers", token)?.try_send().await
    }

    pub async fn assign_provider(
        &self,
        token: &SecretString,
        request_id: &str,
        provider_id: &str,
    ) -> Result<()> {
        self.put(format!("maintenance/{request_id}/assign"), token)?
            .json(&json!({ "serviceProviderId": provider_id }))
            .try_send::<serde_json::Value>()
            .await?;

        Ok(())
    }
}
