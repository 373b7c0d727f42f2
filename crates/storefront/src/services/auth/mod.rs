//! Auth session service and the authenticated API client.
//!
//! [`ApiClient`] is the single outbound client for the accounts API. Every
//! request gets the stored bearer token; mutating requests echo the API's
//! CSRF cookie back as a header. A 401 response triggers exactly one token
//! refresh followed by a retry of the original request; if the refresh
//! itself fails the stored tokens are cleared (forced logout) and the
//! session is reported expired. The retry flag is per-request state, so a
//! second 401 on the retried request can never loop.
//!
//! [`AuthService`] layers the account operations on top: register, login,
//! logout and explicit refresh, persisting tokens and the user profile in
//! the local store.

mod error;

pub use error::AuthError;

use std::sync::Arc;

use reqwest::cookie::{CookieStore, Jar};
use reqwest::{Method, StatusCode};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::json;
use tracing::instrument;
use url::Url;

use souk_core::{Email, UserProfile};

use crate::store::LocalStore;

/// Cookie set by the accounts API.
const CSRF_COOKIE: &str = "csrftoken";

/// Header the API expects the cookie echoed into on mutating requests.
const CSRF_HEADER: &str = "X-CSRFToken";

/// Fixed endpoint paths under the API base URL.
mod paths {
    pub const REGISTER: &str = "accounts/register/";
    pub const LOGIN: &str = "accounts/login/";
    pub const TOKEN_REFRESH: &str = "accounts/token/refresh/";
}

/// Signup payload for the accounts API.
#[derive(Debug, Clone, Deserialize)]
pub struct Registration {
    pub name: String,
    pub phone: String,
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub wilaya: String,
    #[serde(default)]
    pub address: String,
}

/// Login payload for the accounts API.
#[derive(Debug, Deserialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

/// Token pair issued on login.
#[derive(Debug, Deserialize)]
struct TokenPair {
    access: String,
    refresh: String,
}

/// Access token issued on refresh.
#[derive(Debug, Deserialize)]
struct RefreshedToken {
    access: String,
}

/// Authenticated client for the accounts API.
///
/// Cheaply cloneable. Owns a cookie jar so the API's CSRF cookie survives
/// across requests.
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<ApiClientInner>,
}

struct ApiClientInner {
    http: reqwest::Client,
    jar: Arc<Jar>,
    base_url: Url,
    store: LocalStore,
}

impl ApiClient {
    /// Create a new API client.
    ///
    /// # Errors
    ///
    /// Returns `reqwest::Error` if the underlying HTTP client cannot be
    /// constructed.
    pub fn new(base_url: Url, store: LocalStore) -> Result<Self, reqwest::Error> {
        let jar = Arc::new(Jar::default());
        let http = reqwest::Client::builder()
            .cookie_provider(Arc::clone(&jar))
            .build()?;

        Ok(Self {
            inner: Arc::new(ApiClientInner {
                http,
                jar,
                base_url,
                store,
            }),
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.inner.base_url.as_str().trim_end_matches('/'),
            path
        )
    }

    /// The CSRF token from the API's cookie, if one has been set.
    fn csrf_token(&self) -> Option<String> {
        let header = self.inner.jar.cookies(&self.inner.base_url)?;
        let header = header.to_str().ok()?;
        header
            .split("; ")
            .find_map(|pair| pair.strip_prefix(CSRF_COOKIE)?.strip_prefix('='))
            .map(ToOwned::to_owned)
    }

    fn is_mutating(method: &Method) -> bool {
        *method == Method::POST
            || *method == Method::PUT
            || *method == Method::PATCH
            || *method == Method::DELETE
    }

    /// Send a request with auth headers and the single refresh-and-retry.
    async fn send(
        &self,
        method: Method,
        path: &str,
        body: Option<&serde_json::Value>,
    ) -> Result<reqwest::Response, AuthError> {
        // Explicit per-request retry state: one refresh attempt, ever.
        let mut retried = false;

        loop {
            let mut request = self
                .inner
                .http
                .request(method.clone(), self.endpoint(path))
                .header("Accept", "application/json");

            if let Some(token) = self.inner.store.access_token() {
                request = request.bearer_auth(token);
            }

            if Self::is_mutating(&method)
                && let Some(csrf) = self.csrf_token()
            {
                request = request.header(CSRF_HEADER, csrf);
            }

            if let Some(body) = body {
                request = request.json(body);
            }

            let response = request.send().await?;

            if response.status() == StatusCode::UNAUTHORIZED && !retried {
                retried = true;
                tracing::debug!(path, "access token rejected, attempting refresh");

                if let Err(e) = self.refresh().await {
                    tracing::warn!(path, error = %e, "token refresh failed, forcing logout");
                    self.force_logout();
                    return Err(AuthError::SessionExpired);
                }

                continue;
            }

            return Ok(response);
        }
    }

    /// Send a request and parse a JSON response, mapping non-success
    /// statuses to [`AuthError::Api`].
    async fn execute<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Option<&serde_json::Value>,
    ) -> Result<T, AuthError> {
        let response = self.send(method, path, body).await?;
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            return Err(AuthError::Api {
                status,
                message: text.chars().take(200).collect(),
            });
        }

        Ok(serde_json::from_str(&text)?)
    }

    /// GET a JSON resource from the accounts API.
    ///
    /// # Errors
    ///
    /// Returns an error on network failure, a non-success status, or an
    /// expired session.
    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, AuthError> {
        self.execute(Method::GET, path, None).await
    }

    /// POST a JSON payload to the accounts API.
    ///
    /// # Errors
    ///
    /// Returns an error on network failure, a non-success status, or an
    /// expired session.
    pub async fn post_json<T: DeserializeOwned>(
        &self,
        path: &str,
        body: &serde_json::Value,
    ) -> Result<T, AuthError> {
        self.execute(Method::POST, path, Some(body)).await
    }

    /// Exchange the stored refresh token for a new access token.
    ///
    /// Issued directly, outside [`send`](Self::send), so a failing refresh
    /// can never recurse into another refresh.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::MissingRefreshToken`] when no refresh token is
    /// stored, [`AuthError::Api`] when the API rejects the exchange.
    pub async fn refresh(&self) -> Result<String, AuthError> {
        let refresh = self
            .inner
            .store
            .refresh_token()
            .ok_or(AuthError::MissingRefreshToken)?;

        let mut request = self
            .inner
            .http
            .post(self.endpoint(paths::TOKEN_REFRESH))
            .header("Accept", "application/json")
            .json(&json!({ "refresh": refresh }));

        if let Some(csrf) = self.csrf_token() {
            request = request.header(CSRF_HEADER, csrf);
        }

        let response = request.send().await?;
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            return Err(AuthError::Api {
                status,
                message: text.chars().take(200).collect(),
            });
        }

        let token: RefreshedToken = serde_json::from_str(&text)?;
        self.inner.store.set_access_token(&token.access)?;
        Ok(token.access)
    }

    /// Clear the stored tokens after a failed refresh. Store errors are
    /// logged, not surfaced; the session is already over.
    fn force_logout(&self) {
        if let Err(e) = self.inner.store.clear_tokens() {
            tracing::error!(error = %e, "failed to clear tokens during forced logout");
        }
    }
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.inner.base_url.as_str())
            .finish_non_exhaustive()
    }
}

/// Auth session operations.
///
/// Borrows the API client and the local store; construct one per request.
pub struct AuthService<'a> {
    api: &'a ApiClient,
    store: &'a LocalStore,
}

impl<'a> AuthService<'a> {
    /// Create a new auth service.
    #[must_use]
    pub const fn new(api: &'a ApiClient, store: &'a LocalStore) -> Self {
        Self { api, store }
    }

    /// Register a new account and persist the profile locally.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidEmail` if the email format is invalid,
    /// `AuthError::Api` if the accounts API rejects the signup.
    #[instrument(skip(self, registration), fields(email = %registration.email))]
    pub async fn register(&self, registration: &Registration) -> Result<(), AuthError> {
        let email = Email::parse(&registration.email)?;

        let payload = json!({
            "name": registration.name,
            "phone": registration.phone,
            "email": email.as_str(),
            "password": registration.password,
            "wilaya": registration.wilaya,
            "address": registration.address,
        });

        let _created: serde_json::Value = self.api.post_json(paths::REGISTER, &payload).await?;

        self.store.save_profile(&UserProfile {
            name: registration.name.clone(),
            email: email.into_inner(),
            phone: registration.phone.clone(),
            wilaya: registration.wilaya.clone(),
            address: registration.address.clone(),
        })?;

        Ok(())
    }

    /// Log in and persist the issued token pair.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidCredentials` if the API rejects the
    /// credentials.
    #[instrument(skip(self, credentials), fields(email = %credentials.email))]
    pub async fn login(&self, credentials: &Credentials) -> Result<(), AuthError> {
        let payload = json!({
            "email": credentials.email,
            "password": credentials.password,
        });

        let tokens: TokenPair = self
            .api
            .post_json(paths::LOGIN, &payload)
            .await
            .map_err(|e| match e {
                // With no session to refresh, a 401 from the login endpoint
                // surfaces as an expired session; report it as what it is.
                AuthError::SessionExpired => AuthError::InvalidCredentials,
                AuthError::Api { status, .. } if status == StatusCode::UNAUTHORIZED => {
                    AuthError::InvalidCredentials
                }
                other => other,
            })?;

        self.store.set_access_token(&tokens.access)?;
        self.store.set_refresh_token(&tokens.refresh)?;

        Ok(())
    }

    /// Log out: drop both tokens and the locally stored profile.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Store` if the store cannot be updated.
    #[instrument(skip(self))]
    pub fn logout(&self) -> Result<(), AuthError> {
        self.store.clear_tokens()?;
        self.store.clear_profile()?;
        Ok(())
    }

    /// Explicitly refresh the access token.
    ///
    /// # Errors
    ///
    /// See [`ApiClient::refresh`].
    pub async fn refresh(&self) -> Result<String, AuthError> {
        self.api.refresh().await
    }

    /// Whether an access token is currently stored.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.store.access_token().is_some()
    }
}
