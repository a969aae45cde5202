//! `reqwest`-backed identity API.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder};
use serde::Deserialize;
use serde::de::DeserializeOwned;

use tourdesk_auth::{IdentityApi, RequestAuth};
use tourdesk_core::config::{ApiConfig, ClientConfig, CsrfConfig};
use tourdesk_core::error::AppError;
use tourdesk_core::result::AppResult;
use tourdesk_core::types::HttpMethod;
use tourdesk_entity::auth::{
    AuthResponse, CsrfTokenResponse, LoginRequest, RefreshResponse, RegisterRequest,
};
use tourdesk_entity::user::User;

use crate::classify::{classify_response, classify_transport};
use crate::endpoint::Endpoint;

/// User payloads arrive either bare or wrapped as `{ "user": ... }`.
#[derive(Deserialize)]
#[serde(untagged)]
enum UserEnvelope {
    Wrapped { user: User },
    Bare(User),
}

impl UserEnvelope {
    fn into_user(self) -> User {
        match self {
            Self::Wrapped { user } | Self::Bare(user) => user,
        }
    }
}

#[derive(serde::Serialize)]
#[serde(rename_all = "camelCase")]
struct RefreshBody<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    refresh_token: Option<&'a str>,
}

/// Identity API client over HTTP.
#[derive(Debug, Clone)]
pub struct HttpIdentityApi {
    client: Client,
    base_url: String,
    csrf_header: String,
}

impl HttpIdentityApi {
    /// Build a client from the API and CSRF settings.
    pub fn new(api: &ApiConfig, csrf: &CsrfConfig) -> AppResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(api.request_timeout_seconds))
            .user_agent(&api.user_agent)
            .build()
            .map_err(|e| {
                AppError::configuration(format!("Failed to build HTTP client: {e}"))
            })?;

        Ok(Self {
            client,
            base_url: api.base_url.trim_end_matches('/').to_string(),
            csrf_header: csrf.header_name.clone(),
        })
    }

    /// Build a client from the full client configuration.
    pub fn from_config(config: &ClientConfig) -> AppResult<Self> {
        Self::new(&config.api, &config.csrf)
    }

    /// Base URL requests are issued against.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn request(&self, endpoint: Endpoint, auth: &RequestAuth) -> RequestBuilder {
        let url = format!("{}{}", self.base_url, endpoint.path());
        let mut builder = self
            .client
            .request(to_reqwest_method(endpoint.method()), url);

        if let Some(authorization) = auth.authorization() {
            builder = builder.header(reqwest::header::AUTHORIZATION, authorization);
        }
        if endpoint.method().is_state_changing() {
            if let Some(token) = &auth.csrf {
                builder = builder.header(self.csrf_header.as_str(), token);
            }
        }
        builder
    }

    async fn dispatch(
        &self,
        endpoint: Endpoint,
        builder: RequestBuilder,
    ) -> AppResult<reqwest::Response> {
        let response = builder.send().await.map_err(|e| {
            tracing::warn!(endpoint = %endpoint, error = %e, "Identity API unreachable");
            classify_transport(endpoint, e)
        })?;

        let status = response.status();
        if status.is_success() {
            tracing::debug!(endpoint = %endpoint, status = status.as_u16(), "Identity API call succeeded");
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let err = classify_response(endpoint, status, &body);
        tracing::debug!(
            endpoint = %endpoint,
            status = status.as_u16(),
            kind = %err.kind,
            "Identity API call failed"
        );
        Err(err)
    }

    async fn send_json<T: DeserializeOwned>(
        &self,
        endpoint: Endpoint,
        builder: RequestBuilder,
    ) -> AppResult<T> {
        self.dispatch(endpoint, builder)
            .await?
            .json::<T>()
            .await
            .map_err(|e| classify_transport(endpoint, e))
    }
}

#[async_trait]
impl IdentityApi for HttpIdentityApi {
    async fn login(&self, request: &LoginRequest, auth: &RequestAuth) -> AppResult<AuthResponse> {
        let builder = self.request(Endpoint::Login, auth).json(request);
        self.send_json(Endpoint::Login, builder).await
    }

    async fn register(&self, request: &RegisterRequest, auth: &RequestAuth) -> AppResult<User> {
        let builder = self.request(Endpoint::Register, auth).json(request);
        let envelope: UserEnvelope = self.send_json(Endpoint::Register, builder).await?;
        Ok(envelope.into_user())
    }

    async fn current_user(&self, auth: &RequestAuth) -> AppResult<User> {
        let builder = self.request(Endpoint::CurrentUser, auth);
        let envelope: UserEnvelope = self.send_json(Endpoint::CurrentUser, builder).await?;
        Ok(envelope.into_user())
    }

    async fn refresh(
        &self,
        refresh_token: Option<&str>,
        auth: &RequestAuth,
    ) -> AppResult<RefreshResponse> {
        let builder = self
            .request(Endpoint::Refresh, auth)
            .json(&RefreshBody { refresh_token });
        self.send_json(Endpoint::Refresh, builder).await
    }

    async fn logout(&self, auth: &RequestAuth) -> AppResult<()> {
        let builder = self.request(Endpoint::Logout, auth);
        self.dispatch(Endpoint::Logout, builder).await?;
        Ok(())
    }

    async fn csrf_token(&self) -> AppResult<CsrfTokenResponse> {
        let builder = self.request(Endpoint::CsrfToken, &RequestAuth::anonymous());
        self.send_json(Endpoint::CsrfToken, builder).await
    }
}

fn to_reqwest_method(method: HttpMethod) -> Method {
    match method {
        HttpMethod::Get => Method::GET,
        HttpMethod::Head => Method::HEAD,
        HttpMethod::Options => Method::OPTIONS,
        HttpMethod::Post => Method::POST,
        HttpMethod::Put => Method::PUT,
        HttpMethod::Patch => Method::PATCH,
        HttpMethod::Delete => Method::DELETE,
    }
}
