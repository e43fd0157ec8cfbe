use crate::{
    config::Config,
    error::{AppError, Result},
    models::response::ErrorResponse,
    session::SessionStore,
};
use reqwest::{Client, Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;
use url::Url;
use uuid::Uuid;

mod comments;
mod interactions;
mod notifications;

/// Thin typed wrapper over the Curio REST gateway. One shared
/// `reqwest::Client`; the bearer credential is read from the session
/// store at call time. Authenticated endpoints short-circuit with
/// `AuthenticationRequired` before any request leaves the process.
pub struct ApiClient {
    http: Client,
    base_url: Url,
    session: Arc<SessionStore>,
}

impl ApiClient {
    pub fn new(config: &Config, session: Arc<SessionStore>) -> Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;

        // Url::join drops the last path segment unless the base ends in '/'
        let mut base = config.api_base_url.clone();
        if !base.ends_with('/') {
            base.push('/');
        }

        Ok(Self {
            http,
            base_url: Url::parse(&base)?,
            session,
        })
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        Ok(self.base_url.join(path.trim_start_matches('/'))?)
    }

    /// The bearer credential, or an authentication-required error.
    pub fn require_token(&self) -> Result<String> {
        self.session
            .token()
            .ok_or_else(|| AppError::unauthorized("Please sign in to continue"))
    }

    /// The bearer credential if a session is active; anonymous otherwise.
    pub fn optional_token(&self) -> Option<String> {
        self.session.token()
    }

    fn request(&self, method: Method, url: Url, token: Option<&str>) -> RequestBuilder {
        let mut builder = self
            .http
            .request(method, url)
            .header("X-Request-Id", Uuid::new_v4().to_string());
        if let Some(token) = token {
            builder = builder.bearer_auth(token);
        }
        builder
    }

    async fn execute(&self, builder: RequestBuilder) -> Result<Response> {
        let response = builder.send().await?;
        if response.status().is_success() {
            return Ok(response);
        }
        Err(Self::decode_error(response).await)
    }

    /// Map a non-2xx response onto the gateway's error envelope. Bodies
    /// that don't parse still produce a usable error with the status.
    async fn decode_error(response: Response) -> AppError {
        let status = response.status().as_u16();
        match response.json::<ErrorResponse>().await {
            Ok(body) => {
                debug!("API error {} {}: {}", status, body.error.code, body.error.message);
                AppError::Api {
                    status,
                    code: body.error.code,
                    message: body.error.message,
                }
            }
            Err(_) => AppError::Api {
                status,
                code: "UNKNOWN".to_string(),
                message: format!("Request failed with status {}", status),
            },
        }
    }

    pub(crate) async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        token: Option<&str>,
    ) -> Result<T> {
        let url = self.endpoint(path)?;
        debug!("GET {}", url);
        let response = self.execute(self.request(Method::GET, url, token)).await?;
        Ok(response.json().await?)
    }

    pub(crate) async fn post_json<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
        token: Option<&str>,
    ) -> Result<T> {
        let url = self.endpoint(path)?;
        debug!("POST {}", url);
        let response = self
            .execute(self.request(Method::POST, url, token).json(body))
            .await?;
        Ok(response.json().await?)
    }

    pub(crate) async fn post_ack<B: Serialize>(
        &self,
        path: &str,
        body: Option<&B>,
        token: Option<&str>,
    ) -> Result<()> {
        let url = self.endpoint(path)?;
        debug!("POST {}", url);
        let mut builder = self.request(Method::POST, url, token);
        if let Some(body) = body {
            builder = builder.json(body);
        }
        self.execute(builder).await?;
        Ok(())
    }

    pub(crate) async fn put_json<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
        token: Option<&str>,
    ) -> Result<T> {
        let url = self.endpoint(path)?;
        debug!("PUT {}", url);
        let response = self
            .execute(self.request(Method::PUT, url, token).json(body))
            .await?;
        Ok(response.json().await?)
    }

    pub(crate) async fn put_ack(&self, path: &str, token: Option<&str>) -> Result<()> {
        let url = self.endpoint(path)?;
        debug!("PUT {}", url);
        self.execute(self.request(Method::PUT, url, token)).await?;
        Ok(())
    }

    pub(crate) async fn delete_ack(&self, path: &str, token: Option<&str>) -> Result<()> {
        let url = self.endpoint(path)?;
        debug!("DELETE {}", url);
        self.execute(self.request(Method::DELETE, url, token)).await?;
        Ok(())
    }
}
