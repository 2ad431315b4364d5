use crate::auth::TokenProvider;
use crate::error::ClientError;
use reqwest::{Method, RequestBuilder, Response, StatusCode};
use secrecy::ExposeSecret;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Connection settings shared by every resource client: the backend
/// address, one pooled HTTP client, the token provider, and the per-call
/// timeout.
#[derive(Clone)]
pub struct Backend {
    pub address: String,
    http: reqwest::Client,
    tokens: Arc<dyn TokenProvider>,
    timeout: Duration,
}

impl Backend {
    pub fn new(
        address: impl Into<String>,
        tokens: Arc<dyn TokenProvider>,
    ) -> Self {
        Self {
            address: address.into(),
            http: reqwest::Client::new(),
            tokens,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// A client bound to one resource base path, e.g. `/api/Company`.
    pub fn resource(&self, base_path: impl Into<String>) -> ResourceClient {
        ResourceClient {
            backend: self.clone(),
            base_path: base_path.into(),
        }
    }
}

/// Thin HTTP wrapper around one REST resource. Injects the bearer token
/// at call time, bounds every call by the backend timeout, and maps
/// responses onto the client error taxonomy. No caching, no retries.
#[derive(Clone)]
pub struct ResourceClient {
    backend: Backend,
    base_path: String,
}

impl ResourceClient {
    pub fn base_path(&self) -> &str {
        &self.base_path
    }

    fn url(&self, suffix: &str) -> String {
        if suffix.is_empty() {
            format!("{}{}", self.backend.address, self.base_path)
        } else {
            format!("{}{}/{suffix}", self.backend.address, self.base_path)
        }
    }

    fn request(&self, method: Method, url: String) -> RequestBuilder {
        let mut request = self
            .backend
            .http
            .request(method, url)
            .timeout(self.backend.timeout);
        // Looked up per call so a refreshed token is used without
        // rebuilding the client.
        if let Some(token) = self.backend.tokens.token() {
            request = request.bearer_auth(token.expose_secret());
        }
        request
    }

    async fn send(
        &self,
        request: RequestBuilder,
    ) -> Result<Response, ClientError> {
        let response = request.send().await?;
        let status = response.status();
        if status == StatusCode::UNAUTHORIZED {
            return Err(ClientError::AuthRequired);
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ClientError::Api {
                status,
                message: error_message(status, &body),
            });
        }
        Ok(response)
    }

    async fn json_body(&self, response: Response) -> Result<Value, ClientError> {
        if response.status() == StatusCode::NO_CONTENT {
            return Ok(Value::Null);
        }
        let status = response.status();
        let text = response.text().await?;
        if text.is_empty() {
            return Ok(Value::Null);
        }
        serde_json::from_str(&text).map_err(|e| ClientError::Api {
            status,
            message: format!("Malformed response from server: {e}"),
        })
    }

    /// GET the collection. Returns the raw body unmodified; unwrapping a
    /// pagination envelope is the caller's concern.
    pub async fn list(
        &self,
        params: &[(String, String)],
    ) -> Result<Value, ClientError> {
        let mut request = self.request(Method::GET, self.url(""));
        if !params.is_empty() {
            request = request.query(params);
        }
        let response = self.send(request).await?;
        self.json_body(response).await
    }

    pub async fn get(&self, id: &str) -> Result<Value, ClientError> {
        let response =
            self.send(self.request(Method::GET, self.url(id))).await?;
        self.json_body(response).await
    }

    pub async fn create(
        &self,
        payload: &impl Serialize,
    ) -> Result<Value, ClientError> {
        let request = self.request(Method::POST, self.url("")).json(payload);
        let response = self.send(request).await?;
        self.json_body(response).await
    }

    pub async fn update(
        &self,
        id: &str,
        payload: &impl Serialize,
    ) -> Result<Value, ClientError> {
        let request = self.request(Method::PUT, self.url(id)).json(payload);
        let response = self.send(request).await?;
        self.json_body(response).await
    }

    pub async fn remove(&self, id: &str) -> Result<(), ClientError> {
        self.send(self.request(Method::DELETE, self.url(id))).await?;
        Ok(())
    }

    /// Non-CRUD verb on one record, e.g. `PUT <base>/<id>/approve`.
    pub async fn action(
        &self,
        id: &str,
        verb: &str,
        payload: Option<&Value>,
    ) -> Result<Value, ClientError> {
        let mut request =
            self.request(Method::PUT, self.url(&format!("{id}/{verb}")));
        if let Some(payload) = payload {
            request = request.json(payload);
        }
        let response = self.send(request).await?;
        self.json_body(response).await
    }

    /// Non-CRUD GET under the resource path, e.g. `generate/<periodId>`.
    pub async fn action_get(&self, suffix: &str) -> Result<Value, ClientError> {
        let response = self
            .send(self.request(Method::GET, self.url(suffix)))
            .await?;
        self.json_body(response).await
    }

    /// Binary export under the resource path, e.g. `download/<periodId>`.
    pub async fn download(&self, suffix: &str) -> Result<Vec<u8>, ClientError> {
        let response = self
            .send(self.request(Method::GET, self.url(suffix)))
            .await?;
        Ok(response.bytes().await?.to_vec())
    }
}

/// Best-effort human-readable message for a failed response: a `message`
/// field in a JSON body, the problem-details `title`, the raw text, or
/// the status line.
fn error_message(status: StatusCode, body: &str) -> String {
    if let Ok(Value::Object(map)) = serde_json::from_str::<Value>(body) {
        for key in ["message", "Message", "error", "title"] {
            if let Some(Value::String(text)) = map.get(key) {
                if !text.is_empty() {
                    return text.clone();
                }
            }
        }
    }
    let trimmed = body.trim();
    if !trimmed.is_empty() {
        return trimmed.to_string();
    }
    format!("Request failed with status {status}")
}
