//! Authenticated API client
//!
//! Every backend call goes through `ApiClient::request`: the request pipeline
//! decorates the outgoing request, the transport performs it, and the response
//! pipeline sees the outcome (success or error) before the caller does.

use std::sync::Arc;
use std::time::{Duration, Instant};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, AUTHORIZATION};
use reqwest::{Client, Method};
use serde::Serialize;
use serde_json::Value;
use tracing::debug;
use uuid::Uuid;
use crate::config::ApiConfig;
use crate::middleware::Pipeline;
use crate::utils::errors::{ApiError, PortalError, Result};
use crate::utils::helpers::{encode_query, generate_request_id};

/// Outgoing request as seen by the pipeline stages
#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub id: Uuid,
    pub method: Method,
    pub path: String,
    pub query: Vec<(String, String)>,
    pub headers: HeaderMap,
    pub body: Option<Value>,
    /// Session epoch the request was issued under
    pub epoch: u64,
    pub issued_at: Instant,
}

impl ApiRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            id: generate_request_id(),
            method,
            path: path.into(),
            query: Vec::new(),
            headers: HeaderMap::new(),
            body: None,
            epoch: 0,
            issued_at: Instant::now(),
        }
    }

    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    pub fn with_query(mut self, key: &str, value: &str) -> Self {
        self.query.push((key.to_string(), value.to_string()));
        self
    }

    /// Token carried in the `Authorization` header, if any
    pub fn bearer_token(&self) -> Option<&str> {
        self.headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.strip_prefix("Bearer "))
    }

    pub fn elapsed(&self) -> Duration {
        self.issued_at.elapsed()
    }
}

/// Per-call options
#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
    pub query: Vec<(String, String)>,
    pub headers: Vec<(String, String)>,
}

impl RequestOptions {
    pub fn query(key: &str, value: &str) -> Self {
        Self {
            query: vec![(key.to_string(), value.to_string())],
            headers: Vec::new(),
        }
    }
}

/// Backend response with a decoded body
#[derive(Debug, Clone)]
pub struct ApiResponse {
    pub status: u16,
    pub body: Value,
    pub request_id: Uuid,
}

impl ApiResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Body-level `message` field
    pub fn message(&self) -> Option<&str> {
        self.body.get("message").and_then(Value::as_str)
    }

    /// Turn a non-2xx response into an error
    pub fn error_for_status(self) -> Result<Self> {
        if self.is_success() {
            return Ok(self);
        }
        Err(PortalError::Api(ApiError::Status {
            status: self.status,
            message: self.message().map(str::to_string),
        }))
    }
}

/// Performs a prepared request
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: &ApiRequest) -> Result<ApiResponse>;
}

/// `reqwest`-backed transport rooted at the configured base URL
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
    base_url: String,
}

impl HttpTransport {
    pub fn new(config: &ApiConfig) -> Result<Self> {
        url::Url::parse(&config.base_url)?;

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .user_agent(config.user_agent.clone())
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Resolve a backend path against the base URL
    pub fn url_for(&self, path: &str, query: &[(String, String)]) -> Result<url::Url> {
        let mut url = url::Url::parse(&format!("{}/{}", self.base_url, path.trim_start_matches('/')))?;
        if !query.is_empty() {
            url.set_query(Some(&encode_query(query)));
        }
        Ok(url)
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, request: &ApiRequest) -> Result<ApiResponse> {
        let url = self.url_for(&request.path, &request.query)?;

        let mut builder = self
            .client
            .request(request.method.clone(), url)
            .headers(request.headers.clone());
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder.send().await.map_err(ApiError::from)?;
        let status = response.status().as_u16();
        let text = response.text().await.map_err(ApiError::from)?;

        let body = if text.trim().is_empty() {
            Value::Null
        } else {
            serde_json::from_str(&text).unwrap_or(Value::String(text))
        };

        Ok(ApiResponse {
            status,
            body,
            request_id: request.id,
        })
    }
}

/// Single choke point for backend calls
#[derive(Clone)]
pub struct ApiClient {
    transport: Arc<dyn Transport>,
    pipeline: Arc<Pipeline>,
}

impl ApiClient {
    pub fn new(transport: Arc<dyn Transport>, pipeline: Pipeline) -> Self {
        Self {
            transport,
            pipeline: Arc::new(pipeline),
        }
    }

    /// Issue a request through the pipeline
    ///
    /// Non-2xx responses reach the response stages (and the caller) as
    /// `ApiError::Status`.
    pub async fn request(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
        options: RequestOptions,
    ) -> Result<ApiResponse> {
        let mut request = ApiRequest::new(method, path);
        request.body = body;
        request.query = options.query;
        for (name, value) in options.headers {
            let name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|e| PortalError::InvalidInput(format!("header name {}: {}", name, e)))?;
            let value = HeaderValue::from_str(&value)
                .map_err(|e| PortalError::InvalidInput(format!("header value: {}", e)))?;
            request.headers.insert(name, value);
        }

        let request = self.pipeline.prepare(request)?;
        debug!(request_id = %request.id, method = %request.method, path = %request.path, "Sending request");

        let outcome = self
            .transport
            .send(&request)
            .await
            .and_then(ApiResponse::error_for_status);

        self.pipeline.complete(&request, outcome).await
    }

    pub async fn get(&self, path: &str) -> Result<ApiResponse> {
        self.request(Method::GET, path, None, RequestOptions::default()).await
    }

    pub async fn get_with(&self, path: &str, options: RequestOptions) -> Result<ApiResponse> {
        self.request(Method::GET, path, None, options).await
    }

    pub async fn post<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<ApiResponse> {
        let body = serde_json::to_value(body)?;
        self.request(Method::POST, path, Some(body), RequestOptions::default()).await
    }
}
