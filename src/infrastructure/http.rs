use crate::domain::{
    errors::AppError,
    logging::{LogComponent, get_logger},
};
use gloo_net::http::{Request, RequestBuilder};
use std::collections::HashMap;

pub mod api_client;

pub use api_client::ApiClient;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Delete,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Delete => "DELETE",
        }
    }
}

/// A request relative to the API base, e.g. `GET /api/realtime/BTC/USDT`.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    pub path: String,
    pub body: Option<String>,
}

impl ApiRequest {
    pub fn get(path: impl Into<String>) -> Self {
        Self { method: Method::Get, path: path.into(), body: None }
    }

    pub fn post(path: impl Into<String>, body: String) -> Self {
        Self { method: Method::Post, path: path.into(), body: Some(body) }
    }

    pub fn delete(path: impl Into<String>, body: String) -> Self {
        Self { method: Method::Delete, path: path.into(), body: Some(body) }
    }
}

/// Status and raw body; interpretation is left to [`ApiClient`].
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: String,
}

impl ApiResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self { status, body: body.into() }
    }

    pub fn is_success(&self) -> bool {
        HttpUtils::is_success_status(self.status)
    }
}

/// Anything that can carry an [`ApiRequest`] to the server.
///
/// Failures to obtain *any* response are `AppError::Network`; a response with
/// an error status is still `Ok`.
#[allow(async_fn_in_trait)]
pub trait HttpTransport {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, AppError>;
}

/// Browser `fetch` through gloo-net.
#[derive(Clone)]
pub struct GlooTransport {
    base_url: String,
    default_headers: HashMap<String, String>,
}

impl GlooTransport {
    pub fn new(base_url: String) -> Self {
        let mut default_headers = HashMap::new();
        default_headers.insert("Content-Type".to_string(), "application/json".to_string());
        default_headers.insert("Accept".to_string(), "application/json".to_string());

        Self { base_url, default_headers }
    }

    pub fn add_header(mut self, key: String, value: String) -> Self {
        self.default_headers.insert(key, value);
        self
    }

    pub fn url_for(&self, path: &str) -> String {
        if path.starts_with("http") {
            return path.to_string();
        }
        format!("{}/{}", self.base_url.trim_end_matches('/'), path.trim_start_matches('/'))
    }

    fn builder(&self, method: Method, url: &str) -> RequestBuilder {
        let mut request = match method {
            Method::Get => Request::get(url),
            Method::Post => Request::post(url),
            Method::Delete => Request::delete(url),
        };
        for (key, value) in &self.default_headers {
            request = request.header(key, value);
        }
        request
    }
}

impl Default for GlooTransport {
    fn default() -> Self {
        Self::new(String::new())
    }
}

impl HttpTransport for GlooTransport {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, AppError> {
        let url = self.url_for(&request.path);

        get_logger().debug(
            LogComponent::Infrastructure("HTTP"),
            &format!("🌐 {}: {}", request.method.as_str(), url),
        );

        let builder = self.builder(request.method, &url);
        let response = match request.body {
            Some(body) => builder
                .body(body)
                .map_err(|e| AppError::Network(format!("Failed to create request body: {:?}", e)))?
                .send()
                .await,
            None => builder.send().await,
        }
        .map_err(|e| AppError::Network(format!("Request failed: {:?}", e)))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| AppError::Network(format!("Failed to read response: {:?}", e)))?;

        if HttpUtils::is_success_status(status) {
            get_logger().debug(
                LogComponent::Infrastructure("HTTP"),
                &format!("✅ {} {}: {} bytes", status, url, body.len()),
            );
        } else {
            get_logger().warn(
                LogComponent::Infrastructure("HTTP"),
                &format!("HTTP error: {} - {}", status, url),
            );
        }

        Ok(ApiResponse { status, body })
    }
}

pub struct HttpUtils;

impl HttpUtils {
    pub fn is_success_status(status: u16) -> bool {
        (200..300).contains(&status)
    }

    /// `base?k=v&...` with values percent-encoded; parameter order is kept.
    pub fn build_url_with_params(base_url: &str, params: &[(&str, &str)]) -> String {
        if params.is_empty() {
            return base_url.to_string();
        }

        let query_string: String = params
            .iter()
            .map(|(key, value)| format!("{}={}", key, Self::url_encode(value)))
            .collect::<Vec<_>>()
            .join("&");

        format!("{}?{}", base_url, query_string)
    }

    /// Encodes the characters that would break a query string. `/` is left
    /// alone because the API takes symbols like `BTC/USDT` verbatim.
    pub fn url_encode(input: &str) -> String {
        input
            .replace('%', "%25")
            .replace(' ', "%20")
            .replace('&', "%26")
            .replace('=', "%3D")
            .replace('?', "%3F")
            .replace('#', "%23")
            .replace('+', "%2B")
    }
}
