//! HTTP request/response values
//!
//! These types are transport-agnostic: the reqwest adapter in
//! `grabbi-infra` and the scripted transport used in tests both speak them.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::constants::AUTHORIZATION_HEADER;

/// HTTP methods used by the admin API
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Patch => "PATCH",
            Self::Delete => "DELETE",
        }
    }
}

impl std::fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A request addressed relative to the client's base URL
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: HttpMethod,
    /// Path relative to the base URL, e.g. `/admin/products?page=2`
    pub path: String,
    pub body: Option<Value>,
    pub headers: Vec<(String, String)>,
}

impl ApiRequest {
    pub fn new(method: HttpMethod, path: impl Into<String>) -> Self {
        Self { method, path: path.into(), body: None, headers: Vec::new() }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Get, path)
    }

    pub fn post(path: impl Into<String>, body: Value) -> Self {
        Self::new(HttpMethod::Post, path).with_body(body)
    }

    pub fn put(path: impl Into<String>, body: Value) -> Self {
        Self::new(HttpMethod::Put, path).with_body(body)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Delete, path)
    }

    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Add or replace a header (names compare case-insensitively).
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_header(name, value);
        self
    }

    pub fn set_header(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        self.headers.retain(|(existing, _)| !existing.eq_ignore_ascii_case(&name));
        self.headers.push((name, value.into()));
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(existing, _)| existing.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    /// The explicit `Authorization` header, if the caller or a retry set one.
    pub fn authorization(&self) -> Option<&str> {
        self.header(AUTHORIZATION_HEADER)
    }
}

/// A fully resolved request handed to the transport
#[derive(Debug, Clone, PartialEq)]
pub struct TransportRequest {
    pub method: HttpMethod,
    pub url: String,
    pub body: Option<Value>,
    pub headers: Vec<(String, String)>,
}

impl TransportRequest {
    /// Resolve `request` against `base_url`.
    pub fn resolve(base_url: &str, request: &ApiRequest) -> Self {
        Self {
            method: request.method,
            url: join_url(base_url, &request.path),
            body: request.body.clone(),
            headers: request.headers.clone(),
        }
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(existing, _)| existing.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

/// A response that was received, whatever its status
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl ApiResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self { status, headers: Vec::new(), body: body.into() }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Decode the body as JSON.
    ///
    /// 204/205 and empty bodies decode from `null`, so `()` and `Option<T>`
    /// work for endpoints without content.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        if self.status == 204 || self.status == 205 || self.body.trim().is_empty() {
            return serde_json::from_value(Value::Null);
        }
        serde_json::from_str(&self.body)
    }

    /// Body as a JSON value, `None` if it is not JSON.
    pub fn json_value(&self) -> Option<Value> {
        serde_json::from_str(&self.body).ok()
    }

    /// The structured `error` message some endpoints return on failure.
    ///
    /// Blank messages count as absent.
    pub fn error_message(&self) -> Option<String> {
        let value = self.json_value()?;
        let message = value.get("error")?.as_str()?;
        (!message.trim().is_empty()).then(|| message.to_string())
    }
}

/// Category of a failure where no HTTP response was received
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransportErrorKind {
    Timeout,
    Connect,
    Request,
    Other,
}

/// No response received at all
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct TransportError {
    pub kind: TransportErrorKind,
    pub message: String,
}

impl TransportError {
    pub fn new(kind: TransportErrorKind, message: impl Into<String>) -> Self {
        Self { kind, message: message.into() }
    }

    pub fn timeout(message: impl Into<String>) -> Self {
        Self::new(TransportErrorKind::Timeout, message)
    }

    pub fn connect(message: impl Into<String>) -> Self {
        Self::new(TransportErrorKind::Connect, message)
    }
}

fn join_url(base_url: &str, path: &str) -> String {
    if path.starts_with("http://") || path.starts_with("https://") {
        return path.to_string();
    }
    let base = base_url.trim_end_matches('/');
    if path.is_empty() {
        base.to_string()
    } else if path.starts_with('/') {
        format!("{base}{path}")
    } else {
        format!("{base}/{path}")
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_resolve_joins_paths() {
        let request = ApiRequest::get("/admin/products");
        assert_eq!(
            TransportRequest::resolve("http://localhost:3000/api/", &request).url,
            "http://localhost:3000/api/admin/products"
        );
        assert_eq!(
            TransportRequest::resolve("http://localhost:3000/api", &ApiRequest::get("orders")).url,
            "http://localhost:3000/api/orders"
        );
        assert_eq!(
            TransportRequest::resolve("http://a/api", &ApiRequest::get("https://b/x")).url,
            "https://b/x"
        );
    }

    #[test]
    fn test_headers_are_case_insensitive_and_replaced() {
        let request = ApiRequest::get("/x")
            .with_header("authorization", "Bearer old")
            .with_header("Authorization", "Bearer new");
        assert_eq!(request.headers.len(), 1);
        assert_eq!(request.authorization(), Some("Bearer new"));
    }

    #[test]
    fn test_json_decoding_of_empty_bodies() {
        let no_content = ApiResponse::new(204, "");
        assert!(no_content.json::<()>().is_ok());

        let empty = ApiResponse::new(200, "  ");
        let value: Option<u32> = empty.json().unwrap();
        assert_eq!(value, None);

        let body = ApiResponse::new(200, json!({ "total": 2 }).to_string());
        let value: Value = body.json().unwrap();
        assert_eq!(value["total"], 2);
    }

    #[test]
    fn test_error_message_extraction() {
        let response = ApiResponse::new(400, r#"{"error":"SKU already exists"}"#);
        assert_eq!(response.error_message().as_deref(), Some("SKU already exists"));

        assert_eq!(ApiResponse::new(400, r#"{"error":{"code":1}}"#).error_message(), None);
        assert_eq!(ApiResponse::new(400, "<html>bad</html>").error_message(), None);
        assert_eq!(ApiResponse::new(400, r#"{"error":""}"#).error_message(), None);
        assert_eq!(ApiResponse::new(400, r#"{"error":" \n"}"#).error_message(), None);
    }

    #[test]
    fn test_success_range() {
        assert!(ApiResponse::new(201, "").is_success());
        assert!(!ApiResponse::new(302, "").is_success());
        assert!(!ApiResponse::new(401, "").is_success());
    }
}
