use std::time::Duration;

use async_trait::async_trait;
use grabbi_core::Transport;
use grabbi_domain::constants::DEFAULT_TIMEOUT_SECS;
use grabbi_domain::{AdminError, ApiResponse, HttpMethod, TransportError, TransportRequest};
use reqwest::{Client as ReqwestClient, Method};
use tracing::debug;

use crate::errors::{InfraError, IntoTransportError};

/// reqwest-backed transport.
///
/// Makes exactly one attempt per request; authentication recovery lives in
/// the core client and other failures are reported as-is.
#[derive(Clone)]
pub struct HttpClient {
    client: ReqwestClient,
}

impl HttpClient {
    /// Start building a new HTTP client.
    pub fn builder() -> HttpClientBuilder {
        HttpClientBuilder::default()
    }

    /// Convenience constructor with default configuration.
    pub fn new() -> Result<Self, AdminError> {
        Self::builder().build()
    }

    async fn execute(&self, request: TransportRequest) -> Result<ApiResponse, TransportError> {
        let method = to_reqwest_method(request.method);
        let mut builder = self.client.request(method.clone(), &request.url);
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        debug!(%method, url = %request.url, "sending HTTP request");

        let response = builder.send().await.map_err(|err| {
            debug!(%method, url = %request.url, error = %err, "HTTP request failed");
            err.into_transport_error()
        })?;

        let status = response.status();
        debug!(%method, url = %request.url, %status, "received HTTP response");

        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value.to_str().ok().map(|value| (name.as_str().to_string(), value.to_string()))
            })
            .collect();
        let body = response.text().await.map_err(IntoTransportError::into_transport_error)?;

        Ok(ApiResponse { status: status.as_u16(), headers, body })
    }
}

#[async_trait]
impl Transport for HttpClient {
    async fn send(&self, request: TransportRequest) -> Result<ApiResponse, TransportError> {
        self.execute(request).await
    }
}

fn to_reqwest_method(method: HttpMethod) -> Method {
    match method {
        HttpMethod::Get => Method::GET,
        HttpMethod::Post => Method::POST,
        HttpMethod::Put => Method::PUT,
        HttpMethod::Patch => Method::PATCH,
        HttpMethod::Delete => Method::DELETE,
    }
}

/// Builder for [`HttpClient`].
#[derive(Debug)]
pub struct HttpClientBuilder {
    timeout: Duration,
    user_agent: Option<String>,
    default_headers: Option<reqwest::header::HeaderMap>,
}

impl Default for HttpClientBuilder {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            user_agent: None,
            default_headers: None,
        }
    }
}

impl HttpClientBuilder {
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = Some(agent.into());
        self
    }

    pub fn default_headers(mut self, headers: reqwest::header::HeaderMap) -> Self {
        self.default_headers = Some(headers);
        self
    }

    pub fn build(self) -> Result<HttpClient, AdminError> {
        let mut builder = ReqwestClient::builder().timeout(self.timeout).no_proxy();

        if let Some(agent) = self.user_agent {
            builder = builder.user_agent(agent);
        }

        if let Some(headers) = self.default_headers {
            builder = builder.default_headers(headers);
        }

        let client = builder.build().map_err(|err| {
            let infra: InfraError = err.into();
            AdminError::from(infra)
        })?;

        Ok(HttpClient { client })
    }
}

#[cfg(test)]
mod tests {
    use std::net::TcpListener;

    use grabbi_domain::{ApiRequest, TransportErrorKind};
    use serde_json::json;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    fn client_with_defaults() -> HttpClient {
        HttpClient::builder().timeout(Duration::from_secs(5)).build().expect("http client")
    }

    #[tokio::test]
    async fn sends_headers_and_json_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/admin/products"))
            .and(header("Authorization", "Bearer abc"))
            .and(body_json(json!({ "name": "Milk" })))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({ "id": 1 })))
            .expect(1)
            .mount(&server)
            .await;

        let request = ApiRequest::post("/admin/products", json!({ "name": "Milk" }))
            .with_header("Authorization", "Bearer abc");
        let base = format!("{}/api", server.uri());

        let response = client_with_defaults()
            .send(TransportRequest::resolve(&base, &request))
            .await
            .expect("response");

        assert_eq!(response.status, 201);
        assert_eq!(response.json::<serde_json::Value>().unwrap()["id"], 1);
    }

    #[tokio::test]
    async fn does_not_retry_server_errors() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503))
            .expect(1)
            .mount(&server)
            .await;

        let request = TransportRequest::resolve(&server.uri(), &ApiRequest::get("/orders"));
        let response = client_with_defaults().send(request).await.expect("response");

        assert_eq!(response.status, 503);
        let requests = server.received_requests().await.unwrap();
        assert_eq!(requests.len(), 1);
    }

    #[tokio::test]
    async fn reports_error_statuses_as_responses() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .respond_with(
                ResponseTemplate::new(400).set_body_json(json!({ "error": "Category in use" })),
            )
            .mount(&server)
            .await;

        let request = TransportRequest::resolve(&server.uri(), &ApiRequest::delete("/c/1"));
        let response = client_with_defaults().send(request).await.expect("response");

        assert_eq!(response.status, 400);
        assert_eq!(response.error_message().as_deref(), Some("Category in use"));
    }

    #[tokio::test]
    async fn times_out_slow_responses() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_millis(500)))
            .mount(&server)
            .await;

        let client =
            HttpClient::builder().timeout(Duration::from_millis(50)).build().expect("client");
        let request = TransportRequest::resolve(&server.uri(), &ApiRequest::get("/slow"));
        let err = client.send(request).await.unwrap_err();

        assert_eq!(err.kind, TransportErrorKind::Timeout);
    }

    #[tokio::test]
    async fn fails_on_network_failure() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener); // release the port so that requests fail with ECONNREFUSED
        let url = format!("http://{}", addr);

        let request = TransportRequest::resolve(&url, &ApiRequest::get("/orders"));
        let err = client_with_defaults().send(request).await.unwrap_err();

        assert_eq!(err.kind, TransportErrorKind::Connect);
    }
}
