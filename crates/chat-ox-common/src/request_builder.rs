use crate::{error::CommonRequestError, streaming::SseParser};
use reqwest::{Method, RequestBuilder as ReqwestRequestBuilder, Response};
use serde::Serialize;
use std::fmt;

/// HTTP method for API endpoints
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Post,
}

impl From<HttpMethod> for Method {
    fn from(method: HttpMethod) -> Self {
        match method {
            HttpMethod::Post => Method::POST,
        }
    }
}

/// Represents an API endpoint relative to the configured base URL
#[derive(Debug, Clone)]
pub struct Endpoint {
    pub path: String,
    pub method: HttpMethod,
}

impl Endpoint {
    pub fn new(path: impl Into<String>, method: HttpMethod) -> Self {
        Self {
            path: path.into(),
            method,
        }
    }
}

/// Configuration for request building
#[derive(Clone)]
pub struct RequestConfig {
    pub base_url: String,
    pub bearer_token: Option<String>,
    pub user_agent: Option<String>,
}

impl RequestConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            bearer_token: None,
            user_agent: None,
        }
    }

    pub fn with_bearer(mut self, token: impl Into<String>) -> Self {
        self.bearer_token = Some(token.into());
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Join the base URL and the endpoint path with exactly one `/`.
    pub fn url_for(&self, endpoint: &Endpoint) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            endpoint.path.trim_start_matches('/')
        )
    }
}

impl fmt::Debug for RequestConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RequestConfig")
            .field("base_url", &self.base_url)
            .field("bearer_token", &self.bearer_token.as_ref().map(|_| "[REDACTED]"))
            .field("user_agent", &self.user_agent)
            .finish()
    }
}

/// Request builder that handles the shared HTTP patterns
#[derive(Debug, Clone)]
pub struct RequestBuilder {
    client: reqwest::Client,
    config: RequestConfig,
}

impl RequestBuilder {
    pub fn new(client: reqwest::Client, config: RequestConfig) -> Self {
        Self { client, config }
    }

    /// Build a reqwest RequestBuilder for the given endpoint
    pub fn build_request(&self, endpoint: &Endpoint) -> ReqwestRequestBuilder {
        let url = self.config.url_for(endpoint);
        let mut req = self.client.request(endpoint.method.into(), &url);

        if let Some(ref token) = self.config.bearer_token {
            req = req.bearer_auth(token);
        }

        if let Some(ref user_agent) = self.config.user_agent {
            req = req.header("user-agent", user_agent);
        }

        if endpoint.method == HttpMethod::Post {
            req = req.header("content-type", "application/json");
        }

        req
    }

    /// Send a JSON body and hand back the raw response.
    ///
    /// The status is not inspected; callers decide what a failure status means.
    pub async fn send_json<B: Serialize + ?Sized>(
        &self,
        endpoint: &Endpoint,
        body: &B,
    ) -> Result<Response, CommonRequestError> {
        let req = self.build_request(endpoint).json(body);
        tracing::debug!(path = %endpoint.path, "sending request");
        Ok(req.send().await?)
    }

    /// Send a JSON body and open the response as a server-sent-event stream.
    ///
    /// A non-success status fails here, before any of the body is read.
    pub async fn stream<B: Serialize + ?Sized>(
        &self,
        endpoint: &Endpoint,
        body: &B,
    ) -> Result<SseParser, CommonRequestError> {
        let url = self.config.url_for(endpoint);
        let response = self.send_json(endpoint, body).await?;
        let status = response.status();

        if !status.is_success() {
            return Err(CommonRequestError::Status { status, url });
        }

        tracing::debug!(%status, "event stream opened");
        Ok(SseParser::new(response))
    }
}
