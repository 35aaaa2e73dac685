use std::path::PathBuf;

use async_stream::try_stream;
use async_trait::async_trait;
use bytes::Bytes;
use chat_ox_common::{
    CommonRequestError, Endpoint, HttpMethod, RequestBuilder, RequestConfig, SseParser,
    StatusCode,
};
use futures_util::Stream;
use tokio::io::AsyncReadExt;

use crate::{config::Config, error::ChatOxError, request::ChatRequest};

const CHAT_COMPLETIONS: &str = "chat/completions";

const FIXTURE_READ_SIZE: usize = 8 * 1024;

/// A fully read response body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawBody {
    pub status: StatusCode,
    pub text: String,
}

/// Where a chat request goes and how its reply comes back.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Send the request and open the reply as an event stream.
    ///
    /// Fails on a non-success status before any of the body is read.
    async fn open_event_stream(&self, request: &ChatRequest) -> Result<SseParser, ChatOxError>;

    /// Send the request and read the whole reply, whatever its status.
    async fn fetch_body(&self, request: &ChatRequest) -> Result<RawBody, ChatOxError>;
}

/// Pick the fixture transport when a fixture is configured, HTTP otherwise.
pub fn transport_for(config: &Config) -> Box<dyn Transport> {
    match &config.fixture {
        Some(path) => Box::new(FixtureTransport::new(path)),
        None => Box::new(HttpTransport::new(config)),
    }
}

/// Talks to `{endpoint}/chat/completions` over HTTP.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    request_builder: RequestBuilder,
}

impl HttpTransport {
    pub fn new(config: &Config) -> Self {
        Self::with_client(reqwest::Client::new(), config)
    }

    pub fn with_client(client: reqwest::Client, config: &Config) -> Self {
        let request_config = RequestConfig::new(config.endpoint.as_str())
            .with_bearer(config.api_key.as_str())
            .with_user_agent(concat!("chat-ox/", env!("CARGO_PKG_VERSION")));

        Self {
            request_builder: RequestBuilder::new(client, request_config),
        }
    }

    fn endpoint() -> Endpoint {
        Endpoint::new(CHAT_COMPLETIONS, HttpMethod::Post)
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn open_event_stream(&self, request: &ChatRequest) -> Result<SseParser, ChatOxError> {
        Ok(self.request_builder.stream(&Self::endpoint(), request).await?)
    }

    async fn fetch_body(&self, request: &ChatRequest) -> Result<RawBody, ChatOxError> {
        let response = self
            .request_builder
            .send_json(&Self::endpoint(), request)
            .await?;
        let status = response.status();
        let text = response.text().await.map_err(CommonRequestError::from)?;

        Ok(RawBody { status, text })
    }
}

/// Replays a recorded response body from disk as a `200 OK` reply.
#[derive(Debug, Clone)]
pub struct FixtureTransport {
    path: PathBuf,
}

impl FixtureTransport {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn fixture_error(&self, source: std::io::Error) -> ChatOxError {
        ChatOxError::Fixture {
            path: self.path.clone(),
            source,
        }
    }
}

#[async_trait]
impl Transport for FixtureTransport {
    async fn open_event_stream(&self, _request: &ChatRequest) -> Result<SseParser, ChatOxError> {
        let file = tokio::fs::File::open(&self.path)
            .await
            .map_err(|e| self.fixture_error(e))?;
        tracing::debug!(path = %self.path.display(), "replaying event stream fixture");

        Ok(SseParser::from_byte_stream(read_chunks(file)))
    }

    async fn fetch_body(&self, _request: &ChatRequest) -> Result<RawBody, ChatOxError> {
        let text = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|e| self.fixture_error(e))?;
        tracing::debug!(path = %self.path.display(), "replaying body fixture");

        Ok(RawBody {
            status: StatusCode::OK,
            text,
        })
    }
}

/// Lazily read a file as a stream of byte chunks.
fn read_chunks(
    mut file: tokio::fs::File,
) -> impl Stream<Item = Result<Bytes, CommonRequestError>> + Send {
    try_stream! {
        loop {
            let mut buf = vec![0u8; FIXTURE_READ_SIZE];
            let n = file.read(&mut buf).await?;
            if n == 0 {
                break;
            }
            buf.truncate(n);
            yield Bytes::from(buf);
        }
    }
}
