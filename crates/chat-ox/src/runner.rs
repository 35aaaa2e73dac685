use std::{
    io::Write,
    time::{Duration, Instant},
};

use chat_ox_common::StatusCode;

use crate::{
    config::Config,
    error::ChatOxError,
    render::{render_body, render_stream},
    request::ChatRequest,
    transport::Transport,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Streaming,
    Buffered,
}

/// Outcome of one run. Carries sizes and timings only, never content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    pub mode: Mode,
    /// Characters of accumulated text (streaming) or of the body (buffered).
    pub response_chars: usize,
    /// Event payloads decoded; streaming only.
    pub chunks: Option<usize>,
    /// Response status; buffered only, since streaming fails on anything else.
    pub status: Option<StatusCode>,
    pub elapsed: Duration,
}

/// Build the request from `config`, send it through `transport` and render
/// the reply to `out`.
pub async fn run<T, W>(
    config: &Config,
    transport: &T,
    out: &mut W,
) -> Result<RunReport, ChatOxError>
where
    T: Transport + ?Sized,
    W: Write,
{
    let request = ChatRequest::from_config(config);
    let started = Instant::now();

    tracing::info!(
        endpoint = %config.endpoint,
        model = config.model_id(),
        stream = config.stream,
        "sending chat request"
    );

    if config.stream {
        let parser = transport.open_event_stream(&request).await?;
        let summary = render_stream(parser, out).await?;

        Ok(RunReport {
            mode: Mode::Streaming,
            response_chars: summary.text.chars().count(),
            chunks: Some(summary.chunks),
            status: None,
            elapsed: started.elapsed(),
        })
    } else {
        let body = transport.fetch_body(&request).await?;

        if !body.status.is_success() {
            tracing::warn!(
                status = %body.status,
                "endpoint returned a failure status, printing body anyway"
            );
        }

        let is_json = render_body(&body.text, out)?;
        if !is_json {
            tracing::debug!("response body is not JSON, printed as text");
        }

        Ok(RunReport {
            mode: Mode::Buffered,
            response_chars: body.text.chars().count(),
            chunks: None,
            status: Some(body.status),
            elapsed: started.elapsed(),
        })
    }
}
