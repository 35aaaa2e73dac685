use std::io::Write;

use chat_ox_common::SseParser;
use serde_json::Value;

use crate::{error::ChatOxError, response::ChatCompletionChunk};

/// What a streaming run produced.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StreamSummary {
    /// Every non-empty delta in arrival order, plus one trailing newline.
    pub text: String,
    /// Event payloads decoded, including ones without content.
    pub chunks: usize,
}

/// Write each delta as it arrives, then the `Complete:` summary line.
///
/// The parser is consumed, so the connection behind it is released when this
/// returns, whether or not rendering succeeded.
pub async fn render_stream<W: Write>(
    mut parser: SseParser,
    out: &mut W,
) -> Result<StreamSummary, ChatOxError> {
    let mut summary = StreamSummary::default();

    while let Some(chunk) = parser.next_event::<ChatCompletionChunk>().await? {
        summary.chunks += 1;

        if let Some(delta) = chunk.delta_content() {
            summary.text.push_str(delta);
            out.write_all(delta.as_bytes())?;
            out.flush()?;
        }
    }

    writeln!(out)?;
    summary.text.push('\n');
    writeln!(out, "Complete: {}", summary.text)?;
    out.flush()?;

    Ok(summary)
}

/// Print a whole body, as JSON when it parses and as raw text otherwise.
///
/// Returns whether the body was JSON.
pub fn render_body<W: Write>(body: &str, out: &mut W) -> Result<bool, ChatOxError> {
    let is_json = match serde_json::from_str::<Value>(body) {
        Ok(value) => {
            writeln!(out, "{value}")?;
            true
        }
        Err(_) => {
            writeln!(out, "{body}")?;
            false
        }
    };
    out.flush()?;

    Ok(is_json)
}
