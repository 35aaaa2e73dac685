use crate::error::CommonRequestError;
use bytes::Bytes;
use futures_util::{Stream, StreamExt, stream};
use serde::de::DeserializeOwned;
use std::pin::Pin;

/// Payload that marks the normal end of an event stream.
pub const DONE_SENTINEL: &str = "[DONE]";

/// Prefix carried by every event line worth looking at.
const DATA_PREFIX: &str = "data:";

/// Boxed source of raw body bytes.
type ByteStream = Pin<Box<dyn Stream<Item = Result<Bytes, CommonRequestError>> + Send>>;

/// What a single body line means to the parser.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SseLine<'a> {
    /// Blank, comment, non-data field, or a data line with an empty payload.
    Skip,
    /// The `[DONE]` sentinel.
    Done,
    /// A data payload with the prefix and surrounding whitespace removed.
    Data(&'a str),
}

impl<'a> SseLine<'a> {
    pub fn classify(line: &'a str) -> Self {
        let line = line.trim_end_matches(['\n', '\r']);

        let Some(rest) = line.strip_prefix(DATA_PREFIX) else {
            return Self::Skip;
        };

        match rest.trim() {
            "" => Self::Skip,
            DONE_SENTINEL => Self::Done,
            data => Self::Data(data),
        }
    }
}

/// Line-oriented server-sent-event reader.
///
/// Lines are pulled from the body lazily. Once the sentinel is seen or the
/// body ends the parser is finished for good: the underlying stream is
/// dropped and every further call returns `None`.
pub struct SseParser {
    byte_stream: ByteStream,
    buffer: Vec<u8>,
    body_done: bool,
    finished: bool,
    lines_read: usize,
}

impl SseParser {
    pub fn new(response: reqwest::Response) -> Self {
        Self::from_byte_stream(
            response
                .bytes_stream()
                .map(|chunk| chunk.map_err(CommonRequestError::from)),
        )
    }

    pub fn from_byte_stream<S>(byte_stream: S) -> Self
    where
        S: Stream<Item = Result<Bytes, CommonRequestError>> + Send + 'static,
    {
        Self {
            byte_stream: Box::pin(byte_stream),
            buffer: Vec::new(),
            body_done: false,
            finished: false,
            lines_read: 0,
        }
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Number of body lines consumed so far, including skipped ones.
    pub fn lines_read(&self) -> usize {
        self.lines_read
    }

    /// Next data payload, or `None` at the sentinel or the end of the body.
    pub async fn next_data(&mut self) -> Result<Option<String>, CommonRequestError> {
        while !self.finished {
            let Some(line) = self.next_line().await? else {
                self.finish();
                break;
            };

            match SseLine::classify(&line) {
                SseLine::Skip => {}
                SseLine::Done => {
                    tracing::trace!(lines = self.lines_read, "stream sentinel reached");
                    self.finish();
                }
                SseLine::Data(data) => return Ok(Some(data.to_owned())),
            }
        }

        Ok(None)
    }

    /// Next data payload decoded as `T`.
    pub async fn next_event<T: DeserializeOwned>(
        &mut self,
    ) -> Result<Option<T>, CommonRequestError> {
        let Some(data) = self.next_data().await? else {
            return Ok(None);
        };

        serde_json::from_str(&data).map(Some).map_err(|e| {
            CommonRequestError::InvalidEventData(format!("JSON parse error: {e}; payload: {data}"))
        })
    }

    /// Pull one complete line out of the buffer, reading more body as needed.
    ///
    /// `\n`, `\r\n` and a bare `\r` all end a line.
    async fn next_line(&mut self) -> Result<Option<String>, CommonRequestError> {
        loop {
            if let Some((end, terminator_len)) = self.line_end() {
                let line_bytes = self.buffer.drain(..end).collect::<Vec<u8>>();
                self.buffer.drain(..terminator_len);
                self.lines_read += 1;
                return Ok(Some(String::from_utf8(line_bytes)?));
            }

            if self.body_done {
                if self.buffer.is_empty() {
                    return Ok(None);
                }
                self.lines_read += 1;
                let rest = std::mem::take(&mut self.buffer);
                return Ok(Some(String::from_utf8(rest)?));
            }

            match self.byte_stream.next().await {
                Some(chunk) => self.buffer.extend_from_slice(&chunk?),
                None => self.body_done = true,
            }
        }
    }

    /// Offset and length of the first line terminator in the buffer.
    ///
    /// A `\r` at the very end of the buffer stays undecided until the next
    /// byte shows whether it starts a `\r\n`.
    fn line_end(&self) -> Option<(usize, usize)> {
        let pos = self.buffer.iter().position(|&b| b == b'\n' || b == b'\r')?;

        match (self.buffer[pos], self.buffer.get(pos + 1).copied()) {
            (b'\r', Some(b'\n')) => Some((pos, 2)),
            (b'\r', None) if !self.body_done => None,
            _ => Some((pos, 1)),
        }
    }

    fn finish(&mut self) {
        self.finished = true;
        self.buffer.clear();
        self.byte_stream = Box::pin(stream::empty());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    fn parser_from(chunks: &[&'static str]) -> SseParser {
        let chunks = chunks
            .iter()
            .map(|c| Ok(Bytes::from_static(c.as_bytes())))
            .collect::<Vec<_>>();
        SseParser::from_byte_stream(stream::iter(chunks))
    }

    #[test]
    fn test_classify_lines() {
        assert_eq!(SseLine::classify(""), SseLine::Skip);
        assert_eq!(SseLine::classify("\r\n"), SseLine::Skip);
        assert_eq!(SseLine::classify(": keep-alive"), SseLine::Skip);
        assert_eq!(SseLine::classify("event: message"), SseLine::Skip);
        assert_eq!(SseLine::classify("data:"), SseLine::Skip);
        assert_eq!(SseLine::classify("data: [DONE]\n"), SseLine::Done);
        assert_eq!(SseLine::classify("data:[DONE]"), SseLine::Done);
        assert_eq!(SseLine::classify("data: {\"a\":1}  \r\n"), SseLine::Data("{\"a\":1}"));
    }

    #[test]
    fn test_prefix_must_start_the_line() {
        assert_eq!(SseLine::classify(" data: {}"), SseLine::Skip);
    }

    #[tokio::test]
    async fn test_lines_split_across_chunks() {
        let mut parser = parser_from(&["data: {\"te", "st\": \"value\"}\n", "\ndata: [DONE]\n"]);

        let event: Value = parser.next_event().await.unwrap().unwrap();
        assert_eq!(event["test"], "value");
        assert!(parser.next_event::<Value>().await.unwrap().is_none());
        assert!(parser.is_finished());
    }

    #[tokio::test]
    async fn test_final_line_without_newline() {
        let mut parser = parser_from(&["data: {\"n\": 1}\ndata: {\"n\": 2}"]);

        let first: Value = parser.next_event().await.unwrap().unwrap();
        let second: Value = parser.next_event().await.unwrap().unwrap();
        assert_eq!(first["n"], 1);
        assert_eq!(second["n"], 2);
        assert!(parser.next_data().await.unwrap().is_none());
        assert_eq!(parser.lines_read(), 2);
    }

    #[tokio::test]
    async fn test_bare_carriage_return_ends_lines() {
        let mut parser = parser_from(&["data: {\"a\":1}\rdata: {\"a\":2}\rdata: [DONE]\r"]);

        let first: Value = parser.next_event().await.unwrap().unwrap();
        let second: Value = parser.next_event().await.unwrap().unwrap();
        assert_eq!(first["a"], 1);
        assert_eq!(second["a"], 2);
        assert!(parser.next_event::<Value>().await.unwrap().is_none());
        assert_eq!(parser.lines_read(), 3);
    }

    #[tokio::test]
    async fn test_crlf_split_across_chunks_is_one_terminator() {
        let mut parser = parser_from(&["data: {\"a\":1}\r", "\ndata: [DONE]\r\n"]);

        let first: Value = parser.next_event().await.unwrap().unwrap();
        assert_eq!(first["a"], 1);
        assert!(parser.next_data().await.unwrap().is_none());
        assert_eq!(parser.lines_read(), 2);
    }

    #[tokio::test]
    async fn test_trailing_carriage_return_at_end_of_body() {
        let mut parser = parser_from(&["data: {\"a\":1}\r\n\r\n", "data: {\"a\":2}\r"]);

        let first: Value = parser.next_event().await.unwrap().unwrap();
        let second: Value = parser.next_event().await.unwrap().unwrap();
        assert_eq!(first["a"], 1);
        assert_eq!(second["a"], 2);
        assert!(parser.next_data().await.unwrap().is_none());
        assert_eq!(parser.lines_read(), 3);
    }

    #[tokio::test]
    async fn test_sentinel_stops_reading() {
        let mut parser = parser_from(&["data: [DONE]\n", "data: {not json}\n", "data: {}\n"]);

        assert!(parser.next_data().await.unwrap().is_none());
        assert_eq!(parser.lines_read(), 1);
        assert!(parser.next_data().await.unwrap().is_none());
        assert_eq!(parser.lines_read(), 1);
    }

    #[tokio::test]
    async fn test_invalid_json_is_reported() {
        let mut parser = parser_from(&["data: {invalid json}\n"]);

        let err = parser.next_event::<Value>().await.unwrap_err();
        assert!(matches!(err, CommonRequestError::InvalidEventData(_)));
    }

    #[tokio::test]
    async fn test_multibyte_char_split_between_chunks() {
        let bytes = "data: {\"c\": \"é\"}\n".as_bytes();
        let split = bytes.iter().position(|&b| b == 0xC3).unwrap() + 1;
        let chunks = vec![
            Ok(Bytes::copy_from_slice(&bytes[..split])),
            Ok(Bytes::copy_from_slice(&bytes[split..])),
        ];
        let mut parser = SseParser::from_byte_stream(stream::iter(chunks));

        let event: Value = parser.next_event().await.unwrap().unwrap();
        assert_eq!(event["c"], "é");
    }

    #[tokio::test]
    async fn test_empty_body() {
        let mut parser = parser_from(&[]);
        assert!(parser.next_data().await.unwrap().is_none());
        assert!(parser.is_finished());
    }
}
