// Passthrough body streams and the `/events/stream` decoder.
//
// A `ByteStream` owns the live response body. Dropping it closes the
// connection, which is also how a tuner stream is released on the server.

use std::io;
use std::pin::Pin;
use std::task::{Context, Poll};

use bytes::{Bytes, BytesMut};
use futures_util::{Stream, StreamExt, TryStreamExt};
use tokio::io::{AsyncRead, AsyncWrite, AsyncWriteExt};
use tokio_util::codec::{FramedRead, LinesCodec, LinesCodecError};
use tokio_util::io::StreamReader;
use tracing::{debug, warn};

use crate::error::Error;
use crate::models::Event;

/// Longest single event line accepted from `/events/stream`.
const MAX_EVENT_LINE: usize = 8 * 1024 * 1024;

type BoxStream<T> = Pin<Box<dyn Stream<Item = Result<T, Error>> + Send>>;

// ── ByteStream ──────────────────────────────────────────────────────

/// A response body handed to the caller as a stream of chunks.
pub struct ByteStream {
    inner: BoxStream<Bytes>,
}

impl ByteStream {
    pub(crate) fn from_response(resp: reqwest::Response) -> Self {
        Self::new(resp.bytes_stream().map_err(Error::Transport))
    }

    /// Wrap any chunk stream, e.g. to feed canned data through the same API.
    pub fn new<S>(stream: S) -> Self
    where
        S: Stream<Item = Result<Bytes, Error>> + Send + 'static,
    {
        Self {
            inner: Box::pin(stream),
        }
    }

    /// Adapt the body to `tokio::io::AsyncRead`.
    pub fn into_async_read(self) -> impl AsyncRead + Send + Unpin {
        StreamReader::new(self.inner.map_err(io::Error::other))
    }

    /// Pipe the whole body into `writer`, returning the byte count.
    pub async fn copy_to<W>(mut self, writer: &mut W) -> Result<u64, Error>
    where
        W: AsyncWrite + Unpin + ?Sized,
    {
        let mut written = 0u64;
        while let Some(chunk) = self.inner.next().await {
            let chunk = chunk?;
            writer.write_all(&chunk).await?;
            written += u64::try_from(chunk.len()).unwrap_or(u64::MAX);
        }
        writer.flush().await?;
        Ok(written)
    }

    /// Buffer the remaining body in memory.
    pub async fn collect(mut self) -> Result<Bytes, Error> {
        let mut buf = BytesMut::new();
        while let Some(chunk) = self.inner.next().await {
            buf.extend_from_slice(&chunk?);
        }
        Ok(buf.freeze())
    }
}

impl Stream for ByteStream {
    type Item = Result<Bytes, Error>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.inner.as_mut().poll_next(cx)
    }
}

impl std::fmt::Debug for ByteStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ByteStream").finish_non_exhaustive()
    }
}

// ── EventStream ─────────────────────────────────────────────────────

/// Typed events decoded from `/events/stream`.
///
/// The server writes one JSON array incrementally: `[` first, then one
/// event object per line with `,` separators. Lines that fail to decode
/// are logged and skipped; transport failures end the stream with an error.
pub struct EventStream {
    inner: BoxStream<Event>,
}

impl EventStream {
    pub(crate) fn new(body: ByteStream) -> Self {
        let mut lines = FramedRead::new(
            body.into_async_read(),
            LinesCodec::new_with_max_length(MAX_EVENT_LINE),
        );

        let events = async_stream::try_stream! {
            while let Some(line) = lines.next().await {
                let line = line.map_err(lines_error)?;
                if let Some(event) = decode_event_line(&line) {
                    yield event;
                }
            }
        };

        Self {
            inner: Box::pin(events),
        }
    }
}

impl Stream for EventStream {
    type Item = Result<Event, Error>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.inner.as_mut().poll_next(cx)
    }
}

impl std::fmt::Debug for EventStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventStream").finish_non_exhaustive()
    }
}

/// Decode one line of the incremental event array.
///
/// Returns `None` for array punctuation, blank lines, and lines that are
/// not a valid event.
fn decode_event_line(line: &str) -> Option<Event> {
    let trimmed = line.trim().trim_start_matches(',').trim_end_matches(',').trim();
    if trimmed.is_empty() || trimmed == "[" || trimmed == "]" {
        return None;
    }

    match serde_json::from_str::<Event>(trimmed) {
        Ok(event) => Some(event),
        Err(e) => {
            let preview: String = trimmed.chars().take(200).collect();
            warn!("skipping undecodable event line: {e}");
            debug!("event line preview: {preview:?}");
            None
        }
    }
}

/// Recover the client error that `StreamReader` wrapped into `io::Error`.
fn lines_error(err: LinesCodecError) -> Error {
    match err {
        LinesCodecError::MaxLineLengthExceeded => Error::Deserialization {
            message: format!("event line longer than {MAX_EVENT_LINE} bytes"),
            body: String::new(),
        },
        LinesCodecError::Io(e) if e.get_ref().is_some_and(|inner| inner.is::<Error>()) => e
            .into_inner()
            .and_then(|inner| inner.downcast::<Error>().ok())
            .map_or_else(|| Error::Io(io::Error::other("stream error")), |client_err| *client_err),
        LinesCodecError::Io(e) => Error::Io(e),
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use futures_util::stream;
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::models::{EventResource, EventType};

    fn chunks(parts: &[&'static str]) -> ByteStream {
        let items: Vec<Result<Bytes, Error>> = parts
            .iter()
            .map(|p| Ok(Bytes::from_static(p.as_bytes())))
            .collect();
        ByteStream::new(stream::iter(items))
    }

    #[test]
    fn punctuation_lines_are_skipped() {
        assert!(decode_event_line("[").is_none());
        assert!(decode_event_line(" , ").is_none());
        assert!(decode_event_line("]").is_none());
        assert!(decode_event_line("").is_none());
    }

    #[test]
    fn leading_comma_is_trimmed() {
        let line = r#",{"resource":"service","type":"create","data":{},"time":1514764800000}"#;
        let event = decode_event_line(line).unwrap();
        assert_eq!(event.resource, EventResource::Service);
        assert_eq!(event.event_type, EventType::Create);
    }

    #[test]
    fn garbage_line_is_skipped() {
        assert!(decode_event_line("{not json").is_none());
    }

    #[tokio::test]
    async fn event_stream_decodes_split_chunks() {
        let body = chunks(&[
            "[\n{\"resource\":\"program\",\"type\":\"update\",",
            "\"data\":{\"id\":1},\"time\":1514764800000}\n,\n",
            "{\"resource\":\"tuner\",\"type\":\"remove\",\"data\":null,\"time\":1514764801000}\n",
        ]);

        let events: Vec<Event> = EventStream::new(body).try_collect().await.unwrap();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].resource, EventResource::Program);
        assert_eq!(events[1].event_type, EventType::Remove);
    }

    #[tokio::test]
    async fn event_stream_surfaces_transport_errors() {
        let items: Vec<Result<Bytes, Error>> = vec![
            Ok(Bytes::from_static(b"[\n")),
            Err(Error::Cancelled),
        ];
        let mut events = EventStream::new(ByteStream::new(stream::iter(items)));
        let err = events.next().await.unwrap().unwrap_err();
        assert!(matches!(err, Error::Cancelled));
    }

    #[tokio::test]
    async fn copy_to_counts_bytes() {
        let body = chunks(&["\x47abc", "def"]);
        let mut out = Vec::new();
        let n = body.copy_to(&mut out).await.unwrap();
        assert_eq!(n, 7);
        assert_eq!(out, b"\x47abcdef");
    }

    #[tokio::test]
    async fn collect_concatenates_chunks() {
        let bytes = chunks(&["2018-01-01 ", "info: ready\n"]).collect().await.unwrap();
        assert_eq!(bytes, Bytes::from_static(b"2018-01-01 info: ready\n"));
    }
}
