// Event endpoints
//
// `events` returns the recent history; `events/stream` keeps the
// connection open and pushes changes as they happen.

use reqwest::Method;
use tracing::debug;

use crate::client::{ApiResponse, Client};
use crate::error::Error;
use crate::models::{Event, EventsListOptions};
use crate::query::with_query;
use crate::stream::{ByteStream, EventStream};

impl Client {
    /// `GET /api/events`
    pub async fn get_events(&self) -> Result<ApiResponse<Vec<Event>>, Error> {
        self.get("events").await
    }

    /// Raw event stream body.
    ///
    /// `GET /api/events/stream`
    pub async fn get_events_stream(
        &self,
        opts: Option<&EventsListOptions>,
    ) -> Result<ApiResponse<ByteStream>, Error> {
        debug!(?opts, "opening event stream");
        let path = with_query("events/stream", opts)?;
        self.request_stream(Method::GET, &path).await
    }

    /// Typed event stream over `GET /api/events/stream`.
    pub async fn watch_events(
        &self,
        opts: Option<&EventsListOptions>,
    ) -> Result<ApiResponse<EventStream>, Error> {
        let resp = self.get_events_stream(opts).await?;
        Ok(resp.map(EventStream::new))
    }
}
