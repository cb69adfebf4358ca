// Mirakurun HTTP client
//
// Wraps `reqwest::Client` with base-URL resolution, the standard request
// headers, status classification and body decoding. Endpoint groups are
// inherent methods in one file per resource.

use std::future::Future;
use std::time::Duration;

use bytes::Bytes;
use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue, USER_AGENT};
use reqwest::{Method, Request, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace, warn};
use url::Url;

use crate::error::Error;
use crate::models::DecodeOptions;
use crate::query::with_query;
use crate::stream::ByteStream;
use crate::transport::TransportConfig;

/// Base URL used when none is configured.
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:40772/api/";

/// Header carrying the tuner priority of every request.
pub const PRIORITY_HEADER: &str = "x-mirakurun-priority";

/// Media type of the MPEG-2 transport-stream endpoints.
pub const MPEG_TS: &str = "video/MP2T";

const JSON_UTF8: &str = "application/json; charset=UTF-8";

/// A decoded value together with the HTTP response metadata.
#[derive(Debug, Clone)]
pub struct ApiResponse<T> {
    pub data: T,
    pub status: StatusCode,
    pub headers: HeaderMap,
}

impl<T> ApiResponse<T> {
    pub fn into_data(self) -> T {
        self.data
    }

    /// The raw `Content-Type` header, if present and ASCII.
    pub fn content_type(&self) -> Option<&str> {
        self.headers.get(CONTENT_TYPE).and_then(|v| v.to_str().ok())
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> ApiResponse<U> {
        ApiResponse {
            data: f(self.data),
            status: self.status,
            headers: self.headers,
        }
    }
}

/// Async client for one Mirakurun server.
///
/// Cheap to clone; clones share the connection pool. The base URL, priority
/// and user agent are fixed at construction.
#[derive(Debug, Clone)]
pub struct Client {
    http: reqwest::Client,
    base_url: Url,
    priority: i32,
    user_agent: HeaderValue,
}

impl Client {
    /// Client for the local default server (`http://127.0.0.1:40772/api/`).
    pub fn new() -> Result<Self, Error> {
        Self::builder().build()
    }

    pub fn builder() -> ClientBuilder {
        ClientBuilder::default()
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn priority(&self) -> i32 {
        self.priority
    }

    pub fn user_agent(&self) -> &str {
        self.user_agent.to_str().unwrap_or_default()
    }

    /// The underlying HTTP client.
    pub fn http(&self) -> &reqwest::Client {
        &self.http
    }

    // ── Request construction ─────────────────────────────────────────

    /// Build a request for `path`, resolved against the base URL.
    ///
    /// `path` may carry an already-encoded query string. A `body` is sent as
    /// JSON. No I/O happens here.
    pub fn new_request<B>(&self, method: Method, path: &str, body: Option<&B>) -> Result<Request, Error>
    where
        B: Serialize + ?Sized,
    {
        ensure_trailing_slash(&self.base_url)?;
        let url = self.base_url.join(path)?;

        let mut req = Request::new(method, url);
        let headers = req.headers_mut();
        headers.insert(USER_AGENT, self.user_agent.clone());
        headers.insert(HeaderName::from_static(PRIORITY_HEADER), HeaderValue::from(self.priority));

        if let Some(body) = body {
            let json = serde_json::to_vec(body)?;
            headers.insert(CONTENT_TYPE, HeaderValue::from_static(JSON_UTF8));
            *req.body_mut() = Some(json.into());
        }

        Ok(req)
    }

    // ── Dispatch ─────────────────────────────────────────────────────

    /// Send the request and decode a JSON body into `T`.
    pub async fn execute_json<T: DeserializeOwned>(&self, req: Request) -> Result<ApiResponse<T>, Error> {
        let resp = self.send(req).await?;
        let status = resp.status();
        let headers = resp.headers().clone();
        let body = resp.text().await?;

        let data = serde_json::from_str(&body).map_err(|e| {
            let preview: String = body.chars().take(200).collect();
            Error::Deserialization {
                message: format!("{e} (body preview: {preview:?})"),
                body: body.clone(),
            }
        })?;

        Ok(ApiResponse { data, status, headers })
    }

    /// Send the request and buffer the whole body.
    pub async fn execute_bytes(&self, req: Request) -> Result<ApiResponse<Bytes>, Error> {
        let resp = self.send(req).await?;
        let status = resp.status();
        let headers = resp.headers().clone();
        let data = resp.bytes().await?;
        Ok(ApiResponse { data, status, headers })
    }

    /// Send the request and discard the body.
    pub async fn execute_empty(&self, req: Request) -> Result<ApiResponse<()>, Error> {
        let resp = self.send(req).await?;
        let status = resp.status();
        let headers = resp.headers().clone();
        // Drain so the connection goes back to the pool.
        let _ = resp.bytes().await?;
        Ok(ApiResponse { data: (), status, headers })
    }

    /// Send the request and hand the open body to the caller.
    pub async fn execute_stream(&self, req: Request) -> Result<ApiResponse<ByteStream>, Error> {
        let resp = self.send(req).await?;
        let status = resp.status();
        let headers = resp.headers().clone();
        Ok(ApiResponse {
            data: ByteStream::from_response(resp),
            status,
            headers,
        })
    }

    async fn send(&self, req: Request) -> Result<reqwest::Response, Error> {
        debug!("{} {}", req.method(), req.url());

        let resp = self.http.execute(req).await?;
        let status = resp.status();
        trace!(%status, "response");

        if is_success(status) {
            Ok(resp)
        } else {
            Err(api_error(status, resp).await)
        }
    }

    // ── Helpers for the endpoint modules ─────────────────────────────

    pub(crate) async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<ApiResponse<T>, Error> {
        let req = self.new_request::<()>(Method::GET, path, None)?;
        self.execute_json(req).await
    }

    pub(crate) async fn put<T, B>(&self, path: &str, body: Option<&B>) -> Result<ApiResponse<T>, Error>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let req = self.new_request(Method::PUT, path, body)?;
        self.execute_json(req).await
    }

    pub(crate) async fn delete<T: DeserializeOwned>(&self, path: &str) -> Result<ApiResponse<T>, Error> {
        let req = self.new_request::<()>(Method::DELETE, path, None)?;
        self.execute_json(req).await
    }

    pub(crate) async fn request_stream(&self, method: Method, path: &str) -> Result<ApiResponse<ByteStream>, Error> {
        let req = self.new_request::<()>(method, path, None)?;
        self.execute_stream(req).await
    }

    /// Open a transport stream, requiring a `video/MP2T` response.
    pub(crate) async fn get_ts(&self, path: &str, decode: bool) -> Result<ApiResponse<ByteStream>, Error> {
        let path = with_query(path, Some(&DecodeOptions { decode }))?;
        let req = self.new_request::<()>(Method::GET, &path, None)?;
        let resp = self.send(req).await?;

        let actual = resp
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_owned();
        if !is_mpeg_ts(&actual) {
            warn!(content_type = %actual, "rejecting non transport-stream response");
            drop(resp);
            return Err(Error::ContentType {
                expected: MPEG_TS,
                actual,
            });
        }

        let status = resp.status();
        let headers = resp.headers().clone();
        Ok(ApiResponse {
            data: ByteStream::from_response(resp),
            status,
            headers,
        })
    }
}

// ── Builder ─────────────────────────────────────────────────────────

/// Builder for [`Client`].
#[derive(Debug, Default)]
pub struct ClientBuilder {
    base_url: Option<String>,
    priority: i32,
    transport: TransportConfig,
    http: Option<reqwest::Client>,
}

impl ClientBuilder {
    /// Server API root. Must end in `/`, e.g. `http://tuner.local:40772/api/`.
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Value of the `X-Mirakurun-Priority` header. Defaults to 0.
    pub fn priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    /// Product token sent in front of the crate's own user agent.
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.transport.user_agent = Some(agent.into());
        self
    }

    /// Total request deadline. Applies to streaming bodies too.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.transport.timeout = Some(timeout);
        self
    }

    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.transport.connect_timeout = timeout;
        self
    }

    /// Use a pre-built HTTP client. Timeouts set on this builder are ignored.
    pub fn http_client(mut self, http: reqwest::Client) -> Self {
        self.http = Some(http);
        self
    }

    pub fn build(self) -> Result<Client, Error> {
        let base_url = Url::parse(self.base_url.as_deref().unwrap_or(DEFAULT_BASE_URL))?;
        ensure_trailing_slash(&base_url)?;

        let agent = self.transport.user_agent();
        let user_agent = HeaderValue::from_str(&agent).map_err(|_| Error::Configuration {
            message: format!("user agent is not a valid header value: {agent:?}"),
        })?;

        let http = match self.http {
            Some(http) => http,
            None => self.transport.build_client()?,
        };

        Ok(Client {
            http,
            base_url,
            priority: self.priority,
            user_agent,
        })
    }
}

// ── Cancellation ────────────────────────────────────────────────────

/// Race `fut` against `token`, returning [`Error::Cancelled`] if the token
/// fires first. The request future is dropped, which aborts it.
pub async fn cancellable<T, F>(token: &CancellationToken, fut: F) -> Result<T, Error>
where
    T: Send,
    F: Future<Output = Result<T, Error>> + Send,
{
    tokio::select! {
        biased;
        () = token.cancelled() => Err(Error::Cancelled),
        res = fut => res,
    }
}

// ── Internals ───────────────────────────────────────────────────────

fn ensure_trailing_slash(url: &Url) -> Result<(), Error> {
    if url.path().ends_with('/') {
        Ok(())
    } else {
        Err(Error::Configuration {
            message: format!("base URL must have a trailing slash, but {url} does not"),
        })
    }
}

fn is_success(status: StatusCode) -> bool {
    (200..=202).contains(&status.as_u16())
}

fn is_mpeg_ts(content_type: &str) -> bool {
    content_type
        .split(';')
        .next()
        .is_some_and(|essence| essence.trim().eq_ignore_ascii_case(MPEG_TS))
}

#[derive(serde::Deserialize)]
struct ErrorResponse {
    #[serde(default)]
    reason: Option<String>,
}

/// Build an [`Error::Api`] whose message starts with the status line.
async fn api_error(status: StatusCode, resp: reqwest::Response) -> Error {
    let raw = resp.text().await.unwrap_or_default();
    let reason = serde_json::from_str::<ErrorResponse>(&raw)
        .ok()
        .and_then(|e| e.reason)
        .filter(|r| Some(r.as_str()) != status.canonical_reason());

    let message = match reason {
        Some(reason) => format!("{status}: {reason}"),
        None => status.to_string(),
    };

    Error::Api {
        status: status.as_u16(),
        message,
    }
}
