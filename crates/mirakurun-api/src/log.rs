// Server log endpoints

use bytes::Bytes;
use reqwest::Method;

use crate::client::{ApiResponse, Client};
use crate::error::Error;
use crate::stream::ByteStream;

impl Client {
    /// The buffered log history as plain text.
    ///
    /// `GET /api/log`
    pub async fn get_log(&self) -> Result<ApiResponse<Bytes>, Error> {
        let req = self.new_request::<()>(Method::GET, "log", None)?;
        self.execute_bytes(req).await
    }

    /// Follow the log as new lines are written.
    ///
    /// `GET /api/log/stream`
    pub async fn get_log_stream(&self) -> Result<ApiResponse<ByteStream>, Error> {
        self.request_stream(Method::GET, "log/stream").await
    }
}
