// Version endpoints

use reqwest::Method;
use tracing::debug;

use crate::client::{ApiResponse, Client};
use crate::error::Error;
use crate::models::{Version, VersionUpdateOptions};
use crate::query::with_query;
use crate::stream::ByteStream;

impl Client {
    /// Running and latest published versions.
    ///
    /// `GET /api/version`
    pub async fn check_version(&self) -> Result<ApiResponse<Version>, Error> {
        self.get("version").await
    }

    /// Ask the server to update itself and stream the installer output.
    ///
    /// `PUT /api/version/update`
    pub async fn update_version(
        &self,
        opts: Option<&VersionUpdateOptions>,
    ) -> Result<ApiResponse<ByteStream>, Error> {
        debug!(?opts, "requesting server update");
        let path = with_query("version/update", opts)?;
        self.request_stream(Method::PUT, &path).await
    }
}
