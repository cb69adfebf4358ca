// Service endpoints

use reqwest::Method;
use tracing::debug;

use crate::client::{ApiResponse, Client};
use crate::error::Error;
use crate::models::{Service, ServicesListOptions};
use crate::query::with_query;
use crate::stream::ByteStream;

impl Client {
    /// List services, optionally filtered.
    ///
    /// `GET /api/services`
    pub async fn get_services(
        &self,
        opts: Option<&ServicesListOptions>,
    ) -> Result<ApiResponse<Vec<Service>>, Error> {
        debug!(?opts, "listing services");
        let path = with_query("services", opts)?;
        self.get(&path).await
    }

    /// `GET /api/services/{id}`
    pub async fn get_service(&self, id: u64) -> Result<ApiResponse<Service>, Error> {
        self.get(&format!("services/{id}")).await
    }

    /// Fetch the broadcast logo (PNG) as a stream.
    ///
    /// `GET /api/services/{id}/logo`
    pub async fn get_logo_image(&self, id: u64) -> Result<ApiResponse<ByteStream>, Error> {
        debug!(id, "fetching service logo");
        self.request_stream(Method::GET, &format!("services/{id}/logo"))
            .await
    }

    /// Open a live transport stream for a service.
    ///
    /// `GET /api/services/{id}/stream`
    pub async fn get_service_stream(
        &self,
        id: u64,
        decode: bool,
    ) -> Result<ApiResponse<ByteStream>, Error> {
        debug!(id, decode, "opening service stream");
        self.get_ts(&format!("services/{id}/stream"), decode).await
    }
}
