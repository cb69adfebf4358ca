// Server-side configuration endpoints
//
// `config/channels`, `config/server` and `config/tuners` are read and
// replaced whole. The server validates PUT bodies; nothing is checked here.

use reqwest::Method;
use tracing::debug;

use crate::client::{ApiResponse, Client};
use crate::error::Error;
use crate::models::{ChannelConfig, ChannelScanOptions, ServerConfig, TunerConfig};
use crate::query::with_query;
use crate::stream::ByteStream;

impl Client {
    // ── Channels ─────────────────────────────────────────────────────

    /// `GET /api/config/channels`
    pub async fn get_channels_config(&self) -> Result<ApiResponse<Vec<ChannelConfig>>, Error> {
        self.get("config/channels").await
    }

    /// Replace the channel list.
    ///
    /// `PUT /api/config/channels`
    pub async fn update_channels_config(
        &self,
        channels: &[ChannelConfig],
    ) -> Result<ApiResponse<Vec<ChannelConfig>>, Error> {
        debug!(count = channels.len(), "updating channels config");
        self.put("config/channels", Some(channels)).await
    }

    /// Start a channel scan and stream its text progress log.
    ///
    /// `PUT /api/config/channels/scan`
    pub async fn channel_scan(
        &self,
        opts: Option<&ChannelScanOptions>,
    ) -> Result<ApiResponse<ByteStream>, Error> {
        debug!(?opts, "starting channel scan");
        let path = with_query("config/channels/scan", opts)?;
        self.request_stream(Method::PUT, &path).await
    }

    // ── Server ───────────────────────────────────────────────────────

    /// `GET /api/config/server`
    pub async fn get_server_config(&self) -> Result<ApiResponse<ServerConfig>, Error> {
        self.get("config/server").await
    }

    /// `PUT /api/config/server`
    pub async fn update_server_config(
        &self,
        config: &ServerConfig,
    ) -> Result<ApiResponse<ServerConfig>, Error> {
        debug!("updating server config");
        self.put("config/server", Some(config)).await
    }

    // ── Tuners ───────────────────────────────────────────────────────

    /// `GET /api/config/tuners`
    pub async fn get_tuners_config(&self) -> Result<ApiResponse<Vec<TunerConfig>>, Error> {
        self.get("config/tuners").await
    }

    /// `PUT /api/config/tuners`
    pub async fn update_tuners_config(
        &self,
        tuners: &[TunerConfig],
    ) -> Result<ApiResponse<Vec<TunerConfig>>, Error> {
        debug!(count = tuners.len(), "updating tuners config");
        self.put("config/tuners", Some(tuners)).await
    }
}
