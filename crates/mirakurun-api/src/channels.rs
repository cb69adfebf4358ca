// Channel endpoints
//
// Channel listing and lookup, plus the per-channel service views that live
// under `channels/{type}/{channel}`.

use tracing::debug;

use crate::client::{ApiResponse, Client};
use crate::error::Error;
use crate::models::{Channel, ChannelType, ChannelsListOptions, Service};
use crate::query::with_query;
use crate::stream::ByteStream;

impl Client {
    /// List channels, optionally filtered.
    ///
    /// `GET /api/channels`
    pub async fn get_channels(
        &self,
        opts: Option<&ChannelsListOptions>,
    ) -> Result<ApiResponse<Vec<Channel>>, Error> {
        debug!(?opts, "listing channels");
        let path = with_query("channels", opts)?;
        self.get(&path).await
    }

    /// List channels of one type.
    ///
    /// `GET /api/channels/{type}`
    pub async fn get_channels_by_type(
        &self,
        channel_type: ChannelType,
        opts: Option<&ChannelsListOptions>,
    ) -> Result<ApiResponse<Vec<Channel>>, Error> {
        debug!(%channel_type, ?opts, "listing channels by type");
        let path = with_query(&format!("channels/{channel_type}"), opts)?;
        self.get(&path).await
    }

    /// `GET /api/channels/{type}/{channel}`
    pub async fn get_channel(
        &self,
        channel_type: ChannelType,
        channel: &str,
    ) -> Result<ApiResponse<Channel>, Error> {
        self.get(&format!("channels/{channel_type}/{channel}")).await
    }

    /// Services carried on one channel.
    ///
    /// `GET /api/channels/{type}/{channel}/services`
    pub async fn get_services_by_channel(
        &self,
        channel_type: ChannelType,
        channel: &str,
    ) -> Result<ApiResponse<Vec<Service>>, Error> {
        debug!(%channel_type, channel, "listing services by channel");
        self.get(&format!("channels/{channel_type}/{channel}/services"))
            .await
    }

    /// `GET /api/channels/{type}/{channel}/services/{sid}`
    pub async fn get_service_by_channel(
        &self,
        channel_type: ChannelType,
        channel: &str,
        service_id: u16,
    ) -> Result<ApiResponse<Service>, Error> {
        self.get(&format!(
            "channels/{channel_type}/{channel}/services/{service_id}"
        ))
        .await
    }

    /// Open a live transport stream for a service addressed by channel.
    ///
    /// `GET /api/channels/{type}/{channel}/services/{sid}/stream`
    ///
    /// Holds a tuner until the returned stream is dropped.
    pub async fn get_service_stream_by_channel(
        &self,
        channel_type: ChannelType,
        channel: &str,
        service_id: u16,
        decode: bool,
    ) -> Result<ApiResponse<ByteStream>, Error> {
        debug!(%channel_type, channel, service_id, decode, "opening service stream");
        self.get_ts(
            &format!("channels/{channel_type}/{channel}/services/{service_id}/stream"),
            decode,
        )
        .await
    }
}
