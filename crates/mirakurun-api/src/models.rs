// Mirakurun API entity and option types
//
// Entities are plain projections of the server's JSON. Wire fields the
// server may omit are `Option` (or default-empty collections) and are
// skipped again on serialization, so PUT bodies carry only what was set.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::query::{bool_as_int, is_false};
use crate::timestamp::Timestamp;

// ── Enumerations ────────────────────────────────────────────────────

/// Broadcast network type. Upper-case on the wire and in URL paths.
///
/// Closed set: a value outside `GR`/`BS`/`CS`/`SKY` fails decoding of the
/// whole response with [`Error::Deserialization`](crate::Error::Deserialization).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "UPPERCASE")]
#[strum(serialize_all = "UPPERCASE", ascii_case_insensitive)]
pub enum ChannelType {
    /// Terrestrial.
    Gr,
    /// BS satellite.
    Bs,
    /// CS (110°) satellite.
    Cs,
    /// SKY PerfecTV! premium.
    Sky,
}

/// Resource kind carried by an [`Event`].
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum EventResource {
    Program,
    Service,
    Tuner,
}

/// Change kind carried by an [`Event`].
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum EventType {
    Create,
    Update,
    Remove,
}

// ── Channels and services ───────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Channel {
    #[serde(rename = "type")]
    pub channel_type: ChannelType,
    pub channel: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Satellite transponder name. The server spells the key `satelite`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub satelite: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub space: Option<i64>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub services: Vec<Service>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Service {
    /// Mirakurun-wide identifier, `networkId * 100000 + serviceId`.
    pub id: u64,
    pub service_id: u16,
    pub network_id: u16,
    #[serde(default)]
    pub name: String,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub service_type: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logo_id: Option<i32>,
    #[serde(default)]
    pub has_logo_data: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remote_control_key_id: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub channel: Option<Channel>,
}

// ── Programs ────────────────────────────────────────────────────────

/// One EPG entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Program {
    pub id: u64,
    pub event_id: u16,
    pub service_id: u16,
    pub network_id: u16,
    pub start_at: Timestamp,
    /// Length in milliseconds.
    pub duration: u64,
    #[serde(default)]
    pub is_free: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub genres: Vec<ProgramGenre>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video: Option<ProgramVideo>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audio: Option<ProgramAudio>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub series: Option<ProgramSeries>,
    /// Extended descriptor items, in broadcast order.
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub extended: IndexMap<String, String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub related_items: Vec<ProgramRelatedItem>,
}

impl Program {
    /// Scheduled end time, `start_at + duration`.
    pub fn end_at(&self) -> Option<Timestamp> {
        let ms = i64::try_from(self.duration).ok()?;
        Timestamp::from_millis(self.start_at.as_millis().checked_add(ms)?)
    }
}

/// ARIB content descriptor nibbles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgramGenre {
    pub lv1: u8,
    pub lv2: u8,
    pub un1: u8,
    pub un2: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgramVideo {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub video_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resolution: Option<String>,
    #[serde(default)]
    pub stream_content: u8,
    #[serde(default)]
    pub component_type: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgramAudio {
    #[serde(default)]
    pub sampling_rate: u32,
    #[serde(default)]
    pub component_type: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgramSeries {
    pub id: u16,
    #[serde(default)]
    pub repeat: u8,
    #[serde(default)]
    pub pattern: u8,
    pub expires_at: Timestamp,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub episode: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_episode: Option<u16>,
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgramRelatedItem {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub network_id: Option<u16>,
    pub service_id: u16,
    pub event_id: u16,
}

// ── Tuners ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TunerDevice {
    pub index: u32,
    pub name: String,
    #[serde(default)]
    pub types: Vec<ChannelType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub command: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pid: Option<u32>,
    #[serde(default)]
    pub users: Vec<TunerUser>,
    #[serde(default)]
    pub is_available: bool,
    #[serde(default)]
    pub is_free: bool,
    #[serde(default)]
    pub is_using: bool,
    #[serde(default)]
    pub is_fault: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TunerUser {
    pub id: String,
    pub priority: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub agent: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TunerProcess {
    pub pid: u32,
}

// ── Events ──────────────────────────────────────────────────────────

/// A change notification from `/events` or `/events/stream`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub resource: EventResource,
    #[serde(rename = "type")]
    pub event_type: EventType,
    /// The affected record; its shape depends on `resource`.
    #[serde(default)]
    pub data: serde_json::Value,
    pub time: Timestamp,
}

// ── Server-side configuration ───────────────────────────────────────

/// One entry of `config/channels`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelConfig {
    pub name: String,
    #[serde(rename = "type")]
    pub channel_type: ChannelType,
    pub channel: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub satelite: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_id: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub space: Option<i64>,
    #[serde(default, skip_serializing_if = "is_false")]
    pub is_disabled: bool,
}

/// `config/server`. Sent back as-is; the server validates.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,
    #[serde(rename = "disableIPv6", default, skip_serializing_if = "Option::is_none")]
    pub disable_ipv6: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_level: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_log_history: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub high_water_mark: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub overflow_time_limit: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_buffer_bytes_before_ready: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event_end_timeout: Option<u64>,
    #[serde(rename = "programGCInterval", default, skip_serializing_if = "Option::is_none")]
    pub program_gc_interval: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub epg_gathering_interval: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub epg_retrieval_time: Option<u64>,
}

/// One entry of `config/tuners`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TunerConfig {
    pub name: String,
    #[serde(default)]
    pub types: Vec<ChannelType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub command: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dvb_device_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub decoder: Option<String>,
    #[serde(default, skip_serializing_if = "is_false")]
    pub is_disabled: bool,
}

// ── Status, version, restart ────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Status {
    pub version: String,
    pub process: ProcessStatus,
    pub epg: EpgStatus,
    #[serde(default)]
    pub stream_count: IndexMap<String, u64>,
    #[serde(default)]
    pub error_count: IndexMap<String, u64>,
    #[serde(default)]
    pub timer_accuracy: TimerAccuracy,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessStatus {
    pub arch: String,
    pub platform: String,
    #[serde(default)]
    pub versions: IndexMap<String, String>,
    pub pid: u32,
    #[serde(default)]
    pub memory_usage: IndexMap<String, u64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EpgStatus {
    #[serde(default)]
    pub gathering_networks: Vec<u16>,
    #[serde(default)]
    pub stored_events: u64,
}

/// Event-loop timer drift, last sample plus 1/5/15 minute summaries.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TimerAccuracy {
    #[serde(default)]
    pub last: f64,
    #[serde(default)]
    pub m1: IndexMap<String, f64>,
    #[serde(default)]
    pub m5: IndexMap<String, f64>,
    #[serde(default)]
    pub m15: IndexMap<String, f64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Version {
    pub current: String,
    pub latest: String,
}

impl Version {
    /// Whether the server reports a newer release than the running one.
    pub fn is_update_available(&self) -> bool {
        !self.latest.is_empty() && self.current != self.latest
    }
}

/// Body of the 202 answer to `PUT /restart`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RestartResponse {
    #[serde(rename = "_cmd_pid")]
    pub pid: u32,
}

// ── Query options ───────────────────────────────────────────────────

/// Filters for `GET channels` and `GET channels/{type}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ChannelsListOptions {
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub channel_type: Option<ChannelType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub channel: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// Filters for `GET services`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ServicesListOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service_id: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub network_id: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub service_type: Option<u8>,
    #[serde(rename = "channel.type", skip_serializing_if = "Option::is_none")]
    pub channel_type: Option<ChannelType>,
    #[serde(rename = "channel.channel", skip_serializing_if = "Option::is_none")]
    pub channel: Option<String>,
}

/// Filters for `GET programs`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgramsListOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub network_id: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service_id: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event_id: Option<u16>,
}

/// Filters for `GET events/stream`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct EventsListOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource: Option<EventResource>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub event_type: Option<EventType>,
}

/// Parameters for `PUT config/channels/scan`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ChannelScanOptions {
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub channel_type: Option<ChannelType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max: Option<u32>,
}

/// Parameters for `PUT version/update`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct VersionUpdateOptions {
    #[serde(skip_serializing_if = "is_false")]
    pub force: bool,
}

/// Decoder toggle for the transport-stream endpoints. Sent as `decode=1`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DecodeOptions {
    #[serde(serialize_with = "bool_as_int", skip_serializing_if = "is_false")]
    pub decode: bool,
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    #[test]
    fn channel_type_parses_case_insensitively() {
        assert_eq!("gr".parse::<ChannelType>().unwrap(), ChannelType::Gr);
        assert_eq!("SKY".parse::<ChannelType>().unwrap(), ChannelType::Sky);
        assert_eq!(ChannelType::Bs.to_string(), "BS");
        assert!("UHF".parse::<ChannelType>().is_err());
    }

    #[test]
    fn unknown_channel_type_fails_the_list() {
        let raw = r#"[
            { "type": "GR", "channel": "16", "name": "TOKYO MX" },
            { "type": "UHF", "channel": "27", "name": "NHK" }
        ]"#;
        assert!(serde_json::from_str::<Vec<Channel>>(raw).is_err());
    }

    #[test]
    fn service_with_embedded_channel() {
        let svc: Service = serde_json::from_value(json!({
            "id": 3_239_123_608_u64,
            "serviceId": 23608,
            "networkId": 32391,
            "name": "TOKYO MX1",
            "type": 1,
            "logoId": 0,
            "hasLogoData": true,
            "remoteControlKeyId": 9,
            "channel": { "type": "GR", "channel": "16" }
        }))
        .unwrap();

        assert_eq!(svc.id, 3_239_123_608);
        assert_eq!(svc.name, "TOKYO MX1");
        let ch = svc.channel.unwrap();
        assert_eq!(ch.channel_type, ChannelType::Gr);
        assert_eq!(ch.channel, "16");
        assert!(ch.services.is_empty());
    }

    #[test]
    fn program_keeps_extended_order_and_end_time() {
        let raw = r#"{
            "id": 323912360812345,
            "eventId": 12345,
            "serviceId": 23608,
            "networkId": 32391,
            "startAt": 1514764800000,
            "duration": 1800000,
            "isFree": true,
            "name": "News",
            "extended": { "出演者": "A", "番組内容": "B", "あらすじ": "C" }
        }"#;
        let program: Program = serde_json::from_str(raw).unwrap();

        let keys: Vec<_> = program.extended.keys().map(String::as_str).collect();
        assert_eq!(keys, ["出演者", "番組内容", "あらすじ"]);
        assert_eq!(
            program.end_at().unwrap().0.to_rfc3339(),
            "2018-01-01T00:30:00+00:00"
        );
        assert!(program.genres.is_empty());
    }

    #[test]
    fn server_config_omits_unset_fields() {
        let cfg = ServerConfig {
            port: Some(40772),
            disable_ipv6: Some(true),
            program_gc_interval: Some(900_000),
            ..ServerConfig::default()
        };
        let value = serde_json::to_value(&cfg).unwrap();
        assert_eq!(
            value,
            json!({ "port": 40772, "disableIPv6": true, "programGCInterval": 900_000 })
        );
    }

    #[test]
    fn restart_response_reads_cmd_pid() {
        let res: RestartResponse = serde_json::from_str(r#"{"_cmd_pid":4242}"#).unwrap();
        assert_eq!(res.pid, 4242);
    }

    #[test]
    fn event_decodes_arbitrary_data() {
        let event: Event = serde_json::from_value(json!({
            "resource": "tuner",
            "type": "update",
            "data": { "index": 0 },
            "time": 1_514_764_800_000_i64
        }))
        .unwrap();
        assert_eq!(event.resource, EventResource::Tuner);
        assert_eq!(event.event_type, EventType::Update);
        assert_eq!(event.data["index"], 0);
    }

    #[test]
    fn version_update_available() {
        let v = Version {
            current: "3.9.0".into(),
            latest: "3.9.1".into(),
        };
        assert!(v.is_update_available());
    }
}
