// Integration tests for `Client` using wiremock.

#![allow(clippy::unwrap_used)]

use std::time::Duration;

use futures_util::TryStreamExt;
use pretty_assertions::assert_eq;
use serde_json::json;
use tokio_util::sync::CancellationToken;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, Request, Respond, ResponseTemplate};

use mirakurun_api::{
    ChannelScanOptions, ChannelType, ChannelsListOptions, Client, Error, EventResource,
    ServerConfig, ServicesListOptions, VersionUpdateOptions, cancellable,
};

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup() -> (MockServer, Client) {
    let server = MockServer::start().await;
    let client = Client::builder()
        .base_url(format!("{}/api/", server.uri()))
        .build()
        .unwrap();
    (server, client)
}

/// Answers with the request body, like a server that stores and returns it.
struct Echo;

impl Respond for Echo {
    fn respond(&self, request: &Request) -> ResponseTemplate {
        ResponseTemplate::new(200)
            .insert_header("content-type", "application/json; charset=utf-8")
            .set_body_bytes(request.body.clone())
    }
}

fn tokyo_mx_service() -> serde_json::Value {
    json!({
        "id": 3_239_123_608_u64,
        "serviceId": 23608,
        "networkId": 32391,
        "name": "TOKYO MX1",
        "type": 1,
        "logoId": 5,
        "hasLogoData": true,
        "remoteControlKeyId": 9,
        "channel": { "type": "GR", "channel": "16" }
    })
}

// ── Channels and services ───────────────────────────────────────────

#[tokio::test]
async fn test_get_channels() {
    let (server, client) = setup().await;

    let body = json!([
        { "type": "GR", "channel": "16", "name": "TOKYO MX", "services": [tokyo_mx_service()] }
    ]);

    Mock::given(method("GET"))
        .and(path("/api/channels"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .mount(&server)
        .await;

    let resp = client.get_channels(None).await.unwrap();

    assert_eq!(resp.status.as_u16(), 200);
    assert_eq!(resp.data.len(), 1);
    assert_eq!(resp.data[0].name.as_deref(), Some("TOKYO MX"));
    assert_eq!(resp.data[0].channel_type, ChannelType::Gr);
    assert_eq!(resp.data[0].services[0].id, 3_239_123_608);
}

#[tokio::test]
async fn test_default_options_send_no_query_string() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/services"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    client
        .get_services(Some(&ServicesListOptions::default()))
        .await
        .unwrap();

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].url.query(), None);
}

#[tokio::test]
async fn test_channel_filters_are_encoded() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/channels/BS"))
        .and(query_param("name", "NHK"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let opts = ChannelsListOptions {
        name: Some("NHK".into()),
        ..ChannelsListOptions::default()
    };
    let resp = client
        .get_channels_by_type(ChannelType::Bs, Some(&opts))
        .await
        .unwrap();

    assert!(resp.data.is_empty());
}

#[tokio::test]
async fn test_get_service_sends_standard_headers() {
    let server = MockServer::start().await;
    let client = Client::builder()
        .base_url(format!("{}/api/", server.uri()))
        .priority(3)
        .user_agent("recorder/1.0")
        .build()
        .unwrap();

    Mock::given(method("GET"))
        .and(path("/api/services/3239123608"))
        .and(header("x-mirakurun-priority", "3"))
        .respond_with(ResponseTemplate::new(200).set_body_json(tokyo_mx_service()))
        .mount(&server)
        .await;

    let service = client.get_service(3_239_123_608).await.unwrap().into_data();
    assert_eq!(service.name, "TOKYO MX1");
    assert_eq!(service.service_id, 23608);

    let requests = server.received_requests().await.unwrap();
    let agent = requests[0].headers.get("user-agent").unwrap().to_str().unwrap();
    assert!(agent.starts_with("recorder/1.0 mirakurun-rs/"));
}

#[tokio::test]
async fn test_get_service_by_channel() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/channels/GR/16/services/23608"))
        .respond_with(ResponseTemplate::new(200).set_body_json(tokyo_mx_service()))
        .mount(&server)
        .await;

    let service = client
        .get_service_by_channel(ChannelType::Gr, "16", 23608)
        .await
        .unwrap()
        .into_data();
    assert_eq!(service.network_id, 32391);
}

// ── Streams ─────────────────────────────────────────────────────────

#[tokio::test]
async fn test_service_stream_passes_bytes_through() {
    let (server, client) = setup().await;

    let packet = vec![0x47_u8; 188 * 4];
    Mock::given(method("GET"))
        .and(path("/api/services/3239123608/stream"))
        .and(query_param("decode", "1"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "video/MP2T")
                .set_body_bytes(packet.clone()),
        )
        .mount(&server)
        .await;

    let resp = client.get_service_stream(3_239_123_608, true).await.unwrap();
    assert_eq!(resp.content_type(), Some("video/MP2T"));

    let mut out = Vec::new();
    let n = resp.data.copy_to(&mut out).await.unwrap();
    assert_eq!(n, 752);
    assert_eq!(out, packet);
}

#[tokio::test]
async fn test_stream_without_decode_omits_query() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/programs/323912360812345/stream"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "video/MP2T")
                .set_body_bytes(vec![0x47_u8; 188]),
        )
        .mount(&server)
        .await;

    client
        .get_program_stream(323_912_360_812_345, false)
        .await
        .unwrap();

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests[0].url.query(), None);
}

#[tokio::test]
async fn test_stream_content_type_mismatch() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/channels/GR/16/services/23608/stream"))
        .respond_with(ResponseTemplate::new(200).set_body_raw("{}", "application/json"))
        .mount(&server)
        .await;

    let result = client
        .get_service_stream_by_channel(ChannelType::Gr, "16", 23608, false)
        .await;

    match result {
        Err(Error::ContentType { expected, actual }) => {
            assert_eq!(expected, "video/MP2T");
            assert_eq!(actual, "application/json");
        }
        other => panic!("expected ContentType error, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_program_stream_rejects_non_ts_body() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/programs/323912360812345/stream"))
        .and(query_param("decode", "1"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw(r#"{"reason":"no tuner"}"#, "application/json; charset=UTF-8"),
        )
        .mount(&server)
        .await;

    let err = client
        .get_program_stream(323_912_360_812_345, true)
        .await
        .unwrap_err();

    match err {
        Error::ContentType { expected, actual } => {
            assert_eq!(expected, "video/MP2T");
            assert_eq!(actual, "application/json; charset=UTF-8");
        }
        other => panic!("expected ContentType error, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_channel_scan_streams_progress() {
    let (server, client) = setup().await;

    Mock::given(method("PUT"))
        .and(path("/api/config/channels/scan"))
        .and(query_param("type", "GR"))
        .and(query_param("min", "13"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "text/plain; charset=utf-8")
                .set_body_string("channel scanning... (type: \"GR\")\n"),
        )
        .mount(&server)
        .await;

    let opts = ChannelScanOptions {
        channel_type: Some(ChannelType::Gr),
        min: Some(13),
        max: None,
    };
    let resp = client.channel_scan(Some(&opts)).await.unwrap();
    assert_eq!(resp.status.as_u16(), 200);

    let text = resp.data.collect().await.unwrap();
    assert!(text.starts_with(b"channel scanning"));
}

#[tokio::test]
async fn test_events_stream_opens() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/events/stream"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "application/json")
                .set_body_string("["),
        )
        .mount(&server)
        .await;

    let resp = client.get_events_stream(None).await.unwrap();
    assert_eq!(resp.status.as_u16(), 200);
}

#[tokio::test]
async fn test_watch_events_decodes_lines() {
    let (server, client) = setup().await;

    let body = concat!(
        "[\n",
        r#"{"resource":"program","type":"create","data":{"id":1},"time":1514764800000}"#,
        "\n,\n",
        r#"{"resource":"tuner","type":"update","data":{"index":0},"time":1514764801000}"#,
        "\n",
    );
    Mock::given(method("GET"))
        .and(path("/api/events/stream"))
        .and(query_param("resource", "program"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "application/json")
                .set_body_string(body),
        )
        .mount(&server)
        .await;

    let opts = mirakurun_api::EventsListOptions {
        resource: Some(EventResource::Program),
        event_type: None,
    };
    let events: Vec<_> = client
        .watch_events(Some(&opts))
        .await
        .unwrap()
        .data
        .try_collect()
        .await
        .unwrap();

    assert_eq!(events.len(), 2);
    assert_eq!(events[0].resource, EventResource::Program);
    assert_eq!(events[1].time.as_millis(), 1_514_764_801_000);
}

// ── Programs ────────────────────────────────────────────────────────

#[tokio::test]
async fn test_get_program_decodes_timestamps() {
    let (server, client) = setup().await;

    let body = json!({
        "id": 323_912_360_812_345_u64,
        "eventId": 12345,
        "serviceId": 23608,
        "networkId": 32391,
        "startAt": 1_514_764_800_000_i64,
        "duration": 3_600_000,
        "isFree": true,
        "name": "Morning News",
        "genres": [{ "lv1": 0, "lv2": 1, "un1": 15, "un2": 15 }],
        "series": {
            "id": 100, "repeat": 0, "pattern": 1,
            "expiresAt": 1_546_300_800_000_i64,
            "episode": 3, "lastEpisode": 12, "name": "News"
        }
    });

    Mock::given(method("GET"))
        .and(path("/api/programs/323912360812345"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .mount(&server)
        .await;

    let program = client
        .get_program(323_912_360_812_345)
        .await
        .unwrap()
        .into_data();

    assert_eq!(program.start_at.0.to_rfc3339(), "2018-01-01T00:00:00+00:00");
    assert_eq!(program.genres[0].un1, 15);
    let series = program.series.unwrap();
    assert_eq!(series.expires_at.0.to_rfc3339(), "2019-01-01T00:00:00+00:00");
    assert_eq!(series.episode, Some(3));
}

// ── Configuration and control ───────────────────────────────────────

#[tokio::test]
async fn test_update_server_config_round_trip() {
    let (server, client) = setup().await;

    let config = ServerConfig {
        path: Some("/var/run/mirakurun.sock".into()),
        port: Some(40772),
        log_level: Some(2),
        ..ServerConfig::default()
    };

    Mock::given(method("PUT"))
        .and(path("/api/config/server"))
        .and(header("content-type", "application/json; charset=UTF-8"))
        .and(body_json(json!({
            "path": "/var/run/mirakurun.sock",
            "port": 40772,
            "logLevel": 2
        })))
        .respond_with(Echo)
        .mount(&server)
        .await;

    let echoed = client.update_server_config(&config).await.unwrap().into_data();
    assert_eq!(echoed, config);
}

#[tokio::test]
async fn test_restart_accepted() {
    let (server, client) = setup().await;

    Mock::given(method("PUT"))
        .and(path("/api/restart"))
        .respond_with(ResponseTemplate::new(202).set_body_json(json!({ "_cmd_pid": 4242 })))
        .mount(&server)
        .await;

    let resp = client.restart().await.unwrap();
    assert_eq!(resp.status.as_u16(), 202);
    assert_eq!(resp.data.pid, 4242);
}

#[tokio::test]
async fn test_kill_tuner_process() {
    let (server, client) = setup().await;

    Mock::given(method("DELETE"))
        .and(path("/api/tuners/1/process"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "pid": 31337 })))
        .expect(1)
        .mount(&server)
        .await;

    let process = client.kill_tuner_process(1).await.unwrap().into_data();
    assert_eq!(process.pid, 31337);
}

#[tokio::test]
async fn test_update_version_force() {
    let (server, client) = setup().await;

    Mock::given(method("PUT"))
        .and(path("/api/version/update"))
        .and(query_param("force", "true"))
        .respond_with(ResponseTemplate::new(202).set_body_string("updating...\n"))
        .mount(&server)
        .await;

    let resp = client
        .update_version(Some(&VersionUpdateOptions { force: true }))
        .await
        .unwrap();
    assert_eq!(resp.status.as_u16(), 202);
}

#[tokio::test]
async fn test_get_log_buffers_text() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/log"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "text/plain; charset=utf-8")
                .set_body_string("2018-01-01T00:00:00.000Z info: ready\n"),
        )
        .mount(&server)
        .await;

    let log = client.get_log().await.unwrap().into_data();
    assert!(log.ends_with(b"info: ready\n"));
}

// ── Error paths ─────────────────────────────────────────────────────

#[tokio::test]
async fn test_not_found_is_api_error() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/programs/1"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "code": 404,
            "reason": "Not Found",
            "errors": []
        })))
        .mount(&server)
        .await;

    let err = client.get_program(1).await.unwrap_err();
    assert!(err.is_not_found());

    match err {
        Error::Api { status, message } => {
            assert_eq!(status, 404);
            assert!(message.contains("404"), "message: {message}");
        }
        other => panic!("expected Api error, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_no_content_is_outside_success_range() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/status"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;

    let err = client.get_status().await.unwrap_err();
    assert_eq!(err.status(), Some(204));
}

#[tokio::test]
async fn test_invalid_json_is_deserialization_error() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/version"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let result = client.check_version().await;
    match result {
        Err(Error::Deserialization { body, .. }) => assert_eq!(body, "not json"),
        other => panic!("expected Deserialization error, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_cancellation_token_aborts_request() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/tuners"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([]))
                .set_delay(Duration::from_secs(30)),
        )
        .mount(&server)
        .await;

    let token = CancellationToken::new();
    let trigger = token.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(100)).await;
        trigger.cancel();
    });

    let result = cancellable(&token, client.get_tuners()).await;
    let err = result.unwrap_err();
    assert!(matches!(err, Error::Cancelled));
    assert!(err.is_transport());
}

#[tokio::test]
async fn test_timeout_is_transport_error() {
    let server = MockServer::start().await;
    let client = Client::builder()
        .base_url(format!("{}/api/", server.uri()))
        .timeout(Duration::from_millis(200))
        .build()
        .unwrap();

    Mock::given(method("GET"))
        .and(path("/api/status"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(5)))
        .mount(&server)
        .await;

    let err = client.get_status().await.unwrap_err();
    assert!(matches!(err, Error::Transport(_)));
    assert!(err.is_timeout());
}
