//! `Connection` against a recording transport.
//!
//! Each test queues canned responses, runs one operation and checks the
//! exact request that reached the transport.

use std::collections::VecDeque;
use std::sync::Mutex;

use civo_core::{
    ApiError, CivoClient, Connection, HttpMethod, HttpRequest, HttpResponse, LookupError, Transport,
    VolumeConfig, WebhookConfig,
};

#[derive(Default)]
struct RecordingTransport {
    responses: Mutex<VecDeque<Result<HttpResponse, ApiError>>>,
    requests: Mutex<Vec<HttpRequest>>,
}

impl RecordingTransport {
    fn reply(self, status: u16, body: &str) -> Self {
        self.responses.lock().unwrap().push_back(Ok(HttpResponse {
            status,
            headers: Vec::new(),
            body: body.to_string(),
        }));
        self
    }

    fn fail(self, message: &str) -> Self {
        self.responses
            .lock()
            .unwrap()
            .push_back(Err(ApiError::TransportError(message.to_string())));
        self
    }

    fn only_request(&self) -> HttpRequest {
        let requests = self.requests.lock().unwrap();
        assert_eq!(requests.len(), 1, "expected exactly one request");
        requests[0].clone()
    }
}

impl Transport for RecordingTransport {
    fn execute(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        self.requests.lock().unwrap().push(request);
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .expect("no canned response left")
    }
}

fn connect(transport: &RecordingTransport) -> Connection<&RecordingTransport> {
    Connection::new(CivoClient::new("https://api.civo.test", "key"), transport)
}

const VOLUMES: &str = r#"[
    {"id":"a1b2","name":"web-root","instance_id":null,"mountpoint":null,"size_gb":10,"bootable":true,"created_at":"2024-05-01T12:00:00Z"},
    {"id":"c3d4","name":"db-data","instance_id":"inst-1","mountpoint":"/mnt/db","size_gb":50,"bootable":false,"created_at":"2024-05-02T12:00:00Z"},
    {"id":"e5f6","name":"db-logs","instance_id":null,"mountpoint":null,"size_gb":5,"bootable":false,"created_at":"2024-05-03T12:00:00Z"}
]"#;

#[test]
fn list_volumes_preserves_order() {
    let transport = RecordingTransport::default().reply(200, VOLUMES);
    let volumes = connect(&transport).list_volumes().unwrap();

    let ids: Vec<&str> = volumes.iter().map(|v| v.id.as_str()).collect();
    assert_eq!(ids, ["a1b2", "c3d4", "e5f6"]);
    assert_eq!(volumes[1].size_gb, 50);

    let req = transport.only_request();
    assert_eq!(req.method, HttpMethod::Get);
    assert_eq!(req.path, "https://api.civo.test/v2/volumes");
}

#[test]
fn find_volume_returns_single_match() {
    let transport = RecordingTransport::default().reply(200, VOLUMES);
    let volume = connect(&transport).find_volume("web").unwrap();
    assert_eq!(volume.id, "a1b2");
    assert_eq!(transport.only_request().path, "https://api.civo.test/v2/volumes");
}

#[test]
fn find_volume_matches_by_id_fragment() {
    let transport = RecordingTransport::default().reply(200, VOLUMES);
    let volume = connect(&transport).find_volume("d4").unwrap();
    assert_eq!(volume.name, "db-data");
}

#[test]
fn find_volume_zero_matches() {
    let transport = RecordingTransport::default().reply(200, VOLUMES);
    let err = connect(&transport).find_volume("cache").unwrap_err();
    assert!(matches!(
        err,
        ApiError::LookupError(LookupError::ZeroMatches { ref term }) if term == "cache"
    ));
    assert!(err.to_string().contains("cache"));
}

#[test]
fn find_volume_ambiguous_match() {
    let transport = RecordingTransport::default().reply(200, VOLUMES);
    let err = connect(&transport).find_volume("db").unwrap_err();
    assert!(matches!(
        err,
        ApiError::LookupError(LookupError::AmbiguousMatch { ref term }) if term == "db"
    ));
}

#[test]
fn find_volume_forwards_transport_errors() {
    let transport = RecordingTransport::default().fail("connection refused");
    let err = connect(&transport).find_volume("db").unwrap_err();
    assert!(matches!(err, ApiError::TransportError(ref msg) if msg == "connection refused"));
}

#[test]
fn new_volume_posts_config() {
    let transport =
        RecordingTransport::default().reply(200, r#"{"id":"v-9","name":"scratch","result":"success"}"#);
    let result = connect(&transport)
        .new_volume(&VolumeConfig {
            name: "scratch".to_string(),
            size_gb: 15,
            bootable: false,
        })
        .unwrap();
    assert_eq!(result.id, "v-9");

    let req = transport.only_request();
    assert_eq!(req.method, HttpMethod::Post);
    assert_eq!(req.path, "https://api.civo.test/v2/volumes/");
    assert_eq!(req.header("authorization"), Some("bearer key"));
}

#[test]
fn resize_volume_sends_size() {
    let transport = RecordingTransport::default().reply(200, r#"{"id":"vol-1","result":"success"}"#);
    let ack = connect(&transport).resize_volume("vol-1", 100).unwrap();
    assert!(ack.is_success());
    assert_eq!(ack.id, "vol-1");

    let req = transport.only_request();
    assert_eq!(req.method, HttpMethod::Put);
    assert_eq!(req.path, "https://api.civo.test/v2/volumes/vol-1/resize");
    assert_eq!(req.body.as_deref(), Some(r#"{"size_gb":100}"#));
}

#[test]
fn attach_volume_sends_instance() {
    let transport = RecordingTransport::default().reply(200, r#"{"result":"success"}"#);
    connect(&transport).attach_volume("vol-1", "inst-9").unwrap();

    let req = transport.only_request();
    assert_eq!(req.method, HttpMethod::Put);
    assert_eq!(req.path, "https://api.civo.test/v2/volumes/vol-1/attach");
    assert_eq!(req.body.as_deref(), Some(r#"{"instance_id":"inst-9"}"#));
}

#[test]
fn detach_volume_sends_no_body() {
    let transport = RecordingTransport::default().reply(200, r#"{"result":"success"}"#);
    connect(&transport).detach_volume("vol-1").unwrap();

    let req = transport.only_request();
    assert_eq!(req.method, HttpMethod::Put);
    assert_eq!(req.path, "https://api.civo.test/v2/volumes/vol-1/detach");
    assert!(req.body.is_none());
}

#[test]
fn delete_volume_surfaces_http_errors() {
    let transport = RecordingTransport::default().reply(500, "boom");
    let err = connect(&transport).delete_volume("vol-1").unwrap_err();
    assert!(matches!(err, ApiError::HttpError { status: 500, ref body } if body == "boom"));
    assert_eq!(transport.only_request().method, HttpMethod::Delete);
}

#[test]
fn update_webhook_puts_config() {
    let transport = RecordingTransport::default().reply(
        200,
        r#"{"id":"hook-1","events":["*"],"url":"https://new","secret":"s","disabled":false,"failures":2,"last_failure_reason":"503"}"#,
    );
    let hook = connect(&transport)
        .update_webhook(
            "hook-1",
            &WebhookConfig {
                events: vec!["*".to_string()],
                url: "https://new".to_string(),
                secret: "s".to_string(),
            },
        )
        .unwrap();
    assert_eq!(hook.failures, 2);
    assert_eq!(hook.last_failure_reason.as_deref(), Some("503"));

    let req = transport.only_request();
    assert_eq!(req.method, HttpMethod::Put);
    assert_eq!(req.path, "https://api.civo.test/v2/webhooks/hook-1");
    let body: serde_json::Value = serde_json::from_str(req.body.as_deref().unwrap()).unwrap();
    assert_eq!(body, serde_json::json!({"events":["*"],"url":"https://new","secret":"s"}));
}

#[test]
fn delete_webhook_sends_delete() {
    let transport = RecordingTransport::default().reply(200, r#"{"id":"hook-1","result":"success"}"#);
    let ack = connect(&transport).delete_webhook("hook-1").unwrap();
    assert!(ack.is_success());

    let req = transport.only_request();
    assert_eq!(req.method, HttpMethod::Delete);
    assert_eq!(req.path, "https://api.civo.test/v2/webhooks/hook-1");
    assert!(req.body.is_none());
}

#[test]
fn list_webhooks_bad_json_is_a_decode_error() {
    let transport = RecordingTransport::default().reply(200, "<html>");
    let err = connect(&transport).list_webhooks().unwrap_err();
    assert!(matches!(err, ApiError::DeserializationError(_)));
}

#[test]
fn connection_is_shareable_across_threads() {
    let transport = RecordingTransport::default()
        .reply(200, "[]")
        .reply(200, "[]");
    let conn = connect(&transport);
    std::thread::scope(|s| {
        s.spawn(|| conn.list_webhooks().unwrap());
        s.spawn(|| conn.list_webhooks().unwrap());
    });
    assert_eq!(transport.requests.lock().unwrap().len(), 2);
}
