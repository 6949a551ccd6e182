use std::sync::Arc;

use axum::{
    extract::{Path, Request, State},
    http::{header, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{delete, get, post, put},
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::{net::TcpListener, sync::RwLock};
use uuid::Uuid;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Volume {
    pub id: String,
    pub name: String,
    pub instance_id: Option<String>,
    pub mountpoint: Option<String>,
    pub size_gb: u32,
    pub bootable: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Deserialize)]
pub struct VolumeConfig {
    pub name: String,
    pub size_gb: u32,
    #[serde(default)]
    pub bootable: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct VolumeResult {
    pub id: String,
    pub name: String,
    pub result: String,
}

#[derive(Deserialize)]
pub struct ResizeVolume {
    pub size_gb: u32,
}

#[derive(Deserialize)]
pub struct AttachVolume {
    pub instance_id: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Webhook {
    pub id: String,
    pub events: Vec<String>,
    pub url: String,
    pub secret: String,
    pub disabled: bool,
    pub failures: u32,
    pub last_failure_reason: Option<String>,
}

#[derive(Deserialize)]
pub struct WebhookConfig {
    pub events: Vec<String>,
    pub url: String,
    #[serde(default)]
    pub secret: String,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct SimpleResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl SimpleResponse {
    fn success(id: &str) -> Self {
        Self {
            id: Some(id.to_string()),
            result: Some("success".to_string()),
            ..Default::default()
        }
    }

    fn error(code: &str, reason: String) -> Self {
        Self {
            code: Some(code.to_string()),
            reason: Some(reason),
            ..Default::default()
        }
    }
}

type Failure = (StatusCode, Json<SimpleResponse>);

fn not_found(code: &str, id: &str) -> Failure {
    (
        StatusCode::NOT_FOUND,
        Json(SimpleResponse::error(code, format!("{id} does not exist"))),
    )
}

/// In-memory resources, kept in insertion order.
#[derive(Default)]
pub struct Store {
    pub volumes: Vec<Volume>,
    pub webhooks: Vec<Webhook>,
}

pub type Db = Arc<RwLock<Store>>;

pub fn app() -> Router {
    let db: Db = Arc::new(RwLock::new(Store::default()));
    Router::new()
        .route("/v2/volumes", get(list_volumes))
        .route("/v2/volumes/", post(create_volume))
        .route("/v2/volumes/{id}", delete(delete_volume))
        .route("/v2/volumes/{id}/resize", put(resize_volume))
        .route("/v2/volumes/{id}/attach", put(attach_volume))
        .route("/v2/volumes/{id}/detach", put(detach_volume))
        .route("/v2/webhooks", get(list_webhooks).post(create_webhook))
        .route("/v2/webhooks/{id}", put(update_webhook).delete(delete_webhook))
        .layer(middleware::from_fn(require_bearer))
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

async fn require_bearer(request: Request, next: Next) -> Response {
    let authorized = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.get(..7).map(|scheme| (scheme, &value[7..])))
        .is_some_and(|(scheme, token)| scheme.eq_ignore_ascii_case("bearer ") && !token.is_empty());
    if !authorized {
        tracing::debug!(uri = %request.uri(), "rejecting request without bearer token");
        let body = SimpleResponse::error("authentication_invalid_key", "missing bearer token".to_string());
        return (StatusCode::UNAUTHORIZED, Json(body)).into_response();
    }
    next.run(request).await
}

// --- volumes ---

async fn list_volumes(State(db): State<Db>) -> Json<Vec<Volume>> {
    Json(db.read().await.volumes.clone())
}

async fn create_volume(State(db): State<Db>, Json(input): Json<VolumeConfig>) -> Json<VolumeResult> {
    let volume = Volume {
        id: Uuid::new_v4().to_string(),
        name: input.name,
        instance_id: None,
        mountpoint: None,
        size_gb: input.size_gb,
        bootable: input.bootable,
        created_at: Utc::now(),
    };
    let result = VolumeResult {
        id: volume.id.clone(),
        name: volume.name.clone(),
        result: "success".to_string(),
    };
    tracing::info!(id = %volume.id, name = %volume.name, "volume created");
    db.write().await.volumes.push(volume);
    Json(result)
}

async fn resize_volume(
    State(db): State<Db>,
    Path(id): Path<String>,
    Json(input): Json<ResizeVolume>,
) -> Result<Json<SimpleResponse>, Failure> {
    let mut store = db.write().await;
    let volume = find_volume_mut(&mut store, &id)?;
    volume.size_gb = input.size_gb;
    Ok(Json(SimpleResponse::success(&id)))
}

async fn attach_volume(
    State(db): State<Db>,
    Path(id): Path<String>,
    Json(input): Json<AttachVolume>,
) -> Result<Json<SimpleResponse>, Failure> {
    let mut store = db.write().await;
    let volume = find_volume_mut(&mut store, &id)?;
    volume.mountpoint = Some(format!("/mnt/{}", volume.name));
    volume.instance_id = Some(input.instance_id);
    Ok(Json(SimpleResponse::success(&id)))
}

async fn detach_volume(State(db): State<Db>, Path(id): Path<String>) -> Result<Json<SimpleResponse>, Failure> {
    let mut store = db.write().await;
    let volume = find_volume_mut(&mut store, &id)?;
    volume.instance_id = None;
    volume.mountpoint = None;
    Ok(Json(SimpleResponse::success(&id)))
}

async fn delete_volume(State(db): State<Db>, Path(id): Path<String>) -> Result<Json<SimpleResponse>, Failure> {
    let mut store = db.write().await;
    let before = store.volumes.len();
    store.volumes.retain(|v| v.id != id);
    if store.volumes.len() == before {
        return Err(not_found("database_volume_not_found", &id));
    }
    Ok(Json(SimpleResponse::success(&id)))
}

fn find_volume_mut<'a>(store: &'a mut Store, id: &str) -> Result<&'a mut Volume, Failure> {
    store
        .volumes
        .iter_mut()
        .find(|v| v.id == id)
        .ok_or_else(|| not_found("database_volume_not_found", id))
}

// --- webhooks ---

async fn list_webhooks(State(db): State<Db>) -> Json<Vec<Webhook>> {
    Json(db.read().await.webhooks.clone())
}

async fn create_webhook(State(db): State<Db>, Json(input): Json<WebhookConfig>) -> Json<Webhook> {
    let webhook = Webhook {
        id: Uuid::new_v4().to_string(),
        events: input.events,
        url: input.url,
        secret: input.secret,
        disabled: false,
        failures: 0,
        last_failure_reason: None,
    };
    tracing::info!(id = %webhook.id, url = %webhook.url, "webhook created");
    db.write().await.webhooks.push(webhook.clone());
    Json(webhook)
}

async fn update_webhook(
    State(db): State<Db>,
    Path(id): Path<String>,
    Json(input): Json<WebhookConfig>,
) -> Result<Json<Webhook>, Failure> {
    let mut store = db.write().await;
    let webhook = store
        .webhooks
        .iter_mut()
        .find(|w| w.id == id)
        .ok_or_else(|| not_found("database_webhook_not_found", &id))?;
    webhook.events = input.events;
    webhook.url = input.url;
    webhook.secret = input.secret;
    Ok(Json(webhook.clone()))
}

async fn delete_webhook(State(db): State<Db>, Path(id): Path<String>) -> Result<Json<SimpleResponse>, Failure> {
    let mut store = db.write().await;
    let before = store.webhooks.len();
    store.webhooks.retain(|w| w.id != id);
    if store.webhooks.len() == before {
        return Err(not_found("database_webhook_not_found", &id));
    }
    Ok(Json(SimpleResponse::success(&id)))
}
