//! Webhook subscriptions: `/v2/webhooks`.

use serde::{Deserialize, Serialize};

use crate::client::{encode_component, CivoClient};
use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::types::{null_as_default, SimpleResponse};

/// A saved callback fired on account events.
///
/// `disabled`, `failures` and `last_failure_reason` reflect delivery state
/// kept by the API and cannot be set from here.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Webhook {
    #[serde(deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub events: Vec<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub url: String,
    #[serde(deserialize_with = "null_as_default")]
    pub secret: String,
    #[serde(deserialize_with = "null_as_default")]
    pub disabled: bool,
    #[serde(deserialize_with = "null_as_default")]
    pub failures: u32,
    pub last_failure_reason: Option<String>,
}

/// Settings for creating or replacing a webhook.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct WebhookConfig {
    pub events: Vec<String>,
    pub url: String,
    #[serde(default)]
    pub secret: String,
}

impl CivoClient {
    pub fn build_create_webhook(&self, config: &WebhookConfig) -> Result<HttpRequest, ApiError> {
        self.json_request(HttpMethod::Post, "/v2/webhooks", config)
    }

    pub fn parse_create_webhook(&self, response: HttpResponse) -> Result<Webhook, ApiError> {
        self.decode(response)
    }

    pub fn build_list_webhooks(&self) -> HttpRequest {
        self.request(HttpMethod::Get, "/v2/webhooks")
    }

    /// A `null` body reads as no webhooks.
    pub fn parse_list_webhooks(&self, response: HttpResponse) -> Result<Vec<Webhook>, ApiError> {
        let webhooks: Option<Vec<Webhook>> = self.decode(response)?;
        Ok(webhooks.unwrap_or_default())
    }

    pub fn build_update_webhook(&self, id: &str, config: &WebhookConfig) -> Result<HttpRequest, ApiError> {
        self.json_request(HttpMethod::Put, &format!("/v2/webhooks/{}", encode_component(id)), config)
    }

    pub fn parse_update_webhook(&self, response: HttpResponse) -> Result<Webhook, ApiError> {
        self.decode(response)
    }

    pub fn build_delete_webhook(&self, id: &str) -> HttpRequest {
        self.request(HttpMethod::Delete, &format!("/v2/webhooks/{}", encode_component(id)))
    }

    pub fn parse_delete_webhook(&self, response: HttpResponse) -> Result<SimpleResponse, ApiError> {
        self.parse_simple_response(response)
    }
}
