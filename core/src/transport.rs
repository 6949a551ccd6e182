//! Executing requests: the `Transport` seam and `Connection`.
//!
//! # Design
//! `CivoClient` never performs I/O. A `Transport` turns one `HttpRequest`
//! into one `HttpResponse` and reports only failures that produced no
//! response at all; status codes are left for the parse step. `Connection`
//! glues the two together so each API call is a single
//! build, execute, parse round trip with no state kept between calls.

use crate::client::CivoClient;
#[cfg(feature = "ureq")]
use crate::config::ClientConfig;
use crate::error::ApiError;
use crate::http::{HttpRequest, HttpResponse};
use crate::types::SimpleResponse;
use crate::volume::{Volume, VolumeConfig, VolumeResult};
use crate::webhook::{Webhook, WebhookConfig};

/// Performs one blocking HTTP round trip.
pub trait Transport: Send + Sync {
    fn execute(&self, request: HttpRequest) -> Result<HttpResponse, ApiError>;
}

impl<T: Transport + ?Sized> Transport for &T {
    fn execute(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        (**self).execute(request)
    }
}

/// A `CivoClient` paired with the transport that runs its requests.
#[derive(Debug, Clone)]
pub struct Connection<T> {
    client: CivoClient,
    transport: T,
}

#[cfg(feature = "ureq")]
impl Connection<UreqTransport> {
    /// Connect with a ureq agent built from `config`.
    pub fn from_config(config: &ClientConfig) -> Self {
        Self::new(CivoClient::from_config(config), UreqTransport::new(config))
    }
}

impl<T: Transport> Connection<T> {
    pub fn new(client: CivoClient, transport: T) -> Self {
        Self { client, transport }
    }

    pub fn client(&self) -> &CivoClient {
        &self.client
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    fn send(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        tracing::debug!(method = %request.method, path = %request.path, "sending civo request");
        let response = self.transport.execute(request)?;
        tracing::debug!(status = response.status, "civo response received");
        Ok(response)
    }

    // Volumes

    pub fn list_volumes(&self) -> Result<Vec<Volume>, ApiError> {
        let response = self.send(self.client.build_list_volumes())?;
        self.client.parse_list_volumes(response)
    }

    /// Find a volume by part of its id or part of its name.
    ///
    /// Returns an owned copy; zero or several matches are a `LookupError`.
    pub fn find_volume(&self, search: &str) -> Result<Volume, ApiError> {
        let response = self.send(self.client.build_list_volumes())?;
        self.client.parse_find_volume(response, search)
    }

    pub fn new_volume(&self, config: &VolumeConfig) -> Result<VolumeResult, ApiError> {
        let response = self.send(self.client.build_new_volume(config)?)?;
        self.client.parse_new_volume(response)
    }

    pub fn resize_volume(&self, id: &str, size_gb: u32) -> Result<SimpleResponse, ApiError> {
        let response = self.send(self.client.build_resize_volume(id, size_gb)?)?;
        self.client.parse_resize_volume(response)
    }

    pub fn attach_volume(&self, id: &str, instance_id: &str) -> Result<SimpleResponse, ApiError> {
        let response = self.send(self.client.build_attach_volume(id, instance_id)?)?;
        self.client.parse_attach_volume(response)
    }

    pub fn detach_volume(&self, id: &str) -> Result<SimpleResponse, ApiError> {
        let response = self.send(self.client.build_detach_volume(id))?;
        self.client.parse_detach_volume(response)
    }

    pub fn delete_volume(&self, id: &str) -> Result<SimpleResponse, ApiError> {
        let response = self.send(self.client.build_delete_volume(id))?;
        self.client.parse_delete_volume(response)
    }

    // Webhooks

    pub fn create_webhook(&self, config: &WebhookConfig) -> Result<Webhook, ApiError> {
        let response = self.send(self.client.build_create_webhook(config)?)?;
        self.client.parse_create_webhook(response)
    }

    pub fn list_webhooks(&self) -> Result<Vec<Webhook>, ApiError> {
        let response = self.send(self.client.build_list_webhooks())?;
        self.client.parse_list_webhooks(response)
    }

    pub fn update_webhook(&self, id: &str, config: &WebhookConfig) -> Result<Webhook, ApiError> {
        let response = self.send(self.client.build_update_webhook(id, config)?)?;
        self.client.parse_update_webhook(response)
    }

    pub fn delete_webhook(&self, id: &str) -> Result<SimpleResponse, ApiError> {
        let response = self.send(self.client.build_delete_webhook(id))?;
        self.client.parse_delete_webhook(response)
    }
}

#[cfg(feature = "ureq")]
pub use self::ureq_transport::UreqTransport;

#[cfg(feature = "ureq")]
mod ureq_transport {
    use ureq::typestate::WithBody;
    use ureq::{Agent, RequestBuilder};

    use super::Transport;
    use crate::config::ClientConfig;
    use crate::error::ApiError;
    use crate::http::{HttpMethod, HttpRequest, HttpResponse};

    /// Blocking transport backed by a ureq agent.
    ///
    /// 4xx/5xx responses are returned as data so `CivoClient` can interpret
    /// the status.
    #[derive(Debug, Clone)]
    pub struct UreqTransport {
        agent: Agent,
    }

    impl UreqTransport {
        pub fn new(config: &ClientConfig) -> Self {
            let agent = Agent::config_builder()
                .http_status_as_error(false)
                .timeout_global(Some(config.timeout))
                .build()
                .new_agent();
            Self { agent }
        }

        pub fn with_agent(agent: Agent) -> Self {
            Self { agent }
        }
    }

    impl Transport for UreqTransport {
        fn execute(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
            let HttpRequest {
                method,
                path,
                headers,
                body,
            } = request;

            let result = match method {
                HttpMethod::Get => with_headers(self.agent.get(&path), &headers).call(),
                HttpMethod::Delete => with_headers(self.agent.delete(&path), &headers).call(),
                HttpMethod::Post => send(with_headers(self.agent.post(&path), &headers), body),
                HttpMethod::Put => send(with_headers(self.agent.put(&path), &headers), body),
            };
            let mut response = result.map_err(|e| ApiError::TransportError(e.to_string()))?;

            let status = response.status().as_u16();
            let headers = response
                .headers()
                .iter()
                .filter_map(|(key, value)| {
                    value
                        .to_str()
                        .ok()
                        .map(|value| (key.as_str().to_string(), value.to_string()))
                })
                .collect();
            let body = response
                .body_mut()
                .read_to_string()
                .map_err(|e| ApiError::TransportError(e.to_string()))?;

            Ok(HttpResponse { status, headers, body })
        }
    }

    fn with_headers<B>(mut builder: RequestBuilder<B>, headers: &[(String, String)]) -> RequestBuilder<B> {
        for (key, value) in headers {
            builder = builder.header(key.as_str(), value.as_str());
        }
        builder
    }

    fn send(
        builder: RequestBuilder<WithBody>,
        body: Option<String>,
    ) -> Result<ureq::http::Response<ureq::Body>, ureq::Error> {
        match body {
            Some(body) => builder.send(body.as_bytes()),
            None => builder.send_empty(),
        }
    }
}
