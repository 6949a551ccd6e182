//! Synchronous client for the Civo volume and webhook APIs.
//!
//! # Overview
//! `CivoClient` builds `HttpRequest` values and parses `HttpResponse` values
//! without touching the network (host-does-IO pattern). `Connection` pairs
//! it with a `Transport` to run real round trips; with the default `ureq`
//! feature, `Connection::from_config` gives a ready blocking client.
//!
//! # Design
//! - `CivoClient` is stateless: base URL, API key, optional region.
//! - Each operation is split into `build_*` (produces request) and
//!   `parse_*` (consumes response), so the I/O boundary is explicit.
//! - Each `Connection` method is one build, execute, parse round trip.
//!   No retries, pagination or caching.
//! - DTOs are defined independently from the mock-server crate; integration
//!   tests catch schema drift.

pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod transport;
pub mod types;
pub mod volume;
pub mod webhook;

pub use client::CivoClient;
pub use config::ClientConfig;
pub use error::{ApiError, LookupError};
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use transport::{Connection, Transport};
#[cfg(feature = "ureq")]
pub use transport::UreqTransport;
pub use types::SimpleResponse;
pub use volume::{Volume, VolumeConfig, VolumeResult};
pub use webhook::{Webhook, WebhookConfig};
