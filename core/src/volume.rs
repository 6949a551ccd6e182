//! Block storage volumes: `/v2/volumes`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::client::{encode_component, CivoClient};
use crate::error::{ApiError, LookupError};
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::types::{null_as_default, SimpleResponse};

/// A block of attachable storage.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Volume {
    #[serde(deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    /// Instance the volume is attached to, if any.
    pub instance_id: Option<String>,
    #[serde(rename = "mountpoint")]
    pub mount_point: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub size_gb: u32,
    #[serde(deserialize_with = "null_as_default")]
    pub bootable: bool,
    pub created_at: Option<DateTime<Utc>>,
}

/// Settings for creating a volume.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct VolumeConfig {
    pub name: String,
    pub size_gb: u32,
    #[serde(default)]
    pub bootable: bool,
}

/// Acknowledgment returned when a volume is created.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct VolumeResult {
    #[serde(deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub result: String,
}

#[derive(Serialize)]
struct ResizeVolume {
    size_gb: u32,
}

#[derive(Serialize)]
struct AttachVolume<'a> {
    instance_id: &'a str,
}

/// Pick the one volume whose id or name contains `search`.
///
/// Fails as soon as a second match is seen.
pub fn find_volume(volumes: Vec<Volume>, search: &str) -> Result<Volume, LookupError> {
    let mut found = None;
    for volume in volumes {
        if volume.id.contains(search) || volume.name.contains(search) {
            if found.is_some() {
                return Err(LookupError::AmbiguousMatch {
                    term: search.to_string(),
                });
            }
            found = Some(volume);
        }
    }
    found.ok_or_else(|| LookupError::ZeroMatches {
        term: search.to_string(),
    })
}

impl CivoClient {
    pub fn build_list_volumes(&self) -> HttpRequest {
        self.request(HttpMethod::Get, "/v2/volumes")
    }

    /// A `null` body reads as no volumes.
    pub fn parse_list_volumes(&self, response: HttpResponse) -> Result<Vec<Volume>, ApiError> {
        let volumes: Option<Vec<Volume>> = self.decode(response)?;
        Ok(volumes.unwrap_or_default())
    }

    /// `find_volume` reuses the list request; this parses the listing and
    /// runs the lookup in one step.
    pub fn parse_find_volume(&self, response: HttpResponse, search: &str) -> Result<Volume, ApiError> {
        let volumes = self.parse_list_volumes(response)?;
        Ok(find_volume(volumes, search)?)
    }

    pub fn build_new_volume(&self, config: &VolumeConfig) -> Result<HttpRequest, ApiError> {
        self.json_request(HttpMethod::Post, "/v2/volumes/", config)
    }

    pub fn parse_new_volume(&self, response: HttpResponse) -> Result<VolumeResult, ApiError> {
        self.decode(response)
    }

    pub fn build_resize_volume(&self, id: &str, size_gb: u32) -> Result<HttpRequest, ApiError> {
        self.json_request(
            HttpMethod::Put,
            &format!("/v2/volumes/{}/resize", encode_component(id)),
            &ResizeVolume { size_gb },
        )
    }

    pub fn build_attach_volume(&self, id: &str, instance_id: &str) -> Result<HttpRequest, ApiError> {
        self.json_request(
            HttpMethod::Put,
            &format!("/v2/volumes/{}/attach", encode_component(id)),
            &AttachVolume { instance_id },
        )
    }

    /// Detach carries no payload.
    pub fn build_detach_volume(&self, id: &str) -> HttpRequest {
        self.request(HttpMethod::Put, &format!("/v2/volumes/{}/detach", encode_component(id)))
    }

    pub fn build_delete_volume(&self, id: &str) -> HttpRequest {
        self.request(HttpMethod::Delete, &format!("/v2/volumes/{}", encode_component(id)))
    }

    pub fn parse_resize_volume(&self, response: HttpResponse) -> Result<SimpleResponse, ApiError> {
        self.parse_simple_response(response)
    }

    pub fn parse_attach_volume(&self, response: HttpResponse) -> Result<SimpleResponse, ApiError> {
        self.parse_simple_response(response)
    }

    pub fn parse_detach_volume(&self, response: HttpResponse) -> Result<SimpleResponse, ApiError> {
        self.parse_simple_response(response)
    }

    pub fn parse_delete_volume(&self, response: HttpResponse) -> Result<SimpleResponse, ApiError> {
        self.parse_simple_response(response)
    }
}
