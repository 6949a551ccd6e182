//! Response envelopes shared by several resources.

use serde::{Deserialize, Deserializer, Serialize};

/// Decode `null` as the type's default, the way the API's zero values read.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Acknowledgment returned by the Civo mutation endpoints (delete, resize,
/// attach, detach). Failed calls fill `code` and `reason` instead of
/// `result`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct SimpleResponse {
    #[serde(deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub result: String,
    #[serde(rename = "code", deserialize_with = "null_as_default")]
    pub error_code: String,
    #[serde(rename = "reason", deserialize_with = "null_as_default")]
    pub error_reason: String,
    #[serde(rename = "details", deserialize_with = "null_as_default")]
    pub error_details: String,
}

impl SimpleResponse {
    pub fn is_success(&self) -> bool {
        self.result == "success"
    }
}
