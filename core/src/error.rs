//! Error types for the Civo API client.
//!
//! # Design
//! `NotFound` gets a dedicated variant because callers frequently distinguish
//! "the resource does not exist" from "the server returned an unexpected
//! status." All other non-2xx responses land in `HttpError` with the raw
//! status code and body. Lookup failures from `find_volume` are local and
//! carry the search term.

use thiserror::Error;

/// Errors returned by `CivoClient` parse methods and `Connection` calls.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request never produced a response (connect, TLS, timeout, IO).
    #[error("transport failed: {0}")]
    TransportError(String),

    /// The server returned 404.
    #[error("resource not found")]
    NotFound,

    /// The server returned a non-2xx status other than 404.
    #[error("HTTP {status}: {body}")]
    HttpError { status: u16, body: String },

    /// The response body could not be deserialized into the expected type.
    #[error("deserialization failed: {0}")]
    DeserializationError(String),

    /// The request payload could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    SerializationError(String),

    #[error(transparent)]
    LookupError(#[from] LookupError),

    #[error("invalid configuration: {0}")]
    ConfigError(String),
}

/// Why a search over a listed collection did not resolve to one item.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LookupError {
    #[error("unable to find {term}, zero matches")]
    ZeroMatches { term: String },

    #[error("unable to find {term} because there were multiple matches")]
    AmbiguousMatch { term: String },
}

impl LookupError {
    pub fn term(&self) -> &str {
        match self {
            LookupError::ZeroMatches { term } | LookupError::AmbiguousMatch { term } => term,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_messages_name_the_search_term() {
        let zero = LookupError::ZeroMatches { term: "data".to_string() };
        assert_eq!(zero.to_string(), "unable to find data, zero matches");

        let many = LookupError::AmbiguousMatch { term: "data".to_string() };
        assert_eq!(
            many.to_string(),
            "unable to find data because there were multiple matches"
        );
        assert_eq!(many.term(), "data");
    }

    #[test]
    fn lookup_error_is_transparent_inside_api_error() {
        let err: ApiError = LookupError::ZeroMatches { term: "x".to_string() }.into();
        assert_eq!(err.to_string(), "unable to find x, zero matches");
    }
}
