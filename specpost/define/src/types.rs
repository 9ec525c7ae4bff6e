//! Core HTTP vocabulary shared by the compiler stages.
//!
//! - [`HttpMethod`] - HTTP method enumeration
//! - [`ParameterLocation`] - where an operation parameter is bound
//! - [`EndpointKey`] - the `"METHOD PATH"` key used by the dependency table

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};
use thiserror::Error;

/// HTTP methods an interface description can declare.
///
/// ## Examples
///
/// Parse from the lowercase key used in OpenAPI `paths` maps:
///
/// ```
/// use std::str::FromStr;
/// use specpost_define::HttpMethod;
///
/// let method = HttpMethod::from_str("post").unwrap();
/// assert_eq!(method, HttpMethod::Post);
/// assert_eq!(method.to_string(), "POST");
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Display, EnumIter, EnumString,
)]
#[serde(rename_all = "UPPERCASE")]
#[strum(serialize_all = "UPPERCASE", ascii_case_insensitive)]
pub enum HttpMethod {
    /// HTTP GET - Retrieve a resource
    Get,
    /// HTTP POST - Create a new resource
    Post,
    /// HTTP PUT - Replace a resource entirely
    Put,
    /// HTTP PATCH - Partially update a resource
    Patch,
    /// HTTP DELETE - Remove a resource
    Delete,
    /// HTTP HEAD - Get headers only (no body)
    Head,
    /// HTTP OPTIONS - Get allowed methods for a resource
    Options,
}

impl HttpMethod {
    /// Returns `true` for methods that create resources.
    pub fn is_create(self) -> bool {
        matches!(self, HttpMethod::Post)
    }

    /// Returns `true` for methods that remove resources.
    pub fn is_delete(self) -> bool {
        matches!(self, HttpMethod::Delete)
    }
}

/// Where an operation parameter lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ParameterLocation {
    Path,
    Query,
    Header,
    /// Swagger 2 body parameter.
    Body,
    Cookie,
    /// Swagger 2 form field.
    #[strum(serialize = "formData")]
    #[serde(rename = "formData")]
    FormData,
}

/// Error returned when an endpoint key is not of the form `METHOD /path`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid endpoint key '{key}': {reason}")]
pub struct EndpointKeyError {
    pub key: String,
    pub reason: String,
}

/// Exact-match key for one operation: method plus bracketed path.
///
/// ## Examples
///
/// ```
/// use specpost_define::{EndpointKey, HttpMethod};
///
/// let key = EndpointKey::new(HttpMethod::Post, "/v1/organizations");
/// assert_eq!(key.to_string(), "POST /v1/organizations");
///
/// let parsed: EndpointKey = "GET /v1/organizations/{id}".parse().unwrap();
/// assert_eq!(parsed.method, HttpMethod::Get);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EndpointKey {
    pub method: HttpMethod,
    pub path: String,
}

impl EndpointKey {
    pub fn new(method: HttpMethod, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
        }
    }
}

impl fmt::Display for EndpointKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.method, self.path)
    }
}

impl FromStr for EndpointKey {
    type Err = EndpointKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = |reason: &str| EndpointKeyError {
            key: s.to_string(),
            reason: reason.to_string(),
        };

        let (method, path) = s
            .trim()
            .split_once(' ')
            .ok_or_else(|| err("expected 'METHOD /path'"))?;
        let method = HttpMethod::from_str(method).map_err(|_| err("unknown HTTP method"))?;
        let path = path.trim();
        if !path.starts_with('/') {
            return Err(err("path must start with '/'"));
        }

        Ok(Self::new(method, path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn method_parses_lowercase_openapi_keys() {
        for method in HttpMethod::iter() {
            let lower = method.to_string().to_lowercase();
            assert_eq!(HttpMethod::from_str(&lower).unwrap(), method);
        }
    }

    #[test]
    fn endpoint_key_rejects_missing_slash() {
        let err = "GET v1/things".parse::<EndpointKey>().unwrap_err();
        assert!(err.reason.contains("must start"));
    }

    #[test]
    fn endpoint_key_rejects_unknown_method() {
        assert!("FETCH /v1/things".parse::<EndpointKey>().is_err());
    }

    #[test]
    fn parameter_location_parses_form_data() {
        assert_eq!(
            ParameterLocation::from_str("formData").unwrap(),
            ParameterLocation::FormData
        );
        assert_eq!(ParameterLocation::from_str("query").unwrap(), ParameterLocation::Query);
    }
}
