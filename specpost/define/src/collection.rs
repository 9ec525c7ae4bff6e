//! Compiled request collection model.
//!
//! A [`Collection`] is an ordered list of [`ItemGroup`]s (one per tag), each
//! holding runnable [`CollectionItem`]s. Items carry templated URLs using
//! `{{variable}}` placeholders, materialized bodies, and the two generated
//! scripts. The emitter turns this model into the runner's wire format.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::script::Script;
use crate::types::HttpMethod;

/// Name of the group receiving operations that declare no tag.
pub const DEFAULT_GROUP: &str = "default";

/// A header entry on a request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Header {
    pub key: String,
    pub value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub disabled: bool,
}

impl Header {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
            description: None,
            disabled: false,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// A query-string entry; optional parameters are emitted disabled.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryParam {
    pub key: String,
    pub value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub disabled: bool,
}

/// Binding of one path parameter to its `{{variable}}` token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathBinding {
    /// Parameter name as declared in the path template.
    pub name: String,
    /// Environment variable the segment is bound to.
    pub variable: String,
}

impl PathBinding {
    /// The `{{variable}}` token substituted into the URL.
    pub fn token(&self) -> String {
        format!("{{{{{}}}}}", self.variable)
    }
}

/// A fully templated request URL.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestUrl {
    /// Base-URL variable, e.g. `onboardingUrl`.
    pub base_variable: String,
    /// Path segments with `{{variable}}` tokens already substituted.
    pub segments: Vec<String>,
    #[serde(default)]
    pub path_bindings: Vec<PathBinding>,
    #[serde(default)]
    pub query: Vec<QueryParam>,
}

impl RequestUrl {
    /// The templated path, e.g. `/v1/organizations/{{organizationId}}`.
    pub fn path(&self) -> String {
        if self.segments.is_empty() {
            return "/".to_string();
        }
        format!("/{}", self.segments.join("/"))
    }

    /// The raw URL including base variable and enabled query parameters.
    ///
    /// ## Examples
    ///
    /// ```
    /// use specpost_define::RequestUrl;
    ///
    /// let url = RequestUrl {
    ///     base_variable: "onboardingUrl".into(),
    ///     segments: vec!["v1".into(), "organizations".into()],
    ///     path_bindings: vec![],
    ///     query: vec![],
    /// };
    /// assert_eq!(url.raw(), "{{onboardingUrl}}/v1/organizations");
    /// ```
    pub fn raw(&self) -> String {
        let mut raw = format!("{{{{{}}}}}{}", self.base_variable, self.path());
        let enabled: Vec<String> = self
            .query
            .iter()
            .filter(|q| !q.disabled)
            .map(|q| format!("{}={}", q.key, q.value))
            .collect();
        if !enabled.is_empty() {
            raw.push('?');
            raw.push_str(&enabled.join("&"));
        }
        raw
    }
}

/// A request body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "mode", content = "content")]
pub enum RequestBody {
    /// Structured JSON payload.
    Json(Value),
    /// Plain-text payload (e.g. a transaction DSL document).
    Text(String),
}

impl RequestBody {
    pub fn as_json(&self) -> Option<&Value> {
        match self {
            RequestBody::Json(value) => Some(value),
            RequestBody::Text(_) => None,
        }
    }

    pub fn as_json_mut(&mut self) -> Option<&mut Value> {
        match self {
            RequestBody::Json(value) => Some(value),
            RequestBody::Text(_) => None,
        }
    }
}

/// One saved response example attached to an item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseExample {
    pub name: String,
    pub status: u16,
    pub reason: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<Value>,
}

/// One compiled, runnable request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollectionItem {
    pub name: String,
    pub method: HttpMethod,
    /// Source path template (bracketed placeholders) this item was built from.
    pub path: String,
    pub url: RequestUrl,
    #[serde(default)]
    pub headers: Vec<Header>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<RequestBody>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub pre_request_script: Script,
    #[serde(default)]
    pub test_script: Script,
    #[serde(default)]
    pub response_examples: Vec<ResponseExample>,
}

impl CollectionItem {
    pub fn header(&self, key: &str) -> Option<&Header> {
        self.headers.iter().find(|h| h.key.eq_ignore_ascii_case(key))
    }
}

/// A named group of items, usually one per tag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemGroup {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub items: Vec<CollectionItem>,
}

impl ItemGroup {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            items: Vec::new(),
        }
    }
}

/// A collection-level variable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionVariable {
    pub key: String,
    pub value: String,
}

/// The compiled collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Collection {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub groups: Vec<ItemGroup>,
    #[serde(default)]
    pub variables: Vec<CollectionVariable>,
}

impl Collection {
    /// All items across groups, in group order.
    pub fn items(&self) -> impl Iterator<Item = &CollectionItem> {
        self.groups.iter().flat_map(|g| g.items.iter())
    }

    pub fn item_count(&self) -> usize {
        self.groups.iter().map(|g| g.items.len()).sum()
    }

    pub fn group(&self, name: &str) -> Option<&ItemGroup> {
        self.groups.iter().find(|g| g.name == name)
    }
}
