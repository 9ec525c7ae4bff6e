//! Interface description model.
//!
//! The parsed document is kept as a `serde_json::Value` so the schema
//! enhancer can rewrite arbitrary nodes and unknown extension fields survive.
//! [`InterfaceSpec`] layers typed accessors over it: ordered operations,
//! merged parameters, and `$ref` resolution for both OpenAPI 3
//! (`#/components/...`) and Swagger 2 (`#/definitions/...`) documents.

use std::str::FromStr;

use serde_json::{Map, Value};
use specpost_define::{HttpMethod, ParameterLocation};

/// Maximum `$ref` hops followed when resolving non-schema references.
const MAX_REF_HOPS: usize = 10;

/// Which major dialect the document uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpecVersion {
    OpenApi3,
    Swagger2,
}

/// A parsed interface description.
#[derive(Debug, Clone, PartialEq)]
pub struct InterfaceSpec {
    document: Value,
}

impl InterfaceSpec {
    pub fn from_value(document: Value) -> Self {
        Self { document }
    }

    pub fn document(&self) -> &Value {
        &self.document
    }

    pub fn document_mut(&mut self) -> &mut Value {
        &mut self.document
    }

    pub fn version(&self) -> SpecVersion {
        if self.document.get("swagger").is_some() {
            SpecVersion::Swagger2
        } else {
            SpecVersion::OpenApi3
        }
    }

    pub fn title(&self) -> Option<&str> {
        self.document.pointer("/info/title").and_then(Value::as_str)
    }

    pub fn description(&self) -> Option<&str> {
        self.document.pointer("/info/description").and_then(Value::as_str)
    }

    /// Declared base URLs. Swagger 2 documents contribute
    /// `scheme://host/basePath`.
    pub fn servers(&self) -> Vec<String> {
        if let Some(servers) = self.document.get("servers").and_then(Value::as_array) {
            return servers
                .iter()
                .filter_map(|s| s.get("url").and_then(Value::as_str))
                .map(str::to_string)
                .collect();
        }

        match self.document.get("host").and_then(Value::as_str) {
            Some(host) => {
                let scheme = self
                    .document
                    .pointer("/schemes/0")
                    .and_then(Value::as_str)
                    .unwrap_or("https");
                let base_path = self
                    .document
                    .get("basePath")
                    .and_then(Value::as_str)
                    .unwrap_or("")
                    .trim_end_matches('/');
                vec![format!("{scheme}://{host}{base_path}")]
            }
            None => Vec::new(),
        }
    }

    pub fn paths(&self) -> Option<&Map<String, Value>> {
        self.document.get("paths").and_then(Value::as_object)
    }

    pub fn paths_mut(&mut self) -> Option<&mut Map<String, Value>> {
        self.document.get_mut("paths").and_then(Value::as_object_mut)
    }

    /// Named schemas: `components.schemas` or Swagger 2 `definitions`.
    pub fn schemas(&self) -> Option<&Map<String, Value>> {
        self.document
            .pointer("/components/schemas")
            .or_else(|| self.document.get("definitions"))
            .and_then(Value::as_object)
    }

    /// Every operation in document order.
    pub fn operations(&self) -> Vec<Operation<'_>> {
        let Some(paths) = self.paths() else {
            return Vec::new();
        };

        paths
            .iter()
            .flat_map(|(path, item)| {
                let path_params = item.get("parameters").and_then(Value::as_array);
                item.as_object()
                    .into_iter()
                    .flat_map(|ops| ops.iter())
                    .filter_map(move |(key, op)| {
                        let method = HttpMethod::from_str(key).ok()?;
                        Some(Operation {
                            path: path.as_str(),
                            method,
                            node: op,
                            path_params,
                        })
                    })
            })
            .collect()
    }

    /// Resolves a schema `$ref` by pointer, then by trailing name against
    /// the named schemas. Returns `None` when unresolvable.
    ///
    /// ## Examples
    ///
    /// ```
    /// use serde_json::json;
    /// use specpost_gen::spec::InterfaceSpec;
    ///
    /// let spec = InterfaceSpec::from_value(json!({
    ///     "definitions": {"Ledger": {"type": "object"}}
    /// }));
    /// assert!(spec.resolve_schema_ref("#/definitions/Ledger").is_some());
    /// assert!(spec.resolve_schema_ref("#/components/schemas/Ledger").is_some());
    /// assert!(spec.resolve_schema_ref("#/definitions/Missing").is_none());
    /// ```
    pub fn resolve_schema_ref(&self, reference: &str) -> Option<&Value> {
        if let Some(pointer) = reference.strip_prefix('#')
            && let Some(found) = self.document.pointer(pointer)
        {
            return Some(found);
        }

        let name = ref_name(reference)?;
        self.schemas()?.get(name)
    }

    /// Follows `$ref` chains on any node (parameters, request bodies,
    /// responses). Unresolvable references return the reference node itself.
    pub fn resolve<'a>(&'a self, mut node: &'a Value) -> &'a Value {
        for _ in 0..MAX_REF_HOPS {
            let Some(reference) = node.get("$ref").and_then(Value::as_str) else {
                return node;
            };
            match reference
                .strip_prefix('#')
                .and_then(|pointer| self.document.pointer(pointer))
            {
                Some(target) => node = target,
                None => return node,
            }
        }
        node
    }
}

/// The last path component of a `$ref`, e.g. `Ledger` for
/// `#/components/schemas/Ledger`.
pub fn ref_name(reference: &str) -> Option<&str> {
    reference.rsplit('/').next().filter(|s| !s.is_empty())
}

/// A single declared parameter, after `$ref` resolution.
#[derive(Debug, Clone, PartialEq)]
pub struct Parameter {
    pub name: String,
    pub location: ParameterLocation,
    pub required: bool,
    pub schema: Option<Value>,
    pub description: Option<String>,
    pub default: Option<Value>,
    pub example: Option<Value>,
}

impl Parameter {
    fn from_node(node: &Value) -> Option<Self> {
        let name = node.get("name")?.as_str()?.to_string();
        let location = ParameterLocation::from_str(node.get("in")?.as_str()?).ok()?;
        let schema = node.get("schema").cloned().or_else(|| {
            // Swagger 2 non-body parameters carry type/format inline.
            node.get("type").map(|_| {
                let mut inline = Map::new();
                for key in ["type", "format", "enum", "items", "default"] {
                    if let Some(v) = node.get(key) {
                        inline.insert(key.to_string(), v.clone());
                    }
                }
                Value::Object(inline)
            })
        });
        let default = node
            .get("default")
            .or_else(|| schema.as_ref().and_then(|s| s.get("default")))
            .cloned();

        Some(Self {
            name,
            required: node.get("required").and_then(Value::as_bool).unwrap_or(location == ParameterLocation::Path),
            location,
            description: node.get("description").and_then(Value::as_str).map(str::to_string),
            example: node
                .get("example")
                .or_else(|| schema.as_ref().and_then(|s| s.get("example")))
                .cloned(),
            default,
            schema,
        })
    }

    /// Default or example rendered as a plain string, empty if neither.
    pub fn preset_value(&self) -> String {
        match self.default.as_ref().or(self.example.as_ref()) {
            Some(Value::String(s)) => s.clone(),
            Some(Value::Null) | None => String::new(),
            Some(other) => other.to_string(),
        }
    }
}

/// One HTTP verb on one path.
#[derive(Debug, Clone, Copy)]
pub struct Operation<'a> {
    pub path: &'a str,
    pub method: HttpMethod,
    pub node: &'a Value,
    path_params: Option<&'a Vec<Value>>,
}

impl<'a> Operation<'a> {
    /// The dependency-table key, e.g. `POST /v1/organizations`.
    pub fn key(&self) -> String {
        format!("{} {}", self.method, self.path)
    }

    pub fn summary(&self) -> Option<&'a str> {
        self.node.get("summary").and_then(Value::as_str)
    }

    pub fn description(&self) -> Option<&'a str> {
        self.node.get("description").and_then(Value::as_str)
    }

    pub fn tags(&self) -> Vec<&'a str> {
        self.node
            .get("tags")
            .and_then(Value::as_array)
            .map(|tags| tags.iter().filter_map(Value::as_str).collect())
            .unwrap_or_default()
    }

    /// Path-level and operation-level parameters, resolved. The operation
    /// wins on a `(name, in)` collision.
    pub fn parameters(&self, spec: &'a InterfaceSpec) -> Vec<Parameter> {
        let own: Vec<Parameter> = self
            .node
            .get("parameters")
            .and_then(Value::as_array)
            .into_iter()
            .flatten()
            .filter_map(|p| Parameter::from_node(spec.resolve(p)))
            .collect();

        let inherited = self
            .path_params
            .into_iter()
            .flatten()
            .filter_map(|p| Parameter::from_node(spec.resolve(p)))
            .filter(|p| !own.iter().any(|o| o.name == p.name && o.location == p.location));

        inherited.chain(own.iter().cloned()).collect()
    }

    /// The OpenAPI 3 `requestBody`, resolved.
    pub fn request_body(&self, spec: &'a InterfaceSpec) -> Option<&'a Value> {
        self.node.get("requestBody").map(|b| spec.resolve(b))
    }

    /// Declared responses keyed by status code, in document order.
    pub fn responses(&self) -> Option<&'a Map<String, Value>> {
        self.node.get("responses").and_then(Value::as_object)
    }

    /// Names listed under an `x-provides`/`x-requires` style extension.
    pub fn extension_list(&self, key: &str) -> Vec<String> {
        self.node
            .get(key)
            .and_then(Value::as_array)
            .map(|items| items.iter().filter_map(Value::as_str).map(str::to_string).collect())
            .unwrap_or_default()
    }
}
