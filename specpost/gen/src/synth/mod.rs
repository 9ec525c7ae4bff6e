//! Example synthesis.
//!
//! Produces a representative JSON value for any schema node, following
//! `$ref`s through the document. Priority order:
//!
//! 1. An explicit `example` (or the first of `examples`), verbatim. A string
//!    that looks like serialized JSON is parsed when possible.
//! 2. A domain strategy claiming the property name or `$ref` target.
//! 3. `$ref` resolution, recursing one level deeper; unresolvable → `null`.
//! 4. `allOf` (merged) or the first `oneOf`/`anyOf` member.
//! 5. Type dispatch: objects recurse into properties, arrays wrap one item,
//!    strings honor `format`/`enum`, numbers are `0`, booleans `false`.
//!
//! Recursion is bounded by [`MAX_DEPTH`]; past it an empty object (or array)
//! is returned, so self-referential schemas always terminate.

pub mod ledger;
pub mod strategy;

use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::{Map, Value};
use specpost_define::SynthesisStrategy;
use tracing::{debug, trace};

use crate::spec::{InterfaceSpec, ref_name};
pub use strategy::{ExampleStrategy, schema_type, strategies_for};

/// Maximum schema nesting depth followed during synthesis.
pub const MAX_DEPTH: usize = 10;

/// Literal used for `format: uuid` strings.
pub const NIL_UUID: &str = "00000000-0000-0000-0000-000000000000";

/// Schema-driven example generator bound to one interface description.
pub struct Synthesizer<'a> {
    spec: &'a InterfaceSpec,
    strategies: Vec<Box<dyn ExampleStrategy>>,
    exclusions: Vec<String>,
    now: DateTime<Utc>,
}

impl<'a> Synthesizer<'a> {
    /// A synthesizer with no domain strategies.
    pub fn new(spec: &'a InterfaceSpec) -> Self {
        Self {
            spec,
            strategies: Vec::new(),
            exclusions: Vec::new(),
            now: Utc::now(),
        }
    }

    /// A synthesizer using the profile's strategy set.
    pub fn with_strategy(spec: &'a InterfaceSpec, strategy: SynthesisStrategy) -> Self {
        Self::new(spec).strategies(strategies_for(strategy))
    }

    pub fn strategies(mut self, strategies: Vec<Box<dyn ExampleStrategy>>) -> Self {
        self.strategies = strategies;
        self
    }

    /// Property names never emitted into object examples.
    pub fn exclusions(mut self, exclusions: Vec<String>) -> Self {
        self.exclusions = exclusions;
        self
    }

    /// Pins the clock used for `date`/`date-time` examples.
    pub fn at(mut self, now: DateTime<Utc>) -> Self {
        self.now = now;
        self
    }

    /// Synthesizes an example for `schema`.
    ///
    /// ## Examples
    ///
    /// ```
    /// use serde_json::json;
    /// use specpost_gen::spec::InterfaceSpec;
    /// use specpost_gen::synth::Synthesizer;
    ///
    /// let spec = InterfaceSpec::from_value(json!({
    ///     "components": {"schemas": {"Org": {
    ///         "type": "object",
    ///         "properties": {
    ///             "id": {"type": "string", "format": "uuid"},
    ///             "legalName": {"type": "string", "example": "Lerian"},
    ///             "active": {"type": "boolean"}
    ///         }
    ///     }}}
    /// }));
    ///
    /// let example = Synthesizer::new(&spec).synthesize(&json!({"$ref": "#/components/schemas/Org"}));
    /// assert_eq!(example, json!({
    ///     "id": "00000000-0000-0000-0000-000000000000",
    ///     "legalName": "Lerian",
    ///     "active": false
    /// }));
    /// ```
    pub fn synthesize(&self, schema: &Value) -> Value {
        self.node(schema, None, 0)
    }

    /// Synthesizes `schema` as the value of a property named `property`.
    pub fn synthesize_property(&self, property: &str, schema: &Value) -> Value {
        self.node(schema, Some(property), 0)
    }

    fn node(&self, schema: &Value, property: Option<&str>, depth: usize) -> Value {
        if depth > MAX_DEPTH {
            trace!(depth, "synthesis depth bound reached");
            return empty_for(schema);
        }

        if let Some(example) = explicit_example(schema) {
            return example;
        }

        if let Some(name) = property
            && let Some(example) = self.strategies.iter().find_map(|s| s.property_example(name, schema))
        {
            return example;
        }

        if let Some(reference) = schema.get("$ref").and_then(Value::as_str) {
            if let Some(name) = ref_name(reference)
                && let Some(example) = self.strategies.iter().find_map(|s| s.schema_example(name))
            {
                return example;
            }
            return match self.spec.resolve_schema_ref(reference) {
                Some(target) => self.node(target, property, depth + 1),
                None => {
                    debug!(%reference, "unresolvable schema reference synthesized as null");
                    Value::Null
                }
            };
        }

        if let Some(members) = schema.get("allOf").and_then(Value::as_array) {
            return self.all_of(schema, members, property, depth);
        }

        if let Some(first) = ["oneOf", "anyOf"]
            .iter()
            .find_map(|key| schema.get(*key).and_then(Value::as_array).and_then(|m| m.first()))
        {
            return self.node(first, property, depth + 1);
        }

        if let Some(first) = schema.get("enum").and_then(Value::as_array).and_then(|e| e.first()) {
            return first.clone();
        }

        match schema_type(schema) {
            Some("object") => self.object(schema, depth),
            Some("array") => self.array(schema, depth),
            Some("string") => self.string(schema, property),
            Some("integer") | Some("number") => Value::from(0),
            Some("boolean") => Value::Bool(false),
            _ => Value::Null,
        }
    }

    fn all_of(&self, schema: &Value, members: &[Value], property: Option<&str>, depth: usize) -> Value {
        let mut merged = Map::new();
        let mut last_scalar = None;

        for member in members {
            match self.node(member, property, depth + 1) {
                Value::Object(fields) => merged.extend(fields),
                other => last_scalar = Some(other),
            }
        }
        if let Value::Object(own) = self.object(schema, depth) {
            merged.extend(own);
        }

        match last_scalar {
            Some(scalar) if merged.is_empty() => scalar,
            _ => Value::Object(merged),
        }
    }

    fn object(&self, schema: &Value, depth: usize) -> Value {
        let mut out = Map::new();
        let properties = schema.get("properties").and_then(Value::as_object);

        for (name, prop) in properties.into_iter().flatten() {
            if self.exclusions.iter().any(|e| e == name) {
                continue;
            }
            let value = self.node(prop, Some(name), depth + 1);
            if is_empty_object(&value) {
                continue;
            }
            out.insert(name.clone(), value);
        }

        if properties.is_none_or(|p| p.is_empty()) {
            match schema.get("additionalProperties") {
                Some(Value::Bool(true)) => {
                    out.insert("key".to_string(), Value::String("value".to_string()));
                }
                Some(extra) if extra.is_object() => {
                    let value = self.node(extra, None, depth + 1);
                    out.insert("key1".to_string(), value.clone());
                    out.insert("key2".to_string(), value);
                }
                _ => {}
            }
        }

        Value::Object(out)
    }

    fn array(&self, schema: &Value, depth: usize) -> Value {
        let Some(items) = schema.get("items") else {
            return Value::Array(Vec::new());
        };
        let item = self.node(items, None, depth + 1);
        if is_empty_object(&item) {
            Value::Array(Vec::new())
        } else {
            Value::Array(vec![item])
        }
    }

    fn string(&self, schema: &Value, property: Option<&str>) -> Value {
        let text = match schema.get("format").and_then(Value::as_str) {
            Some("uuid") => NIL_UUID.to_string(),
            Some("date-time") => self.now.to_rfc3339_opts(SecondsFormat::Secs, true),
            Some("date") => self.now.format("%Y-%m-%d").to_string(),
            Some("email") => "user@example.com".to_string(),
            Some("uri") | Some("url") => "https://example.com".to_string(),
            _ => match property {
                Some(name) if is_id_name(name) => NIL_UUID.to_string(),
                Some(name) if is_timestamp_name(name) => self.now.to_rfc3339_opts(SecondsFormat::Secs, true),
                _ => "string".to_string(),
            },
        };
        Value::String(text)
    }
}

fn is_id_name(name: &str) -> bool {
    name == "id" || name.ends_with("Id") || name.ends_with("_id")
}

fn is_timestamp_name(name: &str) -> bool {
    name.ends_with("At") || name.ends_with("_at")
}

/// `example`, or the first of a non-empty `examples` array. JSON-looking
/// strings are parsed, falling back to the raw string.
fn explicit_example(schema: &Value) -> Option<Value> {
    let example = schema.get("example").cloned().or_else(|| {
        schema
            .get("examples")
            .and_then(Value::as_array)
            .and_then(|e| e.first())
            .cloned()
    })?;

    if let Value::String(text) = &example {
        let trimmed = text.trim_start();
        if (trimmed.starts_with('{') || trimmed.starts_with('['))
            && let Ok(parsed) = serde_json::from_str::<Value>(text)
        {
            return Some(parsed);
        }
    }
    Some(example)
}

fn empty_for(schema: &Value) -> Value {
    if schema_type(schema) == Some("array") {
        Value::Array(Vec::new())
    } else {
        Value::Object(Map::new())
    }
}

fn is_empty_object(value: &Value) -> bool {
    value.as_object().is_some_and(Map::is_empty)
}
