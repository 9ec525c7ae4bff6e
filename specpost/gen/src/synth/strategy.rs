//! Pluggable domain heuristics for example synthesis.
//!
//! The generic synthesizer only knows about types and formats. A strategy
//! can claim a property (by name) or a named schema (by `$ref` target) and
//! return a hand-shaped example instead.

use serde_json::Value;
use specpost_define::SynthesisStrategy;

use super::ledger::LedgerStrategy;

/// Domain-specific example provider consulted before generic synthesis.
pub trait ExampleStrategy: Send + Sync {
    /// Short identifier used in log lines.
    fn name(&self) -> &'static str;

    /// Example for a property named `property` with schema `schema`, or
    /// `None` to fall through to generic synthesis.
    fn property_example(&self, property: &str, schema: &Value) -> Option<Value>;

    /// Example for a named schema reached through `$ref`.
    fn schema_example(&self, _schema_name: &str) -> Option<Value> {
        None
    }
}

/// The strategy set selected by a profile.
pub fn strategies_for(strategy: SynthesisStrategy) -> Vec<Box<dyn ExampleStrategy>> {
    match strategy {
        SynthesisStrategy::Ledger => vec![Box::new(LedgerStrategy)],
        SynthesisStrategy::Generic => Vec::new(),
    }
}

/// The schema's declared type, taking the first non-null entry of a type
/// list and inferring `object`/`array` from `properties`/`items`.
pub fn schema_type(schema: &Value) -> Option<&str> {
    match schema.get("type") {
        Some(Value::String(t)) => Some(t.as_str()),
        Some(Value::Array(types)) => types.iter().filter_map(Value::as_str).find(|t| *t != "null"),
        _ if schema.get("properties").is_some() || schema.get("additionalProperties").is_some() => Some("object"),
        _ if schema.get("items").is_some() => Some("array"),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn generic_strategy_set_is_empty() {
        assert!(strategies_for(SynthesisStrategy::Generic).is_empty());
        assert_eq!(strategies_for(SynthesisStrategy::Ledger)[0].name(), "ledger");
    }

    #[test]
    fn schema_type_inference() {
        assert_eq!(schema_type(&json!({"type": ["null", "string"]})), Some("string"));
        assert_eq!(schema_type(&json!({"properties": {}})), Some("object"));
        assert_eq!(schema_type(&json!({"items": {}})), Some("array"));
        assert_eq!(schema_type(&json!({})), None);
    }
}
