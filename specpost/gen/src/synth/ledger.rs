//! Financial-ledger example heuristics.
//!
//! Reproduces the vocabulary of the ledger API family: entity status
//! objects, postal addresses, metadata maps, currency codes, and the nested
//! `Send` debit/credit transfer shape with scaled integer amounts.

use serde_json::{Value, json};

use super::strategy::{ExampleStrategy, schema_type};

pub const DEFAULT_ASSET: &str = "USD";

/// Example heuristics for the ledger domain.
#[derive(Debug, Clone, Copy, Default)]
pub struct LedgerStrategy;

/// Fixed-shape entity status.
pub fn status_example() -> Value {
    json!({"code": "ACTIVE"})
}

pub fn address_example() -> Value {
    json!({
        "line1": "Street 1",
        "line2": "Avenue 2",
        "zipCode": "10001",
        "city": "New York",
        "state": "NY",
        "country": "US"
    })
}

pub fn metadata_example() -> Value {
    json!({"key": "value"})
}

fn amount(value: i64) -> Value {
    json!({"asset": DEFAULT_ASSET, "value": value, "scale": 2})
}

/// A balanced transfer: one external debit, one account credit.
pub fn send_example() -> Value {
    json!({
        "asset": DEFAULT_ASSET,
        "value": 100,
        "scale": 2,
        "source": {
            "from": [{
                "account": format!("@external/{DEFAULT_ASSET}"),
                "amount": amount(100),
                "description": "Debit from external account",
                "metadata": metadata_example()
            }]
        },
        "distribute": {
            "to": [{
                "account": "{{accountAlias}}",
                "amount": amount(100),
                "description": "Credit to account",
                "metadata": metadata_example()
            }]
        }
    })
}

impl ExampleStrategy for LedgerStrategy {
    fn name(&self) -> &'static str {
        "ledger"
    }

    fn property_example(&self, property: &str, schema: &Value) -> Option<Value> {
        let lower = property.to_ascii_lowercase();
        let is_string = schema_type(schema) == Some("string");

        match lower.as_str() {
            "status" => Some(status_example()),
            "metadata" => Some(metadata_example()),
            "send" => Some(send_example()),
            "assetcode" | "asset_code" | "currency" | "currencycode" | "currency_code" => {
                Some(Value::String(DEFAULT_ASSET.to_string()))
            }
            _ if lower.ends_with("address") && !is_string => Some(address_example()),
            _ => None,
        }
    }

    fn schema_example(&self, schema_name: &str) -> Option<Value> {
        match schema_name {
            "Send" => Some(send_example()),
            "Status" => Some(status_example()),
            "Address" => Some(address_example()),
            _ => None,
        }
    }
}
