//! Shared test utilities for specpost-gen tests.
//!
//! Fixture builders for interface descriptions and collection items, plus a
//! small interpreter that runs generated [`Script`]s against a mock response
//! and environment the way the request runner would.

use std::collections::BTreeMap;

use chrono::{DateTime, TimeZone, Utc};
use serde_json::{Value, json};
use specpost_define::{
    CollectionItem, ExtractSource, HttpMethod, RequestBody, RequestUrl, Script, Statement,
};

use crate::spec::InterfaceSpec;

/// A fixed instant for deterministic `date-time` examples.
pub fn fixed_clock() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 15, 10, 30, 0)
        .single()
        .unwrap_or_default()
}

/// An OpenAPI 3 document with the given `paths` and `components.schemas`.
pub fn openapi(paths: Value, schemas: Value) -> InterfaceSpec {
    InterfaceSpec::from_value(json!({
        "openapi": "3.0.1",
        "info": {"title": "Test API", "description": "Fixture", "version": "1.0.0"},
        "servers": [{"url": "http://localhost:3000"}],
        "paths": paths,
        "components": {"schemas": schemas}
    }))
}

/// A Swagger 2 document with the given `paths` and `definitions`.
pub fn swagger(paths: Value, definitions: Value) -> InterfaceSpec {
    InterfaceSpec::from_value(json!({
        "swagger": "2.0",
        "info": {"title": "Test API", "version": "1.0.0"},
        "host": "localhost:3000",
        "basePath": "/",
        "schemes": ["http"],
        "paths": paths,
        "definitions": definitions
    }))
}

/// A compiled item with an empty JSON body and default scripts.
///
/// ## Arguments
///
/// * `name` - Display name
/// * `method` - HTTP method
/// * `path` - Path template with bracketed placeholders
pub fn make_item(name: &str, method: HttpMethod, path: &str) -> CollectionItem {
    CollectionItem {
        name: name.to_string(),
        method,
        path: path.to_string(),
        url: RequestUrl {
            base_variable: "baseUrl".to_string(),
            segments: path
                .split('/')
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect(),
            path_bindings: vec![],
            query: vec![],
        },
        headers: vec![],
        body: Some(RequestBody::Json(json!({"name": "string"}))),
        description: None,
        pre_request_script: Script::new(),
        test_script: Script::new(),
        response_examples: vec![],
    }
}

// === Script interpreter ===

/// The response a script runs against.
#[derive(Debug, Clone)]
pub struct MockResponse {
    pub status: u16,
    pub body: Option<Value>,
}

impl MockResponse {
    pub fn json(status: u16, body: Value) -> Self {
        Self {
            status,
            body: Some(body),
        }
    }

    pub fn empty(status: u16) -> Self {
        Self { status, body: None }
    }
}

/// Everything a script did besides writing the environment.
#[derive(Debug, Default)]
pub struct ScriptOutcome {
    pub failures: Vec<String>,
    pub warnings: Vec<String>,
    pub headers: Vec<(String, String)>,
    pub logs: Vec<String>,
    /// `Some(None)` when the script stopped the run.
    pub next_request: Option<Option<String>>,
}

/// Runs `script` against `response`, mutating `env` like `pm.environment`.
pub fn run_script(
    script: &Script,
    response: &MockResponse,
    env: &mut BTreeMap<String, String>,
) -> ScriptOutcome {
    let mut outcome = ScriptOutcome::default();

    for statement in script.iter() {
        match statement {
            Statement::AttachAuth { variable } => match env.get(variable).filter(|v| !v.is_empty()) {
                Some(token) => outcome
                    .headers
                    .push(("Authorization".to_string(), format!("Bearer {token}"))),
                None => outcome.warnings.push(format!("{variable} is not set")),
            },
            Statement::AttachRequestId => outcome
                .headers
                .push(("X-Request-Id".to_string(), "generated-guid".to_string())),
            Statement::WarnIfUnset { variable } => {
                if env.get(variable).is_none_or(|v| v.is_empty()) {
                    outcome.warnings.push(format!("Required variable {variable} is not set"));
                }
            }
            Statement::AssertStatus { expected } => {
                if !expected.accepts(response.status) {
                    outcome
                        .failures
                        .push(format!("status {} not in {:?}", response.status, expected.codes()));
                }
            }
            Statement::AssertJsonBody => {
                if response.status != 204 && response.body.is_none() {
                    outcome.failures.push("body is not JSON".to_string());
                }
            }
            Statement::Extract { variable, source } => {
                if let Some(value) = response.body.as_ref().and_then(|b| extract(b, source)) {
                    env.insert(variable.clone(), value);
                }
            }
            Statement::SetNextRequest { name } => outcome.next_request = Some(name.clone()),
            Statement::Log { message } => outcome.logs.push(message.clone()),
        }
    }

    outcome
}

fn extract(body: &Value, source: &ExtractSource) -> Option<String> {
    let (holder, field) = match source {
        ExtractSource::Field(field) => (body, field),
        ExtractSource::FirstOfList(field) => {
            let list = match body {
                Value::Array(items) => items,
                other => other
                    .get("data")
                    .or_else(|| other.get("items"))
                    .and_then(Value::as_array)?,
            };
            (list.first()?, field)
        }
    };

    match holder.get(field)? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
