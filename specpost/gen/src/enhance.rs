//! Schema enhancement.
//!
//! Standardizes the error surface of an interface description:
//!
//! - Replaces an existing `Pagination` schema with a canonical envelope that
//!   supports both cursor- and offset-based navigation
//! - Replaces an existing `Error` schema with a canonical structured error
//! - Injects five canonical error responses (`BadRequest`, `Unauthorized`,
//!   `Forbidden`, `NotFound`, `InternalServerError`) with named examples
//! - Rewires every operation's 400/401/403/404/500 response to reference
//!   the canonical response, discarding whatever was declared there
//!
//! Schemas are only replaced when the source already declares them. The
//! rewrite is deliberately lossy and running it twice changes nothing.

use serde::Serialize;
use serde_json::{Map, Value, json};
use tracing::{debug, info};

use crate::spec::{InterfaceSpec, SpecVersion};

/// Status code to canonical response name.
pub const CANONICAL_RESPONSES: [(&str, &str); 5] = [
    ("400", "BadRequest"),
    ("401", "Unauthorized"),
    ("403", "Forbidden"),
    ("404", "NotFound"),
    ("500", "InternalServerError"),
];

const EXAMPLE_TIMESTAMP: &str = "2024-01-01T00:00:00Z";
const EXAMPLE_REQUEST_ID: &str = "00000000-0000-0000-0000-000000000000";

/// What the enhancer changed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct EnhanceSummary {
    pub pagination_replaced: bool,
    pub error_replaced: bool,
    pub responses_rewired: usize,
}

/// The canonical pagination envelope.
pub fn pagination_schema() -> Value {
    let nullable_int = |description: &str, example: i64| {
        json!({"type": "integer", "nullable": true, "description": description, "example": example})
    };
    let nullable_cursor = |description: &str| json!({"type": "string", "nullable": true, "description": description});

    json!({
        "type": "object",
        "description": "Paginated result envelope. Cursor and offset navigation fields are each optional.",
        "properties": {
            "items": {"type": "array", "items": {"type": "object"}},
            "next_cursor": nullable_cursor("Cursor for the next page, absent on the last page"),
            "prev_cursor": nullable_cursor("Cursor for the previous page, absent on the first page"),
            "page": nullable_int("Current page number for offset navigation", 1),
            "limit": nullable_int("Maximum number of items per page", 10),
            "total_items": nullable_int("Total number of items across all pages", 0),
            "total_pages": nullable_int("Total number of pages", 0)
        }
    })
}

/// The canonical structured error.
pub fn error_schema() -> Value {
    json!({
        "type": "object",
        "required": ["code", "message"],
        "properties": {
            "code": {"type": "string", "description": "Stable machine-readable error code", "example": "0001"},
            "title": {"type": "string", "description": "Short human-readable summary"},
            "message": {"type": "string", "description": "Human-readable explanation"},
            "details": {"type": "object", "additionalProperties": true},
            "entityType": {"type": "string", "description": "Type of the entity the error refers to"},
            "entityId": {"type": "string", "description": "Identifier of the entity the error refers to"},
            "fields": {
                "type": "object",
                "description": "Field name to violation message",
                "additionalProperties": {"type": "string"}
            },
            "requestId": {"type": "string", "format": "uuid"},
            "timestamp": {"type": "string", "format": "date-time"}
        }
    })
}

fn error_example(code: &str, title: &str, message: &str, extra: Value) -> Value {
    let mut example = json!({
        "code": code,
        "title": title,
        "message": message,
        "requestId": EXAMPLE_REQUEST_ID,
        "timestamp": EXAMPLE_TIMESTAMP
    });
    if let (Some(target), Value::Object(extra)) = (example.as_object_mut(), extra) {
        target.extend(extra);
    }
    example
}

/// Named examples for each canonical response.
pub fn canonical_examples(name: &str) -> Vec<(&'static str, Value)> {
    match name {
        "BadRequest" => vec![
            (
                "validationError",
                error_example(
                    "0009",
                    "Missing Fields in Request",
                    "Your request is missing one or more required fields.",
                    json!({"fields": {"legalName": "legalName is a required field"}}),
                ),
            ),
            (
                "invalidBody",
                error_example(
                    "0094",
                    "Invalid Request Body",
                    "The request body could not be parsed.",
                    json!({}),
                ),
            ),
        ],
        "Unauthorized" => vec![
            (
                "missingToken",
                error_example(
                    "0041",
                    "Token Missing",
                    "A valid bearer token must be provided in the Authorization header.",
                    json!({}),
                ),
            ),
            (
                "invalidToken",
                error_example("0042", "Invalid Token", "The provided token is expired or invalid.", json!({})),
            ),
        ],
        "Forbidden" => vec![(
            "insufficientPermissions",
            error_example(
                "0043",
                "Insufficient Privileges",
                "You do not have permission to perform this action.",
                json!({}),
            ),
        )],
        "NotFound" => vec![(
            "entityNotFound",
            error_example(
                "0007",
                "Entity Not Found",
                "No entity was found for the given identifier.",
                json!({"entityType": "Organization", "entityId": EXAMPLE_REQUEST_ID}),
            ),
        )],
        _ => vec![(
            "internalError",
            error_example(
                "0046",
                "Internal Server Error",
                "The server encountered an unexpected error. Please try again later.",
                json!({}),
            ),
        )],
    }
}

fn canonical_description(name: &str) -> &'static str {
    match name {
        "BadRequest" => "Bad Request: the request is malformed or failed validation",
        "Unauthorized" => "Unauthorized: authentication is missing or invalid",
        "Forbidden" => "Forbidden: the caller lacks permission for this action",
        "NotFound" => "Not Found: the requested entity does not exist",
        _ => "Internal Server Error: an unexpected server-side failure",
    }
}

/// Applies every enhancement to `spec` in place.
///
/// ## Examples
///
/// ```
/// use serde_json::json;
/// use specpost_gen::enhance::enhance;
/// use specpost_gen::spec::InterfaceSpec;
///
/// let mut spec = InterfaceSpec::from_value(json!({
///     "openapi": "3.0.0",
///     "paths": {"/v1/things": {"get": {"responses": {"404": {"description": "gone"}}}}}
/// }));
/// enhance(&mut spec);
///
/// assert_eq!(
///     spec.document()["paths"]["/v1/things"]["get"]["responses"]["404"],
///     json!({"$ref": "#/components/responses/NotFound"})
/// );
/// ```
pub fn enhance(spec: &mut InterfaceSpec) -> EnhanceSummary {
    let version = spec.version();
    let mut summary = EnhanceSummary::default();

    let schemas_pointer = match version {
        SpecVersion::OpenApi3 => "/components/schemas",
        SpecVersion::Swagger2 => "/definitions",
    };
    if let Some(schemas) = spec
        .document_mut()
        .pointer_mut(schemas_pointer)
        .and_then(Value::as_object_mut)
    {
        if let Some(pagination) = schemas.get_mut("Pagination") {
            *pagination = pagination_schema();
            summary.pagination_replaced = true;
        }
        if let Some(error) = schemas.get_mut("Error") {
            *error = error_schema();
            summary.error_replaced = true;
        }
    }

    inject_responses(spec, version, summary.error_replaced);
    summary.responses_rewired = rewire_operations(spec, version);

    info!(
        pagination = summary.pagination_replaced,
        error = summary.error_replaced,
        rewired = summary.responses_rewired,
        "enhanced interface description"
    );
    summary
}

fn response_ref(version: SpecVersion, name: &str) -> String {
    match version {
        SpecVersion::OpenApi3 => format!("#/components/responses/{name}"),
        SpecVersion::Swagger2 => format!("#/responses/{name}"),
    }
}

fn inject_responses(spec: &mut InterfaceSpec, version: SpecVersion, error_declared: bool) {
    let error_schema_node = match (version, error_declared) {
        (SpecVersion::OpenApi3, true) => json!({"$ref": "#/components/schemas/Error"}),
        (SpecVersion::Swagger2, true) => json!({"$ref": "#/definitions/Error"}),
        (_, false) => error_schema(),
    };

    let Some(root) = spec.document_mut().as_object_mut() else {
        return;
    };
    let container = match version {
        SpecVersion::OpenApi3 => object_entry(root, "components").and_then(|c| object_entry(c, "responses")),
        SpecVersion::Swagger2 => object_entry(root, "responses"),
    };
    let Some(container) = container else {
        return;
    };

    for (_, name) in CANONICAL_RESPONSES {
        let examples = canonical_examples(name);
        let response = match version {
            SpecVersion::OpenApi3 => {
                let named: Map<String, Value> = examples
                    .into_iter()
                    .map(|(key, value)| (key.to_string(), json!({"value": value})))
                    .collect();
                json!({
                    "description": canonical_description(name),
                    "content": {
                        "application/json": {
                            "schema": error_schema_node.clone(),
                            "examples": named
                        }
                    }
                })
            }
            SpecVersion::Swagger2 => {
                let first = examples.into_iter().next().map(|(_, v)| v).unwrap_or(Value::Null);
                json!({
                    "description": canonical_description(name),
                    "schema": error_schema_node.clone(),
                    "examples": {"application/json": first}
                })
            }
        };
        container.insert(name.to_string(), response);
    }
}

/// Returns the object stored at `key`, replacing any non-object value.
fn object_entry<'a>(map: &'a mut Map<String, Value>, key: &str) -> Option<&'a mut Map<String, Value>> {
    let slot = map.entry(key.to_string()).or_insert_with(|| Value::Object(Map::new()));
    if !slot.is_object() {
        *slot = Value::Object(Map::new());
    }
    slot.as_object_mut()
}

fn rewire_operations(spec: &mut InterfaceSpec, version: SpecVersion) -> usize {
    let Some(paths) = spec.paths_mut() else {
        return 0;
    };

    let mut rewired = 0;
    for (path, item) in paths.iter_mut() {
        let Some(item) = item.as_object_mut() else {
            continue;
        };
        for (method, operation) in item.iter_mut() {
            let Some(responses) = operation.get_mut("responses").and_then(Value::as_object_mut) else {
                continue;
            };
            for (status, name) in CANONICAL_RESPONSES {
                if let Some(response) = responses.get_mut(status) {
                    *response = json!({"$ref": response_ref(version, name)});
                    rewired += 1;
                    debug!(%path, %method, %status, "rewired error response");
                }
            }
        }
    }
    rewired
}
