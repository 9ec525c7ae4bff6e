//! Collection and environment emission.
//!
//! This module maps the compiled model onto the Postman v2.1 collection
//! wire format and writes both artifacts to disk. Everything is rendered in
//! memory before the first file is touched, and each file is written
//! atomically, so a failed run never leaves partial output behind.
//!
//! ## Output Structure
//!
//! ```text
//! {
//!   "info":     { "name", "description", "schema" },
//!   "item":     [ { "name": <group>, "item": [ <request items> ] } ],
//!   "variable": [ { "key", "value" } ]
//! }
//! ```

use std::fs;
use std::path::Path;

use serde::Serialize;
use specpost_define::{
    Collection, CollectionItem, CollectionVariable, Environment, EnvironmentValue, Header, ItemGroup, QueryParam,
    RequestBody, ResponseExample, Script,
};
use tracing::info;

use crate::errors::CompileError;
use crate::scripts::render_script;

/// Postman collection format v2.1 schema identifier.
pub const POSTMAN_SCHEMA: &str = "https://schema.getpostman.com/json/collection/v2.1.0/collection.json";

#[derive(Serialize)]
struct WireCollection<'a> {
    info: WireInfo<'a>,
    item: Vec<WireFolder<'a>>,
    variable: &'a [CollectionVariable],
}

#[derive(Serialize)]
struct WireInfo<'a> {
    name: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<&'a str>,
    schema: &'static str,
}

#[derive(Serialize)]
struct WireFolder<'a> {
    name: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<&'a str>,
    item: Vec<WireItem<'a>>,
}

#[derive(Serialize)]
struct WireItem<'a> {
    name: &'a str,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    event: Vec<WireEvent>,
    request: WireRequest<'a>,
    response: Vec<WireResponse<'a>>,
}

#[derive(Serialize)]
struct WireEvent {
    listen: &'static str,
    script: WireScript,
}

#[derive(Serialize)]
struct WireScript {
    #[serde(rename = "type")]
    kind: &'static str,
    exec: Vec<String>,
}

#[derive(Serialize)]
struct WireRequest<'a> {
    method: String,
    header: &'a [Header],
    #[serde(skip_serializing_if = "Option::is_none")]
    body: Option<WireBody>,
    url: WireUrl<'a>,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<&'a str>,
}

#[derive(Serialize)]
struct WireBody {
    mode: &'static str,
    raw: String,
    options: WireBodyOptions,
}

#[derive(Serialize)]
struct WireBodyOptions {
    raw: WireRawOptions,
}

#[derive(Serialize)]
struct WireRawOptions {
    language: &'static str,
}

#[derive(Serialize)]
struct WireUrl<'a> {
    raw: String,
    host: Vec<String>,
    path: &'a [String],
    #[serde(skip_serializing_if = "<[_]>::is_empty")]
    query: &'a [QueryParam],
}

#[derive(Serialize)]
struct WireResponse<'a> {
    name: &'a str,
    status: &'a str,
    code: u16,
    #[serde(rename = "_postman_previewlanguage")]
    preview_language: &'static str,
    header: Vec<Header>,
    body: String,
}

#[derive(Serialize)]
struct WireEnvironment<'a> {
    name: &'a str,
    values: &'a [EnvironmentValue],
    #[serde(rename = "_postman_variable_scope")]
    scope: &'static str,
}

fn event(listen: &'static str, script: &Script) -> Option<WireEvent> {
    (!script.is_empty()).then(|| WireEvent {
        listen,
        script: WireScript {
            kind: "text/javascript",
            exec: render_script(script),
        },
    })
}

fn wire_body(body: &RequestBody) -> Result<WireBody, CompileError> {
    let (raw, language) = match body {
        RequestBody::Json(value) => (
            serde_json::to_string_pretty(value).map_err(|source| CompileError::Serialize {
                artifact: "request body",
                source,
            })?,
            "json",
        ),
        RequestBody::Text(text) => (text.clone(), "text"),
    };
    Ok(WireBody {
        mode: "raw",
        raw,
        options: WireBodyOptions {
            raw: WireRawOptions { language },
        },
    })
}

fn wire_response(example: &ResponseExample) -> Result<WireResponse<'_>, CompileError> {
    let body = match &example.body {
        Some(value) => serde_json::to_string_pretty(value).map_err(|source| CompileError::Serialize {
            artifact: "response example",
            source,
        })?,
        None => String::new(),
    };
    Ok(WireResponse {
        name: &example.name,
        status: &example.reason,
        code: example.status,
        preview_language: "json",
        header: vec![Header::new("Content-Type", "application/json")],
        body,
    })
}

fn wire_item(item: &CollectionItem) -> Result<WireItem<'_>, CompileError> {
    let events = [
        event("prerequest", &item.pre_request_script),
        event("test", &item.test_script),
    ]
    .into_iter()
    .flatten()
    .collect();

    Ok(WireItem {
        name: &item.name,
        event: events,
        request: WireRequest {
            method: item.method.to_string(),
            header: &item.headers,
            body: item.body.as_ref().map(wire_body).transpose()?,
            url: WireUrl {
                raw: item.url.raw(),
                host: vec![format!("{{{{{}}}}}", item.url.base_variable)],
                path: &item.url.segments,
                query: &item.url.query,
            },
            description: item.description.as_deref(),
        },
        response: item
            .response_examples
            .iter()
            .map(wire_response)
            .collect::<Result<_, _>>()?,
    })
}

fn wire_folder(group: &ItemGroup) -> Result<WireFolder<'_>, CompileError> {
    Ok(WireFolder {
        name: &group.name,
        description: group.description.as_deref(),
        item: group.items.iter().map(wire_item).collect::<Result<_, _>>()?,
    })
}

/// Renders `collection` as a Postman v2.1 collection document.
///
/// ## Errors
///
/// Returns `CompileError::Serialize` if any embedded value fails to serialize.
pub fn render_collection(collection: &Collection) -> Result<String, CompileError> {
    let wire = WireCollection {
        info: WireInfo {
            name: &collection.name,
            description: collection.description.as_deref(),
            schema: POSTMAN_SCHEMA,
        },
        item: collection.groups.iter().map(wire_folder).collect::<Result<_, _>>()?,
        variable: &collection.variables,
    };
    serde_json::to_string_pretty(&wire).map_err(|source| CompileError::Serialize {
        artifact: "collection",
        source,
    })
}

/// Renders `environment` as a Postman environment document.
pub fn render_environment(environment: &Environment) -> Result<String, CompileError> {
    let wire = WireEnvironment {
        name: &environment.name,
        values: &environment.values,
        scope: "environment",
    };
    serde_json::to_string_pretty(&wire).map_err(|source| CompileError::Serialize {
        artifact: "environment",
        source,
    })
}

/// Writes content to a file atomically.
///
/// Writes to a sibling temporary file first, then renames it into place, so
/// the target is never observed half-written.
///
/// ## Errors
///
/// Returns `CompileError::WriteError` if:
/// - Parent directories cannot be created
/// - The temp file cannot be written
/// - The rename operation fails
pub fn write_atomic(path: &Path, content: &str) -> Result<(), CompileError> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).map_err(|e| CompileError::WriteError {
            path: parent.display().to_string(),
            source: e,
        })?;
    }

    let temp_path = path.with_extension("tmp");
    fs::write(&temp_path, content).map_err(|e| CompileError::WriteError {
        path: temp_path.display().to_string(),
        source: e,
    })?;

    fs::rename(&temp_path, path).map_err(|e| CompileError::WriteError {
        path: path.display().to_string(),
        source: e,
    })?;

    Ok(())
}

/// Renders both artifacts, then writes the collection and (when requested)
/// the environment template.
///
/// ## Errors
///
/// Returns `CompileError::Serialize` or `CompileError::WriteError`. A
/// serialization failure happens before any file is written.
pub fn emit(
    collection: &Collection,
    environment: &Environment,
    output: &Path,
    env_output: Option<&Path>,
) -> Result<(), CompileError> {
    let collection_json = render_collection(collection)?;
    let environment_json = env_output.map(|_| render_environment(environment)).transpose()?;

    write_atomic(output, &collection_json)?;
    info!(path = %output.display(), items = collection.item_count(), "wrote collection");

    if let (Some(path), Some(content)) = (env_output, environment_json) {
        write_atomic(path, &content)?;
        info!(path = %path.display(), variables = environment.values.len(), "wrote environment");
    }

    Ok(())
}
