//! Interface description loading.
//!
//! Reads a JSON or YAML document from disk, choosing the deserializer by file
//! extension. Missing files, unsupported extensions, and parse failures are
//! all fatal; nothing is produced from a document that did not load cleanly.

use std::fs;
use std::path::Path;

use serde_json::Value;
use tracing::{debug, info};

use crate::errors::CompileError;
use crate::spec::InterfaceSpec;

/// Input formats recognized by extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpecFormat {
    Json,
    Yaml,
}

impl SpecFormat {
    /// Detects the format from `path`'s extension (case-insensitive).
    ///
    /// ## Examples
    ///
    /// ```
    /// use std::path::Path;
    /// use specpost_gen::loader::SpecFormat;
    ///
    /// assert_eq!(SpecFormat::from_path(Path::new("api.YML")).unwrap(), SpecFormat::Yaml);
    /// assert!(SpecFormat::from_path(Path::new("api.txt")).is_err());
    /// ```
    pub fn from_path(path: &Path) -> Result<Self, CompileError> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();

        match extension.as_str() {
            "json" => Ok(SpecFormat::Json),
            "yaml" | "yml" => Ok(SpecFormat::Yaml),
            _ => Err(CompileError::UnsupportedFormat {
                path: path.display().to_string(),
                extension,
            }),
        }
    }
}

/// Parses `content` in the given format into a document value.
pub fn parse_document(content: &str, format: SpecFormat) -> Result<Value, String> {
    match format {
        SpecFormat::Json => serde_json::from_str(content).map_err(|e| e.to_string()),
        SpecFormat::Yaml => serde_yaml::from_str(content).map_err(|e| e.to_string()),
    }
}

/// Loads an interface description from disk.
///
/// ## Errors
///
/// - `CompileError::SpecNotFound` if `path` does not exist
/// - `CompileError::UnsupportedFormat` for extensions other than json/yaml/yml
/// - `CompileError::SpecParse` if the file cannot be read or deserialized, or
///   its root is not a mapping
pub fn load(path: &Path) -> Result<InterfaceSpec, CompileError> {
    if !path.exists() {
        return Err(CompileError::SpecNotFound {
            path: path.display().to_string(),
        });
    }

    let format = SpecFormat::from_path(path)?;
    let parse_err = |message: String| CompileError::SpecParse {
        path: path.display().to_string(),
        message,
    };

    let content = fs::read_to_string(path).map_err(|e| parse_err(e.to_string()))?;
    let document = parse_document(&content, format).map_err(parse_err)?;

    if !document.is_object() {
        return Err(parse_err("expected a mapping at the document root".to_string()));
    }

    let spec = InterfaceSpec::from_value(document);
    debug!(path = %path.display(), ?format, version = ?spec.version(), "parsed interface description");
    info!(
        path = %path.display(),
        paths = spec.paths().map_or(0, |p| p.len()),
        "loaded interface description"
    );

    Ok(spec)
}
