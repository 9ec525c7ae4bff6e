//! Path normalization over a whole interface description.

use serde_json::{Map, Value};
use tracing::debug;

use crate::parser::normalize_path;
use crate::spec::InterfaceSpec;

/// Rewrites every `paths` key from positional `:name` syntax to bracketed
/// `{name}` syntax, preserving order. When two keys normalize to the same
/// path, their operations are merged and the first declaration of a method
/// wins.
pub fn normalize_paths(spec: &mut InterfaceSpec, known: &[String]) {
    let Some(paths) = spec.paths_mut() else {
        return;
    };

    let original = std::mem::take(paths);
    for (path, item) in original {
        let normalized = normalize_path(&path, known);
        if normalized != path {
            debug!(from = %path, to = %normalized, "normalized path");
        }

        if let Some(existing) = paths.get_mut(&normalized) {
            if let (Value::Object(existing), Value::Object(incoming)) = (existing, item) {
                merge_missing(existing, incoming);
            }
            continue;
        }
        paths.insert(normalized, item);
    }
}

fn merge_missing(existing: &mut Map<String, Value>, incoming: Map<String, Value>) {
    for (key, value) in incoming {
        existing.entry(key).or_insert(value);
    }
}
