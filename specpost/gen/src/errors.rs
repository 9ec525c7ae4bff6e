//! Error types for the specpost compiler.
//!
//! Only structural and I/O problems are errors. Coverage gaps (an unresolved
//! `$ref`, an endpoint missing from the dependency table, a workflow step
//! with no matching item) degrade the output and are reported through
//! `tracing` and the compile report instead.

use thiserror::Error;

/// Fatal errors that abort a compile run before any output is written.
#[derive(Debug, Error)]
pub enum CompileError {
    /// Input interface description does not exist
    #[error("Interface description not found: {path}")]
    SpecNotFound { path: String },

    /// Input could not be read or deserialized
    #[error("Failed to parse interface description '{path}': {message}")]
    SpecParse { path: String, message: String },

    /// Input extension is neither JSON nor YAML
    #[error("Unsupported interface description format '{extension}' for '{path}' (expected .json, .yaml or .yml)")]
    UnsupportedFormat { path: String, extension: String },

    /// Profile file does not exist
    #[error("Profile not found: {path}")]
    ProfileNotFound { path: String },

    /// Profile file could not be parsed
    #[error("Failed to parse profile '{path}': {message}")]
    ProfileParse { path: String, message: String },

    /// Profile parsed but is internally inconsistent
    #[error("Invalid profile: {0}")]
    InvalidProfile(String),

    /// Failed to serialize an output artifact
    #[error("Failed to serialize {artifact}: {source}")]
    Serialize {
        artifact: &'static str,
        #[source]
        source: serde_json::Error,
    },

    /// Failed to write an output file
    #[error("Failed to write output file '{path}': {source}")]
    WriteError {
        path: String,
        #[source]
        source: std::io::Error,
    },
}
