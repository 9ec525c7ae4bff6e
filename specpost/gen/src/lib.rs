//! Specpost compiler library.
//!
//! This crate compiles an OpenAPI 3 or Swagger 2 interface description into
//! a runnable Postman-style request collection plus an environment template.
//! The compiled collection includes:
//!
//! - One folder per tag, each holding one request per operation
//! - Templated URLs bound to `{{variable}}` environment variables
//! - Materialized request bodies and response examples
//! - Pre-request scripts attaching auth and correlation headers
//! - Test scripts asserting status codes and extracting created identifiers
//! - An end-to-end workflow folder chaining a full resource lifecycle
//!
//! ## Modules
//!
//! - [`loader`] - Reading JSON/YAML descriptions from disk
//! - [`spec`] - Typed access to the parsed description and `$ref` resolution
//! - [`normalize`] / [`parser`] - Positional `:name` to `{name}` rewriting
//! - [`enhance`] - Canonical pagination/error schemas and error responses
//! - [`synth`] - Example synthesis with pluggable domain strategies
//! - [`url`] / [`request`] / [`scripts`] / [`deps`] - Item construction
//! - [`workflow`] - End-to-end workflow composition
//! - [`compile`] - The full pipeline
//! - [`output`] - Postman v2.1 rendering and atomic file writing
//! - [`config`] / [`validation`] - Profile loading and checks
//! - [`errors`] - Error types for the compiler
//!
//! ## Example Usage
//!
//! ```no_run
//! use std::path::Path;
//! use specpost_gen::compile::{CompileOptions, compile_file};
//! use specpost_gen::output::emit;
//!
//! let (collection, environment, report) =
//!     compile_file(Path::new("api/openapi.yaml"), &CompileOptions::default()).unwrap();
//! emit(&collection, &environment, Path::new("out/collection.json"), Some(Path::new("out/env.json"))).unwrap();
//! println!("{} items, {} uncovered", report.items, report.uncovered.len());
//! ```

pub mod compile;
pub mod config;
pub mod deps;
pub mod enhance;
pub mod errors;
pub mod loader;
pub mod normalize;
pub mod output;
pub mod parser;
pub mod request;
pub mod scripts;
pub mod spec;
pub mod synth;
pub mod url;
pub mod validation;
pub mod workflow;

#[cfg(test)]
pub(crate) mod test_utils;
