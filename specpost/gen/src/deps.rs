//! Dependency lookup for compiled operations.
//!
//! The profile's table is authoritative and looked up by exact
//! `METHOD PATH` key. Operations may add names through `x-provides` and
//! `x-requires` annotations; an operation covered by neither gets an empty
//! entry and no extraction or precondition warnings.

use specpost_define::{DependencyEntry, DependencyTable};
use tracing::debug;

use crate::spec::Operation;

pub const PROVIDES_EXTENSION: &str = "x-provides";
pub const REQUIRES_EXTENSION: &str = "x-requires";

/// The resolved entry for one operation and whether anything covered it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedDependencies {
    pub entry: DependencyEntry,
    pub covered: bool,
}

/// Table entry for `operation`, extended by its annotations.
///
/// ## Examples
///
/// ```
/// use serde_json::json;
/// use specpost_define::{DependencyEntry, DependencyTable};
/// use specpost_gen::deps::resolve;
/// use specpost_gen::spec::InterfaceSpec;
///
/// let spec = InterfaceSpec::from_value(json!({"paths": {"/v1/widgets": {
///     "post": {"x-provides": ["widgetId"], "responses": {}}
/// }}}));
/// let table = DependencyTable::new();
///
/// let operations = spec.operations();
/// let op = &operations[0];
/// let resolved = resolve(op, &table);
/// assert!(resolved.covered);
/// assert_eq!(resolved.entry.provides, vec!["widgetId"]);
/// ```
pub fn resolve(operation: &Operation<'_>, table: &DependencyTable) -> ResolvedDependencies {
    let key = operation.key();
    let from_table = table.get(&key).cloned();
    let covered_by_table = from_table.is_some();
    let mut entry = from_table.unwrap_or_default();

    entry.merge(DependencyEntry::new(
        operation.extension_list(PROVIDES_EXTENSION),
        operation.extension_list(REQUIRES_EXTENSION),
    ));

    let covered = covered_by_table || !entry.is_empty();
    if !covered {
        debug!(endpoint = %key, "no dependency entry; scripts carry no extraction");
    }

    ResolvedDependencies { entry, covered }
}
