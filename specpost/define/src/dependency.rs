//! Endpoint dependency table.
//!
//! Maps `"METHOD PATH"` keys (bracketed placeholders) to the variables an
//! endpoint's successful response yields (`provides`) and the variables that
//! must already be bound before it runs (`requires`). Lookups are exact-string
//! matches; an absent key behaves as an empty entry.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::script::ExtractSource;
use crate::types::HttpMethod;

/// Provides/requires sets for one endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DependencyEntry {
    /// Variables yielded by a successful response, in extraction order.
    pub provides: Vec<String>,
    /// Variables that must be bound before invoking the endpoint.
    pub requires: Vec<String>,
    /// Per-variable extraction overrides.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub extract: BTreeMap<String, ExtractSource>,
}

impl DependencyEntry {
    pub fn new<P, R>(provides: P, requires: R) -> Self
    where
        P: IntoIterator,
        P::Item: Into<String>,
        R: IntoIterator,
        R::Item: Into<String>,
    {
        Self {
            provides: provides.into_iter().map(Into::into).collect(),
            requires: requires.into_iter().map(Into::into).collect(),
            extract: BTreeMap::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.provides.is_empty() && self.requires.is_empty()
    }

    /// Adds names not already present, keeping first-seen order.
    pub fn merge(&mut self, other: DependencyEntry) {
        for p in other.provides {
            if !self.provides.contains(&p) {
                self.provides.push(p);
            }
        }
        for r in other.requires {
            if !self.requires.contains(&r) {
                self.requires.push(r);
            }
        }
        for (variable, source) in other.extract {
            self.extract.entry(variable).or_insert(source);
        }
    }

    /// Chooses how `variable` is read from the endpoint's response.
    ///
    /// An explicit override wins. Otherwise alias-type variables read the
    /// top-level `alias` field, list-returning endpoints (a `GET` whose path
    /// does not end in a placeholder) read the first element's `id`, and
    /// everything else reads the top-level `id`.
    ///
    /// ## Examples
    ///
    /// ```
    /// use specpost_define::{DependencyEntry, ExtractSource, HttpMethod};
    ///
    /// let entry = DependencyEntry::new(["accountId", "accountAlias"], ["ledgerId"]);
    /// assert_eq!(
    ///     entry.extraction_for("accountAlias", HttpMethod::Post, "/v1/accounts"),
    ///     ExtractSource::Field("alias".into())
    /// );
    /// assert_eq!(
    ///     entry.extraction_for("balanceId", HttpMethod::Get, "/v1/accounts/{account_id}/balances"),
    ///     ExtractSource::FirstOfList("id".into())
    /// );
    /// ```
    pub fn extraction_for(&self, variable: &str, method: HttpMethod, path: &str) -> ExtractSource {
        if let Some(source) = self.extract.get(variable) {
            return source.clone();
        }

        if variable.to_ascii_lowercase().ends_with("alias") {
            return ExtractSource::Field("alias".to_string());
        }

        let ends_in_placeholder = path
            .trim_end_matches('/')
            .rsplit('/')
            .next()
            .is_some_and(|last| last.starts_with('{') && last.ends_with('}'));

        if method == HttpMethod::Get && !ends_in_placeholder {
            ExtractSource::FirstOfList("id".to_string())
        } else {
            ExtractSource::Field("id".to_string())
        }
    }
}

/// The full hand-authored table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DependencyTable {
    pub entries: BTreeMap<String, DependencyEntry>,
}

impl DependencyTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert keyed by `METHOD PATH`.
    pub fn with(mut self, key: impl Into<String>, entry: DependencyEntry) -> Self {
        self.insert(key, entry);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, entry: DependencyEntry) {
        self.entries.insert(key.into(), entry);
    }

    /// Exact-match lookup.
    pub fn get(&self, key: &str) -> Option<&DependencyEntry> {
        self.entries.get(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Every variable named in any entry's provides or requires.
    pub fn collect_variables(&self) -> BTreeSet<String> {
        self.entries
            .values()
            .flat_map(|e| e.provides.iter().chain(e.requires.iter()))
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_key_is_none() {
        let table = DependencyTable::new().with(
            "POST /v1/organizations",
            DependencyEntry::new(["organizationId"], Vec::<String>::new()),
        );
        assert!(table.get("POST /v1/organizations").is_some());
        assert!(table.get("post /v1/organizations").is_none());
    }

    #[test]
    fn collect_variables_spans_provides_and_requires() {
        let table = DependencyTable::new()
            .with("POST /a", DependencyEntry::new(["aId"], Vec::<String>::new()))
            .with("POST /a/{a_id}/b", DependencyEntry::new(["bId"], ["aId"]));

        let vars: Vec<_> = table.collect_variables().into_iter().collect();
        assert_eq!(vars, vec!["aId", "bId"]);
    }

    #[test]
    fn merge_deduplicates() {
        let mut entry = DependencyEntry::new(["aId"], ["orgId"]);
        entry.merge(DependencyEntry::new(["aId", "aAlias"], ["orgId", "ledgerId"]));
        assert_eq!(entry.provides, vec!["aId", "aAlias"]);
        assert_eq!(entry.requires, vec!["orgId", "ledgerId"]);
    }

    #[test]
    fn explicit_extract_override_wins() {
        let mut entry = DependencyEntry::new(["code"], Vec::<String>::new());
        entry
            .extract
            .insert("code".into(), ExtractSource::Field("code".into()));
        assert_eq!(
            entry.extraction_for("code", HttpMethod::Post, "/v1/assets"),
            ExtractSource::Field("code".into())
        );
    }

    #[test]
    fn single_resource_get_reads_top_level_id() {
        let entry = DependencyEntry::default();
        assert_eq!(
            entry.extraction_for("ledgerId", HttpMethod::Get, "/v1/ledgers/{id}"),
            ExtractSource::Field("id".into())
        );
    }
}
