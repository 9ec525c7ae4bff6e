//! Declarative URL routing and parameter naming tables.
//!
//! These replace substring checks scattered through request building with
//! data: a first-match route table choosing the base-URL variable, and a
//! resource-segment table used to name a bare `{id}` placeholder.

use serde::{Deserialize, Serialize};

/// Routes paths containing `segment` to the `variable` base URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Route {
    /// Path segment matched as `/segment/` or a trailing `/segment`.
    pub segment: String,
    pub variable: String,
}

impl Route {
    pub fn new(segment: impl Into<String>, variable: impl Into<String>) -> Self {
        Self {
            segment: segment.into(),
            variable: variable.into(),
        }
    }

    /// Returns `true` when `path` contains this route's segment as a whole
    /// path segment.
    ///
    /// ## Examples
    ///
    /// ```
    /// use specpost_define::Route;
    ///
    /// let route = Route::new("balances", "transactionUrl");
    /// assert!(route.matches("/v1/organizations/{organization_id}/balances"));
    /// assert!(route.matches("/v1/balances/{id}"));
    /// assert!(!route.matches("/v1/balances-report"));
    /// ```
    pub fn matches(&self, path: &str) -> bool {
        path.split('/').any(|s| s == self.segment)
    }
}

/// Names the variable a bare `{id}` binds to when it follows `segment`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceSegment {
    pub segment: String,
    pub variable: String,
}

impl ResourceSegment {
    pub fn new(segment: impl Into<String>, variable: impl Into<String>) -> Self {
        Self {
            segment: segment.into(),
            variable: variable.into(),
        }
    }
}

/// Route table with a fallback.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoutingTable {
    pub routes: Vec<Route>,
    pub default_variable: String,
}

impl Default for RoutingTable {
    fn default() -> Self {
        Self {
            routes: Vec::new(),
            default_variable: "baseUrl".to_string(),
        }
    }
}

impl RoutingTable {
    /// Base-URL variable for `path`; first matching route wins.
    pub fn base_variable(&self, path: &str) -> &str {
        self.routes
            .iter()
            .find(|r| r.matches(path))
            .map(|r| r.variable.as_str())
            .unwrap_or(&self.default_variable)
    }

    /// Every distinct base-URL variable, default first.
    pub fn variables(&self) -> Vec<&str> {
        let mut vars = vec![self.default_variable.as_str()];
        for route in &self.routes {
            if !vars.contains(&route.variable.as_str()) {
                vars.push(&route.variable);
            }
        }
        vars
    }
}
