//! Compiler profile: every hand-authored table in one place.
//!
//! A [`Profile`] carries the path-normalization tokens, parameter naming
//! rules, base-URL routing, dependency table, workflow, and synthesis
//! strategy. `Profile::default()` is the built-in financial-ledger profile;
//! a TOML profile file overrides only the fields it names.
//!
//! ## Examples
//!
//! ```
//! use specpost_define::{Profile, SynthesisStrategy};
//!
//! let profile = Profile::default();
//! assert_eq!(profile.strategy, SynthesisStrategy::Ledger);
//! assert_eq!(profile.routing.default_variable, "onboardingUrl");
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::dependency::DependencyTable;
use crate::ledger;
use crate::routing::{ResourceSegment, RoutingTable};
use crate::types::HttpMethod;
use crate::workflow::WorkflowConfig;

/// Which domain heuristic set the example synthesizer layers on top of the
/// generic type-driven algorithm.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum SynthesisStrategy {
    /// Financial-ledger vocabulary: status objects, postal addresses,
    /// metadata maps, currency codes, and `Send` transfer shapes.
    #[default]
    Ledger,
    /// No domain heuristics.
    Generic,
}

/// A fixed plain-text body emitted instead of JSON synthesis for matching
/// endpoints (e.g. a transaction DSL upload).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextBody {
    pub method: HttpMethod,
    /// Matches when the operation path ends with this suffix.
    pub path_suffix: String,
    pub content: String,
}

impl TextBody {
    pub fn matches(&self, method: HttpMethod, path: &str) -> bool {
        self.method == method && path.trim_end_matches('/').ends_with(&self.path_suffix)
    }
}

/// Bundled compiler configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Profile {
    /// Positional `:name` tokens the path normalizer rewrites to `{name}`.
    pub positional_params: Vec<String>,
    /// Fixed parameter-name to environment-variable mapping.
    pub parameter_variables: BTreeMap<String, String>,
    /// Resource segments used to name a bare `{id}`, checked nearest-first.
    pub id_resources: Vec<ResourceSegment>,
    pub routing: RoutingTable,
    /// Environment variable holding the bearer token.
    pub auth_variable: String,
    pub dependencies: DependencyTable,
    pub workflow: WorkflowConfig,
    pub strategy: SynthesisStrategy,
    /// Properties never synthesized into body-parameter examples.
    pub body_parameter_exclusions: Vec<String>,
    pub text_bodies: Vec<TextBody>,
}

impl Default for Profile {
    fn default() -> Self {
        Self::ledger()
    }
}

impl Profile {
    /// The built-in financial-ledger profile.
    pub fn ledger() -> Self {
        Self {
            positional_params: ledger::positional_params(),
            parameter_variables: ledger::parameter_variables(),
            id_resources: ledger::id_resources(),
            routing: ledger::routing(),
            auth_variable: "authToken".to_string(),
            dependencies: ledger::dependencies(),
            workflow: ledger::workflow(),
            strategy: SynthesisStrategy::Ledger,
            body_parameter_exclusions: vec!["parentOrganizationId".to_string()],
            text_bodies: vec![ledger::transaction_dsl_body()],
        }
    }

    /// A profile with no domain tables, routing everything to `baseUrl`.
    pub fn generic() -> Self {
        Self {
            positional_params: vec!["id".to_string()],
            parameter_variables: BTreeMap::new(),
            id_resources: Vec::new(),
            routing: RoutingTable::default(),
            auth_variable: "authToken".to_string(),
            dependencies: DependencyTable::new(),
            workflow: WorkflowConfig::default(),
            strategy: SynthesisStrategy::Generic,
            body_parameter_exclusions: Vec::new(),
            text_bodies: Vec::new(),
        }
    }

    /// Every variable the environment template should carry: base URLs,
    /// the auth token, then every dependency variable.
    pub fn environment_variables(&self) -> Vec<String> {
        let mut vars: Vec<String> = self
            .routing
            .variables()
            .into_iter()
            .map(str::to_string)
            .collect();
        if !vars.contains(&self.auth_variable) {
            vars.push(self.auth_variable.clone());
        }
        for var in self.dependencies.collect_variables() {
            if !vars.contains(&var) {
                vars.push(var);
            }
        }
        vars
    }

    /// The text body configured for an endpoint, if any.
    pub fn text_body_for(&self, method: HttpMethod, path: &str) -> Option<&TextBody> {
        self.text_bodies.iter().find(|t| t.matches(method, path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn environment_variables_start_with_base_urls_and_token() {
        let vars = Profile::ledger().environment_variables();
        assert_eq!(&vars[..3], &["onboardingUrl", "transactionUrl", "authToken"]);
        assert!(vars.iter().any(|v| v == "organizationId"));
        assert!(vars.iter().any(|v| v == "accountAlias"));
    }

    #[test]
    fn environment_variables_are_unique() {
        let vars = Profile::ledger().environment_variables();
        let mut deduped = vars.clone();
        deduped.sort();
        deduped.dedup();
        assert_eq!(vars.len(), deduped.len());
    }

    #[test]
    fn partial_toml_profile_keeps_ledger_defaults() {
        let profile: Profile = toml::from_str(
            r#"
            auth_variable = "token"
            strategy = "generic"
            "#,
        )
        .unwrap();

        assert_eq!(profile.auth_variable, "token");
        assert_eq!(profile.strategy, SynthesisStrategy::Generic);
        assert_eq!(profile.routing, Profile::ledger().routing);
        assert!(!profile.dependencies.is_empty());
    }

    #[test]
    fn toml_profile_overrides_dependencies() {
        let profile: Profile = toml::from_str(
            r#"
            [dependencies."POST /v1/widgets"]
            provides = ["widgetId"]

            [dependencies."GET /v1/widgets/{id}"]
            requires = ["widgetId"]
            "#,
        )
        .unwrap();

        assert_eq!(profile.dependencies.len(), 2);
        assert_eq!(
            profile.dependencies.get("POST /v1/widgets").unwrap().provides,
            vec!["widgetId"]
        );
    }

    #[test]
    fn text_body_matches_dsl_endpoint() {
        let profile = Profile::ledger();
        assert!(
            profile
                .text_body_for(
                    HttpMethod::Post,
                    "/v1/organizations/{organization_id}/ledgers/{ledger_id}/transactions/dsl"
                )
                .is_some()
        );
        assert!(
            profile
                .text_body_for(
                    HttpMethod::Post,
                    "/v1/organizations/{organization_id}/ledgers/{ledger_id}/transactions/json"
                )
                .is_none()
        );
    }
}
