//! URL construction and path-parameter naming.
//!
//! Every bracketed path segment becomes a `{{variable}}` token:
//!
//! 1. Names in the profile's parameter table map to fixed variables
//!    (`organization_id` → `organizationId`).
//! 2. A bare `id` is named after the nearest preceding resource segment
//!    (`/balances/{id}` → `balanceId`).
//! 3. Anything else is converted mechanically to camelCase.
//!
//! The base-URL variable comes from the profile's routing table.

use specpost_define::{PathBinding, Profile, QueryParam, RequestUrl};

use crate::parser::{placeholder_name, to_camel_case};

/// Variable bound to a path parameter, given the literal segments that
/// precede it.
///
/// ## Examples
///
/// ```
/// use specpost_define::Profile;
/// use specpost_gen::url::variable_for;
///
/// let profile = Profile::ledger();
/// assert_eq!(variable_for("ledger_id", &[], &profile), "ledgerId");
/// assert_eq!(variable_for("id", &["v1", "organizations"], &profile), "organizationId");
/// assert_eq!(variable_for("id", &["v1", "organizations", "ledgers", "balances"], &profile), "balanceId");
/// assert_eq!(variable_for("widget_key", &[], &profile), "widgetKey");
/// ```
pub fn variable_for(param: &str, preceding: &[&str], profile: &Profile) -> String {
    if let Some(variable) = profile.parameter_variables.get(param) {
        return variable.clone();
    }

    if param == "id" {
        let nearest = preceding.iter().rev().find_map(|segment| {
            profile
                .id_resources
                .iter()
                .find(|r| r.segment == *segment)
                .map(|r| r.variable.clone())
        });
        return nearest.unwrap_or_else(|| param.to_string());
    }

    to_camel_case(param)
}

/// Builds the templated URL for `path`.
///
/// ## Examples
///
/// ```
/// use specpost_define::Profile;
/// use specpost_gen::url::build_url;
///
/// let url = build_url("/v1/organizations/{id}", &Profile::ledger(), Vec::new());
/// assert_eq!(url.raw(), "{{onboardingUrl}}/v1/organizations/{{organizationId}}");
/// assert_eq!(url.path_bindings[0].variable, "organizationId");
/// ```
pub fn build_url(path: &str, profile: &Profile, query: Vec<QueryParam>) -> RequestUrl {
    let mut literal: Vec<&str> = Vec::new();
    let mut segments = Vec::new();
    let mut path_bindings = Vec::new();

    for segment in path.split('/').filter(|s| !s.is_empty()) {
        match placeholder_name(segment) {
            Some(name) => {
                let binding = PathBinding {
                    name: name.to_string(),
                    variable: variable_for(name, &literal, profile),
                };
                segments.push(binding.token());
                path_bindings.push(binding);
            }
            None => {
                literal.push(segment);
                segments.push(segment.to_string());
            }
        }
    }

    RequestUrl {
        base_variable: profile.routing.base_variable(path).to_string(),
        segments,
        path_bindings,
        query,
    }
}
