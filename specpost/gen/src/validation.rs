//! Validation for compiler profiles.
//!
//! A profile loaded from disk is checked before any compilation starts, so a
//! typo in a hand-authored table fails loudly instead of silently producing
//! unbound URLs or unreachable workflow jumps.
//!
//! ## Validation Checks
//!
//! - **Routing**: the default and every route variable are non-empty, and no
//!   route has an empty segment
//! - **Auth variable**: non-empty
//! - **Dependency keys**: every key parses as `METHOD /path`
//! - **Workflow steps**: names are non-empty and unique, since they double as
//!   jump targets
//!
//! ## Examples
//!
//! ```
//! use specpost_define::Profile;
//! use specpost_gen::validation::validate_profile;
//!
//! assert!(validate_profile(&Profile::ledger()).is_ok());
//! assert!(validate_profile(&Profile::generic()).is_ok());
//! ```

use std::collections::HashSet;

use specpost_define::{EndpointKey, Profile};

use crate::errors::CompileError;

/// Validates a profile before compilation.
///
/// ## Errors
///
/// Returns `CompileError::InvalidProfile` describing the first problem found.
pub fn validate_profile(profile: &Profile) -> Result<(), CompileError> {
    if profile.routing.default_variable.trim().is_empty() {
        return Err(CompileError::InvalidProfile(
            "routing.default_variable cannot be empty".to_string(),
        ));
    }
    for route in &profile.routing.routes {
        if route.segment.trim().is_empty() || route.variable.trim().is_empty() {
            return Err(CompileError::InvalidProfile(format!(
                "route '{}' -> '{}' must name both a segment and a variable",
                route.segment, route.variable
            )));
        }
    }

    if profile.auth_variable.trim().is_empty() {
        return Err(CompileError::InvalidProfile("auth_variable cannot be empty".to_string()));
    }

    for key in profile.dependencies.entries.keys() {
        key.parse::<EndpointKey>()
            .map_err(|e| CompileError::InvalidProfile(format!("dependency table: {e}")))?;
    }

    let mut seen = HashSet::new();
    for step in &profile.workflow.steps {
        if step.name.trim().is_empty() {
            return Err(CompileError::InvalidProfile(format!(
                "workflow step for {} {} has an empty name",
                step.method, step.path
            )));
        }
        if !seen.insert(step.name.as_str()) {
            return Err(CompileError::InvalidProfile(format!(
                "workflow step name '{}' is used more than once",
                step.name
            )));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use specpost_define::{DependencyEntry, HttpMethod, Route, WorkflowStep};

    #[test]
    fn duplicate_step_names_are_rejected() {
        let mut profile = Profile::generic();
        profile.workflow.steps = vec![
            WorkflowStep::new(HttpMethod::Post, "/a", "Create"),
            WorkflowStep::new(HttpMethod::Post, "/b", "Create"),
        ];

        let err = validate_profile(&profile).unwrap_err();
        assert!(err.to_string().contains("'Create' is used more than once"));
    }

    #[test]
    fn malformed_dependency_key_is_rejected() {
        let mut profile = Profile::generic();
        profile
            .dependencies
            .insert("FETCH /v1/things", DependencyEntry::default());

        assert!(matches!(validate_profile(&profile), Err(CompileError::InvalidProfile(_))));
    }

    #[test]
    fn relative_dependency_path_is_rejected() {
        let mut profile = Profile::generic();
        profile.dependencies.insert("GET things", DependencyEntry::default());

        let err = validate_profile(&profile).unwrap_err();
        assert!(err.to_string().contains("must start with '/'"));
    }

    #[test]
    fn empty_route_variable_is_rejected() {
        let mut profile = Profile::generic();
        profile.routing.routes.push(Route::new("transactions", ""));

        assert!(validate_profile(&profile).is_err());
    }

    #[test]
    fn empty_auth_variable_is_rejected() {
        let mut profile = Profile::generic();
        profile.auth_variable = " ".into();

        assert!(validate_profile(&profile).is_err());
    }
}
