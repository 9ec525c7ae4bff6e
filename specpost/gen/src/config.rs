//! Profile loading.
//!
//! Without `--profile` the built-in ledger profile is used. A TOML profile
//! only needs the fields it changes; everything else keeps the ledger
//! defaults.

use std::fs;
use std::path::Path;

use specpost_define::Profile;
use tracing::{debug, info};

use crate::errors::CompileError;
use crate::validation::validate_profile;

/// Parses and validates a TOML profile document.
///
/// ## Examples
///
/// ```
/// use specpost_gen::config::parse_profile;
///
/// let profile = parse_profile("auth_variable = \"apiKey\"", "inline.toml").unwrap();
/// assert_eq!(profile.auth_variable, "apiKey");
/// assert_eq!(profile.routing.default_variable, "onboardingUrl");
/// ```
///
/// ## Errors
///
/// Returns `CompileError::ProfileParse` for invalid TOML and
/// `CompileError::InvalidProfile` if validation fails.
pub fn parse_profile(content: &str, origin: &str) -> Result<Profile, CompileError> {
    let profile: Profile = toml::from_str(content).map_err(|e| CompileError::ProfileParse {
        path: origin.to_string(),
        message: e.to_string(),
    })?;
    validate_profile(&profile)?;
    Ok(profile)
}

/// Loads the profile at `path`, or the built-in one when `path` is `None`.
///
/// ## Errors
///
/// - `CompileError::ProfileNotFound` if `path` does not exist
/// - `CompileError::ProfileParse` if it cannot be read or parsed
/// - `CompileError::InvalidProfile` if validation fails
pub fn load_profile(path: Option<&Path>) -> Result<Profile, CompileError> {
    let Some(path) = path else {
        debug!("using built-in ledger profile");
        return Ok(Profile::default());
    };

    if !path.exists() {
        return Err(CompileError::ProfileNotFound {
            path: path.display().to_string(),
        });
    }

    let origin = path.display().to_string();
    let content = fs::read_to_string(path).map_err(|e| CompileError::ProfileParse {
        path: origin.clone(),
        message: e.to_string(),
    })?;
    let profile = parse_profile(&content, &origin)?;

    info!(
        path = %origin,
        strategy = ?profile.strategy,
        dependencies = profile.dependencies.len(),
        workflow_steps = profile.workflow.steps.len(),
        "loaded profile"
    );
    Ok(profile)
}

#[cfg(test)]
mod tests {
    use super::*;
    use specpost_define::SynthesisStrategy;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn no_path_means_ledger_profile() {
        let profile = load_profile(None).unwrap();
        assert_eq!(profile, Profile::ledger());
    }

    #[test]
    fn missing_file_is_profile_not_found() {
        let err = load_profile(Some(Path::new("/definitely/not/here.toml"))).unwrap_err();
        assert!(matches!(err, CompileError::ProfileNotFound { .. }));
    }

    #[test]
    fn partial_profile_overrides_only_named_fields() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
strategy = "generic"

[routing]
default_variable = "apiUrl"

[workflow]
folder_name = "Smoke"
steps = []
"#
        )
        .unwrap();

        let profile = load_profile(Some(file.path())).unwrap();
        assert_eq!(profile.strategy, SynthesisStrategy::Generic);
        assert_eq!(profile.routing.default_variable, "apiUrl");
        assert!(profile.routing.routes.is_empty());
        assert_eq!(profile.workflow.folder_name, "Smoke");
        assert_eq!(profile.auth_variable, "authToken");
        assert_eq!(profile.dependencies, Profile::ledger().dependencies);
    }

    #[test]
    fn invalid_toml_is_profile_parse() {
        let err = parse_profile("strategy = [", "bad.toml").unwrap_err();
        assert!(matches!(err, CompileError::ProfileParse { .. }));
    }

    #[test]
    fn inconsistent_profile_is_rejected() {
        let err = parse_profile("auth_variable = \"\"", "empty-auth.toml").unwrap_err();
        assert!(matches!(err, CompileError::InvalidProfile(_)));
    }
}
