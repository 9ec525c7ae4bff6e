//! Path template utilities.
//!
//! - Normalizes positional `:name` parameters into bracketed `{name}` form
//! - Recognizes whole-segment `{param}` placeholders
//! - Converts snake_case parameter names into camelCase variable names

/// Rewrites every known positional token (`:organization_id`) in `path` to
/// its bracketed form (`{organization_id}`). Unknown tokens are left as
/// literal segments. Already-bracketed paths are returned unchanged, so the
/// operation is idempotent.
///
/// ## Examples
///
/// ```
/// use specpost_gen::parser::normalize_path;
///
/// let known = ["organization_id".to_string(), "id".to_string()];
/// assert_eq!(
///     normalize_path("/v1/organizations/:organization_id/ledgers/:id", &known),
///     "/v1/organizations/{organization_id}/ledgers/{id}"
/// );
/// assert_eq!(normalize_path("/v1/things/:thing", &known), "/v1/things/:thing");
/// ```
pub fn normalize_path(path: &str, known: &[String]) -> String {
    path.split('/')
        .map(|segment| match segment.strip_prefix(':') {
            Some(name) if known.iter().any(|k| k == name) => format!("{{{name}}}"),
            _ => segment.to_string(),
        })
        .collect::<Vec<_>>()
        .join("/")
}

/// Returns the parameter name if `segment` is a whole `{name}` placeholder.
pub fn placeholder_name(segment: &str) -> Option<&str> {
    segment
        .strip_prefix('{')
        .and_then(|s| s.strip_suffix('}'))
        .filter(|s| !s.is_empty())
}

/// Converts a snake_case or kebab-case name into camelCase.
///
/// ## Examples
///
/// ```
/// use specpost_gen::parser::to_camel_case;
///
/// assert_eq!(to_camel_case("asset_rate_id"), "assetRateId");
/// assert_eq!(to_camel_case("external-id"), "externalId");
/// assert_eq!(to_camel_case("alreadyCamel"), "alreadyCamel");
/// ```
pub fn to_camel_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut upper_next = false;

    for c in name.chars() {
        if c == '_' || c == '-' {
            upper_next = !out.is_empty();
            continue;
        }
        if upper_next {
            out.extend(c.to_uppercase());
            upper_next = false;
        } else {
            out.push(c);
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn known() -> Vec<String> {
        ["organization_id", "ledger_id", "id"]
            .into_iter()
            .map(str::to_string)
            .collect()
    }

    #[test]
    fn normalize_is_noop_on_bracketed_paths() {
        let path = "/v1/organizations/{organization_id}/ledgers/{id}";
        assert_eq!(normalize_path(path, &known()), path);
    }

    #[test]
    fn normalize_is_idempotent() {
        let paths = [
            "/v1/organizations/:organization_id",
            "/v1/organizations/:organization_id/ledgers/:ledger_id/assets/:id",
            "/v1/things/:unknown/:id",
            "/",
            "",
        ];
        for path in paths {
            let once = normalize_path(path, &known());
            assert_eq!(normalize_path(&once, &known()), once, "not idempotent for {path}");
        }
    }

    #[test]
    fn normalize_does_not_touch_partial_tokens() {
        assert_eq!(normalize_path("/v1/a:id/b", &known()), "/v1/a:id/b");
        assert_eq!(normalize_path("/v1/:id_extra", &known()), "/v1/:id_extra");
    }

    #[test]
    fn placeholder_name_requires_whole_segment() {
        assert_eq!(placeholder_name("{id}"), Some("id"));
        assert_eq!(placeholder_name("x{id}"), None);
        assert_eq!(placeholder_name("{}"), None);
    }

    #[test]
    fn camel_case_ignores_leading_separators() {
        assert_eq!(to_camel_case("_private_name"), "privateName");
        assert_eq!(to_camel_case("id"), "id");
    }
}
