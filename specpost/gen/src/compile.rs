//! The compile pipeline.
//!
//! ```text
//! load → normalize paths → enhance → build items → group by tag
//!      → collection variables → workflow folder → environment template
//! ```
//!
//! Every stage after loading is infallible: coverage gaps become log lines
//! and entries in the [`CompileReport`], never errors.

use std::path::Path;

use chrono::{DateTime, Utc};
use serde::Serialize;
use specpost_define::{
    Collection, CollectionItem, CollectionVariable, DEFAULT_GROUP, Environment, EnvironmentValue, ItemGroup, Profile,
};
use tracing::{debug, info};

use crate::deps;
use crate::enhance::{EnhanceSummary, enhance};
use crate::errors::CompileError;
use crate::loader;
use crate::normalize::normalize_paths;
use crate::request::RequestBuilder;
use crate::spec::InterfaceSpec;
use crate::workflow::{WorkflowReport, compose_workflow};

/// Name used when the description has no `info.title`.
pub const DEFAULT_TITLE: &str = "API Collection";

/// Knobs for one compile run.
#[derive(Debug, Clone)]
pub struct CompileOptions {
    pub profile: Profile,
    /// Append the end-to-end workflow folder.
    pub include_workflow: bool,
    /// Pins the clock used for synthesized timestamps.
    pub now: Option<DateTime<Utc>>,
}

impl Default for CompileOptions {
    fn default() -> Self {
        Self {
            profile: Profile::default(),
            include_workflow: true,
            now: None,
        }
    }
}

/// Summary of a compile run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CompileReport {
    pub title: String,
    pub groups: usize,
    pub items: usize,
    pub enhance: EnhanceSummary,
    /// Endpoint keys with no dependency coverage.
    pub uncovered: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub workflow: Option<WorkflowReport>,
}

/// Groups items by tag, keeping first-seen tag order. Items without a tag
/// land in [`DEFAULT_GROUP`].
///
/// ## Examples
///
/// ```
/// use specpost_define::HttpMethod;
/// use specpost_gen::compile::group_by_tag;
/// # use specpost_define::{CollectionItem, RequestUrl, Script};
/// # fn item(name: &str) -> CollectionItem {
/// #     CollectionItem {
/// #         name: name.into(), method: HttpMethod::Get, path: "/".into(),
/// #         url: RequestUrl { base_variable: "baseUrl".into(), segments: vec![], path_bindings: vec![], query: vec![] },
/// #         headers: vec![], body: None, description: None,
/// #         pre_request_script: Script::new(), test_script: Script::new(), response_examples: vec![],
/// #     }
/// # }
///
/// let groups = group_by_tag(vec![
///     (Some("Ledgers".to_string()), item("a")),
///     (None, item("b")),
///     (Some("Ledgers".to_string()), item("c")),
/// ]);
/// assert_eq!(groups.len(), 2);
/// assert_eq!(groups[0].name, "Ledgers");
/// assert_eq!(groups[0].items.len(), 2);
/// assert_eq!(groups[1].name, "default");
/// ```
pub fn group_by_tag(items: Vec<(Option<String>, CollectionItem)>) -> Vec<ItemGroup> {
    let mut groups: Vec<ItemGroup> = Vec::new();
    for (tag, item) in items {
        let name = tag.unwrap_or_else(|| DEFAULT_GROUP.to_string());
        match groups.iter_mut().find(|g| g.name == name) {
            Some(group) => group.items.push(item),
            None => {
                let mut group = ItemGroup::new(name);
                group.items.push(item);
                groups.push(group);
            }
        }
    }
    groups
}

/// Collection-level variables: each base-URL variable, pre-filled from the
/// first declared server, then the auth variable.
pub fn collection_variables(spec: &InterfaceSpec, profile: &Profile) -> Vec<CollectionVariable> {
    let server = spec.servers().into_iter().next().unwrap_or_default();
    let mut variables: Vec<CollectionVariable> = profile
        .routing
        .variables()
        .into_iter()
        .map(|key| CollectionVariable {
            key: key.to_string(),
            value: server.clone(),
        })
        .collect();

    if !variables.iter().any(|v| v.key == profile.auth_variable) {
        variables.push(CollectionVariable {
            key: profile.auth_variable.clone(),
            value: String::new(),
        });
    }
    variables
}

/// Environment template: every profile variable plus any introduced by
/// operation annotations, all empty.
///
/// Environment scope shadows collection scope in the runner, so keys the
/// collection already pre-fills are emitted disabled.
pub fn build_environment(
    title: &str,
    profile: &Profile,
    annotated: &[String],
    collection_variables: &[CollectionVariable],
) -> Environment {
    let mut keys = profile.environment_variables();
    for variable in annotated {
        if !keys.contains(variable) {
            keys.push(variable.clone());
        }
    }

    let prefilled = |key: &str| {
        collection_variables
            .iter()
            .any(|v| v.key == key && !v.value.is_empty())
    };

    Environment {
        name: format!("{title} Environment"),
        values: keys
            .into_iter()
            .map(|key| {
                if prefilled(&key) {
                    EnvironmentValue::disabled(key)
                } else {
                    EnvironmentValue::empty(key)
                }
            })
            .collect(),
    }
}

/// Compiles an already-loaded interface description.
pub fn compile(mut spec: InterfaceSpec, options: &CompileOptions) -> (Collection, Environment, CompileReport) {
    let profile = &options.profile;

    normalize_paths(&mut spec, &profile.positional_params);
    let enhance_summary = enhance(&mut spec);

    let mut builder = RequestBuilder::new(&spec, profile);
    if let Some(now) = options.now {
        builder = builder.at(now);
    }

    let mut uncovered = Vec::new();
    let mut annotated = Vec::new();
    let mut tagged = Vec::new();

    for operation in spec.operations() {
        let resolved = deps::resolve(&operation, &profile.dependencies);
        if !resolved.covered {
            uncovered.push(operation.key());
        }
        for variable in resolved.entry.provides.iter().chain(&resolved.entry.requires) {
            if !annotated.contains(variable) {
                annotated.push(variable.clone());
            }
        }

        let item = builder.build_item(&operation, &resolved.entry);
        let tag = operation.tags().first().map(|t| t.to_string());
        tagged.push((tag, item));
    }

    let title = spec.title().unwrap_or(DEFAULT_TITLE).to_string();
    let mut collection = Collection {
        name: title.clone(),
        description: spec.description().map(str::to_string),
        groups: group_by_tag(tagged),
        variables: collection_variables(&spec, profile),
    };

    let workflow = options.include_workflow.then(|| {
        let (folder, report) = compose_workflow(&collection, &profile.workflow);
        if folder.items.is_empty() {
            debug!("workflow matched no items; folder omitted");
        } else {
            collection.groups.push(folder);
        }
        report
    });

    let environment = build_environment(&title, profile, &annotated, &collection.variables);

    let report = CompileReport {
        title,
        groups: collection.groups.len(),
        items: collection.item_count(),
        enhance: enhance_summary,
        uncovered,
        workflow,
    };
    info!(
        groups = report.groups,
        items = report.items,
        uncovered = report.uncovered.len(),
        "compiled collection"
    );

    (collection, environment, report)
}

/// Loads `input` and compiles it.
///
/// ## Errors
///
/// Returns the loader's errors; compilation itself cannot fail.
pub fn compile_file(
    input: &Path,
    options: &CompileOptions,
) -> Result<(Collection, Environment, CompileReport), CompileError> {
    let spec = loader::load(input)?;
    Ok(compile(spec, options))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use specpost_define::{HttpMethod, WorkflowConfig, WorkflowStep};

    use crate::test_utils::{fixed_clock, openapi};

    fn options(include_workflow: bool) -> CompileOptions {
        CompileOptions {
            include_workflow,
            now: Some(fixed_clock()),
            ..CompileOptions::default()
        }
    }

    fn spec() -> InterfaceSpec {
        openapi(
            json!({
                "/v1/organizations": {
                    "post": {"tags": ["Organizations"], "summary": "Create an Organization", "responses": {"201": {"description": "ok"}}},
                    "get": {"tags": ["Organizations"], "summary": "List Organizations", "responses": {"200": {"description": "ok"}}}
                },
                "/v1/organizations/:id": {
                    "get": {"summary": "Retrieve an Organization", "responses": {}}
                },
                "/health": {"get": {"responses": {}}}
            }),
            json!({}),
        )
    }

    #[test]
    fn groups_follow_first_seen_tag_order() {
        let (collection, _, report) = compile(spec(), &options(false));

        let names: Vec<_> = collection.groups.iter().map(|g| g.name.as_str()).collect();
        assert_eq!(names, vec!["Organizations", "default"]);
        assert_eq!(report.items, 4);
        assert!(report.workflow.is_none());
    }

    #[test]
    fn positional_paths_are_normalized_before_building() {
        let (collection, _, _) = compile(spec(), &options(false));
        let item = collection
            .items()
            .find(|i| i.name == "Retrieve an Organization")
            .unwrap();

        assert_eq!(item.path, "/v1/organizations/{id}");
        assert_eq!(item.url.raw(), "{{onboardingUrl}}/v1/organizations/{{organizationId}}");
    }

    #[test]
    fn uncovered_endpoints_are_reported() {
        let (_, _, report) = compile(spec(), &options(false));
        assert_eq!(report.uncovered, vec!["GET /health"]);
    }

    #[test]
    fn collection_variables_use_first_server() {
        let (collection, _, _) = compile(spec(), &options(false));
        let keys: Vec<_> = collection.variables.iter().map(|v| v.key.as_str()).collect();

        assert_eq!(keys, vec!["onboardingUrl", "transactionUrl", "authToken"]);
        assert_eq!(collection.variables[0].value, "http://localhost:3000");
        assert_eq!(collection.variables[2].value, "");
    }

    #[test]
    fn environment_lists_every_dependency_variable() {
        let (_, environment, _) = compile(spec(), &options(false));

        for key in ["onboardingUrl", "transactionUrl", "authToken", "organizationId", "ledgerId", "accountAlias"] {
            assert!(environment.contains(key), "missing {key}");
        }
        assert!(environment.values.iter().all(|v| v.value.is_empty()));
        assert_eq!(environment.name, "Test API Environment");
    }

    #[test]
    fn prefilled_base_urls_are_not_shadowed_by_environment() {
        let (collection, environment, _) = compile(spec(), &options(false));

        for variable in &collection.variables {
            let entry = environment
                .values
                .iter()
                .find(|v| v.key == variable.key)
                .unwrap_or_else(|| panic!("missing {}", variable.key));
            assert_eq!(entry.enabled, variable.value.is_empty(), "{}", variable.key);
        }
        let org = environment.values.iter().find(|v| v.key == "organizationId").unwrap();
        assert!(org.enabled);
    }

    #[test]
    fn environment_without_servers_keeps_everything_enabled() {
        let environment = build_environment("Bare", &Profile::ledger(), &[], &[]);
        assert!(environment.values.iter().all(|v| v.enabled));
        assert!(environment.contains("onboardingUrl"));
    }

    #[test]
    fn annotated_variables_reach_environment() {
        let spec = openapi(
            json!({"/v1/widgets": {"post": {"x-provides": ["widgetId"], "responses": {}}}}),
            json!({}),
        );
        let (_, environment, report) = compile(spec, &options(false));

        assert!(environment.contains("widgetId"));
        assert!(report.uncovered.is_empty());
    }

    #[test]
    fn workflow_folder_is_appended_last() {
        let mut options = options(true);
        options.profile.workflow = WorkflowConfig {
            folder_name: "E2E".into(),
            steps: vec![
                WorkflowStep::new(HttpMethod::Post, "/v1/organizations", "1. Create"),
                WorkflowStep::new(HttpMethod::Delete, "/v1/organizations/{id}", "2. Delete"),
            ],
            ..WorkflowConfig::default()
        };

        let (collection, _, report) = compile(spec(), &options);

        assert_eq!(collection.groups.last().map(|g| g.name.as_str()), Some("E2E"));
        let workflow = report.workflow.unwrap();
        assert_eq!(workflow.included, vec!["1. Create"]);
        assert_eq!(workflow.skipped.len(), 1);
        assert_eq!(report.items, 5);
    }
}
