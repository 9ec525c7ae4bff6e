//! End-to-end workflow composition.
//!
//! Clones an ordered subset of compiled items into one folder, renames them,
//! applies body overrides, and chains them with `setNextRequest` jumps so a
//! runner executes the full resource lifecycle in order. Steps with no
//! matching item are dropped and reported as [`WorkflowWarning`]s; they never
//! abort compilation.
//!
//! A runner resolves a jump target to the first item with that name anywhere
//! in the collection, so every workflow item gets a name no other item uses.

use std::collections::HashSet;

use serde::Serialize;
use serde_json::Value;
use specpost_define::{
    BodyOverride, Collection, CollectionItem, Header, HttpMethod, ItemGroup, RequestBody, Statement, WorkflowConfig,
    WorkflowStep,
};
use tracing::{debug, info, warn};

use crate::request::JSON_MEDIA_TYPE;

/// A workflow step dropped because no compiled item matched it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WorkflowWarning {
    pub step: String,
    pub method: HttpMethod,
    pub path: String,
}

/// Outcome of composing the workflow folder.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct WorkflowReport {
    /// Names of the steps that made it into the folder, in order.
    pub included: Vec<String>,
    pub skipped: Vec<WorkflowWarning>,
}

/// Finds the item a step clones: an exact path match first, otherwise the
/// first item whose path contains `path`.
pub fn find_item<'c>(collection: &'c Collection, method: HttpMethod, path: &str) -> Option<&'c CollectionItem> {
    let mut candidates = collection.items().filter(|item| item.method == method);
    collection
        .items()
        .find(|item| item.method == method && item.path == path)
        .or_else(|| candidates.find(|item| item.path.contains(path)))
}

/// Builds the workflow folder from `collection` following `config`.
///
/// ## Examples
///
/// ```
/// use specpost_define::{Collection, HttpMethod, WorkflowConfig};
/// use specpost_gen::workflow::compose_workflow;
///
/// let collection = Collection { name: "Empty".into(), description: None, groups: vec![], variables: vec![] };
/// let (folder, report) = compose_workflow(&collection, &WorkflowConfig::default());
/// assert!(folder.items.is_empty());
/// assert!(report.skipped.is_empty());
/// ```
pub fn compose_workflow(collection: &Collection, config: &WorkflowConfig) -> (ItemGroup, WorkflowReport) {
    let mut folder = ItemGroup::new(config.folder_name.clone());
    let mut report = WorkflowReport::default();
    let mut taken: HashSet<String> = collection.items().map(|item| item.name.clone()).collect();

    for step in &config.steps {
        match find_item(collection, step.method, &step.path) {
            Some(item) => {
                let name = unique_name(&step.name, &config.folder_name, &mut taken);
                folder.items.push(clone_for_step(item, step, name));
                report.included.push(step.name.clone());
            }
            None => {
                warn!(
                    step = %step.name,
                    method = %step.method,
                    path = %step.path,
                    "workflow step has no matching item; skipping"
                );
                report.skipped.push(WorkflowWarning {
                    step: step.name.clone(),
                    method: step.method,
                    path: step.path.clone(),
                });
            }
        }
    }

    chain(&mut folder.items, &config.completion_message);

    info!(
        folder = %folder.name,
        included = report.included.len(),
        skipped = report.skipped.len(),
        "composed workflow"
    );
    (folder, report)
}

/// `step`, or `"{folder}: {step}"` when an item already uses that name, with
/// a numeric suffix as the last resort.
fn unique_name(step: &str, folder: &str, taken: &mut HashSet<String>) -> String {
    let mut name = step.to_string();
    if taken.contains(&name) {
        name = format!("{folder}: {step}");
        let mut n = 2;
        while taken.contains(&name) {
            name = format!("{folder}: {step} #{n}");
            n += 1;
        }
        debug!(step, %name, "renamed workflow item to keep jump targets unique");
    }
    taken.insert(name.clone());
    name
}

fn clone_for_step(item: &CollectionItem, step: &WorkflowStep, name: String) -> CollectionItem {
    let mut cloned = item.clone();
    cloned.name = name;

    if let Some(body) = &step.body {
        apply_override(&mut cloned, body);
    }
    cloned
}

fn apply_override(item: &mut CollectionItem, body: &BodyOverride) {
    match body {
        BodyOverride::Merge(fields) => match item.body.as_mut().and_then(RequestBody::as_json_mut) {
            Some(Value::Object(existing)) => {
                existing.extend(fields.iter().map(|(k, v)| (k.clone(), v.clone())));
            }
            _ => item.body = Some(RequestBody::Json(Value::Object(fields.clone()))),
        },
        BodyOverride::Replace(value) => item.body = Some(RequestBody::Json(value.clone())),
    }

    if item.header("Content-Type").is_none() {
        item.headers.push(Header::new("Content-Type", JSON_MEDIA_TYPE));
    }
}

/// Appends the jump to the next step on every item, and the completion log
/// plus a run stop on the last.
fn chain(items: &mut [CollectionItem], completion_message: &str) {
    let names: Vec<String> = items.iter().map(|i| i.name.clone()).collect();
    let last = items.len().saturating_sub(1);

    for (index, item) in items.iter_mut().enumerate() {
        if index < last {
            item.test_script.push(Statement::SetNextRequest {
                name: Some(names[index + 1].clone()),
            });
        } else {
            item.test_script.push(Statement::Log {
                message: completion_message.to_string(),
            });
            item.test_script.push(Statement::SetNextRequest { name: None });
        }
    }
}
