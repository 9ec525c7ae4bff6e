//! End-to-end workflow step definitions.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::types::HttpMethod;

/// Scenario-specific replacement for a cloned item's body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BodyOverride {
    /// Shallow-merge these keys into the existing JSON body.
    Merge(Map<String, Value>),
    /// Replace the body outright.
    Replace(Value),
}

/// One step of the workflow: which item to clone and what to call it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkflowStep {
    pub method: HttpMethod,
    /// Path (bracketed placeholders) matched against compiled items.
    pub path: String,
    /// Display name of the cloned item; also the jump target name.
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<BodyOverride>,
}

impl WorkflowStep {
    pub fn new(method: HttpMethod, path: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            name: name.into(),
            body: None,
        }
    }

    pub fn with_body(mut self, body: BodyOverride) -> Self {
        self.body = Some(body);
        self
    }
}

/// The ordered workflow and the folder it is composed into.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkflowConfig {
    pub folder_name: String,
    pub completion_message: String,
    pub steps: Vec<WorkflowStep>,
}

impl Default for WorkflowConfig {
    fn default() -> Self {
        Self {
            folder_name: "E2E Workflow".to_string(),
            completion_message: "Workflow completed successfully".to_string(),
            steps: Vec::new(),
        }
    }
}
