//! Script statements embedded in collection items.
//!
//! Pre-request and test scripts are kept as ordered lists of [`Statement`]s
//! rather than raw source text. The emitter renders them for the request
//! runner; the workflow composer appends to them; tests can interpret them.

use serde::{Deserialize, Serialize};

/// Which status codes a test script accepts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusExpectation {
    /// Any of the listed codes.
    OneOf(Vec<u16>),
    /// Exactly this code.
    Exactly(u16),
}

impl StatusExpectation {
    /// Returns `true` if `status` satisfies the expectation.
    ///
    /// ## Examples
    ///
    /// ```
    /// use specpost_define::StatusExpectation;
    ///
    /// let created = StatusExpectation::OneOf(vec![200, 201]);
    /// assert!(created.accepts(201));
    /// assert!(!StatusExpectation::Exactly(204).accepts(200));
    /// ```
    pub fn accepts(&self, status: u16) -> bool {
        match self {
            StatusExpectation::OneOf(codes) => codes.contains(&status),
            StatusExpectation::Exactly(code) => *code == status,
        }
    }

    /// The accepted codes, in declaration order.
    pub fn codes(&self) -> Vec<u16> {
        match self {
            StatusExpectation::OneOf(codes) => codes.clone(),
            StatusExpectation::Exactly(code) => vec![*code],
        }
    }
}

/// Where a provided variable's value is read from in a response body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "field")]
pub enum ExtractSource {
    /// A top-level field of the response object.
    Field(String),
    /// A field of the first element of a list response, either a bare
    /// array or an object carrying a `data` array.
    FirstOfList(String),
}

/// One step of a generated script.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "op")]
pub enum Statement {
    /// Read the auth variable: warn when unbound, otherwise attach it as a
    /// bearer `Authorization` header.
    AttachAuth {
        variable: String,
    },
    /// Attach a freshly generated `X-Request-Id` header.
    AttachRequestId,
    /// Warn (non-fatal) when a required variable is unbound.
    WarnIfUnset {
        variable: String,
    },
    AssertStatus {
        expected: StatusExpectation,
    },
    /// Assert the response body parses as JSON; a 204 body is vacuously valid.
    AssertJsonBody,
    /// Persist a value from the response into the shared environment.
    Extract {
        variable: String,
        source: ExtractSource,
    },
    /// Jump to the named item, or stop the run when `None`.
    SetNextRequest {
        name: Option<String>,
    },
    Log {
        message: String,
    },
}

/// An ordered list of statements.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Script {
    pub statements: Vec<Statement>,
}

impl Script {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, statement: Statement) {
        self.statements.push(statement);
    }

    pub fn is_empty(&self) -> bool {
        self.statements.is_empty()
    }

    pub fn len(&self) -> usize {
        self.statements.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Statement> {
        self.statements.iter()
    }

    /// Variables this script writes into the environment.
    pub fn extracted_variables(&self) -> Vec<&str> {
        self.statements
            .iter()
            .filter_map(|s| match s {
                Statement::Extract { variable, .. } => Some(variable.as_str()),
                _ => None,
            })
            .collect()
    }

    /// The status expectation asserted by this script, if any.
    pub fn status_expectation(&self) -> Option<&StatusExpectation> {
        self.statements.iter().find_map(|s| match s {
            Statement::AssertStatus { expected } => Some(expected),
            _ => None,
        })
    }
}

impl FromIterator<Statement> for Script {
    fn from_iter<I: IntoIterator<Item = Statement>>(iter: I) -> Self {
        Self {
            statements: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracted_variables_in_order() {
        let script: Script = [
            Statement::AssertJsonBody,
            Statement::Extract {
                variable: "accountId".into(),
                source: ExtractSource::Field("id".into()),
            },
            Statement::Extract {
                variable: "accountAlias".into(),
                source: ExtractSource::Field("alias".into()),
            },
        ]
        .into_iter()
        .collect();

        assert_eq!(script.extracted_variables(), vec!["accountId", "accountAlias"]);
    }

    #[test]
    fn statement_serializes_with_op_tag() {
        let json = serde_json::to_value(Statement::AttachRequestId).unwrap();
        assert_eq!(json, serde_json::json!({"op": "attach_request_id"}));
    }
}
