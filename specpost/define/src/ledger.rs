//! Built-in tables for the financial-ledger API family.
//!
//! Onboarding resources (organizations, ledgers, assets, portfolios,
//! segments, accounts) are served by one service; transactions, operations,
//! balances, asset rates, and routing rules by another.

use std::collections::BTreeMap;

use serde_json::{Map, Value, json};

use crate::dependency::{DependencyEntry, DependencyTable};
use crate::profile::TextBody;
use crate::routing::{ResourceSegment, Route, RoutingTable};
use crate::types::HttpMethod;
use crate::workflow::{BodyOverride, WorkflowConfig, WorkflowStep};

const ORG: &str = "/v1/organizations";
const LEDGER: &str = "/v1/organizations/{organization_id}/ledgers";
const SCOPED: &str = "/v1/organizations/{organization_id}/ledgers/{ledger_id}";

pub(crate) fn positional_params() -> Vec<String> {
    [
        "organization_id",
        "ledger_id",
        "account_id",
        "asset_id",
        "portfolio_id",
        "segment_id",
        "transaction_id",
        "operation_id",
        "balance_id",
        "asset_rate_id",
        "operation_route_id",
        "transaction_route_id",
        "external_id",
        "asset_code",
        "alias",
        "code",
        "id",
    ]
    .into_iter()
    .map(str::to_string)
    .collect()
}

pub(crate) fn parameter_variables() -> BTreeMap<String, String> {
    [
        ("organization_id", "organizationId"),
        ("ledger_id", "ledgerId"),
        ("account_id", "accountId"),
        ("asset_id", "assetId"),
        ("portfolio_id", "portfolioId"),
        ("segment_id", "segmentId"),
        ("transaction_id", "transactionId"),
        ("operation_id", "operationId"),
        ("balance_id", "balanceId"),
        ("asset_rate_id", "assetRateId"),
        ("operation_route_id", "operationRouteId"),
        ("transaction_route_id", "transactionRouteId"),
        ("external_id", "externalId"),
        ("asset_code", "assetCode"),
        ("alias", "accountAlias"),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect()
}

pub(crate) fn id_resources() -> Vec<ResourceSegment> {
    [
        ("balances", "balanceId"),
        ("operations", "operationId"),
        ("transactions", "transactionId"),
        ("asset-rates", "assetRateId"),
        ("operation-routes", "operationRouteId"),
        ("transaction-routes", "transactionRouteId"),
        ("accounts", "accountId"),
        ("assets", "assetId"),
        ("portfolios", "portfolioId"),
        ("segments", "segmentId"),
        ("ledgers", "ledgerId"),
        ("organizations", "organizationId"),
    ]
    .into_iter()
    .map(|(s, v)| ResourceSegment::new(s, v))
    .collect()
}

pub(crate) fn routing() -> RoutingTable {
    let transaction_segments = [
        "transactions",
        "operations",
        "balances",
        "asset-rates",
        "operation-routes",
        "transaction-routes",
    ];

    RoutingTable {
        routes: transaction_segments
            .into_iter()
            .map(|s| Route::new(s, "transactionUrl"))
            .collect(),
        default_variable: "onboardingUrl".to_string(),
    }
}

fn entry(provides: &[&str], requires: &[&str]) -> DependencyEntry {
    DependencyEntry::new(provides.iter().copied(), requires.iter().copied())
}

pub(crate) fn dependencies() -> DependencyTable {
    let org = ["organizationId"];
    let ledger = ["organizationId", "ledgerId"];
    let mut table = DependencyTable::new()
        .with(format!("POST {ORG}"), entry(&["organizationId"], &[]))
        .with(format!("GET {ORG}"), entry(&[], &[]))
        .with(format!("GET {ORG}/{{id}}"), entry(&[], &org))
        .with(format!("PATCH {ORG}/{{id}}"), entry(&[], &org))
        .with(format!("DELETE {ORG}/{{id}}"), entry(&[], &org))
        .with(format!("POST {LEDGER}"), entry(&["ledgerId"], &org))
        .with(format!("GET {LEDGER}"), entry(&[], &org))
        .with(format!("GET {LEDGER}/{{id}}"), entry(&[], &ledger))
        .with(format!("PATCH {LEDGER}/{{id}}"), entry(&[], &ledger))
        .with(format!("DELETE {LEDGER}/{{id}}"), entry(&[], &ledger));

    // Ledger-scoped resources share the same create/read/update/delete shape.
    for (resource, variable) in [
        ("assets", "assetId"),
        ("portfolios", "portfolioId"),
        ("segments", "segmentId"),
        ("operation-routes", "operationRouteId"),
        ("transaction-routes", "transactionRouteId"),
    ] {
        let collection = format!("{SCOPED}/{resource}");
        let single = format!("{collection}/{{id}}");
        let scoped_with = [ledger[0], ledger[1], variable];
        table.insert(format!("POST {collection}"), entry(&[variable], &ledger));
        table.insert(format!("GET {collection}"), entry(&[], &ledger));
        table.insert(format!("GET {single}"), entry(&[], &scoped_with));
        table.insert(format!("PATCH {single}"), entry(&[], &scoped_with));
        table.insert(format!("DELETE {single}"), entry(&[], &scoped_with));
    }

    let account_scope = ["organizationId", "ledgerId", "accountId"];
    table
        .with(
            format!("POST {SCOPED}/accounts"),
            entry(&["accountId", "accountAlias"], &["organizationId", "ledgerId", "assetId"]),
        )
        .with(format!("GET {SCOPED}/accounts"), entry(&[], &ledger))
        .with(format!("GET {SCOPED}/accounts/{{id}}"), entry(&[], &account_scope))
        .with(format!("PATCH {SCOPED}/accounts/{{id}}"), entry(&[], &account_scope))
        .with(format!("DELETE {SCOPED}/accounts/{{id}}"), entry(&[], &account_scope))
        .with(
            format!("GET {SCOPED}/accounts/alias/{{alias}}"),
            entry(&[], &["organizationId", "ledgerId", "accountAlias"]),
        )
        .with(
            format!("POST {SCOPED}/transactions/json"),
            entry(&["transactionId"], &["organizationId", "ledgerId", "accountAlias"]),
        )
        .with(
            format!("POST {SCOPED}/transactions/dsl"),
            entry(&["transactionId"], &["organizationId", "ledgerId", "accountAlias"]),
        )
        .with(format!("GET {SCOPED}/transactions"), entry(&[], &ledger))
        .with(
            format!("GET {SCOPED}/transactions/{{transaction_id}}"),
            entry(&[], &["organizationId", "ledgerId", "transactionId"]),
        )
        .with(
            format!("GET {SCOPED}/accounts/{{account_id}}/balances"),
            entry(&["balanceId"], &account_scope),
        )
        .with(
            format!("GET {SCOPED}/balances/{{balance_id}}"),
            entry(&[], &["organizationId", "ledgerId", "balanceId"]),
        )
        .with(
            format!("GET {SCOPED}/accounts/{{account_id}}/operations"),
            entry(&["operationId"], &account_scope),
        )
        .with(
            format!("GET {SCOPED}/accounts/{{account_id}}/operations/{{operation_id}}"),
            entry(&[], &["organizationId", "ledgerId", "accountId", "operationId"]),
        )
}

fn object(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        _ => Map::new(),
    }
}

/// Body used by the workflow's funding transaction.
pub fn funding_transaction() -> Value {
    let amount = json!({"asset": "BRL", "value": 100000, "scale": 2});
    json!({
        "description": "Funding transaction for the end-to-end workflow",
        "metadata": {"source": "e2e-workflow"},
        "send": {
            "asset": "BRL",
            "value": 100000,
            "scale": 2,
            "source": {
                "from": [{
                    "account": "@external/BRL",
                    "amount": amount.clone(),
                    "description": "External funding debit"
                }]
            },
            "distribute": {
                "to": [{
                    "account": "{{accountAlias}}",
                    "amount": amount,
                    "description": "Funding credit"
                }]
            }
        }
    })
}

pub(crate) fn workflow() -> WorkflowConfig {
    use HttpMethod::{Delete, Get, Post};

    fn step(method: HttpMethod, path: impl Into<String>, name: &str) -> WorkflowStep {
        WorkflowStep::new(method, path, name)
    }

    let steps = vec![
        step(Post, ORG, "Create Organization"),
        step(Get, format!("{ORG}/{{id}}"), "Get Organization"),
        step(Post, LEDGER, "Create Ledger"),
        step(Get, format!("{LEDGER}/{{id}}"), "Get Ledger"),
        step(Post, format!("{SCOPED}/assets"), "Create Reference Asset").with_body(BodyOverride::Merge(
            object(json!({"name": "Brazilian Real", "code": "BRL", "type": "currency"})),
        )),
        step(Post, format!("{SCOPED}/portfolios"), "Create Portfolio"),
        step(Post, format!("{SCOPED}/segments"), "Create Segment"),
        step(Post, format!("{SCOPED}/accounts"), "Create Account")
            .with_body(BodyOverride::Merge(object(json!({"assetCode": "BRL"})))),
        step(Get, format!("{SCOPED}/accounts/{{id}}"), "Get Account"),
        step(Post, format!("{SCOPED}/transactions/json"), "Fund Account")
            .with_body(BodyOverride::Replace(funding_transaction())),
        step(Get, format!("{SCOPED}/transactions/{{transaction_id}}"), "Get Funding Transaction"),
        step(Get, format!("{SCOPED}/accounts/{{account_id}}/balances"), "Get Account Balances"),
        step(Delete, format!("{SCOPED}/accounts/{{id}}"), "Delete Account"),
        step(Delete, format!("{SCOPED}/segments/{{id}}"), "Delete Segment"),
        step(Delete, format!("{SCOPED}/portfolios/{{id}}"), "Delete Portfolio"),
        step(Delete, format!("{SCOPED}/assets/{{id}}"), "Delete Asset"),
        step(Delete, format!("{LEDGER}/{{id}}"), "Delete Ledger"),
        step(Delete, format!("{ORG}/{{id}}"), "Delete Organization"),
    ];

    WorkflowConfig {
        folder_name: "E2E Ledger Workflow".to_string(),
        completion_message: "Ledger workflow completed successfully".to_string(),
        steps,
    }
}

pub(crate) fn transaction_dsl_body() -> TextBody {
    TextBody {
        method: HttpMethod::Post,
        path_suffix: "/transactions/dsl".to_string(),
        content: [
            "(transaction V1",
            "  (chart-of-accounts-group-name PAG_CONTAS_CODE_1)",
            "  (description \"description for the transaction\")",
            "  (metadata",
            "    (m1 value1)",
            "  )",
            "  (send BRL 100|2",
            "    (source",
            "      (from @external/BRL :amount BRL 100|2)",
            "    )",
            "    (distribute",
            "      (to {{accountAlias}} :amount BRL 100|2)",
            "    )",
            "  )",
            ")",
        ]
        .join("\n"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_parameter_variable_is_camel_case() {
        for variable in parameter_variables().values() {
            assert!(!variable.contains('_'), "{variable} should be camelCase");
        }
    }

    #[test]
    fn workflow_step_names_are_unique() {
        let wf = workflow();
        let mut names: Vec<_> = wf.steps.iter().map(|s| s.name.as_str()).collect();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), wf.steps.len());
    }

    #[test]
    fn workflow_create_steps_are_in_dependency_table() {
        let table = dependencies();
        for step in workflow().steps.iter().filter(|s| s.method == HttpMethod::Post) {
            let key = format!("{} {}", step.method, step.path);
            assert!(table.get(&key).is_some(), "missing dependency entry for {key}");
        }
    }

    #[test]
    fn organization_create_provides_organization_id() {
        let table = dependencies();
        let entry = table.get("POST /v1/organizations").unwrap();
        assert_eq!(entry.provides, vec!["organizationId"]);
        assert!(entry.requires.is_empty());
    }

    #[test]
    fn funding_transaction_credits_account_alias() {
        let body = funding_transaction();
        assert_eq!(body["send"]["distribute"]["to"][0]["account"], "{{accountAlias}}");
        assert_eq!(body["send"]["asset"], "BRL");
    }
}
