//! End-to-end tests: compile fixture descriptions through the full pipeline.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{TimeZone, Utc};
use serde_json::{Value, json};
use tempfile::TempDir;

use specpost_define::{Collection, CollectionItem, ExtractSource, HttpMethod, RequestBody, Statement};
use specpost_gen::compile::{CompileOptions, compile_file};
use specpost_gen::config::load_profile;
use specpost_gen::enhance::enhance;
use specpost_gen::loader::load;
use specpost_gen::output::{POSTMAN_SCHEMA, emit};

fn fixture(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures").join(name)
}

fn options() -> CompileOptions {
    CompileOptions {
        now: Utc.with_ymd_and_hms(2024, 1, 15, 10, 30, 0).single(),
        ..CompileOptions::default()
    }
}

fn item<'c>(collection: &'c Collection, method: HttpMethod, path: &str) -> &'c CollectionItem {
    collection
        .items()
        .find(|i| i.method == method && i.path == path)
        .unwrap_or_else(|| panic!("no item for {method} {path}"))
}

// === OpenAPI 3 ===

#[test]
fn create_organization_extracts_organization_id() {
    let (collection, _, _) = compile_file(&fixture("ledger.json"), &options()).unwrap();

    let group = collection.group("Organizations").expect("Organizations group");
    let create = group
        .items
        .iter()
        .find(|i| i.method == HttpMethod::Post && i.path == "/v1/organizations")
        .expect("create item");

    assert_eq!(create.url.raw(), "{{onboardingUrl}}/v1/organizations");
    assert!(create.test_script.iter().any(|s| *s
        == Statement::Extract {
            variable: "organizationId".into(),
            source: ExtractSource::Field("id".into()),
        }));
}

#[test]
fn trailing_id_binds_to_organization_id() {
    let (collection, _, _) = compile_file(&fixture("ledger.json"), &options()).unwrap();
    let get = item(&collection, HttpMethod::Get, "/v1/organizations/{id}");

    assert_eq!(get.url.raw(), "{{onboardingUrl}}/v1/organizations/{{organizationId}}");
    assert!(!get.url.raw().contains("{{id}}"));
}

#[test]
fn status_properties_synthesize_to_status_object() {
    let (collection, _, _) = compile_file(&fixture("ledger.json"), &options()).unwrap();

    let org = item(&collection, HttpMethod::Post, "/v1/organizations");
    let body = org.body.as_ref().and_then(RequestBody::as_json).unwrap();
    assert_eq!(body["status"], json!({"code": "ACTIVE"}));
    assert_eq!(body["legalName"], "Lerian Studio");
    assert_eq!(body["metadata"], json!({"key": "value"}));
    assert_eq!(body["address"]["country"], "US");

    let ledger = item(&collection, HttpMethod::Post, "/v1/organizations/{organization_id}/ledgers");
    let body = ledger.body.as_ref().and_then(RequestBody::as_json).unwrap();
    assert_eq!(body["status"], json!({"code": "ACTIVE"}));
}

#[test]
fn error_responses_are_rewired_to_canonical_definitions() {
    let mut spec = load(&fixture("ledger.json")).unwrap();
    enhance(&mut spec);

    let doc = spec.document();
    assert_eq!(
        doc["paths"]["/v1/organizations"]["post"]["responses"]["400"],
        json!({"$ref": "#/components/responses/BadRequest"})
    );
    assert_eq!(
        doc["paths"]["/v1/organizations/{id}"]["get"]["responses"]["404"],
        json!({"$ref": "#/components/responses/NotFound"})
    );
    assert_eq!(doc["components"]["responses"].as_object().unwrap().len(), 5);
}

#[test]
fn list_endpoints_extract_first_element() {
    let (collection, _, _) = compile_file(&fixture("ledger.json"), &options()).unwrap();
    let balances = item(
        &collection,
        HttpMethod::Get,
        "/v1/organizations/{organization_id}/ledgers/{ledger_id}/accounts/{account_id}/balances",
    );

    assert_eq!(balances.url.base_variable, "transactionUrl");
    assert!(balances.test_script.iter().any(|s| *s
        == Statement::Extract {
            variable: "balanceId".into(),
            source: ExtractSource::FirstOfList("id".into()),
        }));
}

#[test]
fn ledger_workflow_keeps_only_matching_steps() {
    let (collection, _, report) = compile_file(&fixture("ledger.json"), &options()).unwrap();
    let workflow = report.workflow.expect("workflow report");

    assert_eq!(
        workflow.included,
        vec![
            "Create Organization",
            "Get Organization",
            "Create Ledger",
            "Get Account Balances",
            "Delete Organization"
        ]
    );
    assert_eq!(workflow.skipped.len(), 13);

    let folder = collection.groups.last().unwrap();
    assert_eq!(folder.name, "E2E Ledger Workflow");
    assert_eq!(
        folder.items[0].test_script.statements.last(),
        Some(&Statement::SetNextRequest {
            name: Some("Get Organization".into())
        })
    );
}

#[test]
fn workflow_jump_targets_name_exactly_one_item() {
    let (collection, _, _) = compile_file(&fixture("ledger.json"), &options()).unwrap();

    let base = item(
        &collection,
        HttpMethod::Get,
        "/v1/organizations/{organization_id}/ledgers/{ledger_id}/accounts/{account_id}/balances",
    );
    assert_eq!(base.name, "Get Account Balances");

    let folder = collection.groups.last().unwrap();
    assert!(folder
        .items
        .iter()
        .any(|i| i.name == "E2E Ledger Workflow: Get Account Balances"));

    let targets: Vec<&String> = folder
        .items
        .iter()
        .flat_map(|i| i.test_script.iter())
        .filter_map(|s| match s {
            Statement::SetNextRequest { name: Some(name) } => Some(name),
            _ => None,
        })
        .collect();
    assert_eq!(targets.len(), folder.items.len() - 1);
    for target in targets {
        let matches = collection.items().filter(|i| &i.name == target).count();
        assert_eq!(matches, 1, "jump target {target} is ambiguous");
    }
}

#[test]
fn uncovered_endpoints_are_reported() {
    let (_, _, report) = compile_file(&fixture("ledger.json"), &options()).unwrap();
    assert_eq!(report.uncovered, vec!["GET /health"]);
}

// === Swagger 2 / YAML ===

#[test]
fn swagger_yaml_compiles_with_normalized_paths() {
    let (collection, _, _) = compile_file(&fixture("swagger.yaml"), &options()).unwrap();

    let json_tx = item(
        &collection,
        HttpMethod::Post,
        "/v1/organizations/{organization_id}/ledgers/{ledger_id}/transactions/json",
    );
    assert_eq!(
        json_tx.url.raw(),
        "{{transactionUrl}}/v1/organizations/{{organizationId}}/ledgers/{{ledgerId}}/transactions/json"
    );

    let body = json_tx.body.as_ref().and_then(RequestBody::as_json).unwrap();
    assert_eq!(body["description"], "Settlement");
    assert!(body.get("parentOrganizationId").is_none());
    assert_eq!(
        body["send"]["source"]["from"][0]["amount"],
        body["send"]["distribute"]["to"][0]["amount"]
    );
}

#[test]
fn swagger_dsl_endpoint_uses_text_body() {
    let (collection, _, _) = compile_file(&fixture("swagger.yaml"), &options()).unwrap();
    let dsl = item(
        &collection,
        HttpMethod::Post,
        "/v1/organizations/{organization_id}/ledgers/{ledger_id}/transactions/dsl",
    );

    match &dsl.body {
        Some(RequestBody::Text(text)) => assert!(text.starts_with("(transaction")),
        other => panic!("expected text body, got {other:?}"),
    }
}

#[test]
fn swagger_balance_id_and_error_examples() {
    let (collection, _, _) = compile_file(&fixture("swagger.yaml"), &options()).unwrap();
    let balance = item(
        &collection,
        HttpMethod::Get,
        "/v1/organizations/{organization_id}/ledgers/{ledger_id}/balances/{id}",
    );
    assert!(balance.url.raw().ends_with("/balances/{{balanceId}}"));

    let json_tx = item(
        &collection,
        HttpMethod::Post,
        "/v1/organizations/{organization_id}/ledgers/{ledger_id}/transactions/json",
    );
    let bad_request = json_tx
        .response_examples
        .iter()
        .find(|r| r.status == 400)
        .expect("400 example");
    assert_eq!(bad_request.reason, "Bad Request");
    assert!(bad_request.body.as_ref().is_some_and(|b| b.get("code").is_some()));
}

// === Profiles ===

#[test]
fn toml_profile_reroutes_and_replaces_workflow() {
    let profile = load_profile(Some(&fixture("profile.toml"))).unwrap();
    let options = CompileOptions { profile, ..options() };

    let (collection, environment, report) = compile_file(&fixture("ledger.json"), &options).unwrap();

    let get = item(&collection, HttpMethod::Get, "/v1/organizations/{id}");
    assert_eq!(get.url.raw(), "{{apiUrl}}/v1/organizations/{{organizationId}}");
    assert_eq!(
        get.pre_request_script.statements[0],
        Statement::AttachAuth {
            variable: "apiToken".into()
        }
    );

    let workflow = report.workflow.unwrap();
    assert_eq!(workflow.included, vec!["1. Create Organization", "3. Delete Organization"]);
    assert_eq!(workflow.skipped[0].step, "2. Missing Step");
    assert_eq!(collection.groups.last().unwrap().name, "Smoke Test");

    assert!(environment.contains("apiUrl"));
    assert!(environment.contains("apiToken"));
    assert!(!environment.contains("onboardingUrl"));
}

#[test]
fn no_workflow_option_omits_folder() {
    let options = CompileOptions {
        include_workflow: false,
        ..options()
    };
    let (collection, _, report) = compile_file(&fixture("ledger.json"), &options).unwrap();

    assert!(report.workflow.is_none());
    assert!(collection.group("E2E Ledger Workflow").is_none());
}

// === Emission ===

#[test]
fn emitted_artifacts_are_valid_json() {
    let temp_dir = TempDir::new().unwrap();
    let out = temp_dir.path().join("out/collection.json");
    let env = temp_dir.path().join("out/environment.json");

    let (collection, environment, _) = compile_file(&fixture("ledger.json"), &options()).unwrap();
    emit(&collection, &environment, &out, Some(&env)).unwrap();

    let rendered: Value = serde_json::from_str(&fs::read_to_string(&out).unwrap()).unwrap();
    assert_eq!(rendered["info"]["schema"], POSTMAN_SCHEMA);
    assert_eq!(rendered["info"]["name"], "Ledger Onboarding API");
    assert_eq!(rendered["item"][0]["name"], "Organizations");

    let create = &rendered["item"][0]["item"][0];
    let tests = create["event"]
        .as_array()
        .unwrap()
        .iter()
        .find(|e| e["listen"] == "test")
        .unwrap();
    let exec: Vec<&str> = tests["script"]["exec"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(Value::as_str)
        .collect();
    assert!(exec.iter().any(|line| line.contains("pm.environment.set(\"organizationId\", value);")));

    let env_doc: Value = serde_json::from_str(&fs::read_to_string(&env).unwrap()).unwrap();
    let keys: Vec<&str> = env_doc["values"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|v| v["key"].as_str())
        .collect();
    assert_eq!(&keys[..3], &["onboardingUrl", "transactionUrl", "authToken"]);
    assert!(keys.contains(&"organizationId"));
    assert_eq!(env_doc["values"][0]["enabled"], false);
    assert_eq!(env_doc["values"][2]["enabled"], true);
}
