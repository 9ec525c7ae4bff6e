//! Pre-request and test script generation.
//!
//! Scripts are built as [`Statement`] lists driven by the dependency entry of
//! each operation, then rendered to Postman sandbox JavaScript by
//! [`render_js`] at emit time.

use specpost_define::{DependencyEntry, ExtractSource, HttpMethod, Script, Statement, StatusExpectation};

/// Status codes the test script accepts for `method`.
///
/// ## Examples
///
/// ```
/// use specpost_define::{HttpMethod, StatusExpectation};
/// use specpost_gen::scripts::status_expectation;
///
/// assert_eq!(status_expectation(HttpMethod::Post), StatusExpectation::OneOf(vec![200, 201]));
/// assert_eq!(status_expectation(HttpMethod::Delete), StatusExpectation::Exactly(204));
/// assert_eq!(status_expectation(HttpMethod::Patch), StatusExpectation::Exactly(200));
/// ```
pub fn status_expectation(method: HttpMethod) -> StatusExpectation {
    if method.is_create() {
        StatusExpectation::OneOf(vec![200, 201])
    } else if method.is_delete() {
        StatusExpectation::Exactly(204)
    } else {
        StatusExpectation::Exactly(200)
    }
}

/// Auth header, correlation header, then one warning per required variable.
pub fn pre_request(auth_variable: &str, entry: &DependencyEntry) -> Script {
    let mut script = Script::new();
    script.push(Statement::AttachAuth {
        variable: auth_variable.to_string(),
    });
    script.push(Statement::AttachRequestId);
    for variable in &entry.requires {
        script.push(Statement::WarnIfUnset {
            variable: variable.clone(),
        });
    }
    script
}

/// Status assertion, body assertion, then one extraction per provided
/// variable.
pub fn test_script(method: HttpMethod, path: &str, entry: &DependencyEntry) -> Script {
    let mut script = Script::new();
    script.push(Statement::AssertStatus {
        expected: status_expectation(method),
    });
    script.push(Statement::AssertJsonBody);
    for variable in &entry.provides {
        script.push(Statement::Extract {
            variable: variable.clone(),
            source: entry.extraction_for(variable, method, path),
        });
    }
    script
}

/// JavaScript string literal for `text`.
fn js_string(text: &str) -> String {
    serde_json::to_string(text).unwrap_or_else(|_| "\"\"".to_string())
}

/// Renders one statement as Postman sandbox source lines.
pub fn render_js(statement: &Statement) -> Vec<String> {
    match statement {
        Statement::AttachAuth { variable } => vec![
            format!("const token = pm.environment.get({});", js_string(variable)),
            "if (!token) {".to_string(),
            format!(
                "    console.warn({});",
                js_string(&format!("{variable} is not set; sending request without Authorization"))
            ),
            "} else {".to_string(),
            "    pm.request.headers.upsert({ key: \"Authorization\", value: \"Bearer \" + token });".to_string(),
            "}".to_string(),
        ],
        Statement::AttachRequestId => vec![
            "pm.request.headers.upsert({ key: \"X-Request-Id\", value: pm.variables.replaceIn(\"{{$guid}}\") });"
                .to_string(),
        ],
        Statement::WarnIfUnset { variable } => vec![
            format!("if (!pm.environment.get({})) {{", js_string(variable)),
            format!(
                "    console.warn({});",
                js_string(&format!("Required variable {variable} is not set"))
            ),
            "}".to_string(),
        ],
        Statement::AssertStatus { expected } => render_status(expected),
        Statement::AssertJsonBody => vec![
            "if (pm.response.code !== 204) {".to_string(),
            "    pm.test(\"Response body is JSON\", function () {".to_string(),
            "        pm.response.to.be.json;".to_string(),
            "    });".to_string(),
            "}".to_string(),
        ],
        Statement::Extract { variable, source } => render_extract(variable, source),
        Statement::SetNextRequest { name: Some(name) } => {
            vec![format!("postman.setNextRequest({});", js_string(name))]
        }
        Statement::SetNextRequest { name: None } => vec!["postman.setNextRequest(null);".to_string()],
        Statement::Log { message } => vec![format!("console.log({});", js_string(message))],
    }
}

/// Renders a whole script as exec lines.
pub fn render_script(script: &Script) -> Vec<String> {
    script.iter().flat_map(render_js).collect()
}

fn render_status(expected: &StatusExpectation) -> Vec<String> {
    match expected {
        StatusExpectation::Exactly(code) => vec![
            format!("pm.test(\"Status code is {code}\", function () {{"),
            format!("    pm.response.to.have.status({code});"),
            "});".to_string(),
        ],
        StatusExpectation::OneOf(codes) => {
            let list: Vec<String> = codes.iter().map(u16::to_string).collect();
            vec![
                format!("pm.test(\"Status code is {}\", function () {{", list.join(" or ")),
                format!("    pm.expect(pm.response.code).to.be.oneOf([{}]);", list.join(", ")),
                "});".to_string(),
            ]
        }
    }
}

fn render_extract(variable: &str, source: &ExtractSource) -> Vec<String> {
    let var = js_string(variable);
    let mut lines = vec!["try {".to_string(), "    const body = pm.response.json();".to_string()];

    let (value_expr, field) = match source {
        ExtractSource::Field(field) => (format!("body && body[{}]", js_string(field)), field),
        ExtractSource::FirstOfList(field) => {
            lines.push(
                "    const list = Array.isArray(body) ? body : (body && Array.isArray(body.data) ? body.data : (body && Array.isArray(body.items) ? body.items : []));"
                    .to_string(),
            );
            (format!("list.length > 0 && list[0][{}]", js_string(field)), field)
        }
    };

    lines.push(format!("    const value = {value_expr};"));
    lines.push("    if (value) {".to_string());
    lines.push(format!("        pm.environment.set({var}, value);"));
    lines.push(format!(
        "        console.log({} + value);",
        js_string(&format!("{variable} set from {field}: "))
    ));
    lines.push("    }".to_string());
    lines.push("} catch (e) {".to_string());
    lines.push(format!(
        "    console.warn({} + e);",
        js_string(&format!("Could not extract {variable}: "))
    ));
    lines.push("}".to_string());
    lines
}
