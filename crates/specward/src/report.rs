//! Output of the `check` and `inspect` commands.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use specward_spec::{ApiSpecification, OpenApiSpec, SpecVersion};
use specward_telemetry::{log_validation_failure, log_validation_passed};
use specward_test::message::to_satisfy_message;
use specward_validator::{resolve, validate, ObservedRequest, ObservedResponse};

/// Output format for command results.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl OutputFormat {
    /// Parse from string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "text" => Some(Self::Text),
            "json" => Some(Self::Json),
            _ => None,
        }
    }
}

/// One observed response, or a list of them.
#[derive(Deserialize)]
#[serde(untagged)]
enum ResponseInput {
    One(ObservedResponse),
    Many(Vec<ObservedResponse>),
}

/// Read observed responses from a JSON object or array.
pub fn parse_responses(input: &str) -> Result<Vec<ObservedResponse>, serde_json::Error> {
    Ok(match serde_json::from_str(input)? {
        ResponseInput::One(response) => vec![response],
        ResponseInput::Many(responses) => responses,
    })
}

/// Result of checking one observed response.
#[derive(Debug, Serialize)]
pub struct CheckOutcome {
    pub request: ObservedRequest,
    pub status: u16,
    pub valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub matched_path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<Value>,
    /// Full report for failures, in the assertion wording.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Validate one response and record the outcome.
pub fn check_response(spec: &ApiSpecification, response: &ObservedResponse) -> CheckOutcome {
    match validate(spec, response) {
        Ok(()) => {
            let matched_path = resolve(spec, response)
                .ok()
                .map(|resolved| resolved.template.to_string());
            log_validation_passed!(
                method = %response.req.method,
                path = %response.req.path,
                status = response.status,
                "response satisfies API spec"
            );
            CheckOutcome {
                request: response.req.clone(),
                status: response.status,
                valid: true,
                matched_path,
                error: None,
                message: None,
            }
        }
        Err(error) => {
            log_validation_failure!(
                code = %error.code(),
                method = %response.req.method,
                path = %response.req.path,
                status = response.status,
                "response does not satisfy API spec"
            );
            CheckOutcome {
                request: response.req.clone(),
                status: response.status,
                valid: false,
                matched_path: error.matched_path().map(str::to_string),
                error: Some(error.to_json()),
                message: Some(to_satisfy_message(response, &error)),
            }
        }
    }
}

/// Render check outcomes.
pub fn render_check(outcomes: &[CheckOutcome], format: OutputFormat) -> String {
    let passed = outcomes.iter().filter(|o| o.valid).count();
    let failed = outcomes.len() - passed;

    match format {
        OutputFormat::Json => {
            let output = json!({
                "results": outcomes,
                "summary": {
                    "total": outcomes.len(),
                    "passed": passed,
                    "failed": failed,
                }
            });
            serde_json::to_string_pretty(&output).unwrap_or_else(|_| output.to_string())
        }
        OutputFormat::Text => {
            let mut out = String::new();
            for outcome in outcomes {
                let endpoint = format!("{} {}", outcome.request.method, outcome.request.path);
                if outcome.valid {
                    out.push_str(&format!(
                        "✓ {} ({}) satisfies '{}'\n",
                        endpoint,
                        outcome.status,
                        outcome.matched_path.as_deref().unwrap_or_default()
                    ));
                } else {
                    out.push_str(&format!("✗ {} ({})\n", endpoint, outcome.status));
                    if let Some(message) = &outcome.message {
                        for line in message.lines() {
                            out.push_str("  ");
                            out.push_str(line);
                            out.push('\n');
                        }
                    }
                }
            }
            out.push_str(&format!(
                "\nchecked {} response(s): {} passed, {} failed\n",
                outcomes.len(),
                passed,
                failed
            ));
            out
        }
    }
}

/// Render a summary of the document's servers, paths and operations.
pub fn render_inspect(spec: &ApiSpecification, format: OutputFormat) -> String {
    let document = spec.document();
    let family = match spec.version() {
        SpecVersion::V2 => "Swagger",
        SpecVersion::V3 => "OpenAPI",
    };

    match format {
        OutputFormat::Json => {
            let paths: Vec<Value> = spec
                .paths()
                .iter()
                .map(|(template, item)| {
                    let operations: Vec<Value> = item
                        .operations
                        .values()
                        .map(|op| {
                            json!({
                                "method": op.method,
                                "operation_id": op.operation_id,
                                "statuses": op.statuses(),
                            })
                        })
                        .collect();
                    json!({ "path": template, "operations": operations })
                })
                .collect();

            let output = json!({
                "version": document.version_string(),
                "title": document.title(),
                "base_path": spec.base_path(),
                "servers": spec.server_urls(),
                "paths": paths,
            });
            serde_json::to_string_pretty(&output).unwrap_or_else(|_| output.to_string())
        }
        OutputFormat::Text => {
            let mut out = format!(
                "{} ({} {})\n",
                document.title().unwrap_or("untitled"),
                family,
                document.version_string()
            );

            if spec.did_user_define_base_path() {
                out.push_str(&format!("basePath: {}\n", spec.base_path().unwrap_or_default()));
            }
            let servers = spec.server_urls();
            if !servers.is_empty() {
                out.push_str("servers:\n");
                for url in servers {
                    out.push_str(&format!("  {}\n", url));
                }
            }

            out.push_str("paths:\n");
            for (template, item) in spec.paths() {
                out.push_str(&format!("  {}\n", template));
                for op in item.operations.values() {
                    let id = op
                        .operation_id
                        .as_deref()
                        .map(|id| format!(" {}", id))
                        .unwrap_or_default();
                    out.push_str(&format!(
                        "    {}{} [{}]\n",
                        op.method,
                        id,
                        op.statuses().join(", ")
                    ));
                }
            }
            out
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use specward_spec::parse_spec;

    const SPEC: &str = r#"
swagger: "2.0"
info: {title: Users, version: "1"}
basePath: /api
paths:
  /users/{id}:
    get:
      operationId: getUser
      responses:
        200:
          description: ok
          schema: {type: object, required: [id]}
        404: {description: missing}
"#;

    #[test]
    fn parse_single_and_many() {
        let one = parse_responses(r#"{"status": 200, "req": {"method": "GET", "path": "/"}}"#)
            .unwrap();
        assert_eq!(one.len(), 1);

        let many = parse_responses(
            r#"[{"status": 200, "req": {"method": "GET", "path": "/a"}},
                {"status": 404, "req": {"method": "GET", "path": "/b"}, "body": {}}]"#,
        )
        .unwrap();
        assert_eq!(many.len(), 2);
        assert_eq!(many[1].status, 404);

        assert!(parse_responses(r#"{"status": "ok"}"#).is_err());
    }

    #[test]
    fn check_outcomes() {
        let spec = parse_spec(SPEC).unwrap();

        let pass = check_response(
            &spec,
            &ObservedResponse::new("GET", "/api/users/1", 200).with_body(json!({"id": 1})),
        );
        assert!(pass.valid);
        assert_eq!(pass.matched_path.as_deref(), Some("/users/{id}"));
        assert!(pass.error.is_none());

        let fail = check_response(&spec, &ObservedResponse::new("GET", "/users/1", 200));
        assert!(!fail.valid);
        assert_eq!(fail.error.as_ref().unwrap()["code"], json!("BASE_PATH_NOT_FOUND"));
        assert!(fail
            .message
            .as_deref()
            .unwrap()
            .contains("but your API spec has basePath '/api'"));
    }

    #[test]
    fn text_check_report() {
        let spec = parse_spec(SPEC).unwrap();
        let outcomes = vec![
            check_response(
                &spec,
                &ObservedResponse::new("GET", "/api/users/1", 200).with_body(json!({"id": 1})),
            ),
            check_response(&spec, &ObservedResponse::new("DELETE", "/api/users/1", 204)),
        ];

        let text = render_check(&outcomes, OutputFormat::Text);
        assert!(text.starts_with("✓ GET /api/users/1 (200) satisfies '/users/{id}'\n✗ DELETE /api/users/1 (204)\n"));
        assert!(text.contains("  res had request method 'DELETE'"));
        assert!(text.ends_with("checked 2 response(s): 1 passed, 1 failed\n"));
    }

    #[test]
    fn json_check_report() {
        let spec = parse_spec(SPEC).unwrap();
        let outcomes = vec![check_response(
            &spec,
            &ObservedResponse::new("GET", "/api/users/1", 418),
        )];

        let value: Value =
            serde_json::from_str(&render_check(&outcomes, OutputFormat::Json)).unwrap();
        assert_eq!(value["summary"], json!({"total": 1, "passed": 0, "failed": 1}));
        assert_eq!(value["results"][0]["error"]["code"], json!("STATUS_NOT_FOUND"));
        assert_eq!(value["results"][0]["error"]["statuses"], json!(["200", "404"]));
        assert_eq!(value["results"][0]["matched_path"], json!("/users/{id}"));
    }

    #[test]
    fn inspect_text() {
        let spec = parse_spec(SPEC).unwrap();
        assert_eq!(
            render_inspect(&spec, OutputFormat::Text),
            "Users (Swagger 2.0)\nbasePath: /api\npaths:\n  /users/{id}\n    GET getUser [200, 404]\n"
        );
    }

    #[test]
    fn inspect_json() {
        let spec = parse_spec(SPEC).unwrap();
        let value: Value =
            serde_json::from_str(&render_inspect(&spec, OutputFormat::Json)).unwrap();
        assert_eq!(
            value,
            json!({
                "version": "2.0",
                "title": "Users",
                "base_path": "/api",
                "servers": [],
                "paths": [{
                    "path": "/users/{id}",
                    "operations": [{"method": "GET", "operation_id": "getUser", "statuses": ["200", "404"]}]
                }]
            })
        );
    }

    #[test]
    fn output_format_parse() {
        assert_eq!(OutputFormat::parse("json"), Some(OutputFormat::Json));
        assert_eq!(OutputFormat::parse("TEXT"), Some(OutputFormat::Text));
        assert_eq!(OutputFormat::parse("yaml"), None);
    }
}
