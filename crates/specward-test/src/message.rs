//! Human-readable assertion reports.
//!
//! The wording follows the chai `satisfyApiSpec` plugin so existing test
//! suites keep matching on the same text.

use serde_json::{json, Value};

use specward_spec::PathHint;
use specward_validator::{ObservedResponse, ResolvedResponse, ValidationError};

const HINT: &str = "expected res to satisfy API spec";
const NOT_HINT: &str = "expected res not to satisfy API spec";

/// Report for a response that was expected to satisfy the document.
pub fn to_satisfy_message(response: &ObservedResponse, error: &ValidationError) -> String {
    let status = response.status;
    let method = &response.req.method;
    let request_path = &response.req.path;
    let unmatched_endpoint = format!("{} {}", method, request_path);

    match error {
        ValidationError::ServerNotFound { servers, .. } => format!(
            "{HINT}\n\nexpected res to satisfy a '{status}' response defined for endpoint '{unmatched_endpoint}' in your API spec\
             \nres had request path '{request_path}', but your API spec has no matching servers\
             \n\nServers found in API spec: {}",
            servers.join(", ")
        ),

        ValidationError::BasePathNotFound { base_path, .. } => format!(
            "{HINT}\n\nexpected res to satisfy a '{status}' response defined for endpoint '{unmatched_endpoint}' in your API spec\
             \nres had request path '{request_path}', but your API spec has basePath '{base_path}'"
        ),

        ValidationError::PathNotFound { paths, hint, .. } => {
            let msg = format!(
                "{HINT}\n\nexpected res to satisfy a '{status}' response defined for endpoint '{unmatched_endpoint}' in your API spec\
                 \nres had request path '{request_path}', but your API spec has no matching path\
                 \n\nPaths found in API spec: {}",
                paths.join(", ")
            );
            match hint {
                PathHint::None => msg,
                PathHint::BasePath(base_path) => format!(
                    "{msg}\n\n'{request_path}' matches basePath `{base_path}` but no <basePath/endpointPath> combinations"
                ),
                PathHint::Servers(servers) => format!(
                    "{msg}\n\n'{request_path}' matches servers {} but no <server/endpointPath> combinations",
                    stringify(&json!(servers))
                ),
            }
        }

        ValidationError::MethodNotFound { path, methods, .. } => {
            let endpoint = format!("{} {}", method, path);
            format!(
                "{HINT}\n\nexpected res to satisfy a '{status}' response defined for endpoint '{endpoint}' in your API spec\
                 \nres had request method '{method}', but your API spec has no '{method}' operation defined for path '{path}'\
                 \n\nRequest operations found for path '{path}' in API spec: {}",
                methods.join(", ")
            )
        }

        ValidationError::StatusNotFound { path, statuses, .. } => {
            let endpoint = format!("{} {}", method, path);
            format!(
                "{HINT}\n\nexpected res to satisfy a '{status}' response defined for endpoint '{endpoint}' in your API spec\
                 \nres had status '{status}', but your API spec has no '{status}' response defined for endpoint '{endpoint}'\
                 \n\nResponse statuses found for endpoint '{endpoint}' in API spec: {}",
                statuses.join(", ")
            )
        }

        ValidationError::InvalidBody {
            path,
            response: definition,
            ..
        } => {
            let endpoint = format!("{} {}", method, path);
            format!(
                "{HINT}\n\nexpected res to satisfy the '{status}' response defined for endpoint '{endpoint}' in your API spec\
                 \nres did not satisfy it because: {error}\
                 \n\nres contained: {}\
                 \n\nThe '{status}' response defined for endpoint '{endpoint}' in API spec: {}",
                describe_response(response),
                stringify(&definition.definition)
            )
        }
    }
}

/// Report for a response that was expected not to satisfy the document.
pub fn not_to_satisfy_message(response: &ObservedResponse, resolved: &ResolvedResponse<'_>) -> String {
    let status = response.status;
    let endpoint = format!("{} {}", response.req.method, resolved.template);
    format!(
        "{NOT_HINT}\n\nexpected res not to satisfy the '{status}' response defined for endpoint '{endpoint}' in your API spec\
         \n\nres contained: {}\
         \n\nThe '{status}' response defined for endpoint '{endpoint}' in API spec: {}",
        describe_response(response),
        stringify(&resolved.response.definition)
    )
}

/// The observed body, plus headers when the response carried any.
fn describe_response(response: &ObservedResponse) -> String {
    let mut contained = json!({ "body": response.body });
    if let Some(headers) = &response.headers {
        contained["headers"] = json!(headers);
    }
    stringify(&contained)
}

/// Two-space indented JSON.
fn stringify(value: &Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
}
