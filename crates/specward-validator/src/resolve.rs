//! Resolution stages: path template, operation, response definition.
//!
//! Each stage either returns the next piece of the document or the
//! [`ValidationError`] for its own failure code.

use specward_spec::{
    ApiSpecification, OpenApiSpec, Operation, PathHint, PathItem, PathResolutionError,
    ResponseDefinition,
};

use crate::error::ValidationError;
use crate::response::ObservedRequest;

/// Resolve the request path to a declared template and its path item.
pub fn resolve_path<'a>(
    spec: &'a ApiSpecification,
    request: &ObservedRequest,
) -> Result<(&'a str, &'a PathItem), ValidationError> {
    let template = spec
        .resolve_path_template(&request.path)
        .map_err(|e| path_error(request, e))?;

    let item = spec
        .path_item(template)
        .ok_or_else(|| ValidationError::PathNotFound {
            request: request.clone(),
            paths: spec.path_templates().iter().map(|p| p.to_string()).collect(),
            hint: PathHint::None,
        })?;

    Ok((template, item))
}

fn path_error(request: &ObservedRequest, err: PathResolutionError) -> ValidationError {
    let request = request.clone();
    match err {
        PathResolutionError::ServerNotFound { servers } => {
            ValidationError::ServerNotFound { request, servers }
        }
        PathResolutionError::BasePathNotFound { base_path } => {
            ValidationError::BasePathNotFound { request, base_path }
        }
        PathResolutionError::PathNotFound { paths, hint } => {
            ValidationError::PathNotFound {
                request,
                paths,
                hint,
            }
        }
    }
}

/// Look up the operation for the request method (any case).
pub fn resolve_operation<'a>(
    request: &ObservedRequest,
    template: &str,
    item: &'a PathItem,
) -> Result<&'a Operation, ValidationError> {
    item.operation(&request.method)
        .ok_or_else(|| ValidationError::MethodNotFound {
            request: request.clone(),
            path: template.to_string(),
            methods: item.methods(),
        })
}

/// Look up the response declared for `status`.
///
/// Only an exact status key matches; `default` and range keys such as `2XX`
/// are not consulted.
pub fn resolve_response<'a>(
    request: &ObservedRequest,
    template: &str,
    operation: &'a Operation,
    status: u16,
) -> Result<&'a ResponseDefinition, ValidationError> {
    operation
        .response(&status.to_string())
        .ok_or_else(|| ValidationError::StatusNotFound {
            request: request.clone(),
            path: template.to_string(),
            status,
            statuses: operation.statuses(),
        })
}
