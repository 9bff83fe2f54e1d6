//! The validation pipeline.

use serde_json::Value;

use specward_spec::{ApiSpecification, Operation, PathItem, ResponseDefinition};

use crate::error::ValidationError;
use crate::resolve::{resolve_operation, resolve_path, resolve_response};
use crate::response::ObservedResponse;
use crate::schema::{
    header_instance, JsonSchemaValidator, SchemaValidator, SchemaViolation, Violation,
    ViolationLocation,
};

/// Everything the document declares for one observed response.
#[derive(Debug, Clone, Copy)]
pub struct ResolvedResponse<'a> {
    /// The matched path template, as declared.
    pub template: &'a str,
    pub path_item: &'a PathItem,
    pub operation: &'a Operation,
    pub response: &'a ResponseDefinition,
}

/// Run the resolution stages (path, method, status) without schema checks.
pub fn resolve<'a>(
    spec: &'a ApiSpecification,
    response: &ObservedResponse,
) -> Result<ResolvedResponse<'a>, ValidationError> {
    let request = &response.req;
    let (template, path_item) = resolve_path(spec, request)?;
    let operation = resolve_operation(request, template, path_item)?;
    let definition = resolve_response(request, template, operation, response.status)?;

    Ok(ResolvedResponse {
        template,
        path_item,
        operation,
        response: definition,
    })
}

/// Validate `response` against `spec` with the default [`JsonSchemaValidator`].
pub fn validate(spec: &ApiSpecification, response: &ObservedResponse) -> Result<(), ValidationError> {
    validate_with(spec, response, &JsonSchemaValidator::for_spec(spec))
}

/// Validate `response` against `spec`, checking body and headers with
/// `validator`.
///
/// Stops at the first failing stage. Pure: the same inputs always give the
/// same result.
pub fn validate_with(
    spec: &ApiSpecification,
    response: &ObservedResponse,
    validator: &dyn SchemaValidator,
) -> Result<(), ValidationError> {
    let resolved = resolve(spec, response).inspect_err(|e| {
        tracing::debug!(
            code = %e.code(),
            method = %response.req.method,
            path = %response.req.path,
            "response resolution failed"
        );
    })?;

    let mut violations = check_body(validator, resolved.response, &response.body);
    violations.extend(check_headers(validator, resolved.response, response));

    if violations.is_empty() {
        tracing::debug!(
            method = %response.req.method,
            path = %response.req.path,
            template = resolved.template,
            status = response.status,
            "response satisfies its definition"
        );
        return Ok(());
    }

    tracing::debug!(
        method = %response.req.method,
        path = %response.req.path,
        status = response.status,
        violations = violations.len(),
        "response body or headers invalid"
    );

    Err(ValidationError::InvalidBody {
        request: response.req.clone(),
        path: resolved.template.to_string(),
        status: response.status,
        violations,
        response: Box::new(resolved.response.clone()),
    })
}

fn check_body(
    validator: &dyn SchemaValidator,
    definition: &ResponseDefinition,
    body: &Value,
) -> Vec<Violation> {
    let Some(schema) = &definition.schema else {
        return Vec::new();
    };
    validator
        .validate(schema, body)
        .into_iter()
        .map(|v| Violation::new(ViolationLocation::Body, v))
        .collect()
}

fn check_headers(
    validator: &dyn SchemaValidator,
    definition: &ResponseDefinition,
    response: &ObservedResponse,
) -> Vec<Violation> {
    let mut violations = Vec::new();

    for (name, header) in &definition.headers {
        let location = || ViolationLocation::Header(name.clone());

        let Some(value) = response.header(name) else {
            if header.required {
                violations.push(Violation::new(
                    location(),
                    SchemaViolation {
                        instance_path: String::new(),
                        message: "required header is missing".to_string(),
                    },
                ));
            }
            continue;
        };

        let Some(schema) = &header.schema else {
            continue;
        };
        let instance = header_instance(Some(schema), value);
        violations.extend(
            validator
                .validate(schema, &instance)
                .into_iter()
                .map(|v| Violation::new(location(), v)),
        );
    }

    violations
}
