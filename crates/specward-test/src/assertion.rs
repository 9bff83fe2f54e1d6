//! ResponseAssertion: checks observed responses against a loaded document.

use std::path::Path;
use std::sync::Arc;

use thiserror::Error;

use specward_spec::{parse_spec, parse_spec_file, ApiSpecification, ParseError};
use specward_validator::{resolve, validate, ErrorCode, ObservedResponse};

use crate::message::{not_to_satisfy_message, to_satisfy_message};

/// Errors from setting up a [`ResponseAssertion`].
#[derive(Debug, Error)]
pub enum TestError {
    #[error("failed to load API spec: {0}")]
    Load(#[from] ParseError),
}

/// A failed assertion, carrying the full human-readable report.
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct AssertionFailure {
    /// Code of the validation failure; `None` for a failed negated assertion.
    pub code: Option<ErrorCode>,
    pub message: String,
}

/// Asserts that observed responses satisfy one API document.
///
/// Cheap to clone; every clone shares the same immutable document.
#[derive(Debug, Clone)]
pub struct ResponseAssertion {
    spec: Arc<ApiSpecification>,
}

impl ResponseAssertion {
    pub fn new(spec: Arc<ApiSpecification>) -> Self {
        Self { spec }
    }

    /// Load the document from a YAML or JSON file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, TestError> {
        let spec = parse_spec_file(path.as_ref())?;
        Ok(Self::new(Arc::new(spec)))
    }

    /// Load the document from a YAML or JSON string.
    pub fn parse(input: &str) -> Result<Self, TestError> {
        Ok(Self::new(Arc::new(parse_spec(input)?)))
    }

    pub fn spec(&self) -> &Arc<ApiSpecification> {
        &self.spec
    }

    /// Succeeds when `response` satisfies its declared response definition.
    pub fn satisfies(&self, response: &ObservedResponse) -> Result<(), AssertionFailure> {
        match validate(&self.spec, response) {
            Ok(()) => Ok(()),
            Err(error) => {
                tracing::debug!(code = %error.code(), "response does not satisfy API spec");
                Err(AssertionFailure {
                    code: Some(error.code()),
                    message: to_satisfy_message(response, &error),
                })
            }
        }
    }

    /// Succeeds when `response` does not satisfy the document.
    pub fn does_not_satisfy(&self, response: &ObservedResponse) -> Result<(), AssertionFailure> {
        if validate(&self.spec, response).is_err() {
            return Ok(());
        }

        // Validation passed, so resolution succeeds as well.
        let message = match resolve(&self.spec, response) {
            Ok(resolved) => not_to_satisfy_message(response, &resolved),
            Err(error) => to_satisfy_message(response, &error),
        };
        Err(AssertionFailure {
            code: None,
            message,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const SPEC: &str = r#"
openapi: "3.0.0"
info: {title: t, version: "1"}
paths:
  /ping:
    get:
      responses:
        "200":
          description: pong
          content:
            application/json:
              schema: {type: string}
"#;

    #[test]
    fn satisfies_and_negation_are_exclusive() {
        let api = ResponseAssertion::parse(SPEC).unwrap();
        let good = ObservedResponse::new("GET", "/ping", 200).with_body(json!("pong"));
        let bad = ObservedResponse::new("GET", "/ping", 200).with_body(json!(1));

        assert!(api.satisfies(&good).is_ok());
        assert!(api.does_not_satisfy(&good).is_err());

        let failure = api.satisfies(&bad).unwrap_err();
        assert_eq!(failure.code, Some(ErrorCode::InvalidBody));
        assert!(api.does_not_satisfy(&bad).is_ok());
    }

    #[test]
    fn negated_failure_has_no_code() {
        let api = ResponseAssertion::parse(SPEC).unwrap();
        let good = ObservedResponse::new("GET", "/ping", 200).with_body(json!("pong"));

        let failure = api.does_not_satisfy(&good).unwrap_err();
        assert_eq!(failure.code, None);
        assert!(failure
            .to_string()
            .starts_with("expected res not to satisfy API spec"));
    }

    #[test]
    fn clones_share_the_document() {
        let api = ResponseAssertion::parse(SPEC).unwrap();
        let other = api.clone();
        assert!(Arc::ptr_eq(api.spec(), other.spec()));
    }

    #[test]
    fn from_file_reads_yaml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("api.yml");
        std::fs::write(&path, SPEC).unwrap();

        let api = ResponseAssertion::from_file(&path).unwrap();
        let good = ObservedResponse::new("GET", "/ping", 200).with_body(json!("pong"));
        assert!(api.satisfies(&good).is_ok());

        let missing = ResponseAssertion::from_file(dir.path().join("missing.yml")).unwrap_err();
        assert!(matches!(missing, TestError::Load(ParseError::Io(_))));
    }

    #[test]
    fn load_error_is_reported() {
        let err = ResponseAssertion::parse("info: {title: nothing}").unwrap_err();
        assert!(matches!(err, TestError::Load(ParseError::UnknownFormat)));
    }

    #[test]
    fn macros_pass_silently() {
        let api = ResponseAssertion::parse(SPEC).unwrap();
        let good = ObservedResponse::new("GET", "/ping", 200).with_body(json!("pong"));
        let bad = ObservedResponse::new("GET", "/nope", 200);

        crate::assert_satisfies_api_spec!(api, good);
        crate::assert_not_satisfies_api_spec!(api, bad);
    }

    #[test]
    #[should_panic(expected = "expected res to satisfy API spec")]
    fn satisfies_macro_panics_with_report() {
        let api = ResponseAssertion::parse(SPEC).unwrap();
        let bad = ObservedResponse::new("GET", "/nope", 200);
        crate::assert_satisfies_api_spec!(api, bad);
    }
}
