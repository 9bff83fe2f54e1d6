use std::fmt;

use serde::Serialize;
use thiserror::Error;

use specward_spec::{PathHint, ResponseDefinition};

use crate::response::ObservedRequest;
use crate::schema::Violation;

/// Stable machine-readable code of a [`ValidationError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    ServerNotFound,
    BasePathNotFound,
    PathNotFound,
    MethodNotFound,
    StatusNotFound,
    InvalidBody,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::ServerNotFound => "SERVER_NOT_FOUND",
            ErrorCode::BasePathNotFound => "BASE_PATH_NOT_FOUND",
            ErrorCode::PathNotFound => "PATH_NOT_FOUND",
            ErrorCode::MethodNotFound => "METHOD_NOT_FOUND",
            ErrorCode::StatusNotFound => "STATUS_NOT_FOUND",
            ErrorCode::InvalidBody => "INVALID_BODY",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why an observed response does not satisfy the document.
///
/// Each variant names the first failing stage and carries the context
/// needed to explain it. A code implies every earlier stage succeeded.
#[derive(Debug, Clone, Error, Serialize)]
#[serde(tag = "code", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ValidationError {
    #[error("no declared server matches request path '{}'", .request.path)]
    ServerNotFound {
        request: ObservedRequest,
        servers: Vec<String>,
    },

    #[error("request path '{}' does not start with basePath '{base_path}'", .request.path)]
    BasePathNotFound {
        request: ObservedRequest,
        base_path: String,
    },

    #[error("no declared path matches request path '{}'", .request.path)]
    PathNotFound {
        request: ObservedRequest,
        paths: Vec<String>,
        hint: PathHint,
    },

    #[error("no '{}' operation declared for path '{path}'", .request.method)]
    MethodNotFound {
        request: ObservedRequest,
        /// The matched path template.
        path: String,
        methods: Vec<String>,
    },

    #[error("no '{status}' response declared for '{} {path}'", .request.method)]
    StatusNotFound {
        request: ObservedRequest,
        path: String,
        status: u16,
        statuses: Vec<String>,
    },

    #[error("{}", join_violations(.violations))]
    InvalidBody {
        request: ObservedRequest,
        path: String,
        status: u16,
        violations: Vec<Violation>,
        response: Box<ResponseDefinition>,
    },
}

impl ValidationError {
    pub fn code(&self) -> ErrorCode {
        match self {
            ValidationError::ServerNotFound { .. } => ErrorCode::ServerNotFound,
            ValidationError::BasePathNotFound { .. } => ErrorCode::BasePathNotFound,
            ValidationError::PathNotFound { .. } => ErrorCode::PathNotFound,
            ValidationError::MethodNotFound { .. } => ErrorCode::MethodNotFound,
            ValidationError::StatusNotFound { .. } => ErrorCode::StatusNotFound,
            ValidationError::InvalidBody { .. } => ErrorCode::InvalidBody,
        }
    }

    /// The request whose response failed.
    pub fn request(&self) -> &ObservedRequest {
        match self {
            ValidationError::ServerNotFound { request, .. }
            | ValidationError::BasePathNotFound { request, .. }
            | ValidationError::PathNotFound { request, .. }
            | ValidationError::MethodNotFound { request, .. }
            | ValidationError::StatusNotFound { request, .. }
            | ValidationError::InvalidBody { request, .. } => request,
        }
    }

    /// The matched path template, once path resolution has succeeded.
    pub fn matched_path(&self) -> Option<&str> {
        match self {
            ValidationError::MethodNotFound { path, .. }
            | ValidationError::StatusNotFound { path, .. }
            | ValidationError::InvalidBody { path, .. } => Some(path),
            _ => None,
        }
    }

    /// Serialize to a JSON value for machine-readable reports.
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_else(|_| {
            serde_json::json!({ "code": self.code().as_str(), "message": self.to_string() })
        })
    }
}

fn join_violations(violations: &[Violation]) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}
