use serde::Serialize;
use thiserror::Error;

/// Errors produced while loading a document.
#[derive(Debug, Error)]
pub enum ParseError {
    /// Root has neither a `swagger` nor an `openapi` field.
    #[error("not a Swagger 2.0 or OpenAPI 3.x document")]
    UnknownFormat,

    /// Root version marker names a major version we do not support.
    #[error("unsupported version: {0} (only Swagger 2.0 and OpenAPI 3.x are supported)")]
    UnsupportedVersion(String),

    /// YAML/JSON parse error.
    #[error("parse error: {0}")]
    Parse(String),

    /// Local `$ref` that points nowhere or loops back on itself.
    #[error("unresolved $ref: {0}")]
    UnresolvedRef(String),

    /// Document is well-formed YAML/JSON but has the wrong shape.
    #[error("schema error: {0}")]
    Schema(String),

    /// I/O error reading the document.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Extra context attached to [`PathResolutionError::PathNotFound`].
///
/// Tells the reader which prefix the request path did match, so a message can
/// point at the `<prefix>/<endpointPath>` combination that is missing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum PathHint {
    /// Neither basePath nor servers were declared explicitly.
    None,
    /// The request path matched the declared basePath.
    BasePath(String),
    /// The request path matched these declared server URLs.
    Servers(Vec<String>),
}

/// Failure to resolve a request pathname to a declared path template.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PathResolutionError {
    /// OpenAPI 3: no declared server prefix matches the pathname.
    #[error("no declared server matches the request path")]
    ServerNotFound { servers: Vec<String> },

    /// Swagger 2.0: the pathname does not start with the declared basePath.
    #[error("request path does not start with basePath '{base_path}'")]
    BasePathNotFound { base_path: String },

    /// The prefix matched but no declared path template matches the rest.
    #[error("no declared path matches the request path")]
    PathNotFound { paths: Vec<String>, hint: PathHint },
}
