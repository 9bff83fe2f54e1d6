use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Document version family, detected from the root field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpecVersion {
    /// `swagger: "2.0"`.
    V2,
    /// `openapi: "3.x.y"`.
    V3,
}

/// A declared path item: HTTP method to operation.
///
/// Methods are stored lowercase in declaration order and looked up
/// case-insensitively.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PathItem {
    pub operations: IndexMap<String, Operation>,
}

impl PathItem {
    /// Look up the operation declared for `method` (any case).
    pub fn operation(&self, method: &str) -> Option<&Operation> {
        self.operations.get(&method.to_ascii_lowercase())
    }

    /// Declared methods, uppercase, in declaration order.
    pub fn methods(&self) -> Vec<String> {
        self.operations
            .keys()
            .map(|m| m.to_ascii_uppercase())
            .collect()
    }
}

/// A single API operation (path + method).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Operation {
    /// The HTTP method (uppercase).
    pub method: String,
    /// The OpenAPI operationId, if present.
    pub operation_id: Option<String>,
    /// Declared responses keyed by stringified status (`"200"`, `"default"`).
    pub responses: IndexMap<String, ResponseDefinition>,
}

impl Operation {
    /// Exact-match lookup of a declared status key.
    pub fn response(&self, status: &str) -> Option<&ResponseDefinition> {
        self.responses.get(status)
    }

    /// Declared status keys in declaration order.
    pub fn statuses(&self) -> Vec<String> {
        self.responses.keys().cloned().collect()
    }
}

/// A declared response, with local `$ref`s already followed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResponseDefinition {
    pub description: Option<String>,
    /// Schema the response body must satisfy, if any.
    pub schema: Option<Value>,
    /// OpenAPI 3 media types declared under `content`.
    pub media_types: Vec<String>,
    /// Declared response headers keyed by name as written in the document.
    pub headers: IndexMap<String, HeaderDefinition>,
    /// The response object as declared, for diagnostics.
    pub definition: Value,
}

/// A declared response header.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HeaderDefinition {
    pub required: bool,
    pub schema: Option<Value>,
}

/// An OpenAPI 3 server entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Server {
    pub url: String,
    pub description: Option<String>,
}
