//! Schema validation of response bodies and headers.

use std::fmt;

use serde::Serialize;
use serde_json::{Map, Value};

use specward_spec::{ApiSpecification, OpenApiSpec, SpecVersion};

/// A single violation reported by a [`SchemaValidator`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SchemaViolation {
    /// JSON pointer into the instance (`""` for the root).
    pub instance_path: String,
    pub message: String,
}

/// Validates an instance against a schema.
///
/// An empty result means the instance conforms.
pub trait SchemaValidator: Send + Sync {
    fn validate(&self, schema: &Value, instance: &Value) -> Vec<SchemaViolation>;
}

/// Which part of the response a violation was found in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "in", content = "name", rename_all = "lowercase")]
pub enum ViolationLocation {
    Body,
    Header(String),
}

impl fmt::Display for ViolationLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ViolationLocation::Body => write!(f, "body"),
            ViolationLocation::Header(name) => write!(f, "header '{}'", name),
        }
    }
}

/// A violation found while checking an observed response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Violation {
    pub location: ViolationLocation,
    pub instance_path: String,
    pub message: String,
}

impl Violation {
    pub fn new(location: ViolationLocation, violation: SchemaViolation) -> Self {
        Self {
            location,
            instance_path: violation.instance_path,
            message: violation.message,
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}: {}", self.location, self.instance_path, self.message)
    }
}

/// [`SchemaValidator`] backed by the `jsonschema` crate.
///
/// Component definitions of the document are embedded into every schema
/// before compiling so that `#/definitions/...` and
/// `#/components/schemas/...` references resolve.
#[derive(Debug, Clone)]
pub struct JsonSchemaValidator {
    draft: jsonschema::Draft,
    components: Map<String, Value>,
    /// `nullable` (OpenAPI 3.0) or `x-nullable` (Swagger 2.0).
    nullable_keyword: Option<&'static str>,
}

impl Default for JsonSchemaValidator {
    fn default() -> Self {
        Self {
            draft: jsonschema::Draft::Draft4,
            components: Map::new(),
            nullable_keyword: None,
        }
    }
}

impl JsonSchemaValidator {
    /// Validator matching the schema dialect and components of `spec`.
    ///
    /// Swagger 2.0 and OpenAPI 3.0 schemas are Draft 4 based; OpenAPI 3.1
    /// uses Draft 2020-12. The 3.0 `nullable` and Swagger `x-nullable`
    /// keywords are rewritten into a `"null"` type before compiling.
    pub fn for_spec(spec: &ApiSpecification) -> Self {
        let version = spec.document().version_string();
        let (draft, nullable_keyword) = match spec.version() {
            SpecVersion::V3 if !version.starts_with("3.0") => {
                (jsonschema::Draft::Draft202012, None)
            }
            SpecVersion::V3 => (jsonschema::Draft::Draft4, Some("nullable")),
            SpecVersion::V2 => (jsonschema::Draft::Draft4, Some("x-nullable")),
        };

        let mut components = spec.component_definitions().clone();
        if let Some(keyword) = nullable_keyword {
            for value in components.values_mut() {
                allow_null(value, keyword);
            }
        }

        Self {
            draft,
            components,
            nullable_keyword,
        }
    }

    fn prepare(&self, schema: &Value) -> Value {
        let mut schema = schema.clone();
        if let Some(keyword) = self.nullable_keyword {
            allow_null(&mut schema, keyword);
        }
        if let Some(obj) = schema.as_object_mut() {
            for (key, value) in &self.components {
                obj.entry(key.clone()).or_insert_with(|| value.clone());
            }
        }
        schema
    }
}

/// Rewrite every subschema marked `keyword: true` so that `null` is accepted.
///
/// A string `type` becomes `[type, "null"]`, a `type` list gains `"null"`,
/// and an `enum` gains `null`. Schemas without `type` already accept null.
fn allow_null(value: &mut Value, keyword: &str) {
    match value {
        Value::Object(obj) => {
            if obj.get(keyword) == Some(&Value::Bool(true)) {
                let widened = match obj.get("type") {
                    Some(Value::String(ty)) if ty != "null" => {
                        Some(Value::Array(vec![Value::from(ty.as_str()), Value::from("null")]))
                    }
                    _ => None,
                };
                if let Some(types) = widened {
                    obj.insert("type".to_string(), types);
                } else if let Some(Value::Array(types)) = obj.get_mut("type") {
                    if !types.iter().any(|t| t.as_str() == Some("null")) {
                        types.push(Value::from("null"));
                    }
                }
                if let Some(Value::Array(values)) = obj.get_mut("enum") {
                    if !values.contains(&Value::Null) {
                        values.push(Value::Null);
                    }
                }
            }
            for child in obj.values_mut() {
                allow_null(child, keyword);
            }
        }
        Value::Array(items) => {
            for item in items {
                allow_null(item, keyword);
            }
        }
        _ => {}
    }
}

impl SchemaValidator for JsonSchemaValidator {
    fn validate(&self, schema: &Value, instance: &Value) -> Vec<SchemaViolation> {
        let schema = self.prepare(schema);

        let validator = match jsonschema::options()
            .with_draft(self.draft)
            .should_validate_formats(true)
            .build(&schema)
        {
            Ok(v) => v,
            Err(e) => {
                tracing::warn!(error = %e, "response schema failed to compile");
                return vec![SchemaViolation {
                    instance_path: String::new(),
                    message: format!("invalid schema: {}", e),
                }];
            }
        };

        validator
            .iter_errors(instance)
            .map(|e| SchemaViolation {
                instance_path: e.instance_path.to_string(),
                message: e.to_string(),
            })
            .collect()
    }
}

/// Turn a header value into the JSON instance its schema expects.
///
/// Header values are always strings on the wire; numeric and boolean
/// schemas get the value parsed as JSON when that succeeds.
pub(crate) fn header_instance(schema: Option<&Value>, value: &str) -> Value {
    let wants_scalar = schema
        .and_then(|s| s.get("type"))
        .and_then(Value::as_str)
        .is_some_and(|t| matches!(t, "integer" | "number" | "boolean"));

    if wants_scalar {
        if let Ok(parsed) = serde_json::from_str::<Value>(value) {
            if parsed.is_number() || parsed.is_boolean() {
                return parsed;
            }
        }
    }
    Value::String(value.to_string())
}
