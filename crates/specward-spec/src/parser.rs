use indexmap::IndexMap;
use serde_json::{Map, Value};

use crate::error::ParseError;
use crate::model::{
    HeaderDefinition, Operation, PathItem, ResponseDefinition, Server, SpecVersion,
};
use crate::spec::{ApiSpecification, OpenApi2Spec, OpenApi3Spec, SpecDocument};

/// HTTP methods we recognize as operations in a path item.
const HTTP_METHODS: &[&str] = &[
    "get", "put", "post", "delete", "options", "head", "patch", "trace",
];

/// Parse a Swagger 2.0 or OpenAPI 3.x document from a YAML/JSON string.
pub fn parse_spec(input: &str) -> Result<ApiSpecification, ParseError> {
    // Parse YAML (also handles JSON since JSON is valid YAML)
    let root: Value = serde_yaml::from_str(input).map_err(|e| ParseError::Parse(e.to_string()))?;
    parse_value(root)
}

/// Parse a document from a file path.
pub fn parse_spec_file(path: &std::path::Path) -> Result<ApiSpecification, ParseError> {
    let content = std::fs::read_to_string(path)?;
    let spec = parse_spec(&content)?;
    tracing::debug!(path = %path.display(), "loaded API document");
    Ok(spec)
}

/// Build a specification from an already-parsed document.
pub fn parse_value(root: Value) -> Result<ApiSpecification, ParseError> {
    let root_obj = root
        .as_object()
        .ok_or_else(|| ParseError::Parse("document root must be an object".into()))?;

    let (version, version_string) = detect_version(root_obj)?;

    let title = root_obj
        .get("info")
        .and_then(|info| info.get("title"))
        .and_then(Value::as_str)
        .map(str::to_string);

    let paths = parse_paths(&root, root_obj, version)?;

    // Schemas reference these by JSON pointer from the document root
    let components_key = match version {
        SpecVersion::V2 => "definitions",
        SpecVersion::V3 => "components",
    };
    let components: Map<String, Value> = root_obj
        .get(components_key)
        .map(|v| (components_key.to_string(), v.clone()))
        .into_iter()
        .collect();

    tracing::debug!(
        version = %version_string,
        paths = paths.len(),
        "parsed API document"
    );

    let document = SpecDocument::new(version, version_string, title, paths, components);

    let spec = match version {
        SpecVersion::V2 => {
            let base_path = match root_obj.get("basePath") {
                None => None,
                Some(Value::Null) => Some(String::new()),
                Some(Value::String(s)) => Some(s.clone()),
                Some(_) => return Err(ParseError::Schema("'basePath' must be a string".into())),
            };
            ApiSpecification::V2(OpenApi2Spec::new(document, base_path))
        }
        SpecVersion::V3 => {
            let servers = parse_servers(root_obj)?;
            ApiSpecification::V3(OpenApi3Spec::new(document, servers))
        }
    };

    Ok(spec)
}

/// Detect Swagger 2.0 vs OpenAPI 3.x and extract the version string.
fn detect_version(root: &Map<String, Value>) -> Result<(SpecVersion, String), ParseError> {
    if let Some(marker) = root.get("swagger") {
        let version = version_marker(marker, "swagger")?;
        if major(&version) != "2" {
            return Err(ParseError::UnsupportedVersion(version));
        }
        Ok((SpecVersion::V2, version))
    } else if let Some(marker) = root.get("openapi") {
        let version = version_marker(marker, "openapi")?;
        if major(&version) != "3" {
            return Err(ParseError::UnsupportedVersion(version));
        }
        Ok((SpecVersion::V3, version))
    } else {
        Err(ParseError::UnknownFormat)
    }
}

/// Read a version marker. Unquoted YAML `2.0` arrives as a number.
fn version_marker(value: &Value, field: &str) -> Result<String, ParseError> {
    match value {
        Value::String(s) => Ok(s.clone()),
        Value::Number(n) => Ok(n.to_string()),
        _ => Err(ParseError::Schema(format!("'{}' must be a string", field))),
    }
}

fn major(version: &str) -> &str {
    version.split('.').next().unwrap_or_default().trim()
}

/// Parse OpenAPI 3 `servers`.
fn parse_servers(root: &Map<String, Value>) -> Result<Vec<Server>, ParseError> {
    let servers = match root.get("servers") {
        None | Some(Value::Null) => return Ok(Vec::new()),
        Some(Value::Array(arr)) => arr,
        Some(_) => return Err(ParseError::Schema("'servers' must be an array".into())),
    };

    servers
        .iter()
        .enumerate()
        .map(|(i, server)| {
            let url = server
                .get("url")
                .and_then(Value::as_str)
                .ok_or_else(|| ParseError::Schema(format!("servers[{}] is missing 'url'", i)))?;
            Ok(Server {
                url: url.to_string(),
                description: server
                    .get("description")
                    .and_then(Value::as_str)
                    .map(str::to_string),
            })
        })
        .collect()
}

/// Parse `paths` into path items, preserving declaration order.
fn parse_paths(
    root: &Value,
    root_obj: &Map<String, Value>,
    version: SpecVersion,
) -> Result<IndexMap<String, PathItem>, ParseError> {
    let mut result = IndexMap::new();

    let paths = match root_obj.get("paths") {
        None | Some(Value::Null) => return Ok(result), // No paths is valid (empty API)
        Some(Value::Object(p)) => p,
        Some(_) => return Err(ParseError::Schema("'paths' must be an object".into())),
    };

    for (template, item) in paths {
        let item = resolve_ref(root, item)?;
        let item_obj = item.as_object().ok_or_else(|| {
            ParseError::Schema(format!("path item for '{}' must be an object", template))
        })?;

        let mut path_item = PathItem::default();

        for (key, op_value) in item_obj {
            let method = key.to_ascii_lowercase();
            if !HTTP_METHODS.contains(&method.as_str()) {
                continue;
            }

            let op_obj = op_value.as_object().ok_or_else(|| {
                ParseError::Schema(format!(
                    "operation {} {} must be an object",
                    method.to_ascii_uppercase(),
                    template
                ))
            })?;

            let operation_id = op_obj
                .get("operationId")
                .and_then(Value::as_str)
                .map(str::to_string);

            let responses = parse_responses(root, version, op_obj).map_err(|e| match e {
                ParseError::Schema(msg) => ParseError::Schema(format!(
                    "{} {}: {}",
                    method.to_ascii_uppercase(),
                    template,
                    msg
                )),
                other => other,
            })?;

            path_item.operations.insert(
                method.clone(),
                Operation {
                    method: method.to_ascii_uppercase(),
                    operation_id,
                    responses,
                },
            );
        }

        result.insert(template.clone(), path_item);
    }

    Ok(result)
}

/// Parse the `responses` object of an operation.
fn parse_responses(
    root: &Value,
    version: SpecVersion,
    op: &Map<String, Value>,
) -> Result<IndexMap<String, ResponseDefinition>, ParseError> {
    let responses = match op.get("responses") {
        None | Some(Value::Null) => return Ok(IndexMap::new()),
        Some(Value::Object(r)) => r,
        Some(_) => return Err(ParseError::Schema("'responses' must be an object".into())),
    };

    let mut result = IndexMap::new();
    for (status, response) in responses {
        let response = resolve_ref(root, response)?;
        let definition = parse_response(root, version, response)
            .map_err(|e| match e {
                ParseError::Schema(msg) => {
                    ParseError::Schema(format!("response '{}': {}", status, msg))
                }
                other => other,
            })?;
        result.insert(status.clone(), definition);
    }
    Ok(result)
}

/// Parse a single (already dereferenced) response object.
fn parse_response(
    root: &Value,
    version: SpecVersion,
    response: &Value,
) -> Result<ResponseDefinition, ParseError> {
    let obj = response
        .as_object()
        .ok_or_else(|| ParseError::Schema("response must be an object".into()))?;

    let description = obj
        .get("description")
        .and_then(Value::as_str)
        .map(str::to_string);

    let (schema, media_types) = match version {
        SpecVersion::V2 => (obj.get("schema").cloned(), Vec::new()),
        SpecVersion::V3 => match obj.get("content").and_then(Value::as_object) {
            Some(content) => (select_body_schema(content), content.keys().cloned().collect()),
            None => (None, Vec::new()),
        },
    };

    let headers = parse_headers(root, version, obj)?;

    Ok(ResponseDefinition {
        description,
        schema,
        media_types,
        headers,
        definition: response.clone(),
    })
}

/// Pick the body schema out of an OpenAPI 3 `content` map.
///
/// `application/json` first, then any other JSON media type, then whatever
/// is declared first.
fn select_body_schema(content: &Map<String, Value>) -> Option<Value> {
    let schema_of = |media: &Value| media.get("schema").cloned();

    if let Some(media) = content.get("application/json") {
        return schema_of(media);
    }
    if let Some((_, media)) = content.iter().find(|(mt, _)| is_json_media_type(mt)) {
        return schema_of(media);
    }
    content.values().next().and_then(schema_of)
}

fn is_json_media_type(media_type: &str) -> bool {
    let base = media_type.split(';').next().unwrap_or(media_type).trim();
    base.ends_with("/json") || base.ends_with("+json")
}

/// Parse response headers.
///
/// Swagger 2.0 header objects are schema-like themselves; OpenAPI 3 headers
/// carry a nested `schema` and a `required` flag.
fn parse_headers(
    root: &Value,
    version: SpecVersion,
    response: &Map<String, Value>,
) -> Result<IndexMap<String, HeaderDefinition>, ParseError> {
    let mut result = IndexMap::new();

    let Some(headers) = response.get("headers").and_then(Value::as_object) else {
        return Ok(result);
    };

    for (name, header) in headers {
        let header = resolve_ref(root, header)?;
        let definition = match version {
            SpecVersion::V2 => {
                let mut schema = header.clone();
                if let Some(obj) = schema.as_object_mut() {
                    obj.remove("description");
                }
                HeaderDefinition {
                    required: false,
                    schema: Some(schema),
                }
            }
            SpecVersion::V3 => {
                // "If a response header is defined with the name Content-Type, it SHALL be ignored."
                if name.eq_ignore_ascii_case("content-type") {
                    continue;
                }
                HeaderDefinition {
                    required: header
                        .get("required")
                        .and_then(Value::as_bool)
                        .unwrap_or(false),
                    schema: header.get("schema").cloned(),
                }
            }
        };
        result.insert(name.clone(), definition);
    }

    Ok(result)
}

/// Follow local `$ref`s (`#/...`) until a non-reference value is reached.
fn resolve_ref<'a>(root: &'a Value, value: &'a Value) -> Result<&'a Value, ParseError> {
    let mut current = value;
    let mut seen: Vec<&str> = Vec::new();

    while let Some(reference) = current.get("$ref").and_then(Value::as_str) {
        if seen.contains(&reference) {
            return Err(ParseError::UnresolvedRef(format!("{} (cycle)", reference)));
        }
        seen.push(reference);

        let pointer = reference
            .strip_prefix('#')
            .ok_or_else(|| ParseError::UnresolvedRef(reference.to_string()))?;
        current = root
            .pointer(pointer)
            .ok_or_else(|| ParseError::UnresolvedRef(reference.to_string()))?;
    }

    Ok(current)
}
