//! The two document variants and their shared contract.

use indexmap::IndexMap;
use serde_json::{Map, Value};

use specward_router::{ServerPrefix, TemplateSet};

use crate::error::{ParseError, PathHint, PathResolutionError};
use crate::model::{PathItem, Server, SpecVersion};

/// Parts of a document common to both versions.
#[derive(Debug, Clone)]
pub struct SpecDocument {
    version: SpecVersion,
    version_string: String,
    title: Option<String>,
    paths: IndexMap<String, PathItem>,
    templates: TemplateSet,
    components: Map<String, Value>,
}

impl SpecDocument {
    pub fn new(
        version: SpecVersion,
        version_string: String,
        title: Option<String>,
        paths: IndexMap<String, PathItem>,
        components: Map<String, Value>,
    ) -> Self {
        let templates = paths.keys().map(String::as_str).collect();
        Self {
            version,
            version_string,
            title,
            paths,
            templates,
            components,
        }
    }

    pub fn version(&self) -> SpecVersion {
        self.version
    }

    /// The version marker exactly as declared (e.g. `"2.0"`, `"3.1.0"`).
    pub fn version_string(&self) -> &str {
        &self.version_string
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    /// Match candidate pathnames against the declared templates.
    ///
    /// Candidates are tried in order; for each one the first template in
    /// declaration order wins.
    fn match_candidates<'a, I>(&self, candidates: I) -> Option<&str>
    where
        I: IntoIterator<Item = &'a str>,
    {
        candidates
            .into_iter()
            .find_map(|candidate| self.templates.find(candidate))
            .map(|template| template.as_str())
    }

    fn path_not_found(&self, hint: PathHint) -> PathResolutionError {
        PathResolutionError::PathNotFound {
            paths: self.paths.keys().cloned().collect(),
            hint,
        }
    }
}

/// Contract shared by Swagger 2.0 and OpenAPI 3.x documents.
pub trait OpenApiSpec {
    /// Version-independent parts of the document.
    fn document(&self) -> &SpecDocument;

    /// Resolve a request pathname to the declared path template it matches.
    fn resolve_path_template(&self, pathname: &str) -> Result<&str, PathResolutionError>;

    /// Declared server URLs (OpenAPI 3 only).
    fn server_urls(&self) -> Vec<String>;

    /// Whether the document has a `basePath` key.
    fn did_user_define_base_path(&self) -> bool {
        false
    }

    /// Whether the document declares at least one server.
    fn did_user_define_servers(&self) -> bool {
        false
    }

    fn version(&self) -> SpecVersion {
        self.document().version()
    }

    /// Declared path items keyed by template, in declaration order.
    fn paths(&self) -> &IndexMap<String, PathItem> {
        &self.document().paths
    }

    /// Declared path templates in declaration order.
    fn path_templates(&self) -> Vec<&str> {
        self.paths().keys().map(String::as_str).collect()
    }

    fn path_item(&self, template: &str) -> Option<&PathItem> {
        self.paths().get(template)
    }

    /// `definitions` (2.0) or `components` (3.x), keyed as in the document
    /// root so that schema `$ref` pointers resolve against them.
    fn component_definitions(&self) -> &Map<String, Value> {
        &self.document().components
    }
}

/// A Swagger 2.0 document.
#[derive(Debug, Clone)]
pub struct OpenApi2Spec {
    document: SpecDocument,
    base_path: Option<String>,
}

impl OpenApi2Spec {
    pub fn new(document: SpecDocument, base_path: Option<String>) -> Self {
        Self {
            document,
            base_path,
        }
    }

    pub fn base_path(&self) -> Option<&str> {
        self.base_path.as_deref()
    }
}

impl OpenApiSpec for OpenApi2Spec {
    fn document(&self) -> &SpecDocument {
        &self.document
    }

    /// "If the basePath property is not provided, the API is served directly
    /// under the host."
    fn resolve_path_template(&self, pathname: &str) -> Result<&str, PathResolutionError> {
        let stripped = match self.base_path.as_deref() {
            Some(base_path) if !base_path.is_empty() => {
                let Some(rest) = pathname.strip_prefix(base_path) else {
                    return Err(PathResolutionError::BasePathNotFound {
                        base_path: base_path.to_string(),
                    });
                };
                if base_path == "/" {
                    pathname
                } else {
                    rest
                }
            }
            _ => pathname,
        };

        self.document
            .match_candidates([stripped])
            .ok_or_else(|| {
                let hint = match &self.base_path {
                    Some(base_path) => PathHint::BasePath(base_path.clone()),
                    None => PathHint::None,
                };
                self.document.path_not_found(hint)
            })
    }

    fn server_urls(&self) -> Vec<String> {
        Vec::new()
    }

    fn did_user_define_base_path(&self) -> bool {
        self.base_path.is_some()
    }
}

/// An OpenAPI 3.x document.
#[derive(Debug, Clone)]
pub struct OpenApi3Spec {
    document: SpecDocument,
    servers: Vec<Server>,
    /// One prefix per declared server, or the implicit `/` server.
    prefixes: Vec<ServerPrefix>,
}

impl OpenApi3Spec {
    pub fn new(document: SpecDocument, servers: Vec<Server>) -> Self {
        let prefixes = if servers.is_empty() {
            vec![ServerPrefix::parse("/")]
        } else {
            servers.iter().map(|s| ServerPrefix::parse(&s.url)).collect()
        };
        Self {
            document,
            servers,
            prefixes,
        }
    }

    pub fn servers(&self) -> &[Server] {
        &self.servers
    }

    /// Declared server URLs whose path prefix matches `pathname`.
    pub fn matching_server_urls(&self, pathname: &str) -> Vec<String> {
        self.prefixes
            .iter()
            .filter(|prefix| prefix.strip(pathname).is_some())
            .map(|prefix| prefix.url().to_string())
            .collect()
    }
}

impl OpenApiSpec for OpenApi3Spec {
    fn document(&self) -> &SpecDocument {
        &self.document
    }

    fn resolve_path_template(&self, pathname: &str) -> Result<&str, PathResolutionError> {
        // Every server is tried; a later server may match where an earlier one did not.
        let candidates: Vec<String> = self
            .prefixes
            .iter()
            .filter_map(|prefix| prefix.strip(pathname))
            .collect();

        if candidates.is_empty() {
            return Err(PathResolutionError::ServerNotFound {
                servers: self.server_urls(),
            });
        }

        self.document
            .match_candidates(candidates.iter().map(String::as_str))
            .ok_or_else(|| {
                let hint = if self.did_user_define_servers() {
                    PathHint::Servers(self.matching_server_urls(pathname))
                } else {
                    PathHint::None
                };
                self.document.path_not_found(hint)
            })
    }

    fn server_urls(&self) -> Vec<String> {
        self.servers.iter().map(|s| s.url.clone()).collect()
    }

    fn did_user_define_servers(&self) -> bool {
        !self.servers.is_empty()
    }
}

/// A loaded, immutable API document.
///
/// The variant is fixed at load time from the root version marker. Share it
/// behind an `Arc`; nothing mutates it after construction.
#[derive(Debug, Clone)]
pub enum ApiSpecification {
    V2(OpenApi2Spec),
    V3(OpenApi3Spec),
}

impl ApiSpecification {
    /// Build from an already-parsed document.
    pub fn from_value(root: Value) -> Result<Self, ParseError> {
        crate::parser::parse_value(root)
    }

    fn inner(&self) -> &dyn OpenApiSpec {
        match self {
            ApiSpecification::V2(spec) => spec,
            ApiSpecification::V3(spec) => spec,
        }
    }

    /// Declared `basePath` (Swagger 2.0 only).
    pub fn base_path(&self) -> Option<&str> {
        match self {
            ApiSpecification::V2(spec) => spec.base_path(),
            ApiSpecification::V3(_) => None,
        }
    }

    /// Declared server URLs whose prefix matches `pathname` (OpenAPI 3 only).
    pub fn matching_server_urls(&self, pathname: &str) -> Vec<String> {
        match self {
            ApiSpecification::V2(_) => Vec::new(),
            ApiSpecification::V3(spec) => spec.matching_server_urls(pathname),
        }
    }

    /// The template a request pathname resolves to, if any.
    pub fn matched_path_template(&self, pathname: &str) -> Option<&str> {
        self.resolve_path_template(pathname).ok()
    }
}

impl OpenApiSpec for ApiSpecification {
    fn document(&self) -> &SpecDocument {
        self.inner().document()
    }

    fn resolve_path_template(&self, pathname: &str) -> Result<&str, PathResolutionError> {
        self.inner().resolve_path_template(pathname)
    }

    fn server_urls(&self) -> Vec<String> {
        self.inner().server_urls()
    }

    fn did_user_define_base_path(&self) -> bool {
        self.inner().did_user_define_base_path()
    }

    fn did_user_define_servers(&self) -> bool {
        self.inner().did_user_define_servers()
    }
}
