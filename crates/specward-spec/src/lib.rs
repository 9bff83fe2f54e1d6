//! OpenAPI 2.0 and 3.x document model.
//!
//! Reads YAML/JSON documents into an immutable [`ApiSpecification`]. The
//! version variant (Swagger 2.0 or OpenAPI 3.x) is chosen once from the root
//! `swagger` / `openapi` field; both variants expose the same [`OpenApiSpec`]
//! contract for resolving a request pathname to a declared path template.

pub mod error;
pub mod model;
pub mod parser;
pub mod spec;

pub use error::{ParseError, PathHint, PathResolutionError};
pub use model::{HeaderDefinition, Operation, PathItem, ResponseDefinition, Server, SpecVersion};
pub use parser::{parse_spec, parse_spec_file};
pub use spec::{ApiSpecification, OpenApi2Spec, OpenApi3Spec, OpenApiSpec, SpecDocument};
