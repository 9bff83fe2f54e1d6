//! Path template matching for OpenAPI documents.
//!
//! Splits request paths and declared templates on `/` and compares them
//! segment by segment. `{name}` segments match any non-empty segment, every
//! other segment must match literally, and segment counts must be equal.
//! When several templates match, the first one in declaration order wins.
//!
//! The [`server`] module strips OpenAPI 3 server prefixes (which may contain
//! variables themselves) from a request path before template matching.

pub mod server;
pub mod template;

pub use server::{server_path, ServerPrefix};
pub use template::{PathTemplate, TemplateSet};
