//! Response validation against OpenAPI documents.
//!
//! Given an [`ObservedResponse`] and a loaded [`ApiSpecification`], resolves
//! the single declared response definition the response must satisfy and
//! reports the first stage that fails:
//!
//! 1. server / basePath prefix and path template
//! 2. operation for the request method
//! 3. response for the status code
//! 4. body and header schemas
//!
//! Failures are returned as [`ValidationError`] values, one variant per
//! [`ErrorCode`]. Nothing here performs I/O or keeps state between calls.
//!
//! [`ApiSpecification`]: specward_spec::ApiSpecification

pub mod error;
pub mod pipeline;
pub mod resolve;
pub mod response;
pub mod schema;

pub use error::{ErrorCode, ValidationError};
pub use pipeline::{resolve, validate, validate_with, ResolvedResponse};
pub use response::{ObservedRequest, ObservedResponse};
pub use schema::{JsonSchemaValidator, SchemaValidator, SchemaViolation, Violation, ViolationLocation};
