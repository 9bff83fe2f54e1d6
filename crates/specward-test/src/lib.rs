//! Test assertions for HTTP responses against an OpenAPI document.
//!
//! Provides [`ResponseAssertion`] for checking observed responses from any
//! test framework, and the [`assert_satisfies_api_spec!`] /
//! [`assert_not_satisfies_api_spec!`] macros for plain `#[test]` functions.

pub mod assertion;
pub mod message;

pub use assertion::{AssertionFailure, ResponseAssertion, TestError};

/// Panic unless `$response` satisfies the document behind `$assertion`.
///
/// ```ignore
/// let api = ResponseAssertion::from_file("openapi.yml")?;
/// assert_satisfies_api_spec!(api, response);
/// ```
#[macro_export]
macro_rules! assert_satisfies_api_spec {
    ($assertion:expr, $response:expr $(,)?) => {
        if let ::std::result::Result::Err(failure) = $assertion.satisfies(&$response) {
            ::std::panic!("{}", failure);
        }
    };
}

/// Panic if `$response` satisfies the document behind `$assertion`.
#[macro_export]
macro_rules! assert_not_satisfies_api_spec {
    ($assertion:expr, $response:expr $(,)?) => {
        if let ::std::result::Result::Err(failure) = $assertion.does_not_satisfy(&$response) {
            ::std::panic!("{}", failure);
        }
    };
}
