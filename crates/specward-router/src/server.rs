//! OpenAPI 3 server URL prefixes.
//!
//! A server URL such as `https://{region}.example.com/v1/{tenant}` serves its
//! paths under `/v1/{tenant}`. Only the path part takes part in matching:
//! the scheme and host are discarded, variable segments in the path match any
//! non-empty request segment, and literal segments must match exactly.

use crate::template::Segment;

/// Extract the path part of a server URL.
///
/// Handles absolute (`https://host/v1`), scheme-relative (`//host/v1`) and
/// relative (`/v1`, `v1`) URLs. The result always starts with `/` and never
/// ends with one unless it is the root.
pub fn server_path(url: &str) -> String {
    let after_authority = if let Some(idx) = url.find("://") {
        authority_path(&url[idx + 3..])
    } else if let Some(rest) = url.strip_prefix("//") {
        authority_path(rest)
    } else {
        url
    };

    let path = after_authority
        .split(['?', '#'])
        .next()
        .unwrap_or_default()
        .trim_end_matches('/');

    if path.is_empty() {
        "/".to_string()
    } else if path.starts_with('/') {
        path.to_string()
    } else {
        format!("/{}", path)
    }
}

/// Skip the host (and port) of an authority-prefixed URL remainder.
fn authority_path(rest: &str) -> &str {
    match rest.find('/') {
        Some(idx) => &rest[idx..],
        None => "",
    }
}

/// The compiled path prefix of one declared server.
#[derive(Debug, Clone)]
pub struct ServerPrefix {
    url: String,
    path: String,
    /// Prefix segments without the leading empty one; empty for the root.
    segments: Vec<Segment>,
}

impl ServerPrefix {
    /// Compile the prefix of a declared server URL.
    pub fn parse(url: &str) -> Self {
        let path = server_path(url);
        let segments = path
            .split('/')
            .skip(1)
            .filter(|s| !s.is_empty())
            .map(Segment::parse)
            .collect();
        Self {
            url: url.to_string(),
            path,
            segments,
        }
    }

    /// The server URL exactly as declared.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// The path part of the server URL, e.g. `/v1/{tenant}`.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Whether this server is mounted at the root.
    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    /// Strip this server's prefix from `pathname`.
    ///
    /// Returns the remaining suffix (always starting with `/`) when the
    /// leading segments of `pathname` match the prefix, `None` otherwise.
    /// Matching is segment-aligned: `/v1` is not a prefix of `/v1beta/users`.
    pub fn strip(&self, pathname: &str) -> Option<String> {
        if self.is_root() {
            return Some(pathname.to_string());
        }

        let mut parts = pathname.split('/');
        if parts.next() != Some("") {
            return None;
        }

        for segment in &self.segments {
            match parts.next() {
                Some(actual) if segment.matches(actual) => {}
                _ => return None,
            }
        }

        let rest: Vec<&str> = parts.collect();
        Some(format!("/{}", rest.join("/")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn server_path_of_absolute_url() {
        assert_eq!(server_path("https://api.example.com/v1"), "/v1");
        assert_eq!(server_path("http://localhost:8080/api/v2/"), "/api/v2");
        assert_eq!(server_path("https://api.example.com"), "/");
        assert_eq!(server_path("https://api.example.com/"), "/");
    }

    #[test]
    fn server_path_of_templated_host() {
        assert_eq!(
            server_path("{scheme}://{region}.example.com/v1/{tenant}"),
            "/v1/{tenant}"
        );
    }

    #[test]
    fn server_path_of_relative_urls() {
        assert_eq!(server_path("/v1"), "/v1");
        assert_eq!(server_path("v1"), "/v1");
        assert_eq!(server_path("//cdn.example.com/assets"), "/assets");
        assert_eq!(server_path(""), "/");
        assert_eq!(server_path("/"), "/");
    }

    #[test]
    fn server_path_drops_query_and_fragment() {
        assert_eq!(server_path("https://example.com/v1?debug=1"), "/v1");
        assert_eq!(server_path("/v1#top"), "/v1");
    }

    #[test]
    fn root_server_keeps_pathname() {
        let server = ServerPrefix::parse("https://api.example.com");
        assert!(server.is_root());
        assert_eq!(server.strip("/users/1"), Some("/users/1".to_string()));
    }

    #[test]
    fn static_prefix_is_stripped() {
        let server = ServerPrefix::parse("https://api.example.com/v1");
        assert_eq!(server.url(), "https://api.example.com/v1");
        assert_eq!(server.path(), "/v1");
        assert_eq!(server.strip("/v1/users/1"), Some("/users/1".to_string()));
        assert_eq!(server.strip("/v1"), Some("/".to_string()));
        assert_eq!(server.strip("/v2/users"), None);
    }

    #[test]
    fn prefix_matching_is_segment_aligned() {
        let server = ServerPrefix::parse("/v1");
        assert_eq!(server.strip("/v1beta/users"), None);
    }

    #[test]
    fn variable_prefix_segment_matches_any_value() {
        let server = ServerPrefix::parse("https://example.com/{version}/api");
        assert_eq!(server.strip("/v3/api/pets"), Some("/pets".to_string()));
        assert_eq!(server.strip("/v3/other/pets"), None);
        assert_eq!(server.strip("//api/pets"), None);
    }

    #[test]
    fn trailing_slash_of_request_survives_stripping() {
        let server = ServerPrefix::parse("/v1");
        assert_eq!(server.strip("/v1/users/"), Some("/users/".to_string()));
    }

    #[test]
    fn relative_pathname_never_matches_non_root_server() {
        let server = ServerPrefix::parse("/v1");
        assert_eq!(server.strip("v1/users"), None);
    }
}
