/// A parsed path segment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Segment {
    /// Must equal the request segment byte for byte.
    Static(String),
    /// `{name}`: matches any non-empty request segment.
    Param,
}

impl Segment {
    pub(crate) fn parse(raw: &str) -> Self {
        if raw.starts_with('{') && raw.ends_with('}') && raw.len() >= 2 {
            Segment::Param
        } else {
            Segment::Static(raw.to_string())
        }
    }

    pub(crate) fn matches(&self, actual: &str) -> bool {
        match self {
            Segment::Static(expected) => expected == actual,
            Segment::Param => !actual.is_empty(),
        }
    }
}

/// A declared path template such as `/users/{id}/orders`.
///
/// Segments are produced by splitting on `/` without dropping empty pieces,
/// so `/users` and `/users/` have different segment counts and never match
/// each other.
///
/// Only a whole segment written as `{name}` is a variable. A segment mixing
/// literal text and a variable, such as `{name}.json`, is compared literally,
/// so `/files/{name}.json` matches only the path `/files/{name}.json` itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathTemplate {
    raw: String,
    segments: Vec<Segment>,
}

impl PathTemplate {
    /// Parse a template string.
    pub fn parse(template: &str) -> Self {
        Self {
            raw: template.to_string(),
            segments: template.split('/').map(Segment::parse).collect(),
        }
    }

    /// The template exactly as declared.
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Number of `/`-separated segments, including the leading empty one.
    pub fn segment_count(&self) -> usize {
        self.segments.len()
    }

    /// Whether a concrete pathname matches this template.
    pub fn matches(&self, pathname: &str) -> bool {
        let actual: Vec<&str> = pathname.split('/').collect();
        self.matches_segments(&actual)
    }

    fn matches_segments(&self, actual: &[&str]) -> bool {
        self.segments.len() == actual.len()
            && self
                .segments
                .iter()
                .zip(actual)
                .all(|(segment, value)| segment.matches(value))
    }
}

/// An ordered set of compiled templates.
///
/// Order is declaration order and decides ties: the first template that
/// matches wins, regardless of how many literal segments the others have.
#[derive(Debug, Clone, Default)]
pub struct TemplateSet {
    templates: Vec<PathTemplate>,
}

impl TemplateSet {
    /// Create an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a template after all previously inserted ones.
    pub fn push(&mut self, template: &str) {
        self.templates.push(PathTemplate::parse(template));
    }

    /// Find the first template matching `pathname`.
    pub fn find(&self, pathname: &str) -> Option<&PathTemplate> {
        let actual: Vec<&str> = pathname.split('/').collect();
        self.templates.iter().find(|t| t.matches_segments(&actual))
    }

    /// Templates in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = &PathTemplate> {
        self.templates.iter()
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}

impl<'a> FromIterator<&'a str> for TemplateSet {
    fn from_iter<I: IntoIterator<Item = &'a str>>(iter: I) -> Self {
        let mut set = TemplateSet::new();
        for template in iter {
            set.push(template);
        }
        set
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn static_template_matches_identical_path() {
        let template = PathTemplate::parse("/health");
        assert!(template.matches("/health"));
        assert!(!template.matches("/healthz"));
    }

    #[test]
    fn param_segment_matches_any_value() {
        let template = PathTemplate::parse("/users/{id}");
        assert!(template.matches("/users/123"));
        assert!(template.matches("/users/me"));
    }

    #[test]
    fn param_segment_rejects_empty_value() {
        let template = PathTemplate::parse("/users/{id}");
        assert!(!template.matches("/users/"));
    }

    #[test]
    fn partial_segment_variable_is_literal() {
        let template = PathTemplate::parse("/files/{name}.json");
        assert!(!template.matches("/files/report.json"));
        assert!(template.matches("/files/{name}.json"));
    }

    #[test]
    fn segment_counts_must_be_equal() {
        let template = PathTemplate::parse("/a/{id}");
        assert_eq!(template.segment_count(), 3);
        assert!(!template.matches("/a/1/2"));
        assert!(!template.matches("/a"));
        assert!(template.matches("/a/1"));
    }

    #[test]
    fn trailing_slash_changes_segment_count() {
        let template = PathTemplate::parse("/users");
        assert!(!template.matches("/users/"));
    }

    #[test]
    fn no_prefix_matching() {
        let template = PathTemplate::parse("/users");
        assert!(!template.matches("/users/123"));
    }

    #[test]
    fn root_template() {
        let template = PathTemplate::parse("/");
        assert!(template.matches("/"));
        assert!(!template.matches(""));
        assert!(!template.matches("/x"));
    }

    #[test]
    fn first_declared_template_wins() {
        let set: TemplateSet = ["/a/{id}", "/a/b"].into_iter().collect();
        assert_eq!(set.find("/a/b").map(PathTemplate::as_str), Some("/a/{id}"));

        let set: TemplateSet = ["/a/b", "/a/{id}"].into_iter().collect();
        assert_eq!(set.find("/a/b").map(PathTemplate::as_str), Some("/a/b"));
    }

    #[test]
    fn set_returns_none_when_nothing_matches() {
        let set: TemplateSet = ["/users", "/users/{id}"].into_iter().collect();
        assert!(set.find("/posts").is_none());
        assert_eq!(set.len(), 2);
        assert!(!set.is_empty());
    }
}
