//! Hot-swappable holder for the loaded API document.
//!
//! Validation calls take an `Arc` snapshot and never see a document change
//! underneath them. Reloading builds a fresh document and swaps the pointer;
//! the previous document is never mutated.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use arc_swap::ArcSwap;
use thiserror::Error;

use specward_spec::{parse_spec_file, ApiSpecification, OpenApiSpec, ParseError};
use specward_telemetry::{log_spec_loaded, log_spec_reload_failed, log_spec_reloaded};

/// Errors from loading a document into the store.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to load {}", .path.display())]
    Load {
        path: PathBuf,
        #[source]
        source: ParseError,
    },
}

/// The current API document, swappable at runtime.
#[derive(Debug)]
pub struct SpecStore {
    current: ArcSwap<ApiSpecification>,
}

impl SpecStore {
    /// Wrap an already-loaded document.
    pub fn new(spec: ApiSpecification) -> Self {
        Self {
            current: ArcSwap::from_pointee(spec),
        }
    }

    /// Load the initial document from a YAML or JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref();
        let spec = read(path)?;
        log_spec_loaded!(
            path = %path.display(),
            version = spec.document().version_string(),
            paths = spec.paths().len(),
            "API document loaded"
        );
        Ok(Self::new(spec))
    }

    /// Snapshot of the current document.
    pub fn current(&self) -> Arc<ApiSpecification> {
        self.current.load_full()
    }

    /// Load `path` and make it the current document.
    ///
    /// On failure the previous document stays current.
    pub fn reload(&self, path: impl AsRef<Path>) -> Result<Arc<ApiSpecification>, StoreError> {
        let path = path.as_ref();
        let spec = match read(path) {
            Ok(spec) => Arc::new(spec),
            Err(e) => {
                let StoreError::Load { source, .. } = &e;
                log_spec_reload_failed!(
                    path = %path.display(),
                    error = %source,
                    "keeping previous API document"
                );
                return Err(e);
            }
        };

        self.current.store(Arc::clone(&spec));
        log_spec_reloaded!(
            path = %path.display(),
            version = spec.document().version_string(),
            paths = spec.paths().len(),
            "API document reloaded"
        );
        Ok(spec)
    }
}

fn read(path: &Path) -> Result<ApiSpecification, StoreError> {
    parse_spec_file(path).map_err(|source| StoreError::Load {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use specward_validator::{validate, ObservedResponse};
    use std::io::Write;
    use tempfile::NamedTempFile;

    const V1: &str = r#"
openapi: "3.0.0"
info: {title: v1, version: "1"}
paths:
  /users:
    get:
      responses:
        "200": {description: ok}
"#;

    const V2: &str = r#"
openapi: "3.0.0"
info: {title: v2, version: "2"}
paths:
  /accounts:
    get:
      responses:
        "200": {description: ok}
"#;

    fn spec_file(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn load_and_current() {
        let file = spec_file(V1);
        let store = SpecStore::load(file.path()).unwrap();
        assert_eq!(store.current().document().title(), Some("v1"));
    }

    #[test]
    fn load_missing_file_fails() {
        let err = SpecStore::load("does-not-exist.yml").err().unwrap();
        assert!(err.to_string().starts_with("failed to load does-not-exist.yml"));
    }

    #[test]
    fn reload_swaps_document() {
        let first = spec_file(V1);
        let second = spec_file(V2);
        let store = SpecStore::load(first.path()).unwrap();

        let before = store.current();
        store.reload(second.path()).unwrap();
        let after = store.current();

        let response = ObservedResponse::new("GET", "/accounts", 200);
        assert!(validate(&before, &response).is_err());
        assert!(validate(&after, &response).is_ok());
        // The old snapshot is untouched.
        assert_eq!(before.document().title(), Some("v1"));
    }

    #[test]
    fn failed_reload_keeps_previous_document() {
        let good = spec_file(V1);
        let bad = spec_file("swagger: '1.2'\npaths: {}\n");
        let store = SpecStore::load(good.path()).unwrap();

        let err = store.reload(bad.path()).unwrap_err();
        assert!(matches!(
            err,
            StoreError::Load {
                source: ParseError::UnsupportedVersion(_),
                ..
            }
        ));
        assert_eq!(store.current().document().title(), Some("v1"));
    }

    #[test]
    fn readers_see_whole_documents_during_reloads() {
        let first = spec_file(V1);
        let second = spec_file(V2);
        let store = Arc::new(SpecStore::load(first.path()).unwrap());

        let reader = {
            let store = Arc::clone(&store);
            std::thread::spawn(move || {
                for _ in 0..200 {
                    let spec = store.current();
                    let users = validate(&spec, &ObservedResponse::new("GET", "/users", 200));
                    let accounts = validate(&spec, &ObservedResponse::new("GET", "/accounts", 200));
                    // Exactly one of the two documents is visible per snapshot.
                    assert!(users.is_ok() != accounts.is_ok());
                }
            })
        };

        for i in 0..50 {
            let path = if i % 2 == 0 { second.path() } else { first.path() };
            store.reload(path).unwrap();
        }
        reader.join().unwrap();
    }
}
