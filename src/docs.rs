//! Documentation lookup for operator façades.

use std::fs;
use std::path::PathBuf;

/// Supplies long-form documentation for declared operators.
pub trait DocSource: Send + Sync {
    /// Documentation text for `operator`, if this source knows it.
    fn doc_for(&self, operator: &str) -> Option<String>;
}

/// Source that knows no operators; façades fall back to the template text.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoDocs;

impl DocSource for NoDocs {
    fn doc_for(&self, _operator: &str) -> Option<String> {
        None
    }
}

/// Reads `<root>/<operator>.md`, falling back to `<operator>.rst`.
#[derive(Debug, Clone)]
pub struct DocDir {
    root: PathBuf,
}

impl DocDir {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl DocSource for DocDir {
    fn doc_for(&self, operator: &str) -> Option<String> {
        for extension in ["md", "rst"] {
            let path = self.root.join(format!("{}.{}", operator, extension));
            if let Ok(text) = fs::read_to_string(&path) {
                return Some(text);
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_docs_knows_nothing() {
        assert_eq!(NoDocs.doc_for("minus"), None);
    }

    #[test]
    fn test_doc_dir_reads_markdown_then_rst() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("minus.md"), "subtract two fields").unwrap();
        fs::write(dir.path().join("plus.rst"), "add two fields").unwrap();

        let docs = DocDir::new(dir.path());
        assert_eq!(docs.doc_for("minus").as_deref(), Some("subtract two fields"));
        assert_eq!(docs.doc_for("plus").as_deref(), Some("add two fields"));
        assert_eq!(docs.doc_for("divide"), None);
    }
}
