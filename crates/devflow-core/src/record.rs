//! Stage record collections: designs, code, tests, docs. One YAML file per
//! record under the project directory; sequential ids allocated from the
//! project manifest so deletions never recycle an id.

use crate::error::{DevflowError, Result};
use crate::paths;
use crate::project::Project;
use crate::textutil::{sanitize_mermaid, strip_code_fence};
use crate::types::{DesignKind, DocKind, TestKind};
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::path::Path;

// ---------------------------------------------------------------------------
// Shared persistence helpers
// ---------------------------------------------------------------------------

fn save_record<T: Serialize>(
    root: &Path,
    slug: &str,
    collection: &str,
    id: &str,
    value: &T,
) -> Result<()> {
    let path = paths::record_path(root, slug, collection, id);
    let data = serde_yaml::to_string(value)?;
    crate::io::atomic_write(&path, data.as_bytes())
}

fn load_record<T: DeserializeOwned>(
    root: &Path,
    slug: &str,
    collection: &str,
    kind: &'static str,
    id: &str,
) -> Result<T> {
    let path = paths::record_path(root, slug, collection, id);
    if !path.exists() {
        return Err(DevflowError::RecordNotFound {
            kind,
            id: id.to_string(),
        });
    }
    let data = std::fs::read_to_string(&path)?;
    Ok(serde_yaml::from_str(&data)?)
}

fn list_records<T: DeserializeOwned>(root: &Path, slug: &str, collection: &str) -> Result<Vec<T>> {
    let dir = paths::collection_dir(root, slug, collection);
    if !dir.exists() {
        return Ok(Vec::new());
    }
    let mut out = Vec::new();
    for entry in std::fs::read_dir(&dir)? {
        let entry = entry?;
        let path = entry.path();
        if path.extension().and_then(|e| e.to_str()) == Some("yaml") {
            let data = std::fs::read_to_string(&path)?;
            out.push(serde_yaml::from_str(&data)?);
        }
    }
    Ok(out)
}

fn delete_record(
    root: &Path,
    slug: &str,
    collection: &str,
    kind: &'static str,
    id: &str,
) -> Result<()> {
    let path = paths::record_path(root, slug, collection, id);
    if !path.exists() {
        return Err(DevflowError::RecordNotFound {
            kind,
            id: id.to_string(),
        });
    }
    std::fs::remove_file(&path)?;
    Ok(())
}

/// Numeric suffix of an id like "D12", for stable list ordering.
fn seq_of(id: &str) -> u32 {
    let digits: String = id.chars().filter(|c| c.is_ascii_digit()).collect();
    digits.parse().unwrap_or(0)
}

// ---------------------------------------------------------------------------
// Design
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Design {
    pub id: String,
    pub title: String,
    pub kind: DesignKind,
    /// Mermaid source, sanitized on ingest.
    pub diagram: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Design {
    pub fn create(
        root: &Path,
        project: &mut Project,
        title: impl Into<String>,
        kind: DesignKind,
        diagram: &str,
        notes: Option<String>,
    ) -> Result<Self> {
        let design = Self {
            id: project.next_design_id(),
            title: title.into(),
            kind,
            diagram: sanitize_mermaid(diagram),
            notes,
            created_at: Utc::now(),
        };
        save_record(root, &project.slug, paths::DESIGNS_DIR, &design.id, &design)?;
        project.save(root)?;
        Ok(design)
    }

    pub fn load(root: &Path, slug: &str, id: &str) -> Result<Self> {
        load_record(root, slug, paths::DESIGNS_DIR, "design", id)
    }

    pub fn list(root: &Path, slug: &str) -> Result<Vec<Self>> {
        let mut all: Vec<Self> = list_records(root, slug, paths::DESIGNS_DIR)?;
        all.sort_by_key(|d| seq_of(&d.id));
        Ok(all)
    }

    pub fn delete(root: &Path, slug: &str, id: &str) -> Result<()> {
        delete_record(root, slug, paths::DESIGNS_DIR, "design", id)
    }
}

// ---------------------------------------------------------------------------
// CodeArtifact
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CodeArtifact {
    pub id: String,
    pub language: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub framework: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Code text, fence-stripped on ingest.
    pub content: String,
    pub created_at: DateTime<Utc>,
}

impl CodeArtifact {
    pub fn create(
        root: &Path,
        project: &mut Project,
        language: impl Into<String>,
        framework: Option<String>,
        description: Option<String>,
        content: &str,
    ) -> Result<Self> {
        let artifact = Self {
            id: project.next_code_id(),
            language: language.into(),
            framework,
            description,
            content: strip_code_fence(content),
            created_at: Utc::now(),
        };
        save_record(root, &project.slug, paths::CODE_DIR, &artifact.id, &artifact)?;
        project.save(root)?;
        Ok(artifact)
    }

    pub fn load(root: &Path, slug: &str, id: &str) -> Result<Self> {
        load_record(root, slug, paths::CODE_DIR, "code", id)
    }

    pub fn list(root: &Path, slug: &str) -> Result<Vec<Self>> {
        let mut all: Vec<Self> = list_records(root, slug, paths::CODE_DIR)?;
        all.sort_by_key(|c| seq_of(&c.id));
        Ok(all)
    }

    pub fn delete(root: &Path, slug: &str, id: &str) -> Result<()> {
        delete_record(root, slug, paths::CODE_DIR, "code", id)
    }
}

// ---------------------------------------------------------------------------
// TestArtifact
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestArtifact {
    pub id: String,
    pub name: String,
    pub kind: TestKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub framework: Option<String>,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

impl TestArtifact {
    pub fn create(
        root: &Path,
        project: &mut Project,
        name: impl Into<String>,
        kind: TestKind,
        framework: Option<String>,
        content: &str,
    ) -> Result<Self> {
        let artifact = Self {
            id: project.next_test_id(),
            name: name.into(),
            kind,
            framework,
            content: strip_code_fence(content),
            created_at: Utc::now(),
        };
        save_record(root, &project.slug, paths::TESTS_DIR, &artifact.id, &artifact)?;
        project.save(root)?;
        Ok(artifact)
    }

    pub fn load(root: &Path, slug: &str, id: &str) -> Result<Self> {
        load_record(root, slug, paths::TESTS_DIR, "test", id)
    }

    pub fn list(root: &Path, slug: &str) -> Result<Vec<Self>> {
        let mut all: Vec<Self> = list_records(root, slug, paths::TESTS_DIR)?;
        all.sort_by_key(|t| seq_of(&t.id));
        Ok(all)
    }

    pub fn delete(root: &Path, slug: &str, id: &str) -> Result<()> {
        delete_record(root, slug, paths::TESTS_DIR, "test", id)
    }
}

// ---------------------------------------------------------------------------
// DocArtifact
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocArtifact {
    pub id: String,
    pub kind: DocKind,
    pub title: String,
    /// Markdown body, stored as returned.
    pub content: String,
    pub created_at: DateTime<Utc>,
}

impl DocArtifact {
    pub fn create(
        root: &Path,
        project: &mut Project,
        kind: DocKind,
        title: impl Into<String>,
        content: &str,
    ) -> Result<Self> {
        let artifact = Self {
            id: project.next_doc_id(),
            kind,
            title: title.into(),
            content: content.trim().to_string(),
            created_at: Utc::now(),
        };
        save_record(root, &project.slug, paths::DOCS_DIR, &artifact.id, &artifact)?;
        project.save(root)?;
        Ok(artifact)
    }

    pub fn load(root: &Path, slug: &str, id: &str) -> Result<Self> {
        load_record(root, slug, paths::DOCS_DIR, "doc", id)
    }

    pub fn list(root: &Path, slug: &str) -> Result<Vec<Self>> {
        let mut all: Vec<Self> = list_records(root, slug, paths::DOCS_DIR)?;
        all.sort_by_key(|d| seq_of(&d.id));
        Ok(all)
    }

    pub fn delete(root: &Path, slug: &str, id: &str) -> Result<()> {
        delete_record(root, slug, paths::DOCS_DIR, "doc", id)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn project(dir: &TempDir) -> Project {
        Project::create(dir.path(), "shop", "Shop").unwrap()
    }

    #[test]
    fn design_create_sanitizes_and_persists() {
        let dir = TempDir::new().unwrap();
        let mut p = project(&dir);
        let design = Design::create(
            dir.path(),
            &mut p,
            "Service layout",
            DesignKind::Architecture,
            "```mermaid\ngraph TD\n  A --> B\n```",
            None,
        )
        .unwrap();
        assert_eq!(design.id, "D1");
        assert_eq!(design.diagram, "graph TD\n  A --> B");

        let loaded = Design::load(dir.path(), "shop", "D1").unwrap();
        assert_eq!(loaded.title, "Service layout");

        // The allocated seq survived into the manifest.
        let p = Project::load(dir.path(), "shop").unwrap();
        assert_eq!(p.next_design_seq, 1);
    }

    #[test]
    fn design_list_is_ordered_by_seq() {
        let dir = TempDir::new().unwrap();
        let mut p = project(&dir);
        for title in ["one", "two", "three"] {
            Design::create(
                dir.path(),
                &mut p,
                title,
                DesignKind::Flowchart,
                "graph TD\nA",
                None,
            )
            .unwrap();
        }
        let all = Design::list(dir.path(), "shop").unwrap();
        let ids: Vec<&str> = all.iter().map(|d| d.id.as_str()).collect();
        assert_eq!(ids, ["D1", "D2", "D3"]);
    }

    #[test]
    fn design_delete_then_load_fails() {
        let dir = TempDir::new().unwrap();
        let mut p = project(&dir);
        Design::create(
            dir.path(),
            &mut p,
            "gone",
            DesignKind::Sequence,
            "sequenceDiagram\nA->>B: x",
            None,
        )
        .unwrap();
        Design::delete(dir.path(), "shop", "D1").unwrap();
        assert!(matches!(
            Design::load(dir.path(), "shop", "D1"),
            Err(DevflowError::RecordNotFound { .. })
        ));
        assert!(Design::delete(dir.path(), "shop", "D1").is_err());
    }

    #[test]
    fn code_create_strips_fence() {
        let dir = TempDir::new().unwrap();
        let mut p = project(&dir);
        let artifact = CodeArtifact::create(
            dir.path(),
            &mut p,
            "rust",
            Some("axum".into()),
            None,
            "```rust\nfn main() {}\n```",
        )
        .unwrap();
        assert_eq!(artifact.id, "C1");
        assert_eq!(artifact.content, "fn main() {}");
    }

    #[test]
    fn test_artifact_roundtrip() {
        let dir = TempDir::new().unwrap();
        let mut p = project(&dir);
        TestArtifact::create(
            dir.path(),
            &mut p,
            "login happy path",
            TestKind::Integration,
            Some("pytest".into()),
            "def test_login(): ...",
        )
        .unwrap();
        let all = TestArtifact::list(dir.path(), "shop").unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].kind, TestKind::Integration);
        assert_eq!(all[0].content, "def test_login(): ...");
    }

    #[test]
    fn doc_ids_use_their_own_prefix() {
        let dir = TempDir::new().unwrap();
        let mut p = project(&dir);
        let doc = DocArtifact::create(dir.path(), &mut p, DocKind::Readme, "README", "# Shop")
            .unwrap();
        assert_eq!(doc.id, "DOC1");
        let loaded = DocArtifact::load(dir.path(), "shop", "DOC1").unwrap();
        assert_eq!(loaded.content, "# Shop");
    }

    #[test]
    fn empty_collections_list_empty() {
        let dir = TempDir::new().unwrap();
        project(&dir);
        assert!(Design::list(dir.path(), "shop").unwrap().is_empty());
        assert!(CodeArtifact::list(dir.path(), "shop").unwrap().is_empty());
        assert!(TestArtifact::list(dir.path(), "shop").unwrap().is_empty());
        assert!(DocArtifact::list(dir.path(), "shop").unwrap().is_empty());
    }
}
