use crate::error::{DevflowError, Result};
use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

// ---------------------------------------------------------------------------
// Directory constants
// ---------------------------------------------------------------------------

pub const DEVFLOW_DIR: &str = ".devflow";
pub const PROJECTS_DIR: &str = ".devflow/projects";

pub const CONFIG_FILE: &str = ".devflow/config.yaml";
pub const STATE_FILE: &str = ".devflow/state.yaml";

pub const MANIFEST_FILE: &str = "manifest.yaml";
pub const SPECIFICATION_FILE: &str = "specification.yaml";

pub const DESIGNS_DIR: &str = "designs";
pub const CODE_DIR: &str = "code";
pub const TESTS_DIR: &str = "tests";
pub const DOCS_DIR: &str = "docs";

// ---------------------------------------------------------------------------
// Path helpers
// ---------------------------------------------------------------------------

pub fn devflow_dir(root: &Path) -> PathBuf {
    root.join(DEVFLOW_DIR)
}

pub fn config_path(root: &Path) -> PathBuf {
    root.join(CONFIG_FILE)
}

pub fn state_path(root: &Path) -> PathBuf {
    root.join(STATE_FILE)
}

pub fn project_dir(root: &Path, slug: &str) -> PathBuf {
    root.join(PROJECTS_DIR).join(slug)
}

pub fn project_manifest(root: &Path, slug: &str) -> PathBuf {
    project_dir(root, slug).join(MANIFEST_FILE)
}

pub fn specification_path(root: &Path, slug: &str) -> PathBuf {
    project_dir(root, slug).join(SPECIFICATION_FILE)
}

pub fn collection_dir(root: &Path, slug: &str, collection: &str) -> PathBuf {
    project_dir(root, slug).join(collection)
}

pub fn record_path(root: &Path, slug: &str, collection: &str, id: &str) -> PathBuf {
    collection_dir(root, slug, collection).join(format!("{id}.yaml"))
}

// ---------------------------------------------------------------------------
// Slug validation
// ---------------------------------------------------------------------------

static SLUG_RE: OnceLock<Regex> = OnceLock::new();

fn slug_re() -> &'static Regex {
    SLUG_RE.get_or_init(|| Regex::new(r"^[a-z0-9][a-z0-9\-]*[a-z0-9]$|^[a-z0-9]$").unwrap())
}

pub fn validate_slug(slug: &str) -> Result<()> {
    if slug.is_empty() || slug.len() > 64 || !slug_re().is_match(slug) {
        return Err(DevflowError::InvalidSlug(slug.to_string()));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
