use crate::error::{DevflowError, Result};
use crate::paths;
use crate::sections::{ParsedSpecification, Section};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;

// ---------------------------------------------------------------------------
// SpecSource
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpecSource {
    Manual,
    Generated,
}

// ---------------------------------------------------------------------------
// Specification
// ---------------------------------------------------------------------------

/// The specification record for one project: the six section strings plus
/// provenance. Section contents are best-effort text, stored verbatim —
/// nothing downstream treats them as validated structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Specification {
    #[serde(default = "default_version")]
    pub version: u32,
    pub functional_requirements: String,
    pub non_functional_requirements: String,
    pub system_architecture: String,
    pub database_schema: String,
    pub api_endpoints: String,
    pub user_stories: String,
    pub source: SpecSource,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    /// Length of the raw completion response this was parsed from.
    #[serde(default)]
    pub response_chars: usize,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

fn default_version() -> u32 {
    1
}

impl Specification {
    pub fn new_manual() -> Self {
        let now = Utc::now();
        Self {
            version: 1,
            functional_requirements: String::new(),
            non_functional_requirements: String::new(),
            system_architecture: String::new(),
            database_schema: String::new(),
            api_endpoints: String::new(),
            user_stories: String::new(),
            source: SpecSource::Manual,
            model: None,
            response_chars: 0,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn from_parsed(
        parsed: &ParsedSpecification,
        model: Option<String>,
        response_chars: usize,
    ) -> Self {
        let mut spec = Self::new_manual();
        spec.source = SpecSource::Generated;
        spec.model = model;
        spec.response_chars = response_chars;
        spec.apply(parsed);
        spec
    }

    /// Overwrite all six sections from a parse result.
    pub fn apply(&mut self, parsed: &ParsedSpecification) {
        for &section in Section::all() {
            self.set_section(section, parsed.get(section));
        }
    }

    pub fn section(&self, section: Section) -> &str {
        match section {
            Section::FunctionalRequirements => &self.functional_requirements,
            Section::NonFunctionalRequirements => &self.non_functional_requirements,
            Section::SystemArchitecture => &self.system_architecture,
            Section::DatabaseSchema => &self.database_schema,
            Section::ApiEndpoints => &self.api_endpoints,
            Section::UserStories => &self.user_stories,
        }
    }

    pub fn set_section(&mut self, section: Section, text: impl Into<String>) {
        let text = text.into();
        match section {
            Section::FunctionalRequirements => self.functional_requirements = text,
            Section::NonFunctionalRequirements => self.non_functional_requirements = text,
            Section::SystemArchitecture => self.system_architecture = text,
            Section::DatabaseSchema => self.database_schema = text,
            Section::ApiEndpoints => self.api_endpoints = text,
            Section::UserStories => self.user_stories = text,
        }
        self.updated_at = Utc::now();
    }

    // -----------------------------------------------------------------------
    // Persistence
    // -----------------------------------------------------------------------

    pub fn exists(root: &Path, slug: &str) -> bool {
        paths::specification_path(root, slug).exists()
    }

    pub fn load(root: &Path, slug: &str) -> Result<Self> {
        let path = paths::specification_path(root, slug);
        if !path.exists() {
            return Err(DevflowError::SpecificationNotFound(slug.to_string()));
        }
        let data = std::fs::read_to_string(&path)?;
        let spec: Specification = serde_yaml::from_str(&data)?;
        Ok(spec)
    }

    pub fn save(&self, root: &Path, slug: &str) -> Result<()> {
        let path = paths::specification_path(root, slug);
        let data = serde_yaml::to_string(self)?;
        crate::io::atomic_write(&path, data.as_bytes())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn from_parsed_copies_all_sections() {
        let mut parsed = ParsedSpecification::default();
        parsed.set(Section::FunctionalRequirements, "log in");
        parsed.set(Section::UserStories, "as a user");

        let spec = Specification::from_parsed(&parsed, Some("gpt-4o-mini".into()), 42);
        assert_eq!(spec.functional_requirements, "log in");
        assert_eq!(spec.user_stories, "as a user");
        assert_eq!(spec.database_schema, "");
        assert_eq!(spec.source, SpecSource::Generated);
        assert_eq!(spec.response_chars, 42);
    }

    #[test]
    fn set_section_touches_updated_at() {
        let mut spec = Specification::new_manual();
        let before = spec.updated_at;
        spec.set_section(Section::DatabaseSchema, "users table");
        assert_eq!(spec.database_schema, "users table");
        assert!(spec.updated_at >= before);
    }

    #[test]
    fn load_missing_is_specification_not_found() {
        let dir = TempDir::new().unwrap();
        assert!(matches!(
            Specification::load(dir.path(), "shop"),
            Err(DevflowError::SpecificationNotFound(_))
        ));
    }

    #[test]
    fn save_then_load_roundtrip() {
        let dir = TempDir::new().unwrap();
        let mut spec = Specification::new_manual();
        spec.set_section(Section::ApiEndpoints, "POST /login");
        spec.save(dir.path(), "shop").unwrap();

        assert!(Specification::exists(dir.path(), "shop"));
        let loaded = Specification::load(dir.path(), "shop").unwrap();
        assert_eq!(loaded.api_endpoints, "POST /login");
        assert_eq!(loaded.source, SpecSource::Manual);
    }

    #[test]
    fn section_accessor_matches_fields() {
        let mut spec = Specification::new_manual();
        spec.set_section(Section::SystemArchitecture, "two services");
        assert_eq!(spec.section(Section::SystemArchitecture), "two services");
        assert_eq!(spec.section(Section::UserStories), "");
    }
}
