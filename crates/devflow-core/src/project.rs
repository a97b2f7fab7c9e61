use crate::config::Config;
use crate::error::{DevflowError, Result};
use crate::paths;
use crate::requirement::Requirement;
use crate::types::{Priority, RequirementStatus, Stage, StageStatus};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;

// ---------------------------------------------------------------------------
// StageProgress
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StageProgress {
    pub stage: Stage,
    pub status: StageStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl StageProgress {
    fn new(stage: Stage) -> Self {
        Self {
            stage,
            status: StageStatus::Pending,
            updated_at: None,
        }
    }
}

// ---------------------------------------------------------------------------
// Project
// ---------------------------------------------------------------------------

/// One guided workflow, persisted as `projects/<slug>/manifest.yaml`.
/// Requirements are embedded here; the other stage records live as
/// separate files in the project directory and allocate their sequential
/// ids from the counters below.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    #[serde(default = "default_version")]
    pub version: u32,
    pub slug: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub stage: Stage,
    #[serde(default)]
    pub requirements: Vec<Requirement>,
    #[serde(default)]
    pub next_requirement_seq: u32,
    #[serde(default)]
    pub next_design_seq: u32,
    #[serde(default)]
    pub next_code_seq: u32,
    #[serde(default)]
    pub next_test_seq: u32,
    #[serde(default)]
    pub next_doc_seq: u32,
    pub progress: Vec<StageProgress>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub archived: bool,
}

fn default_version() -> u32 {
    1
}

impl Project {
    pub fn new(slug: impl Into<String>, name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            version: 1,
            slug: slug.into(),
            name: name.into(),
            description: None,
            stage: Stage::Requirements,
            requirements: Vec::new(),
            next_requirement_seq: 0,
            next_design_seq: 0,
            next_code_seq: 0,
            next_test_seq: 0,
            next_doc_seq: 0,
            progress: Stage::all().iter().map(|&s| StageProgress::new(s)).collect(),
            created_at: now,
            updated_at: now,
            archived: false,
        }
    }

    // -----------------------------------------------------------------------
    // Persistence
    // -----------------------------------------------------------------------

    pub fn create(root: &Path, slug: impl Into<String>, name: impl Into<String>) -> Result<Self> {
        let slug = slug.into();
        paths::validate_slug(&slug)?;

        let dir = paths::project_dir(root, &slug);
        if dir.exists() {
            return Err(DevflowError::ProjectExists(slug));
        }

        let project = Self::new(slug, name);
        project.save(root)?;
        Ok(project)
    }

    pub fn load(root: &Path, slug: &str) -> Result<Self> {
        let manifest = paths::project_manifest(root, slug);
        if !manifest.exists() {
            return Err(DevflowError::ProjectNotFound(slug.to_string()));
        }
        let data = std::fs::read_to_string(&manifest)?;
        let project: Project = serde_yaml::from_str(&data)?;
        Ok(project)
    }

    pub fn save(&self, root: &Path) -> Result<()> {
        let manifest = paths::project_manifest(root, &self.slug);
        let data = serde_yaml::to_string(self)?;
        crate::io::atomic_write(&manifest, data.as_bytes())
    }

    pub fn list(root: &Path) -> Result<Vec<Self>> {
        let projects_dir = root.join(paths::PROJECTS_DIR);
        if !projects_dir.exists() {
            return Ok(Vec::new());
        }

        let mut projects = Vec::new();
        for entry in std::fs::read_dir(&projects_dir)? {
            let entry = entry?;
            if entry.file_type()?.is_dir() {
                let slug = entry.file_name().to_string_lossy().into_owned();
                match Self::load(root, &slug) {
                    Ok(p) => projects.push(p),
                    Err(DevflowError::ProjectNotFound(_)) => {}
                    Err(e) => return Err(e),
                }
            }
        }
        projects.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(projects)
    }

    // -----------------------------------------------------------------------
    // Stage transitions
    // -----------------------------------------------------------------------

    pub fn can_advance_to(&self, target: Stage, cfg: &Config) -> Result<()> {
        if !cfg.stages.is_enabled(target) {
            return Err(DevflowError::InvalidStageTransition {
                from: self.stage.to_string(),
                to: target.to_string(),
                reason: format!("stage '{target}' is not enabled"),
            });
        }
        if target <= self.stage {
            return Err(DevflowError::InvalidStageTransition {
                from: self.stage.to_string(),
                to: target.to_string(),
                reason: "transitions are forward-only".to_string(),
            });
        }
        Ok(())
    }

    pub fn advance(&mut self, target: Stage, cfg: &Config) -> Result<()> {
        self.can_advance_to(target, cfg)?;
        let departed = self.stage;
        self.stage = target;
        // Leaving a stage completes it.
        self.mark_stage(departed, StageStatus::Complete);
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Stage progress
    // -----------------------------------------------------------------------

    pub fn progress_for(&self, stage: Stage) -> Option<&StageProgress> {
        self.progress.iter().find(|p| p.stage == stage)
    }

    pub fn mark_stage(&mut self, stage: Stage, status: StageStatus) {
        let now = Utc::now();
        if let Some(p) = self.progress.iter_mut().find(|p| p.stage == stage) {
            p.status = status;
            p.updated_at = Some(now);
        }
        self.updated_at = now;
    }

    // -----------------------------------------------------------------------
    // Requirements
    // -----------------------------------------------------------------------

    pub fn add_requirement(&mut self, title: impl Into<String>, priority: Priority) -> String {
        self.next_requirement_seq += 1;
        let id = format!("R{}", self.next_requirement_seq);
        self.requirements
            .push(Requirement::new(id.clone(), title, priority));
        self.updated_at = Utc::now();
        id
    }

    pub fn complete_requirement(&mut self, id: &str) -> Result<()> {
        let req = self.requirement_mut(id)?;
        req.status = RequirementStatus::Done;
        req.completed_at = Some(Utc::now());
        self.updated_at = Utc::now();
        Ok(())
    }

    pub fn remove_requirement(&mut self, id: &str) -> Result<()> {
        self.requirement_mut(id)?;
        self.requirements.retain(|r| r.id != id);
        self.updated_at = Utc::now();
        Ok(())
    }

    fn requirement_mut(&mut self, id: &str) -> Result<&mut Requirement> {
        self.requirements
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or_else(|| DevflowError::RequirementNotFound(id.to_string()))
    }

    // -----------------------------------------------------------------------
    // Id allocation for stage record collections
    // -----------------------------------------------------------------------

    pub fn next_design_id(&mut self) -> String {
        self.next_design_seq += 1;
        format!("D{}", self.next_design_seq)
    }

    pub fn next_code_id(&mut self) -> String {
        self.next_code_seq += 1;
        format!("C{}", self.next_code_seq)
    }

    pub fn next_test_id(&mut self) -> String {
        self.next_test_seq += 1;
        format!("T{}", self.next_test_seq)
    }

    pub fn next_doc_id(&mut self) -> String {
        self.next_doc_seq += 1;
        format!("DOC{}", self.next_doc_seq)
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
    fn project_create_load() {
        let dir = TempDir::new().unwrap();
        let project = Project::create(dir.path(), "shop-api", "Shop API").unwrap();
        assert_eq!(project.slug, "shop-api");
        assert_eq!(project.stage, Stage::Requirements);

        let loaded = Project::load(dir.path(), "shop-api").unwrap();
        assert_eq!(loaded.name, "Shop API");
        assert_eq!(loaded.progress.len(), Stage::all().len());
    }

    #[test]
    fn project_create_duplicate_fails() {
        let dir = TempDir::new().unwrap();
        Project::create(dir.path(), "shop", "Shop").unwrap();
        assert!(matches!(
            Project::create(dir.path(), "shop", "Shop Again"),
            Err(DevflowError::ProjectExists(_))
        ));
    }

    #[test]
    fn project_create_rejects_bad_slug() {
        let dir = TempDir::new().unwrap();
        assert!(Project::create(dir.path(), "Bad Slug", "X").is_err());
    }

    #[test]
    fn list_sorted_by_creation() {
        let dir = TempDir::new().unwrap();
        Project::create(dir.path(), "first", "First").unwrap();
        Project::create(dir.path(), "second", "Second").unwrap();
        let all = Project::list(dir.path()).unwrap();
        assert_eq!(all.len(), 2);
        assert!(all[0].created_at <= all[1].created_at);
    }

    #[test]
    fn list_empty_without_projects_dir() {
        let dir = TempDir::new().unwrap();
        assert!(Project::list(dir.path()).unwrap().is_empty());
    }

    #[test]
    fn advance_is_forward_only() {
        let cfg = Config::new("test");
        let mut project = Project::new("shop", "Shop");
        project.advance(Stage::Specification, &cfg).unwrap();
        assert_eq!(project.stage, Stage::Specification);

        assert!(matches!(
            project.advance(Stage::Requirements, &cfg),
            Err(DevflowError::InvalidStageTransition { .. })
        ));
        assert!(project.advance(Stage::Specification, &cfg).is_err());
    }

    #[test]
    fn advance_respects_enabled_stages() {
        let mut cfg = Config::new("test");
        cfg.stages.enabled = vec![Stage::Requirements, Stage::Specification];
        let mut project = Project::new("shop", "Shop");
        assert!(project.advance(Stage::Design, &cfg).is_err());
        assert!(project.advance(Stage::Specification, &cfg).is_ok());
    }

    #[test]
    fn skipping_ahead_is_allowed_when_enabled() {
        let cfg = Config::new("test");
        let mut project = Project::new("shop", "Shop");
        project.advance(Stage::Code, &cfg).unwrap();
        assert_eq!(project.stage, Stage::Code);
    }

    #[test]
    fn requirement_lifecycle() {
        let mut project = Project::new("shop", "Shop");
        let id = project.add_requirement("Users can log in", Priority::Must);
        assert_eq!(id, "R1");
        assert_eq!(project.requirements.len(), 1);

        project.complete_requirement(&id).unwrap();
        assert!(project.requirements[0].is_done());

        project.remove_requirement(&id).unwrap();
        assert!(project.requirements.is_empty());
    }

    #[test]
    fn requirement_ids_do_not_recycle_after_removal() {
        let mut project = Project::new("shop", "Shop");
        let r1 = project.add_requirement("First", Priority::Must);
        project.remove_requirement(&r1).unwrap();
        let r2 = project.add_requirement("Second", Priority::Should);
        assert_eq!(r2, "R2");
    }

    #[test]
    fn requirement_not_found() {
        let mut project = Project::new("shop", "Shop");
        assert!(matches!(
            project.complete_requirement("R99"),
            Err(DevflowError::RequirementNotFound(_))
        ));
    }

    #[test]
    fn advance_completes_departed_stage() {
        let cfg = Config::new("test");
        let mut project = Project::new("shop", "Shop");
        project.advance(Stage::Specification, &cfg).unwrap();
        assert_eq!(
            project.progress_for(Stage::Requirements).unwrap().status,
            StageStatus::Complete
        );
        assert_eq!(
            project.progress_for(Stage::Specification).unwrap().status,
            StageStatus::Pending
        );
    }

    #[test]
    fn mark_stage_updates_progress() {
        let mut project = Project::new("shop", "Shop");
        project.mark_stage(Stage::Specification, StageStatus::Complete);
        let p = project.progress_for(Stage::Specification).unwrap();
        assert_eq!(p.status, StageStatus::Complete);
        assert!(p.updated_at.is_some());
        assert_eq!(
            project.progress_for(Stage::Design).unwrap().status,
            StageStatus::Pending
        );
    }

    #[test]
    fn record_id_sequences_are_independent() {
        let mut project = Project::new("shop", "Shop");
        assert_eq!(project.next_design_id(), "D1");
        assert_eq!(project.next_design_id(), "D2");
        assert_eq!(project.next_code_id(), "C1");
        assert_eq!(project.next_test_id(), "T1");
        assert_eq!(project.next_doc_id(), "DOC1");
    }

    #[test]
    fn manifest_roundtrip_preserves_requirements() {
        let dir = TempDir::new().unwrap();
        let mut project = Project::create(dir.path(), "shop", "Shop").unwrap();
        project.add_requirement("Log in", Priority::Must);
        project.save(dir.path()).unwrap();

        let loaded = Project::load(dir.path(), "shop").unwrap();
        assert_eq!(loaded.requirements.len(), 1);
        assert_eq!(loaded.requirements[0].id, "R1");
        assert_eq!(loaded.next_requirement_seq, 1);
    }
}
