//! Prompt builders for the generation stages. Pure string assembly from
//! stored records; the completion call itself lives in `completion-agent`.

use crate::project::Project;
use crate::sections::Section;
use crate::specification::Specification;
use crate::types::{DesignKind, DocKind, TestKind};
use std::fmt::Write as _;

/// Ask for a specification answered under the six exact headings the
/// section parser recognizes.
pub fn specification_prompt(project: &Project) -> String {
    let mut prompt = format!(
        "You are drafting a software specification for the project \"{}\".\n",
        project.name
    );
    if let Some(desc) = &project.description {
        let _ = writeln!(prompt, "Project description: {desc}");
    }

    prompt.push_str("\nRequirements gathered so far:\n");
    if project.requirements.is_empty() {
        prompt.push_str("(none recorded yet)\n");
    }
    for req in &project.requirements {
        let _ = writeln!(prompt, "- [{}] ({}) {}", req.id, req.priority, req.title);
        if let Some(detail) = &req.detail {
            let _ = writeln!(prompt, "  {detail}");
        }
    }

    prompt.push_str(
        "\nRespond in Markdown with exactly these six sections, in this order, \
         each introduced by a level-2 heading:\n",
    );
    for section in Section::all() {
        let _ = writeln!(prompt, "## {}", section.heading());
    }
    prompt.push_str("\nDo not add any other top-level sections.\n");
    prompt
}

pub fn design_prompt(project: &Project, spec: &Specification, kind: DesignKind) -> String {
    let mut prompt = format!(
        "Produce a {} diagram for the project \"{}\" as Mermaid source.\n",
        kind, project.name
    );
    let _ = writeln!(
        prompt,
        "Open the diagram with `{}` and output only the Mermaid source, \
         inside a single fenced code block.",
        kind.mermaid_header()
    );

    push_section(&mut prompt, "System architecture", &spec.system_architecture);
    if kind == DesignKind::EntityRelation {
        push_section(&mut prompt, "Database schema", &spec.database_schema);
    }
    push_section(
        &mut prompt,
        "Functional requirements",
        &spec.functional_requirements,
    );
    prompt
}

pub fn code_prompt(
    project: &Project,
    spec: &Specification,
    language: &str,
    framework: Option<&str>,
) -> String {
    let mut prompt = format!(
        "Generate {language} code for the project \"{}\".\n",
        project.name
    );
    if let Some(fw) = framework {
        let _ = writeln!(prompt, "Target framework: {fw}.");
    }
    prompt.push_str("Output a single fenced code block and nothing else.\n");

    push_section(
        &mut prompt,
        "Functional requirements",
        &spec.functional_requirements,
    );
    push_section(&mut prompt, "API endpoints", &spec.api_endpoints);
    push_section(&mut prompt, "Database schema", &spec.database_schema);
    prompt
}

pub fn test_prompt(
    project: &Project,
    spec: &Specification,
    kind: TestKind,
    framework: Option<&str>,
) -> String {
    let mut prompt = format!(
        "Write {} tests for the project \"{}\".\n",
        kind, project.name
    );
    if let Some(fw) = framework {
        let _ = writeln!(prompt, "Use the {fw} test framework.");
    }
    prompt.push_str("Output a single fenced code block and nothing else.\n");

    push_section(
        &mut prompt,
        "Functional requirements",
        &spec.functional_requirements,
    );
    push_section(&mut prompt, "User stories", &spec.user_stories);
    prompt
}

pub fn documentation_prompt(project: &Project, spec: &Specification, kind: DocKind) -> String {
    let audience = match kind {
        DocKind::Readme => "a README introducing the project",
        DocKind::Api => "API reference documentation",
        DocKind::Guide => "an end-user guide",
    };
    let mut prompt = format!(
        "Write {audience} for the project \"{}\", in Markdown.\n",
        project.name
    );

    push_section(
        &mut prompt,
        "Functional requirements",
        &spec.functional_requirements,
    );
    if kind == DocKind::Api {
        push_section(&mut prompt, "API endpoints", &spec.api_endpoints);
    }
    push_section(&mut prompt, "User stories", &spec.user_stories);
    prompt
}

/// Append a labeled context block, skipping empty sections.
fn push_section(prompt: &mut String, label: &str, body: &str) {
    if body.trim().is_empty() {
        return;
    }
    let _ = write!(prompt, "\n{label}:\n{}\n", body.trim());
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
