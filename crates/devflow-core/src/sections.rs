//! Best-effort splitter for generated specification text.
//!
//! Takes one unstructured Markdown-ish blob (a completion response) and
//! partitions it into the six named specification sections. Heading-based
//! matching first; keyword classification of paragraphs when no heading is
//! recognizable; whole-input assignment to functional requirements as a
//! last resort. Total over all inputs — it degrades, it never fails. The
//! output is approximate text, not validated structure, and is stored
//! verbatim.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::OnceLock;

// ---------------------------------------------------------------------------
// Section
// ---------------------------------------------------------------------------

/// The six named subdivisions of a specification, in canonical order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Section {
    FunctionalRequirements,
    NonFunctionalRequirements,
    SystemArchitecture,
    DatabaseSchema,
    ApiEndpoints,
    UserStories,
}

impl Section {
    pub fn all() -> &'static [Section] {
        &[
            Section::FunctionalRequirements,
            Section::NonFunctionalRequirements,
            Section::SystemArchitecture,
            Section::DatabaseSchema,
            Section::ApiEndpoints,
            Section::UserStories,
        ]
    }

    /// The heading text generation prompts ask for.
    pub fn heading(self) -> &'static str {
        match self {
            Section::FunctionalRequirements => "Functional Requirements",
            Section::NonFunctionalRequirements => "Non-Functional Requirements",
            Section::SystemArchitecture => "System Architecture",
            Section::DatabaseSchema => "Database Schema",
            Section::ApiEndpoints => "API Endpoints",
            Section::UserStories => "User Stories",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Section::FunctionalRequirements => "functional_requirements",
            Section::NonFunctionalRequirements => "non_functional_requirements",
            Section::SystemArchitecture => "system_architecture",
            Section::DatabaseSchema => "database_schema",
            Section::ApiEndpoints => "api_endpoints",
            Section::UserStories => "user_stories",
        }
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Section {
    type Err = crate::error::DevflowError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "functional_requirements" => Ok(Section::FunctionalRequirements),
            "non_functional_requirements" => Ok(Section::NonFunctionalRequirements),
            "system_architecture" => Ok(Section::SystemArchitecture),
            "database_schema" => Ok(Section::DatabaseSchema),
            "api_endpoints" => Ok(Section::ApiEndpoints),
            "user_stories" => Ok(Section::UserStories),
            _ => Err(crate::error::DevflowError::InvalidSection(s.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// ParsedSpecification
// ---------------------------------------------------------------------------

/// One string per section, possibly empty. Produced once per generation
/// response, persisted as-is, never re-parsed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedSpecification {
    pub functional_requirements: String,
    pub non_functional_requirements: String,
    pub system_architecture: String,
    pub database_schema: String,
    pub api_endpoints: String,
    pub user_stories: String,
}

impl ParsedSpecification {
    pub fn is_empty(&self) -> bool {
        Section::all().iter().all(|&s| self.get(s).is_empty())
    }

    pub fn get(&self, section: Section) -> &str {
        match section {
            Section::FunctionalRequirements => &self.functional_requirements,
            Section::NonFunctionalRequirements => &self.non_functional_requirements,
            Section::SystemArchitecture => &self.system_architecture,
            Section::DatabaseSchema => &self.database_schema,
            Section::ApiEndpoints => &self.api_endpoints,
            Section::UserStories => &self.user_stories,
        }
    }

    pub fn set(&mut self, section: Section, text: impl Into<String>) {
        *self.field_mut(section) = text.into();
    }

    /// Append a fragment, separating from existing content with a blank line.
    fn append(&mut self, section: Section, text: &str) {
        let field = self.field_mut(section);
        if field.is_empty() {
            field.push_str(text);
        } else {
            field.push_str("\n\n");
            field.push_str(text);
        }
    }

    fn field_mut(&mut self, section: Section) -> &mut String {
        match section {
            Section::FunctionalRequirements => &mut self.functional_requirements,
            Section::NonFunctionalRequirements => &mut self.non_functional_requirements,
            Section::SystemArchitecture => &mut self.system_architecture,
            Section::DatabaseSchema => &mut self.database_schema,
            Section::ApiEndpoints => &mut self.api_endpoints,
            Section::UserStories => &mut self.user_stories,
        }
    }
}

// ---------------------------------------------------------------------------
// Keyword fallback rules
// ---------------------------------------------------------------------------

/// A fallback classification rule: a paragraph containing any of the
/// keywords (case-insensitive) is assigned to `section`. Rules are tried
/// in order, first match wins — the order is a parameter, not an invariant.
#[derive(Debug, Clone)]
pub struct KeywordRule {
    pub section: Section,
    pub keywords: &'static [&'static str],
}

pub fn default_rules() -> Vec<KeywordRule> {
    vec![
        KeywordRule {
            section: Section::NonFunctionalRequirements,
            keywords: &[
                "performance",
                "security",
                "scalability",
                "latency",
                "availability",
                "non-functional",
            ],
        },
        KeywordRule {
            section: Section::DatabaseSchema,
            keywords: &["table", "schema", "column", "foreign key", "database"],
        },
        KeywordRule {
            section: Section::ApiEndpoints,
            keywords: &["endpoint", "api", "route", "get /", "post /", "http"],
        },
        KeywordRule {
            section: Section::UserStories,
            keywords: &["as a ", "user story", "so that"],
        },
        KeywordRule {
            section: Section::SystemArchitecture,
            keywords: &["architecture", "component", "service", "frontend", "backend"],
        },
        KeywordRule {
            section: Section::FunctionalRequirements,
            keywords: &["must", "shall", "feature", "functional"],
        },
    ]
}

// ---------------------------------------------------------------------------
// SectionParser
// ---------------------------------------------------------------------------

/// Heading line: optional `#`–`###` marker, one of the six section names,
/// optional trailing colon, nothing else on the line.
static HEADING_RE: OnceLock<Regex> = OnceLock::new();

fn heading_re() -> &'static Regex {
    HEADING_RE.get_or_init(|| {
        Regex::new(
            r"(?mi)^[ \t]*(?:#{1,3}[ \t]*)?(non[- ]functional requirements|functional requirements|system architecture|database schema|api endpoints|user stories)[ \t]*:?[ \t]*\r?$",
        )
        .unwrap()
    })
}

static PARAGRAPH_RE: OnceLock<Regex> = OnceLock::new();

fn paragraph_re() -> &'static Regex {
    PARAGRAPH_RE.get_or_init(|| Regex::new(r"\r?\n[ \t]*\r?\n").unwrap())
}

fn section_for_heading(name: &str) -> Option<Section> {
    match name.to_lowercase().replace('-', " ").as_str() {
        "functional requirements" => Some(Section::FunctionalRequirements),
        "non functional requirements" => Some(Section::NonFunctionalRequirements),
        "system architecture" => Some(Section::SystemArchitecture),
        "database schema" => Some(Section::DatabaseSchema),
        "api endpoints" => Some(Section::ApiEndpoints),
        "user stories" => Some(Section::UserStories),
        _ => None,
    }
}

pub struct SectionParser {
    rules: Vec<KeywordRule>,
}

impl Default for SectionParser {
    fn default() -> Self {
        Self::new()
    }
}

impl SectionParser {
    pub fn new() -> Self {
        Self {
            rules: default_rules(),
        }
    }

    /// Override the fallback rule order (first match wins).
    pub fn with_rules(rules: Vec<KeywordRule>) -> Self {
        Self { rules }
    }

    /// Partition `text` into the six sections. Total: never errors, at
    /// worst the whole input lands in functional requirements.
    pub fn parse(&self, text: &str) -> ParsedSpecification {
        if text.trim().is_empty() {
            return ParsedSpecification::default();
        }

        if let Some(parsed) = split_by_headings(text) {
            return parsed;
        }

        let parsed = self.classify_paragraphs(text);
        if !parsed.is_empty() {
            return parsed;
        }

        // Last resort: keep the content rather than dropping it.
        ParsedSpecification {
            functional_requirements: text.trim().to_string(),
            ..Default::default()
        }
    }

    /// Blank-line-separated paragraphs, classified by keyword, first
    /// matching rule wins. Paragraphs matching no rule are dropped.
    fn classify_paragraphs(&self, text: &str) -> ParsedSpecification {
        let mut out = ParsedSpecification::default();
        for para in paragraph_re().split(text) {
            let para = para.trim();
            if para.is_empty() {
                continue;
            }
            let lower = para.to_lowercase();
            for rule in &self.rules {
                if rule.keywords.iter().any(|k| lower.contains(k)) {
                    out.append(rule.section, para);
                    break;
                }
            }
        }
        out
    }
}

/// Locate every recognized heading and slice the input between consecutive
/// hits. A section's value is the trimmed slice starting at its heading
/// line; the first occurrence of a duplicated heading wins. Returns `None`
/// when no heading is found.
fn split_by_headings(text: &str) -> Option<ParsedSpecification> {
    let hits: Vec<(Section, usize)> = heading_re()
        .captures_iter(text)
        .filter_map(|caps| {
            let m = caps.get(0)?;
            let name = caps.get(1)?;
            section_for_heading(name.as_str()).map(|s| (s, m.start()))
        })
        .collect();

    if hits.is_empty() {
        return None;
    }

    let mut out = ParsedSpecification::default();
    for (i, &(section, start)) in hits.iter().enumerate() {
        let end = hits.get(i + 1).map(|&(_, s)| s).unwrap_or(text.len());
        if out.get(section).is_empty() {
            out.set(section, text[start..end].trim());
        }
    }
    Some(out)
}

/// Parse with the default rule order.
pub fn parse_sections(text: &str) -> ParsedSpecification {
    SectionParser::new().parse(text)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
