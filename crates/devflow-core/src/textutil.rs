//! Pure cleanup helpers for generated text. Like the section parser these
//! are total: bad input degrades the result, it never raises.

/// Return the body of the first fenced code block in `text`, or the trimmed
/// input when no fence is present. An unterminated fence yields everything
/// after the opening line.
pub fn strip_code_fence(text: &str) -> String {
    let Some(open) = text.find("```") else {
        return text.trim().to_string();
    };
    // Skip the opening fence line (which may carry a language tag).
    let after_open = &text[open + 3..];
    let body_start = match after_open.find('\n') {
        Some(i) => i + 1,
        None => return String::new(),
    };
    let body = &after_open[body_start..];
    match body.find("```") {
        Some(close) => body[..close].trim().to_string(),
        None => body.trim().to_string(),
    }
}

const MERMAID_HEADERS: &[&str] = &[
    "graph",
    "flowchart",
    "erdiagram",
    "sequencediagram",
    "classdiagram",
    "statediagram",
];

/// Reduce a completion response to plain Mermaid source: strip fences,
/// drop prose before the first recognized diagram header, and fall back to
/// a `graph TD` prefix when no header is present at all.
pub fn sanitize_mermaid(text: &str) -> String {
    let body = strip_code_fence(text);
    if body.is_empty() {
        return String::new();
    }

    let mut offset = 0;
    for line in body.split_inclusive('\n') {
        let lower = line.trim().to_lowercase();
        if MERMAID_HEADERS.iter().any(|h| lower.starts_with(h)) {
            return body[offset..].trim().to_string();
        }
        offset += line.len();
    }

    format!("graph TD\n{body}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strip_fence_with_language_tag() {
        let text = "Here is the code:\n```rust\nfn main() {}\n```\nHope that helps!";
        assert_eq!(strip_code_fence(text), "fn main() {}");
    }

    #[test]
    fn strip_fence_without_fence_returns_trimmed_input() {
        assert_eq!(strip_code_fence("  plain text  "), "plain text");
    }

    #[test]
    fn strip_fence_unterminated() {
        let text = "```python\nprint('hi')";
        assert_eq!(strip_code_fence(text), "print('hi')");
    }

    #[test]
    fn strip_fence_takes_first_block_only() {
        let text = "```\nfirst\n```\nand\n```\nsecond\n```";
        assert_eq!(strip_code_fence(text), "first");
    }

    #[test]
    fn sanitize_mermaid_strips_prose_before_header() {
        let text = "Sure! Here is your diagram:\n\ngraph TD\n  A --> B";
        assert_eq!(sanitize_mermaid(text), "graph TD\n  A --> B");
    }

    #[test]
    fn sanitize_mermaid_unwraps_fence() {
        let text = "```mermaid\nerDiagram\n  USER ||--o{ ORDER : places\n```";
        assert_eq!(
            sanitize_mermaid(text),
            "erDiagram\n  USER ||--o{ ORDER : places"
        );
    }

    #[test]
    fn sanitize_mermaid_defaults_header_when_missing() {
        let text = "A --> B";
        assert_eq!(sanitize_mermaid(text), "graph TD\nA --> B");
    }

    #[test]
    fn sanitize_mermaid_empty_input() {
        assert_eq!(sanitize_mermaid(""), "");
        assert_eq!(sanitize_mermaid("   "), "");
    }

    #[test]
    fn sanitize_mermaid_keeps_sequence_diagrams() {
        let text = "sequenceDiagram\n  A->>B: hello";
        assert_eq!(sanitize_mermaid(text), "sequenceDiagram\n  A->>B: hello");
    }
}
