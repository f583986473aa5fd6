//! Canonical embedding-text rendering (spec §4.5 item 1-6, C7).
//!
//! Closer to the pack's templated-description approach than the teacher's
//! "embed the whole chunk body" strategy: each unit renders to a fixed
//! line-based template so two units of the same kind produce comparable
//! text regardless of source language.

use crate::unit::CodeUnit;

const MAX_DOC_CHARS: usize = 400;
const MAX_CALL_CHARS: usize = 200;
const MAX_FLOW_CHARS: usize = 300;

fn truncate(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        return s.to_string();
    }
    let mut out: String = s.chars().take(max_chars).collect();
    out.push('\u{2026}');
    out
}

fn render_list(names: &[String]) -> String {
    if names.is_empty() {
        return "(none)".to_string();
    }
    truncate(&names.join(", "), MAX_CALL_CHARS)
}

/// Render a unit's canonical embedding text: Kind, Signature, Description,
/// Calls, Called by, and (when present) Control flow / Data flow lines.
pub fn render(unit: &CodeUnit) -> String {
    let mut lines = Vec::with_capacity(6);
    lines.push(format!("Kind: {}", unit.kind.as_str()));
    lines.push(format!("Signature: {}", unit.signature));

    let description = if unit.docstring.is_empty() {
        "(none)".to_string()
    } else {
        truncate(&unit.docstring, MAX_DOC_CHARS)
    };
    lines.push(format!("Description: {description}"));

    lines.push(format!("Calls: {}", render_list(&unit.calls)));
    lines.push(format!("Called by: {}", render_list(&unit.called_by)));

    if let Some(flow) = &unit.control_flow {
        lines.push(format!("Control flow: {}", truncate(flow, MAX_FLOW_CHARS)));
    }
    if let Some(flow) = &unit.data_flow {
        lines.push(format!("Data flow: {}", truncate(flow, MAX_FLOW_CHARS)));
    }

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::unit::UnitKind;
    use std::path::PathBuf;

    fn base_unit() -> CodeUnit {
        CodeUnit {
            qualified_name: "greet".into(),
            kind: UnitKind::Function,
            file: PathBuf::from("a.py"),
            line: 1,
            signature: "def greet(name: str) -> str".into(),
            docstring: String::new(),
            calls: vec![],
            called_by: vec![],
            control_flow: None,
            data_flow: None,
        }
    }

    #[test]
    fn renders_six_fixed_lines_without_optional_flow() {
        let unit = base_unit();
        let text = render(&unit);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 5);
        assert_eq!(lines[0], "Kind: function");
        assert_eq!(lines[2], "Description: (none)");
    }

    #[test]
    fn empty_calls_and_called_by_render_as_none() {
        let unit = base_unit();
        let text = render(&unit);
        assert!(text.contains("Calls: (none)"));
        assert!(text.contains("Called by: (none)"));
    }

    #[test]
    fn long_docstring_is_truncated() {
        let mut unit = base_unit();
        unit.docstring = "x".repeat(1000);
        let text = render(&unit);
        let desc_line = text.lines().nth(2).unwrap();
        assert!(desc_line.chars().count() <= "Description: ".len() + MAX_DOC_CHARS + 1);
        assert!(desc_line.ends_with('\u{2026}'));
    }

    #[test]
    fn call_list_over_200_chars_is_truncated_with_ellipsis() {
        let mut unit = base_unit();
        unit.calls = (0..100).map(|i| format!("some_long_function_name_{i}")).collect();
        let text = render(&unit);
        let calls_line = text.lines().nth(3).unwrap();
        assert!(calls_line.ends_with('\u{2026}'));
        assert!(calls_line.chars().count() <= "Calls: ".len() + MAX_CALL_CHARS + 1);
    }

    #[test]
    fn control_and_data_flow_lines_are_appended_when_present() {
        let mut unit = base_unit();
        unit.control_flow = Some("if/else branch on input size".into());
        unit.data_flow = Some("reads name, writes formatted string".into());
        let text = render(&unit);
        assert_eq!(text.lines().count(), 7);
        assert!(text.contains("Control flow:"));
        assert!(text.contains("Data flow:"));
    }
}
