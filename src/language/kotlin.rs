use super::{CaptureKind, LanguageDef, SignatureStyle};

const CHUNK_QUERY: &str = r#"
(function_declaration
  name: (simple_identifier) @function.name
  parameters: (function_value_parameters) @function.params) @function.def

(class_declaration
  name: (type_identifier) @class.name) @class.def
"#;

const CALL_QUERY: &str = r#"
(call_expression
  (simple_identifier) @call.name) @call.site
"#;

const IMPORT_QUERY: &str = r#"
(import_header
  (identifier) @import.module) @import.stmt
"#;

fn capture_kind(name: &str) -> Option<CaptureKind> {
    match name {
        "function.def" => Some(CaptureKind::Function),
        "class.def" => Some(CaptureKind::Class),
        _ => None,
    }
}

fn language() -> tree_sitter::Language {
    tree_sitter_kotlin::LANGUAGE.into()
}

pub static DEFINITION: LanguageDef = LanguageDef {
    name: "kotlin",
    extensions: &["kt", "kts"],
    grammar: language,
    chunk_query: CHUNK_QUERY,
    call_query: CALL_QUERY,
    import_query: Some(IMPORT_QUERY),
    capture_kind,
    method_containers: &["class_declaration"],
    doc_nodes: &["comment"],
    signature_style: SignatureStyle::CStyle,
    async_node_kind: None,
    decorator_node_kind: Some("annotation"),
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn definition_has_kt_extension() {
        assert!(DEFINITION.extensions.contains(&"kt"));
    }
}
