use super::{CaptureKind, LanguageDef, SignatureStyle};

const CHUNK_QUERY: &str = r#"
(function_declaration
  name: (simple_identifier) @function.name
  parameters: (parameter) @function.params) @function.def

(class_declaration
  name: (type_identifier) @class.name) @class.def

(protocol_declaration
  name: (type_identifier) @protocol.name) @protocol.def

(class_declaration
  (enum_class_body)
  name: (type_identifier) @enum.name) @enum.def
"#;

const CALL_QUERY: &str = r#"
(call_expression
  (simple_identifier) @call.name) @call.site
"#;

const IMPORT_QUERY: &str = r#"
(import_declaration
  (identifier) @import.module) @import.stmt
"#;

fn capture_kind(name: &str) -> Option<CaptureKind> {
    match name {
        "function.def" => Some(CaptureKind::Function),
        "class.def" => Some(CaptureKind::Class),
        "protocol.def" => Some(CaptureKind::Protocol),
        "enum.def" => Some(CaptureKind::Enum),
        _ => None,
    }
}

fn language() -> tree_sitter::Language {
    tree_sitter_swift::LANGUAGE.into()
}

pub static DEFINITION: LanguageDef = LanguageDef {
    name: "swift",
    extensions: &["swift"],
    grammar: language,
    chunk_query: CHUNK_QUERY,
    call_query: CALL_QUERY,
    import_query: Some(IMPORT_QUERY),
    capture_kind,
    method_containers: &["class_declaration"],
    doc_nodes: &["comment", "multiline_comment"],
    signature_style: SignatureStyle::CStyle,
    async_node_kind: Some("async_keyword"),
    decorator_node_kind: Some("attribute"),
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn definition_has_swift_extension() {
        assert!(DEFINITION.extensions.contains(&"swift"));
    }
}
