use super::{CaptureKind, LanguageDef, SignatureStyle};

const CHUNK_QUERY: &str = r#"
(method_declaration
  name: (identifier) @function.name
  parameters: (formal_parameters) @function.params
  type: (_) @function.return) @method.def

(class_declaration
  name: (identifier) @class.name) @class.def

(interface_declaration
  name: (identifier) @interface.name) @interface.def

(enum_declaration
  name: (identifier) @enum.name) @enum.def
"#;

const CALL_QUERY: &str = r#"
(method_invocation
  name: (identifier) @call.name) @call.site
"#;

const IMPORT_QUERY: &str = r#"
(import_declaration
  (scoped_identifier) @import.module) @import.stmt
"#;

fn capture_kind(name: &str) -> Option<CaptureKind> {
    match name {
        "method.def" => Some(CaptureKind::Method),
        "class.def" => Some(CaptureKind::Class),
        "interface.def" => Some(CaptureKind::Interface),
        "enum.def" => Some(CaptureKind::Enum),
        _ => None,
    }
}

fn language() -> tree_sitter::Language {
    tree_sitter_java::LANGUAGE.into()
}

pub static DEFINITION: LanguageDef = LanguageDef {
    name: "java",
    extensions: &["java"],
    grammar: language,
    chunk_query: CHUNK_QUERY,
    call_query: CALL_QUERY,
    import_query: Some(IMPORT_QUERY),
    capture_kind,
    method_containers: &["class_declaration", "interface_declaration"],
    doc_nodes: &["block_comment", "line_comment"],
    signature_style: SignatureStyle::CStyle,
    async_node_kind: None,
    decorator_node_kind: Some("annotation"),
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn definition_has_java_extension() {
        assert!(DEFINITION.extensions.contains(&"java"));
    }
}
