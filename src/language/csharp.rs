use super::{CaptureKind, LanguageDef, SignatureStyle};

const CHUNK_QUERY: &str = r#"
(method_declaration
  name: (identifier) @function.name
  parameters: (parameter_list) @function.params
  type: (_) @function.return) @method.def

(class_declaration
  name: (identifier) @class.name) @class.def

(interface_declaration
  name: (identifier) @interface.name) @interface.def

(enum_declaration
  name: (identifier) @enum.name) @enum.def

(struct_declaration
  name: (identifier) @struct.name) @struct.def
"#;

const CALL_QUERY: &str = r#"
(invocation_expression
  function: (identifier) @call.name) @call.site

(invocation_expression
  function: (member_access_expression
    name: (identifier) @call.name)) @call.site
"#;

const IMPORT_QUERY: &str = r#"
(using_directive
  (identifier) @import.module) @import.stmt
"#;

fn capture_kind(name: &str) -> Option<CaptureKind> {
    match name {
        "method.def" => Some(CaptureKind::Method),
        "class.def" => Some(CaptureKind::Class),
        "interface.def" => Some(CaptureKind::Interface),
        "enum.def" => Some(CaptureKind::Enum),
        "struct.def" => Some(CaptureKind::Struct),
        _ => None,
    }
}

fn language() -> tree_sitter::Language {
    tree_sitter_c_sharp::LANGUAGE.into()
}

pub static DEFINITION: LanguageDef = LanguageDef {
    name: "csharp",
    extensions: &["cs"],
    grammar: language,
    chunk_query: CHUNK_QUERY,
    call_query: CALL_QUERY,
    import_query: Some(IMPORT_QUERY),
    capture_kind,
    method_containers: &["class_declaration", "interface_declaration", "struct_declaration"],
    doc_nodes: &["comment"],
    signature_style: SignatureStyle::CStyle,
    async_node_kind: None,
    decorator_node_kind: Some("attribute"),
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn definition_has_cs_extension() {
        assert!(DEFINITION.extensions.contains(&"cs"));
    }
}
