use super::{CaptureKind, LanguageDef, SignatureStyle};

const CHUNK_QUERY: &str = r#"
(function_definition
  name: (name) @function.name
  parameters: (formal_parameters) @function.params) @function.def

(method_declaration
  name: (name) @function.name
  parameters: (formal_parameters) @function.params) @method.def

(class_declaration
  name: (name) @class.name) @class.def

(interface_declaration
  name: (name) @interface.name) @interface.def

(enum_declaration
  name: (name) @enum.name) @enum.def
"#;

const CALL_QUERY: &str = r#"
(function_call_expression
  function: (name) @call.name) @call.site

(member_call_expression
  name: (name) @call.name) @call.site
"#;

const IMPORT_QUERY: &str = r#"
(namespace_use_declaration
  (namespace_use_clause
    (qualified_name) @import.module)) @import.stmt
"#;

fn capture_kind(name: &str) -> Option<CaptureKind> {
    match name {
        "function.def" => Some(CaptureKind::Function),
        "method.def" => Some(CaptureKind::Method),
        "class.def" => Some(CaptureKind::Class),
        "interface.def" => Some(CaptureKind::Interface),
        "enum.def" => Some(CaptureKind::Enum),
        _ => None,
    }
}

fn language() -> tree_sitter::Language {
    tree_sitter_php::LANGUAGE_PHP.into()
}

pub static DEFINITION: LanguageDef = LanguageDef {
    name: "php",
    extensions: &["php"],
    grammar: language,
    chunk_query: CHUNK_QUERY,
    call_query: CALL_QUERY,
    import_query: Some(IMPORT_QUERY),
    capture_kind,
    method_containers: &["class_declaration", "interface_declaration"],
    doc_nodes: &["comment"],
    signature_style: SignatureStyle::CStyle,
    async_node_kind: None,
    decorator_node_kind: Some("attribute_list"),
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn definition_has_php_extension() {
        assert!(DEFINITION.extensions.contains(&"php"));
    }
}
