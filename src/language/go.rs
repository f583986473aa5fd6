use super::{CaptureKind, LanguageDef, SignatureStyle};

const CHUNK_QUERY: &str = r#"
(function_declaration
  name: (identifier) @function.name
  parameters: (parameter_list) @function.params
  result: (_)? @function.return) @function.def

(method_declaration
  name: (field_identifier) @function.name
  parameters: (parameter_list) @function.params
  result: (_)? @function.return) @method.def

(type_declaration
  (type_spec
    name: (type_identifier) @struct.name
    type: (struct_type))) @struct.def

(type_declaration
  (type_spec
    name: (type_identifier) @interface.name
    type: (interface_type))) @interface.def
"#;

const CALL_QUERY: &str = r#"
(call_expression
  function: (identifier) @call.name) @call.site

(call_expression
  function: (selector_expression
    field: (field_identifier) @call.name)) @call.site
"#;

const IMPORT_QUERY: &str = r#"
(import_spec
  path: (interpreted_string_literal) @import.module) @import.stmt
"#;

fn capture_kind(name: &str) -> Option<CaptureKind> {
    match name {
        "function.def" => Some(CaptureKind::Function),
        "method.def" => Some(CaptureKind::Method),
        "struct.def" => Some(CaptureKind::Struct),
        "interface.def" => Some(CaptureKind::Interface),
        _ => None,
    }
}

fn language() -> tree_sitter::Language {
    tree_sitter_go::LANGUAGE.into()
}

pub static DEFINITION: LanguageDef = LanguageDef {
    name: "go",
    extensions: &["go"],
    grammar: language,
    chunk_query: CHUNK_QUERY,
    call_query: CALL_QUERY,
    import_query: Some(IMPORT_QUERY),
    capture_kind,
    method_containers: &[],
    doc_nodes: &["comment"],
    signature_style: SignatureStyle::GoFunc,
    async_node_kind: None,
    decorator_node_kind: None,
};
