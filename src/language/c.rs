use super::{CaptureKind, LanguageDef, SignatureStyle};

const CHUNK_QUERY: &str = r#"
(function_definition
  declarator: (function_declarator
    declarator: (identifier) @function.name
    parameters: (parameter_list) @function.params)
  type: (_)? @function.return) @function.def

(struct_specifier
  name: (type_identifier) @struct.name) @struct.def

(enum_specifier
  name: (type_identifier) @enum.name) @enum.def
"#;

const CALL_QUERY: &str = r#"
(call_expression
  function: (identifier) @call.name) @call.site
"#;

const IMPORT_QUERY: &str = r#"
(preproc_include
  path: (_) @import.module) @import.stmt
"#;

fn capture_kind(name: &str) -> Option<CaptureKind> {
    match name {
        "function.def" => Some(CaptureKind::Function),
        "struct.def" => Some(CaptureKind::Struct),
        "enum.def" => Some(CaptureKind::Enum),
        _ => None,
    }
}

fn language() -> tree_sitter::Language {
    tree_sitter_c::LANGUAGE.into()
}

pub static DEFINITION: LanguageDef = LanguageDef {
    name: "c",
    extensions: &["c", "h"],
    grammar: language,
    chunk_query: CHUNK_QUERY,
    call_query: CALL_QUERY,
    import_query: Some(IMPORT_QUERY),
    capture_kind,
    method_containers: &[],
    doc_nodes: &["comment"],
    signature_style: SignatureStyle::CStyle,
    async_node_kind: None,
    decorator_node_kind: None,
};
