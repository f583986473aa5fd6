use super::{CaptureKind, LanguageDef, SignatureStyle};

const CHUNK_QUERY: &str = r#"
(function_definition
  name: (identifier) @function.name
  parameters: (parameters) @function.params
  return_type: (_)? @function.return
  body: (block) @function.body) @function.def

(class_definition
  name: (identifier) @class.name
  superclasses: (argument_list)? @class.bases) @class.def
"#;

const CALL_QUERY: &str = r#"
(call
  function: (identifier) @call.name) @call.site

(call
  function: (attribute
    attribute: (identifier) @call.name)) @call.site
"#;

const IMPORT_QUERY: &str = r#"
(import_statement
  name: (dotted_name) @import.module) @import.stmt

(import_from_statement
  module_name: (_) @import.module) @import.stmt
"#;

fn capture_kind(name: &str) -> Option<CaptureKind> {
    match name {
        "function.def" => Some(CaptureKind::Function),
        "class.def" => Some(CaptureKind::Class),
        _ => None,
    }
}

fn language() -> tree_sitter::Language {
    tree_sitter_python::LANGUAGE.into()
}

pub static DEFINITION: LanguageDef = LanguageDef {
    name: "python",
    extensions: &["py", "pyi"],
    grammar: language,
    chunk_query: CHUNK_QUERY,
    call_query: CALL_QUERY,
    import_query: Some(IMPORT_QUERY),
    capture_kind,
    method_containers: &["class_definition"],
    doc_nodes: &["expression_statement"],
    signature_style: SignatureStyle::PythonDef,
    async_node_kind: Some("async"),
    decorator_node_kind: Some("decorator"),
};
