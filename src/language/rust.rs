use super::{CaptureKind, LanguageDef, SignatureStyle};

const CHUNK_QUERY: &str = r#"
(function_item
  name: (identifier) @function.name
  parameters: (parameters) @function.params
  return_type: (_)? @function.return
  body: (block) @function.body) @function.def

(struct_item
  name: (type_identifier) @struct.name) @struct.def

(enum_item
  name: (type_identifier) @enum.name) @enum.def

(trait_item
  name: (type_identifier) @trait.name) @trait.def

(impl_item
  type: (type_identifier) @class.name) @class.def
"#;

const CALL_QUERY: &str = r#"
(call_expression
  function: (identifier) @call.name) @call.site

(call_expression
  function: (field_expression
    field: (field_identifier) @call.name)) @call.site

(macro_invocation
  macro: (identifier) @call.name) @call.site
"#;

const IMPORT_QUERY: &str = r#"
(use_declaration
  argument: (_) @import.path) @import.stmt
"#;

fn capture_kind(name: &str) -> Option<CaptureKind> {
    match name {
        "function.def" => Some(CaptureKind::Function),
        "struct.def" => Some(CaptureKind::Struct),
        "enum.def" => Some(CaptureKind::Enum),
        "trait.def" => Some(CaptureKind::Trait),
        "class.def" => Some(CaptureKind::Class),
        _ => None,
    }
}

pub static DEFINITION: LanguageDef = LanguageDef {
    name: "rust",
    extensions: &["rs"],
    grammar: LANGUAGE_fn,
    chunk_query: CHUNK_QUERY,
    call_query: CALL_QUERY,
    import_query: Some(IMPORT_QUERY),
    capture_kind,
    method_containers: &["impl_item", "trait_item"],
    doc_nodes: &["line_comment", "block_comment"],
    signature_style: SignatureStyle::CStyle,
    async_node_kind: Some("async"),
    decorator_node_kind: Some("attribute_item"),
};

// tree-sitter-rust exposes `LANGUAGE` as a `once_cell`-style static, not a fn;
// this thin wrapper lets the registry treat every grammar uniformly as `fn() -> Language`.
#[allow(non_snake_case)]
fn LANGUAGE_fn() -> tree_sitter::Language {
    tree_sitter_rust::LANGUAGE.into()
}
