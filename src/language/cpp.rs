use super::{CaptureKind, LanguageDef, SignatureStyle};

const CHUNK_QUERY: &str = r#"
(function_definition
  declarator: (function_declarator
    declarator: (identifier) @function.name
    parameters: (parameter_list) @function.params)
  type: (_)? @function.return) @function.def

(class_specifier
  name: (type_identifier) @class.name) @class.def

(struct_specifier
  name: (type_identifier) @struct.name) @struct.def

(enum_specifier
  name: (type_identifier) @enum.name) @enum.def
"#;

const CALL_QUERY: &str = r#"
(call_expression
  function: (identifier) @call.name) @call.site

(call_expression
  function: (field_expression
    field: (field_identifier) @call.name)) @call.site
"#;

const IMPORT_QUERY: &str = r#"
(preproc_include
  path: (_) @import.module) @import.stmt
"#;

fn capture_kind(name: &str) -> Option<CaptureKind> {
    match name {
        "function.def" => Some(CaptureKind::Function),
        "class.def" => Some(CaptureKind::Class),
        "struct.def" => Some(CaptureKind::Struct),
        "enum.def" => Some(CaptureKind::Enum),
        _ => None,
    }
}

fn language() -> tree_sitter::Language {
    tree_sitter_cpp::LANGUAGE.into()
}

pub static DEFINITION: LanguageDef = LanguageDef {
    name: "cpp",
    extensions: &["cpp", "cc", "cxx", "hpp", "hh"],
    grammar: language,
    chunk_query: CHUNK_QUERY,
    call_query: CALL_QUERY,
    import_query: Some(IMPORT_QUERY),
    capture_kind,
    method_containers: &["class_specifier", "struct_specifier"],
    doc_nodes: &["comment"],
    signature_style: SignatureStyle::CStyle,
    async_node_kind: None,
    decorator_node_kind: None,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn definition_has_cpp_extension() {
        assert!(DEFINITION.extensions.contains(&"cpp"));
    }
}
