use super::{CaptureKind, LanguageDef, SignatureStyle};

const CHUNK_QUERY: &str = r#"
(function_declaration
  name: (identifier) @function.name
  parameters: (formal_parameters) @function.params) @function.def

(method_definition
  name: (property_identifier) @function.name
  parameters: (formal_parameters) @function.params) @method.def

(class_declaration
  name: (identifier) @class.name) @class.def
"#;

const CALL_QUERY: &str = r#"
(call_expression
  function: (identifier) @call.name) @call.site

(call_expression
  function: (member_expression
    property: (property_identifier) @call.name)) @call.site
"#;

const IMPORT_QUERY: &str = r#"
(import_statement
  source: (string) @import.module) @import.stmt
"#;

fn capture_kind(name: &str) -> Option<CaptureKind> {
    match name {
        "function.def" => Some(CaptureKind::Function),
        "method.def" => Some(CaptureKind::Method),
        "class.def" => Some(CaptureKind::Class),
        _ => None,
    }
}

fn language() -> tree_sitter::Language {
    tree_sitter_javascript::LANGUAGE.into()
}

pub static DEFINITION: LanguageDef = LanguageDef {
    name: "javascript",
    extensions: &["js", "jsx", "mjs", "cjs"],
    grammar: language,
    chunk_query: CHUNK_QUERY,
    call_query: CALL_QUERY,
    import_query: Some(IMPORT_QUERY),
    capture_kind,
    method_containers: &["class_declaration"],
    doc_nodes: &["comment"],
    signature_style: SignatureStyle::TsFunction,
    async_node_kind: Some("async"),
    decorator_node_kind: Some("decorator"),
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn definition_has_js_extension() {
        assert!(DEFINITION.extensions.contains(&"js"));
    }
}
