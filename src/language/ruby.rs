use super::{CaptureKind, LanguageDef, SignatureStyle};

const CHUNK_QUERY: &str = r#"
(method
  name: (identifier) @function.name
  parameters: (method_parameters)? @function.params) @function.def

(class
  name: (constant) @class.name) @class.def

(module
  name: (constant) @interface.name) @interface.def
"#;

const CALL_QUERY: &str = r#"
(call
  method: (identifier) @call.name) @call.site

(method_call
  (identifier) @call.name) @call.site
"#;

const IMPORT_QUERY: &str = r#"
(call
  method: (identifier) @import.kind
  arguments: (argument_list (string) @import.module)
  (#match? @import.kind "^(require|require_relative)$")) @import.stmt
"#;

fn capture_kind(name: &str) -> Option<CaptureKind> {
    match name {
        "function.def" => Some(CaptureKind::Function),
        "class.def" => Some(CaptureKind::Class),
        "interface.def" => Some(CaptureKind::Interface),
        _ => None,
    }
}

fn language() -> tree_sitter::Language {
    tree_sitter_ruby::LANGUAGE.into()
}

pub static DEFINITION: LanguageDef = LanguageDef {
    name: "ruby",
    extensions: &["rb"],
    grammar: language,
    chunk_query: CHUNK_QUERY,
    call_query: CALL_QUERY,
    import_query: Some(IMPORT_QUERY),
    capture_kind,
    method_containers: &["class", "module"],
    doc_nodes: &["comment"],
    signature_style: SignatureStyle::CStyle,
    async_node_kind: None,
    decorator_node_kind: None,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn definition_has_rb_extension() {
        assert!(DEFINITION.extensions.contains(&"rb"));
    }
}
