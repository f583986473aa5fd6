//! Structural extractor (spec §4.3, C4).
//!
//! Generalizes the teacher's `Parser`/`Chunk` pipeline (`src/parser/mod.rs`,
//! `src/parser/chunk.rs`, `src/parser/calls.rs`) into the richer [`Module`]
//! model: instead of one flat chunk enum, functions/classes/interfaces/
//! traits/protocols/enums/structs/imports are populated into their own
//! sequences, and each definition gets an async/decorator pass the teacher's
//! `Chunk` never needed.

use crate::language::{CaptureKind, LanguageDef, REGISTRY};
use crate::model::{Class, Function, Import, Module, RawEdge, TypeDecl, TypeDeclKind};
use std::path::Path;
use thiserror::Error;
use tree_sitter::{Node, Parser, Query, QueryCursor, StreamingIterator};

#[derive(Error, Debug)]
pub enum ExtractError {
    #[error("unsupported language for {0}")]
    UnsupportedLanguage(std::path::PathBuf),
    #[error("failed to read {0}: {1}")]
    Read(std::path::PathBuf, std::io::Error),
    #[error("tree-sitter failed to set language for {0}: {1}")]
    Grammar(std::path::PathBuf, tree_sitter::LanguageError),
    #[error("parsing produced no tree for {0}")]
    NoTree(std::path::PathBuf),
    #[error("invalid query in language definition: {0}")]
    InvalidQuery(tree_sitter::QueryError),
}

/// Parse one file into a [`Module`]. Returns `Ok(None)` when the file's
/// extension has no registered language (reported but not extracted, per
/// the walker's classification contract).
pub fn extract_file(root: &Path, path: &Path) -> Result<Option<Module>, ExtractError> {
    let ext = path
        .extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .unwrap_or_default();
    let Some(def) = REGISTRY.from_extension(&ext) else {
        return Ok(None);
    };

    let source = std::fs::read_to_string(path).map_err(|e| ExtractError::Read(path.to_path_buf(), e))?;
    let relative = path.strip_prefix(root).unwrap_or(path).to_path_buf();

    match extract_source(def, &source) {
        Ok(module) => Ok(Some(Module {
            path: relative,
            ..module
        })),
        Err(e) => {
            tracing::debug!(file = %path.display(), error = %e, "extraction failed, skipping file");
            Ok(None)
        }
    }
}

fn extract_source(def: &'static LanguageDef, source: &str) -> Result<Module, ExtractError> {
    let mut parser = Parser::new();
    parser
        .set_language(&(def.grammar)())
        .map_err(|e| ExtractError::Grammar(Path::new(def.name).to_path_buf(), e))?;
    let tree = parser
        .parse(source, None)
        .ok_or_else(|| ExtractError::NoTree(Path::new(def.name).to_path_buf()))?;

    let mut module = Module::new(Path::new(def.name).to_path_buf());

    let chunk_query =
        Query::new(&(def.grammar)(), def.chunk_query).map_err(ExtractError::InvalidQuery)?;
    let mut cursor = QueryCursor::new();
    let mut matches = cursor.matches(&chunk_query, tree.root_node(), source.as_bytes());
    while let Some(m) = matches.next() {
        for capture in m.captures {
            let capture_name = chunk_query.capture_names()[capture.index as usize];
            let Some(kind) = (def.capture_kind)(capture_name) else {
                continue;
            };
            populate_definition(def, &mut module, capture.node, kind, source);
        }
    }

    let call_query =
        Query::new(&(def.grammar)(), def.call_query).map_err(ExtractError::InvalidQuery)?;
    let mut cursor = QueryCursor::new();
    let mut matches = cursor.matches(&call_query, tree.root_node(), source.as_bytes());
    let mut seen = std::collections::HashSet::new();
    while let Some(m) = matches.next() {
        for capture in m.captures {
            let capture_name = call_query.capture_names()[capture.index as usize];
            if capture_name != "call.name" {
                continue;
            }
            let callee = text_of(capture.node, source).to_string();
            if should_skip_callee(&callee) {
                continue;
            }
            let caller = enclosing_definition_name(def, capture.node, source)
                .unwrap_or_else(|| "<module>".to_string());
            let line = capture.node.start_position().row as u32 + 1;
            let key = (caller.clone(), callee.clone(), line);
            if seen.insert(key) {
                module.raw_edges.push(RawEdge {
                    caller,
                    callee_text: callee,
                    line,
                });
            }
        }
    }

    if let Some(import_query_src) = def.import_query {
        let import_query =
            Query::new(&(def.grammar)(), import_query_src).map_err(ExtractError::InvalidQuery)?;
        let mut cursor = QueryCursor::new();
        let mut matches = cursor.matches(&import_query, tree.root_node(), source.as_bytes());
        while let Some(m) = matches.next() {
            for capture in m.captures {
                let capture_name = import_query.capture_names()[capture.index as usize];
                if capture_name != "import.module" {
                    continue;
                }
                let text = text_of(capture.node, source).trim_matches(|c| c == '"' || c == '\'');
                module.imports.push(Import {
                    module: text.to_string(),
                    is_from: false,
                    names: Vec::new(),
                    line: capture.node.start_position().row as u32 + 1,
                });
            }
        }
    }

    Ok(module)
}

fn text_of<'a>(node: Node, source: &'a str) -> &'a str {
    node.utf8_text(source.as_bytes()).unwrap_or_default()
}

fn should_skip_callee(name: &str) -> bool {
    const NOISE: &[&str] = &[
        "if", "for", "while", "switch", "match", "catch", "println", "print",
    ];
    name.is_empty() || NOISE.contains(&name)
}

/// Walk up from `node` to find the nearest enclosing function/method name.
fn enclosing_definition_name(def: &LanguageDef, node: Node, source: &str) -> Option<String> {
    let mut cur = node.parent();
    while let Some(n) = cur {
        if is_function_like(n.kind()) {
            if let Some(name_node) = find_name_child(n) {
                return Some(text_of(name_node, source).to_string());
            }
        }
        let _ = def; // container kinds reserved for future qualification
        cur = n.parent();
    }
    None
}

fn is_function_like(kind: &str) -> bool {
    matches!(
        kind,
        "function_item"
            | "function_definition"
            | "function_declaration"
            | "method_definition"
            | "method_declaration"
            | "method"
    )
}

fn find_name_child(node: Node) -> Option<Node> {
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        if child.kind().ends_with("identifier") || child.kind() == "name" {
            return Some(child);
        }
    }
    None
}

fn populate_definition(
    def: &LanguageDef,
    module: &mut Module,
    def_node: Node,
    kind: CaptureKind,
    source: &str,
) {
    let Some(name_node) = find_name_child(def_node) else {
        return;
    };
    let name = text_of(name_node, source).to_string();
    let line = def_node.start_position().row as u32 + 1;
    let docstring = extract_doc_comment(def, def_node, source);

    match kind {
        CaptureKind::Function | CaptureKind::Method => {
            let params = find_child_by_suffix(def_node, "parameters")
                .or_else(|| find_child_by_suffix(def_node, "parameter_list"))
                .map(|n| normalize_ws(text_of(n, source)))
                .unwrap_or_default();
            let return_type = find_return_type(def_node, source);
            let is_async = def
                .async_node_kind
                .map(|k| has_sibling_kind(def_node, k))
                .unwrap_or(false);
            let decorators = def
                .decorator_node_kind
                .map(|k| collect_leading_decorators(def_node, k, source))
                .unwrap_or_default();
            let function = Function {
                name,
                params,
                return_type,
                docstring,
                line,
                is_method: kind == CaptureKind::Method,
                is_async,
                decorators,
            };

            let enclosing_class = enclosing_container_name(def, def_node, source);
            match enclosing_class.and_then(|cls_name| {
                module.classes.iter_mut().find(|c| c.name == cls_name)
            }) {
                Some(class) => class.methods.push(function),
                None => module.functions.push(function),
            }
        }
        CaptureKind::Class => {
            module.classes.push(Class {
                name,
                bases: find_child_by_suffix(def_node, "bases")
                    .or_else(|| find_child_by_suffix(def_node, "argument_list"))
                    .map(|n| normalize_ws(text_of(n, source)))
                    .unwrap_or_default(),
                docstring,
                line,
                methods: Vec::new(),
            });
        }
        CaptureKind::Interface | CaptureKind::Trait | CaptureKind::Protocol | CaptureKind::Enum | CaptureKind::Struct => {
            let type_kind = match kind {
                CaptureKind::Interface => TypeDeclKind::Interface,
                CaptureKind::Trait => TypeDeclKind::Trait,
                CaptureKind::Protocol => TypeDeclKind::Protocol,
                CaptureKind::Enum => TypeDeclKind::Enum,
                CaptureKind::Struct => TypeDeclKind::Struct,
                _ => unreachable!(),
            };
            let decl = TypeDecl {
                kind: type_kind,
                name,
                line,
                docstring,
                members: Vec::new(),
            };
            match type_kind {
                TypeDeclKind::Interface => module.interfaces.push(decl),
                TypeDeclKind::Trait => module.traits.push(decl),
                TypeDeclKind::Protocol => module.protocols.push(decl),
                TypeDeclKind::Enum => module.enums.push(decl),
                TypeDeclKind::Struct => module.structs.push(decl),
            }
        }
    }
}

fn find_child_by_suffix<'a>(node: Node<'a>, suffix: &str) -> Option<Node<'a>> {
    let mut cursor = node.walk();
    node.children(&mut cursor)
        .find(|c| c.kind().ends_with(suffix))
}

fn find_return_type(def_node: Node, source: &str) -> String {
    find_child_by_suffix(def_node, "return")
        .or_else(|| find_child_by_suffix(def_node, "type_annotation"))
        .map(|n| normalize_ws(text_of(n, source)))
        .unwrap_or_default()
}

fn has_sibling_kind(node: Node, kind: &str) -> bool {
    let mut cur = node.prev_sibling();
    while let Some(n) = cur {
        if n.kind() == kind {
            return true;
        }
        cur = n.prev_sibling();
    }
    let mut cursor = node.walk();
    node.children(&mut cursor).any(|c| c.kind() == kind)
}

fn collect_leading_decorators(node: Node, decorator_kind: &str, source: &str) -> Vec<String> {
    let mut decorators = Vec::new();
    let mut cur = node.prev_sibling();
    while let Some(n) = cur {
        if n.kind() == decorator_kind {
            decorators.push(normalize_ws(text_of(n, source)));
            cur = n.prev_sibling();
        } else {
            break;
        }
    }
    decorators.reverse();
    decorators
}

/// Leading documentation comment / docstring, per the teacher's backward
/// sibling walk plus the Python first-statement special case.
fn extract_doc_comment(def: &LanguageDef, def_node: Node, source: &str) -> String {
    if def.name == "python" {
        if let Some(body) = find_child_by_suffix(def_node, "block") {
            let mut cursor = body.walk();
            if let Some(first) = body.children(&mut cursor).next() {
                if first.kind() == "expression_statement" {
                    let text = text_of(first, source).trim();
                    let unquoted = text.trim_matches('"').trim_matches('\'');
                    if unquoted != text {
                        return unquoted.trim().to_string();
                    }
                }
            }
        }
        return String::new();
    }

    let mut cur = def_node.prev_sibling();
    let mut lines = Vec::new();
    while let Some(n) = cur {
        if def.doc_nodes.contains(&n.kind()) {
            lines.push(text_of(n, source).trim_start_matches('/').trim().to_string());
            cur = n.prev_sibling();
        } else {
            break;
        }
    }
    lines.reverse();
    lines.join("\n")
}

fn normalize_ws(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Walk up from a method's definition node to the nearest container listed
/// in `method_containers` and return its name, if any.
fn enclosing_container_name(def: &LanguageDef, def_node: Node, source: &str) -> Option<String> {
    let mut cur = def_node.parent();
    while let Some(n) = cur {
        if def.method_containers.contains(&n.kind()) {
            return find_name_child(n).map(|name_node| text_of(name_node, source).to_string());
        }
        cur = n.parent();
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn skip_callee_filters_control_flow_noise() {
        assert!(should_skip_callee("if"));
        assert!(should_skip_callee(""));
        assert!(!should_skip_callee("compute"));
    }

    #[test]
    fn normalize_ws_collapses_internal_whitespace() {
        assert_eq!(normalize_ws("a:   str,\n  b: int"), "a: str, b: int");
    }

    #[cfg(feature = "lang-python")]
    #[test]
    fn extract_source_python_function_and_docstring() {
        let def = REGISTRY.by_name("python").expect("python registered");
        let src = "def greet(name):\n    \"\"\"Say hello.\"\"\"\n    return 1\n";
        let module = extract_source(def, src).unwrap();
        assert_eq!(module.functions.len(), 1);
        assert_eq!(module.functions[0].name, "greet");
        assert_eq!(module.functions[0].docstring, "Say hello.");
    }

    #[cfg(feature = "lang-rust")]
    #[test]
    fn extract_source_rust_function_and_call() {
        let def = REGISTRY.by_name("rust").expect("rust registered");
        let src = "fn helper() {}\nfn main() { helper(); }\n";
        let module = extract_source(def, src).unwrap();
        assert_eq!(module.functions.len(), 2);
        assert!(module
            .raw_edges
            .iter()
            .any(|e| e.caller == "main" && e.callee_text == "helper"));
    }
}
