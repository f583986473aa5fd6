//! Code-unit assembler (spec §4.5, C6).
//!
//! Flattens every [`Module`]'s functions/methods/classes/interfaces plus the
//! resolved [`CrossFileCallGraph`] into the retrievable [`CodeUnit`] records.
//! `calls`/`called_by` use the symmetric interpretation settled in the
//! design notes: callers are indexed by callee key, so `called_by` is built
//! by walking each edge's destination and appending the edge's source.

use crate::callgraph::{CrossFileCallGraph, Edge};
use crate::model::Module;
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnitKind {
    Function,
    Method,
    Class,
    Interface,
}

impl UnitKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            UnitKind::Function => "function",
            UnitKind::Method => "method",
            UnitKind::Class => "class",
            UnitKind::Interface => "interface",
        }
    }
}

#[derive(Debug, Clone)]
pub struct CodeUnit {
    /// Fully-qualified name, e.g. `ClassName.method` for a method.
    pub qualified_name: String,
    pub kind: UnitKind,
    pub file: std::path::PathBuf,
    pub line: u32,
    pub signature: String,
    pub docstring: String,
    /// Callee keys in `"<file>:<qualified_name>"` form.
    pub calls: Vec<String>,
    pub called_by: Vec<String>,
    pub control_flow: Option<String>,
    pub data_flow: Option<String>,
}

impl CodeUnit {
    /// The `"<relative_file>:<qualified_name>"` key used across the cache,
    /// vector index, and call graph.
    pub fn key(&self) -> String {
        format!("{}:{}", self.file.display(), self.qualified_name)
    }
}

fn edge_key_dst(edge: &Edge) -> String {
    format!("{}:{}", edge.dst_file.display(), edge.dst_func)
}

fn edge_key_src(edge: &Edge) -> String {
    format!("{}:{}", edge.src_file.display(), edge.src_func)
}

/// Assemble all code units for a set of modules, given their resolved call graph.
pub fn assemble(modules: &[Module], graph: &CrossFileCallGraph) -> Vec<CodeUnit> {
    let mut calls: HashMap<String, Vec<String>> = HashMap::new();
    let mut called_by: HashMap<String, Vec<String>> = HashMap::new();

    for edge in &graph.all_edges {
        calls
            .entry(edge_key_src(edge))
            .or_default()
            .push(edge_key_dst(edge));
        called_by
            .entry(edge_key_dst(edge))
            .or_default()
            .push(edge_key_src(edge));
    }

    let mut units = Vec::new();

    for module in modules {
        for function in &module.functions {
            let key = format!("{}:{}", module.path.display(), function.name);
            units.push(CodeUnit {
                qualified_name: function.name.clone(),
                kind: if function.is_method {
                    UnitKind::Method
                } else {
                    UnitKind::Function
                },
                file: module.path.clone(),
                line: function.line,
                signature: function.render_signature(signature_style_for(module)),
                docstring: function.docstring.clone(),
                calls: calls.get(&key).cloned().unwrap_or_default(),
                called_by: called_by.get(&key).cloned().unwrap_or_default(),
                control_flow: None,
                data_flow: None,
            });
        }

        for class in &module.classes {
            let key = format!("{}:{}", module.path.display(), class.name);
            units.push(CodeUnit {
                qualified_name: class.name.clone(),
                kind: UnitKind::Class,
                file: module.path.clone(),
                line: class.line,
                signature: format!("class {}({})", class.name, class.bases),
                docstring: class.docstring.clone(),
                calls: calls.get(&key).cloned().unwrap_or_default(),
                called_by: called_by.get(&key).cloned().unwrap_or_default(),
                control_flow: None,
                data_flow: None,
            });

            for method in &class.methods {
                let qualified = format!("{}.{}", class.name, method.name);
                let method_key = format!("{}:{}", module.path.display(), qualified);
                units.push(CodeUnit {
                    qualified_name: qualified,
                    kind: UnitKind::Method,
                    file: module.path.clone(),
                    line: method.line,
                    signature: method.render_signature(signature_style_for(module)),
                    docstring: method.docstring.clone(),
                    calls: calls.get(&method_key).cloned().unwrap_or_default(),
                    called_by: called_by.get(&method_key).cloned().unwrap_or_default(),
                    control_flow: None,
                    data_flow: None,
                });
            }
        }

        for decl in module.all_type_decls() {
            let key = format!("{}:{}", module.path.display(), decl.name);
            units.push(CodeUnit {
                qualified_name: decl.name.clone(),
                kind: UnitKind::Interface,
                file: module.path.clone(),
                line: decl.line,
                signature: format!("{} {}", decl.kind, decl.name),
                docstring: decl.docstring.clone(),
                calls: calls.get(&key).cloned().unwrap_or_default(),
                called_by: called_by.get(&key).cloned().unwrap_or_default(),
                control_flow: None,
                data_flow: None,
            });
        }
    }

    units
}

fn signature_style_for(module: &Module) -> crate::language::SignatureStyle {
    let ext = module
        .path
        .extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .unwrap_or_default();
    crate::language::REGISTRY
        .from_extension(&ext)
        .map(|d| d.signature_style)
        .unwrap_or(crate::language::SignatureStyle::CStyle)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::callgraph::UnresolvedCall;
    use crate::model::Function;
    use std::path::PathBuf;

    fn function(name: &str, line: u32) -> Function {
        Function {
            name: name.to_string(),
            params: String::new(),
            return_type: String::new(),
            docstring: String::new(),
            line,
            is_method: false,
            is_async: false,
            decorators: vec![],
        }
    }

    #[test]
    fn called_by_is_built_from_edge_destinations() {
        let mut a = Module::new(PathBuf::from("a.py"));
        a.functions.push(function("main", 1));
        let mut b = Module::new(PathBuf::from("b.py"));
        b.functions.push(function("helper", 1));

        let graph = CrossFileCallGraph {
            all_edges: vec![Edge {
                src_file: PathBuf::from("a.py"),
                src_func: "main".into(),
                dst_file: PathBuf::from("b.py"),
                dst_func: "helper".into(),
            }],
            intra_file_edges: vec![],
            cross_file_edges: vec![],
            unresolved: vec![] as Vec<UnresolvedCall>,
        };

        let units = assemble(&[a, b], &graph);
        let helper = units.iter().find(|u| u.qualified_name == "helper").unwrap();
        assert_eq!(helper.called_by, vec!["a.py:main".to_string()]);
        let main = units.iter().find(|u| u.qualified_name == "main").unwrap();
        assert_eq!(main.calls, vec!["b.py:helper".to_string()]);
    }

    #[test]
    fn unit_key_combines_file_and_qualified_name() {
        let unit = CodeUnit {
            qualified_name: "Foo.bar".into(),
            kind: UnitKind::Method,
            file: PathBuf::from("x.py"),
            line: 1,
            signature: String::new(),
            docstring: String::new(),
            calls: vec![],
            called_by: vec![],
            control_flow: None,
            data_flow: None,
        };
        assert_eq!(unit.key(), "x.py:Foo.bar");
    }
}
