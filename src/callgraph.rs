//! Cross-file call-graph resolver (spec §4.4, C5).
//!
//! Restructured as a pure in-memory pass over [`Module`]s rather than the
//! teacher's SQL-backed edge bookkeeping (`src/store/calls.rs`), but keeping
//! the same idea: build a name index (qualified and bare forms), resolve
//! exact matches first, fall back to a single unambiguous bare-name
//! candidate, and otherwise record the call as unresolved with a reason.

use crate::model::Module;
use std::collections::HashMap;
use std::path::PathBuf;

/// A resolved caller -> callee edge. `dst_file` empty means unresolved
/// external, which per the data model invariant never coexists with `Some`
/// resolution — such calls live in `unresolved` instead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edge {
    pub src_file: PathBuf,
    pub src_func: String,
    pub dst_file: PathBuf,
    pub dst_func: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnresolvedCall {
    pub caller_file: PathBuf,
    pub caller_func: String,
    pub call_name: String,
    pub reason: String,
}

#[derive(Debug, Default)]
pub struct CrossFileCallGraph {
    pub all_edges: Vec<Edge>,
    pub intra_file_edges: Vec<Edge>,
    pub cross_file_edges: Vec<Edge>,
    pub unresolved: Vec<UnresolvedCall>,
}

/// Bare and qualified (`ClassName.method`) name indexes, each mapping a
/// spelling to every file that defines something with that spelling.
struct NameIndex {
    by_bare_name: HashMap<String, Vec<PathBuf>>,
    by_qualified_name: HashMap<String, Vec<PathBuf>>,
}

fn build_name_index(modules: &[Module]) -> NameIndex {
    let mut by_bare_name: HashMap<String, Vec<PathBuf>> = HashMap::new();
    let mut by_qualified_name: HashMap<String, Vec<PathBuf>> = HashMap::new();

    for module in modules {
        for (bare, qualified) in definition_names(module) {
            by_bare_name.entry(bare).or_default().push(module.path.clone());
            by_qualified_name.entry(qualified).or_default().push(module.path.clone());
        }
    }
    NameIndex {
        by_bare_name,
        by_qualified_name,
    }
}

/// `(bare_name, qualified_name)` for every definition in `module`. They're
/// equal for functions/classes; for methods the qualified form is
/// `ClassName.method`.
fn definition_names(module: &Module) -> Vec<(String, String)> {
    let mut names: Vec<(String, String)> = module
        .functions
        .iter()
        .map(|f| (f.name.clone(), f.name.clone()))
        .collect();
    for class in &module.classes {
        names.push((class.name.clone(), class.name.clone()));
        names.extend(
            class
                .methods
                .iter()
                .map(|m| (m.name.clone(), format!("{}.{}", class.name, m.name))),
        );
    }
    names
}

/// `bare_name -> qualified_name` lookup local to one module.
fn local_lookup(module: &Module) -> HashMap<String, String> {
    definition_names(module).into_iter().collect()
}

/// The qualified form of `bare` inside `module`, or `bare` itself if `module`
/// doesn't define it under that spelling.
fn qualified_name_in_module(module: &Module, bare: &str) -> String {
    local_lookup(module)
        .get(bare)
        .cloned()
        .unwrap_or_else(|| bare.to_string())
}

/// Resolve every raw edge across every module into a [`CrossFileCallGraph`].
///
/// Resolution order per edge: (1) exact qualified-name match in the same
/// file, (2) exact qualified-name match project-wide (ambiguous if more than
/// one other file defines it), (3) bare-name match project-wide with exactly
/// one candidate. Anything left is recorded unresolved.
pub fn resolve(modules: &[Module]) -> CrossFileCallGraph {
    let index = build_name_index(modules);
    let module_by_path: HashMap<&PathBuf, &Module> =
        modules.iter().map(|m| (&m.path, m)).collect();
    let mut graph = CrossFileCallGraph::default();

    for module in modules {
        let local = local_lookup(module);
        let local_qualified_set: std::collections::HashSet<&String> = local.values().collect();

        for raw in &module.raw_edges {
            let callee = &raw.callee_text;
            let src_func = local
                .get(&raw.caller)
                .cloned()
                .unwrap_or_else(|| raw.caller.clone());

            // 1. exact qualified-name match in the same file. Covers both a
            // bare call to a same-file function/class (whose qualified form
            // equals its bare name) and a qualified `Class.method` call.
            let same_file_match = local.get(callee).cloned().or_else(|| {
                local_qualified_set.contains(callee).then(|| callee.clone())
            });
            if let Some(dst_func) = same_file_match {
                let edge = Edge {
                    src_file: module.path.clone(),
                    src_func,
                    dst_file: module.path.clone(),
                    dst_func,
                };
                graph.intra_file_edges.push(edge.clone());
                graph.all_edges.push(edge);
                continue;
            }

            // 2. exact qualified-name match, project-wide.
            let qualified_candidates: Vec<&PathBuf> = index
                .by_qualified_name
                .get(callee)
                .map(|files| files.iter().filter(|f| *f != &module.path).collect())
                .unwrap_or_default();

            if !qualified_candidates.is_empty() {
                match qualified_candidates.len() {
                    1 => {
                        let edge = Edge {
                            src_file: module.path.clone(),
                            src_func,
                            dst_file: qualified_candidates[0].clone(),
                            dst_func: callee.clone(),
                        };
                        graph.cross_file_edges.push(edge.clone());
                        graph.all_edges.push(edge);
                    }
                    _ => {
                        graph.unresolved.push(UnresolvedCall {
                            caller_file: module.path.clone(),
                            caller_func: src_func,
                            call_name: callee.clone(),
                            reason: "ambiguous".to_string(),
                        });
                    }
                }
                continue;
            }

            // 3. bare-name match, project-wide.
            let bare_candidates: Vec<&PathBuf> = index
                .by_bare_name
                .get(callee)
                .map(|files| files.iter().filter(|f| *f != &module.path).collect())
                .unwrap_or_default();

            match bare_candidates.len() {
                0 => {
                    graph.unresolved.push(UnresolvedCall {
                        caller_file: module.path.clone(),
                        caller_func: src_func,
                        call_name: callee.clone(),
                        reason: "not_found".to_string(),
                    });
                }
                1 => {
                    let dst_file = bare_candidates[0].clone();
                    let dst_func = module_by_path
                        .get(&dst_file)
                        .map(|m| qualified_name_in_module(m, callee))
                        .unwrap_or_else(|| callee.clone());
                    let edge = Edge {
                        src_file: module.path.clone(),
                        src_func,
                        dst_file,
                        dst_func,
                    };
                    graph.cross_file_edges.push(edge.clone());
                    graph.all_edges.push(edge);
                }
                _ => {
                    graph.unresolved.push(UnresolvedCall {
                        caller_file: module.path.clone(),
                        caller_func: src_func,
                        call_name: callee.clone(),
                        reason: "ambiguous".to_string(),
                    });
                }
            }
        }
    }

    graph
}
