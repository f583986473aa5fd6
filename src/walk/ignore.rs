//! Gitignore-style hierarchical ignore matching (spec §4.1, C2).
//!
//! Each directory contributes a layer of compiled globs from its own
//! `.gcqignore`. Layers stack from the root down; a file's ignored status is
//! decided by walking the stack root-to-leaf and letting the closer
//! (deeper) ancestor's matching rule win, which is the inverse of plain
//! gitignore's "first match in file order" rule composed across directories.

use globset::{Glob, GlobSet, GlobSetBuilder};
use std::path::Path;

/// One `.gcqignore` file's patterns, each tagged with whether it's a
/// negation (`!pattern`) and whether it matched.
struct Rule {
    set: GlobSet,
    negate: bool,
    /// Index in file order; later rules within the same file win ties.
    order: usize,
}

/// Compiled rules from one directory's `.gcqignore`.
pub struct IgnoreLayer {
    rules: Vec<Rule>,
}

impl IgnoreLayer {
    /// Parse a `.gcqignore` file's contents into a layer. Malformed lines are skipped.
    pub fn parse(contents: &str) -> Self {
        let mut rules = Vec::new();
        for (order, raw_line) in contents.lines().enumerate() {
            let line = raw_line.trim_end();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let (negate, pattern) = if let Some(rest) = line.strip_prefix('!') {
                (true, rest)
            } else {
                (false, line)
            };
            let Ok(glob) = build_glob(pattern) else {
                continue;
            };
            let mut builder = GlobSetBuilder::new();
            builder.add(glob);
            let Ok(set) = builder.build() else {
                continue;
            };
            rules.push(Rule {
                set,
                negate,
                order,
            });
        }
        Self { rules }
    }

    pub fn empty() -> Self {
        Self { rules: Vec::new() }
    }

    /// Evaluate this layer alone against a path relative to the layer's directory.
    /// Returns `None` when no rule in this layer matches (defer to ancestors).
    fn decide(&self, rel: &str, is_dir: bool) -> Option<bool> {
        let mut decision = None;
        for rule in &self.rules {
            if rule.set.is_match(rel) || (is_dir && rule.set.is_match(format!("{rel}/"))) {
                decision = Some(!rule.negate);
            }
        }
        decision
    }
}

fn build_glob(pattern: &str) -> Result<Glob, globset::Error> {
    let anchored = pattern.starts_with('/');
    let dir_only = pattern.ends_with('/');
    let mut p = pattern.trim_start_matches('/').trim_end_matches('/').to_string();
    if !anchored && !p.contains('/') {
        p = format!("**/{p}");
    }
    if dir_only {
        p = format!("{p}/**");
    }
    Glob::new(&p)
}

/// Stack of layers from root to the current directory, each tagged with the
/// root-relative path of the directory it was loaded from (empty for root).
pub struct IgnoreStack {
    layers: Vec<(String, IgnoreLayer)>,
}

impl IgnoreStack {
    pub fn new() -> Self {
        Self { layers: Vec::new() }
    }

    /// Push `layer`, recording `dir_rel` (the loading directory's path
    /// relative to the walk root) so patterns are matched against paths
    /// relative to that directory, not the root.
    pub fn push(&mut self, dir_rel: impl Into<String>, layer: IgnoreLayer) {
        self.layers.push((dir_rel.into(), layer));
    }

    pub fn pop(&mut self) {
        self.layers.pop();
    }

    /// Decide whether `rel` (relative to the walk root) is ignored,
    /// composing ancestor layers with closer layers taking precedence over
    /// farther ones. Each layer only sees the portion of `rel` under its own
    /// directory.
    pub fn is_ignored(&self, rel: &str, is_dir: bool) -> bool {
        for (dir_rel, layer) in self.layers.iter().rev() {
            let Some(local) = strip_layer_prefix(dir_rel, rel) else {
                continue;
            };
            if let Some(decision) = layer.decide(local, is_dir) {
                return decision;
            }
        }
        false
    }
}

/// Strip `dir_rel` (a root-relative directory path, empty for root) off the
/// front of `rel`, returning `None` if `rel` isn't under that directory.
fn strip_layer_prefix<'a>(dir_rel: &str, rel: &'a str) -> Option<&'a str> {
    if dir_rel.is_empty() {
        return Some(rel);
    }
    rel.strip_prefix(dir_rel)?.strip_prefix('/')
}

impl Default for IgnoreStack {
    fn default() -> Self {
        Self::new()
    }
}

pub const BUILTIN_DENY: &[&str] = &[
    "node_modules",
    ".git",
    "__pycache__",
    ".venv",
    "venv",
    "dist",
    "build",
    ".idea",
    ".vscode",
    "vendor",
    ".hg",
    ".svn",
    "CVS",
    ".tox",
    ".nox",
    "target",
    "bin",
    "obj",
];

pub fn is_builtin_denied(name: &str) -> bool {
    BUILTIN_DENY.iter().any(|d| d.eq_ignore_ascii_case(name))
}

pub fn is_hidden(name: &str) -> bool {
    name.starts_with('.')
}

pub fn load_layer(dir: &Path) -> IgnoreLayer {
    let path = dir.join(".gcqignore");
    match std::fs::read_to_string(&path) {
        Ok(contents) => IgnoreLayer::parse(&contents),
        Err(_) => IgnoreLayer::empty(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn simple_pattern_matches_anywhere() {
        let layer = IgnoreLayer::parse("*.log");
        assert!(layer.decide("debug.log", false) == Some(true));
        assert!(layer.decide("src/debug.log", false) == Some(true));
    }

    #[test]
    fn anchored_pattern_matches_only_at_root() {
        let layer = IgnoreLayer::parse("/build");
        assert_eq!(layer.decide("build", true), Some(true));
    }

    #[test]
    fn negation_overrides_earlier_match_within_layer() {
        let layer = IgnoreLayer::parse("*.log\n!keep.log");
        assert_eq!(layer.decide("keep.log", false), Some(false));
        assert_eq!(layer.decide("other.log", false), Some(true));
    }

    #[test]
    fn closer_ancestor_wins_over_farther_one() {
        let mut stack = IgnoreStack::new();
        stack.push("", IgnoreLayer::parse("*.log"));
        stack.push("", IgnoreLayer::parse("!keep.log"));
        assert!(!stack.is_ignored("keep.log", false));
    }

    #[test]
    fn farther_ancestor_applies_when_closer_is_silent() {
        let mut stack = IgnoreStack::new();
        stack.push("", IgnoreLayer::parse("*.log"));
        stack.push("", IgnoreLayer::empty());
        assert!(stack.is_ignored("debug.log", false));
    }

    #[test]
    fn anchored_pattern_in_subdirectory_layer_matches_relative_to_its_own_directory() {
        // A layer loaded from "pkg/" anchoring "/build" must match
        // "pkg/build", not be compared against the root-relative path as if
        // "/build" meant the walk root's own build directory.
        let mut stack = IgnoreStack::new();
        stack.push("", IgnoreLayer::empty());
        stack.push("pkg", IgnoreLayer::parse("/build"));
        assert!(stack.is_ignored("pkg/build", true));
        assert!(!stack.is_ignored("build", true));
        assert!(!stack.is_ignored("other/build", true));
    }

    #[test]
    fn builtin_deny_list_is_case_insensitive() {
        assert!(is_builtin_denied("Node_Modules"));
        assert!(!is_builtin_denied("src"));
    }
}
