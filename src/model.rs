//! The uniform structural model produced by the extractor (spec §3).
//!
//! A [`Module`] is one file's extraction result: ordered sequences of
//! [`Function`]s, [`Class`]es, and the lighter [`TypeDecl`] records for
//! interfaces/traits/protocols/enums/structs, plus the imports and the
//! intra-file call graph observed during the same parse pass.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// A file discovered by the walker (spec §4.1).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRecord {
    /// Path relative to the project root.
    pub relative_path: PathBuf,
    /// Absolute, canonicalized path.
    pub absolute_path: PathBuf,
    /// Closed-set language tag; empty string for unrecognized extensions.
    pub language: String,
    pub byte_size: u64,
}

/// Kind of type-level declaration captured with a minimal payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TypeDeclKind {
    Interface,
    Trait,
    Protocol,
    Enum,
    Struct,
}

impl std::fmt::Display for TypeDeclKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            TypeDeclKind::Interface => "Interface",
            TypeDeclKind::Trait => "Trait",
            TypeDeclKind::Protocol => "Protocol",
            TypeDeclKind::Enum => "Enum",
            TypeDeclKind::Struct => "Struct",
        };
        f.write_str(s)
    }
}

/// A function or method (spec §3: "A Method is a Function with is-method set").
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Function {
    pub name: String,
    /// Parameter text exactly as written (whitespace-normalized).
    pub params: String,
    /// Return-type text, empty when the language/declaration has none.
    pub return_type: String,
    pub docstring: String,
    pub line: u32,
    pub is_method: bool,
    pub is_async: bool,
    pub decorators: Vec<String>,
}

impl Function {
    /// Language-appropriate rendered signature, e.g. `def name(params) -> type`.
    pub fn render_signature(&self, style: crate::language::SignatureStyle) -> String {
        use crate::language::SignatureStyle as S;
        match style {
            S::PythonDef => {
                if self.return_type.is_empty() {
                    format!("def {}({})", self.name, self.params)
                } else {
                    format!("def {}({}) -> {}", self.name, self.params, self.return_type)
                }
            }
            S::GoFunc => {
                if self.return_type.is_empty() {
                    format!("func {}({})", self.name, self.params)
                } else {
                    format!("func {}({}) {}", self.name, self.params, self.return_type)
                }
            }
            S::TsFunction => {
                if self.return_type.is_empty() {
                    format!("function {}({})", self.name, self.params)
                } else {
                    format!(
                        "function {}({}): {}",
                        self.name, self.params, self.return_type
                    )
                }
            }
            S::CStyle => {
                if self.return_type.is_empty() {
                    format!("{}({})", self.name, self.params)
                } else {
                    format!("{} {}({})", self.return_type, self.name, self.params)
                }
            }
        }
    }
}

/// A class with an ordered method list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Class {
    pub name: String,
    /// Base/superclass list, textual as written (e.g. `"Animal, Serializable"`).
    pub bases: String,
    pub docstring: String,
    pub line: u32,
    pub methods: Vec<Function>,
}

/// Minimal record for interfaces/traits/protocols/enums/structs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeDecl {
    pub kind: TypeDeclKind,
    pub name: String,
    pub line: u32,
    pub docstring: String,
    /// Method names (interfaces/traits/protocols), variant names (enums), or
    /// field names (structs) — whichever the language/kind supplies.
    pub members: Vec<String>,
}

/// An import/use statement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Import {
    pub module: String,
    pub is_from: bool,
    pub names: Vec<String>,
    pub line: u32,
}

/// A call site observed inside some definition, callee resolution deferred.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawEdge {
    pub caller: String,
    /// Callee name exactly as written at the call site.
    pub callee_text: String,
    pub line: u32,
}

/// One file's complete extraction result.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Module {
    pub path: PathBuf,
    pub functions: Vec<Function>,
    pub classes: Vec<Class>,
    pub interfaces: Vec<TypeDecl>,
    pub traits: Vec<TypeDecl>,
    pub protocols: Vec<TypeDecl>,
    pub enums: Vec<TypeDecl>,
    pub structs: Vec<TypeDecl>,
    pub imports: Vec<Import>,
    /// Edges observed within this file, callee unresolved.
    pub raw_edges: Vec<RawEdge>,
}

impl Module {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            ..Default::default()
        }
    }

    /// All type-level declarations across the five optional-presence kinds.
    pub fn all_type_decls(&self) -> impl Iterator<Item = &TypeDecl> {
        self.interfaces
            .iter()
            .chain(self.traits.iter())
            .chain(self.protocols.iter())
            .chain(self.enums.iter())
            .chain(self.structs.iter())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::language::SignatureStyle;

    #[test]
    fn render_signature_python_with_return() {
        let f = Function {
            name: "greet".into(),
            params: "name: str".into(),
            return_type: "str".into(),
            docstring: String::new(),
            line: 1,
            is_method: false,
            is_async: false,
            decorators: vec![],
        };
        assert_eq!(
            f.render_signature(SignatureStyle::PythonDef),
            "def greet(name: str) -> str"
        );
    }

    #[test]
    fn render_signature_ts_no_return() {
        let f = Function {
            name: "greet".into(),
            params: "name: string".into(),
            return_type: String::new(),
            docstring: String::new(),
            line: 1,
            is_method: false,
            is_async: false,
            decorators: vec![],
        };
        assert_eq!(
            f.render_signature(SignatureStyle::TsFunction),
            "function greet(name: string)"
        );
    }

    #[test]
    fn module_all_type_decls_chains_every_kind() {
        let mut m = Module::new("a.rs".into());
        m.structs.push(TypeDecl {
            kind: TypeDeclKind::Struct,
            name: "S".into(),
            line: 1,
            docstring: String::new(),
            members: vec![],
        });
        m.traits.push(TypeDecl {
            kind: TypeDeclKind::Trait,
            name: "T".into(),
            line: 2,
            docstring: String::new(),
            members: vec![],
        });
        assert_eq!(m.all_type_decls().count(), 2);
    }
}
