//! Per-language grammar registry (spec §4.3).
//!
//! Each supported language registers a [`LanguageDef`]: the tree-sitter
//! grammar plus the queries and naming conventions the extractor needs to
//! turn a parse tree into [`crate::model::Module`] fields. The registry is
//! the generalized form of the teacher's `LanguageDef`/`REGISTRY` pattern,
//! widened with an `import_query` and a `type_map` that can name interfaces,
//! protocols, enums, and structs in addition to classes.

use std::collections::HashMap;
use std::sync::LazyLock;

#[cfg(feature = "lang-c")]
mod c;
#[cfg(feature = "lang-cpp")]
mod cpp;
#[cfg(feature = "lang-csharp")]
mod csharp;
#[cfg(feature = "lang-go")]
mod go;
#[cfg(feature = "lang-java")]
mod java;
#[cfg(feature = "lang-javascript")]
mod javascript;
#[cfg(feature = "lang-kotlin")]
mod kotlin;
#[cfg(feature = "lang-php")]
mod php;
#[cfg(feature = "lang-python")]
mod python;
#[cfg(feature = "lang-ruby")]
mod ruby;
#[cfg(feature = "lang-rust")]
mod rust;
#[cfg(feature = "lang-swift")]
mod swift;
#[cfg(feature = "lang-typescript")]
mod typescript;

/// How a `Function`'s signature is rendered back to text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignatureStyle {
    /// `def name(params) -> ret:`
    PythonDef,
    /// `func name(params) ret`
    GoFunc,
    /// `function name(params): ret`
    TsFunction,
    /// `ret name(params)` (C-family, Rust, Java, C#, Kotlin, Swift)
    CStyle,
}

/// Which model field a captured tree-sitter node should populate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureKind {
    Function,
    Method,
    Class,
    Interface,
    Trait,
    Protocol,
    Enum,
    Struct,
}

/// Everything the extractor needs to process one language.
pub struct LanguageDef {
    pub name: &'static str,
    pub extensions: &'static [&'static str],
    pub grammar: fn() -> tree_sitter::Language,
    /// Query whose captures map to [`CaptureKind`] via `capture_kind`.
    pub chunk_query: &'static str,
    pub call_query: &'static str,
    pub import_query: Option<&'static str>,
    /// Capture name -> field kind, e.g. `"function.name" -> Function`.
    pub capture_kind: fn(&str) -> Option<CaptureKind>,
    /// Node kinds that mark an enclosing class/struct/impl for method attachment.
    pub method_containers: &'static [&'static str],
    /// Node kinds treated as a leading documentation comment.
    pub doc_nodes: &'static [&'static str],
    pub signature_style: SignatureStyle,
    /// Node kind naming an async qualifier, if the grammar exposes one directly.
    pub async_node_kind: Option<&'static str>,
    /// Node kind for decorator/attribute siblings (Python decorators, Rust attributes, Java annotations).
    pub decorator_node_kind: Option<&'static str>,
}

pub struct LanguageRegistry {
    by_name: HashMap<&'static str, &'static LanguageDef>,
    by_extension: HashMap<&'static str, &'static LanguageDef>,
}

impl LanguageRegistry {
    fn new() -> Self {
        let mut by_name = HashMap::new();
        let mut by_extension = HashMap::new();

        macro_rules! register {
            ($feature:literal, $module:ident) => {
                #[cfg(feature = $feature)]
                {
                    let def: &'static LanguageDef = &$module::DEFINITION;
                    by_name.insert(def.name, def);
                    for ext in def.extensions {
                        by_extension.insert(*ext, def);
                    }
                }
            };
        }

        register!("lang-rust", rust);
        register!("lang-python", python);
        register!("lang-typescript", typescript);
        register!("lang-javascript", javascript);
        register!("lang-go", go);
        register!("lang-c", c);
        register!("lang-cpp", cpp);
        register!("lang-java", java);
        register!("lang-csharp", csharp);
        register!("lang-kotlin", kotlin);
        register!("lang-ruby", ruby);
        register!("lang-swift", swift);
        register!("lang-php", php);

        Self {
            by_name,
            by_extension,
        }
    }

    pub fn by_name(&self, name: &str) -> Option<&'static LanguageDef> {
        self.by_name.get(name).copied()
    }

    pub fn from_extension(&self, ext: &str) -> Option<&'static LanguageDef> {
        self.by_extension.get(ext).copied()
    }

    pub fn language_tag_for_extension(&self, ext: &str) -> String {
        self.from_extension(ext)
            .map(|d| d.name.to_string())
            .unwrap_or_default()
    }
}

pub static REGISTRY: LazyLock<LanguageRegistry> = LazyLock::new(LanguageRegistry::new);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_extension_yields_no_definition() {
        assert!(REGISTRY.from_extension("zzz").is_none());
    }

    #[cfg(feature = "lang-rust")]
    #[test]
    fn rust_extension_resolves() {
        let def = REGISTRY.from_extension("rs").expect("rust registered");
        assert_eq!(def.name, "rust");
    }

    #[cfg(feature = "lang-python")]
    #[test]
    fn python_extension_resolves() {
        let def = REGISTRY.from_extension("py").expect("python registered");
        assert_eq!(def.name, "python");
    }

    #[test]
    fn language_tag_for_extension_is_empty_for_unknown() {
        assert_eq!(REGISTRY.language_tag_for_extension("xyz"), "");
    }
}
