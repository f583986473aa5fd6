//! File discovery (spec §4.1, C1).
//!
//! Hand-rolled rather than built on `ignore::WalkBuilder`: the ancestor
//! composition rule in [`ignore::IgnoreStack`] (closer `.gcqignore` wins over
//! a farther one) is not quite plain gitignore semantics, so the walk needs
//! its own directory recursion to push/pop layers at the right points.

pub mod ignore;

use crate::model::FileRecord;
use ignore::IgnoreStack;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Files over this size are skipped during discovery. Not spec-mandated;
/// grounded on the teacher's own 1MB walk-time cutoff (`src/lib.rs`,
/// `src/cli.rs`), smaller than its separate 50MB parse-time cutoff
/// (`src/parser.rs`) since this repo has no per-stage size budget to spare.
const MAX_FILE_BYTES: u64 = 1024 * 1024;

#[derive(Error, Debug)]
pub enum WalkError {
    #[error("root {0} is not accessible: {1}")]
    RootInaccessible(PathBuf, std::io::Error),
}

#[derive(Debug, Clone, Copy)]
pub struct WalkOptions {
    pub follow_symlinks: bool,
    pub skip_hidden: bool,
}

impl Default for WalkOptions {
    fn default() -> Self {
        Self {
            follow_symlinks: false,
            skip_hidden: true,
        }
    }
}

/// Walk `root`, honoring `.gcqignore` hierarchy and the built-in deny list,
/// returning file records in deterministic (lexicographic, directories-first
/// within each level) order.
pub fn walk(root: &Path, opts: WalkOptions) -> Result<Vec<FileRecord>, WalkError> {
    let root = dunce::canonicalize(root)
        .map_err(|e| WalkError::RootInaccessible(root.to_path_buf(), e))?;
    std::fs::read_dir(&root).map_err(|e| WalkError::RootInaccessible(root.clone(), e))?;

    let mut out = Vec::new();
    let mut stack = IgnoreStack::new();
    stack.push("", ignore::load_layer(&root));
    walk_dir(&root, &root, &mut stack, opts, &mut out);
    out.sort_by(|a: &FileRecord, b: &FileRecord| a.relative_path.cmp(&b.relative_path));
    Ok(out)
}

fn walk_dir(
    root: &Path,
    dir: &Path,
    stack: &mut IgnoreStack,
    opts: WalkOptions,
    out: &mut Vec<FileRecord>,
) {
    let mut entries: Vec<_> = match std::fs::read_dir(dir) {
        Ok(rd) => rd.filter_map(|e| e.ok()).collect(),
        Err(_) => return,
    };
    entries.sort_by_key(|e| e.file_name());

    for entry in entries {
        let name = entry.file_name();
        let name_str = name.to_string_lossy().to_string();
        let path = entry.path();

        if opts.skip_hidden && ignore::is_hidden(&name_str) {
            continue;
        }

        let Ok(file_type) = entry.file_type() else {
            continue;
        };

        let is_symlink = file_type.is_symlink();
        let is_dir = if is_symlink {
            if !opts.follow_symlinks {
                continue;
            }
            match std::fs::metadata(&path) {
                Ok(m) if m.is_dir() => continue, // directory links are never followed
                Ok(m) => m.is_file(),
                Err(_) => continue,
            }
        } else {
            file_type.is_dir()
        };

        let Ok(rel) = path.strip_prefix(root) else {
            continue;
        };
        let rel_str = rel.to_string_lossy().replace('\\', "/");

        if is_symlink && opts.follow_symlinks {
            let Ok(target) = std::fs::canonicalize(&path) else {
                continue;
            };
            if !target.starts_with(root) {
                continue; // escaped the root
            }
        }

        if is_builtin_denied_segment(&name_str) {
            continue;
        }
        if stack.is_ignored(&rel_str, is_dir) {
            continue;
        }

        if is_dir {
            let layer = ignore::load_layer(&path);
            stack.push(rel_str.clone(), layer);
            walk_dir(root, &path, stack, opts, out);
            stack.pop();
        } else {
            let Ok(meta) = std::fs::metadata(&path) else {
                continue;
            };
            if meta.len() > MAX_FILE_BYTES {
                continue;
            }
            let ext = path
                .extension()
                .map(|e| e.to_string_lossy().to_lowercase())
                .unwrap_or_default();
            let language = crate::language::REGISTRY.language_tag_for_extension(&ext);
            out.push(FileRecord {
                relative_path: rel.to_path_buf(),
                absolute_path: path.clone(),
                language,
                byte_size: meta.len(),
            });
        }
    }
}

fn is_builtin_denied_segment(name: &str) -> bool {
    ignore::is_builtin_denied(name)
}
