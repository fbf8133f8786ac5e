//! JavaScript module scanner.
//!
//! Recursively walks directories to collect `.js`/`.mjs` files, skipping
//! entries whose names start with `.` or `_` plus any user-supplied exclude
//! globs. Parsing goes through tree-sitter with the JavaScript grammar; a
//! module that parses with errors is rejected so the analyzer never walks a
//! broken tree.

use anyhow::{Context, Result, bail};
use glob::Pattern;
use std::path::{Path, PathBuf};
use tree_sitter::{Parser, Tree};
use walkdir::WalkDir;

/// Collects JavaScript files under `paths`. Explicit file arguments are taken
/// as-is; directories are walked, keeping `.js` and `.mjs` files and skipping
/// hidden or underscore-prefixed entries along with anything matching
/// `exclude`.
pub fn collect_js_files(paths: &[PathBuf], exclude: &[Pattern]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for path in paths {
        if path.is_file() {
            files.push(path.clone());
            continue;
        }
        for entry in WalkDir::new(path)
            .into_iter()
            .filter_entry(|e| !is_hidden_or_underscore(e) && !is_excluded(e.path(), exclude))
        {
            let entry = entry?;
            if entry.file_type().is_file()
                && entry
                    .path()
                    .extension()
                    .is_some_and(|ext| ext == "js" || ext == "mjs")
            {
                files.push(entry.into_path());
            }
        }
    }

    files.sort();
    Ok(files)
}

/// Compiles `--exclude` argument strings into glob patterns.
pub fn compile_excludes(patterns: &[String]) -> Result<Vec<Pattern>> {
    patterns
        .iter()
        .map(|p| Pattern::new(p).with_context(|| format!("Invalid exclude pattern '{}'", p)))
        .collect()
}

fn is_hidden_or_underscore(entry: &walkdir::DirEntry) -> bool {
    entry
        .file_name()
        .to_str()
        .is_some_and(|s| s.starts_with('.') || s.starts_with('_'))
}

fn is_excluded(path: &Path, exclude: &[Pattern]) -> bool {
    exclude.iter().any(|pattern| {
        pattern.matches_path(path)
            || path
                .file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|n| pattern.matches(n))
    })
}

/// Parses one module's source text.
///
/// tree-sitter recovers from syntax errors by inserting error nodes; a tree
/// containing any is treated as a parse failure for this file, since binding
/// and reachability results over a mangled tree would be misleading.
pub fn parse_source(source: &str) -> Result<Tree> {
    let mut parser = Parser::new();
    parser
        .set_language(&tree_sitter_javascript::LANGUAGE.into())
        .context("Failed to initialize the JavaScript grammar")?;

    let tree = parser
        .parse(source, None)
        .context("tree-sitter did not produce a syntax tree")?;

    if tree.root_node().has_error() {
        bail!("syntax errors in module");
    }

    Ok(tree)
}
