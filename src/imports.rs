//! Reconciliation of declared factory imports against discovered usage.
//!
//! Compares the names bound by the marker-tagged destructure with the names
//! the analysis found reachable from a rendering sink, and produces the
//! replacement statement when they differ.

use crate::analyzer::Analysis;
use serde::Serialize;
use std::ops::Range;

/// Outcome of reconciling one file. Produced only when the declared and
/// wanted name sets differ.
#[derive(Debug, Serialize)]
pub struct FileReport {
    /// File the report is about (`-` for the embedded module).
    pub file: String,
    /// Declared names no longer reachable from any sink.
    pub lose: Vec<String>,
    /// Reachable names missing from the declaration.
    pub gain: Vec<String>,
    /// The full replacement declaration, names in alphabetical order.
    pub statement: String,
    /// Whether a marker-tagged declaration exists to splice over.
    pub fixable: bool,
    /// Byte range of that declaration, when present.
    #[serde(skip)]
    pub range: Option<Range<usize>>,
}

/// Diffs declared against wanted names. Returns `None` when the name sets
/// already agree; aliases are not part of the comparison, and an alias the
/// author wrote by hand is kept as long as its name stays in use.
pub fn reconcile(analysis: &Analysis) -> Option<FileReport> {
    if analysis.declared.keys().eq(analysis.wanted.keys()) {
        return None;
    }
    let lose: Vec<String> = analysis
        .declared
        .keys()
        .filter(|name| !analysis.wanted.contains_key(*name))
        .cloned()
        .collect();
    let gain: Vec<String> = analysis
        .wanted
        .keys()
        .filter(|name| !analysis.declared.contains_key(*name))
        .cloned()
        .collect();
    let entries: Vec<String> = analysis
        .wanted
        .iter()
        .map(|(name, discovered_key)| {
            // Hand-written aliases survive; new names get the discovered key.
            let key = analysis.declared.get(name).unwrap_or(discovered_key);
            if key == name {
                name.clone()
            } else {
                format!("{}: {}", key, name)
            }
        })
        .collect();
    let statement = format!(
        "const {{{}}} = {};",
        entries.join(", "),
        analysis.import_source
    );
    Some(FileReport {
        file: analysis.file.clone(),
        lose,
        gain,
        statement,
        fixable: analysis.import_range.is_some(),
        range: analysis.import_range.clone(),
    })
}
