//! Command-line interface definitions.
//!
//! A single flat command built with clap's derive API: positional files or
//! directories to analyze, plus flags controlling fixing, output format, and
//! analysis extras.

use clap::Parser;

/// Audit and update choc factory imports in JavaScript modules.
#[derive(Debug, Parser)]
#[command(author, version, about)]
pub struct Args {
    /// Files or directories to analyze. Directories are walked for .js/.mjs
    /// files. Pass `-` to run the built-in self-test module.
    #[arg(required = true)]
    pub paths: Vec<String>,

    /// Rewrite the autoimport declaration in files that need changes.
    #[arg(long)]
    pub fix: bool,

    /// Confirm each file's rewrite before applying it. Implies --fix.
    #[arg(short, long)]
    pub interactive: bool,

    /// Name of a top-level function invoked externally by convention;
    /// analyzed as if called in a content position. May be repeated.
    #[arg(long, value_name = "NAME")]
    pub extcall: Vec<String>,

    /// Glob patterns for directories/files to exclude when walking
    /// (e.g., "node_modules"). Entries starting with `.` or `_` are
    /// always skipped.
    #[arg(short, long)]
    pub exclude: Vec<String>,

    /// Emit JSON instead of human-readable output.
    #[arg(long)]
    pub json: bool,

    /// Print additional diagnostics to stderr.
    #[arg(short, long)]
    pub verbose: bool,
}

impl Args {
    /// Whether any rewriting should happen at all.
    pub fn should_fix(&self) -> bool {
        self.fix || self.interactive
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_paths_and_flags() {
        let args = Args::try_parse_from([
            "chocimport",
            "--fix",
            "--extcall",
            "render",
            "--extcall",
            "page_load",
            "src",
            "extra.js",
        ])
        .unwrap();
        assert_eq!(args.paths, vec!["src", "extra.js"]);
        assert!(args.fix);
        assert_eq!(args.extcall, vec!["render", "page_load"]);
        assert!(args.should_fix());
    }

    #[test]
    fn interactive_implies_fixing() {
        let args = Args::try_parse_from(["chocimport", "-i", "app.js"]).unwrap();
        assert!(!args.fix);
        assert!(args.should_fix());
    }

    #[test]
    fn at_least_one_path_is_required() {
        assert!(Args::try_parse_from(["chocimport"]).is_err());
    }

    #[test]
    fn dash_is_an_ordinary_path_argument() {
        let args = Args::try_parse_from(["chocimport", "-"]).unwrap();
        assert_eq!(args.paths, vec!["-"]);
    }
}
