//! chocimport: Audit and update choc factory imports in JavaScript modules.
//!
//! Scans page code for all-uppercase factory calls reachable from
//! `set_content`/`replace_content`, compares them against the destructuring
//! declaration tagged `//autoimport`, and reports or rewrites the difference.

use anyhow::{Context, Result};
use chocimport::cli::Args;
use chocimport::{SELF_TEST_MODULE, analyzer, imports, imports::FileReport, rewriter, scanner};
use clap::Parser;
use colored::Colorize;
use std::path::{Path, PathBuf};

fn main() -> Result<()> {
    let args = Args::parse();

    let excludes = scanner::compile_excludes(&args.exclude)?;
    let mut explicit: Vec<PathBuf> = Vec::new();
    let mut self_test = false;
    for path in &args.paths {
        if path == "-" {
            self_test = true;
        } else {
            explicit.push(PathBuf::from(path));
        }
    }
    let files = scanner::collect_js_files(&explicit, &excludes)?;
    if args.verbose {
        eprintln!(
            "{} Found {} JavaScript files to analyze",
            "info:".blue().bold(),
            files.len() + self_test as usize
        );
    }

    let mut reports = Vec::new();
    let mut failures = 0usize;
    if self_test {
        match process_module(None, &args) {
            Ok(Some(report)) => reports.push(report),
            Ok(None) => {}
            Err(err) => {
                eprintln!("{} -: {:#}", "error:".red().bold(), err);
                failures += 1;
            }
        }
    }
    for file in &files {
        match process_module(Some(file), &args) {
            Ok(Some(report)) => reports.push(report),
            Ok(None) => {}
            Err(err) => {
                eprintln!("{} {}: {:#}", "error:".red().bold(), file.display(), err);
                failures += 1;
            }
        }
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&reports)?);
    } else if reports.is_empty() && failures == 0 {
        println!("{} All imports are up to date", "ok:".green().bold());
    }

    if failures > 0 {
        anyhow::bail!("{} file(s) could not be analyzed", failures);
    }
    Ok(())
}

/// Analyzes one module and, unless its imports already agree with usage,
/// prints (or rewrites) the difference. `None` stands for the built-in
/// self-test module.
fn process_module(file: Option<&Path>, args: &Args) -> Result<Option<FileReport>> {
    let (label, source) = match file {
        Some(path) => {
            let source = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            (path.display().to_string(), source)
        }
        None => ("-".to_string(), SELF_TEST_MODULE.to_string()),
    };

    let analysis = analyzer::analyze_source(&source, &label, &args.extcall)?;
    if args.verbose {
        eprintln!(
            "{} {}: {} declared, {} in use",
            "info:".blue().bold(),
            label,
            analysis.declared.len(),
            analysis.wanted.len()
        );
    }

    let Some(report) = imports::reconcile(&analysis) else {
        return Ok(None);
    };

    if !args.json {
        print_report(&report);
    }
    if args.should_fix() {
        apply_report(file, &source, &report, args)?;
    }
    Ok(Some(report))
}

fn print_report(report: &FileReport) {
    println!("{}", report.file.bold());
    if !report.lose.is_empty() {
        println!("  {} {}", "LOSE:".red().bold(), report.lose.join(", "));
    }
    if !report.gain.is_empty() {
        println!("  {} {}", "GAIN:".green().bold(), report.gain.join(", "));
    }
    println!("  {} {}", "WANT:".cyan().bold(), report.statement);
}

fn apply_report(
    file: Option<&Path>,
    source: &str,
    report: &FileReport,
    args: &Args,
) -> Result<()> {
    let Some(range) = report.range.clone() else {
        println!(
            "  {} No declaration tagged //autoimport; not rewriting",
            "hint:".cyan().bold()
        );
        return Ok(());
    };
    if args.interactive {
        let confirmed = dialoguer::Confirm::new()
            .with_prompt(format!("Rewrite {}?", report.file))
            .default(true)
            .interact()?;
        if !confirmed {
            return Ok(());
        }
    }
    match file {
        Some(path) => {
            rewriter::apply_fix(path, range, &report.statement)
                .with_context(|| format!("Failed to rewrite {}", path.display()))?;
            println!("  {} Updated {}", "ok:".green().bold(), report.file);
        }
        None => {
            // The self-test module has no file; show the patched text.
            let patched = rewriter::splice(source, range, &report.statement)?;
            println!("{}", patched);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn self_test_module_reports_the_documented_drift() {
        let analysis = analyzer::analyze_source(SELF_TEST_MODULE, "-", &[]).unwrap();
        let report = imports::reconcile(&analysis).unwrap();
        assert_eq!(report.lose, vec!["DIV"]);
        assert_eq!(report.gain, vec!["B", "FIGURE", "PRE", "SPAN"]);
        assert_eq!(
            report.statement,
            "const {B, FIGURE, FORM, INPUT, LABEL, PRE, SPAN} = choc;"
        );
        assert!(report.fixable);
    }

    #[test]
    fn self_test_fix_keeps_the_marker_comment() {
        let analysis = analyzer::analyze_source(SELF_TEST_MODULE, "-", &[]).unwrap();
        let report = imports::reconcile(&analysis).unwrap();
        let patched =
            rewriter::splice(SELF_TEST_MODULE, report.range.clone().unwrap(), &report.statement)
                .unwrap();
        assert!(patched.contains(
            "const {B, FIGURE, FORM, INPUT, LABEL, PRE, SPAN} = choc; //autoimport"
        ));
        assert!(!patched.contains("const {FORM, LABEL, INPUT} = choc;"));
    }

    #[test]
    fn fixing_is_a_fixed_point() {
        let analysis = analyzer::analyze_source(SELF_TEST_MODULE, "-", &[]).unwrap();
        let report = imports::reconcile(&analysis).unwrap();
        let patched =
            rewriter::splice(SELF_TEST_MODULE, report.range.clone().unwrap(), &report.statement)
                .unwrap();
        // The unmarked {DIV} destructure still exists, so the drift is
        // reported again, but a second fix changes nothing.
        let reanalyzed = analyzer::analyze_source(&patched, "-", &[]).unwrap();
        let again = imports::reconcile(&reanalyzed).unwrap();
        assert_eq!(again.statement, report.statement);
        let repatched =
            rewriter::splice(&patched, again.range.clone().unwrap(), &again.statement).unwrap();
        assert_eq!(repatched, patched);
    }
}
