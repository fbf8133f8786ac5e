//! chocimport library for auditing choc factory imports in JavaScript.
//!
//! Page code built on the choc factory library calls all-uppercase element
//! factories (`DIV`, `FORM`, `LI`) and binds them with a destructuring
//! declaration tagged `//autoimport`. This library keeps that declaration in
//! sync with actual usage. The core workflow has four phases:
//!
//! 1. **Scanning**: Collect `.js`/`.mjs` files and parse each into a syntax tree
//! 2. **Analysis**: Walk each tree from rendering sinks to find every factory
//!    name reachable along some lexical path
//! 3. **Reconciliation**: Diff discovered names against the tagged declaration
//! 4. **Rewriting**: Splice the corrected declaration over the original
//!
//! # Example
//!
//! ```no_run
//! use chocimport::{analyzer, imports};
//!
//! let source = std::fs::read_to_string("page.js").unwrap();
//! let analysis = analyzer::analyze_source(&source, "page.js", &[]).unwrap();
//! if let Some(report) = imports::reconcile(&analysis) {
//!     println!("{} should import: {}", report.file, report.statement);
//! }
//! ```

pub mod analyzer;
pub mod cli;
pub mod imports;
pub mod rewriter;
pub mod scanner;
pub mod scope;
pub mod syntax;

// Re-export commonly used types at crate root
pub use analyzer::{Analysis, Context};
pub use imports::FileReport;

/// Built-in module analyzed when `-` is given as a path. Exercises direct
/// usage, helper functions in every form, a reassignment written too late
/// to be seen, hoisted declarations, exported components, and a deliberately
/// stale import list. Expected outcome: lose DIV, gain B, FIGURE, PRE, SPAN.
pub const SELF_TEST_MODULE: &str = r#"import choc, {set_content, on, DOM} from "https://rosuav.github.io/choc/factory.js";
const {FORM, LABEL, INPUT} = choc; //autoimport
const {DIV} = choc;
const f1 = () => {HP()}, f2 = () => PRE(), f3 = () => {return B("bold");};
let f4 = "teapot";
function update() {
	let el = FORM(LABEL(["Speak thy mind:", INPUT({name: "thought"})]));
	set_content("main", [el, f1(), f2(), f3(), f4(), f5()]);
}
f4 = () => DIV(); //Written below its use, so never found
function f5() {return SPAN();}
export function COMPONENT(x) {return FIGURE(x.name);}
function NONCOMPONENT(x) {return FIGCAPTION(x.name);}
"#;
