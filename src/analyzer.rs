//! Scope-aware reachability analysis over one JavaScript module.
//!
//! Starting from calls that deliver content to a rendering sink
//! (`set_content` / `replace_content`), walks the syntax tree to find every
//! all-uppercase factory call that can, along some lexical path, contribute
//! to that content. The walk is a single pass with no fixed-point iteration:
//! a definition written after its point of use in source order may be missed.
//! That is a documented property of the tool, not an accident.
//!
//! Traversal runs under one of three contexts. `Probe` registers bindings but
//! treats identifiers and factory calls as inert; `SetContent` marks values
//! currently being delivered; `Return` marks a function body being evaluated
//! for its return value. Each (node, context) pair is visited at most once,
//! which bounds the walk even over mutually recursive definitions.

use crate::scanner;
use crate::scope::ScopeStack;
use crate::syntax::{
    DOM_ADDITION_METHODS, IMPORT_SOURCES, NodeKind, RENDER_SINKS, call_arguments, call_callee,
    field, is_factory_name, named_children, start_line, text,
};
use anyhow::{Context as _, Result};
use std::collections::{BTreeMap, HashSet};
use std::ops::Range;
use tree_sitter::Node;

/// Traversal interpretation mode, threaded through every dispatch call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Context {
    /// Looking for definitions only; identifiers and factory calls are inert.
    Probe,
    /// The current expression is being delivered as content.
    SetContent,
    /// Evaluating a function body for what it returns.
    Return,
}

/// Calling a value-producing expression shifts "this is content" to "this
/// call's return value is content". Probe stays Probe.
fn escalate(ctx: Context) -> Context {
    match ctx {
        Context::SetContent => Context::Return,
        other => other,
    }
}

/// Everything learned from one file. All maps are ordered by name, so the
/// reconciler's output is deterministic without further sorting.
#[derive(Debug)]
pub struct Analysis {
    /// Label used in diagnostics (file path, or `-` for the embedded module).
    pub file: String,
    /// Locally bound factory names from `const {…} = choc|lindt` destructures,
    /// mapped to their import key as spelled in the source (aliases keep
    /// their quoting).
    pub declared: BTreeMap<String, String>,
    /// Factory names reachable from a rendering sink, mapped to the import
    /// key to write when the name is newly introduced.
    pub wanted: BTreeMap<String, String>,
    /// Which module binding name the destructure used (`choc` unless the
    /// file uses `lindt`).
    pub import_source: String,
    /// Byte range of the marker-tagged declaration, when one exists.
    pub import_range: Option<Range<usize>>,
}

/// Analyzes one module's source text. `file` is only a diagnostic label;
/// `extcall` names top-level functions that an external framework invokes by
/// convention, analyzed as if called in a content position.
pub fn analyze_source(source: &str, file: &str, extcall: &[String]) -> Result<Analysis> {
    let tree =
        scanner::parse_source(source).with_context(|| format!("Failed to parse {}", file))?;
    let mut analyzer = Analyzer::new(source, file);
    analyzer.run(tree.root_node(), extcall);
    Ok(analyzer.into_analysis())
}

struct Analyzer<'t> {
    source: &'t str,
    file: String,
    scopes: ScopeStack<'t>,
    visited: HashSet<(usize, Context)>,
    declared: BTreeMap<String, String>,
    wanted: BTreeMap<String, String>,
    import_source: String,
    marker_row: Option<usize>,
    import_range: Option<Range<usize>>,
    unknown_kinds: HashSet<String>,
}

impl<'t> Analyzer<'t> {
    fn new(source: &'t str, file: &str) -> Self {
        let marker_row = source
            .lines()
            .position(|line| line.trim().ends_with("autoimport"));
        Self {
            source,
            file: file.to_string(),
            scopes: ScopeStack::new(),
            visited: HashSet::new(),
            declared: BTreeMap::new(),
            wanted: BTreeMap::new(),
            import_source: "choc".to_string(),
            marker_row,
            import_range: None,
            unknown_kinds: HashSet::new(),
        }
    }

    fn into_analysis(self) -> Analysis {
        Analysis {
            file: self.file,
            declared: self.declared,
            wanted: self.wanted,
            import_source: self.import_source,
            import_range: self.import_range,
        }
    }

    fn run(&mut self, root: Node<'t>, extcall: &[String]) {
        let statements = named_children(root);

        // Hoisting pass: top-level function declarations are callable before
        // their position in the source, unlike everything else we track.
        let mut exported_components = Vec::new();
        for &statement in &statements {
            let (declaration, exported) = if statement.kind() == "export_statement" {
                match field(statement, "declaration") {
                    Some(declaration) => (declaration, true),
                    None => continue,
                }
            } else {
                (statement, false)
            };
            if NodeKind::of(declaration) == Some(NodeKind::FunctionDeclaration)
                && let Some(name) = field(declaration, "name")
            {
                let name = text(name, self.source);
                self.scopes.bind(name, declaration);
                // export function COMPONENT() {…} is invoked by the
                // framework even with no call site in this module.
                if exported && is_factory_name(name) {
                    exported_components.push(declaration);
                }
            }
        }

        for statement in statements {
            self.explore(statement, Context::Probe);
        }

        for name in extcall {
            if let Some((index, forms)) = self.scopes.resolve(name) {
                self.descend_resolved(index, forms, Context::Return);
            }
        }
        for declaration in exported_components {
            self.explore(declaration, Context::Return);
        }
    }

    // --- dispatch engine ---------------------------------------------------

    fn explore(&mut self, node: Node<'t>, ctx: Context) {
        if !self.visited.insert((node.id(), ctx)) {
            return;
        }
        let Some(kind) = NodeKind::of(node) else {
            self.warn_unknown_kind(node);
            return;
        };
        use NodeKind::*;
        match kind {
            Program | Block | SwitchBody | Array | ObjectLiteral | Sequence => {
                self.explore_each(named_children(node), ctx)
            }
            FunctionDeclaration => self.function_declaration(node, ctx),
            FunctionExpression => self.function_body(node, ctx),
            ArrowFunction => self.arrow_function(node, ctx),
            Call => self.call(node, ctx),
            Member | Subscript => self.explore_opt(field(node, "object"), ctx),
            Identifier => self.identifier(node, ctx),
            Assignment => self.assignment(node, ctx),
            VariableDeclaration => self.variable_declaration(node, ctx),
            ExpressionStatement | Paren | ElseClause => {
                self.explore_opt(named_children(node).into_iter().next(), ctx)
            }
            Return => self.return_statement(node, ctx),
            BodyDescender => self.explore_opt(field(node, "body"), ctx),
            If | Ternary => {
                self.explore_opt(field(node, "consequence"), ctx);
                self.explore_opt(field(node, "alternative"), ctx);
            }
            Switch => self.explore_opt(field(node, "body"), ctx),
            SwitchCase => {
                let value = field(node, "value").map(|v| v.id());
                for child in named_children(node) {
                    if Some(child.id()) != value {
                        self.explore(child, ctx);
                    }
                }
            }
            Try => {
                self.explore_opt(field(node, "body"), ctx);
                self.explore_opt(field(node, "handler"), ctx);
                self.explore_opt(field(node, "finalizer"), ctx);
            }
            Pair => {
                self.explore_opt(field(node, "key"), ctx);
                self.explore_opt(field(node, "value"), ctx);
            }
            Unary => self.explore_opt(
                field(node, "argument").or_else(|| named_children(node).into_iter().next()),
                ctx,
            ),
            Binary => {
                self.explore_opt(field(node, "left"), ctx);
                self.explore_opt(field(node, "right"), ctx);
            }
            Export => {
                self.explore_opt(
                    field(node, "declaration").or_else(|| field(node, "value")),
                    ctx,
                );
            }
            Import => self.import_statement(node),
            Ignore => {}
        }
    }

    fn explore_opt(&mut self, node: Option<Node<'t>>, ctx: Context) {
        if let Some(node) = node {
            self.explore(node, ctx);
        }
    }

    fn explore_each(&mut self, nodes: Vec<Node<'t>>, ctx: Context) {
        for node in nodes {
            self.explore(node, ctx);
        }
    }

    fn warn_unknown_kind(&mut self, node: Node<'t>) {
        if !node.is_named() {
            return;
        }
        let kind = node.kind();
        if self.unknown_kinds.insert(kind.to_string()) {
            eprintln!(
                "warn: {}:{}: unhandled syntax kind '{}'",
                self.file,
                start_line(node),
                kind
            );
        }
    }

    // --- functions and context transitions ---------------------------------

    /// Shared body walk for every function form. A body reached while merely
    /// registering the function is probed; a body reached because the
    /// function is being invoked keeps `Return`.
    fn function_body(&mut self, node: Node<'t>, ctx: Context) {
        let body_ctx = if ctx == Context::Return {
            Context::Return
        } else {
            Context::Probe
        };
        self.scopes.push_frame();
        self.explore_opt(field(node, "body"), body_ctx);
        self.scopes.pop_frame();
    }

    fn arrow_function(&mut self, node: Node<'t>, ctx: Context) {
        let body = field(node, "body");
        // A braceless arrow body invoked for its value is an implicit return.
        if ctx == Context::Return
            && let Some(body) = body
            && body.kind() != "statement_block"
        {
            self.scopes.push_frame();
            self.explore(body, Context::SetContent);
            self.scopes.pop_frame();
        } else {
            self.function_body(node, ctx);
        }
    }

    fn function_declaration(&mut self, node: Node<'t>, ctx: Context) {
        if ctx != Context::Return
            && let Some(name) = field(node, "name")
        {
            self.scopes.bind(text(name, self.source), node);
        }
        self.function_body(node, ctx);
    }

    fn return_statement(&mut self, node: Node<'t>, ctx: Context) {
        let ctx = if ctx == Context::Return {
            Context::SetContent
        } else {
            ctx
        };
        self.explore_opt(named_children(node).into_iter().next(), ctx);
    }

    // --- identifiers and bindings ------------------------------------------

    fn identifier(&mut self, node: Node<'t>, ctx: Context) {
        if !matches!(ctx, Context::SetContent | Context::Return) {
            return;
        }
        let name = text(node, self.source);
        if let Some((index, forms)) = self.scopes.resolve(name) {
            self.descend_resolved(index, forms, ctx);
        }
    }

    /// Walks resolved candidate forms with only the frames that were visible
    /// where the binding lives, then restores the detached inner frames.
    fn descend_resolved(&mut self, index: usize, forms: Vec<Node<'t>>, ctx: Context) {
        let detached = self.scopes.detach_above(index + 1);
        self.explore_each(forms, ctx);
        self.scopes.restore(detached);
    }

    fn assignment(&mut self, node: Node<'t>, ctx: Context) {
        let left = field(node, "left");
        let right = field(node, "right");
        self.explore_opt(left, ctx);
        self.explore_opt(right, ctx);
        // Stashing happens only outside a content position; destructuring
        // targets get their right-hand side explored but nothing stashed.
        if ctx == Context::SetContent {
            return;
        }
        if let Some(left) = left
            && left.kind() == "identifier"
            && let Some(right) = right
        {
            self.scopes.stash(text(left, self.source), right);
        }
    }

    fn variable_declaration(&mut self, node: Node<'t>, ctx: Context) {
        if let Some(row) = self.marker_row
            && node.start_position().row <= row
            && node.end_position().row >= row
        {
            self.import_range = Some(node.byte_range());
        }
        for declarator in named_children(node) {
            if declarator.kind() != "variable_declarator" {
                continue;
            }
            let Some(value) = field(declarator, "value") else {
                continue;
            };
            let pattern = field(declarator, "name");
            if value.kind() == "identifier" && IMPORT_SOURCES.contains(&text(value, self.source)) {
                // The factory-module destructure feeds the import record
                // instead of the general binding rules.
                if let Some(pattern) = pattern
                    && pattern.kind() == "object_pattern"
                {
                    self.record_declared_imports(pattern);
                    self.import_source = text(value, self.source).to_string();
                }
                continue;
            }
            self.explore(value, ctx);
            if let Some(pattern) = pattern
                && pattern.kind() == "identifier"
            {
                self.scopes.bind(text(pattern, self.source), value);
            }
        }
    }

    fn record_declared_imports(&mut self, pattern: Node<'t>) {
        for entry in named_children(pattern) {
            match entry.kind() {
                "shorthand_property_identifier_pattern" => {
                    let name = text(entry, self.source);
                    if is_factory_name(name) {
                        self.declared.insert(name.to_string(), name.to_string());
                    }
                }
                "pair_pattern" => {
                    let (Some(key), Some(value)) = (field(entry, "key"), field(entry, "value"))
                    else {
                        continue;
                    };
                    if value.kind() != "identifier" || !is_factory_name(text(value, self.source)) {
                        continue;
                    }
                    match key.kind() {
                        // String keys keep their quoted spelling.
                        "property_identifier" | "string" => {
                            self.declared.insert(
                                text(value, self.source).to_string(),
                                text(key, self.source).to_string(),
                            );
                        }
                        other => eprintln!(
                            "warn: {}:{}: unrecognized import destructuring key '{}'",
                            self.file,
                            start_line(key),
                            other
                        ),
                    }
                }
                _ => {}
            }
        }
    }

    fn import_statement(&mut self, node: Node<'t>) {
        // Imported names are known variables with no code attached; binding
        // them stops outward scope walks from misattributing the name.
        let Some(clause) = named_children(node)
            .into_iter()
            .find(|child| child.kind() == "import_clause")
        else {
            return;
        };
        for child in named_children(clause) {
            match child.kind() {
                "identifier" => self.scopes.declare(text(child, self.source)),
                "namespace_import" => {
                    if let Some(name) = named_children(child)
                        .into_iter()
                        .find(|c| c.kind() == "identifier")
                    {
                        self.scopes.declare(text(name, self.source));
                    }
                }
                "named_imports" => {
                    for spec in named_children(child) {
                        if spec.kind() != "import_specifier" {
                            continue;
                        }
                        let local = field(spec, "alias").or_else(|| field(spec, "name"));
                        if let Some(local) = local
                            && local.kind() == "identifier"
                        {
                            self.scopes.declare(text(local, self.source));
                        }
                    }
                }
                _ => {}
            }
        }
    }

    // --- call classification -----------------------------------------------

    fn call(&mut self, node: Node<'t>, ctx: Context) {
        // A function's arguments can be incorporated into its return value,
        // so they always carry the current context.
        let args = call_arguments(node);
        self.explore_each(args.clone(), ctx);

        let Some(callee) = call_callee(node) else {
            return;
        };
        match callee.kind() {
            "identifier" => self.call_named(node, callee, &args, ctx),
            "member_expression" => self.call_member(callee, &args, ctx),
            "subscript_expression" => {
                // object[expr]() starts out by evaluating both parts; the
                // call itself stays unresolved.
                self.explore_opt(field(callee, "object"), escalate(ctx));
                self.explore_opt(field(callee, "index"), ctx);
            }
            "arrow_function" | "function_expression" | "function" | "generator_function" => {
                // Immediately invoked function literal.
                self.explore(callee, escalate(ctx));
            }
            // Unresolved callee shapes (call chains and the like) are a
            // stated completeness boundary.
            _ => {}
        }
    }

    fn call_named(&mut self, node: Node<'t>, callee: Node<'t>, args: &[Node<'t>], ctx: Context) {
        let name = text(callee, self.source);
        if RENDER_SINKS.contains(&name) {
            // First argument is the target, second is the content.
            if args.len() < 2 {
                return;
            }
            self.explore(args[1], Context::SetContent);
            if args.len() > 2 {
                let line = start_line(node);
                eprintln!(
                    "warn: {}:{}: extra arguments to {} - did you intend to pass an array?",
                    self.file, line, name
                );
                if let Some(source_line) = self.source.lines().nth(line - 1) {
                    eprintln!("warn: {}", source_line);
                }
            }
        }
        if ctx != Context::SetContent {
            return;
        }
        if let Some((index, forms)) = self.scopes.resolve(name) {
            // A user function delivering content: scan its body for return
            // values. It may already have been probed; the visited marks make
            // the second scan cheap and a third impossible.
            self.descend_resolved(index, forms, Context::Return);
            return;
        }
        if is_factory_name(name) {
            // SVG is namespaced in the factory library.
            let key = if name == "SVG" {
                "\"svg:svg\"".to_string()
            } else {
                name.to_string()
            };
            self.wanted.insert(name.to_string(), key);
        }
    }

    fn call_member(&mut self, callee: Node<'t>, args: &[Node<'t>], ctx: Context) {
        // foo(…).spam() starts out by calling foo(…).
        let object = field(callee, "object");
        self.explore_opt(object, escalate(ctx));
        let Some(property) = field(callee, "property") else {
            return;
        };
        let method = text(property, self.source);
        if DOM_ADDITION_METHODS.contains(&method) {
            self.explore_each(args.to_vec(), Context::SetContent);
        } else if method == "map" {
            // stuff.map(cb) is effectively a call to cb whose return values
            // become the delivered elements.
            if let Some(&callback) = args.first() {
                self.explore(callback, escalate(ctx));
            }
        } else if (method == "push" || method == "unshift")
            && let Some(object) = object
            && object.kind() == "identifier"
        {
            // Adding to an array adds code to the array's definition.
            self.scopes.append_existing(text(object, self.source), args);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn analyze(source: &str) -> Analysis {
        analyze_source(source, "test.js", &[]).unwrap()
    }

    fn wanted(source: &str) -> Vec<String> {
        analyze(source).wanted.keys().cloned().collect()
    }

    #[test]
    fn direct_usage() {
        let names = wanted(r#"set_content("main", FORM(LABEL("hi")));"#);
        assert_eq!(names, vec!["FORM", "LABEL"]);
    }

    #[test]
    fn factory_calls_outside_a_sink_are_inert() {
        assert!(wanted(r#"const x = DIV("unused");"#).is_empty());
    }

    #[test]
    fn sink_aliases_are_synonyms() {
        let names = wanted(r#"replace_content("main", ARTICLE("hi"));"#);
        assert_eq!(names, vec!["ARTICLE"]);
    }

    #[test]
    fn sink_with_one_argument_is_ignored() {
        assert!(wanted(r#"set_content(DIV("hi"));"#).is_empty());
    }

    #[test]
    fn sink_with_extra_arguments_still_captures_the_second() {
        let names = wanted(r#"set_content("main", B("hi"), EM("stray"));"#);
        assert_eq!(names, vec!["B"]);
    }

    #[test]
    fn arguments_of_unresolved_calls_still_carry_content() {
        let names = wanted(r#"set_content("main", widget(DIV("hi")));"#);
        assert_eq!(names, vec!["DIV"]);
    }

    #[test]
    fn named_function_return_value() {
        let names = wanted(
            r#"
            set_content("main", thing());
            function thing() { return FORM(INPUT({})); }
            "#,
        );
        assert_eq!(names, vec!["FORM", "INPUT"]);
    }

    #[test]
    fn assignment_within_scope() {
        let names = wanted(
            r#"
            function update() {
                let stuff;
                stuff = LABEL(INPUT({}));
                set_content("main", stuff);
            }
            "#,
        );
        assert_eq!(names, vec!["INPUT", "LABEL"]);
    }

    #[test]
    fn branch_insensitive_capture() {
        let names = wanted(
            r#"
            let x;
            if (c) x = P("hi");
            else x = DIV("hi");
            set_content("main", x);
            "#,
        );
        assert_eq!(names, vec!["DIV", "P"]);
    }

    #[test]
    fn mutation_capture() {
        let names = wanted(
            r#"
            const arr = [];
            arr.push(LI("one"));
            arr.push(SPAN("two"));
            set_content("main", arr);
            "#,
        );
        assert_eq!(names, vec!["LI", "SPAN"]);
    }

    #[test]
    fn unshift_counts_as_mutation() {
        let names = wanted(
            r#"
            const arr = [];
            arr.unshift(LI("one"));
            set_content("main", arr);
            "#,
        );
        assert_eq!(names, vec!["LI"]);
    }

    #[test]
    fn mutation_of_unbound_receiver_is_ignored() {
        assert!(
            wanted(
                r#"
                build().push(LI("one"));
                set_content("main", []);
                "#,
            )
            .is_empty()
        );
    }

    #[test]
    fn map_callback_capture() {
        let names = wanted(
            r#"
            const items = stuff.map(thing => LI(thing.name));
            set_content("main", items);
            "#,
        );
        assert_eq!(names, vec!["LI"]);
    }

    #[test]
    fn dom_addition_capture() {
        let names = wanted(r##"DOM("#foo").appendChild(LI("hi"));"##);
        assert_eq!(names, vec!["LI"]);
    }

    #[test]
    fn iife_capture() {
        let names = wanted(r#"set_content("main", (x => ABBR(x.attr, x.text))(stuff));"#);
        assert_eq!(names, vec!["ABBR"]);
    }

    #[test]
    fn dead_path_exclusion() {
        let names = wanted(
            r#"
            function unused() { return DIV("never"); }
            set_content("main", B("hi"));
            "#,
        );
        assert_eq!(names, vec!["B"]);
    }

    #[test]
    fn definition_after_use_is_missed() {
        // Lexical single-pass analysis: a reassignment below the sink call's
        // resolution point is not seen.
        let names = wanted(
            r#"
            let f4 = "test";
            function update() { set_content("main", f4()); }
            f4 = () => DIV();
            "#,
        );
        assert!(names.is_empty());
    }

    #[test]
    fn extcall_functions_are_analyzed_as_invoked() {
        let source = r#"export function make_content() { return B("hello"); }"#;
        let analysis = analyze_source(source, "test.js", &["make_content".to_string()]).unwrap();
        assert_eq!(
            analysis.wanted.keys().cloned().collect::<Vec<_>>(),
            vec!["B"]
        );
    }

    #[test]
    fn extcall_of_unknown_name_is_harmless() {
        let analysis = analyze_source("1;", "test.js", &["missing".to_string()]).unwrap();
        assert!(analysis.wanted.is_empty());
    }

    #[test]
    fn exported_uppercase_component_is_analyzed() {
        let names = wanted(r#"export function COMPONENT(x) { return FIGURE(x.name); }"#);
        assert_eq!(names, vec!["FIGURE"]);
    }

    #[test]
    fn non_exported_uppercase_function_is_not() {
        assert!(wanted(r#"function NONCOMPONENT(x) { return FIGCAPTION(x.name); }"#).is_empty());
    }

    #[test]
    fn braceless_arrow_implicitly_returns() {
        let names = wanted(
            r#"
            const f = () => PRE("code");
            set_content("main", f());
            "#,
        );
        assert_eq!(names, vec!["PRE"]);
    }

    #[test]
    fn braced_arrow_without_return_yields_nothing() {
        assert!(
            wanted(
                r#"
                const f = () => { HP("no return"); };
                set_content("main", f());
                "#,
            )
            .is_empty()
        );
    }

    #[test]
    fn mutual_recursion_terminates() {
        let names = wanted(
            r#"
            function a() { return b() || DIV("a"); }
            function b() { return a() || P("b"); }
            set_content("main", a());
            "#,
        );
        assert_eq!(names, vec!["DIV", "P"]);
    }

    #[test]
    fn self_referential_mutation_terminates() {
        let names = wanted(
            r#"
            let arr = [];
            arr.push(arr);
            arr.push(LI("x"));
            set_content("main", arr);
            "#,
        );
        assert_eq!(names, vec!["LI"]);
    }

    #[test]
    fn unknown_kinds_degrade_gracefully() {
        let names = wanted(
            r#"
            class Widget { render() { return DIV("hidden"); } }
            set_content("main", B("hi"));
            "#,
        );
        assert_eq!(names, vec!["B"]);
    }

    #[test]
    fn conditional_expression_covers_both_branches() {
        let names = wanted(r#"set_content("main", flag ? B("y") : EM("n"));"#);
        assert_eq!(names, vec!["B", "EM"]);
    }

    #[test]
    fn switch_statement_covers_every_case() {
        let names = wanted(
            r#"
            function pick(k) {
                switch (k) {
                    case 1: return B("one");
                    default: return EM("rest");
                }
            }
            set_content("main", pick(2));
            "#,
        );
        assert_eq!(names, vec!["B", "EM"]);
    }

    #[test]
    fn template_strings_are_inert() {
        assert!(wanted(r#"set_content("main", `${DIV}`);"#).is_empty());
    }

    #[test]
    fn imported_names_shadow_factory_lookup() {
        // An imported helper resolves to its empty binding instead of being
        // treated as anything else.
        let names = wanted(
            r#"
            import {helper} from "./util.js";
            set_content("main", helper());
            "#,
        );
        assert!(names.is_empty());
    }

    #[test]
    fn declared_imports_are_recorded_with_aliases() {
        let analysis = analyze(
            r#"
            const {FORM, "svg:svg": SVG, FOO: BAR} = choc; //autoimport
            "#,
        );
        assert_eq!(
            analysis.declared.get("FORM").map(String::as_str),
            Some("FORM")
        );
        assert_eq!(
            analysis.declared.get("SVG").map(String::as_str),
            Some(r#""svg:svg""#)
        );
        assert_eq!(
            analysis.declared.get("BAR").map(String::as_str),
            Some("FOO")
        );
        assert!(analysis.import_range.is_some());
    }

    #[test]
    fn all_destructures_feed_the_record_but_only_marked_one_is_the_target() {
        let source = "const {FORM} = choc; //autoimport\nconst {DIV} = choc;\n";
        let analysis = analyze(source);
        assert!(analysis.declared.contains_key("FORM"));
        assert!(analysis.declared.contains_key("DIV"));
        let range = analysis.import_range.unwrap();
        assert_eq!(&source[range], "const {FORM} = choc;");
    }

    #[test]
    fn lindt_is_a_supported_source() {
        let analysis = analyze(
            r#"
            const {SPAN} = lindt; //autoimport
            replace_content("main", SPAN("hi"));
            "#,
        );
        assert_eq!(analysis.import_source, "lindt");
    }

    #[test]
    fn svg_discovery_uses_the_namespaced_key() {
        let analysis = analyze(r#"set_content("main", SVG(CIRCLE({})));"#);
        assert_eq!(
            analysis.wanted.get("SVG").map(String::as_str),
            Some(r#""svg:svg""#)
        );
        assert_eq!(
            analysis.wanted.get("CIRCLE").map(String::as_str),
            Some("CIRCLE")
        );
    }

    #[test]
    fn missing_marker_leaves_no_rewrite_target() {
        let analysis = analyze(r#"const {FORM} = choc;"#);
        assert!(analysis.declared.contains_key("FORM"));
        assert!(analysis.import_range.is_none());
    }

    #[test]
    fn determinism() {
        let source = r#"
            const {FORM} = choc; //autoimport
            set_content("main", [DIV("a"), B("b"), ASIDE("c")]);
        "#;
        let first = analyze(source);
        let second = analyze(source);
        assert_eq!(first.wanted, second.wanted);
        assert_eq!(first.declared, second.declared);
        assert_eq!(first.import_range, second.import_range);
    }

    #[test]
    fn files_are_independent() {
        let first = analyze(r#"set_content("main", DIV("a"));"#);
        let second = analyze(r#"set_content("main", B("b"));"#);
        assert_eq!(
            first.wanted.keys().cloned().collect::<Vec<_>>(),
            vec!["DIV"]
        );
        assert_eq!(second.wanted.keys().cloned().collect::<Vec<_>>(), vec!["B"]);
    }

    #[test]
    fn end_to_end_scenario() {
        let analysis = analyze(
            r#"
            const {FORM, LABEL, INPUT} = choc; //autoimport
            function make() { return FORM(LABEL([B("x"), INPUT({})])); }
            set_content("main", make());
            "#,
        );
        let want: Vec<_> = analysis.wanted.keys().cloned().collect();
        assert_eq!(want, vec!["B", "FORM", "INPUT", "LABEL"]);
        let have: Vec<_> = analysis.declared.keys().cloned().collect();
        assert_eq!(have, vec!["FORM", "INPUT", "LABEL"]);
    }

    #[test]
    fn unparseable_file_is_an_error() {
        assert!(analyze_source("const = = 1;", "bad.js", &[]).is_err());
    }
}
