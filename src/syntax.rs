//! JavaScript syntax-tree access layer.
//!
//! Maps tree-sitter's string kind tags onto a closed [`NodeKind`] enum so the
//! traversal can dispatch with an exhaustive `match`, and provides the small
//! set of field accessors the handlers need. Kind strings outside the enum are
//! reported by the analyzer once per run and otherwise skipped.

use tree_sitter::Node;

/// Member-call names whose arguments become displayed content.
pub const DOM_ADDITION_METHODS: &[&str] = &[
    "appendChild",
    "before",
    "after",
    "append",
    "insertBefore",
    "replaceWith",
];

/// Rendering-sink aliases. Both deliver their second argument as content.
pub const RENDER_SINKS: &[&str] = &["set_content", "replace_content"];

/// The two supported factory-module binding names.
pub const IMPORT_SOURCES: &[&str] = &["choc", "lindt"];

/// The syntax shapes the analyzer understands.
///
/// Several grammar kinds collapse onto one variant when they are handled
/// identically (e.g. `call_expression` and `new_expression`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Program,
    FunctionDeclaration,
    FunctionExpression,
    ArrowFunction,
    Call,
    Member,
    Subscript,
    Identifier,
    Assignment,
    VariableDeclaration,
    ExpressionStatement,
    Return,
    Block,
    BodyDescender,
    If,
    ElseClause,
    Ternary,
    Switch,
    SwitchBody,
    SwitchCase,
    Try,
    Array,
    ObjectLiteral,
    Pair,
    Unary,
    Binary,
    Sequence,
    Paren,
    Export,
    Import,
    /// Literals, patterns, comments and control-transfer statements that can
    /// never carry content toward a rendering sink.
    Ignore,
}

impl NodeKind {
    pub fn of(node: Node) -> Option<NodeKind> {
        Self::from_kind(node.kind())
    }

    pub fn from_kind(kind: &str) -> Option<NodeKind> {
        use NodeKind::*;
        let mapped = match kind {
            "program" => Program,
            "function_declaration" | "generator_function_declaration" => FunctionDeclaration,
            "function_expression" | "function" | "generator_function" => FunctionExpression,
            "arrow_function" => ArrowFunction,
            "call_expression" | "new_expression" => Call,
            "member_expression" => Member,
            "subscript_expression" => Subscript,
            "identifier" | "shorthand_property_identifier" => Identifier,
            "assignment_expression" | "augmented_assignment_expression" => Assignment,
            "lexical_declaration" | "variable_declaration" => VariableDeclaration,
            "expression_statement" => ExpressionStatement,
            "return_statement" => Return,
            "statement_block" => Block,
            "while_statement" | "do_statement" | "for_statement" | "for_in_statement"
            | "labeled_statement" | "catch_clause" | "finally_clause" => BodyDescender,
            "if_statement" => If,
            "else_clause" => ElseClause,
            "ternary_expression" => Ternary,
            "switch_statement" => Switch,
            "switch_body" => SwitchBody,
            "switch_case" | "switch_default" => SwitchCase,
            "try_statement" => Try,
            "array" => Array,
            "object" => ObjectLiteral,
            "pair" => Pair,
            "unary_expression" | "await_expression" | "yield_expression" | "spread_element"
            | "computed_property_name" => Unary,
            "binary_expression" => Binary,
            "sequence_expression" => Sequence,
            "parenthesized_expression" => Paren,
            "export_statement" => Export,
            "import_statement" => Import,
            "string" | "template_string" | "number" | "regex" | "property_identifier"
            | "private_property_identifier" | "true" | "false" | "null"
            | "undefined" | "this" | "super" | "import" | "comment" | "hash_bang_line"
            | "empty_statement" | "debugger_statement" | "throw_statement"
            | "update_expression" | "continue_statement" | "break_statement"
            | "object_pattern" | "array_pattern" => Ignore,
            _ => return None,
        };
        Some(mapped)
    }
}

/// Source text covered by `node`. Byte ranges from tree-sitter are always
/// valid indices into the text the tree was parsed from.
pub fn text<'s>(node: Node, source: &'s str) -> &'s str {
    &source[node.byte_range()]
}

/// Named children of `node`, with comments filtered out. Comment nodes are
/// interleaved anywhere in the tree and must never shift argument positions.
pub fn named_children<'t>(node: Node<'t>) -> Vec<Node<'t>> {
    let mut cursor = node.walk();
    node.named_children(&mut cursor)
        .filter(|child| child.kind() != "comment")
        .collect()
}

pub fn field<'t>(node: Node<'t>, name: &str) -> Option<Node<'t>> {
    node.child_by_field_name(name)
}

/// The callee of a call-shaped node, whichever grammar field holds it
/// (`function` for calls, `constructor` for `new`), with any parentheses
/// stripped so `(x => ...)()` classifies like a direct function-literal call.
pub fn call_callee(node: Node) -> Option<Node> {
    let callee = field(node, "function").or_else(|| field(node, "constructor"))?;
    Some(unwrap_parens(callee))
}

/// Argument nodes of a call-shaped node, in source order.
pub fn call_arguments(node: Node) -> Vec<Node> {
    match field(node, "arguments") {
        // Tagged templates put a template_string in the arguments field; those
        // carry no content expressions we track.
        Some(args) if args.kind() == "arguments" => named_children(args),
        _ => Vec::new(),
    }
}

pub fn unwrap_parens(mut node: Node) -> Node {
    while node.kind() == "parenthesized_expression" {
        match named_children(node).into_iter().next() {
            Some(inner) => node = inner,
            None => break,
        }
    }
    node
}

/// Whether `name` is assumed to be a content-element factory: no lowercase
/// letters, at least one uppercase one.
pub fn is_factory_name(name: &str) -> bool {
    name.chars().any(|c| c.is_uppercase()) && !name.chars().any(|c| c.is_lowercase())
}

/// 1-indexed source line on which `node` starts.
pub fn start_line(node: Node) -> usize {
    node.start_position().row + 1
}
