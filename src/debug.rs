//! AST pretty-printing for the `parse` and `debug` CLI commands. `pretty_tree`
//! renders the shape a student would recognize from their own program;
//! `debug_tree` additionally surfaces positions and ERROR/MISSING recovery
//! nodes for diagnosing the parser itself.

use crate::ast::{Expr, Pos, Span, Stmt};

const PRETTY_TEXT_LIMIT: usize = 50;
const DEBUG_TEXT_LIMIT: usize = 30;

fn indent(out: &mut String, depth: usize) {
    for _ in 0..depth {
        out.push_str("  ");
    }
}

fn escape_into(out: &mut String, text: &str) {
    for ch in text.chars() {
        match ch {
            '\n' => out.push_str("\\n"),
            '"' => out.push_str("\\\""),
            c => out.push(c),
        }
    }
}

fn leaf_text(source: &str, span: Span, limit: usize) -> Option<&str> {
    let (start, end) = (span.start as usize, span.end as usize);
    if end > start && end - start < limit && end <= source.len() {
        Some(&source[start..end])
    } else {
        None
    }
}

/// `parse <file>`: statement/expression shape only, with a source snippet
/// on each leaf node.
pub fn pretty_tree(program: &[Stmt], source: &str) -> String {
    let mut out = String::new();
    for stmt in program {
        pretty_stmt(stmt, source, 0, &mut out);
    }
    out
}

fn pretty_leaf(out: &mut String, source: &str, span: Span) {
    if let Some(text) = leaf_text(source, span, PRETTY_TEXT_LIMIT) {
        out.push_str(" \"");
        escape_into(out, text);
        out.push('"');
    }
    out.push_str(")\n");
}

fn pretty_open(out: &mut String, depth: usize, name: &str) {
    indent(out, depth);
    out.push('(');
    out.push_str(name);
}

fn pretty_close(out: &mut String, depth: usize) {
    indent(out, depth);
    out.push_str(")\n");
}

fn pretty_stmt(stmt: &Stmt, source: &str, depth: usize, out: &mut String) {
    let span = stmt.span();
    pretty_open(out, depth, stmt.node_name());
    match *stmt {
        Stmt::Assign { value, .. } => {
            out.push('\n');
            pretty_expr(value, source, depth + 1, out);
            pretty_close(out, depth);
        }
        Stmt::Swap { .. } | Stmt::Read { .. } => {
            pretty_leaf(out, source, span);
        }
        Stmt::Write { values, .. } => {
            out.push('\n');
            for value in values {
                pretty_expr(value, source, depth + 1, out);
            }
            pretty_close(out, depth);
        }
        Stmt::If { cond, then_branch, else_branch, .. } => {
            out.push('\n');
            pretty_expr(cond, source, depth + 1, out);
            for s in then_branch {
                pretty_stmt(s, source, depth + 1, out);
            }
            if let Some(else_branch) = else_branch {
                for s in else_branch {
                    pretty_stmt(s, source, depth + 1, out);
                }
            }
            pretty_close(out, depth);
        }
        Stmt::For { start, stop, step, body, .. } => {
            out.push('\n');
            pretty_expr(start, source, depth + 1, out);
            pretty_expr(stop, source, depth + 1, out);
            if let Some(step) = step {
                pretty_expr(step, source, depth + 1, out);
            }
            for s in body {
                pretty_stmt(s, source, depth + 1, out);
            }
            pretty_close(out, depth);
        }
        Stmt::While { cond, body, .. } => {
            out.push('\n');
            pretty_expr(cond, source, depth + 1, out);
            for s in body {
                pretty_stmt(s, source, depth + 1, out);
            }
            pretty_close(out, depth);
        }
        Stmt::DoWhile { body, cond, .. } => {
            out.push('\n');
            for s in body {
                pretty_stmt(s, source, depth + 1, out);
            }
            pretty_expr(cond, source, depth + 1, out);
            pretty_close(out, depth);
        }
        Stmt::Repeat { body, until, .. } => {
            out.push('\n');
            for s in body {
                pretty_stmt(s, source, depth + 1, out);
            }
            pretty_expr(until, source, depth + 1, out);
            pretty_close(out, depth);
        }
        Stmt::Missing { .. } | Stmt::Error { .. } => {
            pretty_leaf(out, source, span);
        }
    }
}

fn pretty_expr(expr: &Expr, source: &str, depth: usize, out: &mut String) {
    let span = expr.span();
    pretty_open(out, depth, expr.node_name());
    match *expr {
        Expr::Literal { .. } | Expr::Identifier { .. } | Expr::Missing { .. } | Expr::Error { .. } => {
            pretty_leaf(out, source, span);
        }
        Expr::Or { left, right, .. }
        | Expr::And { left, right, .. }
        | Expr::Compare { left, right, .. }
        | Expr::Add { left, right, .. }
        | Expr::Mul { left, right, .. } => {
            out.push('\n');
            pretty_expr(left, source, depth + 1, out);
            pretty_expr(right, source, depth + 1, out);
            pretty_close(out, depth);
        }
        Expr::Not { operand, .. }
        | Expr::Neg { operand, .. }
        | Expr::Sqrt { operand, .. }
        | Expr::Floor { operand, .. }
        | Expr::Paren { inner: operand, .. } => {
            out.push('\n');
            pretty_expr(operand, source, depth + 1, out);
            pretty_close(out, depth);
        }
    }
}

/// `debug <file>`: every node, with its position and ERROR/MISSING markers.
pub fn debug_tree(program: &[Stmt], source: &str) -> String {
    let mut out = String::new();
    for stmt in program {
        debug_stmt(stmt, source, 0, &mut out);
    }
    out
}

fn debug_header(out: &mut String, depth: usize, name: &str, is_error: bool, is_missing: bool, pos: Pos, span: Span, source: &str, is_leaf: bool) {
    indent(out, depth);
    out.push_str(name);
    if is_error {
        out.push_str(" [ERROR]");
    }
    if is_missing {
        out.push_str(" [MISSING]");
    }
    out.push_str(&format!(" ({}:{})", pos.row, pos.col));
    if is_leaf {
        if let Some(text) = leaf_text(source, span, DEBUG_TEXT_LIMIT) {
            out.push_str(" = \"");
            escape_into(out, text);
            out.push('"');
        }
    }
    out.push('\n');
}

fn debug_stmt(stmt: &Stmt, source: &str, depth: usize, out: &mut String) {
    let span = stmt.span();
    let pos = stmt.pos();
    let is_error = matches!(stmt, Stmt::Error { .. });
    let is_missing = matches!(stmt, Stmt::Missing { .. });
    let is_leaf = matches!(stmt, Stmt::Swap { .. } | Stmt::Read { .. } | Stmt::Missing { .. } | Stmt::Error { .. });
    debug_header(out, depth, stmt.node_name(), is_error, is_missing, pos, span, source, is_leaf);

    match *stmt {
        Stmt::Assign { value, .. } => {
            debug_expr(value, source, depth + 1, out);
        }
        Stmt::Swap { .. } | Stmt::Read { .. } | Stmt::Missing { .. } | Stmt::Error { .. } => {}
        Stmt::Write { values, .. } => {
            for value in values {
                debug_expr(value, source, depth + 1, out);
            }
        }
        Stmt::If { cond, then_branch, else_branch, .. } => {
            debug_expr(cond, source, depth + 1, out);
            for s in then_branch {
                debug_stmt(s, source, depth + 1, out);
            }
            if let Some(else_branch) = else_branch {
                for s in else_branch {
                    debug_stmt(s, source, depth + 1, out);
                }
            }
        }
        Stmt::For { start, stop, step, body, .. } => {
            debug_expr(start, source, depth + 1, out);
            debug_expr(stop, source, depth + 1, out);
            if let Some(step) = step {
                debug_expr(step, source, depth + 1, out);
            }
            for s in body {
                debug_stmt(s, source, depth + 1, out);
            }
        }
        Stmt::While { cond, body, .. } => {
            debug_expr(cond, source, depth + 1, out);
            for s in body {
                debug_stmt(s, source, depth + 1, out);
            }
        }
        Stmt::DoWhile { body, cond, .. } => {
            for s in body {
                debug_stmt(s, source, depth + 1, out);
            }
            debug_expr(cond, source, depth + 1, out);
        }
        Stmt::Repeat { body, until, .. } => {
            for s in body {
                debug_stmt(s, source, depth + 1, out);
            }
            debug_expr(until, source, depth + 1, out);
        }
    }
}

fn debug_expr(expr: &Expr, source: &str, depth: usize, out: &mut String) {
    let span = expr.span();
    // Expr carries no separate Pos; the span start doubles as its position
    // for debug-tree display purposes.
    let pos = Pos { row: 0, col: span.start };
    let is_error = matches!(expr, Expr::Error { .. });
    let is_missing = matches!(expr, Expr::Missing { .. });
    let is_leaf = matches!(expr, Expr::Literal { .. } | Expr::Identifier { .. } | Expr::Missing { .. } | Expr::Error { .. });
    debug_header(out, depth, expr.node_name(), is_error, is_missing, pos, span, source, is_leaf);

    match *expr {
        Expr::Literal { .. } | Expr::Identifier { .. } | Expr::Missing { .. } | Expr::Error { .. } => {}
        Expr::Or { left, right, .. }
        | Expr::And { left, right, .. }
        | Expr::Compare { left, right, .. }
        | Expr::Add { left, right, .. }
        | Expr::Mul { left, right, .. } => {
            debug_expr(left, source, depth + 1, out);
            debug_expr(right, source, depth + 1, out);
        }
        Expr::Not { operand, .. }
        | Expr::Neg { operand, .. }
        | Expr::Sqrt { operand, .. }
        | Expr::Floor { operand, .. }
        | Expr::Paren { inner: operand, .. } => {
            debug_expr(operand, source, depth + 1, out);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arena_ctx::AstContext;
    use crate::arena::Arena;
    use crate::intern::Interner;
    use crate::parser;

    fn parse_program<'a>(
        source: &str,
        stmts: &'a Arena<Stmt<'a>>,
        exprs: &'a Arena<Expr<'a>>,
        expr_refs: &'a Arena<&'a Expr<'a>>,
        names: &'a Arena<crate::intern::Symbol>,
        interner: &mut Interner,
    ) -> &'a [Stmt<'a>] {
        let ctx = AstContext::new(stmts, exprs, expr_refs, names);
        parser::parse(source, ctx, interner).program
    }

    #[test]
    fn pretty_tree_shows_assign_and_literal() {
        let stmts = Arena::new();
        let exprs = Arena::new();
        let expr_refs = Arena::new();
        let names = Arena::new();
        let mut interner = Interner::new();
        let program = parse_program("x <- 5\n", &stmts, &exprs, &expr_refs, &names, &mut interner);
        let tree = pretty_tree(program, "x <- 5\n");
        assert!(tree.contains("(assign"));
        assert!(tree.contains("(literal"));
        assert!(tree.contains("\"5\""));
    }

    #[test]
    fn debug_tree_marks_missing_expr() {
        let stmts = Arena::new();
        let exprs = Arena::new();
        let expr_refs = Arena::new();
        let names = Arena::new();
        let mut interner = Interner::new();
        let source = "daca atunci\n  scrie x\nsf\n";
        let program = parse_program(source, &stmts, &exprs, &expr_refs, &names, &mut interner);
        let tree = debug_tree(program, source);
        assert!(tree.contains("[MISSING]"));
    }

    #[test]
    fn pretty_tree_nests_if_branches() {
        let stmts = Arena::new();
        let exprs = Arena::new();
        let expr_refs = Arena::new();
        let names = Arena::new();
        let mut interner = Interner::new();
        let source = "daca x < 3 atunci\n  scrie x\naltfel\n  scrie 0\nsf\n";
        let program = parse_program(source, &stmts, &exprs, &expr_refs, &names, &mut interner);
        let tree = pretty_tree(program, source);
        assert!(tree.contains("(if"));
        assert!(tree.contains("(compare"));
        assert!(tree.contains("(write"));
    }
}
