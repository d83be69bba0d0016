use crate::arena::Arena;
use crate::ast::{Expr, Stmt};
use crate::intern::Symbol;

/// Owns the bump arenas backing a single program's AST. Statements and
/// expressions are arena-allocated so the parser can build the tree without
/// threading ownership through recursive descent.
#[derive(Clone, Copy)]
pub struct AstContext<'a> {
    pub stmts: &'a Arena<Stmt<'a>>,
    pub exprs: &'a Arena<Expr<'a>>,
    pub expr_refs: &'a Arena<&'a Expr<'a>>,
    pub names: &'a Arena<Symbol>,
}

impl<'a> AstContext<'a> {
    pub fn new(
        stmts: &'a Arena<Stmt<'a>>,
        exprs: &'a Arena<Expr<'a>>,
        expr_refs: &'a Arena<&'a Expr<'a>>,
        names: &'a Arena<Symbol>,
    ) -> Self {
        AstContext { stmts, exprs, expr_refs, names }
    }

    pub fn alloc_stmt(&self, stmt: Stmt<'a>) -> &'a Stmt<'a> {
        self.stmts.alloc(stmt)
    }

    pub fn alloc_stmts<I>(&self, stmts: I) -> &'a [Stmt<'a>]
    where
        I: IntoIterator<Item = Stmt<'a>>,
        I::IntoIter: ExactSizeIterator,
    {
        self.stmts.alloc_slice(stmts)
    }

    pub fn alloc_expr(&self, expr: Expr<'a>) -> &'a Expr<'a> {
        self.exprs.alloc(expr)
    }

    /// Allocates a list of expression references, used for `Write` statement
    /// value lists.
    pub fn alloc_expr_list<I>(&self, exprs: I) -> &'a [&'a Expr<'a>]
    where
        I: IntoIterator<Item = &'a Expr<'a>>,
        I::IntoIter: ExactSizeIterator,
    {
        self.expr_refs.alloc_slice(exprs)
    }

    /// Allocates a list of identifiers, used for `Read` statement targets.
    pub fn alloc_name_list<I>(&self, names: I) -> &'a [Symbol]
    where
        I: IntoIterator<Item = Symbol>,
        I::IntoIter: ExactSizeIterator,
    {
        self.names.alloc_slice(names)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{Literal, Span};
    use crate::intern::Interner;

    #[test]
    fn alloc_stmt_returns_stable_reference() {
        let stmt_arena: Arena<Stmt> = Arena::new();
        let expr_arena: Arena<Expr> = Arena::new();
        let expr_ref_arena: Arena<&Expr> = Arena::new();
        let name_arena: Arena<Symbol> = Arena::new();
        let ctx = AstContext::new(&stmt_arena, &expr_arena, &expr_ref_arena, &name_arena);

        let mut interner = Interner::new();
        let x = interner.intern("x");
        let lit = ctx.alloc_expr(Expr::Literal {
            value: Literal::Number(5),
            span: Span::new(0, 1),
        });
        let stmt = ctx.alloc_stmt(Stmt::Assign {
            name: x,
            value: lit,
            span: Span::new(0, 5),
            pos: crate::ast::Pos { row: 1, col: 1 },
        });

        assert!(matches!(stmt, Stmt::Assign { .. }));
    }

    #[test]
    fn alloc_stmts_preserves_order() {
        let stmt_arena: Arena<Stmt> = Arena::new();
        let expr_arena: Arena<Expr> = Arena::new();
        let expr_ref_arena: Arena<&Expr> = Arena::new();
        let name_arena: Arena<Symbol> = Arena::new();
        let ctx = AstContext::new(&stmt_arena, &expr_arena, &expr_ref_arena, &name_arena);

        let mut interner = Interner::new();
        let x = interner.intern("x");
        let y = interner.intern("y");
        let span = Span::new(0, 1);
        let pos = crate::ast::Pos { row: 1, col: 1 };
        let lit = ctx.alloc_expr(Expr::Literal { value: Literal::Number(1), span });

        let block = ctx.alloc_stmts(vec![
            Stmt::Assign { name: x, value: lit, span, pos },
            Stmt::Assign { name: y, value: lit, span, pos },
        ]);

        assert_eq!(block.len(), 2);
        match (&block[0], &block[1]) {
            (Stmt::Assign { name: a, .. }, Stmt::Assign { name: b, .. }) => {
                assert!(a.is(&interner, "x"));
                assert!(b.is(&interner, "y"));
            }
            _ => panic!("expected assign statements"),
        }
    }
}
