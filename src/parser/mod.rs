//! Recursive-descent parser producing the AST in `crate::ast`. On malformed
//! input it synthesizes `Missing`/`Error` nodes and resynchronizes at the
//! next newline rather than aborting, so the `parse`/`debug` CLI commands
//! can still show a tree for broken programs.

use crate::arena_ctx::AstContext;
use crate::ast::{AddOp, CompareOp, Expr, Literal, MulOp, Pos, Span, Stmt};
use crate::error::{Expected, ParseError};
use crate::intern::{Interner, Symbol};
use crate::lexer;
use crate::token::{Token, TokenType};

pub struct Parser<'a, 'ctx> {
    tokens: Vec<Token>,
    pos: usize,
    ctx: AstContext<'ctx>,
    #[allow(dead_code)]
    interner: &'a mut Interner,
    pub errors: Vec<ParseError>,
}

pub struct ParseOutput<'ctx> {
    pub program: &'ctx [Stmt<'ctx>],
    pub errors: Vec<ParseError>,
}

pub fn parse<'ctx>(source: &str, ctx: AstContext<'ctx>, interner: &mut Interner) -> ParseOutput<'ctx> {
    let tokens = lexer::tokenize(source, interner);
    let mut parser = Parser { tokens, pos: 0, ctx, interner, errors: Vec::new() };
    let program = parser.parse_program();
    ParseOutput { program, errors: parser.errors }
}

impl<'a, 'ctx> Parser<'a, 'ctx> {
    fn current(&self) -> &Token {
        &self.tokens[self.pos.min(self.tokens.len() - 1)]
    }

    fn kind(&self) -> TokenType {
        self.current().kind
    }

    fn at_end(&self) -> bool {
        self.kind() == TokenType::Eof
    }

    fn advance(&mut self) -> Token {
        let tok = *self.current();
        if self.pos < self.tokens.len() - 1 {
            self.pos += 1;
        }
        tok
    }

    fn check(&self, kind: TokenType) -> bool {
        self.kind() == kind
    }

    fn accept(&mut self, kind: TokenType) -> Option<Token> {
        if self.check(kind) {
            Some(self.advance())
        } else {
            None
        }
    }

    fn skip_newlines(&mut self) {
        while self.check(TokenType::Newline) {
            self.advance();
        }
    }

    fn span_from(&self, start: &Token) -> Span {
        Span::new(start.span.start, self.current().span.start)
    }

    fn pos_of(&self, tok: &Token) -> Pos {
        Pos { row: tok.pos.row, col: tok.pos.col }
    }

    /// Resynchronizes to the next newline (or EOF) so one bad statement
    /// doesn't cascade into spurious errors for the rest of the block.
    fn resync_to_newline(&mut self) {
        while !self.check(TokenType::Newline) && !self.at_end() {
            self.advance();
        }
    }

    fn record_missing(&mut self, expected: Expected, at: &Token) -> (Span, Pos) {
        let span = Span::new(at.span.start, at.span.start);
        let pos = self.pos_of(at);
        self.errors.push(ParseError::missing(expected, span, pos));
        (span, pos)
    }

    fn expect(&mut self, kind: TokenType, expected: Expected) -> Token {
        if let Some(tok) = self.accept(kind) {
            tok
        } else {
            let at = *self.current();
            self.record_missing(expected, &at);
            at
        }
    }

    pub fn parse_program(&mut self) -> &'ctx [Stmt<'ctx>] {
        let mut stmts = Vec::new();
        self.skip_newlines();
        while !self.at_end() {
            let stmt = self.parse_stmt();
            stmts.push(stmt);
            self.skip_newlines();
        }
        self.ctx.alloc_stmts(stmts)
    }

    fn parse_block_until(&mut self, terminators: &[TokenType]) -> &'ctx [Stmt<'ctx>] {
        let mut stmts = Vec::new();
        self.skip_newlines();
        while !self.at_end() && !terminators.contains(&self.kind()) {
            let stmt = self.parse_stmt();
            stmts.push(stmt);
            self.skip_newlines();
        }
        self.ctx.alloc_stmts(stmts)
    }

    fn parse_stmt(&mut self) -> Stmt<'ctx> {
        let start = *self.current();
        match self.kind() {
            TokenType::Daca => self.parse_if(),
            TokenType::Pentru => self.parse_for(),
            TokenType::Cat => self.parse_while(),
            TokenType::Executa => self.parse_do_while(),
            TokenType::Repeta => self.parse_repeat(),
            TokenType::Citeste => self.parse_read(),
            TokenType::Scrie => self.parse_write(),
            TokenType::Identifier => self.parse_assign_or_swap(),
            _ => {
                let (span, pos) = self.record_missing(Expected::Stmt, &start);
                self.resync_to_newline();
                Stmt::Error { span, pos }
            }
        }
    }

    fn parse_if(&mut self) -> Stmt<'ctx> {
        let start = self.advance(); // daca
        let cond = self.parse_expr();
        self.expect(TokenType::Atunci, Expected::Token(TokenType::Atunci));
        let then_branch = self.parse_block_until(&[TokenType::Altfel, TokenType::Sf]);
        let else_branch = if self.accept(TokenType::Altfel).is_some() {
            Some(self.parse_block_until(&[TokenType::Sf]))
        } else {
            None
        };
        self.expect(TokenType::Sf, Expected::Token(TokenType::Sf));
        Stmt::If {
            cond,
            then_branch,
            else_branch,
            span: self.span_from(&start),
            pos: self.pos_of(&start),
        }
    }

    fn parse_for(&mut self) -> Stmt<'ctx> {
        let start = self.advance(); // pentru
        let name_tok = self.expect(TokenType::Identifier, Expected::Token(TokenType::Identifier));
        let var = name_tok.text.unwrap_or(Symbol::EMPTY);
        self.expect(TokenType::Assign, Expected::Token(TokenType::Assign));
        let from = self.parse_expr();
        self.expect(TokenType::Comma, Expected::Token(TokenType::Comma));
        let to = self.parse_expr();
        let step = if self.accept(TokenType::Comma).is_some() {
            Some(self.parse_expr())
        } else {
            None
        };
        self.expect(TokenType::Executa, Expected::Token(TokenType::Executa));
        let body = self.parse_block_until(&[TokenType::Sf]);
        self.expect(TokenType::Sf, Expected::Token(TokenType::Sf));
        Stmt::For {
            var,
            start: from,
            stop: to,
            step,
            body,
            span: self.span_from(&start),
            pos: self.pos_of(&start),
        }
    }

    fn parse_while(&mut self) -> Stmt<'ctx> {
        let start = self.advance(); // cat
        self.expect(TokenType::Timp, Expected::Token(TokenType::Timp));
        let cond = self.parse_expr();
        self.expect(TokenType::Executa, Expected::Token(TokenType::Executa));
        let body = self.parse_block_until(&[TokenType::Sf]);
        self.expect(TokenType::Sf, Expected::Token(TokenType::Sf));
        Stmt::While { cond, body, span: self.span_from(&start), pos: self.pos_of(&start) }
    }

    fn parse_do_while(&mut self) -> Stmt<'ctx> {
        let start = self.advance(); // executa
        let body = self.parse_block_until(&[TokenType::Sf]);
        self.expect(TokenType::Sf, Expected::Token(TokenType::Sf));
        self.expect(TokenType::Cat, Expected::Token(TokenType::Cat));
        self.expect(TokenType::Timp, Expected::Token(TokenType::Timp));
        let cond = self.parse_expr();
        Stmt::DoWhile { body, cond, span: self.span_from(&start), pos: self.pos_of(&start) }
    }

    fn parse_repeat(&mut self) -> Stmt<'ctx> {
        let start = self.advance(); // repeta
        let body = self.parse_block_until(&[TokenType::Pana]);
        self.expect(TokenType::Pana, Expected::Token(TokenType::Pana));
        self.expect(TokenType::Cand, Expected::Token(TokenType::Cand));
        let until = self.parse_expr();
        Stmt::Repeat { body, until, span: self.span_from(&start), pos: self.pos_of(&start) }
    }

    fn parse_read(&mut self) -> Stmt<'ctx> {
        let start = self.advance(); // citeste
        let mut names = Vec::new();
        loop {
            let tok = self.expect(TokenType::Identifier, Expected::Token(TokenType::Identifier));
            names.push(tok.text.unwrap_or(Symbol::EMPTY));
            if self.accept(TokenType::Comma).is_none() {
                break;
            }
        }
        Stmt::Read {
            names: self.ctx.alloc_name_list(names),
            span: self.span_from(&start),
            pos: self.pos_of(&start),
        }
    }

    fn parse_write(&mut self) -> Stmt<'ctx> {
        let start = self.advance(); // scrie
        let mut values = Vec::new();
        values.push(self.parse_expr());
        while self.accept(TokenType::Comma).is_some() {
            values.push(self.parse_expr());
        }
        Stmt::Write {
            values: self.ctx.alloc_expr_list(values),
            span: self.span_from(&start),
            pos: self.pos_of(&start),
        }
    }

    fn parse_assign_or_swap(&mut self) -> Stmt<'ctx> {
        let start = self.advance(); // identifier
        let first = start.text.unwrap_or(Symbol::EMPTY);

        if self.accept(TokenType::Swap).is_some() {
            let second_tok = self.expect(TokenType::Identifier, Expected::Token(TokenType::Identifier));
            let second = second_tok.text.unwrap_or(Symbol::EMPTY);
            return Stmt::Swap {
                left: first,
                right: second,
                span: self.span_from(&start),
                pos: self.pos_of(&start),
            };
        }

        self.expect(TokenType::Assign, Expected::Token(TokenType::Assign));
        let value = self.parse_expr();
        Stmt::Assign { name: first, value, span: self.span_from(&start), pos: self.pos_of(&start) }
    }

    fn parse_expr(&mut self) -> &'ctx Expr<'ctx> {
        self.parse_or()
    }

    fn parse_or(&mut self) -> &'ctx Expr<'ctx> {
        let mut left = self.parse_and();
        while self.check(TokenType::Sau) {
            let start = self.current().span.start;
            self.advance();
            let right = self.parse_and();
            left = self.ctx.alloc_expr(Expr::Or { left, right, span: Span::new(start, self.current().span.start) });
        }
        left
    }

    fn parse_and(&mut self) -> &'ctx Expr<'ctx> {
        let mut left = self.parse_not();
        while self.check(TokenType::Si) {
            let start = self.current().span.start;
            self.advance();
            let right = self.parse_not();
            left = self.ctx.alloc_expr(Expr::And { left, right, span: Span::new(start, self.current().span.start) });
        }
        left
    }

    fn parse_not(&mut self) -> &'ctx Expr<'ctx> {
        if self.check(TokenType::Non) {
            let start = self.advance();
            let operand = self.parse_not();
            self.ctx.alloc_expr(Expr::Not { operand, span: self.span_from(&start) })
        } else {
            self.parse_compare()
        }
    }

    fn parse_compare(&mut self) -> &'ctx Expr<'ctx> {
        let left = self.parse_add();
        let op = match self.kind() {
            TokenType::Eq => CompareOp::Eq,
            TokenType::NotEq => CompareOp::NotEq,
            TokenType::Lt => CompareOp::Lt,
            TokenType::Gt => CompareOp::Gt,
            TokenType::LtEq => CompareOp::LtEq,
            TokenType::GtEq => CompareOp::GtEq,
            _ => return left,
        };
        let start = self.current().span.start;
        self.advance();
        let right = self.parse_add();
        self.ctx.alloc_expr(Expr::Compare { op, left, right, span: Span::new(start, self.current().span.start) })
    }

    fn parse_add(&mut self) -> &'ctx Expr<'ctx> {
        let mut left = self.parse_mul();
        loop {
            let op = match self.kind() {
                TokenType::Plus => AddOp::Add,
                TokenType::Minus => AddOp::Sub,
                _ => break,
            };
            let start = self.current().span.start;
            self.advance();
            let right = self.parse_mul();
            left = self.ctx.alloc_expr(Expr::Add { op, left, right, span: Span::new(start, self.current().span.start) });
        }
        left
    }

    fn parse_mul(&mut self) -> &'ctx Expr<'ctx> {
        let mut left = self.parse_unary();
        loop {
            let op = match self.kind() {
                TokenType::Star => MulOp::Mul,
                TokenType::Slash => MulOp::Div,
                TokenType::Percent => MulOp::Mod,
                _ => break,
            };
            let start = self.current().span.start;
            self.advance();
            let right = self.parse_unary();
            left = self.ctx.alloc_expr(Expr::Mul { op, left, right, span: Span::new(start, self.current().span.start) });
        }
        left
    }

    fn parse_unary(&mut self) -> &'ctx Expr<'ctx> {
        match self.kind() {
            TokenType::Minus => {
                let start = self.advance();
                let operand = self.parse_unary();
                self.ctx.alloc_expr(Expr::Neg { operand, span: self.span_from(&start) })
            }
            TokenType::Radical => {
                let start = self.advance();
                let operand = self.parse_unary();
                self.ctx.alloc_expr(Expr::Sqrt { operand, span: self.span_from(&start) })
            }
            _ => self.parse_primary(),
        }
    }

    fn parse_primary(&mut self) -> &'ctx Expr<'ctx> {
        let tok = *self.current();
        match tok.kind {
            TokenType::Number => {
                self.advance();
                self.ctx.alloc_expr(Expr::Literal { value: Literal::Number(tok.int_value), span: tok.span })
            }
            TokenType::Real => {
                self.advance();
                self.ctx.alloc_expr(Expr::Literal { value: Literal::Real(tok.real_value), span: tok.span })
            }
            TokenType::String => {
                self.advance();
                self.ctx.alloc_expr(Expr::Literal { value: Literal::Text(tok.text.unwrap_or(Symbol::EMPTY)), span: tok.span })
            }
            TokenType::Identifier => {
                self.advance();
                self.ctx.alloc_expr(Expr::Identifier { name: tok.text.unwrap_or(Symbol::EMPTY), span: tok.span })
            }
            TokenType::LParen => {
                self.advance();
                let inner = self.parse_expr();
                self.expect(TokenType::RParen, Expected::Token(TokenType::RParen));
                self.ctx.alloc_expr(Expr::Paren { inner, span: self.span_from(&tok) })
            }
            TokenType::LBracket => {
                self.advance();
                let inner = self.parse_expr();
                self.expect(TokenType::RBracket, Expected::Token(TokenType::RBracket));
                self.ctx.alloc_expr(Expr::Floor { operand: inner, span: self.span_from(&tok) })
            }
            _ => {
                self.errors.push(ParseError::missing(Expected::Expr, tok.span, self.pos_of(&tok)));
                self.ctx.alloc_expr(Expr::Missing { span: tok.span })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arena::Arena;
    use crate::intern::SymbolEq;

    fn with_arenas<F, R>(source: &str, f: F) -> R
    where
        F: for<'ctx> FnOnce(ParseOutput<'ctx>, &Interner) -> R,
    {
        let stmt_arena: Arena<Stmt> = Arena::new();
        let expr_arena: Arena<Expr> = Arena::new();
        let expr_ref_arena: Arena<&Expr> = Arena::new();
        let name_arena: Arena<Symbol> = Arena::new();
        let ctx = AstContext::new(&stmt_arena, &expr_arena, &expr_ref_arena, &name_arena);
        let mut interner = Interner::new();
        let output = parse(source, ctx, &mut interner);
        f(output, &interner)
    }

    #[test]
    fn parses_simple_assignment() {
        with_arenas("x <- 5\n", |out, _| {
            assert!(out.errors.is_empty());
            assert_eq!(out.program.len(), 1);
            assert!(matches!(out.program[0], Stmt::Assign { .. }));
        });
    }

    #[test]
    fn parses_if_without_else() {
        with_arenas("daca x < 3 atunci\nscrie x\nsf\n", |out, _| {
            assert!(out.errors.is_empty());
            assert!(matches!(out.program[0], Stmt::If { else_branch: None, .. }));
        });
    }

    #[test]
    fn parses_if_with_else() {
        with_arenas("daca x < 3 atunci\nscrie x\naltfel\nscrie 0\nsf\n", |out, _| {
            assert!(out.errors.is_empty());
            assert!(matches!(out.program[0], Stmt::If { else_branch: Some(_), .. }));
        });
    }

    #[test]
    fn parses_for_loop() {
        with_arenas("pentru i <- 1, 10 executa\nscrie i\nsf\n", |out, _| {
            assert!(out.errors.is_empty());
            assert!(matches!(out.program[0], Stmt::For { step: None, .. }));
        });
    }

    #[test]
    fn parses_repeat_until() {
        with_arenas("repeta\nx <- x + 1\npana cand x = 10\n", |out, _| {
            assert!(out.errors.is_empty());
            assert!(matches!(out.program[0], Stmt::Repeat { .. }));
        });
    }

    #[test]
    fn missing_sf_reports_missing_error() {
        with_arenas("daca x < 3 atunci\nscrie x\n", |out, _| {
            assert!(!out.errors.is_empty());
        });
    }

    #[test]
    fn parses_operator_precedence() {
        with_arenas("x <- 1 + 2 * 3\n", |out, _| {
            assert!(out.errors.is_empty());
            if let Stmt::Assign { value, .. } = &out.program[0] {
                assert!(matches!(value, Expr::Add { .. }));
            } else {
                panic!("expected assign");
            }
        });
    }

    #[test]
    fn parses_floor_brackets() {
        with_arenas("x <- [3.5]\n", |out, _| {
            assert!(out.errors.is_empty());
            if let Stmt::Assign { value, .. } = &out.program[0] {
                assert!(matches!(value, Expr::Floor { .. }));
            } else {
                panic!("expected assign");
            }
        });
    }

    #[test]
    fn parses_swap() {
        with_arenas("x <-> y\n", |out, interner| {
            assert!(out.errors.is_empty());
            assert_eq!(out.program.len(), 1);
            match &out.program[0] {
                Stmt::Swap { left, right, .. } => {
                    assert!(left.is(interner, "x"));
                    assert!(right.is(interner, "y"));
                }
                other => panic!("expected swap, got {other:?}"),
            }
        });
    }

    #[test]
    fn parses_logical_operators() {
        with_arenas("daca x sau y si non z atunci\nscrie 1\nsf\n", |out, _| {
            assert!(out.errors.is_empty());
        });
    }
}
