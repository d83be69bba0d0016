//! Converts normalized source text into a flat token stream for the parser.

use crate::intern::Interner;
use crate::token::{keyword_kind, Pos, Span, Token, TokenType};

pub struct Lexer<'a> {
    source: &'a str,
    bytes: &'a [u8],
    pos: usize,
    row: u32,
    col: u32,
}

impl<'a> Lexer<'a> {
    pub fn new(source: &'a str) -> Lexer<'a> {
        Lexer { source, bytes: source.as_bytes(), pos: 0, row: 1, col: 1 }
    }

    fn peek(&self) -> Option<u8> {
        self.bytes.get(self.pos).copied()
    }

    fn peek_at(&self, offset: usize) -> Option<u8> {
        self.bytes.get(self.pos + offset).copied()
    }

    fn advance(&mut self) -> Option<u8> {
        let b = self.peek()?;
        self.pos += 1;
        if b == b'\n' {
            self.row += 1;
            self.col = 1;
        } else {
            self.col += 1;
        }
        Some(b)
    }

    fn make_token(&self, kind: TokenType, start: usize, start_pos: Pos, text: Option<crate::intern::Symbol>, int_value: i64, real_value: f64) -> Token {
        Token {
            kind,
            span: Span { start: start as u32, end: self.pos as u32 },
            pos: start_pos,
            text,
            int_value,
            real_value,
        }
    }

    pub fn tokenize(&mut self, interner: &mut Interner) -> Vec<Token> {
        let mut tokens = Vec::new();
        loop {
            // skip spaces and tabs, but not newlines
            while matches!(self.peek(), Some(b' ') | Some(b'\t') | Some(b'\r')) {
                self.advance();
            }
            // line comments starting with '#'
            if self.peek() == Some(b'#') {
                while self.peek().is_some() && self.peek() != Some(b'\n') {
                    self.advance();
                }
            }

            let start = self.pos;
            let start_pos = Pos { row: self.row, col: self.col };

            let Some(b) = self.peek() else {
                tokens.push(self.make_token(TokenType::Eof, start, start_pos, None, 0, 0.0));
                break;
            };

            match b {
                b'\n' => {
                    self.advance();
                    tokens.push(self.make_token(TokenType::Newline, start, start_pos, None, 0, 0.0));
                }
                b'0'..=b'9' => {
                    tokens.push(self.lex_number(start, start_pos));
                }
                b'"' => {
                    tokens.push(self.lex_string(start, start_pos, interner));
                }
                b'=' => {
                    self.advance();
                    tokens.push(self.make_token(TokenType::Eq, start, start_pos, None, 0, 0.0));
                }
                b'!' => {
                    self.advance();
                    if self.peek() == Some(b'=') {
                        self.advance();
                        tokens.push(self.make_token(TokenType::NotEq, start, start_pos, None, 0, 0.0));
                    } else {
                        tokens.push(self.make_token(TokenType::Eof, start, start_pos, None, 0, 0.0));
                    }
                }
                b'+' => {
                    self.advance();
                    tokens.push(self.make_token(TokenType::Plus, start, start_pos, None, 0, 0.0));
                }
                b'-' => {
                    self.advance();
                    if self.peek() == Some(b'>') {
                        self.advance();
                        tokens.push(self.make_token(TokenType::Arrow, start, start_pos, None, 0, 0.0));
                    } else {
                        tokens.push(self.make_token(TokenType::Minus, start, start_pos, None, 0, 0.0));
                    }
                }
                b'*' => {
                    self.advance();
                    tokens.push(self.make_token(TokenType::Star, start, start_pos, None, 0, 0.0));
                }
                b'/' => {
                    self.advance();
                    tokens.push(self.make_token(TokenType::Slash, start, start_pos, None, 0, 0.0));
                }
                b'%' => {
                    self.advance();
                    tokens.push(self.make_token(TokenType::Percent, start, start_pos, None, 0, 0.0));
                }
                b',' => {
                    self.advance();
                    tokens.push(self.make_token(TokenType::Comma, start, start_pos, None, 0, 0.0));
                }
                b'(' => {
                    self.advance();
                    tokens.push(self.make_token(TokenType::LParen, start, start_pos, None, 0, 0.0));
                }
                b')' => {
                    self.advance();
                    tokens.push(self.make_token(TokenType::RParen, start, start_pos, None, 0, 0.0));
                }
                b'[' => {
                    self.advance();
                    tokens.push(self.make_token(TokenType::LBracket, start, start_pos, None, 0, 0.0));
                }
                b']' => {
                    self.advance();
                    tokens.push(self.make_token(TokenType::RBracket, start, start_pos, None, 0, 0.0));
                }
                b'<' => {
                    self.advance();
                    if self.peek() == Some(b'-') {
                        self.advance();
                        if self.peek() == Some(b'>') {
                            self.advance();
                            tokens.push(self.make_token(TokenType::Swap, start, start_pos, None, 0, 0.0));
                        } else {
                            tokens.push(self.make_token(TokenType::Assign, start, start_pos, None, 0, 0.0));
                        }
                    } else if self.peek() == Some(b'=') {
                        self.advance();
                        tokens.push(self.make_token(TokenType::LtEq, start, start_pos, None, 0, 0.0));
                    } else {
                        tokens.push(self.make_token(TokenType::Lt, start, start_pos, None, 0, 0.0));
                    }
                }
                b'>' => {
                    self.advance();
                    if self.peek() == Some(b'=') {
                        self.advance();
                        tokens.push(self.make_token(TokenType::GtEq, start, start_pos, None, 0, 0.0));
                    } else {
                        tokens.push(self.make_token(TokenType::Gt, start, start_pos, None, 0, 0.0));
                    }
                }
                c if c.is_ascii_alphabetic() || c == b'_' => {
                    tokens.push(self.lex_word(start, start_pos, interner));
                }
                _ => {
                    // Unrecognized byte: consume it as its own token so the
                    // parser can report it rather than looping forever.
                    self.advance();
                    tokens.push(self.make_token(TokenType::Eof, start, start_pos, None, 0, 0.0));
                }
            }
        }
        tokens
    }

    fn lex_number(&mut self, start: usize, start_pos: Pos) -> Token {
        while matches!(self.peek(), Some(b'0'..=b'9')) {
            self.advance();
        }
        let mut is_real = false;
        if self.peek() == Some(b'.') && matches!(self.peek_at(1), Some(b'0'..=b'9')) {
            is_real = true;
            self.advance();
            while matches!(self.peek(), Some(b'0'..=b'9')) {
                self.advance();
            }
        }
        let text = &self.source[start..self.pos];
        if is_real {
            let value: f64 = text.parse().unwrap_or(0.0);
            self.make_token(TokenType::Real, start, start_pos, None, 0, value)
        } else {
            let value: i64 = text.parse().unwrap_or(0);
            self.make_token(TokenType::Number, start, start_pos, None, value, 0.0)
        }
    }

    fn lex_string(&mut self, start: usize, start_pos: Pos, interner: &mut Interner) -> Token {
        self.advance(); // opening quote
        let mut value = String::new();
        loop {
            match self.peek() {
                None | Some(b'\n') => break,
                Some(b'"') => {
                    self.advance();
                    break;
                }
                Some(_) => {
                    let ch_start = self.pos;
                    self.advance();
                    value.push_str(&self.source[ch_start..self.pos]);
                }
            }
        }
        let sym = interner.intern(&value);
        self.make_token(TokenType::String, start, start_pos, Some(sym), 0, 0.0)
    }

    fn lex_word(&mut self, start: usize, start_pos: Pos, interner: &mut Interner) -> Token {
        while matches!(self.peek(), Some(c) if c.is_ascii_alphanumeric() || c == b'_') {
            self.advance();
        }
        let text = &self.source[start..self.pos];
        if let Some(kind) = keyword_kind(text) {
            self.make_token(kind, start, start_pos, None, 0, 0.0)
        } else {
            let sym = interner.intern(text);
            self.make_token(TokenType::Identifier, start, start_pos, Some(sym), 0, 0.0)
        }
    }
}

pub fn tokenize(source: &str, interner: &mut Interner) -> Vec<Token> {
    Lexer::new(source).tokenize(interner)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::TokenType::*;

    fn kinds(source: &str) -> Vec<TokenType> {
        let mut interner = Interner::new();
        tokenize(source, &mut interner).iter().map(|t| t.kind).collect()
    }

    #[test]
    fn tokenizes_assignment() {
        assert_eq!(kinds("x <- 5\n"), vec![Identifier, Assign, Number, Newline, Eof]);
    }

    #[test]
    fn tokenizes_swap_and_arrow() {
        assert_eq!(kinds("x <-> y\n"), vec![Identifier, Swap, Identifier, Newline, Eof]);
        assert_eq!(kinds("x -> y\n"), vec![Identifier, Arrow, Identifier, Newline, Eof]);
    }

    #[test]
    fn tokenizes_keywords() {
        assert_eq!(kinds("daca atunci altfel sf\n"), vec![Daca, Atunci, Altfel, Sf, Newline, Eof]);
    }

    #[test]
    fn tokenizes_real_literal() {
        assert_eq!(kinds("3.5\n"), vec![Real, Newline, Eof]);
    }

    #[test]
    fn tokenizes_string_literal() {
        let mut interner = Interner::new();
        let tokens = tokenize("\"salut\"\n", &mut interner);
        assert_eq!(tokens[0].kind, TokenType::String);
        assert!(tokens[0].text.unwrap().is(&interner, "salut"));
    }

    #[test]
    fn tokenizes_comparison_operators() {
        assert_eq!(kinds("<= >= != = < >\n"), vec![LtEq, GtEq, NotEq, Eq, Lt, Gt, Newline, Eof]);
    }

    #[test]
    fn skips_comments() {
        assert_eq!(kinds("x <- 1 # un comentariu\n"), vec![Identifier, Assign, Number, Newline, Eof]);
    }

    #[test]
    fn tracks_row_and_column() {
        let mut interner = Interner::new();
        let tokens = tokenize("x\ny\n", &mut interner);
        assert_eq!(tokens[0].pos, Pos { row: 1, col: 1 });
        assert_eq!(tokens[2].pos, Pos { row: 2, col: 1 });
    }
}
