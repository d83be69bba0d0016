//! Lexical tokens consumed by the parser. Lexing happens after the source
//! has already passed through the normalizer, so keywords and operators are
//! always in their plain-ASCII spelling here.

use crate::intern::Symbol;

pub use crate::ast::{Pos, Span};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenType {
    // Keywords
    Daca,
    Atunci,
    Altfel,
    Sf,
    Pentru,
    Executa,
    Cat,
    Timp,
    Repeta,
    Pana,
    Cand,
    Citeste,
    Scrie,
    Sau,
    Si,
    Non,
    Radical,

    // Literals
    Identifier,
    Number,
    Real,
    String,

    // Operators and punctuation
    Assign, // <-
    Arrow,  // ->
    Swap,   // <->
    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    Eq, // =
    NotEq, // !=
    Lt,
    Gt,
    LtEq,
    GtEq,
    Comma,
    LParen,
    RParen,
    LBracket,
    RBracket,

    Newline,
    Eof,
}

#[derive(Debug, Clone, Copy)]
pub struct Token {
    pub kind: TokenType,
    pub span: Span,
    pub pos: Pos,
    /// Populated for Identifier/String tokens.
    pub text: Option<Symbol>,
    /// Populated for Number/Real tokens.
    pub int_value: i64,
    pub real_value: f64,
}

pub fn keyword_kind(word: &str) -> Option<TokenType> {
    Some(match word {
        "daca" => TokenType::Daca,
        "atunci" => TokenType::Atunci,
        "altfel" => TokenType::Altfel,
        "sf" => TokenType::Sf,
        "pentru" => TokenType::Pentru,
        "executa" => TokenType::Executa,
        "cat" => TokenType::Cat,
        "timp" => TokenType::Timp,
        "repeta" => TokenType::Repeta,
        "pana" => TokenType::Pana,
        "cand" => TokenType::Cand,
        "citeste" => TokenType::Citeste,
        "scrie" => TokenType::Scrie,
        "sau" => TokenType::Sau,
        "si" => TokenType::Si,
        "non" => TokenType::Non,
        "radical" => TokenType::Radical,
        _ => return None,
    })
}

/// Romanian phrase shown in diagnostics for each token kind.
pub fn phrase_for(kind: TokenType) -> &'static str {
    match kind {
        TokenType::Sf => "'sf' (sfarsit bloc)",
        TokenType::Atunci => "'atunci'",
        TokenType::Altfel => "'altfel'",
        TokenType::Daca => "'daca'",
        TokenType::Executa => "'executa'",
        TokenType::Pentru => "'pentru'",
        TokenType::Repeta => "'repeta'",
        TokenType::Pana => "'pana'",
        TokenType::Cand => "'cand'",
        TokenType::Cat => "'cat'",
        TokenType::Identifier => "un identificator",
        TokenType::Number | TokenType::Real => "un numar",
        TokenType::String => "un sir de caractere",
        _ => "un token",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keyword_kind_recognizes_daca() {
        assert_eq!(keyword_kind("daca"), Some(TokenType::Daca));
    }

    #[test]
    fn keyword_kind_rejects_identifier() {
        assert_eq!(keyword_kind("suma"), None);
    }

    #[test]
    fn phrase_for_sf_mentions_block_end() {
        assert_eq!(phrase_for(TokenType::Sf), "'sf' (sfarsit bloc)");
    }
}
