use crate::style::Style;
use crate::suggest::{find_similar, KNOWN_WORDS};
use crate::token::{phrase_for, Pos, Span, TokenType};

/// What the parser was looking for when it gave up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Expected {
    Stmt,
    Expr,
    Token(TokenType),
}

impl Expected {
    fn phrase(self) -> &'static str {
        match self {
            Expected::Stmt => "instructiune",
            Expected::Expr => "expresie",
            Expected::Token(kind) => phrase_for(kind),
        }
    }
}

/// Classifies a syntax error as either a MISSING node (nothing consumable
/// was found where something was expected) or an ERROR node (something was
/// found, but not what was expected).
#[derive(Debug, Clone)]
pub enum ParseErrorKind {
    Missing { expected: Expected },
    Unexpected { found: String, expected: Expected },
}

#[derive(Debug, Clone)]
pub struct ParseError {
    pub kind: ParseErrorKind,
    pub span: Span,
    pub pos: Pos,
}

impl ParseError {
    pub fn missing(expected: Expected, span: Span, pos: Pos) -> ParseError {
        ParseError { kind: ParseErrorKind::Missing { expected }, span, pos }
    }

    pub fn unexpected(found: impl Into<String>, expected: Expected, span: Span, pos: Pos) -> ParseError {
        ParseError {
            kind: ParseErrorKind::Unexpected { found: found.into(), expected },
            span,
            pos,
        }
    }

    fn message(&self) -> String {
        match &self.kind {
            ParseErrorKind::Missing { expected } => {
                format!("lipseste {}", expected.phrase())
            }
            ParseErrorKind::Unexpected { found, expected } => {
                format!("gasit '{}', asteptat {}", found, expected.phrase())
            }
        }
    }

    /// Two-line excerpt around the error: the offending source line, then a
    /// caret underline. Tabs in the source line are preserved verbatim in
    /// the underline (a tab under a tab) so the caret still lines up in a
    /// terminal that renders tabs at their natural width.
    fn excerpt(&self, source: &str) -> (u32, String, String) {
        let line_start = source[..self.span.start as usize]
            .rfind('\n')
            .map(|i| i + 1)
            .unwrap_or(0);
        let line_end = source[self.span.start as usize..]
            .find('\n')
            .map(|i| i + self.span.start as usize)
            .unwrap_or(source.len());
        let line_content = &source[line_start..line_end];

        let col = (self.span.start as usize).saturating_sub(line_start);
        let len = (self.span.end.saturating_sub(self.span.start)).max(1) as usize;

        let mut underline = String::new();
        for (i, ch) in line_content.char_indices() {
            if i >= col + len {
                break;
            }
            if i >= col {
                underline.push('^');
            } else if ch == '\t' {
                underline.push('\t');
            } else {
                underline.push(' ');
            }
        }
        if underline.len() < col + 1 {
            underline.push_str(&" ".repeat(col + 1 - underline.len()));
            underline.push('^');
        }

        (self.pos.row, line_content.to_string(), underline)
    }

    fn extract_word<'a>(&self, source: &'a str) -> Option<&'a str> {
        let start = self.span.start as usize;
        let end = self.span.end as usize;
        if start >= source.len() || end > source.len() || start >= end {
            return None;
        }
        let slice = &source[start..end];
        let word: String = slice.chars().take_while(|c| c.is_alphanumeric()).collect();
        if word.is_empty() {
            None
        } else {
            slice.get(..word.len())
        }
    }

    /// Looks for an unterminated block-opening keyword before the error
    /// point and, if one is found, suggests closing it with `sf` — the
    /// most common mistake new students make.
    fn suggest_missing_sf(&self, source: &str) -> Option<&'static str> {
        if !matches!(
            &self.kind,
            ParseErrorKind::Missing { expected: Expected::Token(TokenType::Sf) }
                | ParseErrorKind::Missing { expected: Expected::Stmt }
        ) {
            return None;
        }
        let before = &source[..(self.span.start as usize).min(source.len())];
        const OPENERS: &[(&str, &str)] = &[
            ("daca", "blocul 'daca...atunci' se incheie cu 'sf'"),
            ("pentru", "blocul 'pentru...executa' se incheie cu 'sf'"),
            ("cat timp", "blocul 'cat timp...executa' se incheie cu 'sf'"),
            ("repeta", "blocul 'repeta' se incheie cu 'sf' dupa 'pana cand'"),
        ];
        OPENERS
            .iter()
            .rev()
            .find(|(kw, _)| before.contains(kw))
            .map(|(_, msg)| *msg)
    }

    pub fn display_with_source(&self, source: &str) -> String {
        let (line_num, line_content, underline) = self.excerpt(source);

        let error_label = Style::bold_red("eroare");
        let message = self.message();
        let line_num_str = Style::blue(&format!("{line_num:4}"));
        let pipe = Style::blue("|");
        let underline_colored = Style::red(&underline);

        let mut result = format!(
            "{error_label}: {message}\n\n{line_num_str} {pipe} {line_content}\n     {pipe} {underline_colored}"
        );

        if let Some(hint) = self.suggest_missing_sf(source) {
            let help = Style::cyan("ajutor");
            result.push_str(&format!("\n     {pipe} {help}: {hint}"));
        } else if let Some(word) = self.extract_word(source) {
            if let Some(suggestion) = find_similar(word, KNOWN_WORDS, 2) {
                let help = Style::cyan("ajutor");
                result.push_str(&format!(
                    "\n     {pipe} {help}: poate ai vrut sa scrii '{}'?",
                    Style::green(suggestion)
                ));
            }
        }

        result
    }
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for ParseError {}
