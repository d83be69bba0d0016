//! Minimal ANSI color helpers for terminal diagnostics.

pub struct Style;

impl Style {
    pub fn bold_red(s: &str) -> String {
        format!("\x1b[1;31m{s}\x1b[0m")
    }

    pub fn red(s: &str) -> String {
        format!("\x1b[31m{s}\x1b[0m")
    }

    pub fn blue(s: &str) -> String {
        format!("\x1b[34m{s}\x1b[0m")
    }

    pub fn cyan(s: &str) -> String {
        format!("\x1b[36m{s}\x1b[0m")
    }

    pub fn green(s: &str) -> String {
        format!("\x1b[32m{s}\x1b[0m")
    }

    pub fn yellow(s: &str) -> String {
        format!("\x1b[33m{s}\x1b[0m")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bold_red_wraps_with_reset() {
        let s = Style::bold_red("x");
        assert!(s.starts_with("\x1b[1;31m"));
        assert!(s.ends_with("\x1b[0m"));
    }

    #[test]
    fn each_style_preserves_the_original_text() {
        for f in [Style::red, Style::blue, Style::cyan, Style::green, Style::yellow] {
            assert!(f("hello").contains("hello"));
        }
    }
}
