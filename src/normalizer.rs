//! Surface normalizer: a single-pass, longest-match rewrite of Romanian
//! pseudocode source text. Rewrites typographic substitutes (smart quotes,
//! math symbols, box-drawing indent bars) and Romanian diacritics into the
//! plain-ASCII spellings the parser expects.

/// Replacement table, ordered longest-key-first is not required: the
/// matcher itself always prefers the longest key starting at each byte
/// offset, regardless of table order.
const REPLACEMENTS: &[(&str, &str)] = &[
    ("\u{2264}", "<="),
    ("\u{2265}", ">="),
    ("\u{2260}", "!="),
    ("\u{2190}", "<-"),
    ("\u{2192}", "->"),
    ("<--->", "<->"),
    ("<-->", "<->"),
    ("\u{25A0}", "sf"),
    ("\u{2018}", "'"),
    ("\u{2019}", "'"),
    ("\u{201C}", "\""),
    ("\u{201D}", "\""),
    ("\u{2013}", "-"),
    ("\u{2014}", "-"),
    ("\u{2026}", "..."),
    ("\u{2502}", "\t"),
    ("\u{2503}", "\t"),
    ("| ", "\t"),
    ("|", "\t"),
    ("\u{2514}", ""),
    ("\u{2510}", ""),
    ("\u{250C}", ""),
    ("\u{2518}", ""),
    ("\u{251C}", ""),
    ("\u{2524}", ""),
    ("\u{252C}", ""),
    ("\u{2534}", ""),
    ("\u{253C}", ""),
    ("\u{2500}", "-"),
    ("a\u{0103}", "aa"),
    ("\u{0103}", "a"),
    ("\u{00E2}", "a"),
    ("\u{00EE}", "i"),
    ("\u{0219}", "s"),
    ("\u{015F}", "s"),
    ("\u{021B}", "t"),
    ("\u{0163}", "t"),
    ("\u{0102}", "A"),
    ("\u{00C2}", "A"),
    ("\u{00CE}", "I"),
    ("\u{0218}", "S"),
    ("\u{015E}", "S"),
    ("\u{021A}", "T"),
    ("\u{0162}", "T"),
];

/// Rewrites `source` in place, always preferring the longest matching
/// replacement key at each position and falling back to copying a single
/// byte when nothing matches. Appends a trailing newline if the input is
/// non-empty and doesn't already end with one.
pub fn normalize(source: &str) -> String {
    let mut out = String::with_capacity(source.len());
    let mut rest = source;

    while !rest.is_empty() {
        let mut best: Option<(&str, &str)> = None;
        for &(from, to) in REPLACEMENTS {
            if rest.starts_with(from) {
                match best {
                    Some((matched, _)) if matched.len() >= from.len() => {}
                    _ => best = Some((from, to)),
                }
            }
        }

        match best {
            Some((matched, replacement)) => {
                out.push_str(replacement);
                rest = &rest[matched.len()..];
            }
            None => {
                let mut chars = rest.char_indices();
                chars.next();
                let next = chars.next().map(|(i, _)| i).unwrap_or(rest.len());
                out.push_str(&rest[..next]);
                rest = &rest[next..];
            }
        }
    }

    if !out.is_empty() && !out.ends_with('\n') {
        out.push('\n');
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_input_stays_empty() {
        assert_eq!(normalize(""), "");
    }

    #[test]
    fn appends_trailing_newline_when_missing() {
        assert_eq!(normalize("scrie 1"), "scrie 1\n");
    }

    #[test]
    fn preserves_existing_trailing_newline() {
        assert_eq!(normalize("scrie 1\n"), "scrie 1\n");
    }

    #[test]
    fn rewrites_smart_quotes() {
        assert_eq!(normalize("scrie \u{201C}salut\u{201D}"), "scrie \"salut\"\n");
    }

    #[test]
    fn rewrites_unicode_comparison_operators() {
        assert_eq!(normalize("daca x \u{2264} 3"), "daca x <= 3\n");
    }

    #[test]
    fn rewrites_diacritics_to_plain_ascii() {
        assert_eq!(normalize("c\u{00E2}t timp"), "cat timp\n");
        assert_eq!(normalize("p\u{00E2}n\u{0103}"), "pana\n");
    }

    #[test]
    fn rewrites_box_drawing_bar_to_tab() {
        assert_eq!(normalize("\u{2502}scrie x"), "\tscrie x\n");
    }

    #[test]
    fn rewrites_ascii_pipe_bar_to_tab() {
        assert_eq!(normalize("|scrie x"), "\tscrie x\n");
        assert_eq!(normalize("| scrie x"), "\tscrie x\n");
    }

    #[test]
    fn rewrites_assignment_and_arrow_glyphs() {
        assert_eq!(normalize("x \u{2190} x + 1"), "x <- x + 1\n");
        assert_eq!(normalize("x \u{2192} y"), "x -> y\n");
    }

    #[test]
    fn rewrites_not_equal_glyph() {
        assert_eq!(normalize("daca x \u{2260} 3"), "daca x != 3\n");
    }

    #[test]
    fn rewrites_block_end_glyph() {
        assert_eq!(normalize("\u{25A0} algoritm"), "sf algoritm\n");
    }

    #[test]
    fn rewrites_bidir_arrows_to_shortest_form() {
        assert_eq!(normalize("<--->"), "<->\n");
        assert_eq!(normalize("<-->"), "<->\n");
        assert_eq!(normalize("<-"), "<-\n");
    }

    #[test]
    fn matches_the_full_assign_fixture() {
        assert_eq!(
            normalize("dac\u{0103} x \u{2264} 10 atunci\n\u{2502}x \u{2190} x + 1"),
            "daca x <= 10 atunci\n\tx <- x + 1\n"
        );
    }

    #[test]
    fn prefers_longest_match_over_a_shorter_prefix_match() {
        // "a\u{0103}" (a + a-breve) must win over the lone "\u{0103}" rule.
        assert_eq!(normalize("a\u{0103}"), "aa\n");
    }

    #[test]
    fn is_idempotent_on_already_normalized_input() {
        let once = normalize("daca x <= 3 atunci\n\tscrie x\nsf\n");
        let twice = normalize(&once);
        assert_eq!(once, twice);
    }

    #[test]
    fn leaves_ascii_text_untouched() {
        assert_eq!(normalize("scrie 1 + 2\n"), "scrie 1 + 2\n");
    }
}
