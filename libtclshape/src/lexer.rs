//! Tokenizer
//!
//! Splits Tcl-style text into words one call at a time. It understands:
//! - `{...}` and `[...]` groups, which nest and keep their interior verbatim
//! - `"..."` groups, which do not nest
//! - spaces and tabs as word separators
//! - newlines, carriage returns, and `;` as terminators
//!
//! A backslash only stops the character right after it from acting as a
//! group delimiter. It is never removed and never substituted.

use std::fmt;

/// Syntactic class of a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenClass {
    /// No complete token was produced.
    None,
    /// A bare word.
    Plain,
    /// Content of a `{...}` group.
    BraceGroup,
    /// Content of a `[...]` group.
    BracketGroup,
    /// Content of a `"..."` group.
    QuoteGroup,
    /// A single newline, carriage return, or `;`.
    Terminator,
}

impl TokenClass {
    fn is_group(self) -> bool {
        matches!(
            self,
            TokenClass::BraceGroup | TokenClass::BracketGroup | TokenClass::QuoteGroup
        )
    }
}

impl fmt::Display for TokenClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TokenClass::None => "none",
            TokenClass::Plain => "plain",
            TokenClass::BraceGroup => "brace group",
            TokenClass::BracketGroup => "bracket group",
            TokenClass::QuoteGroup => "quote group",
            TokenClass::Terminator => "terminator",
        };
        f.write_str(name)
    }
}

/// Outcome of one tokenizer call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// The cursor holds a complete token.
    Token,
    /// No tokens remain.
    End,
    /// Input ended inside a group opened at byte offset `open_at`.
    Incomplete { class: TokenClass, open_at: usize },
}

/// Tokenizer position and the most recent token.
#[derive(Debug, Clone)]
pub struct Cursor {
    /// Byte offset of the next unread character.
    pub pos: usize,
    /// Text of the current token, outer delimiters stripped.
    pub token: String,
    /// Class of the current token.
    pub class: TokenClass,
    /// Byte offset where the current token's content begins.
    pub start: usize,
}

impl Cursor {
    pub fn new() -> Self {
        Self {
            pos: 0,
            token: String::new(),
            class: TokenClass::None,
            start: 0,
        }
    }
}

impl Default for Cursor {
    fn default() -> Self {
        Self::new()
    }
}

/// Advance `cursor` past exactly one token of `input`.
pub fn next_token(input: &str, cursor: &mut Cursor) -> Step {
    let base = cursor.pos;
    cursor.token.clear();
    cursor.class = TokenClass::None;
    cursor.start = base;

    let mut depth = 0usize;
    let mut open_at = base;
    let mut escaped = false;

    for (i, ch) in input[base..].char_indices() {
        let at = base + i;
        let was_escaped = escaped;
        escaped = ch == '\\' && !was_escaped;

        match cursor.class {
            TokenClass::BraceGroup | TokenClass::BracketGroup => {
                let (open, close) = if cursor.class == TokenClass::BraceGroup {
                    ('{', '}')
                } else {
                    ('[', ']')
                };
                if !was_escaped && ch == open {
                    depth += 1;
                } else if !was_escaped && ch == close {
                    depth -= 1;
                    if depth == 0 {
                        cursor.pos = at + 1;
                        return Step::Token;
                    }
                }
                cursor.token.push(ch);
            }
            TokenClass::QuoteGroup => {
                if !was_escaped && ch == '"' {
                    cursor.pos = at + 1;
                    return Step::Token;
                }
                cursor.token.push(ch);
            }
            _ => match ch {
                '{' | '[' | '"' if !was_escaped => {
                    cursor.class = match ch {
                        '{' => TokenClass::BraceGroup,
                        '[' => TokenClass::BracketGroup,
                        _ => TokenClass::QuoteGroup,
                    };
                    depth = 1;
                    open_at = at;
                    if cursor.token.is_empty() {
                        cursor.start = at + 1;
                    }
                }
                ' ' | '\t' => {
                    if !cursor.token.is_empty() {
                        cursor.pos = at;
                        return Step::Token;
                    }
                    cursor.start = at + 1;
                }
                '\n' | '\r' | ';' => {
                    if !cursor.token.is_empty() {
                        cursor.pos = at;
                        return Step::Token;
                    }
                    cursor.token.push(ch);
                    cursor.class = TokenClass::Terminator;
                    cursor.start = at;
                    cursor.pos = at + 1;
                    return Step::Token;
                }
                _ => {
                    cursor.token.push(ch);
                    cursor.class = TokenClass::Plain;
                }
            },
        }
    }

    cursor.pos = input.len();

    if cursor.class.is_group() {
        tracing::warn!(
            class = %cursor.class,
            offset = open_at,
            "input ended inside an unterminated group"
        );
        return Step::Incomplete {
            class: cursor.class,
            open_at,
        };
    }

    if cursor.token.is_empty() {
        cursor.class = TokenClass::None;
        Step::End
    } else {
        Step::Token
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Collect every token up to the end of input or the first incomplete
    /// group.
    fn tokens(input: &str) -> (Vec<(TokenClass, String)>, Step) {
        let mut cursor = Cursor::new();
        let mut out = Vec::new();
        loop {
            match next_token(input, &mut cursor) {
                Step::Token => out.push((cursor.class, cursor.token.clone())),
                step => return (out, step),
            }
        }
    }

    fn plain(s: &str) -> (TokenClass, String) {
        (TokenClass::Plain, s.to_string())
    }

    #[test]
    fn test_plain_words() {
        let (toks, end) = tokens("  alpha\tbeta  gamma ");
        assert_eq!(toks, vec![plain("alpha"), plain("beta"), plain("gamma")]);
        assert_eq!(end, Step::End);
    }

    #[test]
    fn test_empty_input() {
        let mut cursor = Cursor::new();
        assert_eq!(next_token("", &mut cursor), Step::End);
        assert_eq!(cursor.class, TokenClass::None);
        assert_eq!(next_token("   ", &mut cursor), Step::End);
    }

    #[test]
    fn test_brace_group_strips_outer_pair() {
        let (toks, _) = tokens("{a {b c} d} e");
        assert_eq!(
            toks,
            vec![
                (TokenClass::BraceGroup, "a {b c} d".to_string()),
                plain("e")
            ]
        );
    }

    #[test]
    fn test_empty_brace_group() {
        let (toks, end) = tokens("{}");
        assert_eq!(toks, vec![(TokenClass::BraceGroup, String::new())]);
        assert_eq!(end, Step::End);
    }

    #[test]
    fn test_bracket_group() {
        let (toks, _) = tokens("[x [y] {z]");
        assert_eq!(
            toks,
            vec![(TokenClass::BracketGroup, "x [y] {z".to_string())]
        );
    }

    #[test]
    fn test_quote_group() {
        let (toks, _) = tokens("\"hello {world\" next");
        assert_eq!(
            toks,
            vec![
                (TokenClass::QuoteGroup, "hello {world".to_string()),
                plain("next")
            ]
        );
    }

    #[test]
    fn test_escaped_brace_inside_group_is_literal() {
        let (toks, end) = tokens(r"{a\{b}");
        assert_eq!(toks, vec![(TokenClass::BraceGroup, r"a\{b".to_string())]);
        assert_eq!(end, Step::End);
    }

    #[test]
    fn test_escaped_quote_inside_quote_group() {
        let (toks, _) = tokens(r#""say \"hi\"""#);
        assert_eq!(
            toks,
            vec![(TokenClass::QuoteGroup, r#"say \"hi\""#.to_string())]
        );
    }

    #[test]
    fn test_escaped_backslash_does_not_escape() {
        let (toks, end) = tokens(r"{a\\} b");
        assert_eq!(
            toks,
            vec![(TokenClass::BraceGroup, r"a\\".to_string()), plain("b")]
        );
        assert_eq!(end, Step::End);
    }

    #[test]
    fn test_escaped_brace_outside_group_is_plain() {
        let (toks, _) = tokens(r"\{x");
        assert_eq!(toks, vec![plain(r"\{x")]);
    }

    #[test]
    fn test_terminators() {
        let (toks, _) = tokens("a;b\n\nc\r");
        assert_eq!(
            toks,
            vec![
                plain("a"),
                (TokenClass::Terminator, ";".to_string()),
                plain("b"),
                (TokenClass::Terminator, "\n".to_string()),
                (TokenClass::Terminator, "\n".to_string()),
                plain("c"),
                (TokenClass::Terminator, "\r".to_string()),
            ]
        );
    }

    #[test]
    fn test_group_ends_token_without_separator() {
        let (toks, _) = tokens("{a}{b}");
        assert_eq!(
            toks,
            vec![
                (TokenClass::BraceGroup, "a".to_string()),
                (TokenClass::BraceGroup, "b".to_string())
            ]
        );
    }

    #[test]
    fn test_unterminated_groups() {
        let (toks, end) = tokens("a {b c");
        assert_eq!(toks, vec![plain("a")]);
        assert_eq!(
            end,
            Step::Incomplete {
                class: TokenClass::BraceGroup,
                open_at: 2
            }
        );

        let (_, end) = tokens("[x");
        assert!(matches!(
            end,
            Step::Incomplete {
                class: TokenClass::BracketGroup,
                ..
            }
        ));

        let (_, end) = tokens("\"open");
        assert!(matches!(
            end,
            Step::Incomplete {
                class: TokenClass::QuoteGroup,
                ..
            }
        ));
    }

    #[test]
    fn test_cursor_offsets() {
        let input = "ab  {cd}";
        let mut cursor = Cursor::new();
        assert_eq!(next_token(input, &mut cursor), Step::Token);
        assert_eq!((cursor.start, cursor.pos), (0, 2));
        assert_eq!(next_token(input, &mut cursor), Step::Token);
        assert_eq!(cursor.start, 5);
        assert_eq!(cursor.pos, input.len());
        assert_eq!(next_token(input, &mut cursor), Step::End);
    }

    #[test]
    fn test_multibyte_text() {
        let (toks, _) = tokens("héllo {wörld}");
        assert_eq!(
            toks,
            vec![
                plain("héllo"),
                (TokenClass::BraceGroup, "wörld".to_string())
            ]
        );
    }
}
