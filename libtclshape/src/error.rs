//! Error types for shape-driven Tcl parsing.

use thiserror::Error;

/// Result type for parsing operations.
pub type Result<T> = std::result::Result<T, ParseError>;

/// Parse context carrying filename and source text for error reporting.
#[derive(Clone, Debug)]
pub struct ParseContext {
    pub filename: Option<String>,
}

impl ParseContext {
    /// Create a new parse context.
    pub fn new(filename: Option<&str>) -> Self {
        Self {
            filename: filename.map(String::from),
        }
    }

    /// Format a location suffix for error messages.
    pub fn loc_suffix(&self, line: usize, col: usize) -> String {
        match &self.filename {
            Some(name) => format!(" at {}:{} of <{}>", line + 1, col + 1, name),
            None => format!(" at {}:{}", line + 1, col + 1),
        }
    }
}

/// Convert a byte offset into zero-based (line, column), counting columns in
/// characters.
pub fn line_col(source: &str, offset: usize) -> (usize, usize) {
    let mut line = 0;
    let mut col = 0;
    for (i, ch) in source.char_indices() {
        if i >= offset {
            break;
        }
        if ch == '\n' {
            line += 1;
            col = 0;
        } else {
            col += 1;
        }
    }
    (line, col)
}

/// Error type for shape-driven parsing.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// The shape descriptor has no entry for a level the input reaches.
    #[error("Missing type at level {level}")]
    MissingType { level: usize },

    /// A textual shape tag other than `list`, `dict`, or `string`.
    #[error("Unknown type \"{0}\"")]
    UnknownType(String),

    /// Input ended inside a `{...}` group (strict mode only).
    #[error("Unterminated brace{0}")]
    UnterminatedBrace(String),

    /// Input ended inside a `[...]` group (strict mode only).
    #[error("Unterminated bracket{0}")]
    UnterminatedBracket(String),

    /// Input ended inside a `"..."` group (strict mode only).
    #[error("Unterminated quote{0}")]
    UnterminatedQuote(String),
}

impl ParseError {
    /// Create an error with location information.
    pub fn with_location(self, ctx: &ParseContext, line: usize, col: usize) -> Self {
        let suffix = ctx.loc_suffix(line, col);
        match self {
            ParseError::UnterminatedBrace(_) => ParseError::UnterminatedBrace(suffix),
            ParseError::UnterminatedBracket(_) => ParseError::UnterminatedBracket(suffix),
            ParseError::UnterminatedQuote(_) => ParseError::UnterminatedQuote(suffix),
            other => other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_col() {
        assert_eq!(line_col("abc", 0), (0, 0));
        assert_eq!(line_col("abc", 2), (0, 2));
        assert_eq!(line_col("a\nbc", 3), (1, 1));
        assert_eq!(line_col("a\n", 2), (1, 0));
    }

    #[test]
    fn test_with_location() {
        let ctx = ParseContext::new(Some("data.tcl"));
        let err = ParseError::UnterminatedBrace(String::new()).with_location(&ctx, 1, 4);
        assert_eq!(err.to_string(), "Unterminated brace at 2:5 of <data.tcl>");

        let anon = ParseContext::new(None);
        let err = ParseError::UnterminatedQuote(String::new()).with_location(&anon, 0, 0);
        assert_eq!(err.to_string(), "Unterminated quote at 1:1");
    }

    #[test]
    fn test_location_leaves_descriptor_errors_alone() {
        let ctx = ParseContext::new(Some("data.tcl"));
        let err = ParseError::MissingType { level: 2 }.with_location(&ctx, 3, 3);
        assert_eq!(err, ParseError::MissingType { level: 2 });
        assert_eq!(err.to_string(), "Missing type at level 2");
    }
}
