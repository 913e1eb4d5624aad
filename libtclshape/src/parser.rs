//! Structural Parser
//!
//! Drives the tokenizer over one substring per nesting level and builds the
//! value the shape declares for that level:
//! - `list`: every word becomes an element
//! - `dict`: words alternate between key and value, starting with a key
//! - `string`: the last word wins
//!
//! Words at list and dict levels are coerced to leaves when the next level is
//! `string`, and parsed recursively otherwise.

use crate::coerce::coerce;
use crate::error::{line_col, ParseContext, ParseError, Result};
use crate::lexer::{next_token, Cursor, Step, TokenClass};
use crate::shape::{Shape, ShapeTag};
use crate::value::Value;
use std::collections::HashMap;

/// Options for a parse.
#[derive(Debug, Clone, Default)]
pub struct ParseOptions {
    /// Report unterminated groups as errors instead of stopping quietly
    /// with the partial result.
    pub strict: bool,
    /// Name used in error locations.
    pub filename: Option<String>,
}

impl ParseOptions {
    /// Lenient options with no filename.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set strict mode.
    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Set the filename used in error locations.
    pub fn filename(mut self, filename: impl Into<String>) -> Self {
        self.filename = Some(filename.into());
        self
    }
}

/// Accumulated output of one level.
enum Builder {
    List(Vec<Value>),
    Dict {
        map: HashMap<String, Value>,
        pending: Option<String>,
    },
    Str(String),
}

impl Builder {
    fn new(tag: ShapeTag) -> Self {
        match tag {
            ShapeTag::List => Builder::List(Vec::new()),
            ShapeTag::Dict => Builder::Dict {
                map: HashMap::new(),
                pending: None,
            },
            ShapeTag::String => Builder::Str(String::new()),
        }
    }

    fn finish(self) -> Value {
        match self {
            Builder::List(items) => Value::List(items),
            Builder::Dict { map, .. } => Value::Dict(map),
            Builder::Str(s) => Value::String(s),
        }
    }
}

/// A parser for one source text and shape.
pub struct Parser<'a> {
    source: &'a str,
    shape: &'a Shape,
    strict: bool,
    ctx: ParseContext,
}

impl<'a> Parser<'a> {
    pub fn new(source: &'a str, shape: &'a Shape, options: &ParseOptions) -> Self {
        Self {
            source,
            shape,
            strict: options.strict,
            ctx: ParseContext::new(options.filename.as_deref()),
        }
    }

    /// Parse the whole source as level 0.
    pub fn parse(&self) -> Result<Value> {
        self.parse_level(self.source, 0, 0)
    }

    /// Parse `input`, which starts at byte `base` of the source, as the value
    /// declared for `level`.
    fn parse_level(&self, input: &str, level: usize, base: usize) -> Result<Value> {
        let tag = self.shape.at(level)?;
        tracing::trace!(level, shape = %tag, len = input.len(), "parsing level");

        let mut out = Builder::new(tag);
        let mut cursor = Cursor::new();
        // Words seen at this level; drives dict key/value alternation.
        let mut count = 0usize;

        loop {
            match next_token(input, &mut cursor) {
                Step::Token => {}
                Step::End => break,
                Step::Incomplete { class, open_at } => {
                    if self.strict {
                        return Err(self.unterminated(class, base + open_at));
                    }
                    break;
                }
            }

            match cursor.class {
                TokenClass::Terminator => {}
                // Bracket groups never advance the word count.
                TokenClass::BracketGroup => {
                    self.bracket(&mut out, &cursor, level, base, count)?;
                }
                _ => {
                    self.word(&mut out, &cursor, level, base, count)?;
                    count += 1;
                }
            }
        }

        Ok(out.finish())
    }

    /// Handle a plain, brace, or quote token.
    fn word(
        &self,
        out: &mut Builder,
        cursor: &Cursor,
        level: usize,
        base: usize,
        count: usize,
    ) -> Result<()> {
        match out {
            Builder::List(items) => {
                items.push(self.leaf_or_nested(cursor, level, base)?);
            }
            Builder::Dict { map, pending } => {
                if count % 2 == 0 {
                    *pending = Some(cursor.token.clone());
                } else {
                    let value = self.leaf_or_nested(cursor, level, base)?;
                    if let Some(key) = pending {
                        map.insert(key.clone(), value);
                    }
                }
            }
            Builder::Str(s) => {
                s.clone_from(&cursor.token);
            }
        }
        Ok(())
    }

    /// Handle a bracket token. Its content is always parsed as the next
    /// level, except where a raw string is needed (dict keys, string levels).
    fn bracket(
        &self,
        out: &mut Builder,
        cursor: &Cursor,
        level: usize,
        base: usize,
        count: usize,
    ) -> Result<()> {
        self.shape.at(level + 1)?;
        match out {
            Builder::List(items) => {
                items.push(self.nested(cursor, level, base)?);
            }
            Builder::Dict { map, pending } => {
                if count % 2 == 0 {
                    *pending = Some(cursor.token.clone());
                } else {
                    let value = self.nested(cursor, level, base)?;
                    if let Some(key) = pending {
                        map.insert(key.clone(), value);
                    }
                }
            }
            Builder::Str(s) => {
                s.clone_from(&cursor.token);
            }
        }
        Ok(())
    }

    fn leaf_or_nested(&self, cursor: &Cursor, level: usize, base: usize) -> Result<Value> {
        match self.shape.at(level + 1)? {
            ShapeTag::String => Ok(coerce(&cursor.token)),
            ShapeTag::List | ShapeTag::Dict => self.nested(cursor, level, base),
        }
    }

    fn nested(&self, cursor: &Cursor, level: usize, base: usize) -> Result<Value> {
        self.parse_level(&cursor.token, level + 1, base + cursor.start)
    }

    fn unterminated(&self, class: TokenClass, offset: usize) -> ParseError {
        let err = match class {
            TokenClass::BracketGroup => ParseError::UnterminatedBracket(String::new()),
            TokenClass::QuoteGroup => ParseError::UnterminatedQuote(String::new()),
            _ => ParseError::UnterminatedBrace(String::new()),
        };
        let (line, col) = line_col(self.source, offset);
        err.with_location(&self.ctx, line, col)
    }
}
