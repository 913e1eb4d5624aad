//! Shape-driven parser for Tcl-style lists, dicts, and strings.
//!
//! Tcl text does not say whether `{a b}` is a two-element list, a one-pair
//! dict, or the string `a b`. The caller says so with a [`Shape`]: one tag
//! per nesting depth, each `list`, `dict`, or `string`.
//!
//! # Parsing Pipeline
//!
//! 1. **Tokenizer**: splits one level of text into words, honoring brace,
//!    bracket, and quote groups and backslash escapes of delimiters.
//!
//! 2. **Coercer**: turns leaf words into null, integer, or string values.
//!
//! 3. **Structural Parser**: builds the list, dict, or string the shape
//!    declares for each level, recursing into grouped words.
//!
//! Malformed input that ends inside an open group is truncated quietly by
//! default. Use [`parse_with_options`] with `strict` set to get an error
//! instead.

mod coerce;
mod encode;
mod error;
mod lexer;
mod parser;
mod shape;
mod value;

pub use coerce::coerce;
pub use encode::{encode, Format};
pub use error::{ParseError, Result};
pub use lexer::{next_token, Cursor, Step, TokenClass};
pub use parser::{ParseOptions, Parser};
pub use shape::{Shape, ShapeTag};
pub use value::Value;

/// Parse Tcl text according to `shape`.
///
/// # Example
///
/// ```
/// use libtclshape::{parse, Shape, Value};
///
/// let shape = Shape::from_tags(&["dict", "string"]).unwrap();
/// let value = parse("a 1 b xyz", &shape).unwrap();
/// assert_eq!(value.get("b"), Some(&Value::from("xyz")));
/// ```
pub fn parse(input: &str, shape: &Shape) -> Result<Value> {
    parse_with_options(input, shape, &ParseOptions::default())
}

/// Parse Tcl text with a shape given as textual tags (`"list"`, `"dict"`,
/// `"string"`).
pub fn parse_tags<S: AsRef<str>>(input: &str, tags: &[S]) -> Result<Value> {
    let shape = Shape::from_tags(tags)?;
    parse(input, &shape)
}

/// Parse Tcl text with explicit options.
pub fn parse_with_options(input: &str, shape: &Shape, options: &ParseOptions) -> Result<Value> {
    Parser::new(input, shape, options).parse()
}
