//! Shape descriptors.
//!
//! A shape declares, for each nesting depth of the input, whether that level
//! is a list, a dict, or a terminal string. Level 0 is the outermost
//! structure of the text.

use crate::error::{ParseError, Result};
use std::fmt;
use std::str::FromStr;

/// The declared structure of one nesting level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShapeTag {
    /// Whitespace-separated elements.
    List,
    /// Alternating keys and values.
    Dict,
    /// A terminal string.
    String,
}

impl ShapeTag {
    /// The textual name of this tag.
    pub fn as_str(&self) -> &'static str {
        match self {
            ShapeTag::List => "list",
            ShapeTag::Dict => "dict",
            ShapeTag::String => "string",
        }
    }
}

impl fmt::Display for ShapeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ShapeTag {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "list" => Ok(ShapeTag::List),
            "dict" => Ok(ShapeTag::Dict),
            "string" => Ok(ShapeTag::String),
            _ => Err(ParseError::UnknownType(s.to_string())),
        }
    }
}

/// An ordered sequence of shape tags, one per nesting level.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Shape {
    tags: Vec<ShapeTag>,
}

impl Shape {
    /// Create a shape from already-typed tags.
    pub fn new(tags: Vec<ShapeTag>) -> Self {
        Self { tags }
    }

    /// Build a shape from textual tags such as `["dict", "string"]`.
    pub fn from_tags<S: AsRef<str>>(tags: &[S]) -> Result<Self> {
        let tags = tags
            .iter()
            .map(|t| t.as_ref().parse())
            .collect::<Result<Vec<ShapeTag>>>()?;
        Ok(Self { tags })
    }

    /// The tag at `level`, or a missing-type error past the end.
    pub fn at(&self, level: usize) -> Result<ShapeTag> {
        self.tags
            .get(level)
            .copied()
            .ok_or(ParseError::MissingType { level })
    }

    /// Number of levels described.
    pub fn len(&self) -> usize {
        self.tags.len()
    }

    /// Returns `true` if no level is described.
    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }

    /// The tags in level order.
    pub fn tags(&self) -> &[ShapeTag] {
        &self.tags
    }
}

/// Parses comma-separated tags, e.g. `dict,list,string`. Surrounding
/// whitespace around each tag is ignored.
impl FromStr for Shape {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self> {
        if s.trim().is_empty() {
            return Ok(Shape::default());
        }
        let tags: Vec<&str> = s.split(',').map(str::trim).collect();
        Shape::from_tags(&tags)
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, tag) in self.tags.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, "{}", tag)?;
        }
        Ok(())
    }
}

impl From<Vec<ShapeTag>> for Shape {
    fn from(tags: Vec<ShapeTag>) -> Self {
        Shape::new(tags)
    }
}
