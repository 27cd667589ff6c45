//! Separator cascade: boundary rules, coarsest first.
//!
//! ## Two Kinds of Boundary
//!
//! A *pattern* is structural. Blank-line runs between paragraphs carry no
//! meaning of their own, so the match is consumed and thrown away:
//!
//! ```text
//! "第4條 ...\n\n  第5條 ..."  --pattern \s*\n{2,}\s*-->  ["第4條 ...", "第5條 ..."]
//! ```
//!
//! A *literal* is punctuation. Dropping a `。` or `；` would leave the
//! clause dangling, so the separator is glued back onto the piece it closes:
//!
//! ```text
//! "一、甲；二、乙"  --literal ；-->  ["一、甲；", "二、乙"]
//! ```
//!
//! ## The Fallback
//!
//! The empty separator (`""`, literal or pattern) marks the point where
//! structure gives out. Applying it slices oversized pieces by raw token
//! count. It belongs at the end of every cascade.
//!
//! ## Default Cascade
//!
//! Tuned for mixed Chinese/English statute text:
//!
//! ```text
//! pattern \s*\n{2,}\s*        paragraphs
//! "\n"                        lines
//! "；" ";"                    clauses
//! "。" "！" "？"              CJK sentence ends
//! ". " "! " "? "              latin sentence ends
//! "，" ","                    commas
//! "、"                        enumeration comma
//! " "                         words
//! ""                          forced token slicing
//! ```

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// A boundary-matching rule.
#[derive(Debug, Clone)]
pub enum Separator {
    /// A fixed substring, re-attached to the piece preceding each split point.
    Literal(String),
    /// A structural matcher, consumed and discarded.
    Pattern(Regex),
}

impl Separator {
    /// A literal separator.
    #[must_use]
    pub fn literal(value: impl Into<String>) -> Self {
        Self::Literal(value.into())
    }

    /// A pattern separator.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidPattern`] if `pattern` is not a valid regex.
    pub fn pattern(pattern: &str) -> Result<Self> {
        Ok(Self::Pattern(Regex::new(pattern)?))
    }

    /// The forced fallback: slice by tokens.
    #[must_use]
    pub fn fallback() -> Self {
        Self::Literal(String::new())
    }

    /// The source text of this separator (regex source for patterns).
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Literal(s) => s,
            Self::Pattern(re) => re.as_str(),
        }
    }

    /// Whether this separator is the empty, token-slicing fallback.
    #[must_use]
    pub fn is_fallback(&self) -> bool {
        self.as_str().is_empty()
    }

    /// Raw split at every occurrence, untrimmed, empties included.
    #[must_use]
    pub fn split<'a>(&self, text: &'a str) -> Vec<&'a str> {
        match self {
            Self::Literal(s) => text.split(s.as_str()).collect(),
            Self::Pattern(re) => re.split(text).collect(),
        }
    }
}

impl PartialEq for Separator {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Literal(a), Self::Literal(b)) => a == b,
            (Self::Pattern(a), Self::Pattern(b)) => a.as_str() == b.as_str(),
            _ => false,
        }
    }
}

impl Eq for Separator {}

/// Separator kind in serialized configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SeparatorKind {
    /// See [`Separator::Literal`].
    Literal,
    /// See [`Separator::Pattern`].
    Pattern,
}

/// Serialized form of a [`Separator`]: `{"kind": "pattern", "value": "\\n{2,}"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeparatorSpec {
    /// Literal or pattern.
    pub kind: SeparatorKind,
    /// The substring or regex source.
    pub value: String,
}

impl TryFrom<SeparatorSpec> for Separator {
    type Error = Error;

    fn try_from(spec: SeparatorSpec) -> Result<Self> {
        match spec.kind {
            SeparatorKind::Literal => Ok(Self::Literal(spec.value)),
            SeparatorKind::Pattern => Self::pattern(&spec.value),
        }
    }
}

impl From<&Separator> for SeparatorSpec {
    fn from(sep: &Separator) -> Self {
        let kind = match sep {
            Separator::Literal(_) => SeparatorKind::Literal,
            Separator::Pattern(_) => SeparatorKind::Pattern,
        };
        Self {
            kind,
            value: sep.as_str().to_string(),
        }
    }
}

/// Blank-line runs with surrounding whitespace.
const PARAGRAPH_BREAK: &str = r"\s*\n{2,}\s*";

/// Clause and sentence punctuation for statute text, coarsest first.
const STATUTE_LITERALS: &[&str] = &[
    "\n", "；", ";", "。", "！", "？", ". ", "! ", "? ", "，", ",", "、", " ",
];

/// Ordered separator list, coarsest structural boundary first.
///
/// ```rust
/// use lexslab::{Separator, SeparatorCascade};
///
/// let cascade = SeparatorCascade::statute();
/// assert!(matches!(cascade.as_slice()[0], Separator::Pattern(_)));
/// assert!(cascade.as_slice().last().unwrap().is_fallback());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeparatorCascade {
    separators: Vec<Separator>,
}

impl SeparatorCascade {
    /// A cascade from an explicit list.
    ///
    /// An empty list is valid: every oversized piece goes straight to token
    /// slicing.
    #[must_use]
    pub fn new(separators: Vec<Separator>) -> Self {
        Self { separators }
    }

    /// Paragraphs, lines, CJK and latin clause/sentence punctuation, words,
    /// then forced token slicing.
    #[must_use]
    pub fn statute() -> Self {
        let mut separators = Vec::with_capacity(STATUTE_LITERALS.len() + 2);
        separators.extend(paragraph_break());
        separators.extend(STATUTE_LITERALS.iter().map(|&s| Separator::literal(s)));
        separators.push(Separator::fallback());
        Self { separators }
    }

    /// Paragraphs, lines, sentences, words, then forced token slicing.
    #[must_use]
    pub fn prose() -> Self {
        let mut separators: Vec<Separator> = paragraph_break().into_iter().collect();
        separators.extend(["\n", ". ", " "].map(Separator::literal));
        separators.push(Separator::fallback());
        Self { separators }
    }

    /// Build from serialized specs, compiling patterns.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidPattern`] on the first pattern that fails.
    pub fn from_specs(specs: impl IntoIterator<Item = SeparatorSpec>) -> Result<Self> {
        let separators = specs
            .into_iter()
            .map(Separator::try_from)
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { separators })
    }

    /// Serialized specs, in order.
    #[must_use]
    pub fn to_specs(&self) -> Vec<SeparatorSpec> {
        self.separators.iter().map(SeparatorSpec::from).collect()
    }

    /// The separators, coarsest first.
    #[must_use]
    pub fn as_slice(&self) -> &[Separator] {
        &self.separators
    }

    /// Number of separators.
    #[must_use]
    pub fn len(&self) -> usize {
        self.separators.len()
    }

    /// Whether the cascade has no separators.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.separators.is_empty()
    }
}

impl Default for SeparatorCascade {
    fn default() -> Self {
        Self::statute()
    }
}

/// The paragraph pattern; `PARAGRAPH_BREAK` is a constant that always compiles.
fn paragraph_break() -> Option<Separator> {
    Separator::pattern(PARAGRAPH_BREAK).ok()
}
