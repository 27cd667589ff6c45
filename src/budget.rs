//! Token budget: the size limit and overlap every stage agrees on.
//!
//! ## The Two Numbers
//!
//! ```text
//! max_tokens = 10, overlap = 4  =>  stride = 6
//!
//! tokens:  0 1 2 3 4 5 6 7 8 9 a b c d e f
//! chunk 0: [0 ........... 9]
//! chunk 1:             [6 ........... f]
//!                       ^^^^^^^ 4 shared tokens
//! ```
//!
//! - `max_tokens`: hard ceiling for every emitted chunk. Never exceeded.
//! - `overlap`: tokens shared by consecutive chunks of the same block.
//!
//! The stride (`max_tokens - overlap`) must be strictly positive, otherwise
//! the windower would never advance. Both conditions are checked once, at
//! construction, and a bad budget is rejected rather than clamped.

use std::cmp::Ordering;

use crate::{Error, Result};

/// Validated `{max_tokens, overlap}` pair.
///
/// # Examples
///
/// ```rust
/// use lexslab::TokenBudget;
///
/// let budget = TokenBudget::new(500, 200).unwrap();
/// assert_eq!(budget.max_tokens(), 500);
/// assert_eq!(budget.overlap(), 200);
/// assert_eq!(budget.stride(), 300);
///
/// assert!(TokenBudget::new(0, 0).is_err());
/// assert!(TokenBudget::new(100, 100).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TokenBudget {
    max_tokens: usize,
    overlap: usize,
}

impl TokenBudget {
    /// Create a budget.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidMaxTokens`] if `max_tokens == 0`.
    /// - [`Error::OverlapExceedsMax`] if `overlap >= max_tokens`.
    pub fn new(max_tokens: usize, overlap: usize) -> Result<Self> {
        if max_tokens == 0 {
            return Err(Error::InvalidMaxTokens(max_tokens));
        }
        if overlap >= max_tokens {
            return Err(Error::OverlapExceedsMax {
                max_tokens,
                overlap,
            });
        }
        Ok(Self {
            max_tokens,
            overlap,
        })
    }

    /// A budget with no overlap between consecutive chunks.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidMaxTokens`] if `max_tokens == 0`.
    pub fn no_overlap(max_tokens: usize) -> Result<Self> {
        Self::new(max_tokens, 0)
    }

    /// The hard ceiling on tokens per chunk.
    #[must_use]
    pub const fn max_tokens(&self) -> usize {
        self.max_tokens
    }

    /// Tokens shared between consecutive chunks of one block.
    #[must_use]
    pub const fn overlap(&self) -> usize {
        self.overlap
    }

    /// Token advance per window. Always `>= 1`.
    #[must_use]
    pub const fn stride(&self) -> usize {
        self.max_tokens - self.overlap
    }

    /// Compare a token count against the ceiling.
    ///
    /// Returns:
    /// - `Ordering::Less`: room to spare
    /// - `Ordering::Equal`: exactly full
    /// - `Ordering::Greater`: over budget, must split
    #[must_use]
    pub fn fits(&self, tokens: usize) -> Ordering {
        tokens.cmp(&self.max_tokens)
    }

    /// Whether `tokens` is within the ceiling.
    #[must_use]
    pub fn admits(&self, tokens: usize) -> bool {
        tokens <= self.max_tokens
    }
}

impl Default for TokenBudget {
    /// 500 tokens with 200 shared, tuned for article-length statute text.
    fn default() -> Self {
        Self {
            max_tokens: 500,
            overlap: 200,
        }
    }
}

impl TryFrom<(usize, usize)> for TokenBudget {
    type Error = Error;

    fn try_from((max_tokens, overlap): (usize, usize)) -> Result<Self> {
        Self::new(max_tokens, overlap)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fits() {
        let budget = TokenBudget::new(100, 10).unwrap();
        assert_eq!(budget.fits(50), Ordering::Less);
        assert_eq!(budget.fits(100), Ordering::Equal);
        assert_eq!(budget.fits(101), Ordering::Greater);
        assert!(budget.admits(100));
        assert!(!budget.admits(101));
    }

    #[test]
    fn test_stride() {
        assert_eq!(TokenBudget::new(10, 0).unwrap().stride(), 10);
        assert_eq!(TokenBudget::new(10, 9).unwrap().stride(), 1);
        assert_eq!(TokenBudget::default().stride(), 300);
    }

    #[test]
    fn test_zero_max_rejected() {
        let err = TokenBudget::new(0, 0).unwrap_err();
        assert!(matches!(err, Error::InvalidMaxTokens(0)));
    }

    #[test]
    fn test_overlap_must_be_smaller() {
        let err = TokenBudget::new(10, 10).unwrap_err();
        assert!(matches!(
            err,
            Error::OverlapExceedsMax {
                max_tokens: 10,
                overlap: 10
            }
        ));
        assert!(TokenBudget::new(10, 11).is_err());
    }

    #[test]
    fn test_tuple_conversion() {
        let budget = TokenBudget::try_from((64, 16)).unwrap();
        assert_eq!(budget.stride(), 48);
        assert!(TokenBudget::try_from((4, 8)).is_err());
    }
}
