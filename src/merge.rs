//! Greedy block merging.
//!
//! Recursive splitting over-fragments: once a paragraph is cut on `。`,
//! every sentence becomes its own segment even when ten of them would fit
//! in one chunk. The merger walks the segments in order and glues
//! neighbours back together with a line break while the result stays
//! within budget.
//!
//! ```text
//! max_tokens = 10
//!
//! segments: ["甲乙丙", "丁戊", "己庚辛壬癸子", "丑"]
//!
//! acc = "甲乙丙"
//! + "丁戊"          -> "甲乙丙\n丁戊"        (6)  commit
//! + "己庚辛壬癸子"  -> 13 > 10                    finalize, restart
//! + "丑"            -> "己庚辛壬癸子\n丑"    (8)  commit
//!
//! blocks:   ["甲乙丙\n丁戊", "己庚辛壬癸子\n丑"]
//! ```
//!
//! The merger only combines. A segment that is already at the ceiling
//! becomes a block on its own.

use crate::{Result, Segment, TokenBudget, TokenCounter};

/// A merged group of segments: the unit the windower operates on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    /// Segment texts joined with `"\n"`.
    pub text: String,
    /// Token count of `text`.
    pub token_count: usize,
    /// How many segments were coalesced into this block.
    pub segment_count: usize,
}

impl Block {
    fn start(segment: Segment) -> Self {
        Self {
            text: segment.text,
            token_count: segment.token_count,
            segment_count: 1,
        }
    }
}

/// Coalesce adjacent segments into blocks of at most `budget.max_tokens()`
/// tokens where possible.
///
/// # Errors
///
/// Propagates tokenizer failures.
///
/// # Examples
///
/// ```rust
/// use lexslab::{merge, CharTokenizer, Segment, TokenBudget};
///
/// let budget = TokenBudget::no_overlap(8).unwrap();
/// let segments = vec![Segment::new("abc", 3), Segment::new("de", 2), Segment::new("fghij", 5)];
/// let blocks = merge(segments, budget, &CharTokenizer).unwrap();
///
/// assert_eq!(blocks.len(), 2);
/// assert_eq!(blocks[0].text, "abc\nde");
/// assert_eq!(blocks[1].text, "fghij");
/// ```
pub fn merge<T: TokenCounter + ?Sized>(
    segments: Vec<Segment>,
    budget: TokenBudget,
    tokenizer: &T,
) -> Result<Vec<Block>> {
    let mut blocks = Vec::new();
    let mut segments = segments.into_iter();

    let Some(first) = segments.next() else {
        return Ok(blocks);
    };
    let mut acc = Block::start(first);

    for segment in segments {
        let joined = format!("{}\n{}", acc.text, segment.text);
        let joined = joined.trim();
        let token_count = tokenizer.count(joined)?;

        if budget.admits(token_count) {
            acc.text = joined.to_string();
            acc.token_count = token_count;
            acc.segment_count += 1;
        } else {
            blocks.push(std::mem::replace(&mut acc, Block::start(segment)));
        }
    }

    blocks.push(acc);
    tracing::trace!(blocks = blocks.len(), "merged segments");
    Ok(blocks)
}
