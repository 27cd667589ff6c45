//! The Chunk type: a token-bounded window of text with its position.

use std::ops::Range;

use serde::{Deserialize, Serialize};

/// A final, emitted unit of text.
///
/// Chunks are the only thing the chunker hands downstream. Each one is
/// created once, in document order, and never modified.
///
/// ## Positions
///
/// A chunk knows where it sits at two levels:
///
/// ```text
/// document
/// ├── block 0   [chunk index 0: seq 0] [chunk index 1: seq 1]
/// └── block 1   [chunk index 2: seq 0]
/// ```
///
/// - `index`: ordinal across the whole document output.
/// - `block_index`: which merged block the chunk was windowed from.
/// - `sequence_index`: ordinal within that block.
///
/// `span` is the chunk's token range inside its block's token sequence, so
/// consecutive chunks of one block overlap where their spans intersect:
///
/// ```rust
/// use lexslab::Chunk;
///
/// let a = Chunk::new("第一種壓", 0..4, 0, 0, 0);
/// let b = Chunk::new("種壓力容", 2..6, 1, 0, 1);
/// assert_eq!(a.overlap_with(&b), 2);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chunk {
    /// The chunk text.
    pub content: String,
    /// Number of tokens in the chunk. Never exceeds the budget.
    pub token_count: usize,
    /// Ordinal within the parent block.
    pub sequence_index: usize,
    /// Ordinal of the parent block within the document.
    pub block_index: usize,
    /// Ordinal within the whole document output.
    pub index: usize,
    /// Token range within the parent block.
    pub span: Range<usize>,
}

impl Chunk {
    /// Create a new chunk. `token_count` is taken from the span length.
    #[must_use]
    pub fn new(
        content: impl Into<String>,
        span: Range<usize>,
        index: usize,
        block_index: usize,
        sequence_index: usize,
    ) -> Self {
        Self {
            content: content.into(),
            token_count: span.len(),
            sequence_index,
            block_index,
            index,
            span,
        }
    }

    /// Whether the chunk has no text.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }

    /// Tokens shared with `other`, zero if they belong to different blocks.
    #[must_use]
    pub fn overlap_with(&self, other: &Chunk) -> usize {
        if self.block_index != other.block_index {
            return 0;
        }
        let start = self.span.start.max(other.span.start);
        let end = self.span.end.min(other.span.end);
        end.saturating_sub(start)
    }
}

impl std::fmt::Display for Chunk {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Chunk {{ index: {}, block: {}, seq: {}, tokens: {}..{} ({}) }}",
            self.index,
            self.block_index,
            self.sequence_index,
            self.span.start,
            self.span.end,
            self.token_count
        )
    }
}
