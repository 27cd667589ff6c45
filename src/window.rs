//! Sliding token windows with fixed overlap.
//!
//! ## How It Works
//!
//! ```text
//! max_tokens = 10, overlap = 3  =>  stride = 7
//!
//! tokens:   0 .. 25
//!
//! window 0: [0..10)
//! window 1: [7..17)    <- starts at 10 - 3 = 7
//! window 2: [14..24)   <- starts at 17 - 3 = 14
//! window 3: [21..25)   <- reaches the end, shorter, stop
//! ```
//!
//! ## Why Overlap?
//!
//! A clause that straddles a window boundary would otherwise be split
//! between two chunks and retrieved by neither. With overlap, the tail of
//! each window is repeated at the head of the next:
//!
//! ```text
//! "...不得使用附表一規定之材料"
//!          |
//! No overlap:   ["...不得使用附", "表一規定之材料"]      <- broken
//! With overlap: ["...不得使用附表一", "使用附表一規定之材料"]
//! ```
//!
//! Windows are computed per block, so overlap never crosses a block
//! boundary.

use std::ops::Range;

use crate::{Result, TokenBudget, TokenCounter};

/// One window over a block's token sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Window {
    /// Decoded window text.
    pub text: String,
    /// Token range within the block's token sequence.
    pub span: Range<usize>,
}

impl Window {
    /// Number of tokens in the window.
    #[must_use]
    pub fn token_count(&self) -> usize {
        self.span.len()
    }
}

/// Slide a `max_tokens` window with `stride` advance over `text`.
///
/// Empty text yields no windows. Text within budget yields exactly one.
///
/// # Errors
///
/// Propagates tokenizer failures.
///
/// # Examples
///
/// ```rust
/// use lexslab::{window, CharTokenizer, TokenBudget};
///
/// let budget = TokenBudget::new(10, 2).unwrap();
/// let windows = window("abcdefghijklmnopqrstuvwxyz", budget, &CharTokenizer).unwrap();
///
/// assert_eq!(windows[0].text, "abcdefghij");
/// assert_eq!(windows[1].span, 8..18);
/// assert_eq!(windows.last().unwrap().span.end, 26);
/// ```
pub fn window<T: TokenCounter + ?Sized>(
    text: &str,
    budget: TokenBudget,
    tokenizer: &T,
) -> Result<Vec<Window>> {
    let tokens = tokenizer.encode(text)?;
    let spans = window_spans(tokens.len(), budget);

    spans
        .into_iter()
        .map(|span| {
            let text = tokenizer.decode(&tokens[span.clone()])?;
            Ok(Window { text, span })
        })
        .collect()
}

/// Token ranges of every window over a sequence of `len` tokens.
///
/// ```rust
/// use lexslab::{window_spans, TokenBudget};
///
/// let budget = TokenBudget::new(4, 1).unwrap();
/// assert_eq!(window_spans(10, budget), vec![0..4, 3..7, 6..10]);
/// assert!(window_spans(0, budget).is_empty());
/// ```
#[must_use]
pub fn window_spans(len: usize, budget: TokenBudget) -> Vec<Range<usize>> {
    if len == 0 {
        return vec![];
    }

    let stride = budget.stride();
    let mut spans = Vec::with_capacity(estimate_windows(len, budget));
    let mut start = 0;

    loop {
        let end = (start + budget.max_tokens()).min(len);
        spans.push(start..end);
        if end == len {
            break;
        }
        start += stride;
    }

    spans
}

/// Exact number of windows [`window_spans`] produces for `len` tokens.
#[must_use]
pub fn estimate_windows(len: usize, budget: TokenBudget) -> usize {
    if len == 0 {
        return 0;
    }
    if len <= budget.max_tokens() {
        return 1;
    }
    1 + (len - budget.max_tokens()).div_ceil(budget.stride())
}
