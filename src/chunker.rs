//! End-to-end chunking: split, merge, window.
//!
//! ```text
//! text ──trim──> split ──> [Segment] ──> merge ──> [Block] ──> window ──> [Chunk]
//!                  │                                  │
//!          separator cascade                  one window pass per block
//! ```
//!
//! The pipeline is a pure function of the text, the config, and the token
//! counter. There is no state between calls, so one [`TokenChunker`] can
//! be shared across threads and used for any number of documents.

use crate::merge::{merge, Block};
use crate::recursive::{split, Segment};
use crate::window::{estimate_windows, window};
use crate::{Chunk, Chunker, ChunkerConfig, Result, TokenCounter};

/// Chunk one document.
///
/// # Errors
///
/// Propagates tokenizer failures; nothing is returned for a document whose
/// tokenization fails partway.
///
/// # Examples
///
/// ```rust
/// use lexslab::{chunk_document, CharTokenizer, ChunkerConfig};
///
/// let config = ChunkerConfig::new(20, 5).unwrap();
/// let chunks = chunk_document("  第4條 第一種壓力容器不得使用附表一規定之材料。  ", &config, &CharTokenizer).unwrap();
///
/// assert_eq!(chunks.len(), 2);
/// assert!(chunks.iter().all(|c| c.token_count <= 20));
/// ```
pub fn chunk_document<T: TokenCounter + ?Sized>(
    text: &str,
    config: &ChunkerConfig,
    tokenizer: &T,
) -> Result<Vec<Chunk>> {
    let text = text.trim();
    if text.is_empty() {
        return Ok(vec![]);
    }

    let budget = config.budget();
    let segments = split(text, config.separators().as_slice(), budget, tokenizer)?;
    let segment_count = segments.len();
    let blocks = merge(segments, budget, tokenizer)?;

    let mut chunks = Vec::with_capacity(blocks.len());
    for (block_index, block) in blocks.iter().enumerate() {
        chunks.extend(window_block(block, block_index, chunks.len(), config, tokenizer)?);
    }

    tracing::debug!(
        segments = segment_count,
        blocks = blocks.len(),
        chunks = chunks.len(),
        max_tokens = budget.max_tokens(),
        overlap = budget.overlap(),
        "chunked document"
    );
    Ok(chunks)
}

/// Window one block into chunks, numbering them from `first_index`.
fn window_block<T: TokenCounter + ?Sized>(
    block: &Block,
    block_index: usize,
    first_index: usize,
    config: &ChunkerConfig,
    tokenizer: &T,
) -> Result<Vec<Chunk>> {
    let windows = window(&block.text, config.budget(), tokenizer)?;
    Ok(windows
        .into_iter()
        .enumerate()
        .map(|(seq, w)| Chunk::new(w.text, w.span, first_index + seq, block_index, seq))
        .collect())
}

/// Token-bounded recursive chunker.
///
/// Bundles a validated [`ChunkerConfig`] with a token counter. The counter
/// is held by value; pass `&tok` or `Arc<tok>` to share one across chunkers.
///
/// ## Example
///
/// ```rust
/// use std::sync::Arc;
/// use lexslab::{CharTokenizer, Chunker, ChunkerConfig, TokenChunker};
///
/// let chunker = TokenChunker::new(ChunkerConfig::new(12, 4).unwrap(), Arc::new(CharTokenizer));
///
/// let text = "第一條 本法依憲法制定之。\n\n第二條 本法所稱主管機關。";
/// let chunks = chunker.chunk(text).unwrap();
///
/// assert!(chunks.iter().all(|c| c.token_count <= 12));
/// assert!(chunks[0].content.starts_with("第一條"));
/// ```
#[derive(Debug, Clone)]
pub struct TokenChunker<T> {
    config: ChunkerConfig,
    tokenizer: T,
}

impl<T: TokenCounter> TokenChunker<T> {
    /// Create a chunker.
    #[must_use]
    pub fn new(config: ChunkerConfig, tokenizer: T) -> Self {
        Self { config, tokenizer }
    }

    /// The configuration.
    #[must_use]
    pub fn config(&self) -> &ChunkerConfig {
        &self.config
    }

    /// The token counter.
    #[must_use]
    pub fn tokenizer(&self) -> &T {
        &self.tokenizer
    }

    /// Run only the recursive splitter over `text` with the full cascade.
    ///
    /// # Errors
    ///
    /// Propagates tokenizer failures.
    pub fn split(&self, text: &str) -> Result<Vec<Segment>> {
        split(
            text,
            self.config.separators().as_slice(),
            self.config.budget(),
            &self.tokenizer,
        )
    }

    /// Run only the block merger.
    ///
    /// # Errors
    ///
    /// Propagates tokenizer failures.
    pub fn merge(&self, segments: Vec<Segment>) -> Result<Vec<Block>> {
        merge(segments, self.config.budget(), &self.tokenizer)
    }

    /// Run only the overlap windower over one block.
    ///
    /// Chunks are numbered as if `block` were the document's only block.
    ///
    /// # Errors
    ///
    /// Propagates tokenizer failures.
    pub fn window(&self, block: &Block) -> Result<Vec<Chunk>> {
        window_block(block, 0, 0, &self.config, &self.tokenizer)
    }
}

impl<T: TokenCounter> Chunker for TokenChunker<T> {
    fn chunk(&self, text: &str) -> Result<Vec<Chunk>> {
        chunk_document(text, &self.config, &self.tokenizer)
    }

    fn estimate_chunks(&self, token_len: usize) -> usize {
        estimate_windows(token_len, self.config.budget())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{CharTokenizer, Error, SeparatorCascade};

    fn chunker(max: usize, overlap: usize) -> TokenChunker<CharTokenizer> {
        TokenChunker::new(ChunkerConfig::new(max, overlap).unwrap(), CharTokenizer)
    }

    #[test]
    fn test_empty_and_whitespace() {
        let chunker = chunker(10, 2);
        assert!(chunker.chunk("").unwrap().is_empty());
        assert!(chunker.chunk(" \n\n\t ").unwrap().is_empty());
    }

    #[test]
    fn test_short_document_is_trimmed_single_chunk() {
        let chunker = chunker(50, 10);
        let chunks = chunker.chunk("\n  第4條 不得使用附表一規定之材料。 \n").unwrap();
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].content, "第4條 不得使用附表一規定之材料。");
        assert_eq!(chunks[0].index, 0);
        assert_eq!(chunks[0].sequence_index, 0);
    }

    #[test]
    fn test_indices_are_consistent() {
        let chunker = TokenChunker::new(
            ChunkerConfig::new(8, 3).unwrap().with_separators(SeparatorCascade::new(vec![])),
            CharTokenizer,
        );
        let chunks = chunker.chunk(&"x".repeat(40)).unwrap();

        for (i, chunk) in chunks.iter().enumerate() {
            assert_eq!(chunk.index, i);
        }
        for pair in chunks.windows(2) {
            if pair[0].block_index == pair[1].block_index {
                assert_eq!(pair[1].sequence_index, pair[0].sequence_index + 1);
            } else {
                assert_eq!(pair[1].block_index, pair[0].block_index + 1);
                assert_eq!(pair[1].sequence_index, 0);
            }
        }
    }

    #[test]
    fn test_window_single_block() {
        let chunker = chunker(8, 3);
        let block = Block {
            text: "abcdefghijklm".to_string(),
            token_count: 13,
            segment_count: 1,
        };
        let chunks = chunker.window(&block).unwrap();
        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[0].content, "abcdefgh");
        assert_eq!(chunks[1].content, "fghijklm");
        assert_eq!(chunks[0].overlap_with(&chunks[1]), 3);
    }

    #[test]
    fn test_stages_compose_to_chunk() {
        let chunker = chunker(10, 4);
        let text = "甲乙丙丁。戊己庚辛。壬癸子丑。寅卯辰巳。";

        let segments = chunker.split(text).unwrap();
        let blocks = chunker.merge(segments).unwrap();
        let staged: Vec<String> = blocks
            .iter()
            .flat_map(|b| chunker.window(b).unwrap())
            .map(|c| c.content)
            .collect();

        let direct: Vec<String> = chunker.chunk(text).unwrap().into_iter().map(|c| c.content).collect();
        assert_eq!(staged, direct);
    }

    #[test]
    fn test_estimate_chunks() {
        let chunker = chunker(10, 5);
        assert_eq!(chunker.estimate_chunks(0), 0);
        assert_eq!(chunker.estimate_chunks(10), 1);
        assert_eq!(chunker.estimate_chunks(20), 3);
    }

    #[test]
    fn test_tokenizer_error_is_fatal() {
        struct Refuses;
        impl TokenCounter for Refuses {
            fn encode(&self, text: &str) -> Result<Vec<u32>> {
                if text.contains('\u{0}') {
                    return Err(Error::Tokenizer("nul byte".into()));
                }
                CharTokenizer.encode(text)
            }
            fn decode(&self, tokens: &[u32]) -> Result<String> {
                CharTokenizer.decode(tokens)
            }
        }

        let chunker = TokenChunker::new(ChunkerConfig::new(10, 2).unwrap(), Refuses);
        assert!(chunker.chunk("fine").is_ok());
        assert!(matches!(chunker.chunk("bad\u{0}input"), Err(Error::Tokenizer(_))));
    }
}
