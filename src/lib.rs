//! # lexslab
//!
//! Token-bounded recursive chunking for regulatory text.
//!
//! ## The Problem
//!
//! Statutes are long. Embedding models are not. An article of a pressure
//! vessel standard can run to thousands of tokens in one unbroken paragraph
//! of Chinese legal prose, while the model that embeds it accepts a few
//! hundred. The text has to be cut, and where it is cut matters:
//!
//! - A clause split mid-sentence retrieves badly
//! - A sub-item (`一、` `二、`) separated from its heading loses its subject
//! - A cut with no overlap can strand a condition in neither chunk
//! - Byte or character limits are meaningless to the model; tokens are what count
//!
//! ## The Pipeline
//!
//! ```text
//!          ┌──────────┐   segments   ┌───────┐   blocks   ┌────────┐   chunks
//! text ──▶ │  split   │ ───────────▶ │ merge │ ─────────▶ │ window │ ─────────▶
//!          └──────────┘              └───────┘            └────────┘
//!   separator cascade,         greedy "\n" joins      max_tokens windows,
//!   token slicing last         up to max_tokens       stride = max - overlap
//! ```
//!
//! ### Split
//!
//! Cut oversized text on the coarsest boundary first: paragraphs, then
//! lines, clauses (`；`), sentences (`。` `. `), commas, words. When nothing
//! is left, slice by raw token count. Every piece ends up within budget.
//!
//! ### Merge
//!
//! Splitting on `。` turns a paragraph into one segment per sentence. The
//! merger walks them in order and rejoins neighbours while the result still
//! fits, so chunks come out close to the budget rather than one per sentence.
//!
//! ### Window
//!
//! Each merged block is re-encoded and covered by fixed windows of
//! `max_tokens` tokens advancing by `max_tokens - overlap`. Consecutive
//! chunks of one block share exactly `overlap` tokens; blocks never overlap
//! each other.
//!
//! ## Quick Start
//!
//! ```rust
//! use lexslab::{CharTokenizer, Chunker, ChunkerConfig, TokenChunker};
//!
//! let text = "第4條 第一種壓力容器或第一種壓力容器之受壓部分，不得使用附表一規定之材料。\n\n\
//!             第5條 材料之容許抗拉應力，應依下列規定。但鑄造件，不在此限。";
//!
//! // 40 tokens per chunk, 10 shared between neighbours
//! let config = ChunkerConfig::new(40, 10).unwrap();
//! let chunker = TokenChunker::new(config, CharTokenizer);
//! let chunks = chunker.chunk(text).unwrap();
//!
//! for chunk in &chunks {
//!     assert!(chunk.token_count <= 40);
//! }
//! ```
//!
//! With a real BPE vocabulary (requires the `tiktoken` feature):
//!
//! ```rust,ignore
//! use lexslab::{chunk_document, ChunkerConfig, TiktokenCounter};
//!
//! let tok = TiktokenCounter::cl100k()?;
//! let chunks = chunk_document(article, &ChunkerConfig::default(), &tok)?;
//! ```
//!
//! ## Downstream
//!
//! The [`ingest`] module hands chunks to an [`Embedder`] and a [`ChunkSink`]
//! under content-derived ids. Storage and retrieval live behind those traits.
//!
//! ## Features
//!
//! | Feature | Adds |
//! |---------|------|
//! | `tiktoken` | `TiktokenCounter` (`cl100k_base`) |
//! | `embed` | `FastEmbedder` (fastembed) |

mod budget;
mod chunk;
mod chunker;
mod config;
mod error;
mod merge;
mod recursive;
mod separator;
mod tokenizer;
mod window;

pub mod ingest;

#[cfg(feature = "embed")]
mod embed;

pub use budget::TokenBudget;
pub use chunk::Chunk;
pub use chunker::{chunk_document, TokenChunker};
pub use config::{ChunkerConfig, ChunkerSettings};
pub use error::{Error, Result};
pub use ingest::{chunk_id, ChunkRecord, ChunkSink, DocumentMeta, Embedder, IngestReport, Ingestor};
pub use merge::{merge, Block};
pub use recursive::{split, Segment};
pub use separator::{Separator, SeparatorCascade, SeparatorKind, SeparatorSpec};
pub use tokenizer::{CharTokenizer, TokenCounter};
pub use window::{estimate_windows, window, window_spans, Window};

#[cfg(feature = "tiktoken")]
pub use tokenizer::TiktokenCounter;

#[cfg(feature = "embed")]
pub use embed::FastEmbedder;

/// A text chunking strategy.
///
/// Implemented by [`TokenChunker`]; the ingestion driver accepts any
/// implementation:
///
/// ```rust
/// use lexslab::{CharTokenizer, Chunk, Chunker, ChunkerConfig, TokenChunker};
///
/// fn chunk_article(chunker: &dyn Chunker, text: &str) -> Vec<Chunk> {
///     chunker.chunk(text).unwrap_or_default()
/// }
///
/// let chunker = TokenChunker::new(ChunkerConfig::new(64, 16).unwrap(), CharTokenizer);
/// let chunks = chunk_article(&chunker, "第1條 本標準依職業安全衛生法第十六條第四項規定訂定之。");
/// assert_eq!(chunks.len(), 1);
/// ```
pub trait Chunker: Send + Sync {
    /// Split text into chunks.
    ///
    /// # Errors
    ///
    /// Fails if the token counter fails; there is no partial output.
    fn chunk(&self, text: &str) -> Result<Vec<Chunk>>;

    /// Estimate the number of chunks for a text of `token_len` tokens.
    ///
    /// Useful for pre-allocation. May be approximate.
    fn estimate_chunks(&self, token_len: usize) -> usize {
        // Conservative default
        (token_len / 500).max(1)
    }
}
