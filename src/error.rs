//! Error types for lexslab.

/// Errors that can occur during chunking and ingestion.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Invalid token budget (must be > 0).
    ///
    /// A budget of zero cannot hold even a single token, so no chunk could
    /// ever be emitted.
    #[error("invalid max_tokens: {0} (must be > 0)")]
    InvalidMaxTokens(usize),

    /// Overlap is not strictly smaller than the token budget.
    #[error("overlap {overlap} must be < max_tokens {max_tokens}")]
    OverlapExceedsMax {
        /// The token budget.
        max_tokens: usize,
        /// The overlap that was too large.
        overlap: usize,
    },

    /// A pattern separator failed to compile.
    #[error("invalid separator pattern: {0}")]
    InvalidPattern(#[from] regex::Error),

    /// The token counter failed to encode or decode.
    #[error("tokenizer error: {0}")]
    Tokenizer(String),

    /// Embedding model error.
    #[error("embedding error: {0}")]
    Embedding(String),

    /// The embedder returned a different number of vectors than inputs.
    #[error("embedder returned {actual} vectors for {expected} chunks")]
    EmbeddingCount {
        /// Number of chunks sent.
        expected: usize,
        /// Number of vectors received.
        actual: usize,
    },

    /// The chunk sink rejected a record.
    #[error("sink error: {0}")]
    Sink(String),
}

/// Result type for lexslab operations.
pub type Result<T> = std::result::Result<T, Error>;
