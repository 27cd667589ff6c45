//! Handing chunks downstream: embedding and persistence.
//!
//! The chunker stops at [`Chunk`]. What happens next (an embedding model,
//! a vector table) lives behind two traits:
//!
//! - [`Embedder`]: chunk texts in, one vector per text out.
//! - [`ChunkSink`]: accepts a [`ChunkRecord`] and persists it.
//!
//! [`Ingestor`] drives one document through both.
//!
//! ## Content-Addressed Ids
//!
//! Each record carries a stable id derived from where the chunk came from
//! and what it says:
//!
//! ```text
//! sha256("{act_name}-{chapter}-{article_no}-{index}-{content}")
//! ```
//!
//! Missing chapter or article numbers hash as empty strings. Re-ingesting an
//! unchanged article yields the same ids, so a sink keyed on them can
//! upsert instead of duplicating.
//!
//! ## Failure Model
//!
//! Chunking and embedding failures abort the document: token accounting
//! and vector/chunk pairing must be consistent across the whole article.
//! A sink failure affects one record only. It is logged and counted, and
//! the remaining records are still offered.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::{Chunk, Chunker, Error, Result};

/// Where a document sits in the body of law.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DocumentMeta {
    /// Name of the act or standard.
    pub act_name: String,
    /// Chapter heading, if the act has chapters.
    pub chapter: Option<String>,
    /// Article number, e.g. `第4條`.
    pub article_no: Option<String>,
}

impl DocumentMeta {
    /// Metadata for a whole act with no chapter or article.
    #[must_use]
    pub fn act(act_name: impl Into<String>) -> Self {
        Self {
            act_name: act_name.into(),
            ..Self::default()
        }
    }

    /// Set the chapter.
    #[must_use]
    pub fn with_chapter(mut self, chapter: impl Into<String>) -> Self {
        self.chapter = Some(chapter.into());
        self
    }

    /// Set the article number.
    #[must_use]
    pub fn with_article(mut self, article_no: impl Into<String>) -> Self {
        self.article_no = Some(article_no.into());
        self
    }
}

/// Stable, content-derived id for a chunk: lowercase hex SHA-256.
///
/// ```rust
/// use lexslab::{chunk_id, DocumentMeta};
///
/// let meta = DocumentMeta::act("act").with_chapter("ch1").with_article("art2");
/// assert_eq!(
///     chunk_id(&meta, 3, "text"),
///     "19921e23c8b036f8e76f67823d142240238024dead858793981813bf9149ef82"
/// );
/// ```
#[must_use]
pub fn chunk_id(meta: &DocumentMeta, chunk_index: usize, content: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(meta.act_name.as_bytes());
    hasher.update(b"-");
    hasher.update(meta.chapter.as_deref().unwrap_or_default().as_bytes());
    hasher.update(b"-");
    hasher.update(meta.article_no.as_deref().unwrap_or_default().as_bytes());
    hasher.update(format!("-{chunk_index}-").as_bytes());
    hasher.update(content.as_bytes());
    hex::encode(hasher.finalize())
}

/// Turns chunk texts into vectors.
pub trait Embedder: Send + Sync {
    /// Embed a batch. Must return exactly one vector per input, in order.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Embedding`] if the model fails.
    fn embed(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>>;
}

/// A chunk ready for persistence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChunkRecord {
    /// See [`chunk_id`].
    pub id: String,
    /// Source document metadata.
    pub meta: DocumentMeta,
    /// The chunk itself.
    pub chunk: Chunk,
    /// The chunk's vector, when an embedder is configured.
    pub embedding: Option<Vec<f32>>,
}

/// Persists chunk records.
pub trait ChunkSink {
    /// Store one record.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Sink`] if the record could not be stored.
    fn put(&mut self, record: ChunkRecord) -> Result<()>;
}

impl ChunkSink for Vec<ChunkRecord> {
    fn put(&mut self, record: ChunkRecord) -> Result<()> {
        self.push(record);
        Ok(())
    }
}

/// Outcome of ingesting one document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct IngestReport {
    /// Chunks produced.
    pub chunks: usize,
    /// Records the sink accepted.
    pub stored: usize,
    /// Records the sink rejected.
    pub failed: usize,
}

/// Drives documents through chunker, embedder, and sink.
///
/// ```rust
/// use lexslab::{CharTokenizer, ChunkRecord, ChunkerConfig, DocumentMeta, Ingestor, TokenChunker};
///
/// let chunker = TokenChunker::new(ChunkerConfig::new(32, 8).unwrap(), CharTokenizer);
/// let mut ingestor = Ingestor::new(chunker, Vec::<ChunkRecord>::new());
///
/// let meta = DocumentMeta::act("壓力容器安全檢查構造標準").with_article("第4條");
/// let report = ingestor.ingest("第一種壓力容器不得使用附表一規定之材料。", &meta).unwrap();
///
/// assert_eq!(report.chunks, 1);
/// assert_eq!(ingestor.sink()[0].meta, meta);
/// ```
pub struct Ingestor<C, S> {
    chunker: C,
    sink: S,
    embedder: Option<Arc<dyn Embedder>>,
}

impl<C: Chunker, S: ChunkSink> Ingestor<C, S> {
    /// Create an ingestor with no embedder; records carry no vectors.
    #[must_use]
    pub fn new(chunker: C, sink: S) -> Self {
        Self {
            chunker,
            sink,
            embedder: None,
        }
    }

    /// Embed every chunk before storing it.
    #[must_use]
    pub fn with_embedder(mut self, embedder: Arc<dyn Embedder>) -> Self {
        self.embedder = Some(embedder);
        self
    }

    /// The sink.
    #[must_use]
    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Consume the ingestor, returning the sink.
    #[must_use]
    pub fn into_sink(self) -> S {
        self.sink
    }

    /// Chunk, embed, and store one document.
    ///
    /// # Errors
    ///
    /// - Tokenizer errors from chunking.
    /// - [`Error::Embedding`] or [`Error::EmbeddingCount`] from the embedder.
    ///
    /// Sink errors are not returned; see [`IngestReport::failed`].
    pub fn ingest(&mut self, text: &str, meta: &DocumentMeta) -> Result<IngestReport> {
        let chunks = self.chunker.chunk(text)?;
        let mut report = IngestReport {
            chunks: chunks.len(),
            ..IngestReport::default()
        };

        if chunks.is_empty() {
            tracing::warn!(act = %meta.act_name, "no chunks produced, skipping");
            return Ok(report);
        }

        let embeddings: Vec<Option<Vec<f32>>> = match &self.embedder {
            Some(embedder) => {
                let texts: Vec<&str> = chunks.iter().map(|c| c.content.as_str()).collect();
                let vectors = embedder.embed(&texts)?;
                if vectors.len() != chunks.len() {
                    return Err(Error::EmbeddingCount {
                        expected: chunks.len(),
                        actual: vectors.len(),
                    });
                }
                vectors.into_iter().map(Some).collect()
            }
            None => vec![None; chunks.len()],
        };

        for (chunk, embedding) in chunks.into_iter().zip(embeddings) {
            let record = ChunkRecord {
                id: chunk_id(meta, chunk.index, &chunk.content),
                meta: meta.clone(),
                chunk,
                embedding,
            };
            let index = record.chunk.index;
            match self.sink.put(record) {
                Ok(()) => report.stored += 1,
                Err(e) => {
                    tracing::warn!(
                        act = %meta.act_name,
                        article = meta.article_no.as_deref().unwrap_or_default(),
                        index,
                        error = %e,
                        "failed to store chunk"
                    );
                    report.failed += 1;
                }
            }
        }

        tracing::info!(
            act = %meta.act_name,
            chunks = report.chunks,
            stored = report.stored,
            failed = report.failed,
            "document ingested"
        );
        Ok(report)
    }
}

impl<C, S> std::fmt::Debug for Ingestor<C, S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Ingestor")
            .field("embedder", &self.embedder.is_some())
            .finish_non_exhaustive()
    }
}
