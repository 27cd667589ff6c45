//! Local embedding with fastembed.
//!
//! Statute text is mostly Chinese with Latin article references and CNS
//! standard numbers mixed in, so the default model is multilingual
//! (`multilingual-e5-large`, 1024 dimensions). Any fastembed model can be
//! substituted.
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use lexslab::{FastEmbedder, Ingestor};
//!
//! let embedder = FastEmbedder::multilingual()?;
//! let ingestor = Ingestor::new(chunker, sink).with_embedder(Arc::new(embedder));
//! ```

use fastembed::{EmbeddingModel, InitOptions, TextEmbedding};

use crate::{Embedder, Error, Result};

/// [`Embedder`] backed by a local fastembed model.
pub struct FastEmbedder {
    model: TextEmbedding,
    batch_size: Option<usize>,
}

impl FastEmbedder {
    /// Load `multilingual-e5-large`.
    ///
    /// # Errors
    ///
    /// Returns an error if the model fails to download or load.
    pub fn multilingual() -> Result<Self> {
        Self::with_model(EmbeddingModel::MultilingualE5Large)
    }

    /// Load a specific fastembed model.
    ///
    /// # Errors
    ///
    /// Returns an error if the model fails to download or load.
    pub fn with_model(model: EmbeddingModel) -> Result<Self> {
        let model = TextEmbedding::try_new(InitOptions::new(model))
            .map_err(|e| Error::Embedding(e.to_string()))?;

        Ok(Self {
            model,
            batch_size: None,
        })
    }

    /// Set the inference batch size (fastembed's default otherwise).
    #[must_use]
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = Some(batch_size);
        self
    }
}

impl Embedder for FastEmbedder {
    fn embed(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        self.model
            .embed(texts.to_vec(), self.batch_size)
            .map_err(|e| Error::Embedding(e.to_string()))
    }
}

impl std::fmt::Debug for FastEmbedder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FastEmbedder")
            .field("batch_size", &self.batch_size)
            .finish_non_exhaustive()
    }
}
