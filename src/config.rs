//! Chunker configuration.
//!
//! A [`ChunkerConfig`] is always valid: the budget has been checked and
//! every pattern compiled. Raw, serializable input lives in
//! [`ChunkerSettings`] and becomes a config through `TryFrom`, so a bad
//! setting fails before any document is touched.
//!
//! ```rust
//! use lexslab::{ChunkerConfig, ChunkerSettings};
//!
//! let settings = ChunkerSettings {
//!     max_tokens: 400,
//!     overlap: 100,
//!     ..ChunkerSettings::default()
//! };
//! let config = ChunkerConfig::try_from(settings).unwrap();
//! assert_eq!(config.budget().stride(), 300);
//! ```

use serde::{Deserialize, Serialize};

use crate::{Error, Result, SeparatorCascade, SeparatorSpec, TokenBudget};

/// Validated chunker configuration.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ChunkerConfig {
    budget: TokenBudget,
    separators: SeparatorCascade,
}

impl ChunkerConfig {
    /// Create a config with the statute cascade.
    ///
    /// # Errors
    ///
    /// See [`TokenBudget::new`].
    pub fn new(max_tokens: usize, overlap: usize) -> Result<Self> {
        Ok(Self {
            budget: TokenBudget::new(max_tokens, overlap)?,
            separators: SeparatorCascade::default(),
        })
    }

    /// Replace the separator cascade.
    #[must_use]
    pub fn with_separators(mut self, separators: SeparatorCascade) -> Self {
        self.separators = separators;
        self
    }

    /// The token budget.
    #[must_use]
    pub fn budget(&self) -> TokenBudget {
        self.budget
    }

    /// The separator cascade.
    #[must_use]
    pub fn separators(&self) -> &SeparatorCascade {
        &self.separators
    }
}

impl From<TokenBudget> for ChunkerConfig {
    fn from(budget: TokenBudget) -> Self {
        Self {
            budget,
            separators: SeparatorCascade::default(),
        }
    }
}

/// Serializable chunker settings.
///
/// Every field is optional on input; omitted fields take the defaults
/// (`500` tokens, `200` overlap, statute cascade).
///
/// ```json
/// {
///   "max_tokens": 256,
///   "overlap": 32,
///   "separators": [
///     { "kind": "pattern", "value": "\\n{2,}" },
///     { "kind": "literal", "value": "。" },
///     { "kind": "literal", "value": "" }
///   ]
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChunkerSettings {
    /// Token ceiling per chunk.
    pub max_tokens: usize,
    /// Tokens shared between consecutive chunks of one block.
    pub overlap: usize,
    /// Separator cascade, coarsest first.
    pub separators: Vec<SeparatorSpec>,
}

impl Default for ChunkerSettings {
    fn default() -> Self {
        let budget = TokenBudget::default();
        Self {
            max_tokens: budget.max_tokens(),
            overlap: budget.overlap(),
            separators: SeparatorCascade::default().to_specs(),
        }
    }
}

impl TryFrom<ChunkerSettings> for ChunkerConfig {
    type Error = Error;

    fn try_from(settings: ChunkerSettings) -> Result<Self> {
        Ok(Self {
            budget: TokenBudget::new(settings.max_tokens, settings.overlap)?,
            separators: SeparatorCascade::from_specs(settings.separators)?,
        })
    }
}

impl From<&ChunkerConfig> for ChunkerSettings {
    fn from(config: &ChunkerConfig) -> Self {
        Self {
            max_tokens: config.budget.max_tokens(),
            overlap: config.budget.overlap(),
            separators: config.separators.to_specs(),
        }
    }
}
