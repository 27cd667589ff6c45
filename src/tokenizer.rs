//! Token counting: the only external capability the chunker consumes.
//!
//! Every size decision in this crate is made in tokens, not bytes. The
//! [`TokenCounter`] trait is the seam: it turns text into token ids and back.
//!
//! ## Round-Trip Stability
//!
//! `decode(encode(t))` must be *semantically* equivalent to `t` for counting
//! purposes. Byte-for-byte equality is not required: BPE tokenizers can cut a
//! multi-byte character in half at a window boundary, and decoding such a
//! window yields a replacement character rather than an error.
//!
//! ## Implementations
//!
//! | Counter | Feature | One token is |
//! |---------|---------|--------------|
//! | [`CharTokenizer`] | always | one Unicode scalar value |
//! | `TiktokenCounter` | `tiktoken` | one `cl100k_base` BPE token |
//!
//! The char counter is exact and lossless, which makes it the natural choice
//! for tests and for scripts without inter-word spacing where every glyph is
//! roughly one model token anyway.

use std::sync::Arc;

use crate::{Error, Result};

/// Converts text to token ids and back.
///
/// Implementations must be deterministic and stateless from the caller's
/// point of view: the chunker shares one counter across documents and
/// threads without synchronization.
pub trait TokenCounter: Send + Sync {
    /// Encode text into a token-id sequence.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Tokenizer`] if the text cannot be encoded.
    fn encode(&self, text: &str) -> Result<Vec<u32>>;

    /// Decode a token-id sequence back into text.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Tokenizer`] if an id is not part of the vocabulary.
    fn decode(&self, tokens: &[u32]) -> Result<String>;

    /// Count the tokens in `text`.
    ///
    /// The default encodes and measures; override when the backend can count
    /// without materializing ids.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Tokenizer`] if the text cannot be encoded.
    fn count(&self, text: &str) -> Result<usize> {
        if text.is_empty() {
            return Ok(0);
        }
        Ok(self.encode(text)?.len())
    }
}

impl<T: TokenCounter + ?Sized> TokenCounter for &T {
    fn encode(&self, text: &str) -> Result<Vec<u32>> {
        (**self).encode(text)
    }

    fn decode(&self, tokens: &[u32]) -> Result<String> {
        (**self).decode(tokens)
    }

    fn count(&self, text: &str) -> Result<usize> {
        (**self).count(text)
    }
}

impl<T: TokenCounter + ?Sized> TokenCounter for Arc<T> {
    fn encode(&self, text: &str) -> Result<Vec<u32>> {
        (**self).encode(text)
    }

    fn decode(&self, tokens: &[u32]) -> Result<String> {
        (**self).decode(tokens)
    }

    fn count(&self, text: &str) -> Result<usize> {
        (**self).count(text)
    }
}

/// One token per Unicode scalar value.
///
/// Token ids are the scalar values themselves, so the round trip is exact.
///
/// ```rust
/// use lexslab::{CharTokenizer, TokenCounter};
///
/// let tok = CharTokenizer;
/// assert_eq!(tok.count("第4條").unwrap(), 3);
///
/// let ids = tok.encode("法規").unwrap();
/// assert_eq!(tok.decode(&ids).unwrap(), "法規");
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CharTokenizer;

impl TokenCounter for CharTokenizer {
    fn encode(&self, text: &str) -> Result<Vec<u32>> {
        Ok(text.chars().map(u32::from).collect())
    }

    fn decode(&self, tokens: &[u32]) -> Result<String> {
        tokens
            .iter()
            .map(|&id| {
                char::from_u32(id)
                    .ok_or_else(|| Error::Tokenizer(format!("token id {id:#x} is not a scalar value")))
            })
            .collect()
    }

    fn count(&self, text: &str) -> Result<usize> {
        Ok(text.chars().count())
    }
}

/// `cl100k_base` BPE counter (the encoding used by gpt-3.5-turbo and gpt-4).
///
/// Document text is encoded as ordinary text: a literal `<|endoftext|>` in
/// an article is counted as the characters it is, never as a control token.
/// Only ordinary vocabulary ids decode.
///
/// Construct once and share; loading the ranks is the expensive part.
#[cfg(feature = "tiktoken")]
pub struct TiktokenCounter {
    bpe: tiktoken_rs::CoreBPE,
}

/// Number of ordinary (non-special) ranks in `cl100k_base`; ids are dense.
#[cfg(feature = "tiktoken")]
const CL100K_ORDINARY_RANKS: u32 = 100_256;

#[cfg(feature = "tiktoken")]
impl TiktokenCounter {
    /// Load the `cl100k_base` encoding.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Tokenizer`] if the encoding data fails to load.
    pub fn cl100k() -> Result<Self> {
        let bpe = tiktoken_rs::cl100k_base().map_err(|e| Error::Tokenizer(e.to_string()))?;
        Ok(Self { bpe })
    }
}

#[cfg(feature = "tiktoken")]
impl TokenCounter for TiktokenCounter {
    fn encode(&self, text: &str) -> Result<Vec<u32>> {
        Ok(self.bpe.encode_ordinary(text))
    }

    fn decode(&self, tokens: &[u32]) -> Result<String> {
        if let Some(id) = tokens.iter().find(|&&id| id >= CL100K_ORDINARY_RANKS) {
            return Err(Error::Tokenizer(format!("token id {id} is not in the cl100k_base vocabulary")));
        }
        // Windows may end inside a multi-byte character; decode lossily
        // instead of rejecting the window.
        let bytes: Vec<u8> = self
            .bpe
            ._decode_native_and_split(tokens.to_vec())
            .flatten()
            .collect();
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }
}

#[cfg(feature = "tiktoken")]
impl std::fmt::Debug for TiktokenCounter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TiktokenCounter")
            .field("encoding", &"cl100k_base")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_char_count_is_scalar_count() {
        let tok = CharTokenizer;
        assert_eq!(tok.count("").unwrap(), 0);
        assert_eq!(tok.count("abc").unwrap(), 3);
        assert_eq!(tok.count("壓力容器").unwrap(), 4);
    }

    #[test]
    fn test_char_round_trip() {
        let tok = CharTokenizer;
        let text = "Art. 5；材料之容許抗拉應力。";
        let ids = tok.encode(text).unwrap();
        assert_eq!(ids.len(), tok.count(text).unwrap());
        assert_eq!(tok.decode(&ids).unwrap(), text);
    }

    #[test]
    fn test_char_decode_rejects_surrogates() {
        let tok = CharTokenizer;
        let err = tok.decode(&[0xD800]).unwrap_err();
        assert!(matches!(err, Error::Tokenizer(_)));
    }

    #[test]
    fn test_shared_handles_delegate() {
        let tok = Arc::new(CharTokenizer);
        assert_eq!(tok.count("hello").unwrap(), 5);
        let by_ref = &CharTokenizer;
        assert_eq!(by_ref.encode("hi").unwrap(), vec![104, 105]);
    }
}
