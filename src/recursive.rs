//! Recursive token-bounded splitting.
//!
//! Tries progressively finer separators until every piece fits the token
//! budget, then falls back to slicing by raw token count.
//!
//! ## The Algorithm
//!
//! Given the statute cascade and `max_tokens = 500`:
//!
//! ```text
//! 1. All pieces <= 500 tokens?            -> done
//! 2. Separators left?  no                 -> slice oversized pieces every 500 tokens
//! 3. Take the next separator. For each piece > 500 tokens:
//!      pattern: split, drop the match, trim, drop empties
//!      literal: split, trim, drop empties, glue the separator back
//!               onto the previously emitted piece
//!    Pieces <= 500 tokens pass through untouched.
//! 4. Go to 1 with the separator removed.
//! ```
//!
//! Every level works on the whole piece list, so the loop runs at most
//! `separators.len() + 1` times. The final slicing step always produces
//! pieces within budget, which is what guarantees termination on
//! pathological input (a 50 000-character run of CJK text with no
//! punctuation still comes out as fixed-size slices).
//!
//! ## Literal Re-attachment
//!
//! ```text
//! "一、甲；二、乙；三、丙"  split on "；"
//!
//! sub 0: "一、甲"          -> emit "一、甲"
//! sub 1: "二、乙"          -> previous becomes "一、甲；", emit "二、乙"
//! sub 2: "三、丙"          -> previous becomes "二、乙；", emit "三、丙"
//! ```
//!
//! Each split point hands its separator to whatever piece was emitted last
//! *at this level*. Runs like `"甲；；乙"` keep both separators (`"甲；；"`),
//! and a trailing `。` stays on the sentence it closes. Whitespace separators
//! are only handed over before a non-empty piece, so `"a   b"` split on `" "`
//! gives `"a "` and `"b"`. Nothing is ever prepended: when an oversized piece
//! opens with the separator, it lands on the tail of the preceding piece, or
//! is dropped if there is none.

use crate::{Result, Separator, TokenBudget, TokenCounter};

/// An intermediate piece of text produced by the splitter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    /// The segment text.
    pub text: String,
    /// Token count as measured by the splitter.
    pub token_count: usize,
}

impl Segment {
    /// Create a segment with a known token count.
    #[must_use]
    pub fn new(text: impl Into<String>, token_count: usize) -> Self {
        Self {
            text: text.into(),
            token_count,
        }
    }

    /// Create a segment, counting its tokens.
    ///
    /// # Errors
    ///
    /// Propagates tokenizer failures.
    pub fn measure<T: TokenCounter + ?Sized>(text: impl Into<String>, tokenizer: &T) -> Result<Self> {
        let text = text.into();
        let token_count = tokenizer.count(&text)?;
        Ok(Self { text, token_count })
    }
}

/// A piece mid-level: the count is `None` once the text has changed.
struct Piece {
    text: String,
    tokens: Option<usize>,
}

impl Piece {
    fn fresh(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            tokens: None,
        }
    }

    fn counted(segment: Segment) -> Self {
        Self {
            text: segment.text,
            tokens: Some(segment.token_count),
        }
    }

    fn into_segment<T: TokenCounter + ?Sized>(self, tokenizer: &T) -> Result<Segment> {
        match self.tokens {
            Some(token_count) => Ok(Segment::new(self.text, token_count)),
            None => Segment::measure(self.text, tokenizer),
        }
    }
}

/// Split `text` into segments of at most `budget.max_tokens()` tokens.
///
/// # Errors
///
/// Propagates tokenizer failures. No partial result is returned.
///
/// # Examples
///
/// ```rust
/// use lexslab::{split, CharTokenizer, Separator, TokenBudget};
///
/// let budget = TokenBudget::no_overlap(4).unwrap();
/// let seps = [Separator::literal("；")];
/// let segments = split("甲乙；丙丁；戊己", &seps, budget, &CharTokenizer).unwrap();
///
/// let texts: Vec<&str> = segments.iter().map(|s| s.text.as_str()).collect();
/// assert_eq!(texts, ["甲乙；", "丙丁；", "戊己"]);
/// ```
pub fn split<T: TokenCounter + ?Sized>(
    text: &str,
    separators: &[Separator],
    budget: TokenBudget,
    tokenizer: &T,
) -> Result<Vec<Segment>> {
    if text.trim().is_empty() {
        return Ok(vec![]);
    }

    let mut segments = vec![Segment::measure(text, tokenizer)?];
    let mut remaining = separators;

    loop {
        if segments.iter().all(|s| budget.admits(s.token_count)) {
            return Ok(segments);
        }

        let Some((separator, rest)) = remaining.split_first() else {
            return force_split_all(segments, budget, tokenizer);
        };

        segments = split_level(segments, separator, budget, tokenizer)?;
        tracing::trace!(
            separator = separator.as_str(),
            remaining = rest.len(),
            segments = segments.len(),
            "applied separator"
        );
        remaining = rest;
    }
}

/// Apply one separator to every oversized segment.
fn split_level<T: TokenCounter + ?Sized>(
    segments: Vec<Segment>,
    separator: &Separator,
    budget: TokenBudget,
    tokenizer: &T,
) -> Result<Vec<Segment>> {
    let mut next: Vec<Piece> = Vec::with_capacity(segments.len());

    for segment in segments {
        if budget.admits(segment.token_count) {
            next.push(Piece::counted(segment));
            continue;
        }

        if separator.is_fallback() {
            next.extend(force_split(&segment.text, budget, tokenizer)?.into_iter().map(Piece::counted));
            continue;
        }

        match separator {
            Separator::Pattern(re) => {
                next.extend(
                    re.split(&segment.text)
                        .map(str::trim)
                        .filter(|s| !s.is_empty())
                        .map(Piece::fresh),
                );
            }
            Separator::Literal(lit) => {
                let visible = !lit.trim().is_empty();
                for (i, sub) in segment.text.split(lit.as_str()).enumerate() {
                    let sub = sub.trim();
                    if i > 0 && (visible || !sub.is_empty()) {
                        if let Some(prev) = next.last_mut() {
                            prev.text.push_str(lit);
                            prev.tokens = None;
                        }
                    }
                    if !sub.is_empty() {
                        next.push(Piece::fresh(sub));
                    }
                }
            }
        }
    }

    next.into_iter()
        .map(|piece| piece.into_segment(tokenizer))
        .collect()
}

/// Slice every oversized segment by tokens; pass the rest through.
fn force_split_all<T: TokenCounter + ?Sized>(
    segments: Vec<Segment>,
    budget: TokenBudget,
    tokenizer: &T,
) -> Result<Vec<Segment>> {
    let mut result = Vec::with_capacity(segments.len());
    for segment in segments {
        if budget.admits(segment.token_count) {
            result.push(segment);
        } else {
            result.extend(force_split(&segment.text, budget, tokenizer)?);
        }
    }
    Ok(result)
}

/// Cut `text` into consecutive windows of exactly `max_tokens` tokens.
///
/// No overlap here; overlap is applied after merging. The last window may
/// be shorter. Windows that decode to whitespace only are dropped.
fn force_split<T: TokenCounter + ?Sized>(
    text: &str,
    budget: TokenBudget,
    tokenizer: &T,
) -> Result<Vec<Segment>> {
    let tokens = tokenizer.encode(text)?;
    let mut segments = Vec::with_capacity(tokens.len().div_ceil(budget.max_tokens()));
    for window in tokens.chunks(budget.max_tokens()) {
        let text = tokenizer.decode(window)?;
        if !text.trim().is_empty() {
            segments.push(Segment::new(text, window.len()));
        }
    }
    Ok(segments)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{CharTokenizer, Error, SeparatorCascade};

    fn texts(segments: &[Segment]) -> Vec<&str> {
        segments.iter().map(|s| s.text.as_str()).collect()
    }

    fn budget(max: usize) -> TokenBudget {
        TokenBudget::no_overlap(max).unwrap()
    }

    #[test]
    fn test_fits_passes_through() {
        let segments = split("  short  ", SeparatorCascade::statute().as_slice(), budget(100), &CharTokenizer).unwrap();
        assert_eq!(texts(&segments), ["  short  "]);
        assert_eq!(segments[0].token_count, 9);
    }

    #[test]
    fn test_empty_text() {
        let seps = SeparatorCascade::statute();
        assert!(split("", seps.as_slice(), budget(10), &CharTokenizer).unwrap().is_empty());
        assert!(split(" \n\t ", seps.as_slice(), budget(10), &CharTokenizer).unwrap().is_empty());
    }

    #[test]
    fn test_whitespace_runs_do_not_pile_up() {
        let seps = SeparatorCascade::statute();
        let segments = split("aaaa   bbbb   cccc", seps.as_slice(), budget(6), &CharTokenizer).unwrap();
        assert_eq!(texts(&segments), ["aaaa ", "bbbb ", "cccc"]);
        assert!(segments.iter().all(|s| !s.text.trim().is_empty()));
    }

    #[test]
    fn test_whitespace_slices_dropped() {
        let segments = split("ab    cd", &[], budget(3), &CharTokenizer).unwrap();
        assert_eq!(texts(&segments), ["ab ", "cd"]);
    }

    #[test]
    fn test_paragraph_pattern_discards_break() {
        let seps = SeparatorCascade::prose();
        let segments = split("aaaa\n\n  bbbb", seps.as_slice(), budget(5), &CharTokenizer).unwrap();
        assert_eq!(texts(&segments), ["aaaa", "bbbb"]);
    }

    #[test]
    fn test_literal_reattached_to_previous() {
        let seps = [Separator::literal("。")];
        let segments = split("第一句。第二句。第三", &seps, budget(5), &CharTokenizer).unwrap();
        assert_eq!(texts(&segments), ["第一句。", "第二句。", "第三"]);
    }

    #[test]
    fn test_trailing_and_repeated_separators_kept() {
        let seps = [Separator::literal("。")];
        let segments = split("甲乙丙。丁戊己。", &seps, budget(4), &CharTokenizer).unwrap();
        assert_eq!(texts(&segments), ["甲乙丙。", "丁戊己。"]);

        let seps = [Separator::literal("；")];
        let segments = split("甲；；乙乙乙", &seps, budget(3), &CharTokenizer).unwrap();
        assert_eq!(texts(&segments), ["甲；；", "乙乙乙"]);
    }

    #[test]
    fn test_leading_separator_not_prepended() {
        // Nothing precedes the first split point, so that separator is
        // dropped; the second goes onto "甲乙丙" and pushes it over budget.
        let seps = [Separator::literal("；")];
        let segments = split("；甲乙丙；丁", &seps, budget(3), &CharTokenizer).unwrap();
        assert_eq!(texts(&segments), ["甲乙丙", "；", "丁"]);
    }

    #[test]
    fn test_reattachment_crosses_piece_boundary() {
        let seps = [Separator::pattern(r"\n{2,}").unwrap(), Separator::literal("；")];
        let segments = split("甲\n\n；乙乙乙乙", &seps, budget(4), &CharTokenizer).unwrap();
        assert_eq!(texts(&segments), ["甲；", "乙乙乙乙"]);
    }

    #[test]
    fn test_forced_split_without_separators() {
        let segments = split("abcdefghij", &[], budget(4), &CharTokenizer).unwrap();
        assert_eq!(texts(&segments), ["abcd", "efgh", "ij"]);
        assert_eq!(segments[2].token_count, 2);
    }

    #[test]
    fn test_unpunctuated_cjk_degrades_to_slices() {
        let seps = SeparatorCascade::statute();
        let segments = split("壓力容器安全檢查構造標準", seps.as_slice(), budget(5), &CharTokenizer).unwrap();
        assert_eq!(texts(&segments), ["壓力容器安", "全檢查構造", "標準"]);
    }

    #[test]
    fn test_fallback_mid_cascade_slices() {
        let seps = [Separator::fallback(), Separator::literal(" ")];
        let segments = split("ab cd ef", &seps, budget(3), &CharTokenizer).unwrap();
        assert_eq!(texts(&segments), ["ab ", "cd ", "ef"]);
    }

    #[test]
    fn test_respects_budget_and_order() {
        let text = "第4條 第一種壓力容器之受壓部分，不得使用附表一規定之材料。\n\n\
                    第5條 材料之容許抗拉應力，應依下列規定；但鑄造件，不在此限：一、鋼鐵材料。";
        let seps = SeparatorCascade::statute();
        let segments = split(text, seps.as_slice(), budget(12), &CharTokenizer).unwrap();

        for segment in &segments {
            assert!(segment.token_count <= 12, "segment too large: {:?}", segment);
        }
        let first = segments.iter().position(|s| s.text.contains("第4條")).unwrap();
        let second = segments.iter().position(|s| s.text.contains("第5條")).unwrap();
        assert!(first < second);
    }

    #[test]
    fn test_tokenizer_failure_propagates() {
        struct Broken;
        impl TokenCounter for Broken {
            fn encode(&self, _: &str) -> Result<Vec<u32>> {
                Err(Error::Tokenizer("unencodable".into()))
            }
            fn decode(&self, _: &[u32]) -> Result<String> {
                Ok(String::new())
            }
        }

        let err = split("anything", &[], budget(4), &Broken).unwrap_err();
        assert!(matches!(err, Error::Tokenizer(_)));
    }
}
