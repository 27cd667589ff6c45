//! Chunking with the cl100k_base vocabulary.
//!
//! CJK text rarely maps one character to one token under BPE, so these
//! tests check the budget against a fresh count rather than `chars()`.

#![cfg(feature = "tiktoken")]

use lexslab::{chunk_document, ChunkerConfig, Error, TiktokenCounter, TokenCounter};

const ARTICLE: &str = "第5條 第一種壓力容器材料之容許抗拉應力，應依下列規定：\n\
一、鋼鐵材料在常溫之容許抗拉應力，取其抗拉強度最小值之四分之一；\n\
二、鑄鋼品之容許抗拉應力，取前款規定值之百分之八十；\n\
三、球狀石墨鑄鐵品之容許抗拉應力，取其抗拉強度最小值之五分之一。";

#[test]
fn cl100k_round_trips_ascii() {
    let tok = TiktokenCounter::cl100k().unwrap();
    let tokens = tok.encode("Pressure vessels, CNS 9788.").unwrap();
    assert!(!tokens.is_empty());
    assert_eq!(tok.decode(&tokens).unwrap(), "Pressure vessels, CNS 9788.");
}

#[test]
fn every_token_prefix_decodes() {
    // Prefixes can end inside a multi-byte character; they must still decode.
    let tok = TiktokenCounter::cl100k().unwrap();
    let text = "壓力容器安全檢查構造標準";
    let tokens = tok.encode(text).unwrap();

    for end in 0..=tokens.len() {
        assert!(tok.decode(&tokens[..end]).is_ok(), "prefix of {end} tokens");
    }
    assert_eq!(tok.decode(&tokens).unwrap(), text);
}

#[test]
fn ids_outside_vocabulary_are_rejected() {
    let tok = TiktokenCounter::cl100k().unwrap();
    for id in [100_256, 100_257, u32::MAX] {
        assert!(matches!(tok.decode(&[0, id]), Err(Error::Tokenizer(_))), "id {id}");
    }
}

#[test]
fn special_token_text_is_ordinary_text() {
    let tok = TiktokenCounter::cl100k().unwrap();
    let text = "第7條 <|endoftext|> 不在此限";
    let tokens = tok.encode(text).unwrap();

    assert!(tokens.iter().all(|&id| id < 100_256));
    assert_eq!(tok.decode(&tokens).unwrap(), text);
}

#[test]
fn chunks_fit_cl100k_budget() {
    let tok = TiktokenCounter::cl100k().unwrap();
    let config = ChunkerConfig::new(40, 10).unwrap();
    let chunks = chunk_document(ARTICLE, &config, &tok).unwrap();

    assert!(chunks.len() > 1);
    for chunk in &chunks {
        assert!(chunk.token_count <= 40);
        assert_eq!(chunk.token_count, chunk.span.len());
    }
}

#[test]
fn default_budget_keeps_short_article_whole() {
    let tok = TiktokenCounter::cl100k().unwrap();
    let chunks = chunk_document(ARTICLE, &ChunkerConfig::default(), &tok).unwrap();

    assert_eq!(chunks.len(), 1);
    assert_eq!(chunks[0].content, ARTICLE);
}
