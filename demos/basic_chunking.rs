//! Basic Statute Chunking
//!
//! Chunk two articles of a pressure vessel standard and print the pieces.
//!
//! ```bash
//! cargo run --example basic_chunking
//! cargo run --example basic_chunking --features tiktoken
//! ```

use lexslab::{Chunker, ChunkerConfig, Result, TokenChunker, TokenCounter};

const ARTICLES: &str = "第4條 第一種壓力容器或第一種壓力容器之受壓部分，不得使用附表一規定之材料。\
但經中央主管機關認可者，不在此限。\n\n\
第5條 第一種壓力容器材料之容許抗拉應力，應依下列規定：\n\
一、鋼鐵材料在常溫之容許抗拉應力，取其抗拉強度最小值之四分之一；\n\
二、鑄鋼品之容許抗拉應力，取前款規定值之百分之八十；\n\
三、球狀石墨鑄鐵品之容許抗拉應力，取其抗拉強度最小值之五分之一。";

fn show<T: TokenCounter>(name: &str, chunker: &TokenChunker<T>) -> Result<()> {
    let chunks = chunker.chunk(ARTICLES)?;

    println!("== {name} ==");
    println!("Chunks: {}\n", chunks.len());
    for chunk in &chunks {
        println!("{chunk}");
        println!("  {:?}\n", chunk.content);
    }
    Ok(())
}

fn main() -> Result<()> {
    // Character counting: 48 chars per chunk, 12 repeated between neighbours.
    let config = ChunkerConfig::new(48, 12)?;
    show("chars", &TokenChunker::new(config, lexslab::CharTokenizer))?;

    // The same article under cl100k_base, where a CJK character is often
    // more than one token.
    #[cfg(feature = "tiktoken")]
    {
        let config = ChunkerConfig::new(64, 16)?;
        show("cl100k_base", &TokenChunker::new(config, lexslab::TiktokenCounter::cl100k()?))?;
    }

    Ok(())
}
