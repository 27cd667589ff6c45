//! Ingestion with a local fastembed model.

#![cfg(feature = "embed")]

use std::sync::Arc;

use lexslab::{
    CharTokenizer, ChunkRecord, ChunkerConfig, DocumentMeta, FastEmbedder, Ingestor, TokenChunker,
};

#[test]
#[ignore] // Requires fastembed model download
fn ingested_records_carry_vectors() {
    let text = "第4條 第一種壓力容器之受壓部分，不得使用附表一規定之材料。\n\n\
                第5條 材料之容許抗拉應力，應依下列規定。";

    let embedder = FastEmbedder::multilingual().expect("Failed to load embedding model");
    let chunker = TokenChunker::new(ChunkerConfig::new(24, 6).unwrap(), CharTokenizer);
    let mut ingestor = Ingestor::new(chunker, Vec::<ChunkRecord>::new()).with_embedder(Arc::new(embedder));

    let report = ingestor
        .ingest(text, &DocumentMeta::act("壓力容器安全檢查構造標準"))
        .unwrap();
    assert!(report.chunks > 1);
    assert_eq!(report.stored, report.chunks);

    let records = ingestor.into_sink();
    let dim = records[0].embedding.as_ref().map(Vec::len).unwrap();
    assert_eq!(dim, 1024);
    assert!(records.iter().all(|r| r.embedding.as_ref().is_some_and(|v| v.len() == dim)));
}
