use std::path::{Path, PathBuf};
use std::time::Instant;
use thiserror::Error;

use super::chunker::{ChunkError, Chunker};
use super::extractor::{Extractor, TestCaseRecord};
use super::loader::{CompositeLoader, LoadError, SourceLoader};
use super::normalizer::normalize_text;
use super::persist::{write_records, PersistError};
use crate::config::ChunkingConfig;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Load error: {0}")]
    Load(#[from] LoadError),
    #[error("Chunking error: {0}")]
    Chunk(#[from] ChunkError),
    #[error("Output error: {0}")]
    Persist(#[from] PersistError),
}

pub type PipelineResult<T> = Result<T, PipelineError>;

/// Counts for one finished run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunReport {
    pub chunks_total: usize,
    pub chunks_extracted: usize,
    pub chunks_failed: usize,
    pub chunks_blank: usize,
    pub records: usize,
    pub output_path: PathBuf,
    pub duration_ms: u64,
}

/// Load → normalize → chunk → extract → persist, one chunk at a time.
pub struct TestCasePipeline {
    loader: Box<dyn SourceLoader>,
    extractor: Box<dyn Extractor>,
    chunker: Chunker,
}

impl TestCasePipeline {
    pub fn new(extractor: Box<dyn Extractor>, chunking: &ChunkingConfig) -> PipelineResult<Self> {
        Ok(Self {
            loader: Box::new(CompositeLoader::default()),
            extractor,
            chunker: chunking.chunker()?,
        })
    }

    #[must_use]
    pub fn with_loader(mut self, loader: Box<dyn SourceLoader>) -> Self {
        self.loader = loader;
        self
    }

    pub const fn chunker(&self) -> &Chunker {
        &self.chunker
    }

    /// Runs the whole pipeline for one document and writes the report.
    pub async fn run(&self, source: &Path, output: &Path) -> PipelineResult<RunReport> {
        let start = Instant::now();
        tracing::info!("Starting process for document at: {}", source.display());

        let raw = self.loader.load(source).await?;
        let (records, mut report) = self.extract_text(&raw).await;

        write_records(output, &records).await?;

        report.output_path = output.to_path_buf();
        report.duration_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);
        tracing::info!("Total test cases extracted: {}", report.records);
        tracing::info!("Results saved to: {}", output.display());

        Ok(report)
    }

    /// Normalizes, chunks and extracts without touching the filesystem.
    /// Records come back grouped by chunk, in chunk order.
    pub async fn extract_text(&self, raw: &str) -> (Vec<TestCaseRecord>, RunReport) {
        let text = normalize_text(raw);

        tracing::info!(
            "Chunking text with size={} and overlap={}",
            self.chunker.size(),
            self.chunker.overlap()
        );
        let chunks = self.chunker.split(&text);
        tracing::info!("Created {} chunks", chunks.len());

        let mut report = RunReport {
            chunks_total: chunks.len(),
            ..RunReport::default()
        };
        let mut records: Vec<TestCaseRecord> = Vec::new();

        for chunk in &chunks {
            let number = chunk.index + 1;

            if chunk.is_blank() {
                tracing::debug!("Skipping blank chunk {}", number);
                report.chunks_blank += 1;
                continue;
            }

            tracing::info!("Processing chunk {} of {}...", number, chunks.len());

            match self.extractor.extract(chunk.text.trim()).await {
                Ok(found) if found.is_empty() => {
                    report.chunks_extracted += 1;
                    tracing::info!("No test cases found in chunk {}", number);
                }
                Ok(found) => {
                    report.chunks_extracted += 1;
                    tracing::info!("Found {} test cases in chunk {}", found.len(), number);
                    records.extend(found);
                }
                Err(e) => {
                    report.chunks_failed += 1;
                    tracing::warn!(
                        "Extraction with {} failed for chunk {}: {}",
                        self.extractor.name(),
                        number,
                        e
                    );
                }
            }
        }

        report.records = records.len();
        (records, report)
    }
}
