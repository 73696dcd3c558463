#![allow(clippy::missing_errors_doc)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

pub mod config;
pub mod error;
pub mod ingest;
pub mod llm;

pub use config::{ChunkingConfig, Config, ConfigError, LlmConfig, PathsConfig};
pub use error::{Error, Result};
pub use ingest::{
    Chunk, ChunkError, Chunker, CompositeLoader, ExtractionError, ExtractionResult, Extractor,
    LoadError, PdfLoader, PersistError, PipelineError, PipelineResult, PlainTextLoader,
    RunReport, SourceFormat, SourceLoader, TestCasePipeline, TestCaseRecord, normalize_text,
    parse_records, write_records,
};
pub use llm::AzureChatClient;
