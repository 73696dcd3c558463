mod chunker;
mod extractor;
mod loader;
mod normalizer;
mod persist;
mod pipeline;

pub use chunker::{Chunk, ChunkError, Chunker, SEPARATORS};
pub use extractor::{
    parse_records, ExtractionError, ExtractionResult, Extractor, TestCaseRecord,
    DESCRIPTION_KEY, REFERENCE_KEY,
};
pub use loader::{
    CompositeLoader, LoadError, LoadResult, PdfLoader, PlainTextLoader, SourceFormat,
    SourceLoader,
};
pub use normalizer::normalize_text;
pub use persist::{write_records, PersistError};
pub use pipeline::{PipelineError, PipelineResult, RunReport, TestCasePipeline};
