use std::path::PathBuf;

use clap::Parser;

#[derive(Parser)]
#[command(
    name = "claimsift",
    about = "Extracts test cases from a PDF document using an LLM",
    version
)]
pub struct Cli {
    /// Path to the input PDF document
    #[arg(long = "pdf-path", alias = "pdf_path", value_name = "FILE")]
    pub pdf_path: Option<PathBuf>,
    /// Path to save the output JSON file
    #[arg(long = "output-path", alias = "output_path", value_name = "FILE")]
    pub output_path: Option<PathBuf>,
}
