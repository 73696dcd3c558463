use std::path::{Path, PathBuf};
use thiserror::Error;

use super::extractor::TestCaseRecord;

#[derive(Debug, Error)]
pub enum PersistError {
    #[error("Could not create output directory '{}': {source}", .path.display())]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Could not write '{}': {source}", .path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Writes the records as an indented JSON array.
///
/// Missing parent directories are created. The array is written to a
/// temporary sibling and renamed over `path`, so a failed write never leaves
/// a truncated report behind.
pub async fn write_records(path: &Path, records: &[TestCaseRecord]) -> Result<(), PersistError> {
    let json = serde_json::to_vec_pretty(records)?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|source| PersistError::CreateDir {
                path: parent.to_path_buf(),
                source,
            })?;
    }

    let tmp = temp_path(path);
    let write = async {
        tokio::fs::write(&tmp, &json).await?;
        tokio::fs::rename(&tmp, path).await
    };

    if let Err(source) = write.await {
        let _ = tokio::fs::remove_file(&tmp).await;
        return Err(PersistError::Write {
            path: path.to_path_buf(),
            source,
        });
    }

    tracing::debug!("Wrote {} bytes to '{}'", json.len(), path.display());
    Ok(())
}

fn temp_path(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .map_or_else(|| "output".into(), |n| n.to_string_lossy().into_owned());
    path.with_file_name(format!(".{name}.tmp"))
}
