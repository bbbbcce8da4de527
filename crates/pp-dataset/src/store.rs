use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use pp_core::core::CorpusError;
use serde::Serialize;

use crate::models::WriteOutcome;

pub const DATA_FILE_NAME: &str = "data.chunk.0000.jsonl";
pub const BUILT_MARKER_NAME: &str = ".built";

#[derive(Debug, thiserror::Error)]
pub enum DatasetError {
    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("{}:{line}: invalid record: {source}", .path.display())]
    Record {
        path: PathBuf,
        line: usize,
        #[source]
        source: serde_json::Error,
    },
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("dataset card error: {0}")]
    Card(#[from] serde_yaml::Error),
    #[error(transparent)]
    Corpus(#[from] CorpusError),
}

impl DatasetError {
    pub(crate) fn io(path: &Path) -> impl FnOnce(io::Error) -> Self + '_ {
        move |source| Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Writes one JSON object per line, in order.
pub fn save_to_jsonl<T: Serialize>(records: &[T], path: &Path) -> Result<(), DatasetError> {
    let file = File::create(path).map_err(DatasetError::io(path))?;
    let mut writer = BufWriter::new(file);
    for record in records {
        serde_json::to_writer(&mut writer, record)?;
        writer.write_all(b"\n").map_err(DatasetError::io(path))?;
    }
    writer.flush().map_err(DatasetError::io(path))?;
    Ok(())
}

/// Drops a `.built` marker holding the timestamp and the version string.
pub fn mark_done(dir: &Path, version: &str, at: DateTime<Utc>) -> Result<(), DatasetError> {
    let path = dir.join(BUILT_MARKER_NAME);
    let content = format!("{}\n{version}", at.to_rfc3339());
    fs::write(&path, content).map_err(DatasetError::io(&path))
}

/// True only if `dir` carries a marker whose second line is `version`.
pub fn is_built(dir: &Path, version: &str) -> Result<bool, DatasetError> {
    let path = dir.join(BUILT_MARKER_NAME);
    match fs::read_to_string(&path) {
        Ok(content) => Ok(content.split('\n').nth(1) == Some(version)),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(false),
        Err(err) => Err(DatasetError::io(&path)(err)),
    }
}

/// Materializes `records` into `dir` unless this version is already there.
pub fn write_once<T: Serialize>(
    dir: &Path,
    version: &str,
    records: &[T],
) -> Result<WriteOutcome, DatasetError> {
    fs::create_dir_all(dir).map_err(DatasetError::io(dir))?;
    if is_built(dir, version)? {
        return Ok(WriteOutcome::AlreadyBuilt);
    }
    save_to_jsonl(records, &dir.join(DATA_FILE_NAME))?;
    mark_done(dir, version, Utc::now())?;
    Ok(WriteOutcome::Written {
        records: records.len(),
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
