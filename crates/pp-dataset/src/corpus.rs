use std::fs::{self, File};
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use pp_core::core::{CorpusError, SplitName};
use serde::de::DeserializeOwned;

use crate::store::DatasetError;

const SPLIT_EXTENSION: &str = "jsonl";

/// A local corpus: one `<split>.jsonl` file per split.
#[derive(Debug, Clone)]
pub struct CorpusDir {
    root: PathBuf,
}

impl CorpusDir {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Split names found in the directory, sorted.
    pub fn available_splits(&self) -> Result<Vec<String>, DatasetError> {
        let entries = fs::read_dir(&self.root).map_err(DatasetError::io(&self.root))?;
        let mut splits = Vec::new();
        for entry in entries {
            let path = entry.map_err(DatasetError::io(&self.root))?.path();
            if path.extension().and_then(|e| e.to_str()) != Some(SPLIT_EXTENSION) {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                splits.push(stem.to_owned());
            }
        }
        splits.sort();
        Ok(splits)
    }

    pub fn split_path(&self, split: &SplitName) -> Result<PathBuf, DatasetError> {
        let available = self.available_splits()?;
        if !available.iter().any(|s| s == split.as_str()) {
            return Err(CorpusError::UnknownSplit {
                requested: split.clone(),
                available,
            }
            .into());
        }
        Ok(self
            .root
            .join(format!("{}.{SPLIT_EXTENSION}", split.as_str())))
    }

    /// Reads every record of `split`. Blank lines are ignored; a malformed
    /// line fails the whole read with its line number.
    pub fn read_split<T: DeserializeOwned>(
        &self,
        split: &SplitName,
    ) -> Result<Vec<T>, DatasetError> {
        let path = self.split_path(split)?;
        read_jsonl(&path)
    }
}

pub fn read_jsonl<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>, DatasetError> {
    let file = File::open(path).map_err(DatasetError::io(path))?;
    let mut records = Vec::new();
    for (i, line) in BufReader::new(file).lines().enumerate() {
        let line = line.map_err(DatasetError::io(path))?;
        if line.trim().is_empty() {
            continue;
        }
        let record = serde_json::from_str(&line).map_err(|source| DatasetError::Record {
            path: path.to_path_buf(),
            line: i + 1,
            source,
        })?;
        records.push(record);
    }
    Ok(records)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
