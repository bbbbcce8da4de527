use std::fs;
use std::path::{Path, PathBuf};

use crate::models::{CardEntry, DatasetFamily};
use crate::store::DatasetError;

/// Asset card listing every dataset produced by one run.
///
/// Serialized as a multi-document YAML stream, one document per entry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DatasetCard {
    entries: Vec<CardEntry>,
}

impl DatasetCard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> &[CardEntry] {
        &self.entries
    }

    /// Registers `name` with its family and its absolute location on `cluster`.
    pub fn add_dataset(
        &mut self,
        name: &str,
        family: DatasetFamily,
        data_dir: &Path,
        cluster: &str,
    ) -> Result<(), DatasetError> {
        let data = std::path::absolute(data_dir).map_err(DatasetError::io(data_dir))?;
        self.entries.push(CardEntry::Family {
            name: name.to_owned(),
            dataset_family: family,
        });
        self.entries.push(CardEntry::Location {
            name: format!("{name}@{cluster}"),
            data: data.display().to_string(),
        });
        Ok(())
    }

    pub fn to_yaml(&self) -> Result<String, DatasetError> {
        let mut docs = Vec::with_capacity(self.entries.len());
        for entry in &self.entries {
            docs.push(serde_yaml::to_string(entry)?);
        }
        Ok(docs.join("---\n"))
    }

    /// Writes `<card_dir>/<file_stem>.yaml`, creating the directory if needed.
    pub fn write(&self, card_dir: &Path, file_stem: &str) -> Result<PathBuf, DatasetError> {
        fs::create_dir_all(card_dir).map_err(DatasetError::io(card_dir))?;
        let path = card_dir.join(format!("{file_stem}.yaml"));
        fs::write(&path, self.to_yaml()?).map_err(DatasetError::io(&path))?;
        Ok(path)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
