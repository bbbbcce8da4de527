use std::path::{Path, PathBuf};

use pp_core::core::{to_instruction_examples, DedupPolicy, PreferencePair};
use serde::Serialize;

use crate::card::DatasetCard;
use crate::models::{DatasetFamily, WriteOutcome};
use crate::store::{write_once, DatasetError};

#[derive(Debug, Clone)]
pub struct ExportTarget<'a> {
    pub data_dir: &'a Path,
    /// Dataset name, e.g. `openassistant2_llama3`.
    pub name: &'a str,
    pub cluster: &'a str,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatasetExport {
    pub version: String,
    pub dir: PathBuf,
    pub outcome: WriteOutcome,
}

/// Writes the preference pairs of one split and the instruction set derived
/// from their chosen side, and registers both in `card`.
///
/// Layout: `<data_dir>/preference/<split>/` and `<data_dir>/instruction/<split>/`,
/// with versions (and card names) `<name>_preference_<split>` and
/// `<name>_instruction_<split>`.
pub fn export_preference_split(
    target: &ExportTarget<'_>,
    split: &str,
    pairs: &[PreferencePair],
    policy: DedupPolicy,
    card: &mut DatasetCard,
) -> Result<[DatasetExport; 2], DatasetError> {
    let version = format!("{}_preference_{split}", target.name);
    let preference = export_records(
        &target.data_dir.join("preference").join(split),
        &version,
        &version,
        pairs,
        DatasetFamily::GenericPreferenceOptimization,
        target.cluster,
        card,
    )?;

    let examples = to_instruction_examples(pairs, policy);
    let version = format!("{}_instruction_{split}", target.name);
    let instruction = export_records(
        &target.data_dir.join("instruction").join(split),
        &version,
        &version,
        &examples,
        DatasetFamily::GenericInstruction,
        target.cluster,
        card,
    )?;

    Ok([preference, instruction])
}

/// Writes mined preference pairs directly into `data_dir` under `version`;
/// the card lists them as `name`.
pub fn export_negatives(
    target: &ExportTarget<'_>,
    version: &str,
    pairs: &[PreferencePair],
    card: &mut DatasetCard,
) -> Result<DatasetExport, DatasetError> {
    export_records(
        target.data_dir,
        version,
        target.name,
        pairs,
        DatasetFamily::GenericPreferenceOptimization,
        target.cluster,
        card,
    )
}

fn export_records<T: Serialize>(
    dir: &Path,
    version: &str,
    card_name: &str,
    records: &[T],
    family: DatasetFamily,
    cluster: &str,
    card: &mut DatasetCard,
) -> Result<DatasetExport, DatasetError> {
    let outcome = write_once(dir, version, records)?;
    card.add_dataset(card_name, family, dir, cluster)?;
    Ok(DatasetExport {
        version: version.to_owned(),
        dir: dir.to_path_buf(),
        outcome,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
