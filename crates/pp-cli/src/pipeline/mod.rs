pub mod gsm8k;
pub mod oasst;

use pp_dataset::{DatasetExport, WriteOutcome};

pub(crate) fn log_outcome(export: &DatasetExport) {
    match export.outcome {
        WriteOutcome::Written { records } => tracing::info!(
            version = %export.version,
            dir = %export.dir.display(),
            records,
            "wrote dataset"
        ),
        WriteOutcome::AlreadyBuilt => tracing::info!(
            version = %export.version,
            dir = %export.dir.display(),
            "dataset already built, skipping"
        ),
    }
}
