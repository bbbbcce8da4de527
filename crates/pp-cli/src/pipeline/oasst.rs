use std::path::PathBuf;

use anyhow::Context;
use pp_core::core::{
    build_groups, filter_groups, first_turn_only, pair_groups, split_train_dev, ExampleGroup,
    PairingStats, TrainDevSplit, Turn,
};
use pp_dataset::{export_preference_split, DatasetCard, DatasetExport, ExportTarget};

use crate::bootstrap::{OasstSettings, RuntimeConfig};
use crate::pipeline::log_outcome;
use crate::progress::progress_bar;

#[derive(Debug)]
pub struct SplitReport {
    pub split: &'static str,
    pub stats: PairingStats,
    pub exports: [DatasetExport; 2],
}

#[derive(Debug)]
pub struct OasstReport {
    pub splits: Vec<SplitReport>,
    pub card_path: PathBuf,
}

/// Reads the configured split, builds reply groups and shuffles them into
/// train and dev.
pub fn load_splits(settings: &OasstSettings) -> Result<TrainDevSplit<ExampleGroup>, anyhow::Error> {
    let turns: Vec<Turn> = settings.corpus.read_split(&settings.split).with_context(|| {
        format!(
            "failed to read split {} from {}",
            settings.split,
            settings.corpus.root().display()
        )
    })?;
    let turn_count = turns.len();

    let forest = build_groups(turns, &settings.tree)?;
    let grouped = forest.groups.len();
    let mut groups = filter_groups(forest.groups, settings.rank);
    if settings.first_turn_only {
        groups = first_turn_only(groups);
    }

    tracing::info!(
        split = %settings.split,
        turns = turn_count,
        grouped,
        retained = groups.len(),
        rank = ?settings.rank,
        "built reply groups"
    );

    Ok(split_train_dev(groups, settings.shuffle_seed, settings.dev_size))
}

/// Builds preference and instruction datasets for train and dev, then
/// writes one card covering all four.
pub fn run(runtime: &RuntimeConfig) -> Result<OasstReport, anyhow::Error> {
    let settings = &runtime.oasst;
    let target = ExportTarget {
        data_dir: &runtime.output.data_dir,
        name: &settings.name,
        cluster: &runtime.output.cluster,
    };

    let mut card = DatasetCard::new();
    let mut splits = Vec::with_capacity(2);

    let named = load_splits(settings)?.into_named();
    let pb = progress_bar(named.len() as u64, "pairing");
    for (split, groups) in named {
        pb.set_message(format!("pairing {split}"));
        let (pairs, stats) = pair_groups(&groups, &runtime.prompt_format);
        tracing::info!(
            split,
            considered = stats.considered_groups,
            retained = stats.paired_groups,
            skipped = stats.skipped_groups(),
            pairs = stats.pairs,
            "paired reply groups"
        );

        let exports = export_preference_split(&target, split, &pairs, settings.dedup, &mut card)
            .with_context(|| format!("failed to export {split} split"))?;
        for export in &exports {
            log_outcome(export);
        }

        splits.push(SplitReport {
            split,
            stats,
            exports,
        });
        pb.inc(1);
    }
    pb.finish_and_clear();

    let card_path = card
        .write(&runtime.output.card_dir, &settings.name)
        .context("failed to write dataset card")?;
    tracing::info!(path = %card_path.display(), "wrote dataset card");

    Ok(OasstReport { splits, card_path })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
