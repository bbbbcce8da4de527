use std::path::PathBuf;

use anyhow::Context;
use pp_core::core::{
    fewshot_prefix, mine_negatives, render_fewshot_prompt, GenerationService, MiningStats,
    QaExample, GSM8K_EXEMPLARS,
};
use pp_dataset::{
    export_negatives, is_built, DatasetCard, DatasetExport, ExportTarget, Gsm8kRecord,
};

use crate::bootstrap::RuntimeConfig;
use crate::pipeline::log_outcome;

#[derive(Debug)]
pub struct Gsm8kReport {
    /// `None` when the dataset was already built and generation was skipped.
    pub stats: Option<MiningStats>,
    pub export: DatasetExport,
    pub card_path: PathBuf,
}

/// Samples few-shot solutions for every question and keeps, per question,
/// the first wrong one as the rejected side of a preference pair.
pub async fn run(
    runtime: &RuntimeConfig,
    service: &dyn GenerationService,
) -> Result<Gsm8kReport, anyhow::Error> {
    let settings = &runtime.gsm8k;
    let data_dir = &runtime.output.data_dir;
    let target = ExportTarget {
        data_dir,
        name: &settings.name,
        cluster: &runtime.output.cluster,
    };
    let mut card = DatasetCard::new();

    let (stats, export) = if is_built(data_dir, &settings.version)? {
        // Only the card is refreshed.
        let export = export_negatives(&target, &settings.version, &[], &mut card)?;
        (None, export)
    } else {
        let examples: Vec<QaExample> = settings
            .corpus
            .read_split::<Gsm8kRecord>(&settings.split)
            .with_context(|| {
                format!(
                    "failed to read split {} from {}",
                    settings.split,
                    settings.corpus.root().display()
                )
            })?
            .into_iter()
            .map(QaExample::from)
            .collect();

        let prefix = fewshot_prefix(&GSM8K_EXEMPLARS);
        let prompts: Vec<String> = examples
            .iter()
            .map(|example| render_fewshot_prompt(&prefix, &example.input))
            .collect();
        tracing::info!(
            split = %settings.split,
            questions = prompts.len(),
            samples = runtime.generation.sampling.num_samples,
            "generating candidate solutions"
        );

        let outputs = service
            .generate(&prompts, &runtime.generation.sampling)
            .await
            .context("generation failed")?;
        let (pairs, stats) = mine_negatives(&examples, &outputs, &runtime.prompt_format)?;
        tracing::info!(
            considered = stats.considered,
            suitable = stats.suitable,
            "Out of {} generations, {} were suitable",
            stats.considered,
            stats.suitable
        );

        let export = export_negatives(&target, &settings.version, &pairs, &mut card)?;
        (Some(stats), export)
    };
    log_outcome(&export);

    let card_path = card
        .write(&runtime.output.card_dir, &settings.name)
        .context("failed to write dataset card")?;
    tracing::info!(path = %card_path.display(), "wrote dataset card");

    Ok(Gsm8kReport {
        stats,
        export,
        card_path,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
