use std::path::PathBuf;
use std::time::Duration;

use anyhow::{ensure, Context};
use pp_core::core::{
    ContextMode, DedupPolicy, PromptFormat, SamplingParams, SplitName, TreeOptions, TurnTemplate,
};
use pp_dataset::CorpusDir;

use crate::config::{AppConfig, DedupConfig};

const LOG_FORMATS: [&str; 2] = ["json", "pretty"];

// ---------------------------------------------------------------------------
// Runtime settings, one per pipeline
// ---------------------------------------------------------------------------

#[derive(Clone, Debug)]
pub struct OutputSettings {
    pub data_dir: PathBuf,
    pub card_dir: PathBuf,
    pub cluster: String,
}

#[derive(Clone, Debug)]
pub struct OasstSettings {
    pub corpus: CorpusDir,
    pub split: SplitName,
    pub name: String,
    pub tree: TreeOptions,
    pub rank: Option<u32>,
    pub first_turn_only: bool,
    pub dedup: DedupPolicy,
    pub shuffle_seed: u64,
    pub dev_size: usize,
}

#[derive(Clone, Debug)]
pub struct Gsm8kSettings {
    pub corpus: CorpusDir,
    pub split: SplitName,
    pub name: String,
    pub version: String,
}

#[derive(Clone, Debug)]
pub struct GenerationSettings {
    pub base_url: String,
    pub api_key: Option<String>,
    pub model: String,
    pub sampling: SamplingParams,
    pub batch_size: usize,
    pub timeout: Duration,
}

// ---------------------------------------------------------------------------
// RuntimeConfig: fully validated runtime configuration
// ---------------------------------------------------------------------------

#[derive(Clone, Debug)]
pub struct RuntimeConfig {
    pub log_level: String,
    pub log_format: String,
    pub output: OutputSettings,
    pub prompt_format: PromptFormat,
    pub oasst: OasstSettings,
    pub gsm8k: Gsm8kSettings,
    pub generation: GenerationSettings,
}

// ---------------------------------------------------------------------------
// into_runtime: converts raw AppConfig into validated RuntimeConfig
// ---------------------------------------------------------------------------

pub fn into_runtime(config: AppConfig) -> Result<RuntimeConfig, anyhow::Error> {
    ensure!(
        LOG_FORMATS.contains(&config.logging.format.as_str()),
        "unknown log format: {} (expected one of: {})",
        config.logging.format,
        LOG_FORMATS.join(", ")
    );
    ensure!(
        !config.output.data_dir.as_os_str().is_empty(),
        "output.data_dir must not be empty"
    );
    ensure!(
        !config.output.card_dir.as_os_str().is_empty(),
        "output.card_dir must not be empty"
    );
    ensure!(!config.output.cluster.is_empty(), "output.cluster must not be empty");

    // Conversation corpus
    let oasst = config.oasst;
    ensure!(!oasst.name.is_empty(), "oasst.name must not be empty");
    ensure!(!oasst.split.is_empty(), "oasst.split must not be empty");
    let context = if oasst.multiturn {
        let template = TurnTemplate::new(oasst.turn_template.as_str())
            .with_context(|| format!("invalid oasst.turn_template: {:?}", oasst.turn_template))?;
        ContextMode::MultiTurn(template)
    } else {
        ContextMode::SingleTurn
    };
    let oasst = OasstSettings {
        corpus: CorpusDir::new(oasst.corpus_dir),
        split: SplitName::new(oasst.split),
        name: oasst.name,
        tree: TreeOptions {
            language: oasst.language.filter(|lang| !lang.is_empty()),
            context,
        },
        rank: oasst.rank,
        first_turn_only: oasst.first_turn_only,
        dedup: match oasst.dedup {
            DedupConfig::KeepAll => DedupPolicy::KeepAll,
            DedupConfig::Dedup => DedupPolicy::Dedup,
        },
        shuffle_seed: oasst.shuffle_seed,
        dev_size: oasst.dev_size,
    };

    // QA corpus
    let gsm8k = config.gsm8k;
    ensure!(!gsm8k.name.is_empty(), "gsm8k.name must not be empty");
    ensure!(!gsm8k.split.is_empty(), "gsm8k.split must not be empty");
    ensure!(!gsm8k.version.is_empty(), "gsm8k.version must not be empty");
    let gsm8k = Gsm8kSettings {
        corpus: CorpusDir::new(gsm8k.corpus_dir),
        split: SplitName::new(gsm8k.split),
        name: gsm8k.name,
        version: gsm8k.version,
    };

    // Generation backend
    let generation = config.generation;
    ensure!(
        generation.base_url.starts_with("http://") || generation.base_url.starts_with("https://"),
        "generation.base_url must be an http(s) URL: {}",
        generation.base_url
    );
    ensure!(!generation.model.is_empty(), "generation.model must not be empty");
    ensure!(generation.num_samples >= 1, "generation.num_samples must be at least 1");
    ensure!(generation.max_tokens >= 1, "generation.max_tokens must be at least 1");
    ensure!(generation.batch_size >= 1, "generation.batch_size must be at least 1");
    ensure!(
        generation.temperature >= 0.0,
        "generation.temperature must be non-negative: {}",
        generation.temperature
    );
    ensure!(
        generation.top_p > 0.0 && generation.top_p <= 1.0,
        "generation.top_p must be in (0, 1]: {}",
        generation.top_p
    );
    ensure!(generation.timeout_secs >= 1, "generation.timeout_secs must be at least 1");
    let generation = GenerationSettings {
        base_url: generation.base_url.trim_end_matches('/').to_owned(),
        api_key: generation.api_key,
        model: generation.model,
        sampling: SamplingParams {
            num_samples: generation.num_samples,
            temperature: generation.temperature,
            top_p: generation.top_p,
            max_tokens: generation.max_tokens,
            seed: generation.seed,
            stop: generation.stop,
        },
        batch_size: generation.batch_size,
        timeout: Duration::from_secs(generation.timeout_secs),
    };

    Ok(RuntimeConfig {
        log_level: config.logging.level,
        log_format: config.logging.format,
        output: OutputSettings {
            data_dir: config.output.data_dir,
            card_dir: config.output.card_dir,
            cluster: config.output.cluster,
        },
        prompt_format: PromptFormat::new(config.prompt.start_inst, config.prompt.end_inst),
        oasst,
        gsm8k,
        generation,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
