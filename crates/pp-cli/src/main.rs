use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use pp_cli::bootstrap::{self, RuntimeConfig};
use pp_cli::config::{AppConfig, DedupConfig};
use pp_cli::logging::init_tracing;
use pp_cli::outbound::HttpGenerationService;
use pp_cli::pipeline;

#[derive(Parser)]
#[command(name = "pp", about = "preference and instruction dataset preparation")]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Path to the configuration file.
    #[arg(short, long, default_value = "prep.toml", global = true)]
    config: PathBuf,

    /// Override `output.data_dir`.
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Override `output.card_dir`.
    #[arg(long, global = true)]
    card_dir: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Command {
    /// Validate configuration file and exit.
    Validate,
    /// Build preference and instruction datasets from a conversation corpus.
    Oasst {
        #[arg(long)]
        corpus_dir: Option<PathBuf>,
        #[arg(long)]
        split: Option<String>,
        /// Language code to keep; an empty string keeps every language.
        #[arg(long)]
        language: Option<String>,
        /// Keep only replies up to this rank.
        #[arg(long)]
        rank: Option<u32>,
        /// Use the whole conversation as context instead of the parent prompt.
        #[arg(long)]
        multiturn: bool,
        #[arg(long)]
        first_turn_only: bool,
        #[arg(long, value_enum)]
        dedup: Option<DedupArg>,
    },
    /// Mine wrong sampled solutions of a math QA corpus as rejected answers.
    Gsm8k {
        #[arg(long)]
        corpus_dir: Option<PathBuf>,
        #[arg(long)]
        split: Option<String>,
        #[arg(long)]
        base_url: Option<String>,
        #[arg(long)]
        model: Option<String>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum DedupArg {
    KeepAll,
    Dedup,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), anyhow::Error> {
    let mut config = load_config(&cli.config)?;
    if let Some(dir) = cli.data_dir {
        config.output.data_dir = dir;
    }
    if let Some(dir) = cli.card_dir {
        config.output.card_dir = dir;
    }

    match cli.command {
        Command::Validate => {
            bootstrap::into_runtime(config).context("config invalid")?;
            println!("Config valid: {}", cli.config.display());
        }
        Command::Oasst {
            corpus_dir,
            split,
            language,
            rank,
            multiturn,
            first_turn_only,
            dedup,
        } => {
            let oasst = &mut config.oasst;
            if let Some(dir) = corpus_dir {
                oasst.corpus_dir = dir;
            }
            if let Some(split) = split {
                oasst.split = split;
            }
            if let Some(language) = language {
                oasst.language = Some(language);
            }
            if rank.is_some() {
                oasst.rank = rank;
            }
            oasst.multiturn |= multiturn;
            oasst.first_turn_only |= first_turn_only;
            if let Some(dedup) = dedup {
                oasst.dedup = match dedup {
                    DedupArg::KeepAll => DedupConfig::KeepAll,
                    DedupArg::Dedup => DedupConfig::Dedup,
                };
            }

            let runtime = start(config)?;
            pipeline::oasst::run(&runtime)?;
        }
        Command::Gsm8k {
            corpus_dir,
            split,
            base_url,
            model,
        } => {
            if let Some(dir) = corpus_dir {
                config.gsm8k.corpus_dir = dir;
            }
            if let Some(split) = split {
                config.gsm8k.split = split;
            }
            if let Some(url) = base_url {
                config.generation.base_url = url;
            }
            if let Some(model) = model {
                config.generation.model = model;
            }

            let runtime = start(config)?;
            let service = HttpGenerationService::new(&runtime.generation)
                .context("failed to build HTTP client")?;
            tracing::info!(
                url = service.url(),
                model = %runtime.generation.model,
                "using generation service"
            );
            pipeline::gsm8k::run(&runtime, &service).await?;
        }
    }

    Ok(())
}

/// A missing config file falls back to built-in defaults.
fn load_config(path: &Path) -> Result<AppConfig, anyhow::Error> {
    if !path.exists() {
        return Ok(AppConfig::default());
    }
    AppConfig::from_file(path).with_context(|| format!("error reading config {}", path.display()))
}

fn start(config: AppConfig) -> Result<RuntimeConfig, anyhow::Error> {
    let runtime = bootstrap::into_runtime(config).context("config invalid")?;
    init_tracing(&runtime.log_level, &runtime.log_format);
    Ok(runtime)
}
