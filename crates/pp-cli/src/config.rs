use std::path::{Path, PathBuf};

use pp_core::core::{LLAMA3_END_INST, LLAMA3_START_INST};
use serde::Deserialize;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub prompt: PromptConfig,
    #[serde(default)]
    pub oasst: OasstConfig,
    #[serde(default)]
    pub gsm8k: Gsm8kConfig,
    #[serde(default)]
    pub generation: GenerationConfig,
}

impl AppConfig {
    pub fn from_file(path: &Path) -> Result<Self, anyhow::Error> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_owned(),
            format: "pretty".to_owned(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub data_dir: PathBuf,
    pub card_dir: PathBuf,
    pub cluster: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            card_dir: PathBuf::from("cards"),
            cluster: "faircluster".to_owned(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PromptConfig {
    pub start_inst: String,
    pub end_inst: String,
}

impl Default for PromptConfig {
    fn default() -> Self {
        Self {
            start_inst: LLAMA3_START_INST.to_owned(),
            end_inst: LLAMA3_END_INST.to_owned(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OasstConfig {
    pub corpus_dir: PathBuf,
    pub split: String,
    pub name: String,
    pub language: Option<String>,
    pub rank: Option<u32>,
    pub multiturn: bool,
    pub turn_template: String,
    pub first_turn_only: bool,
    pub dedup: DedupConfig,
    pub shuffle_seed: u64,
    pub dev_size: usize,
}

impl Default for OasstConfig {
    fn default() -> Self {
        Self {
            corpus_dir: PathBuf::from("corpora/oasst2"),
            split: "train".to_owned(),
            name: "openassistant2_llama3".to_owned(),
            language: Some("en".to_owned()),
            rank: None,
            multiturn: false,
            turn_template: "User: $user_prompt\nAssistant: $assistant_prompt".to_owned(),
            first_turn_only: false,
            dedup: DedupConfig::default(),
            shuffle_seed: 333,
            dev_size: 500,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum DedupConfig {
    #[default]
    KeepAll,
    Dedup,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Gsm8kConfig {
    pub corpus_dir: PathBuf,
    pub split: String,
    pub name: String,
    pub version: String,
}

impl Default for Gsm8kConfig {
    fn default() -> Self {
        Self {
            corpus_dir: PathBuf::from("corpora/gsm8k"),
            split: "train".to_owned(),
            name: "gsm8k_preference_llama3".to_owned(),
            version: "gsm8k_llama_3_8b_negatives".to_owned(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    pub base_url: String,
    pub api_key: Option<String>,
    pub model: String,
    pub num_samples: u32,
    pub temperature: f32,
    pub top_p: f32,
    pub max_tokens: u32,
    pub seed: Option<u64>,
    pub stop: Vec<String>,
    pub batch_size: usize,
    pub timeout_secs: u64,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".to_owned(),
            api_key: None,
            model: "meta-llama/Meta-Llama-3.1-8B".to_owned(),
            num_samples: 5,
            temperature: 1.0,
            top_p: 1.0,
            max_tokens: 256,
            seed: Some(1814),
            stop: Vec::new(),
            batch_size: 64,
            timeout_secs: 600,
        }
    }
}
