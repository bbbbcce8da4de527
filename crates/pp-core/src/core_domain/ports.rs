use std::future::Future;
use std::pin::Pin;

use crate::core::GenerationError;

// ---------------------------------------------------------------------------
// SamplingParams: how many completions to draw per prompt, and how
// ---------------------------------------------------------------------------

#[derive(Clone, Debug, PartialEq)]
pub struct SamplingParams {
    pub num_samples: u32,
    pub temperature: f32,
    pub top_p: f32,
    pub max_tokens: u32,
    pub seed: Option<u64>,
    pub stop: Vec<String>,
}

impl Default for SamplingParams {
    fn default() -> Self {
        Self {
            num_samples: 5,
            temperature: 1.0,
            top_p: 1.0,
            max_tokens: 256,
            seed: Some(1814),
            stop: Vec::new(),
        }
    }
}

// ---------------------------------------------------------------------------
// Completion: one sampled continuation of a prompt
// ---------------------------------------------------------------------------

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FinishReason {
    Stop,
    Length,
    Other(String),
}

impl FinishReason {
    pub fn parse(value: &str) -> Self {
        match value {
            "stop" => Self::Stop,
            "length" => Self::Length,
            other => Self::Other(other.to_owned()),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Completion {
    pub text: String,
    pub finish_reason: Option<FinishReason>,
}

impl Completion {
    pub fn new(text: impl Into<String>, finish_reason: Option<FinishReason>) -> Self {
        Self {
            text: text.into(),
            finish_reason,
        }
    }
}

// ---------------------------------------------------------------------------
// GenerationService: batch completion backend (object-safe async via Pin<Box>)
// ---------------------------------------------------------------------------

/// Returns, for every prompt in order, the list of sampled completions.
///
/// Implementations must return exactly one entry per prompt; any failure is
/// fatal for the batch.
pub trait GenerationService: Send + Sync {
    fn generate<'a>(
        &'a self,
        prompts: &'a [String],
        params: &'a SamplingParams,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<Vec<Completion>>, GenerationError>> + Send + 'a>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_finish_reason_parse() {
        assert_eq!(FinishReason::parse("stop"), FinishReason::Stop);
        assert_eq!(FinishReason::parse("length"), FinishReason::Length);
        assert_eq!(
            FinishReason::parse("abort"),
            FinishReason::Other("abort".to_owned())
        );
    }

    #[test]
    fn test_default_sampling_params() {
        let params = SamplingParams::default();
        assert_eq!(params.num_samples, 5);
        assert_eq!(params.max_tokens, 256);
        assert_eq!(params.seed, Some(1814));
        assert!(params.stop.is_empty());
    }
}
