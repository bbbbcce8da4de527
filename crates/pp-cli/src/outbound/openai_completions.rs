use pp_core::core::{Completion, FinishReason, GenerationError, SamplingParams};

/// Request/response mapping for an OpenAI-compatible `/v1/completions`
/// endpoint (vLLM and friends), batched over several prompts with `n`
/// samples each.
pub struct OpenAiCompletionsAdapter;

impl OpenAiCompletionsAdapter {
    pub fn build_request_body(
        &self,
        model: &str,
        prompts: &[String],
        params: &SamplingParams,
    ) -> Result<Vec<u8>, GenerationError> {
        let mut body = serde_json::json!({
            "model": model,
            "prompt": prompts,
            "n": params.num_samples,
            "temperature": params.temperature,
            "top_p": params.top_p,
            "max_tokens": params.max_tokens,
        });

        let obj = body.as_object_mut().expect("just created as object");
        if let Some(s) = params.seed {
            obj.insert("seed".into(), s.into());
        }
        if !params.stop.is_empty() {
            obj.insert("stop".into(), serde_json::json!(params.stop));
        }

        serde_json::to_vec(&body).map_err(|e| GenerationError::Parse(e.to_string()))
    }

    /// Regroups the flat choice list into one entry per prompt.
    ///
    /// Choice `i` belongs to prompt `i / num_samples`; the response must hold
    /// exactly `prompt_count * num_samples` choices.
    pub fn parse_response(
        &self,
        body: &[u8],
        prompt_count: usize,
        num_samples: u32,
    ) -> Result<Vec<Vec<Completion>>, GenerationError> {
        let resp: CompletionResponseWire =
            serde_json::from_slice(body).map_err(|e| GenerationError::Parse(e.to_string()))?;

        let per_prompt = num_samples as usize;
        let expected = prompt_count * per_prompt;
        if resp.choices.len() != expected {
            return Err(GenerationError::Parse(format!(
                "expected {expected} choices ({prompt_count} prompts x {num_samples} samples), got {}",
                resp.choices.len()
            )));
        }

        let mut choices = resp.choices;
        choices.sort_by_key(|c| c.index);

        let mut outputs: Vec<Vec<Completion>> = (0..prompt_count)
            .map(|_| Vec::with_capacity(per_prompt))
            .collect();
        for (position, choice) in choices.into_iter().enumerate() {
            if choice.index as usize != position {
                return Err(GenerationError::Parse(format!(
                    "choice indices are not contiguous: missing index {position}"
                )));
            }
            outputs[position / per_prompt].push(Completion::new(
                choice.text,
                choice.finish_reason.as_deref().map(FinishReason::parse),
            ));
        }

        Ok(outputs)
    }

    pub fn extra_headers(&self) -> Vec<(String, String)> {
        vec![("Content-Type".to_owned(), "application/json".to_owned())]
    }

    pub fn inference_path(&self) -> &str {
        "/v1/completions"
    }
}

// ---------------------------------------------------------------------------
// Response wire types (Deserialize only: for parsing backend responses)
// ---------------------------------------------------------------------------

#[derive(serde::Deserialize)]
struct CompletionResponseWire {
    choices: Vec<CompletionChoiceWire>,
}

#[derive(serde::Deserialize)]
struct CompletionChoiceWire {
    index: u32,
    text: String,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[cfg(test)]
mod tests;
