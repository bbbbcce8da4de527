use std::future::Future;
use std::pin::Pin;

use pp_core::core::{Completion, GenerationError, GenerationService, SamplingParams};

use crate::bootstrap::GenerationSettings;
use crate::outbound::openai_completions::OpenAiCompletionsAdapter;
use crate::progress::progress_bar;

// ---------------------------------------------------------------------------
// HttpGenerationService: batched completions over HTTP
// ---------------------------------------------------------------------------

/// Sends prompts to the completion server in sequential batches of
/// `batch_size`; the first failing batch aborts the whole call.
pub struct HttpGenerationService {
    client: reqwest::Client,
    adapter: OpenAiCompletionsAdapter,
    url: String,
    api_key: Option<String>,
    model: String,
    batch_size: usize,
}

impl HttpGenerationService {
    pub fn new(settings: &GenerationSettings) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder().timeout(settings.timeout).build()?;
        let adapter = OpenAiCompletionsAdapter;
        let url = format!("{}{}", settings.base_url, adapter.inference_path());
        Ok(Self {
            client,
            adapter,
            url,
            api_key: settings.api_key.clone(),
            model: settings.model.clone(),
            batch_size: settings.batch_size.max(1),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    async fn generate_batch(
        &self,
        prompts: &[String],
        params: &SamplingParams,
    ) -> Result<Vec<Vec<Completion>>, GenerationError> {
        let request_body = self.adapter.build_request_body(&self.model, prompts, params)?;

        let mut req_builder = self.client.post(&self.url).body(request_body);
        for (k, v) in self.adapter.extra_headers() {
            req_builder = req_builder.header(k, v);
        }
        if let Some(key) = &self.api_key {
            req_builder = req_builder.bearer_auth(key);
        }

        let resp = req_builder
            .send()
            .await
            .map_err(|e| GenerationError::Connection(e.to_string()))?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let body = resp.text().await.unwrap_or_default();
            return Err(GenerationError::HttpStatus { status, body });
        }

        let resp_bytes = resp
            .bytes()
            .await
            .map_err(|e| GenerationError::Connection(e.to_string()))?;

        self.adapter
            .parse_response(&resp_bytes, prompts.len(), params.num_samples)
    }
}

impl GenerationService for HttpGenerationService {
    fn generate<'a>(
        &'a self,
        prompts: &'a [String],
        params: &'a SamplingParams,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<Vec<Completion>>, GenerationError>> + Send + 'a>>
    {
        Box::pin(async move {
            let mut outputs = Vec::with_capacity(prompts.len());
            let batches = prompts.len().div_ceil(self.batch_size);
            let pb = progress_bar(prompts.len() as u64, "generating");
            for (i, batch) in prompts.chunks(self.batch_size).enumerate() {
                tracing::debug!(
                    batch = i + 1,
                    batches,
                    prompts = batch.len(),
                    "requesting completions"
                );
                outputs.extend(self.generate_batch(batch, params).await?);
                pb.inc(batch.len() as u64);
            }
            pb.finish_and_clear();

            if outputs.len() != prompts.len() {
                return Err(GenerationError::ShapeMismatch {
                    expected: prompts.len(),
                    got: outputs.len(),
                });
            }
            Ok(outputs)
        })
    }
}
