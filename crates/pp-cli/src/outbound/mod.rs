pub mod client;
pub mod openai_completions;

pub use client::HttpGenerationService;
