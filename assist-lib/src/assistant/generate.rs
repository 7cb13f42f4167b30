use std::time::Duration;

use serde::{Serialize, Deserialize};

pub const DEFAULT_MAX_LENGTH: u32 = 50;

#[derive(Debug, thiserror::Error)]
pub enum GenerateError {
    #[error("text generation request failed")]
    Request(#[from] reqwest::Error),

    #[error("text generation endpoint responded with status {0}")]
    Status(u16),

    #[error("text generation endpoint returned no sequences")]
    Empty,

    #[error("invalid text generation endpoint")]
    InvalidEndpoint(#[from] url::ParseError),
}

#[async_trait::async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String, GenerateError>;
}

#[derive(Debug, Serialize)]
struct GenerateParameters {
    max_length: u32,
    num_return_sequences: u32,
}

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    inputs: &'a str,
    parameters: GenerateParameters,
}

#[derive(Debug, Deserialize)]
struct GeneratedSequence {
    generated_text: String,
}

/// sends the prompt to a hosted text generation endpoint
///
/// request body: `{"inputs": "...", "parameters": {"max_length": 50, "num_return_sequences": 1}}`
/// response body: `[{"generated_text": "..."}]`
pub struct HttpGenerator {
    client: reqwest::Client,
    endpoint: url::Url,
    token: Option<String>,
    max_length: u32,
}

impl HttpGenerator {
    pub fn new(
        endpoint: &str,
        token: Option<String>,
        timeout: Duration,
        max_length: u32,
    ) -> Result<Self, GenerateError> {
        let endpoint = url::Url::parse(endpoint)?;
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()?;

        Ok(HttpGenerator {
            client,
            endpoint,
            token,
            max_length,
        })
    }
}

#[async_trait::async_trait]
impl TextGenerator for HttpGenerator {
    async fn generate(&self, prompt: &str) -> Result<String, GenerateError> {
        let body = GenerateRequest {
            inputs: prompt,
            parameters: GenerateParameters {
                max_length: self.max_length,
                num_return_sequences: 1,
            }
        };

        let mut builder = self.client.post(self.endpoint.clone())
            .json(&body);

        if let Some(token) = &self.token {
            builder = builder.bearer_auth(token);
        }

        let res = builder.send().await?;
        let status = res.status();

        if !status.is_success() {
            return Err(GenerateError::Status(status.as_u16()));
        }

        let sequences: Vec<GeneratedSequence> = res.json().await?;

        sequences.into_iter()
            .next()
            .map(|seq| seq.generated_text)
            .ok_or(GenerateError::Empty)
    }
}

const CONTINUATIONS: &[&str] = &[
    "Here is a first draft to build on:",
    "One way to start would be:",
    "A possible outline:",
];

const OUTLINE: &[&str] = &[
    "define the goal,", "list what is already known,", "pick the smallest next step,",
    "check the result,", "and repeat until it is done.",
];

/// deterministic stand in for a hosted model. echoes the prompt and extends
/// it with a short outline, never exceeding `max_length` words
pub struct LocalGenerator {
    max_length: u32,
}

impl LocalGenerator {
    pub fn new(max_length: u32) -> Self {
        LocalGenerator { max_length }
    }
}

impl Default for LocalGenerator {
    fn default() -> Self {
        LocalGenerator::new(DEFAULT_MAX_LENGTH)
    }
}

#[async_trait::async_trait]
impl TextGenerator for LocalGenerator {
    async fn generate(&self, prompt: &str) -> Result<String, GenerateError> {
        let index = prompt.bytes().fold(0usize, |acc, b| acc.wrapping_add(b as usize)) % CONTINUATIONS.len();

        let words: Vec<&str> = prompt.split_whitespace()
            .chain(CONTINUATIONS[index].split_whitespace())
            .chain(OUTLINE.iter().flat_map(|part| part.split_whitespace()))
            .take(self.max_length as usize)
            .collect();

        Ok(words.join(" "))
    }
}
