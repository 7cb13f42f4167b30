use std::time::Duration;

use serde::Serialize;

use super::service::{self, ServiceError};
use super::sentiment::Sentiment;

pub const DEFAULT_LANG: &str = "en";

#[async_trait::async_trait]
pub trait SpeechSynthesizer: Send + Sync {
    /// encoded audio of the spoken text
    async fn synthesize(&self, text: &str, lang: &str) -> Result<Vec<u8>, ServiceError>;
}

/// sentence read out for a sentiment result
pub fn emotion_sentence(sentiment: &Sentiment) -> String {
    format!(
        "The emotion detected is {} with a polarity of {:.2}.",
        sentiment.emotion(),
        sentiment.polarity
    )
}

#[derive(Debug, Serialize)]
struct SpeechRequest<'a> {
    text: &'a str,
    lang: &'a str,
}

/// posts `{"text": "...", "lang": "en"}` and takes the response body as the
/// audio
pub struct HttpSpeech {
    client: reqwest::Client,
    endpoint: url::Url,
    token: Option<String>,
}

impl HttpSpeech {
    pub fn new(endpoint: &str, token: Option<String>, timeout: Duration) -> Result<Self, ServiceError> {
        Ok(HttpSpeech {
            client: service::client(timeout)?,
            endpoint: service::endpoint(endpoint)?,
            token,
        })
    }
}

#[async_trait::async_trait]
impl SpeechSynthesizer for HttpSpeech {
    async fn synthesize(&self, text: &str, lang: &str) -> Result<Vec<u8>, ServiceError> {
        let mut builder = self.client.post(self.endpoint.clone())
            .json(&SpeechRequest { text, lang });

        if let Some(token) = &self.token {
            builder = builder.bearer_auth(token);
        }

        let res = builder.send().await?;
        let status = res.status();

        if !status.is_success() {
            return Err(ServiceError::Status(status.as_u16()));
        }

        Ok(res.bytes().await?.to_vec())
    }
}
