use std::time::Duration;

use serde::Deserialize;

use super::service::{self, ServiceError};

pub const WIKIPEDIA_API: &str = "https://en.wikipedia.org/api/rest_v1";

pub const NO_INFORMATION: &str = "No information found.";
pub const TOPIC_NOT_FOUND: &str = "Topic not found.";

#[async_trait::async_trait]
pub trait InformationSource: Send + Sync {
    /// short current summary of a topic
    async fn latest(&self, topic: &str) -> Result<String, ServiceError>;
}

#[derive(Debug, Deserialize)]
struct Summary {
    extract: Option<String>,
}

/// page summaries from the wikipedia rest api
pub struct WikipediaSummary {
    client: reqwest::Client,
    base: url::Url,
}

impl WikipediaSummary {
    pub fn new(base: &str, timeout: Duration) -> Result<Self, ServiceError> {
        Ok(WikipediaSummary {
            client: service::client(timeout)?,
            base: service::endpoint(base)?,
        })
    }

    /// `{base}/page/summary/{topic}` with spaces in the topic as underscores
    fn summary_url(&self, topic: &str) -> url::Url {
        let title = topic.trim().replace(' ', "_");
        let mut url = self.base.clone();

        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().extend(["page", "summary", title.as_str()]);
        }

        url
    }
}

#[async_trait::async_trait]
impl InformationSource for WikipediaSummary {
    async fn latest(&self, topic: &str) -> Result<String, ServiceError> {
        let res = self.client.get(self.summary_url(topic))
            .send()
            .await?;

        if res.status() != reqwest::StatusCode::OK {
            tracing::debug!(status = res.status().as_u16(), "summary lookup missed");

            return Ok(TOPIC_NOT_FOUND.to_owned());
        }

        let summary: Summary = res.json().await?;

        Ok(summary.extract
            .filter(|extract| !extract.is_empty())
            .unwrap_or_else(|| NO_INFORMATION.to_owned()))
    }
}
