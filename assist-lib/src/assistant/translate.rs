use std::time::Duration;

use serde::{Serialize, Deserialize};

use super::service::{self, ServiceError};

/// source language that lets the service detect it
pub const AUTO: &str = "auto";

#[async_trait::async_trait]
pub trait Translator: Send + Sync {
    async fn translate(&self, text: &str, source: &str, target: &str) -> Result<String, ServiceError>;
}

#[derive(Debug, Serialize)]
struct TranslateRequest<'a> {
    q: &'a str,
    source: &'a str,
    target: &'a str,
    format: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    api_key: Option<&'a str>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TranslateResponse {
    translated_text: String,
}

/// libretranslate style endpoint
///
/// request body: `{"q": "...", "source": "auto", "target": "es", "format": "text"}`
/// response body: `{"translatedText": "..."}`
pub struct HttpTranslator {
    client: reqwest::Client,
    endpoint: url::Url,
    api_key: Option<String>,
}

impl HttpTranslator {
    pub fn new(endpoint: &str, api_key: Option<String>, timeout: Duration) -> Result<Self, ServiceError> {
        Ok(HttpTranslator {
            client: service::client(timeout)?,
            endpoint: service::endpoint(endpoint)?,
            api_key,
        })
    }
}

#[async_trait::async_trait]
impl Translator for HttpTranslator {
    async fn translate(&self, text: &str, source: &str, target: &str) -> Result<String, ServiceError> {
        let body = TranslateRequest {
            q: text,
            source,
            target,
            format: "text",
            api_key: self.api_key.as_deref(),
        };

        let res = self.client.post(self.endpoint.clone())
            .json(&body)
            .send()
            .await?;
        let status = res.status();

        if !status.is_success() {
            return Err(ServiceError::Status(status.as_u16()));
        }

        let translated: TranslateResponse = res.json().await?;

        Ok(translated.translated_text)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn request_body_shape() {
        let body = TranslateRequest {
            q: "hello",
            source: AUTO,
            target: "es",
            format: "text",
            api_key: None,
        };

        assert_eq!(serde_json::to_value(&body).unwrap(), serde_json::json!({
            "q": "hello",
            "source": "auto",
            "target": "es",
            "format": "text"
        }));
    }

    #[test]
    fn response_body_shape() {
        let res: TranslateResponse = serde_json::from_str(r#"{"translatedText": "hola"}"#).unwrap();

        assert_eq!(res.translated_text, "hola");
    }
}
