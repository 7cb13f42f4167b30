use serde::{Serialize, Deserialize};

use assist_lib::assistant::Mode;

use crate::{Validator, ApiError, Detail};
use crate::error::GeneralKind;

/// body of `POST /process`
#[derive(Debug, Serialize, Deserialize)]
pub struct ProcessMessage {
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mode: Option<String>,
}

impl ProcessMessage {
    /// a missing mode is treated the same as any unknown name
    pub fn mode(&self) -> Mode {
        self.mode.as_deref()
            .map(Mode::from_name)
            .unwrap_or_default()
    }
}

impl Validator for ProcessMessage {
    fn validate(&self) -> Result<(), ApiError> {
        if assist_lib::validation::is_blank(&self.message) {
            Err(ApiError::from((
                GeneralKind::ValidationFailed,
                Detail::with_key("message")
            )))
        } else {
            Ok(())
        }
    }
}

fn require_text(keys: &[(&'static str, &str)]) -> Result<(), ApiError> {
    let blank: Vec<&'static str> = keys.iter()
        .filter(|(_, value)| assist_lib::validation::is_blank(value))
        .map(|(key, _)| *key)
        .collect();

    if blank.is_empty() {
        Ok(())
    } else {
        Err(ApiError::from((
            GeneralKind::ValidationFailed,
            Detail::mult_keys(blank)
        )))
    }
}

/// body of `POST /translate`
#[derive(Debug, Serialize, Deserialize)]
pub struct TranslateMessage {
    pub text: String,
    /// language code, e.g. "es"
    pub target: String,
}

impl Validator for TranslateMessage {
    fn validate(&self) -> Result<(), ApiError> {
        require_text(&[("text", self.text.as_str()), ("target", self.target.as_str())])
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Translation {
    pub translation: String,
}

/// body of `POST /information`
#[derive(Debug, Serialize, Deserialize)]
pub struct TopicQuery {
    pub topic: String,
}

impl Validator for TopicQuery {
    fn validate(&self) -> Result<(), ApiError> {
        require_text(&[("topic", self.topic.as_str())])
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Information {
    pub summary: String,
}

/// body of `POST /verbalize`
#[derive(Debug, Serialize, Deserialize)]
pub struct VerbalizeMessage {
    pub text: String,
}

impl Validator for VerbalizeMessage {
    fn validate(&self) -> Result<(), ApiError> {
        require_text(&[("text", self.text.as_str())])
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Verbalization {
    pub text: String,
    /// base64 encoded audio
    pub audio: String,
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn mode_selection() {
        let emotion: ProcessMessage = serde_json::from_str(r#"{"message":"hi","mode":"emotion"}"#).unwrap();
        let logic: ProcessMessage = serde_json::from_str(r#"{"message":"hi","mode":"logic"}"#).unwrap();
        let missing: ProcessMessage = serde_json::from_str(r#"{"message":"hi"}"#).unwrap();

        assert_eq!(emotion.mode(), Mode::Emotion);
        assert_eq!(logic.mode(), Mode::Logic);
        assert_eq!(missing.mode(), Mode::Logic);
    }

    #[test]
    fn blank_message() {
        let msg = ProcessMessage {
            message: String::from("  "),
            mode: None,
        };

        assert!(msg.validate().is_err());
    }

    #[test]
    fn blank_translation_fields() {
        let msg = TranslateMessage {
            text: String::from(" "),
            target: String::new(),
        };

        let err = msg.validate().unwrap_err();

        assert_eq!(
            err.detail().unwrap().keys(),
            &[String::from("text"), String::from("target")]
        );

        let msg = TranslateMessage {
            text: String::from("hello"),
            target: String::from("es"),
        };

        assert!(msg.validate().is_ok());
    }

    #[test]
    fn blank_topic() {
        assert!(TopicQuery { topic: String::from("\t") }.validate().is_err());
        assert!(TopicQuery { topic: String::from("Rust") }.validate().is_ok());
    }
}
