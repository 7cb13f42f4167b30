use serde::{Serialize, Deserialize};

use crate::{Validator, ApiError, Detail};
use crate::error::GeneralKind;

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct SupportForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub message: String,
}

impl Validator for SupportForm {
    fn validate(&self) -> Result<(), ApiError> {
        let mut invalid = Vec::new();

        if !assist_lib::support::name_valid(&self.name) {
            invalid.push("name");
        }

        if !assist_lib::users::email_valid(&self.email) {
            invalid.push("email");
        }

        if !assist_lib::support::message_valid(&self.message) {
            invalid.push("message");
        }

        if !invalid.is_empty() {
            Err(ApiError::from((
                GeneralKind::ValidationFailed,
                Detail::mult_keys(invalid)
            )))
        } else {
            Ok(())
        }
    }
}

pub fn invalid_message(key: &str) -> &'static str {
    match key {
        "email" => "Please enter a valid email address.",
        "message" => "Message is required and must be at most 500 characters.",
        _ => "This field is required.",
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn message_too_long() {
        let form = SupportForm {
            name: String::from("Bob"),
            email: String::from("bob@example.com"),
            message: "x".repeat(501),
        };

        let err = form.validate().unwrap_err();

        assert_eq!(err.detail().unwrap().keys(), &[String::from("message")]);
    }

    #[test]
    fn valid_request() {
        let form = SupportForm {
            name: String::from("Bob"),
            email: String::from("bob@example.com"),
            message: String::from("the chat page does not load"),
        };

        assert!(form.validate().is_ok());
    }
}
