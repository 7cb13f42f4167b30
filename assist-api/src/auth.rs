use serde::{Serialize, Deserialize};

use crate::{Validator, ApiError, Detail};
use crate::error::GeneralKind;

/// the consent checkbox is only present when checked
fn checkbox<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: serde::Deserializer<'de>
{
    let value: Option<String> = Option::deserialize(deserializer)?;

    Ok(match value.as_deref() {
        Some("") | Some("false") | Some("off") | Some("0") | None => false,
        Some(_) => true,
    })
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct RegisterForm {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub confirm: String,
    #[serde(default, deserialize_with = "checkbox")]
    pub consent: bool,
}

impl Validator for RegisterForm {
    fn validate(&self) -> Result<(), ApiError> {
        let mut invalid = Vec::new();

        if !assist_lib::users::username_valid(&self.username) {
            invalid.push("username");
        }

        if !assist_lib::users::email_valid(&self.email) {
            invalid.push("email");
        }

        if !assist_lib::users::password_valid(&self.password) {
            invalid.push("password");
        }

        if self.confirm != self.password {
            invalid.push("confirm");
        }

        if !self.consent {
            invalid.push("consent");
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

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

impl Validator for LoginForm {
    fn validate(&self) -> Result<(), ApiError> {
        let mut invalid = Vec::new();

        if assist_lib::validation::is_blank(&self.username) {
            invalid.push("username");
        }

        if self.password.is_empty() {
            invalid.push("password");
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

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct VerifyForm {
    #[serde(default)]
    pub token: String,
}

impl Validator for VerifyForm {
    fn validate(&self) -> Result<(), ApiError> {
        if !assist_lib::users::token_valid(&self.token) {
            Err(ApiError::from((
                GeneralKind::ValidationFailed,
                Detail::with_key("token")
            )))
        } else {
            Ok(())
        }
    }
}

/// user facing text for a field that failed validation
pub fn invalid_message(key: &str) -> &'static str {
    match key {
        "username" => "Username must be between 4 and 25 characters.",
        "email" => "Please enter a valid email address.",
        "password" => "Password must be between 6 and 35 characters.",
        "confirm" => "Passwords must match.",
        "consent" => "You must agree to the data usage terms.",
        "token" => "Please enter the code from your authenticator app.",
        _ => "This field is required.",
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn invalid_keys(result: Result<(), ApiError>) -> Vec<String> {
        result.unwrap_err()
            .detail()
            .map(|d| d.keys().to_vec())
            .unwrap_or_default()
    }

    fn register() -> RegisterForm {
        RegisterForm {
            username: String::from("alice"),
            email: String::from("alice@example.com"),
            password: String::from("secret1"),
            confirm: String::from("secret1"),
            consent: true,
        }
    }

    #[test]
    fn register_valid() {
        assert!(register().validate().is_ok());
    }

    #[test]
    fn register_collects_every_invalid_field() {
        let form = RegisterForm {
            username: String::from("abc"),
            email: String::from("not an email"),
            password: String::from("12345"),
            confirm: String::from("54321"),
            consent: false,
        };

        assert_eq!(
            invalid_keys(form.validate()),
            vec!["username", "email", "password", "confirm", "consent"]
        );
    }

    #[test]
    fn register_confirm_mismatch() {
        let mut form = register();
        form.confirm = String::from("secret2");

        assert_eq!(invalid_keys(form.validate()), vec!["confirm"]);
    }

    #[test]
    fn consent_checkbox_values() {
        let checked: RegisterForm = serde_json::from_str(r#"{"consent":"y"}"#).unwrap();
        let missing: RegisterForm = serde_json::from_str(r#"{}"#).unwrap();
        let off: RegisterForm = serde_json::from_str(r#"{"consent":"false"}"#).unwrap();

        assert!(checked.consent);
        assert!(!missing.consent);
        assert!(!off.consent);
    }

    #[test]
    fn verify_token_minimum() {
        let short = VerifyForm { token: String::from("123") };
        let ok = VerifyForm { token: String::from("123456") };

        assert_eq!(invalid_keys(short.validate()), vec!["token"]);
        assert!(ok.validate().is_ok());
    }
}
