use std::collections::BTreeMap;

use assist_api::ApiError;
use axum::http::HeaderMap;
use axum::extract::State;
use axum::response::IntoResponse;
use serde::Serialize;

use crate::net::error;
use crate::sec::authn::initiator;
use crate::state::ArcShared;
use crate::template::Page;
use crate::user::User;

pub mod ping;
pub mod register;
pub mod login;
pub mod verify_2fa;
pub mod logout;
pub mod process;
pub mod services;
pub mod support;

/// field name to user facing message for a failed form
pub type FieldErrors = BTreeMap<String, &'static str>;

/// maps the keys of a validation error to their messages
pub fn field_errors(err: &ApiError, message: fn(&str) -> &'static str) -> FieldErrors {
    let mut rtn = FieldErrors::new();

    if let Some(detail) = err.detail() {
        for key in detail.keys() {
            rtn.insert(key.clone(), message(key));
        }
    }

    rtn
}

/// the logged in user for pages that only change their navigation
pub async fn current_user(state: &ArcShared, headers: &HeaderMap) -> error::Result<Option<User>> {
    let initiator = initiator::lookup_optional(state.sec(), state.pool(), headers).await?;

    Ok(initiator.map(|found| found.user))
}

#[derive(Serialize)]
pub struct IndexContext {
    logged_in: bool,
}

pub async fn get(
    State(state): State<ArcShared>,
    headers: HeaderMap
) -> error::Result<impl IntoResponse> {
    let initiator = initiator::lookup_optional(state.sec(), state.pool(), &headers).await?;

    let context = IndexContext {
        logged_in: initiator.is_some(),
    };

    Page::new("pages/index", "AI Assistant", context)
        .with_user(initiator.as_ref().map(|i| i.user()))
        .render(state.templates(), state.secure(), &headers)
}
