use assist_api::Validator;
use assist_api::auth::{self, LoginForm};
use axum::http::HeaderMap;
use axum::extract::{State, Form};
use axum::response::Response;
use serde::Serialize;

use crate::net::{cookie, html, error};
use crate::net::flash::Flash;
use crate::routing::handle::{current_user, field_errors, FieldErrors};
use crate::sec::authn::{password, session};
use crate::state::ArcShared;
use crate::template::Page;
use crate::user::User;

pub const INVALID_CREDENTIALS: &str = "Invalid username or password.";

#[derive(Serialize)]
struct LoginContext<'a> {
    form: FormValues<'a>,
    errors: FieldErrors,
}

#[derive(Default, Serialize)]
struct FormValues<'a> {
    username: &'a str,
}

pub async fn get(
    State(state): State<ArcShared>,
    headers: HeaderMap,
) -> error::Result<Response> {
    let user = current_user(&state, &headers).await?;
    let context = LoginContext {
        form: FormValues::default(),
        errors: FieldErrors::new(),
    };

    Page::new("pages/login", "Login", context)
        .with_user(user.as_ref())
        .render(state.templates(), state.secure(), &headers)
}

pub async fn post(
    State(state): State<ArcShared>,
    headers: HeaderMap,
    Form(form): Form<LoginForm>,
) -> error::Result<Response> {
    let current = current_user(&state, &headers).await?;
    let mut context = LoginContext {
        form: FormValues {
            username: &form.username,
        },
        errors: FieldErrors::new(),
    };

    if let Err(err) = form.validate() {
        context.errors = field_errors(&err, auth::invalid_message);

        return Page::new("pages/login", "Login", context)
            .with_user(current.as_ref())
            .render(state.templates(), state.secure(), &headers);
    }

    let conn = state.pool().get().await?;

    let valid = match User::query_with_username(&conn, &form.username).await? {
        Some(user) => if password::verify(&user.password, &form.password, state.sec().pepper())? {
            Some(user)
        } else {
            None
        },
        None => None,
    };

    let Some(user) = valid else {
        tracing::debug!("invalid login attempt");

        return Page::new("pages/login", "Login", context)
            .with_flash(Flash::danger(INVALID_CREDENTIALS))
            .with_user(current.as_ref())
            .render(state.templates(), state.secure(), &headers);
    };

    let pending = session::Session::create_pending(&conn, user.id).await?;

    tracing::info!(user_id = user.id, "password accepted, awaiting second factor");

    let mut response = html::redirect("/verify_2fa")?;
    cookie::append_cookie(
        &mut response,
        session::create_session_cookie(state.sec(), &pending)
    )?;

    Ok(response)
}
