use assist_api::Validator;
use assist_api::auth::{self, VerifyForm};
use axum::http::HeaderMap;
use axum::extract::{State, Form};
use axum::response::Response;
use deadpool_postgres::GenericClient;
use serde::Serialize;

use crate::net::{cookie, html, error};
use crate::net::flash::Flash;
use crate::routing::handle::{field_errors, FieldErrors};
use crate::sec::authn::{initiator, session, totp};
use crate::sec::authn::session::Session;
use crate::state::ArcShared;
use crate::template::{self, Page};
use crate::user::User;

pub const INVALID_TOKEN: &str = "Invalid authentication token.";

enum Pending {
    Missing,
    Verified,
    Waiting(Session, User),
}

/// the session waiting on the second factor, if the request carries one
async fn find_pending(
    state: &ArcShared,
    conn: &impl GenericClient,
    headers: &HeaderMap,
) -> error::Result<Pending> {
    let Ok(token) = initiator::find_token(state.sec(), headers) else {
        return Ok(Pending::Missing);
    };

    let Some(session) = Session::retrieve_token(conn, &token).await? else {
        return Ok(Pending::Missing);
    };

    if session.is_expired(&chrono::Utc::now()) {
        return Ok(Pending::Missing);
    }

    if session.verified {
        return Ok(Pending::Verified);
    }

    match User::query_with_id(conn, &session.user_id).await? {
        Some(user) => Ok(Pending::Waiting(session, user)),
        None => Ok(Pending::Missing),
    }
}

/// secret for the user, created on the first challenge when missing
async fn ensure_secret(conn: &impl GenericClient, user: &mut User) -> error::Result<String> {
    if let Some(secret) = &user.otp_secret {
        return Ok(secret.clone());
    }

    let secret = totp::create_secret();

    user.set_otp_secret(conn, secret.clone()).await?;

    Ok(secret)
}

#[derive(Serialize)]
struct VerifyContext {
    /// only present until the user has completed a verification
    qr: Option<String>,
    errors: FieldErrors,
}

fn render(
    state: &ArcShared,
    headers: &HeaderMap,
    user: &User,
    secret: &str,
    errors: FieldErrors,
    flash: Flash,
) -> error::Result<Response> {
    let qr = if user.otp_enrolled {
        None
    } else {
        Some(totp::enrollment_qr(secret, &user.username)?)
    };

    Page::new("pages/verify_2fa", "Two-Factor Authentication", VerifyContext { qr, errors })
        .with_flash(flash)
        .render(state.templates(), state.secure(), headers)
}

pub async fn get(
    State(state): State<ArcShared>,
    headers: HeaderMap,
) -> error::Result<Response> {
    let conn = state.pool().get().await?;

    match find_pending(&state, &conn, &headers).await? {
        Pending::Missing => html::redirect("/login"),
        Pending::Verified => html::redirect("/"),
        Pending::Waiting(_session, mut user) => {
            let secret = ensure_secret(&conn, &mut user).await?;

            render(&state, &headers, &user, &secret, FieldErrors::new(), Flash::new())
        }
    }
}

pub async fn post(
    State(state): State<ArcShared>,
    headers: HeaderMap,
    Form(form): Form<VerifyForm>,
) -> error::Result<Response> {
    let mut conn = state.pool().get().await?;

    let (mut session, mut user) = match find_pending(&state, &conn, &headers).await? {
        Pending::Missing => return html::redirect("/login"),
        Pending::Verified => return html::redirect("/"),
        Pending::Waiting(session, user) => (session, user),
    };

    let secret = ensure_secret(&conn, &mut user).await?;

    if let Err(err) = form.validate() {
        let errors = field_errors(&err, auth::invalid_message);

        return render(&state, &headers, &user, &secret, errors, Flash::new());
    }

    if !totp::verify(&secret, &user.username, &form.token)? {
        tracing::debug!(user_id = user.id, "invalid totp code");

        return render(&state, &headers, &user, &secret, FieldErrors::new(), Flash::danger(INVALID_TOKEN));
    }

    {
        let transaction = conn.transaction().await?;

        // a concurrent request may have completed, deleted or outlived the
        // session since it was looked up
        if !session.verify(&transaction).await? {
            tracing::debug!(user_id = user.id, "pending session no longer valid");

            return html::redirect("/login");
        }

        user.set_enrolled(&transaction).await?;

        transaction.commit().await?;
    }

    tracing::info!(user_id = user.id, "login complete");

    let mut response = template::redirect_with_flash(
        "/",
        Flash::success("Login successful."),
        state.secure()
    )?;
    cookie::append_cookie(
        &mut response,
        session::create_session_cookie(state.sec(), &session)
    )?;

    Ok(response)
}
