use assist_api::Validator;
use assist_api::support::{self, SupportForm};
use axum::http::HeaderMap;
use axum::extract::{State, Form};
use axum::response::Response;
use deadpool_postgres::GenericClient;
use serde::Serialize;
use tokio_postgres::{Error as PgError};

use crate::net::error;
use crate::net::flash::Flash;
use crate::routing::handle::{current_user, field_errors, FieldErrors};
use crate::state::ArcShared;
use crate::template::{self, Page};

#[derive(Default, Serialize)]
struct FormValues<'a> {
    name: &'a str,
    email: &'a str,
    message: &'a str,
}

#[derive(Serialize)]
struct SupportContext<'a> {
    form: FormValues<'a>,
    errors: FieldErrors,
}

async fn insert_request(conn: &impl GenericClient, form: &SupportForm) -> Result<i64, PgError> {
    let row = conn.query_one(
        "\
        insert into support_request (name, email, message, submitted) values \
        ($1, $2, $3, $4) \
        returning id",
        &[&form.name, &form.email, &form.message, &chrono::Utc::now()]
    ).await?;

    Ok(row.get(0))
}

pub async fn get(
    State(state): State<ArcShared>,
    headers: HeaderMap,
) -> error::Result<Response> {
    let user = current_user(&state, &headers).await?;
    let context = SupportContext {
        form: FormValues {
            email: user.as_ref().map_or("", |found| found.email.as_str()),
            ..FormValues::default()
        },
        errors: FieldErrors::new(),
    };

    Page::new("pages/support", "Customer Support", context)
        .with_user(user.as_ref())
        .render(state.templates(), state.secure(), &headers)
}

pub async fn post(
    State(state): State<ArcShared>,
    headers: HeaderMap,
    Form(form): Form<SupportForm>,
) -> error::Result<Response> {
    if let Err(err) = form.validate() {
        let user = current_user(&state, &headers).await?;
        let context = SupportContext {
            form: FormValues {
                name: &form.name,
                email: &form.email,
                message: &form.message,
            },
            errors: field_errors(&err, support::invalid_message),
        };

        return Page::new("pages/support", "Customer Support", context)
            .with_user(user.as_ref())
            .render(state.templates(), state.secure(), &headers);
    }

    let conn = state.pool().get().await?;
    let id = insert_request(&conn, &form).await?;

    tracing::info!(request_id = id, "support request submitted");

    template::redirect_with_flash(
        "/support",
        Flash::success("Your support request has been submitted."),
        state.secure()
    )
}
