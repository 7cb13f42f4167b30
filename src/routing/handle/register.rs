use assist_api::Validator;
use assist_api::auth::{self, RegisterForm};
use axum::http::HeaderMap;
use axum::extract::{State, Form};
use axum::response::Response;
use serde::Serialize;

use crate::net::error;
use crate::net::flash::Flash;
use crate::routing::handle::{current_user, field_errors, FieldErrors};
use crate::sec::authn::{password, totp};
use crate::sql;
use crate::state::ArcShared;
use crate::template::{self, Page};
use crate::user::{User, NewUser};

pub const USERNAME_IN_USE: &str = "Username already in use.";
pub const EMAIL_IN_USE: &str = "Email already registered.";

#[derive(Debug, Default, Serialize)]
struct FormValues<'a> {
    username: &'a str,
    email: &'a str,
    consent: bool,
}

#[derive(Serialize)]
struct RegisterContext<'a> {
    form: FormValues<'a>,
    errors: FieldErrors,
}

fn render(
    state: &ArcShared,
    headers: &HeaderMap,
    user: Option<&User>,
    form: FormValues<'_>,
    errors: FieldErrors
) -> error::Result<Response> {
    Page::new("pages/register", "Register", RegisterContext { form, errors })
        .with_user(user)
        .render(state.templates(), state.secure(), headers)
}

pub async fn get(
    State(state): State<ArcShared>,
    headers: HeaderMap,
) -> error::Result<Response> {
    let user = current_user(&state, &headers).await?;

    render(&state, &headers, user.as_ref(), FormValues::default(), FieldErrors::new())
}

pub async fn post(
    State(state): State<ArcShared>,
    headers: HeaderMap,
    Form(form): Form<RegisterForm>,
) -> error::Result<Response> {
    let values = FormValues {
        username: &form.username,
        email: &form.email,
        consent: form.consent,
    };

    let user = current_user(&state, &headers).await?;

    if let Err(err) = form.validate() {
        return render(&state, &headers, user.as_ref(), values, field_errors(&err, auth::invalid_message));
    }

    let conn = state.pool().get().await?;

    let mut errors = FieldErrors::new();

    if User::username_exists(&conn, &form.username).await? {
        errors.insert(String::from("username"), USERNAME_IN_USE);
    }

    if User::email_exists(&conn, &form.email).await? {
        errors.insert(String::from("email"), EMAIL_IN_USE);
    }

    if !errors.is_empty() {
        return render(&state, &headers, user.as_ref(), values, errors);
    }

    let hashed = password::create(&form.password, state.sec().pepper())?;
    let otp_secret = totp::create_secret();

    let result = User::create(&conn, NewUser {
        username: &form.username,
        email: &form.email,
        password: &hashed,
        otp_secret: Some(&otp_secret),
        consent: form.consent,
    }).await;

    match result {
        Ok(id) => {
            tracing::info!(user_id = id, "registered user");
        },
        Err(err) => {
            // another request may have claimed the name since the check above
            let field = match sql::unique_constraint_error(&err) {
                Some("users_username_key") => ("username", USERNAME_IN_USE),
                Some("users_email_key") => ("email", EMAIL_IN_USE),
                _ => return Err(err.into()),
            };

            errors.insert(String::from(field.0), field.1);

            return render(&state, &headers, user.as_ref(), values, errors);
        }
    }

    template::redirect_with_flash(
        "/login",
        Flash::success("Registration successful. Please log in."),
        state.secure()
    )
}
