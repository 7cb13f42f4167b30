use axum::http::HeaderMap;
use axum::response::Response;
use serde::Serialize;

use crate::net::{cookie, html, error};
use crate::net::flash::{self, Flash};
use crate::user::User;

pub mod state;

#[derive(Serialize)]
struct PageUser<'a> {
    username: &'a str,
    consent: bool,
}

#[derive(Serialize)]
struct PageContext<'a, T> {
    title: &'a str,
    user: Option<PageUser<'a>>,
    flashes: &'a [flash::Message],
    #[serde(flatten)]
    data: &'a T,
}

/// a page rendered inside of the base layout. messages from the incoming
/// flash cookie are shown before any added while handling the request and
/// the cookie is cleared afterwards
pub struct Page<'a, T> {
    name: &'a str,
    title: &'a str,
    data: T,
    flash: Flash,
    user: Option<&'a User>,
}

impl<'a, T> Page<'a, T>
where
    T: Serialize
{
    pub fn new(name: &'a str, title: &'a str, data: T) -> Self {
        Page {
            name,
            title,
            data,
            flash: Flash::new(),
            user: None,
        }
    }

    pub fn with_flash(mut self, flash: Flash) -> Self {
        self.flash.extend(flash);
        self
    }

    pub fn with_user(mut self, user: Option<&'a User>) -> Self {
        self.user = user;
        self
    }

    pub fn render(
        self,
        templates: &state::Templates,
        secure: bool,
        headers: &HeaderMap
    ) -> error::Result<Response> {
        let had_cookie = cookie::find_cookie(headers, flash::FLASH_COOKIE).is_some();
        let mut flashes = Flash::from_headers(headers);
        flashes.extend(self.flash);

        let context = PageContext {
            title: self.title,
            user: self.user.map(|user| PageUser {
                username: &user.username,
                consent: user.consent,
            }),
            flashes: flashes.messages(),
            data: &self.data,
        };

        let rendered = templates.render(self.name, &context)?;
        let mut response = html::html_response(rendered)?;

        if had_cookie {
            cookie::append_cookie(&mut response, flash::expire_cookie(secure))?;
        }

        Ok(response)
    }
}

/// redirect carrying flash messages for the next rendered page
pub fn redirect_with_flash(location: &str, flash: Flash, secure: bool) -> error::Result<Response> {
    let mut response = html::redirect(location)?;

    if !flash.is_empty() {
        cookie::append_cookie(&mut response, flash.into_cookie(secure)?)?;
    }

    Ok(response)
}
