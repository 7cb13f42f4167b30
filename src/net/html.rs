use axum::http::{header, HeaderValue, HeaderMap, StatusCode};
use axum::body::Body;
use axum::response::Response;

use crate::net::error;

pub fn html_response(contents: String) -> error::Result<Response> {
    Ok(Response::builder()
        .status(StatusCode::OK)
        .header("content-type", "text/html; charset=utf-8")
        .header("content-length", contents.len())
        .body(Body::from(contents))?)
}

/// returns an iterator of requested "accept" header values if present
pub fn get_accept_header(hd: &HeaderMap<HeaderValue>) -> error::Result<Option<mime::MimeIter>> {
    if let Some(accept) = hd.get(header::ACCEPT) {
        Ok(Some(mime::MimeIter::new(accept.to_str()?)))
    } else {
        Ok(None)
    }
}

/// checks if header map contains "accept" and is "text/html"
pub fn is_html_accept(hd: &HeaderMap<HeaderValue>) -> error::Result<Option<mime::Mime>> {
    if let Some(accept) = get_accept_header(hd)? {
        for check in accept {
            let Ok(part) = check else {
                continue;
            };

            if part.type_() == "text" && part.subtype() == "html" {
                return Ok(Some(part));
            }
        }
    }

    Ok(None)
}

/// redirect that also works when the client is following a form post
pub fn redirect(location: &str) -> error::Result<Response> {
    Ok(Response::builder()
        .status(StatusCode::SEE_OTHER)
        .header(header::LOCATION, location)
        .body(Body::empty())?)
}
