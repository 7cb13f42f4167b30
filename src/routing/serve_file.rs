use axum::extract::State;
use axum::http::{Method, Uri};
use axum::response::Response;

use crate::net::{self, error};
use crate::net::error::Context;
use crate::path;
use crate::state::ArcShared;

/// serves files from the assets directory. the uri path maps directly onto
/// the directory and may not contain "." or ".." segments
pub async fn handle(
    State(state): State<ArcShared>,
    method: Method,
    uri: Uri
) -> error::Result<Response> {
    if method != Method::GET && method != Method::HEAD {
        return Err(error::Error::api(error::GeneralKind::InvalidMethod));
    }

    let mut working = state.assets().to_path_buf();

    for part in uri.path().split('/') {
        if part == ".." || part == "." {
            return Err(error::Error::api(error::GeneralKind::InvalidUri));
        } else if !part.is_empty() {
            working.push(part);
        }
    }

    let kind = path::kind(&working)
        .context("error when retrieving metadata for file")?;

    match kind {
        path::Kind::File => net::fs::stream_file(working).await,
        _ => Err(error::Error::api(error::GeneralKind::NotFound)),
    }
}
