use std::path::Path;

use tokio::fs::OpenOptions;
use tokio_util::io::ReaderStream;
use axum::http::{header, StatusCode};
use axum::body::Body;
use axum::response::Response;

use crate::net;
use crate::net::error;

pub async fn stream_file<P>(path: P) -> error::Result<Response>
where
    P: AsRef<Path>,
{
    let path_ref = path.as_ref();
    let mime = net::mime::mime_from_ext(path_ref.extension());

    let file = OpenOptions::new()
        .read(true)
        .open(path_ref)
        .await?;
    let metadata = file.metadata().await?;

    let stream = ReaderStream::new(file);

    Ok(Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, mime.to_string())
        .header(header::CONTENT_LENGTH, metadata.len())
        .body(Body::from_stream(stream))?)
}

#[cfg(test)]
mod test {
    use super::*;

    #[tokio::test]
    async fn streams_with_mime() {
        let path = std::env::temp_dir().join(format!("assist_stream_{}.css", std::process::id()));
        std::fs::write(&path, "body { margin: 0; }").unwrap();

        let res = stream_file(&path).await.unwrap();

        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(res.headers().get(header::CONTENT_TYPE).unwrap(), "text/css");
        assert_eq!(res.headers().get(header::CONTENT_LENGTH).unwrap(), "19");

        std::fs::remove_file(&path).unwrap();
    }
}
