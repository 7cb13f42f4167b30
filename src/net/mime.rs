use std::ffi::OsStr;

use mime::Mime;

fn ext_mime(ext: &str) -> Option<Mime> {
    let found = match ext {
        "jpg" | "jpeg" => mime::IMAGE_JPEG,
        "png" => mime::IMAGE_PNG,
        "gif" => mime::IMAGE_GIF,
        "svg" => mime::IMAGE_SVG,
        "webp" => "image/webp".parse().ok()?,
        "ico" => "image/x-icon".parse().ok()?,

        "css" => mime::TEXT_CSS,
        "html" => mime::TEXT_HTML,
        "txt" => mime::TEXT_PLAIN,

        "js" => mime::APPLICATION_JAVASCRIPT,
        "json" => mime::APPLICATION_JSON,
        _ => return None,
    };

    Some(found)
}

pub fn mime_from_ext(ext: Option<&OsStr>) -> Mime {
    ext.and_then(OsStr::to_str)
        .map(str::to_ascii_lowercase)
        .and_then(|ext| ext_mime(&ext))
        .unwrap_or(mime::APPLICATION_OCTET_STREAM)
}
