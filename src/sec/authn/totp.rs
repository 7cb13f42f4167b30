use assist_lib::otp::{self, OtpError};
use base64::{Engine, engine::general_purpose::STANDARD};
use qrcode::QrCode;
use qrcode::render::svg;

use crate::net::error::Error as NetError;

pub const ISSUER: &str = "AI_Assistant";

#[derive(Debug, thiserror::Error)]
pub enum TotpError {
    #[error(transparent)]
    Otp(#[from] OtpError),

    #[error(transparent)]
    Qr(#[from] qrcode::types::QrError),
}

impl From<TotpError> for NetError {
    fn from(err: TotpError) -> Self {
        NetError::new().source(err)
    }
}

pub fn create_secret() -> String {
    otp::create_secret()
}

pub fn verify(secret: &str, username: &str, code: &str) -> Result<bool, TotpError> {
    let totp = otp::totp(secret, username, ISSUER)?;

    Ok(otp::verify_current(&totp, code)?)
}

/// svg qr code of the provisioning uri as a data uri for an `img` tag
pub fn enrollment_qr(secret: &str, username: &str) -> Result<String, TotpError> {
    let uri = otp::totp(secret, username, ISSUER)?.get_url();

    let code = QrCode::new(uri.as_bytes())?;
    let image = code.render::<svg::Color<'_>>()
        .min_dimensions(200, 200)
        .dark_color(svg::Color("#000000"))
        .light_color(svg::Color("#ffffff"))
        .build();

    Ok(format!("data:image/svg+xml;base64,{}", STANDARD.encode(image)))
}
