//! time based one time passwords. the algorithm lives in `totp-rs`, this
//! module fixes the parameters used for every account

use totp_rs::{Algorithm, Secret, TOTP};

pub use totp_rs::TOTP as Totp;

pub const DIGITS: usize = 6;
pub const STEP: u64 = 30;
/// steps accepted on either side of the current one
pub const SKEW: u8 = 1;

#[derive(Debug, thiserror::Error)]
pub enum OtpError {
    #[error("secret is not valid base32")]
    InvalidSecret,

    #[error(transparent)]
    Clock(#[from] std::time::SystemTimeError),
}

/// new random 160 bit secret, base32 encoded without padding
pub fn create_secret() -> String {
    Secret::generate_secret()
        .to_encoded()
        .to_string()
}

/// accepts lower case, spaces and trailing padding since authenticator apps
/// and users are not consistent about either
pub fn decode_secret<S>(secret: S) -> Result<Vec<u8>, OtpError>
where
    S: AsRef<str>
{
    let cleaned: String = secret.as_ref()
        .chars()
        .filter(|ch| !ch.is_whitespace() && *ch != '=')
        .map(|ch| ch.to_ascii_uppercase())
        .collect();

    Secret::Encoded(cleaned)
        .to_bytes()
        .map_err(|_| OtpError::InvalidSecret)
}

/// SHA1 with the fixed digits, step and skew. `account` and `issuer` only
/// show up in the provisioning uri
///
/// `new_unchecked` since usernames may contain a ":" which the checked
/// constructor refuses. the label is url encoded either way
pub fn totp(secret: &str, account: &str, issuer: &str) -> Result<Totp, OtpError> {
    Ok(TOTP::new_unchecked(
        Algorithm::SHA1,
        DIGITS,
        SKEW,
        STEP,
        decode_secret(secret)?,
        Some(issuer.to_owned()),
        account.to_owned(),
    ))
}

/// checks the code against the system clock
pub fn verify_current<C>(totp: &Totp, code: C) -> Result<bool, OtpError>
where
    C: AsRef<str>
{
    Ok(totp.check_current(code.as_ref().trim())?)
}

#[cfg(test)]
mod test {
    use super::*;

    const RFC_SECRET: &[u8] = b"12345678901234567890";

    fn rfc_totp(algorithm: Algorithm, secret: &[u8]) -> Totp {
        TOTP::new_unchecked(algorithm, 8, 0, 30, secret.to_vec(), None, String::from("rfc"))
    }

    #[test]
    fn rfc6238_vectors() {
        let sha1 = rfc_totp(Algorithm::SHA1, RFC_SECRET);
        let vectors = [
            (59, "94287082"),
            (1111111109, "07081804"),
            (1111111111, "14050471"),
            (1234567890, "89005924"),
            (2000000000, "69279037"),
            (20000000000, "65353130"),
        ];

        for (time, expected) in vectors {
            assert_eq!(sha1.generate(time), expected, "time {time}");
            assert!(sha1.check(expected, time));
        }

        let sha256 = rfc_totp(Algorithm::SHA256, b"12345678901234567890123456789012");

        assert_eq!(sha256.generate(59), "46119246");
    }

    #[test]
    fn one_step_of_skew() {
        let totp = totp(&create_secret(), "alice", "AI_Assistant").unwrap();
        let now = 1_700_000_000;

        assert!(totp.check(&totp.generate(now - 30), now));
        assert!(totp.check(&totp.generate(now + 30), now));

        let too_old = totp.generate(now - 60);

        // two steps back only matches the current window by coincidence
        if ![now - 30, now, now + 30].iter().any(|t| totp.generate(*t) == too_old) {
            assert!(!totp.check(&too_old, now));
        }
    }

    #[test]
    fn wrong_length_rejected() {
        let totp = totp(&create_secret(), "alice", "AI_Assistant").unwrap();

        assert!(!verify_current(&totp, "12345").unwrap());
        assert!(!verify_current(&totp, "").unwrap());
    }

    #[test]
    fn secret_encoding() {
        let secret = create_secret();

        assert_eq!(secret.len(), 32);
        assert_eq!(decode_secret(secret.to_lowercase()).unwrap().len(), 20);
        assert!(matches!(decode_secret("not base32!"), Err(OtpError::InvalidSecret)));
    }

    #[test]
    fn provisioning_uri_format() {
        let totp = totp("GEZDGNBVGY3TQOJQGEZDGNBVGY3TQOJQ", "alice", "AI_Assistant").unwrap();

        assert_eq!(
            totp.get_url(),
            "otpauth://totp/AI_Assistant:alice?secret=GEZDGNBVGY3TQOJQGEZDGNBVGY3TQOJQ&issuer=AI_Assistant"
        );
    }
}
