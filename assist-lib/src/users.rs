use email_address::EmailAddress;

use crate::validation::{check_control_leading_trailing, char_len_within, is_blank};

pub const MIN_USERNAME_CHARS: usize = 4;
pub const MAX_USERNAME_CHARS: usize = 25;

pub const MIN_PASSWORD_CHARS: usize = 6;
pub const MAX_PASSWORD_CHARS: usize = 35;

pub const TOKEN_CHARS: usize = 6;

pub fn username_valid<G>(given: G) -> bool
where
    G: AsRef<str>
{
    let given = given.as_ref();

    char_len_within(given, MIN_USERNAME_CHARS, MAX_USERNAME_CHARS) &&
        check_control_leading_trailing(given)
}

pub fn email_valid<G>(given: G) -> bool
where
    G: AsRef<str>
{
    EmailAddress::is_valid(given.as_ref())
}

pub fn password_valid<G>(given: G) -> bool
where
    G: AsRef<str>
{
    let given = given.as_ref();

    char_len_within(given, MIN_PASSWORD_CHARS, MAX_PASSWORD_CHARS) &&
        !given.chars().any(|ch| ch.is_control())
}

/// the token only has a minimum length, the otp check decides the rest
pub fn token_valid<G>(given: G) -> bool
where
    G: AsRef<str>
{
    let given = given.as_ref();

    !is_blank(given) && given.chars().count() >= TOKEN_CHARS
}
