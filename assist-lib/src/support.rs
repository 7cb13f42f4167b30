use crate::validation::{char_len_within, is_blank};

pub const MAX_NAME_CHARS: usize = 150;
pub const MAX_MESSAGE_CHARS: usize = 500;

pub fn name_valid<G>(given: G) -> bool
where
    G: AsRef<str>
{
    let given = given.as_ref();

    !is_blank(given) && char_len_within(given, 1, MAX_NAME_CHARS)
}

pub fn message_valid<G>(given: G) -> bool
where
    G: AsRef<str>
{
    let given = given.as_ref();

    !is_blank(given) && char_len_within(given, 1, MAX_MESSAGE_CHARS)
}
