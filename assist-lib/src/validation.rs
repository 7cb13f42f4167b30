/// checks that the given string has no control characters and no leading or
/// trailing whitespace
pub fn check_control_leading_trailing<G>(given: G) -> bool
where
    G: AsRef<str>
{
    let given_ref = given.as_ref();

    if let Some(ch) = given_ref.chars().next() {
        if ch.is_whitespace() {
            return false;
        }
    }

    if let Some(ch) = given_ref.chars().next_back() {
        if ch.is_whitespace() {
            return false;
        }
    }

    !given_ref.chars().any(|ch| ch.is_control())
}

/// checks that the number of characters (not bytes) is within the inclusive
/// range of min and max
pub fn char_len_within<G>(given: G, min: usize, max: usize) -> bool
where
    G: AsRef<str>
{
    let mut count = 0;

    for _ in given.as_ref().chars() {
        count += 1;

        if count > max {
            return false;
        }
    }

    count >= min
}

#[inline]
pub fn is_blank<G>(given: G) -> bool
where
    G: AsRef<str>
{
    given.as_ref().trim().is_empty()
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    pub fn check_control_leading_trailing_whitespace_chars() {
        assert!(!check_control_leading_trailing(" test"), "leading whitespace characters");
        assert!(!check_control_leading_trailing("test "), "trailing whitespace characters");
        assert!(check_control_leading_trailing("te st"), "inner whitespace is allowed");
    }

    #[test]
    pub fn check_control_leading_trailing_control_chars() {
        assert!(!check_control_leading_trailing("test\u{0000}"), "trailing control characters");
        assert!(!check_control_leading_trailing("\u{0000}test"), "leading control characters");
        assert!(!check_control_leading_trailing("test\u{0000}test"), "contains control characters");
    }

    #[test]
    pub fn char_len_counts_chars() {
        assert!(char_len_within("abcd", 4, 4));
        assert!(!char_len_within("abc", 4, 25));
        assert!(!char_len_within("abcdefghij", 1, 9));
        // 4 chars but 8 bytes
        assert!(char_len_within("éééé", 4, 4));
    }

    #[test]
    pub fn blank_strings() {
        assert!(is_blank(""));
        assert!(is_blank("  \t"));
        assert!(!is_blank(" a "));
    }
}
