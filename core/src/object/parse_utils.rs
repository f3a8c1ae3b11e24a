use super::id::{Id, HEX_LEN};

pub(crate) fn split_once<'a>(s: &'a [u8], c: &u8) -> (&'a [u8], &'a [u8]) {
    match s.iter().position(|b| b == c) {
        Some(n) => (&s[0..n], &s[n + 1..]),
        None => (s, &[]),
    }
}

/// Parse a header value that must be exactly one 40-digit lower-case hex ID.
pub(crate) fn parse_id(value: &[u8]) -> Option<Id> {
    if value.len() == HEX_LEN {
        Id::from_hex(value).ok()
    } else {
        None
    }
}

/// Checks `name <email> timestamp tz` the way git's object checker does.
///
/// An empty name is tolerated; everything after the e-mail is not.
pub(crate) fn attribution_is_valid(value: &[u8]) -> bool {
    let email_start = match value.iter().position(|&b| b == b'<' || b == b'>') {
        Some(n) if value[n] == b'<' => n + 1,
        _ => return false,
    };

    let email_end = match value[email_start..]
        .iter()
        .position(|&b| b == b'<' || b == b'>')
    {
        Some(n) if value[email_start + n] == b'>' => email_start + n + 1,
        _ => return false,
    };

    let rest = &value[email_end..];
    let rest = match rest.strip_prefix(b" ") {
        Some(rest) => rest,
        None => return false,
    };

    let digits = rest.iter().take_while(|b| b.is_ascii_digit()).count();
    if digits == 0 || (rest[0] == b'0' && digits > 1) {
        return false;
    }

    let tz = match rest[digits..].strip_prefix(b" ") {
        Some(tz) => tz,
        None => return false,
    };

    tz.len() == 5 && (tz[0] == b'+' || tz[0] == b'-') && tz[1..].iter().all(u8::is_ascii_digit)
}
