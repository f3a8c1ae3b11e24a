use std::fmt;
use std::str::{self, FromStr};
use std::string::String;

use chrono::{DateTime, Local};

use super::parse_utils::split_once;

/// An `Attribution` combines a person's identity (name and e-mail address)
/// with the timestamp for a particular action.
///
/// Attributions are typically associated with commits or tags in git.
///
/// The `timestamp` value is in seconds relative to the Unix epoch.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Attribution {
    name: String,
    email: String,
    timestamp: i64,
    tz_offset: i16,
}

impl Attribution {
    /// Creates a new attribution.
    ///
    /// `tz_offset` is in minutes relative to GMT.
    pub fn new(name: &str, email: &str, timestamp: i64, tz_offset: i16) -> Attribution {
        Attribution {
            name: name.to_string(),
            email: email.to_string(),
            timestamp,
            tz_offset,
        }
    }

    /// Creates an attribution stamped with the current time and local time zone.
    pub fn now(name: &str, email: &str) -> Attribution {
        let now = Local::now();
        let tz_offset = (now.offset().local_minus_utc() / 60) as i16;
        Attribution::new(name, email, now.timestamp(), tz_offset)
    }

    /// Creates an attribution from a date string in one of the forms git
    /// accepts in `GIT_COMMITTER_DATE`: `<unix> <+hhmm>`, `@<unix> <+hhmm>`,
    /// RFC 2822, or RFC 3339.
    ///
    /// Returns `None` if the date can't be understood.
    pub fn with_date(name: &str, email: &str, date: &str) -> Option<Attribution> {
        let (timestamp, tz_offset) = parse_date(date)?;
        Some(Attribution::new(name, email, timestamp, tz_offset))
    }

    /// Parse a name line (e.g. author, committer, tagger) into an `Attribution` struct.
    /// Returns `None` if unable to parse the line properly.
    pub fn parse(line: &[u8]) -> Option<Attribution> {
        let line = drop_last_newline(line);
        let (name, line) = split_once(line, &b'<');
        let name = drop_last_space(name);
        let name = match str::from_utf8(name) {
            Ok(name_str) => name_str.to_string(),
            _ => return None,
        };

        if !line.contains(&b'>') {
            return None;
        }

        let (email, line) = split_once(line, &b'>');
        let email = match str::from_utf8(email) {
            Ok(email_str) => email_str.to_string(),
            _ => return None,
        };

        let line = drop_last_space(line);
        let (tz_offset, line) = last_word(line);
        let tz_offset = tz_from_str(tz_offset.as_str()).unwrap_or(0);

        let (timestamp, _line) = last_word(line);
        let timestamp = i64::from_str(timestamp.as_str()).unwrap_or(0);

        Some(Attribution {
            name,
            email,
            timestamp,
            tz_offset,
        })
    }

    /// Returns the person's human-readable name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the person's email address.
    pub fn email(&self) -> &str {
        &self.email
    }

    /// Returns the timestamp.
    pub fn timestamp(&self) -> i64 {
        self.timestamp
    }

    /// Returns the timezone offset (minutes relative to GMT).
    pub fn tz_offset(&self) -> i16 {
        self.tz_offset
    }

    /// Returns the timezone formatted in human readable offset from GMT.
    pub fn format_tz(&self) -> String {
        let sign = if self.tz_offset < 0 { "-" } else { "+" };

        let offset = self.tz_offset.abs();
        let hours = offset / 60;
        let min = offset % 60;

        format!("{}{:02}{:02}", sign, hours, min)
    }
}

fn parse_date(date: &str) -> Option<(i64, i16)> {
    let date = date.trim();

    if let Ok(dt) = DateTime::parse_from_rfc2822(date) {
        return Some((dt.timestamp(), (dt.offset().local_minus_utc() / 60) as i16));
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(date) {
        return Some((dt.timestamp(), (dt.offset().local_minus_utc() / 60) as i16));
    }

    let date = date.strip_prefix('@').unwrap_or(date);
    let mut words = date.split_whitespace();
    let timestamp = i64::from_str(words.next()?).ok()?;
    let tz_offset = match words.next() {
        Some(tz) => tz_from_str(tz)?,
        None => 0,
    };

    if words.next().is_some() {
        None
    } else {
        Some((timestamp, tz_offset))
    }
}

fn drop_last_newline(s: &[u8]) -> &[u8] {
    if s.last() == Some(&10) {
        &s[0..s.len() - 1]
    } else {
        s
    }
}

fn drop_last_space(s: &[u8]) -> &[u8] {
    if s.last() == Some(&b' ') {
        &s[0..s.len() - 1]
    } else {
        s
    }
}

fn last_word(s: &[u8]) -> (String, &[u8]) {
    let s = match s.iter().position(|b| b != &b' ') {
        Some(n) => &s[n..],
        None => s,
    };

    let (word, line) = rsplit_once(s, &b' ');
    let word = match str::from_utf8(word) {
        Ok(word_str) => word_str.to_string(),
        _ => "".to_string(),
    };

    (word, line)
}

fn rsplit_once<'a>(s: &'a [u8], c: &u8) -> (&'a [u8], &'a [u8]) {
    match s.iter().rev().position(|b| b == c) {
        Some(n) => (&s[s.len() - n..], &s[0..s.len() - n - 1]),
        None => (s, &[]),
    }
}

fn tz_from_str(s: &str) -> Option<i16> {
    let s = s.as_bytes();

    if s.len() != 5 || !s[1..].iter().all(u8::is_ascii_digit) {
        return None;
    }

    let sign: i16 = match s[0] {
        b'+' => 1,
        b'-' => -1,
        _ => return None,
    };

    let hh = from_digit(s[1]) * 10 + from_digit(s[2]);
    let mm = from_digit(s[3]) * 10 + from_digit(s[4]);
    Some(sign * (hh * 60 + mm))
}

fn from_digit(digit: u8) -> i16 {
    (digit as i16) - 48
}

fn sanitize(s: &str) -> String {
    let mut result = String::new();
    for c in s.trim().chars() {
        // Remove control characters except for CR and angle brackets.
        match c as u32 {
            0..=12 => (),
            14..=31 => (),
            60 | 62 => (),
            _ => result.push(c),
        }
    }
    result
}

impl fmt::Display for Attribution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} <{}> {} {}",
            sanitize(&self.name),
            sanitize(&self.email),
            self.timestamp,
            self.format_tz()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::Attribution;

    #[test]
    fn happy_path() {
        let a = Attribution::new("A U Thor", "author@example.com", 1_142_878_501, 150);

        assert_eq!(a.name(), "A U Thor");
        assert_eq!(a.email(), "author@example.com");
        assert_eq!(a.timestamp(), 1_142_878_501);
        assert_eq!(a.tz_offset(), 150);

        assert_eq!(
            a.to_string(),
            "A U Thor <author@example.com> 1142878501 +0230"
        );
    }

    #[test]
    fn parse_legal_cases() {
        let a = Attribution::parse(b"Me <me@example.com> 1234567890 -0700\n").unwrap();
        assert_eq!(a.name(), "Me");
        assert_eq!(a.email(), "me@example.com");
        assert_eq!(a.timestamp(), 1234567890);
        assert_eq!(a.tz_offset(), -420);

        let a = Attribution::parse(b"A U Thor <author@example.com> 1234567890 +0545").unwrap();
        assert_eq!(a.name(), "A U Thor");
        assert_eq!(a.tz_offset(), 345);
    }

    #[test]
    fn parse_missing_email_end() {
        assert!(Attribution::parse(b"Me <me@example.com 1234567890 -0700").is_none());
    }

    #[test]
    fn sanitizes_angle_brackets() {
        let a = Attribution::new("Evil <Name>", "a@b", 0, 0);
        assert_eq!(a.to_string(), "Evil Name <a@b> 0 +0000");
    }

    #[test]
    fn dates_git_accepts() {
        let a = Attribution::with_date("T", "t@x", "1112911993 +0100").unwrap();
        assert_eq!(a.to_string(), "T <t@x> 1112911993 +0100");

        let a = Attribution::with_date("T", "t@x", "@1112911993 -0330").unwrap();
        assert_eq!(a.to_string(), "T <t@x> 1112911993 -0330");

        let a = Attribution::with_date("T", "t@x", "2005-04-07T22:13:13+02:00").unwrap();
        assert_eq!(a.to_string(), "T <t@x> 1112904793 +0200");

        let a = Attribution::with_date("T", "t@x", "Thu, 07 Apr 2005 22:13:13 +0200").unwrap();
        assert_eq!(a.to_string(), "T <t@x> 1112904793 +0200");

        assert!(Attribution::with_date("T", "t@x", "yesterday").is_none());
        assert!(Attribution::with_date("T", "t@x", "12 +01").is_none());
    }

    #[test]
    fn now_is_recent() {
        let a = Attribution::now("T", "t@x");
        assert!(a.timestamp() > 1_600_000_000);
    }
}
