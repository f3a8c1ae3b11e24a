//! The key-value-list-plus-message format shared by commit and tag objects.
//!
//! ```text
//! tree 29ff16c9c14e2652b22f8b78bb08a5a07930c147
//! parent 206941306e8a8af65b66eaaaea388a7ae24d49a0
//! author Thibault Polge <thibault@thb.lt> 1527025023 +0200
//! gpgsig -----BEGIN PGP SIGNATURE-----
//!  <continuation lines start with a single space>
//!  -----END PGP SIGNATURE-----
//!
//! Message text, kept byte-for-byte.
//! ```

use super::ParseObjectError;

/// An ordered multi-map of header fields followed by a free-text message.
///
/// Field order is kept exactly as parsed or inserted and keys may repeat
/// (a merge commit has several `parent` fields), so that serializing a
/// parsed object reproduces its bytes.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Kvlm {
    fields: Vec<(Vec<u8>, Vec<u8>)>,
    message: Option<Vec<u8>>,
}

impl Kvlm {
    /// Create an empty list with no message.
    pub fn new() -> Kvlm {
        Kvlm::default()
    }

    /// Parse the body of a commit or tag object.
    pub fn parse(raw: &[u8]) -> Result<Kvlm, ParseObjectError> {
        let mut kvlm = Kvlm::new();
        let mut pos = 0;

        while pos < raw.len() {
            let line_end = find_line_end(raw, pos);
            let line = &raw[pos..line_end];

            if line.is_empty() {
                kvlm.message = Some(raw[line_end + 1..].to_vec());
                return Ok(kvlm);
            }

            if line[0] == b' ' {
                return Err(malformed(pos, "continuation line with no field"));
            }

            let space = match line.iter().position(|&b| b == b' ') {
                Some(n) => n,
                None => return Err(malformed(pos, "field has no value")),
            };

            let key = line[..space].to_vec();
            let mut value = line[space + 1..].to_vec();

            // A value continues on each following line that starts with a space.
            let mut end = line_end;
            while end < raw.len() && raw.get(end + 1) == Some(&b' ') {
                let next_end = find_line_end(raw, end + 1);
                value.push(b'\n');
                value.extend_from_slice(&raw[end + 2..next_end]);
                end = next_end;
            }

            if end == raw.len() {
                return Err(malformed(pos, "field is not terminated by a newline"));
            }

            kvlm.fields.push((key, value));
            pos = end + 1;
        }

        Ok(kvlm)
    }

    /// Serialize back to the object body format.
    pub fn serialize(&self) -> Vec<u8> {
        let mut out = Vec::new();

        for (key, value) in &self.fields {
            out.extend_from_slice(key);
            out.push(b' ');
            for &b in value {
                out.push(b);
                if b == b'\n' {
                    out.push(b' ');
                }
            }
            out.push(b'\n');
        }

        if let Some(message) = &self.message {
            out.push(b'\n');
            out.extend_from_slice(message);
        }

        out
    }

    /// Append a field. Existing fields with the same key are kept.
    pub fn push<K: AsRef<[u8]>, V: AsRef<[u8]>>(&mut self, key: K, value: V) {
        self.fields
            .push((key.as_ref().to_vec(), value.as_ref().to_vec()));
    }

    /// Returns the value of the first field named `key`.
    pub fn get(&self, key: &[u8]) -> Option<&[u8]> {
        self.fields
            .iter()
            .find(|(k, _)| k.as_slice() == key)
            .map(|(_, v)| v.as_slice())
    }

    /// Returns the values of every field named `key`, in order.
    pub fn get_all<'a>(&'a self, key: &'a [u8]) -> impl Iterator<Item = &'a [u8]> + 'a {
        self.fields
            .iter()
            .filter(move |(k, _)| k.as_slice() == key)
            .map(|(_, v)| v.as_slice())
    }

    /// Returns all fields in order.
    pub fn fields(&self) -> impl Iterator<Item = (&[u8], &[u8])> + '_ {
        self.fields.iter().map(|(k, v)| (k.as_slice(), v.as_slice()))
    }

    /// Returns the message, or `None` if the body had no blank-line separator.
    pub fn message(&self) -> Option<&[u8]> {
        self.message.as_deref()
    }

    /// Replace the message.
    pub fn set_message<M: Into<Vec<u8>>>(&mut self, message: M) {
        self.message = Some(message.into());
    }
}

fn find_line_end(raw: &[u8], start: usize) -> usize {
    raw[start..]
        .iter()
        .position(|&b| b == b'\n')
        .map_or(raw.len(), |n| start + n)
}

fn malformed(offset: usize, reason: &str) -> ParseObjectError {
    ParseObjectError::MalformedKvlm(format!("{} at byte {}", reason, offset))
}

#[cfg(test)]
mod tests {
    use super::*;

    const COMMIT: &[u8] = b"tree 29ff16c9c14e2652b22f8b78bb08a5a07930c147\n\
parent 206941306e8a8af65b66eaaaea388a7ae24d49a0\n\
author Thibault Polge <thibault@thb.lt> 1527025023 +0200\n\
committer Thibault Polge <thibault@thb.lt> 1527025044 +0200\n\
gpgsig -----BEGIN PGP SIGNATURE-----\n \n iQIzBAABCAAdFiEExwXquOM8bWb4Q2zVGxM2FxoLkGQFAlsEjZQACgkQGxM2FxoL\n -----END PGP SIGNATURE-----\n\
\n\
Create first draft\n";

    #[test]
    fn parse_commit_fields_in_order() {
        let kvlm = Kvlm::parse(COMMIT).unwrap();

        let keys: Vec<&[u8]> = kvlm.fields().map(|(k, _)| k).collect();
        assert_eq!(
            keys,
            vec![
                &b"tree"[..],
                &b"parent"[..],
                &b"author"[..],
                &b"committer"[..],
                &b"gpgsig"[..]
            ]
        );

        assert_eq!(
            kvlm.get(b"tree").unwrap(),
            b"29ff16c9c14e2652b22f8b78bb08a5a07930c147"
        );
        assert_eq!(
            kvlm.get(b"gpgsig").unwrap(),
            &b"-----BEGIN PGP SIGNATURE-----\n\niQIzBAABCAAdFiEExwXquOM8bWb4Q2zVGxM2FxoLkGQFAlsEjZQACgkQGxM2FxoL\n-----END PGP SIGNATURE-----"[..]
        );
        assert_eq!(kvlm.message().unwrap(), b"Create first draft\n");
    }

    #[test]
    fn round_trip_is_exact() {
        let kvlm = Kvlm::parse(COMMIT).unwrap();
        assert_eq!(kvlm.serialize(), COMMIT);
    }

    #[test]
    fn repeated_keys_keep_order() {
        let raw = b"tree 29ff16c9c14e2652b22f8b78bb08a5a07930c147\n\
parent 1111111111111111111111111111111111111111\n\
parent 2222222222222222222222222222222222222222\n\
parent 3333333333333333333333333333333333333333\n\
\n\
merge\n";
        let kvlm = Kvlm::parse(raw).unwrap();

        let parents: Vec<&[u8]> = kvlm.get_all(b"parent").collect();
        assert_eq!(parents.len(), 3);
        assert_eq!(parents[0], b"1111111111111111111111111111111111111111");
        assert_eq!(parents[2], b"3333333333333333333333333333333333333333");
        assert_eq!(kvlm.serialize(), &raw[..]);
    }

    #[test]
    fn message_kept_verbatim() {
        let raw = b"object be9bfa841874ccc9f2ef7c48d0c76226f89b7189\n\n  indented\n\n\ntrailing  \n\n";
        let kvlm = Kvlm::parse(raw).unwrap();
        assert_eq!(kvlm.message().unwrap(), b"  indented\n\n\ntrailing  \n\n");
        assert_eq!(kvlm.serialize(), &raw[..]);
    }

    #[test]
    fn no_message_separator() {
        let raw = b"tree be9bfa841874ccc9f2ef7c48d0c76226f89b7189\n\
author <> 0 +0000\n\
committer <> 0 +0000\n";
        let kvlm = Kvlm::parse(raw).unwrap();
        assert_eq!(kvlm.message(), None);
        assert_eq!(kvlm.serialize(), &raw[..]);
    }

    #[test]
    fn empty_message() {
        let raw = b"tag v1\n\n";
        let kvlm = Kvlm::parse(raw).unwrap();
        assert_eq!(kvlm.message().unwrap(), b"");
        assert_eq!(kvlm.serialize(), &raw[..]);
    }

    #[test]
    fn build_from_scratch() {
        let mut kvlm = Kvlm::new();
        kvlm.push("object", "be9bfa841874ccc9f2ef7c48d0c76226f89b7189");
        kvlm.push("note", "two\nlines");
        kvlm.set_message("hi\n");

        assert_eq!(
            kvlm.serialize(),
            b"object be9bfa841874ccc9f2ef7c48d0c76226f89b7189\nnote two\n lines\n\nhi\n".to_vec()
        );
    }

    #[test]
    fn malformed_inputs() {
        let err = Kvlm::parse(b"novalue\n\nmsg").unwrap_err();
        assert!(matches!(err, ParseObjectError::MalformedKvlm(_)));

        let err = Kvlm::parse(b" leading continuation\n").unwrap_err();
        assert!(matches!(err, ParseObjectError::MalformedKvlm(_)));

        let err = Kvlm::parse(b"tree abc").unwrap_err();
        assert!(matches!(err, ParseObjectError::MalformedKvlm(_)));
    }
}
