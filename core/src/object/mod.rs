//! Represents the git concept of an "object" which is a tuple of
//! object type and binary data identified by the hash of the binary data.

use sha1::{Digest, Sha1};

mod attribution;
pub use attribution::Attribution;

mod commit;
pub use commit::Commit;

mod error;
pub use error::ParseObjectError;

mod id;
pub use id::{is_hex, Id, ParseIdError, HEX_LEN, ID_LEN};

mod kind;
pub use kind::Kind;

mod kvlm;
pub use kvlm::Kvlm;

mod message;
pub use message::{cleanup_message, join_paragraphs};

pub(crate) mod parse_utils;

mod tag;
pub use tag::Tag;

mod tree;
pub use tree::{Tree, TreeEntry};

/// A parsed git object.
///
/// Blobs are opaque bytes. The other three kinds carry structure, but each
/// keeps enough of its original encoding that [`Object::serialize`] returns
/// exactly the body that was parsed.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Object {
    Blob(Vec<u8>),
    Tree(Tree),
    Commit(Commit),
    Tag(Tag),
}

impl Object {
    /// Parse an object body of the given kind.
    ///
    /// Only the framing of each format is checked; use [`Object::check`]
    /// for the stricter rules git applies before accepting new objects.
    pub fn parse(kind: Kind, body: &[u8]) -> Result<Object, ParseObjectError> {
        Ok(match kind {
            Kind::Blob => Object::Blob(body.to_vec()),
            Kind::Tree => Object::Tree(Tree::parse(body)?),
            Kind::Commit => Object::Commit(Commit::parse(body)?),
            Kind::Tag => Object::Tag(Tag::parse(body)?),
        })
    }

    /// Return the kind of the object.
    pub fn kind(&self) -> Kind {
        match self {
            Object::Blob(_) => Kind::Blob,
            Object::Tree(_) => Kind::Tree,
            Object::Commit(_) => Kind::Commit,
            Object::Tag(_) => Kind::Tag,
        }
    }

    /// Returns the object body (without the `<kind> <len>\0` header).
    pub fn serialize(&self) -> Vec<u8> {
        match self {
            Object::Blob(body) => body.clone(),
            Object::Tree(tree) => tree.serialize(),
            Object::Commit(commit) => commit.serialize(),
            Object::Tag(tag) => tag.serialize(),
        }
    }

    /// Computes the object's ID from its content and type.
    ///
    /// This is functionally equivalent to the
    /// [`git hash-object`](https://git-scm.com/docs/git-hash-object) command
    /// without the `-w` option that would write the object to the repo.
    pub fn id(&self) -> Id {
        hash(self.kind(), &self.serialize())
    }

    /// Returns `Ok(())` if the content of the object is valid for the type.
    pub fn check(&self) -> Result<(), ParseObjectError> {
        match self {
            Object::Blob(_) => Ok(()),
            Object::Tree(tree) => tree.check(),
            Object::Commit(commit) => commit.check(),
            Object::Tag(tag) => tag.check(),
        }
    }
}

/// Hash `body` as an object of the given kind: SHA-1 over
/// `"<kind> <len>\0"` followed by the body.
pub fn hash(kind: Kind, body: &[u8]) -> Id {
    let mut hasher = Sha1::new();
    hasher.update(header(kind, body.len()));
    hasher.update(body);

    let mut id = [0u8; ID_LEN];
    id.copy_from_slice(hasher.finalize().as_slice());
    Id::from_bytes(id)
}

/// Frames `body` the way loose objects are stored before compression.
pub fn encode(kind: Kind, body: &[u8]) -> Vec<u8> {
    let mut raw = header(kind, body.len());
    raw.extend_from_slice(body);
    raw
}

/// Splits a decompressed loose object into its kind and body.
///
/// The length in the header must match the number of body bytes exactly.
pub fn decode(raw: &[u8]) -> Result<(Kind, &[u8]), ParseObjectError> {
    let nul = match raw.iter().position(|&b| b == 0) {
        Some(n) => n,
        None => return Err(bad_header("no NUL after header")),
    };

    let header = &raw[..nul];
    let space = match header.iter().position(|&b| b == b' ') {
        Some(n) => n,
        None => return Err(bad_header("no space after kind")),
    };

    let kind = Kind::from_bytes(&header[..space])?;

    let len_text = &header[space + 1..];
    if len_text.is_empty()
        || !len_text.iter().all(u8::is_ascii_digit)
        || (len_text[0] == b'0' && len_text.len() > 1)
    {
        return Err(bad_header("length is not a decimal number"));
    }

    let len: usize = std::str::from_utf8(len_text)
        .ok()
        .and_then(|s| s.parse().ok())
        .ok_or_else(|| bad_header("length is too large"))?;

    let body = &raw[nul + 1..];
    if body.len() != len {
        return Err(bad_header(&format!(
            "header claims {} bytes but body has {}",
            len,
            body.len()
        )));
    }

    Ok((kind, body))
}

fn header(kind: Kind, len: usize) -> Vec<u8> {
    format!("{} {}\0", kind, len).into_bytes()
}

fn bad_header(reason: &str) -> ParseObjectError {
    ParseObjectError::MalformedHeader(reason.to_string())
}
