use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

use super::ParseObjectError;

/// Describes the fundamental git object type (blob, tree, commit, or tag).
///
/// We use the word `kind` here to avoid conflict with the Rust reserved word `type`.
#[derive(Copy, Clone, Debug, Eq, Hash, PartialEq)]
pub enum Kind {
    Blob,
    Tree,
    Commit,
    Tag,
}

impl Kind {
    /// Returns the name git uses for this kind in object headers.
    pub fn as_str(self) -> &'static str {
        match self {
            Kind::Blob => "blob",
            Kind::Tree => "tree",
            Kind::Commit => "commit",
            Kind::Tag => "tag",
        }
    }

    /// Parse the kind name found in an object header.
    pub fn from_bytes(name: &[u8]) -> Result<Kind, ParseObjectError> {
        match name {
            b"blob" => Ok(Kind::Blob),
            b"tree" => Ok(Kind::Tree),
            b"commit" => Ok(Kind::Commit),
            b"tag" => Ok(Kind::Tag),
            _ => Err(ParseObjectError::UnknownKind(
                String::from_utf8_lossy(name).into_owned(),
            )),
        }
    }
}

impl Display for Kind {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Kind {
    type Err = ParseObjectError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Kind::from_bytes(s.as_bytes())
    }
}
