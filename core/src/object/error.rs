use thiserror::Error;

use super::Kind;

/// Describes why a byte sequence could not be accepted as a git object.
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum ParseObjectError {
    /// Object header named a kind other than blob, tree, commit, or tag.
    #[error("unknown object kind `{0}`")]
    UnknownKind(String),

    /// The `<kind> <length>\0` header could not be parsed.
    #[error("malformed object header: {0}")]
    MalformedHeader(String),

    /// Commit or tag header lines could not be parsed.
    #[error("malformed key-value list: {0}")]
    MalformedKvlm(String),

    /// Tree entries could not be parsed.
    #[error("malformed tree: {0}")]
    MalformedTree(String),

    /// The object parsed, but breaks one of git's content rules.
    #[error("invalid {kind}: {reason}")]
    Invalid { kind: Kind, reason: String },
}

impl ParseObjectError {
    pub(crate) fn invalid<S: Into<String>>(kind: Kind, reason: S) -> ParseObjectError {
        ParseObjectError::Invalid {
            kind,
            reason: reason.into(),
        }
    }
}
