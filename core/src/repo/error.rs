use std::path::PathBuf;

use thiserror::Error;

use crate::object::{Id, Kind, ParseObjectError};

/// Describes the potential error conditions that might arise from `Repo` operations.
#[derive(Debug, Error)]
pub enum Error {
    #[error("object {0} not found")]
    ObjectNotFound(Id),

    #[error("object {id} is corrupt: {reason}")]
    CorruptObject { id: Id, reason: String },

    #[error("object {id} has unknown kind `{kind}`")]
    UnknownObjectKind { id: Id, kind: String },

    #[error("object {id} has malformed headers: {reason}")]
    MalformedKvlm { id: Id, reason: String },

    #[error("not a valid object name {0}")]
    UnknownRevision(String),

    #[error("short object ID {name} is ambiguous; candidates are: {}", join_ids(.candidates))]
    AmbiguousReference { name: String, candidates: Vec<Id> },

    #[error("a reference named '{0}' already exists")]
    RefAlreadyExists(String),

    #[error("destination path '{}' already exists and is not an empty directory", .0.display())]
    DestinationNotEmpty(PathBuf),

    #[error("'{name}' is not a valid ref name: {reason}")]
    InvalidRefName { name: String, reason: &'static str },

    #[error("ref '{name}' is malformed: {reason}")]
    InvalidRef { name: String, reason: String },

    #[error("symbolic ref '{0}' does not end within a few hops")]
    SymbolicRefLoop(String),

    #[error("object {id} is a {actual}, not a {wanted}")]
    WrongKind { id: Id, actual: Kind, wanted: Kind },

    #[error("'{}' exists and is not a directory", .0.display())]
    NotADirectory(PathBuf),

    #[error("tree entry '{0}' would be written outside the destination")]
    UnsafePath(String),

    #[error("unable to determine identity; set user.name and user.email")]
    IdentityUnknown,

    #[error("invalid date format: {0}")]
    InvalidDate(String),

    #[error("invalid object: {0}")]
    InvalidObject(ParseObjectError),

    #[error("bad config line {line} in file {}", .path.display())]
    InvalidConfig { path: PathBuf, line: usize },

    #[error("work dir doesn't exist `{}`", .0.display())]
    WorkDirDoesntExist(PathBuf),

    #[error("not a git repository (or any of the parent directories): {}", .0.display())]
    GitDirDoesntExist(PathBuf),

    #[error("git dir shouldn't exist `{}`", .0.display())]
    GitDirShouldntExist(PathBuf),

    #[error("expected git repo version <= 0, found {0}")]
    UnsupportedRepositoryFormat(String),

    #[error(transparent)]
    IoError(#[from] std::io::Error),
}

impl Error {
    /// Maps a failure to parse the stored object `id` into this taxonomy.
    pub fn from_parse(id: &Id, err: ParseObjectError) -> Error {
        match err {
            ParseObjectError::UnknownKind(kind) => Error::UnknownObjectKind { id: *id, kind },
            ParseObjectError::MalformedKvlm(reason) => Error::MalformedKvlm { id: *id, reason },
            other => Error::CorruptObject {
                id: *id,
                reason: other.to_string(),
            },
        }
    }
}

fn join_ids(ids: &[Id]) -> String {
    ids.iter()
        .map(|id| id.to_string())
        .collect::<Vec<String>>()
        .join(", ")
}

/// A specialized `Result` type for `Repo` operations.
pub type Result<T> = std::result::Result<T, Error>;
