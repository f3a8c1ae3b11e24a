use std::fmt;

use super::{Error, Result};
use crate::object::{Id, HEX_LEN};

/// What a ref file holds: either an object ID or the name of another ref.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum RefTarget {
    Direct(Id),
    Symbolic(String),
}

impl RefTarget {
    /// Parse the content of a ref file named `name`.
    ///
    /// Accepts `<40 hex>` or `ref: <refname>`, each optionally followed by
    /// a newline. Anything else is `InvalidRef`.
    pub fn parse(name: &str, content: &[u8]) -> Result<RefTarget> {
        let content = content.strip_suffix(b"\n").unwrap_or(content);

        if let Some(target) = content.strip_prefix(b"ref: ") {
            let target = std::str::from_utf8(target).map_err(|_| invalid(name, "not UTF-8"))?;
            let target = target.trim();
            if target.is_empty() {
                return Err(invalid(name, "symbolic ref has no target"));
            }
            return Ok(RefTarget::Symbolic(target.to_string()));
        }

        if content.len() != HEX_LEN {
            return Err(invalid(name, "neither an object ID nor a symbolic ref"));
        }

        Id::from_hex(content)
            .map(RefTarget::Direct)
            .map_err(|err| invalid(name, &err.to_string()))
    }
}

impl fmt::Display for RefTarget {
    /// Formats the value as it is written to a ref file.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RefTarget::Direct(id) => writeln!(f, "{}", id),
            RefTarget::Symbolic(name) => writeln!(f, "ref: {}", name),
        }
    }
}

/// Where `HEAD` currently points.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Head {
    /// `HEAD` names a branch. `id` is `None` while the branch is unborn
    /// (no commit has been made on it yet).
    Branch { name: String, id: Option<Id> },

    /// `HEAD` holds an object ID directly.
    Detached(Id),
}

fn invalid(name: &str, reason: &str) -> Error {
    Error::InvalidRef {
        name: name.to_string(),
        reason: reason.to_string(),
    }
}
