use std::fmt::{self, Display, Formatter};

use crate::object::Kind;

/// Describes the file type as represented on disk.
///
/// Git uses a variation on the Unix file permissions flags to denote a file's
/// intended type on disk. The following values are recognized:
///
/// * `0o100644` - normal file
/// * `0o100755` - executable file
/// * `0o120000` - symbolic link
/// * `0o040000` - tree (subdirectory)
/// * `0o160000` - submodule (aka gitlink)
#[derive(Copy, Clone, Debug, Eq, Hash, PartialEq)]
pub enum FileMode {
    Normal,
    Executable,
    SymbolicLink,
    Tree,
    Submodule,
}

impl FileMode {
    /// Convert from git file-mode integer to `FileMode` enum.
    ///
    /// Returns `None` if the value is not one of the recognized constants.
    pub fn from_value(value: u32) -> Option<FileMode> {
        match value {
            0o100644 => Some(FileMode::Normal),
            0o100755 => Some(FileMode::Executable),
            0o120000 => Some(FileMode::SymbolicLink),
            0o040000 => Some(FileMode::Tree),
            0o160000 => Some(FileMode::Submodule),
            _ => None,
        }
    }

    /// Convert from `FileMode` enum to git file-mode integer.
    pub fn to_value(self) -> u32 {
        match self {
            FileMode::Normal => 0o100644,
            FileMode::Executable => 0o100755,
            FileMode::SymbolicLink => 0o120000,
            FileMode::Tree => 0o040000,
            FileMode::Submodule => 0o160000,
        }
    }

    /// Parse the octal text used in a tree entry.
    ///
    /// Git never writes a leading zero (trees are `40000`), so a zero-padded
    /// mode is rejected: accepting it would make re-serialization lossy.
    pub fn from_octal_slice(s: &[u8]) -> Option<FileMode> {
        if s.is_empty() || s[0] == b'0' || s.len() > 6 {
            return None;
        }

        let mut value = 0u32;
        for c in s {
            match c {
                b'0'..=b'7' => value = value * 8 + (c - b'0') as u32,
                _ => return None,
            }
        }

        FileMode::from_value(value)
    }

    /// The mode text as written inside tree objects.
    pub fn as_tree_bytes(self) -> &'static [u8] {
        match self {
            FileMode::Normal => b"100644",
            FileMode::Executable => b"100755",
            FileMode::SymbolicLink => b"120000",
            FileMode::Tree => b"40000",
            FileMode::Submodule => b"160000",
        }
    }

    /// The kind of object an entry with this mode points to.
    pub fn kind(self) -> Kind {
        match self {
            FileMode::Tree => Kind::Tree,
            FileMode::Submodule => Kind::Commit,
            _ => Kind::Blob,
        }
    }
}

/// Six-digit form used by `ls-tree` (`040000` for trees).
impl Display for FileMode {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "{:06o}", self.to_value())
    }
}
