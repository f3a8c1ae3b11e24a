use std::cmp::Ordering;

use super::{Id, Kind, ParseObjectError};
use crate::path::{FileMode, PathMode, PathSegment};

/// One entry in a tree: a mode, a single path component, and the ID of
/// the blob, tree, or commit (for submodules) it names.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TreeEntry {
    mode: FileMode,
    name: Vec<u8>,
    id: Id,
}

impl TreeEntry {
    pub fn new<N: Into<Vec<u8>>>(mode: FileMode, name: N, id: Id) -> TreeEntry {
        TreeEntry {
            mode,
            name: name.into(),
            id,
        }
    }

    pub fn mode(&self) -> FileMode {
        self.mode
    }

    pub fn name(&self) -> &[u8] {
        &self.name
    }

    pub fn id(&self) -> &Id {
        &self.id
    }

    fn path_mode(&self) -> PathMode {
        PathMode {
            path: &self.name,
            mode: self.mode,
        }
    }
}

/// A directory listing.
///
/// Entry order is load-bearing: the object ID covers the serialized bytes,
/// so the same logical entries must always serialize in git's canonical
/// order. [`Tree::new`] sorts; [`Tree::parse`] keeps whatever order the
/// bytes had so that re-serializing reproduces them exactly.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Tree {
    entries: Vec<TreeEntry>,
}

impl Tree {
    /// Build a tree from entries given in any order.
    pub fn new(mut entries: Vec<TreeEntry>) -> Tree {
        entries.sort_by(|a, b| a.path_mode().cmp(&b.path_mode()));
        Tree { entries }
    }

    /// Parse a tree object body.
    ///
    /// Each entry is `<octal mode> <name>\0<20 raw ID bytes>`.
    pub fn parse(body: &[u8]) -> Result<Tree, ParseObjectError> {
        let mut entries = Vec::new();
        let mut pos = 0;

        while pos < body.len() {
            let space = match body[pos..].iter().position(|&b| b == b' ') {
                Some(n) => pos + n,
                None => return Err(malformed(pos, "entry has no mode")),
            };

            let mode = match FileMode::from_octal_slice(&body[pos..space]) {
                Some(mode) => mode,
                None => return Err(malformed(pos, "unrecognized mode")),
            };

            let nul = match body[space + 1..].iter().position(|&b| b == 0) {
                Some(n) => space + 1 + n,
                None => return Err(malformed(pos, "entry name is not terminated")),
            };

            let id_end = nul + 1 + 20;
            if id_end > body.len() {
                return Err(malformed(pos, "truncated object ID"));
            }

            let id = Id::new(&body[nul + 1..id_end])
                .map_err(|err| malformed(pos, &err.to_string()))?;

            entries.push(TreeEntry::new(mode, &body[space + 1..nul], id));
            pos = id_end;
        }

        Ok(Tree { entries })
    }

    /// Serialize to the tree object body format, in stored entry order.
    pub fn serialize(&self) -> Vec<u8> {
        let mut out = Vec::new();

        for entry in &self.entries {
            out.extend_from_slice(entry.mode.as_tree_bytes());
            out.push(b' ');
            out.extend_from_slice(&entry.name);
            out.push(0);
            out.extend_from_slice(entry.id.as_bytes());
        }

        out
    }

    pub fn entries(&self) -> &[TreeEntry] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Look up an entry by name.
    pub fn get(&self, name: &[u8]) -> Option<&TreeEntry> {
        self.entries.iter().find(|e| e.name == name)
    }

    /// Checks the rules git enforces before accepting a tree: valid entry
    /// names, no null IDs, strictly canonical order, and no name used twice
    /// (including a file and a subtree sharing a name).
    pub fn check(&self) -> Result<(), ParseObjectError> {
        // Names of earlier entries that could still collide with a later
        // subtree of the same name. "a" (file), "a.b", "a" (tree) is sorted
        // but has a duplicate two entries apart.
        let mut lingering: Vec<&[u8]> = Vec::new();

        for (i, entry) in self.entries.iter().enumerate() {
            let name = String::from_utf8_lossy(&entry.name);

            if let Err(err) = PathSegment::new(&entry.name) {
                return Err(invalid(format!("entry `{}`: {}", name, err)));
            }

            if entry.id.is_null() {
                return Err(invalid(format!("entry `{}` has a null object ID", name)));
            }

            if i == 0 {
                continue;
            }

            let previous = &self.entries[i - 1];
            let this_pm = entry.path_mode();
            let previous_pm = previous.path_mode();

            if previous.name == entry.name {
                return Err(invalid(format!("duplicate entry `{}`", name)));
            }

            if this_pm.cmp(&previous_pm) != Ordering::Greater {
                return Err(invalid(format!("entry `{}` is out of order", name)));
            }

            let mut duplicate = false;
            lingering.retain(|earlier| {
                let earlier_pm = PathMode {
                    path: earlier,
                    mode: FileMode::Tree,
                };
                match earlier_pm.cmp_same_name(&this_pm) {
                    Ordering::Less => false,
                    Ordering::Equal => {
                        duplicate = true;
                        true
                    }
                    Ordering::Greater => true,
                }
            });

            if duplicate {
                return Err(invalid(format!("duplicate entry `{}`", name)));
            }

            if previous_pm.cmp_same_name(&this_pm) == Ordering::Greater {
                lingering.push(&previous.name);
            }
        }

        Ok(())
    }
}

fn malformed(offset: usize, reason: &str) -> ParseObjectError {
    ParseObjectError::MalformedTree(format!("{} at byte {}", reason, offset))
}

fn invalid(reason: String) -> ParseObjectError {
    ParseObjectError::invalid(Kind::Tree, reason)
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;
    use crate::object::{hash, Kind};

    fn id(hex: &str) -> Id {
        Id::from_str(hex).unwrap()
    }

    const ALPHA: &str = "02105bc3775da91d10a72a6da2f08beebd42eb25";
    const HAMZA: &str = "c5d3d366e87ccb711107c7b1878f4adcc497d9c6";
    const HELLO_WORLD: &str = "5e1c309dae7f45e0f39b1bf3ac3cd9db12e7d689";
    const LETTERS_TREE: &str = "089323d50fa4d189d44d450227c920021f34d88a";

    fn letters() -> Tree {
        Tree::new(vec![
            TreeEntry::new(FileMode::Normal, "greek_letters", id(ALPHA)),
            TreeEntry::new(FileMode::Normal, "arabic_letters", id(HAMZA)),
        ])
    }

    #[test]
    fn empty_tree_hash() {
        let tree = Tree::new(vec![]);
        assert!(tree.is_empty());
        assert_eq!(
            hash(Kind::Tree, &tree.serialize()).to_string(),
            "4b825dc642cb6eb9a060e54bf8d69288fbee4904"
        );
    }

    #[test]
    fn new_sorts_and_matches_git() {
        let tree = letters();
        assert_eq!(tree.entries()[0].name(), b"arabic_letters");
        assert_eq!(
            hash(Kind::Tree, &tree.serialize()).to_string(),
            LETTERS_TREE
        );
    }

    #[test]
    fn directory_and_file() {
        let tree = Tree::new(vec![
            TreeEntry::new(FileMode::Normal, "b", id(HELLO_WORLD)),
            TreeEntry::new(FileMode::Tree, "a", id(LETTERS_TREE)),
        ]);

        assert_eq!(tree.entries()[0].name(), b"a");
        assert_eq!(tree.entries()[1].name(), b"b");
        assert_eq!(
            hash(Kind::Tree, &tree.serialize()).to_string(),
            "e6daec64b771712dd05791b2a0a544397c4d5ad5"
        );
    }

    #[test]
    fn directory_sorts_as_if_slash_suffixed() {
        let tree = Tree::new(vec![
            TreeEntry::new(FileMode::Normal, "a0", id(HELLO_WORLD)),
            TreeEntry::new(FileMode::Tree, "a", id(LETTERS_TREE)),
            TreeEntry::new(FileMode::Normal, "a.txt", id(HELLO_WORLD)),
        ]);

        let names: Vec<&[u8]> = tree.entries().iter().map(|e| e.name()).collect();
        assert_eq!(names, vec![&b"a.txt"[..], &b"a"[..], &b"a0"[..]]);
        assert_eq!(
            hash(Kind::Tree, &tree.serialize()).to_string(),
            "ec78aa150ccfe57da774f98a15eb3a8c1da8cbe4"
        );
        assert!(tree.check().is_ok());
    }

    #[test]
    fn parse_round_trip() {
        let body = letters().serialize();
        let tree = Tree::parse(&body).unwrap();

        assert_eq!(tree.entries().len(), 2);
        assert_eq!(tree.entries()[1].mode(), FileMode::Normal);
        assert_eq!(tree.entries()[1].name(), b"greek_letters");
        assert_eq!(tree.entries()[1].id(), &id(ALPHA));
        assert_eq!(tree.serialize(), body);
        assert_eq!(tree.get(b"greek_letters").unwrap().id(), &id(ALPHA));
        assert!(tree.get(b"latin_letters").is_none());
    }

    #[test]
    fn parse_keeps_unsorted_order() {
        let mut body = Vec::new();
        body.extend_from_slice(b"100644 z\0");
        body.extend_from_slice(id(ALPHA).as_bytes());
        body.extend_from_slice(b"100644 a\0");
        body.extend_from_slice(id(HAMZA).as_bytes());

        let tree = Tree::parse(&body).unwrap();
        assert_eq!(tree.entries()[0].name(), b"z");
        assert_eq!(tree.serialize(), body);
        assert!(tree.check().is_err());
    }

    #[test]
    fn parse_names_with_spaces() {
        let mut body = Vec::new();
        body.extend_from_slice(b"100755 run me\0");
        body.extend_from_slice(id(ALPHA).as_bytes());

        let tree = Tree::parse(&body).unwrap();
        assert_eq!(tree.entries()[0].name(), b"run me");
        assert_eq!(tree.entries()[0].mode(), FileMode::Executable);
    }

    #[test]
    fn parse_errors() {
        let mut truncated = b"100644 a\0".to_vec();
        truncated.extend_from_slice(&[1, 2, 3]);
        assert!(matches!(
            Tree::parse(&truncated).unwrap_err(),
            ParseObjectError::MalformedTree(_)
        ));

        assert!(matches!(
            Tree::parse(b"100644 a").unwrap_err(),
            ParseObjectError::MalformedTree(_)
        ));

        assert!(matches!(
            Tree::parse(b"100644").unwrap_err(),
            ParseObjectError::MalformedTree(_)
        ));

        let mut padded = b"040000 a\0".to_vec();
        padded.extend_from_slice(id(ALPHA).as_bytes());
        assert!(matches!(
            Tree::parse(&padded).unwrap_err(),
            ParseObjectError::MalformedTree(_)
        ));
    }

    fn unsorted(entries: Vec<TreeEntry>) -> Tree {
        Tree { entries }
    }

    #[test]
    fn check_rejects_duplicates() {
        let tree = unsorted(vec![
            TreeEntry::new(FileMode::Normal, "a", id(ALPHA)),
            TreeEntry::new(FileMode::Normal, "a", id(HAMZA)),
        ]);
        assert!(tree.check().is_err());

        let tree = unsorted(vec![
            TreeEntry::new(FileMode::Normal, "a", id(ALPHA)),
            TreeEntry::new(FileMode::Normal, "a.b", id(ALPHA)),
            TreeEntry::new(FileMode::Tree, "a", id(LETTERS_TREE)),
        ]);
        let err = tree.check().unwrap_err();
        assert_eq!(err.to_string(), "invalid tree: duplicate entry `a`");
    }

    #[test]
    fn check_rejects_bad_names_and_null_ids() {
        let tree = unsorted(vec![TreeEntry::new(FileMode::Normal, ".git", id(ALPHA))]);
        assert!(tree.check().is_err());

        let tree = unsorted(vec![TreeEntry::new(FileMode::Normal, "..", id(ALPHA))]);
        assert!(tree.check().is_err());

        let null = Id::new(&[0u8; 20]).unwrap();
        let tree = unsorted(vec![TreeEntry::new(FileMode::Normal, "a", null)]);
        assert!(tree.check().is_err());
    }

    #[test]
    fn check_accepts_git_trees() {
        assert!(letters().check().is_ok());
        assert!(Tree::new(vec![]).check().is_ok());
    }
}
