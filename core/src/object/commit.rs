use super::parse_utils::{attribution_is_valid, parse_id};
use super::{Attribution, Id, Kind, Kvlm, ParseObjectError};

/// A commit: a tree snapshot plus parents, attributions, and a message.
///
/// The header fields are kept as a [`Kvlm`] so that fields this crate
/// doesn't interpret (`gpgsig`, `encoding`, `mergetag`) survive a
/// parse/serialize cycle untouched.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Commit {
    kvlm: Kvlm,
}

impl Commit {
    /// Build a new commit. `message` is stored exactly as given.
    pub fn new(
        tree: &Id,
        parents: &[Id],
        author: &Attribution,
        committer: &Attribution,
        message: &[u8],
    ) -> Commit {
        let mut kvlm = Kvlm::new();
        kvlm.push("tree", tree.to_string());
        for parent in parents {
            kvlm.push("parent", parent.to_string());
        }
        kvlm.push("author", author.to_string());
        kvlm.push("committer", committer.to_string());
        kvlm.set_message(message);

        Commit { kvlm }
    }

    /// Parse a commit object body. Only the key-value structure is checked
    /// here; see [`Commit::check`] for git's content rules.
    pub fn parse(body: &[u8]) -> Result<Commit, ParseObjectError> {
        Ok(Commit {
            kvlm: Kvlm::parse(body)?,
        })
    }

    pub fn serialize(&self) -> Vec<u8> {
        self.kvlm.serialize()
    }

    pub fn kvlm(&self) -> &Kvlm {
        &self.kvlm
    }

    /// Returns the ID of the commit's root tree.
    pub fn tree(&self) -> Result<Id, ParseObjectError> {
        self.kvlm
            .get(b"tree")
            .and_then(parse_id)
            .ok_or_else(|| invalid("missing or malformed tree header"))
    }

    /// Returns the parent IDs in order. Headers that aren't valid IDs are skipped.
    pub fn parents(&self) -> Vec<Id> {
        self.kvlm.get_all(b"parent").filter_map(parse_id).collect()
    }

    pub fn author(&self) -> Option<Attribution> {
        self.kvlm.get(b"author").and_then(Attribution::parse)
    }

    pub fn committer(&self) -> Option<Attribution> {
        self.kvlm.get(b"committer").and_then(Attribution::parse)
    }

    pub fn message(&self) -> &[u8] {
        self.kvlm.message().unwrap_or_default()
    }

    /// Checks the header sequence git requires: `tree`, any number of
    /// `parent`, then `author` and `committer`. Anything after that is free.
    pub fn check(&self) -> Result<(), ParseObjectError> {
        let mut fields = self.kvlm.fields().peekable();

        match fields.next() {
            Some((key, value)) if key == b"tree" => {
                if parse_id(value).is_none() {
                    return Err(invalid("bad tree header"));
                }
            }
            _ => return Err(invalid("missing tree header")),
        }

        while let Some(&(key, value)) = fields.peek() {
            if key != b"parent" {
                break;
            }
            if parse_id(value).is_none() {
                return Err(invalid("bad parent header"));
            }
            fields.next();
        }

        for name in &["author", "committer"] {
            match fields.next() {
                Some((key, value)) if key == name.as_bytes() => {
                    if !attribution_is_valid(value) {
                        return Err(invalid(format!("bad {} header", name)));
                    }
                }
                _ => return Err(invalid(format!("missing {} header", name))),
            }
        }

        Ok(())
    }
}

fn invalid<S: Into<String>>(reason: S) -> ParseObjectError {
    ParseObjectError::invalid(Kind::Commit, reason)
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;
    use crate::object::hash;

    const ROOT_TREE: &str = "26deee68634959c0a7eda9552871bd7e189ef9f8";
    const FIRST_COMMIT: &str = "621d114ebf0df1d879a9ec0600dbad810585ef14";

    fn author() -> Attribution {
        Attribution::new("A U Thor", "author@example.com", 1112911993, -420)
    }

    fn committer() -> Attribution {
        Attribution::new("C O Mitter", "committer@example.com", 1112911993, -420)
    }

    fn id(hex: &str) -> Id {
        Id::from_str(hex).unwrap()
    }

    fn check(body: &str) -> Result<(), ParseObjectError> {
        Commit::parse(body.as_bytes()).and_then(|o| o.check())
    }

    #[test]
    fn new_matches_git() {
        let commit = Commit::new(
            &id(ROOT_TREE),
            &[],
            &author(),
            &committer(),
            b"first commit\n",
        );

        assert_eq!(
            hash(Kind::Commit, &commit.serialize()).to_string(),
            FIRST_COMMIT
        );
        assert!(commit.check().is_ok());
    }

    #[test]
    fn with_parent_matches_git() {
        let commit = Commit::new(
            &id("e6daec64b771712dd05791b2a0a544397c4d5ad5"),
            &[id(FIRST_COMMIT)],
            &author(),
            &committer(),
            b"second\n\npara\n",
        );

        assert_eq!(
            hash(Kind::Commit, &commit.serialize()).to_string(),
            "5fc8d7294fe9da2adfe179a52b35abc3fc46e7c2"
        );
    }

    #[test]
    fn accessors() {
        let body = format!(
            "tree {}\nparent {}\nparent {}\nauthor {}\ncommitter {}\n\nmerge\n",
            ROOT_TREE,
            FIRST_COMMIT,
            ROOT_TREE,
            author(),
            committer()
        );
        let commit = Commit::parse(body.as_bytes()).unwrap();

        assert_eq!(commit.tree().unwrap(), id(ROOT_TREE));
        assert_eq!(commit.parents(), vec![id(FIRST_COMMIT), id(ROOT_TREE)]);
        assert_eq!(commit.author().unwrap(), author());
        assert_eq!(commit.committer().unwrap().name(), "C O Mitter");
        assert_eq!(commit.message(), b"merge\n");
        assert_eq!(commit.serialize(), body.as_bytes());
    }

    #[test]
    fn extra_headers_survive() {
        let body = format!(
            "tree {}\nauthor {}\ncommitter {}\nencoding ISO-8859-1\ngpgsig -----BEGIN-----\n abc\n -----END-----\n\nmsg",
            ROOT_TREE,
            author(),
            committer()
        );
        let commit = Commit::parse(body.as_bytes()).unwrap();
        assert!(commit.check().is_ok());
        assert_eq!(commit.serialize(), body.as_bytes());
    }

    #[test]
    fn valid_blank_author() {
        assert!(check(
            "tree be9bfa841874ccc9f2ef7c48d0c76226f89b7189\n\
             author <> 0 +0000\n\
             committer <> 0 +0000\n"
        )
        .is_ok());
    }

    #[test]
    fn invalid_corrupt_attribution() {
        assert!(check(
            "tree be9bfa841874ccc9f2ef7c48d0c76226f89b7189\n\
             author <> 0 +0000\n\
             committer b <b@c> <b@c> 0 +0000\n"
        )
        .is_err());
    }

    #[test]
    fn invalid_tree() {
        assert!(check(
            "tree be9bfa841874ccc9f2ef7c48d0c76226f89b718\n\
             author <> 0 +0000\n\
             committer <> 0 +0000\n"
        )
        .is_err());

        assert!(check(
            "trie be9bfa841874ccc9f2ef7c48d0c76226f89b7189\n\
             author <> 0 +0000\n\
             committer <> 0 +0000\n"
        )
        .is_err());

        let commit = Commit::parse(b"author <> 0 +0000\ncommitter <> 0 +0000\n").unwrap();
        assert!(commit.tree().is_err());
    }

    #[test]
    fn invalid_parent() {
        assert!(check(
            "tree be9bfa841874ccc9f2ef7c48d0c76226f89b7189\n\
             parent be9bfa841874ccc9f2ef7c48d0c76226f89b71\n\
             author <> 0 +0000\n\
             committer <> 0 +0000\n"
        )
        .is_err());
    }

    #[test]
    fn invalid_header_order() {
        assert!(check(
            "tree be9bfa841874ccc9f2ef7c48d0c76226f89b7189\n\
             committer <> 0 +0000\n\
             author <> 0 +0000\n"
        )
        .is_err());

        let err = check("tree be9bfa841874ccc9f2ef7c48d0c76226f89b7189\nauthor <> 0 +0000\n")
            .unwrap_err();
        assert_eq!(err.to_string(), "invalid commit: missing committer header");
    }
}
