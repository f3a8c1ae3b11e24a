//! Represents an abstract git repository.
//!
//! ## Design Goals
//!
//! Repositories may be stored in multiple different mechanisms. The
//! `gitling_on_disk` crate provides the traditional `.git` directory;
//! [`MemRepo`] keeps everything in memory. You could envision repositories
//! stored on a remote file system or database as well.

use tracing::{debug, warn};

use crate::object::{Attribution, Commit, Id, Kind, Object, Tag};
use crate::path::check_ref_name;

mod error;
pub use error::{Error, Result};

mod mem_repo;
pub use mem_repo::MemRepo;

mod refs;
pub use refs::{Head, RefTarget};

mod resolve;
pub use resolve::{MAX_SYMREF_HOPS, MIN_PREFIX_LEN};

/// A struct that implements the `Repo` trait represents a particular mechanism
/// for storing and accessing a git repo.
///
/// The required methods on this trait represent the most primitive operations
/// which must be defined for a given storage architecture. Consider the
/// information stored in a typical `.git` directory in a local repository. You will
/// be building an alternative to that storage mechanism.
///
/// The provided methods on this trait represent the common "porcelain" and "plumbing"
/// operations for a git repo, regardless of its storage mechanism.
pub trait Repo {
    /// Store an object body of the given kind and return its ID.
    ///
    /// If the object already exists, nothing is written.
    fn put_object(&self, kind: Kind, body: &[u8]) -> Result<Id>;

    /// Fetch the kind and body of a stored object.
    ///
    /// Fails with `ObjectNotFound` if the object isn't present and with
    /// `CorruptObject` if its stored form can't be decoded.
    fn get_raw_object(&self, id: &Id) -> Result<(Kind, Vec<u8>)>;

    /// Returns true if an object with this ID is stored.
    fn has_object(&self, id: &Id) -> Result<bool>;

    /// Returns every stored object ID whose hex form starts with `prefix`,
    /// in ascending order. `prefix` is lower-case hex.
    fn find_objects_with_prefix(&self, prefix: &str) -> Result<Vec<Id>>;

    /// Read the ref with the full name `name` (e.g. `HEAD`, `refs/heads/master`).
    /// Returns `None` if no such ref exists.
    fn read_ref(&self, name: &str) -> Result<Option<RefTarget>>;

    /// Create or replace the ref `name`.
    ///
    /// A reader must only ever observe the old or the new value.
    fn write_ref(&self, name: &str, target: &RefTarget) -> Result<()>;

    /// Returns the full names of all refs whose name starts with `prefix`
    /// (e.g. `refs/tags/`), in any order.
    fn ref_names(&self, prefix: &str) -> Result<Vec<String>>;

    /// Read and parse an object.
    fn read_object(&self, id: &Id) -> Result<Object> {
        let (kind, body) = self.get_raw_object(id)?;
        Object::parse(kind, &body).map_err(|err| Error::from_parse(id, err))
    }

    /// Serialize and store an object.
    fn write_object(&self, object: &Object) -> Result<Id> {
        self.put_object(object.kind(), &object.serialize())
    }

    /// Returns the kind of a stored object.
    fn object_kind(&self, id: &Id) -> Result<Kind> {
        Ok(self.get_raw_object(id)?.0)
    }

    /// Follow the ref `name` through any symbolic refs to an object ID.
    ///
    /// Returns `None` if the ref (or the end of its symbolic chain) doesn't
    /// exist. A chain longer than [`MAX_SYMREF_HOPS`] is an error.
    fn resolve_ref(&self, name: &str) -> Result<Option<Id>> {
        resolve::resolve_ref(self, name)
    }

    /// Resolve a user-supplied name to an object ID.
    ///
    /// Tried in order: `HEAD`, a full object ID, an unambiguous ID prefix
    /// of at least [`MIN_PREFIX_LEN`] digits, `refs/tags/<name>`,
    /// `refs/heads/<name>`, `refs/<name>`, and finally `<name>` itself if it
    /// starts with `refs/`.
    fn resolve(&self, name: &str) -> Result<Id> {
        resolve::resolve(self, name)
    }

    /// Like [`Repo::resolve`], but also accepts the `<rev>^{<kind>}` and
    /// `<rev>^{}` peeling suffixes understood by `git rev-parse`.
    fn rev_parse(&self, spec: &str) -> Result<Id> {
        resolve::rev_parse(self, spec)
    }

    /// Dereference `id` until an object of kind `wanted` is reached.
    ///
    /// Tags are followed through their `object` header; a commit yields its
    /// tree when a tree is wanted. Anything else is `WrongKind`.
    fn peel(&self, id: &Id, wanted: Kind) -> Result<Id> {
        resolve::peel(self, id, wanted)
    }

    /// Follow tags until a non-tag object is reached.
    fn peel_tags(&self, id: &Id) -> Result<(Id, Kind)> {
        resolve::peel_tags(self, id)
    }

    /// Describe where `HEAD` points.
    fn head(&self) -> Result<Head> {
        match self.read_ref("HEAD")? {
            Some(RefTarget::Direct(id)) => Ok(Head::Detached(id)),
            Some(RefTarget::Symbolic(target)) => {
                let id = self.resolve_ref(&target)?;
                let name = target
                    .strip_prefix("refs/heads/")
                    .unwrap_or(&target)
                    .to_string();
                Ok(Head::Branch { name, id })
            }
            None => Err(Error::InvalidRef {
                name: "HEAD".to_string(),
                reason: "missing".to_string(),
            }),
        }
    }

    /// List the refs under `namespace` (e.g. `refs/heads/`) as
    /// `(short name, id)` pairs sorted by name.
    ///
    /// Symbolic refs are followed; ones that lead nowhere are left out
    /// with a warning, as git does.
    fn list_refs(&self, namespace: &str) -> Result<Vec<(String, Id)>> {
        let mut names = self.ref_names(namespace)?;
        names.sort();

        let mut refs = Vec::with_capacity(names.len());
        for name in names {
            match self.resolve_ref(&name)? {
                Some(id) => {
                    let short = name.strip_prefix(namespace).unwrap_or(&name).to_string();
                    refs.push((short, id));
                }
                None => warn!(ref_name = %name, "ignoring broken ref"),
            }
        }

        Ok(refs)
    }

    /// Create `refs/heads/<name>` pointing at the commit `start_point`
    /// resolves to (`HEAD` if `None`). Never moves an existing branch.
    ///
    /// Analogous to [`git branch`](https://git-scm.com/docs/git-branch).
    fn create_branch(&self, name: &str, start_point: Option<&str>) -> Result<Id> {
        let ref_name = format!("refs/heads/{}", name);
        check_new_ref(self, &ref_name, name)?;

        let start = self.rev_parse(start_point.unwrap_or("HEAD"))?;
        let commit = self.peel(&start, Kind::Commit)?;

        self.write_ref(&ref_name, &RefTarget::Direct(commit))?;
        debug!(branch = name, commit = %commit, "created branch");
        Ok(commit)
    }

    /// Create `refs/tags/<name>` pointing straight at `target` (`HEAD` if
    /// `None`). No object is written.
    fn create_lightweight_tag(&self, name: &str, target: Option<&str>) -> Result<Id> {
        let ref_name = format!("refs/tags/{}", name);
        check_new_ref(self, &ref_name, name)?;

        let id = self.rev_parse(target.unwrap_or("HEAD"))?;
        self.write_ref(&ref_name, &RefTarget::Direct(id))?;
        debug!(tag = name, object = %id, "created lightweight tag");
        Ok(id)
    }

    /// Write a tag object for `target` (`HEAD` if `None`) and point
    /// `refs/tags/<name>` at the tag object. Returns the tag object's ID.
    ///
    /// `message` is stored as given.
    fn create_annotated_tag(
        &self,
        name: &str,
        target: Option<&str>,
        tagger: &Attribution,
        message: &[u8],
    ) -> Result<Id> {
        let ref_name = format!("refs/tags/{}", name);
        check_new_ref(self, &ref_name, name)?;

        let object = self.rev_parse(target.unwrap_or("HEAD"))?;
        let kind = self.object_kind(&object)?;

        let tag = Tag::new(&object, kind, name, Some(tagger), message);
        let id = self.write_object(&Object::Tag(tag))?;

        self.write_ref(&ref_name, &RefTarget::Direct(id))?;
        debug!(tag = name, object = %object, tag_object = %id, "created annotated tag");
        Ok(id)
    }

    /// Write a commit object. The tree and every parent must already be
    /// stored with the right kind.
    ///
    /// Analogous to [`git commit-tree`](https://git-scm.com/docs/git-commit-tree).
    fn commit_tree(
        &self,
        tree: &Id,
        parents: &[Id],
        author: &Attribution,
        committer: &Attribution,
        message: &[u8],
    ) -> Result<Id> {
        expect_kind(self, tree, Kind::Tree)?;
        for parent in parents {
            expect_kind(self, parent, Kind::Commit)?;
        }

        let commit = Commit::new(tree, parents, author, committer, message);
        self.write_object(&Object::Commit(commit))
    }
}

fn check_new_ref<R: Repo + ?Sized>(repo: &R, ref_name: &str, short_name: &str) -> Result<()> {
    check_ref_name(ref_name).map_err(|reason| Error::InvalidRefName {
        name: short_name.to_string(),
        reason,
    })?;

    if repo.read_ref(ref_name)?.is_some() {
        Err(Error::RefAlreadyExists(short_name.to_string()))
    } else {
        Ok(())
    }
}

fn expect_kind<R: Repo + ?Sized>(repo: &R, id: &Id, wanted: Kind) -> Result<()> {
    let actual = repo.object_kind(id)?;
    if actual == wanted {
        Ok(())
    } else {
        Err(Error::WrongKind {
            id: *id,
            actual,
            wanted,
        })
    }
}
