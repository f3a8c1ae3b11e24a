//! Materialize a tree into a directory.

use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::Path;

use gitling_core::object::{Id, Kind, Object, Tree};
use gitling_core::path::{FileMode, PathSegment};
use gitling_core::repo::{Error, Repo, Result};
use tracing::debug;

use crate::os_path;

/// Write the tree that `id` peels to (a tree, a commit, or a tag of
/// either) into `dest`.
///
/// `dest` must be an empty directory or not exist yet; anything already
/// there is never overwritten. Subtrees become directories (empty ones
/// included), `100755` blobs become executable files and `120000` blobs
/// become symbolic links. Gitlinks become empty directories.
///
/// Analogous to the `checkout <commit> <path>` command of small
/// educational git clones rather than to `git checkout`, which updates
/// the current working tree.
pub fn checkout<R: Repo + ?Sized>(repo: &R, id: &Id, dest: &Path) -> Result<()> {
    let tree_id = repo.peel(id, Kind::Tree)?;
    let tree = read_tree(repo, &tree_id)?;

    if dest.exists() {
        if !dest.is_dir() {
            return Err(Error::NotADirectory(dest.to_path_buf()));
        }
        if fs::read_dir(dest)?.next().is_some() {
            return Err(Error::DestinationNotEmpty(dest.to_path_buf()));
        }
    } else {
        fs::create_dir_all(dest)?;
    }

    debug!(tree = %tree_id, dest = %dest.display(), "checking out");
    write_tree(repo, &tree_id, &tree, dest)
}

/// Read `id`, which must be a tree.
pub fn read_tree<R: Repo + ?Sized>(repo: &R, id: &Id) -> Result<Tree> {
    match repo.read_object(id)? {
        Object::Tree(tree) => Ok(tree),
        other => Err(Error::WrongKind {
            id: *id,
            actual: other.kind(),
            wanted: Kind::Tree,
        }),
    }
}

fn read_blob<R: Repo + ?Sized>(repo: &R, id: &Id) -> Result<Vec<u8>> {
    match repo.get_raw_object(id)? {
        (Kind::Blob, body) => Ok(body),
        (actual, _) => Err(Error::WrongKind {
            id: *id,
            actual,
            wanted: Kind::Blob,
        }),
    }
}

fn write_tree<R: Repo + ?Sized>(
    repo: &R,
    tree_id: &Id,
    tree: &Tree,
    dir: &Path,
) -> Result<()> {
    for entry in tree.entries() {
        if PathSegment::new(entry.name()).is_err() {
            return Err(Error::UnsafePath(
                String::from_utf8_lossy(entry.name()).into_owned(),
            ));
        }
    }

    tree.check().map_err(|err| Error::CorruptObject {
        id: *tree_id,
        reason: err.to_string(),
    })?;

    for entry in tree.entries() {
        let path = dir.join(os_path::from_bytes(entry.name()));
        debug!(path = %path.display(), mode = %entry.mode(), id = %entry.id(), "materializing");

        match entry.mode() {
            FileMode::Tree => {
                fs::create_dir(&path)?;
                let subtree = read_tree(repo, entry.id())?;
                write_tree(repo, entry.id(), &subtree, &path)?;
            }
            FileMode::Normal => {
                write_file(&path, &read_blob(repo, entry.id())?, false)?;
            }
            FileMode::Executable => {
                write_file(&path, &read_blob(repo, entry.id())?, true)?;
            }
            FileMode::SymbolicLink => {
                let target = read_blob(repo, entry.id())?;
                write_symlink(&target, &path)?;
            }
            FileMode::Submodule => {
                fs::create_dir(&path)?;
            }
        }
    }

    Ok(())
}

// Never opens an existing path, so a symlink left by an earlier entry
// can't redirect the write. The umask applies to the mode, as with git.
fn write_file(path: &Path, content: &[u8], executable: bool) -> io::Result<()> {
    let mut options = OpenOptions::new();
    options.write(true).create_new(true);
    set_mode(&mut options, executable);
    options.open(path)?.write_all(content)
}

#[cfg(unix)]
fn set_mode(options: &mut OpenOptions, executable: bool) {
    use std::os::unix::fs::OpenOptionsExt;
    options.mode(if executable { 0o777 } else { 0o666 });
}

#[cfg(not(unix))]
fn set_mode(_options: &mut OpenOptions, _executable: bool) {}

#[cfg(unix)]
fn write_symlink(target: &[u8], path: &Path) -> io::Result<()> {
    std::os::unix::fs::symlink(os_path::from_bytes(target), path)
}

#[cfg(not(unix))]
fn write_symlink(target: &[u8], path: &Path) -> io::Result<()> {
    write_file(path, target, false)
}
