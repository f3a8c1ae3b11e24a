//! Compare the working tree against the tree of the `HEAD` commit.
//!
//! There is no index: the `HEAD` tree stands in for the staged state, so a
//! freshly committed working tree is clean and everything else is either
//! modified, deleted, or untracked.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use gitling_core::object::{self, Id, Kind};
use gitling_core::path::FileMode;
use gitling_core::repo::{Head, Repo, Result};
use tracing::debug;

use crate::checkout::read_tree;
use crate::os_path;
use crate::OnDisk;

/// How a tracked path differs from `HEAD`.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Change {
    Modified,
    Deleted,
}

/// The result of [`status`].
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Status {
    pub head: Head,

    /// Tracked paths that differ from `HEAD`, sorted by path.
    pub changes: Vec<(Vec<u8>, Change)>,

    /// Paths not in `HEAD`, sorted. A directory holding no tracked files
    /// is reported once, with a trailing `/`.
    pub untracked: Vec<Vec<u8>>,
}

impl Status {
    /// True if nothing differs from `HEAD`.
    pub fn is_clean(&self) -> bool {
        self.changes.is_empty() && self.untracked.is_empty()
    }
}

/// Scan the working tree of `repo`.
///
/// Analogous to [`git status`](https://git-scm.com/docs/git-status).
pub fn status(repo: &OnDisk) -> Result<Status> {
    let head = repo.head()?;

    let head_commit = match &head {
        Head::Branch { id, .. } => *id,
        Head::Detached(id) => Some(*id),
    };

    let mut tracked = BTreeMap::new();
    if let Some(commit) = head_commit {
        let tree = repo.peel(&commit, Kind::Tree)?;
        flatten(repo, &tree, b"", &mut tracked)?;
    }

    let filemode = repo.config().get_bool("core.filemode").unwrap_or(true);

    let mut changes = Vec::new();
    for (path, (mode, id)) in &tracked {
        if let Some(change) = compare(repo.work_dir(), path, *mode, id, filemode)? {
            changes.push((path.clone(), change));
        }
    }

    let mut untracked = Vec::new();
    scan_untracked(repo.work_dir(), b"", &tracked, &mut untracked)?;
    untracked.sort();

    debug!(
        tracked = tracked.len(),
        changed = changes.len(),
        untracked = untracked.len(),
        "scanned working tree"
    );

    Ok(Status {
        head,
        changes,
        untracked,
    })
}

type Tracked = BTreeMap<Vec<u8>, (FileMode, Id)>;

fn flatten<R: Repo + ?Sized>(repo: &R, tree: &Id, prefix: &[u8], out: &mut Tracked) -> Result<()> {
    for entry in read_tree(repo, tree)?.entries() {
        let mut path = prefix.to_vec();
        path.extend_from_slice(entry.name());

        if entry.mode() == FileMode::Tree {
            path.push(b'/');
            flatten(repo, entry.id(), &path, out)?;
        } else {
            out.insert(path, (entry.mode(), *entry.id()));
        }
    }

    Ok(())
}

fn compare(
    work_dir: &Path,
    path: &[u8],
    mode: FileMode,
    id: &Id,
    filemode: bool,
) -> Result<Option<Change>> {
    let full = work_dir.join(os_path::from_bytes(path));

    let meta = match fs::symlink_metadata(&full) {
        Ok(meta) => meta,
        Err(_) => return Ok(Some(Change::Deleted)),
    };

    let file_type = meta.file_type();
    let unchanged = match mode {
        FileMode::Submodule => file_type.is_dir(),
        FileMode::SymbolicLink if file_type.is_symlink() => {
            let target = fs::read_link(&full)?;
            object::hash(Kind::Blob, &os_path::to_bytes(target.as_os_str())) == *id
        }
        FileMode::Normal | FileMode::Executable if file_type.is_file() => {
            let exec_matches = !filemode || is_executable(&meta) == (mode == FileMode::Executable);
            exec_matches && object::hash(Kind::Blob, &fs::read(&full)?) == *id
        }
        _ if file_type.is_dir() => return Ok(Some(Change::Deleted)),
        _ => false,
    };

    Ok(if unchanged {
        None
    } else {
        Some(Change::Modified)
    })
}

/// Collect untracked paths under `dir`. Returns true if `dir` contains any
/// file at all, so empty directories stay invisible the way they do in git.
fn scan_untracked(
    work_dir: &Path,
    dir: &[u8],
    tracked: &Tracked,
    out: &mut Vec<Vec<u8>>,
) -> Result<bool> {
    let mut found_file = false;

    for entry in fs::read_dir(work_dir.join(os_path::from_bytes(dir)))? {
        let entry = entry?;
        let name = os_path::to_bytes(&entry.file_name());
        if dir.is_empty() && name == b".git" {
            continue;
        }

        let mut path = dir.to_vec();
        path.extend_from_slice(&name);

        if entry.file_type()?.is_dir() {
            if let Some((FileMode::Submodule, _)) = tracked.get(&path) {
                found_file = true;
                continue;
            }

            path.push(b'/');
            if has_tracked_under(tracked, &path) {
                found_file |= scan_untracked(work_dir, &path, tracked, out)?;
            } else {
                let mut inner = Vec::new();
                if scan_untracked(work_dir, &path, tracked, &mut inner)? {
                    out.push(path);
                    found_file = true;
                }
            }
        } else {
            found_file = true;
            if !tracked.contains_key(&path) {
                out.push(path);
            }
        }
    }

    Ok(found_file)
}

fn has_tracked_under(tracked: &Tracked, dir: &[u8]) -> bool {
    tracked
        .range(dir.to_vec()..)
        .next()
        .map_or(false, |(path, _)| path.starts_with(dir))
}

#[cfg(unix)]
fn is_executable(meta: &fs::Metadata) -> bool {
    use std::os::unix::fs::PermissionsExt;
    meta.permissions().mode() & 0o100 != 0
}

#[cfg(not(unix))]
fn is_executable(_meta: &fs::Metadata) -> bool {
    false
}
