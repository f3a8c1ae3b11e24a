//! A repository that stores content on the local file system.
//!
//! **IMPORTANT NOTE:** This is intended as a reference implementation largely
//! for testing purposes and may not necessarily handle all of the edge cases that
//! the traditional `git` command-line interface will handle.
//!
//! That said, it does intentionally use the same `.git` folder format as
//! command-line git so that results may be compared for similar operations.

use std::fs;
use std::path::{Path, PathBuf};

use gitling_core::object::{Id, Kind};
use gitling_core::repo::{Error, RefTarget, Repo, Result};
use tracing::debug;

use crate::Config;

mod init;
mod loose;
mod refs;

/// Implementation of `gitling_core::repo::Repo` that stores content on the
/// local file system.
///
/// _IMPORTANT NOTE:_ This is intended as a reference implementation largely
/// for testing purposes and may not necessarily handle all of the edge cases that
/// the traditional `git` command-line interface will handle.
///
/// That said, it does intentionally use the same `.git` folder format as command-line
/// `git` so that results may be compared for similar operations.
#[derive(Debug)]
pub struct OnDisk {
    work_dir: PathBuf,
    git_dir: PathBuf,
    objects_dir: PathBuf,
    config: Config,
}

impl OnDisk {
    /// Open an on-disk git repository.
    ///
    /// `work_dir` should be the top-level working directory. A `.git` directory should
    /// exist at this path. Use `init` function to create an empty on-disk repository if
    /// necessary.
    pub fn new(work_dir: &Path) -> Result<Self> {
        let work_dir = work_dir.to_path_buf();
        if !work_dir.exists() {
            return Err(Error::WorkDirDoesntExist(work_dir));
        }

        let git_dir = work_dir.join(".git");
        if !git_dir.is_dir() {
            return Err(Error::GitDirDoesntExist(git_dir));
        }

        let config = Config::load_for_repo(&git_dir)?;
        if let Some(version) = config.get("core.repositoryformatversion") {
            if version.trim() != "0" {
                return Err(Error::UnsupportedRepositoryFormat(version.to_string()));
            }
        }

        debug!(work_dir = %work_dir.display(), "opened repository");
        Ok(OnDisk::from_parts(work_dir, git_dir, config))
    }

    /// Find the repository containing `start`: the nearest of `start` and
    /// its ancestors that has a `.git` directory.
    pub fn discover(start: &Path) -> Result<Self> {
        let start = start.canonicalize()?;

        for dir in start.ancestors() {
            if dir.join(".git").is_dir() {
                return OnDisk::new(dir);
            }
        }

        Err(Error::GitDirDoesntExist(start))
    }

    /// Creates a new, empty git repository on the local file system.
    ///
    /// `HEAD` points at `initial_branch`, or else at the global
    /// `init.defaultBranch` setting, or else at `master`.
    ///
    /// Analogous to [`git init`](https://git-scm.com/docs/git-init).
    pub fn init(work_dir: &Path, initial_branch: Option<&str>) -> Result<Self> {
        let git_dir = work_dir.join(".git");
        if git_dir.exists() {
            return Err(Error::GitDirShouldntExist(git_dir));
        }

        let global = Config::load_global()?;
        let branch = initial_branch
            .or_else(|| global.get("init.defaultBranch"))
            .unwrap_or("master")
            .to_string();

        gitling_core::path::check_ref_name(&format!("refs/heads/{}", branch)).map_err(
            |reason| Error::InvalidRefName {
                name: branch.clone(),
                reason,
            },
        )?;

        fs::create_dir_all(&git_dir)?;

        init::create_config(&git_dir)?;
        init::create_description(&git_dir)?;
        init::create_head(&git_dir, &branch)?;
        init::create_hooks_dir(&git_dir)?;
        init::create_info_dir(&git_dir)?;
        init::create_objects_dir(&git_dir)?;
        init::create_refs_dir(&git_dir)?;

        debug!(git_dir = %git_dir.display(), branch = %branch, "initialized repository");

        let config = Config::load_for_repo(&git_dir)?;
        Ok(OnDisk::from_parts(work_dir.to_path_buf(), git_dir, config))
    }

    fn from_parts(work_dir: PathBuf, git_dir: PathBuf, config: Config) -> OnDisk {
        let objects_dir = git_dir.join("objects");
        OnDisk {
            work_dir,
            git_dir,
            objects_dir,
            config,
        }
    }

    /// Return the working directory for this repo.
    pub fn work_dir(&self) -> &Path {
        self.work_dir.as_path()
    }

    /// Return the path to the `.git` directory.
    pub fn git_dir(&self) -> &Path {
        self.git_dir.as_path()
    }

    /// Return the merged global and repository configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Return the file a loose object with this ID is stored in.
    pub fn object_path(&self, id: &Id) -> PathBuf {
        loose::object_path(&self.objects_dir, id)
    }
}

impl Repo for OnDisk {
    fn put_object(&self, kind: Kind, body: &[u8]) -> Result<Id> {
        loose::write(&self.objects_dir, kind, body)
    }

    fn get_raw_object(&self, id: &Id) -> Result<(Kind, Vec<u8>)> {
        loose::read(&self.objects_dir, id)
    }

    fn has_object(&self, id: &Id) -> Result<bool> {
        Ok(loose::exists(&self.objects_dir, id))
    }

    fn find_objects_with_prefix(&self, prefix: &str) -> Result<Vec<Id>> {
        loose::find_with_prefix(&self.objects_dir, prefix)
    }

    fn read_ref(&self, name: &str) -> Result<Option<RefTarget>> {
        refs::read(&self.git_dir, name)
    }

    fn write_ref(&self, name: &str, target: &RefTarget) -> Result<()> {
        refs::write(&self.git_dir, name, target)
    }

    fn ref_names(&self, prefix: &str) -> Result<Vec<String>> {
        refs::names(&self.git_dir, prefix)
    }
}

#[cfg(test)]
mod tests;
