use std::{env, path::Path};

use gitling_core::repo::Result;
use gitling_on_disk::OnDisk;

// Discover a git repo starting from the given path.
//
// The nearest of `path` and its ancestors that contains a `.git`
// directory is the repo's working directory.
//
// Returns a `Result` with `gitling_on_disk::OnDisk` or
// `gitling_core::repo::Error` if no such repo exists.
pub fn from_path<P: AsRef<Path>>(path: P) -> Result<OnDisk> {
    OnDisk::discover(path.as_ref())
}

// Discover a git repo starting from the current working directory.
pub fn from_current_dir() -> Result<OnDisk> {
    let path = env::current_dir()?;
    from_path(path)
}
