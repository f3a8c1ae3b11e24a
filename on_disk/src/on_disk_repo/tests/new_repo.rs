use std::fs;

use super::super::*;

use crate::TempGitRepo;

#[test]
fn happy_path() {
    let tgr = TempGitRepo::new();
    let work_dir = tgr.path();
    let git_dir = work_dir.join(".git");
    let r = OnDisk::new(&work_dir).unwrap();
    assert_eq!(r.work_dir(), work_dir);
    assert_eq!(r.git_dir(), git_dir.as_path());
    assert_eq!(r.config().get("core.repositoryformatversion"), Some("0"));
}

#[test]
fn error_no_work_dir() {
    let tgr = TempGitRepo::new();
    let work_dir = tgr.path().join("bogus");
    let err = OnDisk::new(&work_dir).unwrap_err();
    if let Error::WorkDirDoesntExist(_) = err {
        // expected
    } else {
        panic!("wrong error: {:?}", err);
    }
}

#[test]
fn error_no_git_dir() {
    let tempdir = tempfile::tempdir().unwrap();
    let work_dir = tempdir.path();
    let err = OnDisk::new(&work_dir).unwrap_err();
    if let Error::GitDirDoesntExist(_) = err {
        // expected
    } else {
        panic!("wrong error: {:?}", err);
    }
}

#[test]
fn error_unsupported_format() {
    let tgr = TempGitRepo::new();
    fs::write(
        tgr.path().join(".git/config"),
        "[core]\n\trepositoryformatversion = 1\n",
    )
    .unwrap();

    let err = OnDisk::new(tgr.path()).unwrap_err();
    if let Error::UnsupportedRepositoryFormat(version) = err {
        assert_eq!(version, "1");
    } else {
        panic!("wrong error: {:?}", err);
    }
}

#[test]
fn error_bad_config() {
    let tgr = TempGitRepo::new();
    fs::write(tgr.path().join(".git/config"), "[core\n").unwrap();

    let err = OnDisk::new(tgr.path()).unwrap_err();
    if let Error::InvalidConfig { line, .. } = err {
        assert_eq!(line, 1);
    } else {
        panic!("wrong error: {:?}", err);
    }
}

#[test]
fn discover_from_subdirectory() {
    let tgr = TempGitRepo::new();
    let nested = tgr.path().join("a/b/c");
    fs::create_dir_all(&nested).unwrap();

    let r = OnDisk::discover(&nested).unwrap();
    assert_eq!(r.work_dir(), tgr.path().canonicalize().unwrap());
}

#[test]
fn discover_outside_any_repo() {
    let tempdir = tempfile::tempdir().unwrap();

    // Only meaningful when the temp directory isn't itself inside a repo.
    if tempdir
        .path()
        .ancestors()
        .any(|dir| dir.join(".git").is_dir())
    {
        return;
    }

    let err = OnDisk::discover(tempdir.path()).unwrap_err();
    assert!(matches!(err, Error::GitDirDoesntExist(_)));
}
