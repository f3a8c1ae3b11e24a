use std::{env, fs, path::Path};

use gitling_on_disk::TempGitRepo;

use crate::{temp_cwd::TempCwd, App, Result};

// Two commits on master, an annotated tag `v1` on the first, a
// lightweight tag `light` on the second and a branch `feature` at the
// first. Made with command-line git so the IDs are git's own.
pub(crate) fn history() -> TempGitRepo {
    let mut tgr = TempGitRepo::new();

    fs::create_dir_all(tgr.path().join("a")).unwrap();
    fs::write(tgr.path().join("a/greek_letters"), "Alpha").unwrap();
    fs::write(tgr.path().join("a/arabic_letters"), "Hamza").unwrap();
    tgr.git_command(&["add", "."]);
    tgr.git_command(&["commit", "-q", "-m", "first commit"]);
    tgr.git_command(&["tag", "-a", "v1", "-m", "release one"]);

    fs::write(tgr.path().join("b"), "Hello World").unwrap();
    tgr.git_command(&["add", "."]);
    tgr.git_command(&["commit", "-q", "-m", "second"]);
    tgr.git_command(&["tag", "light"]);
    tgr.git_command(&["branch", "feature", "HEAD~1"]);

    tgr
}

// Run gitling in-process with `dir` as the current directory and the
// same fixed identity, clock and config isolation `TempGitRepo` gives git.
// Callers must be marked #[serial].
pub(crate) fn run_in(dir: &Path, args: &[&str]) -> Result<Vec<u8>> {
    for (key, value) in TempGitRepo::ENV.iter() {
        env::set_var(key, value);
    }

    let _cwd = TempCwd::new(dir);
    App::run_with_args(args.iter().copied())
}

// Like `run_in`, with `stdin` as standard input.
pub(crate) fn run_in_with_stdin(dir: &Path, stdin: &[u8], args: &[&str]) -> Result<Vec<u8>> {
    for (key, value) in TempGitRepo::ENV.iter() {
        env::set_var(key, value);
    }

    let _cwd = TempCwd::new(dir);
    App::run_with_stdin_and_args(stdin.to_vec(), args.iter().copied())
}

// Run gitling in-process and git as a subprocess with the same arguments
// in `tgr`, and check that both print the same output.
pub(crate) fn assert_same_output(tgr: &TempGitRepo, args: &[&str]) {
    let ours = run_in(tgr.path(), args).unwrap();
    let theirs = tgr.git_output(args);

    assert_eq!(
        String::from_utf8_lossy(&ours),
        String::from_utf8_lossy(&theirs),
        "output of {:?} differs",
        args
    );
}
