use std::{ffi::OsStr, fs, path::Path, process::Command};

use assert_cmd::cargo;
use gitling_on_disk::TempGitRepo;

type GitOp = fn(&OsStr, &Path);

// Run `op` once with command-line git and once with gitling, each in its
// own temporary directory, and check that both leave identical trees.
#[allow(dead_code)]
pub fn compare_git_and_gitling(op: GitOp) {
    let c_temp = tempfile::tempdir().unwrap();
    let c_dir = c_temp.path();
    op(OsStr::new("git"), c_dir);

    let r_temp = tempfile::tempdir().unwrap();
    let r_dir = r_temp.path();
    let gitling = cargo::cargo_bin("gitling");
    op(gitling.as_os_str(), r_dir);

    assert!(!dir_diff::is_different(c_dir, r_dir).unwrap());
}

// Use this when a comparison fails. Both trees are left behind under
// `path` (as `cgit` and `gitling`) so they can be diffed by hand.
#[allow(dead_code)]
pub fn compare_git_and_gitling_in(op: GitOp, path: &str) {
    let path = Path::new(path);

    let c_dir = path.join("cgit");
    fs::remove_dir_all(&c_dir).unwrap_or(());
    fs::create_dir_all(&c_dir).unwrap();
    op(OsStr::new("git"), &c_dir);

    let r_dir = path.join("gitling");
    fs::remove_dir_all(&r_dir).unwrap_or(());
    fs::create_dir_all(&r_dir).unwrap();
    let gitling = cargo::cargo_bin("gitling");
    op(gitling.as_os_str(), &r_dir);

    if dir_diff::is_different(&c_dir, &r_dir).unwrap() {
        panic!(
            "Directories differ:\n\n    c git: {}\n  gitling: {}\n\n",
            c_dir.display(),
            r_dir.display()
        );
    }
}

// A command for `cmd` (git or gitling) that runs in `path` with the fixed
// identity, clock and config isolation `TempGitRepo` uses.
#[allow(dead_code)]
pub fn command(cmd: &OsStr, path: &Path) -> Command {
    let mut c = Command::new(cmd);
    c.current_dir(path).envs(TempGitRepo::ENV.iter().copied());
    c
}

// Create an empty repo in `path` with `cmd`, then rewrite the parts that
// vary between git versions.
#[allow(dead_code)]
pub fn init_empty_repo(cmd: &OsStr, path: &Path) {
    let status = command(cmd, path)
        .args(&["init", "-q", "-b", "master"])
        .status()
        .unwrap();
    assert!(status.success());

    sanitize_repo(path);
}

pub fn sanitize_repo(path: &Path) {
    // Older versions of git create a deprecated branches directory.
    let branches_dir = path.join(".git/branches");
    fs::remove_dir_all(&branches_dir).unwrap_or(());

    // Hook samples aren't essential.
    let hooks_dir = path.join(".git/hooks");
    fs::remove_dir_all(&hooks_dir).unwrap_or(());
    fs::create_dir_all(&hooks_dir).unwrap();

    let git_config_txt = "[core]\n\trepositoryformatversion = 0\n\tfilemode = true\n\tbare = false\n\tlogallrefupdates = true\n";
    fs::write(path.join(".git/config"), git_config_txt).unwrap();

    let git_info_exclude_txt = "# git ls-files --others --exclude-from=.git/info/exclude\n# Lines that start with '#' are comments.\n# For a project mostly in C, the following would be a good set of\n# exclude patterns (uncomment them if you want to use them):\n# *.[oa]\n# *~\n";
    fs::create_dir_all(path.join(".git/info")).unwrap();
    fs::write(path.join(".git/info/exclude"), git_info_exclude_txt).unwrap();
}
