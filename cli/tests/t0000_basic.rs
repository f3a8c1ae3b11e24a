use std::fs;

mod common;

#[test]
fn init_matches() {
    common::compare_git_and_gitling(|cmd, path| {
        common::init_empty_repo(cmd, path);

        let head = fs::read_to_string(path.join(".git/HEAD")).unwrap();
        assert_eq!(head, "ref: refs/heads/master\n");
    });
}

#[test]
fn objects_dir_is_empty() {
    common::compare_git_and_gitling(|cmd, path| {
        common::init_empty_repo(cmd, path);

        let objects_dir = path.join(".git/objects");
        assert!(objects_dir.is_dir());
        assert_eq!(
            fs::read_dir(objects_dir)
                .unwrap()
                .filter(|x| !x.as_ref().unwrap().path().is_dir())
                .count(),
            0
        );
    });
}

#[test]
fn objects_dir_has_two_subdirs() {
    common::compare_git_and_gitling(|cmd, path| {
        common::init_empty_repo(cmd, path);

        let objects_dir = path.join(".git/objects");
        assert_eq!(
            fs::read_dir(objects_dir)
                .unwrap()
                .filter(|x| x.as_ref().unwrap().path().is_dir())
                .count(),
            2
        );
    });
}

#[test]
fn branch_and_tag_on_a_fresh_commit() {
    // The commit itself comes from git in both runs; only the refs are
    // written by the command under test.
    common::compare_git_and_gitling(|cmd, path| {
        common::init_empty_repo(cmd, path);

        fs::write(path.join("file"), "content\n").unwrap();
        let git = std::ffi::OsStr::new("git");
        for args in &[
            vec!["add", "file"],
            vec!["commit", "-q", "-m", "only"],
        ] {
            assert!(common::command(git, path)
                .args(args)
                .status()
                .unwrap()
                .success());
        }

        // git keeps a reflog and an index; gitling keeps neither.
        fs::remove_dir_all(path.join(".git/logs")).unwrap_or(());
        fs::remove_file(path.join(".git/index")).unwrap_or(());
        fs::remove_file(path.join(".git/COMMIT_EDITMSG")).unwrap_or(());

        for args in &[vec!["branch", "topic"], vec!["tag", "-m", "note", "v1"]] {
            let output = common::command(cmd, path).args(args).output().unwrap();
            assert!(output.status.success());
            assert!(output.stdout.is_empty());
        }

        fs::remove_dir_all(path.join(".git/logs")).unwrap_or(());
    });
}
