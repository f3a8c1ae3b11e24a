use std::{fs, io::Write, path::Path};

use crate::{App, Result};

use clap::{Arg, ArgMatches, SubCommand};
use gitling_on_disk::OnDisk;

pub(crate) fn subcommand<'a, 'b>() -> clap::App<'a, 'b> {
    SubCommand::with_name("init")
        .about("Create an empty git repository")
        .arg(
            Arg::with_name("quiet")
                .short("q")
                .long("quiet")
                .help("Only print error and warning messages"),
        )
        .arg(
            Arg::with_name("initial-branch")
                .short("b")
                .long("initial-branch")
                .value_name("branch-name")
                .help("Use the specified name for the initial branch"),
        )
        .arg(
            Arg::with_name("directory")
                .help("The directory to create (default: current directory)"),
        )
}

pub(crate) fn run(app: &mut App, args: &ArgMatches) -> Result<()> {
    let path = Path::new(args.value_of("directory").unwrap_or("."));
    fs::create_dir_all(path)?;

    let repo = OnDisk::init(path, args.value_of("initial-branch"))?;

    if !args.is_present("quiet") {
        writeln!(
            app,
            "Initialized empty Git repository in {}/",
            repo.git_dir().canonicalize()?.display()
        )?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use std::fs;

    use crate::App;

    use gitling_on_disk::TempGitRepo;

    #[test]
    fn matches_command_line_git() {
        let tgr = TempGitRepo::new();
        let c_path = tgr.path();

        let r_path = tempfile::tempdir().unwrap();
        let r_pathstr = r_path.path().to_str().unwrap();

        let stdout = App::run_with_args(vec!["init", "-b", "master", &r_pathstr]).unwrap();

        let expected_std = format!(
            "Initialized empty Git repository in {}/\n",
            r_path.path().canonicalize().unwrap().join(".git").display()
        );

        assert_eq!(stdout, expected_std.as_bytes());
        assert!(!dir_diff::is_different(c_path, r_path.path()).unwrap());
    }

    #[test]
    fn creates_missing_directory() {
        let temp = tempfile::tempdir().unwrap();
        let dir = temp.path().join("new/repo");
        let dir_str = dir.to_str().unwrap();

        let stdout = App::run_with_args(vec!["init", "-q", "-b", "trunk", dir_str]).unwrap();
        assert!(stdout.is_empty());

        let head = fs::read_to_string(dir.join(".git/HEAD")).unwrap();
        assert_eq!(head, "ref: refs/heads/trunk\n");
    }

    #[test]
    fn error_already_a_repo() {
        let tgr = TempGitRepo::new();
        let path = tgr.path().to_str().unwrap();

        let err = App::run_with_args(vec!["init", path]).unwrap_err();
        assert!(err.to_string().starts_with("git dir shouldn't exist"));
    }

    #[test]
    fn error_too_many_args() {
        let err = App::run_with_args(vec!["init", "here", "and there"]).unwrap_err();

        let errmsg = err.to_string();
        assert!(
            errmsg.contains("wasn't expected"),
            "\nincorrect error message:\n\n{}",
            errmsg
        );
    }
}
