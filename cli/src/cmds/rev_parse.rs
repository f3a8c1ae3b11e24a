use std::io::Write;

use super::find_repo;
use crate::{App, Result};

use clap::{Arg, ArgMatches, SubCommand};
use gitling_core::repo::Repo;

pub(crate) fn subcommand<'a, 'b>() -> clap::App<'a, 'b> {
    SubCommand::with_name("rev-parse")
        .about("Print the object IDs that names refer to")
        .arg(
            Arg::with_name("rev")
                .required(true)
                .multiple(true)
                .help("Object names, optionally with a ^{<type>} suffix"),
        )
}

pub(crate) fn run(app: &mut App, args: &ArgMatches) -> Result<()> {
    let repo = find_repo::from_current_dir()?;

    for rev in args.values_of("rev").into_iter().flatten() {
        let id = repo.rev_parse(rev)?;
        writeln!(app, "{}", id)?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use serial_test::serial;

    use crate::cmds::test_support::{assert_same_output, history, run_in};

    #[test]
    #[serial]
    fn matches_command_line_git() {
        let tgr = history();

        for rev in &[
            "HEAD",
            "master",
            "refs/heads/master",
            "heads/feature",
            "feature",
            "v1",
            "tags/v1",
            "light",
            "v1^{}",
            "v1^{commit}",
            "v1^{tree}",
            "v1^{object}",
            "HEAD^{tree}",
            "02105bc3",
            "c5d3d366",
        ] {
            assert_same_output(&tgr, &["rev-parse", rev]);
        }

        assert_same_output(&tgr, &["rev-parse", "HEAD", "v1", "feature"]);
    }

    #[test]
    #[serial]
    fn unknown_revision() {
        let tgr = history();

        let err = run_in(tgr.path(), &["rev-parse", "HEAD", "nope"]).unwrap_err();
        assert_eq!(err.to_string(), "not a valid object name nope");
    }

    #[test]
    #[serial]
    fn wrong_kind() {
        let tgr = history();

        let err = run_in(tgr.path(), &["rev-parse", "HEAD^{tag}"]).unwrap_err();
        assert!(err.to_string().contains("is a commit, not a tag"), "{}", err);
    }
}
