use std::io::Write;

use super::find_repo;
use crate::{App, Result};

use clap::{Arg, ArgMatches, SubCommand};
use gitling_core::object::{join_paragraphs, Id, Kind};
use gitling_core::repo::Repo;
use gitling_on_disk::{identity, Role};

pub(crate) fn subcommand<'a, 'b>() -> clap::App<'a, 'b> {
    SubCommand::with_name("commit-tree")
        .about("Create a new commit object")
        .arg(
            Arg::with_name("tree")
                .required(true)
                .help("An existing tree object"),
        )
        .arg(
            Arg::with_name("parent")
                .short("p")
                .value_name("parent")
                .multiple(true)
                .number_of_values(1)
                .help("Each -p indicates the ID of a parent commit object"),
        )
        .arg(
            Arg::with_name("message")
                .short("m")
                .value_name("message")
                .multiple(true)
                .number_of_values(1)
                .help("A paragraph in the commit log message (default: read from stdin)"),
        )
}

pub(crate) fn run(app: &mut App, args: &ArgMatches) -> Result<()> {
    let repo = find_repo::from_current_dir()?;

    let tree = repo.rev_parse(args.value_of("tree").unwrap_or_default())?;

    let parents = args
        .values_of("parent")
        .into_iter()
        .flatten()
        .map(|name| {
            let id = repo.rev_parse(name)?;
            repo.peel(&id, Kind::Commit)
        })
        .collect::<gitling_core::repo::Result<Vec<Id>>>()?;

    let message = match args.values_of("message") {
        Some(paragraphs) => join_paragraphs(&paragraphs.collect::<Vec<&str>>()),
        None => {
            let mut message = Vec::new();
            app.stdin.read_to_end(&mut message)?;
            message
        }
    };

    let author = identity(repo.config(), Role::Author)?;
    let committer = identity(repo.config(), Role::Committer)?;

    let id = repo.commit_tree(&tree, &parents, &author, &committer, &message)?;
    writeln!(app, "{}", id)?;

    Ok(())
}
