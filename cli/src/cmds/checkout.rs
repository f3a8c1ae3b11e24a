use std::path::Path;

use super::find_repo;
use crate::{App, Result};

use clap::{Arg, ArgMatches, SubCommand};
use gitling_core::repo::Repo;

pub(crate) fn subcommand<'a, 'b>() -> clap::App<'a, 'b> {
    SubCommand::with_name("checkout")
        .about("Write the tree of a commit into an empty directory")
        .arg(
            Arg::with_name("commit")
                .required(true)
                .help("The commit or tree to check out"),
        )
        .arg(
            Arg::with_name("path")
                .required(true)
                .help("The directory to write into; must be empty or missing"),
        )
}

pub(crate) fn run(_app: &mut App, args: &ArgMatches) -> Result<()> {
    let repo = find_repo::from_current_dir()?;

    let id = repo.rev_parse(args.value_of("commit").unwrap_or("HEAD"))?;
    let dest = Path::new(args.value_of("path").unwrap_or_default());

    gitling_on_disk::checkout(&repo, &id, dest)?;

    Ok(())
}
