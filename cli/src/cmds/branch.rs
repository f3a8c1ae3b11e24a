use std::io::Write;

use super::find_repo;
use crate::{App, Result};

use clap::{Arg, ArgMatches, SubCommand};
use gitling_core::repo::{Head, Repo};

pub(crate) fn subcommand<'a, 'b>() -> clap::App<'a, 'b> {
    SubCommand::with_name("branch")
        .about("List or create branches")
        .arg(Arg::with_name("branchname").help("The name of the branch to create"))
        .arg(
            Arg::with_name("start-point")
                .requires("branchname")
                .help("The commit the new branch points at (default: HEAD)"),
        )
}

pub(crate) fn run(app: &mut App, args: &ArgMatches) -> Result<()> {
    let repo = find_repo::from_current_dir()?;

    if let Some(name) = args.value_of("branchname") {
        repo.create_branch(name, args.value_of("start-point"))?;
        return Ok(());
    }

    let current = match repo.head()? {
        Head::Branch { name, .. } => Some(name),
        Head::Detached(id) => {
            writeln!(app, "* (HEAD detached at {})", id.abbrev(7))?;
            None
        }
    };

    for (name, _) in repo.list_refs("refs/heads/")? {
        let marker = if current.as_deref() == Some(name.as_str()) {
            '*'
        } else {
            ' '
        };
        writeln!(app, "{} {}", marker, name)?;
    }

    Ok(())
}
