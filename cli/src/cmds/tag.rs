use std::io::Write;

use super::find_repo;
use crate::{App, Result};

use clap::{Arg, ArgMatches, SubCommand};
use gitling_core::object::{cleanup_message, join_paragraphs};
use gitling_core::repo::Repo;
use gitling_on_disk::{identity, Role};

pub(crate) fn subcommand<'a, 'b>() -> clap::App<'a, 'b> {
    SubCommand::with_name("tag")
        .about("List tags, or create a lightweight or annotated tag")
        .arg(
            Arg::with_name("annotate")
                .short("a")
                .help("Make an annotated tag object (message defaults to \"Tag <tagname>\")"),
        )
        .arg(
            Arg::with_name("message")
                .short("m")
                .value_name("msg")
                .multiple(true)
                .number_of_values(1)
                .help("Use the given message; implies -a. Repeats become paragraphs"),
        )
        .arg(Arg::with_name("tagname").help("The name of the tag to create"))
        .arg(
            Arg::with_name("object")
                .requires("tagname")
                .help("The object the new tag refers to (default: HEAD)"),
        )
}

pub(crate) fn run(app: &mut App, args: &ArgMatches) -> Result<()> {
    let repo = find_repo::from_current_dir()?;

    let name = match args.value_of("tagname") {
        Some(name) => name,
        None => {
            for (name, _) in repo.list_refs("refs/tags/")? {
                writeln!(app, "{}", name)?;
            }
            return Ok(());
        }
    };

    let target = args.value_of("object");

    let message = match args.values_of("message") {
        Some(paragraphs) => {
            let paragraphs: Vec<&str> = paragraphs.collect();
            Some(cleanup_message(&join_paragraphs(&paragraphs)))
        }
        None if args.is_present("annotate") => Some(default_message(name).into_bytes()),
        None => None,
    };

    match message {
        Some(message) => {
            let tagger = identity(repo.config(), Role::Committer)?;
            repo.create_annotated_tag(name, target, &tagger, &message)?;
        }
        None => {
            repo.create_lightweight_tag(name, target)?;
        }
    }

    Ok(())
}

// Used for `-a` without `-m`, since there is no editor to ask with.
fn default_message(name: &str) -> String {
    format!("Tag {}\n", name)
}
