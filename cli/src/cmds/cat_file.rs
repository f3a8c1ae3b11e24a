use std::io::Write;

use super::{find_repo, ls_tree};
use crate::{App, Result, SilentExit};

use clap::{Arg, ArgGroup, ArgMatches, Error, ErrorKind, SubCommand};
use gitling_core::object::{Id, Kind, HEX_LEN};
use gitling_core::repo::Repo;
use gitling_on_disk::OnDisk;

pub(crate) fn subcommand<'a, 'b>() -> clap::App<'a, 'b> {
    SubCommand::with_name("cat-file")
        .about("Provide content or type and size information for repository objects")
        .arg(Arg::with_name("t").short("t").help("Show the object type"))
        .arg(Arg::with_name("s").short("s").help("Show the object size"))
        .arg(
            Arg::with_name("e")
                .short("e")
                .help("Exit with zero status if <object> exists and is a valid object"),
        )
        .arg(
            Arg::with_name("p")
                .short("p")
                .help("Pretty-print the contents of <object> based on its type"),
        )
        .group(ArgGroup::with_name("mode").args(&["t", "s", "e", "p"]))
        .arg(
            Arg::with_name("type-or-object")
                .required(true)
                .help("The expected type, or the object when a mode flag is given"),
        )
        .arg(Arg::with_name("object").help("The name of the object to show"))
}

pub(crate) fn run(app: &mut App, args: &ArgMatches) -> Result<()> {
    let repo = find_repo::from_current_dir()?;
    let first = args.value_of("type-or-object").unwrap_or_default();

    if !args.is_present("mode") {
        let name = match args.value_of("object") {
            Some(name) => name,
            None => return Err(usage("<type> <object> or one of -t, -s, -e, -p is required")),
        };
        return cat_as_kind(app, &repo, first, name);
    }

    if args.is_present("object") {
        return Err(usage("only one <object> may be given with -t, -s, -e or -p"));
    }

    if args.is_present("e") {
        return exists(&repo, first);
    }

    let id = repo.rev_parse(first)?;
    let (kind, body) = repo.get_raw_object(&id)?;

    if args.is_present("t") {
        writeln!(app, "{}", kind)?;
    } else if args.is_present("s") {
        writeln!(app, "{}", body.len())?;
    } else if kind == Kind::Tree {
        let options = ls_tree::Options {
            recurse: false,
            trees_only: false,
            name_only: false,
        };
        let mut out = Vec::new();
        ls_tree::list(&repo, &id, b"", options, &mut out)?;
        app.write_all(&out)?;
    } else {
        app.write_all(&body)?;
    }

    Ok(())
}

// `cat-file <type> <object>`: print the raw body, peeling tags (and
// commits, for trees) until an object of the wanted type is reached.
fn cat_as_kind(app: &mut App, repo: &OnDisk, kind: &str, name: &str) -> Result<()> {
    let wanted: Kind = kind.parse()?;

    let id = repo.rev_parse(name)?;
    let id = repo.peel(&id, wanted)?;

    let (_, body) = repo.get_raw_object(&id)?;
    app.write_all(&body)?;

    Ok(())
}

// A full object ID that isn't stored fails silently; any other name
// that doesn't resolve is an error.
fn exists(repo: &OnDisk, name: &str) -> Result<()> {
    let found = if name.len() == HEX_LEN {
        match Id::from_hex(name) {
            Ok(id) => repo.has_object(&id)? && repo.get_raw_object(&id).is_ok(),
            Err(_) => repo.rev_parse(name).is_ok(),
        }
    } else {
        let id = repo.rev_parse(name)?;
        repo.get_raw_object(&id).is_ok()
    };

    if found {
        Ok(())
    } else {
        Err(Box::new(SilentExit(1)))
    }
}

fn usage(message: &str) -> Box<dyn std::error::Error> {
    Box::new(Error {
        message: message.to_string(),
        kind: ErrorKind::MissingRequiredArgument,
        info: None,
    })
}
