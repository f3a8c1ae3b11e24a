use std::{fs, io::Write};

use super::find_repo;
use crate::{App, Result};

use clap::{Arg, ArgMatches, Error, ErrorKind, SubCommand};
use gitling_core::object::{self, Kind, Object};
use gitling_core::repo::{self, Repo};

pub(crate) fn subcommand<'a, 'b>() -> clap::App<'a, 'b> {
    SubCommand::with_name("hash-object")
        .about("Compute object ID and optionally creates a blob from a file")
        .arg(
            Arg::with_name("t")
                .short("t")
                .value_name("type")
                .help("Specify the type (default 'blob')"),
        )
        .arg(
            Arg::with_name("w")
                .short("w")
                .help("Actually write the object into the object database"),
        )
        .arg(
            Arg::with_name("stdin")
                .long("stdin")
                .help("Read the object from standard input instead of from a file"),
        )
        .arg(
            Arg::with_name("literally")
                .long("literally")
                .help("Bypass validity checks"),
        )
        .arg(Arg::with_name("file"))
}

pub(crate) fn run(app: &mut App, args: &ArgMatches) -> Result<()> {
    let kind = type_from_args(args)?;
    let body = content_from_args(app, args)?;

    if !args.is_present("literally") {
        Object::parse(kind, &body)
            .and_then(|o| o.check())
            .map_err(repo::Error::InvalidObject)?;
    }

    let id = if args.is_present("w") {
        let repo = find_repo::from_current_dir()?;
        repo.put_object(kind, &body)?
    } else {
        object::hash(kind, &body)
    };

    writeln!(app, "{}", id)?;

    Ok(())
}

fn type_from_args(args: &ArgMatches) -> Result<Kind> {
    match args.value_of("t") {
        Some(type_str) => type_str.parse().map_err(|_| {
            Box::new(Error {
                message: "-t must be one of blob, commit, tag, or tree".to_string(),
                kind: ErrorKind::InvalidValue,
                info: None,
            }) as Box<dyn std::error::Error>
        }),
        None => Ok(Kind::Blob),
    }
}

fn content_from_args(app: &mut App, args: &ArgMatches) -> Result<Vec<u8>> {
    let stdin = args.is_present("stdin");
    let file = args.value_of("file");

    match (stdin, file) {
        (false, Some(file)) => Ok(fs::read(file)?),
        (true, None) => {
            let mut body = Vec::new();
            app.stdin.read_to_end(&mut body)?;
            Ok(body)
        }
        _ => Err(Box::new(Error {
            message: "content source must be either --stdin or a file path".to_string(),
            kind: ErrorKind::MissingRequiredArgument,
            info: None,
        })),
    }
}
