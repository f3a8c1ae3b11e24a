use std::io::Write;

use super::find_repo;
use crate::{quote::quote_path, App, Result};

use clap::{Arg, ArgMatches, SubCommand};
use gitling_core::object::{Kind, TreeEntry};
use gitling_core::path::FileMode;
use gitling_core::repo::{Repo, Result as RepoResult};
use gitling_on_disk::read_tree;

pub(crate) fn subcommand<'a, 'b>() -> clap::App<'a, 'b> {
    SubCommand::with_name("ls-tree")
        .about("List the contents of a tree object")
        .arg(
            Arg::with_name("r")
                .short("r")
                .help("Recurse into sub-trees"),
        )
        .arg(
            Arg::with_name("d")
                .short("d")
                .help("Show only the named tree entry itself, not its children"),
        )
        .arg(
            Arg::with_name("name-only")
                .long("name-only")
                .help("List only filenames, one per line"),
        )
        .arg(
            Arg::with_name("tree-ish")
                .required(true)
                .help("ID of a tree-ish"),
        )
}

#[derive(Clone, Copy)]
pub(crate) struct Options {
    pub recurse: bool,
    pub trees_only: bool,
    pub name_only: bool,
}

pub(crate) fn run(app: &mut App, args: &ArgMatches) -> Result<()> {
    let repo = find_repo::from_current_dir()?;

    let options = Options {
        recurse: args.is_present("r"),
        trees_only: args.is_present("d"),
        name_only: args.is_present("name-only"),
    };

    let id = repo.rev_parse(args.value_of("tree-ish").unwrap_or("HEAD"))?;
    let tree = repo.peel(&id, Kind::Tree)?;

    let mut out = Vec::new();
    list(&repo, &tree, b"", options, &mut out)?;
    app.write_all(&out)?;

    Ok(())
}

/// Append the listing of `tree` to `out`, with `prefix` in front of every
/// path.
pub(crate) fn list<R: Repo + ?Sized>(
    repo: &R,
    tree: &gitling_core::object::Id,
    prefix: &[u8],
    options: Options,
    out: &mut Vec<u8>,
) -> RepoResult<()> {
    for entry in read_tree(repo, tree)?.entries() {
        let mut path = prefix.to_vec();
        path.extend_from_slice(entry.name());

        let is_tree = entry.mode() == FileMode::Tree;

        // With -r, subtrees are only listed when -d asks for trees.
        let show = if is_tree {
            options.trees_only || !options.recurse
        } else {
            !options.trees_only
        };

        if show {
            out.extend_from_slice(format_entry(entry, &path, options.name_only).as_bytes());
        }

        if options.recurse && is_tree {
            path.push(b'/');
            list(repo, entry.id(), &path, options, out)?;
        }
    }

    Ok(())
}

/// One line of `ls-tree` output.
pub(crate) fn format_entry(entry: &TreeEntry, path: &[u8], name_only: bool) -> String {
    if name_only {
        format!("{}\n", quote_path(path))
    } else {
        format!(
            "{} {} {}\t{}\n",
            entry.mode(),
            entry.mode().kind(),
            entry.id(),
            quote_path(path)
        )
    }
}
