use crate::{App, Result};

mod branch;
mod cat_file;
mod checkout;
mod commit_tree;
mod find_repo;
mod hash_object;
mod init;
mod ls_tree;
mod rev_parse;
mod status;
mod tag;

pub(crate) fn add_subcommands<'a, 'b>(app: clap::App<'a, 'b>) -> clap::App<'a, 'b> {
    app.subcommand(branch::subcommand())
        .subcommand(cat_file::subcommand())
        .subcommand(checkout::subcommand())
        .subcommand(commit_tree::subcommand())
        .subcommand(hash_object::subcommand())
        .subcommand(init::subcommand())
        .subcommand(ls_tree::subcommand())
        .subcommand(rev_parse::subcommand())
        .subcommand(status::subcommand())
        .subcommand(tag::subcommand())
}

pub(crate) fn dispatch(app: &mut App) -> Result<()> {
    let matches = app.arg_matches.clone();
    // ^^ Ugh. Need an independent copy of matches so we can still pass
    // the App struct through to subcommand imps.

    match matches.subcommand() {
        ("branch", Some(m)) => branch::run(app, &m),
        ("cat-file", Some(m)) => cat_file::run(app, &m),
        ("checkout", Some(m)) => checkout::run(app, &m),
        ("commit-tree", Some(m)) => commit_tree::run(app, &m),
        ("hash-object", Some(m)) => hash_object::run(app, &m),
        ("init", Some(m)) => init::run(app, &m),
        ("ls-tree", Some(m)) => ls_tree::run(app, &m),
        ("rev-parse", Some(m)) => rev_parse::run(app, &m),
        ("status", Some(m)) => status::run(app, &m),
        ("tag", Some(m)) => tag::run(app, &m),
        _ => unreachable!(),
        // unreachable: Should have exited out with appropriate help or
        // error message if no subcommand was given.
    }
}

#[cfg(test)]
pub(crate) mod test_support;
