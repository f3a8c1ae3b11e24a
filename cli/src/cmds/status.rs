use std::io::Write;

use super::find_repo;
use crate::{quote::quote_path, App, Result};

use clap::{ArgMatches, SubCommand};
use gitling_core::repo::Head;
use gitling_on_disk::{Change, Status};

pub(crate) fn subcommand<'a, 'b>() -> clap::App<'a, 'b> {
    SubCommand::with_name("status").about("Show how the working tree differs from HEAD")
}

pub(crate) fn run(app: &mut App, _args: &ArgMatches) -> Result<()> {
    let repo = find_repo::from_current_dir()?;
    let status = gitling_on_disk::status(&repo)?;

    app.write_all(long_format(&status).as_bytes())?;

    Ok(())
}

// The default (`--long`) output of `git status`.
fn long_format(status: &Status) -> String {
    let mut out = String::new();

    let unborn = match &status.head {
        Head::Branch { name, id } => {
            out.push_str(&format!("On branch {}\n", name));
            id.is_none()
        }
        Head::Detached(id) => {
            out.push_str(&format!("HEAD detached at {}\n", id.abbrev(7)));
            false
        }
    };

    if unborn {
        out.push_str("\nNo commits yet\n\n");
    }

    if !status.changes.is_empty() {
        let any_deleted = status
            .changes
            .iter()
            .any(|(_, change)| *change == Change::Deleted);

        out.push_str("Changes not staged for commit:\n");
        if any_deleted {
            out.push_str("  (use \"git add/rm <file>...\" to update what will be committed)\n");
        } else {
            out.push_str("  (use \"git add <file>...\" to update what will be committed)\n");
        }
        out.push_str(
            "  (use \"git restore <file>...\" to discard changes in working directory)\n",
        );

        for (path, change) in &status.changes {
            let label = match change {
                Change::Modified => "modified:   ",
                Change::Deleted => "deleted:    ",
            };
            out.push_str(&format!("\t{}{}\n", label, quote_path(path)));
        }
        out.push('\n');
    }

    if !status.untracked.is_empty() {
        out.push_str("Untracked files:\n");
        out.push_str("  (use \"git add <file>...\" to include in what will be committed)\n");
        for path in &status.untracked {
            out.push_str(&format!("\t{}\n", quote_path(path)));
        }
        out.push('\n');
    }

    let summary = if !status.changes.is_empty() {
        "no changes added to commit (use \"git add\" and/or \"git commit -a\")"
    } else if !status.untracked.is_empty() {
        "nothing added to commit but untracked files present (use \"git add\" to track)"
    } else if unborn {
        "nothing to commit (create/copy files and use \"git add\" to track)"
    } else {
        "nothing to commit, working tree clean"
    };
    out.push_str(summary);
    out.push('\n');

    out
}
