#![deny(warnings)]

use std::{
    error::Error,
    fmt,
    io::{self, Write},
};

use tracing_subscriber::EnvFilter;

mod app;
pub(crate) use app::App;

mod cmds;
mod quote;

#[cfg(test)]
mod temp_cwd;

pub(crate) type Result<T> = std::result::Result<T, Box<dyn Error>>;

/// Ends the process with the given status and no message, like
/// `git cat-file -e` does for a missing object.
#[derive(Debug)]
pub(crate) struct SilentExit(pub i32);

impl fmt::Display for SilentExit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "exit status {}", self.0)
    }
}

impl Error for SilentExit {}

// Log output is off unless GITLING_LOG names a filter (e.g. `debug`).
// Logs always go to stderr so stdout stays comparable with git's.
fn init_tracing() {
    let filter = EnvFilter::try_from_env("GITLING_LOG").unwrap_or_else(|_| EnvFilter::new("off"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

#[allow(unused_must_use)]
fn main() {
    init_tracing();

    let stdin = io::stdin();
    let mut stdin = stdin.lock();

    let stdout = io::stdout();
    let mut stdout = stdout.lock();

    let mut app = App {
        arg_matches: app::clap_app().get_matches(),
        stdin: &mut stdin,
        stdout: &mut stdout,
    };

    let r = app.run();

    app.flush();
    // Intentionally ignoring the result of this flush.

    std::process::exit(match r {
        Ok(()) => 0,
        Err(err) => match err.downcast_ref::<SilentExit>() {
            Some(SilentExit(code)) => *code,
            None => {
                eprintln!("fatal: {}", err);
                1
            }
        },
    });
}
