use std::{
    env,
    path::{Path, PathBuf},
};

// Moves the whole test process into another directory until dropped.
// The in-process command tests rely on it, since every subcommand finds
// its repository from the current directory.
//
// The working directory is process-wide: any test that uses this must
// be marked #[serial].
pub(crate) struct TempCwd {
    restore_to: PathBuf,
}

impl TempCwd {
    pub fn new<P: AsRef<Path>>(path: P) -> TempCwd {
        let restore_to = env::current_dir().unwrap();
        env::set_current_dir(path).unwrap();

        TempCwd { restore_to }
    }
}

impl Drop for TempCwd {
    fn drop(&mut self) {
        env::set_current_dir(&self.restore_to).unwrap();
    }
}
