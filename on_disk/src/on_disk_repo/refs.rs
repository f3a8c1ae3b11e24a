//! Ref files under `$GIT_DIR`, plus read-only support for `packed-refs`.

use std::fs;
use std::io::{self, Write};
use std::path::Path;

use gitling_core::object::Id;
use gitling_core::path::check_ref_name;
use gitling_core::repo::{RefTarget, Result};
use tempfile::NamedTempFile;
use tracing::debug;

pub(crate) fn read(git_dir: &Path, name: &str) -> Result<Option<RefTarget>> {
    let path = git_dir.join(name);

    match fs::read(&path) {
        Ok(content) => Ok(Some(RefTarget::parse(name, &content)?)),
        Err(err) if is_missing(&err) || path.is_dir() => {
            Ok(read_packed(git_dir)?
                .into_iter()
                .find(|(packed_name, _)| packed_name == name)
                .map(|(_, id)| RefTarget::Direct(id)))
        }
        Err(err) => Err(err.into()),
    }
}

/// Replace the ref file atomically: the new content is written to a
/// temporary file in the same directory and renamed over the old one.
pub(crate) fn write(git_dir: &Path, name: &str, target: &RefTarget) -> Result<()> {
    let path = git_dir.join(name);
    let dir = path
        .parent()
        .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "ref path has no parent"))?;
    fs::create_dir_all(dir)?;

    let mut temp = NamedTempFile::new_in(dir)?;
    temp.write_all(target.to_string().as_bytes())?;
    temp.persist(&path).map_err(|err| err.error)?;

    debug!(ref_name = name, target = %target.to_string().trim_end(), "wrote ref");
    Ok(())
}

/// Full names of loose and packed refs starting with `prefix`.
pub(crate) fn names(git_dir: &Path, prefix: &str) -> Result<Vec<String>> {
    let mut names = Vec::new();
    collect_loose(git_dir, "refs", &mut names)?;

    for (name, _) in read_packed(git_dir)? {
        if !names.contains(&name) {
            names.push(name);
        }
    }

    names.retain(|name| name.starts_with(prefix));
    Ok(names)
}

fn collect_loose(git_dir: &Path, dir_name: &str, names: &mut Vec<String>) -> Result<()> {
    let entries = match fs::read_dir(git_dir.join(dir_name)) {
        Ok(entries) => entries,
        Err(err) if is_missing(&err) => return Ok(()),
        Err(err) => return Err(err.into()),
    };

    for entry in entries {
        let entry = entry?;
        let file_name = match entry.file_name().into_string() {
            Ok(file_name) => file_name,
            Err(_) => continue,
        };

        let name = format!("{}/{}", dir_name, file_name);
        let file_type = entry.file_type()?;

        if file_type.is_dir() {
            collect_loose(git_dir, &name, names)?;
        } else if file_type.is_file() {
            // Lock files and leftover temp files from an interrupted write
            // aren't refs.
            match check_ref_name(&name) {
                Ok(()) => names.push(name),
                Err(reason) => debug!(ref_name = %name, reason, "skipping file in refs"),
            }
        }
    }

    Ok(())
}

/// Parse `packed-refs`: `<id> <name>` lines, with `#` header lines and
/// `^<id>` peeled-tag lines skipped.
fn read_packed(git_dir: &Path) -> Result<Vec<(String, Id)>> {
    let text = match fs::read_to_string(git_dir.join("packed-refs")) {
        Ok(text) => text,
        Err(err) if is_missing(&err) => return Ok(Vec::new()),
        Err(err) => return Err(err.into()),
    };

    let mut refs = Vec::new();
    for line in text.lines() {
        if line.starts_with('#') || line.starts_with('^') {
            continue;
        }

        let mut parts = line.splitn(2, ' ');
        if let (Some(hex), Some(name)) = (parts.next(), parts.next()) {
            if let Ok(id) = Id::from_hex(hex) {
                refs.push((name.to_string(), id));
            }
        }
    }

    Ok(refs)
}

fn is_missing(err: &io::Error) -> bool {
    err.kind() == io::ErrorKind::NotFound
}
