//! Loose object storage: one zlib-compressed file per object at
//! `objects/<first 2 hex digits>/<remaining 38>`.

use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

use flate2::{read::ZlibDecoder, write::ZlibEncoder, Compression};
use gitling_core::object::{self, Id, Kind, HEX_LEN};
use gitling_core::repo::{Error, Result};
use tempfile::NamedTempFile;
use tracing::debug;

pub(crate) fn object_path(objects_dir: &Path, id: &Id) -> PathBuf {
    let hex = id.to_string();
    objects_dir.join(&hex[..2]).join(&hex[2..])
}

/// Write an object unless it is already present. The file is assembled
/// in a temporary file beside its final location and renamed into place.
pub(crate) fn write(objects_dir: &Path, kind: Kind, body: &[u8]) -> Result<Id> {
    let id = object::hash(kind, body);
    let path = object_path(objects_dir, &id);

    if path.exists() {
        debug!(id = %id, "object already present");
        return Ok(id);
    }

    let dir = path
        .parent()
        .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "object path has no parent"))?;
    fs::create_dir_all(dir)?;

    let temp = NamedTempFile::new_in(dir)?;
    {
        // git's default for core.looseCompression is Z_BEST_SPEED.
        let mut encoder = ZlibEncoder::new(temp.as_file(), Compression::fast());
        encoder.write_all(&object::encode(kind, body))?;
        encoder.finish()?;
    }

    set_read_only(temp.path())?;

    match temp.persist_noclobber(&path) {
        Ok(_) => {
            debug!(id = %id, %kind, len = body.len(), "wrote loose object");
            Ok(id)
        }
        Err(err) if err.error.kind() == io::ErrorKind::AlreadyExists => {
            debug!(id = %id, "object appeared during write");
            Ok(id)
        }
        Err(err) => Err(err.error.into()),
    }
}

pub(crate) fn read(objects_dir: &Path, id: &Id) -> Result<(Kind, Vec<u8>)> {
    let path = object_path(objects_dir, id);

    let compressed = match fs::read(&path) {
        Ok(compressed) => compressed,
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            return Err(Error::ObjectNotFound(*id))
        }
        Err(err) => return Err(err.into()),
    };

    let mut raw = Vec::new();
    ZlibDecoder::new(compressed.as_slice())
        .read_to_end(&mut raw)
        .map_err(|err| Error::CorruptObject {
            id: *id,
            reason: format!("unable to decompress: {}", err),
        })?;

    let (kind, body) = object::decode(&raw).map_err(|err| Error::from_parse(id, err))?;
    debug!(id = %id, %kind, len = body.len(), "read loose object");
    Ok((kind, body.to_vec()))
}

pub(crate) fn exists(objects_dir: &Path, id: &Id) -> bool {
    object_path(objects_dir, id).is_file()
}

/// Every loose object whose ID starts with the lower-case hex `prefix`,
/// sorted.
pub(crate) fn find_with_prefix(objects_dir: &Path, prefix: &str) -> Result<Vec<Id>> {
    let mut ids = Vec::new();

    let dirs: Vec<String> = if prefix.len() >= 2 {
        vec![prefix[..2].to_string()]
    } else {
        (0..=255u8)
            .map(|b| format!("{:02x}", b))
            .filter(|d| d.starts_with(prefix))
            .collect()
    };

    for dir_name in dirs {
        let dir = objects_dir.join(&dir_name);
        let entries = match fs::read_dir(&dir) {
            Ok(entries) => entries,
            Err(err) if err.kind() == io::ErrorKind::NotFound => continue,
            Err(err) => return Err(err.into()),
        };

        for entry in entries {
            let entry = entry?;
            let file_name = entry.file_name();
            let file_name = match file_name.to_str() {
                Some(name) if name.len() == HEX_LEN - 2 => name,
                _ => continue,
            };

            let hex = format!("{}{}", dir_name, file_name);
            if !hex.starts_with(prefix) {
                continue;
            }

            if let Ok(id) = Id::from_hex(&hex) {
                ids.push(id);
            }
        }
    }

    ids.sort();
    debug!(prefix, matches = ids.len(), "scanned loose objects");
    Ok(ids)
}

#[cfg(unix)]
fn set_read_only(path: &Path) -> io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(0o444))
}

#[cfg(not(unix))]
fn set_read_only(path: &Path) -> io::Result<()> {
    let mut permissions = fs::metadata(path)?.permissions();
    permissions.set_readonly(true);
    fs::set_permissions(path, permissions)
}
