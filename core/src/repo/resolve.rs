use tracing::debug;

use super::{Error, RefTarget, Repo, Result};
use crate::object::{is_hex, Id, Kind, Object, HEX_LEN};
use crate::path::check_ref_name;

/// Shortest hex prefix accepted as an abbreviated object ID.
pub const MIN_PREFIX_LEN: usize = 4;

/// Longest chain of symbolic refs followed before giving up.
pub const MAX_SYMREF_HOPS: usize = 5;

pub(crate) fn resolve_ref<R: Repo + ?Sized>(repo: &R, name: &str) -> Result<Option<Id>> {
    let mut current = name.to_string();

    for _ in 0..=MAX_SYMREF_HOPS {
        match repo.read_ref(&current)? {
            None => return Ok(None),
            Some(RefTarget::Direct(id)) => return Ok(Some(id)),
            Some(RefTarget::Symbolic(next)) => current = next,
        }
    }

    Err(Error::SymbolicRefLoop(name.to_string()))
}

pub(crate) fn resolve<R: Repo + ?Sized>(repo: &R, name: &str) -> Result<Id> {
    if name.is_empty() {
        return Err(Error::UnknownRevision(name.to_string()));
    }

    if name == "HEAD" {
        return repo
            .resolve_ref("HEAD")?
            .ok_or_else(|| Error::UnknownRevision(name.to_string()));
    }

    if name.len() <= HEX_LEN && name.len() >= MIN_PREFIX_LEN && is_hex(name) {
        let prefix = name.to_ascii_lowercase();

        if prefix.len() == HEX_LEN {
            if let Ok(id) = Id::from_hex(&prefix) {
                if repo.has_object(&id)? {
                    debug!(rev = name, id = %id, "resolved full object ID");
                    return Ok(id);
                }
            }
        }

        let mut candidates = repo.find_objects_with_prefix(&prefix)?;
        debug!(rev = name, matches = candidates.len(), "scanned object ID prefix");

        match candidates.len() {
            0 => (),
            1 => return Ok(candidates.remove(0)),
            _ => {
                return Err(Error::AmbiguousReference {
                    name: name.to_string(),
                    candidates,
                })
            }
        }
    }

    let mut ref_names = vec![
        format!("refs/tags/{}", name),
        format!("refs/heads/{}", name),
        format!("refs/{}", name),
    ];
    if name.starts_with("refs/") {
        ref_names.push(name.to_string());
    }

    for ref_name in ref_names {
        if check_ref_name(&ref_name).is_err() {
            continue;
        }

        if let Some(id) = repo.resolve_ref(&ref_name)? {
            debug!(rev = name, ref_name = %ref_name, id = %id, "resolved ref");
            return Ok(id);
        }
    }

    Err(Error::UnknownRevision(name.to_string()))
}

pub(crate) fn rev_parse<R: Repo + ?Sized>(repo: &R, spec: &str) -> Result<Id> {
    let (base, peel_to) = match split_peel_suffix(spec) {
        Some(split) => split,
        None => return repo.resolve(spec),
    };

    let id = repo.rev_parse(base)?;

    match peel_to {
        "" => Ok(repo.peel_tags(&id)?.0),
        "object" => Ok(id),
        kind => match kind.parse::<Kind>() {
            Ok(kind) => repo.peel(&id, kind),
            Err(_) => Err(Error::UnknownRevision(spec.to_string())),
        },
    }
}

/// Splits `rev^{kind}` into `("rev", "kind")`.
fn split_peel_suffix(spec: &str) -> Option<(&str, &str)> {
    let inner = spec.strip_suffix('}')?;
    let open = inner.rfind("^{")?;
    Some((&inner[..open], &inner[open + 2..]))
}

pub(crate) fn peel_tags<R: Repo + ?Sized>(repo: &R, id: &Id) -> Result<(Id, Kind)> {
    let mut id = *id;

    loop {
        match repo.read_object(&id)? {
            Object::Tag(tag) => {
                let target = tag.object().map_err(|err| Error::from_parse(&id, err))?;
                debug!(tag = %id, target = %target, "peeled tag");
                id = target;
            }
            other => return Ok((id, other.kind())),
        }
    }
}

pub(crate) fn peel<R: Repo + ?Sized>(repo: &R, id: &Id, wanted: Kind) -> Result<Id> {
    let mut id = *id;

    loop {
        let object = repo.read_object(&id)?;
        let actual = object.kind();

        if actual == wanted {
            return Ok(id);
        }

        id = match object {
            Object::Tag(tag) => tag.object().map_err(|err| Error::from_parse(&id, err))?,
            Object::Commit(commit) if wanted == Kind::Tree => {
                commit.tree().map_err(|err| Error::from_parse(&id, err))?
            }
            _ => {
                return Err(Error::WrongKind {
                    id,
                    actual,
                    wanted,
                })
            }
        };
    }
}
