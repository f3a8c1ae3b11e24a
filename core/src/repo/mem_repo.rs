use std::cell::RefCell;
use std::collections::BTreeMap;

use super::{Error, RefTarget, Repo, Result};
use crate::object::{hash, Id, Kind};

/// A repository held entirely in memory.
///
/// Useful for tests and for staging objects before deciding where they
/// should live. A new `MemRepo` has `HEAD` pointing at the unborn branch
/// `master`.
#[derive(Debug)]
pub struct MemRepo {
    objects: RefCell<BTreeMap<Id, (Kind, Vec<u8>)>>,
    refs: RefCell<BTreeMap<String, RefTarget>>,
}

impl MemRepo {
    pub fn new() -> MemRepo {
        let mut refs = BTreeMap::new();
        refs.insert(
            "HEAD".to_string(),
            RefTarget::Symbolic("refs/heads/master".to_string()),
        );

        MemRepo {
            objects: RefCell::new(BTreeMap::new()),
            refs: RefCell::new(refs),
        }
    }

    /// Returns the number of stored objects.
    pub fn object_count(&self) -> usize {
        self.objects.borrow().len()
    }
}

impl Default for MemRepo {
    fn default() -> Self {
        MemRepo::new()
    }
}

impl Repo for MemRepo {
    fn put_object(&self, kind: Kind, body: &[u8]) -> Result<Id> {
        let id = hash(kind, body);
        self.objects
            .borrow_mut()
            .entry(id)
            .or_insert_with(|| (kind, body.to_vec()));
        Ok(id)
    }

    fn get_raw_object(&self, id: &Id) -> Result<(Kind, Vec<u8>)> {
        self.objects
            .borrow()
            .get(id)
            .cloned()
            .ok_or(Error::ObjectNotFound(*id))
    }

    fn has_object(&self, id: &Id) -> Result<bool> {
        Ok(self.objects.borrow().contains_key(id))
    }

    fn find_objects_with_prefix(&self, prefix: &str) -> Result<Vec<Id>> {
        Ok(self
            .objects
            .borrow()
            .keys()
            .filter(|id| id.has_hex_prefix(prefix))
            .copied()
            .collect())
    }

    fn read_ref(&self, name: &str) -> Result<Option<RefTarget>> {
        Ok(self.refs.borrow().get(name).cloned())
    }

    fn write_ref(&self, name: &str, target: &RefTarget) -> Result<()> {
        self.refs
            .borrow_mut()
            .insert(name.to_string(), target.clone());
        Ok(())
    }

    fn ref_names(&self, prefix: &str) -> Result<Vec<String>> {
        Ok(self
            .refs
            .borrow()
            .keys()
            .filter(|name| name.starts_with(prefix))
            .cloned()
            .collect())
    }
}
