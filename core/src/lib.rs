//! This crate implements the core data model for an abstract git repository.
//!
//! Nothing in here touches the file system. Storage lives behind the
//! [`Repo`](repo/trait.Repo.html) trait; see the `gitling_on_disk` crate for
//! the `.git` directory implementation.

pub mod object;
pub mod path;
pub mod repo;
