use std::result::Result;

use thiserror::Error;

/// A single name within a tree object (one path component).
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PathSegment<'a> {
    name: &'a [u8],
}

/// Reasons why a given byte sequence can not be accepted as a tree entry name.
#[derive(Clone, Copy, Debug, Eq, Error, PartialEq)]
pub enum PathSegmentError {
    #[error("empty name")]
    EmptyName,

    #[error("name contains '/'")]
    ContainsSlash,

    #[error("name contains a null byte")]
    ContainsNull,

    #[error("name is '.' or '..'")]
    DotOrDotDot,

    #[error("name is '.git'")]
    DotGit,
}

impl<'a> PathSegment<'a> {
    /// Convert the provided bytes to a `PathSegment` if they are acceptable
    /// as a single entry name inside a tree.
    pub fn new(name: &'a [u8]) -> Result<PathSegment<'a>, PathSegmentError> {
        check_segment(name)?;
        Ok(PathSegment { name })
    }

    /// Return the name.
    pub fn name(&self) -> &[u8] {
        self.name
    }
}

fn check_segment(segment: &[u8]) -> Result<(), PathSegmentError> {
    if segment.is_empty() {
        Err(PathSegmentError::EmptyName)
    } else if segment.contains(&b'/') {
        Err(PathSegmentError::ContainsSlash)
    } else if segment.contains(&0) {
        Err(PathSegmentError::ContainsNull)
    } else if segment == b"." || segment == b".." {
        Err(PathSegmentError::DotOrDotDot)
    } else if segment.eq_ignore_ascii_case(b".git") || segment.eq_ignore_ascii_case(b"git~1") {
        Err(PathSegmentError::DotGit)
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_ordinary_names() {
        assert_eq!(PathSegment::new(b"greek_letters").unwrap().name(), b"greek_letters");
        assert!(PathSegment::new(b".gitignore").is_ok());
        assert!(PathSegment::new(b"...").is_ok());
        assert!(PathSegment::new("caf\u{e9}".as_bytes()).is_ok());
    }

    #[test]
    fn rejects_bad_names() {
        assert_eq!(PathSegment::new(b"").unwrap_err(), PathSegmentError::EmptyName);
        assert_eq!(PathSegment::new(b"a/b").unwrap_err(), PathSegmentError::ContainsSlash);
        assert_eq!(PathSegment::new(b"a\0b").unwrap_err(), PathSegmentError::ContainsNull);
        assert_eq!(PathSegment::new(b".").unwrap_err(), PathSegmentError::DotOrDotDot);
        assert_eq!(PathSegment::new(b"..").unwrap_err(), PathSegmentError::DotOrDotDot);
        assert_eq!(PathSegment::new(b".git").unwrap_err(), PathSegmentError::DotGit);
        assert_eq!(PathSegment::new(b".GIT").unwrap_err(), PathSegmentError::DotGit);
        assert_eq!(PathSegment::new(b"GIT~1").unwrap_err(), PathSegmentError::DotGit);
    }
}
