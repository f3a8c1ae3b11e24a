use std::cmp::{self, Ordering};

use super::FileMode;

/// Represents the tuple of a tree entry name (an uninterpreted sequence of
/// bytes, not necessarily UTF-8) and its git file mode.
///
/// Ordering follows git's canonical tree order: names compare byte-wise,
/// except that a tree's name compares as though it ended with `/`. So
/// `a.txt` sorts before the tree `a` (`.` < `/`) while the file `a` sorts
/// before both.
#[derive(Debug, Eq, PartialEq)]
pub struct PathMode<'a> {
    pub path: &'a [u8],
    pub mode: FileMode,
}

impl<'a> PathMode<'a> {
    /// Compare two paths, checking for identical name.
    ///
    /// Unlike `cmp()`, this function returns `Equal` when the paths have
    /// the same characters in their names, even if the mode differs. It is
    /// intended for use in validation routines detecting duplicate entries.
    ///
    /// ### Return Value
    ///
    /// * `Less` if no duplicate name could exist. (All possible occurrences
    ///   of `self` sort before `other` and no conflict can happen.)
    /// * `Equal` if the paths have the same name.
    /// * `Greater` if `other`'s path should still be checked by caller.
    ///   (A duplicate of `self` as a tree could still appear after `other`.)
    pub fn cmp_same_name(&self, other: &PathMode) -> Ordering {
        let self_as_tree = PathMode {
            path: self.path,
            mode: FileMode::Tree,
        };
        core_compare(&self_as_tree, other)
    }
}

impl<'a> Ord for PathMode<'a> {
    fn cmp(&self, other: &PathMode) -> Ordering {
        match core_compare(self, other) {
            Ordering::Equal => mode_compare(self.mode, other.mode),
            x => x,
        }
    }
}

impl<'a> PartialOrd for PathMode<'a> {
    fn partial_cmp(&self, other: &PathMode) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

fn core_compare(left: &PathMode, right: &PathMode) -> Ordering {
    if left.path == right.path {
        Ordering::Equal
    } else {
        let l = cmp::min(left.path.len(), right.path.len());

        match left.path[..l].cmp(&right.path[..l]) {
            Ordering::Equal => (),
            non_eq => return non_eq,
        }

        let lsuffix = suffix_or_slash(&left.path[l..], left.mode);
        let rsuffix = suffix_or_slash(&right.path[l..], right.mode);

        lsuffix.cmp(rsuffix)
    }
}

const EMPTY: [u8; 0] = [];
const SLASH: [u8; 1] = [b'/'];

fn suffix_or_slash(suffix: &[u8], mode: FileMode) -> &[u8] {
    if !suffix.is_empty() || mode != FileMode::Tree {
        suffix
    } else {
        &SLASH
    }
}

fn mode_compare(m1: FileMode, m2: FileMode) -> Ordering {
    if m1 == FileMode::Submodule || m2 == FileMode::Submodule {
        Ordering::Equal
    } else {
        let lsuffix = suffix_or_slash(&EMPTY, m1);
        let rsuffix = suffix_or_slash(&EMPTY, m2);
        lsuffix.cmp(rsuffix)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file(path: &[u8]) -> PathMode {
        PathMode {
            path,
            mode: FileMode::Normal,
        }
    }

    fn tree(path: &[u8]) -> PathMode {
        PathMode {
            path,
            mode: FileMode::Tree,
        }
    }

    #[test]
    fn cmp_simple_case() {
        assert_eq!(file(b"abc").cmp(&file(b"def")), Ordering::Less);
        assert_eq!(file(b"abc").cmp(&file(b"aba")), Ordering::Greater);
    }

    #[test]
    fn cmp_lengths_mismatch() {
        assert_eq!(file(b"abc").cmp(&file(b"ab")), Ordering::Greater);
        assert_eq!(file(b"ab").cmp(&file(b"aba")), Ordering::Less);
    }

    #[test]
    fn cmp_exact_match() {
        assert_eq!(file(b"abc").cmp(&file(b"abc")), Ordering::Equal);
    }

    #[test]
    fn cmp_match_except_file_mode() {
        assert_eq!(tree(b"abc").cmp(&file(b"abc")), Ordering::Greater);
        assert_eq!(file(b"abc").cmp(&tree(b"abc")), Ordering::Less);
    }

    #[test]
    fn tree_sorts_as_if_slash_suffixed() {
        // '.' (0x2e) < '/' (0x2f) < '0' (0x30)
        assert_eq!(file(b"a.txt").cmp(&tree(b"a")), Ordering::Less);
        assert_eq!(tree(b"a").cmp(&file(b"a0")), Ordering::Less);
        assert_eq!(file(b"a").cmp(&file(b"a.txt")), Ordering::Less);
        assert_eq!(tree(b"a").cmp(&file(b"b")), Ordering::Less);
    }

    #[test]
    fn submodule_sorts_as_file() {
        let sub = PathMode {
            path: b"a",
            mode: FileMode::Submodule,
        };
        assert_eq!(sub.cmp(&file(b"a.txt")), Ordering::Less);
    }

    #[test]
    fn cmp_same_name() {
        assert_eq!(file(b"a").cmp_same_name(&tree(b"a")), Ordering::Equal);
        assert_eq!(file(b"a").cmp_same_name(&file(b"a.txt")), Ordering::Greater);
        assert_eq!(file(b"a").cmp_same_name(&file(b"b")), Ordering::Less);
    }
}
