//! Message text normalization for commits and tags.

/// Normalizes a free-form message the way `git tag` and `git commit` do by
/// default (`--cleanup=strip`):
///
/// * lines starting with `#` are dropped,
/// * trailing whitespace is removed from every line,
/// * runs of blank lines collapse into one and leading/trailing blank
///   lines disappear,
/// * the last line is terminated with a newline.
///
/// A message with no content left returns an empty vector.
pub fn cleanup_message(raw: &[u8]) -> Vec<u8> {
    let mut out = Vec::new();
    let mut pending_blank = false;

    for line in raw.split(|&b| b == b'\n') {
        if line.first() == Some(&b'#') {
            continue;
        }

        let end = line
            .iter()
            .rposition(|b| !is_space(*b))
            .map_or(0, |n| n + 1);
        let line = &line[..end];

        if line.is_empty() {
            pending_blank = !out.is_empty();
            continue;
        }

        if pending_blank {
            out.push(b'\n');
            pending_blank = false;
        }

        out.extend_from_slice(line);
        out.push(b'\n');
    }

    out
}

/// Joins `-m` arguments into one message: each paragraph is terminated
/// with a newline and consecutive paragraphs are separated by a blank line.
/// No other normalization happens.
pub fn join_paragraphs<S: AsRef<[u8]>>(paragraphs: &[S]) -> Vec<u8> {
    let mut out = Vec::new();

    for paragraph in paragraphs {
        if !out.is_empty() {
            out.push(b'\n');
        }
        out.extend_from_slice(paragraph.as_ref());
        if !out.is_empty() && out.last() != Some(&b'\n') {
            out.push(b'\n');
        }
    }

    out
}

fn is_space(b: u8) -> bool {
    matches!(b, b' ' | b'\t' | b'\n' | b'\r' | 0x0b | 0x0c)
}
