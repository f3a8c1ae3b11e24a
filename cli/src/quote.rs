/// Quote a path for display the way git does with `core.quotePath` on.
///
/// Paths made only of printable ASCII other than `"` and `\` are returned
/// unchanged. Anything else is wrapped in double quotes with C-style
/// escapes and octal escapes for bytes outside printable ASCII.
pub(crate) fn quote_path(path: &[u8]) -> String {
    if !path.iter().any(|&b| needs_quoting(b)) {
        return String::from_utf8_lossy(path).into_owned();
    }

    let mut out = String::from("\"");
    for &b in path {
        match b {
            0x07 => out.push_str("\\a"),
            0x08 => out.push_str("\\b"),
            b'\t' => out.push_str("\\t"),
            b'\n' => out.push_str("\\n"),
            0x0b => out.push_str("\\v"),
            0x0c => out.push_str("\\f"),
            b'\r' => out.push_str("\\r"),
            b'"' => out.push_str("\\\""),
            b'\\' => out.push_str("\\\\"),
            b if needs_quoting(b) => out.push_str(&format!("\\{:03o}", b)),
            b => out.push(b as char),
        }
    }
    out.push('"');
    out
}

fn needs_quoting(b: u8) -> bool {
    b < 0x20 || b == b'"' || b == b'\\' || b >= 0x7f
}
