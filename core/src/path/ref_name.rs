/// Checks a ref name (e.g. `refs/heads/main`) against git's
/// `check-ref-format` rules.
///
/// Returns a description of the first rule broken.
pub fn check_ref_name(name: &str) -> Result<(), &'static str> {
    if name.is_empty() {
        return Err("name is empty");
    }

    if name == "@" {
        return Err("name is '@'");
    }

    if name.starts_with('/') || name.ends_with('/') {
        return Err("name begins or ends with '/'");
    }

    if name.ends_with('.') {
        return Err("name ends with '.'");
    }

    if name.contains("..") {
        return Err("name contains '..'");
    }

    if name.contains("@{") {
        return Err("name contains '@{'");
    }

    if name.contains("//") {
        return Err("name contains '//'");
    }

    for c in name.chars() {
        match c {
            '\0'..='\x20' | '\x7f' => return Err("name contains a control character or space"),
            '~' | '^' | ':' | '?' | '*' | '[' | '\\' => {
                return Err("name contains one of ~ ^ : ? * [ \\")
            }
            _ => (),
        }
    }

    for component in name.split('/') {
        if component.starts_with('.') {
            return Err("a component begins with '.'");
        }
        if component.ends_with(".lock") {
            return Err("a component ends with '.lock'");
        }
    }

    Ok(())
}
