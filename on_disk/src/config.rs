//! Reader for git's configuration file format.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use gitling_core::repo::{Error, Result};

/// Configuration values merged from one or more git config files.
///
/// Keys are stored as `section.key` or `section.subsection.key`. Section and
/// key names are case-insensitive; subsection names are not. When a key is
/// set more than once the last value wins, so files loaded later override
/// files loaded earlier.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Config {
    entries: Vec<(String, String)>,
}

impl Config {
    /// Create an empty configuration.
    pub fn new() -> Config {
        Config::default()
    }

    /// Load the user's global configuration followed by `$GIT_DIR/config`.
    pub fn load_for_repo(git_dir: &Path) -> Result<Config> {
        let mut config = Config::load_global()?;
        config.add_file(&git_dir.join("config"))?;
        Ok(config)
    }

    /// Load the user's global configuration: `$GIT_CONFIG_GLOBAL` if set,
    /// otherwise `$XDG_CONFIG_HOME/git/config` and `~/.gitconfig`.
    pub fn load_global() -> Result<Config> {
        let mut config = Config::new();
        for path in global_paths() {
            config.add_file(&path)?;
        }
        Ok(config)
    }

    /// Merge the contents of the file at `path`. A missing file is ignored.
    pub fn add_file(&mut self, path: &Path) -> Result<()> {
        if !path.is_file() {
            return Ok(());
        }

        let text = fs::read_to_string(path)?;
        self.add_str(&text).map_err(|line| Error::InvalidConfig {
            path: path.to_path_buf(),
            line,
        })
    }

    /// Merge config text. On failure returns the 1-based number of the
    /// offending line.
    pub fn add_str(&mut self, text: &str) -> std::result::Result<(), usize> {
        let mut section: Option<String> = None;
        let mut lines = text.lines().enumerate();

        while let Some((index, line)) = lines.next() {
            let line_no = index + 1;
            let mut rest = line.trim_start();

            if rest.starts_with('[') {
                let close = rest.find(']').ok_or(line_no)?;
                section = Some(parse_section(&rest[1..close]).ok_or(line_no)?);
                rest = rest[close + 1..].trim_start();
            }

            if rest.is_empty() || rest.starts_with('#') || rest.starts_with(';') {
                continue;
            }

            let section = section.as_ref().ok_or(line_no)?;

            let key_len = rest
                .find(|c: char| !(c.is_ascii_alphanumeric() || c == '-'))
                .unwrap_or_else(|| rest.len());
            let key = &rest[..key_len];
            if key.is_empty() || !key.starts_with(|c: char| c.is_ascii_alphabetic()) {
                return Err(line_no);
            }

            let after_key = rest[key_len..].trim_start();
            let value = if after_key.is_empty()
                || after_key.starts_with('#')
                || after_key.starts_with(';')
            {
                "true".to_string()
            } else if let Some(raw) = after_key.strip_prefix('=') {
                let mut parser = ValueParser::default();
                let mut raw = raw;
                // A trailing backslash continues the value on the next line.
                while parser.feed(raw).map_err(|_| line_no)? {
                    match lines.next() {
                        Some((_, next)) => raw = next,
                        None => return Err(line_no),
                    }
                }
                parser.finish().map_err(|_| line_no)?
            } else {
                return Err(line_no);
            };

            self.entries
                .push((format!("{}.{}", section, key.to_ascii_lowercase()), value));
        }

        Ok(())
    }

    /// Return the last value set for `key` (e.g. `user.name`).
    pub fn get(&self, key: &str) -> Option<&str> {
        let key = normalize_key(key);
        self.entries
            .iter()
            .rev()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Interpret the value for `key` as a git boolean.
    pub fn get_bool(&self, key: &str) -> Option<bool> {
        match self.get(key)?.to_ascii_lowercase().as_str() {
            "true" | "yes" | "on" | "1" => Some(true),
            "false" | "no" | "off" | "0" | "" => Some(false),
            _ => None,
        }
    }
}

fn global_paths() -> Vec<PathBuf> {
    if let Some(path) = env::var_os("GIT_CONFIG_GLOBAL") {
        return vec![PathBuf::from(path)];
    }

    let mut paths = Vec::new();
    let home = env::var_os("HOME").map(PathBuf::from);

    match env::var_os("XDG_CONFIG_HOME") {
        Some(xdg) if !xdg.is_empty() => paths.push(PathBuf::from(xdg).join("git/config")),
        _ => {
            if let Some(home) = &home {
                paths.push(home.join(".config/git/config"));
            }
        }
    }

    if let Some(home) = home {
        paths.push(home.join(".gitconfig"));
    }

    paths
}

/// `section`, `section "subsection"`, or the legacy `section.subsection`.
fn parse_section(header: &str) -> Option<String> {
    let header = header.trim();

    if let Some(quote) = header.find('"') {
        let name = header[..quote].trim_end();
        let sub = header[quote + 1..].strip_suffix('"')?;
        if !valid_section_name(name) {
            return None;
        }

        let mut subsection = String::new();
        let mut chars = sub.chars();
        while let Some(c) = chars.next() {
            match c {
                '\\' => subsection.push(chars.next()?),
                '"' => return None,
                c => subsection.push(c),
            }
        }

        Some(format!("{}.{}", name.to_ascii_lowercase(), subsection))
    } else if let Some(dot) = header.find('.') {
        let name = &header[..dot];
        if !valid_section_name(name) {
            return None;
        }
        Some(format!(
            "{}.{}",
            name.to_ascii_lowercase(),
            header[dot + 1..].to_ascii_lowercase()
        ))
    } else if valid_section_name(header) {
        Some(header.to_ascii_lowercase())
    } else {
        None
    }
}

fn valid_section_name(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '.')
}

/// Decodes a value, one physical line at a time.
#[derive(Default)]
struct ValueParser {
    value: String,
    pending_space: String,
    in_quotes: bool,
}

impl ValueParser {
    /// Returns `Ok(true)` if the line ended with a continuation backslash.
    fn feed(&mut self, line: &str) -> std::result::Result<bool, ()> {
        let mut chars = line.chars();

        while let Some(c) = chars.next() {
            match c {
                '"' => {
                    self.flush_space();
                    self.in_quotes = !self.in_quotes;
                }
                '#' | ';' if !self.in_quotes => break,
                '\\' => {
                    let escaped = match chars.next() {
                        None => return Ok(true),
                        Some('n') => '\n',
                        Some('t') => '\t',
                        Some('b') => '\u{8}',
                        Some('\\') => '\\',
                        Some('"') => '"',
                        Some(_) => return Err(()),
                    };
                    self.flush_space();
                    self.value.push(escaped);
                }
                c if c.is_whitespace() && !self.in_quotes => {
                    // Leading whitespace is dropped; inner runs are kept.
                    if !self.value.is_empty() {
                        self.pending_space.push(c);
                    }
                }
                c => {
                    self.flush_space();
                    self.value.push(c);
                }
            }
        }

        Ok(false)
    }

    fn flush_space(&mut self) {
        self.value.push_str(&self.pending_space);
        self.pending_space.clear();
    }

    fn finish(self) -> std::result::Result<String, ()> {
        if self.in_quotes {
            Err(())
        } else {
            Ok(self.value)
        }
    }
}

fn normalize_key(key: &str) -> String {
    match (key.find('.'), key.rfind('.')) {
        (Some(first), Some(last)) if first != last => format!(
            "{}{}{}",
            key[..first].to_ascii_lowercase(),
            &key[first..last],
            key[last..].to_ascii_lowercase()
        ),
        _ => key.to_ascii_lowercase(),
    }
}
