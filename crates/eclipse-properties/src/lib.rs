//! A small parser for Java `.properties` files.
//!
//! Eclipse stores workspace preferences (`*.prefs`) in this format, written by
//! `java.util.Properties::store`. That means values may contain escaped
//! separators (`\:`, `\=`), escaped newlines and `\uXXXX` escapes, and long
//! values (embedded XML documents) may span several physical lines joined by a
//! trailing backslash.

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PropertyEntry {
    pub key: String,
    pub value: String,
    /// 1-based line on which the logical line started.
    pub line: usize,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PropertiesFile {
    pub entries: Vec<PropertyEntry>,
}

impl PropertiesFile {
    /// Returns the effective value for `key`.
    ///
    /// Like `java.util.Properties`, a later definition overrides an earlier one.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .rev()
            .find(|e| e.key == key)
            .map(|e| e.value.as_str())
    }

    /// Iterates `(suffix, value)` pairs for every key that starts with `prefix`.
    ///
    /// Entries are yielded in file order; duplicate keys are yielded more than
    /// once, callers that store into a map get last-wins semantics for free.
    pub fn with_prefix<'a>(
        &'a self,
        prefix: &'a str,
    ) -> impl Iterator<Item = (&'a str, &'a str)> + 'a {
        self.entries.iter().filter_map(move |e| {
            e.key
                .strip_prefix(prefix)
                .map(|suffix| (suffix, e.value.as_str()))
        })
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Parse a `.properties` file into key/value entries.
#[must_use]
pub fn parse(text: &str) -> PropertiesFile {
    let lines: Vec<&str> = text.split('\n').collect();
    let mut entries = Vec::new();
    let mut idx = 0usize;

    while idx < lines.len() {
        let start_line = idx + 1;
        let logical = read_logical_line(&lines, &mut idx);
        if let Some((key, value)) = parse_logical_line(&logical) {
            entries.push(PropertyEntry {
                key,
                value,
                line: start_line,
            });
        }
    }

    PropertiesFile { entries }
}

/// Parse raw bytes, as stored on disk.
///
/// `Properties::store` writes ISO-8859-1, so bytes that are not valid UTF-8 are
/// decoded one byte per character instead of being rejected.
#[must_use]
pub fn parse_bytes(bytes: &[u8]) -> PropertiesFile {
    match std::str::from_utf8(bytes) {
        Ok(text) => parse(text),
        Err(_) => {
            let text: String = bytes.iter().map(|&b| b as char).collect();
            parse(&text)
        }
    }
}

fn read_logical_line(lines: &[&str], idx: &mut usize) -> String {
    let mut out = String::new();
    let mut first = true;

    while *idx < lines.len() {
        let raw = lines[*idx].strip_suffix('\r').unwrap_or(lines[*idx]);
        *idx += 1;

        // Comment lines never continue, even when they end in a backslash.
        let segment = if first {
            raw
        } else {
            raw.trim_start_matches(is_whitespace)
        };
        if first && is_comment(segment) {
            return String::new();
        }
        first = false;

        if ends_with_unescaped_backslash(segment) {
            out.push_str(&segment[..segment.len() - 1]);
            continue;
        }

        out.push_str(segment);
        break;
    }

    out
}

fn is_comment(line: &str) -> bool {
    matches!(
        line.trim_start_matches(is_whitespace).chars().next(),
        Some('#') | Some('!')
    )
}

fn ends_with_unescaped_backslash(line: &str) -> bool {
    let backslashes = line.chars().rev().take_while(|&c| c == '\\').count();
    backslashes % 2 == 1
}

fn parse_logical_line(line: &str) -> Option<(String, String)> {
    let chars: Vec<char> = line.chars().collect();
    let mut i = 0usize;
    while i < chars.len() && is_whitespace(chars[i]) {
        i += 1;
    }
    if i >= chars.len() {
        return None;
    }

    let key_start = i;
    while i < chars.len() {
        match chars[i] {
            '\\' => i += 2,
            '=' | ':' => break,
            c if is_whitespace(c) => break,
            _ => i += 1,
        }
    }
    let key_end = i.min(chars.len());

    while i < chars.len() && is_whitespace(chars[i]) {
        i += 1;
    }
    if i < chars.len() && (chars[i] == '=' || chars[i] == ':') {
        i += 1;
    }
    while i < chars.len() && is_whitespace(chars[i]) {
        i += 1;
    }

    let key = unescape(&chars[key_start..key_end]);
    let value = unescape(&chars[i.min(chars.len())..]);
    Some((key, value))
}

fn is_whitespace(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\x0C')
}

fn unescape(chars: &[char]) -> String {
    let mut out = String::with_capacity(chars.len());
    let mut i = 0usize;

    while i < chars.len() {
        let c = chars[i];
        if c != '\\' {
            out.push(c);
            i += 1;
            continue;
        }

        i += 1;
        let Some(&escaped) = chars.get(i) else {
            break;
        };

        match escaped {
            't' => out.push('\t'),
            'n' => out.push('\n'),
            'r' => out.push('\r'),
            'f' => out.push('\x0C'),
            'u' => {
                let hex: String = chars.iter().skip(i + 1).take(4).collect();
                match u32::from_str_radix(&hex, 16).ok().and_then(char::from_u32) {
                    Some(decoded) if hex.len() == 4 => {
                        out.push(decoded);
                        i += 4;
                    }
                    _ => out.push('u'),
                }
            }
            other => out.push(other),
        }
        i += 1;
    }

    out
}
