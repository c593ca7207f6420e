//! Environment variable expansion for paths and arguments.
//!
//! Three reference forms are recognised:
//!
//! - `${NAME}` - braced, POSIX style
//! - `$NAME` - bare, POSIX style
//! - `%NAME%` - Windows batch style, matched case-insensitively
//!
//! References to variables missing from the environment are kept verbatim,
//! so expanding a string with no resolvable references returns it unchanged.
//!
//! # Example
//!
//! ```
//! use exerun::config::expand_env;
//! use std::collections::HashMap;
//!
//! let mut env = HashMap::new();
//! env.insert("WORKSPACE".to_string(), "/ws".to_string());
//! assert_eq!(expand_env("--input=%WORKSPACE%/a.txt", &env), "--input=/ws/a.txt");
//! ```

use std::collections::HashMap;

/// A segment of a string that may contain variable references.
#[derive(Debug, Clone, PartialEq)]
pub enum Segment {
    /// Literal text
    Literal(String),
    /// Variable reference, with the exact source text it was parsed from
    Variable { name: String, raw: String },
}

fn is_name_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

fn is_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// Parse a string into literal and variable segments.
pub fn parse_references(input: &str) -> Vec<Segment> {
    let chars: Vec<char> = input.chars().collect();
    let mut segments = Vec::new();
    let mut literal = String::new();
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        let reference = match c {
            '$' => parse_dollar(&chars, i),
            '%' => parse_percent(&chars, i),
            _ => None,
        };

        match reference {
            Some((name, end)) => {
                if !literal.is_empty() {
                    segments.push(Segment::Literal(std::mem::take(&mut literal)));
                }
                let raw: String = chars[i..end].iter().collect();
                segments.push(Segment::Variable { name, raw });
                i = end;
            }
            None => {
                literal.push(c);
                i += 1;
            }
        }
    }

    if !literal.is_empty() {
        segments.push(Segment::Literal(literal));
    }

    segments
}

/// `${NAME}` or `$NAME` starting at `start`; returns the name and the end index.
fn parse_dollar(chars: &[char], start: usize) -> Option<(String, usize)> {
    match chars.get(start + 1) {
        Some('{') => {
            let close = chars[start + 2..].iter().position(|&c| c == '}')? + start + 2;
            let name: String = chars[start + 2..close].iter().collect();
            if name.is_empty() || !name.chars().all(is_name_char) {
                return None;
            }
            Some((name, close + 1))
        }
        Some(&c) if is_name_start(c) => {
            let mut end = start + 1;
            while end < chars.len() && is_name_char(chars[end]) {
                end += 1;
            }
            Some((chars[start + 1..end].iter().collect(), end))
        }
        _ => None,
    }
}

/// `%NAME%` starting at `start`.
fn parse_percent(chars: &[char], start: usize) -> Option<(String, usize)> {
    let first = *chars.get(start + 1)?;
    if !is_name_start(first) {
        return None;
    }
    let close = chars[start + 1..].iter().position(|&c| c == '%')? + start + 1;
    let name: String = chars[start + 1..close].iter().collect();
    if !name.chars().all(is_name_char) {
        return None;
    }
    Some((name, close + 1))
}

/// Look up `name` for a reference written as `raw`.
///
/// `%NAME%` references follow batch semantics and ignore case when no exact
/// match exists; `$` references are case-sensitive.
fn lookup<'a>(env: &'a HashMap<String, String>, name: &str, raw: &str) -> Option<&'a String> {
    env.get(name).or_else(|| {
        if raw.starts_with('%') {
            env.iter()
                .find(|(key, _)| key.eq_ignore_ascii_case(name))
                .map(|(_, value)| value)
        } else {
            None
        }
    })
}

/// Substitute environment variable references using `env`.
///
/// Never fails: unknown references are left as written.
pub fn expand_env(input: &str, env: &HashMap<String, String>) -> String {
    let mut result = String::with_capacity(input.len());

    for segment in parse_references(input) {
        match segment {
            Segment::Literal(text) => result.push_str(&text),
            Segment::Variable { name, raw } => match lookup(env, &name, &raw) {
                Some(value) => result.push_str(value),
                None => result.push_str(&raw),
            },
        }
    }

    result
}
