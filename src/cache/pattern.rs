//! Glob Pattern Matching
//!
//! Translates Redis-style key patterns into anchored regular expressions so the
//! memory store lists keys with the same semantics as `KEYS` on a Redis server.
//!
//! Supported syntax:
//! - `*` matches any run of characters, including `:`
//! - `?` matches exactly one character
//! - `[abc]`, `[a-z]`, `[^a]` / `[!a]` match character classes
//! - `\x` matches `x` literally

use regex::Regex;

use crate::cache::store::{StoreError, StoreResult};

/// Compiled key pattern.
#[derive(Debug, Clone)]
pub struct KeyPattern {
    regex: Regex,
}

impl KeyPattern {
    /// Compiles a glob pattern.
    pub fn compile(pattern: &str) -> StoreResult<Self> {
        let source = glob_to_regex(pattern)?;
        let regex = Regex::new(&source)
            .map_err(|e| StoreError::InvalidPattern(format!("{pattern}: {e}")))?;
        Ok(Self { regex })
    }

    /// Returns true if `key` matches the whole pattern.
    pub fn matches(&self, key: &str) -> bool {
        self.regex.is_match(key)
    }
}

/// Escapes glob metacharacters so `value` only matches itself.
pub fn escape_glob(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        if matches!(c, '*' | '?' | '[' | ']' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

fn glob_to_regex(pattern: &str) -> StoreResult<String> {
    let mut out = String::with_capacity(pattern.len() * 2 + 2);
    out.push('^');

    let mut chars = pattern.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '*' => out.push_str(".*"),
            '?' => out.push('.'),
            '\\' => match chars.next() {
                Some(next) => out.push_str(&regex::escape(&next.to_string())),
                None => out.push_str(r"\\"),
            },
            '[' => {
                out.push('[');
                if matches!(chars.peek(), Some('^') | Some('!')) {
                    chars.next();
                    out.push('^');
                }
                let mut closed = false;
                let mut empty = true;
                while let Some(class_char) = chars.next() {
                    match class_char {
                        ']' if !empty => {
                            closed = true;
                            break;
                        }
                        '\\' => {
                            let literal = chars.next().unwrap_or('\\');
                            out.push_str(&escape_class_char(literal));
                        }
                        '-' => out.push('-'),
                        other => out.push_str(&escape_class_char(other)),
                    }
                    empty = false;
                }
                if !closed {
                    return Err(StoreError::InvalidPattern(format!(
                        "unterminated character class in '{pattern}'"
                    )));
                }
                out.push(']');
            }
            other => out.push_str(&regex::escape(&other.to_string())),
        }
    }

    out.push('$');
    Ok(out)
}

fn escape_class_char(c: char) -> String {
    match c {
        '[' | ']' | '\\' | '^' | '&' | '~' => format!("\\{c}"),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matches(pattern: &str, key: &str) -> bool {
        KeyPattern::compile(pattern).unwrap().matches(key)
    }

    #[test]
    fn test_star_spans_separators() {
        assert!(matches("dashboard:*", "dashboard:trends:u1:revenue"));
        assert!(matches("dashboard:*:u1", "dashboard:metrics:u1"));
        assert!(!matches("dashboard:*:u1", "dashboard:metrics:u12"));
    }

    #[test]
    fn test_question_mark_matches_single_char() {
        assert!(matches("user:?", "user:a"));
        assert!(!matches("user:?", "user:ab"));
    }

    #[test]
    fn test_character_classes() {
        assert!(matches("h[ae]llo", "hello"));
        assert!(matches("h[a-c]llo", "hbllo"));
        assert!(!matches("h[^e]llo", "hello"));
        assert!(matches("h[!e]llo", "hallo"));
    }

    #[test]
    fn test_regex_metacharacters_are_literal() {
        assert!(matches("price:9.99", "price:9.99"));
        assert!(!matches("price:9.99", "price:9x99"));
        assert!(matches("a+b(c)", "a+b(c)"));
    }

    #[test]
    fn test_escaped_glob_characters() {
        assert!(matches(r"key:\*", "key:*"));
        assert!(!matches(r"key:\*", "key:abc"));
    }

    #[test]
    fn test_escape_glob_round_trip() {
        let user = "we*ird?[id]";
        let pattern = format!("dashboard:{}", escape_glob(user));
        assert!(matches(&pattern, "dashboard:we*ird?[id]"));
        assert!(!matches(&pattern, "dashboard:weXXird?[id]"));
    }

    #[test]
    fn test_unterminated_class_is_rejected() {
        let result = KeyPattern::compile("key:[abc");
        assert!(matches!(result, Err(StoreError::InvalidPattern(_))));
    }
}
