//! Full-text wildcard patterns.
//!
//! Supports the following wildcards:
//! - `.` matches exactly one character
//! - `.?` matches zero or one character
//! - `.*` matches zero or more characters
//! - `.+` matches one or more characters
//! - `.{m,n}` matches between `m` and `n` characters
//! - `\` makes the next character literal
//!
//! Every other character is literal, and a pattern must match a whole token.

use std::fmt;

use regex::Regex;

use crate::error::{FtError, Result};

/// A compiled wildcard pattern.
///
/// # Examples
///
/// ```
/// use xmlft::query::WildcardPattern;
///
/// let pattern = WildcardPattern::new("colo.?r").unwrap();
/// assert!(pattern.matches("color"));
/// assert!(pattern.matches("colour"));
/// assert!(!pattern.matches("colouur"));
/// ```
#[derive(Debug, Clone)]
pub struct WildcardPattern {
    /// The wildcard pattern.
    pattern: String,
    /// The compiled regex for matching.
    regex: Regex,
}

impl WildcardPattern {
    /// Compile a wildcard pattern.
    pub fn new<S: Into<String>>(pattern: S) -> Result<Self> {
        let pattern = pattern.into();
        let regex = Self::compile_pattern(&pattern)?;
        Ok(WildcardPattern { pattern, regex })
    }

    /// Get the wildcard pattern.
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// Check if a token matches the pattern.
    pub fn matches(&self, token: &str) -> bool {
        self.regex.is_match(token)
    }

    /// Translate a wildcard pattern into an anchored regex.
    fn compile_pattern(pattern: &str) -> Result<Regex> {
        let mut regex_pattern = String::with_capacity(pattern.len() + 8);
        regex_pattern.push('^');

        let mut chars = pattern.chars().peekable();
        while let Some(c) = chars.next() {
            match c {
                '\\' => match chars.next() {
                    Some(escaped) => regex_pattern.push_str(&regex::escape(&escaped.to_string())),
                    None => {
                        return Err(FtError::query(format!(
                            "Wildcard pattern '{pattern}' ends with an escape character"
                        )));
                    }
                },
                '.' => {
                    regex_pattern.push('.');
                    match chars.peek() {
                        Some(&q @ ('?' | '*' | '+')) => {
                            regex_pattern.push(q);
                            chars.next();
                        }
                        Some('{') => {
                            chars.next();
                            let (min, max) = Self::parse_range(&mut chars, pattern)?;
                            regex_pattern.push_str(&format!("{{{min},{max}}}"));
                        }
                        _ => {}
                    }
                }
                c => regex_pattern.push_str(&regex::escape(&c.to_string())),
            }
        }

        regex_pattern.push('$');

        Regex::new(&regex_pattern)
            .map_err(|e| FtError::query(format!("Invalid wildcard pattern '{pattern}': {e}")))
    }

    /// Parse the `m,n}` part of a `.{m,n}` quantifier.
    fn parse_range(
        chars: &mut std::iter::Peekable<std::str::Chars<'_>>,
        pattern: &str,
    ) -> Result<(usize, usize)> {
        let mut body = String::new();
        loop {
            match chars.next() {
                Some('}') => break,
                Some(c) => body.push(c),
                None => {
                    return Err(FtError::query(format!(
                        "Unterminated quantifier in wildcard pattern '{pattern}'"
                    )));
                }
            }
        }

        let invalid = || FtError::query(format!("Invalid quantifier {{{body}}} in '{pattern}'"));
        let (min, max) = body.split_once(',').ok_or_else(invalid)?;
        let min: usize = min.trim().parse().map_err(|_| invalid())?;
        let max: usize = max.trim().parse().map_err(|_| invalid())?;
        if min > max {
            return Err(invalid());
        }
        Ok((min, max))
    }
}

impl fmt::Display for WildcardPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.pattern)
    }
}
