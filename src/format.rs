//! Numeric patterns for auto text.
//!
//! A pattern is an optional literal prefix, a run of digit placeholders and
//! an optional literal suffix: `"#,##0"`, `"000"`, `"'Page '0"`, `"0 pages"`.
//!
//! * `0`: a mandatory digit (zero padded)
//! * `#`: an optional digit
//! * `,`: grouping separator; the group size is the number of placeholders
//!   after the last one
//! * `.`: decimal separator; `0`s after it print as trailing zeros
//! * `'...'`: quoted literal, `''` is a single quote
//! * `;`: starts the negative subpattern, which page counts never need and
//!   is ignored
//!
//! An empty pattern prints the plain number.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PatternError {
    #[error("unterminated quote in pattern {0:?}")]
    UnterminatedQuote(String),
    #[error("pattern {0:?} has no digit placeholder")]
    NoDigits(String),
    #[error("pattern {0:?} has more than one decimal separator")]
    MultipleDecimalSeparators(String),
    #[error("pattern {0:?} has digit placeholders after its suffix")]
    SplitDigits(String),
    #[error("pattern {0:?} ends its integer part with a grouping separator")]
    TrailingGrouping(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Token {
    Literal(char),
    Special(char),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Prefix,
    Number,
    Suffix,
}

/// A parsed numeric pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NumberPattern {
    prefix: String,
    suffix: String,
    min_integer: usize,
    grouping: Option<usize>,
    min_fraction: usize,
}

impl Default for NumberPattern {
    fn default() -> Self {
        Self {
            prefix: String::new(),
            suffix: String::new(),
            min_integer: 1,
            grouping: None,
            min_fraction: 0,
        }
    }
}

impl NumberPattern {
    pub fn parse(pattern: &str) -> Result<Self, PatternError> {
        let tokens = tokenize(pattern)?;
        if tokens.is_empty() {
            return Ok(Self::default());
        }

        let mut prefix = String::new();
        let mut suffix = String::new();
        let mut number = String::new();
        let mut phase = Phase::Prefix;

        for token in tokens {
            match token {
                Token::Literal(';') if phase != Phase::Prefix => break,
                Token::Literal(c) => {
                    if phase == Phase::Number {
                        phase = Phase::Suffix;
                    }
                    match phase {
                        Phase::Prefix => prefix.push(c),
                        _ => suffix.push(c),
                    }
                }
                Token::Special(c) => {
                    if phase == Phase::Suffix {
                        return Err(PatternError::SplitDigits(pattern.to_string()));
                    }
                    phase = Phase::Number;
                    number.push(c);
                }
            }
        }

        if number.is_empty() {
            return Err(PatternError::NoDigits(pattern.to_string()));
        }

        let mut parts = number.split('.');
        let integer = parts.next().unwrap_or("");
        let fraction = parts.next();
        if parts.next().is_some() {
            return Err(PatternError::MultipleDecimalSeparators(pattern.to_string()));
        }
        if integer.ends_with(',') {
            return Err(PatternError::TrailingGrouping(pattern.to_string()));
        }

        let grouping = integer
            .rfind(',')
            .map(|pos| integer.len() - pos - 1)
            .filter(|&size| size > 0);

        Ok(Self {
            prefix,
            suffix,
            min_integer: integer.chars().filter(|&c| c == '0').count(),
            grouping,
            min_fraction: fraction.map_or(0, |f| f.chars().filter(|&c| c == '0').count()),
        })
    }

    pub fn format(&self, value: u64) -> String {
        let mut digits = value.to_string();
        if digits.len() < self.min_integer {
            digits = format!("{}{}", "0".repeat(self.min_integer - digits.len()), digits);
        }

        let integer = match self.grouping {
            Some(size) => group_digits(&digits, size),
            None => digits,
        };

        let mut out = String::with_capacity(self.prefix.len() + integer.len() + self.suffix.len());
        out.push_str(&self.prefix);
        out.push_str(&integer);
        if self.min_fraction > 0 {
            out.push('.');
            out.push_str(&"0".repeat(self.min_fraction));
        }
        out.push_str(&self.suffix);
        out
    }
}

/// Format `value` with `pattern` in one step.
pub fn format_number(value: u64, pattern: &str) -> Result<String, PatternError> {
    Ok(NumberPattern::parse(pattern)?.format(value))
}

fn tokenize(pattern: &str) -> Result<Vec<Token>, PatternError> {
    let mut tokens = Vec::new();
    let mut chars = pattern.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '\'' => {
                if chars.peek() == Some(&'\'') {
                    chars.next();
                    tokens.push(Token::Literal('\''));
                    continue;
                }
                let mut closed = false;
                while let Some(q) = chars.next() {
                    if q == '\'' {
                        if chars.peek() == Some(&'\'') {
                            chars.next();
                            tokens.push(Token::Literal('\''));
                        } else {
                            closed = true;
                            break;
                        }
                    } else {
                        tokens.push(Token::Literal(q));
                    }
                }
                if !closed {
                    return Err(PatternError::UnterminatedQuote(pattern.to_string()));
                }
            }
            '0' | '#' | ',' | '.' => tokens.push(Token::Special(c)),
            other => tokens.push(Token::Literal(other)),
        }
    }

    Ok(tokens)
}

fn group_digits(digits: &str, size: usize) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / size);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (len - i) % size == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
