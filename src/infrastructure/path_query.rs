// Path query expressions over JSON records
//
// Grammar: dotted field names with optional `[n]` index suffixes, e.g.
// `sources.SinusSource.values.sinus.value` or `readings[-1].value`.
// Field names that are not plain identifiers can be double-quoted.
use serde_json::Value;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryError {
    #[error("expression is empty")]
    Empty,

    #[error("unexpected character '{ch}' at position {pos}")]
    Unexpected { ch: char, pos: usize },

    #[error("expression ends after '.'")]
    TrailingDot,

    #[error("unterminated quoted field name")]
    UnterminatedQuote,

    #[error("invalid index '{0}'")]
    InvalidIndex(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Step {
    Field(String),
    Index(i64),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathExpression {
    source: String,
    steps: Vec<Step>,
}

impl PathExpression {
    pub fn evaluate<'a>(&self, record: &'a Value) -> Option<&'a Value> {
        self.steps.iter().try_fold(record, |node, step| match step {
            Step::Field(name) => node.as_object()?.get(name),
            Step::Index(idx) => {
                let items = node.as_array()?;
                let pos = if *idx < 0 {
                    items.len().checked_sub(usize::try_from(idx.unsigned_abs()).ok()?)?
                } else {
                    usize::try_from(*idx).ok()?
                };
                items.get(pos)
            }
        })
    }

    /// Numeric result only: strings, booleans and null do not count.
    pub fn evaluate_number(&self, record: &Value) -> Option<f64> {
        match self.evaluate(record)? {
            Value::Number(n) => n.as_f64(),
            _ => None,
        }
    }
}

impl fmt::Display for PathExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

impl FromStr for PathExpression {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let source = s.trim();
        if source.is_empty() {
            return Err(QueryError::Empty);
        }
        Ok(Self {
            source: source.to_string(),
            steps: parse_steps(source)?,
        })
    }
}

fn is_ident_start(ch: char) -> bool {
    ch.is_ascii_alphabetic() || ch == '_'
}

fn is_ident_char(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || ch == '_'
}

fn parse_steps(source: &str) -> Result<Vec<Step>, QueryError> {
    let mut steps = Vec::new();
    let mut chars = source.char_indices().peekable();

    loop {
        match chars.peek().copied() {
            Some((_, '[')) => {}
            Some((_, '"')) => {
                chars.next();
                let mut name = String::new();
                loop {
                    match chars.next() {
                        Some((_, '"')) => break,
                        Some((_, '\\')) => match chars.next() {
                            Some((_, escaped)) => name.push(escaped),
                            None => return Err(QueryError::UnterminatedQuote),
                        },
                        Some((_, ch)) => name.push(ch),
                        None => return Err(QueryError::UnterminatedQuote),
                    }
                }
                steps.push(Step::Field(name));
            }
            Some((_, ch)) if is_ident_start(ch) => {
                let mut name = String::new();
                while let Some((_, ch)) = chars.peek().copied() {
                    if !is_ident_char(ch) {
                        break;
                    }
                    name.push(ch);
                    chars.next();
                }
                steps.push(Step::Field(name));
            }
            Some((pos, ch)) => return Err(QueryError::Unexpected { ch, pos }),
            None => return Err(QueryError::TrailingDot),
        }

        while let Some((_, '[')) = chars.peek().copied() {
            chars.next();
            let mut digits = String::new();
            loop {
                match chars.next() {
                    Some((_, ']')) => break,
                    Some((_, ch)) => digits.push(ch),
                    None => return Err(QueryError::InvalidIndex(digits)),
                }
            }
            let idx = digits
                .trim()
                .parse::<i64>()
                .map_err(|_| QueryError::InvalidIndex(digits.clone()))?;
            steps.push(Step::Index(idx));
        }

        match chars.next() {
            None => break,
            Some((_, '.')) => continue,
            Some((pos, ch)) => return Err(QueryError::Unexpected { ch, pos }),
        }
    }

    Ok(steps)
}
