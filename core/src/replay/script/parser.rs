//! TOML replay script parser
//!
//! Parses replay script files into a structured representation.

use super::ast::{AssertCondition, AssertValue, CompareOp, ReplayScript};
use std::path::Path;

impl ReplayScript {
    /// Parse a TOML replay script from a string
    pub fn from_toml(toml_str: &str) -> Result<Self, ParseError> {
        toml::from_str(toml_str).map_err(|e| ParseError::TomlError(e.to_string()))
    }

    /// Parse a TOML replay script from a file
    pub fn from_file(path: &Path) -> Result<Self, ParseError> {
        let content =
            std::fs::read_to_string(path).map_err(|e| ParseError::IoError(e.to_string()))?;
        Self::from_toml(&content)
    }

    /// Serialize to TOML string
    pub fn to_toml(&self) -> Result<String, ParseError> {
        toml::to_string_pretty(self).map_err(|e| ParseError::TomlError(e.to_string()))
    }
}

impl AssertCondition {
    /// Parse `"$variable <op> operand"`.
    ///
    /// The operand is a number, `true`/`false`, `$other` or `$prev_other`.
    pub fn parse(s: &str) -> Result<Self, ParseError> {
        let s = s.trim();
        let invalid = |reason: &str| ParseError::InvalidAssertion(format!("{}: '{}'", reason, s));

        let (operator, at) = CompareOp::ALL
            .iter()
            .find_map(|op| s.find(op.symbol()).map(|at| (*op, at)))
            .ok_or_else(|| invalid("no comparison operator"))?;

        let variable = s[..at].trim();
        if !variable.starts_with('$') || variable.len() < 2 {
            return Err(invalid("left side must be a $variable"));
        }

        let operand = s[at + operator.symbol().len()..].trim();
        let value = match operand {
            "true" => AssertValue::Number(1.0),
            "false" => AssertValue::Number(0.0),
            _ => match operand.strip_prefix("$prev_") {
                Some(name) => AssertValue::PrevValue(format!("${}", name)),
                None if operand.starts_with('$') => AssertValue::Variable(operand.to_string()),
                None => AssertValue::Number(
                    operand
                        .parse()
                        .map_err(|_| invalid("operand is not a number or $variable"))?,
                ),
            },
        };

        Ok(Self {
            variable: variable.to_string(),
            operator,
            value,
        })
    }
}

/// Split symbolic input like "accelerate+turn_left" into tokens.
///
/// `"idle"` and the empty string hold nothing.
pub fn parse_symbolic(s: &str) -> Vec<String> {
    let s = s.trim();
    if s == "idle" || s.is_empty() {
        return Vec::new();
    }
    s.split('+')
        .map(|token| token.trim().to_string())
        .filter(|token| !token.is_empty() && token != "idle")
        .collect()
}

/// Parse errors
#[derive(Debug)]
pub enum ParseError {
    /// TOML parsing error
    TomlError(String),
    /// File I/O error
    IoError(String),
    /// Invalid assertion syntax
    InvalidAssertion(String),
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParseError::TomlError(e) => write!(f, "TOML parse error: {}", e),
            ParseError::IoError(e) => write!(f, "IO error: {}", e),
            ParseError::InvalidAssertion(e) => write!(f, "Invalid assertion: {}", e),
        }
    }
}

impl std::error::Error for ParseError {}
