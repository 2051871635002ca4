// src/version/range.rs

//! Skip-range expressions
//!
//! A bundle's skip-range declares which installed versions may jump straight
//! to it, e.g. `">=4.1.0 <4.3.0"`. Exactly two whitespace-separated
//! `<op><version>` tokens are accepted; both bounds must hold.

use super::{Comparison, OperatorVersion};
use crate::error::{Error, Result};
use regex::Regex;
use std::cmp::Ordering;
use std::fmt;
use std::sync::LazyLock;

static BOUND_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(<=|>=|<|>)(\S+)$").unwrap());

/// One side of a skip-range
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bound {
    pub op: Comparison,
    pub version: OperatorVersion,
    raw: String,
}

impl Bound {
    fn parse(token: &str, range: &str) -> Result<Self> {
        let caps = BOUND_TOKEN
            .captures(token)
            .ok_or_else(|| Error::MalformedSkipRange {
                range: range.to_string(),
                reason: format!("'{}' is not an <operator><version> token", token),
            })?;

        let op: Comparison = caps[1].parse()?;
        let raw = caps[2].to_string();
        let version = OperatorVersion::parse(&raw).map_err(|_| Error::MalformedSkipRange {
            range: range.to_string(),
            reason: format!("'{}' is not a version", raw),
        })?;

        Ok(Self { op, version, raw })
    }

    /// Whether `candidate <op> bound` holds; unparsable candidates sort lowest
    pub fn admits(&self, candidate: &str) -> bool {
        let ordering = match OperatorVersion::parse(candidate) {
            Ok(v) => v.cmp(&self.version),
            Err(_) => Ordering::Less,
        };
        self.op.holds(ordering)
    }
}

impl fmt::Display for Bound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.op, self.raw)
    }
}

/// A parsed two-bound skip-range
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkipRange {
    pub lower: Bound,
    pub upper: Bound,
}

impl SkipRange {
    /// Parse a skip-range expression
    ///
    /// Examples:
    /// - ">=1.2.0 <1.5.0" → [>=1.2.0, <1.5.0]
    /// - ">4.1.0 <=4.3.0-0" → [>4.1.0, <=4.3.0-0]
    pub fn parse(s: &str) -> Result<Self> {
        let tokens: Vec<&str> = s.split_whitespace().collect();
        if tokens.len() != 2 {
            return Err(Error::MalformedSkipRange {
                range: s.to_string(),
                reason: format!("expected 2 bounds, found {}", tokens.len()),
            });
        }

        Ok(Self {
            lower: Bound::parse(tokens[0], s)?,
            upper: Bound::parse(tokens[1], s)?,
        })
    }

    /// Whether `version` satisfies both bounds
    pub fn contains(&self, version: &str) -> bool {
        self.lower.admits(version) && self.upper.admits(version)
    }
}

impl fmt::Display for SkipRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.lower, self.upper)
    }
}
