// src/version/mod.rs

//! Version handling for operator bundle versions
//!
//! Catalog version strings are loosely formatted: vendor prefixes (`v4.6.1`),
//! build suffixes (`4.6.1-202105281231.p0`), and occasionally plain garbage.
//! This module normalizes them into a comparable [`OperatorVersion`] with
//! semantic-version precedence, and provides the four relational operators
//! used by skip-ranges and path search.

pub mod range;

pub use range::SkipRange;

use crate::error::{Error, Result};
use semver::{BuildMetadata, Prerelease};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;
use tracing::debug;

/// Normalize a raw version string to its numeric dotted core
///
/// Leading characters are skipped until the first digit or dot, then the
/// longest run of digits and dots is kept. Trailing dots are dropped.
/// Never fails; garbage yields an empty string.
///
/// - "v1.2.3" → "1.2.3"
/// - "4.6.1-202105281231.p0" → "4.6.1"
/// - "release" → ""
pub fn normalize(raw: &str) -> String {
    split_core(raw).0.to_string()
}

/// Split a raw version into its normalized core and whatever follows it
fn split_core(raw: &str) -> (&str, &str) {
    let raw = raw.trim();
    let Some(start) = raw.find(|c: char| c.is_ascii_digit() || c == '.') else {
        return ("", "");
    };
    let rest = &raw[start..];
    let end = rest
        .find(|c: char| !(c.is_ascii_digit() || c == '.'))
        .unwrap_or(rest.len());
    let (core, suffix) = rest.split_at(end);
    (core.trim_end_matches('.'), suffix)
}

/// Derive a version from an OLM bundle name such as `etcdoperator.v0.9.2`
///
/// Takes everything after the first dot and drops leading letters.
/// Returns None when the name has no dot or nothing is left.
pub fn version_from_bundle_name(name: &str) -> Option<String> {
    let (_, tail) = name.split_once('.')?;
    let version = tail.trim_start_matches(|c: char| c.is_alphabetic());
    if version.is_empty() {
        None
    } else {
        Some(version.to_string())
    }
}

/// A parsed operator version
///
/// Release components are compared numerically with implicit zero padding
/// (`4.6` == `4.6.0`), then pre-release tags by semver precedence. Build
/// metadata is carried for display only.
#[derive(Debug, Clone)]
pub struct OperatorVersion {
    pub release: Vec<u64>,
    pub pre: Prerelease,
    pub build: BuildMetadata,
}

impl OperatorVersion {
    /// Parse a raw catalog version string
    ///
    /// Examples:
    /// - "1.2.3" → release [1, 2, 3]
    /// - "v4.6" → release [4, 6]
    /// - "1.0.0-rc.1+build5" → release [1, 0, 0], pre "rc.1", build "build5"
    pub fn parse(raw: &str) -> Result<Self> {
        let (core, suffix) = split_core(raw);
        if core.is_empty() {
            return Err(Error::UnparsableVersion(raw.to_string()));
        }

        let release = core
            .split('.')
            .map(|part| part.parse::<u64>())
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|_| Error::UnparsableVersion(raw.to_string()))?;

        let (pre, build) = parse_suffix(suffix);

        Ok(Self {
            release,
            pre,
            build,
        })
    }

    /// Whether this version carries a pre-release tag
    pub fn is_prerelease(&self) -> bool {
        !self.pre.is_empty()
    }

    fn component(&self, index: usize) -> u64 {
        self.release.get(index).copied().unwrap_or(0)
    }
}

/// Split a `-pre+build` suffix; anything else is ignored
fn parse_suffix(suffix: &str) -> (Prerelease, BuildMetadata) {
    let (pre_str, build_str) = match suffix.strip_prefix('-') {
        Some(rest) => match rest.split_once('+') {
            Some((pre, build)) => (pre, build),
            None => (rest, ""),
        },
        None => match suffix.strip_prefix('+') {
            Some(build) => ("", build),
            None => {
                if !suffix.is_empty() {
                    debug!("Ignoring unrecognized version suffix '{}'", suffix);
                }
                ("", "")
            }
        },
    };

    let pre = Prerelease::new(pre_str).unwrap_or_else(|_| {
        debug!("Ignoring invalid pre-release tag '{}'", pre_str);
        Prerelease::EMPTY
    });
    let build = BuildMetadata::new(build_str).unwrap_or(BuildMetadata::EMPTY);
    (pre, build)
}

impl FromStr for OperatorVersion {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl Ord for OperatorVersion {
    fn cmp(&self, other: &Self) -> Ordering {
        let width = self.release.len().max(other.release.len());
        for i in 0..width {
            match self.component(i).cmp(&other.component(i)) {
                Ordering::Equal => {}
                ord => return ord,
            }
        }
        // semver orders an empty pre-release above any non-empty one
        self.pre.cmp(&other.pre)
    }
}

impl PartialOrd for OperatorVersion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for OperatorVersion {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for OperatorVersion {}

impl fmt::Display for OperatorVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let core: Vec<String> = self.release.iter().map(|n| n.to_string()).collect();
        write!(f, "{}", core.join("."))?;
        if !self.pre.is_empty() {
            write!(f, "-{}", self.pre)?;
        }
        if !self.build.is_empty() {
            write!(f, "+{}", self.build)?;
        }
        Ok(())
    }
}

/// Compare two raw version strings
///
/// Unparsable versions sort below every parsable one; two unparsable
/// versions fall back to plain string order so the ordering stays total.
pub fn compare(a: &str, b: &str) -> Ordering {
    match (OperatorVersion::parse(a), OperatorVersion::parse(b)) {
        (Ok(va), Ok(vb)) => va.cmp(&vb),
        (Err(_), Ok(_)) => Ordering::Less,
        (Ok(_), Err(_)) => Ordering::Greater,
        (Err(_), Err(_)) => a.cmp(b),
    }
}

/// Relational operators accepted in skip-ranges
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparison {
    LessThan,
    LessOrEqual,
    GreaterThan,
    GreaterOrEqual,
}

impl Comparison {
    pub fn as_str(&self) -> &'static str {
        match self {
            Comparison::LessThan => "<",
            Comparison::LessOrEqual => "<=",
            Comparison::GreaterThan => ">",
            Comparison::GreaterOrEqual => ">=",
        }
    }

    /// Whether an ordering of `lhs` against `rhs` satisfies `lhs <op> rhs`
    pub fn holds(&self, ordering: Ordering) -> bool {
        match self {
            Comparison::LessThan => ordering == Ordering::Less,
            Comparison::LessOrEqual => ordering != Ordering::Greater,
            Comparison::GreaterThan => ordering == Ordering::Greater,
            Comparison::GreaterOrEqual => ordering != Ordering::Less,
        }
    }
}

impl FromStr for Comparison {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "<" => Ok(Comparison::LessThan),
            "<=" => Ok(Comparison::LessOrEqual),
            ">" => Ok(Comparison::GreaterThan),
            ">=" => Ok(Comparison::GreaterOrEqual),
            _ => Err(Error::MalformedSkipRange {
                range: s.to_string(),
                reason: "unknown comparison operator".to_string(),
            }),
        }
    }
}

impl fmt::Display for Comparison {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Evaluate `a <op> b` on raw version strings
pub fn evaluate(a: &str, op: Comparison, b: &str) -> bool {
    op.holds(compare(a, b))
}
