//! Data Model: platform versions, branches, runtime windows and matrices
use crate::error::{MatrixError, MatrixResult};
use serde::{Serialize, Serializer};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

// ============================================================================
// PLATFORM VERSIONS
// ============================================================================

/// Major release of the host platform (e.g. `29`).
pub type PlatformVersion = u32;

/// Expand an inclusive `[min, max]` manifest range into every major in between.
pub fn expand_range(min: PlatformVersion, max: PlatformVersion) -> MatrixResult<Vec<PlatformVersion>> {
    if min > max {
        return Err(MatrixError::Manifest(format!(
            "min-version {} is greater than max-version {}",
            min, max
        )));
    }
    Ok((min..=max).collect())
}

// ============================================================================
// BRANCHES
// ============================================================================

/// Source line of the host platform, either `stable<N>` or the fallback line.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct Branch(String);

impl Branch {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Dependency-declaration form of the branch (`dev-stable29`).
    pub fn declaration(&self, prefix: &str) -> String {
        format!("{}{}", prefix, self.0)
    }
}

impl fmt::Display for Branch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Drop repeated branches, keeping the first occurrence of each.
pub fn unique_branches<'a>(branches: impl IntoIterator<Item = &'a Branch>) -> Vec<Branch> {
    let mut unique: Vec<Branch> = Vec::new();
    for branch in branches {
        if !unique.contains(branch) {
            unique.push(branch.clone());
        }
    }
    unique
}

// ============================================================================
// RUNTIME VERSIONS
// ============================================================================

/// A `major.minor` runtime version with one decimal digit of precision.
///
/// Stored as a count of tenths so that stepping by `0.1` never drifts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RuntimeVersion(u32);

impl RuntimeVersion {
    /// Build from explicit parts; `None` if `minor` does not fit one digit.
    pub fn from_parts(major: u32, minor: u32) -> Option<Self> {
        if minor > 9 {
            return None;
        }
        major.checked_mul(10)?.checked_add(minor).map(Self)
    }

    pub fn from_tenths(tenths: u32) -> Self {
        Self(tenths)
    }

    pub fn tenths(self) -> u32 {
        self.0
    }

    pub fn major(self) -> u32 {
        self.0 / 10
    }

    pub fn minor(self) -> u32 {
        self.0 % 10
    }

    /// The following minor (`7.9` steps to `8.0`).
    pub fn next(self) -> Self {
        Self(self.0 + 1)
    }

    /// The preceding minor, saturating at `0.0`.
    pub fn prev(self) -> Self {
        Self(self.0.saturating_sub(1))
    }

    /// First minor of the next major (`7.3` jumps to `8.0`).
    pub fn next_major(self) -> Self {
        Self((self.major() + 1) * 10)
    }
}

impl fmt::Display for RuntimeVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major(), self.minor())
    }
}

impl FromStr for RuntimeVersion {
    type Err = MatrixError;

    /// Accepts `8.1` and `8.1.3`; the patch component is ignored.
    fn from_str(s: &str) -> MatrixResult<Self> {
        let ambiguous = || MatrixError::DecodeAmbiguity(format!("'{}' is not a major.minor version", s));

        let mut parts = s.trim().split('.');
        let major: u32 = parts.next().and_then(|p| p.parse().ok()).ok_or_else(ambiguous)?;
        let minor: u32 = parts.next().and_then(|p| p.parse().ok()).ok_or_else(ambiguous)?;
        if let Some(patch) = parts.next() {
            patch.parse::<u32>().map_err(|_| ambiguous())?;
        }
        if parts.next().is_some() {
            return Err(ambiguous());
        }
        Self::from_parts(major, minor).ok_or_else(ambiguous)
    }
}

impl Serialize for RuntimeVersion {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

// ============================================================================
// RUNTIME WINDOWS
// ============================================================================

/// Inclusive range of runtime minors supported by one branch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RuntimeWindow {
    min: RuntimeVersion,
    max: RuntimeVersion,
}

impl RuntimeWindow {
    pub fn new(min: RuntimeVersion, max: RuntimeVersion) -> MatrixResult<Self> {
        if max < min {
            return Err(MatrixError::Resolution(format!(
                "runtime window max {} is below min {}",
                max, min
            )));
        }
        Ok(Self { min, max })
    }

    pub fn min(&self) -> RuntimeVersion {
        self.min
    }

    pub fn max(&self) -> RuntimeVersion {
        self.max
    }

    pub fn contains(&self, version: RuntimeVersion) -> bool {
        self.min <= version && version <= self.max
    }

    /// Smallest window covering every window given, `None` when empty.
    pub fn span<'a>(windows: impl IntoIterator<Item = &'a RuntimeWindow>) -> Option<RuntimeWindow> {
        windows.into_iter().fold(None, |acc: Option<RuntimeWindow>, w| {
            Some(match acc {
                None => *w,
                Some(a) => RuntimeWindow {
                    min: a.min.min(w.min),
                    max: a.max.max(w.max),
                },
            })
        })
    }
}

impl fmt::Display for RuntimeWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..={}", self.min, self.max)
    }
}

/// Joined per-branch result, kept in ascending platform order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VersionRecord {
    pub platform: PlatformVersion,
    pub branch: Branch,
    pub window: RuntimeWindow,
}

// ============================================================================
// MATRICES
// ============================================================================

/// One CI job: axis name to axis value.
pub type MatrixRow = BTreeMap<String, Value>;

/// Ordered job rows, serialized the way CI matrices expect (`{"include": [...]}`).
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Matrix {
    include: Vec<MatrixRow>,
}

impl Matrix {
    pub fn from_rows(rows: Vec<MatrixRow>) -> Self {
        Self { include: rows }
    }

    pub fn rows(&self) -> &[MatrixRow] {
        &self.include
    }

    pub fn len(&self) -> usize {
        self.include.len()
    }

    pub fn is_empty(&self) -> bool {
        self.include.is_empty()
    }
}

impl IntoIterator for Matrix {
    type Item = MatrixRow;
    type IntoIter = std::vec::IntoIter<MatrixRow>;

    fn into_iter(self) -> Self::IntoIter {
        self.include.into_iter()
    }
}

impl FromIterator<MatrixRow> for Matrix {
    fn from_iter<I: IntoIterator<Item = MatrixRow>>(iter: I) -> Self {
        Self {
            include: iter.into_iter().collect(),
        }
    }
}
