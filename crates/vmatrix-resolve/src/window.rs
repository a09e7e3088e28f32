//! Runtime support window discovery.
//!
//! The window is scraped from the branch's `lib/versioncheck.php`, which has
//! carried its bounds in two historical formats:
//!
//! ```text
//! if (PHP_VERSION_ID < 80100) { ... }                      // encoded integer
//! if (PHP_VERSION_ID >= 80500) { ... }
//!
//! if (version_compare(PHP_VERSION, '7.2.0') === -1) { ... } // decimal literal
//! if (version_compare(PHP_VERSION, '8.1.0') !== -1) { ... }
//! ```
//!
//! In both formats the upper bound is exclusive.

use lazy_static::lazy_static;
use regex::Regex;
use vmatrix_core::{Branch, MatrixError, MatrixResult, RuntimeVersion, RuntimeWindow, Transport, Upstream};

lazy_static! {
    static ref ENCODED_MIN: Regex = Regex::new(r"PHP_VERSION_ID\s*<\s*(\d+)").unwrap();
    static ref ENCODED_MAX: Regex = Regex::new(r"PHP_VERSION_ID\s*>=\s*(\d+)").unwrap();
    static ref DECIMAL_MIN: Regex = Regex::new(
        r#"version_compare\(\s*PHP_VERSION\s*,\s*['"](\d+\.\d+(?:\.\d+)?)['"]\s*(?:\)\s*===?\s*-1|,\s*['"]<['"]\s*\))"#
    )
    .unwrap();
    static ref DECIMAL_MAX: Regex = Regex::new(
        r#"version_compare\(\s*PHP_VERSION\s*,\s*['"](\d+\.\d+(?:\.\d+)?)['"]\s*(?:\)\s*!==?\s*-1|,\s*['"]>=['"]\s*\))"#
    )
    .unwrap();
}

/// A way of reading the window out of the compatibility check source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtractionStrategy {
    /// `PHP_VERSION_ID < 80100` / `PHP_VERSION_ID >= 80500`
    EncodedInteger,
    /// `version_compare(PHP_VERSION, '7.2.0') === -1`
    DecimalLiteral,
}

impl ExtractionStrategy {
    /// Order in which strategies are tried.
    pub const PRIORITY: [ExtractionStrategy; 2] = [Self::EncodedInteger, Self::DecimalLiteral];

    fn patterns(self) -> (&'static Regex, &'static Regex) {
        match self {
            Self::EncodedInteger => (&ENCODED_MIN, &ENCODED_MAX),
            Self::DecimalLiteral => (&DECIMAL_MIN, &DECIMAL_MAX),
        }
    }

    fn decode(self, raw: &str) -> MatrixResult<RuntimeVersion> {
        match self {
            Self::EncodedInteger => decode_version_id(raw),
            Self::DecimalLiteral => raw.parse(),
        }
    }

    /// `Ok(None)` when this strategy's patterns are absent from `source`.
    pub fn extract(self, source: &str) -> MatrixResult<Option<RuntimeWindow>> {
        let (min_pattern, max_pattern) = self.patterns();
        let bounds = min_pattern
            .captures(source)
            .zip(max_pattern.captures(source));

        let Some((min_caps, max_caps)) = bounds else {
            return Ok(None);
        };

        let min = self.decode(&min_caps[1])?;
        let exclusive_max = self.decode(&max_caps[1])?;
        RuntimeWindow::new(min, exclusive_max.prev()).map(Some)
    }
}

/// Decode an encoded version id (`80100`) into `major.minor` (`8.1`).
///
/// The two leading digits give the major in tenths and the next digit the minor.
pub fn decode_version_id(raw: &str) -> MatrixResult<RuntimeVersion> {
    let digits: Vec<u32> = raw
        .chars()
        .take(3)
        .map(|c| c.to_digit(10))
        .collect::<Option<_>>()
        .ok_or_else(|| MatrixError::DecodeAmbiguity(format!("'{}' is not an encoded version id", raw)))?;

    if digits.len() < 3 {
        return Err(MatrixError::DecodeAmbiguity(format!(
            "'{}' is too short for an encoded version id",
            raw
        )));
    }

    Ok(RuntimeVersion::from_tenths(digits[0] * 10 + digits[1] + digits[2]))
}

/// Try every strategy in priority order.
pub fn extract_window(source: &str) -> MatrixResult<RuntimeWindow> {
    for strategy in ExtractionStrategy::PRIORITY {
        if let Some(window) = strategy.extract(source)? {
            tracing::debug!(?strategy, %window, "extracted runtime window");
            return Ok(window);
        }
    }
    Err(MatrixError::Resolution(
        "no runtime version bounds found in compatibility check".to_string(),
    ))
}

/// Fetches and parses a branch's runtime support window.
pub struct WindowResolver<'a> {
    transport: &'a dyn Transport,
    upstream: &'a Upstream,
}

impl<'a> WindowResolver<'a> {
    pub fn new(transport: &'a dyn Transport, upstream: &'a Upstream) -> Self {
        Self { transport, upstream }
    }

    pub async fn resolve(&self, branch: &Branch) -> MatrixResult<RuntimeWindow> {
        let url = self.upstream.versioncheck_url(branch);
        let source = self.transport.fetch(&url).await?;
        extract_window(&source).map_err(|e| match e {
            MatrixError::Resolution(reason) => MatrixError::Resolution(format!("{}: {}", branch, reason)),
            other => other,
        })
    }
}
