//! App manifest (`appinfo/info.xml`) reading.
//!
//! Only the platform dependency is of interest:
//!
//! ```xml
//! <dependencies>
//!     <nextcloud min-version="27" max-version="29"/>
//! </dependencies>
//! ```

use lazy_static::lazy_static;
use regex::Regex;
use std::collections::HashMap;
use std::path::Path;
use vmatrix_core::{MatrixError, MatrixResult, PlatformVersion};

lazy_static! {
    static ref COMMENT: Regex = Regex::new(r"(?s)<!--.*?-->").unwrap();
    static ref DEPENDENCIES: Regex = Regex::new(r"(?s)<dependencies\b[^>]*>(.*?)</dependencies>").unwrap();
    static ref PLATFORM: Regex = Regex::new(r"<nextcloud\b([^>]*)>").unwrap();
    static ref ATTRIBUTE: Regex = Regex::new(r#"([\w-]+)\s*=\s*(?:"([^"]*)"|'([^']*)')"#).unwrap();
}

/// Declared platform support, inclusive on both ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlatformRange {
    pub min: PlatformVersion,
    pub max: PlatformVersion,
}

/// Read the platform range from the manifest at `path`.
pub fn read_range(path: &Path) -> MatrixResult<PlatformRange> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| MatrixError::Manifest(format!("failed to read {}: {}", path.display(), e)))?;
    parse_range(&content)
}

/// Extract the platform range from manifest XML.
pub fn parse_range(xml: &str) -> MatrixResult<PlatformRange> {
    let xml = COMMENT.replace_all(xml, "");

    let dependencies = DEPENDENCIES
        .captures(&xml)
        .map(|caps| caps[1].to_string())
        .ok_or_else(|| MatrixError::Manifest("no <dependencies> element".to_string()))?;

    let platform = PLATFORM
        .captures(&dependencies)
        .map(|caps| caps[1].to_string())
        .ok_or_else(|| MatrixError::Manifest("no <nextcloud> dependency declared".to_string()))?;

    let attributes: HashMap<&str, &str> = ATTRIBUTE
        .captures_iter(&platform)
        .filter_map(|caps| {
            let name = caps.get(1)?.as_str();
            let value = caps.get(2).or_else(|| caps.get(3))?.as_str();
            Some((name, value))
        })
        .collect();

    Ok(PlatformRange {
        min: version_attribute(&attributes, "min-version")?,
        max: version_attribute(&attributes, "max-version")?,
    })
}

fn version_attribute(attributes: &HashMap<&str, &str>, name: &str) -> MatrixResult<PlatformVersion> {
    let raw = attributes
        .get(name)
        .ok_or_else(|| MatrixError::Manifest(format!("missing {} attribute", name)))?;

    // `28.0.1` declares major 28.
    let major = raw.trim().split('.').next().unwrap_or_default();
    major
        .parse()
        .map_err(|_| MatrixError::Manifest(format!("{}=\"{}\" is not a version", name, raw)))
}
