//! Integration tests for concurrent record resolution.

use async_trait::async_trait;
use std::collections::HashMap;
use vmatrix_core::{Branch, MatrixError, MatrixResult, Transport, Upstream};
use vmatrix_resolve::resolve_records;

/// Serves fixed bodies; any URL with a body also "exists".
struct StaticTransport {
    pages: HashMap<String, String>,
}

impl StaticTransport {
    fn new(pages: &[(&str, &str)]) -> Self {
        Self {
            pages: pages.iter().map(|(u, b)| (u.to_string(), b.to_string())).collect(),
        }
    }
}

#[async_trait]
impl Transport for StaticTransport {
    async fn fetch(&self, url: &str) -> MatrixResult<String> {
        self.pages
            .get(url)
            .cloned()
            .ok_or_else(|| MatrixError::transport(url, "status 404"))
    }

    async fn exists(&self, url: &str) -> MatrixResult<bool> {
        Ok(self.pages.contains_key(url))
    }
}

fn encoded(min: u32, max: u32) -> String {
    format!(
        "if (PHP_VERSION_ID < {}) {{ exit(1); }}\nif (PHP_VERSION_ID >= {}) {{ exit(1); }}",
        min, max
    )
}

// =============================================================================
// Ordering and fallback
// =============================================================================

#[tokio::test]
async fn test_records_keep_ascending_order() {
    let stable27 = encoded(70100, 70500);
    let stable28 = encoded(70200, 80200);
    let stable29 = encoded(80000, 80300);
    let transport = StaticTransport::new(&[
        ("https://github.com/nextcloud/server/tree/stable27", ""),
        ("https://github.com/nextcloud/server/tree/stable28", ""),
        ("https://github.com/nextcloud/server/tree/stable29", ""),
        ("https://raw.githubusercontent.com/nextcloud/server/stable27/lib/versioncheck.php", stable27.as_str()),
        ("https://raw.githubusercontent.com/nextcloud/server/stable28/lib/versioncheck.php", stable28.as_str()),
        ("https://raw.githubusercontent.com/nextcloud/server/stable29/lib/versioncheck.php", stable29.as_str()),
    ]);

    let records = resolve_records(&[27, 28, 29], &transport, &Upstream::default())
        .await
        .unwrap();

    let summary: Vec<(u32, &str, String)> = records
        .iter()
        .map(|r| (r.platform, r.branch.as_str(), r.window.to_string()))
        .collect();
    assert_eq!(
        summary,
        vec![
            (27, "stable27", "7.1..=7.4".to_string()),
            (28, "stable28", "7.2..=8.1".to_string()),
            (29, "stable29", "8.0..=8.2".to_string()),
        ]
    );
}

#[tokio::test]
async fn test_unreleased_versions_share_fallback_branch() {
    let master = encoded(80100, 80500);
    let transport = StaticTransport::new(&[(
        "https://raw.githubusercontent.com/nextcloud/server/master/lib/versioncheck.php",
        master.as_str(),
    )]);

    let records = resolve_records(&[31, 32], &transport, &Upstream::default())
        .await
        .unwrap();

    assert_eq!(records.len(), 2);
    assert!(records.iter().all(|r| r.branch == Branch::new("master")));
    assert_eq!(records[1].platform, 32);
}

// =============================================================================
// Failure propagation
// =============================================================================

#[tokio::test]
async fn test_single_failure_fails_batch() {
    let stable27 = encoded(70100, 70500);
    let transport = StaticTransport::new(&[
        ("https://github.com/nextcloud/server/tree/stable27", ""),
        ("https://github.com/nextcloud/server/tree/stable28", ""),
        ("https://raw.githubusercontent.com/nextcloud/server/stable27/lib/versioncheck.php", stable27.as_str()),
        ("https://raw.githubusercontent.com/nextcloud/server/stable28/lib/versioncheck.php", "<?php"),
    ]);

    let err = resolve_records(&[27, 28], &transport, &Upstream::default())
        .await
        .unwrap_err();

    assert!(matches!(err, MatrixError::Resolution(_)));
    assert!(err.to_string().contains("stable28"));
}
