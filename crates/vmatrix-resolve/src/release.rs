//! Released and installable runtime versions.
use vmatrix_core::{MatrixResult, PackageIndex, RuntimeVersion, RuntimeWindow, Transport, Upstream};

/// Outcome of probing the package index.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Installable {
    /// Versions with an install candidate, ascending.
    pub candidates: Vec<RuntimeVersion>,
    /// Highest version whose probe succeeded.
    pub available: Option<RuntimeVersion>,
}

/// Filters a runtime window down to what actually exists.
pub struct ReleaseFilter<'a> {
    transport: &'a dyn Transport,
    index: &'a dyn PackageIndex,
    upstream: &'a Upstream,
}

impl<'a> ReleaseFilter<'a> {
    pub fn new(transport: &'a dyn Transport, index: &'a dyn PackageIndex, upstream: &'a Upstream) -> Self {
        Self {
            transport,
            index,
            upstream,
        }
    }

    /// Walk `window` in `0.1` steps, probing for a release tag of each minor.
    ///
    /// A missing release ends its major: the walk jumps to the next `x.0`
    /// without probing the remaining minors. Minors are assumed to be released
    /// densely, so a skipped minor hides every later one of the same major.
    pub async fn released_versions(&self, window: &RuntimeWindow) -> MatrixResult<Vec<RuntimeVersion>> {
        let mut released = Vec::new();
        let mut candidate = window.min();

        while candidate <= window.max() {
            let url = self.upstream.release_url(candidate);
            if self.transport.exists(&url).await? {
                tracing::debug!(version = %candidate, "release found");
                released.push(candidate);
                candidate = candidate.next();
            } else {
                tracing::debug!(version = %candidate, "no release, skipping to next major");
                candidate = candidate.next_major();
            }
        }

        Ok(released)
    }

    /// Probe each release in ascending order against the package index.
    pub async fn installable(&self, releases: &[RuntimeVersion]) -> MatrixResult<Installable> {
        let mut result = Installable::default();

        for &version in releases {
            let package = self.upstream.package_name(version);
            if self.index.has_candidate(&package).await? {
                tracing::debug!(%package, "install candidate found");
                result.candidates.push(version);
                result.available = Some(version);
            } else {
                tracing::debug!(%package, "no install candidate");
            }
        }

        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{FakeIndex, FakeTransport};

    fn v(s: &str) -> RuntimeVersion {
        s.parse().unwrap()
    }

    fn release(version: &str) -> String {
        format!("https://github.com/php/php-src/releases/tag/php-{}.0", version)
    }

    #[tokio::test]
    async fn test_released_versions_stay_inside_window() {
        let upstream = Upstream::default();
        let transport = ["7.0", "7.1", "7.2", "7.3", "7.4", "8.0", "8.1", "8.2", "8.3"]
            .iter()
            .fold(FakeTransport::new(), |t, version| t.with_existing(&release(version)));
        let index = FakeIndex::new(&[]);
        let filter = ReleaseFilter::new(&transport, &index, &upstream);

        let window = RuntimeWindow::new(v("7.2"), v("8.1")).unwrap();
        let released = filter.released_versions(&window).await.unwrap();

        let rendered: Vec<String> = released.iter().map(|r| r.to_string()).collect();
        assert_eq!(rendered, vec!["7.2", "7.3", "7.4", "8.0", "8.1"]);
        assert!(transport.probed().iter().all(|url| url != &release("7.1") && url != &release("8.2")));
    }

    #[tokio::test]
    async fn test_negative_probe_skips_rest_of_major() {
        let upstream = Upstream::default();
        let transport = ["7.2", "7.3", "7.4", "8.0"]
            .iter()
            .fold(FakeTransport::new(), |t, version| t.with_existing(&release(version)));
        let index = FakeIndex::new(&[]);
        let filter = ReleaseFilter::new(&transport, &index, &upstream);

        let window = RuntimeWindow::new(v("7.2"), v("8.1")).unwrap();
        let released = filter.released_versions(&window).await.unwrap();

        assert_eq!(released, vec![v("7.2"), v("7.3"), v("7.4"), v("8.0")]);
        assert_eq!(
            transport.probed(),
            vec![
                release("7.2"),
                release("7.3"),
                release("7.4"),
                release("7.5"),
                release("8.0"),
                release("8.1"),
            ]
        );
    }

    #[tokio::test]
    async fn test_release_probe_error_aborts() {
        let upstream = Upstream::default();
        let transport = FakeTransport::new().with_failing(&release("8.0"));
        let index = FakeIndex::new(&[]);
        let filter = ReleaseFilter::new(&transport, &index, &upstream);

        let window = RuntimeWindow::new(v("8.0"), v("8.0")).unwrap();
        assert!(filter.released_versions(&window).await.is_err());
    }

    #[tokio::test]
    async fn test_installable_reports_last_success() {
        let upstream = Upstream::default();
        let transport = FakeTransport::new();
        let index = FakeIndex::new(&["php8.0", "php8.1"]);
        let filter = ReleaseFilter::new(&transport, &index, &upstream);

        let result = filter
            .installable(&[v("7.4"), v("8.0"), v("8.1"), v("8.2")])
            .await
            .unwrap();

        assert_eq!(result.candidates, vec![v("8.0"), v("8.1")]);
        assert_eq!(result.available, Some(v("8.1")));
    }

    #[tokio::test]
    async fn test_installable_with_no_candidates() {
        let upstream = Upstream::default();
        let transport = FakeTransport::new();
        let index = FakeIndex::new(&[]);
        let filter = ReleaseFilter::new(&transport, &index, &upstream);

        let result = filter.installable(&[v("8.3")]).await.unwrap();
        assert_eq!(result, Installable::default());
    }
}
