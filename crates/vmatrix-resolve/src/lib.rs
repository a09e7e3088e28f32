//! Version Matrix Resolve: upstream lookups
//!
//! Turns platform majors into branches, branches into runtime windows, and
//! runtime windows into released and installable runtime versions.
//!
//! # Flow
//!
//! ```text
//! 27, 28, 29 → BranchResolver → WindowResolver → VersionRecord[]
//!                                                     ↓
//!                              span → ReleaseFilter → released / installable
//! ```

pub mod branch;
pub mod release;
pub mod window;

pub use branch::BranchResolver;
pub use release::{Installable, ReleaseFilter};
pub use window::{decode_version_id, extract_window, ExtractionStrategy, WindowResolver};

use futures::future::try_join_all;
use vmatrix_core::{MatrixError, PlatformVersion, Transport, Upstream, VersionRecord};

/// Resolve branch and window for every version concurrently.
///
/// Records come back in the order of `versions`; the first failed lookup
/// fails the whole batch.
pub async fn resolve_records(
    versions: &[PlatformVersion],
    transport: &dyn Transport,
    upstream: &Upstream,
) -> Result<Vec<VersionRecord>, MatrixError> {
    let branches = BranchResolver::new(transport, upstream);
    let windows = WindowResolver::new(transport, upstream);

    let lookups = versions.iter().map(|&platform| {
        let branches = &branches;
        let windows = &windows;
        async move {
            let branch = branches.resolve(platform).await?;
            let window = windows.resolve(&branch).await?;
            tracing::info!(platform, %branch, %window, "resolved version record");
            Ok::<_, MatrixError>(VersionRecord {
                platform,
                branch,
                window,
            })
        }
    });

    try_join_all(lookups).await
}

#[cfg(test)]
pub(crate) mod testing {
    //! In-memory fakes for the transport and package index ports.
    use async_trait::async_trait;
    use std::collections::{HashMap, HashSet};
    use std::sync::Mutex;
    use vmatrix_core::{MatrixError, MatrixResult, PackageIndex, Transport};

    #[derive(Default)]
    pub struct FakeTransport {
        pages: HashMap<String, String>,
        existing: HashSet<String>,
        failing: HashSet<String>,
        probed: Mutex<Vec<String>>,
    }

    impl FakeTransport {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn with_page(mut self, url: &str, body: &str) -> Self {
            self.pages.insert(url.to_string(), body.to_string());
            self
        }

        pub fn with_existing(mut self, url: &str) -> Self {
            self.existing.insert(url.to_string());
            self
        }

        pub fn with_failing(mut self, url: &str) -> Self {
            self.failing.insert(url.to_string());
            self
        }

        pub fn probed(&self) -> Vec<String> {
            self.probed.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Transport for FakeTransport {
        async fn fetch(&self, url: &str) -> MatrixResult<String> {
            self.pages
                .get(url)
                .cloned()
                .ok_or_else(|| MatrixError::transport(url, "status 404"))
        }

        async fn exists(&self, url: &str) -> MatrixResult<bool> {
            self.probed.lock().unwrap().push(url.to_string());
            if self.failing.contains(url) {
                return Err(MatrixError::transport(url, "connection reset"));
            }
            Ok(self.existing.contains(url) || self.pages.contains_key(url))
        }
    }

    pub struct FakeIndex {
        packages: HashSet<String>,
    }

    impl FakeIndex {
        pub fn new(packages: &[&str]) -> Self {
            Self {
                packages: packages.iter().map(|p| p.to_string()).collect(),
            }
        }
    }

    #[async_trait]
    impl PackageIndex for FakeIndex {
        async fn has_candidate(&self, package: &str) -> MatrixResult<bool> {
            Ok(self.packages.contains(package))
        }
    }
}
