//! Platform version to branch resolution.
use vmatrix_core::{Branch, MatrixResult, PlatformVersion, Transport, Upstream};

/// Maps a platform major to its `stable<N>` branch, or to the fallback
/// branch when no dedicated branch has been cut yet.
pub struct BranchResolver<'a> {
    transport: &'a dyn Transport,
    upstream: &'a Upstream,
}

impl<'a> BranchResolver<'a> {
    pub fn new(transport: &'a dyn Transport, upstream: &'a Upstream) -> Self {
        Self { transport, upstream }
    }

    /// One existence probe, no retries. A failed probe is an error, not a fallback.
    pub async fn resolve(&self, version: PlatformVersion) -> MatrixResult<Branch> {
        let canonical = self.upstream.canonical_branch(version);
        let url = self.upstream.branch_url(&canonical);

        if self.transport.exists(&url).await? {
            tracing::debug!(version, branch = %canonical, "branch exists");
            Ok(canonical)
        } else {
            let fallback = self.upstream.fallback();
            tracing::debug!(version, branch = %fallback, "no dedicated branch, using fallback");
            Ok(fallback)
        }
    }
}
