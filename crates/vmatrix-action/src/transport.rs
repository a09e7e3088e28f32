//! HTTP transport and apt package index.
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use tokio::process::Command;
use vmatrix_core::{MatrixError, MatrixResult, PackageIndex, Transport};

const USER_AGENT: &str = "nextcloud-version-matrix";

/// `Transport` over a single shared reqwest client.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    pub fn new() -> MatrixResult<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| MatrixError::Config(format!("failed to build http client: {}", e)))?;
        Ok(Self::with_client(client))
    }

    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn fetch(&self, url: &str) -> MatrixResult<String> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| MatrixError::transport(url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(MatrixError::transport(url, format!("status {}", status)));
        }
        response.text().await.map_err(|e| MatrixError::transport(url, e))
    }

    async fn exists(&self, url: &str) -> MatrixResult<bool> {
        let response = self
            .client
            .head(url)
            .send()
            .await
            .map_err(|e| MatrixError::transport(url, e))?;

        probe_outcome(url, response.status())
    }
}

/// 2xx exists, 404 does not, anything else is undeterminable.
fn probe_outcome(url: &str, status: StatusCode) -> MatrixResult<bool> {
    match status {
        s if s.is_success() => Ok(true),
        StatusCode::NOT_FOUND => Ok(false),
        other => Err(MatrixError::transport(url, format!("status {}", other))),
    }
}

/// `PackageIndex` backed by `apt-cache policy`.
#[derive(Debug, Clone)]
pub struct AptCache {
    program: String,
}

impl Default for AptCache {
    fn default() -> Self {
        Self::new("apt-cache")
    }
}

impl AptCache {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

#[async_trait]
impl PackageIndex for AptCache {
    async fn has_candidate(&self, package: &str) -> MatrixResult<bool> {
        let output = Command::new(&self.program)
            .arg("policy")
            .arg(package)
            .output()
            .await
            .map_err(|e| {
                MatrixError::Resolution(format!("failed to run {} policy {}: {}", self.program, package, e))
            })?;

        Ok(has_install_candidate(&String::from_utf8_lossy(&output.stdout)))
    }
}

/// Whether `apt-cache policy` output names a candidate other than `(none)`.
pub fn has_install_candidate(policy: &str) -> bool {
    policy
        .lines()
        .filter_map(|line| line.trim().strip_prefix("Candidate:"))
        .map(str::trim)
        .any(|candidate| !candidate.is_empty() && candidate != "(none)")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_probe_outcome() {
        assert!(probe_outcome("u", StatusCode::OK).unwrap());
        assert!(!probe_outcome("u", StatusCode::NOT_FOUND).unwrap());
        assert!(probe_outcome("u", StatusCode::TOO_MANY_REQUESTS).is_err());
        assert!(probe_outcome("u", StatusCode::INTERNAL_SERVER_ERROR).is_err());
    }

    #[test]
    fn test_install_candidate_parsing() {
        let available = "php8.1:\n  Installed: (none)\n  Candidate: 8.1.2-1ubuntu2.14\n  Version table:\n";
        let missing = "php8.4:\n  Installed: (none)\n  Candidate: (none)\n  Version table:\n";

        assert!(has_install_candidate(available));
        assert!(!has_install_candidate(missing));
        assert!(!has_install_candidate(""));
    }

    #[tokio::test]
    async fn test_missing_program_is_an_error() {
        let index = AptCache::new("definitely-not-apt-cache-binary");
        assert!(index.has_candidate("php8.1").await.is_err());
    }
}
