//! Upstream locations and naming conventions.
use crate::data_model::{Branch, PlatformVersion, RuntimeVersion};
use serde::{Deserialize, Serialize};

/// Where branches, compatibility checks and releases are looked up.
///
/// URL templates use `{branch}` and `{version}` placeholders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Upstream {
    pub branch_url: String,
    pub versioncheck_url: String,
    pub release_url: String,
    pub package_template: String,
    pub branch_prefix: String,
    pub fallback_branch: String,
    pub declaration_prefix: String,
}

impl Default for Upstream {
    fn default() -> Self {
        Self {
            branch_url: "https://github.com/nextcloud/server/tree/{branch}".to_string(),
            versioncheck_url:
                "https://raw.githubusercontent.com/nextcloud/server/{branch}/lib/versioncheck.php"
                    .to_string(),
            release_url: "https://github.com/php/php-src/releases/tag/php-{version}.0".to_string(),
            package_template: "php{version}".to_string(),
            branch_prefix: "stable".to_string(),
            fallback_branch: "master".to_string(),
            declaration_prefix: "dev-".to_string(),
        }
    }
}

impl Upstream {
    /// `stable<N>` for a platform major.
    pub fn canonical_branch(&self, version: PlatformVersion) -> Branch {
        Branch::new(format!("{}{}", self.branch_prefix, version))
    }

    pub fn fallback(&self) -> Branch {
        Branch::new(self.fallback_branch.clone())
    }

    pub fn branch_url(&self, branch: &Branch) -> String {
        self.branch_url.replace("{branch}", branch.as_str())
    }

    pub fn versioncheck_url(&self, branch: &Branch) -> String {
        self.versioncheck_url.replace("{branch}", branch.as_str())
    }

    pub fn release_url(&self, version: RuntimeVersion) -> String {
        self.release_url.replace("{version}", &version.to_string())
    }

    pub fn package_name(&self, version: RuntimeVersion) -> String {
        self.package_template.replace("{version}", &version.to_string())
    }

    pub fn declaration(&self, branch: &Branch) -> String {
        branch.declaration(&self.declaration_prefix)
    }
}
