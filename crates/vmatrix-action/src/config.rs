//! Command line and action input configuration.
use clap::Parser;
use std::path::PathBuf;

/// Every flag doubles as the matching action input (`INPUT_*` variable).
#[derive(Parser, Debug, Clone)]
#[command(name = "version-matrix")]
#[command(about = "Compute server and PHP version matrices for a Nextcloud app", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Path to the app manifest [default: appinfo/info.xml]
    #[arg(long, env = "INPUT_FILENAME")]
    pub filename: Option<String>,

    /// Extra matrix axes, as a JSON object
    #[arg(long, env = "INPUT_MATRIX")]
    pub matrix: Option<String>,

    /// Extra PHP versions to test on the fallback branch
    #[arg(long = "with-php", env = "INPUT_WITH-PHP")]
    pub with_php: Option<String>,

    /// Branch used for platform versions without a stable branch [default: master]
    #[arg(long = "fallback-branch", env = "INPUT_FALLBACK-BRANCH")]
    pub fallback_branch: Option<String>,

    /// File receiving `key=value` outputs; stdout when unset
    #[arg(long, env = "GITHUB_OUTPUT")]
    pub output: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}
