//! GitHub Actions output channel.
use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;
use vmatrix_core::{MatrixError, MatrixResult, OutputSink};

const DELIMITER: &str = "ghadelimiter_version_matrix";

/// Writes outputs to the `$GITHUB_OUTPUT` file, or stdout when running locally.
#[derive(Debug, Clone, Default)]
pub struct GithubOutput {
    path: Option<PathBuf>,
}

impl GithubOutput {
    pub fn new(path: Option<PathBuf>) -> Self {
        Self { path }
    }
}

impl OutputSink for GithubOutput {
    fn set_output(&mut self, key: &str, value: &str) -> MatrixResult<()> {
        let entry = format_entry(key, value);
        match &self.path {
            Some(path) => {
                let mut file = OpenOptions::new()
                    .create(true)
                    .append(true)
                    .open(path)
                    .map_err(|e| MatrixError::Output(format!("{}: {}", path.display(), e)))?;
                file.write_all(entry.as_bytes())
                    .map_err(|e| MatrixError::Output(format!("{}: {}", path.display(), e)))
            }
            None => {
                print!("{}", entry);
                Ok(())
            }
        }
    }

    fn fail(&mut self, message: &str) {
        println!("::error::{}", escape_command(message));
    }
}

/// `key=value`, or the heredoc form when the value spans lines.
fn format_entry(key: &str, value: &str) -> String {
    if value.contains('\n') {
        format!("{key}<<{DELIMITER}\n{value}\n{DELIMITER}\n")
    } else {
        format!("{key}={value}\n")
    }
}

fn escape_command(message: &str) -> String {
    message.replace('%', "%25").replace('\r', "%0D").replace('\n', "%0A")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entries_append_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("output");
        let mut sink = GithubOutput::new(Some(path.clone()));

        sink.set_output("versions", "[27,28]").unwrap();
        sink.set_output("notes", "a\nb").unwrap();

        let written = std::fs::read_to_string(path).unwrap();
        assert_eq!(
            written,
            "versions=[27,28]\nnotes<<ghadelimiter_version_matrix\na\nb\nghadelimiter_version_matrix\n"
        );
    }

    #[test]
    fn test_escape_command() {
        assert_eq!(escape_command("100%\nfailed"), "100%25%0Afailed");
    }
}
