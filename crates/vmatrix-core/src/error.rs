//! Unified Error Model
use thiserror::Error;

/// Every fatal condition of a matrix run.
///
/// A negative probe (missing branch, unreleased version, no install
/// candidate) is never represented here; it travels as `Ok(false)`.
#[derive(Error, Debug)]
pub enum MatrixError {
    #[error("MANIFEST/{0}")]
    Manifest(String),

    #[error("RESOLVE/{0}")]
    Resolution(String),

    #[error("DECODE/{0}")]
    DecodeAmbiguity(String),

    #[error("TRANSPORT/{url}: {reason}")]
    Transport { url: String, reason: String },

    #[error("CONFIG/{0}")]
    Config(String),

    #[error("OUTPUT/{0}")]
    Output(String),
}

impl MatrixError {
    pub fn transport(url: impl Into<String>, reason: impl ToString) -> Self {
        Self::Transport {
            url: url.into(),
            reason: reason.to_string(),
        }
    }
}

pub type MatrixResult<T> = Result<T, MatrixError>;
