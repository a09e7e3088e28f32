//! Ports: the external collaborators a matrix run talks to.
//!
//! Each port is injected so resolvers can run against a fake in tests.
use crate::error::{MatrixError, MatrixResult};
use async_trait::async_trait;
use serde::Serialize;
use std::collections::BTreeMap;

/// Remote resource access.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Body of the resource at `url`.
    async fn fetch(&self, url: &str) -> MatrixResult<String>;

    /// `Ok(false)` only for a confirmed "not found"; anything
    /// undeterminable is an error.
    async fn exists(&self, url: &str) -> MatrixResult<bool>;
}

/// Host package index (e.g. apt).
#[async_trait]
pub trait PackageIndex: Send + Sync {
    /// Whether `package` has an install candidate.
    async fn has_candidate(&self, package: &str) -> MatrixResult<bool>;
}

/// Named outputs consumed by the CI pipeline.
pub trait OutputSink {
    fn set_output(&mut self, key: &str, value: &str) -> MatrixResult<()>;

    fn fail(&mut self, message: &str);
}

/// Serialize `value` as JSON and publish it under `key`.
pub fn write_json<T: Serialize + ?Sized>(
    sink: &mut dyn OutputSink,
    key: &str,
    value: &T,
) -> MatrixResult<()> {
    let encoded = serde_json::to_string(value)
        .map_err(|e| MatrixError::Output(format!("{}: {}", key, e)))?;
    tracing::debug!(key, value = %encoded, "setting output");
    sink.set_output(key, &encoded)
}

/// Sink that keeps everything in memory.
#[derive(Debug, Default, Clone)]
pub struct MemorySink {
    pub outputs: BTreeMap<String, String>,
    pub failure: Option<String>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.outputs.get(key).map(String::as_str)
    }

    /// Decode a stored output back into JSON.
    pub fn json(&self, key: &str) -> Option<serde_json::Value> {
        self.get(key).and_then(|raw| serde_json::from_str(raw).ok())
    }
}

impl OutputSink for MemorySink {
    fn set_output(&mut self, key: &str, value: &str) -> MatrixResult<()> {
        self.outputs.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn fail(&mut self, message: &str) {
        self.failure = Some(message.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_write_json_encodes_value() {
        let mut sink = MemorySink::new();
        write_json(&mut sink, "versions", &vec![27, 28]).unwrap();
        assert_eq!(sink.get("versions"), Some("[27,28]"));
        assert_eq!(sink.json("versions"), Some(json!([27, 28])));
    }

    #[test]
    fn test_fail_is_recorded() {
        let mut sink = MemorySink::new();
        sink.fail("RESOLVE/boom");
        assert_eq!(sink.failure.as_deref(), Some("RESOLVE/boom"));
    }
}
