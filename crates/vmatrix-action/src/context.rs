//! Run Context: resolved inputs for one matrix computation
use crate::config::Cli;
use serde_json::Value;
use std::path::PathBuf;
use vmatrix_core::{MatrixError, MatrixResult, RuntimeVersion, Upstream};
use vmatrix_engine::{Axes, BUILTIN_AXES};

pub const DEFAULT_MANIFEST: &str = "appinfo/info.xml";

#[derive(Debug, Clone)]
pub struct RunContext {
    pub manifest_path: PathBuf,
    pub extra_axes: Axes,
    pub extra_runtimes: Vec<RuntimeVersion>,
    pub upstream: Upstream,
}

impl RunContext {
    pub fn new(manifest_path: impl Into<PathBuf>) -> Self {
        Self {
            manifest_path: manifest_path.into(),
            extra_axes: Axes::new(),
            extra_runtimes: Vec::new(),
            upstream: Upstream::default(),
        }
    }

    /// Build from CLI flags; empty values (unset action inputs) mean "default".
    pub fn from_cli(cli: &Cli) -> MatrixResult<Self> {
        let manifest_path = match cli.filename.as_deref().map(str::trim) {
            Some(path) if !path.is_empty() => PathBuf::from(path),
            _ => PathBuf::from(DEFAULT_MANIFEST),
        };

        let mut ctx = Self::new(manifest_path);
        if let Some(raw) = non_empty(cli.matrix.as_deref()) {
            ctx.extra_axes = parse_axes(raw)?;
        }
        if let Some(raw) = non_empty(cli.with_php.as_deref()) {
            ctx.extra_runtimes = parse_runtimes(raw)?;
        }
        if let Some(fallback) = non_empty(cli.fallback_branch.as_deref()) {
            ctx.upstream.fallback_branch = fallback.to_string();
        }
        Ok(ctx)
    }
}

fn non_empty(raw: Option<&str>) -> Option<&str> {
    raw.map(str::trim).filter(|s| !s.is_empty())
}

/// Extra axes as a JSON object. Built-in axis names are rejected.
pub fn parse_axes(raw: &str) -> MatrixResult<Axes> {
    let value: Value = serde_json::from_str(raw)
        .map_err(|e| MatrixError::Config(format!("matrix input is not valid JSON: {}", e)))?;
    let axes = Axes::from_json(&value)?;
    if let Some(name) = axes.names().find(|name| BUILTIN_AXES.contains(name)) {
        return Err(MatrixError::Config(format!(
            "matrix input may not set the built-in axis '{}'",
            name
        )));
    }
    Ok(axes)
}

/// Extra runtimes as a JSON array (`["8.4"]`, `[8.4]`) or a comma separated list.
pub fn parse_runtimes(raw: &str) -> MatrixResult<Vec<RuntimeVersion>> {
    let items: Vec<String> = if raw.starts_with('[') {
        let values: Vec<Value> = serde_json::from_str(raw)
            .map_err(|e| MatrixError::Config(format!("with-php input is not a JSON array: {}", e)))?;
        values
            .into_iter()
            .map(|value| match value {
                Value::String(s) => s,
                other => other.to_string(),
            })
            .collect()
    } else {
        raw.split(',').map(|s| s.trim().to_string()).filter(|s| !s.is_empty()).collect()
    };

    items
        .iter()
        .map(|item| {
            item.parse()
                .map_err(|e| MatrixError::Config(format!("with-php entry '{}': {}", item, e)))
        })
        .collect()
}
