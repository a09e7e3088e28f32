//! Derived CI matrices built from resolved version records.
use crate::product::{cartesian_product, deduplicate, filter, Axes};
use serde::Serialize;
use serde_json::Value;
use vmatrix_core::{unique_branches, Branch, Matrix, MatrixRow, RuntimeVersion, Upstream, VersionRecord};

pub const SERVER_AXIS: &str = "server-versions";
pub const RUNTIME_AXIS: &str = "php-versions";
pub const OCP_AXIS: &str = "ocp-version";

/// Axes the builder owns; caller axes may not reuse these names.
pub const BUILTIN_AXES: [&str; 3] = [SERVER_AXIS, RUNTIME_AXIS, OCP_AXIS];

/// Every matrix a run publishes.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Matrices {
    pub server: Matrix,
    pub runtime: Matrix,
    pub full: Matrix,
    pub sparse: Matrix,
    pub ocp: Matrix,
}

/// Combines records and runtime versions into the derived matrices.
pub struct MatrixBuilder<'a> {
    records: &'a [VersionRecord],
    runtimes: &'a [RuntimeVersion],
    extra_axes: Option<&'a Axes>,
    extra_runtimes: &'a [RuntimeVersion],
    upstream: &'a Upstream,
}

impl<'a> MatrixBuilder<'a> {
    /// `records` must be in ascending platform order and `runtimes` ascending.
    pub fn new(records: &'a [VersionRecord], runtimes: &'a [RuntimeVersion], upstream: &'a Upstream) -> Self {
        Self {
            records,
            runtimes,
            extra_axes: None,
            extra_runtimes: &[],
            upstream,
        }
    }

    pub fn with_extra_axes(mut self, axes: &'a Axes) -> Self {
        self.extra_axes = Some(axes);
        self
    }

    pub fn with_extra_runtimes(mut self, runtimes: &'a [RuntimeVersion]) -> Self {
        self.extra_runtimes = runtimes;
        self
    }

    /// Rows for `branches` × `runtimes` crossed with the caller's axes.
    ///
    /// Caller axes named like a built-in axis are ignored.
    fn cross(&self, branches: Vec<Value>, runtimes: Vec<Value>) -> Matrix {
        let axes = Axes::new()
            .axis(SERVER_AXIS, branches)
            .axis(RUNTIME_AXIS, runtimes);
        match self.extra_axes {
            Some(extra) => cartesian_product(&axes.merge(&extra.without(&BUILTIN_AXES))),
            None => cartesian_product(&axes),
        }
    }

    /// Extra runtime versions, pinned to the fallback branch.
    fn extra_rows(&self) -> Matrix {
        let runtimes = self.extra_runtimes.iter().map(runtime_value).collect();
        self.cross(vec![branch_value(&self.upstream.fallback())], runtimes)
    }

    /// Last record (ascending platform order) whose window contains `runtime`.
    fn branch_for(&self, runtime: RuntimeVersion) -> Branch {
        self.records
            .iter()
            .rev()
            .find(|record| record.window.contains(runtime))
            .map(|record| record.branch.clone())
            .unwrap_or_else(|| self.upstream.fallback())
    }

    /// One row per branch, pinned to the maximum of its runtime window.
    pub fn server_matrix(&self) -> Matrix {
        let rows = self
            .records
            .iter()
            .flat_map(|record| {
                self.cross(
                    vec![branch_value(&record.branch)],
                    vec![runtime_value(&record.window.max())],
                )
            })
            .chain(self.extra_rows());
        deduplicate(rows)
    }

    /// One row per runtime version, on the newest branch supporting it.
    pub fn runtime_matrix(&self) -> Matrix {
        let rows = self.runtimes.iter().flat_map(|&runtime| {
            self.cross(
                vec![branch_value(&self.branch_for(runtime))],
                vec![runtime_value(&runtime)],
            )
        });
        deduplicate(rows)
    }

    /// Every branch × runtime combination the branch supports.
    pub fn full_matrix(&self) -> Matrix {
        let branches = unique_branches(self.records.iter().map(|r| &r.branch));
        let product = self.cross(
            branches.iter().map(branch_value).collect(),
            self.runtimes.iter().map(runtime_value).collect(),
        );
        let supported = filter(product, |row| self.is_supported(row));
        deduplicate(supported.into_iter().chain(self.extra_rows()))
    }

    /// Server and runtime matrices combined: each branch and runtime at least once.
    pub fn sparse_matrix(&self) -> Matrix {
        deduplicate(self.server_matrix().into_iter().chain(self.runtime_matrix()))
    }

    /// Server matrix with the dependency-declaration form of each branch.
    pub fn ocp_matrix(&self) -> Matrix {
        self.server_matrix()
            .into_iter()
            .map(|mut row| {
                let declaration = row
                    .get(SERVER_AXIS)
                    .and_then(Value::as_str)
                    .map(|branch| Branch::new(branch).declaration(&self.upstream.declaration_prefix));
                if let Some(declaration) = declaration {
                    row.insert(OCP_AXIS.to_string(), Value::from(declaration));
                }
                row
            })
            .collect()
    }

    pub fn build(&self) -> Matrices {
        let server = self.server_matrix();
        let runtime = self.runtime_matrix();
        let sparse = deduplicate(server.clone().into_iter().chain(runtime.clone()));
        tracing::debug!(
            records = self.records.len(),
            runtimes = self.runtimes.len(),
            sparse = sparse.len(),
            "derived matrices"
        );
        Matrices {
            full: self.full_matrix(),
            ocp: self.ocp_matrix(),
            server,
            runtime,
            sparse,
        }
    }

    fn is_supported(&self, row: &MatrixRow) -> bool {
        let branch = row.get(SERVER_AXIS).and_then(Value::as_str);
        let runtime = row
            .get(RUNTIME_AXIS)
            .and_then(Value::as_str)
            .and_then(|raw| raw.parse::<RuntimeVersion>().ok());

        match (branch, runtime) {
            (Some(branch), Some(runtime)) => self
                .records
                .iter()
                .any(|record| record.branch.as_str() == branch && record.window.contains(runtime)),
            _ => false,
        }
    }
}

fn branch_value(branch: &Branch) -> Value {
    Value::from(branch.as_str())
}

fn runtime_value(runtime: &RuntimeVersion) -> Value {
    Value::from(runtime.to_string())
}
