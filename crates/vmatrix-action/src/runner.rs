//! Matrix Runner: sequences lookups and publishes outputs step by step
use crate::context::RunContext;
use crate::manifest::read_range;
use std::time::Instant;
use vmatrix_core::{
    expand_range, unique_branches, write_json, Branch, MatrixError, MatrixResult, OutputSink, PackageIndex,
    PlatformVersion, RuntimeVersion, RuntimeWindow, Transport, Upstream, VersionRecord,
};
use vmatrix_engine::{MatrixBuilder, Matrices};
use vmatrix_resolve::{resolve_records, Installable, ReleaseFilter};

#[derive(Debug, Clone)]
pub struct StepTiming {
    pub id: &'static str,
    pub latency_ms: u64,
}

impl StepTiming {
    fn since(id: &'static str, start: Instant) -> Self {
        let latency_ms = start.elapsed().as_millis() as u64;
        tracing::debug!(step = id, latency_ms, "step finished");
        Self { id, latency_ms }
    }
}

/// Everything a successful run produced.
#[derive(Debug, Clone)]
pub struct RunReport {
    pub versions: Vec<PlatformVersion>,
    pub records: Vec<VersionRecord>,
    pub released: Vec<RuntimeVersion>,
    pub installable: Installable,
    pub matrices: Matrices,
    pub steps: Vec<StepTiming>,
}

pub struct MatrixRunner<'a> {
    transport: &'a dyn Transport,
    index: &'a dyn PackageIndex,
}

impl<'a> MatrixRunner<'a> {
    pub fn new(transport: &'a dyn Transport, index: &'a dyn PackageIndex) -> Self {
        Self { transport, index }
    }

    /// Outputs are written as soon as each step completes, so a later
    /// failure leaves the earlier ones in place.
    pub async fn run(&self, ctx: &RunContext, sink: &mut dyn OutputSink) -> MatrixResult<RunReport> {
        let upstream = &ctx.upstream;
        let mut steps = Vec::new();

        let start = Instant::now();
        let range = read_range(&ctx.manifest_path)?;
        tracing::info!("App supports from {} till {}", range.min, range.max);
        let versions = expand_range(range.min, range.max)?;
        write_json(sink, "versions", &versions)?;
        steps.push(StepTiming::since("manifest", start));

        let start = Instant::now();
        let records = resolve_records(&versions, self.transport, upstream).await?;
        let branches = unique_branches(records.iter().map(|r| &r.branch));
        self.write_branches(sink, upstream, &branches)?;
        steps.push(StepTiming::since("resolve", start));

        let start = Instant::now();
        let span = RuntimeWindow::span(records.iter().map(|r| &r.window))
            .ok_or_else(|| MatrixError::Resolution("no version records resolved".to_string()))?;
        tracing::info!("App supports from php {} till php {}", span.min(), span.max());
        let filter = ReleaseFilter::new(self.transport, self.index, upstream);
        let released = filter.released_versions(&span).await?;
        self.write_runtimes(sink, &span, &released)?;
        steps.push(StepTiming::since("releases", start));

        let start = Instant::now();
        let installable = filter.installable(&released).await?;
        match installable.available {
            Some(version) => {
                tracing::info!("PHP {} is the highest installable version", version);
                write_json(sink, "php-available", &version)?;
            }
            None => tracing::warn!("none of the released PHP versions is installable"),
        }
        write_json(sink, "php-available-list", &installable.candidates)?;
        steps.push(StepTiming::since("installable", start));

        let start = Instant::now();
        let matrices = MatrixBuilder::new(&records, &released, upstream)
            .with_extra_axes(&ctx.extra_axes)
            .with_extra_runtimes(&ctx.extra_runtimes)
            .build();
        write_json(sink, "matrix", &matrices.server)?;
        write_json(sink, "sparse-matrix", &matrices.sparse)?;
        write_json(sink, "full-matrix", &matrices.full)?;
        write_json(sink, "ocp-matrix", &matrices.ocp)?;
        tracing::info!(
            server = matrices.server.len(),
            sparse = matrices.sparse.len(),
            full = matrices.full.len(),
            "matrices built"
        );
        steps.push(StepTiming::since("matrices", start));

        Ok(RunReport {
            versions,
            records,
            released,
            installable,
            matrices,
            steps,
        })
    }

    fn write_branches(
        &self,
        sink: &mut dyn OutputSink,
        upstream: &Upstream,
        branches: &[Branch],
    ) -> MatrixResult<()> {
        let (first, last) = match (branches.first(), branches.last()) {
            (Some(first), Some(last)) => (first, last),
            _ => return Err(MatrixError::Resolution("no branches resolved".to_string())),
        };

        let declarations: Vec<String> = branches.iter().map(|b| upstream.declaration(b)).collect();
        write_json(sink, "branches", branches)?;
        write_json(sink, "ocp-branches", &declarations)?;
        write_json(sink, "branches-min", first)?;
        write_json(sink, "branches-max", last)?;
        write_json(sink, "branches-min-list", &[first])?;
        write_json(sink, "branches-max-list", &[last])
    }

    fn write_runtimes(
        &self,
        sink: &mut dyn OutputSink,
        span: &RuntimeWindow,
        released: &[RuntimeVersion],
    ) -> MatrixResult<()> {
        let (first, last) = match (released.first(), released.last()) {
            (Some(first), Some(last)) => (first, last),
            _ => {
                return Err(MatrixError::Resolution(format!(
                    "no released PHP versions within {}",
                    span
                )))
            }
        };

        write_json(sink, "php-versions", released)?;
        write_json(sink, "php-min", first)?;
        write_json(sink, "php-max", last)?;
        write_json(sink, "php-min-list", &[first])?;
        write_json(sink, "php-max-list", &[last])
    }
}
