use std::sync::Arc;

use analytics::{
    aggregate, build_histogram, AggregateConfig, ChartFormat, ChartRenderer, HistogramChart,
    ScatterChart,
};
use ingest::{collect_all, ReviewSource};
use publish::{
    export_rows, flatten_all, ArtifactSink, ExportReport, ExportTarget, ManifestBuilder, Visual,
    VisualLookup,
};
use records::Record;
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::{MetricsSpan, PipelineError, PipelineMetrics};

pub const SCATTER_CHART_NAME: &str = "word_scatter";
pub const HISTOGRAM_CHART_NAME: &str = "sentiment_hist";

/// Knobs shared by every invocation of a [`Pipeline`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineSettings {
    pub export_target: ExportTarget,
    pub manifest: ManifestBuilder,
    pub charts_prefix: String,
    pub chart_format: ChartFormat,
    pub aggregate: AggregateConfig,
    pub visuals: VisualLookup,
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self {
            export_target: ExportTarget::new("reviews_export.json", "reviews_export.manifest"),
            manifest: ManifestBuilder::default(),
            charts_prefix: publish::DEFAULT_CHARTS_PREFIX.to_string(),
            chart_format: ChartFormat::default(),
            aggregate: AggregateConfig::default(),
            visuals: VisualLookup::default(),
        }
    }
}

/// What happened to one chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ChartOutcome {
    Published { key: String, location: String },
    NothingToRender,
}

impl ChartOutcome {
    pub fn key(&self) -> Option<&str> {
        match self {
            ChartOutcome::Published { key, .. } => Some(key),
            ChartOutcome::NothingToRender => None,
        }
    }
}

/// Result of the analytics path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChartReport {
    pub records: usize,
    pub distinct_tokens: usize,
    pub scatter: ChartOutcome,
    pub histogram: ChartOutcome,
}

/// Result of running both paths over one collected record set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunReport {
    pub export: ExportReport,
    pub charts: ChartReport,
}

/// Review analytics pipeline over an injected store and sinks.
///
/// The export path and the analytics path read the same store but are
/// otherwise independent; [`run`](Self::run) collects once and feeds both.
pub struct Pipeline {
    source: Arc<dyn ReviewSource>,
    export_sink: Arc<dyn ArtifactSink>,
    chart_sink: Arc<dyn ArtifactSink>,
    renderer: Box<dyn ChartRenderer>,
    settings: PipelineSettings,
    metrics: Option<Arc<dyn PipelineMetrics>>,
}

impl Pipeline {
    pub fn new(
        source: Arc<dyn ReviewSource>,
        export_sink: Arc<dyn ArtifactSink>,
        chart_sink: Arc<dyn ArtifactSink>,
    ) -> Self {
        let settings = PipelineSettings::default();
        Self {
            source,
            export_sink,
            chart_sink,
            renderer: settings.chart_format.renderer(),
            settings,
            metrics: None,
        }
    }

    /// Replace the settings; the renderer follows the configured format.
    pub fn with_settings(mut self, settings: PipelineSettings) -> Self {
        self.renderer = settings.chart_format.renderer();
        self.settings = settings;
        self
    }

    pub fn with_renderer(mut self, renderer: Box<dyn ChartRenderer>) -> Self {
        self.renderer = renderer;
        self
    }

    pub fn with_metrics(mut self, metrics: Arc<dyn PipelineMetrics>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    pub fn settings(&self) -> &PipelineSettings {
        &self.settings
    }

    /// Read every record from the store.
    pub fn collect(&self) -> Result<Vec<Record>, PipelineError> {
        let span = MetricsSpan::start(self.metrics.as_ref());
        let result = collect_all(self.source.as_ref());
        if let Some(span) = span {
            span.record_collect(result.as_ref().map(Vec::len).map_err(Clone::clone));
        }
        Ok(result?)
    }

    /// Collect, then write the flattened table and its manifest.
    pub fn export(&self) -> Result<ExportReport, PipelineError> {
        let records = self.collect()?;
        self.export_records(&records)
    }

    /// Collect, then render and publish both charts.
    pub fn charts(&self) -> Result<ChartReport, PipelineError> {
        let records = self.collect()?;
        self.chart_records(&records)
    }

    /// Both paths over a single collection.
    pub fn run(&self) -> Result<RunReport, PipelineError> {
        let records = self.collect()?;
        let export = self.export_records(&records)?;
        let charts = self.chart_records(&records)?;
        Ok(RunReport { export, charts })
    }

    /// Look up a published chart by file-name prefix.
    pub fn visual(&self, file: &str) -> Result<Visual, PipelineError> {
        Ok(self.settings.visuals.resolve(self.chart_sink.as_ref(), file)?)
    }

    /// Export path over an already collected record set.
    pub fn export_records(&self, records: &[Record]) -> Result<ExportReport, PipelineError> {
        let span = MetricsSpan::start(self.metrics.as_ref());
        let rows = flatten_all(records).map_err(PipelineError::from);
        if let Some(span) = span {
            span.record_transform(rows.as_ref().map(|_| ()).map_err(Clone::clone));
        }
        let rows = rows.map_err(|err| {
            warn!(error = %err, "export_transform_failed");
            err
        })?;

        let span = MetricsSpan::start(self.metrics.as_ref());
        let report = export_rows(
            &rows,
            &self.settings.manifest,
            self.export_sink.as_ref(),
            &self.settings.export_target,
        )
        .map_err(PipelineError::from);
        if let Some(span) = span {
            span.record_publish(report.as_ref().map(|_| ()).map_err(Clone::clone));
        }
        report
    }

    /// Analytics path over an already collected record set.
    ///
    /// A chart with no data is skipped and reported as such; that is not a
    /// failure.
    pub fn chart_records(&self, records: &[Record]) -> Result<ChartReport, PipelineError> {
        let span = MetricsSpan::start(self.metrics.as_ref());
        let stats = aggregate(records);
        let scatter = ScatterChart::from_stats(&stats, &self.settings.aggregate);
        let histogram = HistogramChart::from_histogram(&build_histogram(records));
        let rendered = self.render(scatter.as_ref(), histogram.as_ref());
        if let Some(span) = span {
            span.record_transform(rendered.as_ref().map(|_| ()).map_err(Clone::clone));
        }
        let (scatter_bytes, histogram_bytes) = rendered?;

        let span = MetricsSpan::start(self.metrics.as_ref());
        let published = self
            .publish_chart(SCATTER_CHART_NAME, scatter_bytes)
            .and_then(|scatter| {
                self.publish_chart(HISTOGRAM_CHART_NAME, histogram_bytes)
                    .map(|histogram| (scatter, histogram))
            });
        if let Some(span) = span {
            span.record_publish(published.as_ref().map(|_| ()).map_err(Clone::clone));
        }
        let (scatter, histogram) = published?;

        info!(
            records = records.len(),
            distinct_tokens = stats.len(),
            scatter = scatter.key().unwrap_or("-"),
            histogram = histogram.key().unwrap_or("-"),
            "charts_complete"
        );
        Ok(ChartReport {
            records: records.len(),
            distinct_tokens: stats.len(),
            scatter,
            histogram,
        })
    }

    #[allow(clippy::type_complexity)]
    fn render(
        &self,
        scatter: Option<&ScatterChart>,
        histogram: Option<&HistogramChart>,
    ) -> Result<(Option<Vec<u8>>, Option<Vec<u8>>), PipelineError> {
        let scatter = scatter
            .map(|chart| self.renderer.render_scatter(chart))
            .transpose()?;
        let histogram = histogram
            .map(|chart| self.renderer.render_histogram(chart))
            .transpose()?;
        Ok((scatter, histogram))
    }

    fn publish_chart(
        &self,
        name: &str,
        bytes: Option<Vec<u8>>,
    ) -> Result<ChartOutcome, PipelineError> {
        let Some(bytes) = bytes else {
            info!(chart = name, "chart_skipped");
            return Ok(ChartOutcome::NothingToRender);
        };
        let format = self.renderer.format();
        let key = format!(
            "{}{}_{}.{}",
            self.settings.charts_prefix,
            name,
            Uuid::new_v4(),
            format.extension()
        );
        self.chart_sink
            .put(&key, &bytes, format.content_type())
            .map_err(|err| {
                warn!(chart = name, key = %key, error = %err, "chart_upload_failed");
                err
            })?;
        let location = self.chart_sink.object_uri(&key);
        info!(chart = name, location = %location, size = bytes.len(), "chart_published");
        Ok(ChartOutcome::Published { key, location })
    }
}
