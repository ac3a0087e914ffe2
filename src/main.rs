//! revlens - review analytics pipeline CLI
//!
//! Runs one pipeline invocation against a local JSON review table and a
//! directory-backed artifact sink, then prints the structured result.

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use revlens::{
    enrich_sentiment, ChartFormat, FsSink, InvocationResponse, JsonFileStore, Pipeline,
    PipelineConfig, PipelineError, VaderClassifier,
};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "revlens", version, about = "Review analytics pipeline")]
struct Cli {
    /// Configuration file; `revlens.{toml,yaml,json}` in the working
    /// directory is used when present.
    #[arg(long, env = "REVLENS_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Flatten every review and write the export table with its manifest.
    Export,
    /// Render and publish the word scatter and sentiment histogram.
    Charts {
        /// Override the configured chart format.
        #[arg(long, value_parser = parse_format)]
        format: Option<ChartFormat>,
    },
    /// Classify review text and write the label back to the store.
    Enrich,
    /// Hand out a presigned link to a published chart.
    Visual {
        /// File name, or file-name prefix, under the charts prefix.
        #[arg(long, default_value = "")]
        file: String,
    },
    /// Export and chart from a single scan.
    Run,
}

fn parse_format(text: &str) -> Result<ChartFormat, String> {
    ChartFormat::parse(text).ok_or_else(|| format!("unknown chart format `{text}`"))
}

fn main() -> anyhow::Result<ExitCode> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let mut config = PipelineConfig::load_from(cli.config.as_deref())
        .context("loading pipeline configuration")?;
    if let Command::Charts {
        format: Some(format),
    } = &cli.command
    {
        config.chart_format = *format;
    }
    init_tracing(&config)?;

    let response = invoke(&config, &cli.command);
    println!("{}", serde_json::to_string_pretty(&response)?);

    Ok(if response.ok {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

fn init_tracing(config: &PipelineConfig) -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_level))
        .context("building log filter")?;
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr);

    if config.log_json {
        builder.json().init();
    } else {
        builder.init();
    }
    Ok(())
}

/// Open the review table. Only the commands that read or write reviews
/// need it.
fn open_store(config: &PipelineConfig) -> Result<Arc<JsonFileStore>, PipelineError> {
    let store = JsonFileStore::open(&config.table_name, &config.store_path)?;
    Ok(Arc::new(store.with_page_size(config.page_size)))
}

fn pipeline(config: &PipelineConfig) -> Result<Pipeline, PipelineError> {
    Ok(Pipeline::new(
        open_store(config)?,
        Arc::new(FsSink::new(&config.sink_root, &config.bucket_name)),
        Arc::new(FsSink::new(&config.sink_root, &config.charts_bucket)),
    )
    .with_settings(config.settings()))
}

fn invoke(config: &PipelineConfig, command: &Command) -> InvocationResponse {
    match command {
        Command::Export => {
            InvocationResponse::from_result(pipeline(config).and_then(|run| run.export()))
        }
        Command::Charts { .. } => {
            InvocationResponse::from_result(pipeline(config).and_then(|run| run.charts()))
        }
        Command::Run => InvocationResponse::from_result(pipeline(config).and_then(|run| run.run())),
        Command::Visual { file } => {
            let charts = FsSink::new(&config.sink_root, &config.charts_bucket);
            InvocationResponse::from_result(
                config
                    .visual_lookup()
                    .resolve(&charts, file)
                    .map_err(PipelineError::from),
            )
        }
        Command::Enrich => InvocationResponse::from_result(open_store(config).and_then(|store| {
            enrich_sentiment(store.as_ref(), &VaderClassifier::default(), &config.key_field)
        })),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use revlens::ArtifactSink;

    fn config_for(dir: &std::path::Path) -> PipelineConfig {
        PipelineConfig {
            store_path: dir.join("no-such-table.json"),
            sink_root: dir.join("artifacts"),
            ..PipelineConfig::default()
        }
    }

    #[test]
    fn visual_does_not_need_the_review_table() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_for(dir.path());
        let key = format!("{}word_scatter_1.svg", config.charts_prefix);
        FsSink::new(&config.sink_root, &config.charts_bucket)
            .put(&key, b"<svg/>", "image/svg+xml")
            .unwrap();

        let response = invoke(
            &config,
            &Command::Visual {
                file: "word_scatter".to_string(),
            },
        );
        assert!(response.ok, "{:?}", response.body);
        assert_eq!(response.status, 200);
        assert_eq!(response.body["key"], key.as_str());
    }

    #[test]
    fn table_commands_report_a_missing_table() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_for(dir.path());
        for command in [Command::Export, Command::Run, Command::Enrich] {
            let response = invoke(&config, &command);
            assert!(!response.ok);
            assert_eq!(response.body["error"]["code"], "SOURCE_UNAVAILABLE");
        }
    }
}
