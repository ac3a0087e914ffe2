use std::sync::Arc;

use revlens::{
    collect_all, ChartFormat, ChartOutcome, InMemoryReviewStore, InMemorySink, Pipeline,
    PipelineSettings, Record,
};
use serde_json::Value;

fn review(id: &str, text: &str, sentiment: &str) -> Record {
    Record::new()
        .with("review_id", id)
        .with("text", text)
        .with("sentiment", sentiment)
}

fn json_pipeline(records: Vec<Record>) -> (Pipeline, Arc<InMemorySink>, Arc<InMemorySink>) {
    let store = Arc::new(InMemoryReviewStore::new("Reviews").with_records(records));
    let exports = Arc::new(InMemorySink::new("review-analytics-export"));
    let charts = Arc::new(InMemorySink::new("review-analytics-charts"));
    let pipeline = Pipeline::new(store, exports.clone(), charts.clone()).with_settings(
        PipelineSettings {
            chart_format: ChartFormat::Json,
            ..PipelineSettings::default()
        },
    );
    (pipeline, exports, charts)
}

fn read_json(sink: &InMemorySink, key: &str) -> Value {
    let object = sink.object(key).expect("object should be published");
    serde_json::from_slice(&object.bytes).expect("object should be JSON")
}

#[test]
fn collector_follows_tokens_across_pages() {
    let store = InMemoryReviewStore::new("Reviews")
        .with_records(vec![
            Record::new().with("id", "A"),
            Record::new().with("id", "B"),
            Record::new().with("id", "C"),
        ])
        .with_page_size(2);

    let records = collect_all(&store).expect("collect should succeed");
    let ids: Vec<_> = records.iter().filter_map(|r| r.text("id")).collect();

    assert_eq!(ids, vec!["A", "B", "C"]);
    assert_eq!(store.scan_calls(), 2);
}

#[test]
fn scatter_keeps_repeated_tokens_only() {
    let (pipeline, _, charts) = json_pipeline(vec![
        review("r-1", "good food good", "POSITIVE"),
        review("r-2", "bad food", "NEGATIVE"),
    ]);
    let report = pipeline.charts().expect("charts should succeed");
    let key = report.scatter.key().expect("scatter should be published");

    let spec = read_json(&charts, key);
    assert_eq!(spec["kind"], "scatter");
    let points = spec["data"].as_array().unwrap();
    let labels: Vec<_> = points.iter().map(|p| p["label"].as_str().unwrap()).collect();
    assert_eq!(labels, vec!["good", "food"]);

    assert_eq!(points[0]["frequency"], 2);
    assert_eq!(points[0]["avg_sentiment"], 1.0);
    assert_eq!(points[1]["frequency"], 2);
    assert_eq!(points[1]["avg_sentiment"], 0.0);
}

#[test]
fn histogram_counts_recognized_labels_only() {
    let records = vec![
        review("r-1", "one", "POSITIVE"),
        review("r-2", "two", "POSITIVE"),
        review("r-3", "three", "NEGATIVE"),
        review("r-4", "four", "UNKNOWN"),
        Record::new().with("review_id", "r-5").with("text", "five"),
    ];
    let (pipeline, _, charts) = json_pipeline(records);
    let report = pipeline.charts().expect("charts should succeed");
    let key = report.histogram.key().expect("histogram should be published");

    let spec = read_json(&charts, key);
    assert_eq!(spec["kind"], "bar");
    let bars: Vec<_> = spec["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|bar| (bar["label"].as_str().unwrap().to_string(), bar["count"].as_u64().unwrap()))
        .collect();
    assert_eq!(
        bars,
        vec![("POSITIVE".to_string(), 2), ("NEGATIVE".to_string(), 1)]
    );
}

#[test]
fn export_manifest_points_at_the_data_object() {
    let (pipeline, exports, _) = json_pipeline(vec![
        review("r-1", "good", "POSITIVE"),
        review("r-2", "bad", "NEGATIVE"),
    ]);
    let report = pipeline.export().expect("export should succeed");

    assert_eq!(report.count, 2);
    let data = read_json(&exports, "reviews_export.json");
    assert_eq!(data.as_array().unwrap().len(), 2);

    let manifest = read_json(&exports, "reviews_export.manifest");
    assert_eq!(
        manifest["fileLocations"][0]["URIPrefixes"][0],
        "s3://review-analytics-export/reviews_export.json"
    );
}

#[test]
fn empty_table_exports_an_empty_array_and_skips_charts() {
    let (pipeline, exports, charts) = json_pipeline(Vec::new());
    let report = pipeline.run().expect("run should succeed");

    assert_eq!(report.export.count, 0);
    assert_eq!(read_json(&exports, "reviews_export.json"), serde_json::json!([]));
    assert_eq!(report.charts.scatter, ChartOutcome::NothingToRender);
    assert_eq!(report.charts.histogram, ChartOutcome::NothingToRender);
    assert!(charts.is_empty());
}

#[test]
fn nested_records_flatten_into_the_export_table() {
    let record = Record::from_json_str(
        r#"{"review_id": "r-1", "author": {"name": "Ana", "stats": {"reviews": 12}}, "tags": ["cosy", "quiet"]}"#,
    )
    .unwrap();
    let (pipeline, exports, _) = json_pipeline(vec![record]);
    pipeline.export().expect("export should succeed");

    let data = read_json(&exports, "reviews_export.json");
    let row = &data[0];
    assert_eq!(row["author_name"], "Ana");
    assert_eq!(row["author_stats_reviews"], 12.0);
    assert_eq!(row["tags"], r#"["cosy", "quiet"]"#);
}
