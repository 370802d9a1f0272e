//! Listing custom metrics from a saved descriptor listing

use adapter_lib::wire::ListMetricDescriptorsResponse;
use adapter_lib::Translator;
use anyhow::{Context, Result};
use std::path::Path;
use tabled::Tabled;

use crate::output::{print_rows, print_success, yes_no, OutputFormat};

/// Row for custom metrics table
#[derive(Tabled)]
struct MetricRow {
    #[tabled(rename = "Metric")]
    metric: String,
    #[tabled(rename = "Resource")]
    resource: String,
    #[tabled(rename = "Namespaced")]
    namespaced: String,
}

/// Show the custom metrics a descriptor listing exposes
pub fn list_metrics(translator: &Translator, descriptors_path: &Path, format: OutputFormat) -> Result<()> {
    let content = std::fs::read_to_string(descriptors_path).with_context(|| {
        format!("Failed to read descriptors from {}", descriptors_path.display())
    })?;
    let listing: ListMetricDescriptorsResponse =
        serde_json::from_str(&content).context("Failed to parse descriptor listing")?;

    let metrics = translator.metrics_from_descriptors(&listing);
    let rows: Vec<MetricRow> = metrics
        .iter()
        .map(|m| MetricRow {
            metric: m.metric.clone(),
            resource: m.group_resource.to_string(),
            namespaced: yes_no(m.namespaced),
        })
        .collect();

    print_rows(&rows, &metrics, format)?;
    if matches!(format, OutputFormat::Table) {
        print_success(&format!(
            "{} of {} descriptors exposed as custom metrics",
            metrics.len(),
            listing.metric_descriptors.len()
        ));
    }
    Ok(())
}
