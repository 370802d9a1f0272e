//! Selecting the metric descriptors exposed as custom metrics

use crate::kinds::GroupResource;
use crate::models::MetricInfo;
use crate::wire::{ListMetricDescriptorsResponse, MetricDescriptor, MetricKind};

/// Custom metrics backed by the listed descriptors
///
/// A descriptor qualifies when it is a numeric gauge whose type, with
/// `metrics_prefix/` removed, is a single non-empty path segment.
pub fn metrics_from_descriptors(
    metrics_prefix: &str,
    response: &ListMetricDescriptorsResponse,
) -> Vec<MetricInfo> {
    let prefix = format!("{}/", metrics_prefix);
    response
        .metric_descriptors
        .iter()
        .filter(|d| d.metric_kind == MetricKind::Gauge && d.value_type.is_numeric())
        .filter_map(|d| flat_metric_name(&prefix, d))
        .map(|metric| MetricInfo {
            group_resource: GroupResource::any(),
            metric,
            namespaced: true,
        })
        .collect()
}

fn flat_metric_name(prefix: &str, descriptor: &MetricDescriptor) -> Option<String> {
    let name = descriptor
        .metric_type
        .strip_prefix(prefix)
        .unwrap_or(&descriptor.metric_type);
    if name.is_empty() || name.contains('/') {
        None
    } else {
        Some(name.to_string())
    }
}
