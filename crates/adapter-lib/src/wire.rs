//! JSON models of the monitoring backend's list responses
//!
//! Only the fields the translator reads are modeled. Unknown fields are
//! ignored, and missing lists default to empty because the backend omits
//! them when there is nothing to return.

use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashMap;

/// Monitored resource type for pods in the current resource model
pub const K8S_POD: &str = "k8s_pod";

/// Monitored resource type for nodes in the current resource model
pub const K8S_NODE: &str = "k8s_node";

/// Response of `projects.timeSeries.list`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListTimeSeriesResponse {
    #[serde(default)]
    pub time_series: Vec<TimeSeries>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_page_token: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeSeries {
    #[serde(default)]
    pub metric: Metric,
    #[serde(default)]
    pub resource: MonitoredResource,
    #[serde(default)]
    pub metric_kind: MetricKind,
    #[serde(default)]
    pub value_type: ValueType,
    #[serde(default)]
    pub points: Vec<Point>,
}

impl TimeSeries {
    /// Series on `resource` carrying a single point
    pub fn with_point(resource: MonitoredResource, value: TypedValue) -> Self {
        Self {
            resource,
            points: vec![Point {
                interval: None,
                value,
            }],
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Metric {
    #[serde(rename = "type", default)]
    pub metric_type: String,
    #[serde(default)]
    pub labels: HashMap<String, String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MonitoredResource {
    #[serde(rename = "type", default)]
    pub resource_type: String,
    #[serde(default)]
    pub labels: HashMap<String, String>,
}

impl MonitoredResource {
    pub fn new<'a>(
        resource_type: impl Into<String>,
        labels: impl IntoIterator<Item = (&'a str, &'a str)>,
    ) -> Self {
        Self {
            resource_type: resource_type.into(),
            labels: labels
                .into_iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        }
    }

    /// Label value, empty when the label is absent
    pub fn label(&self, name: &str) -> &str {
        self.labels.get(name).map(String::as_str).unwrap_or("")
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Point {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interval: Option<TimeInterval>,
    #[serde(default)]
    pub value: TypedValue,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeInterval {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_time: Option<String>,
}

/// Sample value; at most one field is set by a well-behaved backend
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypedValue {
    #[serde(
        default,
        deserialize_with = "deserialize_int64",
        skip_serializing_if = "Option::is_none"
    )]
    pub int64_value: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub double_value: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bool_value: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub string_value: Option<String>,
}

impl TypedValue {
    pub fn int64(value: i64) -> Self {
        Self {
            int64_value: Some(value),
            ..Default::default()
        }
    }

    pub fn double(value: f64) -> Self {
        Self {
            double_value: Some(value),
            ..Default::default()
        }
    }

    /// Numeric content of the value; integers win when both are present
    pub fn sample(&self) -> Option<Sample> {
        match (self.int64_value, self.double_value) {
            (Some(v), _) => Some(Sample::Integer(v)),
            (None, Some(v)) => Some(Sample::Floating(v)),
            (None, None) => None,
        }
    }
}

/// Numeric sample extracted from a [`TypedValue`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Sample {
    Integer(i64),
    Floating(f64),
}

/// 64-bit integers arrive as JSON strings; plain numbers are accepted too
fn deserialize_int64<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Int64Repr {
        Number(i64),
        Text(String),
    }

    match Option::<Int64Repr>::deserialize(deserializer)? {
        None => Ok(None),
        Some(Int64Repr::Number(n)) => Ok(Some(n)),
        Some(Int64Repr::Text(s)) => s.parse().map(Some).map_err(serde::de::Error::custom),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MetricKind {
    Gauge,
    Delta,
    Cumulative,
    #[default]
    #[serde(rename = "METRIC_KIND_UNSPECIFIED", other)]
    Unspecified,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ValueType {
    Bool,
    Int64,
    Double,
    String,
    Distribution,
    Money,
    #[default]
    #[serde(rename = "VALUE_TYPE_UNSPECIFIED", other)]
    Unspecified,
}

impl ValueType {
    pub fn is_numeric(&self) -> bool {
        matches!(self, ValueType::Int64 | ValueType::Double)
    }
}

/// Response of `projects.metricDescriptors.list`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListMetricDescriptorsResponse {
    #[serde(default)]
    pub metric_descriptors: Vec<MetricDescriptor>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_page_token: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricDescriptor {
    #[serde(rename = "type", default)]
    pub metric_type: String,
    #[serde(default)]
    pub metric_kind: MetricKind,
    #[serde(default)]
    pub value_type: ValueType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}
