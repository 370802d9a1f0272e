//! Backend request descriptions
//!
//! The translator only describes requests. Executing them, along with
//! authentication, timeouts and retries, is the transport's job.

use chrono::{DateTime, SecondsFormat, TimeDelta, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Per-series aligner used for every time series query
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Aligner {
    /// Value of the closest sample preceding each alignment boundary
    AlignNextOlder,
}

impl Aligner {
    pub fn as_str(&self) -> &'static str {
        match self {
            Aligner::AlignNextOlder => "ALIGN_NEXT_OLDER",
        }
    }
}

/// Fully assembled `projects.timeSeries.list` request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeSeriesQuery {
    /// `projects/<id>`
    pub project: String,
    pub filter: String,
    /// RFC 3339, inclusive
    pub start_time: String,
    /// RFC 3339, exclusive
    pub end_time: String,
    pub aligner: Aligner,
    /// Whole seconds with an `s` suffix, equal to the window length
    pub alignment_period: String,
}

impl TimeSeriesQuery {
    /// Query over `[end - window, end)` collapsing each series to one point
    pub fn new(project: String, filter: String, end: DateTime<Utc>, window: Duration) -> Self {
        let start = i64::try_from(window.as_secs())
            .ok()
            .and_then(TimeDelta::try_seconds)
            .and_then(|w| end.checked_sub_signed(w))
            .unwrap_or(DateTime::<Utc>::MIN_UTC);
        Self {
            project,
            filter,
            start_time: format_timestamp(start),
            end_time: format_timestamp(end),
            aligner: Aligner::AlignNextOlder,
            alignment_period: format!("{}s", window.as_secs()),
        }
    }

    /// Query parameters as named by the backend REST API
    pub fn query_params(&self) -> Vec<(&'static str, String)> {
        vec![
            ("filter", self.filter.clone()),
            ("interval.startTime", self.start_time.clone()),
            ("interval.endTime", self.end_time.clone()),
            ("aggregation.perSeriesAligner", self.aligner.as_str().to_string()),
            ("aggregation.alignmentPeriod", self.alignment_period.clone()),
        ]
    }
}

/// Assembled `projects.metricDescriptors.list` request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DescriptorQuery {
    pub project: String,
    pub filter: String,
}

impl DescriptorQuery {
    pub fn query_params(&self) -> Vec<(&'static str, String)> {
        vec![("filter", self.filter.clone())]
    }
}

/// RFC 3339 with whole seconds and a `Z` suffix
pub fn format_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Secs, true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_window_and_alignment() {
        let end = Utc.with_ymd_and_hms(2017, 1, 2, 13, 2, 0).unwrap();
        let query = TimeSeriesQuery::new(
            "projects/my-project".into(),
            "metric.type = \"x\"".into(),
            end,
            Duration::from_secs(60),
        );

        assert_eq!(query.start_time, "2017-01-02T13:01:00Z");
        assert_eq!(query.end_time, "2017-01-02T13:02:00Z");
        assert_eq!(query.alignment_period, "60s");
        assert_eq!(query.aligner, Aligner::AlignNextOlder);
    }

    #[test]
    fn test_query_params() {
        let end = Utc.with_ymd_and_hms(2017, 1, 2, 13, 2, 0).unwrap();
        let query = TimeSeriesQuery::new("projects/p".into(), "f".into(), end, Duration::from_secs(120));
        let params = query.query_params();

        assert!(params.contains(&("aggregation.perSeriesAligner", "ALIGN_NEXT_OLDER".to_string())));
        assert!(params.contains(&("aggregation.alignmentPeriod", "120s".to_string())));
        assert!(params.contains(&("interval.startTime", "2017-01-02T13:00:00Z".to_string())));
    }

    #[test]
    fn test_sub_second_precision_dropped() {
        let at = Utc.timestamp_millis_opt(1_483_362_120_750).unwrap();
        assert_eq!(format_timestamp(at), "2017-01-02T13:02:00Z");
    }

    #[test]
    fn test_serialized_shape() {
        let end = Utc.with_ymd_and_hms(2017, 1, 2, 13, 2, 0).unwrap();
        let query = TimeSeriesQuery::new("projects/p".into(), "f".into(), end, Duration::from_secs(60));
        let json = serde_json::to_value(&query).unwrap();
        assert_eq!(json["aligner"], "ALIGN_NEXT_OLDER");
        assert_eq!(json["alignmentPeriod"], "60s");
    }
}
