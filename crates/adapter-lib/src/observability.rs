//! Structured logging for translation events
//!
//! Every record carries an `event` field so log pipelines can select
//! adapter events without parsing messages.

use crate::kinds::GroupResource;
use crate::models::{ObjectKind, ObjectRef};
use tracing::{debug, info, warn};

/// Logger tagging translation events with the cluster they concern
#[derive(Debug, Clone)]
pub struct TranslationLogger {
    project: String,
    cluster: String,
}

impl TranslationLogger {
    pub fn new(project: impl Into<String>, cluster: impl Into<String>) -> Self {
        Self {
            project: project.into(),
            cluster: cluster.into(),
        }
    }

    /// Log a time series query ready for the transport
    pub fn log_query_built(&self, kind: ObjectKind, metric_name: &str, objects: usize, filter: &str) {
        debug!(
            event = "query_built",
            project = %self.project,
            cluster = %self.cluster,
            object_kind = %kind,
            metric = %metric_name,
            objects = objects,
            filter = %filter,
            "Built time series query"
        );
    }

    /// Log a response folded into metric values
    pub fn log_response_translated(
        &self,
        resource: &GroupResource,
        metric_name: &str,
        series: usize,
        values: usize,
    ) {
        debug!(
            event = "response_translated",
            project = %self.project,
            cluster = %self.cluster,
            resource = %resource,
            metric = %metric_name,
            series = series,
            values = values,
            "Translated time series response"
        );
    }

    /// Log a requested object that had no matching series
    pub fn log_object_skipped(&self, object: &ObjectRef, metric_name: &str) {
        debug!(
            event = "object_skipped",
            object_kind = %object.kind,
            namespace = %object.namespace,
            name = %object.name,
            metric = %metric_name,
            "Metric not found for object"
        );
    }

    /// Log a response that does not match what the query asked for
    pub fn log_contract_violation(&self, metric_name: &str, details: &str) {
        warn!(
            event = "backend_contract_violation",
            project = %self.project,
            cluster = %self.cluster,
            metric = %metric_name,
            details = %details,
            "Backend response violates query contract"
        );
    }

    /// Log the outcome of descriptor discovery
    pub fn log_descriptors_listed(&self, listed: usize, exposed: usize) {
        info!(
            event = "descriptors_listed",
            project = %self.project,
            cluster = %self.cluster,
            listed = listed,
            exposed = exposed,
            "Filtered custom metric descriptors"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{self, Write};
    use std::sync::{Arc, Mutex};

    #[test]
    fn test_logger_creation() {
        let logger = TranslationLogger::new("my-project", "my-cluster");
        assert_eq!(logger.project, "my-project");
        assert_eq!(logger.cluster, "my-cluster");
    }

    #[derive(Clone, Default)]
    struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

    impl Write for CapturedLogs {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl CapturedLogs {
        fn records(&self) -> Vec<serde_json::Value> {
            let bytes = self.0.lock().unwrap();
            String::from_utf8_lossy(&bytes)
                .lines()
                .map(|line| serde_json::from_str(line).unwrap())
                .collect()
        }
    }

    fn capture(emit: impl FnOnce()) -> Vec<serde_json::Value> {
        let logs = CapturedLogs::default();
        let writer = logs.clone();
        let subscriber = tracing_subscriber::fmt()
            .json()
            .with_max_level(tracing::Level::DEBUG)
            .with_writer(move || writer.clone())
            .finish();
        tracing::subscriber::with_default(subscriber, emit);
        logs.records()
    }

    #[test]
    fn test_events_carry_event_field() {
        let logger = TranslationLogger::new("p", "c");
        let records = capture(|| {
            logger.log_query_built(ObjectKind::Pod, "qps", 2, "metric.type = \"x\"");
            logger.log_object_skipped(&ObjectRef::pod("ns", "a"), "qps");
            logger.log_descriptors_listed(3, 1);
        });

        assert_eq!(records.len(), 3);
        let events: Vec<&str> = records
            .iter()
            .map(|r| r["fields"]["event"].as_str().unwrap())
            .collect();
        assert_eq!(events, ["query_built", "object_skipped", "descriptors_listed"]);

        assert_eq!(records[0]["level"], "DEBUG");
        assert_eq!(records[0]["fields"]["project"], "p");
        assert_eq!(records[0]["fields"]["objects"], 2);
        assert_eq!(records[1]["fields"]["name"], "a");
        assert_eq!(records[2]["level"], "INFO");
        assert_eq!(records[2]["fields"]["exposed"], 1);
    }

    #[test]
    fn test_contract_violation_logged_as_warning() {
        let logger = TranslationLogger::new("p", "c");
        let records = capture(|| logger.log_contract_violation("qps", "2 points"));

        assert_eq!(records.len(), 1);
        assert_eq!(records[0]["level"], "WARN");
        assert_eq!(records[0]["fields"]["event"], "backend_contract_violation");
        assert_eq!(records[0]["fields"]["details"], "2 points");
    }
}
