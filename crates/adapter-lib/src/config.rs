//! Translator configuration
//!
//! Identifies the monitoring project and the cluster whose series are
//! queried, and fixes the labeling convention for the lifetime of a
//! translator.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

/// Default metric type prefix for custom metrics
pub const DEFAULT_METRICS_PREFIX: &str = "custom.googleapis.com";

/// Default query window in seconds
pub const DEFAULT_REQUEST_WINDOW_SECS: u64 = 60;

/// Resource labeling convention used by the backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceModel {
    /// Opaque `pod_id` labels, cluster scoping only, no node series
    Legacy,
    /// `k8s_pod`/`k8s_node` resources with namespace, pod and node labels
    #[default]
    Current,
}

impl fmt::Display for ResourceModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResourceModel::Legacy => write!(f, "legacy"),
            ResourceModel::Current => write!(f, "current"),
        }
    }
}

impl FromStr for ResourceModel {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "legacy" | "old" => Ok(ResourceModel::Legacy),
            "current" | "new" => Ok(ResourceModel::Current),
            other => Err(ConfigError::UnknownResourceModel(other.to_string())),
        }
    }
}

/// Configuration problems detected before a translator is built
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("unknown resource model {0:?}, expected \"legacy\" or \"current\"")]
    UnknownResourceModel(String),

    #[error("{0} must not be empty")]
    MissingField(&'static str),

    #[error("request window must be at least one second")]
    ZeroWindow,
}

/// Immutable translator settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranslatorConfig {
    /// Monitoring project id
    pub project: String,

    /// Cluster name as recorded on resource labels
    pub cluster: String,

    /// Cluster location; ignored by the legacy resource model
    #[serde(default)]
    pub location: String,

    /// Prefix of every custom metric type, without trailing slash
    #[serde(default = "default_metrics_prefix")]
    pub metrics_prefix: String,

    #[serde(default)]
    pub resource_model: ResourceModel,

    /// Length of the query window in seconds
    #[serde(default = "default_request_window_secs")]
    pub request_window_secs: u64,
}

fn default_metrics_prefix() -> String {
    DEFAULT_METRICS_PREFIX.to_string()
}

fn default_request_window_secs() -> u64 {
    DEFAULT_REQUEST_WINDOW_SECS
}

impl TranslatorConfig {
    pub fn new(
        project: impl Into<String>,
        cluster: impl Into<String>,
        location: impl Into<String>,
    ) -> Self {
        Self {
            project: project.into(),
            cluster: cluster.into(),
            location: location.into(),
            metrics_prefix: default_metrics_prefix(),
            resource_model: ResourceModel::default(),
            request_window_secs: default_request_window_secs(),
        }
    }

    pub fn with_resource_model(mut self, model: ResourceModel) -> Self {
        self.resource_model = model;
        self
    }

    pub fn with_metrics_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.metrics_prefix = prefix.into();
        self
    }

    pub fn with_request_window(mut self, window: Duration) -> Self {
        self.request_window_secs = window.as_secs();
        self
    }

    /// Query window as a duration
    pub fn request_window(&self) -> Duration {
        Duration::from_secs(self.request_window_secs)
    }

    /// Full metric type for a custom metric name
    pub fn metric_type(&self, metric_name: &str) -> String {
        format!("{}/{}", self.metrics_prefix, metric_name)
    }

    /// Project resource path, `projects/<id>`
    pub fn project_path(&self) -> String {
        format!("projects/{}", self.project)
    }

    /// Check that every field the configured resource model needs is set
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.project.is_empty() {
            return Err(ConfigError::MissingField("project"));
        }
        if self.cluster.is_empty() {
            return Err(ConfigError::MissingField("cluster"));
        }
        if self.resource_model == ResourceModel::Current && self.location.is_empty() {
            return Err(ConfigError::MissingField("location"));
        }
        if self.metrics_prefix.is_empty() {
            return Err(ConfigError::MissingField("metrics_prefix"));
        }
        if self.request_window_secs == 0 {
            return Err(ConfigError::ZeroWindow);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_from_json() {
        let config: TranslatorConfig =
            serde_json::from_str(r#"{"project": "my-project", "cluster": "my-cluster", "location": "us-central1-a"}"#)
                .unwrap();
        assert_eq!(config.metrics_prefix, DEFAULT_METRICS_PREFIX);
        assert_eq!(config.resource_model, ResourceModel::Current);
        assert_eq!(config.request_window(), Duration::from_secs(60));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_resource_model_parsing() {
        assert_eq!("legacy".parse::<ResourceModel>().unwrap(), ResourceModel::Legacy);
        assert_eq!("Current".parse::<ResourceModel>().unwrap(), ResourceModel::Current);
        assert!("hybrid".parse::<ResourceModel>().is_err());
    }

    #[test]
    fn test_legacy_model_does_not_need_location() {
        let config = TranslatorConfig::new("p", "c", "").with_resource_model(ResourceModel::Legacy);
        assert!(config.validate().is_ok());

        let config = config.with_resource_model(ResourceModel::Current);
        assert!(matches!(config.validate(), Err(ConfigError::MissingField("location"))));
    }

    #[test]
    fn test_zero_window_rejected() {
        let config = TranslatorConfig::new("p", "c", "l").with_request_window(Duration::from_millis(500));
        assert!(matches!(config.validate(), Err(ConfigError::ZeroWindow)));
    }

    #[test]
    fn test_metric_type_and_project_path() {
        let config = TranslatorConfig::new("my-project", "c", "l");
        assert_eq!(config.metric_type("qps"), "custom.googleapis.com/qps");
        assert_eq!(config.project_path(), "projects/my-project");
    }
}
