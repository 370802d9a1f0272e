//! Core data models for the metrics adapter

use crate::kinds::GroupResource;
use crate::quantity::Quantity;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Kubernetes object kinds the adapter can query metrics for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ObjectKind {
    Pod,
    Node,
}

impl ObjectKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ObjectKind::Pod => "Pod",
            ObjectKind::Node => "Node",
        }
    }
}

impl fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Reference to an object whose metric is requested
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectRef {
    pub kind: ObjectKind,
    pub name: String,
    /// Set for pods, empty for nodes
    #[serde(default)]
    pub namespace: String,
    /// Pod UID, needed only by the legacy resource model
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uid: Option<String>,
}

impl ObjectRef {
    pub fn pod(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            kind: ObjectKind::Pod,
            name: name.into(),
            namespace: namespace.into(),
            uid: None,
        }
    }

    pub fn node(name: impl Into<String>) -> Self {
        Self {
            kind: ObjectKind::Node,
            name: name.into(),
            namespace: String::new(),
            uid: None,
        }
    }

    pub fn with_uid(mut self, uid: impl Into<String>) -> Self {
        self.uid = Some(uid.into());
        self
    }
}

/// Identifies which requested object a time series belongs to
///
/// `<namespace>:<pod>` for pods and `:<node>` for nodes in the current
/// resource model, the pod UID in the legacy one.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ResourceKey(pub String);

impl ResourceKey {
    pub fn namespaced(namespace: &str, name: &str) -> Self {
        Self(format!("{}:{}", namespace, name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ResourceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Object a metric value describes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectReference {
    pub api_version: String,
    pub kind: String,
    pub name: String,
    #[serde(default)]
    pub namespace: String,
}

/// One metric value in the custom metrics API shape
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricValue {
    pub described_object: ObjectReference,
    pub metric_name: String,
    pub timestamp: DateTime<Utc>,
    pub value: Quantity,
}

/// A custom metric the backend can serve
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricInfo {
    pub group_resource: GroupResource,
    pub metric: String,
    pub namespaced: bool,
}
