//! Legacy resource model: pods addressed by opaque `pod_id` labels
//!
//! The location label is never used for scoping here; the agents that wrote
//! legacy series populated it unreliably.

use super::filter::{equals, join_filters, label_in, not_equals, starts_with};
use super::{ensure_kind, LabelingScheme};
use crate::config::ResourceModel;
use crate::error::{Result, TranslateError};
use crate::models::{ObjectKind, ObjectRef, ResourceKey};
use crate::wire::TimeSeries;

pub struct LegacyScheme {
    project: String,
    cluster: String,
}

impl LegacyScheme {
    pub fn new(project: impl Into<String>, cluster: impl Into<String>) -> Self {
        Self {
            project: project.into(),
            cluster: cluster.into(),
        }
    }

    /// Project and cluster scoping, restricted to pod-level rows
    fn cluster_clauses(&self) -> [String; 3] {
        [
            equals("resource.label.project_id", &self.project),
            equals("resource.label.cluster_name", &self.cluster),
            equals("resource.label.container_name", ""),
        ]
    }

    /// Excludes the synthetic whole-machine rows
    fn any_pod_clauses() -> [String; 2] {
        [
            not_equals("resource.label.pod_id", ""),
            not_equals("resource.label.pod_id", "machine"),
        ]
    }
}

impl LabelingScheme for LegacyScheme {
    fn model(&self) -> ResourceModel {
        ResourceModel::Legacy
    }

    fn supports(&self, kind: ObjectKind) -> bool {
        kind == ObjectKind::Pod
    }

    fn pod_filter(&self, metric_type: &str, _namespace: &str, pods: &[ObjectRef]) -> Result<String> {
        ensure_kind(pods, ObjectKind::Pod)?;
        let ids = pods
            .iter()
            .map(|p| {
                p.uid.as_deref().ok_or_else(|| TranslateError::MissingObjectUid {
                    name: p.name.clone(),
                })
            })
            .collect::<Result<Vec<&str>>>()?;

        let mut clauses = vec![equals("metric.type", metric_type)];
        clauses.extend(self.cluster_clauses());
        clauses.push(label_in("resource.label.pod_id", &ids)?);
        Ok(join_filters(&clauses))
    }

    fn node_filter(&self, _metric_type: &str, _nodes: &[ObjectRef]) -> Result<String> {
        Err(TranslateError::UnsupportedOperation(
            "root scoped metrics are not supported without the current resource model".to_string(),
        ))
    }

    fn descriptor_filter(&self, metrics_prefix: &str) -> String {
        let mut clauses = vec![starts_with("metric.type", &format!("{}/", metrics_prefix))];
        clauses.extend(self.cluster_clauses());
        clauses.extend(Self::any_pod_clauses());
        join_filters(&clauses)
    }

    fn series_key(&self, series: &TimeSeries) -> Result<ResourceKey> {
        Ok(ResourceKey(series.resource.label("pod_id").to_string()))
    }

    fn object_key(&self, object: &ObjectRef) -> Option<ResourceKey> {
        object.uid.clone().map(ResourceKey)
    }
}
