//! Current resource model: `k8s_pod` and `k8s_node` monitored resources

use super::filter::{equals, join_filters, label_in, one_of, starts_with};
use super::{ensure_kind, LabelingScheme};
use crate::config::ResourceModel;
use crate::error::{Result, TranslateError};
use crate::models::{ObjectKind, ObjectRef, ResourceKey};
use crate::wire::{TimeSeries, K8S_NODE, K8S_POD};

pub struct CurrentScheme {
    project: String,
    cluster: String,
    location: String,
}

impl CurrentScheme {
    pub fn new(
        project: impl Into<String>,
        cluster: impl Into<String>,
        location: impl Into<String>,
    ) -> Self {
        Self {
            project: project.into(),
            cluster: cluster.into(),
            location: location.into(),
        }
    }

    fn cluster_clauses(&self) -> [String; 3] {
        [
            equals("resource.label.project_id", &self.project),
            equals("resource.label.cluster_name", &self.cluster),
            equals("resource.label.location", &self.location),
        ]
    }
}

impl LabelingScheme for CurrentScheme {
    fn model(&self) -> ResourceModel {
        ResourceModel::Current
    }

    fn supports(&self, _kind: ObjectKind) -> bool {
        true
    }

    fn pod_filter(&self, metric_type: &str, namespace: &str, pods: &[ObjectRef]) -> Result<String> {
        ensure_kind(pods, ObjectKind::Pod)?;
        let names: Vec<&str> = pods.iter().map(|p| p.name.as_str()).collect();

        let mut clauses = vec![equals("metric.type", metric_type)];
        clauses.extend(self.cluster_clauses());
        clauses.push(equals("resource.label.namespace_name", namespace));
        clauses.push(label_in("resource.label.pod_name", &names)?);
        // pod and container resources share the pod_name label
        clauses.push(equals("resource.type", K8S_POD));
        Ok(join_filters(&clauses))
    }

    fn node_filter(&self, metric_type: &str, nodes: &[ObjectRef]) -> Result<String> {
        ensure_kind(nodes, ObjectKind::Node)?;
        let names: Vec<&str> = nodes.iter().map(|n| n.name.as_str()).collect();

        let mut clauses = vec![equals("metric.type", metric_type)];
        clauses.extend(self.cluster_clauses());
        clauses.push(label_in("resource.label.node_name", &names)?);
        clauses.push(equals("resource.type", K8S_NODE));
        Ok(join_filters(&clauses))
    }

    fn descriptor_filter(&self, metrics_prefix: &str) -> String {
        let mut clauses = vec![starts_with("metric.type", &format!("{}/", metrics_prefix))];
        clauses.extend(self.cluster_clauses());
        clauses.push(one_of("resource.type", &[K8S_POD, K8S_NODE]));
        join_filters(&clauses)
    }

    fn series_key(&self, series: &TimeSeries) -> Result<ResourceKey> {
        let resource = &series.resource;
        match resource.resource_type.as_str() {
            K8S_POD => Ok(ResourceKey::namespaced(
                resource.label("namespace_name"),
                resource.label("pod_name"),
            )),
            K8S_NODE => Ok(ResourceKey::namespaced("", resource.label("node_name"))),
            other => Err(TranslateError::BackendContractViolation(format!(
                "backend returned unexpected resource type {:?}",
                other
            ))),
        }
    }

    fn object_key(&self, object: &ObjectRef) -> Option<ResourceKey> {
        Some(ResourceKey::namespaced(&object.namespace, &object.name))
    }
}
