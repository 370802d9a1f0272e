//! Resource labeling schemes
//!
//! The backend has labeled Kubernetes series in two incompatible ways over
//! time. Each [`LabelingScheme`] knows how to phrase filters for one of them
//! and how to tell which requested object a returned series belongs to.

mod current;
mod filter;
mod legacy;

pub use current::CurrentScheme;
pub use filter::{equals, join_filters, label_in, not_equals, one_of, quote, starts_with, ONE_OF_MAX};
pub use legacy::LegacyScheme;

use crate::config::{ResourceModel, TranslatorConfig};
use crate::error::{Result, TranslateError};
use crate::models::{ObjectKind, ObjectRef, ResourceKey};
use crate::wire::TimeSeries;

/// Filter construction and key derivation for one resource model
pub trait LabelingScheme: Send + Sync {
    fn model(&self) -> ResourceModel;

    /// Whether series for objects of `kind` exist under this model
    fn supports(&self, kind: ObjectKind) -> bool;

    /// Filter selecting `metric_type` for the given pods of `namespace`
    fn pod_filter(&self, metric_type: &str, namespace: &str, pods: &[ObjectRef]) -> Result<String>;

    /// Filter selecting `metric_type` for the given nodes
    fn node_filter(&self, metric_type: &str, nodes: &[ObjectRef]) -> Result<String>;

    /// Filter for discovering descriptors under `metrics_prefix`
    fn descriptor_filter(&self, metrics_prefix: &str) -> String;

    /// Key of the object a returned series was reported for
    fn series_key(&self, series: &TimeSeries) -> Result<ResourceKey>;

    /// Key a requested object is expected to appear under, if addressable
    fn object_key(&self, object: &ObjectRef) -> Option<ResourceKey>;
}

/// Create the scheme matching the configured resource model
pub fn create_scheme(config: &TranslatorConfig) -> Box<dyn LabelingScheme> {
    match config.resource_model {
        ResourceModel::Current => {
            tracing::debug!("Using current resource model labeling");
            Box::new(CurrentScheme::new(&config.project, &config.cluster, &config.location))
        }
        ResourceModel::Legacy => {
            tracing::debug!("Using legacy resource model labeling");
            Box::new(LegacyScheme::new(&config.project, &config.cluster))
        }
    }
}

/// Refuse objects that are not of the kind a builder handles
pub(crate) fn ensure_kind(objects: &[ObjectRef], expected: ObjectKind) -> Result<()> {
    match objects.iter().find(|o| o.kind != expected) {
        Some(other) => Err(TranslateError::KindMismatch {
            expected: expected.as_str(),
            found: other.kind.as_str(),
            name: other.name.clone(),
        }),
        None => Ok(()),
    }
}
