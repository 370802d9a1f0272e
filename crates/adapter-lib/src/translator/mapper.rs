//! Mapping aggregated quantities to metric values

use super::aggregate::AggregatedValues;
use crate::error::{Result, TranslateError};
use crate::kinds::{GroupResource, KindResolver};
use crate::models::{MetricValue, ObjectReference, ObjectRef};
use crate::observability::TranslationLogger;
use crate::quantity::Quantity;
use crate::scheme::LabelingScheme;
use chrono::{DateTime, Utc};

/// Version placeholder used in described object references
pub const INTERNAL_API_VERSION: &str = "__internal";

/// Builds metric values stamped with one timestamp
pub struct ResultMapper<'a> {
    resolver: &'a dyn KindResolver,
    logger: &'a TranslationLogger,
    timestamp: DateTime<Utc>,
}

impl<'a> ResultMapper<'a> {
    pub fn new(
        resolver: &'a dyn KindResolver,
        logger: &'a TranslationLogger,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            resolver,
            logger,
            timestamp,
        }
    }

    /// Metric value for one object
    pub fn metric_value(
        &self,
        value: Quantity,
        resource: &GroupResource,
        metric_name: &str,
        namespace: &str,
        name: &str,
    ) -> Result<MetricValue> {
        let kind = self.resolver.kind_for(resource)?;
        Ok(MetricValue {
            described_object: ObjectReference {
                api_version: format!("{}/{}", resource.group, INTERNAL_API_VERSION),
                kind,
                name: name.to_string(),
                namespace: namespace.to_string(),
            },
            metric_name: metric_name.to_string(),
            timestamp: self.timestamp,
            value,
        })
    }

    /// The single value a query for one object must produce
    pub fn single(
        &self,
        values: &AggregatedValues,
        resource: &GroupResource,
        metric_name: &str,
        namespace: &str,
        name: &str,
    ) -> Result<MetricValue> {
        let mut iter = values.values();
        match (iter.next(), iter.next()) {
            (Some(value), None) => self.metric_value(*value, resource, metric_name, namespace, name),
            _ => Err(TranslateError::BackendContractViolation(format!(
                "expected exactly one value for resource {:?} in namespace {:?}, but received {} values",
                name,
                namespace,
                values.len()
            ))),
        }
    }

    /// Values for `objects` in their given order, skipping objects with no series
    pub fn batch(
        &self,
        scheme: &dyn LabelingScheme,
        values: &AggregatedValues,
        resource: &GroupResource,
        metric_name: &str,
        objects: &[ObjectRef],
    ) -> Result<Vec<MetricValue>> {
        let mut result = Vec::with_capacity(objects.len().min(values.len()));
        for object in objects {
            let value = match scheme.object_key(object).and_then(|key| values.get(&key)) {
                Some(value) => *value,
                None => {
                    self.logger.log_object_skipped(object, metric_name);
                    continue;
                }
            };
            result.push(self.metric_value(
                value,
                resource,
                metric_name,
                &object.namespace,
                &object.name,
            )?);
        }
        Ok(result)
    }
}
