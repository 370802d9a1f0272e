//! Translation between custom metrics requests and backend queries
//!
//! A [`Translator`] holds only immutable configuration and is safe to share
//! across threads. It builds query descriptions for the caller to execute
//! and folds the raw responses back into per-object metric values.

mod aggregate;
mod descriptors;
mod mapper;

pub use aggregate::{aggregate_response, AggregatedValues};
pub use descriptors::metrics_from_descriptors;
pub use mapper::{ResultMapper, INTERNAL_API_VERSION};

use crate::clock::Clock;
use crate::config::{ConfigError, ResourceModel, TranslatorConfig};
use crate::error::{Result, TranslateError};
use crate::kinds::{GroupResource, KindResolver};
use crate::models::{MetricInfo, MetricValue, ObjectKind, ObjectRef};
use crate::observability::TranslationLogger;
use crate::query::{DescriptorQuery, TimeSeriesQuery};
use crate::scheme::{create_scheme, LabelingScheme, ONE_OF_MAX};
use crate::wire::{ListMetricDescriptorsResponse, ListTimeSeriesResponse};
use std::sync::Arc;

/// Translator between the custom metrics API and the monitoring backend
pub struct Translator {
    config: TranslatorConfig,
    scheme: Box<dyn LabelingScheme>,
    clock: Arc<dyn Clock>,
    resolver: Arc<dyn KindResolver>,
    logger: TranslationLogger,
}

impl Translator {
    /// Create a translator for a validated configuration
    pub fn new(
        config: TranslatorConfig,
        clock: Arc<dyn Clock>,
        resolver: Arc<dyn KindResolver>,
    ) -> std::result::Result<Self, ConfigError> {
        config.validate()?;
        let scheme = create_scheme(&config);
        let logger = TranslationLogger::new(&config.project, &config.cluster);
        Ok(Self {
            config,
            scheme,
            clock,
            resolver,
            logger,
        })
    }

    pub fn config(&self) -> &TranslatorConfig {
        &self.config
    }

    pub fn resource_model(&self) -> ResourceModel {
        self.scheme.model()
    }

    /// Query for `metric_name` on pods of one namespace
    ///
    /// `pods` must hold between 1 and [`ONE_OF_MAX`] objects.
    pub fn pods_query(
        &self,
        pods: &[ObjectRef],
        metric_name: &str,
        namespace: &str,
    ) -> Result<TimeSeriesQuery> {
        check_batch_size(pods.len())?;
        let filter = self
            .scheme
            .pod_filter(&self.config.metric_type(metric_name), namespace, pods)?;
        self.logger
            .log_query_built(ObjectKind::Pod, metric_name, pods.len(), &filter);
        Ok(self.time_series_query(filter))
    }

    /// Query for `metric_name` on nodes
    ///
    /// Only available under the current resource model.
    pub fn nodes_query(&self, nodes: &[ObjectRef], metric_name: &str) -> Result<TimeSeriesQuery> {
        if !self.scheme.supports(ObjectKind::Node) {
            return Err(TranslateError::UnsupportedOperation(format!(
                "root scoped metrics are not supported by the {} resource model",
                self.scheme.model()
            )));
        }
        check_batch_size(nodes.len())?;
        let filter = self
            .scheme
            .node_filter(&self.config.metric_type(metric_name), nodes)?;
        self.logger
            .log_query_built(ObjectKind::Node, metric_name, nodes.len(), &filter);
        Ok(self.time_series_query(filter))
    }

    /// Query listing every custom metric descriptor of the cluster
    pub fn descriptors_query(&self) -> DescriptorQuery {
        DescriptorQuery {
            project: self.config.project_path(),
            filter: self.scheme.descriptor_filter(&self.config.metrics_prefix),
        }
    }

    /// Metric value of the single object a query was built for
    pub fn single_object_value(
        &self,
        response: &ListTimeSeriesResponse,
        resource: &GroupResource,
        metric_name: &str,
        namespace: &str,
        name: &str,
    ) -> Result<MetricValue> {
        let values = self.aggregate(response, resource, metric_name)?;
        let value = self
            .mapper()
            .single(&values, resource, metric_name, namespace, name)
            .inspect_err(|err| self.report(metric_name, err))?;
        self.logger
            .log_response_translated(resource, metric_name, response.time_series.len(), 1);
        Ok(value)
    }

    /// Metric values for `objects`, in their order, omitting objects without series
    pub fn multiple_object_values(
        &self,
        response: &ListTimeSeriesResponse,
        objects: &[ObjectRef],
        resource: &GroupResource,
        metric_name: &str,
    ) -> Result<Vec<MetricValue>> {
        let values = self.aggregate(response, resource, metric_name)?;
        let result = self
            .mapper()
            .batch(self.scheme.as_ref(), &values, resource, metric_name, objects)?;
        self.logger.log_response_translated(
            resource,
            metric_name,
            response.time_series.len(),
            result.len(),
        );
        Ok(result)
    }

    /// Custom metrics exposed by a descriptor listing
    pub fn metrics_from_descriptors(&self, response: &ListMetricDescriptorsResponse) -> Vec<MetricInfo> {
        let metrics = metrics_from_descriptors(&self.config.metrics_prefix, response);
        self.logger
            .log_descriptors_listed(response.metric_descriptors.len(), metrics.len());
        metrics
    }

    fn time_series_query(&self, filter: String) -> TimeSeriesQuery {
        TimeSeriesQuery::new(
            self.config.project_path(),
            filter,
            self.clock.now(),
            self.config.request_window(),
        )
    }

    fn aggregate(
        &self,
        response: &ListTimeSeriesResponse,
        resource: &GroupResource,
        metric_name: &str,
    ) -> Result<AggregatedValues> {
        aggregate_response(self.scheme.as_ref(), response, resource, metric_name)
            .inspect_err(|err| self.report(metric_name, err))
    }

    fn mapper(&self) -> ResultMapper<'_> {
        ResultMapper::new(self.resolver.as_ref(), &self.logger, self.clock.now())
    }

    fn report(&self, metric_name: &str, err: &TranslateError) {
        if let TranslateError::BackendContractViolation(details) = err {
            self.logger.log_contract_violation(metric_name, details);
        }
    }
}

fn check_batch_size(count: usize) -> Result<()> {
    if count == 0 {
        return Err(TranslateError::InvalidSelector);
    }
    if count > ONE_OF_MAX {
        return Err(TranslateError::BatchTooLarge {
            count,
            limit: ONE_OF_MAX,
        });
    }
    Ok(())
}
