//! Folding a time series response into one quantity per resource key
//!
//! The backend filter language cannot express every restriction a request
//! needs, and one object may report several overlapping series, so values
//! are summed per key rather than read one series per object.

use crate::error::{Result, TranslateError};
use crate::kinds::GroupResource;
use crate::models::ResourceKey;
use crate::quantity::{Quantity, QuantityAccumulator};
use crate::scheme::LabelingScheme;
use crate::wire::{ListTimeSeriesResponse, Sample};
use std::collections::BTreeMap;

/// Summed value per resource key
pub type AggregatedValues = BTreeMap<ResourceKey, Quantity>;

/// Sum every series of `response` into its resource key
///
/// Fails with `MetricNotFound` when there are no series at all, and with a
/// contract violation when a series does not hold exactly one point.
pub fn aggregate_response(
    scheme: &dyn LabelingScheme,
    response: &ListTimeSeriesResponse,
    resource: &GroupResource,
    metric_name: &str,
) -> Result<AggregatedValues> {
    if response.time_series.is_empty() {
        return Err(TranslateError::MetricNotFound {
            resource: resource.clone(),
            metric: metric_name.to_string(),
        });
    }

    let mut sums: BTreeMap<ResourceKey, QuantityAccumulator> = BTreeMap::new();
    for series in &response.time_series {
        if series.points.len() != 1 {
            return Err(TranslateError::BackendContractViolation(format!(
                "expected exactly one point in time series, but received {}",
                series.points.len()
            )));
        }
        let key = scheme.series_key(series)?;
        let value = &series.points[0].value;

        let sum = sums.entry(key).or_default();
        match value.sample() {
            Some(Sample::Integer(v)) => sum.add_integer(v)?,
            Some(Sample::Floating(v)) => sum.add_floating(v)?,
            None => {
                return Err(TranslateError::MalformedSample(format!(
                    "expected int64Value or doubleValue, but received {:?}",
                    value
                )))
            }
        }
    }

    sums.into_iter()
        .map(|(key, acc)| Ok((key, acc.finish()?)))
        .collect()
}
