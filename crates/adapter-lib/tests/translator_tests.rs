//! End-to-end tests of the translator: request building, response
//! aggregation and result mapping for both resource models.

use adapter_lib::wire::{
    ListMetricDescriptorsResponse, ListTimeSeriesResponse, MonitoredResource, TimeSeries,
    TypedValue, K8S_NODE, K8S_POD,
};
use adapter_lib::{
    ErrorClass, FixedClock, GroupResource, ObjectRef, Quantity, ResourceModel, StaticKindResolver,
    TranslateError, Translator, TranslatorConfig,
};
use chrono::{DateTime, TimeZone, Utc};
use std::sync::Arc;

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2017, 1, 2, 13, 2, 0).unwrap()
}

fn translator(model: ResourceModel) -> Translator {
    let config = TranslatorConfig::new("my-project", "my-cluster", "my-zone").with_resource_model(model);
    Translator::new(
        config,
        Arc::new(FixedClock::new(now())),
        Arc::new(StaticKindResolver::new()),
    )
    .unwrap()
}

fn pods(count: usize) -> Vec<ObjectRef> {
    (0..count)
        .map(|i| ObjectRef::pod("ns1", format!("pod-{}", i)).with_uid(format!("uid-{}", i)))
        .collect()
}

fn response(series: Vec<TimeSeries>) -> ListTimeSeriesResponse {
    ListTimeSeriesResponse {
        time_series: series,
        next_page_token: None,
    }
}

fn pod_series(namespace: &str, name: &str, value: TypedValue) -> TimeSeries {
    TimeSeries::with_point(
        MonitoredResource::new(K8S_POD, [("namespace_name", namespace), ("pod_name", name)]),
        value,
    )
}

#[test]
fn test_pod_filter_contains_every_name_once() {
    let translator = translator(ResourceModel::Current);
    for count in [1, 2, 37, 100] {
        let objects = pods(count);
        let query = translator.pods_query(&objects, "qps", "ns1").unwrap();

        for object in &objects {
            let literal = format!("\"{}\"", object.name);
            assert_eq!(query.filter.matches(&literal).count(), 1, "{} in {}", literal, count);
        }
        assert_eq!(query.filter.contains("one_of("), count > 1);
    }
}

#[test]
fn test_legacy_filter_contains_every_uid_once() {
    let translator = translator(ResourceModel::Legacy);
    for count in [1, 100] {
        let objects = pods(count);
        let query = translator.pods_query(&objects, "qps", "ns1").unwrap();
        for object in &objects {
            let literal = format!("\"{}\"", object.uid.as_deref().unwrap());
            assert_eq!(query.filter.matches(&literal).count(), 1);
        }
        assert_eq!(query.filter.contains("one_of("), count > 1);
        assert!(!query.filter.contains("resource.label.location"));
    }
}

#[test]
fn test_batch_bounds_checked_before_building() {
    let translator = translator(ResourceModel::Current);

    let err = translator.pods_query(&[], "qps", "ns1").unwrap_err();
    assert!(matches!(err, TranslateError::InvalidSelector));
    assert_eq!(err.class(), ErrorClass::BadRequest);

    let err = translator.pods_query(&pods(101), "qps", "ns1").unwrap_err();
    assert!(matches!(err, TranslateError::BatchTooLarge { count: 101, limit: 100 }));
    assert_eq!(err.class(), ErrorClass::Internal);

    let nodes: Vec<ObjectRef> = (0..150).map(|i| ObjectRef::node(format!("n{}", i))).collect();
    assert!(matches!(
        translator.nodes_query(&nodes, "qps"),
        Err(TranslateError::BatchTooLarge { .. })
    ));
}

#[test]
fn test_legacy_nodes_always_unsupported() {
    let translator = translator(ResourceModel::Legacy);
    let valid = vec![ObjectRef::node("node-1")];
    let oversized: Vec<ObjectRef> = (0..101).map(|i| ObjectRef::node(format!("n{}", i))).collect();

    for nodes in [Vec::new(), valid, oversized] {
        let err = translator.nodes_query(&nodes, "qps").unwrap_err();
        assert!(matches!(err, TranslateError::UnsupportedOperation(_)));
        assert_eq!(err.class(), ErrorClass::NotSupported);
    }
}

#[test]
fn test_query_window_and_project() {
    let translator = translator(ResourceModel::Current);
    let query = translator
        .nodes_query(&[ObjectRef::node("node-1")], "qps")
        .unwrap();

    assert_eq!(query.project, "projects/my-project");
    assert_eq!(query.start_time, "2017-01-02T13:01:00Z");
    assert_eq!(query.end_time, "2017-01-02T13:02:00Z");
    assert_eq!(query.alignment_period, "60s");
    assert!(query
        .filter
        .starts_with("metric.type = \"custom.googleapis.com/qps\""));
    assert!(query.filter.contains("resource.label.node_name = \"node-1\""));
}

#[test]
fn test_descriptors_query_per_model() {
    let current = translator(ResourceModel::Current).descriptors_query();
    assert_eq!(current.project, "projects/my-project");
    assert!(current
        .filter
        .ends_with("resource.type = one_of(\"k8s_pod\",\"k8s_node\")"));

    let legacy = translator(ResourceModel::Legacy).descriptors_query();
    assert!(legacy.filter.contains("resource.label.pod_id != \"machine\""));
    assert!(!legacy.filter.contains("location"));
}

#[test]
fn test_round_trip_key_for_pod() {
    let translator = translator(ResourceModel::Current);
    let objects = vec![ObjectRef::pod("ns1", "pod-a")];
    let query = translator.pods_query(&objects, "qps", "ns1").unwrap();
    assert!(query.filter.contains("resource.label.namespace_name = \"ns1\""));
    assert!(query.filter.contains("resource.label.pod_name = \"pod-a\""));

    let resp = response(vec![pod_series("ns1", "pod-a", TypedValue::int64(5))]);
    let values = translator
        .multiple_object_values(&resp, &objects, &GroupResource::pods(), "qps")
        .unwrap();
    assert_eq!(values.len(), 1);
    assert_eq!(values[0].described_object.name, "pod-a");
    assert_eq!(values[0].value, Quantity::from_integer(5));
}

#[test]
fn test_single_object_sums_overlapping_series() {
    let translator = translator(ResourceModel::Current);
    let resp = response(vec![
        pod_series("ns1", "pod-a", TypedValue::int64(3)),
        pod_series("ns1", "pod-a", TypedValue::int64(4)),
        pod_series("ns1", "pod-a", TypedValue::int64(5)),
    ]);

    let value = translator
        .single_object_value(&resp, &GroupResource::pods(), "qps", "ns1", "pod-a")
        .unwrap();
    assert_eq!(value.value.to_string(), "12");
    assert_eq!(value.described_object.kind, "Pod");
    assert_eq!(value.timestamp, now());
}

#[test]
fn test_single_object_floating_precision() {
    let translator = translator(ResourceModel::Current);
    let resp = response(vec![
        pod_series("ns1", "pod-a", TypedValue::double(1.0005)),
        pod_series("ns1", "pod-a", TypedValue::double(1.0004)),
    ]);

    let value = translator
        .single_object_value(&resp, &GroupResource::pods(), "qps", "ns1", "pod-a")
        .unwrap();
    assert_eq!(value.value.millis(), 2001);
}

#[test]
fn test_single_object_with_two_objects_in_response() {
    let translator = translator(ResourceModel::Current);
    let resp = response(vec![
        pod_series("ns1", "pod-a", TypedValue::int64(1)),
        pod_series("ns1", "pod-b", TypedValue::int64(1)),
    ]);
    let err = translator
        .single_object_value(&resp, &GroupResource::pods(), "qps", "ns1", "pod-a")
        .unwrap_err();
    assert!(matches!(err, TranslateError::BackendContractViolation(_)));
}

#[test]
fn test_empty_response_is_metric_not_found() {
    let translator = translator(ResourceModel::Current);
    let err = translator
        .multiple_object_values(&response(vec![]), &pods(2), &GroupResource::pods(), "qps")
        .unwrap_err();
    assert!(err.is_not_found());
    assert_eq!(err.class(), ErrorClass::NotFound);
}

#[test]
fn test_series_with_wrong_point_count_fails_whole_batch() {
    let translator = translator(ResourceModel::Current);
    let mut broken = pod_series("ns1", "pod-1", TypedValue::int64(1));
    broken.points.clear();
    let resp = response(vec![pod_series("ns1", "pod-0", TypedValue::int64(1)), broken]);

    let err = translator
        .multiple_object_values(&resp, &pods(2), &GroupResource::pods(), "qps")
        .unwrap_err();
    assert!(matches!(err, TranslateError::BackendContractViolation(_)));
}

#[test]
fn test_batch_preserves_order_and_omits_unmatched() {
    let translator = translator(ResourceModel::Current);
    let objects = pods(4);
    let resp = response(vec![
        pod_series("ns1", "pod-3", TypedValue::int64(30)),
        pod_series("ns1", "pod-0", TypedValue::int64(0)),
        pod_series("ns1", "pod-2", TypedValue::double(2.5)),
    ]);

    let values = translator
        .multiple_object_values(&resp, &objects, &GroupResource::pods(), "qps")
        .unwrap();
    let names: Vec<&str> = values.iter().map(|v| v.described_object.name.as_str()).collect();
    assert_eq!(names, vec!["pod-0", "pod-2", "pod-3"]);
    assert_eq!(values[0].value, Quantity::from_integer(0));
    assert_eq!(values[1].value.to_string(), "2500m");
}

#[test]
fn test_nodes_batch() {
    let translator = translator(ResourceModel::Current);
    let nodes = vec![ObjectRef::node("node-1"), ObjectRef::node("node-2")];
    let resp = response(vec![TimeSeries::with_point(
        MonitoredResource::new(K8S_NODE, [("node_name", "node-2")]),
        TypedValue::int64(8),
    )]);

    let values = translator
        .multiple_object_values(&resp, &nodes, &GroupResource::nodes(), "qps")
        .unwrap();
    assert_eq!(values.len(), 1);
    assert_eq!(values[0].described_object.kind, "Node");
    assert_eq!(values[0].described_object.namespace, "");
}

#[test]
fn test_legacy_batch_matches_by_uid() {
    let translator = translator(ResourceModel::Legacy);
    let objects = pods(3);
    let resp = response(vec![TimeSeries::with_point(
        MonitoredResource::new("gke_container", [("pod_id", "uid-1")]),
        TypedValue::int64(11),
    )]);

    let values = translator
        .multiple_object_values(&resp, &objects, &GroupResource::pods(), "qps")
        .unwrap();
    assert_eq!(values.len(), 1);
    assert_eq!(values[0].described_object.name, "pod-1");
    assert_eq!(values[0].described_object.namespace, "ns1");
}

#[test]
fn test_unknown_resource_kind_propagates() {
    let translator = translator(ResourceModel::Current);
    let resp = response(vec![pod_series("ns1", "pod-0", TypedValue::int64(1))]);
    let err = translator
        .multiple_object_values(&resp, &pods(1), &GroupResource::new("apps", "widgets"), "qps")
        .unwrap_err();
    assert!(matches!(err, TranslateError::Mapping(_)));
    assert_eq!(err.to_string(), "no kind is registered for resource widgets.apps");
}

#[test]
fn test_descriptor_listing_from_json() {
    let translator = translator(ResourceModel::Current);
    let body = r#"{
        "metricDescriptors": [
            {"type": "custom.googleapis.com/qps", "metricKind": "GAUGE", "valueType": "INT64"},
            {"type": "custom.googleapis.com/requests", "metricKind": "CUMULATIVE", "valueType": "INT64"},
            {"type": "custom.googleapis.com/build", "metricKind": "GAUGE", "valueType": "STRING"},
            {"type": "custom.googleapis.com/app/qps", "metricKind": "GAUGE", "valueType": "DOUBLE"}
        ]
    }"#;
    let listing: ListMetricDescriptorsResponse = serde_json::from_str(body).unwrap();

    let metrics = translator.metrics_from_descriptors(&listing);
    assert_eq!(metrics.len(), 1);
    assert_eq!(metrics[0].metric, "qps");
    assert_eq!(metrics[0].group_resource.resource, "*");
    assert!(metrics[0].namespaced);
}

#[test]
fn test_invalid_config_rejected() {
    let config = TranslatorConfig::new("", "my-cluster", "my-zone");
    let result = Translator::new(
        config,
        Arc::new(FixedClock::new(now())),
        Arc::new(StaticKindResolver::new()),
    );
    assert!(result.is_err());
}
