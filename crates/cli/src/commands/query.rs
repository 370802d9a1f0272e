//! Building backend queries

use adapter_lib::{ObjectKind, TimeSeriesQuery, Translator};
use anyhow::Result;
use std::path::Path;
use tabled::Tabled;

use super::translation_error;
use crate::objects::{common_namespace, load_objects};
use crate::output::{print_rows, OutputFormat};

/// Row for query description tables
#[derive(Tabled)]
struct FieldRow {
    #[tabled(rename = "Field")]
    field: String,
    #[tabled(rename = "Value")]
    value: String,
}

impl FieldRow {
    fn new(field: &str, value: impl Into<String>) -> Self {
        Self {
            field: field.to_string(),
            value: value.into(),
        }
    }
}

/// Build the query for a metric on pods
pub fn pods(
    translator: &Translator,
    metric: &str,
    namespace: Option<String>,
    objects_path: &Path,
    format: OutputFormat,
) -> Result<()> {
    let objects = load_objects(objects_path, ObjectKind::Pod)?;
    let namespace = match namespace {
        Some(ns) => ns,
        None => common_namespace(&objects)?,
    };

    let query = translator
        .pods_query(&objects, metric, &namespace)
        .map_err(|e| translation_error(e, "Failed to build pod query"))?;
    print_time_series_query(&query, format)
}

/// Build the query for a metric on nodes
pub fn nodes(
    translator: &Translator,
    metric: &str,
    objects_path: &Path,
    format: OutputFormat,
) -> Result<()> {
    let objects = load_objects(objects_path, ObjectKind::Node)?;
    let query = translator
        .nodes_query(&objects, metric)
        .map_err(|e| translation_error(e, "Failed to build node query"))?;
    print_time_series_query(&query, format)
}

/// Build the descriptor discovery query
pub fn descriptors(translator: &Translator, format: OutputFormat) -> Result<()> {
    let query = translator.descriptors_query();
    let rows = field_rows(&query.project, query.query_params());
    print_rows(&rows, &query, format)
}

fn print_time_series_query(query: &TimeSeriesQuery, format: OutputFormat) -> Result<()> {
    let rows = field_rows(&query.project, query.query_params());
    print_rows(&rows, query, format)
}

fn field_rows(project: &str, params: Vec<(&'static str, String)>) -> Vec<FieldRow> {
    let mut rows = vec![FieldRow::new("project", project)];
    rows.extend(params.into_iter().map(|(field, value)| FieldRow::new(field, value)));
    rows
}
