//! Translating saved backend responses into metric values

use adapter_lib::wire::ListTimeSeriesResponse;
use adapter_lib::{MetricValue, Translator};
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tabled::Tabled;

use super::{translation_error, ResourceArg};
use crate::objects::load_objects;
use crate::output::{print_info, print_json, print_rows, print_warning, OutputFormat};

/// Row for metric value tables
#[derive(Tabled)]
struct MetricValueRow {
    #[tabled(rename = "Kind")]
    kind: String,
    #[tabled(rename = "Namespace")]
    namespace: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Metric")]
    metric: String,
    #[tabled(rename = "Value")]
    value: String,
    #[tabled(rename = "Timestamp")]
    timestamp: String,
}

impl From<&MetricValue> for MetricValueRow {
    fn from(v: &MetricValue) -> Self {
        Self {
            kind: v.described_object.kind.clone(),
            namespace: v.described_object.namespace.clone(),
            name: v.described_object.name.clone(),
            metric: v.metric_name.clone(),
            value: v.value.to_string(),
            timestamp: v.timestamp.to_rfc3339(),
        }
    }
}

/// Arguments of the translate command
pub struct TranslateArgs {
    pub metric: String,
    pub resource: ResourceArg,
    pub response: PathBuf,
    pub objects: Option<PathBuf>,
    pub namespace: Option<String>,
    pub name: Option<String>,
}

/// Translate a saved response for one object or a list of objects
pub fn run(translator: &Translator, args: TranslateArgs, format: OutputFormat) -> Result<()> {
    let response = load_response(&args.response)?;
    let resource = args.resource.group_resource();

    let (result, requested) = match (&args.name, &args.objects) {
        (Some(name), _) => {
            let namespace = args.namespace.clone().unwrap_or_default();
            let result = translator
                .single_object_value(&response, &resource, &args.metric, &namespace, name)
                .map(|v| vec![v]);
            (result, 1)
        }
        (None, Some(path)) => {
            let objects = load_objects(path, args.resource.kind())?;
            let result =
                translator.multiple_object_values(&response, &objects, &resource, &args.metric);
            (result, objects.len())
        }
        (None, None) => anyhow::bail!("Either --name or --objects is required"),
    };

    let values = match result {
        Ok(values) => values,
        Err(err) if err.is_not_found() => {
            print_warning(&format!("No data yet: {}", err));
            if matches!(format, OutputFormat::Json) {
                print_json(&Vec::<MetricValue>::new())?;
            }
            return Ok(());
        }
        Err(err) => return Err(translation_error(err, "Failed to translate response")),
    };

    let rows: Vec<MetricValueRow> = values.iter().map(MetricValueRow::from).collect();
    print_rows(&rows, &values, format)?;
    if matches!(format, OutputFormat::Table) && values.len() < requested {
        print_info(&format!(
            "{} of {} objects have a value for {}",
            values.len(),
            requested,
            args.metric
        ));
    }
    Ok(())
}

fn load_response(path: &Path) -> Result<ListTimeSeriesResponse> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read response from {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse response in {}", path.display()))
}
