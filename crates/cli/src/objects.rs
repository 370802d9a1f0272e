//! Loading object lists saved from the cluster
//!
//! Accepts the output of `kubectl get pods -o json` (a list), or a single
//! object, and reduces each item to the reference the translator needs.

use adapter_lib::{ObjectKind, ObjectRef};
use anyhow::{bail, Context, Result};
use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
use serde::Deserialize;
use std::path::Path;

#[derive(Deserialize)]
#[serde(untagged)]
enum ObjectsFile {
    List { items: Vec<ListItem> },
    Single(ListItem),
}

#[derive(Deserialize)]
struct ListItem {
    #[serde(default)]
    kind: Option<String>,
    metadata: ObjectMeta,
}

/// Read object references of `kind` from a JSON file
pub fn load_objects(path: &Path, kind: ObjectKind) -> Result<Vec<ObjectRef>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read objects from {}", path.display()))?;
    parse_objects(&content, kind)
        .with_context(|| format!("Failed to parse objects in {}", path.display()))
}

/// Parse object references of `kind` from list or single-object JSON
pub fn parse_objects(content: &str, kind: ObjectKind) -> Result<Vec<ObjectRef>> {
    let items = match serde_json::from_str::<ObjectsFile>(content).context("Invalid object JSON")? {
        ObjectsFile::List { items } => items,
        ObjectsFile::Single(item) => vec![item],
    };

    items
        .into_iter()
        .map(|item| object_ref(item, kind))
        .collect()
}

fn object_ref(item: ListItem, kind: ObjectKind) -> Result<ObjectRef> {
    if let Some(item_kind) = &item.kind {
        if item_kind != kind.as_str() {
            bail!("Expected {} objects, found {}", kind, item_kind);
        }
    }

    let name = item.metadata.name.context("Object without metadata.name")?;
    let mut object = match kind {
        ObjectKind::Pod => ObjectRef::pod(item.metadata.namespace.unwrap_or_default(), name),
        ObjectKind::Node => ObjectRef::node(name),
    };
    object.uid = item.metadata.uid;
    Ok(object)
}

/// Namespace shared by all pods, used when none is given explicitly
pub fn common_namespace(objects: &[ObjectRef]) -> Result<String> {
    let mut namespaces = objects.iter().map(|o| o.namespace.as_str());
    let first = namespaces.next().unwrap_or_default();
    if namespaces.any(|ns| ns != first) {
        bail!("Objects span several namespaces, pass --namespace to choose one");
    }
    Ok(first.to_string())
}
