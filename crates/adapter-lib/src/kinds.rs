//! Group-resource to kind resolution
//!
//! The translator never decides the `kind` of a described object on its own;
//! it asks a [`KindResolver`], normally backed by the cluster's REST mapper.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use thiserror::Error;

/// API group plus plural resource name, e.g. `pods` in the core group
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GroupResource {
    pub group: String,
    pub resource: String,
}

impl GroupResource {
    pub fn new(group: impl Into<String>, resource: impl Into<String>) -> Self {
        Self {
            group: group.into(),
            resource: resource.into(),
        }
    }

    /// Core-group pods
    pub fn pods() -> Self {
        Self::new("", "pods")
    }

    /// Core-group nodes
    pub fn nodes() -> Self {
        Self::new("", "nodes")
    }

    /// Wildcard resource in the core group, used for discovered metrics
    pub fn any() -> Self {
        Self::new("", "*")
    }
}

impl fmt::Display for GroupResource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.group.is_empty() {
            write!(f, "{}", self.resource)
        } else {
            write!(f, "{}.{}", self.resource, self.group)
        }
    }
}

/// Failure to resolve a kind
#[derive(Debug, Error)]
pub enum MappingError {
    #[error("no kind is registered for resource {0}")]
    UnknownResource(GroupResource),

    #[error("kind lookup for {resource} failed: {message}")]
    Lookup {
        resource: GroupResource,
        message: String,
    },
}

/// Resolves a group-resource to the kind shown in metric values
pub trait KindResolver: Send + Sync {
    fn kind_for(&self, resource: &GroupResource) -> Result<String, MappingError>;
}

/// Fixed lookup table for the resources the adapter serves
#[derive(Debug, Clone)]
pub struct StaticKindResolver {
    kinds: HashMap<GroupResource, String>,
}

impl StaticKindResolver {
    /// Resolver preloaded with the core resources
    pub fn new() -> Self {
        Self::empty()
            .with_kind(GroupResource::pods(), "Pod")
            .with_kind(GroupResource::nodes(), "Node")
            .with_kind(GroupResource::new("", "namespaces"), "Namespace")
    }

    pub fn empty() -> Self {
        Self {
            kinds: HashMap::new(),
        }
    }

    pub fn with_kind(mut self, resource: GroupResource, kind: impl Into<String>) -> Self {
        self.kinds.insert(resource, kind.into());
        self
    }
}

impl Default for StaticKindResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl KindResolver for StaticKindResolver {
    fn kind_for(&self, resource: &GroupResource) -> Result<String, MappingError> {
        self.kinds
            .get(resource)
            .cloned()
            .ok_or_else(|| MappingError::UnknownResource(resource.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_group_resource_display() {
        assert_eq!(GroupResource::pods().to_string(), "pods");
        assert_eq!(GroupResource::new("apps", "deployments").to_string(), "deployments.apps");
    }

    #[test]
    fn test_static_resolver_core_kinds() {
        let resolver = StaticKindResolver::new();
        assert_eq!(resolver.kind_for(&GroupResource::pods()).unwrap(), "Pod");
        assert_eq!(resolver.kind_for(&GroupResource::nodes()).unwrap(), "Node");
    }

    #[test]
    fn test_static_resolver_unknown_resource() {
        let resolver = StaticKindResolver::empty();
        let err = resolver.kind_for(&GroupResource::pods()).unwrap_err();
        assert!(matches!(err, MappingError::UnknownResource(_)));
    }

    #[test]
    fn test_static_resolver_extension() {
        let resolver = StaticKindResolver::new()
            .with_kind(GroupResource::new("apps", "deployments"), "Deployment");
        assert_eq!(
            resolver
                .kind_for(&GroupResource::new("apps", "deployments"))
                .unwrap(),
            "Deployment"
        );
    }
}
