//! Subcommand implementations

pub mod metrics;
pub mod query;
pub mod translate;

use adapter_lib::{GroupResource, ObjectKind, TranslateError};
use clap::ValueEnum;

/// Resource a metric is requested for
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ResourceArg {
    Pods,
    Nodes,
}

impl ResourceArg {
    pub fn kind(&self) -> ObjectKind {
        match self {
            ResourceArg::Pods => ObjectKind::Pod,
            ResourceArg::Nodes => ObjectKind::Node,
        }
    }

    pub fn group_resource(&self) -> GroupResource {
        match self {
            ResourceArg::Pods => GroupResource::pods(),
            ResourceArg::Nodes => GroupResource::nodes(),
        }
    }
}

/// Attach the action and the status a server would answer with
fn translation_error(err: TranslateError, action: &str) -> anyhow::Error {
    let status = err.class().http_status();
    anyhow::Error::new(err).context(format!("{} (HTTP {})", action, status))
}
