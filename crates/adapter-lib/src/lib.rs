//! Translation core of the custom metrics adapter
//!
//! This crate turns custom metrics API requests about Kubernetes objects
//! into monitoring backend queries, and backend responses back into
//! per-object metric values:
//! - Filter construction for the legacy and current resource models
//! - Query assembly over a fixed time window
//! - Per-object aggregation of returned time series
//! - Discovery of exposable custom metrics

pub mod clock;
pub mod config;
pub mod error;
pub mod kinds;
pub mod models;
pub mod observability;
pub mod quantity;
pub mod query;
pub mod scheme;
pub mod translator;
pub mod wire;

pub use clock::{Clock, FixedClock, SystemClock};
pub use config::{ConfigError, ResourceModel, TranslatorConfig};
pub use error::{ErrorClass, Result, TranslateError};
pub use kinds::{GroupResource, KindResolver, MappingError, StaticKindResolver};
pub use models::*;
pub use observability::TranslationLogger;
pub use quantity::Quantity;
pub use query::{DescriptorQuery, TimeSeriesQuery};
pub use translator::Translator;
