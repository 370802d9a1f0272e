//! Stackdriver custom metrics translator CLI
//!
//! Builds the backend queries the adapter would issue and translates
//! saved backend responses into custom metric values, without talking to
//! the backend itself.

mod commands;
mod config;
mod objects;
mod output;

use adapter_lib::{Clock, FixedClock, ResourceModel, StaticKindResolver, SystemClock, Translator};
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use commands::{metrics, query, translate, ResourceArg};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::debug;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Stackdriver custom metrics translator CLI
#[derive(Parser)]
#[command(name = "sdm")]
#[command(author, version, about = "CLI for the Stackdriver custom metrics translator", long_about = None)]
pub struct Cli {
    /// Configuration file (can also be set via SDM_CONFIG env var)
    #[arg(long, env = "SDM_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Monitoring project id
    #[arg(long, global = true)]
    pub project: Option<String>,

    /// Cluster name
    #[arg(long, global = true)]
    pub cluster: Option<String>,

    /// Cluster location
    #[arg(long, global = true)]
    pub location: Option<String>,

    /// Resource model (legacy or current)
    #[arg(long, global = true)]
    pub resource_model: Option<ResourceModel>,

    /// Query window in seconds
    #[arg(long, global = true)]
    pub window_secs: Option<u64>,

    /// Pin the current time (RFC 3339), e.g. when replaying a saved response
    #[arg(long, global = true)]
    pub now: Option<DateTime<Utc>>,

    /// Output format
    #[arg(long, short, default_value = "table", global = true)]
    pub format: output::OutputFormat,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    pub log_json: bool,

    /// Enable verbose output
    #[arg(long, short, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Build backend queries
    #[command(subcommand)]
    Query(QueryCommands),

    /// Translate a saved time series response into metric values
    Translate {
        /// Custom metric name, without prefix
        #[arg(long, short)]
        metric: String,

        /// Resource the metric is requested for
        #[arg(long, value_enum, default_value = "pods")]
        resource: ResourceArg,

        /// Saved response of the time series query
        #[arg(long)]
        response: PathBuf,

        /// Object list (kubectl -o json) the query was built for
        #[arg(long, required_unless_present = "name")]
        objects: Option<PathBuf>,

        /// Namespace of the single object
        #[arg(long, short)]
        namespace: Option<String>,

        /// Name of the single object the query was built for
        #[arg(long, conflicts_with = "objects")]
        name: Option<String>,
    },

    /// List custom metrics from a saved descriptor listing
    Metrics {
        /// Saved response of the descriptor query
        #[arg(long)]
        descriptors: PathBuf,
    },
}

#[derive(Subcommand)]
pub enum QueryCommands {
    /// Query for a metric on pods
    Pods {
        /// Custom metric name, without prefix
        #[arg(long, short)]
        metric: String,

        /// Namespace of the pods (inferred from the objects if omitted)
        #[arg(long, short)]
        namespace: Option<String>,

        /// Pod list (kubectl get pods -o json)
        #[arg(long)]
        objects: PathBuf,
    },

    /// Query for a metric on nodes
    Nodes {
        /// Custom metric name, without prefix
        #[arg(long, short)]
        metric: String,

        /// Node list (kubectl get nodes -o json)
        #[arg(long)]
        objects: PathBuf,
    },

    /// Query listing custom metric descriptors
    Descriptors,
}

fn init_tracing(json: bool, verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let registry = tracing_subscriber::registry().with(filter);

    if json {
        registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry.with(fmt::layer().with_writer(std::io::stderr)).init();
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.log_json, cli.verbose);

    let overrides = config::Overrides {
        project: cli.project.clone(),
        cluster: cli.cluster.clone(),
        location: cli.location.clone(),
        resource_model: cli.resource_model,
        window_secs: cli.window_secs,
    };
    let translator_config = config::load(cli.config.as_deref(), &overrides)?;
    debug!(
        project = %translator_config.project,
        cluster = %translator_config.cluster,
        resource_model = %translator_config.resource_model,
        "Translator configured"
    );

    let clock: Arc<dyn Clock> = match cli.now {
        Some(at) => Arc::new(FixedClock::new(at)),
        None => Arc::new(SystemClock),
    };
    let translator = Translator::new(translator_config, clock, Arc::new(StaticKindResolver::new()))
        .context("Failed to create translator")?;

    match cli.command {
        Commands::Query(query_cmd) => match query_cmd {
            QueryCommands::Pods {
                metric,
                namespace,
                objects,
            } => {
                query::pods(&translator, &metric, namespace, &objects, cli.format)?;
            }
            QueryCommands::Nodes { metric, objects } => {
                query::nodes(&translator, &metric, &objects, cli.format)?;
            }
            QueryCommands::Descriptors => {
                query::descriptors(&translator, cli.format)?;
            }
        },
        Commands::Translate {
            metric,
            resource,
            response,
            objects,
            namespace,
            name,
        } => {
            let args = translate::TranslateArgs {
                metric,
                resource,
                response,
                objects,
                namespace,
                name,
            };
            translate::run(&translator, args, cli.format)?;
        }
        Commands::Metrics { descriptors } => {
            metrics::list_metrics(&translator, &descriptors, cli.format)?;
        }
    }

    Ok(())
}
