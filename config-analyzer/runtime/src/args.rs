use crate::{
    analyzers::{self, gateway::DefaultGateway},
    core::{self as analysis, Level},
    index::{Loader, Snapshot},
    output::{self, OutputFormat},
    Status,
};
use anyhow::{bail, Context, Result};
use clap::Parser;
use std::{io::Write, path::PathBuf, process::ExitCode};
use tracing::{debug, info, warn};

#[derive(Debug, Parser)]
#[clap(
    name = "mesh-config-analyzer",
    about = "Analyzes mesh configuration manifests for problems",
    version
)]
pub struct Args {
    #[clap(long, default_value = "warn", env = "MESH_CONFIG_ANALYZER_LOG")]
    log_level: kubert::LogFilter,

    #[clap(long, default_value = "plain")]
    log_format: kubert::LogFormat,

    /// Namespace applied to resources that don't specify one.
    #[clap(long, short = 'n', default_value = "default")]
    namespace: String,

    /// Namespace assumed for the default ingress gateway when none of its pods are found.
    #[clap(long, default_value = "istio-system")]
    istio_namespace: String,

    /// Selector label (`key=value`) identifying the default ingress gateway.
    #[clap(long, default_value = "istio=ingressgateway")]
    default_gateway_selector: LabelPair,

    /// Output format: one of log, json, yaml.
    #[clap(long, short = 'o', default_value = "log")]
    output: OutputFormat,

    /// Messages below this level are not printed.
    #[clap(long, default_value = "Info")]
    output_threshold: Level,

    /// Exit with a failure status when any message is at or above this level.
    #[clap(long, default_value = "Error")]
    failure_threshold: Level,

    /// Lists the available analyzers and exits.
    #[clap(long)]
    list_analyzers: bool,

    /// Manifest files or directories to analyze. `-` reads from stdin.
    #[clap(required_unless_present = "list_analyzers")]
    paths: Vec<PathBuf>,
}

/// A `key=value` label.
#[derive(Clone, Debug, PartialEq, Eq)]
struct LabelPair {
    key: String,
    value: String,
}

// === impl Args ===

impl Args {
    #[inline]
    pub fn parse_and_run() -> Result<ExitCode> {
        Self::parse().run()
    }

    pub fn run(self) -> Result<ExitCode> {
        self.log_format.clone().try_init(self.log_level.clone())?;

        let status = self.analyze(&mut std::io::stdout().lock())?;
        Ok(status.into())
    }

    /// Loads the configured manifests, analyzes them and writes the results to `out`.
    pub fn analyze(&self, out: &mut impl Write) -> Result<Status> {
        let Self {
            namespace,
            istio_namespace,
            default_gateway_selector,
            output,
            output_threshold,
            failure_threshold,
            list_analyzers,
            paths,
            ..
        } = self;

        let config = analyzers::Config {
            default_gateway: DefaultGateway {
                label: default_gateway_selector.key.clone(),
                value: default_gateway_selector.value.clone(),
                namespace: istio_namespace.clone(),
            },
        };
        let combined = analyzers::combined(&config);

        if *list_analyzers {
            for analyzer in combined.analyzers() {
                let meta = analyzer.metadata();
                writeln!(out, "{}: {}", meta.name, meta.description)?;
            }
            return Ok(Status::Ok);
        }

        let mut snapshot = Snapshot::default();
        let loaded = Loader::new(namespace.as_str())
            .load_paths(&mut snapshot, paths)
            .context("failed to load resources")?;
        info!(loaded, "Loaded resources");

        let skipped = combined.skipped(&snapshot);
        for name in skipped.iter() {
            warn!(analyzer = %name, "Skipping analyzer; its inputs were not provided");
        }

        let messages = analysis::analyze(&combined, &snapshot);
        debug!(messages = messages.len(), "Analysis complete");

        let printed = messages
            .iter()
            .filter(|m| m.level() >= *output_threshold)
            .cloned()
            .collect::<Vec<_>>();
        output::write(*output, out, &printed, &skipped, loaded)?;

        if messages.iter().any(|m| m.level() >= *failure_threshold) {
            return Ok(Status::IssuesFound);
        }
        Ok(Status::Ok)
    }
}

// === impl LabelPair ===

impl std::str::FromStr for LabelPair {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.split_once('=') {
            Some((key, value)) if !key.is_empty() && !value.is_empty() => Ok(Self {
                key: key.to_string(),
                value: value.to_string(),
            }),
            _ => bail!("invalid label {:?}: expected key=value", s),
        }
    }
}
