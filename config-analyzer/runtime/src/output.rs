//! Renders analysis results.

use crate::core::{Level, Message};
use serde::Serialize;
use std::{fmt, io::Write};
use thiserror::Error;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    /// One line per message.
    Log,
    Json,
    Yaml,
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("failed to write output: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to encode json output: {0}")]
    Json(#[from] serde_json::Error),

    #[error("failed to encode yaml output: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("invalid output format {0:?}: expected one of log, json, yaml")]
pub struct InvalidFormat(String);

/// The serialized form of a [`Message`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
struct Diagnostic<'m> {
    code: &'static str,
    level: Level,
    origin: String,
    field: &'static str,
    value: &'m str,
    message: String,
}

/// Writes `messages` to `out`. `resources` is the number of resources that were analyzed.
/// Analyzers in `skipped` are only listed by the log format.
pub fn write(
    format: OutputFormat,
    out: &mut impl Write,
    messages: &[Message],
    skipped: &[&str],
    resources: usize,
) -> Result<(), Error> {
    match format {
        OutputFormat::Log => {
            for name in skipped {
                writeln!(out, "Skipped analyzer {}: its inputs were not provided.", name)?;
            }
            if messages.is_empty() {
                writeln!(
                    out,
                    "\u{2714} No validation issues found when analyzing {} resource(s).",
                    resources
                )?;
            }
            for msg in messages {
                writeln!(out, "{}", msg)?;
            }
        }
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut *out, &diagnostics(messages))?;
            writeln!(out)?;
        }
        OutputFormat::Yaml => {
            serde_yaml::to_writer(&mut *out, &diagnostics(messages))?;
        }
    }
    Ok(())
}

fn diagnostics(messages: &[Message]) -> Vec<Diagnostic<'_>> {
    messages
        .iter()
        .map(|msg| Diagnostic {
            code: msg.kind.code,
            level: msg.level(),
            origin: msg.origin.to_string(),
            field: msg.field,
            value: &msg.value,
            message: msg.text(),
        })
        .collect()
}

// === impl OutputFormat ===

impl std::str::FromStr for OutputFormat {
    type Err = InvalidFormat;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "log" => Ok(Self::Log),
            "json" => Ok(Self::Json),
            "yaml" => Ok(Self::Yaml),
            s => Err(InvalidFormat(s.to_string())),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Log => f.write_str("log"),
            Self::Json => f.write_str("json"),
            Self::Yaml => f.write_str("yaml"),
        }
    }
}
