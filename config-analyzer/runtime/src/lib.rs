#![deny(warnings, rust_2018_idioms)]
#![forbid(unsafe_code)]

pub use mesh_config_analyzer_analyzers as analyzers;
pub use mesh_config_analyzer_core as core;
pub use mesh_config_analyzer_k8s_api as k8s;
pub use mesh_config_analyzer_k8s_index as index;

mod args;
pub mod output;

pub use self::args::Args;
use std::process::ExitCode;

/// The process exit code used when analysis finds messages at or above the failure threshold.
pub const ISSUES_FOUND_EXIT_CODE: u8 = 79;

/// The outcome of an analysis run.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Status {
    Ok,
    IssuesFound,
}

impl From<Status> for ExitCode {
    fn from(status: Status) -> Self {
        match status {
            Status::Ok => ExitCode::SUCCESS,
            Status::IssuesFound => ExitCode::from(ISSUES_FOUND_EXIT_CODE),
        }
    }
}
