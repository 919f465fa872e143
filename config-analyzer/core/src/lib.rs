//! Configuration analysis
//!
//! An [`Analyzer`] inspects a [`Snapshot`] through a [`Context`] and reports [`Message`]s about
//! problems it finds. Analyzers declare the collections they read in their [`Metadata`] so that a
//! [`Combined`] analyzer can skip those whose inputs were not provided.

#![deny(warnings, rust_2018_idioms)]
#![forbid(unsafe_code)]

mod combined;
mod context;
pub mod msg;

pub use self::{
    combined::Combined,
    context::{Context, Report},
    msg::{Level, Message, MessageType, Origin},
};
pub use mesh_config_analyzer_k8s_index::{Collection, Entry, Kind, Snapshot};

/// Describes an analyzer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Metadata {
    /// A stable, unique name.
    pub name: &'static str,

    pub description: &'static str,

    /// The collections the analyzer reads.
    pub inputs: Vec<Collection>,
}

pub trait Analyzer: Send + Sync {
    fn metadata(&self) -> Metadata;

    /// Inspects the context's snapshot, reporting any problems found. Invoked once per pass.
    fn analyze(&self, ctx: &mut Context<'_>);
}

/// Runs a single pass of `analyzer` over `snapshot`, returning the reported messages in the order
/// they were reported.
pub fn analyze(analyzer: &dyn Analyzer, snapshot: &Snapshot) -> Vec<Message> {
    let mut messages = Vec::new();
    analyzer.analyze(&mut Context::new(snapshot, &mut messages));
    messages
}
