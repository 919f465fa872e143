use crate::{Entry, Kind, Message, Snapshot};
use mesh_config_analyzer_k8s_api::ResourceId;
use tracing::debug;

/// Receives the messages reported by analyzers.
pub trait Report {
    fn report(&mut self, msg: Message);
}

/// Bundles the snapshot an analyzer reads with the sink it reports to.
pub struct Context<'a> {
    snapshot: &'a Snapshot,
    reporter: &'a mut dyn Report,
}

// === impl Context ===

impl<'a> Context<'a> {
    pub fn new(snapshot: &'a Snapshot, reporter: &'a mut dyn Report) -> Self {
        Self { snapshot, reporter }
    }

    pub fn snapshot(&self) -> &'a Snapshot {
        self.snapshot
    }

    /// Iterates over all entries of a collection.
    ///
    /// The iterator borrows the snapshot rather than the context, so messages may be reported
    /// while iterating.
    pub fn entries<K: Kind>(&self) -> impl Iterator<Item = Entry<'a, K>> + 'a {
        self.snapshot.entries::<K>()
    }

    pub fn exists<K: Kind>(&self, id: &ResourceId) -> bool {
        self.snapshot.exists::<K>(id)
    }

    pub fn report(&mut self, msg: Message) {
        debug!(code = msg.kind.code, origin = %msg.origin, field = msg.field, value = %msg.value, "Reporting");
        self.reporter.report(msg);
    }
}

// === impl Report ===

impl Report for Vec<Message> {
    fn report(&mut self, msg: Message) {
        self.push(msg);
    }
}
