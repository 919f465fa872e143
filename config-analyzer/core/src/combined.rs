use crate::{Analyzer, Collection, Context, Metadata, Snapshot};
use tracing::{debug_span, info};

/// Runs a set of analyzers in order, skipping those whose inputs are not available in the
/// snapshot.
pub struct Combined {
    analyzers: Vec<Box<dyn Analyzer>>,
}

// === impl Combined ===

impl Combined {
    pub fn new(analyzers: Vec<Box<dyn Analyzer>>) -> Self {
        Self { analyzers }
    }

    pub fn analyzers(&self) -> impl Iterator<Item = &dyn Analyzer> + '_ {
        self.analyzers.iter().map(|a| a.as_ref())
    }

    /// Returns the names of the analyzers that can't run against `snapshot`.
    pub fn skipped(&self, snapshot: &Snapshot) -> Vec<&'static str> {
        self.analyzers
            .iter()
            .map(|a| a.metadata())
            .filter(|meta| missing_input(meta, snapshot).is_some())
            .map(|meta| meta.name)
            .collect()
    }
}

impl Analyzer for Combined {
    fn metadata(&self) -> Metadata {
        let mut inputs = self
            .analyzers
            .iter()
            .flat_map(|a| a.metadata().inputs)
            .collect::<Vec<_>>();
        inputs.sort();
        inputs.dedup();

        Metadata {
            name: "combined",
            description: "Runs all registered analyzers",
            inputs,
        }
    }

    fn analyze(&self, ctx: &mut Context<'_>) {
        for analyzer in self.analyzers.iter() {
            let meta = analyzer.metadata();
            if let Some(collection) = missing_input(&meta, ctx.snapshot()) {
                info!(analyzer = meta.name, %collection, "Skipping analyzer; input is not available");
                continue;
            }

            let _span = debug_span!("analyze", analyzer = meta.name).entered();
            analyzer.analyze(ctx);
        }
    }
}

fn missing_input(meta: &Metadata, snapshot: &Snapshot) -> Option<Collection> {
    meta.inputs
        .iter()
        .copied()
        .find(|c| !snapshot.is_available(*c))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{analyze, Message, Origin};
    use mesh_config_analyzer_k8s_api::ResourceId;

    /// Reports a single message naming itself.
    struct Fake {
        name: &'static str,
        inputs: Vec<Collection>,
    }

    impl Analyzer for Fake {
        fn metadata(&self) -> Metadata {
            Metadata {
                name: self.name,
                description: "fake",
                inputs: self.inputs.clone(),
            }
        }

        fn analyze(&self, ctx: &mut Context<'_>) {
            ctx.report(Message::referenced_resource_not_found(
                Origin::new(Collection::Gateways, ResourceId::new("ns", self.name)),
                "selector",
                self.name,
            ));
        }
    }

    fn mk_combined() -> Combined {
        Combined::new(vec![
            Box::new(Fake {
                name: "pods",
                inputs: vec![Collection::Pods],
            }),
            Box::new(Fake {
                name: "gateways-and-secrets",
                inputs: vec![Collection::Secrets, Collection::Gateways],
            }),
            Box::new(Fake {
                name: "no-inputs",
                inputs: vec![],
            }),
        ])
    }

    #[test]
    fn merges_inputs() {
        assert_eq!(
            mk_combined().metadata().inputs,
            vec![Collection::Gateways, Collection::Pods, Collection::Secrets],
        );
    }

    #[test]
    fn skips_analyzers_with_unavailable_inputs() {
        let combined = mk_combined();
        let mut snapshot = Snapshot::default();
        snapshot.enable(Collection::Pods);
        snapshot.enable(Collection::Gateways);

        assert_eq!(combined.skipped(&snapshot), vec!["gateways-and-secrets"]);

        let values = analyze(&combined, &snapshot)
            .into_iter()
            .map(|m| m.value)
            .collect::<Vec<_>>();
        assert_eq!(values, vec!["pods", "no-inputs"]);
    }

    #[test]
    fn runs_all_analyzers_in_order() {
        let combined = mk_combined();
        let mut snapshot = Snapshot::default();
        for c in Collection::ALL {
            snapshot.enable(c);
        }

        assert!(combined.skipped(&snapshot).is_empty());
        let values = analyze(&combined, &snapshot)
            .into_iter()
            .map(|m| m.value)
            .collect::<Vec<_>>();
        assert_eq!(values, vec!["pods", "gateways-and-secrets", "no-inputs"]);
    }
}
