use mesh_config_analyzer_core::{
    Analyzer, Collection, Context, Entry, Message, Metadata, Origin,
};
use mesh_config_analyzer_k8s_api::{
    self as k8s, Gateway, Pod, ResourceExt, ResourceId, Secret, Selector,
};
use tracing::{debug, debug_span, trace};

/// Checks that the TLS credentials referenced by a gateway's listeners exist.
///
/// Credentials are secrets in the namespace of the workload that serves the gateway, which is not
/// necessarily the namespace of the `Gateway` resource. The workload namespace is found by
/// matching the gateway's selector against pod labels.
#[derive(Clone, Debug, Default)]
pub struct SecretAnalyzer {
    default_gateway: DefaultGateway,
}

/// The conventional ingress gateway workload.
///
/// A gateway selecting this workload resolves to `namespace` even when none of the workload's pods
/// are part of the snapshot.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DefaultGateway {
    pub label: String,
    pub value: String,
    pub namespace: String,
}

// === impl SecretAnalyzer ===

impl SecretAnalyzer {
    pub const NAME: &'static str = "gateway.SecretAnalyzer";

    pub fn new(default_gateway: DefaultGateway) -> Self {
        Self { default_gateway }
    }

    /// Returns the namespace of the workload selected by a gateway.
    ///
    /// When the selected pods span several namespaces, the namespace of the first matching pod is
    /// returned. `None` indicates that no workload could be found.
    pub fn gateway_namespace<'p>(
        &self,
        selector: &Selector,
        pods: impl IntoIterator<Item = Entry<'p, Pod>>,
    ) -> Option<String> {
        if let Some(pod) = pods
            .into_iter()
            .find(|pod| selector.matches(pod.resource.labels()))
        {
            trace!(pod = %pod.id, "Selected");
            return Some(pod.id.namespace.clone());
        }

        if self.default_gateway.is_selected_by(selector) {
            trace!(ns = %self.default_gateway.namespace, "Assuming default gateway namespace");
            return Some(self.default_gateway.namespace.clone());
        }

        None
    }

    fn analyze_gateway(&self, ctx: &mut Context<'_>, gw: Entry<'_, Gateway>) {
        let origin = Origin::new(Collection::Gateways, gw.id.clone());
        let selector = &gw.resource.spec.selector;

        let ns = match self.gateway_namespace(selector, ctx.entries::<Pod>()) {
            Some(ns) => ns,
            None => {
                // Without a workload namespace there is nowhere to look up credentials.
                debug!(%selector, "No workload matches the gateway selector");
                ctx.report(Message::referenced_resource_not_found(
                    origin,
                    "selector",
                    selector.to_string(),
                ));
                return;
            }
        };

        for listener in gw.resource.spec.servers.iter() {
            let name = match credential_name(listener) {
                Some(name) => name,
                None => continue,
            };

            let id = ResourceId::new(ns.as_str(), name);
            if !ctx.exists::<Secret>(&id) {
                debug!(secret = %id, "Credential not found");
                ctx.report(Message::referenced_resource_not_found(
                    origin.clone(),
                    "credentialName",
                    name,
                ));
            }
        }
    }
}

impl Analyzer for SecretAnalyzer {
    fn metadata(&self) -> Metadata {
        Metadata {
            name: Self::NAME,
            description: "Checks a gateway's referenced secrets for correctness",
            inputs: vec![Collection::Gateways, Collection::Pods, Collection::Secrets],
        }
    }

    fn analyze(&self, ctx: &mut Context<'_>) {
        for gw in ctx.entries::<Gateway>() {
            let _span = debug_span!("gateway", ns = %gw.id.namespace, name = %gw.id.name).entered();
            self.analyze_gateway(ctx, gw);
        }
    }
}

/// Returns the credential referenced by a TLS listener. Listeners without TLS, and TLS settings
/// with an empty credential name, don't reference a secret.
fn credential_name(listener: &k8s::gateway::Listener) -> Option<&str> {
    listener
        .tls
        .as_ref()?
        .credential_name
        .as_deref()
        .filter(|name| !name.is_empty())
}

// === impl DefaultGateway ===

impl DefaultGateway {
    pub fn is_selected_by(&self, selector: &Selector) -> bool {
        selector.get(&self.label) == Some(self.value.as_str())
    }
}

impl Default for DefaultGateway {
    fn default() -> Self {
        Self {
            label: "istio".to_string(),
            value: "ingressgateway".to_string(),
            namespace: "istio-system".to_string(),
        }
    }
}
