use std::fmt;

/// Names a set of resources of a single kind.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Collection {
    Gateways,
    Pods,
    Secrets,
}

// === impl Collection ===

impl Collection {
    pub const ALL: [Self; 3] = [Self::Gateways, Self::Pods, Self::Secrets];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Gateways => "istio/networking/v1alpha3/gateways",
            Self::Pods => "k8s/core/v1/pods",
            Self::Secrets => "k8s/core/v1/secrets",
        }
    }

    /// The kind of the resources held in this collection.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Gateways => "Gateway",
            Self::Pods => "Pod",
            Self::Secrets => "Secret",
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
