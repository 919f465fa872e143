use super::labels::Selector;
use kube::CustomResource;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Describes a load balancer operating at the edge of the mesh, bound to the workloads matched by
/// `selector`.
#[derive(Clone, Debug, PartialEq, Eq, CustomResource, Deserialize, Serialize, JsonSchema)]
#[kube(
    group = "networking.istio.io",
    version = "v1alpha3",
    kind = "Gateway",
    namespaced
)]
#[serde(rename_all = "camelCase")]
pub struct GatewaySpec {
    /// Labels of the pods on which this gateway configuration is applied. The pods are not
    /// necessarily in the gateway's own namespace.
    #[serde(default)]
    pub selector: Selector,

    /// The listeners exposed by this gateway.
    #[serde(default)]
    pub servers: Vec<Listener>,
}

/// A single listener (a `servers` entry) exposed by a gateway.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Listener {
    pub port: Option<Port>,

    #[serde(default)]
    pub hosts: Vec<String>,

    pub bind: Option<String>,

    pub name: Option<String>,

    pub tls: Option<ServerTlsSettings>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Port {
    pub number: Option<u32>,
    pub protocol: Option<String>,
    pub name: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ServerTlsSettings {
    #[serde(default)]
    pub https_redirect: bool,

    pub mode: Option<TlsMode>,

    /// Names a secret holding the server's key, certificate and (optionally) CA certificate. The
    /// secret is looked up in the namespace of the gateway workload.
    pub credential_name: Option<String>,

    pub server_certificate: Option<String>,
    pub private_key: Option<String>,
    pub ca_certificates: Option<String>,

    #[serde(default)]
    pub subject_alt_names: Vec<String>,

    pub min_protocol_version: Option<String>,
    pub max_protocol_version: Option<String>,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TlsMode {
    Passthrough,
    Simple,
    Mutual,
    AutoPassthrough,
    IstioMutual,
    OptionalMutual,
}

impl fmt::Display for TlsMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Passthrough => f.write_str("PASSTHROUGH"),
            Self::Simple => f.write_str("SIMPLE"),
            Self::Mutual => f.write_str("MUTUAL"),
            Self::AutoPassthrough => f.write_str("AUTO_PASSTHROUGH"),
            Self::IstioMutual => f.write_str("ISTIO_MUTUAL"),
            Self::OptionalMutual => f.write_str("OPTIONAL_MUTUAL"),
        }
    }
}
