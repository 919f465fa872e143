//! Analyzers for `networking.istio.io` gateways.

mod secret;


pub use self::secret::{DefaultGateway, SecretAnalyzer};
