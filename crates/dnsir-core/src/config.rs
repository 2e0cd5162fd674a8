//! Root of the configuration object graph.

use serde::{Deserialize, Serialize};

use crate::DomainConfig;

/// Everything a configuration source declares, in declaration order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DnsConfig {
    /// Registrars that domains can be assigned to.
    #[serde(default)]
    pub registrars: Vec<RegistrarConfig>,
    /// DNS providers that serve zone contents.
    #[serde(default)]
    pub dns_providers: Vec<DnsProviderConfig>,
    /// Domains (zones) and their records.
    #[serde(default)]
    pub domains: Vec<DomainConfig>,
}

/// A registrar declaration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistrarConfig {
    pub name: String,
    /// Provider implementation type (e.g., "NONE", "GANDI_V5").
    #[serde(rename = "type")]
    pub kind: String,
}

/// A DNS provider declaration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DnsProviderConfig {
    pub name: String,
    /// Provider implementation type (e.g., "BIND", "CLOUDFLAREAPI").
    #[serde(rename = "type")]
    pub kind: String,
}
