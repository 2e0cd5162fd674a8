//! DNS record definitions.

use derive_more::Display;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A single DNS record.
///
/// Type-specific fields (`mx_preference`, `srv_*`, `caa_*`) are filled in by
/// post-processing and omitted from serialized output while unset.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Display)]
#[display("{rtype} {name} {target}")]
pub struct RecordConfig {
    /// Record type (e.g., "A", "MX").
    #[serde(rename = "type")]
    pub rtype: String,
    /// Label relative to the zone, `@` for the apex.
    pub name: String,
    pub target: String,
    /// Time to live in seconds. Zero means "use the default".
    #[serde(default)]
    pub ttl: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mx_preference: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub srv_priority: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub srv_weight: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub srv_port: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub caa_flag: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub caa_tag: Option<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub meta: BTreeMap<String, String>,
}

impl RecordConfig {
    pub fn new(rtype: impl Into<String>, name: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            rtype: rtype.into(),
            name: name.into(),
            target: target.into(),
            ..Self::default()
        }
    }

    pub fn with_ttl(mut self, ttl: u32) -> Self {
        self.ttl = ttl;
        self
    }
}
