//! Domain (zone) definitions.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::RecordConfig;

/// A domain and everything that should be published for it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DomainConfig {
    /// Zone name (e.g., "example.com").
    pub name: String,
    /// Registrar name.
    #[serde(default)]
    pub registrar: String,
    /// DNS provider name to the number of nameservers it should contribute.
    /// `None` means the provider's default.
    #[serde(default)]
    pub dns_providers: BTreeMap<String, Option<u32>>,
    /// Records in declaration order.
    #[serde(default)]
    pub records: Vec<RecordConfig>,
    /// Free-form metadata.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub meta: BTreeMap<String, String>,
}

impl DomainConfig {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Records whose label matches `name`.
    pub fn records_at<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a RecordConfig> {
        self.records.iter().filter(move |r| r.name == name)
    }
}
