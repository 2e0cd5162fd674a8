//! `dnsconfig.kdl` parsing.
//!
//! ```kdl
//! registrar "none" type="NONE"
//! dns-provider "bind" type="BIND"
//!
//! domain "example.com" registrar="none" {
//!     dns-provider "bind" nameservers=2
//!     A "@" "192.0.2.1" ttl=600
//!     MX "@" 10 "mail"
//!     TXT "@" "v=spf1 -all"
//! }
//!
//! domain reverse="192.0.2.0/24" registrar="none" {
//!     dns-provider "bind"
//!     PTR "1" "example.com."
//! }
//! ```

use std::collections::BTreeMap;

use dnsir_core::{DnsConfig, DnsProviderConfig, DomainConfig, RecordConfig, RegistrarConfig};
use kdl::{KdlDocument, KdlNode, KdlValue};
use tracing::warn;

use crate::reverse::ReverseNotice;
use crate::{ConfigError, ConfigResult, VariableContext};

/// Evaluation settings for [`parse_dns_config`].
pub struct ParseOptions<'a> {
    pub variables: &'a VariableContext,
    /// Leave undefined variables unexpanded instead of failing.
    pub dev_mode: bool,
    pub reverse_notice: &'a ReverseNotice,
}

/// Parse a DNS configuration from KDL text.
pub fn parse_dns_config(kdl: &str, options: &ParseOptions<'_>) -> ConfigResult<DnsConfig> {
    let doc: KdlDocument = kdl.parse()?;
    let parser = Parser { options };

    let mut config = DnsConfig::default();
    for node in doc.nodes() {
        match node.name().value() {
            "registrar" => {
                let (name, kind) = parser.parse_provider_decl(node, "registrar")?;
                config.registrars.push(RegistrarConfig { name, kind });
            }
            "dns-provider" => {
                let (name, kind) = parser.parse_provider_decl(node, "dns-provider")?;
                config.dns_providers.push(DnsProviderConfig { name, kind });
            }
            "domain" => {
                config.domains.push(parser.parse_domain(node)?);
            }
            _ => {} // Ignore unknown nodes
        }
    }

    Ok(config)
}

struct Parser<'a, 'b> {
    options: &'a ParseOptions<'b>,
}

impl Parser<'_, '_> {
    /// Expand `${...}` references in a string value.
    fn text(&self, raw: &str) -> ConfigResult<String> {
        match self.options.variables.try_interpolate(raw) {
            Ok(s) => Ok(s),
            Err(name) if self.options.dev_mode => {
                warn!(variable = %name, "Undefined variable left unexpanded (dev mode)");
                Ok(self.options.variables.interpolate(raw))
            }
            Err(name) => Err(ConfigError::UndefinedVariable(name)),
        }
    }

    fn first_string_arg(&self, node: &KdlNode) -> ConfigResult<Option<String>> {
        get_first_string_arg(node).map(|s| self.text(s)).transpose()
    }

    fn string_prop(&self, node: &KdlNode, name: &str) -> ConfigResult<Option<String>> {
        get_string_prop(node, name).map(|s| self.text(s)).transpose()
    }

    fn parse_provider_decl(&self, node: &KdlNode, what: &str) -> ConfigResult<(String, String)> {
        let name = self
            .first_string_arg(node)?
            .ok_or_else(|| ConfigError::MissingField(format!("{what} name")))?;
        let kind = self
            .string_prop(node, "type")?
            .ok_or_else(|| ConfigError::MissingField(format!("type for {what} '{name}'")))?;
        Ok((name, kind))
    }

    fn parse_domain(&self, node: &KdlNode) -> ConfigResult<DomainConfig> {
        let name = match (
            self.first_string_arg(node)?,
            self.string_prop(node, "reverse")?,
        ) {
            (Some(name), None) => name,
            (None, Some(cidr)) => self.options.reverse_notice.zone_name(&cidr)?,
            (Some(name), Some(_)) => {
                return Err(ConfigError::invalid(
                    "domain",
                    format!("'{name}' cannot have both a name and reverse="),
                ));
            }
            (None, None) => return Err(ConfigError::MissingField("domain name".to_string())),
        };

        let mut domain = DomainConfig::new(name);
        domain.registrar = self.string_prop(node, "registrar")?.unwrap_or_default();

        if let Some(children) = node.children() {
            for child in children.nodes() {
                match child.name().value() {
                    "dns-provider" => {
                        let (provider, count) = self.parse_domain_provider(&domain.name, child)?;
                        domain.dns_providers.insert(provider, count);
                    }
                    "meta" => {
                        let (key, value) = self.parse_meta(&domain.name, child)?;
                        domain.meta.insert(key, value);
                    }
                    _ => domain.records.push(self.parse_record(&domain.name, child)?),
                }
            }
        }

        Ok(domain)
    }

    fn parse_domain_provider(
        &self,
        domain: &str,
        node: &KdlNode,
    ) -> ConfigResult<(String, Option<u32>)> {
        let name = self.first_string_arg(node)?.ok_or_else(|| {
            ConfigError::MissingField(format!("dns-provider name in domain '{domain}'"))
        })?;
        let count = match node.get("nameservers") {
            None => None,
            Some(value) => Some(to_u32(value).ok_or_else(|| {
                ConfigError::invalid(
                    format!("nameservers of '{name}' in domain '{domain}'"),
                    format!("expected a non-negative integer, got {value}"),
                )
            })?),
        };
        Ok((name, count))
    }

    fn parse_meta(&self, domain: &str, node: &KdlNode) -> ConfigResult<(String, String)> {
        let args = self.positional_args(node)?;
        match <[String; 2]>::try_from(args) {
            Ok([key, value]) => Ok((key, value)),
            Err(_) => Err(ConfigError::invalid(
                format!("meta in domain '{domain}'"),
                "expected meta \"<key>\" \"<value>\"",
            )),
        }
    }

    fn parse_record(&self, domain: &str, node: &KdlNode) -> ConfigResult<RecordConfig> {
        let rtype = node.name().value().to_ascii_uppercase();
        let mut args = self.positional_args(node)?.into_iter();

        let name = args.next().ok_or_else(|| {
            ConfigError::MissingField(format!("label for {rtype} record in domain '{domain}'"))
        })?;
        let target = args.collect::<Vec<_>>().join(" ");
        if target.is_empty() {
            return Err(ConfigError::MissingField(format!(
                "target for {rtype} record '{name}' in domain '{domain}'"
            )));
        }

        let mut record = RecordConfig::new(rtype, name, target);
        if let Some(value) = node.get("ttl") {
            record.ttl = to_u32(value).ok_or_else(|| {
                ConfigError::invalid(
                    format!("ttl of {} record '{}' in domain '{domain}'", record.rtype, record.name),
                    format!("expected a non-negative integer, got {value}"),
                )
            })?;
        }

        let mut meta = BTreeMap::new();
        for entry in node.entries() {
            if let Some(key) = entry.name().map(|n| n.value()) {
                if key != "ttl" {
                    if let Some(s) = entry.value().as_string() {
                        meta.insert(key.to_string(), self.text(s)?);
                    }
                }
            }
        }
        record.meta = meta;

        Ok(record)
    }

    /// Positional arguments as text. Integers are rendered in decimal so
    /// `MX "@" 10 "mail"` reads the same as `MX "@" "10 mail"`.
    fn positional_args(&self, node: &KdlNode) -> ConfigResult<Vec<String>> {
        node.entries()
            .iter()
            .filter(|e| e.name().is_none())
            .map(|e| {
                let value = e.value();
                if let Some(s) = value.as_string() {
                    self.text(s)
                } else if let Some(i) = value.as_integer() {
                    Ok(i.to_string())
                } else {
                    Err(ConfigError::invalid(
                        format!("argument of '{}'", node.name().value()),
                        format!("expected a string or integer, got {value}"),
                    ))
                }
            })
            .collect()
    }
}

// Helper functions for extracting values from KDL nodes

fn get_first_string_arg(node: &KdlNode) -> Option<&str> {
    node.entries()
        .iter()
        .find(|e| e.name().is_none())
        .and_then(|e| e.value().as_string())
}

fn get_string_prop<'a>(node: &'a KdlNode, name: &str) -> Option<&'a str> {
    node.get(name).and_then(|v| v.as_string())
}

fn to_u32(value: &KdlValue) -> Option<u32> {
    value.as_integer().and_then(|i| u32::try_from(i).ok())
}
