//! Record-type specific post-processing.
//!
//! Sources write structured targets as a single string (`MX "@" "10 mail"`);
//! this step splits them into the typed fields carried in the IR.

use std::str::FromStr;

use dnsir_core::{DomainConfig, RecordConfig};

use crate::{ConfigError, ConfigResult};

/// Rewrites record fields in place after evaluation.
pub trait PostProcessor {
    fn post_process(&self, domains: &mut [DomainConfig]) -> ConfigResult<()>;
}

/// Splits MX, SRV and CAA targets into their typed fields.
#[derive(Debug, Default, Clone, Copy)]
pub struct RecordFieldPostProcessor;

impl PostProcessor for RecordFieldPostProcessor {
    fn post_process(&self, domains: &mut [DomainConfig]) -> ConfigResult<()> {
        for domain in domains {
            for record in &mut domain.records {
                split_fields(&domain.name, record)?;
            }
        }
        Ok(())
    }
}

fn split_fields(zone: &str, record: &mut RecordConfig) -> ConfigResult<()> {
    let parts: Vec<&str> = record.target.split_whitespace().collect();

    if record.rtype.eq_ignore_ascii_case("MX") {
        if record.mx_preference.is_some() {
            return Ok(());
        }
        let [pref, host] = parts[..] else {
            return Err(malformed(zone, record, "<preference> <host>"));
        };
        record.mx_preference = Some(number(zone, record, "preference", pref)?);
        record.target = host.to_string();
    } else if record.rtype.eq_ignore_ascii_case("SRV") {
        if record.srv_port.is_some() {
            return Ok(());
        }
        let [priority, weight, port, host] = parts[..] else {
            return Err(malformed(zone, record, "<priority> <weight> <port> <host>"));
        };
        record.srv_priority = Some(number(zone, record, "priority", priority)?);
        record.srv_weight = Some(number(zone, record, "weight", weight)?);
        record.srv_port = Some(number(zone, record, "port", port)?);
        record.target = host.to_string();
    } else if record.rtype.eq_ignore_ascii_case("CAA") {
        if record.caa_tag.is_some() {
            return Ok(());
        }
        let [flag, tag, value @ ..] = parts.as_slice() else {
            return Err(malformed(zone, record, "<flag> <tag> <value>"));
        };
        if value.is_empty() {
            return Err(malformed(zone, record, "<flag> <tag> <value>"));
        }
        let value = value.join(" ");
        record.caa_flag = Some(number(zone, record, "flag", flag)?);
        record.caa_tag = Some(tag.to_string());
        record.target = value.trim_matches('"').to_string();
    }

    Ok(())
}

fn malformed(zone: &str, record: &RecordConfig, expected: &str) -> ConfigError {
    ConfigError::invalid(
        format!("{} record '{}' in domain '{zone}'", record.rtype, record.name),
        format!("target '{}' does not match \"{expected}\"", record.target),
    )
}

fn number<T: FromStr>(zone: &str, record: &RecordConfig, field: &str, raw: &str) -> ConfigResult<T> {
    raw.parse().map_err(|_| {
        ConfigError::invalid(
            format!(
                "{field} of {} record '{}' in domain '{zone}'",
                record.rtype, record.name
            ),
            format!("'{raw}' is not a valid number"),
        )
    })
}
