//! Validation and normalization of an evaluated configuration.

use std::collections::HashSet;
use std::net::{Ipv4Addr, Ipv6Addr};
use std::sync::LazyLock;

use dnsir_core::{DnsConfig, DomainConfig, Issue, RecordConfig};
use regex::Regex;
use tracing::debug;

/// Inspects and normalizes a configuration in place, reporting problems.
pub trait Validator {
    fn validate_and_normalize(&self, config: &mut DnsConfig) -> Vec<Issue>;
}

pub const DEFAULT_TTL: u32 = 300;

const MAX_TXT_LEN: usize = 255;

const KNOWN_TYPES: &[&str] = &[
    "A", "AAAA", "ALIAS", "CAA", "CNAME", "MX", "NS", "PTR", "SRV", "TXT",
];

/// Types whose target is a hostname.
const HOST_TARGET_TYPES: &[&str] = &["ALIAS", "CNAME", "MX", "NS", "PTR", "SRV"];

// One or more labels; the first may be a wildcard.
static LABEL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\*|[a-z0-9_](?:[a-z0-9_-]*[a-z0-9_])?)(?:\.[a-z0-9_](?:[a-z0-9_-]*[a-z0-9_])?)*$")
        .unwrap()
});

/// The standard rule set.
#[derive(Debug, Clone, Copy, Default)]
pub struct Normalizer;

impl Validator for Normalizer {
    fn validate_and_normalize(&self, config: &mut DnsConfig) -> Vec<Issue> {
        let mut issues = Vec::new();

        check_unique(
            "registrar",
            config.registrars.iter().map(|r| r.name.as_str()),
            &mut issues,
        );
        check_unique(
            "DNS provider",
            config.dns_providers.iter().map(|p| p.name.as_str()),
            &mut issues,
        );

        let registrars: HashSet<&str> = config.registrars.iter().map(|r| r.name.as_str()).collect();
        let providers: HashSet<&str> = config.dns_providers.iter().map(|p| p.name.as_str()).collect();
        let mut seen_domains = HashSet::new();

        for domain in &mut config.domains {
            domain.name = normalize_zone_name(&domain.name);
            if !seen_domains.insert(domain.name.clone()) {
                issues.push(Issue::error(format!(
                    "domain {} is defined more than once",
                    domain.name
                )));
            }

            check_references(domain, &registrars, &providers, &mut issues);
            for record in &mut domain.records {
                normalize_record(&domain.name, record, &mut issues);
            }
            check_label_conflicts(domain, &mut issues);
        }

        debug!(
            domains = config.domains.len(),
            issues = issues.len(),
            "Validation complete"
        );
        issues
    }
}

fn normalize_record(zone: &str, record: &mut RecordConfig, issues: &mut Vec<Issue>) {
    record.rtype = record.rtype.to_ascii_uppercase();
    if !KNOWN_TYPES.contains(&record.rtype.as_str()) {
        issues.push(Issue::error(format!(
            "unknown record type {} for {} in {zone}",
            record.rtype, record.name
        )));
        return;
    }

    normalize_label(zone, record, issues);

    if record.ttl == 0 {
        record.ttl = DEFAULT_TTL;
    }

    match record.rtype.as_str() {
        "A" => {
            if record.target.parse::<Ipv4Addr>().is_err() {
                issues.push(Issue::error(format!(
                    "A record {} in {zone} has invalid IPv4 address {}",
                    record.name, record.target
                )));
            }
        }
        "AAAA" => {
            if record.target.parse::<Ipv6Addr>().is_err() {
                issues.push(Issue::error(format!(
                    "AAAA record {} in {zone} has invalid IPv6 address {}",
                    record.name, record.target
                )));
            }
        }
        "TXT" => {
            if record.target.len() > MAX_TXT_LEN {
                issues.push(Issue::warning(format!(
                    "TXT record {} in {zone} is {} bytes; it will be split into {MAX_TXT_LEN}-byte strings",
                    record.name,
                    record.target.len()
                )));
            }
        }
        _ => {}
    }

    if HOST_TARGET_TYPES.contains(&record.rtype.as_str()) {
        record.target = fqdn_target(zone, &record.target);
    }

    match record.rtype.as_str() {
        "CNAME" if record.name == "@" => issues.push(Issue::error(format!(
            "CNAME record cannot be at the apex of {zone}"
        ))),
        "MX" if record.mx_preference.is_none() => issues.push(Issue::error(format!(
            "MX record {} in {zone} has no preference",
            record.name
        ))),
        "SRV" if record.srv_priority.is_none()
            || record.srv_weight.is_none()
            || record.srv_port.is_none() =>
        {
            issues.push(Issue::error(format!(
                "SRV record {} in {zone} is missing priority, weight or port",
                record.name
            )))
        }
        _ => {}
    }
}

fn normalize_zone_name(name: &str) -> String {
    name.trim().trim_end_matches('.').to_ascii_lowercase()
}

/// Make the label relative to the zone, `@` for the apex.
fn normalize_label(zone: &str, record: &mut RecordConfig, issues: &mut Vec<Issue>) {
    let label = record.name.trim().to_ascii_lowercase();
    let suffix = format!(".{zone}");

    let relative = if label.is_empty() || label == "@" {
        Some("@".to_string())
    } else if let Some(fqdn) = label.strip_suffix('.') {
        if fqdn == zone {
            Some("@".to_string())
        } else {
            fqdn.strip_suffix(&suffix).map(str::to_string)
        }
    } else {
        if label == zone || label.ends_with(&suffix) {
            issues.push(Issue::warning(format!(
                "label {label} in {zone} ends with the zone name; \
                 the zone will be appended again (use {label}. if that is not intended)"
            )));
        }
        Some(label.clone())
    };

    let Some(relative) = relative else {
        issues.push(Issue::error(format!(
            "record {label} is not in zone {zone}"
        )));
        record.name = label;
        return;
    };
    record.name = relative;

    if record.name != "@" && !LABEL_REGEX.is_match(&record.name) {
        issues.push(Issue::error(format!(
            "invalid label {} in {zone}",
            record.name
        )));
    }
}

fn fqdn_target(zone: &str, target: &str) -> String {
    let target = target.trim().to_ascii_lowercase();
    if target == "@" {
        format!("{zone}.")
    } else if target.ends_with('.') {
        target
    } else {
        format!("{target}.{zone}.")
    }
}

fn check_unique<'a>(what: &str, names: impl Iterator<Item = &'a str>, issues: &mut Vec<Issue>) {
    let mut seen = HashSet::new();
    for name in names {
        if !seen.insert(name) {
            issues.push(Issue::error(format!(
                "{what} {name} is defined more than once"
            )));
        }
    }
}

fn check_references(
    domain: &DomainConfig,
    registrars: &HashSet<&str>,
    providers: &HashSet<&str>,
    issues: &mut Vec<Issue>,
) {
    if domain.registrar.is_empty() {
        issues.push(Issue::error(format!(
            "domain {} has no registrar",
            domain.name
        )));
    } else if !registrars.contains(domain.registrar.as_str()) {
        issues.push(Issue::error(format!(
            "domain {} uses undefined registrar {}",
            domain.name, domain.registrar
        )));
    }

    if domain.dns_providers.is_empty() {
        issues.push(Issue::warning(format!(
            "domain {} has no DNS providers; its records will not be published",
            domain.name
        )));
    }
    for provider in domain.dns_providers.keys() {
        if !providers.contains(provider.as_str()) {
            issues.push(Issue::error(format!(
                "domain {} uses undefined DNS provider {provider}",
                domain.name
            )));
        }
    }
}

/// Everything that tells two records apart once MX, SRV and CAA fields are split out.
fn identity(
    record: &RecordConfig,
) -> (&str, &str, &str, Option<u16>, [Option<u16>; 3], Option<u8>, Option<&str>) {
    (
        record.rtype.as_str(),
        record.name.as_str(),
        record.target.as_str(),
        record.mx_preference,
        [record.srv_priority, record.srv_weight, record.srv_port],
        record.caa_flag,
        record.caa_tag.as_deref(),
    )
}

/// CNAMEs must be alone at their label, and no record may appear twice.
fn check_label_conflicts(domain: &DomainConfig, issues: &mut Vec<Issue>) {
    let mut reported_cnames = HashSet::new();
    let mut seen = HashSet::new();

    for record in &domain.records {
        if record.rtype == "CNAME"
            && domain.records_at(&record.name).count() > 1
            && reported_cnames.insert(record.name.as_str())
        {
            issues.push(Issue::error(format!(
                "CNAME {} in {} cannot coexist with other records",
                record.name, domain.name
            )));
        }

        if !seen.insert(identity(record)) {
            issues.push(Issue::error(format!(
                "duplicate record {record} in {}",
                domain.name
            )));
        }
    }
}
