//! Core domain types for the dnsir configuration pipeline.
//!
//! This crate contains:
//! - The configuration object graph (registrars, DNS providers, domains, records)
//! - Validation issues reported by the normalizer

pub mod config;
pub mod domain;
pub mod issue;
pub mod record;

pub use config::{DnsConfig, DnsProviderConfig, RegistrarConfig};
pub use domain::DomainConfig;
pub use issue::Issue;
pub use record::RecordConfig;
