//! Reverse-zone naming.
//!
//! Prefixes on an octet (IPv4) or nibble (IPv6) boundary map directly to
//! `in-addr.arpa` / `ip6.arpa` names. Classless IPv4 prefixes use the
//! RFC 4183 form, e.g. `192.0.2.64/26` becomes `64-26.2.0.192.in-addr.arpa`.

use std::io::{self, Write};
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};
use std::sync::atomic::{AtomicBool, Ordering};

use tracing::debug;

use crate::{ConfigError, ConfigResult};

/// A reverse zone computed from a prefix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReverseZone {
    pub name: String,
    /// True when the prefix is not on an octet boundary (RFC 4183 naming).
    pub classless: bool,
}

/// Compute the reverse zone name for a prefix such as `192.0.2.0/24`.
pub fn reverse_zone_name(cidr: &str) -> ConfigResult<ReverseZone> {
    let invalid = |message: &str| ConfigError::invalid("reverse", format!("{cidr}: {message}"));

    let (addr, len) = cidr
        .trim()
        .split_once('/')
        .ok_or_else(|| invalid("expected <address>/<prefix-length>"))?;
    let len: u32 = len.parse().map_err(|_| invalid("invalid prefix length"))?;

    match addr.parse::<IpAddr>() {
        Ok(IpAddr::V4(v4)) => reverse_v4(v4, len).map_err(|m| invalid(m)),
        Ok(IpAddr::V6(v6)) => reverse_v6(v6, len).map_err(|m| invalid(m)),
        Err(_) => Err(invalid("invalid IP address")),
    }
}

fn reverse_v4(addr: Ipv4Addr, len: u32) -> Result<ReverseZone, &'static str> {
    if len > 32 {
        return Err("IPv4 prefix length must be at most 32");
    }
    let host_mask = u32::MAX.checked_shr(len).unwrap_or(0);
    if u32::from(addr) & host_mask != 0 {
        return Err("address has host bits set");
    }

    let octets = addr.octets();
    let full = (len / 8) as usize;
    let parent = reversed_labels(octets[..full].iter().map(u8::to_string), "in-addr.arpa");

    if len % 8 == 0 {
        return Ok(ReverseZone {
            name: parent,
            classless: false,
        });
    }

    Ok(ReverseZone {
        name: format!("{}-{}.{}", octets[full], len, parent),
        classless: true,
    })
}

fn reverse_v6(addr: Ipv6Addr, len: u32) -> Result<ReverseZone, &'static str> {
    if len > 128 {
        return Err("IPv6 prefix length must be at most 128");
    }
    if len % 4 != 0 {
        return Err("IPv6 prefix length must be a multiple of 4");
    }
    let host_mask = u128::MAX.checked_shr(len).unwrap_or(0);
    if u128::from(addr) & host_mask != 0 {
        return Err("address has host bits set");
    }

    let nibbles = addr
        .octets()
        .iter()
        .flat_map(|b| [b >> 4, b & 0x0f])
        .take((len / 4) as usize)
        .map(|n| format!("{n:x}"))
        .collect::<Vec<_>>();

    Ok(ReverseZone {
        name: reversed_labels(nibbles.into_iter(), "ip6.arpa"),
        classless: false,
    })
}

fn reversed_labels<I>(labels: I, suffix: &str) -> String
where
    I: DoubleEndedIterator<Item = String>,
{
    let mut parts: Vec<String> = labels.rev().collect();
    parts.push(suffix.to_string());
    parts.join(".")
}

/// A warning that is printed once after a command finishes, independent of
/// whether the command succeeded.
pub trait DeferredWarning {
    fn print_warning(&self, out: &mut dyn Write) -> io::Result<()>;
}

/// Tracks whether any classless reverse zone was named during evaluation.
#[derive(Debug, Default)]
pub struct ReverseNotice {
    classless_used: AtomicBool,
}

impl ReverseNotice {
    pub fn new() -> Self {
        Self::default()
    }

    /// Compute a reverse zone name, remembering if RFC 4183 naming was used.
    pub fn zone_name(&self, cidr: &str) -> ConfigResult<String> {
        let zone = reverse_zone_name(cidr)?;
        if zone.classless {
            debug!(cidr = %cidr, zone = %zone.name, "Using RFC 4183 reverse zone name");
            self.classless_used.store(true, Ordering::Relaxed);
        }
        Ok(zone.name)
    }

    pub fn classless_used(&self) -> bool {
        self.classless_used.load(Ordering::Relaxed)
    }
}

impl DeferredWarning for ReverseNotice {
    fn print_warning(&self, out: &mut dyn Write) -> io::Result<()> {
        if self.classless_used() {
            writeln!(
                out,
                "WARNING: reverse zones for prefixes that are not on an octet boundary \
                 are named using RFC 4183 (e.g. 64-26.2.0.192.in-addr.arpa). \
                 Check that your DNS provider expects this format."
            )?;
        }
        Ok(())
    }
}
