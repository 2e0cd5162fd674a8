//! IR serialization.

use std::fs::File;
use std::io::{self, Write};
use std::path::PathBuf;

use dnsir_core::DnsConfig;
use tracing::debug;

use crate::{CommandError, CommandResult};

/// Where serialized IR goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Destination {
    /// The command's standard output stream, followed by a newline.
    Stdout,
    /// A file, created or truncated.
    File(PathBuf),
    /// Thrown away.
    Discard,
}

impl Destination {
    /// `None` or an empty path selects standard output.
    pub fn from_path(path: Option<PathBuf>) -> Self {
        match path {
            Some(path) if !path.as_os_str().is_empty() => Self::File(path),
            _ => Self::Stdout,
        }
    }
}

/// Render the configuration as compact or two-space indented JSON.
pub fn render(config: &DnsConfig, pretty: bool) -> serde_json::Result<Vec<u8>> {
    if pretty {
        serde_json::to_vec_pretty(config)
    } else {
        serde_json::to_vec(config)
    }
}

/// Serialize `config` and write it to `destination`.
///
/// `stdout` is only written to for [`Destination::Stdout`].
pub fn write_ir(
    config: &DnsConfig,
    pretty: bool,
    destination: &Destination,
    stdout: &mut dyn Write,
) -> CommandResult<()> {
    let data = render(config, pretty)?;
    debug!(bytes = data.len(), pretty, destination = ?destination, "Writing IR");

    match destination {
        Destination::Stdout => {
            stdout.write_all(&data)?;
            writeln!(stdout)?;
        }
        Destination::File(path) => {
            let wrap = |source| CommandError::Write {
                path: path.display().to_string(),
                source,
            };
            let mut file = File::create(path).map_err(wrap)?;
            file.write_all(&data).map_err(wrap)?;
        }
        Destination::Discard => io::sink().write_all(&data)?,
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use dnsir_core::{DomainConfig, RecordConfig};

    fn sample() -> DnsConfig {
        let mut domain = DomainConfig::new("example.com");
        domain.registrar = "none".to_string();
        domain.dns_providers.insert("bind".to_string(), Some(2));
        domain
            .records
            .push(RecordConfig::new("A", "@", "192.0.2.1").with_ttl(300));
        DnsConfig {
            domains: vec![domain],
            ..DnsConfig::default()
        }
    }

    fn strip_whitespace(bytes: &[u8]) -> String {
        String::from_utf8_lossy(bytes)
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect()
    }

    #[test]
    fn test_pretty_and_compact_differ_only_in_whitespace() {
        let cfg = sample();
        let compact = render(&cfg, false).unwrap();
        let pretty = render(&cfg, true).unwrap();

        assert_ne!(compact, pretty);
        assert_eq!(strip_whitespace(&compact), strip_whitespace(&pretty));
        assert!(String::from_utf8(pretty).unwrap().contains("\n  \"registrars\""));
    }

    #[test]
    fn test_stdout_gets_trailing_newline() {
        let mut out = Vec::new();
        write_ir(&DnsConfig::default(), false, &Destination::Stdout, &mut out).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "{\"registrars\":[],\"dns_providers\":[],\"domains\":[]}\n"
        );
    }

    #[test]
    fn test_file_is_truncated_and_stdout_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ir.json");
        std::fs::write(&path, "x".repeat(4096)).unwrap();

        let mut out = Vec::new();
        write_ir(&sample(), false, &Destination::File(path.clone()), &mut out).unwrap();

        assert!(out.is_empty());
        let written = std::fs::read(&path).unwrap();
        assert_eq!(written, render(&sample(), false).unwrap());
    }

    #[test]
    fn test_unwritable_file_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("ir.json");

        let err = write_ir(&sample(), true, &Destination::File(path), &mut Vec::new()).unwrap_err();
        assert!(matches!(err, CommandError::Write { .. }));
    }

    #[test]
    fn test_discard_succeeds_silently() {
        let mut out = Vec::new();
        write_ir(&sample(), false, &Destination::Discard, &mut out).unwrap();
        assert!(out.is_empty());
    }

    #[test]
    fn test_destination_from_path() {
        assert_eq!(Destination::from_path(None), Destination::Stdout);
        assert_eq!(Destination::from_path(Some(PathBuf::new())), Destination::Stdout);
        assert_eq!(
            Destination::from_path(Some(PathBuf::from("ir.json"))),
            Destination::File(PathBuf::from("ir.json"))
        );
    }
}
