//! Reporting of validation issues.

use std::io::{self, Write};

use dnsir_core::Issue;

/// Print every issue in order and report whether any of them is fatal.
///
/// Nothing is written for an empty list.
pub fn print_validation_errors(issues: &[Issue], out: &mut dyn Write) -> io::Result<bool> {
    if issues.is_empty() {
        return Ok(false);
    }

    writeln!(out, "{} Validation errors:", issues.len())?;
    let mut fatal = false;
    for issue in issues {
        match issue {
            Issue::Warning(message) => writeln!(out, "WARNING: {message}")?,
            Issue::Error(message) => {
                fatal = true;
                writeln!(out, "ERROR: {message}")?;
            }
        }
    }
    Ok(fatal)
}
