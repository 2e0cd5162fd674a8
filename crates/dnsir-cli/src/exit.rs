//! Mapping of command results to process exit codes.

use std::io::Write;
use std::process::ExitCode;

use crate::CommandResult;

/// The outcome of a command as seen by the process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExitSignal {
    pub code: u8,
    /// Failure message, if any.
    pub message: Option<String>,
}

impl ExitSignal {
    pub fn success() -> Self {
        Self {
            code: 0,
            message: None,
        }
    }

    pub fn from_result(result: &CommandResult<()>) -> Self {
        match result {
            Ok(()) => Self::success(),
            Err(e) => Self {
                code: e.exit_code(),
                message: Some(e.to_string()),
            },
        }
    }

    pub fn is_success(&self) -> bool {
        self.code == 0
    }

    /// Write the failure message to `stream` and convert to an [`ExitCode`].
    pub fn report(&self, stream: &mut dyn Write) -> ExitCode {
        if let Some(message) = &self.message {
            // Nothing useful can be done if the stream itself is broken.
            let _ = writeln!(stream, "{message}");
            let _ = stream.flush();
        }
        ExitCode::from(self.code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::CommandError;

    #[test]
    fn test_success() {
        let signal = ExitSignal::from_result(&Ok(()));
        assert!(signal.is_success());

        let mut out = Vec::new();
        signal.report(&mut out);
        assert!(out.is_empty());
    }

    #[test]
    fn test_failure_reports_message() {
        let signal = ExitSignal::from_result(&Err(CommandError::Validation));
        assert_eq!(signal.code, 1);

        let mut out = Vec::new();
        signal.report(&mut out);
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "exiting due to validation errors\n"
        );
    }
}
