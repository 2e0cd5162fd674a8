//! `check`: validate a configuration without printing IR.
//!
//! Runs the same pipeline as `print-ir` with serialization discarded and
//! every message sent to standard output.

use std::io::{self, Write};

use clap::Args;
use dnsir_config::DeferredWarning;

use super::LoadArgs;
use crate::CommandResult;
use crate::ir::Destination;
use crate::pipeline::{Pipeline, PipelineOptions, Streams};

#[derive(Debug, Clone, Args)]
pub struct CheckArgs {
    #[command(flatten)]
    pub load: LoadArgs,
}

impl CheckArgs {
    pub fn options(&self) -> PipelineOptions {
        PipelineOptions {
            load: self.load.to_options(),
            raw: false,
            pretty: false,
            destination: Destination::Discard,
        }
    }
}

/// Run `check`. Prints "No errors." on success.
pub fn check(
    args: &CheckArgs,
    pipeline: &Pipeline<'_>,
    deferred: &dyn DeferredWarning,
    stdout: &mut dyn Write,
) -> CommandResult<()> {
    let result = pipeline.run(
        &args.options(),
        &mut Streams {
            out: &mut io::sink(),
            diag: &mut *stdout,
        },
    );

    deferred.print_warning(stdout)?;
    if result.is_ok() {
        writeln!(stdout, "No errors.")?;
    }
    result
}
