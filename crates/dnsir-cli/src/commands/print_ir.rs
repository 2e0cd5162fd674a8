//! `print-ir`: emit the intermediate representation.

use std::io::Write;
use std::path::PathBuf;

use clap::Args;

use super::LoadArgs;
use crate::CommandResult;
use crate::ir::Destination;
use crate::pipeline::{Pipeline, PipelineOptions, Streams};

#[derive(Debug, Clone, Args)]
pub struct PrintIrArgs {
    #[command(flatten)]
    pub load: LoadArgs,

    /// Pretty-print the IR
    #[arg(long)]
    pub pretty: bool,

    /// Write the IR to this file instead of standard output
    #[arg(long, value_name = "FILE")]
    pub out: Option<PathBuf>,

    /// Skip validation and normalization; print the evaluated result as-is
    #[arg(long)]
    pub raw: bool,
}

impl PrintIrArgs {
    pub fn options(&self) -> PipelineOptions {
        PipelineOptions {
            load: self.load.to_options(),
            raw: self.raw,
            pretty: self.pretty,
            destination: Destination::from_path(self.out.clone()),
        }
    }
}

/// Run `print-ir`. Issues go to `stderr`, IR to `stdout` unless `--out` is set.
pub fn print_ir(
    args: &PrintIrArgs,
    pipeline: &Pipeline<'_>,
    stdout: &mut dyn Write,
    stderr: &mut dyn Write,
) -> CommandResult<()> {
    pipeline.run(
        &args.options(),
        &mut Streams {
            out: stdout,
            diag: stderr,
        },
    )
}
