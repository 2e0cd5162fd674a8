//! dnsir CLI tool.

use std::io::{self, Write};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use dnsir_cli::commands::{self, CheckArgs, PrintIrArgs, Toolchain};
use dnsir_cli::{ExitSignal, logging};

#[derive(Parser)]
#[command(name = "dnsir")]
#[command(about = "Evaluate, validate and print DNS configuration", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Output intermediate representation (IR) after running validation and normalization
    PrintIr(PrintIrArgs),
    /// Check and validate the configuration without printing IR
    Check(CheckArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = logging::filter_from_env();
    let installed = match cli.command {
        Commands::PrintIr(_) => {
            tracing::subscriber::set_global_default(logging::subscriber(filter, io::stderr))
        }
        Commands::Check(_) => {
            tracing::subscriber::set_global_default(logging::subscriber(filter, io::stdout))
        }
    };
    if let Err(err) = installed {
        eprintln!("dnsir: {err}");
    }

    let toolchain = Toolchain::new();
    let pipeline = toolchain.pipeline();
    let mut stdout = io::stdout().lock();
    let mut stderr = io::stderr().lock();

    match cli.command {
        Commands::PrintIr(args) => {
            let result = commands::print_ir(&args, &pipeline, &mut stdout, &mut stderr);
            let _ = stdout.flush();
            ExitSignal::from_result(&result).report(&mut stderr)
        }
        Commands::Check(args) => {
            let result =
                commands::check(&args, &pipeline, toolchain.deferred_warning(), &mut stdout);
            ExitSignal::from_result(&result).report(&mut stdout)
        }
    }
}
