//! The dnsir IR pipeline and its commands.
//!
//! `print-ir` and `check` share one pipeline: load the configuration,
//! optionally validate and normalize it, then serialize the IR.

pub mod commands;
pub mod error;
pub mod exit;
pub mod ir;
pub mod logging;
pub mod pipeline;
pub mod report;

pub use error::{CommandError, CommandResult};
pub use exit::ExitSignal;
pub use ir::Destination;
pub use pipeline::{Collaborators, Pipeline, PipelineOptions, Streams};
