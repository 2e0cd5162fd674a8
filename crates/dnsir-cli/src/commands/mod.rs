//! CLI command implementations.

pub mod check;
pub mod print_ir;

use std::path::PathBuf;
use std::sync::Arc;

use clap::Args;
use dnsir_config::{
    DeferredWarning, KdlEvaluator, LoadOptions, Normalizer, RecordFieldPostProcessor,
    ReverseNotice,
};

use crate::pipeline::{Collaborators, Pipeline};

pub use check::{CheckArgs, check};
pub use print_ir::{PrintIrArgs, print_ir};

/// Flags shared by every command that loads a configuration.
#[derive(Debug, Clone, Args)]
pub struct LoadArgs {
    /// Configuration source to evaluate
    #[arg(long, value_name = "FILE", default_value = "dnsconfig.kdl")]
    pub config: String,

    /// Load a previously generated IR file instead of evaluating the source
    #[arg(long, value_name = "FILE")]
    pub ir: Option<PathBuf>,

    /// Development mode: leave undefined variables unexpanded
    #[arg(long)]
    pub dev: bool,

    /// Variable available to the source as ${KEY}
    #[arg(
        short = 'v',
        long = "variable",
        value_name = "KEY=VALUE",
        value_delimiter = ','
    )]
    pub variables: Vec<String>,
}

impl LoadArgs {
    pub fn to_options(&self) -> LoadOptions {
        LoadOptions {
            source: PathBuf::from(&self.config),
            ir: self.ir.clone(),
            dev_mode: self.dev,
            variables: self.variables.clone(),
        }
    }
}

/// The standard evaluator, post-processor and validator.
#[derive(Debug)]
pub struct Toolchain {
    evaluator: KdlEvaluator,
    post_processor: RecordFieldPostProcessor,
    normalizer: Normalizer,
    reverse_notice: Arc<ReverseNotice>,
}

impl Toolchain {
    pub fn new() -> Self {
        let reverse_notice = Arc::new(ReverseNotice::new());
        Self {
            evaluator: KdlEvaluator::with_reverse_notice(reverse_notice.clone()),
            post_processor: RecordFieldPostProcessor,
            normalizer: Normalizer,
            reverse_notice,
        }
    }

    pub fn pipeline(&self) -> Pipeline<'_> {
        Pipeline::new(Collaborators {
            evaluator: &self.evaluator,
            post_processor: &self.post_processor,
            validator: &self.normalizer,
        })
    }

    /// Printed once after `check`, whatever the outcome.
    pub fn deferred_warning(&self) -> &dyn DeferredWarning {
        self.reverse_notice.as_ref()
    }
}

impl Default for Toolchain {
    fn default() -> Self {
        Self::new()
    }
}
