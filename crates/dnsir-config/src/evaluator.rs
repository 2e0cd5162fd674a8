//! Source evaluation.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use dnsir_core::DnsConfig;
use tracing::debug;

use crate::dnsconfig::{ParseOptions, parse_dns_config};
use crate::reverse::ReverseNotice;
use crate::{ConfigResult, VariableContext};

/// Turns a configuration source into a configuration object graph.
pub trait Evaluator {
    fn evaluate(
        &self,
        path: &Path,
        dev_mode: bool,
        variables: &HashMap<String, String>,
    ) -> ConfigResult<DnsConfig>;
}

/// Evaluates `dnsconfig.kdl` files.
#[derive(Debug, Clone, Default)]
pub struct KdlEvaluator {
    reverse_notice: Arc<ReverseNotice>,
}

impl KdlEvaluator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Share a reverse-zone notice with the caller so it can be reported
    /// after the run.
    pub fn with_reverse_notice(reverse_notice: Arc<ReverseNotice>) -> Self {
        Self { reverse_notice }
    }
}

impl Evaluator for KdlEvaluator {
    fn evaluate(
        &self,
        path: &Path,
        dev_mode: bool,
        variables: &HashMap<String, String>,
    ) -> ConfigResult<DnsConfig> {
        debug!(path = %path.display(), dev_mode, variables = variables.len(), "Evaluating configuration");
        let content = std::fs::read_to_string(path)?;

        let mut ctx = VariableContext::with_custom(variables.clone());
        ctx.populate_env();

        let config = parse_dns_config(
            &content,
            &ParseOptions {
                variables: &ctx,
                dev_mode,
                reverse_notice: &self.reverse_notice,
            },
        )?;
        debug!(domains = config.domains.len(), "Configuration evaluated");
        Ok(config)
    }
}
