//! The load → validate → serialize pipeline shared by all commands.

use std::io::Write;

use dnsir_config::{ConfigLoader, Evaluator, LoadOptions, PostProcessor, Validator};
use tracing::debug;

use crate::ir::{Destination, write_ir};
use crate::report::print_validation_errors;
use crate::{CommandError, CommandResult};

/// External steps the pipeline drives.
#[derive(Clone, Copy)]
pub struct Collaborators<'a> {
    pub evaluator: &'a dyn Evaluator,
    pub post_processor: &'a dyn PostProcessor,
    pub validator: &'a dyn Validator,
}

/// Per-invocation settings.
#[derive(Debug, Clone)]
pub struct PipelineOptions {
    pub load: LoadOptions,
    /// Skip validation and normalization.
    pub raw: bool,
    pub pretty: bool,
    pub destination: Destination,
}

/// Output streams for one invocation.
pub struct Streams<'a> {
    /// Receives IR written to [`Destination::Stdout`].
    pub out: &'a mut dyn Write,
    /// Receives validation issues.
    pub diag: &'a mut dyn Write,
}

pub struct Pipeline<'a> {
    loader: ConfigLoader<'a>,
    validator: &'a dyn Validator,
}

impl<'a> Pipeline<'a> {
    pub fn new(collaborators: Collaborators<'a>) -> Self {
        Self {
            loader: ConfigLoader::new(collaborators.evaluator, collaborators.post_processor),
            validator: collaborators.validator,
        }
    }

    /// Run one invocation. Stages run in order and the first failure stops
    /// the pipeline; issues already printed stay printed.
    pub fn run(&self, options: &PipelineOptions, streams: &mut Streams<'_>) -> CommandResult<()> {
        debug!(stage = "load", "Pipeline stage started");
        let mut config = self.loader.load(&options.load)?;

        if options.raw {
            debug!("Skipping validation (raw mode)");
        } else {
            debug!(stage = "validate", "Pipeline stage started");
            let issues = self.validator.validate_and_normalize(&mut config);
            if print_validation_errors(&issues, streams.diag)? {
                debug!(issues = issues.len(), "Validation failed");
                return Err(CommandError::Validation);
            }
        }

        debug!(stage = "serialize", "Pipeline stage started");
        write_ir(&config, options.pretty, &options.destination, streams.out)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use dnsir_config::{ConfigError, ConfigResult};
    use dnsir_core::{DnsConfig, DomainConfig, Issue};
    use std::cell::Cell;
    use std::collections::HashMap;
    use std::path::{Path, PathBuf};

    /// Returns a fixed configuration and counts calls.
    #[derive(Default)]
    pub(crate) struct StubEvaluator {
        pub config: DnsConfig,
        pub calls: Cell<usize>,
    }

    impl Evaluator for StubEvaluator {
        fn evaluate(
            &self,
            _path: &Path,
            _dev_mode: bool,
            _variables: &HashMap<String, String>,
        ) -> ConfigResult<DnsConfig> {
            self.calls.set(self.calls.get() + 1);
            Ok(self.config.clone())
        }
    }

    pub(crate) struct NoopPostProcessor;

    impl PostProcessor for NoopPostProcessor {
        fn post_process(&self, _domains: &mut [DomainConfig]) -> ConfigResult<()> {
            Ok(())
        }
    }

    /// Returns fixed issues and counts calls.
    #[derive(Default)]
    pub(crate) struct StubValidator {
        pub issues: Vec<Issue>,
        pub calls: Cell<usize>,
    }

    impl Validator for StubValidator {
        fn validate_and_normalize(&self, _config: &mut DnsConfig) -> Vec<Issue> {
            self.calls.set(self.calls.get() + 1);
            self.issues.clone()
        }
    }

    struct Run {
        result: CommandResult<()>,
        out: String,
        diag: String,
    }

    fn run(evaluator: &StubEvaluator, validator: &StubValidator, options: PipelineOptions) -> Run {
        let pipeline = Pipeline::new(Collaborators {
            evaluator,
            post_processor: &NoopPostProcessor,
            validator,
        });
        let mut out = Vec::new();
        let mut diag = Vec::new();
        let result = pipeline.run(
            &options,
            &mut Streams {
                out: &mut out,
                diag: &mut diag,
            },
        );
        Run {
            result,
            out: String::from_utf8(out).unwrap(),
            diag: String::from_utf8(diag).unwrap(),
        }
    }

    fn options(raw: bool) -> PipelineOptions {
        PipelineOptions {
            load: LoadOptions {
                source: PathBuf::from("dnsconfig.kdl"),
                ..LoadOptions::default()
            },
            raw,
            pretty: false,
            destination: Destination::Stdout,
        }
    }

    #[test]
    fn test_clean_run_serializes() {
        let evaluator = StubEvaluator::default();
        let validator = StubValidator::default();

        let run = run(&evaluator, &validator, options(false));

        assert!(run.result.is_ok());
        assert_eq!(run.out, "{\"registrars\":[],\"dns_providers\":[],\"domains\":[]}\n");
        assert!(run.diag.is_empty());
        assert_eq!(validator.calls.get(), 1);
    }

    #[test]
    fn test_raw_mode_never_validates() {
        let evaluator = StubEvaluator::default();
        let validator = StubValidator {
            issues: vec![Issue::error("would fail")],
            ..StubValidator::default()
        };

        let run = run(&evaluator, &validator, options(true));

        assert!(run.result.is_ok());
        assert_eq!(validator.calls.get(), 0);
        assert!(run.diag.is_empty());
        assert!(!run.out.is_empty());
    }

    #[test]
    fn test_fatal_issue_stops_before_serialization() {
        let evaluator = StubEvaluator::default();
        let validator = StubValidator {
            issues: vec![Issue::warning("heads up"), Issue::error("broken")],
            ..StubValidator::default()
        };

        let run = run(&evaluator, &validator, options(false));

        let err = run.result.unwrap_err();
        assert!(matches!(err, CommandError::Validation));
        assert_eq!(err.to_string(), "exiting due to validation errors");
        assert_eq!(
            run.diag,
            "2 Validation errors:\nWARNING: heads up\nERROR: broken\n"
        );
        assert!(run.out.is_empty());
    }

    #[test]
    fn test_warnings_still_serialize() {
        let evaluator = StubEvaluator::default();
        let validator = StubValidator {
            issues: vec![Issue::warning("heads up")],
            ..StubValidator::default()
        };

        let run = run(&evaluator, &validator, options(false));

        assert!(run.result.is_ok());
        assert!(run.diag.contains("WARNING: heads up"));
        assert!(!run.out.is_empty());
    }

    #[test]
    fn test_load_failure_skips_remaining_stages() {
        let evaluator = StubEvaluator::default();
        let validator = StubValidator::default();
        let mut opts = options(false);
        opts.load.source = PathBuf::new();

        let run = run(&evaluator, &validator, opts);

        assert!(matches!(
            run.result,
            Err(CommandError::Config(ConfigError::NoConfig))
        ));
        assert_eq!(evaluator.calls.get(), 0);
        assert_eq!(validator.calls.get(), 0);
        assert!(run.out.is_empty());
    }
}
