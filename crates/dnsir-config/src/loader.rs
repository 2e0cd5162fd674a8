//! Configuration loading: evaluate a source, then post-process it.

use std::path::{Path, PathBuf};

use dnsir_core::DnsConfig;
use tracing::{debug, info};

use crate::evaluator::Evaluator;
use crate::postprocess::PostProcessor;
use crate::{ConfigError, ConfigResult, variables_from_assignments};

/// Where to load a configuration from.
#[derive(Debug, Clone, Default)]
pub struct LoadOptions {
    /// Configuration source to evaluate.
    pub source: PathBuf,
    /// Previously emitted IR to load instead of evaluating `source`.
    pub ir: Option<PathBuf>,
    pub dev_mode: bool,
    /// `KEY=VALUE` assignments exposed to the source.
    pub variables: Vec<String>,
}

/// Runs the evaluator and post-processor for one invocation.
pub struct ConfigLoader<'a> {
    evaluator: &'a dyn Evaluator,
    post_processor: &'a dyn PostProcessor,
}

impl<'a> ConfigLoader<'a> {
    pub fn new(evaluator: &'a dyn Evaluator, post_processor: &'a dyn PostProcessor) -> Self {
        Self {
            evaluator,
            post_processor,
        }
    }

    pub fn load(&self, options: &LoadOptions) -> ConfigResult<DnsConfig> {
        if let Some(ir) = options.ir.as_deref().filter(|p| !p.as_os_str().is_empty()) {
            return load_ir(ir);
        }
        if options.source.as_os_str().is_empty() {
            return Err(ConfigError::NoConfig);
        }

        let variables = variables_from_assignments(&options.variables);
        let mut config = self
            .evaluator
            .evaluate(&options.source, options.dev_mode, &variables)
            .map_err(|e| execute_error(&options.source, e))?;

        self.post_processor.post_process(&mut config.domains)?;

        info!(
            source = %options.source.display(),
            domains = config.domains.len(),
            "Configuration loaded"
        );
        Ok(config)
    }
}

fn load_ir(path: &Path) -> ConfigResult<DnsConfig> {
    debug!(path = %path.display(), "Loading IR");
    let content = std::fs::read_to_string(path).map_err(|e| execute_error(path, e.into()))?;
    serde_json::from_str(&content).map_err(|e| execute_error(path, e.into()))
}

fn execute_error(path: &Path, source: ConfigError) -> ConfigError {
    ConfigError::Execute {
        path: path.display().to_string(),
        source: Box::new(source),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dnsir_core::{DomainConfig, RecordConfig};
    use std::cell::{Cell, RefCell};
    use std::collections::HashMap;

    #[derive(Default)]
    struct RecordingEvaluator {
        calls: Cell<usize>,
        seen: RefCell<Option<(PathBuf, bool, HashMap<String, String>)>>,
        fail: bool,
    }

    impl Evaluator for RecordingEvaluator {
        fn evaluate(
            &self,
            path: &Path,
            dev_mode: bool,
            variables: &HashMap<String, String>,
        ) -> ConfigResult<DnsConfig> {
            self.calls.set(self.calls.get() + 1);
            *self.seen.borrow_mut() = Some((path.to_path_buf(), dev_mode, variables.clone()));
            if self.fail {
                return Err(ConfigError::MissingField("domain name".to_string()));
            }
            let mut domain = DomainConfig::new("example.com");
            domain.records.push(RecordConfig::new("MX", "@", "10 mail"));
            Ok(DnsConfig {
                domains: vec![domain],
                ..DnsConfig::default()
            })
        }
    }

    #[derive(Default)]
    struct CountingPostProcessor {
        calls: Cell<usize>,
        fail: bool,
    }

    impl PostProcessor for CountingPostProcessor {
        fn post_process(&self, domains: &mut [DomainConfig]) -> ConfigResult<()> {
            self.calls.set(self.calls.get() + 1);
            if self.fail {
                return Err(ConfigError::invalid("MX record", "bad target"));
            }
            for domain in domains {
                domain.meta.insert("post-processed".to_string(), "yes".to_string());
            }
            Ok(())
        }
    }

    fn options(source: &str) -> LoadOptions {
        LoadOptions {
            source: PathBuf::from(source),
            ..LoadOptions::default()
        }
    }

    #[test]
    fn test_empty_source_fails_before_evaluation() {
        let evaluator = RecordingEvaluator::default();
        let post = CountingPostProcessor::default();

        let err = ConfigLoader::new(&evaluator, &post)
            .load(&options(""))
            .unwrap_err();

        assert!(matches!(err, ConfigError::NoConfig));
        assert_eq!(err.to_string(), "no config specified");
        assert_eq!(evaluator.calls.get(), 0);
        assert_eq!(post.calls.get(), 0);
    }

    #[test]
    fn test_passes_arguments_and_post_processes() {
        let evaluator = RecordingEvaluator::default();
        let post = CountingPostProcessor::default();
        let mut opts = options("dnsconfig.kdl");
        opts.dev_mode = true;
        opts.variables = vec!["a=1".to_string(), "junk".to_string(), "a=2".to_string()];

        let cfg = ConfigLoader::new(&evaluator, &post).load(&opts).unwrap();

        let (path, dev_mode, vars) = evaluator.seen.borrow().clone().unwrap();
        assert_eq!(path, PathBuf::from("dnsconfig.kdl"));
        assert!(dev_mode);
        assert_eq!(vars, HashMap::from([("a".to_string(), "2".to_string())]));
        assert_eq!(post.calls.get(), 1);
        assert_eq!(cfg.domains[0].meta["post-processed"], "yes");
    }

    #[test]
    fn test_evaluator_error_is_wrapped_with_path() {
        let evaluator = RecordingEvaluator {
            fail: true,
            ..RecordingEvaluator::default()
        };
        let post = CountingPostProcessor::default();

        let err = ConfigLoader::new(&evaluator, &post)
            .load(&options("zones/dnsconfig.kdl"))
            .unwrap_err();

        assert_eq!(
            err.to_string(),
            "executing zones/dnsconfig.kdl: missing required field: domain name"
        );
        assert_eq!(post.calls.get(), 0);
    }

    #[test]
    fn test_post_process_error_is_not_wrapped() {
        let evaluator = RecordingEvaluator::default();
        let post = CountingPostProcessor {
            fail: true,
            ..CountingPostProcessor::default()
        };

        let err = ConfigLoader::new(&evaluator, &post)
            .load(&options("dnsconfig.kdl"))
            .unwrap_err();

        assert!(matches!(err, ConfigError::InvalidValue { .. }));
    }

    #[test]
    fn test_ir_file_replaces_evaluation() {
        let dir = tempfile::tempdir().unwrap();
        let ir = dir.path().join("ir.json");
        std::fs::write(
            &ir,
            r#"{"registrars":[],"dns_providers":[],"domains":[{"name":"example.com","records":[]}]}"#,
        )
        .unwrap();

        let evaluator = RecordingEvaluator::default();
        let post = CountingPostProcessor::default();
        let opts = LoadOptions {
            ir: Some(ir),
            ..LoadOptions::default()
        };

        let cfg = ConfigLoader::new(&evaluator, &post).load(&opts).unwrap();
        assert_eq!(cfg.domains[0].name, "example.com");
        assert_eq!(evaluator.calls.get(), 0);
        assert_eq!(post.calls.get(), 0);
    }

    #[test]
    fn test_unreadable_ir_is_wrapped() {
        let dir = tempfile::tempdir().unwrap();
        let ir = dir.path().join("ir.json");
        std::fs::write(&ir, "not json").unwrap();

        let evaluator = RecordingEvaluator::default();
        let post = CountingPostProcessor::default();
        let opts = LoadOptions {
            ir: Some(ir),
            ..LoadOptions::default()
        };

        let err = ConfigLoader::new(&evaluator, &post).load(&opts).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Execute { ref source, .. } if matches!(**source, ConfigError::Ir(_))
        ));
    }
}
