//! Configuration evaluation for dnsir.
//!
//! This crate handles:
//! - Evaluating `dnsconfig.kdl` sources into a [`DnsConfig`](dnsir_core::DnsConfig)
//! - `KEY=VALUE` variable mapping and `${...}` interpolation
//! - Record-type specific post-processing
//! - Validation and normalization of the resulting object graph
//! - Reverse-zone naming helpers
//! - Loading a configuration from a source or a previously emitted IR file

pub mod dnsconfig;
pub mod error;
pub mod evaluator;
pub mod loader;
pub mod normalize;
pub mod postprocess;
pub mod reverse;
pub mod variables;

pub use error::{ConfigError, ConfigResult};
pub use evaluator::{Evaluator, KdlEvaluator};
pub use loader::{ConfigLoader, LoadOptions};
pub use normalize::{Normalizer, Validator};
pub use postprocess::{PostProcessor, RecordFieldPostProcessor};
pub use reverse::{DeferredWarning, ReverseNotice};
pub use variables::{VariableContext, variables_from_assignments};
