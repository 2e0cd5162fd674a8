//! Variable mapping and interpolation for configuration sources.
//!
//! Variables are supplied on the command line as `KEY=VALUE` assignments and
//! referenced from string values in the source as:
//! - `${KEY}` - A variable passed with `-v KEY=VALUE`
//! - `${env.NAME}` - Environment variable

use regex::Regex;
use std::collections::HashMap;
use std::sync::LazyLock;

/// Convert `KEY=VALUE` assignments into a key/value mapping.
///
/// Each entry is split at the first `=`, so values may contain `=` themselves.
/// Entries without `=` are dropped. Later assignments of a key win.
pub fn variables_from_assignments<S: AsRef<str>>(assignments: &[S]) -> HashMap<String, String> {
    let mut variables = HashMap::with_capacity(assignments.len());
    for assignment in assignments {
        if let Some((key, value)) = assignment.as_ref().split_once('=') {
            variables.insert(key.to_string(), value.to_string());
        }
    }
    variables
}

/// Variables available for interpolation while evaluating a source.
#[derive(Debug, Clone, Default)]
pub struct VariableContext {
    /// Environment variables
    pub env: HashMap<String, String>,
    /// Variables supplied by the user
    pub custom: HashMap<String, String>,
}

// Regex for matching ${...} variables
static VAR_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\$\{([a-zA-Z_][a-zA-Z0-9_-]*(?:\.[a-zA-Z_][a-zA-Z0-9_]*)?)\}").unwrap()
});

impl VariableContext {
    /// Create a new empty variable context.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a context from a user variable mapping.
    pub fn with_custom(custom: HashMap<String, String>) -> Self {
        Self {
            custom,
            ..Self::default()
        }
    }

    /// Populate environment variables from the current process environment.
    pub fn populate_env(&mut self) {
        for (key, value) in std::env::vars() {
            self.env.insert(key, value);
        }
    }

    /// Resolve a variable name to its value.
    pub fn resolve(&self, var_name: &str) -> Option<String> {
        match var_name.split_once('.') {
            Some(("env", name)) => self.env.get(name).cloned(),
            Some(_) => None,
            None => self.custom.get(var_name).cloned(),
        }
    }

    /// Interpolate all variables in a string, leaving unknown references as written.
    pub fn interpolate(&self, input: &str) -> String {
        VAR_REGEX
            .replace_all(input, |caps: &regex::Captures| {
                let var_name = &caps[1];
                self.resolve(var_name)
                    .unwrap_or_else(|| format!("${{{}}}", var_name))
            })
            .to_string()
    }

    /// Interpolate all variables in a string.
    ///
    /// Returns the name of the first unknown variable as the error.
    pub fn try_interpolate(&self, input: &str) -> Result<String, String> {
        if let Some(missing) = self.undefined_in(input).into_iter().next() {
            return Err(missing);
        }
        Ok(self.interpolate(input))
    }

    /// Names of all variables referenced in `input` that do not resolve.
    pub fn undefined_in(&self, input: &str) -> Vec<String> {
        VAR_REGEX
            .captures_iter(input)
            .map(|caps| caps[1].to_string())
            .filter(|name| self.resolve(name).is_none())
            .collect()
    }
}
