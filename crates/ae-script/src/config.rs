//! Host Configuration

use serde::Deserialize;

use crate::{HostError, Result};

/// Environment variable overriding [`HostConfig::heap_limit_bytes`]
pub const ENV_HEAP_LIMIT: &str = "AE_SCRIPT_HEAP_LIMIT";
/// Environment variable overriding [`HostConfig::context_size_hint`]
pub const ENV_CONTEXT_SIZE: &str = "AE_SCRIPT_CONTEXT_SIZE";
/// Environment variable overriding [`HostConfig::max_stack_size`]
pub const ENV_STACK_SIZE: &str = "AE_SCRIPT_STACK_SIZE";
/// Environment variable overriding [`HostConfig::namespace`]
pub const ENV_NAMESPACE: &str = "AE_SCRIPT_NAMESPACE";

/// Scripting host configuration options
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct HostConfig {
    /// Runtime memory ceiling (bytes)
    pub heap_limit_bytes: usize,

    /// Context allocation size hint (bytes), applied as the GC threshold
    pub context_size_hint: usize,

    /// Native stack ceiling for script execution (bytes)
    pub max_stack_size: usize,

    /// Global property holding the reserved namespace object
    pub namespace: String,

    /// Install `console` forwarding to the host log
    pub install_console: bool,

    /// Log the full script text before each evaluation
    pub log_script_source: bool,
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            heap_limit_bytes: 8 * 1024 * 1024, // 8MB
            context_size_hint: 8192,
            max_stack_size: 256 * 1024,
            namespace: "andengine".to_string(),
            install_console: true,
            log_script_source: true,
        }
    }
}

impl HostConfig {
    /// Defaults overridden by the `AE_SCRIPT_*` environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Defaults overridden by whatever `lookup` returns for each variable
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(value) = lookup(ENV_HEAP_LIMIT) {
            config.heap_limit_bytes = parse_size(ENV_HEAP_LIMIT, &value)?;
        }
        if let Some(value) = lookup(ENV_CONTEXT_SIZE) {
            config.context_size_hint = parse_size(ENV_CONTEXT_SIZE, &value)?;
        }
        if let Some(value) = lookup(ENV_STACK_SIZE) {
            config.max_stack_size = parse_size(ENV_STACK_SIZE, &value)?;
        }
        if let Some(value) = lookup(ENV_NAMESPACE) {
            config.namespace = value;
        }

        config.validate()?;
        Ok(config)
    }

    pub fn with_heap_limit(mut self, bytes: usize) -> Self {
        self.heap_limit_bytes = bytes;
        self
    }

    pub fn with_context_size_hint(mut self, bytes: usize) -> Self {
        self.context_size_hint = bytes;
        self
    }

    pub fn with_max_stack_size(mut self, bytes: usize) -> Self {
        self.max_stack_size = bytes;
        self
    }

    pub fn with_namespace(mut self, name: impl Into<String>) -> Self {
        self.namespace = name.into();
        self
    }

    pub fn with_console(mut self, enabled: bool) -> Self {
        self.install_console = enabled;
        self
    }

    pub fn with_script_logging(mut self, enabled: bool) -> Self {
        self.log_script_source = enabled;
        self
    }

    /// Reject values the runtime cannot be built with
    pub fn validate(&self) -> Result<()> {
        if self.heap_limit_bytes == 0 {
            return Err(HostError::InvalidConfig("heap limit must be non-zero".into()));
        }
        if self.max_stack_size == 0 {
            return Err(HostError::InvalidConfig("stack size must be non-zero".into()));
        }
        if !is_identifier(&self.namespace) {
            return Err(HostError::InvalidConfig(format!(
                "namespace {:?} is not a valid identifier",
                self.namespace
            )));
        }
        Ok(())
    }
}

fn parse_size(key: &str, value: &str) -> Result<usize> {
    value
        .trim()
        .parse()
        .map_err(|_| HostError::InvalidConfig(format!("{key}={value:?} is not a byte count")))
}

/// ASCII JavaScript identifier
fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' || c == '$' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
}
