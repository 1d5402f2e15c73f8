//! Scripting host
//!
//! One [`ScriptEngineHost`] owns one VM for its whole lifetime. Scripts run
//! in a shared global, so state set by one evaluation is visible to the next.

use rquickjs::context::EvalOptions;
use rquickjs::{CatchResultExt, CaughtError, Value};
use std::cell::RefCell;

use crate::outcome::{self, EvaluationOutcome};
use crate::session::HostSession;
use crate::{console, engine_version, namespace, HostConfig, HostError, InitStage, Result};

/// Details of a script that failed to parse or threw
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptFailure {
    /// Exception message, or the printable form of a non-Error throw
    pub message: String,
    /// Script stack trace, when the engine provided one
    pub stack: Option<String>,
}

impl ScriptFailure {
    fn from_caught(caught: CaughtError) -> Self {
        match caught {
            CaughtError::Exception(exception) => Self {
                message: exception.message().unwrap_or_default(),
                stack: exception.stack().filter(|s| !s.is_empty()),
            },
            CaughtError::Value(value) => Self {
                message: format!("uncaught {}", console::describe(&value)),
                stack: None,
            },
            CaughtError::Error(error) => Self {
                message: error.to_string(),
                stack: None,
            },
        }
    }
}

/// Classic global-scope script in sloppy mode, like a plain `<script>`
fn script_options() -> EvalOptions {
    let mut options = EvalOptions::default();
    options.global = true;
    options.strict = false;
    options
}

/// Snapshot of the runtime's allocation counters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MemoryStats {
    /// Bytes currently allocated by the runtime
    pub malloc_size: i64,
    /// Bytes in use by engine structures
    pub memory_used_size: i64,
    /// Live objects
    pub obj_count: i64,
}

/// JavaScript VM host for game scripts
pub struct ScriptEngineHost {
    session: HostSession,
    config: HostConfig,
    last_failure: RefCell<Option<ScriptFailure>>,
}

impl ScriptEngineHost {
    /// Create a host with the default configuration
    pub fn new() -> Result<Self> {
        Self::with_config(HostConfig::default())
    }

    /// Create a host, failing on the first resource that cannot be acquired
    pub fn with_config(config: HostConfig) -> Result<Self> {
        Self::build(config).inspect_err(|e| tracing::error!("Could not start scripting host: {}", e))
    }

    fn build(config: HostConfig) -> Result<Self> {
        config.validate()?;

        let session = HostSession::open(&config)?;

        session.context().with(|ctx| {
            namespace::install_namespace(&ctx, &config.namespace)?;
            if config.install_console {
                console::install_console(&ctx).map_err(|e| HostError::init(InitStage::Console, e))?;
            }
            Ok::<_, HostError>(())
        })?;

        tracing::info!(namespace = %config.namespace, "Scripting host ready (QuickJS-ng {})", engine_version());

        Ok(Self {
            session,
            config,
            last_failure: RefCell::new(None),
        })
    }

    /// Implementation version of the embedded engine
    pub fn version(&self) -> &'static str {
        engine_version()
    }

    pub fn config(&self) -> &HostConfig {
        &self.config
    }

    /// Evaluate a whole script and classify its top-level value.
    ///
    /// A script that fails to parse or throws yields
    /// [`EvaluationOutcome::Failure`]; the cause is logged and kept in
    /// [`last_failure`](Self::last_failure).
    pub fn evaluate(&self, script: &str) -> EvaluationOutcome {
        self.try_evaluate(script).unwrap_or(EvaluationOutcome::Failure)
    }

    /// Like [`evaluate`](Self::evaluate), but a failing script is an error
    pub fn try_evaluate(&self, script: &str) -> Result<EvaluationOutcome> {
        if self.config.log_script_source {
            tracing::debug!("runScript:\n{}", script);
        }

        let result = self.session.context().with(|ctx| {
            ctx.eval_with_options::<Value, _>(script, script_options())
                .catch(&ctx)
                .map(|value| outcome::classify(&value))
                .map_err(ScriptFailure::from_caught)
        });

        match result {
            Ok(outcome) => {
                tracing::debug!("{}", outcome);
                self.last_failure.replace(None);
                Ok(outcome)
            }
            Err(failure) => {
                match &failure.stack {
                    Some(stack) => tracing::warn!("<no filename>: {}\n{}", failure.message, stack),
                    None => tracing::warn!("<no filename>: {}", failure.message),
                }
                let message = failure.message.clone();
                self.last_failure.replace(Some(failure));
                Err(HostError::Evaluation(message))
            }
        }
    }

    /// Legacy entry point: 0 for a reportable result, 1 otherwise
    pub fn run_script(&self, script: &str) -> i32 {
        i32::from(self.evaluate(script).exit_code())
    }

    /// Cause of the most recent failed evaluation
    pub fn last_failure(&self) -> Option<ScriptFailure> {
        self.last_failure.borrow().clone()
    }

    /// Run a full garbage collection cycle
    pub fn collect_garbage(&self) {
        self.session.runtime().run_gc();
    }

    pub fn memory_stats(&self) -> MemoryStats {
        let usage = self.session.runtime().memory_usage();
        MemoryStats {
            malloc_size: usage.malloc_size,
            memory_used_size: usage.memory_used_size,
            obj_count: usage.obj_count,
        }
    }

    /// Tear the VM down now instead of at end of scope
    pub fn shutdown(self) {
        tracing::info!("Shutting down scripting host");
        drop(self);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn host() -> ScriptEngineHost {
        ScriptEngineHost::with_config(HostConfig::default().with_script_logging(false)).unwrap()
    }

    #[test]
    fn test_namespace_installed() {
        let host = host();
        assert_eq!(
            host.evaluate("typeof andengine"),
            EvaluationOutcome::StringResult("object".into())
        );
    }

    #[test]
    fn test_custom_namespace() {
        let host = ScriptEngineHost::with_config(HostConfig::default().with_namespace("game")).unwrap();
        assert_eq!(host.evaluate("typeof game"), EvaluationOutcome::StringResult("object".into()));
        assert_eq!(
            host.evaluate("typeof andengine"),
            EvaluationOutcome::StringResult("undefined".into())
        );
    }

    #[test]
    fn test_namespace_clash_fails_construction() {
        let result = ScriptEngineHost::with_config(HostConfig::default().with_namespace("JSON"));
        match result {
            Err(err) => assert_eq!(err.stage(), Some(InitStage::Namespace)),
            Ok(_) => panic!("Expected namespace failure"),
        }
    }

    #[test]
    fn test_invalid_config_fails_construction() {
        let result = ScriptEngineHost::with_config(HostConfig::default().with_heap_limit(0));
        assert!(matches!(result, Err(HostError::InvalidConfig(_))));
    }

    #[test]
    fn test_console_optional() {
        let with = host();
        assert_eq!(with.evaluate("typeof console"), EvaluationOutcome::StringResult("object".into()));

        let without = ScriptEngineHost::with_config(HostConfig::default().with_console(false)).unwrap();
        assert_eq!(
            without.evaluate("typeof console"),
            EvaluationOutcome::StringResult("undefined".into())
        );
    }

    #[test]
    fn test_last_failure_records_error() {
        let host = host();
        assert_eq!(host.evaluate("throw new TypeError('bad input')"), EvaluationOutcome::Failure);

        let failure = host.last_failure().unwrap();
        assert_eq!(failure.message, "bad input");

        host.evaluate("1");
        assert!(host.last_failure().is_none());
    }

    #[test]
    fn test_non_error_throw() {
        let host = host();
        assert_eq!(host.evaluate("throw 42"), EvaluationOutcome::Failure);
        assert_eq!(host.last_failure().unwrap().message, "uncaught 42");
    }

    #[test]
    fn test_try_evaluate() {
        let host = host();
        assert!(matches!(host.try_evaluate("null"), Ok(EvaluationOutcome::NullResult)));
        assert!(matches!(host.try_evaluate("}{"), Err(HostError::Evaluation(_))));
    }

    #[test]
    fn test_run_script_codes() {
        let host = host();
        assert_eq!(host.run_script("'ok'"), 0);
        assert_eq!(host.run_script("false"), 1);
        assert_eq!(host.run_script("({})"), 0);
    }

    #[test]
    fn test_shutdown_consumes_host() {
        let host = host();
        assert_eq!(host.run_script("1"), 0);
        host.shutdown();
    }
}
