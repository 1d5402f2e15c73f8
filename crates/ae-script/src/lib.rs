//! AndEngine Scripting Host
//!
//! QuickJS-based JavaScript host that game logic reaches through a single
//! owned handle.
//!
//! Features:
//! - QuickJS runtime via rquickjs, bounded by a configurable heap limit
//! - Standard classes plus a reserved `andengine` namespace object
//! - Console API forwarding to `tracing`
//! - Result classification with the legacy 0/1 return code
//!
//! # Example
//! ```rust,no_run
//! use ae_script::{EvaluationOutcome, ScriptEngineHost};
//!
//! let host = ScriptEngineHost::new()?;
//! let outcome = host.evaluate("6 * 7");
//! assert_eq!(outcome, EvaluationOutcome::NumberResult(42.0));
//! assert_eq!(outcome.exit_code(), 0);
//! # Ok::<(), ae_script::HostError>(())
//! ```

mod config;
mod console;
mod error;
mod host;
mod namespace;
mod outcome;
mod session;

pub use config::HostConfig;
pub use error::{HostError, InitStage, Result};
pub use host::{MemoryStats, ScriptEngineHost, ScriptFailure};
pub use outcome::EvaluationOutcome;

use std::ffi::CStr;
use std::sync::OnceLock;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Implementation version reported by the embedded JavaScript engine
pub fn engine_version() -> &'static str {
    static ENGINE_VERSION: OnceLock<String> = OnceLock::new();
    ENGINE_VERSION.get_or_init(|| {
        // SAFETY: JS_GetVersion returns a pointer to a static NUL-terminated string.
        let raw = unsafe { CStr::from_ptr(rquickjs::qjs::JS_GetVersion()) };
        raw.to_string_lossy().into_owned()
    })
}

/// Evaluate a script in a throwaway host with the default configuration
pub fn eval(script: &str) -> Result<EvaluationOutcome> {
    let host = ScriptEngineHost::new()?;
    host.try_evaluate(script)
}
