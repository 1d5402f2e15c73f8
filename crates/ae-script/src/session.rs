//! JavaScript Runtime
//!
//! Owns the QuickJS runtime and the context (global object, realm and
//! standard classes) for one host.

use rquickjs::{Context, Runtime};

use crate::{HostConfig, HostError, InitStage, Result};

/// QuickJS runtime and context pair.
///
/// Only ever exists fully initialised. Fields drop in declaration order, so
/// the context is released before the runtime.
pub(crate) struct HostSession {
    context: Context,
    runtime: Runtime,
}

impl HostSession {
    /// Create the runtime and a full context in a fresh realm
    pub(crate) fn open(config: &HostConfig) -> Result<Self> {
        tracing::info!(
            heap_limit = config.heap_limit_bytes,
            gc_threshold = config.context_size_hint,
            "Creating JavaScript runtime"
        );

        let runtime = Runtime::new().map_err(|e| HostError::init(InitStage::Runtime, e))?;
        runtime.set_memory_limit(config.heap_limit_bytes);
        runtime.set_gc_threshold(config.context_size_hint);
        runtime.set_max_stack_size(config.max_stack_size);

        let context = Context::full(&runtime).map_err(|e| HostError::init(InitStage::Context, e))?;

        Ok(Self { context, runtime })
    }

    pub(crate) fn context(&self) -> &Context {
        &self.context
    }

    pub(crate) fn runtime(&self) -> &Runtime {
        &self.runtime
    }
}

impl Drop for HostSession {
    fn drop(&mut self) {
        tracing::debug!("Destroying JavaScript context and runtime");
    }
}
