//! Engine namespace object
//!
//! Native engine types will be registered on this object; for now it is
//! installed empty so scripts can feature-test for it.

use rquickjs::{Ctx, Object};

use crate::{HostError, InitStage, Result};

/// Install an empty namespace object as `name` on the global object.
///
/// Fails if the global already defines `name`, which would shadow a
/// standard class.
pub fn install_namespace(ctx: &Ctx, name: &str) -> Result<()> {
    let fail = |e: rquickjs::Error| HostError::init(InitStage::Namespace, e);
    let globals = ctx.globals();

    if globals.contains_key(name).map_err(fail)? {
        return Err(HostError::init(
            InitStage::Namespace,
            format!("global `{name}` is already defined"),
        ));
    }

    let namespace = Object::new(ctx.clone()).map_err(fail)?;
    globals.set(name, namespace).map_err(fail)?;

    Ok(())
}
