//! Console API
//!
//! Implements console.log, console.warn, console.error, etc. on top of the
//! host's tracing output.

use rquickjs::function::Rest;
use rquickjs::{Ctx, Function, Object, Type, Value};
use std::fmt::Write;

/// Log levels exposed to scripts, by method name
const LEVELS: [(&str, Level); 5] = [
    ("log", Level::Info),
    ("info", Level::Info),
    ("warn", Level::Warn),
    ("error", Level::Error),
    ("debug", Level::Debug),
];

#[derive(Debug, Clone, Copy)]
enum Level {
    Debug,
    Info,
    Warn,
    Error,
}

/// Install console API into the global object
pub fn install_console(ctx: &Ctx) -> Result<(), rquickjs::Error> {
    let console = Object::new(ctx.clone())?;

    for (name, level) in LEVELS {
        console.set(
            name,
            Function::new(ctx.clone(), move |args: Rest<Value>| {
                log_with_level(level, &args.0);
                Ok::<(), rquickjs::Error>(())
            })?,
        )?;
    }

    ctx.globals().set("console", console)?;

    Ok(())
}

fn log_with_level(level: Level, values: &[Value]) {
    let mut output = String::new();

    for (i, value) in values.iter().enumerate() {
        if i > 0 {
            output.push(' ');
        }
        format_value(&mut output, value);
    }

    match level {
        Level::Error => tracing::error!("[JS] {}", output),
        Level::Warn => tracing::warn!("[JS] {}", output),
        Level::Debug => tracing::debug!("[JS] {}", output),
        Level::Info => tracing::info!("[JS] {}", output),
    }
}

/// Short printable form of a value
pub(crate) fn describe(value: &Value) -> String {
    let mut out = String::new();
    format_value(&mut out, value);
    out
}

/// Format a JavaScript value for logging
fn format_value(out: &mut String, value: &Value) {
    match value.type_of() {
        Type::Undefined | Type::Uninitialized => out.push_str("undefined"),
        Type::Null => out.push_str("null"),
        Type::Bool | Type::Int | Type::Float => {
            if let Some(b) = value.as_bool() {
                write!(out, "{}", b).ok();
            } else if let Some(n) = value.as_number() {
                write!(out, "{}", n).ok();
            }
        }
        Type::String => {
            if let Some(Ok(s)) = value.as_string().map(|s| s.to_string()) {
                out.push_str(&s);
            }
        }
        Type::Array => out.push_str("[Array]"),
        Type::Function | Type::Constructor => out.push_str("[Function]"),
        _ if value.is_object() => out.push_str("[Object]"),
        other => {
            write!(out, "[{:?}]", other).ok();
        }
    }
}
