//! Evaluation outcome and result classification

use rquickjs::{Type, Value};
use serde::Serialize;
use std::fmt;

/// Classified top-level value of one evaluation
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum EvaluationOutcome {
    /// Script did not parse or threw
    Failure,
    NullResult,
    FalseResult,
    StringResult(String),
    NumberResult(f64),
    /// `true`, `undefined`, objects, functions, symbols, bigints
    OtherResult,
}

impl EvaluationOutcome {
    /// Legacy caller return code.
    ///
    /// `null` counts as failure while `true` and objects count as success.
    pub fn exit_code(&self) -> u8 {
        match self {
            EvaluationOutcome::Failure
            | EvaluationOutcome::NullResult
            | EvaluationOutcome::FalseResult => 1,
            EvaluationOutcome::StringResult(_)
            | EvaluationOutcome::NumberResult(_)
            | EvaluationOutcome::OtherResult => 0,
        }
    }

    pub fn is_success(&self) -> bool {
        self.exit_code() == 0
    }
}

impl fmt::Display for EvaluationOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EvaluationOutcome::Failure => f.write_str("evaluation failed"),
            EvaluationOutcome::NullResult => f.write_str("return value is null"),
            EvaluationOutcome::FalseResult => f.write_str("return value is false"),
            EvaluationOutcome::StringResult(s) => write!(f, "return string = {s}"),
            EvaluationOutcome::NumberResult(n) => write!(f, "return number = {n}"),
            EvaluationOutcome::OtherResult => f.write_str("return value is not reported"),
        }
    }
}

/// Classify a successfully evaluated value
pub(crate) fn classify(value: &Value) -> EvaluationOutcome {
    match value.type_of() {
        Type::Null => EvaluationOutcome::NullResult,
        Type::Bool if value.as_bool() == Some(false) => EvaluationOutcome::FalseResult,
        Type::String => EvaluationOutcome::StringResult(string_payload(value)),
        Type::Int | Type::Float => EvaluationOutcome::NumberResult(number_payload(value)),
        _ => EvaluationOutcome::OtherResult,
    }
}

fn string_payload(value: &Value) -> String {
    let converted = value
        .as_string()
        .map(|s| s.to_string().map_err(|e| e.to_string()))
        .unwrap_or_else(|| Err("value is not a string".to_string()));

    match converted {
        Ok(s) => s,
        Err(e) => {
            tracing::warn!("return string could not be converted: {}", e);
            String::new()
        }
    }
}

fn number_payload(value: &Value) -> f64 {
    match value.as_number() {
        Some(n) => n,
        None => {
            tracing::warn!("return number could not be converted");
            f64::NAN
        }
    }
}
