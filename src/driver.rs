//! The seam between declared operators and the engine that runs them.
//!
//! This crate only describes operators; whatever schedules and executes
//! invocations lives behind [`Driver`].

use anyhow::Result;
use serde_json::Value as JsonValue;

use crate::contract::OperatorContract;

/// Keyword parameters of one invocation.
pub type Params = serde_json::Map<String, JsonValue>;

/// One invocation, as handed to the evaluation engine.
#[derive(Debug)]
pub struct ApplyRequest<'a> {
    pub operator: &'a str,
    pub contract: &'a OperatorContract,
    /// Positional arguments (datasets or expressions), as JSON values.
    pub args: &'a [JsonValue],
    pub params: &'a Params,
}

/// Evaluation engine seam.
pub trait Driver {
    fn apply(&mut self, request: ApplyRequest<'_>) -> Result<JsonValue>;
}

/// Driver that records every request and answers `null`. Test helper.
#[derive(Debug, Default)]
pub struct RecordingDriver {
    pub calls: Vec<RecordedCall>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RecordedCall {
    pub operator: String,
    pub args: Vec<JsonValue>,
    pub params: Params,
}

impl Driver for RecordingDriver {
    fn apply(&mut self, request: ApplyRequest<'_>) -> Result<JsonValue> {
        self.calls.push(RecordedCall {
            operator: request.operator.to_string(),
            args: request.args.to_vec(),
            params: request.params.clone(),
        });
        Ok(JsonValue::Null)
    }
}
