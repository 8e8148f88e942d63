//! Callable handles for declared operators.

use anyhow::Result;
use serde_json::Value as JsonValue;

use crate::contract::OperatorContract;
use crate::driver::{ApplyRequest, Driver, Params};

/// A declared operator, ready to hand to a driver.
///
/// Façades are cheap views borrowed from the catalog: the operator's name,
/// its contract and its documentation string.
#[derive(Debug, Clone, Copy)]
pub struct OperatorFacade<'a> {
    pub(crate) name: &'a str,
    pub(crate) contract: &'a OperatorContract,
    pub(crate) doc: &'a str,
}

impl<'a> OperatorFacade<'a> {
    pub fn name(&self) -> &'a str {
        self.name
    }

    pub fn contract(&self) -> &'a OperatorContract {
        self.contract
    }

    /// Documentation from the configured source, or the template fallback
    /// `wrapper for command: <template>`.
    pub fn doc(&self) -> &'a str {
        self.doc
    }

    /// Forward an invocation to `driver` with the contract attached.
    pub fn apply(
        &self,
        driver: &mut dyn Driver,
        args: &[JsonValue],
        params: &Params,
    ) -> Result<JsonValue> {
        driver.apply(ApplyRequest {
            operator: self.name,
            contract: self.contract,
            args,
            params,
        })
    }
}
