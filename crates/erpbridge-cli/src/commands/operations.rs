use erpbridge_core::Operation;
use serde::Serialize;

use crate::error::CliError;

use super::CommandResult;

#[derive(Debug, Serialize)]
struct OperationInfo {
    name: &'static str,
    alias: &'static str,
    list: bool,
    requires_key: bool,
}

#[derive(Debug, Serialize)]
struct OperationsResponseData {
    operations: Vec<OperationInfo>,
}

pub fn run() -> Result<CommandResult, CliError> {
    let operations = Operation::ALL
        .into_iter()
        .map(|operation| OperationInfo {
            name: operation.as_str(),
            alias: operation.alias(),
            list: operation.is_list(),
            requires_key: operation.requires_key(),
        })
        .collect();

    let data = serde_json::to_value(OperationsResponseData { operations })?;
    Ok(CommandResult::ok(data))
}
