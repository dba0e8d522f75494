use std::sync::Arc;

use erpbridge_core::{
    adapter_for, dispatch, AdapterSettings, ErpId, IdentityFieldMapper, Operation,
};
use serde_json::Value;

use crate::cli::NormalizeArgs;
use crate::error::CliError;

use super::{read_json_input, CommandResult};

pub fn run(args: &NormalizeArgs) -> Result<CommandResult, CliError> {
    let id = args.adapter.parse::<ErpId>()?;
    let operation = args.operation.parse::<Operation>()?;
    let settings = AdapterSettings::new(&args.currency, args.price_list, Arc::new(IdentityFieldMapper))?;
    let payload = read_json_input(args.input.as_deref())?;

    let adapter = adapter_for(id, settings);
    let result = match dispatch(adapter.as_ref(), operation, &payload) {
        Ok(data) => CommandResult::ok(data).for_call(id, operation),
        Err(error) => return Ok(CommandResult::failed(id, operation, &error)),
    };

    if operation.is_list() && is_empty_collection(&result.data) && !is_blank(&payload) {
        return Ok(result.with_warning("payload contained no recognizable records"));
    }
    Ok(result)
}

fn is_empty_collection(data: &Value) -> bool {
    data.get("items")
        .and_then(Value::as_array)
        .is_some_and(Vec::is_empty)
}

fn is_blank(payload: &Value) -> bool {
    match payload {
        Value::Null => true,
        Value::Object(map) => map.is_empty(),
        Value::Array(items) => items.is_empty(),
        _ => false,
    }
}
