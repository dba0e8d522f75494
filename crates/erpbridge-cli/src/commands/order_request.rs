use std::sync::Arc;

use erpbridge_core::{
    adapter_for, dispatch, AdapterSettings, ErpId, IdentityFieldMapper, Operation,
};

use crate::cli::OrderRequestArgs;
use crate::error::CliError;

use super::{read_json_input, CommandResult};

pub fn run(args: &OrderRequestArgs) -> Result<CommandResult, CliError> {
    let id = args.adapter.parse::<ErpId>()?;
    let settings = AdapterSettings::new(&args.currency, 1, Arc::new(IdentityFieldMapper))?;
    let draft = read_json_input(args.input.as_deref())?;

    let operation = Operation::BuildOrderRequest;
    let adapter = adapter_for(id, settings);
    Ok(match dispatch(adapter.as_ref(), operation, &draft) {
        Ok(body) => CommandResult::ok(body).for_call(id, operation),
        Err(error) => CommandResult::failed(id, operation, &error),
    })
}
