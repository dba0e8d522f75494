use std::sync::Arc;

use erpbridge_core::{
    ErpConfig, ErpGateway, HttpClient, Operation, OrderDraft, ReqwestHttpClient,
};
use serde_json::Value;
use tracing::{debug, warn};

use crate::cli::FetchArgs;
use crate::error::CliError;

use super::{read_json_input, CommandResult};

const SUPPRESSED_WARNING: &str = "call failed and was suppressed by the error policy";

pub async fn run(args: &FetchArgs) -> Result<CommandResult, CliError> {
    run_with_client(args, Arc::new(ReqwestHttpClient::new())).await
}

pub(crate) async fn run_with_client(
    args: &FetchArgs,
    http_client: Arc<dyn HttpClient>,
) -> Result<CommandResult, CliError> {
    let config = match &args.config {
        Some(path) => ErpConfig::from_path(path)?,
        None => ErpConfig::from_env()?,
    };
    let operation = args.operation.parse::<Operation>()?;
    let adapter = config.adapter;
    debug!(
        %adapter,
        %operation,
        from_file = args.config.is_some(),
        policy = ?config.error_policy,
        "loaded configuration"
    );
    let gateway = ErpGateway::new(config, http_client)?;

    let outcome = match operation {
        Operation::CreateOrder => {
            let draft: OrderDraft = serde_json::from_value(read_json_input(args.input.as_deref())?)
                .map_err(|error| CliError::Input(format!("order draft is not valid: {error}")))?;
            match gateway.create_order(&draft).await {
                Ok(Some(confirmation)) => Ok(Some(serde_json::to_value(confirmation)?)),
                Ok(None) => Ok(None),
                Err(error) => Err(error),
            }
        }
        _ => gateway.run(operation, args.key.as_deref()).await,
    };

    Ok(match outcome {
        Ok(Some(data)) => CommandResult::ok(data).for_call(adapter, operation),
        Ok(None) => {
            warn!(%adapter, %operation, "{SUPPRESSED_WARNING}");
            CommandResult::ok(Value::Null)
                .for_call(adapter, operation)
                .with_warning(SUPPRESSED_WARNING)
        }
        Err(error) => CommandResult::failed(adapter, operation, &error),
    })
}
