mod adapters;
mod fetch;
mod normalize;
mod operations;
mod order_request;

use std::io::Read;
use std::path::Path;

use erpbridge_core::{
    Envelope, EnvelopeError, EnvelopeMeta, ErpError, ErpId, Operation, SCHEMA_VERSION,
};
use serde_json::Value;
use uuid::Uuid;

use crate::cli::{Cli, Command};
use crate::error::CliError;

pub struct CommandResult {
    pub data: Value,
    pub warnings: Vec<String>,
    pub errors: Vec<EnvelopeError>,
    pub adapter: Option<ErpId>,
    pub operation: Option<Operation>,
}

impl CommandResult {
    pub fn ok(data: Value) -> Self {
        Self {
            data,
            warnings: Vec::new(),
            errors: Vec::new(),
            adapter: None,
            operation: None,
        }
    }

    /// Null data with the adapter failure recorded as an envelope error.
    pub fn failed(adapter: ErpId, operation: Operation, error: &ErpError) -> Self {
        Self::ok(Value::Null)
            .for_call(adapter, operation)
            .with_errors(vec![EnvelopeError::from_erp_error(error, adapter)])
    }

    pub fn for_call(mut self, adapter: ErpId, operation: Operation) -> Self {
        self.adapter = Some(adapter);
        self.operation = Some(operation);
        self
    }

    pub fn with_warning(mut self, warning: impl Into<String>) -> Self {
        self.warnings.push(warning.into());
        self
    }

    pub fn with_errors(mut self, errors: Vec<EnvelopeError>) -> Self {
        self.errors.extend(errors);
        self
    }
}

pub async fn run(cli: &Cli) -> Result<Envelope<Value>, CliError> {
    let command_result = match &cli.command {
        Command::Adapters => adapters::run()?,
        Command::Operations => operations::run()?,
        Command::Normalize(args) => normalize::run(args)?,
        Command::OrderRequest(args) => order_request::run(args)?,
        Command::Fetch(args) => fetch::run(args).await?,
    };

    let CommandResult {
        data,
        warnings,
        errors,
        adapter,
        operation,
    } = command_result;

    let mut meta = EnvelopeMeta::new(Uuid::new_v4().to_string(), SCHEMA_VERSION)?;
    meta.adapter = adapter;
    meta.operation = operation;
    for warning in warnings {
        meta.push_warning(warning);
    }

    Envelope::with_errors(meta, data, errors).map_err(CliError::from)
}

/// Reads a JSON document from `path`, or stdin when absent or `-`.
pub(crate) fn read_json_input(path: Option<&Path>) -> Result<Value, CliError> {
    let text = match path {
        Some(path) if path != Path::new("-") => std::fs::read_to_string(path)?,
        _ => {
            let mut buffer = String::new();
            std::io::stdin().read_to_string(&mut buffer)?;
            buffer
        }
    };

    if text.trim().is_empty() {
        return Ok(Value::Object(serde_json::Map::new()));
    }
    serde_json::from_str(&text)
        .map_err(|error| CliError::Input(format!("payload is not valid JSON: {error}")))
}
