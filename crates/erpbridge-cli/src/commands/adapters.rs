use erpbridge_core::{adapter_for, AdapterSettings, CapabilitySet, ErpId};
use serde::Serialize;

use crate::error::CliError;

use super::CommandResult;

#[derive(Debug, Serialize)]
struct AdapterInfo {
    id: ErpId,
    name: &'static str,
    operations: CapabilitySet,
}

#[derive(Debug, Serialize)]
struct AdaptersResponseData {
    adapters: Vec<AdapterInfo>,
}

pub fn run() -> Result<CommandResult, CliError> {
    let adapters = ErpId::ALL
        .into_iter()
        .map(|id| AdapterInfo {
            id,
            name: id.display_name(),
            operations: adapter_for(id, AdapterSettings::default()).capabilities(),
        })
        .collect();

    let data = serde_json::to_value(AdaptersResponseData { adapters })?;
    Ok(CommandResult::ok(data))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lists_every_adapter_with_operations() {
        let result = run().expect("adapters");
        let adapters = result.data["adapters"].as_array().expect("array");

        assert_eq!(adapters.len(), ErpId::ALL.len());
        let exact = adapters
            .iter()
            .find(|adapter| adapter["id"] == "exact")
            .expect("exact listed");
        let operations = exact["operations"].as_array().expect("operations");
        assert!(!operations.iter().any(|op| op == "get_campaign_list"));
        assert!(operations.iter().any(|op| op == "get_order_list"));
    }
}
