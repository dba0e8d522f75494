//! CLI argument definitions for erpbridge.
//!
//! # Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `adapters` | List adapters and the operations each supports |
//! | `operations` | List operation names and aliases |
//! | `normalize` | Map a saved vendor payload through an adapter |
//! | `order-request` | Render the vendor request body for an order draft |
//! | `fetch` | Call the configured ERP and map the response |
//!
//! # Examples
//!
//! ```bash
//! erpbridge normalize --adapter exact --operation getOrderList --input orders.json --pretty
//! erpbridge order-request --adapter sap_b1 --input draft.json
//! ERPBRIDGE_ADAPTER=navision ERPBRIDGE_BASE_URL=https://bc.example/ODataV4 \
//!     erpbridge fetch --operation get_customer --key 10000
//! ```

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

/// Normalize ERP vendor payloads into one schema.
#[derive(Debug, Parser)]
#[command(name = "erpbridge", author, version, about)]
pub struct Cli {
    /// Output format for results.
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Json)]
    pub format: OutputFormat,

    /// Pretty-print JSON output with indentation.
    #[arg(long, global = true, default_value_t = false)]
    pub pretty: bool,

    /// Treat warnings and errors as failures (exit code 5).
    #[arg(long, global = true, default_value_t = false)]
    pub strict: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Indented summary for terminals.
    Table,
    /// Single JSON envelope.
    Json,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List adapters and their supported operations.
    Adapters,

    /// List operation names and their camelCase aliases.
    Operations,

    /// Map a vendor payload (JSON) from a file or stdin.
    Normalize(NormalizeArgs),

    /// Render the vendor request body for an order draft.
    OrderRequest(OrderRequestArgs),

    /// Fetch from the configured ERP and map the response.
    Fetch(FetchArgs),
}

#[derive(Debug, Args)]
pub struct NormalizeArgs {
    /// Adapter key (navision, sap_b1, exact, visma).
    #[arg(long)]
    pub adapter: String,

    /// Operation name, snake_case or camelCase.
    #[arg(long)]
    pub operation: String,

    /// Payload file; `-` or absent reads stdin.
    #[arg(long)]
    pub input: Option<PathBuf>,

    /// Currency for amounts the vendor leaves unqualified.
    #[arg(long, default_value = "EUR")]
    pub currency: String,

    /// SAP B1 price list number.
    #[arg(long, default_value_t = 1)]
    pub price_list: u32,
}

#[derive(Debug, Args)]
pub struct OrderRequestArgs {
    /// Adapter key (navision, sap_b1, exact, visma).
    #[arg(long)]
    pub adapter: String,

    /// Order draft file; `-` or absent reads stdin.
    #[arg(long)]
    pub input: Option<PathBuf>,

    /// Currency for the order when the draft names none.
    #[arg(long, default_value = "EUR")]
    pub currency: String,
}

#[derive(Debug, Args)]
pub struct FetchArgs {
    /// Operation name, snake_case or camelCase.
    #[arg(long)]
    pub operation: String,

    /// Record key for detail operations.
    #[arg(long)]
    pub key: Option<String>,

    /// TOML configuration; without it `ERPBRIDGE_*` variables are read.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Order draft for `create_order`.
    #[arg(long)]
    pub input: Option<PathBuf>,
}
