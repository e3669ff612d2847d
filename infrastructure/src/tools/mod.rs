//! Tool implementations for the finance orchestrator
//!
//! Concrete [`Tool`]s the oracle can call during a run, plus the
//! [`ToolRegistry`] that exposes them through `ToolExecutorPort`.
//!
//! | Tool | Data source |
//! |------|-------------|
//! | `get_stock_symbol` | static listing table + input heuristics |
//! | `get_stock_price` | market data backend (HTTP) |
//! | `get_exchange_info` | static exchange table |
//! | `get_currency_rate` | static rate table |
//! | `get_sector_mapping` | static classification table |
//! | `get_macro_data` | static macro snapshot |

pub mod backend;
pub mod currency_rate;
pub mod exchange_info;
pub mod macro_data;
pub mod sector_mapping;
pub mod stock_price;
pub mod stock_symbol;

mod registry;
mod schema;

pub use backend::{BackendClient, BackendError};
pub use currency_rate::CurrencyRateTool;
pub use exchange_info::ExchangeInfoTool;
pub use macro_data::MacroDataTool;
pub use registry::ToolRegistry;
pub use schema::{function_schema, function_schemas};
pub use sector_mapping::SectorMappingTool;
pub use stock_price::StockPriceTool;
pub use stock_symbol::StockSymbolTool;

use crate::config::FileBackendConfig;
use orchestrator_domain::Tool;

/// Every shipped tool, in registration order
pub fn default_tools(backend: &FileBackendConfig) -> Vec<Box<dyn Tool>> {
    vec![
        Box::new(StockSymbolTool::new()),
        Box::new(StockPriceTool::new(BackendClient::from_config(backend))),
        Box::new(ExchangeInfoTool::new()),
        Box::new(CurrencyRateTool::new()),
        Box::new(SectorMappingTool::new()),
        Box::new(MacroDataTool::new()),
    ]
}

/// Registry holding [`default_tools`]
pub fn default_registry(backend: &FileBackendConfig) -> ToolRegistry {
    ToolRegistry::new(default_tools(backend))
}
