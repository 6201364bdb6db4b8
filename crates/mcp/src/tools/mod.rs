pub mod args;
pub mod query;
pub mod summary;
mod registry;

pub use query::{upstream_error, QueryTool};
pub use registry::{
    json_schema_boolean, json_schema_object, json_schema_string, json_schema_year, Tool,
    ToolRegistry,
};
pub use summary::{AsylumStatsTool, RefugeeCountTool};

use std::sync::Arc;
use unhcr_sdk::UnhcrClient;

/// Register every UNHCR tool against `client`.
pub fn register_unhcr_tools(registry: &mut ToolRegistry, client: Arc<UnhcrClient>) {
    for tool in QueryTool::all(client.clone()) {
        registry.register(Arc::new(tool));
    }
    registry.register(Arc::new(RefugeeCountTool::new(client.clone())));
    registry.register(Arc::new(AsylumStatsTool::new(client)));
}
