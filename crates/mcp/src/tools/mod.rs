mod customers;
mod deliveries;
mod messages;
mod status;
mod util;

use std::sync::Arc;

use courier_core::services::DispatchService;
use pmcp::ServerBuilder;

pub const TOOL_NAMES: [&str; 6] = [
    "list_deliveries",
    "create_delivery",
    "update_delivery_status",
    "send_message",
    "list_messages",
    "active_customers",
];

pub fn register(builder: ServerBuilder, service: Arc<DispatchService>) -> ServerBuilder {
    builder
        .tool(
            "list_deliveries",
            deliveries::ListDeliveriesTool::new(service.clone()),
        )
        .tool(
            "create_delivery",
            deliveries::CreateDeliveryTool::new(service.clone()),
        )
        .tool(
            "update_delivery_status",
            status::UpdateDeliveryStatusTool::new(service.clone()),
        )
        .tool("send_message", messages::SendMessageTool::new(service.clone()))
        .tool("list_messages", messages::ListMessagesTool::new(service.clone()))
        .tool(
            "active_customers",
            customers::ActiveCustomersTool::new(service),
        )
}
