use std::sync::Arc;

use async_trait::async_trait;
use courier_core::services::DispatchService;
use pmcp::{RequestHandlerExtra, Result as McpResult, ToolHandler};
use serde::Deserialize;
use serde_json::{json, Value};

use super::util::{internal_error, resolve_driver, validation_error, with_service};

pub struct ActiveCustomersTool {
    service: Arc<DispatchService>,
}

impl ActiveCustomersTool {
    pub fn new(service: Arc<DispatchService>) -> Self {
        Self { service }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ActiveCustomersArgs {
    driver_id: Option<String>,
}

#[async_trait]
impl ToolHandler for ActiveCustomersTool {
    async fn handle(&self, args: Value, _extra: RequestHandlerExtra) -> McpResult<Value> {
        let parsed: ActiveCustomersArgs = if args.is_null() {
            ActiveCustomersArgs::default()
        } else {
            serde_json::from_value(args).map_err(validation_error)?
        };
        let driver_id = resolve_driver(&self.service, parsed.driver_id);

        let customers = with_service(self.service.clone(), move |service| {
            service.active_customers(&driver_id)
        })
        .await
        .map_err(internal_error)?;

        Ok(json!({ "customers": customers }))
    }

    fn metadata(&self) -> Option<pmcp::types::ToolInfo> {
        Some(pmcp::types::ToolInfo::new(
            "active_customers".to_string(),
            Some(
                "Customers with a pending or in-progress delivery for the driver".to_string(),
            ),
            json!({
                "type": "object",
                "properties": {
                    "driverId": { "type": "string" }
                }
            }),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use courier_core::fixtures::Fixture;
    use courier_core::model::DeliveryStatus;
    use serde_json::json;

    use crate::tools::util::{test_extra, test_service};

    #[tokio::test]
    async fn delivered_customers_drop_out() {
        let (service, _dir) = test_service();
        service
            .seed_from_fixture("driver_001", &Fixture::builtin())
            .expect("seed");
        let sarah = service
            .driver_deliveries("driver_001")
            .expect("deliveries")
            .into_iter()
            .find(|stored| stored.delivery.customer_name == "Sarah Johnson")
            .expect("sarah");
        service
            .update_status(&sarah.delivery.id, DeliveryStatus::Delivered)
            .expect("update");

        let tool = ActiveCustomersTool::new(service);
        let response = tool.handle(json!({}), test_extra()).await.expect("customers");
        let names: Vec<&str> = response["customers"]
            .as_array()
            .expect("array")
            .iter()
            .filter_map(|customer| customer["customer_name"].as_str())
            .collect();
        assert_eq!(names, vec!["Mike Chen", "Emily Davis"]);
    }
}
