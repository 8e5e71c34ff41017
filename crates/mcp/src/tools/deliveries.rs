use std::sync::Arc;

use async_trait::async_trait;
use courier_core::input::DeliveryInput;
use courier_core::services::DispatchService;
use pmcp::{RequestHandlerExtra, Result as McpResult, ToolHandler};
use serde::Deserialize;
use serde_json::{json, Value};

use super::util::{internal_error, resolve_driver, service_error, validation_error, with_service};

pub struct ListDeliveriesTool {
    service: Arc<DispatchService>,
}

impl ListDeliveriesTool {
    pub fn new(service: Arc<DispatchService>) -> Self {
        Self { service }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListDeliveriesArgs {
    driver_id: Option<String>,
}

#[async_trait]
impl ToolHandler for ListDeliveriesTool {
    async fn handle(&self, args: Value, _extra: RequestHandlerExtra) -> McpResult<Value> {
        let parsed: ListDeliveriesArgs = if args.is_null() {
            ListDeliveriesArgs::default()
        } else {
            serde_json::from_value(args).map_err(validation_error)?
        };
        let driver_id = resolve_driver(&self.service, parsed.driver_id);

        let deliveries = with_service(self.service.clone(), move |service| {
            service.driver_deliveries(&driver_id)
        })
        .await
        .map_err(internal_error)?;

        Ok(json!({ "deliveries": deliveries }))
    }

    fn metadata(&self) -> Option<pmcp::types::ToolInfo> {
        Some(pmcp::types::ToolInfo::new(
            "list_deliveries".to_string(),
            Some(
                "List a driver's deliveries, newest first (at most 1000)".to_string(),
            ),
            json!({
                "type": "object",
                "properties": {
                    "driverId": {
                        "type": "string",
                        "description": "Defaults to the driver the server was started for"
                    }
                }
            }),
        ))
    }
}

pub struct CreateDeliveryTool {
    service: Arc<DispatchService>,
}

impl CreateDeliveryTool {
    pub fn new(service: Arc<DispatchService>) -> Self {
        Self { service }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateDeliveryArgs {
    driver_id: Option<String>,
    customer_name: String,
    #[serde(default)]
    customer_phone: String,
    address: String,
    latitude: f64,
    longitude: f64,
    #[serde(default)]
    order_details: String,
}

#[async_trait]
impl ToolHandler for CreateDeliveryTool {
    async fn handle(&self, args: Value, _extra: RequestHandlerExtra) -> McpResult<Value> {
        let parsed: CreateDeliveryArgs =
            serde_json::from_value(args).map_err(validation_error)?;
        let input = DeliveryInput {
            driver_id: resolve_driver(&self.service, parsed.driver_id),
            customer_name: parsed.customer_name,
            customer_phone: parsed.customer_phone,
            address: parsed.address,
            latitude: parsed.latitude,
            longitude: parsed.longitude,
            order_details: parsed.order_details,
        };

        let stored = with_service(self.service.clone(), move |service| {
            service.create_delivery(input)
        })
        .await
        .map_err(service_error)?;

        serde_json::to_value(stored).map_err(internal_error)
    }

    fn metadata(&self) -> Option<pmcp::types::ToolInfo> {
        Some(pmcp::types::ToolInfo::new(
            "create_delivery".to_string(),
            Some("Assign a new pending delivery to a driver".to_string()),
            json!({
                "type": "object",
                "required": ["customerName", "address", "latitude", "longitude"],
                "properties": {
                    "driverId": { "type": "string" },
                    "customerName": { "type": "string" },
                    "customerPhone": { "type": "string" },
                    "address": { "type": "string" },
                    "latitude": { "type": "number", "minimum": -90, "maximum": 90 },
                    "longitude": { "type": "number", "minimum": -180, "maximum": 180 },
                    "orderDetails": { "type": "string" }
                }
            }),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    use crate::tools::util::{test_extra, test_service};

    #[tokio::test]
    async fn create_then_list_for_default_driver() {
        let (service, _dir) = test_service();
        let create = CreateDeliveryTool::new(service.clone());
        let created = create
            .handle(
                json!({
                    "customerName": "Mike Chen",
                    "customerPhone": "+44 20 7946 0123",
                    "address": "8 Little Newport Street, Chinatown",
                    "latitude": 51.5128,
                    "longitude": -0.1280,
                    "orderDetails": "3x Dim Sum Selection"
                }),
                test_extra(),
            )
            .await
            .expect("create delivery");
        assert_eq!(created["status"].as_str(), Some("pending"));
        assert_eq!(created["driver_id"].as_str(), Some("driver_001"));

        let list = ListDeliveriesTool::new(service);
        let response = list.handle(json!({}), test_extra()).await.expect("list");
        let deliveries = response["deliveries"].as_array().expect("array");
        assert_eq!(deliveries.len(), 1);
        assert_eq!(deliveries[0]["id"], created["id"]);
    }

    #[tokio::test]
    async fn list_is_scoped_to_driver() {
        let (service, _dir) = test_service();
        let create = CreateDeliveryTool::new(service.clone());
        create
            .handle(
                json!({
                    "driverId": "driver_002",
                    "customerName": "Emily Davis",
                    "address": "25 Lisle Street",
                    "latitude": 51.5098,
                    "longitude": -0.1310
                }),
                test_extra(),
            )
            .await
            .expect("create delivery");

        let list = ListDeliveriesTool::new(service);
        let mine = list.handle(Value::Null, test_extra()).await.expect("list");
        assert_eq!(mine["deliveries"].as_array().map(Vec::len), Some(0));
        let theirs = list
            .handle(json!({ "driverId": "driver_002" }), test_extra())
            .await
            .expect("list");
        assert_eq!(theirs["deliveries"].as_array().map(Vec::len), Some(1));
    }

    #[tokio::test]
    async fn out_of_range_coordinates_are_rejected() {
        let (service, _dir) = test_service();
        let create = CreateDeliveryTool::new(service);
        let result = create
            .handle(
                json!({
                    "customerName": "Sarah Johnson",
                    "address": "15 Gerrard Street",
                    "latitude": 123.0,
                    "longitude": -0.13
                }),
                test_extra(),
            )
            .await;
        assert!(result.is_err());
    }
}
