use std::str::FromStr;
use std::sync::Arc;

use async_trait::async_trait;
use courier_core::model::DeliveryStatus;
use courier_core::services::DispatchService;
use pmcp::{RequestHandlerExtra, Result as McpResult, ToolHandler};
use serde::Deserialize;
use serde_json::{json, Value};

use super::util::{internal_error, validation_error, with_service};

pub struct UpdateDeliveryStatusTool {
    service: Arc<DispatchService>,
}

impl UpdateDeliveryStatusTool {
    pub fn new(service: Arc<DispatchService>) -> Self {
        Self { service }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UpdateStatusArgs {
    delivery_id: String,
    status: String,
}

#[async_trait]
impl ToolHandler for UpdateDeliveryStatusTool {
    async fn handle(&self, args: Value, _extra: RequestHandlerExtra) -> McpResult<Value> {
        let parsed: UpdateStatusArgs = serde_json::from_value(args).map_err(validation_error)?;
        let status = DeliveryStatus::from_str(&parsed.status).map_err(validation_error)?;
        if parsed.delivery_id.trim().is_empty() {
            return Err(validation_error("deliveryId cannot be empty"));
        }

        let id = parsed.delivery_id;
        let update = with_service(self.service.clone(), move |service| {
            service.update_status(&id, status)
        })
        .await
        .map_err(internal_error)?;

        if !update.changed {
            return Err(validation_error(format!("Delivery not found: {}", update.id)));
        }

        Ok(json!({
            "id": update.id,
            "status": status.as_str(),
            "message": "Status updated successfully"
        }))
    }

    fn metadata(&self) -> Option<pmcp::types::ToolInfo> {
        Some(pmcp::types::ToolInfo::new(
            "update_delivery_status".to_string(),
            Some(
                "Move a delivery between pending, in_progress and delivered".to_string(),
            ),
            json!({
                "type": "object",
                "required": ["deliveryId", "status"],
                "properties": {
                    "deliveryId": { "type": "string" },
                    "status": {
                        "type": "string",
                        "enum": ["pending", "in_progress", "delivered"]
                    }
                }
            }),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use courier_core::input::DeliveryInput;
    use serde_json::json;

    use crate::tools::util::{test_extra, test_service};

    #[tokio::test]
    async fn delivered_updates_status() {
        let (service, _dir) = test_service();
        let id = service
            .create_delivery(DeliveryInput {
                driver_id: "driver_001".into(),
                customer_name: "Sarah Johnson".into(),
                address: "15 Gerrard Street".into(),
                latitude: 51.5108,
                longitude: -0.1320,
                ..DeliveryInput::default()
            })
            .expect("create")
            .delivery
            .id;

        let tool = UpdateDeliveryStatusTool::new(service.clone());
        let response = tool
            .handle(
                json!({ "deliveryId": id.clone(), "status": "delivered" }),
                test_extra(),
            )
            .await
            .expect("status change");
        assert_eq!(response["status"].as_str(), Some("delivered"));

        let updated = service.fetch_delivery(&id).expect("fetch").expect("delivery");
        assert_eq!(updated.delivery.status, DeliveryStatus::Delivered);
    }

    #[tokio::test]
    async fn unknown_status_and_missing_delivery_are_rejected() {
        let (service, _dir) = test_service();
        let tool = UpdateDeliveryStatusTool::new(service);

        let bad_status = tool
            .handle(json!({ "deliveryId": "x", "status": "lost" }), test_extra())
            .await;
        assert!(bad_status.is_err());

        let missing = tool
            .handle(json!({ "deliveryId": "x", "status": "pending" }), test_extra())
            .await;
        assert!(missing.is_err());
    }
}
