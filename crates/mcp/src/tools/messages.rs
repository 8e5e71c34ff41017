use std::sync::Arc;

use async_trait::async_trait;
use courier_core::input::MessageInput;
use courier_core::services::DispatchService;
use pmcp::{RequestHandlerExtra, Result as McpResult, ToolHandler};
use serde::Deserialize;
use serde_json::{json, Value};

use super::util::{internal_error, resolve_driver, service_error, validation_error, with_service};

pub struct SendMessageTool {
    service: Arc<DispatchService>,
}

impl SendMessageTool {
    pub fn new(service: Arc<DispatchService>) -> Self {
        Self { service }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SendMessageArgs {
    driver_id: Option<String>,
    customer_name: String,
    text: String,
    sender: Option<String>,
}

#[async_trait]
impl ToolHandler for SendMessageTool {
    async fn handle(&self, args: Value, _extra: RequestHandlerExtra) -> McpResult<Value> {
        let parsed: SendMessageArgs = serde_json::from_value(args).map_err(validation_error)?;
        let input = MessageInput {
            driver_id: resolve_driver(&self.service, parsed.driver_id),
            customer_name: parsed.customer_name,
            text: parsed.text,
            sender: parsed.sender,
        };

        let stored = with_service(self.service.clone(), move |service| {
            service.send_message(input)
        })
        .await
        .map_err(service_error)?;

        serde_json::to_value(stored).map_err(internal_error)
    }

    fn metadata(&self) -> Option<pmcp::types::ToolInfo> {
        Some(pmcp::types::ToolInfo::new(
            "send_message".to_string(),
            Some(
                "Record a chat message between a driver and a customer".to_string(),
            ),
            json!({
                "type": "object",
                "required": ["customerName", "text"],
                "properties": {
                    "driverId": { "type": "string" },
                    "customerName": { "type": "string" },
                    "text": { "type": "string" },
                    "sender": {
                        "type": "string",
                        "enum": ["customer", "driver"],
                        "description": "Defaults to driver"
                    }
                }
            }),
        ))
    }
}

pub struct ListMessagesTool {
    service: Arc<DispatchService>,
}

impl ListMessagesTool {
    pub fn new(service: Arc<DispatchService>) -> Self {
        Self { service }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListMessagesArgs {
    driver_id: Option<String>,
    customer_name: Option<String>,
}

#[async_trait]
impl ToolHandler for ListMessagesTool {
    async fn handle(&self, args: Value, _extra: RequestHandlerExtra) -> McpResult<Value> {
        let parsed: ListMessagesArgs = if args.is_null() {
            ListMessagesArgs::default()
        } else {
            serde_json::from_value(args).map_err(validation_error)?
        };
        let driver_id = resolve_driver(&self.service, parsed.driver_id);
        let customer = parsed
            .customer_name
            .map(|name| name.trim().to_string())
            .filter(|name| !name.is_empty());

        let messages = with_service(self.service.clone(), move |service| match customer {
            Some(name) => service.conversation(&driver_id, &name),
            None => service.driver_messages(&driver_id),
        })
        .await
        .map_err(internal_error)?;

        Ok(json!({ "messages": messages }))
    }

    fn metadata(&self) -> Option<pmcp::types::ToolInfo> {
        Some(pmcp::types::ToolInfo::new(
            "list_messages".to_string(),
            Some(
                "List a driver's messages oldest first, optionally for one customer".to_string(),
            ),
            json!({
                "type": "object",
                "properties": {
                    "driverId": { "type": "string" },
                    "customerName": { "type": "string" }
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
    async fn sent_messages_form_a_conversation() {
        let (service, _dir) = test_service();
        let send = SendMessageTool::new(service.clone());
        for (text, sender) in [("Where are you?", "customer"), ("Two minutes away", "driver")] {
            send.handle(
                json!({ "customerName": "Sarah Johnson", "text": text, "sender": sender }),
                test_extra(),
            )
            .await
            .expect("send");
        }
        send.handle(
            json!({ "customerName": "Mike Chen", "text": "Ring twice" }),
            test_extra(),
        )
        .await
        .expect("send");

        let list = ListMessagesTool::new(service);
        let response = list
            .handle(json!({ "customerName": "Sarah Johnson" }), test_extra())
            .await
            .expect("list");
        let messages = response["messages"].as_array().expect("array");
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0]["text"].as_str(), Some("Where are you?"));
        assert_eq!(messages[1]["sender"].as_str(), Some("driver"));

        let everything = list.handle(json!({}), test_extra()).await.expect("list");
        assert_eq!(everything["messages"].as_array().map(Vec::len), Some(3));
    }

    #[tokio::test]
    async fn blank_text_and_unknown_sender_are_rejected() {
        let (service, _dir) = test_service();
        let send = SendMessageTool::new(service);
        let blank = send
            .handle(
                json!({ "customerName": "Sarah Johnson", "text": "   " }),
                test_extra(),
            )
            .await;
        assert!(blank.is_err());

        let robot = send
            .handle(
                json!({ "customerName": "Sarah Johnson", "text": "hi", "sender": "robot" }),
                test_extra(),
            )
            .await;
        assert!(robot.is_err());
    }
}
