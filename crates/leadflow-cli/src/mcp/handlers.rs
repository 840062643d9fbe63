//! MCP tool handlers implementation

use std::sync::Arc;

use leadflow_core::{
    display::OperationStatus,
    params as core, Pipeline,
};
use log::debug;
use rmcp::{
    handler::server::wrapper::Parameters,
    model::{CallToolResult, Content},
    ErrorData,
};
use schemars::JsonSchema;
use serde::Deserialize;

use super::errors::to_mcp_error;

// ============================================================================
// Generic Parameter Wrapper
// ============================================================================
//
// Core parameter types derive JsonSchema only behind the core crate's
// `schema` feature. The transparent wrapper gives every one of them the
// Deserialize + JsonSchema pair rmcp needs without a struct per tool.

/// Generic MCP wrapper for core parameter types
#[derive(Debug, Deserialize)]
#[serde(transparent)]
pub struct McpParams<T>(T)
where
    T: JsonSchema;

impl<T> JsonSchema for McpParams<T>
where
    T: JsonSchema,
{
    fn schema_name() -> std::borrow::Cow<'static, str> {
        T::schema_name()
    }

    fn json_schema(g: &mut schemars::SchemaGenerator) -> schemars::Schema {
        T::json_schema(g)
    }
}

impl<T> AsRef<T> for McpParams<T>
where
    T: JsonSchema,
{
    fn as_ref(&self) -> &T {
        &self.0
    }
}

pub type StatusRef = McpParams<core::StatusRef>;
pub type CreateStatus = McpParams<core::CreateStatus>;
pub type UpdateStatus = McpParams<core::UpdateStatus>;
pub type DeleteStatus = McpParams<core::DeleteStatus>;
pub type LeadRef = McpParams<core::LeadRef>;
pub type ListLeads = McpParams<core::ListLeads>;
pub type CreateLead = McpParams<core::CreateLead>;
pub type TransitionLead = McpParams<core::TransitionLead>;
pub type TransferLead = McpParams<core::TransferLead>;
pub type UpdateLead = McpParams<core::UpdateLead>;
pub type FollowUps = McpParams<core::FollowUps>;

pub type McpResult = Result<CallToolResult, ErrorData>;

fn text(body: impl Into<String>) -> McpResult {
    Ok(CallToolResult::success(vec![Content::text(body.into())]))
}

/// Handler implementations for the MCP server
pub struct McpHandlers {
    pipeline: Arc<Pipeline>,
}

impl McpHandlers {
    pub fn new(pipeline: Arc<Pipeline>) -> Self {
        Self { pipeline }
    }

    pub async fn create_status(&self, Parameters(params): Parameters<CreateStatus>) -> McpResult {
        debug!("create_status: {:?}", params);

        let request = params.as_ref();
        if request.is_final && !request.fields.is_empty() {
            return Err(ErrorData::invalid_params(
                "A final status carries only the 'Booking Date' field; omit 'fields' when isFinal is true",
                None,
            ));
        }

        let result = self
            .pipeline
            .create_status_result(request)
            .await
            .map_err(|e| to_mcp_error("Failed to create status", &e))?;
        text(result.to_string())
    }

    pub async fn list_statuses(&self) -> McpResult {
        debug!("list_statuses");

        let statuses = self
            .pipeline
            .list_statuses_result()
            .await
            .map_err(|e| to_mcp_error("Failed to list statuses", &e))?;
        text(format!("# Statuses\n\n{statuses}"))
    }

    pub async fn show_status(&self, Parameters(params): Parameters<StatusRef>) -> McpResult {
        debug!("show_status: {:?}", params);

        let status = self
            .pipeline
            .show_status(params.as_ref())
            .await
            .map_err(|e| to_mcp_error("Failed to get status", &e))?
            .ok_or_else(|| {
                ErrorData::invalid_params(
                    format!("Status with ID {} not found", params.as_ref().id),
                    None,
                )
            })?;
        text(status.to_string())
    }

    pub async fn update_status(&self, Parameters(params): Parameters<UpdateStatus>) -> McpResult {
        debug!("update_status: {:?}", params);

        let result = self
            .pipeline
            .update_status_result(params.as_ref())
            .await
            .map_err(|e| to_mcp_error("Failed to update status", &e))?;
        text(result.to_string())
    }

    pub async fn delete_status(&self, Parameters(params): Parameters<DeleteStatus>) -> McpResult {
        debug!("delete_status: {:?}", params);

        let result = self
            .pipeline
            .delete_status_result(params.as_ref())
            .await
            .map_err(|e| to_mcp_error("Failed to delete status", &e))?;
        text(result.to_string())
    }

    pub async fn create_lead(&self, Parameters(params): Parameters<CreateLead>) -> McpResult {
        debug!("create_lead: {:?}", params);

        let result = self
            .pipeline
            .create_lead_result(params.as_ref())
            .await
            .map_err(|e| to_mcp_error("Failed to create lead", &e))?;
        text(result.to_string())
    }

    pub async fn list_leads(&self, Parameters(params): Parameters<ListLeads>) -> McpResult {
        debug!("list_leads: {:?}", params);

        let leads = self
            .pipeline
            .list_leads_result(params.as_ref())
            .await
            .map_err(|e| to_mcp_error("Failed to list leads", &e))?;
        let title = if leads.is_empty() { "No leads" } else { "Leads" };
        text(format!("# {title}\n\n{leads}"))
    }

    pub async fn show_lead(&self, Parameters(params): Parameters<LeadRef>) -> McpResult {
        debug!("show_lead: {:?}", params);

        let view = self
            .pipeline
            .show_lead(params.as_ref())
            .await
            .map_err(|e| to_mcp_error("Failed to get lead", &e))?
            .ok_or_else(|| {
                ErrorData::invalid_params(
                    format!("Lead with ID {} not found", params.as_ref().id),
                    None,
                )
            })?;
        text(view.to_string())
    }

    pub async fn transition_lead(
        &self,
        Parameters(params): Parameters<TransitionLead>,
    ) -> McpResult {
        debug!("transition_lead: {:?}", params);

        let result = self
            .pipeline
            .transition_lead_result(params.as_ref())
            .await
            .map_err(|e| to_mcp_error("Failed to move lead", &e))?;
        text(result.to_string())
    }

    pub async fn transfer_lead(&self, Parameters(params): Parameters<TransferLead>) -> McpResult {
        debug!("transfer_lead: {:?}", params);

        let result = self
            .pipeline
            .transfer_lead_result(params.as_ref())
            .await
            .map_err(|e| to_mcp_error("Failed to transfer lead", &e))?;
        text(result.to_string())
    }

    pub async fn update_lead(&self, Parameters(params): Parameters<UpdateLead>) -> McpResult {
        debug!("update_lead: {:?}", params);

        let result = self
            .pipeline
            .update_lead_result(params.as_ref())
            .await
            .map_err(|e| to_mcp_error("Failed to update lead", &e))?;
        text(result.to_string())
    }

    pub async fn lead_activity(&self, Parameters(params): Parameters<LeadRef>) -> McpResult {
        debug!("lead_activity: {:?}", params);

        let feed = self
            .pipeline
            .lead_activity(params.as_ref())
            .await
            .map_err(|e| to_mcp_error("Failed to load activity", &e))?;
        if feed.is_empty() {
            return text(
                OperationStatus::success(format!(
                    "Lead {} has no recorded activity",
                    params.as_ref().id
                ))
                .to_string(),
            );
        }
        text(format!("# Activity for lead {}\n\n{feed}", params.as_ref().id))
    }

    pub async fn follow_ups(&self, Parameters(params): Parameters<FollowUps>) -> McpResult {
        debug!("follow_ups: {:?}", params);

        let buckets = self
            .pipeline
            .follow_ups_result(params.as_ref())
            .await
            .map_err(|e| to_mcp_error("Failed to compute follow-ups", &e))?;
        text(buckets.to_string())
    }
}

#[cfg(test)]
mod tests {
    use leadflow_core::PipelineBuilder;
    use tempfile::TempDir;

    use super::*;

    async fn create_test_handlers() -> (TempDir, McpHandlers) {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let pipeline = PipelineBuilder::new()
            .with_database_path(Some(temp_dir.path().join("mcp.db")))
            .build()
            .await
            .expect("Failed to create pipeline");
        (temp_dir, McpHandlers::new(Arc::new(pipeline)))
    }

    fn params<T: JsonSchema + serde::de::DeserializeOwned>(
        value: serde_json::Value,
    ) -> Parameters<McpParams<T>> {
        Parameters(serde_json::from_value(value).expect("valid params"))
    }

    fn body(result: &CallToolResult) -> String {
        result.content[0]
            .as_text()
            .map(|t| t.text.clone())
            .unwrap_or_default()
    }

    #[tokio::test]
    async fn test_create_final_status_reports_booking_field() {
        let (_temp_dir, handlers) = create_test_handlers().await;
        let result = handlers
            .create_status(params(serde_json::json!({ "name": "Booked", "isFinal": true })))
            .await
            .unwrap();
        let output = body(&result);
        assert!(output.contains("Created status 'Booked'"));
        assert!(output.contains("Booking Date"));
    }

    #[tokio::test]
    async fn test_schema_violation_is_invalid_params() {
        let (_temp_dir, handlers) = create_test_handlers().await;
        let created = handlers
            .create_status(params(serde_json::json!({ "name": "Booked", "isFinal": true })))
            .await
            .unwrap();
        let status_id = body(&created)
            .lines()
            .next()
            .and_then(|line| line.rsplit("ID: ").next())
            .map(str::to_string)
            .unwrap();

        let lead = handlers
            .pipeline
            .create_lead(&core::CreateLead {
                lead: core::NewLead {
                    owner_id: "u1".to_string(),
                    ..Default::default()
                },
                actor_id: "u1".to_string(),
            })
            .await
            .unwrap();

        let err = handlers
            .transition_lead(params(serde_json::json!({
                "leadId": lead.id,
                "statusId": status_id,
            })))
            .await
            .unwrap_err();
        assert_eq!(err.code, rmcp::model::ErrorCode::INVALID_PARAMS);
        assert!(err.message.contains("Booking Date"));
    }

    #[tokio::test]
    async fn test_final_status_with_fields_is_rejected() {
        let (_temp_dir, handlers) = create_test_handlers().await;
        let err = handlers
            .create_status(params(serde_json::json!({
                "name": "Closed",
                "isFinal": true,
                "fields": [{ "name": "Remark", "type": "text", "required": true }],
            })))
            .await
            .unwrap_err();
        assert_eq!(err.code, rmcp::model::ErrorCode::INVALID_PARAMS);
        assert!(err.message.contains("Booking Date"));

        let statuses = handlers.list_statuses().await.unwrap();
        assert!(body(&statuses).contains("No statuses defined."));
    }

    #[tokio::test]
    async fn test_show_missing_lead() {
        let (_temp_dir, handlers) = create_test_handlers().await;
        let err = handlers
            .show_lead(params(serde_json::json!({ "id": "nope" })))
            .await
            .unwrap_err();
        assert!(err.message.contains("Lead with ID nope not found"));
    }
}
