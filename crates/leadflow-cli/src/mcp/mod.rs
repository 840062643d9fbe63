//! MCP server implementation for Leadflow
//!
//! Exposes the status catalog and lead operations as Model Context Protocol
//! tools over stdio. Every tool returns the same markdown the CLI prints.

use std::{future::Future, sync::Arc};

use anyhow::Result;
use leadflow_core::Pipeline;
use log::{debug, error, info};
use rmcp::{
    handler::server::{router::tool::ToolRouter, wrapper::Parameters},
    model::{Implementation, ProtocolVersion, ServerCapabilities, ServerInfo},
    tool, tool_handler, tool_router, ServerHandler,
};
use tokio::signal::unix::{signal, SignalKind};

pub mod errors;
pub mod handlers;

pub use handlers::{
    CreateLead, CreateStatus, DeleteStatus, FollowUps, LeadRef, ListLeads, McpResult, StatusRef,
    TransferLead, TransitionLead, UpdateLead, UpdateStatus,
};

/// MCP server for Leadflow
#[derive(Clone)]
pub struct LeadflowMcpServer {
    pipeline: Arc<Pipeline>,
    tool_router: ToolRouter<Self>,
}

#[tool_router]
impl LeadflowMcpServer {
    pub fn new(pipeline: Pipeline) -> Self {
        Self {
            pipeline: Arc::new(pipeline),
            tool_router: Self::tool_router(),
        }
    }

    fn handlers(&self) -> handlers::McpHandlers {
        handlers::McpHandlers::new(self.pipeline.clone())
    }

    #[tool(
        name = "create_status",
        description = "Add a status to the lead pipeline catalog. Requires a unique name. Optional 'fields' lists the data-entry fields that must be filled when a lead enters the status; each is {name, type: text|number|email|phone|date|datetime|time|textarea|select|checkbox, required, options: [{value, statusReference?}]}. At most one status may be isFinal, one isDefault and one isSiteVisitDone. A final status always gets exactly one required 'Booking Date' field, so 'fields' must be omitted when isFinal is true."
    )]
    async fn create_status(&self, params: Parameters<CreateStatus>) -> McpResult {
        self.handlers().create_status(params).await
    }

    #[tool(
        name = "list_statuses",
        description = "List every status in the catalog in creation order, with its ID, roles (final/default/site_visit_done) and fields."
    )]
    async fn list_statuses(&self) -> McpResult {
        self.handlers().list_statuses().await
    }

    #[tool(
        name = "show_status",
        description = "Show one status by ID with its roles and field definitions."
    )]
    async fn show_status(&self, params: Parameters<StatusRef>) -> McpResult {
        self.handlers().show_status(params).await
    }

    #[tool(
        name = "update_status",
        description = "Change a status by ID. Only the given properties change: name, fields (replaces the whole list), isFinal, isDefault, isSiteVisitDone. Setting isFinal swaps the fields for the single 'Booking Date' field; clearing it restores the previous custom fields. Fails if another status already holds a requested role."
    )]
    async fn update_status(&self, params: Parameters<UpdateStatus>) -> McpResult {
        self.handlers().update_status(params).await
    }

    #[tool(
        name = "delete_status",
        description = "Delete a status by ID. Requires confirmed=true. Leads already in the status keep the reference and show it as an unknown status."
    )]
    async fn delete_status(&self, params: Parameters<DeleteStatus>) -> McpResult {
        self.handlers().delete_status(params).await
    }

    #[tool(
        name = "create_lead",
        description = "Create a lead with no status. Requires ownerId. Optional watchers (user ids notified of status changes), project {id, name}, data (initial field values such as Name, Email, Phone) and actorId."
    )]
    async fn create_lead(&self, params: Parameters<CreateLead>) -> McpResult {
        self.handlers().create_lead(params).await
    }

    #[tool(
        name = "list_leads",
        description = "List leads, optionally filtered by ownerId and/or statusId, with their current status names."
    )]
    async fn list_leads(&self, params: Parameters<ListLeads>) -> McpResult {
        self.handlers().list_leads(params).await
    }

    #[tool(
        name = "show_lead",
        description = "Show one lead by ID: status, owner, watchers, project, data and full status history."
    )]
    async fn show_lead(&self, params: Parameters<LeadRef>) -> McpResult {
        self.handlers().show_lead(params).await
    }

    #[tool(
        name = "transition_lead",
        description = "Move a lead (leadId) into a status (statusId). 'data' must satisfy the target status's fields: required fields non-empty, select/checkbox values among the options, typed values well-formed (dates as YYYY-MM-DD). The data is merged into the lead's data and recorded in its history. Moving into the current status again is allowed and records a fresh entry."
    )]
    async fn transition_lead(&self, params: Parameters<TransitionLead>) -> McpResult {
        self.handlers().transition_lead(params).await
    }

    #[tool(
        name = "transfer_lead",
        description = "Reassign a lead (leadId) to another owner (toUserId), optionally moving it to newProject {id, name}, with optional reason and notes."
    )]
    async fn transfer_lead(&self, params: Parameters<TransferLead>) -> McpResult {
        self.handlers().transfer_lead(params).await
    }

    #[tool(
        name = "update_lead",
        description = "Edit a lead's data (leadId, changes) without changing its status. Values are merged; a null value removes the key. The change is recorded with before and after snapshots."
    )]
    async fn update_lead(&self, params: Parameters<UpdateLead>) -> McpResult {
        self.handlers().update_lead(params).await
    }

    #[tool(
        name = "lead_activity",
        description = "Show a lead's activity log (created, status changes, transfers, edits), newest first. Status names are resolved against the current catalog."
    )]
    async fn lead_activity(&self, params: Parameters<LeadRef>) -> McpResult {
        self.handlers().lead_activity(params).await
    }

    #[tool(
        name = "follow_ups",
        description = "Group leads by their 'nextFollowUpAt' date into overdue, today, tomorrow and upcoming, relative to referenceDate (YYYY-MM-DD, defaults to today)."
    )]
    async fn follow_ups(&self, params: Parameters<FollowUps>) -> McpResult {
        self.handlers().follow_ups(params).await
    }
}

#[tool_handler(router = self.tool_router)]
impl ServerHandler for LeadflowMcpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::V_2024_11_05,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "leadflow".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
                ..Default::default()
            },
            instructions: Some(r#"Leadflow tracks sales leads through a configurable pipeline of statuses and keeps an audit trail of every change.

## Core Concepts
- **Statuses**: named pipeline stages, each with the fields that must be filled when a lead enters it. One status may be final (booked), one default and one site-visit-done.
- **Leads**: have an owner, optional watchers and project, free-form data, a current status and an append-only status history.
- **Activity**: every creation, status change, transfer and edit is logged.

## Workflow
1. Define the pipeline with `create_status` and review it with `list_statuses`
2. Add leads with `create_lead`
3. Move them with `transition_lead`, supplying the target status's fields
4. Reassign with `transfer_lead`, edit data with `update_lead`
5. Review with `show_lead`, `lead_activity` and `follow_ups`

## Tool Categories
- **Catalog**: create_status, list_statuses, show_status, update_status, delete_status
- **Leads**: create_lead, list_leads, show_lead, transition_lead, transfer_lead, update_lead
- **Review**: lead_activity, follow_ups"#.to_string()),
        }
    }
}

/// Run the MCP server with stdio transport
pub async fn run_stdio_server(server: LeadflowMcpServer) -> Result<()> {
    use rmcp::{transport::stdio, ServiceExt};

    info!("Starting Leadflow MCP server on stdio");
    debug!(
        "Server created with {} tools",
        server.tool_router.list_all().len()
    );

    let service = server.serve(stdio()).await.inspect_err(|e| {
        error!("serving error: {e:?}");
    })?;

    let mut sigint = signal(SignalKind::interrupt())?;
    let mut sigterm = signal(SignalKind::terminate())?;

    tokio::select! {
        result = service.waiting() => {
            match result {
                Ok(_) => info!("MCP server stopped normally"),
                Err(e) => error!("MCP server error: {e:?}"),
            }
        }
        _ = sigint.recv() => {
            info!("Received SIGINT, shutting down gracefully...");
        }
        _ = sigterm.recv() => {
            info!("Received SIGTERM, shutting down gracefully...");
        }
    }

    info!("MCP server shutdown complete");
    Ok(())
}
