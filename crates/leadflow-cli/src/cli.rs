//! Command-line argument structures and the command handler.
//!
//! Argument structs carry the clap derives and convert into the core
//! parameter types, so the core stays free of CLI concerns:
//!
//! ```text
//! User Input → CLI Args (clap) → Core Params → Pipeline → Display wrapper
//! ```
//!
//! Two small value grammars are parsed here:
//!
//! - field specs for status authoring, `Name:type[!][=opt1|opt2@statusId]`,
//!   where `!` marks the field required and `@statusId` binds an option to
//!   a status;
//! - `--set key=value` assignments, where the value is read as a JSON
//!   literal when it parses as one (`150`, `true`, `null`, `["a","b"]`) and
//!   as a plain string otherwise.

use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use leadflow_core::{
    display::OperationStatus,
    models::{FieldData, FieldOption, FieldSchema, FieldType, ProjectRef, StatusId},
    params::{
        CreateLead, CreateStatus, DeleteStatus, FollowUps, LeadRef, ListLeads, NewLead,
        StatusPatch, StatusRef, Transfer, TransferLead, TransitionLead, UpdateLead, UpdateStatus,
    },
    Pipeline,
};
use serde_json::Value;

use crate::renderer::TerminalRenderer;

/// Parses a field spec such as `Budget:number!` or
/// `Next:select!=Later|Visit@st-visit`.
pub fn parse_field_spec(spec: &str) -> Result<FieldSchema, String> {
    let (name, rest) = spec
        .split_once(':')
        .ok_or_else(|| format!("Invalid field spec '{spec}': expected Name:type"))?;
    let (type_part, options_part) = match rest.split_once('=') {
        Some((type_part, options)) => (type_part, Some(options)),
        None => (rest, None),
    };
    let (type_name, required) = match type_part.strip_suffix('!') {
        Some(stripped) => (stripped, true),
        None => (type_part, false),
    };

    let mut field = FieldSchema::new(name.trim(), type_name.trim().parse::<FieldType>()?);
    field.required = required;
    if let Some(options) = options_part {
        field.options = options
            .split('|')
            .filter(|option| !option.trim().is_empty())
            .map(|option| match option.split_once('@') {
                Some((value, status)) => {
                    FieldOption::referencing(value.trim(), StatusId::from(status.trim()))
                }
                None => FieldOption::new(option.trim()),
            })
            .collect();
    }
    Ok(field)
}

/// Parses a `key=value` assignment.
pub fn parse_assignment(raw: &str) -> Result<(String, Value), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("Invalid assignment '{raw}': expected key=value"))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(format!("Invalid assignment '{raw}': key must not be empty"));
    }
    let value =
        serde_json::from_str(value).unwrap_or_else(|_| Value::String(value.to_string()));
    Ok((key.to_string(), value))
}

fn into_field_data(assignments: Vec<(String, Value)>) -> FieldData {
    assignments.into_iter().collect()
}

fn project(id: Option<String>, name: Option<String>) -> Option<ProjectRef> {
    id.map(|id| {
        let name = name.unwrap_or_else(|| id.clone());
        ProjectRef::new(id, name)
    })
}

// ============================================================================
// Status arguments
// ============================================================================

/// Create a new status
///
/// Final statuses always carry exactly one required "Booking Date" field,
/// so --field cannot be combined with --final.
#[derive(Args)]
pub struct CreateStatusArgs {
    /// Unique name of the status
    pub name: String,
    /// Field spec, repeatable: Name:type[!][=opt1|opt2@statusId]
    #[arg(short, long = "field", value_parser = parse_field_spec)]
    pub fields: Vec<FieldSchema>,
    /// Mark as the terminal (booked) status
    #[arg(long = "final", conflicts_with = "fields")]
    pub is_final: bool,
    /// Mark as the suggested first status
    #[arg(long = "default")]
    pub is_default: bool,
    /// Mark as the status recorded after a site visit
    #[arg(long = "site-visit-done")]
    pub is_site_visit_done: bool,
}

impl From<CreateStatusArgs> for CreateStatus {
    fn from(val: CreateStatusArgs) -> Self {
        CreateStatus {
            name: val.name,
            fields: val.fields,
            is_final: val.is_final,
            is_default: val.is_default,
            is_site_visit_done: val.is_site_visit_done,
        }
    }
}

/// Update a status
///
/// Only the given options change. Passing any --field replaces the whole
/// field list; --clear-fields replaces it with an empty one.
#[derive(Args)]
pub struct UpdateStatusArgs {
    /// ID of the status to update
    pub id: String,
    /// New unique name
    #[arg(short, long)]
    pub name: Option<String>,
    /// Replacement field spec, repeatable
    #[arg(short, long = "field", value_parser = parse_field_spec)]
    pub fields: Vec<FieldSchema>,
    /// Replace the field list with an empty one
    #[arg(long, conflicts_with = "fields")]
    pub clear_fields: bool,
    /// Set or clear the final role
    #[arg(long = "final")]
    pub is_final: Option<bool>,
    /// Set or clear the default role
    #[arg(long = "default")]
    pub is_default: Option<bool>,
    /// Set or clear the site-visit-done role
    #[arg(long = "site-visit-done")]
    pub is_site_visit_done: Option<bool>,
}

impl From<UpdateStatusArgs> for UpdateStatus {
    fn from(val: UpdateStatusArgs) -> Self {
        let fields = if val.clear_fields {
            Some(Vec::new())
        } else if val.fields.is_empty() {
            None
        } else {
            Some(val.fields)
        };
        UpdateStatus {
            id: val.id,
            patch: StatusPatch {
                name: val.name,
                fields,
                is_final: val.is_final,
                is_default: val.is_default,
                is_site_visit_done: val.is_site_visit_done,
            },
        }
    }
}

/// Show or address a single status
#[derive(Args)]
pub struct StatusIdArgs {
    /// ID of the status
    pub id: String,
}

impl From<StatusIdArgs> for StatusRef {
    fn from(val: StatusIdArgs) -> Self {
        StatusRef { id: val.id }
    }
}

/// Delete a status
///
/// Leads already in the status keep it in their history and show it as an
/// unknown status afterwards.
#[derive(Args)]
pub struct DeleteStatusArgs {
    /// ID of the status to delete
    pub id: String,
    /// Confirm the deletion (required)
    #[arg(long)]
    pub confirm: bool,
}

impl From<DeleteStatusArgs> for DeleteStatus {
    fn from(val: DeleteStatusArgs) -> Self {
        DeleteStatus {
            id: val.id,
            confirmed: val.confirm,
        }
    }
}

#[derive(Subcommand)]
pub enum StatusCommands {
    /// Create a new status
    #[command(alias = "c")]
    Create(CreateStatusArgs),
    /// List the catalog in insertion order
    #[command(aliases = ["l", "ls"])]
    List,
    /// Show a single status
    #[command(alias = "s")]
    Show(StatusIdArgs),
    /// Update a status
    #[command(alias = "u")]
    Update(UpdateStatusArgs),
    /// Delete a status
    #[command(aliases = ["d", "rm"])]
    Delete(DeleteStatusArgs),
}

// ============================================================================
// Lead arguments
// ============================================================================

/// Create a lead with no status
#[derive(Args)]
pub struct CreateLeadArgs {
    /// Owner user id
    #[arg(short, long)]
    pub owner: String,
    /// Watcher user id, repeatable
    #[arg(short, long = "watcher")]
    pub watchers: Vec<String>,
    /// Project id
    #[arg(long)]
    pub project_id: Option<String>,
    /// Project name (defaults to the id)
    #[arg(long, requires = "project_id")]
    pub project_name: Option<String>,
    /// Initial value, repeatable: key=value
    #[arg(short, long = "set", value_parser = parse_assignment)]
    pub values: Vec<(String, Value)>,
}

impl CreateLeadArgs {
    fn into_params(self, actor_id: String) -> CreateLead {
        CreateLead {
            lead: NewLead {
                owner_id: self.owner,
                watchers: self.watchers,
                project: project(self.project_id, self.project_name),
                data: into_field_data(self.values),
            },
            actor_id,
        }
    }
}

/// List leads
#[derive(Args)]
pub struct ListLeadsArgs {
    /// Only leads owned by this user
    #[arg(long)]
    pub owner: Option<String>,
    /// Only leads currently in this status
    #[arg(long)]
    pub status: Option<String>,
}

impl From<ListLeadsArgs> for ListLeads {
    fn from(val: ListLeadsArgs) -> Self {
        ListLeads {
            owner_id: val.owner,
            status_id: val.status,
        }
    }
}

/// Address a single lead
#[derive(Args)]
pub struct LeadIdArgs {
    /// ID of the lead
    pub id: String,
}

impl From<LeadIdArgs> for LeadRef {
    fn from(val: LeadIdArgs) -> Self {
        LeadRef { id: val.id }
    }
}

/// Move a lead to a status
///
/// Values are validated against the target status's fields and merged into
/// the lead's data.
#[derive(Args)]
pub struct MoveLeadArgs {
    /// ID of the lead
    pub id: String,
    /// ID of the target status
    pub status_id: String,
    /// Field value, repeatable: key=value
    #[arg(short, long = "set", value_parser = parse_assignment)]
    pub values: Vec<(String, Value)>,
}

impl MoveLeadArgs {
    fn into_params(self, actor_id: String) -> TransitionLead {
        TransitionLead {
            lead_id: self.id,
            status_id: self.status_id,
            data: into_field_data(self.values),
            actor_id,
        }
    }
}

/// Transfer a lead to another owner
#[derive(Args)]
pub struct TransferLeadArgs {
    /// ID of the lead
    pub id: String,
    /// New owner user id
    pub to_user: String,
    /// New project id; keeps the current project when omitted
    #[arg(long)]
    pub project_id: Option<String>,
    /// New project name (defaults to the id)
    #[arg(long, requires = "project_id")]
    pub project_name: Option<String>,
    /// Why the lead is being transferred
    #[arg(short, long)]
    pub reason: Option<String>,
    /// Free-form notes
    #[arg(short, long)]
    pub notes: Option<String>,
}

impl TransferLeadArgs {
    fn into_params(self, actor_id: String) -> TransferLead {
        TransferLead {
            lead_id: self.id,
            transfer: Transfer {
                to_user_id: self.to_user,
                new_project: project(self.project_id, self.project_name),
                reason: self.reason,
                notes: self.notes,
            },
            actor_id,
        }
    }
}

/// Edit a lead's data without changing its status
///
/// A `null` value removes the key.
#[derive(Args)]
pub struct UpdateLeadArgs {
    /// ID of the lead
    pub id: String,
    /// Change, repeatable: key=value
    #[arg(short, long = "set", value_parser = parse_assignment, required = true)]
    pub values: Vec<(String, Value)>,
}

impl UpdateLeadArgs {
    fn into_params(self, actor_id: String) -> UpdateLead {
        UpdateLead {
            lead_id: self.id,
            changes: into_field_data(self.values),
            actor_id,
        }
    }
}

/// Show leads due for follow-up
#[derive(Args)]
pub struct FollowUpsArgs {
    /// Reference date (YYYY-MM-DD); defaults to today
    #[arg(long)]
    pub date: Option<String>,
}

impl From<FollowUpsArgs> for FollowUps {
    fn from(val: FollowUpsArgs) -> Self {
        FollowUps {
            reference_date: val.date,
        }
    }
}

#[derive(Subcommand)]
pub enum LeadCommands {
    /// Create a lead
    #[command(alias = "c")]
    Create(CreateLeadArgs),
    /// List leads
    #[command(aliases = ["l", "ls"])]
    List(ListLeadsArgs),
    /// Show a lead with its status history
    #[command(alias = "s")]
    Show(LeadIdArgs),
    /// Move a lead to a status
    #[command(aliases = ["m", "transition"])]
    Move(MoveLeadArgs),
    /// Transfer a lead to another owner
    #[command(alias = "t")]
    Transfer(TransferLeadArgs),
    /// Edit a lead's data
    #[command(aliases = ["u", "edit"])]
    Update(UpdateLeadArgs),
    /// Show a lead's activity log, newest first
    #[command(alias = "a")]
    Activity(LeadIdArgs),
    /// Show leads due for follow-up
    #[command(alias = "f")]
    FollowUps(FollowUpsArgs),
}

// ============================================================================
// Command handler
// ============================================================================

/// Runs commands against a pipeline and renders their output.
pub struct Cli {
    pipeline: Pipeline,
    renderer: TerminalRenderer,
    actor: String,
}

impl Cli {
    pub fn new(pipeline: Pipeline, renderer: TerminalRenderer, actor: String) -> Self {
        Self {
            pipeline,
            renderer,
            actor,
        }
    }

    pub async fn handle_status_command(self, command: StatusCommands) -> Result<()> {
        let output = match command {
            StatusCommands::Create(args) => self
                .pipeline
                .create_status_result(&args.into())
                .await
                .context("Failed to create status")?
                .to_string(),
            StatusCommands::List => {
                let statuses = self
                    .pipeline
                    .list_statuses_result()
                    .await
                    .context("Failed to list statuses")?;
                format!("# Statuses\n\n{statuses}")
            }
            StatusCommands::Show(args) => {
                let params = StatusRef::from(args);
                match self
                    .pipeline
                    .show_status(&params)
                    .await
                    .context("Failed to get status")?
                {
                    Some(status) => status.to_string(),
                    None => OperationStatus::failure(format!(
                        "Status with ID {} not found",
                        params.id
                    ))
                    .to_string(),
                }
            }
            StatusCommands::Update(args) => self
                .pipeline
                .update_status_result(&args.into())
                .await
                .context("Failed to update status")?
                .to_string(),
            StatusCommands::Delete(args) => self
                .pipeline
                .delete_status_result(&args.into())
                .await
                .context("Failed to delete status")?
                .to_string(),
        };
        self.renderer.render(&output)
    }

    pub async fn handle_lead_command(self, command: LeadCommands) -> Result<()> {
        let actor = self.actor.clone();
        let output = match command {
            LeadCommands::Create(args) => self
                .pipeline
                .create_lead_result(&args.into_params(actor))
                .await
                .context("Failed to create lead")?
                .to_string(),
            LeadCommands::List(args) => return self.list_leads(&args.into()).await,
            LeadCommands::Show(args) => {
                let params = LeadRef::from(args);
                match self
                    .pipeline
                    .show_lead(&params)
                    .await
                    .context("Failed to get lead")?
                {
                    Some(view) => view.to_string(),
                    None => {
                        OperationStatus::failure(format!("Lead with ID {} not found", params.id))
                            .to_string()
                    }
                }
            }
            LeadCommands::Move(args) => self
                .pipeline
                .transition_lead_result(&args.into_params(actor))
                .await
                .context("Failed to move lead")?
                .to_string(),
            LeadCommands::Transfer(args) => self
                .pipeline
                .transfer_lead_result(&args.into_params(actor))
                .await
                .context("Failed to transfer lead")?
                .to_string(),
            LeadCommands::Update(args) => self
                .pipeline
                .update_lead_result(&args.into_params(actor))
                .await
                .context("Failed to update lead")?
                .to_string(),
            LeadCommands::Activity(args) => {
                let params = LeadRef::from(args);
                let feed = self
                    .pipeline
                    .lead_activity(&params)
                    .await
                    .context("Failed to load activity")?;
                format!("# Activity for lead {}\n\n{feed}", params.id)
            }
            LeadCommands::FollowUps(args) => self
                .pipeline
                .follow_ups_result(&args.into())
                .await
                .context("Failed to compute follow-ups")?
                .to_string(),
        };
        self.renderer.render(&output)
    }

    /// Lists leads; also the default command.
    pub async fn list_leads(&self, params: &ListLeads) -> Result<()> {
        let leads = self
            .pipeline
            .list_leads_result(params)
            .await
            .context("Failed to list leads")?;
        self.renderer.render(&format!("# Leads\n\n{leads}"))
    }
}
