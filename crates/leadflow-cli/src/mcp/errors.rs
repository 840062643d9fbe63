//! Error handling utilities for MCP server

use leadflow_core::WorkflowError;
use rmcp::ErrorData;

/// Converts a workflow error into an MCP error. Caller mistakes (schema
/// violations, duplicate roles, unknown ids) become `invalid_params` so the
/// client can correct and retry; everything else is an internal error.
pub fn to_mcp_error(message: &str, error: &WorkflowError) -> ErrorData {
    let text = format!("{message}: {error}");
    if error.is_validation() {
        ErrorData::invalid_params(text, None)
    } else {
        ErrorData::internal_error(text, None)
    }
}

#[cfg(test)]
mod tests {
    use leadflow_core::models::{FieldViolation, StatusId};
    use rmcp::model::ErrorCode;

    use super::*;

    #[test]
    fn test_validation_errors_are_invalid_params() {
        let err = to_mcp_error(
            "Failed to move lead",
            &WorkflowError::schema("Booking Date", FieldViolation::Missing),
        );
        assert_eq!(err.code, ErrorCode::INVALID_PARAMS);
        assert_eq!(err.message, "Failed to move lead: Field 'Booking Date' is required");

        let missing = to_mcp_error(
            "Failed to get status",
            &WorkflowError::StatusNotFound {
                id: StatusId::from("st-1"),
            },
        );
        assert_eq!(missing.code, ErrorCode::INVALID_PARAMS);
    }

    #[test]
    fn test_other_errors_are_internal() {
        let err = to_mcp_error(
            "Failed to list leads",
            &WorkflowError::Configuration {
                message: "Task join error".to_string(),
            },
        );
        assert_eq!(err.code, ErrorCode::INTERNAL_ERROR);
    }
}
