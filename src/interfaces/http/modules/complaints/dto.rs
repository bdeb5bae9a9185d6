//! Complaint DTOs

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

/// Statuses a complaint can be moved to through the API.
pub const VALID_STATUSES: [&str; 5] = ["open", "in_progress", "resolved", "closed", "escalated"];

/// Complaint list filters
#[derive(Debug, Default, Deserialize, ToSchema, utoipa::IntoParams)]
pub struct ComplaintFilter {
    /// Exact status match
    pub status: Option<String>,
    /// Exact priority match
    pub priority: Option<String>,
    /// Substring match on department name
    pub dept: Option<String>,
    /// Substring match across complaint id, category and account
    pub search: Option<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateStatusRequest {
    #[validate(length(min = 1, message = "status is required"))]
    pub status: String,
    pub remarks: Option<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AssignRequest {
    #[validate(length(min = 1, message = "operator id is required"))]
    pub operator_id: String,
}

/// Per-status complaint count
#[derive(Debug, Serialize, ToSchema)]
pub struct ComplaintStatusCount {
    #[serde(rename = "_id")]
    pub status: String,
    pub count: u64,
}
