//! Department DTOs

use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateDepartmentRequest {
    #[validate(length(min = 1, max = 100, message = "name is required"))]
    pub name: String,
    pub description: Option<String>,
    /// Defaults to enabled
    pub enabled: Option<bool>,
    /// Initial service catalogue; each entry gets a `_id` on insert
    pub services: Option<Vec<ServiceRequest>>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateDepartmentRequest {
    #[validate(length(min = 1, max = 100, message = "name must not be empty"))]
    pub name: Option<String>,
    pub description: Option<String>,
    pub enabled: Option<bool>,
}

/// One service inside a department's catalogue
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct ServiceRequest {
    #[validate(length(min = 1, max = 100, message = "name is required"))]
    pub name: String,
    pub description: Option<String>,
    pub fee: Option<f64>,
    pub enabled: Option<bool>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateServiceRequest {
    #[validate(length(min = 1, max = 100, message = "name must not be empty"))]
    pub name: Option<String>,
    pub description: Option<String>,
    pub fee: Option<f64>,
    pub enabled: Option<bool>,
}
