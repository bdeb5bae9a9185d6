//! Settings DTOs

use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;
use validator::Validate;

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSettingsRequest {
    pub org_name: Option<String>,
    #[validate(email(message = "invalid email format"))]
    pub support_email: Option<String>,
    pub payment_mode: Option<String>,
    #[validate(range(min = 0.0, message = "fee must not be negative"))]
    pub txn_fee: Option<f64>,
    pub gateway_key_id: Option<String>,
    pub enabled_methods: Option<Value>,
    pub maintenance_mode: Option<bool>,
}

/// Payment-only view of the settings row
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PaymentSettings {
    pub payment_mode: Option<String>,
    pub txn_fee: f64,
    pub gateway_key_id: Option<String>,
    pub enabled_methods: Value,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePaymentRequest {
    pub payment_mode: Option<String>,
    #[validate(range(min = 0.0, message = "fee must not be negative"))]
    pub txn_fee: Option<f64>,
    pub gateway_key_id: Option<String>,
    pub enabled_methods: Option<Value>,
}

/// Audit log list filters
#[derive(Debug, Default, Deserialize, ToSchema, utoipa::IntoParams)]
pub struct AuditLogFilter {
    /// Substring match on the action
    pub action: Option<String>,
    /// Substring match on the acting user
    pub user: Option<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct AddBlacklistRequest {
    #[validate(length(min = 1, max = 20, message = "phone number is required"))]
    pub phone: String,
    pub reason: Option<String>,
}
