//! Transaction entity

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "transactions")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    /// Public transaction reference shown on receipts
    #[sea_orm(unique)]
    pub txn_id: String,

    #[sea_orm(nullable)]
    pub dept_name: Option<String>,

    #[sea_orm(nullable)]
    pub kiosk_id: Option<String>,

    /// Citizen service that was paid for (e.g. "Water Bill")
    #[sea_orm(nullable)]
    pub service: Option<String>,

    /// Consumer/account number entered at the kiosk
    #[sea_orm(nullable)]
    pub account: Option<String>,

    /// Amount in rupees. Retained for audit on every status; only
    /// counted as revenue when the transaction succeeded.
    #[sea_orm(nullable, column_type = "Double")]
    pub amount: Option<f64>,

    /// Status: success, failed, pending. Rows without a status fall
    /// into the "unknown" reconciliation bucket.
    #[sea_orm(nullable)]
    pub status: Option<String>,

    pub created_at: DateTimeUtc,

    #[sea_orm(nullable)]
    pub updated_at: Option<DateTimeUtc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn amount_or_zero(&self) -> f64 {
        self.amount.unwrap_or(0.0)
    }

    pub fn is_success(&self) -> bool {
        self.status.as_deref() == Some("success")
    }
}
