//! Platform settings entity (singleton row)

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "settings")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    #[sea_orm(nullable)]
    pub org_name: Option<String>,

    #[sea_orm(nullable)]
    pub support_email: Option<String>,

    /// Payment gateway mode: "live" or "test"
    #[sea_orm(nullable)]
    pub payment_mode: Option<String>,

    /// Convenience fee added per transaction, in rupees
    #[sea_orm(column_type = "Double")]
    pub txn_fee: f64,

    #[sea_orm(nullable)]
    pub gateway_key_id: Option<String>,

    /// Enabled payment methods, e.g. ["upi", "card", "cash"]
    pub enabled_methods: Json,

    pub maintenance_mode: bool,

    pub created_at: DateTimeUtc,

    #[sea_orm(nullable)]
    pub updated_at: Option<DateTimeUtc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
