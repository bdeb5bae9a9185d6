//! Complaint entity

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "complaints")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    /// Public complaint reference (e.g. "CMP-2024-0031")
    #[sea_orm(unique)]
    pub complaint_id: String,

    #[sea_orm(nullable)]
    pub dept_name: Option<String>,

    #[sea_orm(nullable)]
    pub category: Option<String>,

    #[sea_orm(nullable)]
    pub account: Option<String>,

    #[sea_orm(nullable)]
    pub priority: Option<String>,

    /// Status: open, in_progress, resolved, closed, escalated
    pub status: String,

    #[sea_orm(nullable)]
    pub assigned_to: Option<String>,

    #[sea_orm(nullable)]
    pub resolution: Option<String>,

    /// Status-change trail: array of {status, changedBy, note, changedAt}
    #[sea_orm(nullable)]
    pub history: Option<Json>,

    #[sea_orm(nullable)]
    pub resolved_at: Option<DateTimeUtc>,

    #[sea_orm(nullable)]
    pub escalated_at: Option<DateTimeUtc>,

    pub created_at: DateTimeUtc,

    #[sea_orm(nullable)]
    pub updated_at: Option<DateTimeUtc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Open complaints plus everything settled (resolved or closed)
    /// feed the dashboard's two complaint counters.
    pub fn is_settled(&self) -> bool {
        self.status == "resolved" || self.status == "closed"
    }
}
