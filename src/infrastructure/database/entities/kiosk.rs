//! Kiosk entity

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Statuses the dashboard knows how to bucket. Anything else still
/// counts toward the fleet total but lands in no named bucket.
pub const KNOWN_STATUSES: [&str; 3] = ["online", "offline", "maintenance"];

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "kiosks")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    /// Public kiosk code (e.g. "KSK-017")
    #[sea_orm(unique)]
    pub kiosk_id: String,

    #[sea_orm(nullable)]
    pub location: Option<String>,

    #[sea_orm(nullable)]
    pub city: Option<String>,

    /// Status: online, offline, maintenance
    pub status: String,

    /// Logged-in citizen session at the kiosk, if any
    #[sea_orm(nullable)]
    pub current_session: Option<String>,

    #[sea_orm(nullable)]
    pub last_online: Option<DateTimeUtc>,

    pub total_sessions: i32,

    pub today_sessions: i32,

    /// Rolling uptime percentage reported by the agent
    #[sea_orm(nullable, column_type = "Double")]
    pub uptime: Option<f64>,

    pub created_at: DateTimeUtc,

    #[sea_orm(nullable)]
    pub updated_at: Option<DateTimeUtc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
