//! Audit trail writer
//!
//! Every mutating admin action is recorded with who did it and from
//! where. Writes are fire-and-forget: a failed insert is logged and
//! never blocks or fails the request that triggered it.

use chrono::Utc;
use sea_orm::{ActiveModelTrait, DatabaseConnection, Set};
use tracing::warn;

use crate::infrastructure::database::entities::audit_log;

/// Record one audit entry. Spawned onto the runtime so the calling
/// handler does not wait for the insert.
pub fn record_audit(
    db: DatabaseConnection,
    action: impl Into<String>,
    actor: impl Into<String>,
    role: Option<String>,
    ip: Option<String>,
    detail: Option<String>,
) {
    let action = action.into();
    let actor = actor.into();

    tokio::spawn(async move {
        let entry = audit_log::ActiveModel {
            action: Set(action.clone()),
            actor: Set(actor),
            role: Set(role),
            ip: Set(ip),
            detail: Set(detail),
            created_at: Set(Utc::now()),
            ..Default::default()
        };

        if let Err(e) = entry.insert(&db).await {
            warn!("audit write failed for action {}: {}", action, e);
        }
    });
}
