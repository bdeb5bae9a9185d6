//! Kiosk API handlers
//!
//! Remote actions (restart, push-update) are signal-only
//! acknowledgements; the service records the intent in the audit trail
//! and leaves delivery to the kiosk agent channel.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, Set,
};
use serde_json::Value;

use super::dto::{CreateKioskRequest, KioskFilter, KioskStatsResponse, UpdateKioskRequest};
use crate::analytics::to_wire;
use crate::application::record_audit;
use crate::infrastructure::database::entities::kiosk;
use crate::interfaces::http::common::{contains_ci, ApiResponse, ValidatedJson};
use crate::interfaces::http::middleware::{AuthenticatedUser, ClientIp};

/// Kiosk handler state
#[derive(Clone)]
pub struct KioskState {
    pub db: DatabaseConnection,
}

fn store_error<T>(e: impl std::fmt::Display) -> (StatusCode, Json<ApiResponse<T>>) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ApiResponse::error(e.to_string())),
    )
}

fn not_found<T>(id: i32) -> (StatusCode, Json<ApiResponse<T>>) {
    (
        StatusCode::NOT_FOUND,
        Json(ApiResponse::error(format!("Kiosk {} not found", id))),
    )
}

async fn find_kiosk<T>(
    db: &DatabaseConnection,
    id: i32,
) -> Result<kiosk::Model, (StatusCode, Json<ApiResponse<T>>)> {
    kiosk::Entity::find_by_id(id)
        .one(db)
        .await
        .map_err(store_error)?
        .ok_or_else(|| not_found(id))
}

fn audit(
    state: &KioskState,
    user: &AuthenticatedUser,
    ip: &ClientIp,
    action: &str,
    detail: String,
) {
    record_audit(
        state.db.clone(),
        action,
        user.email.clone(),
        Some(user.role.clone()),
        ip.0.clone(),
        Some(detail),
    );
}

#[utoipa::path(
    get,
    path = "/api/v1/kiosks",
    tag = "Kiosks",
    params(KioskFilter),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Kiosk list, kiosk id ascending", body = ApiResponse<Value>)
    )
)]
pub async fn list_kiosks(
    State(state): State<KioskState>,
    Query(filter): Query<KioskFilter>,
) -> Result<Json<ApiResponse<Vec<Value>>>, (StatusCode, Json<ApiResponse<Vec<Value>>>)> {
    let mut condition = Condition::all();
    if let Some(status) = &filter.status {
        condition = condition.add(kiosk::Column::Status.eq(status));
    }
    if let Some(city) = &filter.city {
        condition = condition.add(contains_ci(kiosk::Column::City, city));
    }
    if let Some(search) = &filter.search {
        condition = condition.add(
            Condition::any()
                .add(contains_ci(kiosk::Column::KioskId, search))
                .add(contains_ci(kiosk::Column::Location, search))
                .add(contains_ci(kiosk::Column::City, search)),
        );
    }

    let rows = kiosk::Entity::find()
        .filter(condition)
        .order_by_asc(kiosk::Column::KioskId)
        .all(&state.db)
        .await
        .map_err(store_error)?;

    let items: Vec<Value> = rows.iter().map(to_wire).collect();
    Ok(Json(ApiResponse::success(items)))
}

#[utoipa::path(
    get,
    path = "/api/v1/kiosks/{id}",
    tag = "Kiosks",
    params(("id" = i32, Path, description = "Kiosk ID")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Kiosk details", body = ApiResponse<Value>),
        (status = 404, description = "Not found")
    )
)]
pub async fn get_kiosk(
    State(state): State<KioskState>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<Value>>, (StatusCode, Json<ApiResponse<Value>>)> {
    let row = find_kiosk(&state.db, id).await?;
    Ok(Json(ApiResponse::success(to_wire(&row))))
}

#[utoipa::path(
    post,
    path = "/api/v1/kiosks",
    tag = "Kiosks",
    request_body = CreateKioskRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 201, description = "Kiosk created", body = ApiResponse<Value>),
        (status = 400, description = "Unknown status"),
        (status = 409, description = "Kiosk id already exists")
    )
)]
pub async fn create_kiosk(
    State(state): State<KioskState>,
    Extension(user): Extension<AuthenticatedUser>,
    Extension(ip): Extension<ClientIp>,
    ValidatedJson(request): ValidatedJson<CreateKioskRequest>,
) -> Result<(StatusCode, Json<ApiResponse<Value>>), (StatusCode, Json<ApiResponse<Value>>)> {
    let status = request.status.unwrap_or_else(|| "offline".to_string());
    if !kiosk::KNOWN_STATUSES.contains(&status.as_str()) {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(ApiResponse::error("Unknown kiosk status")),
        ));
    }

    let existing = kiosk::Entity::find()
        .filter(kiosk::Column::KioskId.eq(&request.kiosk_id))
        .one(&state.db)
        .await
        .map_err(store_error)?;
    if existing.is_some() {
        return Err((
            StatusCode::CONFLICT,
            Json(ApiResponse::error("Kiosk id already exists")),
        ));
    }

    let new_kiosk = kiosk::ActiveModel {
        kiosk_id: Set(request.kiosk_id.clone()),
        location: Set(request.location),
        city: Set(request.city),
        status: Set(status),
        current_session: Set(None),
        last_online: Set(None),
        total_sessions: Set(0),
        today_sessions: Set(0),
        uptime: Set(None),
        created_at: Set(Utc::now()),
        updated_at: Set(None),
        ..Default::default()
    };

    let created = new_kiosk.insert(&state.db).await.map_err(store_error)?;

    audit(
        &state,
        &user,
        &ip,
        "Kiosk created",
        format!("Created: {}", created.kiosk_id),
    );

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(to_wire(&created))),
    ))
}

#[utoipa::path(
    put,
    path = "/api/v1/kiosks/{id}",
    tag = "Kiosks",
    params(("id" = i32, Path, description = "Kiosk ID")),
    request_body = UpdateKioskRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Kiosk updated", body = ApiResponse<Value>),
        (status = 404, description = "Not found")
    )
)]
pub async fn update_kiosk(
    State(state): State<KioskState>,
    Path(id): Path<i32>,
    ValidatedJson(request): ValidatedJson<UpdateKioskRequest>,
) -> Result<Json<ApiResponse<Value>>, (StatusCode, Json<ApiResponse<Value>>)> {
    if let Some(status) = &request.status {
        if !kiosk::KNOWN_STATUSES.contains(&status.as_str()) {
            return Err((
                StatusCode::BAD_REQUEST,
                Json(ApiResponse::error("Unknown kiosk status")),
            ));
        }
    }

    let row = find_kiosk(&state.db, id).await?;
    let mut active: kiosk::ActiveModel = row.into();

    if let Some(location) = request.location {
        active.location = Set(Some(location));
    }
    if let Some(city) = request.city {
        active.city = Set(Some(city));
    }
    if let Some(status) = request.status {
        active.status = Set(status);
    }
    if let Some(session) = request.current_session {
        active.current_session = Set(Some(session));
    }
    if let Some(uptime) = request.uptime {
        active.uptime = Set(Some(uptime));
    }
    active.updated_at = Set(Some(Utc::now()));

    let updated = active.update(&state.db).await.map_err(store_error)?;
    Ok(Json(ApiResponse::success(to_wire(&updated))))
}

async fn set_status(
    state: &KioskState,
    user: &AuthenticatedUser,
    ip: &ClientIp,
    id: i32,
    new_status: &str,
    action: &str,
) -> Result<Json<ApiResponse<Value>>, (StatusCode, Json<ApiResponse<Value>>)> {
    let row = find_kiosk(&state.db, id).await?;
    let kiosk_id = row.kiosk_id.clone();

    let mut active: kiosk::ActiveModel = row.into();
    active.status = Set(new_status.to_string());
    if new_status == "online" {
        active.last_online = Set(Some(Utc::now()));
    }
    active.updated_at = Set(Some(Utc::now()));

    let updated = active.update(&state.db).await.map_err(store_error)?;

    audit(state, user, ip, action, format!("{}: {}", action, kiosk_id));
    Ok(Json(ApiResponse::success(to_wire(&updated))))
}

#[utoipa::path(
    post,
    path = "/api/v1/kiosks/{id}/enable",
    tag = "Kiosks",
    params(("id" = i32, Path, description = "Kiosk ID")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Kiosk set online, last_online stamped", body = ApiResponse<Value>),
        (status = 404, description = "Not found")
    )
)]
pub async fn enable_kiosk(
    State(state): State<KioskState>,
    Extension(user): Extension<AuthenticatedUser>,
    Extension(ip): Extension<ClientIp>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<Value>>, (StatusCode, Json<ApiResponse<Value>>)> {
    set_status(&state, &user, &ip, id, "online", "Kiosk enabled").await
}

#[utoipa::path(
    post,
    path = "/api/v1/kiosks/{id}/disable",
    tag = "Kiosks",
    params(("id" = i32, Path, description = "Kiosk ID")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Kiosk set offline", body = ApiResponse<Value>),
        (status = 404, description = "Not found")
    )
)]
pub async fn disable_kiosk(
    State(state): State<KioskState>,
    Extension(user): Extension<AuthenticatedUser>,
    Extension(ip): Extension<ClientIp>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<Value>>, (StatusCode, Json<ApiResponse<Value>>)> {
    set_status(&state, &user, &ip, id, "offline", "Kiosk disabled").await
}

#[utoipa::path(
    post,
    path = "/api/v1/kiosks/{id}/maintenance",
    tag = "Kiosks",
    params(("id" = i32, Path, description = "Kiosk ID")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Kiosk set to maintenance", body = ApiResponse<Value>),
        (status = 404, description = "Not found")
    )
)]
pub async fn maintenance_kiosk(
    State(state): State<KioskState>,
    Extension(user): Extension<AuthenticatedUser>,
    Extension(ip): Extension<ClientIp>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<Value>>, (StatusCode, Json<ApiResponse<Value>>)> {
    set_status(&state, &user, &ip, id, "maintenance", "Kiosk set to maintenance").await
}

#[utoipa::path(
    post,
    path = "/api/v1/kiosks/{id}/force-logout",
    tag = "Kiosks",
    params(("id" = i32, Path, description = "Kiosk ID")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Session terminated", body = ApiResponse<String>),
        (status = 404, description = "Not found")
    )
)]
pub async fn force_logout(
    State(state): State<KioskState>,
    Extension(user): Extension<AuthenticatedUser>,
    Extension(ip): Extension<ClientIp>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<String>>, (StatusCode, Json<ApiResponse<String>>)> {
    let row = find_kiosk(&state.db, id).await?;
    let kiosk_id = row.kiosk_id.clone();

    let mut active: kiosk::ActiveModel = row.into();
    active.current_session = Set(None);
    active.updated_at = Set(Some(Utc::now()));
    active.update(&state.db).await.map_err(store_error)?;

    audit(
        &state,
        &user,
        &ip,
        "Kiosk force logout",
        format!("Force logout: {}", kiosk_id),
    );

    Ok(Json(ApiResponse::success(
        "Session terminated".to_string(),
    )))
}

#[utoipa::path(
    post,
    path = "/api/v1/kiosks/{id}/restart",
    tag = "Kiosks",
    params(("id" = i32, Path, description = "Kiosk ID")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Restart signal recorded", body = ApiResponse<String>),
        (status = 404, description = "Not found")
    )
)]
pub async fn restart_kiosk(
    State(state): State<KioskState>,
    Extension(user): Extension<AuthenticatedUser>,
    Extension(ip): Extension<ClientIp>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<String>>, (StatusCode, Json<ApiResponse<String>>)> {
    let row = find_kiosk(&state.db, id).await?;

    audit(
        &state,
        &user,
        &ip,
        "Kiosk restart",
        format!("Restart requested: {}", row.kiosk_id),
    );

    Ok(Json(ApiResponse::success("Restart signal sent".to_string())))
}

#[utoipa::path(
    post,
    path = "/api/v1/kiosks/{id}/push-update",
    tag = "Kiosks",
    params(("id" = i32, Path, description = "Kiosk ID")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Update push recorded", body = ApiResponse<String>),
        (status = 404, description = "Not found")
    )
)]
pub async fn push_update(
    State(state): State<KioskState>,
    Extension(user): Extension<AuthenticatedUser>,
    Extension(ip): Extension<ClientIp>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<String>>, (StatusCode, Json<ApiResponse<String>>)> {
    let row = find_kiosk(&state.db, id).await?;

    audit(
        &state,
        &user,
        &ip,
        "Software update pushed",
        format!("Update pushed to: {}", row.kiosk_id),
    );

    Ok(Json(ApiResponse::success("Update pushed".to_string())))
}

#[utoipa::path(
    get,
    path = "/api/v1/kiosks/{id}/stats",
    tag = "Kiosks",
    params(("id" = i32, Path, description = "Kiosk ID")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Session counters", body = ApiResponse<KioskStatsResponse>),
        (status = 404, description = "Not found")
    )
)]
pub async fn get_kiosk_stats(
    State(state): State<KioskState>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<KioskStatsResponse>>, (StatusCode, Json<ApiResponse<KioskStatsResponse>>)>
{
    let row = find_kiosk(&state.db, id).await?;
    Ok(Json(ApiResponse::success(KioskStatsResponse {
        total_sessions: row.total_sessions,
        today_sessions: row.today_sessions,
        uptime: row.uptime,
    })))
}
