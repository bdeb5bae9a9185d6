//! Settings, audit log and blacklist API handlers

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, Set,
};
use serde_json::{json, Value};

use super::dto::{
    AddBlacklistRequest, AuditLogFilter, PaymentSettings, UpdatePaymentRequest,
    UpdateSettingsRequest,
};
use crate::analytics::to_wire;
use crate::application::record_audit;
use crate::infrastructure::database::entities::{audit_log, blacklist_entry, settings};
use crate::interfaces::http::common::{
    contains_ci, ApiResponse, PaginatedResponse, PaginationParams, ValidatedJson,
};
use crate::interfaces::http::middleware::{AuthenticatedUser, ClientIp};

/// Settings handler state
#[derive(Clone)]
pub struct SettingsState {
    pub db: DatabaseConnection,
}

fn store_error<T>(e: impl std::fmt::Display) -> (StatusCode, Json<ApiResponse<T>>) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ApiResponse::error(e.to_string())),
    )
}

/// Fetch the singleton settings row, inserting defaults on first read.
async fn get_or_create<T>(
    db: &DatabaseConnection,
) -> Result<settings::Model, (StatusCode, Json<ApiResponse<T>>)> {
    if let Some(row) = settings::Entity::find().one(db).await.map_err(store_error)? {
        return Ok(row);
    }

    let defaults = settings::ActiveModel {
        org_name: Set(None),
        support_email: Set(None),
        payment_mode: Set(Some("test".to_string())),
        txn_fee: Set(0.0),
        gateway_key_id: Set(None),
        enabled_methods: Set(json!(["upi", "card", "cash"])),
        maintenance_mode: Set(false),
        created_at: Set(Utc::now()),
        updated_at: Set(None),
        ..Default::default()
    };

    defaults.insert(db).await.map_err(store_error)
}

fn audit(
    state: &SettingsState,
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
    path = "/api/v1/settings",
    tag = "Settings",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Current settings (created on first read)", body = ApiResponse<Value>)
    )
)]
pub async fn get_settings(
    State(state): State<SettingsState>,
) -> Result<Json<ApiResponse<Value>>, (StatusCode, Json<ApiResponse<Value>>)> {
    let row = get_or_create(&state.db).await?;
    Ok(Json(ApiResponse::success(to_wire(&row))))
}

#[utoipa::path(
    put,
    path = "/api/v1/settings",
    tag = "Settings",
    request_body = UpdateSettingsRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Settings updated", body = ApiResponse<Value>)
    )
)]
pub async fn update_settings(
    State(state): State<SettingsState>,
    Extension(user): Extension<AuthenticatedUser>,
    Extension(ip): Extension<ClientIp>,
    ValidatedJson(request): ValidatedJson<UpdateSettingsRequest>,
) -> Result<Json<ApiResponse<Value>>, (StatusCode, Json<ApiResponse<Value>>)> {
    let row = get_or_create(&state.db).await?;
    let mut active: settings::ActiveModel = row.into();

    if let Some(org_name) = request.org_name {
        active.org_name = Set(Some(org_name));
    }
    if let Some(support_email) = request.support_email {
        active.support_email = Set(Some(support_email));
    }
    if let Some(payment_mode) = request.payment_mode {
        active.payment_mode = Set(Some(payment_mode));
    }
    if let Some(txn_fee) = request.txn_fee {
        active.txn_fee = Set(txn_fee);
    }
    if let Some(gateway_key_id) = request.gateway_key_id {
        active.gateway_key_id = Set(Some(gateway_key_id));
    }
    if let Some(enabled_methods) = request.enabled_methods {
        active.enabled_methods = Set(enabled_methods);
    }
    if let Some(maintenance_mode) = request.maintenance_mode {
        active.maintenance_mode = Set(maintenance_mode);
    }
    active.updated_at = Set(Some(Utc::now()));

    let updated = active.update(&state.db).await.map_err(store_error)?;

    audit(
        &state,
        &user,
        &ip,
        "Config changed",
        "Settings updated".to_string(),
    );

    Ok(Json(ApiResponse::success(to_wire(&updated))))
}

fn payment_view(row: &settings::Model) -> PaymentSettings {
    PaymentSettings {
        payment_mode: row.payment_mode.clone(),
        txn_fee: row.txn_fee,
        gateway_key_id: row.gateway_key_id.clone(),
        enabled_methods: row.enabled_methods.clone(),
    }
}

#[utoipa::path(
    get,
    path = "/api/v1/settings/payment",
    tag = "Settings",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Payment configuration", body = ApiResponse<PaymentSettings>)
    )
)]
pub async fn get_payment_settings(
    State(state): State<SettingsState>,
) -> Result<Json<ApiResponse<PaymentSettings>>, (StatusCode, Json<ApiResponse<PaymentSettings>>)> {
    let row = get_or_create(&state.db).await?;
    Ok(Json(ApiResponse::success(payment_view(&row))))
}

#[utoipa::path(
    put,
    path = "/api/v1/settings/payment",
    tag = "Settings",
    request_body = UpdatePaymentRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Payment configuration updated", body = ApiResponse<PaymentSettings>)
    )
)]
pub async fn update_payment_settings(
    State(state): State<SettingsState>,
    Extension(user): Extension<AuthenticatedUser>,
    Extension(ip): Extension<ClientIp>,
    ValidatedJson(request): ValidatedJson<UpdatePaymentRequest>,
) -> Result<Json<ApiResponse<PaymentSettings>>, (StatusCode, Json<ApiResponse<PaymentSettings>>)> {
    let row = get_or_create(&state.db).await?;
    let mut active: settings::ActiveModel = row.into();

    if let Some(payment_mode) = request.payment_mode {
        active.payment_mode = Set(Some(payment_mode));
    }
    if let Some(txn_fee) = request.txn_fee {
        active.txn_fee = Set(txn_fee);
    }
    if let Some(gateway_key_id) = request.gateway_key_id {
        active.gateway_key_id = Set(Some(gateway_key_id));
    }
    if let Some(enabled_methods) = request.enabled_methods {
        active.enabled_methods = Set(enabled_methods);
    }
    active.updated_at = Set(Some(Utc::now()));

    let updated = active.update(&state.db).await.map_err(store_error)?;

    audit(
        &state,
        &user,
        &ip,
        "Payment config updated",
        format!("Mode: {}", updated.payment_mode.as_deref().unwrap_or("-")),
    );

    Ok(Json(ApiResponse::success(payment_view(&updated))))
}

// Audit logs

#[utoipa::path(
    get,
    path = "/api/v1/settings/audit-logs",
    tag = "Settings",
    params(AuditLogFilter, PaginationParams),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Audit trail page, newest first", body = PaginatedResponse<Value>)
    )
)]
pub async fn list_audit_logs(
    State(state): State<SettingsState>,
    Query(filter): Query<AuditLogFilter>,
    Query(pagination): Query<PaginationParams>,
) -> Result<Json<PaginatedResponse<Value>>, (StatusCode, Json<ApiResponse<()>>)> {
    let mut condition = Condition::all();
    if let Some(action) = &filter.action {
        condition = condition.add(contains_ci(audit_log::Column::Action, action));
    }
    if let Some(user) = &filter.user {
        condition = condition.add(contains_ci(audit_log::Column::Actor, user));
    }

    let paginator = audit_log::Entity::find()
        .filter(condition)
        .order_by_desc(audit_log::Column::CreatedAt)
        .paginate(&state.db, pagination.page_size());

    let total = paginator.num_items().await.map_err(store_error)?;
    let rows = paginator
        .fetch_page(pagination.page_index())
        .await
        .map_err(store_error)?;

    let items: Vec<Value> = rows.iter().map(to_wire).collect();
    Ok(Json(PaginatedResponse::new(
        items,
        total,
        pagination.page,
        pagination.limit,
    )))
}

// Blacklist

#[utoipa::path(
    get,
    path = "/api/v1/settings/blacklist",
    tag = "Settings",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Blacklisted phone numbers, newest first", body = ApiResponse<Value>)
    )
)]
pub async fn list_blacklist(
    State(state): State<SettingsState>,
) -> Result<Json<ApiResponse<Vec<Value>>>, (StatusCode, Json<ApiResponse<Vec<Value>>>)> {
    let rows = blacklist_entry::Entity::find()
        .order_by_desc(blacklist_entry::Column::CreatedAt)
        .all(&state.db)
        .await
        .map_err(store_error)?;

    let items: Vec<Value> = rows.iter().map(to_wire).collect();
    Ok(Json(ApiResponse::success(items)))
}

#[utoipa::path(
    post,
    path = "/api/v1/settings/blacklist",
    tag = "Settings",
    request_body = AddBlacklistRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 201, description = "Phone blacklisted", body = ApiResponse<Value>),
        (status = 409, description = "Already blacklisted")
    )
)]
pub async fn add_blacklist(
    State(state): State<SettingsState>,
    Extension(user): Extension<AuthenticatedUser>,
    Extension(ip): Extension<ClientIp>,
    ValidatedJson(request): ValidatedJson<AddBlacklistRequest>,
) -> Result<(StatusCode, Json<ApiResponse<Value>>), (StatusCode, Json<ApiResponse<Value>>)> {
    let existing = blacklist_entry::Entity::find()
        .filter(blacklist_entry::Column::Phone.eq(&request.phone))
        .one(&state.db)
        .await
        .map_err(store_error)?;
    if existing.is_some() {
        return Err((
            StatusCode::CONFLICT,
            Json(ApiResponse::error("Phone is already blacklisted")),
        ));
    }

    let entry = blacklist_entry::ActiveModel {
        phone: Set(request.phone.clone()),
        reason: Set(request.reason.clone()),
        added_by: Set(Some(user.email.clone())),
        created_at: Set(Utc::now()),
        ..Default::default()
    };

    let created = entry.insert(&state.db).await.map_err(store_error)?;

    audit(
        &state,
        &user,
        &ip,
        "Phone blacklisted",
        format!(
            "{}: {}",
            request.phone,
            request.reason.as_deref().unwrap_or("-")
        ),
    );

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(to_wire(&created))),
    ))
}

#[utoipa::path(
    delete,
    path = "/api/v1/settings/blacklist/{id}",
    tag = "Settings",
    params(("id" = i32, Path, description = "Blacklist entry ID")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Removed from blacklist", body = ApiResponse<String>),
        (status = 404, description = "Not found")
    )
)]
pub async fn remove_blacklist(
    State(state): State<SettingsState>,
    Extension(user): Extension<AuthenticatedUser>,
    Extension(ip): Extension<ClientIp>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<String>>, (StatusCode, Json<ApiResponse<String>>)> {
    let row = blacklist_entry::Entity::find_by_id(id)
        .one(&state.db)
        .await
        .map_err(store_error)?;

    let Some(row) = row else {
        return Err((
            StatusCode::NOT_FOUND,
            Json(ApiResponse::error("Blacklist entry not found")),
        ));
    };

    let phone = row.phone.clone();
    blacklist_entry::Entity::delete_by_id(id)
        .exec(&state.db)
        .await
        .map_err(store_error)?;

    audit(&state, &user, &ip, "Blacklist removed", phone);

    Ok(Json(ApiResponse::success(
        "Removed from blacklist".to_string(),
    )))
}
