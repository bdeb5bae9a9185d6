//! Complaint API handlers

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
    AssignRequest, ComplaintFilter, ComplaintStatusCount, UpdateStatusRequest, VALID_STATUSES,
};
use crate::analytics::dimensions::aggregate_with_default;
use crate::analytics::to_wire;
use crate::application::record_audit;
use crate::infrastructure::database::entities::complaint;
use crate::interfaces::http::common::{
    contains_ci, ApiResponse, PaginatedResponse, PaginationParams, ValidatedJson,
};
use crate::interfaces::http::middleware::{AuthenticatedUser, ClientIp};

/// Complaint handler state
#[derive(Clone)]
pub struct ComplaintState {
    pub db: DatabaseConnection,
}

fn store_error<T>(e: impl std::fmt::Display) -> (StatusCode, Json<ApiResponse<T>>) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ApiResponse::error(e.to_string())),
    )
}

async fn find_complaint<T>(
    db: &DatabaseConnection,
    id: i32,
) -> Result<complaint::Model, (StatusCode, Json<ApiResponse<T>>)> {
    complaint::Entity::find_by_id(id)
        .one(db)
        .await
        .map_err(store_error)?
        .ok_or_else(|| {
            (
                StatusCode::NOT_FOUND,
                Json(ApiResponse::error(format!("Complaint {} not found", id))),
            )
        })
}

fn audit(
    state: &ComplaintState,
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
    path = "/api/v1/complaints",
    tag = "Complaints",
    params(ComplaintFilter, PaginationParams),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Filtered complaint page", body = PaginatedResponse<Value>)
    )
)]
pub async fn list_complaints(
    State(state): State<ComplaintState>,
    Query(filter): Query<ComplaintFilter>,
    Query(pagination): Query<PaginationParams>,
) -> Result<Json<PaginatedResponse<Value>>, (StatusCode, Json<ApiResponse<()>>)> {
    let mut condition = Condition::all();
    if let Some(status) = &filter.status {
        condition = condition.add(complaint::Column::Status.eq(status));
    }
    if let Some(priority) = &filter.priority {
        condition = condition.add(complaint::Column::Priority.eq(priority));
    }
    if let Some(dept) = &filter.dept {
        condition = condition.add(contains_ci(complaint::Column::DeptName, dept));
    }
    if let Some(search) = &filter.search {
        condition = condition.add(
            Condition::any()
                .add(contains_ci(complaint::Column::ComplaintId, search))
                .add(contains_ci(complaint::Column::Category, search))
                .add(contains_ci(complaint::Column::Account, search)),
        );
    }

    let paginator = complaint::Entity::find()
        .filter(condition)
        .order_by_desc(complaint::Column::CreatedAt)
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

#[utoipa::path(
    get,
    path = "/api/v1/complaints/{id}",
    tag = "Complaints",
    params(("id" = i32, Path, description = "Complaint ID")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Complaint details", body = ApiResponse<Value>),
        (status = 404, description = "Not found")
    )
)]
pub async fn get_complaint(
    State(state): State<ComplaintState>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<Value>>, (StatusCode, Json<ApiResponse<Value>>)> {
    let row = find_complaint(&state.db, id).await?;
    Ok(Json(ApiResponse::success(to_wire(&row))))
}

#[utoipa::path(
    put,
    path = "/api/v1/complaints/{id}/status",
    tag = "Complaints",
    params(("id" = i32, Path, description = "Complaint ID")),
    request_body = UpdateStatusRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Status updated, history appended", body = ApiResponse<Value>),
        (status = 400, description = "Unknown status"),
        (status = 404, description = "Not found")
    )
)]
pub async fn update_status(
    State(state): State<ComplaintState>,
    Extension(user): Extension<AuthenticatedUser>,
    Extension(ip): Extension<ClientIp>,
    Path(id): Path<i32>,
    ValidatedJson(request): ValidatedJson<UpdateStatusRequest>,
) -> Result<Json<ApiResponse<Value>>, (StatusCode, Json<ApiResponse<Value>>)> {
    if !VALID_STATUSES.contains(&request.status.as_str()) {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(ApiResponse::error("Unknown complaint status")),
        ));
    }

    let row = find_complaint(&state.db, id).await?;
    let old_status = row.status.clone();
    let complaint_ref = row.complaint_id.clone();

    // Append to the status-change trail; a malformed stored value is
    // replaced with a fresh array rather than failing the request.
    let mut history = match &row.history {
        Some(Value::Array(entries)) => entries.clone(),
        _ => Vec::new(),
    };
    history.push(json!({
        "status": request.status,
        "changedBy": user.email,
        "note": request.remarks.clone().unwrap_or_default(),
        "changedAt": Utc::now().to_rfc3339(),
    }));

    let resolution = request.remarks.clone().or_else(|| row.resolution.clone());
    let settled = request.status == "resolved" || request.status == "closed";

    let mut active: complaint::ActiveModel = row.into();
    active.status = Set(request.status.clone());
    active.resolution = Set(resolution);
    active.history = Set(Some(Value::Array(history)));
    if settled {
        active.resolved_at = Set(Some(Utc::now()));
    }
    active.updated_at = Set(Some(Utc::now()));

    let updated = active.update(&state.db).await.map_err(store_error)?;

    audit(
        &state,
        &user,
        &ip,
        "Complaint status updated",
        format!("{}: {} -> {}", complaint_ref, old_status, request.status),
    );

    Ok(Json(ApiResponse::success(to_wire(&updated))))
}

#[utoipa::path(
    put,
    path = "/api/v1/complaints/{id}/assign",
    tag = "Complaints",
    params(("id" = i32, Path, description = "Complaint ID")),
    request_body = AssignRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Assigned, status moved to in_progress", body = ApiResponse<Value>),
        (status = 404, description = "Not found")
    )
)]
pub async fn assign_complaint(
    State(state): State<ComplaintState>,
    Extension(user): Extension<AuthenticatedUser>,
    Extension(ip): Extension<ClientIp>,
    Path(id): Path<i32>,
    ValidatedJson(request): ValidatedJson<AssignRequest>,
) -> Result<Json<ApiResponse<Value>>, (StatusCode, Json<ApiResponse<Value>>)> {
    let row = find_complaint(&state.db, id).await?;
    let complaint_ref = row.complaint_id.clone();

    let mut active: complaint::ActiveModel = row.into();
    active.assigned_to = Set(Some(request.operator_id.clone()));
    active.status = Set("in_progress".to_string());
    active.updated_at = Set(Some(Utc::now()));

    let updated = active.update(&state.db).await.map_err(store_error)?;

    audit(
        &state,
        &user,
        &ip,
        "Complaint assigned",
        format!("{} assigned to {}", complaint_ref, request.operator_id),
    );

    Ok(Json(ApiResponse::success(to_wire(&updated))))
}

#[utoipa::path(
    post,
    path = "/api/v1/complaints/{id}/escalate",
    tag = "Complaints",
    params(("id" = i32, Path, description = "Complaint ID")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Escalated, escalated_at stamped", body = ApiResponse<Value>),
        (status = 404, description = "Not found")
    )
)]
pub async fn escalate_complaint(
    State(state): State<ComplaintState>,
    Extension(user): Extension<AuthenticatedUser>,
    Extension(ip): Extension<ClientIp>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<Value>>, (StatusCode, Json<ApiResponse<Value>>)> {
    let row = find_complaint(&state.db, id).await?;
    let complaint_ref = row.complaint_id.clone();

    let mut active: complaint::ActiveModel = row.into();
    active.status = Set("escalated".to_string());
    active.escalated_at = Set(Some(Utc::now()));
    active.updated_at = Set(Some(Utc::now()));

    let updated = active.update(&state.db).await.map_err(store_error)?;

    audit(
        &state,
        &user,
        &ip,
        "Complaint escalated",
        format!("{} escalated", complaint_ref),
    );

    Ok(Json(ApiResponse::success(to_wire(&updated))))
}

#[utoipa::path(
    get,
    path = "/api/v1/complaints/stats",
    tag = "Complaints",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Complaint counts per status", body = ApiResponse<Vec<ComplaintStatusCount>>)
    )
)]
pub async fn get_complaint_stats(
    State(state): State<ComplaintState>,
) -> Result<
    Json<ApiResponse<Vec<ComplaintStatusCount>>>,
    (StatusCode, Json<ApiResponse<Vec<ComplaintStatusCount>>>),
> {
    let rows = complaint::Entity::find()
        .all(&state.db)
        .await
        .map_err(store_error)?;

    let counts = aggregate_with_default(
        &rows,
        |row| Some(row.status.as_str()),
        "unknown",
        |key| ComplaintStatusCount {
            status: key.to_string(),
            count: 0,
        },
        |group, _| group.count += 1,
    );

    Ok(Json(ApiResponse::success(counts)))
}
