//! Department API handlers
//!
//! Departments embed their service catalogue as a JSON array. Every
//! service carries a `_id` uuid; rows written before that convention
//! get their ids backfilled on read.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};
use serde_json::{json, Map, Value};

use super::dto::{
    CreateDepartmentRequest, ServiceRequest, UpdateDepartmentRequest, UpdateServiceRequest,
};
use crate::analytics::to_wire;
use crate::application::record_audit;
use crate::infrastructure::database::entities::department;
use crate::interfaces::http::common::{ApiResponse, ValidatedJson};
use crate::interfaces::http::middleware::{AuthenticatedUser, ClientIp};

/// Department handler state
#[derive(Clone)]
pub struct DepartmentState {
    pub db: DatabaseConnection,
}

fn store_error<T>(e: impl std::fmt::Display) -> (StatusCode, Json<ApiResponse<T>>) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ApiResponse::error(e.to_string())),
    )
}

fn dept_not_found<T>(id: i32) -> (StatusCode, Json<ApiResponse<T>>) {
    (
        StatusCode::NOT_FOUND,
        Json(ApiResponse::error(format!("Department {} not found", id))),
    )
}

fn service_not_found<T>() -> (StatusCode, Json<ApiResponse<T>>) {
    (
        StatusCode::NOT_FOUND,
        Json(ApiResponse::error("Service not found")),
    )
}

async fn find_department<T>(
    db: &DatabaseConnection,
    id: i32,
) -> Result<department::Model, (StatusCode, Json<ApiResponse<T>>)> {
    department::Entity::find_by_id(id)
        .one(db)
        .await
        .map_err(store_error)?
        .ok_or_else(|| dept_not_found(id))
}

fn services_array(model: &department::Model) -> Vec<Value> {
    match &model.services {
        Value::Array(entries) => entries.clone(),
        _ => Vec::new(),
    }
}

fn service_value(request: &ServiceRequest) -> Value {
    json!({
        "_id": uuid::Uuid::new_v4().to_string(),
        "name": request.name,
        "description": request.description,
        "fee": request.fee,
        "enabled": request.enabled.unwrap_or(true),
    })
}

/// Assign a `_id` to every service missing one. When anything changed,
/// persist the repaired array; on write failure the original row is
/// served unchanged.
async fn backfill_service_ids(db: &DatabaseConnection, model: department::Model) -> department::Model {
    let mut services = services_array(&model);
    let mut changed = false;

    for service in services.iter_mut() {
        if let Value::Object(fields) = service {
            if !fields.contains_key("_id") {
                fields.insert(
                    "_id".to_string(),
                    Value::String(uuid::Uuid::new_v4().to_string()),
                );
                changed = true;
            }
        }
    }

    if !changed {
        return model;
    }

    let repaired = Value::Array(services);
    let mut active: department::ActiveModel = model.clone().into();
    active.services = Set(repaired.clone());
    match active.update(db).await {
        Ok(updated) => updated,
        Err(e) => {
            tracing::warn!("service id backfill failed for department {}: {}", model.id, e);
            model
        }
    }
}

fn audit(
    state: &DepartmentState,
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
    path = "/api/v1/departments",
    tag = "Departments",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "All departments, name ascending", body = ApiResponse<Value>)
    )
)]
pub async fn list_departments(
    State(state): State<DepartmentState>,
) -> Result<Json<ApiResponse<Vec<Value>>>, (StatusCode, Json<ApiResponse<Vec<Value>>>)> {
    let rows = department::Entity::find()
        .order_by_asc(department::Column::Name)
        .all(&state.db)
        .await
        .map_err(store_error)?;

    let mut items = Vec::with_capacity(rows.len());
    for row in rows {
        let repaired = backfill_service_ids(&state.db, row).await;
        items.push(to_wire(&repaired));
    }

    Ok(Json(ApiResponse::success(items)))
}

#[utoipa::path(
    get,
    path = "/api/v1/departments/{id}",
    tag = "Departments",
    params(("id" = i32, Path, description = "Department ID")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Department details", body = ApiResponse<Value>),
        (status = 404, description = "Not found")
    )
)]
pub async fn get_department(
    State(state): State<DepartmentState>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<Value>>, (StatusCode, Json<ApiResponse<Value>>)> {
    let row = find_department(&state.db, id).await?;
    let repaired = backfill_service_ids(&state.db, row).await;
    Ok(Json(ApiResponse::success(to_wire(&repaired))))
}

#[utoipa::path(
    post,
    path = "/api/v1/departments",
    tag = "Departments",
    request_body = CreateDepartmentRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 201, description = "Department created", body = ApiResponse<Value>),
        (status = 409, description = "Name already exists")
    )
)]
pub async fn create_department(
    State(state): State<DepartmentState>,
    Extension(user): Extension<AuthenticatedUser>,
    Extension(ip): Extension<ClientIp>,
    ValidatedJson(request): ValidatedJson<CreateDepartmentRequest>,
) -> Result<(StatusCode, Json<ApiResponse<Value>>), (StatusCode, Json<ApiResponse<Value>>)> {
    let existing = department::Entity::find()
        .filter(department::Column::Name.eq(&request.name))
        .one(&state.db)
        .await
        .map_err(store_error)?;
    if existing.is_some() {
        return Err((
            StatusCode::CONFLICT,
            Json(ApiResponse::error("Department name already exists")),
        ));
    }

    let services: Vec<Value> = request
        .services
        .unwrap_or_default()
        .iter()
        .map(service_value)
        .collect();

    let new_dept = department::ActiveModel {
        name: Set(request.name.clone()),
        description: Set(request.description),
        enabled: Set(request.enabled.unwrap_or(true)),
        services: Set(Value::Array(services)),
        created_at: Set(Utc::now()),
        updated_at: Set(None),
        ..Default::default()
    };

    let created = new_dept.insert(&state.db).await.map_err(store_error)?;

    audit(
        &state,
        &user,
        &ip,
        "Department created",
        format!("Created: {}", created.name),
    );

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(to_wire(&created))),
    ))
}

#[utoipa::path(
    put,
    path = "/api/v1/departments/{id}",
    tag = "Departments",
    params(("id" = i32, Path, description = "Department ID")),
    request_body = UpdateDepartmentRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Department updated", body = ApiResponse<Value>),
        (status = 404, description = "Not found")
    )
)]
pub async fn update_department(
    State(state): State<DepartmentState>,
    Extension(user): Extension<AuthenticatedUser>,
    Extension(ip): Extension<ClientIp>,
    Path(id): Path<i32>,
    ValidatedJson(request): ValidatedJson<UpdateDepartmentRequest>,
) -> Result<Json<ApiResponse<Value>>, (StatusCode, Json<ApiResponse<Value>>)> {
    let row = find_department(&state.db, id).await?;
    let mut active: department::ActiveModel = row.into();

    if let Some(name) = request.name {
        active.name = Set(name);
    }
    if let Some(description) = request.description {
        active.description = Set(Some(description));
    }
    if let Some(enabled) = request.enabled {
        active.enabled = Set(enabled);
    }
    active.updated_at = Set(Some(Utc::now()));

    let updated = active.update(&state.db).await.map_err(store_error)?;

    audit(
        &state,
        &user,
        &ip,
        "Department updated",
        format!("Updated: {}", updated.name),
    );

    Ok(Json(ApiResponse::success(to_wire(&updated))))
}

#[utoipa::path(
    delete,
    path = "/api/v1/departments/{id}",
    tag = "Departments",
    params(("id" = i32, Path, description = "Department ID")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Department deleted", body = ApiResponse<String>),
        (status = 404, description = "Not found")
    )
)]
pub async fn delete_department(
    State(state): State<DepartmentState>,
    Extension(user): Extension<AuthenticatedUser>,
    Extension(ip): Extension<ClientIp>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<String>>, (StatusCode, Json<ApiResponse<String>>)> {
    let row = find_department(&state.db, id).await?;
    let name = row.name.clone();

    department::Entity::delete_by_id(id)
        .exec(&state.db)
        .await
        .map_err(store_error)?;

    audit(
        &state,
        &user,
        &ip,
        "Department deleted",
        format!("Deleted: {}", name),
    );

    Ok(Json(ApiResponse::success("Department deleted".to_string())))
}

async fn set_enabled(
    state: &DepartmentState,
    user: &AuthenticatedUser,
    ip: &ClientIp,
    id: i32,
    enabled: bool,
) -> Result<Json<ApiResponse<Value>>, (StatusCode, Json<ApiResponse<Value>>)> {
    let row = find_department(&state.db, id).await?;
    let mut active: department::ActiveModel = row.into();
    active.enabled = Set(enabled);
    active.updated_at = Set(Some(Utc::now()));

    let updated = active.update(&state.db).await.map_err(store_error)?;

    let action = if enabled {
        "Department enabled"
    } else {
        "Department disabled"
    };
    audit(state, user, ip, action, updated.name.clone());

    Ok(Json(ApiResponse::success(to_wire(&updated))))
}

#[utoipa::path(
    post,
    path = "/api/v1/departments/{id}/enable",
    tag = "Departments",
    params(("id" = i32, Path, description = "Department ID")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Department enabled", body = ApiResponse<Value>),
        (status = 404, description = "Not found")
    )
)]
pub async fn enable_department(
    State(state): State<DepartmentState>,
    Extension(user): Extension<AuthenticatedUser>,
    Extension(ip): Extension<ClientIp>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<Value>>, (StatusCode, Json<ApiResponse<Value>>)> {
    set_enabled(&state, &user, &ip, id, true).await
}

#[utoipa::path(
    post,
    path = "/api/v1/departments/{id}/disable",
    tag = "Departments",
    params(("id" = i32, Path, description = "Department ID")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Department disabled", body = ApiResponse<Value>),
        (status = 404, description = "Not found")
    )
)]
pub async fn disable_department(
    State(state): State<DepartmentState>,
    Extension(user): Extension<AuthenticatedUser>,
    Extension(ip): Extension<ClientIp>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<Value>>, (StatusCode, Json<ApiResponse<Value>>)> {
    set_enabled(&state, &user, &ip, id, false).await
}

// Service catalogue

#[utoipa::path(
    get,
    path = "/api/v1/departments/{id}/services",
    tag = "Departments",
    params(("id" = i32, Path, description = "Department ID")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Service catalogue", body = ApiResponse<Value>),
        (status = 404, description = "Not found")
    )
)]
pub async fn list_services(
    State(state): State<DepartmentState>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<Vec<Value>>>, (StatusCode, Json<ApiResponse<Vec<Value>>>)> {
    let row = find_department(&state.db, id).await?;
    let repaired = backfill_service_ids(&state.db, row).await;
    Ok(Json(ApiResponse::success(services_array(&repaired))))
}

#[utoipa::path(
    post,
    path = "/api/v1/departments/{id}/services",
    tag = "Departments",
    params(("id" = i32, Path, description = "Department ID")),
    request_body = ServiceRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 201, description = "Service added", body = ApiResponse<Value>),
        (status = 404, description = "Not found")
    )
)]
pub async fn create_service(
    State(state): State<DepartmentState>,
    Extension(user): Extension<AuthenticatedUser>,
    Extension(ip): Extension<ClientIp>,
    Path(id): Path<i32>,
    ValidatedJson(request): ValidatedJson<ServiceRequest>,
) -> Result<(StatusCode, Json<ApiResponse<Value>>), (StatusCode, Json<ApiResponse<Value>>)> {
    let row = find_department(&state.db, id).await?;
    let dept_name = row.name.clone();

    let new_service = service_value(&request);
    let mut services = services_array(&row);
    services.push(new_service.clone());

    let mut active: department::ActiveModel = row.into();
    active.services = Set(Value::Array(services));
    active.updated_at = Set(Some(Utc::now()));
    active.update(&state.db).await.map_err(store_error)?;

    audit(
        &state,
        &user,
        &ip,
        "Service added",
        format!("{}: {}", dept_name, request.name),
    );

    Ok((StatusCode::CREATED, Json(ApiResponse::success(new_service))))
}

fn merge_service(fields: &mut Map<String, Value>, request: &UpdateServiceRequest) {
    if let Some(name) = &request.name {
        fields.insert("name".to_string(), Value::String(name.clone()));
    }
    if let Some(description) = &request.description {
        fields.insert("description".to_string(), Value::String(description.clone()));
    }
    if let Some(fee) = request.fee {
        fields.insert("fee".to_string(), json!(fee));
    }
    if let Some(enabled) = request.enabled {
        fields.insert("enabled".to_string(), Value::Bool(enabled));
    }
}

#[utoipa::path(
    put,
    path = "/api/v1/departments/{id}/services/{service_id}",
    tag = "Departments",
    params(
        ("id" = i32, Path, description = "Department ID"),
        ("service_id" = String, Path, description = "Service ID")
    ),
    request_body = UpdateServiceRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Service updated", body = ApiResponse<Value>),
        (status = 404, description = "Department or service not found")
    )
)]
pub async fn update_service(
    State(state): State<DepartmentState>,
    Extension(user): Extension<AuthenticatedUser>,
    Extension(ip): Extension<ClientIp>,
    Path((id, service_id)): Path<(i32, String)>,
    ValidatedJson(request): ValidatedJson<UpdateServiceRequest>,
) -> Result<Json<ApiResponse<Value>>, (StatusCode, Json<ApiResponse<Value>>)> {
    let row = find_department(&state.db, id).await?;
    let dept_name = row.name.clone();

    let mut services = services_array(&row);
    let slot = services
        .iter_mut()
        .find(|s| s.get("_id").and_then(Value::as_str) == Some(service_id.as_str()))
        .ok_or_else(service_not_found)?;

    if let Value::Object(fields) = slot {
        merge_service(fields, &request);
    }
    let updated_service = slot.clone();

    let mut active: department::ActiveModel = row.into();
    active.services = Set(Value::Array(services));
    active.updated_at = Set(Some(Utc::now()));
    active.update(&state.db).await.map_err(store_error)?;

    audit(
        &state,
        &user,
        &ip,
        "Service updated",
        format!("{}: {}", dept_name, service_id),
    );

    Ok(Json(ApiResponse::success(updated_service)))
}

#[utoipa::path(
    delete,
    path = "/api/v1/departments/{id}/services/{service_id}",
    tag = "Departments",
    params(
        ("id" = i32, Path, description = "Department ID"),
        ("service_id" = String, Path, description = "Service ID")
    ),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Service removed", body = ApiResponse<String>),
        (status = 404, description = "Department or service not found")
    )
)]
pub async fn delete_service(
    State(state): State<DepartmentState>,
    Extension(user): Extension<AuthenticatedUser>,
    Extension(ip): Extension<ClientIp>,
    Path((id, service_id)): Path<(i32, String)>,
) -> Result<Json<ApiResponse<String>>, (StatusCode, Json<ApiResponse<String>>)> {
    let row = find_department(&state.db, id).await?;
    let dept_name = row.name.clone();

    let services = services_array(&row);
    let remaining: Vec<Value> = services
        .iter()
        .filter(|s| s.get("_id").and_then(Value::as_str) != Some(service_id.as_str()))
        .cloned()
        .collect();
    if remaining.len() == services.len() {
        return Err(service_not_found());
    }

    let mut active: department::ActiveModel = row.into();
    active.services = Set(Value::Array(remaining));
    active.updated_at = Set(Some(Utc::now()));
    active.update(&state.db).await.map_err(store_error)?;

    audit(
        &state,
        &user,
        &ip,
        "Service removed",
        format!("{}: {}", dept_name, service_id),
    );

    Ok(Json(ApiResponse::success("Service deleted".to_string())))
}
