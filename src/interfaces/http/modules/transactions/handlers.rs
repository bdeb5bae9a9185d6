//! Transaction API handlers

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use sea_orm::{
    ColumnTrait, Condition, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect,
};
use serde_json::Value;

use super::dto::{ReconcileQuery, ReconcileReport, RevenueSummary, TransactionFilter};
use crate::analytics::reconcile::{by_status, day_bounds};
use crate::analytics::{aggregate_by_day, day_key, to_wire, Lookback};
use crate::interfaces::http::common::{
    contains_ci, ApiResponse, PaginatedResponse, PaginationParams,
};
use crate::interfaces::http::modules::analytics::{RangeQuery, RevenuePoint};
use crate::infrastructure::database::entities::transaction;

/// Export row cap, matching the CSV consumer's limit.
const EXPORT_LIMIT: u64 = 5000;

/// Transaction handler state
#[derive(Clone)]
pub struct TransactionState {
    pub db: DatabaseConnection,
}

fn store_error<T>(e: impl std::fmt::Display) -> (StatusCode, Json<ApiResponse<T>>) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ApiResponse::error(e.to_string())),
    )
}

fn filter_condition(filter: &TransactionFilter) -> Condition {
    let mut condition = Condition::all();

    if let Some(status) = &filter.status {
        condition = condition.add(transaction::Column::Status.eq(status));
    }
    if let Some(dept) = &filter.dept {
        condition = condition.add(contains_ci(transaction::Column::DeptName, dept));
    }
    if let Some(kiosk) = &filter.kiosk {
        condition = condition.add(transaction::Column::KioskId.eq(kiosk));
    }
    if let Some(search) = &filter.search {
        condition = condition.add(
            Condition::any()
                .add(contains_ci(transaction::Column::TxnId, search))
                .add(contains_ci(transaction::Column::Account, search))
                .add(contains_ci(transaction::Column::DeptName, search))
                .add(contains_ci(transaction::Column::Service, search)),
        );
    }
    if let Some((start, _)) = filter.date_from.as_deref().and_then(day_bounds) {
        condition = condition.add(transaction::Column::CreatedAt.gte(start));
    }
    if let Some((_, end)) = filter.date_to.as_deref().and_then(day_bounds) {
        condition = condition.add(transaction::Column::CreatedAt.lte(end));
    }

    condition
}

#[utoipa::path(
    get,
    path = "/api/v1/transactions",
    tag = "Transactions",
    params(TransactionFilter, PaginationParams),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Filtered transaction page", body = PaginatedResponse<Value>)
    )
)]
pub async fn list_transactions(
    State(state): State<TransactionState>,
    Query(filter): Query<TransactionFilter>,
    Query(pagination): Query<PaginationParams>,
) -> Result<Json<PaginatedResponse<Value>>, (StatusCode, Json<ApiResponse<()>>)> {
    let paginator = transaction::Entity::find()
        .filter(filter_condition(&filter))
        .order_by_desc(transaction::Column::CreatedAt)
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
    path = "/api/v1/transactions/{id}",
    tag = "Transactions",
    params(("id" = i32, Path, description = "Transaction ID")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Transaction details", body = ApiResponse<Value>),
        (status = 404, description = "Not found")
    )
)]
pub async fn get_transaction(
    State(state): State<TransactionState>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<Value>>, (StatusCode, Json<ApiResponse<Value>>)> {
    match transaction::Entity::find_by_id(id).one(&state.db).await {
        Ok(Some(row)) => Ok(Json(ApiResponse::success(to_wire(&row)))),
        Ok(None) => Err((
            StatusCode::NOT_FOUND,
            Json(ApiResponse::error(format!("Transaction {} not found", id))),
        )),
        Err(e) => Err(store_error(e)),
    }
}

#[utoipa::path(
    get,
    path = "/api/v1/transactions/revenue",
    tag = "Transactions",
    params(RangeQuery),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Daily revenue with totals", body = ApiResponse<RevenueSummary>)
    )
)]
pub async fn get_revenue(
    State(state): State<TransactionState>,
    Query(query): Query<RangeQuery>,
) -> Result<Json<ApiResponse<RevenueSummary>>, (StatusCode, Json<ApiResponse<RevenueSummary>>)> {
    let since = Lookback::parse(query.range.as_deref()).since(Utc::now());

    let rows = transaction::Entity::find()
        .filter(transaction::Column::Status.eq("success"))
        .filter(transaction::Column::CreatedAt.gte(since))
        .all(&state.db)
        .await
        .map_err(store_error)?;

    let data = aggregate_by_day(
        &rows,
        |row| Some(row.created_at),
        |key| RevenuePoint {
            day: key.to_string(),
            revenue: 0.0,
            count: 0,
        },
        |bucket, row| {
            bucket.revenue += row.amount_or_zero();
            bucket.count += 1;
        },
    );

    let summary = RevenueSummary {
        total_revenue: data.iter().map(|b| b.revenue).sum(),
        total_txns: data.iter().map(|b| b.count).sum(),
        data,
    };

    Ok(Json(ApiResponse::success(summary)))
}

#[utoipa::path(
    get,
    path = "/api/v1/transactions/reconcile",
    tag = "Transactions",
    params(ReconcileQuery),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Per-status settlement for one day", body = ApiResponse<ReconcileReport>),
        (status = 400, description = "Invalid date")
    )
)]
pub async fn reconcile(
    State(state): State<TransactionState>,
    Query(query): Query<ReconcileQuery>,
) -> Result<Json<ApiResponse<ReconcileReport>>, (StatusCode, Json<ApiResponse<ReconcileReport>>)> {
    let date = query.date.unwrap_or_else(|| day_key(Utc::now()));
    let Some((start, end)) = day_bounds(&date) else {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(ApiResponse::error("Date must be YYYY-MM-DD")),
        ));
    };

    let rows = transaction::Entity::find()
        .filter(transaction::Column::CreatedAt.gte(start))
        .filter(transaction::Column::CreatedAt.lte(end))
        .all(&state.db)
        .await
        .map_err(store_error)?;

    // Zero rows is a valid, empty report.
    let report = ReconcileReport {
        date,
        summary: by_status(&rows),
    };

    Ok(Json(ApiResponse::success(report)))
}

#[utoipa::path(
    get,
    path = "/api/v1/transactions/export",
    tag = "Transactions",
    params(TransactionFilter),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Filtered rows for CSV export, capped at 5000", body = ApiResponse<Value>)
    )
)]
pub async fn export_transactions(
    State(state): State<TransactionState>,
    Query(filter): Query<TransactionFilter>,
) -> Result<Json<ApiResponse<Vec<Value>>>, (StatusCode, Json<ApiResponse<Vec<Value>>>)> {
    let rows = transaction::Entity::find()
        .filter(filter_condition(&filter))
        .order_by_desc(transaction::Column::CreatedAt)
        .limit(EXPORT_LIMIT)
        .all(&state.db)
        .await
        .map_err(store_error)?;

    let items: Vec<Value> = rows.iter().map(to_wire).collect();
    Ok(Json(ApiResponse::success(items)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::{DbBackend, QueryTrait};

    fn filter(dept: Option<&str>, search: Option<&str>) -> TransactionFilter {
        TransactionFilter {
            status: None,
            dept: dept.map(String::from),
            kiosk: None,
            search: search.map(String::from),
            date_from: None,
            date_to: None,
        }
    }

    fn render(f: &TransactionFilter) -> String {
        transaction::Entity::find()
            .filter(filter_condition(f))
            .build(DbBackend::Postgres)
            .to_string()
    }

    #[test]
    fn dept_filter_ignores_case() {
        let sql = render(&filter(Some("Electricity"), None));
        assert!(sql.contains("ILIKE"), "{sql}");
        assert!(sql.contains("%Electricity%"), "{sql}");
    }

    #[test]
    fn search_spans_columns_case_insensitively() {
        let sql = render(&filter(None, Some("txn")));
        assert_eq!(sql.matches("ILIKE").count(), 4, "{sql}");
        assert!(!sql.contains(" LIKE "), "{sql}");
    }
}
