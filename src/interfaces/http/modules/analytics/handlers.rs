//! Analytics API handlers
//!
//! Each endpoint fetches a row snapshot and runs it through the pure
//! aggregators in [`crate::analytics`]. No aggregation state survives
//! the request.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter};

use super::dto::{
    BehavioralMetrics, DeptStat, KioskStat, RangeQuery, RevenuePoint, TxnChartPoint,
};
use crate::analytics::overview::FetchError;
use crate::analytics::{aggregate_by_day, aggregate_by_dimension, rate, Lookback, Overview};
use crate::infrastructure::database::entities::{complaint, kiosk, transaction};
use crate::interfaces::http::common::ApiResponse;

/// Analytics state
#[derive(Clone)]
pub struct AnalyticsState {
    pub db: DatabaseConnection,
}

fn store_error<T>(e: impl std::fmt::Display) -> (StatusCode, Json<ApiResponse<T>>) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ApiResponse::error(e.to_string())),
    )
}

#[utoipa::path(
    get,
    path = "/api/v1/analytics/overview",
    tag = "Analytics",
    params(RangeQuery),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Dashboard snapshot", body = ApiResponse<Overview>),
        (status = 500, description = "A fetch failed")
    )
)]
pub async fn get_overview(
    State(state): State<AnalyticsState>,
    Query(query): Query<RangeQuery>,
) -> Result<Json<ApiResponse<Overview>>, (StatusCode, Json<ApiResponse<Overview>>)> {
    let since = Lookback::parse(query.range.as_deref()).since(Utc::now());

    // Three independent snapshots, first failure wins. In-flight
    // siblings are not cancelled, their results are discarded.
    let txns = async {
        transaction::Entity::find()
            .filter(transaction::Column::CreatedAt.gte(since))
            .all(&state.db)
            .await
            .map_err(|e| FetchError::new("transactions", e))
    };
    let kiosks = async {
        kiosk::Entity::find()
            .all(&state.db)
            .await
            .map_err(|e| FetchError::new("kiosks", e))
    };
    let complaints = async {
        complaint::Entity::find()
            .filter(complaint::Column::CreatedAt.gte(since))
            .all(&state.db)
            .await
            .map_err(|e| FetchError::new("complaints", e))
    };

    let (txns, kiosks, complaints) =
        tokio::try_join!(txns, kiosks, complaints).map_err(store_error)?;

    let snapshot = Overview::compose(&txns, &kiosks, &complaints);
    Ok(Json(ApiResponse::success(snapshot)))
}

#[utoipa::path(
    get,
    path = "/api/v1/analytics/revenue-chart",
    tag = "Analytics",
    params(RangeQuery),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Daily revenue buckets, ascending", body = ApiResponse<Vec<RevenuePoint>>)
    )
)]
pub async fn get_revenue_chart(
    State(state): State<AnalyticsState>,
    Query(query): Query<RangeQuery>,
) -> Result<Json<ApiResponse<Vec<RevenuePoint>>>, (StatusCode, Json<ApiResponse<Vec<RevenuePoint>>>)>
{
    let since = Lookback::parse(query.range.as_deref()).since(Utc::now());

    let rows = transaction::Entity::find()
        .filter(transaction::Column::Status.eq("success"))
        .filter(transaction::Column::CreatedAt.gte(since))
        .all(&state.db)
        .await
        .map_err(store_error)?;

    let buckets = aggregate_by_day(
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

    Ok(Json(ApiResponse::success(buckets)))
}

#[utoipa::path(
    get,
    path = "/api/v1/analytics/transaction-chart",
    tag = "Analytics",
    params(RangeQuery),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Daily outcome buckets, ascending", body = ApiResponse<Vec<TxnChartPoint>>)
    )
)]
pub async fn get_transaction_chart(
    State(state): State<AnalyticsState>,
    Query(query): Query<RangeQuery>,
) -> Result<
    Json<ApiResponse<Vec<TxnChartPoint>>>,
    (StatusCode, Json<ApiResponse<Vec<TxnChartPoint>>>),
> {
    let since = Lookback::parse(query.range.as_deref()).since(Utc::now());

    let rows = transaction::Entity::find()
        .filter(transaction::Column::CreatedAt.gte(since))
        .all(&state.db)
        .await
        .map_err(store_error)?;

    let buckets = aggregate_by_day(
        &rows,
        |row| Some(row.created_at),
        |key| TxnChartPoint {
            day: key.to_string(),
            total: 0,
            success: 0,
            failed: 0,
        },
        |bucket, row| {
            bucket.total += 1;
            match row.status.as_deref() {
                Some("success") => bucket.success += 1,
                Some("failed") => bucket.failed += 1,
                _ => {}
            }
        },
    );

    Ok(Json(ApiResponse::success(buckets)))
}

#[utoipa::path(
    get,
    path = "/api/v1/analytics/departments",
    tag = "Analytics",
    params(RangeQuery),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Per-department totals, revenue descending", body = ApiResponse<Vec<DeptStat>>)
    )
)]
pub async fn get_department_stats(
    State(state): State<AnalyticsState>,
    Query(query): Query<RangeQuery>,
) -> Result<Json<ApiResponse<Vec<DeptStat>>>, (StatusCode, Json<ApiResponse<Vec<DeptStat>>>)> {
    let since = Lookback::parse(query.range.as_deref()).since(Utc::now());

    let rows = transaction::Entity::find()
        .filter(transaction::Column::CreatedAt.gte(since))
        .all(&state.db)
        .await
        .map_err(store_error)?;

    let mut groups = aggregate_by_dimension(
        &rows,
        |row| row.dept_name.as_deref(),
        |key| DeptStat {
            name: key.to_string(),
            txns: 0,
            revenue: 0.0,
            success: 0,
            success_rate: 0.0,
        },
        |group, row| {
            group.txns += 1;
            if row.is_success() {
                group.success += 1;
                group.revenue += row.amount_or_zero();
            }
        },
    );

    for group in &mut groups {
        group.success_rate = rate(group.success, group.txns);
    }
    groups.sort_by(|a, b| b.revenue.total_cmp(&a.revenue));

    Ok(Json(ApiResponse::success(groups)))
}

#[utoipa::path(
    get,
    path = "/api/v1/analytics/kiosks",
    tag = "Analytics",
    params(RangeQuery),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Top 10 kiosks by sessions", body = ApiResponse<Vec<KioskStat>>)
    )
)]
pub async fn get_kiosk_stats(
    State(state): State<AnalyticsState>,
    Query(query): Query<RangeQuery>,
) -> Result<Json<ApiResponse<Vec<KioskStat>>>, (StatusCode, Json<ApiResponse<Vec<KioskStat>>>)> {
    let since = Lookback::parse(query.range.as_deref()).since(Utc::now());

    let rows = transaction::Entity::find()
        .filter(transaction::Column::CreatedAt.gte(since))
        .all(&state.db)
        .await
        .map_err(store_error)?;

    let mut groups = aggregate_by_dimension(
        &rows,
        |row| row.kiosk_id.as_deref(),
        |key| KioskStat {
            kiosk_id: key.to_string(),
            sessions: 0,
            revenue: 0.0,
        },
        |group, row| {
            group.sessions += 1;
            if row.is_success() {
                group.revenue += row.amount_or_zero();
            }
        },
    );

    // stable sort keeps insertion order for session ties
    groups.sort_by(|a, b| b.sessions.cmp(&a.sessions));
    groups.truncate(10);

    Ok(Json(ApiResponse::success(groups)))
}

#[utoipa::path(
    get,
    path = "/api/v1/analytics/behavioral",
    tag = "Analytics",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Whole-table conversion and failure rates", body = ApiResponse<BehavioralMetrics>)
    )
)]
pub async fn get_behavioral(
    State(state): State<AnalyticsState>,
) -> Result<Json<ApiResponse<BehavioralMetrics>>, (StatusCode, Json<ApiResponse<BehavioralMetrics>>)>
{
    let total = async {
        transaction::Entity::find()
            .count(&state.db)
            .await
            .map_err(|e| FetchError::new("transaction count", e))
    };
    let success = async {
        transaction::Entity::find()
            .filter(transaction::Column::Status.eq("success"))
            .count(&state.db)
            .await
            .map_err(|e| FetchError::new("success count", e))
    };

    let (total, success) = tokio::try_join!(total, success).map_err(store_error)?;

    Ok(Json(ApiResponse::success(BehavioralMetrics::from_counts(
        success, total,
    ))))
}
