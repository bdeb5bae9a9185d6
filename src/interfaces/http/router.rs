//! API Router with Swagger UI

use std::sync::Arc;
use std::time::Instant;

use axum::{
    middleware,
    routing::{delete, get, post, put},
    Router,
};
use sea_orm::DatabaseConnection;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};
use utoipa_swagger_ui::SwaggerUi;

use crate::analytics::overview::{ComplaintTotals, KioskTotals, Overview, TxnTotals};
use crate::analytics::reconcile::StatusGroup;
use crate::infrastructure::crypto::jwt::JwtConfig;
use crate::interfaces::http::common::{ApiResponse, PaginatedResponse, PaginationParams};
use crate::interfaces::http::middleware::{auth_middleware, require_admin, AuthState};

use super::modules::{
    analytics, auth, complaints, departments, health, kiosks, settings, transactions,
};

/// Security scheme modifier for OpenAPI
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("JWT Bearer token"))
                        .build(),
                ),
            );
        }
    }
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        // Health
        health::health_check,
        // Auth
        auth::login,
        auth::register,
        auth::get_current_user,
        auth::change_password,
        auth::list_users,
        auth::update_user,
        auth::delete_user,
        // Analytics
        analytics::get_overview,
        analytics::get_revenue_chart,
        analytics::get_transaction_chart,
        analytics::get_department_stats,
        analytics::get_kiosk_stats,
        analytics::get_behavioral,
        // Transactions
        transactions::list_transactions,
        transactions::get_transaction,
        transactions::get_revenue,
        transactions::reconcile,
        transactions::export_transactions,
        // Kiosks
        kiosks::list_kiosks,
        kiosks::get_kiosk,
        kiosks::create_kiosk,
        kiosks::update_kiosk,
        kiosks::enable_kiosk,
        kiosks::disable_kiosk,
        kiosks::maintenance_kiosk,
        kiosks::force_logout,
        kiosks::restart_kiosk,
        kiosks::push_update,
        kiosks::get_kiosk_stats,
        // Complaints
        complaints::list_complaints,
        complaints::get_complaint,
        complaints::update_status,
        complaints::assign_complaint,
        complaints::escalate_complaint,
        complaints::get_complaint_stats,
        // Departments
        departments::list_departments,
        departments::get_department,
        departments::create_department,
        departments::update_department,
        departments::delete_department,
        departments::enable_department,
        departments::disable_department,
        departments::list_services,
        departments::create_service,
        departments::update_service,
        departments::delete_service,
        // Settings
        settings::get_settings,
        settings::update_settings,
        settings::get_payment_settings,
        settings::update_payment_settings,
        settings::list_audit_logs,
        settings::list_blacklist,
        settings::add_blacklist,
        settings::remove_blacklist,
    ),
    components(
        schemas(
            // Common
            ApiResponse<String>,
            PaginatedResponse<serde_json::Value>,
            PaginationParams,
            // Auth
            auth::LoginRequest,
            auth::LoginResponse,
            auth::UserInfo,
            auth::RegisterRequest,
            auth::ChangePasswordRequest,
            auth::UpdateUserRequest,
            // Analytics
            Overview,
            TxnTotals,
            KioskTotals,
            ComplaintTotals,
            analytics::RevenuePoint,
            analytics::TxnChartPoint,
            analytics::DeptStat,
            analytics::KioskStat,
            analytics::BehavioralMetrics,
            // Transactions
            transactions::RevenueSummary,
            transactions::ReconcileReport,
            StatusGroup,
            // Kiosks
            kiosks::CreateKioskRequest,
            kiosks::UpdateKioskRequest,
            kiosks::KioskStatsResponse,
            // Complaints
            complaints::UpdateStatusRequest,
            complaints::AssignRequest,
            complaints::ComplaintStatusCount,
            // Departments
            departments::CreateDepartmentRequest,
            departments::UpdateDepartmentRequest,
            departments::ServiceRequest,
            departments::UpdateServiceRequest,
            // Settings
            settings::UpdateSettingsRequest,
            settings::PaymentSettings,
            settings::UpdatePaymentRequest,
            settings::AddBlacklistRequest,
            // Health
            health::HealthResponse,
            health::ComponentHealth,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Server health check endpoints"),
        (name = "Authentication", description = "User authentication: login (JWT), registration, password change"),
        (name = "Analytics", description = "Dashboard aggregates: overview cards, charts, rankings"),
        (name = "Transactions", description = "Transaction listing, revenue series, reconciliation, export"),
        (name = "Kiosks", description = "Kiosk fleet management and remote actions"),
        (name = "Complaints", description = "Citizen complaint workflow"),
        (name = "Departments", description = "Department CRUD and the embedded service catalogue"),
        (name = "Settings", description = "Organisation settings, payment config, audit trail, blacklist"),
    ),
    info(
        title = "SUVIDHA Admin API",
        version = "1.0.0",
        description = "REST API for the SUVIDHA kiosk administration dashboard",
        license(name = "MIT"),
        contact(name = "SUVIDHA", email = "support@suvidha.local")
    )
)]
pub struct ApiDoc;

/// Create the API router with all routes
pub fn create_api_router(db: DatabaseConnection, jwt_config: JwtConfig) -> Router {
    let middleware_state = AuthState {
        jwt_config: jwt_config.clone(),
    };

    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let auth_state = auth::AuthHandlerState {
        db: db.clone(),
        jwt_config,
    };

    // Auth routes (public)
    let auth_routes = Router::new()
        .route("/login", post(auth::login))
        .with_state(auth_state.clone());

    // Auth routes (protected); register is admin-only, checked in the
    // handler, and user management is guarded below
    let auth_admin_routes = Router::new()
        .route("/users", get(auth::list_users))
        .route(
            "/users/{id}",
            put(auth::update_user).delete(auth::delete_user),
        )
        .route_layer(middleware::from_fn(require_admin));
    let auth_protected_routes = Router::new()
        .route("/register", post(auth::register))
        .route("/me", get(auth::get_current_user))
        .route("/change-password", put(auth::change_password))
        .merge(auth_admin_routes)
        .layer(middleware::from_fn_with_state(
            middleware_state.clone(),
            auth_middleware,
        ))
        .with_state(auth_state);

    // Analytics routes (protected)
    let analytics_state = analytics::AnalyticsState { db: db.clone() };
    let analytics_routes = Router::new()
        .route("/overview", get(analytics::get_overview))
        .route("/revenue-chart", get(analytics::get_revenue_chart))
        .route("/transaction-chart", get(analytics::get_transaction_chart))
        .route("/departments", get(analytics::get_department_stats))
        .route("/kiosks", get(analytics::get_kiosk_stats))
        .route("/behavioral", get(analytics::get_behavioral))
        .layer(middleware::from_fn_with_state(
            middleware_state.clone(),
            auth_middleware,
        ))
        .with_state(analytics_state);

    // Transaction routes (protected); static segments registered before {id}
    let tx_state = transactions::TransactionState { db: db.clone() };
    let tx_routes = Router::new()
        .route("/", get(transactions::list_transactions))
        .route("/revenue", get(transactions::get_revenue))
        .route("/reconcile", get(transactions::reconcile))
        .route("/export", get(transactions::export_transactions))
        .route("/{id}", get(transactions::get_transaction))
        .layer(middleware::from_fn_with_state(
            middleware_state.clone(),
            auth_middleware,
        ))
        .with_state(tx_state);

    // Kiosk routes (protected); mutations and remote actions are admin-only
    let kiosk_state = kiosks::KioskState { db: db.clone() };
    let kiosk_admin_routes = Router::new()
        .route("/", post(kiosks::create_kiosk))
        .route("/{id}", put(kiosks::update_kiosk))
        .route("/{id}/enable", post(kiosks::enable_kiosk))
        .route("/{id}/disable", post(kiosks::disable_kiosk))
        .route("/{id}/maintenance", post(kiosks::maintenance_kiosk))
        .route("/{id}/force-logout", post(kiosks::force_logout))
        .route("/{id}/restart", post(kiosks::restart_kiosk))
        .route("/{id}/push-update", post(kiosks::push_update))
        .route_layer(middleware::from_fn(require_admin));
    let kiosk_routes = Router::new()
        .route("/", get(kiosks::list_kiosks))
        .route("/{id}", get(kiosks::get_kiosk))
        .route("/{id}/stats", get(kiosks::get_kiosk_stats))
        .merge(kiosk_admin_routes)
        .layer(middleware::from_fn_with_state(
            middleware_state.clone(),
            auth_middleware,
        ))
        .with_state(kiosk_state);

    // Complaint routes (protected)
    let complaint_state = complaints::ComplaintState { db: db.clone() };
    let complaint_routes = Router::new()
        .route("/", get(complaints::list_complaints))
        .route("/stats", get(complaints::get_complaint_stats))
        .route("/{id}", get(complaints::get_complaint))
        .route("/{id}/status", put(complaints::update_status))
        .route("/{id}/assign", put(complaints::assign_complaint))
        .route("/{id}/escalate", post(complaints::escalate_complaint))
        .layer(middleware::from_fn_with_state(
            middleware_state.clone(),
            auth_middleware,
        ))
        .with_state(complaint_state);

    // Department routes (protected); mutations are admin-only
    let department_state = departments::DepartmentState { db: db.clone() };
    let department_admin_routes = Router::new()
        .route("/", post(departments::create_department))
        .route(
            "/{id}",
            put(departments::update_department).delete(departments::delete_department),
        )
        .route("/{id}/enable", post(departments::enable_department))
        .route("/{id}/disable", post(departments::disable_department))
        .route("/{id}/services", post(departments::create_service))
        .route(
            "/{id}/services/{service_id}",
            put(departments::update_service).delete(departments::delete_service),
        )
        .route_layer(middleware::from_fn(require_admin));
    let department_routes = Router::new()
        .route("/", get(departments::list_departments))
        .route("/{id}", get(departments::get_department))
        .route("/{id}/services", get(departments::list_services))
        .merge(department_admin_routes)
        .layer(middleware::from_fn_with_state(
            middleware_state.clone(),
            auth_middleware,
        ))
        .with_state(department_state);

    // Settings routes (protected, entirely admin-only)
    let settings_state = settings::SettingsState { db: db.clone() };
    let settings_routes = Router::new()
        .route(
            "/",
            get(settings::get_settings).put(settings::update_settings),
        )
        .route(
            "/payment",
            get(settings::get_payment_settings).put(settings::update_payment_settings),
        )
        .route("/audit-logs", get(settings::list_audit_logs))
        .route(
            "/blacklist",
            get(settings::list_blacklist).post(settings::add_blacklist),
        )
        .route("/blacklist/{id}", delete(settings::remove_blacklist))
        .route_layer(middleware::from_fn(require_admin))
        .layer(middleware::from_fn_with_state(
            middleware_state,
            auth_middleware,
        ))
        .with_state(settings_state);

    let health_state = health::HealthState {
        db,
        started_at: Arc::new(Instant::now()),
    };

    let swagger_routes = SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi());

    // Build router
    Router::new()
        // Swagger UI
        .merge(swagger_routes)
        // Health
        .route(
            "/health",
            get(health::health_check).with_state(health_state),
        )
        // Auth
        .nest("/api/v1/auth", auth_routes)
        .nest("/api/v1/auth", auth_protected_routes)
        // Analytics
        .nest("/api/v1/analytics", analytics_routes)
        // Transactions
        .nest("/api/v1/transactions", tx_routes)
        // Kiosks
        .nest("/api/v1/kiosks", kiosk_routes)
        // Complaints
        .nest("/api/v1/complaints", complaint_routes)
        // Departments
        .nest("/api/v1/departments", department_routes)
        // Settings
        .nest("/api/v1/settings", settings_routes)
        // Middleware
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn openapi_document_builds() {
        let doc = ApiDoc::openapi();
        let json = doc.to_json().unwrap();
        for path in [
            "/api/v1/auth/users/{id}",
            "/api/v1/kiosks",
            "/api/v1/departments/{id}/services",
            "/api/v1/settings/audit-logs",
            "/api/v1/transactions/export",
        ] {
            assert!(json.contains(path), "missing path {path}");
        }
    }

    #[test]
    fn openapi_declares_bearer_auth() {
        let doc = ApiDoc::openapi();
        let schemes = doc
            .components
            .as_ref()
            .map(|c| c.security_schemes.contains_key("bearer_auth"))
            .unwrap_or(false);
        assert!(schemes);
    }
}
