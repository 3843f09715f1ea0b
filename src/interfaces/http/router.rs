//! API Router with Swagger UI

use std::sync::Arc;
use std::time::Instant;

use axum::{
    extract::FromRef,
    middleware,
    routing::{get, post},
    Router,
};
use metrics_exporter_prometheus::PrometheusHandle;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};
use utoipa_swagger_ui::SwaggerUi;

use crate::application::{AvailabilityResolver, ReservationLifecycle, TableCatalog};
use crate::domain::RepositoryProvider;
use crate::shared::clock::Clock;

use super::common::ApiResponse;
use super::middleware::identity_middleware;
use super::modules::health::{self, HealthState};
use super::modules::metrics::{self as metrics_api, http_metrics_middleware, MetricsState};
use super::modules::request_id::request_id_middleware;
use super::modules::reservations::{self, ReservationAppState};
use super::modules::tables::{self, TablesState};

/// Unified state for every route; handlers pick their slice via `FromRef`.
#[derive(Clone)]
pub struct ApiState {
    pub repos: Arc<dyn RepositoryProvider>,
    pub catalog: Arc<TableCatalog>,
    pub availability: Arc<AvailabilityResolver>,
    pub lifecycle: Arc<ReservationLifecycle>,
    pub clock: Arc<dyn Clock>,
    pub prometheus: PrometheusHandle,
    pub started_at: Arc<Instant>,
}

impl ApiState {
    pub fn new(
        repos: Arc<dyn RepositoryProvider>,
        clock: Arc<dyn Clock>,
        prometheus: PrometheusHandle,
    ) -> Self {
        Self {
            catalog: Arc::new(TableCatalog::new(repos.clone())),
            availability: Arc::new(AvailabilityResolver::new(repos.clone())),
            lifecycle: Arc::new(ReservationLifecycle::new(repos.clone())),
            repos,
            clock,
            prometheus,
            started_at: Arc::new(Instant::now()),
        }
    }
}

// -- FromRef implementations so each handler keeps its own State<T> extractor --

impl FromRef<ApiState> for TablesState {
    fn from_ref(s: &ApiState) -> Self {
        TablesState {
            catalog: Arc::clone(&s.catalog),
            availability: Arc::clone(&s.availability),
        }
    }
}

impl FromRef<ApiState> for ReservationAppState {
    fn from_ref(s: &ApiState) -> Self {
        ReservationAppState {
            lifecycle: Arc::clone(&s.lifecycle),
            clock: Arc::clone(&s.clock),
        }
    }
}

impl FromRef<ApiState> for HealthState {
    fn from_ref(s: &ApiState) -> Self {
        HealthState {
            repos: Arc::clone(&s.repos),
            started_at: Arc::clone(&s.started_at),
        }
    }
}

impl FromRef<ApiState> for MetricsState {
    fn from_ref(s: &ApiState) -> Self {
        MetricsState {
            handle: s.prometheus.clone(),
        }
    }
}

/// Security scheme modifier for OpenAPI
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "user_id",
                SecurityScheme::ApiKey(ApiKey::Header(ApiKeyValue::with_description(
                    "X-User-Id",
                    "Authenticated diner's UUID, set by the upstream gateway",
                ))),
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
        // Tables
        tables::list_tables,
        tables::list_tables_by_zone,
        tables::get_availability,
        // Reservations
        reservations::create_reservation,
        reservations::list_my_reservations,
        reservations::get_dashboard,
        reservations::get_reservation,
        reservations::cancel_reservation,
    ),
    components(
        schemas(
            // Common
            ApiResponse<String>,
            // Health
            health::HealthResponse,
            health::ComponentHealth,
            // Tables
            tables::TableDto,
            tables::ZoneGroupDto,
            tables::AvailabilityDto,
            tables::TableAvailabilityDto,
            tables::ZoneAvailabilityDto,
            // Reservations
            reservations::CreateReservationRequest,
            reservations::ReservationDto,
            reservations::ReservationCardDto,
            reservations::MyReservationsDto,
            reservations::SummaryDto,
            reservations::DashboardDto,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Server health check endpoints"),
        (name = "Tables", description = "Table catalog, zones and slot availability"),
        (name = "Reservations", description = "Booking, listing and cancelling the caller's reservations"),
    ),
    info(
        title = "Tablebook Reservation API",
        version = "1.0.0",
        description = "REST API for booking restaurant tables at fixed time slots",
        license(name = "MIT")
    )
)]
pub struct ApiDoc;

/// Create the API router with all routes
pub fn create_api_router(state: ApiState) -> Router {
    // Catalog routes (public)
    let catalog_routes = Router::new()
        .route("/api/v1/tables", get(tables::list_tables))
        .route("/api/v1/tables/zones", get(tables::list_tables_by_zone))
        .route("/api/v1/availability", get(tables::get_availability));

    // Reservation routes (caller identity required)
    let reservation_routes = Router::new()
        .route(
            "/api/v1/reservations",
            get(reservations::list_my_reservations).post(reservations::create_reservation),
        )
        .route("/api/v1/reservations/summary", get(reservations::get_dashboard))
        .route(
            "/api/v1/reservations/{reservation_id}",
            get(reservations::get_reservation),
        )
        .route(
            "/api/v1/reservations/{reservation_id}/cancel",
            post(reservations::cancel_reservation),
        )
        .route_layer(middleware::from_fn(identity_middleware));

    let swagger_routes = SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi());

    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health::health_check))
        .route("/metrics", get(metrics_api::prometheus_metrics))
        .merge(catalog_routes)
        .merge(reservation_routes)
        .route_layer(middleware::from_fn(http_metrics_middleware))
        .merge(swagger_routes)
        .layer(middleware::from_fn(request_id_middleware))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use chrono::{NaiveDate, NaiveDateTime};
    use metrics_exporter_prometheus::PrometheusBuilder;
    use serde_json::{json, Value};
    use tower::ServiceExt;
    use uuid::Uuid;

    use super::*;
    use crate::domain::{Table, Zone};
    use crate::infrastructure::InMemoryRepositoryProvider;
    use crate::shared::clock::FixedClock;

    struct TestApp {
        router: Router,
        store: Arc<InMemoryRepositoryProvider>,
        garden: Table,
    }

    fn morning() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 6, 1)
            .unwrap()
            .and_hms_opt(9, 0, 0)
            .unwrap()
    }

    fn app() -> TestApp {
        let garden = Table::new(12, 4, Zone::GardenSection);
        let store = Arc::new(InMemoryRepositoryProvider::with_tables([
            Table::new(1, 2, Zone::WindowView),
            Table::new(5, 4, Zone::MainHall),
            garden.clone(),
        ]));
        let state = ApiState::new(
            store.clone(),
            Arc::new(FixedClock(morning())),
            PrometheusBuilder::new().build_recorder().handle(),
        );
        TestApp {
            router: create_api_router(state),
            store,
            garden,
        }
    }

    async fn send(
        router: &Router,
        method: &str,
        uri: &str,
        user: Option<Uuid>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut req = Request::builder().method(method).uri(uri);
        if let Some(user) = user {
            req = req.header("x-user-id", user.to_string());
        }
        let req = match body {
            Some(body) => req
                .header("content-type", "application/json")
                .body(Body::from(serde_json::to_vec(&body).unwrap())),
            None => req.body(Body::empty()),
        }
        .unwrap();

        let resp = router.clone().oneshot(req).await.unwrap();
        let status = resp.status();
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, json)
    }

    fn booking(table_id: Uuid, time: &str, guests: i32) -> Value {
        json!({
            "table_id": table_id,
            "date": "2024-06-01",
            "time": time,
            "guest_count": guests,
            "special_requests": "  by the fountain  "
        })
    }

    #[tokio::test]
    async fn tables_are_listed_in_number_order() {
        let app = app();
        let (status, body) = send(&app.router, "GET", "/api/v1/tables", None, None).await;
        assert_eq!(status, StatusCode::OK);
        let numbers: Vec<i64> = body["data"]
            .as_array()
            .unwrap()
            .iter()
            .map(|t| t["number"].as_i64().unwrap())
            .collect();
        assert_eq!(numbers, vec![1, 5, 12]);
        assert_eq!(body["data"][2]["location"], "Garden Section");
    }

    #[tokio::test]
    async fn zones_follow_display_order() {
        let app = app();
        let (_, body) = send(&app.router, "GET", "/api/v1/tables/zones", None, None).await;
        let zones: Vec<&str> = body["data"]
            .as_array()
            .unwrap()
            .iter()
            .map(|g| g["zone"].as_str().unwrap())
            .collect();
        assert_eq!(zones, vec!["Window View", "Main Hall", "Garden Section"]);
    }

    #[tokio::test]
    async fn availability_without_time_is_unknown() {
        let app = app();
        let (status, body) = send(
            &app.router,
            "GET",
            "/api/v1/availability?date=2024-06-01",
            None,
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"], json!({ "known": false }));
    }

    #[tokio::test]
    async fn availability_rejects_unknown_slot() {
        let app = app();
        let (status, _) = send(
            &app.router,
            "GET",
            "/api/v1/availability?date=2024-06-01&time=15:00",
            None,
            None,
        )
        .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn booking_conflict_cancel_rebook_flow() {
        let app = app();
        let alice = Uuid::new_v4();
        let bob = Uuid::new_v4();

        let (status, body) = send(
            &app.router,
            "POST",
            "/api/v1/reservations",
            Some(alice),
            Some(booking(app.garden.id, "19:00", 2)),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["data"]["status"], "confirmed");
        assert_eq!(body["data"]["special_requests"], "by the fountain");
        let reservation_id = body["data"]["id"].as_str().unwrap().to_string();

        let (status, body) = send(
            &app.router,
            "POST",
            "/api/v1/reservations",
            Some(bob),
            Some(booking(app.garden.id, "19:00", 2)),
        )
        .await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["success"], false);

        let (_, body) = send(
            &app.router,
            "GET",
            "/api/v1/availability?date=2024-06-01&time=19:00",
            None,
            None,
        )
        .await;
        assert_eq!(body["data"]["known"], true);
        assert_eq!(body["data"]["available"], 2);
        assert_eq!(body["data"]["service"], "Dinner");

        let cancel_uri = format!("/api/v1/reservations/{}/cancel", reservation_id);
        let (status, _) = send(&app.router, "POST", &cancel_uri, Some(bob), None).await;
        assert_eq!(status, StatusCode::FORBIDDEN);

        let (status, body) = send(&app.router, "POST", &cancel_uri, Some(alice), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["status"], "cancelled");

        let (status, _) = send(&app.router, "POST", &cancel_uri, Some(alice), None).await;
        assert_eq!(status, StatusCode::CONFLICT);

        let (status, _) = send(
            &app.router,
            "POST",
            "/api/v1/reservations",
            Some(bob),
            Some(booking(app.garden.id, "19:00", 2)),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    #[tokio::test]
    async fn invalid_bookings_are_unprocessable() {
        let app = app();
        let user = Uuid::new_v4();

        for body in [
            booking(app.garden.id, "19:00", 0),
            booking(app.garden.id, "15:00", 2),
            booking(Uuid::new_v4(), "19:00", 2),
            json!({ "table_id": app.garden.id, "time": "19:00", "guest_count": 2 }),
        ] {
            let (status, resp) =
                send(&app.router, "POST", "/api/v1/reservations", Some(user), Some(body)).await;
            assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY, "{resp}");
        }
    }

    #[tokio::test]
    async fn reservations_require_identity() {
        let app = app();
        let (status, _) = send(&app.router, "GET", "/api/v1/reservations", None, None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let req = Request::builder()
            .uri("/api/v1/reservations")
            .header("x-user-id", "table-12")
            .body(Body::empty())
            .unwrap();
        let resp = app.router.clone().oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn unknown_reservation_is_not_found() {
        let app = app();
        let uri = format!("/api/v1/reservations/{}", Uuid::new_v4());
        let (status, _) = send(&app.router, "GET", &uri, Some(Uuid::new_v4()), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn listing_and_summary_reflect_bookings() {
        let app = app();
        let user = Uuid::new_v4();
        for time in ["12:00", "19:00"] {
            send(
                &app.router,
                "POST",
                "/api/v1/reservations",
                Some(user),
                Some(booking(app.garden.id, time, 2)),
            )
            .await;
        }

        let (status, body) = send(&app.router, "GET", "/api/v1/reservations", Some(user), None).await;
        assert_eq!(status, StatusCode::OK);
        let upcoming = body["data"]["upcoming"].as_array().unwrap();
        assert_eq!(upcoming.len(), 2);
        assert_eq!(upcoming[0]["reservation"]["time"], "19:00");
        assert_eq!(upcoming[0]["table"]["number"], 12);
        assert_eq!(upcoming[0]["can_cancel"], true);

        let (_, body) = send(
            &app.router,
            "GET",
            "/api/v1/reservations/summary",
            Some(user),
            None,
        )
        .await;
        assert_eq!(
            body["data"]["summary"],
            json!({ "total": 2, "upcoming_count": 2, "completed_count": 0 })
        );
        assert_eq!(body["data"]["next"][0]["reservation"]["time"], "12:00");

        let (status, _) = send(
            &app.router,
            "GET",
            "/api/v1/reservations/summary?limit=0",
            Some(user),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn store_outage_is_service_unavailable() {
        let app = app();
        app.store.set_offline(true);

        let (status, body) = send(&app.router, "GET", "/api/v1/tables", None, None).await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert!(!body["error"].as_str().unwrap().contains("offline"));

        let (status, body) = send(&app.router, "GET", "/health", None, None).await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body["status"], "degraded");
    }

    #[tokio::test]
    async fn health_reports_catalog_size_and_request_id_is_echoed() {
        let app = app();
        let req = Request::builder()
            .uri("/health")
            .header("x-request-id", "abc-123")
            .body(Body::empty())
            .unwrap();
        let resp = app.router.clone().oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(resp.headers()["x-request-id"], "abc-123");

        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["tables"], 3);
    }
}
