use axum::{Router, routing::get};
use sqlx::postgres::PgPoolOptions;
use staff_service::{
    api::{handler::staff, state::StaffAppState},
    config::StaffServiceConfig,
    domain::{school_year::SchoolYearRepository, service::StaffService},
    infrastructure::{
        cache::{client::RedisCache, school_year::CachedSchoolYearRepository},
        password::Argon2PasswordHasher,
        school_year::PgSchoolYearRepository,
        user::PgUserRepository,
    },
};
use std::{env, net::SocketAddr, sync::Arc};
use tokio::net::TcpListener;
use tower_governor::{
    GovernorLayer, governor::GovernorConfigBuilder, key_extractor::SmartIpKeyExtractor,
};
use tower_http::trace::{DefaultOnRequest, DefaultOnResponse, TraceLayer};
use tracing::Level;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[derive(OpenApi)]
#[openapi(
    paths(
        staff::find_all,
        staff::create,
        staff::find_one,
        staff::update,
        staff::remove,
    ),
    tags(
        (name = "Staff", description = "Staff management"),
    )
)]
struct ApiDoc;

#[tokio::main]
async fn main() {
    let _guard = shared::telemetry::init_telemetry("staff-service");

    let database_url = env::var("DATABASE_URL").expect("DATABASE_URL must be set");
    let port = env::var("SERVER_PORT").unwrap_or_else(|_| "8080".to_string());
    let config_path =
        env::var("STAFF_SERVICE_CONFIG_PATH").unwrap_or_else(|_| "staff-service.toml".to_string());
    let config = StaffServiceConfig::load(&config_path).expect("Failed to load staff service config");

    let pool = PgPoolOptions::new()
        .max_connections(config.database.max_connections)
        .connect(&database_url)
        .await
        .expect("Failed to establish connection into Postgres");

    sqlx::migrate!()
        .run(&pool)
        .await
        .expect("Failed to run database migrations");

    let pg_school_years = Arc::new(PgSchoolYearRepository::new(pool.clone()));
    let school_year_repo: Arc<dyn SchoolYearRepository> = match env::var("REDIS_URL") {
        Ok(redis_url) => {
            let cache = RedisCache::new(&redis_url, "staff-service")
                .await
                .expect("Failed to connect to Redis");
            Arc::new(CachedSchoolYearRepository::new(
                pg_school_years,
                cache,
                config.cache.school_year_ttl_seconds,
            ))
        }
        Err(_) => {
            tracing::info!("REDIS_URL not set, school year lookups go straight to Postgres");
            pg_school_years
        }
    };

    let hasher = Argon2PasswordHasher::new(&config.password).expect("Invalid password config");

    let state = Arc::new(StaffAppState {
        staff_service: Arc::new(StaffService::new(
            Arc::new(PgUserRepository::new(pool)),
            school_year_repo,
            Arc::new(hasher),
        )),
    });

    let governor_conf = GovernorConfigBuilder::default()
        .per_second(config.rate_limit.per_second)
        .burst_size(config.rate_limit.burst_size)
        .key_extractor(SmartIpKeyExtractor)
        .use_headers()
        .finish()
        .expect("Failed to build governor config");

    let app = Router::new()
        .route(
            "/headpat",
            get(|| async {
                axum::Json(shared::responses::HeadpatResponse {
                    message: "nyaa~! all systems operational, senpai! (=^-w-^=)",
                })
            }),
        )
        .route(
            "/api/v1/school-years/{school_year_id}/staff",
            get(staff::find_all).post(staff::create),
        )
        .route(
            "/api/v1/staff/{id}",
            get(staff::find_one)
                .patch(staff::update)
                .delete(staff::remove),
        )
        // Swagger UI
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        // Rate limiting (per-IP)
        .layer(GovernorLayer::new(governor_conf))
        // tracing log (turn request into info level)
        .layer(
            TraceLayer::new_for_http()
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(
                    DefaultOnResponse::new()
                        .level(Level::INFO)
                        .latency_unit(tower_http::LatencyUnit::Millis),
                ),
        )
        .with_state(state);

    tracing::info!("staff-service listening on 0.0.0.0:{port}");

    let listener = TcpListener::bind(format!("0.0.0.0:{port}"))
        .await
        .expect("Failed to bind");

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shared::shutdown::shutdown_signal("staff-service"))
    .await
    .expect("Oppsie! Server crashed!");

    tracing::info!("staff-service shut down");
}
