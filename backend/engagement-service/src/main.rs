use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpResponse, HttpServer};
use chrono::Utc;
use engagement_service::auth;
use engagement_service::cache::EngagementCache;
use engagement_service::handlers;
use engagement_service::middleware;
use redis::aio::ConnectionManager;
use serde::Serialize;
use std::collections::HashMap;
use std::io;
use std::sync::Arc;
use std::time::Instant;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

struct HealthState {
    db_pool: sqlx::Pool<sqlx::Postgres>,
    redis_manager: Option<ConnectionManager>,
}

#[derive(Serialize, Clone)]
#[serde(rename_all = "lowercase")]
enum ComponentStatus {
    Healthy,
    Degraded,
    Unhealthy,
}

#[derive(Serialize)]
struct ComponentCheck {
    status: ComponentStatus,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    latency_ms: Option<u64>,
}

#[derive(Serialize)]
struct ReadinessResponse {
    ready: bool,
    status: ComponentStatus,
    checks: HashMap<String, ComponentCheck>,
    timestamp: String,
}

impl HealthState {
    fn new(db_pool: sqlx::Pool<sqlx::Postgres>, redis_manager: Option<ConnectionManager>) -> Self {
        Self {
            db_pool,
            redis_manager,
        }
    }

    async fn check_postgres(&self) -> Result<(), sqlx::Error> {
        sqlx::query("SELECT 1")
            .fetch_one(&self.db_pool)
            .await
            .map(|_| ())
    }

    async fn check_redis(&self) -> Result<(), redis::RedisError> {
        let Some(manager) = &self.redis_manager else {
            return Ok(());
        };
        let mut conn = manager.clone();
        let pong: String = redis::cmd("PING").query_async(&mut conn).await?;
        if pong == "PONG" {
            Ok(())
        } else {
            Err(redis::RedisError::from((
                redis::ErrorKind::ResponseError,
                "unexpected PING response",
            )))
        }
    }
}

async fn health_summary(state: web::Data<HealthState>) -> HttpResponse {
    match state.check_postgres().await {
        Ok(_) => HttpResponse::Ok().json(serde_json::json!({
            "status": "ok",
            "service": "engagement-service",
            "version": env!("CARGO_PKG_VERSION")
        })),
        Err(e) => HttpResponse::ServiceUnavailable().json(serde_json::json!({
            "status": "unhealthy",
            "error": format!("PostgreSQL connection failed: {}", e),
            "service": "engagement-service"
        })),
    }
}

async fn readiness_summary(state: web::Data<HealthState>) -> HttpResponse {
    let mut checks = HashMap::new();
    let mut ready = true;

    let start = Instant::now();
    let pg_result = state.check_postgres().await;
    let pg_latency = Some(start.elapsed().as_millis() as u64);
    let postgres_check = match pg_result {
        Ok(_) => ComponentCheck {
            status: ComponentStatus::Healthy,
            message: "PostgreSQL connection successful".to_string(),
            latency_ms: pg_latency,
        },
        Err(e) => {
            ready = false;
            ComponentCheck {
                status: ComponentStatus::Unhealthy,
                message: format!("PostgreSQL connection failed: {}", e),
                latency_ms: pg_latency,
            }
        }
    };
    checks.insert("postgresql".to_string(), postgres_check);

    // Redis is optional: the service runs cacheless, so a failed ping only
    // degrades readiness rather than failing it.
    if state.redis_manager.is_some() {
        let start = Instant::now();
        let redis_result = state.check_redis().await;
        let redis_latency = Some(start.elapsed().as_millis() as u64);
        let redis_check = match redis_result {
            Ok(_) => ComponentCheck {
                status: ComponentStatus::Healthy,
                message: "Redis ping successful".to_string(),
                latency_ms: redis_latency,
            },
            Err(e) => ComponentCheck {
                status: ComponentStatus::Degraded,
                message: format!("Redis ping failed: {}", e),
                latency_ms: redis_latency,
            },
        };
        checks.insert("redis".to_string(), redis_check);
    }

    let status = if ready {
        ComponentStatus::Healthy
    } else {
        ComponentStatus::Unhealthy
    };

    let response = ReadinessResponse {
        ready,
        status,
        checks,
        timestamp: Utc::now().to_rfc3339(),
    };

    if ready {
        HttpResponse::Ok().json(response)
    } else {
        HttpResponse::ServiceUnavailable().json(response)
    }
}

async fn liveness_check() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({"alive": true}))
}

/// Engagement Service
///
/// A microservice that owns the engagement core of the Chirp platform:
/// posts with denormalized counters, the per-(user, post) reaction ledger,
/// comments, feed pagination, trending ranking, and cascading deletion.
///
/// # Routes
///
/// - `/api/v1/posts/*` - Create, read, delete posts; the global feed
/// - `/api/v1/reactions/*` - Like toggle and like-status reads
/// - `/api/v1/comments/*` - Create and list comments
/// - `/api/v1/trending/*` - Ranked trending views
///
/// # Architecture
///
/// - HTTP handlers with request/response conversion
/// - PostgreSQL for persistent storage (counters updated atomically in-database)
/// - Redis for read caching (optional; the service degrades without it)
#[actix_web::main]
async fn main() -> io::Result<()> {
    // Support container healthchecks via CLI subcommand: `healthcheck-http` or legacy `healthcheck`
    {
        let mut args = std::env::args();
        let _bin = args.next();
        if let Some(cmd) = args.next() {
            if cmd == "healthcheck" || cmd == "healthcheck-http" {
                let url = "http://127.0.0.1:8084/api/v1/health";
                match reqwest::Client::new().get(url).send().await {
                    Ok(resp) if resp.status().is_success() => return Ok(()),
                    Ok(resp) => {
                        eprintln!("healthcheck HTTP status: {}", resp.status());
                        return Err(io::Error::new(io::ErrorKind::Other, "healthcheck failed"));
                    }
                    Err(e) => {
                        eprintln!("healthcheck HTTP error: {}", e);
                        return Err(io::Error::new(io::ErrorKind::Other, "healthcheck error"));
                    }
                }
            }
        }
    }

    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,actix_web=debug,sqlx=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = match engagement_service::Config::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            tracing::error!("Configuration loading failed: {:#}", e);
            eprintln!("ERROR: Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    tracing::info!("Starting engagement-service v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!("Environment: {}", config.app.env);

    match auth::load_validation_key() {
        Ok(public_key) => {
            if let Err(err) = auth::initialize_validation_key(&public_key) {
                return Err(io::Error::new(
                    io::ErrorKind::Other,
                    format!("Failed to initialize JWT keys: {err}"),
                ));
            }
        }
        Err(err) => {
            tracing::warn!(
                "JWT public key not configured ({err}); authentication middleware will fail requests"
            );
        }
    }

    // Initialize database connection pool
    let db_pool = match engagement_service::db::create_pool(&config.database).await {
        Ok(pool) => pool,
        Err(e) => {
            tracing::error!("Database pool creation failed: {:#}", e);
            eprintln!("ERROR: Failed to create database pool: {}", e);
            std::process::exit(1);
        }
    };

    // Apply embedded migrations so the schema is in place before serving
    if let Err(e) = sqlx::migrate!("./migrations").run(&db_pool).await {
        tracing::error!("Migration failed: {:#}", e);
        eprintln!("ERROR: Failed to run migrations: {}", e);
        std::process::exit(1);
    }

    tracing::info!("Connected to database, schema up to date");

    // Initialize Redis cache; the service runs cacheless when unavailable
    let (redis_manager, engagement_cache): (Option<ConnectionManager>, handlers::posts::SharedCache) =
        match redis::Client::open(config.cache.url.clone()) {
            Ok(client) => match ConnectionManager::new(client).await {
                Ok(manager) => {
                    tracing::info!("Connected to Redis cache");
                    let cache = Arc::new(EngagementCache::new(
                        manager.clone(),
                        config.cache.post_ttl_secs,
                        config.cache.trending_ttl_secs,
                    ));
                    (Some(manager), Some(cache))
                }
                Err(e) => {
                    tracing::warn!("Redis unavailable, running without cache: {}", e);
                    (None, None)
                }
            },
            Err(e) => {
                tracing::warn!("Invalid Redis URL, running without cache: {}", e);
                (None, None)
            }
        };

    let http_bind_address = format!("{}:{}", config.app.host, config.app.port);
    tracing::info!("Starting HTTP server at {}", http_bind_address);

    let cache_data = web::Data::new(engagement_cache);
    let config_data = web::Data::new(config.clone());
    let health_state = web::Data::new(HealthState::new(db_pool.clone(), redis_manager));

    let server = HttpServer::new(move || {
        // Build CORS configuration
        let cors_builder = Cors::default();
        let mut cors = cors_builder;
        for origin in config.cors.allowed_origins.split(',') {
            let origin = origin.trim();
            if origin == "*" {
                cors = cors.allow_any_origin();
            } else {
                cors = cors.allowed_origin(origin);
            }
        }
        cors = cors.allow_any_method().allow_any_header().max_age(3600);

        App::new()
            .app_data(web::Data::new(db_pool.clone()))
            .app_data(cache_data.clone())
            .app_data(config_data.clone())
            .app_data(health_state.clone())
            .wrap(cors)
            .wrap(Logger::default())
            .wrap(tracing_actix_web::TracingLogger::default())
            .route(
                "/metrics",
                web::get().to(engagement_service::metrics::serve_metrics),
            )
            // Health check endpoints
            .route("/api/v1/health", web::get().to(health_summary))
            .route("/api/v1/health/ready", web::get().to(readiness_summary))
            .route("/api/v1/health/live", web::get().to(liveness_check))
            .service(
                web::scope("/api/v1")
                    .wrap(middleware::JwtAuthMiddleware)
                    .wrap(middleware::MetricsMiddleware)
                    .service(
                        web::scope("/posts")
                            .service(
                                web::resource("")
                                    .route(web::post().to(handlers::create_post))
                                    .route(web::get().to(handlers::get_feed)),
                            )
                            .service(
                                web::resource("/user/{user_id}")
                                    .route(web::get().to(handlers::get_user_posts)),
                            )
                            .service(
                                web::resource("/{post_id}")
                                    .route(web::get().to(handlers::get_post))
                                    .route(web::delete().to(handlers::delete_post)),
                            ),
                    )
                    .service(
                        web::scope("/reactions")
                            .route("/toggle", web::post().to(handlers::toggle_like))
                            .route("/status", web::get().to(handlers::like_status)),
                    )
                    .service(
                        web::scope("/comments").service(
                            web::resource("")
                                .route(web::post().to(handlers::create_comment))
                                .route(web::get().to(handlers::list_comments)),
                        ),
                    )
                    .service(
                        web::scope("/trending")
                            .route("/likes", web::get().to(handlers::trending_likes))
                            .route("/comments", web::get().to(handlers::trending_comments))
                            .route(
                                "/engagement",
                                web::get().to(handlers::trending_engagement),
                            ),
                    ),
            )
    })
    .bind(&http_bind_address)?
    .workers(4)
    .run();

    tracing::info!("HTTP server is running");
    let result = server.await;

    tracing::info!("Engagement-service shutting down");
    result
}
