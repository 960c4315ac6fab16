use axum::{routing::get, Router};
use serde_json::{json, Value};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

mod auth;
mod config;
mod database;
mod error;
mod handlers;
mod middleware;
mod services;
mod types;

#[tokio::main]
async fn main() {
    // Load .env if present so cargo run picks up DATABASE_URL, JWT_SECRET, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt::init();

    // Initialize configuration (this loads the config singleton)
    let config = crate::config::config();
    tracing::info!("Starting Crew API in {:?} mode", config.environment);

    init_database().await;

    let app = app();

    // Allow tests or deployments to override port via env
    let port = std::env::var("CREW_API_PORT")
        .ok()
        .or_else(|| std::env::var("PORT").ok())
        .and_then(|s| s.parse::<u16>().ok())
        .unwrap_or(3000);

    let bind_addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .unwrap_or_else(|e| panic!("failed to bind {}: {}", bind_addr, e));

    println!("🚀 Crew API server listening on http://{}", bind_addr);

    axum::serve(listener, app).await.expect("server");
}

/// Apply migrations and seed the first HR account. Failures are logged but
/// not fatal; /health reports the database as degraded until it comes up.
async fn init_database() {
    if let Err(e) = database::DatabaseManager::migrate().await {
        tracing::warn!("database not ready at startup: {}", e);
        return;
    }
    match services::UserService::new().await {
        Ok(service) => {
            if let Err(e) = service.bootstrap_admin().await {
                tracing::warn!("failed to bootstrap HR account: {}", e);
            }
        }
        Err(e) => tracing::warn!("failed to bootstrap HR account: {}", e),
    }
}

fn app() -> Router {
    Router::new()
        // Public
        .route("/", get(root))
        .route("/health", get(health))
        // Public auth routes (token acquisition)
        .merge(auth_public_routes())
        // Protected API
        .merge(api_routes())
        // Global middleware
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

fn auth_public_routes() -> Router {
    use axum::routing::post;
    use handlers::public::login;

    Router::new()
        .route("/hr/login", post(login::hr_login))
        .route("/user/login", post(login::user_login))
        .route("/auth/refresh", post(login::refresh))
}

fn api_routes() -> Router {
    use axum::routing::{post, put};
    use handlers::protected::{attendance, auth, dashboard, directory, leaves, profile, register, tasks};
    use middleware::{jwt_auth_middleware, require_hr_middleware};

    // Routes that are HR-only in their entirety get a role gate at the
    // router level; mixed resources check roles in the service layer.
    let hr_routes = Router::new()
        .route("/api/register", post(register::register))
        .route("/api/hr/users/:id", get(profile::user_by_id))
        .route("/api/hr/dashboard", get(dashboard::overview))
        .route_layer(axum::middleware::from_fn(require_hr_middleware));

    Router::new()
        .route("/api/auth/whoami", get(auth::whoami))
        .route("/api/auth/logout", post(auth::logout))
        .route("/api/profile", get(profile::me))
        .route("/api/leaves", get(leaves::list).post(leaves::submit))
        .route("/api/leaves/:id", put(leaves::approve))
        .route("/api/tasks", get(tasks::list).post(tasks::create))
        .route("/api/tasks/:id", put(tasks::update))
        .route("/api/attendance", get(attendance::list))
        .route("/api/attendance/checkin", post(attendance::check_in))
        .route("/api/attendance/checkout", post(attendance::check_out))
        .route("/api/departments", get(directory::department_list).post(directory::department_create))
        .route("/api/positions", get(directory::position_list).post(directory::position_create))
        .merge(hr_routes)
        .route_layer(axum::middleware::from_fn(jwt_auth_middleware))
}

async fn root() -> axum::response::Json<Value> {
    let version = env!("CARGO_PKG_VERSION");

    axum::response::Json(json!({
        "success": true,
        "data": {
            "name": "Crew API",
            "version": version,
            "description": "Employee management backend API built with Rust (Axum)",
            "endpoints": {
                "home": "/ (public)",
                "login": "/hr/login, /user/login (public - token acquisition)",
                "refresh": "/auth/refresh (public)",
                "auth": "/api/auth/* (protected - session management)",
                "profile": "/api/profile (protected)",
                "leaves": "/api/leaves[/:id] (protected)",
                "tasks": "/api/tasks[/:id] (protected)",
                "attendance": "/api/attendance[/checkin|/checkout] (protected)",
                "directory": "/api/departments, /api/positions (protected)",
                "hr": "/api/register, /api/hr/* (restricted, requires HR role)",
            }
        }
    }))
}

async fn health() -> impl axum::response::IntoResponse {
    let now = chrono::Utc::now();

    match crate::database::DatabaseManager::health_check().await {
        Ok(_) => (
            axum::http::StatusCode::OK,
            axum::response::Json(json!({
                "success": true,
                "data": {
                    "status": "ok",
                    "timestamp": now,
                    "database": "ok"
                }
            })),
        ),
        Err(e) => (
            axum::http::StatusCode::SERVICE_UNAVAILABLE,
            axum::response::Json(json!({
                "success": false,
                "error": "database unavailable",
                "data": {
                    "status": "degraded",
                    "timestamp": now,
                    "database_error": e.to_string()
                }
            })),
        ),
    }
}
