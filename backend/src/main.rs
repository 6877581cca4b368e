//! Escutivel membership service.
//!
//! Layered like the rest of the workspace expects: storage (SQLite
//! pool + repositories), domain (models, CRUD services, intake
//! workflow), io (REST handlers + mappers). This file wires the
//! layers together and serves the landing page as the router fallback.

use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::Result;
use axum::{
    http::{HeaderValue, Method},
    routing::{get, post, put},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tracing::info;

mod domain;
mod io;
mod storage;

use crate::domain::{
    AuthService, MemberTableService, PersonService, RegistrationService, ScoutService,
};
use crate::io::rest::{auth_apis, member_table_apis, person_apis, registration_apis, scout_apis};
use crate::storage::{DbConnection, PersonRepository, ScoutRepository, UserRepository};

const DEFAULT_BIND_ADDR: &str = "127.0.0.1:3000";
const DEFAULT_ADMIN_EMAIL: &str = "admin@escutivel.ao";
const DEFAULT_ADMIN_PASSWORD: &str = "mudar-me";
const STATIC_DIR: &str = "static";

/// Main application state that holds all services
#[derive(Clone)]
pub struct AppState {
    pub auth_service: AuthService,
    pub person_service: PersonService,
    pub scout_service: ScoutService,
    pub registration_service: RegistrationService,
    pub member_table_service: MemberTableService,
    /// Session cookies carry the Secure flag outside development
    pub secure_cookies: bool,
}

/// Initialize the backend with all required services
pub async fn initialize_backend() -> Result<AppState> {
    info!("Setting up database");
    let db = match std::env::var("ESCUTIVEL_DATABASE_URL") {
        Ok(url) => DbConnection::init_at(&url).await?,
        Err(_) => DbConnection::init().await?,
    };

    let secure_cookies = std::env::var("ESCUTIVEL_ENV")
        .map(|env| env != "development")
        .unwrap_or(false);

    info!("Setting up domain model");
    let state = build_state(db, secure_cookies);

    let admin_email =
        std::env::var("ESCUTIVEL_ADMIN_EMAIL").unwrap_or_else(|_| DEFAULT_ADMIN_EMAIL.to_string());
    let admin_password = std::env::var("ESCUTIVEL_ADMIN_PASSWORD")
        .unwrap_or_else(|_| DEFAULT_ADMIN_PASSWORD.to_string());
    state
        .auth_service
        .bootstrap_admin(&admin_email, &admin_password)
        .await?;

    Ok(state)
}

fn build_state(db: DbConnection, secure_cookies: bool) -> AppState {
    let auth_service = AuthService::new(UserRepository::new(db.clone()));
    let person_service = PersonService::new(PersonRepository::new(db.clone()));
    let scout_service = ScoutService::new(ScoutRepository::new(db));
    let registration_service =
        RegistrationService::new(person_service.clone(), scout_service.clone());

    AppState {
        auth_service,
        person_service,
        scout_service,
        registration_service,
        member_table_service: MemberTableService::new(),
        secure_cookies,
    }
}

/// Create the Axum router with all routes configured
pub fn create_router(app_state: AppState) -> Router {
    // CORS setup to allow the dashboard to make requests
    let cors = CorsLayer::new()
        .allow_origin("http://localhost:8080".parse::<HeaderValue>().unwrap())
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers(Any);

    // Set up our application routes
    let api_routes = Router::new()
        .route("/auth/login", post(auth_apis::login))
        .route("/auth/logout", post(auth_apis::logout))
        .route(
            "/persons",
            get(person_apis::list_persons).post(person_apis::create_person),
        )
        .route("/persons/table", get(member_table_apis::get_member_table))
        .route(
            "/persons/:id",
            put(person_apis::update_person).delete(person_apis::delete_person),
        )
        .route(
            "/scouts",
            get(scout_apis::list_scouts).post(scout_apis::create_scout),
        )
        .route(
            "/scouts/:id",
            put(scout_apis::update_scout).delete(scout_apis::delete_scout),
        )
        .route("/panels/:section", get(member_table_apis::get_panel))
        .route("/registrations", post(registration_apis::open_registration))
        .route(
            "/registrations/:id",
            get(registration_apis::get_registration),
        )
        .route(
            "/registrations/:id/fields",
            put(registration_apis::set_registration_fields),
        )
        .route("/registrations/:id/next", post(registration_apis::next_step))
        .route(
            "/registrations/:id/back",
            post(registration_apis::previous_step),
        )
        .route(
            "/registrations/:id/cancel",
            post(registration_apis::cancel_registration),
        )
        .route(
            "/registrations/:id/submit",
            post(registration_apis::submit_registration),
        );

    // Define our main application router; the landing page is the fallback
    Router::new()
        .nest("/api", api_routes)
        .fallback_service(ServeDir::new(PathBuf::from(STATIC_DIR)))
        .layer(cors)
        .with_state(app_state)
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let state = initialize_backend().await?;
    let app = create_router(state);

    let addr: SocketAddr = std::env::var("ESCUTIVEL_BIND_ADDR")
        .unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_string())
        .parse()?;
    info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
