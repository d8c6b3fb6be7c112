use axum::routing::{get, post};
use axum::{middleware, Router};
use diesel::prelude::*;
use std::net::SocketAddr;

mod auth;
mod config;
mod database;
mod db;
mod error;
mod models;
mod property;
mod reservation;
mod schema;
mod user;

#[derive(Clone)]
pub struct AppState {
    pub config: config::AppConfig,
    pub pool: db::DbPool,
}

fn app(state: AppState) -> Router {
    let protected_routes = Router::new()
        .route("/reservations", get(reservation::list_reservations))
        .route(
            "/reservations/:property_id",
            post(reservation::create_reservation),
        )
        .route("/properties", post(property::create_property))
        .route("/users/me", get(user::me))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth::authenticate,
        ));

    Router::new()
        .route("/", get(|| async { "Homestay booking API" }))
        .route("/properties", get(property::list_properties))
        .route("/users", post(user::signup))
        .route("/login", post(user::login))
        .merge(protected_routes)
        .with_state(state)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    if std::env::var("RUST_LOG").is_err() {
        std::env::set_var("RUST_LOG", "info");
    }
    env_logger::init();

    let config = config::AppConfig::load()?;
    log::info!("Configuration loaded");

    let pool = db::build_pool(&config.database_url, config.pool_size)?;
    {
        let mut conn = pool.get()?;
        let test_query: i32 = diesel::select(diesel::dsl::sql::<diesel::sql_types::Integer>("1"))
            .get_result(&mut conn)?;
        log::info!("Database test query result: {}", test_query);
    }

    let addr = SocketAddr::from(([127, 0, 0, 1], config.port));
    log::info!("Starting server on {}", addr);

    let state = AppState { config, pool };
    let app = app(state);

    axum::serve(
        tokio::net::TcpListener::bind(addr).await?,
        app.into_make_service(),
    )
    .await?;

    Ok(())
}
