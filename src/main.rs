use actix_web::middleware::{Logger, NormalizePath};
use actix_web::{App, HttpServer, Responder, get, web};
use anyhow::Context;
use dotenvy::dotenv;

use lms::{
    api::health::health,
    config::Config,
    db::init_db,
    docs::ApiDoc,
    routes::{self, RateLimits},
    state::AppState,
};
use tracing::info;
use tracing_appender::rolling;
use utoipa::OpenApi; // ← needed for ApiDoc::openapi()
use utoipa_swagger_ui::SwaggerUi;

#[get("/")]
async fn index() -> impl Responder {
    "LMS API is running"
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    let config = Config::from_env()?;

    // Rolling daily log
    let file_appender = rolling::daily(&config.log_dir, "app.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_max_level(tracing::Level::DEBUG)
        .with_ansi(false)
        .with_target(false) // removes module path
        .with_level(true)
        .with_thread_ids(false)
        .with_thread_names(false)
        .pretty()
        .init();

    info!("Server starting...");

    let pool = init_db(&config.database_url)
        .await
        .context("Failed to connect to database")?;

    let server_addr = config.server_addr.clone();
    let limits = RateLimits::from_config(&config);
    let state = AppState::from_pool(config, pool);
    let openapi = ApiDoc::openapi();

    info!(addr = %server_addr, "Listening");

    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .wrap(NormalizePath::trim())
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}") // wildcard matches the JS/CSS assets
                    .url("/api-doc/openapi.json", openapi.clone()),
            )
            .service(index)
            .service(health)
            .configure(|cfg| routes::configure(cfg, &state, &limits))
            .default_service(web::to(routes::not_found))
    })
    .bind(&server_addr)?
    .run()
    .await?;

    Ok(())
}
