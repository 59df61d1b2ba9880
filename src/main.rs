use std::process;

use actix_web::{App, HttpServer, middleware, web};
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use pushkind_prices::db::establish_connection_pool;
use pushkind_prices::models::config::ServerConfig;
use pushkind_prices::repository::DieselRepository;
use pushkind_prices::routes;

const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenvy::dotenv().ok();
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let server_config = match ServerConfig::load() {
        Ok(config) => config,
        Err(e) => {
            log::error!("Failed to load configuration: {e}");
            process::exit(1);
        }
    };

    let pool = match establish_connection_pool(&server_config.database_url) {
        Ok(pool) => pool,
        Err(e) => {
            log::error!("Failed to establish database connection: {e}");
            process::exit(1);
        }
    };

    match pool.get() {
        Ok(mut conn) => {
            if let Err(e) = conn.run_pending_migrations(MIGRATIONS) {
                log::error!("Failed to run database migrations: {e}");
                process::exit(1);
            }
        }
        Err(e) => {
            log::error!("Failed to get database connection: {e}");
            process::exit(1);
        }
    }

    let repo = DieselRepository::new(pool);
    let bind_address = (server_config.address.clone(), server_config.port);

    log::info!(
        "Server running on {}:{} ({:?} record schema)",
        bind_address.0,
        bind_address.1,
        server_config.record_schema
    );

    HttpServer::new(move || {
        App::new()
            .wrap(middleware::Logger::default())
            .app_data(web::Data::new(repo.clone()))
            .app_data(web::Data::new(server_config.clone()))
            .configure(routes::configure)
    })
    .bind(bind_address)?
    .run()
    .await
}
