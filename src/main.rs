use actix_cors::Cors;
use actix_web::middleware::Logger;
use actix_web::web::Data;
use actix_web::{App, HttpServer};
use dotenv::dotenv;
use tracing_subscriber::EnvFilter;

use reservation_admin::services::{self, db_utils::get_db_pool, db_utils::AppState, db_utils::Store};
use reservation_admin::settings::{Settings, StoreBackend};

fn init_tracing(settings: &Settings) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&settings.log));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn init_store(settings: &Settings) -> std::io::Result<Store> {
    match settings.store {
        StoreBackend::Memory => Ok(Store::memory()),
        StoreBackend::Postgres => {
            let db_url = settings.pg_database_url.as_deref().unwrap_or_default();
            let pool = get_db_pool(db_url, settings.pg_pool_size)
                .map_err(|err| std::io::Error::new(std::io::ErrorKind::Other, err))?;

            Ok(Store::postgres(pool, settings.db_workers))
        }
    }
}

fn cors(settings: &Settings) -> Cors {
    match &settings.cors_origin {
        Some(origin) => Cors::default()
            .allowed_origin(origin)
            .allow_any_method()
            .allow_any_header(),
        None => Cors::permissive(),
    }
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv().ok();
    let settings = Settings::load().map_err(|err| std::io::Error::new(std::io::ErrorKind::InvalidInput, err))?;
    init_tracing(&settings);

    let store = init_store(&settings)?;
    tracing::info!(store = store.backend_name(), host = %settings.host, port = settings.port, "Starting admin service");

    let server_settings = settings.clone();

    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .wrap(cors(&server_settings))
            .app_data(Data::new(AppState { store: store.clone() }))
            .service(services::home_page)
            .service(services::healthcheck)
            .service(services::resource_route::api_scope())
    })
        .bind(settings.bind_address())?
        .run()
        .await
}
