use actix_cors::Cors;
use actix_web::{middleware::Logger, App, HttpServer};
use std::sync::Arc;
use todoguard::{
    auth::{PasswordHasher, TokenCodec},
    config::Config,
    state::AppState,
    store::{MemoryStore, PgStore},
};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv::dotenv().ok();
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let config = Config::from_env().unwrap_or_else(|e| panic!("Invalid configuration: {}", e));
    let codec = TokenCodec::new(config.jwt_secret.as_bytes())
        .unwrap_or_else(|e| panic!("Invalid token secret: {}", e));
    let hasher = PasswordHasher::new(config.bcrypt_cost);
    log::info!("Password hashing cost is {}", hasher.cost());

    let state = match &config.database_url {
        Some(url) => {
            let store = PgStore::connect(url)
                .await
                .expect("Failed to connect to database");
            store.migrate().await.expect("Failed to run migrations");
            log::info!("Connected to database");
            AppState::new(Arc::new(store), codec, hasher)
        }
        None => {
            log::warn!("DATABASE_URL is not set; data is kept in memory and lost on exit");
            AppState::new(Arc::new(MemoryStore::new()), codec, hasher)
        }
    }
    .expect("Failed to initialise the account service");

    log::info!("Starting server at {}", config.server_url());

    HttpServer::new(move || {
        let state = state.clone();
        App::new()
            .wrap(
                Cors::default()
                    .allow_any_origin()
                    .allow_any_method()
                    .allow_any_header()
                    .max_age(3600),
            )
            .wrap(Logger::default())
            .configure(|cfg| state.configure(cfg))
    })
    .bind((config.server_host.as_str(), config.server_port))?
    .run()
    .await
}
