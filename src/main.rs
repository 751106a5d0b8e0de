use tower_http::cors::CorsLayer;

use crate::database::AppState;
use crate::error::{ServiceError, ServiceResult};
use crate::image_store::ImageStore;

mod api;
mod database;
mod env;
mod error;
mod image_store;
mod models;
mod password;
mod request_state;

#[tokio::main]
async fn main() {
    dotenv::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let exit_code = match init().await {
        Ok(_) => 0,
        Err(e) => {
            log::error!("{}", e);
            1
        }
    };

    std::process::exit(exit_code);
}

async fn init() -> ServiceResult<()> {
    let images = ImageStore::new(
        env::APP_ROOT.as_str(),
        env::IMAGES_DIR.as_str(),
        *env::MAX_IMAGE_SIZE,
    );
    let app_state = AppState::connect(env::DATABASE_URL.as_str(), images).await?;

    let app = api::router(app_state).layer(CorsLayer::permissive());

    let address = format!("{}:{}", env::API_HOST.as_str(), env::API_PORT.as_str());
    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .map_err(|e| ServiceError::InternalServerError(format!("Could not bind {}: {}", address, e)))?;

    log::info!("Start http server at {}", address);
    axum::serve(listener, app)
        .await
        .map_err(|e| ServiceError::InternalServerError(format!("Server error: {}", e)))?;

    Ok(())
}
