use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};

use crate::{
    database::{AppState, DatabaseConnection},
    error::ServiceError,
    image_store::ImageStore,
};

/// Everything an action needs: its own database connection and the image store.
pub struct RequestState {
    pub db: DatabaseConnection,
    pub images: ImageStore,
}

impl RequestState {
    pub async fn from_app_state(state: &AppState) -> Result<Self, ServiceError> {
        // a failed schema check ends the request here, before any action runs
        let db = state.connection().await.map_err(|err| {
            log::error!("Could not provide a database connection: {}", err);
            err
        })?;

        Ok(Self {
            db,
            images: state.images.clone(),
        })
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for RequestState
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = ServiceError;

    async fn from_request_parts(_parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let state = AppState::from_ref(state);
        RequestState::from_app_state(&state).await
    }
}
