use crate::error::ServiceResult;
use crate::request_state::RequestState;

use super::input::ActionInput;
use super::ApiResponse;

/// Username of the account behind the simulated Google login.
const GOOGLE_USERNAME: &str = "google_user";

pub async fn register(state: &mut RequestState, input: ActionInput) -> ServiceResult<ApiResponse> {
    let username = input.require_text("username")?;
    let password = input.require_secret("password")?;

    let user = state.db.register_user(&username, &password).await?;
    log::info!("Registered user {} ('{}')", user.id, user.username);

    Ok(ApiResponse {
        user_id: Some(user.id),
        username: Some(user.username),
        ..ApiResponse::message("Registration successful.")
    })
}

pub async fn login(state: &mut RequestState, input: ActionInput) -> ServiceResult<ApiResponse> {
    let username = input.require_text("username")?;
    let password = input.require_secret("password")?;

    let user = state.db.authenticate_user(&username, &password).await?;

    Ok(ApiResponse {
        user_id: Some(user.id),
        username: Some(user.username),
        ..ApiResponse::message("Login successful.")
    })
}

pub async fn google_login(state: &mut RequestState) -> ServiceResult<ApiResponse> {
    let (user, created) = state
        .db
        .login_or_register_fixed_identity(GOOGLE_USERNAME)
        .await?;

    let message = if created {
        "Google registration and login successful."
    } else {
        "Google login successful."
    };
    Ok(ApiResponse {
        user_id: Some(user.id),
        username: Some(user.username),
        ..ApiResponse::message(message)
    })
}
