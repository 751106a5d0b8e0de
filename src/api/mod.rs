use std::collections::HashMap;

use axum::body::Bytes;
use axum::extract::{DefaultBodyLimit, FromRequest, Multipart, Query, Request};
use axum::http::{header, Method};
use axum::response::{IntoResponse, Response};
use axum::routing::any;
use axum::{Json, Router};
use serde::Serialize;
use serde_json::Value;

use crate::database::AppState;
use crate::env;
use crate::error::{ServiceError, ServiceResult};
use crate::request_state::RequestState;

mod auth;
mod businesses;
mod categories;
pub mod input;
mod menu;
mod menu_items;


use input::ActionInput;

pub fn router(app_state: AppState) -> Router {
    Router::new()
        .route("/api", any(handle_request))
        .route("/api.php", any(handle_request))
        .layer(DefaultBodyLimit::max(*env::MAX_REQUEST_SIZE))
        .with_state(app_state)
}

/// The uniform response envelope. Fields that are `None` are left out.
#[derive(Debug, PartialEq, Serialize, Default)]
pub struct ApiResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
}

impl ApiResponse {
    pub fn message(message: &str) -> Self {
        ApiResponse {
            success: true,
            message: Some(message.to_owned()),
            ..Default::default()
        }
    }

    pub fn created(message: &str, id: i64) -> Self {
        ApiResponse {
            id: Some(id),
            ..ApiResponse::message(message)
        }
    }

    pub fn data<T: Serialize>(data: T) -> ServiceResult<Self> {
        Ok(ApiResponse {
            success: true,
            data: Some(serde_json::to_value(data)?),
            ..Default::default()
        })
    }
}

impl IntoResponse for ApiResponse {
    fn into_response(self) -> Response {
        Json(self).into_response()
    }
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Action {
    Register,
    Login,
    GoogleLogin,
    AddBusiness,
    GetBusinesses,
    UpdateBusiness,
    DeleteBusiness,
    AddCategory,
    GetCategories,
    UpdateCategory,
    DeleteCategory,
    AddMenuItem,
    UpdateMenuItem,
    DeleteMenuItem,
    GetMenuItems,
    GetMenuByBusiness,
    GetPublicBusinesses,
    GetPublicMenuByBusiness,
}

const ACTIONS: [(&str, Action); 18] = [
    ("register", Action::Register),
    ("login", Action::Login),
    ("googleLogin", Action::GoogleLogin),
    ("addBusiness", Action::AddBusiness),
    ("getBusinesses", Action::GetBusinesses),
    ("updateBusiness", Action::UpdateBusiness),
    ("deleteBusiness", Action::DeleteBusiness),
    ("addCategory", Action::AddCategory),
    ("getCategories", Action::GetCategories),
    ("updateCategory", Action::UpdateCategory),
    ("deleteCategory", Action::DeleteCategory),
    ("addMenuItem", Action::AddMenuItem),
    ("updateMenuItem", Action::UpdateMenuItem),
    ("deleteMenuItem", Action::DeleteMenuItem),
    ("getMenuItems", Action::GetMenuItems),
    ("getMenuByBusiness", Action::GetMenuByBusiness),
    ("getPublicBusinesses", Action::GetPublicBusinesses),
    ("getPublicMenuByBusiness", Action::GetPublicMenuByBusiness),
];

impl Action {
    pub fn name(&self) -> &'static str {
        ACTIONS
            .iter()
            .find(|(_, action)| action == self)
            .map(|(name, _)| *name)
            .unwrap_or("unknown")
    }

    pub fn method(&self) -> Method {
        match self {
            Action::GetBusinesses
            | Action::GetCategories
            | Action::GetMenuItems
            | Action::GetMenuByBusiness
            | Action::GetPublicBusinesses
            | Action::GetPublicMenuByBusiness => Method::GET,
            _ => Method::POST,
        }
    }

    /// Look up an action by name and check that it is called with its verb.
    pub fn resolve(name: &str, method: &Method) -> ServiceResult<Action> {
        let action = ACTIONS
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, action)| *action)
            .ok_or_else(|| {
                if name.is_empty() {
                    ServiceError::Validation("No action specified.".to_string())
                } else {
                    ServiceError::Validation(format!("Unknown action '{}'.", name))
                }
            })?;

        if *method != action.method() {
            return Err(ServiceError::MethodNotAllowed(format!(
                "Method {} is not allowed for action '{}', use {}.",
                method,
                name,
                action.method()
            )));
        }

        Ok(action)
    }
}

async fn handle_request(
    method: Method,
    query: Option<Query<HashMap<String, String>>>,
    state: RequestState,
    request: Request,
) -> Response {
    let query = query.map(|Query(query)| query).unwrap_or_default();
    let action_name = query.get("action").cloned().unwrap_or_default();

    let result: ServiceResult<ApiResponse> = async {
        let action = Action::resolve(&action_name, &method)?;
        let input = read_input(action, query, request).await?;
        dispatch(state, action, input).await
    }
    .await;

    match result {
        Ok(response) => response.into_response(),
        Err(e) => {
            log::warn!("Action '{}' failed: {}", action_name, e);
            e.into_response()
        }
    }
}

async fn read_input(
    action: Action,
    query: HashMap<String, String>,
    request: Request,
) -> ServiceResult<ActionInput> {
    if action.method() == Method::GET {
        return Ok(ActionInput::from_query(query));
    }

    let is_multipart = request
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.to_lowercase().starts_with("multipart/form-data"))
        .unwrap_or(false);

    if is_multipart {
        let multipart = Multipart::from_request(request, &()).await?;
        return ActionInput::from_multipart(multipart).await;
    }

    let body = Bytes::from_request(request, &())
        .await
        .map_err(|e| ServiceError::Validation(format!("Could not read request body: {}", e.body_text())))?;
    ActionInput::from_json_body(&body)
}

/// Run one action to completion on the request's connection.
pub async fn dispatch(
    mut state: RequestState,
    action: Action,
    input: ActionInput,
) -> ServiceResult<ApiResponse> {
    log::debug!("Dispatching action '{}'", action.name());
    let state = &mut state;
    match action {
        Action::Register => auth::register(state, input).await,
        Action::Login => auth::login(state, input).await,
        Action::GoogleLogin => auth::google_login(state).await,
        Action::AddBusiness => businesses::add_business(state, input).await,
        Action::GetBusinesses => businesses::get_businesses(state, input).await,
        Action::UpdateBusiness => businesses::update_business(state, input).await,
        Action::DeleteBusiness => businesses::delete_business(state, input).await,
        Action::AddCategory => categories::add_category(state, input).await,
        Action::GetCategories => categories::get_categories(state, input).await,
        Action::UpdateCategory => categories::update_category(state, input).await,
        Action::DeleteCategory => categories::delete_category(state, input).await,
        Action::AddMenuItem => menu_items::add_menu_item(state, input).await,
        Action::UpdateMenuItem => menu_items::update_menu_item(state, input).await,
        Action::DeleteMenuItem => menu_items::delete_menu_item(state, input).await,
        Action::GetMenuItems => menu_items::get_menu_items(state, input).await,
        Action::GetMenuByBusiness => menu::get_menu_by_business(state, input).await,
        Action::GetPublicBusinesses => businesses::get_public_businesses(state).await,
        Action::GetPublicMenuByBusiness => menu::get_public_menu_by_business(state, input).await,
    }
}
