use serde::Serialize;

use crate::error::ServiceResult;
use crate::models;
use crate::request_state::RequestState;

use super::input::ActionInput;
use super::ApiResponse;

#[derive(Debug, PartialEq, Serialize)]
pub struct BusinessDto {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub logo_url: Option<String>,
}

impl From<&models::Business> for BusinessDto {
    fn from(value: &models::Business) -> Self {
        Self {
            id: value.id,
            name: value.name.to_owned(),
            description: value.description.to_owned(),
            logo_url: value.logo_url.to_owned(),
        }
    }
}

fn business_fields(input: &ActionInput) -> ServiceResult<models::NewBusiness> {
    Ok(models::NewBusiness {
        name: input.require_text("name")?,
        description: input.optional_text("description")?,
        logo_url: input.optional_text("logo_url")?,
    })
}

pub async fn add_business(state: &mut RequestState, input: ActionInput) -> ServiceResult<ApiResponse> {
    let user_id = input.require_id("user_id")?;
    let business = business_fields(&input)?;

    let id = state.db.add_business(user_id, business).await?;
    Ok(ApiResponse::created("Business added successfully.", id))
}

pub async fn get_businesses(state: &mut RequestState, input: ActionInput) -> ServiceResult<ApiResponse> {
    let user_id = input.require_id("user_id")?;

    let businesses = state.db.list_businesses(user_id).await?;
    ApiResponse::data(businesses.iter().map(BusinessDto::from).collect::<Vec<_>>())
}

pub async fn update_business(state: &mut RequestState, input: ActionInput) -> ServiceResult<ApiResponse> {
    let user_id = input.require_id("user_id")?;
    let id = input.require_id("id")?;
    let business = business_fields(&input)?;

    state.db.update_business(user_id, id, business).await?;
    Ok(ApiResponse::message("Business updated successfully."))
}

pub async fn delete_business(state: &mut RequestState, input: ActionInput) -> ServiceResult<ApiResponse> {
    let user_id = input.require_id("user_id")?;
    let id = input.require_id("id")?;

    state.db.delete_business(&state.images, user_id, id).await?;
    Ok(ApiResponse::message(
        "Business and all of its data deleted successfully.",
    ))
}

pub async fn get_public_businesses(state: &mut RequestState) -> ServiceResult<ApiResponse> {
    let businesses = state.db.list_public_businesses().await?;
    ApiResponse::data(businesses.iter().map(BusinessDto::from).collect::<Vec<_>>())
}
