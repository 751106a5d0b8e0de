use serde::Serialize;

use crate::error::ServiceResult;
use crate::models;
use crate::request_state::RequestState;

use super::input::ActionInput;
use super::ApiResponse;

#[derive(Debug, PartialEq, Serialize)]
pub struct CategoryDto {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub name_en: Option<String>,
    pub description_en: Option<String>,
    pub name_fr: Option<String>,
    pub description_fr: Option<String>,
    pub order_num: i64,
}

impl From<&models::Category> for CategoryDto {
    fn from(value: &models::Category) -> Self {
        let text = &value.text;
        Self {
            id: value.id,
            name: text.name.to_owned(),
            description: text.description.to_owned(),
            name_en: text.name_en.to_owned(),
            description_en: text.description_en.to_owned(),
            name_fr: text.name_fr.to_owned(),
            description_fr: text.description_fr.to_owned(),
            order_num: value.order_num,
        }
    }
}

fn category_fields(input: &ActionInput) -> ServiceResult<models::CategoryFields> {
    Ok(models::CategoryFields {
        text: input.localized_text()?,
        order_num: input.optional_int("order_num")?.unwrap_or(0),
    })
}

pub async fn add_category(state: &mut RequestState, input: ActionInput) -> ServiceResult<ApiResponse> {
    let user_id = input.require_id("user_id")?;
    let business_id = input.require_id("business_id")?;
    let category = category_fields(&input)?;

    let id = state.db.add_category(user_id, business_id, category).await?;
    Ok(ApiResponse::created("Category added successfully.", id))
}

pub async fn get_categories(state: &mut RequestState, input: ActionInput) -> ServiceResult<ApiResponse> {
    let user_id = input.require_id("user_id")?;
    let business_id = input.require_id("business_id")?;

    let categories = state.db.list_categories(user_id, business_id).await?;
    ApiResponse::data(categories.iter().map(CategoryDto::from).collect::<Vec<_>>())
}

pub async fn update_category(state: &mut RequestState, input: ActionInput) -> ServiceResult<ApiResponse> {
    let user_id = input.require_id("user_id")?;
    let id = input.require_id("id")?;
    let category = category_fields(&input)?;

    state.db.update_category(user_id, id, category).await?;
    Ok(ApiResponse::message("Category updated successfully."))
}

pub async fn delete_category(state: &mut RequestState, input: ActionInput) -> ServiceResult<ApiResponse> {
    let user_id = input.require_id("user_id")?;
    let id = input.require_id("id")?;

    state.db.delete_category(&state.images, user_id, id).await?;
    Ok(ApiResponse::message(
        "Category and all of its items deleted successfully.",
    ))
}
