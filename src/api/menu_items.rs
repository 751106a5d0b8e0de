use serde::Serialize;

use crate::error::{ServiceError, ServiceResult};
use crate::models;
use crate::request_state::RequestState;

use super::input::ActionInput;
use super::ApiResponse;

#[derive(Debug, PartialEq, Serialize)]
pub struct ItemImageDto {
    pub id: i64,
    pub image_path: String,
    pub order_num: i64,
}

impl From<&models::ItemImage> for ItemImageDto {
    fn from(value: &models::ItemImage) -> Self {
        Self {
            id: value.id,
            image_path: value.image_path.to_owned(),
            order_num: value.order_num,
        }
    }
}

#[derive(Debug, PartialEq, Serialize)]
pub struct MenuItemDto {
    pub id: i64,
    pub category_id: i64,
    pub name: String,
    pub description: Option<String>,
    pub name_en: Option<String>,
    pub description_en: Option<String>,
    pub name_fr: Option<String>,
    pub description_fr: Option<String>,
    pub price: Option<f64>,
    pub is_available: bool,
    pub images: Vec<ItemImageDto>,
}

impl From<&models::MenuItemWithImages> for MenuItemDto {
    fn from(value: &models::MenuItemWithImages) -> Self {
        let item = &value.item;
        let text = &item.text;
        Self {
            id: item.id,
            category_id: item.category_id,
            name: text.name.to_owned(),
            description: text.description.to_owned(),
            name_en: text.name_en.to_owned(),
            description_en: text.description_en.to_owned(),
            name_fr: text.name_fr.to_owned(),
            description_fr: text.description_fr.to_owned(),
            price: item.price,
            is_available: item.is_available,
            images: value.images.iter().map(ItemImageDto::from).collect(),
        }
    }
}

fn item_patch(input: &ActionInput) -> ServiceResult<models::MenuItemPatch> {
    let name = input.text_patch("name")?;
    if let models::Patch::Value(ref name) = name {
        if name.trim().is_empty() {
            return Err(ServiceError::Validation(
                "Field 'name' must not be empty.".to_string(),
            ));
        }
    }

    Ok(models::MenuItemPatch {
        name,
        description: input.text_patch("description")?,
        name_en: input.text_patch("name_en")?,
        description_en: input.text_patch("description_en")?,
        name_fr: input.text_patch("name_fr")?,
        description_fr: input.text_patch("description_fr")?,
        price: input.price_patch("price")?,
        is_available: input.bool_patch("is_available")?,
    })
}

pub async fn add_menu_item(state: &mut RequestState, input: ActionInput) -> ServiceResult<ApiResponse> {
    let user_id = input.require_id("user_id")?;
    let item = models::NewMenuItem {
        category_id: input.require_id("category_id")?,
        text: input.localized_text()?,
        price: input.optional_price("price")?,
        is_available: input.optional_bool("is_available")?.unwrap_or(true),
    };

    let id = state
        .db
        .add_menu_item(&state.images, user_id, item, &input.images)
        .await?;
    Ok(ApiResponse::created("Menu item added successfully.", id))
}

pub async fn update_menu_item(state: &mut RequestState, input: ActionInput) -> ServiceResult<ApiResponse> {
    let user_id = input.require_id("user_id")?;
    let id = input.require_id("id")?;
    let patch = item_patch(&input)?;

    state
        .db
        .update_menu_item(&state.images, user_id, id, patch, &input.images)
        .await?;
    Ok(ApiResponse::message("Menu item updated successfully."))
}

pub async fn delete_menu_item(state: &mut RequestState, input: ActionInput) -> ServiceResult<ApiResponse> {
    let user_id = input.require_id("user_id")?;
    let id = input.require_id("id")?;

    state.db.delete_menu_item(&state.images, user_id, id).await?;
    Ok(ApiResponse::message("Menu item deleted successfully."))
}

pub async fn get_menu_items(state: &mut RequestState, input: ActionInput) -> ServiceResult<ApiResponse> {
    let user_id = input.require_id("user_id")?;
    let category_id = input.require_id("category_id")?;

    let items = state.db.list_menu_items(user_id, category_id).await?;
    ApiResponse::data(items.iter().map(MenuItemDto::from).collect::<Vec<_>>())
}
