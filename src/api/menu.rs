use serde::Serialize;

use crate::error::ServiceResult;
use crate::models;
use crate::request_state::RequestState;

use super::categories::CategoryDto;
use super::input::ActionInput;
use super::menu_items::MenuItemDto;
use super::ApiResponse;

#[derive(Debug, PartialEq, Serialize)]
pub struct MenuSectionDto {
    #[serde(flatten)]
    pub category: CategoryDto,
    pub items: Vec<MenuItemDto>,
}

impl From<&models::MenuSection> for MenuSectionDto {
    fn from(value: &models::MenuSection) -> Self {
        Self {
            category: (&value.category).into(),
            items: value.items.iter().map(MenuItemDto::from).collect(),
        }
    }
}

pub async fn get_menu_by_business(state: &mut RequestState, input: ActionInput) -> ServiceResult<ApiResponse> {
    let user_id = input.require_id("user_id")?;
    let business_id = input.require_id("business_id")?;

    let menu = state.db.full_menu(user_id, business_id).await?;
    ApiResponse::data(menu.iter().map(MenuSectionDto::from).collect::<Vec<_>>())
}

pub async fn get_public_menu_by_business(
    state: &mut RequestState,
    input: ActionInput,
) -> ServiceResult<ApiResponse> {
    let business_id = input.require_id("business_id")?;

    let menu = state.db.public_menu(business_id).await?;
    ApiResponse::data(menu.iter().map(MenuSectionDto::from).collect::<Vec<_>>())
}
