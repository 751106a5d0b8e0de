use crate::error::{ServiceError, ServiceResult};

use super::DatabaseConnection;

impl DatabaseConnection {
    pub async fn owns_business(&mut self, business_id: i64, user_id: i64) -> ServiceResult<bool> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM businesses WHERE id = ? AND user_id = ?")
                .bind(business_id)
                .bind(user_id)
                .fetch_one(&mut *self.connection)
                .await?;
        Ok(count > 0)
    }

    pub async fn owns_category(&mut self, category_id: i64, user_id: i64) -> ServiceResult<bool> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM menu_categories mc
             JOIN businesses b ON mc.business_id = b.id
             WHERE mc.id = ? AND b.user_id = ?",
        )
        .bind(category_id)
        .bind(user_id)
        .fetch_one(&mut *self.connection)
        .await?;
        Ok(count > 0)
    }

    pub async fn owns_item(&mut self, item_id: i64, user_id: i64) -> ServiceResult<bool> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM menu_items mi
             JOIN menu_categories mc ON mi.category_id = mc.id
             JOIN businesses b ON mc.business_id = b.id
             WHERE mi.id = ? AND b.user_id = ?",
        )
        .bind(item_id)
        .bind(user_id)
        .fetch_one(&mut *self.connection)
        .await?;
        Ok(count > 0)
    }

    pub async fn require_business_owner(&mut self, business_id: i64, user_id: i64) -> ServiceResult<()> {
        if self.owns_business(business_id, user_id).await? {
            return Ok(());
        }
        log::warn!("User {} denied access to business {}", user_id, business_id);
        Err(ServiceError::PermissionDenied(
            "You do not have permission to access this business, or it does not exist.",
        ))
    }

    pub async fn require_category_owner(&mut self, category_id: i64, user_id: i64) -> ServiceResult<()> {
        if self.owns_category(category_id, user_id).await? {
            return Ok(());
        }
        log::warn!("User {} denied access to category {}", user_id, category_id);
        Err(ServiceError::PermissionDenied(
            "You do not have permission to access this category, or it does not exist.",
        ))
    }

    pub async fn require_item_owner(&mut self, item_id: i64, user_id: i64) -> ServiceResult<()> {
        if self.owns_item(item_id, user_id).await? {
            return Ok(());
        }
        log::warn!("User {} denied access to menu item {}", user_id, item_id);
        Err(ServiceError::PermissionDenied(
            "You do not have permission to access this menu item, or it does not exist.",
        ))
    }
}
