use crate::error::ServiceResult;
use crate::image_store::ImageStore;
use crate::models::{Business, NewBusiness};

use super::DatabaseConnection;

impl DatabaseConnection {
    pub async fn add_business(&mut self, user_id: i64, business: NewBusiness) -> ServiceResult<i64> {
        let result = sqlx::query(
            "INSERT INTO businesses (user_id, name, description, logo_url) VALUES (?, ?, ?, ?)",
        )
        .bind(user_id)
        .bind(business.name)
        .bind(business.description)
        .bind(business.logo_url)
        .execute(&mut *self.connection)
        .await?;

        Ok(result.last_insert_rowid())
    }

    pub async fn list_businesses(&mut self, user_id: i64) -> ServiceResult<Vec<Business>> {
        let businesses = sqlx::query_as::<_, Business>(
            "SELECT id, user_id, name, description, logo_url FROM businesses
             WHERE user_id = ? ORDER BY name ASC",
        )
        .bind(user_id)
        .fetch_all(&mut *self.connection)
        .await?;

        Ok(businesses)
    }

    pub async fn list_public_businesses(&mut self) -> ServiceResult<Vec<Business>> {
        let businesses = sqlx::query_as::<_, Business>(
            "SELECT id, user_id, name, description, logo_url FROM businesses ORDER BY name ASC",
        )
        .fetch_all(&mut *self.connection)
        .await?;

        Ok(businesses)
    }

    pub async fn update_business(
        &mut self,
        user_id: i64,
        business_id: i64,
        business: NewBusiness,
    ) -> ServiceResult<()> {
        self.require_business_owner(business_id, user_id).await?;

        sqlx::query(
            "UPDATE businesses SET name = ?, description = ?, logo_url = ?
             WHERE id = ? AND user_id = ?",
        )
        .bind(business.name)
        .bind(business.description)
        .bind(business.logo_url)
        .bind(business_id)
        .bind(user_id)
        .execute(&mut *self.connection)
        .await?;

        Ok(())
    }

    /// Delete the business with all its categories, items and image files.
    pub async fn delete_business(
        &mut self,
        images: &ImageStore,
        user_id: i64,
        business_id: i64,
    ) -> ServiceResult<()> {
        self.require_business_owner(business_id, user_id).await?;

        let image_paths: Vec<String> = sqlx::query_scalar(
            "SELECT img.image_path FROM menu_item_images img
             JOIN menu_items mi ON img.item_id = mi.id
             JOIN menu_categories mc ON mi.category_id = mc.id
             WHERE mc.business_id = ?",
        )
        .bind(business_id)
        .fetch_all(&mut *self.connection)
        .await?;
        images.remove_all(&image_paths).await;

        // categories, items and image rows follow through ON DELETE CASCADE
        sqlx::query("DELETE FROM businesses WHERE id = ? AND user_id = ?")
            .bind(business_id)
            .bind(user_id)
            .execute(&mut *self.connection)
            .await?;

        log::info!(
            "Deleted business {} of user {} ({} image files)",
            business_id,
            user_id,
            image_paths.len()
        );
        Ok(())
    }
}
