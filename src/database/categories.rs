use crate::error::ServiceResult;
use crate::image_store::ImageStore;
use crate::models::{Category, CategoryFields};

use super::DatabaseConnection;

impl DatabaseConnection {
    pub async fn add_category(
        &mut self,
        user_id: i64,
        business_id: i64,
        category: CategoryFields,
    ) -> ServiceResult<i64> {
        self.require_business_owner(business_id, user_id).await?;

        let text = category.text;
        let result = sqlx::query(
            "INSERT INTO menu_categories
             (business_id, name, description, name_en, description_en, name_fr, description_fr, order_num)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(business_id)
        .bind(text.name)
        .bind(text.description)
        .bind(text.name_en)
        .bind(text.description_en)
        .bind(text.name_fr)
        .bind(text.description_fr)
        .bind(category.order_num)
        .execute(&mut *self.connection)
        .await?;

        Ok(result.last_insert_rowid())
    }

    pub async fn list_categories(&mut self, user_id: i64, business_id: i64) -> ServiceResult<Vec<Category>> {
        self.require_business_owner(business_id, user_id).await?;
        self.categories_of_business(business_id).await
    }

    pub(super) async fn categories_of_business(&mut self, business_id: i64) -> ServiceResult<Vec<Category>> {
        let categories = sqlx::query_as::<_, Category>(
            "SELECT id, business_id, name, description, name_en, description_en, name_fr, description_fr,
                    COALESCE(order_num, 0) AS order_num
             FROM menu_categories WHERE business_id = ?
             ORDER BY order_num ASC, name ASC",
        )
        .bind(business_id)
        .fetch_all(&mut *self.connection)
        .await?;

        Ok(categories)
    }

    pub async fn update_category(
        &mut self,
        user_id: i64,
        category_id: i64,
        category: CategoryFields,
    ) -> ServiceResult<()> {
        self.require_category_owner(category_id, user_id).await?;

        let text = category.text;
        sqlx::query(
            "UPDATE menu_categories
             SET name = ?, description = ?, name_en = ?, description_en = ?, name_fr = ?, description_fr = ?, order_num = ?
             WHERE id = ?",
        )
        .bind(text.name)
        .bind(text.description)
        .bind(text.name_en)
        .bind(text.description_en)
        .bind(text.name_fr)
        .bind(text.description_fr)
        .bind(category.order_num)
        .bind(category_id)
        .execute(&mut *self.connection)
        .await?;

        Ok(())
    }

    /// Delete the category with all its items and their image files.
    pub async fn delete_category(
        &mut self,
        images: &ImageStore,
        user_id: i64,
        category_id: i64,
    ) -> ServiceResult<()> {
        self.require_category_owner(category_id, user_id).await?;

        let image_paths: Vec<String> = sqlx::query_scalar(
            "SELECT img.image_path FROM menu_item_images img
             JOIN menu_items mi ON img.item_id = mi.id
             WHERE mi.category_id = ?",
        )
        .bind(category_id)
        .fetch_all(&mut *self.connection)
        .await?;
        images.remove_all(&image_paths).await;

        sqlx::query("DELETE FROM menu_categories WHERE id = ?")
            .bind(category_id)
            .execute(&mut *self.connection)
            .await?;

        log::info!("Deleted category {} ({} image files)", category_id, image_paths.len());
        Ok(())
    }
}
