use std::collections::HashMap;

use crate::error::ServiceResult;
use crate::models::{ItemImage, MenuItem, MenuItemWithImages, MenuSection};

use super::menu_items::{attach_grouped, group_images};
use super::DatabaseConnection;

impl DatabaseConnection {
    /// Every category of the business with all of its items, for the owner.
    pub async fn full_menu(&mut self, user_id: i64, business_id: i64) -> ServiceResult<Vec<MenuSection>> {
        self.require_business_owner(business_id, user_id).await?;
        self.menu_of_business(business_id, false).await
    }

    /// The menu as guests see it: only available items, no ownership required.
    pub async fn public_menu(&mut self, business_id: i64) -> ServiceResult<Vec<MenuSection>> {
        self.menu_of_business(business_id, true).await
    }

    async fn menu_of_business(
        &mut self,
        business_id: i64,
        available_only: bool,
    ) -> ServiceResult<Vec<MenuSection>> {
        let categories = self.categories_of_business(business_id).await?;

        let items = sqlx::query_as::<_, MenuItem>(
            "SELECT mi.id, mi.category_id, mi.name, mi.description, mi.name_en, mi.description_en,
                    mi.name_fr, mi.description_fr, mi.price, COALESCE(mi.is_available, 1) AS is_available
             FROM menu_items mi
             JOIN menu_categories mc ON mi.category_id = mc.id
             WHERE mc.business_id = ? AND (? = 0 OR COALESCE(mi.is_available, 1) = 1)
             ORDER BY mi.name ASC",
        )
        .bind(business_id)
        .bind(available_only)
        .fetch_all(&mut *self.connection)
        .await?;

        let images = sqlx::query_as::<_, ItemImage>(
            "SELECT img.id, img.item_id, img.image_path, COALESCE(img.order_num, 0) AS order_num
             FROM menu_item_images img
             JOIN menu_items mi ON img.item_id = mi.id
             JOIN menu_categories mc ON mi.category_id = mc.id
             WHERE mc.business_id = ?
             ORDER BY img.item_id ASC, img.order_num ASC, img.id ASC",
        )
        .bind(business_id)
        .fetch_all(&mut *self.connection)
        .await?;

        let mut grouped = group_images(images);
        let mut by_category: HashMap<i64, Vec<MenuItemWithImages>> = HashMap::new();
        for entry in attach_grouped(items, &mut grouped) {
            by_category
                .entry(entry.item.category_id)
                .or_default()
                .push(entry);
        }

        let menu = categories
            .into_iter()
            .map(|category| MenuSection {
                items: by_category.remove(&category.id).unwrap_or_default(),
                category,
            })
            .collect();

        Ok(menu)
    }
}
