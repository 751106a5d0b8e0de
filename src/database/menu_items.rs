use std::collections::HashMap;

use sqlx::{Connection, SqliteConnection};

use crate::error::{ServiceError, ServiceResult};
use crate::image_store::{ImageStore, ImageUpload};
use crate::models::{ItemImage, MenuItem, MenuItemPatch, MenuItemWithImages, NewMenuItem};

use super::DatabaseConnection;

/// Static update statement: each column is only overwritten when its flag is set.
const UPDATE_MENU_ITEM: &str = "UPDATE menu_items SET
    name = CASE WHEN ? THEN ? ELSE name END,
    description = CASE WHEN ? THEN ? ELSE description END,
    name_en = CASE WHEN ? THEN ? ELSE name_en END,
    description_en = CASE WHEN ? THEN ? ELSE description_en END,
    name_fr = CASE WHEN ? THEN ? ELSE name_fr END,
    description_fr = CASE WHEN ? THEN ? ELSE description_fr END,
    price = CASE WHEN ? THEN ? ELSE price END,
    is_available = CASE WHEN ? THEN ? ELSE is_available END
    WHERE id = ?";

async fn insert_menu_item(connection: &mut SqliteConnection, item: &NewMenuItem) -> ServiceResult<i64> {
    let text = &item.text;
    let result = sqlx::query(
        "INSERT INTO menu_items
         (category_id, name, description, name_en, description_en, name_fr, description_fr, price, is_available)
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(item.category_id)
    .bind(&text.name)
    .bind(&text.description)
    .bind(&text.name_en)
    .bind(&text.description_en)
    .bind(&text.name_fr)
    .bind(&text.description_fr)
    .bind(item.price)
    .bind(item.is_available)
    .execute(&mut *connection)
    .await?;

    Ok(result.last_insert_rowid())
}

async fn apply_patch(connection: &mut SqliteConnection, item_id: i64, patch: &MenuItemPatch) -> ServiceResult<()> {
    sqlx::query(UPDATE_MENU_ITEM)
        .bind(patch.name.is_present())
        .bind(patch.name.value())
        .bind(patch.description.is_present())
        .bind(patch.description.value())
        .bind(patch.name_en.is_present())
        .bind(patch.name_en.value())
        .bind(patch.description_en.is_present())
        .bind(patch.description_en.value())
        .bind(patch.name_fr.is_present())
        .bind(patch.name_fr.value())
        .bind(patch.description_fr.is_present())
        .bind(patch.description_fr.value())
        .bind(patch.price.is_present())
        .bind(patch.price.value().copied())
        .bind(patch.is_available.is_present())
        .bind(patch.is_available.value().copied())
        .bind(item_id)
        .execute(&mut *connection)
        .await?;

    Ok(())
}

async fn image_paths_of_item(connection: &mut SqliteConnection, item_id: i64) -> ServiceResult<Vec<String>> {
    let paths = sqlx::query_scalar(
        "SELECT image_path FROM menu_item_images WHERE item_id = ? ORDER BY order_num ASC",
    )
    .bind(item_id)
    .fetch_all(&mut *connection)
    .await?;

    Ok(paths)
}

/// Store every upload and link it to the item in submission order.
///
/// Paths of files written so far are pushed to `written`, also when a later step fails.
async fn attach_images(
    connection: &mut SqliteConnection,
    images: &ImageStore,
    item_id: i64,
    uploads: &[ImageUpload],
    written: &mut Vec<String>,
) -> ServiceResult<()> {
    for (order_num, upload) in uploads.iter().enumerate() {
        let image_path = images.store(upload).await?;
        written.push(image_path.clone());

        sqlx::query("INSERT INTO menu_item_images (item_id, image_path, order_num) VALUES (?, ?, ?)")
            .bind(item_id)
            .bind(&image_path)
            .bind(order_num as i64)
            .execute(&mut *connection)
            .await?;
    }

    Ok(())
}

pub(super) fn group_images(images: Vec<ItemImage>) -> HashMap<i64, Vec<ItemImage>> {
    let mut grouped: HashMap<i64, Vec<ItemImage>> = HashMap::new();
    for image in images {
        grouped.entry(image.item_id).or_default().push(image);
    }
    grouped
}

pub(super) fn attach_grouped(
    items: Vec<MenuItem>,
    grouped: &mut HashMap<i64, Vec<ItemImage>>,
) -> Vec<MenuItemWithImages> {
    items
        .into_iter()
        .map(|item| {
            let images = grouped.remove(&item.id).unwrap_or_default();
            MenuItemWithImages { item, images }
        })
        .collect()
}

impl DatabaseConnection {
    /// Insert the item together with its images as one unit.
    ///
    /// Either the item exists with every submitted image afterwards, or nothing was
    /// stored at all.
    pub async fn add_menu_item(
        &mut self,
        images: &ImageStore,
        user_id: i64,
        item: NewMenuItem,
        uploads: &[ImageUpload],
    ) -> ServiceResult<i64> {
        for upload in uploads {
            images.validate(upload)?;
        }
        self.require_category_owner(item.category_id, user_id).await?;

        let mut written = Vec::new();
        let outcome: ServiceResult<i64> = async {
            let mut transaction = self.connection.begin().await?;
            let item_id = insert_menu_item(&mut transaction, &item).await?;
            attach_images(&mut transaction, images, item_id, uploads, &mut written).await?;
            transaction.commit().await?;
            Ok(item_id)
        }
        .await;

        match outcome {
            Ok(item_id) => {
                log::info!(
                    "Added menu item {} to category {} with {} images",
                    item_id,
                    item.category_id,
                    written.len()
                );
                Ok(item_id)
            }
            Err(e) => {
                images.remove_all(&written).await;
                Err(e)
            }
        }
    }

    /// Apply a partial update. Submitted images replace all existing images.
    pub async fn update_menu_item(
        &mut self,
        images: &ImageStore,
        user_id: i64,
        item_id: i64,
        patch: MenuItemPatch,
        uploads: &[ImageUpload],
    ) -> ServiceResult<()> {
        if patch.is_empty() && uploads.is_empty() {
            return Err(ServiceError::Validation("Nothing to update.".to_string()));
        }
        for upload in uploads {
            images.validate(upload)?;
        }
        self.require_item_owner(item_id, user_id).await?;

        let mut written = Vec::new();
        let mut replaced = Vec::new();
        let outcome: ServiceResult<()> = async {
            let mut transaction = self.connection.begin().await?;
            if !patch.is_empty() {
                apply_patch(&mut transaction, item_id, &patch).await?;
            }
            if !uploads.is_empty() {
                replaced = image_paths_of_item(&mut transaction, item_id).await?;
                sqlx::query("DELETE FROM menu_item_images WHERE item_id = ?")
                    .bind(item_id)
                    .execute(&mut *transaction)
                    .await?;
                attach_images(&mut transaction, images, item_id, uploads, &mut written).await?;
            }
            transaction.commit().await?;
            Ok(())
        }
        .await;

        match outcome {
            Ok(()) => {
                // old files are only dropped once their rows are gone for good
                images.remove_all(&replaced).await;
                log::info!(
                    "Updated menu item {} (columns: {:?}, images replaced: {})",
                    item_id,
                    patch.columns(),
                    !uploads.is_empty()
                );
                Ok(())
            }
            Err(e) => {
                images.remove_all(&written).await;
                Err(e)
            }
        }
    }

    pub async fn delete_menu_item(
        &mut self,
        images: &ImageStore,
        user_id: i64,
        item_id: i64,
    ) -> ServiceResult<()> {
        self.require_item_owner(item_id, user_id).await?;

        let image_paths = image_paths_of_item(&mut self.connection, item_id).await?;
        images.remove_all(&image_paths).await;

        sqlx::query("DELETE FROM menu_items WHERE id = ?")
            .bind(item_id)
            .execute(&mut *self.connection)
            .await?;

        log::info!("Deleted menu item {} ({} image files)", item_id, image_paths.len());
        Ok(())
    }

    pub async fn list_menu_items(
        &mut self,
        user_id: i64,
        category_id: i64,
    ) -> ServiceResult<Vec<MenuItemWithImages>> {
        self.require_category_owner(category_id, user_id).await?;

        let items = sqlx::query_as::<_, MenuItem>(
            "SELECT id, category_id, name, description, name_en, description_en, name_fr, description_fr,
                    price, COALESCE(is_available, 1) AS is_available
             FROM menu_items WHERE category_id = ? ORDER BY name ASC",
        )
        .bind(category_id)
        .fetch_all(&mut *self.connection)
        .await?;

        let images = sqlx::query_as::<_, ItemImage>(
            "SELECT img.id, img.item_id, img.image_path, COALESCE(img.order_num, 0) AS order_num
             FROM menu_item_images img
             JOIN menu_items mi ON img.item_id = mi.id
             WHERE mi.category_id = ?
             ORDER BY img.item_id ASC, img.order_num ASC, img.id ASC",
        )
        .bind(category_id)
        .fetch_all(&mut *self.connection)
        .await?;

        Ok(attach_grouped(items, &mut group_images(images)))
    }
}
