use sqlx::FromRow;

#[derive(Debug, PartialEq, Clone, FromRow)]
pub struct User {
    pub id: i64,
    pub username: String,
}

#[derive(Debug, PartialEq, Clone, FromRow)]
pub struct Business {
    pub id: i64,
    pub user_id: i64,
    pub name: String,
    pub description: Option<String>,
    pub logo_url: Option<String>,
}

#[derive(Debug, PartialEq, Clone)]
pub struct NewBusiness {
    pub name: String,
    pub description: Option<String>,
    pub logo_url: Option<String>,
}

/// Name and description in the default language plus the `_en` and `_fr` variants.
#[derive(Debug, PartialEq, Clone, Default, FromRow)]
pub struct LocalizedText {
    pub name: String,
    pub description: Option<String>,
    pub name_en: Option<String>,
    pub description_en: Option<String>,
    pub name_fr: Option<String>,
    pub description_fr: Option<String>,
}

impl LocalizedText {
    #[cfg(test)]
    pub fn named(name: &str) -> Self {
        LocalizedText {
            name: name.to_owned(),
            ..Default::default()
        }
    }
}

#[derive(Debug, PartialEq, Clone, FromRow)]
pub struct Category {
    pub id: i64,
    pub business_id: i64,
    #[sqlx(flatten)]
    pub text: LocalizedText,
    pub order_num: i64,
}

#[derive(Debug, PartialEq, Clone)]
pub struct CategoryFields {
    pub text: LocalizedText,
    pub order_num: i64,
}

#[derive(Debug, PartialEq, Clone, FromRow)]
pub struct MenuItem {
    pub id: i64,
    pub category_id: i64,
    #[sqlx(flatten)]
    pub text: LocalizedText,
    pub price: Option<f64>,
    pub is_available: bool,
}

#[derive(Debug, PartialEq, Clone)]
pub struct NewMenuItem {
    pub category_id: i64,
    pub text: LocalizedText,
    pub price: Option<f64>,
    pub is_available: bool,
}

#[derive(Debug, PartialEq, Clone, FromRow)]
pub struct ItemImage {
    pub id: i64,
    pub item_id: i64,
    pub image_path: String,
    pub order_num: i64,
}

#[derive(Debug, PartialEq, Clone)]
pub struct MenuItemWithImages {
    pub item: MenuItem,
    pub images: Vec<ItemImage>,
}

#[derive(Debug, PartialEq, Clone)]
pub struct MenuSection {
    pub category: Category,
    pub items: Vec<MenuItemWithImages>,
}

/// A field of a partial update: left alone, explicitly cleared, or set.
#[derive(Debug, PartialEq, Clone, Default)]
pub enum Patch<T> {
    #[default]
    Absent,
    Null,
    Value(T),
}

impl<T> Patch<T> {
    pub fn is_present(&self) -> bool {
        !matches!(self, Patch::Absent)
    }

    /// The new column value, `None` meaning SQL `NULL`. Only meaningful when present.
    pub fn value(&self) -> Option<&T> {
        match self {
            Patch::Value(value) => Some(value),
            _ => None,
        }
    }
}

#[derive(Debug, PartialEq, Clone, Default)]
pub struct MenuItemPatch {
    pub name: Patch<String>,
    pub description: Patch<String>,
    pub name_en: Patch<String>,
    pub description_en: Patch<String>,
    pub name_fr: Patch<String>,
    pub description_fr: Patch<String>,
    pub price: Patch<f64>,
    pub is_available: Patch<bool>,
}

impl MenuItemPatch {
    /// Columns of `menu_items` that applying this patch writes.
    pub fn columns(&self) -> Vec<&'static str> {
        let text = [
            ("name", &self.name),
            ("description", &self.description),
            ("name_en", &self.name_en),
            ("description_en", &self.description_en),
            ("name_fr", &self.name_fr),
            ("description_fr", &self.description_fr),
        ];

        let mut columns: Vec<&'static str> = text
            .iter()
            .filter(|(_, patch)| patch.is_present())
            .map(|(column, _)| *column)
            .collect();
        if self.price.is_present() {
            columns.push("price");
        }
        if self.is_available.is_present() {
            columns.push("is_available");
        }
        columns
    }

    pub fn is_empty(&self) -> bool {
        self.columns().is_empty()
    }
}
