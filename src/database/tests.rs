use std::time::Duration;

use axum::body::Bytes;
use sqlx::SqlitePool;
use tempfile::TempDir;

use crate::error::ServiceError;
use crate::image_store::{ImageStore, ImageUpload};
use crate::models::{CategoryFields, LocalizedText, MenuItemPatch, NewBusiness, NewMenuItem, Patch};

use super::{AppState, DatabaseConnection};

struct Fixture {
    app_state: AppState,
    root: TempDir,
}

impl Fixture {
    async fn new(pool: SqlitePool) -> Fixture {
        let root = tempfile::tempdir().unwrap();
        let images = ImageStore::new(root.path(), "uploads/menu_items", 1024);
        let app_state = AppState::from_pool(pool, images).await.unwrap();
        Fixture { app_state, root }
    }

    async fn db(&self) -> DatabaseConnection {
        self.app_state.connection().await.unwrap()
    }

    fn images(&self) -> &ImageStore {
        &self.app_state.images
    }

    fn file_exists(&self, relative_path: &str) -> bool {
        self.root.path().join(relative_path).is_file()
    }

    fn stored_files(&self) -> usize {
        match std::fs::read_dir(self.root.path().join("uploads/menu_items")) {
            Ok(entries) => entries.count(),
            Err(_) => 0,
        }
    }
}

fn upload(file_name: &str, content_type: &str, data: &'static [u8]) -> ImageUpload {
    ImageUpload {
        file_name: file_name.to_string(),
        content_type: content_type.to_string(),
        data: Bytes::from_static(data),
    }
}

fn business(name: &str) -> NewBusiness {
    NewBusiness {
        name: name.to_string(),
        description: None,
        logo_url: None,
    }
}

fn category(name: &str, order_num: i64) -> CategoryFields {
    CategoryFields {
        text: LocalizedText::named(name),
        order_num,
    }
}

fn item(category_id: i64, name: &str, price: Option<f64>, is_available: bool) -> NewMenuItem {
    NewMenuItem {
        category_id,
        text: LocalizedText::named(name),
        price,
        is_available,
    }
}

async fn count(db: &mut DatabaseConnection, table: &str) -> i64 {
    sqlx::query_scalar::<_, i64>(&format!("SELECT COUNT(*) FROM {}", table))
        .fetch_one(&mut *db.connection)
        .await
        .unwrap()
}

/// User, business and category owned by "alice".
async fn alice_with_category(db: &mut DatabaseConnection) -> (i64, i64, i64) {
    let user = db.register_user("alice", "pw123").await.unwrap();
    let business_id = db.add_business(user.id, business("Cafe X")).await.unwrap();
    let category_id = db
        .add_category(user.id, business_id, category("Drinks", 0))
        .await
        .unwrap();
    (user.id, business_id, category_id)
}

#[sqlx::test(migrations = false)]
async fn test_register_then_authenticate(pool: SqlitePool) {
    let fixture = Fixture::new(pool).await;
    let mut db = fixture.db().await;

    let registered = db.register_user("alice", "pw123").await.unwrap();
    let authenticated = db.authenticate_user("alice", "pw123").await.unwrap();
    assert_eq!(registered, authenticated);
    assert_eq!(authenticated.username, "alice");

    let wrong_password = db.authenticate_user("alice", "pw124").await;
    let unknown_user = db.authenticate_user("bob", "pw123").await;
    assert_eq!(
        wrong_password,
        Err(ServiceError::Unauthorized("Invalid username or password."))
    );
    assert_eq!(wrong_password, unknown_user);

    // usernames are case sensitive
    assert!(db.authenticate_user("Alice", "pw123").await.is_err());
}

#[sqlx::test(migrations = false)]
async fn test_register_duplicate_username(pool: SqlitePool) {
    let fixture = Fixture::new(pool).await;
    let mut db = fixture.db().await;

    db.register_user("alice", "pw123").await.unwrap();
    let duplicate = db.register_user("alice", "other").await;
    assert_eq!(
        duplicate,
        Err(ServiceError::DuplicateEntry("Username already exists."))
    );
    assert_eq!(count(&mut db, "users").await, 1);

    db.register_user("Alice", "pw123").await.unwrap();
    assert_eq!(count(&mut db, "users").await, 2);
}

#[sqlx::test(migrations = false)]
async fn test_fixed_identity_is_find_or_create(pool: SqlitePool) {
    let fixture = Fixture::new(pool).await;
    let mut db = fixture.db().await;

    let (first, created) = db.login_or_register_fixed_identity("google_user").await.unwrap();
    assert!(created);
    let (second, created) = db.login_or_register_fixed_identity("google_user").await.unwrap();
    assert!(!created);
    assert_eq!(first, second);
    assert_eq!(count(&mut db, "users").await, 1);

    assert!(db
        .authenticate_user("google_user", "google_temp_password")
        .await
        .is_err());
}

#[sqlx::test(migrations = false)]
async fn test_ownership_chain(pool: SqlitePool) {
    let fixture = Fixture::new(pool).await;
    let mut db = fixture.db().await;

    let (alice, business_id, category_id) = alice_with_category(&mut db).await;
    let item_id = db
        .add_menu_item(fixture.images(), alice, item(category_id, "Latte", Some(3.5), true), &[])
        .await
        .unwrap();
    let bob = db.register_user("bob", "secret").await.unwrap().id;

    assert!(db.owns_business(business_id, alice).await.unwrap());
    assert!(db.owns_category(category_id, alice).await.unwrap());
    assert!(db.owns_item(item_id, alice).await.unwrap());

    assert!(!db.owns_business(business_id, bob).await.unwrap());
    assert!(!db.owns_category(category_id, bob).await.unwrap());
    assert!(!db.owns_item(item_id, bob).await.unwrap());
    assert!(!db.owns_item(item_id + 100, alice).await.unwrap());

    let denied = [
        db.delete_business(fixture.images(), bob, business_id).await,
        db.update_business(bob, business_id, business("Stolen")).await,
        db.add_category(bob, business_id, category("Food", 0))
            .await
            .map(|_| ()),
        db.list_categories(bob, business_id).await.map(|_| ()),
        db.delete_category(fixture.images(), bob, category_id).await,
        db.add_menu_item(fixture.images(), bob, item(category_id, "Tea", None, true), &[])
            .await
            .map(|_| ()),
        db.update_menu_item(
            fixture.images(),
            bob,
            item_id,
            MenuItemPatch {
                price: Patch::Null,
                ..Default::default()
            },
            &[],
        )
        .await,
        db.delete_menu_item(fixture.images(), bob, item_id).await,
        db.list_menu_items(bob, category_id).await.map(|_| ()),
        db.full_menu(bob, business_id).await.map(|_| ()),
    ];
    for result in denied {
        assert!(
            matches!(result, Err(ServiceError::PermissionDenied(_))),
            "expected permission denied, got {:?}",
            result
        );
    }

    // nothing was changed by the denied calls
    assert_eq!(count(&mut db, "businesses").await, 1);
    assert_eq!(count(&mut db, "menu_categories").await, 1);
    let items = db.list_menu_items(alice, category_id).await.unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].item.price, Some(3.5));
}

#[sqlx::test(migrations = false)]
async fn test_add_item_with_images_keeps_submission_order(pool: SqlitePool) {
    let fixture = Fixture::new(pool).await;
    let mut db = fixture.db().await;
    let (alice, _, category_id) = alice_with_category(&mut db).await;

    let uploads = [
        upload("first.png", "image/png", b"first"),
        upload("second.jpg", "image/jpeg", b"second"),
        upload("third.gif", "image/gif", b"third"),
    ];
    let item_id = db
        .add_menu_item(fixture.images(), alice, item(category_id, "Latte", None, true), &uploads)
        .await
        .unwrap();

    let items = db.list_menu_items(alice, category_id).await.unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].item.id, item_id);

    let images = &items[0].images;
    assert_eq!(
        images.iter().map(|i| i.order_num).collect::<Vec<_>>(),
        vec![0, 1, 2]
    );
    let contents: Vec<Vec<u8>> = images
        .iter()
        .map(|i| std::fs::read(fixture.root.path().join(&i.image_path)).unwrap())
        .collect();
    assert_eq!(
        contents,
        vec![b"first".to_vec(), b"second".to_vec(), b"third".to_vec()]
    );
    assert!(images[1].image_path.ends_with(".jpg"));
}

#[sqlx::test(migrations = false)]
async fn test_add_item_with_rejected_image_stores_nothing(pool: SqlitePool) {
    let fixture = Fixture::new(pool).await;
    let mut db = fixture.db().await;
    let (alice, _, category_id) = alice_with_category(&mut db).await;

    let uploads = [
        upload("ok.png", "image/png", b"fine"),
        upload("vector.svg", "image/svg+xml", b"<svg/>"),
    ];
    let result = db
        .add_menu_item(fixture.images(), alice, item(category_id, "Latte", None, true), &uploads)
        .await;

    assert!(matches!(result, Err(ServiceError::ImageError(_))));
    assert_eq!(count(&mut db, "menu_items").await, 0);
    assert_eq!(count(&mut db, "menu_item_images").await, 0);
    assert_eq!(fixture.stored_files(), 0);
}

#[sqlx::test(migrations = false)]
async fn test_add_item_rolls_back_when_storage_fails(pool: SqlitePool) {
    let fixture = Fixture::new(pool).await;
    let mut db = fixture.db().await;
    let (alice, _, category_id) = alice_with_category(&mut db).await;

    // a plain file where the upload directory should be makes every write fail
    std::fs::create_dir_all(fixture.root.path().join("uploads")).unwrap();
    std::fs::write(fixture.root.path().join("uploads/menu_items"), b"not a dir").unwrap();

    let result = db
        .add_menu_item(
            fixture.images(),
            alice,
            item(category_id, "Latte", None, true),
            &[upload("a.png", "image/png", b"a")],
        )
        .await;

    assert!(matches!(result, Err(ServiceError::ImageError(_))));
    assert_eq!(count(&mut db, "menu_items").await, 0);
    assert_eq!(count(&mut db, "menu_item_images").await, 0);
}

#[sqlx::test(migrations = false)]
async fn test_update_item_images(pool: SqlitePool) {
    let fixture = Fixture::new(pool).await;
    let mut db = fixture.db().await;
    let (alice, _, category_id) = alice_with_category(&mut db).await;

    let item_id = db
        .add_menu_item(
            fixture.images(),
            alice,
            item(category_id, "Latte", Some(3.5), true),
            &[
                upload("a.png", "image/png", b"a"),
                upload("b.png", "image/png", b"b"),
            ],
        )
        .await
        .unwrap();
    let original = db.list_menu_items(alice, category_id).await.unwrap()[0]
        .images
        .clone();
    assert_eq!(original.len(), 2);

    // no images submitted: images stay as they are
    db.update_menu_item(
        fixture.images(),
        alice,
        item_id,
        MenuItemPatch {
            name: Patch::Value("Flat White".to_string()),
            ..Default::default()
        },
        &[],
    )
    .await
    .unwrap();
    let entry = db.list_menu_items(alice, category_id).await.unwrap().remove(0);
    assert_eq!(entry.item.text.name, "Flat White");
    assert_eq!(entry.images, original);
    assert!(original.iter().all(|i| fixture.file_exists(&i.image_path)));

    // images submitted: the old set is replaced wholesale
    db.update_menu_item(
        fixture.images(),
        alice,
        item_id,
        MenuItemPatch::default(),
        &[upload("c.gif", "image/gif", b"c")],
    )
    .await
    .unwrap();
    let entry = db.list_menu_items(alice, category_id).await.unwrap().remove(0);
    assert_eq!(entry.images.len(), 1);
    assert_eq!(entry.images[0].order_num, 0);
    assert!(fixture.file_exists(&entry.images[0].image_path));
    assert!(original.iter().all(|i| !fixture.file_exists(&i.image_path)));
    assert_eq!(fixture.stored_files(), 1);
    assert_eq!(entry.item.price, Some(3.5));
}

#[sqlx::test(migrations = false)]
async fn test_update_item_with_rejected_image_keeps_old_images(pool: SqlitePool) {
    let fixture = Fixture::new(pool).await;
    let mut db = fixture.db().await;
    let (alice, _, category_id) = alice_with_category(&mut db).await;

    let item_id = db
        .add_menu_item(
            fixture.images(),
            alice,
            item(category_id, "Latte", None, true),
            &[upload("a.png", "image/png", b"a")],
        )
        .await
        .unwrap();

    let result = db
        .update_menu_item(
            fixture.images(),
            alice,
            item_id,
            MenuItemPatch {
                name: Patch::Value("Mocha".to_string()),
                ..Default::default()
            },
            &[upload("b.bmp", "image/bmp", b"b")],
        )
        .await;
    assert!(matches!(result, Err(ServiceError::ImageError(_))));

    let entry = db.list_menu_items(alice, category_id).await.unwrap().remove(0);
    assert_eq!(entry.item.text.name, "Latte");
    assert_eq!(entry.images.len(), 1);
    assert!(fixture.file_exists(&entry.images[0].image_path));
}

#[sqlx::test(migrations = false)]
async fn test_update_item_price_patch(pool: SqlitePool) {
    let fixture = Fixture::new(pool).await;
    let mut db = fixture.db().await;
    let (alice, _, category_id) = alice_with_category(&mut db).await;
    let item_id = db
        .add_menu_item(fixture.images(), alice, item(category_id, "Latte", Some(3.5), true), &[])
        .await
        .unwrap();

    db.update_menu_item(
        fixture.images(),
        alice,
        item_id,
        MenuItemPatch {
            description_fr: Patch::Value("Café au lait".to_string()),
            is_available: Patch::Value(false),
            ..Default::default()
        },
        &[],
    )
    .await
    .unwrap();
    let entry = db.list_menu_items(alice, category_id).await.unwrap().remove(0);
    assert_eq!(entry.item.price, Some(3.5));
    assert!(!entry.item.is_available);
    assert_eq!(entry.item.text.description_fr.as_deref(), Some("Café au lait"));
    assert_eq!(entry.item.text.name, "Latte");

    db.update_menu_item(
        fixture.images(),
        alice,
        item_id,
        MenuItemPatch {
            price: Patch::Null,
            ..Default::default()
        },
        &[],
    )
    .await
    .unwrap();
    let entry = db.list_menu_items(alice, category_id).await.unwrap().remove(0);
    assert_eq!(entry.item.price, None);
    assert_eq!(entry.item.text.description_fr.as_deref(), Some("Café au lait"));

    let nothing = db
        .update_menu_item(fixture.images(), alice, item_id, MenuItemPatch::default(), &[])
        .await;
    assert_eq!(
        nothing,
        Err(ServiceError::Validation("Nothing to update.".to_string()))
    );
}

#[sqlx::test(migrations = false)]
async fn test_delete_business_removes_descendants_and_files(pool: SqlitePool) {
    let fixture = Fixture::new(pool).await;
    let mut db = fixture.db().await;
    let (alice, business_id, drinks) = alice_with_category(&mut db).await;
    let food = db
        .add_category(alice, business_id, category("Food", 1))
        .await
        .unwrap();

    db.add_menu_item(
        fixture.images(),
        alice,
        item(drinks, "Latte", None, true),
        &[upload("a.png", "image/png", b"a"), upload("b.png", "image/png", b"b")],
    )
    .await
    .unwrap();
    db.add_menu_item(
        fixture.images(),
        alice,
        item(food, "Bagel", Some(2.0), true),
        &[upload("c.png", "image/png", b"c")],
    )
    .await
    .unwrap();

    // a second business of the same user must stay untouched
    let other_business = db.add_business(alice, business("Bakery")).await.unwrap();
    let other_category = db
        .add_category(alice, other_business, category("Bread", 0))
        .await
        .unwrap();
    db.add_menu_item(
        fixture.images(),
        alice,
        item(other_category, "Rye", None, true),
        &[upload("d.png", "image/png", b"d")],
    )
    .await
    .unwrap();
    assert_eq!(fixture.stored_files(), 4);

    db.delete_business(fixture.images(), alice, business_id)
        .await
        .unwrap();

    assert_eq!(count(&mut db, "businesses").await, 1);
    assert_eq!(count(&mut db, "menu_categories").await, 1);
    assert_eq!(count(&mut db, "menu_items").await, 1);
    assert_eq!(count(&mut db, "menu_item_images").await, 1);
    assert_eq!(fixture.stored_files(), 1);
}

#[sqlx::test(migrations = false)]
async fn test_delete_category_and_item_remove_files(pool: SqlitePool) {
    let fixture = Fixture::new(pool).await;
    let mut db = fixture.db().await;
    let (alice, business_id, drinks) = alice_with_category(&mut db).await;
    let food = db
        .add_category(alice, business_id, category("Food", 1))
        .await
        .unwrap();

    let latte = db
        .add_menu_item(
            fixture.images(),
            alice,
            item(drinks, "Latte", None, true),
            &[upload("a.png", "image/png", b"a")],
        )
        .await
        .unwrap();
    db.add_menu_item(
        fixture.images(),
        alice,
        item(food, "Bagel", None, true),
        &[upload("b.png", "image/png", b"b"), upload("c.png", "image/png", b"c")],
    )
    .await
    .unwrap();
    assert_eq!(fixture.stored_files(), 3);

    db.delete_menu_item(fixture.images(), alice, latte).await.unwrap();
    assert_eq!(count(&mut db, "menu_items").await, 1);
    assert_eq!(fixture.stored_files(), 2);

    db.delete_category(fixture.images(), alice, food).await.unwrap();
    assert_eq!(count(&mut db, "menu_categories").await, 1);
    assert_eq!(count(&mut db, "menu_items").await, 0);
    assert_eq!(count(&mut db, "menu_item_images").await, 0);
    assert_eq!(fixture.stored_files(), 0);
}

#[sqlx::test(migrations = false)]
async fn test_delete_tolerates_missing_files(pool: SqlitePool) {
    let fixture = Fixture::new(pool).await;
    let mut db = fixture.db().await;
    let (alice, _, category_id) = alice_with_category(&mut db).await;

    let item_id = db
        .add_menu_item(
            fixture.images(),
            alice,
            item(category_id, "Latte", None, true),
            &[upload("a.png", "image/png", b"a")],
        )
        .await
        .unwrap();
    let path = db.list_menu_items(alice, category_id).await.unwrap()[0].images[0]
        .image_path
        .clone();
    std::fs::remove_file(fixture.root.path().join(path)).unwrap();

    db.delete_menu_item(fixture.images(), alice, item_id).await.unwrap();
    assert_eq!(count(&mut db, "menu_items").await, 0);
}

#[sqlx::test(migrations = false)]
async fn test_menu_ordering_and_availability(pool: SqlitePool) {
    let fixture = Fixture::new(pool).await;
    let mut db = fixture.db().await;
    let (alice, business_id, drinks) = alice_with_category(&mut db).await;
    let desserts = db
        .add_category(alice, business_id, category("Desserts", 0))
        .await
        .unwrap();
    let starters = db
        .add_category(alice, business_id, category("Starters", -1))
        .await
        .unwrap();

    for (category_id, name, available) in [
        (drinks, "Tea", true),
        (drinks, "Espresso", false),
        (drinks, "Americano", true),
        (desserts, "Tiramisu", true),
    ] {
        db.add_menu_item(fixture.images(), alice, item(category_id, name, None, available), &[])
            .await
            .unwrap();
    }

    let categories = db.list_categories(alice, business_id).await.unwrap();
    assert_eq!(
        categories.iter().map(|c| c.id).collect::<Vec<_>>(),
        vec![starters, desserts, drinks]
    );

    let full = db.full_menu(alice, business_id).await.unwrap();
    let drinks_section = full.iter().find(|s| s.category.id == drinks).unwrap();
    assert_eq!(
        drinks_section
            .items
            .iter()
            .map(|e| e.item.text.name.as_str())
            .collect::<Vec<_>>(),
        vec!["Americano", "Espresso", "Tea"]
    );
    assert!(full.iter().find(|s| s.category.id == starters).unwrap().items.is_empty());

    let public = db.public_menu(business_id).await.unwrap();
    assert_eq!(public.len(), 3);
    let drinks_section = public.iter().find(|s| s.category.id == drinks).unwrap();
    assert_eq!(
        drinks_section
            .items
            .iter()
            .map(|e| e.item.text.name.as_str())
            .collect::<Vec<_>>(),
        vec!["Americano", "Tea"]
    );
    assert!(public
        .iter()
        .flat_map(|s| s.items.iter())
        .all(|e| e.item.is_available));

    assert!(db.public_menu(business_id + 100).await.unwrap().is_empty());
}

#[sqlx::test(migrations = false)]
async fn test_business_listing(pool: SqlitePool) {
    let fixture = Fixture::new(pool).await;
    let mut db = fixture.db().await;

    let alice = db.register_user("alice", "pw").await.unwrap().id;
    let bob = db.register_user("bob", "pw").await.unwrap().id;
    db.add_business(alice, business("Zeta Bar")).await.unwrap();
    let cafe = db.add_business(alice, business("Cafe X")).await.unwrap();
    db.add_business(bob, business("Mango")).await.unwrap();

    let names = |list: Vec<crate::models::Business>| {
        list.into_iter().map(|b| b.name).collect::<Vec<_>>()
    };
    assert_eq!(names(db.list_businesses(alice).await.unwrap()), vec!["Cafe X", "Zeta Bar"]);
    assert_eq!(names(db.list_businesses(bob).await.unwrap()), vec!["Mango"]);
    assert_eq!(
        names(db.list_public_businesses().await.unwrap()),
        vec!["Cafe X", "Mango", "Zeta Bar"]
    );

    db.update_business(
        alice,
        cafe,
        NewBusiness {
            name: "Cafe Y".to_string(),
            description: Some("Corner shop".to_string()),
            logo_url: Some("logos/y.png".to_string()),
        },
    )
    .await
    .unwrap();
    let updated = db.list_businesses(alice).await.unwrap().remove(0);
    assert_eq!(updated.name, "Cafe Y");
    assert_eq!(updated.description.as_deref(), Some("Corner shop"));
    assert_eq!(updated.logo_url.as_deref(), Some("logos/y.png"));
}

#[sqlx::test(migrations = false)]
async fn test_update_category(pool: SqlitePool) {
    let fixture = Fixture::new(pool).await;
    let mut db = fixture.db().await;
    let (alice, business_id, drinks) = alice_with_category(&mut db).await;

    db.update_category(
        alice,
        drinks,
        CategoryFields {
            text: LocalizedText {
                name: "Bebidas".to_string(),
                name_en: Some("Drinks".to_string()),
                name_fr: Some("Boissons".to_string()),
                ..Default::default()
            },
            order_num: 4,
        },
    )
    .await
    .unwrap();

    let updated = db.list_categories(alice, business_id).await.unwrap().remove(0);
    assert_eq!(updated.text.name, "Bebidas");
    assert_eq!(updated.text.name_fr.as_deref(), Some("Boissons"));
    assert_eq!(updated.order_num, 4);
}

#[sqlx::test(migrations = false)]
async fn test_deleting_user_cascades(pool: SqlitePool) {
    let fixture = Fixture::new(pool).await;
    let mut db = fixture.db().await;
    let (alice, _, category_id) = alice_with_category(&mut db).await;
    db.add_menu_item(fixture.images(), alice, item(category_id, "Latte", None, true), &[])
        .await
        .unwrap();

    sqlx::query("DELETE FROM users WHERE id = ?")
        .bind(alice)
        .execute(&mut *db.connection)
        .await
        .unwrap();

    assert_eq!(count(&mut db, "businesses").await, 0);
    assert_eq!(count(&mut db, "menu_categories").await, 0);
    assert_eq!(count(&mut db, "menu_items").await, 0);
}

#[sqlx::test(migrations = false)]
async fn test_legacy_bcrypt_user_can_log_in(pool: SqlitePool) {
    let fixture = Fixture::new(pool).await;
    let mut db = fixture.db().await;

    let legacy_hash = bcrypt::hash("pw123", 4).unwrap().replacen("$2b$", "$2y$", 1);
    sqlx::query("INSERT INTO users (username, password_hash) VALUES (?, ?)")
        .bind("legacy")
        .bind(&legacy_hash)
        .execute(&mut *db.connection)
        .await
        .unwrap();

    let user = db.authenticate_user("legacy", "pw123").await.unwrap();
    assert_eq!(user.username, "legacy");
    assert_eq!(
        db.authenticate_user("legacy", "wrong").await,
        Err(ServiceError::Unauthorized("Invalid username or password."))
    );
}

#[tokio::test]
async fn test_connect_reports_schema_failure() {
    let root = tempfile::tempdir().unwrap();
    let url = format!("sqlite://{}", root.path().join("menu.db").display());

    // a view where a table is expected makes the column migrations fail
    let legacy = SqlitePool::connect(&format!("{}?mode=rwc", url)).await.unwrap();
    sqlx::query("CREATE VIEW menu_items AS SELECT 1 AS id")
        .execute(&legacy)
        .await
        .unwrap();
    legacy.close().await;

    let images = ImageStore::new(root.path(), "uploads/menu_items", 1024);
    let result = tokio::time::timeout(Duration::from_secs(5), AppState::connect(&url, images))
        .await
        .expect("schema failure must be reported without waiting for the pool");

    match result {
        Err(ServiceError::StorageError(cause)) => assert!(cause.contains("view"), "{}", cause),
        Err(e) => panic!("expected a storage error, got {:?}", e),
        Ok(_) => panic!("schema setup on a view must fail"),
    }
}
