lazy_static::lazy_static! {
    /// Host name the web server binds to.
    ///
    /// Field name: `API_HOST`
    pub static ref API_HOST: String = std::env::var("API_HOST").unwrap_or_else(|_| "127.0.0.1".to_owned());

    /// The application port.
    ///
    /// Field name: `API_PORT`
    pub static ref API_PORT: String = std::env::var("API_PORT").unwrap_or_else(|_| "3000".to_owned());

    /// Database connection string.
    ///
    /// Field name: `DATABASE_URL`
    pub static ref DATABASE_URL: String = std::env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite://menu_manager.db".to_owned());

    /// Directory that stored image paths are relative to.
    ///
    /// Field name: `APP_ROOT`
    pub static ref APP_ROOT: String = std::env::var("APP_ROOT").unwrap_or_else(|_| ".".to_owned());

    /// Upload directory for menu item images, relative to `APP_ROOT`.
    ///
    /// Field name: `IMAGES_DIR`
    pub static ref IMAGES_DIR: String = std::env::var("IMAGES_DIR").unwrap_or_else(|_| "uploads/menu_items".to_owned());

    /// Maximum size of a single uploaded image in bytes.
    ///
    /// Field name: `MAX_IMAGE_SIZE`
    pub static ref MAX_IMAGE_SIZE: usize = std::env::var("MAX_IMAGE_SIZE")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(5 * 1024 * 1024);

    /// Maximum size of a request body in bytes. Must leave room for a batch of images.
    ///
    /// Field name: `MAX_REQUEST_SIZE`
    pub static ref MAX_REQUEST_SIZE: usize = std::env::var("MAX_REQUEST_SIZE")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(64 * 1024 * 1024);
}
