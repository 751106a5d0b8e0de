use std::path::{Component, Path, PathBuf};

use axum::body::Bytes;
use uuid::Uuid;

use crate::error::{ServiceError, ServiceResult};

/// Allowed content types with the file extensions accepted for each, the first one being the default.
const SUPPORTED_IMAGE_TYPES: [(&str, &[&str]); 3] = [
    ("image/jpeg", &["jpg", "jpeg"]),
    ("image/png", &["png"]),
    ("image/gif", &["gif"]),
];

/// An uploaded file as received from a multipart request.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageUpload {
    pub file_name: String,
    pub content_type: String,
    pub data: Bytes,
}

/// Persists menu item images below `app_root/images_dir`.
#[derive(Debug, Clone)]
pub struct ImageStore {
    app_root: PathBuf,
    images_dir: String,
    max_size: usize,
}

impl ImageStore {
    pub fn new(app_root: impl Into<PathBuf>, images_dir: &str, max_size: usize) -> Self {
        ImageStore {
            app_root: app_root.into(),
            images_dir: images_dir.trim_matches('/').to_owned(),
            max_size,
        }
    }

    pub fn validate(&self, upload: &ImageUpload) -> ServiceResult<()> {
        let content_type = upload.content_type.to_lowercase();
        if !SUPPORTED_IMAGE_TYPES.iter().any(|(t, _)| *t == content_type) {
            return Err(ServiceError::ImageError(format!(
                "Image '{}' has unsupported type '{}'. Allowed types are JPEG, PNG and GIF.",
                upload.file_name, upload.content_type
            )));
        }

        if upload.data.is_empty() {
            return Err(ServiceError::ImageError(format!(
                "Image '{}' is empty.",
                upload.file_name
            )));
        }

        if upload.data.len() > self.max_size {
            return Err(ServiceError::ImageError(format!(
                "Image '{}' exceeds the maximum size of {} bytes.",
                upload.file_name, self.max_size
            )));
        }

        Ok(())
    }

    /// Validate and write the upload under a generated name.
    ///
    /// Returns the path relative to the application root.
    pub async fn store(&self, upload: &ImageUpload) -> ServiceResult<String> {
        self.validate(upload)?;

        let directory = self.app_root.join(&self.images_dir);
        tokio::fs::create_dir_all(&directory).await.map_err(|e| {
            ServiceError::ImageError(format!(
                "Could not create image directory '{}': {}",
                directory.display(),
                e
            ))
        })?;

        let file_name = format!("{}.{}", Uuid::new_v4().simple(), file_extension(upload));
        tokio::fs::write(directory.join(&file_name), &upload.data)
            .await
            .map_err(|e| {
                ServiceError::ImageError(format!(
                    "Could not save image '{}': {}",
                    upload.file_name, e
                ))
            })?;

        let relative_path = if self.images_dir.is_empty() {
            file_name
        } else {
            format!("{}/{}", self.images_dir, file_name)
        };
        log::debug!("Stored image '{}' as '{}'", upload.file_name, relative_path);
        Ok(relative_path)
    }

    /// Delete a previously stored image. Never fails, problems are only logged.
    pub async fn remove(&self, relative_path: &str) {
        let Some(path) = self.resolve(relative_path) else {
            log::warn!("Refusing to delete image outside of app root: '{}'", relative_path);
            return;
        };

        match tokio::fs::metadata(&path).await {
            Ok(metadata) if metadata.is_file() => {
                if let Err(e) = tokio::fs::remove_file(&path).await {
                    log::warn!("Could not delete image '{}': {}", path.display(), e);
                }
            }
            Ok(_) => log::warn!("Image path '{}' is not a regular file", path.display()),
            Err(_) => log::warn!("Image file '{}' does not exist", path.display()),
        }
    }

    pub async fn remove_all(&self, relative_paths: &[String]) {
        for relative_path in relative_paths {
            self.remove(relative_path).await;
        }
    }

    fn resolve(&self, relative_path: &str) -> Option<PathBuf> {
        let relative = Path::new(relative_path);
        let contained = relative
            .components()
            .all(|component| matches!(component, Component::Normal(_) | Component::CurDir));
        if relative_path.is_empty() || !contained {
            return None;
        }
        Some(self.app_root.join(relative))
    }
}

/// Original extension if it belongs to the content type, otherwise the content type's default.
fn file_extension(upload: &ImageUpload) -> String {
    let content_type = upload.content_type.to_lowercase();
    let Some((_, extensions)) = SUPPORTED_IMAGE_TYPES.iter().find(|(t, _)| *t == content_type) else {
        return "img".to_string();
    };

    let original = Path::new(&upload.file_name)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase());

    match original {
        Some(ext) if extensions.contains(&ext.as_str()) => ext,
        _ => extensions[0].to_string(),
    }
}
