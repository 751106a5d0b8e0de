use std::collections::HashMap;

use axum::extract::Multipart;
use serde_json::{Map, Value};

use crate::error::{ServiceError, ServiceResult};
use crate::image_store::ImageUpload;
use crate::models::{LocalizedText, Patch};

/// Parameters of one action, taken from the query string, a JSON object or a multipart form.
///
/// Query and multipart values arrive as strings, so the accessors accept numbers and
/// booleans in their string form as well.
#[derive(Debug, Default)]
pub struct ActionInput {
    fields: Map<String, Value>,
    pub images: Vec<ImageUpload>,
}

impl ActionInput {
    pub fn from_query(query: HashMap<String, String>) -> Self {
        ActionInput {
            fields: query
                .into_iter()
                .filter(|(key, _)| key != "action")
                .map(|(key, value)| (key, Value::String(value)))
                .collect(),
            images: Vec::new(),
        }
    }

    pub fn from_json_body(body: &[u8]) -> ServiceResult<Self> {
        if body.iter().all(|b| b.is_ascii_whitespace()) {
            return Ok(ActionInput::default());
        }

        match serde_json::from_slice::<Value>(body) {
            Ok(Value::Object(fields)) => Ok(ActionInput {
                fields,
                images: Vec::new(),
            }),
            Ok(Value::Null) => Ok(ActionInput::default()),
            Ok(_) => Err(ServiceError::Validation(
                "Request body must be a JSON object.".to_string(),
            )),
            Err(e) => Err(ServiceError::Validation(format!(
                "Request body is not valid JSON: {}",
                e
            ))),
        }
    }

    pub async fn from_multipart(mut multipart: Multipart) -> ServiceResult<Self> {
        let mut input = ActionInput::default();

        while let Some(field) = multipart.next_field().await? {
            let name = field.name().unwrap_or_default().to_owned();

            if let Some(file_name) = field.file_name().map(str::to_owned) {
                let content_type = field
                    .content_type()
                    .unwrap_or("application/octet-stream")
                    .to_lowercase();
                let data = field.bytes().await?;

                // browsers send an empty part for an untouched file input
                if file_name.is_empty() && data.is_empty() {
                    continue;
                }
                if is_image_field(&name) {
                    input.images.push(ImageUpload {
                        file_name,
                        content_type,
                        data,
                    });
                } else {
                    log::debug!("Ignoring unexpected file field '{}'", name);
                }
                continue;
            }

            let value = field.text().await?;
            input.fields.insert(name, Value::String(value));
        }

        Ok(input)
    }

    #[cfg(test)]
    pub fn from_value(value: Value) -> Self {
        match value {
            Value::Object(fields) => ActionInput {
                fields,
                images: Vec::new(),
            },
            _ => ActionInput::default(),
        }
    }

    fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key).filter(|v| !v.is_null())
    }

    pub fn contains(&self, key: &str) -> bool {
        self.fields.contains_key(key)
    }

    pub fn require_id(&self, key: &str) -> ServiceResult<i64> {
        match self.optional_int(key)? {
            Some(id) if id > 0 => Ok(id),
            Some(_) => Err(ServiceError::Validation(format!(
                "Field '{}' must be a positive integer.",
                key
            ))),
            None => Err(missing(key)),
        }
    }

    pub fn optional_int(&self, key: &str) -> ServiceResult<Option<i64>> {
        let Some(value) = self.get(key) else {
            return Ok(None);
        };

        let parsed = match value {
            Value::Number(n) => n.as_i64(),
            Value::String(s) if s.trim().is_empty() => return Ok(None),
            Value::String(s) => s.trim().parse::<i64>().ok(),
            _ => None,
        };
        parsed
            .map(Some)
            .ok_or_else(|| ServiceError::Validation(format!("Field '{}' must be an integer.", key)))
    }

    /// A text field that must be present and not blank.
    pub fn require_text(&self, key: &str) -> ServiceResult<String> {
        match self.optional_text(key)? {
            Some(text) if !text.trim().is_empty() => Ok(text),
            Some(_) => Err(ServiceError::Validation(format!(
                "Field '{}' must not be empty.",
                key
            ))),
            None => Err(missing(key)),
        }
    }

    /// A required secret, taken as is.
    pub fn require_secret(&self, key: &str) -> ServiceResult<String> {
        match self.optional_text(key)? {
            Some(text) if !text.is_empty() => Ok(text),
            _ => Err(missing(key)),
        }
    }

    pub fn optional_text(&self, key: &str) -> ServiceResult<Option<String>> {
        match self.get(key) {
            None => Ok(None),
            Some(Value::String(s)) => Ok(Some(s.clone())),
            Some(Value::Number(n)) => Ok(Some(n.to_string())),
            Some(Value::Bool(b)) => Ok(Some(b.to_string())),
            Some(_) => Err(ServiceError::Validation(format!(
                "Field '{}' must be a string.",
                key
            ))),
        }
    }

    /// Price of a new item: absent, `null` and `""` all mean no price.
    pub fn optional_price(&self, key: &str) -> ServiceResult<Option<f64>> {
        let Some(value) = self.get(key) else {
            return Ok(None);
        };

        let parsed = match value {
            Value::Number(n) => n.as_f64(),
            Value::String(s) if s.trim().is_empty() => return Ok(None),
            Value::String(s) => s.trim().parse::<f64>().ok(),
            _ => None,
        };
        match parsed {
            Some(price) if price.is_finite() => Ok(Some(price)),
            _ => Err(ServiceError::Validation(format!(
                "Field '{}' must be a number.",
                key
            ))),
        }
    }

    pub fn optional_bool(&self, key: &str) -> ServiceResult<Option<bool>> {
        let Some(value) = self.get(key) else {
            return Ok(None);
        };

        let parsed = match value {
            Value::Bool(b) => Some(*b),
            Value::Number(n) => n.as_i64().map(|n| n != 0),
            Value::String(s) if s.trim().is_empty() => return Ok(None),
            Value::String(s) => match s.trim().to_lowercase().as_str() {
                "1" | "true" | "on" | "yes" => Some(true),
                "0" | "false" | "off" | "no" => Some(false),
                _ => None,
            },
            _ => None,
        };
        parsed
            .map(Some)
            .ok_or_else(|| ServiceError::Validation(format!("Field '{}' must be a boolean.", key)))
    }

    /// Text update: only a present, non-null value is written.
    pub fn text_patch(&self, key: &str) -> ServiceResult<Patch<String>> {
        Ok(match self.optional_text(key)? {
            Some(text) => Patch::Value(text),
            None => Patch::Absent,
        })
    }

    /// Price update: present but `null` or `""` clears the price.
    pub fn price_patch(&self, key: &str) -> ServiceResult<Patch<f64>> {
        if !self.contains(key) {
            return Ok(Patch::Absent);
        }
        Ok(match self.optional_price(key)? {
            Some(price) => Patch::Value(price),
            None => Patch::Null,
        })
    }

    pub fn bool_patch(&self, key: &str) -> ServiceResult<Patch<bool>> {
        Ok(match self.optional_bool(key)? {
            Some(value) => Patch::Value(value),
            None => Patch::Absent,
        })
    }

    /// Name plus description in all three languages, `name` being required.
    pub fn localized_text(&self) -> ServiceResult<LocalizedText> {
        Ok(LocalizedText {
            name: self.require_text("name")?,
            description: self.optional_text("description")?,
            name_en: self.optional_text("name_en")?,
            description_en: self.optional_text("description_en")?,
            name_fr: self.optional_text("name_fr")?,
            description_fr: self.optional_text("description_fr")?,
        })
    }
}

fn missing(key: &str) -> ServiceError {
    ServiceError::Validation(format!("Missing required field '{}'.", key))
}

/// `images`, `images[]` and `images[3]` all name the image batch.
fn is_image_field(name: &str) -> bool {
    name == "images" || (name.starts_with("images[") && name.ends_with(']'))
}
