// src/templates.rs
//
// Message templates ("wp" collection) with optional attached media.

use actix_multipart::form::{bytes::Bytes, text::Text, MultipartForm};
use actix_web::{web, HttpResponse};
use chrono::{DateTime, Utc};
use futures_util::StreamExt;
use log::info;
use mongodb::bson::{doc, oid::ObjectId, Document};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::app_state::AppState;
use crate::error::ApiError;
use crate::media::{delete_upload, infer_media_type, save_upload};
use crate::serializer::serialize_doc;

const TEMPLATE_COLLECTION: &str = "wp";

/// A stored message template. `media` holds the generated file name under
/// the uploads directory, `media_type` the broad category inferred from the
/// original extension.
#[derive(Debug, Serialize, Deserialize)]
pub struct Template {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub name: String,
    pub message: String,
    pub media: Option<String>,
    #[serde(rename = "type")]
    pub media_type: Option<String>,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, MultipartForm)]
pub struct TemplateForm {
    pub name: Text<String>,
    pub message: Text<String>,
    pub media: Option<Bytes>,
}

// POST /api/wp-template
pub async fn create_template(
    data: web::Data<AppState>,
    MultipartForm(form): MultipartForm<TemplateForm>,
) -> Result<HttpResponse, ApiError> {
    let name = form.name.into_inner();
    let message = form.message.into_inner();
    if name.trim().is_empty() || message.trim().is_empty() {
        return Err(ApiError::MissingField("Name and message required".to_string()));
    }

    let mut media = None;
    let mut media_type = None;
    if let Some(file) = form.media {
        let original = file.file_name.clone().unwrap_or_else(|| "file".to_string());
        let stored = save_upload(&data.config.upload_dir, &original, &file.data).await?;
        info!("Stored template media '{}' as '{}'", original, stored);
        media_type = Some(infer_media_type(&original).to_string());
        media = Some(stored);
    }

    let template = Template {
        id: None,
        name,
        message,
        media,
        media_type,
        created_at: Utc::now(),
    };
    data.mongodb
        .db
        .collection::<Template>(TEMPLATE_COLLECTION)
        .insert_one(&template)
        .await?;

    Ok(HttpResponse::Ok().json(json!({ "success": true })))
}

// GET /api/wp-template
// Newest first.
pub async fn list_templates(data: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
    let collection = data.mongodb.db.collection::<Document>(TEMPLATE_COLLECTION);
    let mut cursor = collection
        .find(doc! {})
        .sort(doc! { "createdAt": -1 })
        .await?;

    let mut templates = Vec::new();
    while let Some(doc) = cursor.next().await {
        templates.push(serialize_doc(&doc?));
    }
    Ok(HttpResponse::Ok().json(templates))
}

// DELETE /api/wp-template/{id}
// Removes the media file from disk before the record itself; a media file
// that is already missing does not block the delete.
pub async fn delete_template(
    data: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let id = ObjectId::parse_str(path.into_inner().as_str())
        .map_err(|_| ApiError::MissingField("Invalid template id".to_string()))?;

    let collection = data
        .mongodb
        .db
        .collection::<Template>(TEMPLATE_COLLECTION);
    let template = collection
        .find_one(doc! { "_id": id })
        .await?
        .ok_or_else(|| ApiError::NotFound("Template not found".to_string()))?;

    if let Some(media) = &template.media {
        delete_upload(&data.config.upload_dir, media).await?;
    }
    collection.delete_one(doc! { "_id": id }).await?;

    info!("Deleted template {} ('{}')", id, template.name);
    Ok(HttpResponse::Ok().json(json!({ "success": true })))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn template_serializes_stored_field_names() {
        let template = Template {
            id: None,
            name: "welcome".into(),
            message: "hello".into(),
            media: Some("abc_photo.png".into()),
            media_type: Some("image".into()),
            created_at: Utc::now(),
        };
        let json = serde_json::to_value(&template).unwrap();
        assert_eq!(json["type"], "image");
        assert!(json.get("createdAt").is_some());
        assert!(json.get("_id").is_none());
    }
}
