// src/ingest.rs
//
// CSV bulk import: one multipart upload becomes one insert_many into the
// named collection. Rows keep every column under its original header.

use actix_multipart::form::{bytes::Bytes, text::Text, MultipartForm};
use actix_web::{web, HttpResponse};
use log::info;
use mongodb::bson::{Bson, Document};
use serde_json::json;

use crate::app_state::AppState;
use crate::error::ApiError;

#[derive(Debug, MultipartForm)]
pub struct UploadForm {
    pub sheet_name: Text<String>,
    pub file: Bytes,
}

// POST /upload
pub async fn upload_csv(
    data: web::Data<AppState>,
    MultipartForm(form): MultipartForm<UploadForm>,
) -> Result<HttpResponse, ApiError> {
    let sheet_name = form.sheet_name.into_inner();
    if sheet_name.trim().is_empty() {
        return Err(ApiError::MissingField("Collection name is required".to_string()));
    }

    let records = records_from_csv(&form.file.data)?;
    if records.is_empty() {
        return Err(ApiError::MissingField("CSV is empty".to_string()));
    }

    let inserted = records.len();
    let collection = data.mongodb.db.collection::<Document>(&sheet_name);
    collection.insert_many(records).await?;

    info!("Imported {} records into '{}'", inserted, sheet_name);
    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "inserted": inserted,
        "collection": sheet_name,
    })))
}

/// Flattens CSV rows into documents. Empty cells become null (never an empty
/// string), numeric cells keep a numeric type, everything else is stored
/// verbatim under its header.
pub fn records_from_csv(bytes: &[u8]) -> Result<Vec<Document>, ApiError> {
    let mut reader = csv::Reader::from_reader(bytes);
    let headers = reader
        .headers()
        .map_err(|e| ApiError::MissingField(format!("Invalid CSV: {}", e)))?
        .clone();

    let mut records = Vec::new();
    for row in reader.records() {
        let row = row.map_err(|e| ApiError::MissingField(format!("Invalid CSV: {}", e)))?;
        let mut doc = Document::new();
        for (header, cell) in headers.iter().zip(row.iter()) {
            doc.insert(header, cell_to_bson(cell));
        }
        records.push(doc);
    }
    Ok(records)
}

fn cell_to_bson(cell: &str) -> Bson {
    let trimmed = cell.trim();
    if trimmed.is_empty() {
        return Bson::Null;
    }
    // Phone-style values with an explicit "+" must stay textual; i64 parsing
    // would otherwise swallow the sign.
    if trimmed.starts_with('+') {
        return Bson::String(cell.to_string());
    }
    if let Ok(n) = trimmed.parse::<i64>() {
        Bson::Int64(n)
    } else if let Ok(f) = trimmed.parse::<f64>() {
        Bson::Double(f)
    } else {
        Bson::String(cell.to_string())
    }
}
