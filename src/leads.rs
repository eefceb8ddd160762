// src/leads.rs
//
// Read and delete endpoints for the imported lead collections.

use actix_web::{web, HttpResponse};
use log::info;
use mongodb::bson::{doc, oid::ObjectId, Document};
use serde::Deserialize;
use serde_json::json;

use crate::app_state::AppState;
use crate::error::ApiError;
use crate::serializer::serialize_doc;
use crate::store::{collection_json, number_filter};

/// Collections a lead may be deleted from. Requests naming anything else are
/// rejected rather than letting the caller address arbitrary collections.
const LEAD_COLLECTIONS: [&str; 5] = [
    "Leads",
    "RentalLeads",
    "sellingLeads",
    "agentLeads",
    "endData",
];

pub async fn get_leads(data: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
    dump_collection(&data, "Leads").await
}

pub async fn get_rental_leads(data: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
    dump_collection(&data, "RentalLeads").await
}

pub async fn get_agent_leads(data: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
    dump_collection(&data, "agentLeads").await
}

pub async fn get_selling_leads(data: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
    dump_collection(&data, "sellingLeads").await
}

async fn dump_collection(data: &AppState, name: &str) -> Result<HttpResponse, ApiError> {
    let docs = collection_json(&data.mongodb.db, name).await?;
    Ok(HttpResponse::Ok().json(docs))
}

#[derive(Debug, Deserialize)]
pub struct EndDataQuery {
    pub number: Option<String>,
}

// GET /api/end-data
// Without a query returns the whole collection; with ?number= returns the
// single matching record. The number may have been stored as a string or an
// integer depending on how the CSV importer saw it.
pub async fn get_end_data(
    data: web::Data<AppState>,
    query: web::Query<EndDataQuery>,
) -> Result<HttpResponse, ApiError> {
    let db = &data.mongodb.db;
    if let Some(number) = query.number.as_deref().filter(|n| !n.trim().is_empty()) {
        let collection = db.collection::<Document>("endData");
        match collection.find_one(number_filter("Number", number.trim())).await? {
            Some(doc) => Ok(HttpResponse::Ok().json(serialize_doc(&doc))),
            None => Err(ApiError::NotFound("Not found".to_string())),
        }
    } else {
        let docs = collection_json(db, "endData").await?;
        Ok(HttpResponse::Ok().json(docs))
    }
}

#[derive(Debug, Deserialize)]
pub struct DeleteLeadRequest {
    pub id: String,
    pub collection: String,
}

// DELETE /api/delete-lead
pub async fn delete_lead(
    data: web::Data<AppState>,
    payload: web::Json<DeleteLeadRequest>,
) -> Result<HttpResponse, ApiError> {
    if payload.id.trim().is_empty() || payload.collection.trim().is_empty() {
        return Err(ApiError::MissingField("Missing id or collection".to_string()));
    }
    if !LEAD_COLLECTIONS.contains(&payload.collection.as_str()) {
        return Err(ApiError::MissingField("Invalid collection".to_string()));
    }
    let object_id = ObjectId::parse_str(&payload.id)
        .map_err(|_| ApiError::MissingField("Invalid lead id".to_string()))?;

    let collection = data.mongodb.db.collection::<Document>(&payload.collection);
    let result = collection.delete_one(doc! { "_id": object_id }).await?;
    if result.deleted_count == 0 {
        return Err(ApiError::NotFound("Lead not found".to_string()));
    }

    info!("Deleted lead {} from '{}'", payload.id, payload.collection);
    Ok(HttpResponse::Ok().json(json!({ "success": true })))
}
