use actix_web::{web, HttpResponse};
use mongodb::bson::{doc, Bson, Document};
use mongodb::options::ReturnDocument;
use serde::Deserialize;
use serde_json::json;

use crate::app_state::AppState;
use crate::assignment::canonical_phone;
use crate::error::ApiError;
use crate::models::RawNumber;
use crate::store::number_filter;

const END_DATA_COLLECTION: &str = "endData";

#[derive(Debug, Deserialize)]
pub struct CallAttemptRequest {
    pub number: RawNumber,
}

// POST /api/call-attempt
// Increments the attempt counter for a phone number, creating the record on
// first use. The upsert-and-increment happens as one conditional update at
// the store; splitting it into a read and a write would lose concurrent
// increments on the same number.
pub async fn record_call_attempt(
    data: web::Data<AppState>,
    payload: web::Json<CallAttemptRequest>,
) -> Result<HttpResponse, ApiError> {
    let (digits, _) = canonical_phone(&payload.number.to_string())
        .ok_or_else(|| ApiError::MissingField("Number is required".to_string()))?;

    let collection = data.mongodb.db.collection::<Document>(END_DATA_COLLECTION);
    let updated = collection
        .find_one_and_update(
            number_filter("Number", &digits),
            doc! {
                "$inc": { "Call_attempt": 1 },
                "$setOnInsert": { "Number": &digits },
            },
        )
        .upsert(true)
        .return_document(ReturnDocument::After)
        .await?;

    let attempts = updated.as_ref().map(call_attempt_count).unwrap_or(1);

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "Number": digits,
        "Call_attempt": attempts,
    })))
}

fn call_attempt_count(doc: &Document) -> i64 {
    match doc.get("Call_attempt") {
        Some(Bson::Int32(n)) => i64::from(*n),
        Some(Bson::Int64(n)) => *n,
        Some(Bson::Double(n)) => *n as i64,
        _ => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counter_reads_any_numeric_width() {
        assert_eq!(call_attempt_count(&doc! { "Call_attempt": 1_i32 }), 1);
        assert_eq!(call_attempt_count(&doc! { "Call_attempt": 7_i64 }), 7);
        assert_eq!(call_attempt_count(&doc! { "Call_attempt": 3.0_f64 }), 3);
        assert_eq!(call_attempt_count(&doc! { "Number": "1555" }), 0);
    }
}
