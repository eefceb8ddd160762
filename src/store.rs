use futures_util::StreamExt;
use mongodb::bson::{doc, Bson, Document};
use mongodb::{options::ClientOptions, Client, Database};
use serde_json::Value;

use crate::error::ApiError;
use crate::serializer::serialize_doc;

pub struct MongoDB {
    pub client: Client,
    pub db: Database,
}

impl MongoDB {
    pub async fn init(uri: &str, db_name: &str) -> Self {
        let client_options = ClientOptions::parse(uri)
            .await
            .expect("Failed to parse MongoDB connection string");
        let client = Client::with_options(client_options).expect("Failed to initialize client");
        let db = client.database(db_name);
        MongoDB { client, db }
    }
}

/// Fetches every document of a named collection in transport form.
pub async fn collection_json(db: &Database, name: &str) -> Result<Vec<Value>, ApiError> {
    let collection = db.collection::<Document>(name);
    let mut cursor = collection.find(doc! {}).await?;
    let mut out = Vec::new();
    while let Some(doc) = cursor.next().await {
        out.push(serialize_doc(&doc?));
    }
    Ok(out)
}

/// Filter matching a numeric-looking key whether the importer stored it as a
/// string or as a number. CSV ingestion keeps numeric cells numeric, so a
/// phone or employee number can exist in either shape in the same
/// collection.
pub fn number_filter(field: &str, raw: &str) -> Document {
    let mut forms = vec![Bson::String(raw.to_string())];
    if let Ok(n) = raw.parse::<i64>() {
        forms.push(Bson::Int64(n));
        if let Ok(n32) = i32::try_from(n) {
            forms.push(Bson::Int32(n32));
        }
    }
    let mut filter = Document::new();
    filter.insert(field, doc! { "$in": forms });
    filter
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_key_matches_all_stored_shapes() {
        let filter = number_filter("Number", "15551234567");
        let forms = filter
            .get_document("Number")
            .unwrap()
            .get_array("$in")
            .unwrap();
        assert!(forms.contains(&Bson::String("15551234567".into())));
        assert!(forms.contains(&Bson::Int64(15551234567)));
        // Too large for Int32, so only two forms.
        assert_eq!(forms.len(), 2);
    }

    #[test]
    fn non_numeric_key_stays_a_string() {
        let filter = number_filter("Employee number", "A-102");
        let forms = filter
            .get_document("Employee number")
            .unwrap()
            .get_array("$in")
            .unwrap();
        assert_eq!(forms, &vec![Bson::String("A-102".into())]);
    }

    #[test]
    fn small_numbers_include_int32_form() {
        let filter = number_filter("Employee number", "102");
        let forms = filter
            .get_document("Employee number")
            .unwrap()
            .get_array("$in")
            .unwrap();
        assert!(forms.contains(&Bson::Int32(102)));
        assert!(forms.contains(&Bson::Int64(102)));
    }
}
