use mongodb::bson::{Bson, Document};
use serde_json::{Map, Number, Value};

/// Converts a stored document into its transport form: ObjectIds become hex
/// strings and NaN doubles (a CSV import artifact) become explicit null.
pub fn serialize_doc(doc: &Document) -> Value {
    let mut out = Map::new();
    for (key, value) in doc {
        out.insert(key.clone(), bson_to_json(value));
    }
    Value::Object(out)
}

fn bson_to_json(value: &Bson) -> Value {
    match value {
        Bson::ObjectId(oid) => Value::String(oid.to_hex()),
        Bson::Double(f) if f.is_nan() => Value::Null,
        Bson::Double(f) => Number::from_f64(*f).map(Value::Number).unwrap_or(Value::Null),
        Bson::Int32(n) => Value::Number((*n).into()),
        Bson::Int64(n) => Value::Number((*n).into()),
        Bson::String(s) => Value::String(s.clone()),
        Bson::Boolean(b) => Value::Bool(*b),
        Bson::Null => Value::Null,
        Bson::Array(items) => Value::Array(items.iter().map(bson_to_json).collect()),
        Bson::Document(inner) => serialize_doc(inner),
        Bson::DateTime(dt) => Value::String(dt.try_to_rfc3339_string().unwrap_or_default()),
        other => Value::String(other.to_string()),
    }
}
