mod lead_set;

pub use lead_set::LeadSet;

use std::fmt;

use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

/// An identifier that callers (and older stored documents) supply either as
/// a string or as a bare number. Employee numbers and phone numbers both
/// arrive in whichever shape the client happened to send.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawNumber {
    Text(String),
    Int(i64),
}

impl RawNumber {
    pub fn is_empty(&self) -> bool {
        match self {
            RawNumber::Text(s) => s.trim().is_empty(),
            RawNumber::Int(_) => false,
        }
    }
}

impl fmt::Display for RawNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RawNumber::Text(s) => f.write_str(s),
            RawNumber::Int(n) => write!(f, "{}", n),
        }
    }
}

/// Roster entry in the `teamAssign` collection. Field names mirror the
/// stored documents, which use display-style keys.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Employee {
    /// MongoDB document ID.
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    #[serde(rename = "Employee name")]
    pub name: String,
    #[serde(rename = "Employee number")]
    pub number: RawNumber,
    #[serde(rename = "Leads", default)]
    pub leads: LeadSet,
    #[serde(rename = "Active", default = "default_active")]
    pub active: bool,
}

fn default_active() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn raw_number_accepts_both_shapes() {
        let text: RawNumber = serde_json::from_value(json!("102")).unwrap();
        let int: RawNumber = serde_json::from_value(json!(102)).unwrap();
        assert_eq!(text.to_string(), "102");
        assert_eq!(int.to_string(), "102");
        assert!(RawNumber::Text("  ".into()).is_empty());
        assert!(!int.is_empty());
    }

    #[test]
    fn employee_decodes_stored_shape() {
        let employee: Employee = serde_json::from_value(json!({
            "Employee name": "Asha",
            "Employee number": "101",
            "Leads": "{+15551234567}",
            "Active": true,
        }))
        .unwrap();
        assert_eq!(employee.name, "Asha");
        assert!(employee.leads.contains("+15551234567"));
        assert!(employee.active);
    }

    #[test]
    fn missing_leads_and_active_get_defaults() {
        let employee: Employee = serde_json::from_value(json!({
            "Employee name": "Raj",
            "Employee number": 102,
        }))
        .unwrap();
        assert!(employee.leads.is_empty());
        assert!(employee.active);
    }

    #[test]
    fn employee_serializes_braced_lead_set() {
        let mut employee = Employee {
            id: None,
            name: "Asha".into(),
            number: RawNumber::Text("101".into()),
            leads: LeadSet::new(),
            active: true,
        };
        employee.leads.insert("+15551234567");
        let json = serde_json::to_value(&employee).unwrap();
        assert_eq!(json["Leads"], "{+15551234567}");
        assert_eq!(json["Employee name"], "Asha");
    }
}
