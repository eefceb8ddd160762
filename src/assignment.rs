// src/assignment.rs
//
// Assignment ledger: keeps a lead's AssignTo field and the employee lead
// sets in step with each other. Assign overwrites the lead side while
// Reassign accumulates names there; the two behaviors are intentionally
// different and both are load-bearing for the frontend.

use actix_web::{web, HttpResponse};
use futures_util::StreamExt;
use log::info;
use mongodb::bson::{doc, Document};
use mongodb::Collection;
use serde::Deserialize;
use serde_json::json;

use crate::app_state::AppState;
use crate::error::ApiError;
use crate::models::{Employee, RawNumber};
use crate::store::number_filter;
use crate::team::TEAM_COLLECTION;

/// Strips every `+` and surrounding whitespace from a phone number. Returns
/// the bare digits (the lead-collection key) and the canonical `+<digits>`
/// form stored in employee lead sets, or None when nothing is left.
pub fn canonical_phone(raw: &str) -> Option<(String, String)> {
    let digits = raw.trim().replace('+', "").trim().to_string();
    if digits.is_empty() {
        return None;
    }
    let plus_form = format!("+{}", digits);
    Some((digits, plus_form))
}

/// Additive AssignTo update: appends `name` to the comma-separated list
/// unless it is already present.
pub fn merge_assignees(current: Option<&str>, name: &str) -> String {
    let mut names: Vec<&str> = current
        .map(|c| {
            c.split(',')
                .map(str::trim)
                .filter(|n| !n.is_empty())
                .collect()
        })
        .unwrap_or_default();
    if !names.iter().any(|n| *n == name) {
        names.push(name);
    }
    names.join(", ")
}

/// Finds the employee currently holding a phone number by exact set
/// membership. A substring scan over the serialized set would false-positive
/// when one number prefixes another, so the match is done against the
/// decoded set.
async fn find_holder(
    team: &Collection<Employee>,
    plus_form: &str,
) -> Result<Option<Employee>, ApiError> {
    let mut cursor = team.find(doc! {}).await?;
    while let Some(employee) = cursor.next().await {
        let employee = employee?;
        if employee.leads.contains(plus_form) {
            return Ok(Some(employee));
        }
    }
    Ok(None)
}

fn employee_id(employee: &Employee) -> Result<mongodb::bson::oid::ObjectId, ApiError> {
    employee
        .id
        .ok_or_else(|| ApiError::Unexpected("Employee record has no id".to_string()))
}

#[derive(Debug, Deserialize)]
pub struct AssignLeadRequest {
    pub collection: String,
    #[serde(rename = "leadNumber")]
    pub lead_number: RawNumber,
    #[serde(rename = "assignTo")]
    pub assign_to: String,
}

// POST /api/assign-lead
// Sets the lead's assignee (overwriting any previous one) and adds the
// canonical phone to the named employee's lead set.
pub async fn assign_lead(
    data: web::Data<AppState>,
    payload: web::Json<AssignLeadRequest>,
) -> Result<HttpResponse, ApiError> {
    if payload.collection.trim().is_empty() || payload.assign_to.trim().is_empty() {
        return Err(ApiError::MissingField("Missing fields".to_string()));
    }
    let (digits, plus_form) = canonical_phone(&payload.lead_number.to_string())
        .ok_or_else(|| ApiError::MissingField("Missing fields".to_string()))?;

    let _guard = data.assignment_locks.acquire(&digits).await;

    let db = &data.mongodb.db;
    let leads = db.collection::<Document>(&payload.collection);
    let team = db.collection::<Employee>(TEAM_COLLECTION);

    // Overwrite semantics on the lead side: prior assignees are discarded.
    let lead_result = leads
        .update_one(
            number_filter("Phone Number", &digits),
            doc! { "$set": { "AssignTo": &payload.assign_to } },
        )
        .await?;
    if lead_result.matched_count == 0 {
        return Err(ApiError::NotFound("Lead not found".to_string()));
    }

    let mut employee = match team
        .find_one(doc! { "Employee name": &payload.assign_to })
        .await?
    {
        Some(employee) => employee,
        None => return Err(ApiError::NotFound("Employee not found".to_string())),
    };

    employee.leads.insert(&plus_form);
    let id = employee_id(&employee)?;
    team.update_one(
        doc! { "_id": id },
        doc! { "$set": { "Leads": employee.leads.to_string() } },
    )
    .await?;

    info!("Assigned lead {} to {}", plus_form, payload.assign_to);
    Ok(HttpResponse::Ok().json(json!({ "success": true })))
}

#[derive(Debug, Deserialize)]
pub struct ReassignLeadRequest {
    pub collection: String,
    pub phone: RawNumber,
    #[serde(rename = "newEmployeeNumber")]
    pub new_employee_number: RawNumber,
}

// POST /api/reassign-lead
// Moves a phone number from its current holder (if any) to the employee
// with the given number, and appends that employee's name to the lead's
// assignee list.
pub async fn reassign_lead(
    data: web::Data<AppState>,
    payload: web::Json<ReassignLeadRequest>,
) -> Result<HttpResponse, ApiError> {
    if payload.collection.trim().is_empty() || payload.new_employee_number.is_empty() {
        return Err(ApiError::MissingField("Missing required fields".to_string()));
    }
    let (digits, plus_form) = canonical_phone(&payload.phone.to_string())
        .ok_or_else(|| ApiError::MissingField("Missing required fields".to_string()))?;

    let _guard = data.assignment_locks.acquire(&digits).await;

    let db = &data.mongodb.db;
    let team = db.collection::<Employee>(TEAM_COLLECTION);
    let leads = db.collection::<Document>(&payload.collection);

    // Resolve every party before the first write so a missing entity cannot
    // leave a half-applied move behind.
    let holder = find_holder(&team, &plus_form).await?;

    let raw_number = payload.new_employee_number.to_string();
    let mut new_employee = team
        .find_one(number_filter("Employee number", &raw_number))
        .await?
        .ok_or_else(|| ApiError::NotFound("New employee not found".to_string()))?;

    let lead_doc = leads
        .find_one(number_filter("Phone Number", &digits))
        .await?
        .ok_or_else(|| ApiError::NotFound("Lead not found in lead collection".to_string()))?;

    // A lead with no current holder is fine; reassignment from "unassigned"
    // just adds it to the new employee.
    if let Some(mut old) = holder {
        if old.id != new_employee.id {
            old.leads.remove(&plus_form);
            let old_id = employee_id(&old)?;
            team.update_one(
                doc! { "_id": old_id },
                doc! { "$set": { "Leads": old.leads.to_string() } },
            )
            .await?;
        }
    }

    new_employee.leads.insert(&plus_form);
    let new_id = employee_id(&new_employee)?;
    team.update_one(
        doc! { "_id": new_id },
        doc! { "$set": { "Leads": new_employee.leads.to_string() } },
    )
    .await?;

    let updated_assign = merge_assignees(lead_doc.get_str("AssignTo").ok(), &new_employee.name);
    let lead_id = lead_doc
        .get_object_id("_id")
        .map_err(|_| ApiError::Unexpected("Lead record has no id".to_string()))?;
    leads
        .update_one(
            doc! { "_id": lead_id },
            doc! { "$set": { "AssignTo": &updated_assign } },
        )
        .await?;

    info!(
        "Reassigned lead {} to {} (AssignTo now '{}')",
        plus_form, new_employee.name, updated_assign
    );
    Ok(HttpResponse::Ok().json(json!({ "success": true })))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn phone_is_canonicalized() {
        assert_eq!(
            canonical_phone(" +15551234567 "),
            Some(("15551234567".into(), "+15551234567".into()))
        );
        assert_eq!(
            canonical_phone("15551234567"),
            Some(("15551234567".into(), "+15551234567".into()))
        );
        // Interior plus signs are stripped too, never doubled.
        assert_eq!(
            canonical_phone("++1555"),
            Some(("1555".into(), "+1555".into()))
        );
    }

    #[test]
    fn empty_phone_is_rejected() {
        assert_eq!(canonical_phone(""), None);
        assert_eq!(canonical_phone("  + "), None);
    }

    #[test]
    fn merge_appends_new_name() {
        assert_eq!(merge_assignees(Some("Asha"), "Raj"), "Asha, Raj");
        assert_eq!(merge_assignees(None, "Raj"), "Raj");
        assert_eq!(merge_assignees(Some(""), "Raj"), "Raj");
    }

    #[test]
    fn merge_never_duplicates() {
        assert_eq!(merge_assignees(Some("Asha, Raj"), "Raj"), "Asha, Raj");
        assert_eq!(merge_assignees(Some(" Raj "), "Raj"), "Raj");
    }

    #[test]
    fn merge_normalizes_ragged_lists() {
        assert_eq!(
            merge_assignees(Some("Asha,,  Priya ,"), "Raj"),
            "Asha, Priya, Raj"
        );
    }
}
