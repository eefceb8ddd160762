// src/team.rs
//
// Roster endpoints for the `teamAssign` collection.

use actix_web::{web, HttpResponse};
use log::info;
use serde::Deserialize;
use serde_json::json;

use crate::app_state::AppState;
use crate::error::ApiError;
use crate::models::{Employee, LeadSet, RawNumber};
use crate::store::{collection_json, number_filter};

pub const TEAM_COLLECTION: &str = "teamAssign";

// GET /api/get-team-assign
pub async fn get_team_roster(data: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
    let members = collection_json(&data.mongodb.db, TEAM_COLLECTION).await?;
    Ok(HttpResponse::Ok().json(members))
}

#[derive(Debug, Deserialize)]
pub struct AddTeamMemberRequest {
    pub name: String,
    pub number: RawNumber,
}

// POST /api/add-team-assign
pub async fn add_team_member(
    data: web::Data<AppState>,
    payload: web::Json<AddTeamMemberRequest>,
) -> Result<HttpResponse, ApiError> {
    if payload.name.trim().is_empty() || payload.number.is_empty() {
        return Err(ApiError::MissingField("Missing fields".to_string()));
    }

    let team = data.mongodb.db.collection::<Employee>(TEAM_COLLECTION);
    let raw_number = payload.number.to_string();
    if team
        .find_one(number_filter("Employee number", &raw_number))
        .await?
        .is_some()
    {
        return Err(ApiError::Duplicate("Employee already exists".to_string()));
    }

    let member = Employee {
        id: None,
        name: payload.name.trim().to_string(),
        number: payload.number.clone(),
        leads: LeadSet::new(),
        active: true,
    };
    team.insert_one(&member).await?;

    info!("Added team member {} (#{})", member.name, raw_number);
    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "message": "Team member added successfully",
    })))
}

// DELETE /api/remove-team-assign/{number}
pub async fn remove_team_member(
    data: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let number = path.into_inner();
    let team = data.mongodb.db.collection::<Employee>(TEAM_COLLECTION);

    let result = team
        .delete_one(number_filter("Employee number", &number))
        .await?;
    if result.deleted_count == 0 {
        return Err(ApiError::NotFound("Member not found".to_string()));
    }

    info!("Removed team member #{}", number);
    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "message": "Team member removed",
    })))
}
