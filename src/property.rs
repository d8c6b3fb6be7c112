use axum::extract::{Query, State};
use axum::{Extension, Json};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::auth::SessionUser;
use crate::database::{self, PropertyFilters};
use crate::db;
use crate::error::ApiResult;
use crate::models::{NewProperty, Property};
use crate::AppState;

const LISTING_LIMIT: i64 = 20;

#[derive(Debug, Deserialize)]
pub struct CreatePropertyRequest {
    pub title: String,
    pub description: String,
    pub thumbnail_photo_url: String,
    pub cover_photo_url: String,
    pub cost_per_night: i32,
    pub parking_spaces: i32,
    pub number_of_bathrooms: i32,
    pub number_of_bedrooms: i32,
    pub country: String,
    pub street: String,
    pub city: String,
    pub province: String,
    pub post_code: String,
}

/// Lists properties matching the query-string filters, cheapest first.
pub async fn list_properties(
    State(state): State<AppState>,
    Query(filters): Query<PropertyFilters>,
) -> ApiResult<Json<Value>> {
    let properties = db::run(&state.pool, move |conn| {
        database::get_all_properties(conn, &filters, LISTING_LIMIT)
    })
    .await?;
    Ok(Json(json!({ "properties": properties })))
}

/// Creates a property owned by the session user.
pub async fn create_property(
    State(state): State<AppState>,
    Extension(SessionUser(owner_id)): Extension<SessionUser>,
    Json(body): Json<CreatePropertyRequest>,
) -> ApiResult<Json<Property>> {
    let new_property = NewProperty {
        owner_id,
        title: body.title,
        description: body.description,
        thumbnail_photo_url: body.thumbnail_photo_url,
        cover_photo_url: body.cover_photo_url,
        cost_per_night: body.cost_per_night,
        parking_spaces: body.parking_spaces,
        number_of_bathrooms: body.number_of_bathrooms,
        number_of_bedrooms: body.number_of_bedrooms,
        country: body.country,
        street: body.street,
        city: body.city,
        province: body.province,
        post_code: body.post_code,
    };
    let property = db::run(&state.pool, move |conn| {
        database::add_property(conn, &new_property)
    })
    .await?;
    log::info!("Created property {} for owner {}", property.id, owner_id);
    Ok(Json(property))
}
