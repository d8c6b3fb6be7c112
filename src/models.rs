use chrono::NaiveDate;
use diesel::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Debug, Queryable, Clone)]
pub struct User {
    pub id: i32,          // Int4
    pub name: String,     // Varchar
    pub email: String,    // Varchar
    pub password: String, // Varchar, hashed upstream
}

#[derive(Debug, Deserialize, Insertable)]
#[diesel(table_name = crate::schema::users)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// Serializable view of a user; never exposes the password column.
#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: i32,
    pub name: String,
    pub email: String,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
        }
    }
}

#[derive(Debug, Serialize, Queryable, Clone)]
pub struct Property {
    pub id: i32,                     // Int4
    pub owner_id: i32,               // Int4
    pub title: String,               // Varchar
    pub description: String,         // Text
    pub thumbnail_photo_url: String, // Varchar
    pub cover_photo_url: String,     // Varchar
    pub cost_per_night: i32,         // Int4, cents
    pub parking_spaces: i32,         // Int4
    pub number_of_bathrooms: i32,    // Int4
    pub number_of_bedrooms: i32,     // Int4
    pub country: String,             // Varchar
    pub street: String,              // Varchar
    pub city: String,                // Varchar
    pub province: String,            // Varchar
    pub post_code: String,           // Varchar
}

#[derive(Debug, Insertable)]
#[diesel(table_name = crate::schema::properties)]
pub struct NewProperty {
    pub owner_id: i32,
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

/// A property row together with its review average, computed per query.
#[derive(Debug, Serialize)]
pub struct PropertyListing {
    #[serde(flatten)]
    pub property: Property,
    pub average_rating: Option<f64>,
}

#[derive(Debug, Serialize, Queryable, Clone)]
pub struct Reservation {
    pub id: i32,               // Int4
    pub start_date: NaiveDate, // Date
    pub end_date: NaiveDate,   // Date
    pub property_id: i32,      // Int4
    pub guest_id: i32,         // Int4
}

#[derive(Debug, Insertable)]
#[diesel(table_name = crate::schema::reservations)]
pub struct NewReservation {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub property_id: i32,
    pub guest_id: i32,
}
