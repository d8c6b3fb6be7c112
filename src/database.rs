use std::collections::HashMap;

use diesel::dsl::avg;
use diesel::pg::Pg;
use diesel::prelude::*;
use serde::Deserialize;

use crate::models::{
    NewProperty, NewReservation, NewUser, Property, PropertyListing, Reservation, User,
};
use crate::schema::{properties, property_reviews, reservations, users};

/// Optional listing criteria, deserialized straight from the query string.
/// A clause is appended to the listing query only for the keys present.
#[derive(Debug, Default, Deserialize)]
pub struct PropertyFilters {
    pub city: Option<String>,
    pub owner_id: Option<i32>,
    pub minimum_price_per_night: Option<i32>,
    pub maximum_price_per_night: Option<i32>,
    pub minimum_rating: Option<f64>,
}

/// Looks up a user by exact email match.
pub fn get_user_with_email(conn: &mut PgConnection, email: &str) -> QueryResult<Option<User>> {
    users::table
        .filter(users::email.eq(email))
        .first::<User>(conn)
        .optional()
}

/// Looks up a user by id.
pub fn get_user_with_id(conn: &mut PgConnection, id: i32) -> QueryResult<Option<User>> {
    users::table.find(id).first::<User>(conn).optional()
}

/// Inserts a new user and returns the created row, generated id included.
pub fn add_user(conn: &mut PgConnection, user: &NewUser) -> QueryResult<User> {
    diesel::insert_into(users::table)
        .values(user)
        .get_result(conn)
}

/// Fetches a guest's reservations, capped at `limit`.
pub fn get_all_reservations(
    conn: &mut PgConnection,
    guest_id: i32,
    limit: i64,
) -> QueryResult<Vec<Reservation>> {
    reservations::table
        .filter(reservations::guest_id.eq(guest_id))
        .limit(limit)
        .load::<Reservation>(conn)
}

/// Lists properties matching the given filters, cheapest first, capped at
/// `limit`, each row carrying its computed review average.
///
/// The rating threshold restricts to properties whose grouped review
/// average meets it, and applies before the limit. Without a threshold no
/// rating constraint is added, so unrated properties are listed too.
pub fn get_all_properties(
    conn: &mut PgConnection,
    filters: &PropertyFilters,
    limit: i64,
) -> QueryResult<Vec<PropertyListing>> {
    let rated_ids = match filters.minimum_rating {
        Some(minimum_rating) => Some(
            property_reviews::table
                .group_by(property_reviews::property_id)
                .having(avg(property_reviews::rating).ge(minimum_rating))
                .select(property_reviews::property_id)
                .load::<i32>(conn)?,
        ),
        None => None,
    };

    let rows = property_query(filters, rated_ids, limit).load::<Property>(conn)?;

    let ids: Vec<i32> = rows.iter().map(|property| property.id).collect();
    let averages: HashMap<i32, f64> = property_reviews::table
        .filter(property_reviews::property_id.eq_any(&ids))
        .group_by(property_reviews::property_id)
        .select((property_reviews::property_id, avg(property_reviews::rating)))
        .load::<(i32, Option<f64>)>(conn)?
        .into_iter()
        .filter_map(|(property_id, rating)| rating.map(|r| (property_id, r)))
        .collect();

    Ok(rows
        .into_iter()
        .map(|property| {
            let average_rating = averages.get(&property.id).copied();
            PropertyListing {
                property,
                average_rating,
            }
        })
        .collect())
}

/// Builds the listing query. Clause composition order is fixed: city →
/// owner → minimum price → maximum price → rating threshold → order by
/// ascending cost → limit. Monetary inputs arrive in whole dollars and are
/// compared in cents.
fn property_query(
    filters: &PropertyFilters,
    rated_ids: Option<Vec<i32>>,
    limit: i64,
) -> properties::BoxedQuery<'static, Pg> {
    let mut query = properties::table.into_boxed();

    if let Some(city) = &filters.city {
        query = query.filter(properties::city.ilike(format!("%{}%", city)));
    }
    if let Some(owner_id) = filters.owner_id {
        query = query.filter(properties::owner_id.eq(owner_id));
    }
    if let Some(minimum_price) = filters.minimum_price_per_night {
        query = query.filter(properties::cost_per_night.ge(minimum_price * 100));
    }
    if let Some(maximum_price) = filters.maximum_price_per_night {
        query = query.filter(properties::cost_per_night.le(maximum_price * 100));
    }
    if let Some(ids) = rated_ids {
        query = query.filter(properties::id.eq_any(ids));
    }

    query.order(properties::cost_per_night.asc()).limit(limit)
}

/// Inserts a property with named fields and returns the created row.
pub fn add_property(conn: &mut PgConnection, property: &NewProperty) -> QueryResult<Property> {
    diesel::insert_into(properties::table)
        .values(property)
        .get_result(conn)
}

/// Inserts a reservation and returns the created row, echoing its dates.
pub fn add_reservation(
    conn: &mut PgConnection,
    reservation: &NewReservation,
) -> QueryResult<Reservation> {
    diesel::insert_into(reservations::table)
        .values(reservation)
        .get_result(conn)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sql_for(filters: &PropertyFilters, rated_ids: Option<Vec<i32>>, limit: i64) -> String {
        diesel::debug_query::<Pg, _>(&property_query(filters, rated_ids, limit)).to_string()
    }

    #[test]
    fn unfiltered_query_orders_by_cost_and_binds_limit() {
        let sql = sql_for(&PropertyFilters::default(), None, 20);
        assert!(!sql.contains("WHERE"));
        assert!(sql.contains("ORDER BY"));
        assert!(sql.contains("cost_per_night"));
        assert!(sql.contains("LIMIT"));
        assert!(sql.contains("binds: [20]"));
    }

    #[test]
    fn city_filter_is_case_insensitive_substring() {
        let filters = PropertyFilters {
            city: Some("Vancouver".to_string()),
            ..PropertyFilters::default()
        };
        let sql = sql_for(&filters, None, 20);
        assert!(sql.contains("ILIKE"));
        assert!(sql.contains("%Vancouver%"));
    }

    #[test]
    fn price_filters_are_bound_in_cents() {
        let filters = PropertyFilters {
            minimum_price_per_night: Some(100),
            maximum_price_per_night: Some(200),
            ..PropertyFilters::default()
        };
        let sql = sql_for(&filters, None, 10);
        assert!(sql.contains(">="));
        assert!(sql.contains("<="));
        assert!(sql.contains("binds: [10000, 20000, 10]"));
    }

    #[test]
    fn owner_filter_is_exact() {
        let filters = PropertyFilters {
            owner_id: Some(7),
            ..PropertyFilters::default()
        };
        let sql = sql_for(&filters, None, 20);
        assert!(sql.contains("owner_id"));
        assert!(sql.contains("binds: [7, 20]"));
    }

    #[test]
    fn rating_threshold_restricts_by_property_id_before_limit() {
        let sql = sql_for(&PropertyFilters::default(), Some(vec![1, 2, 3]), 20);
        let id_clause = sql.find("ANY").expect("id restriction missing");
        let limit_clause = sql.find("LIMIT").expect("limit missing");
        assert!(id_clause < limit_clause);
    }

    #[test]
    fn rating_subquery_groups_and_filters_on_average() {
        let query = property_reviews::table
            .group_by(property_reviews::property_id)
            .having(avg(property_reviews::rating).ge(4.0))
            .select(property_reviews::property_id);
        let sql = diesel::debug_query::<Pg, _>(&query).to_string();
        assert!(sql.contains("GROUP BY"));
        assert!(sql.contains("HAVING"));
        assert!(sql.contains("avg"));
        assert!(sql.contains("binds: [4.0]"));
    }

    #[test]
    fn filters_deserialize_from_query_string() {
        let filters: PropertyFilters =
            serde_json::from_value(serde_json::json!({
                "city": "Toronto",
                "minimum_rating": 4,
            }))
            .unwrap();
        assert_eq!(filters.city.as_deref(), Some("Toronto"));
        assert_eq!(filters.minimum_rating, Some(4.0));
        assert!(filters.owner_id.is_none());
    }
}
