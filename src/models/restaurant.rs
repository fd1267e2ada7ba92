use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use diesel::{AsChangeset, Identifiable, Insertable, Queryable, Selectable};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Queryable, Selectable, Debug, Identifiable, Serialize, Deserialize, ToSchema)]
#[diesel(table_name = crate::db::schema::restaurants)]
#[diesel(primary_key(restaurant_id))]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Restaurant {
    pub restaurant_id: i32,
    pub name: String,
    pub category: String,
    pub address: String,
    pub phone: String,
    #[schema(value_type = String)]
    pub delivery_fee: BigDecimal,
    pub is_active: bool,
    pub delivery_time_minutes: i32,
    pub opening_hours: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Insertable, Debug, Serialize, Deserialize, ToSchema)]
#[diesel(table_name = crate::db::schema::restaurants)]
pub struct NewRestaurant {
    pub name: String,
    pub category: String,
    pub address: String,
    pub phone: String,
    #[schema(value_type = String)]
    pub delivery_fee: BigDecimal,
    pub delivery_time_minutes: i32,
    pub opening_hours: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, AsChangeset, ToSchema)]
#[diesel(table_name = crate::db::schema::restaurants)]
pub struct UpdateRestaurant {
    pub name: Option<String>,
    pub category: Option<String>,
    pub address: Option<String>,
    pub phone: Option<String>,
    #[schema(value_type = Option<String>)]
    pub delivery_fee: Option<BigDecimal>,
    pub delivery_time_minutes: Option<i32>,
    pub opening_hours: Option<String>,
}
