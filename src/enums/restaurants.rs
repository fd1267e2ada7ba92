use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::models::restaurant::Restaurant;

#[derive(Debug, Deserialize, ToSchema)]
pub struct ActiveRequest {
    pub is_active: bool,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct ListRestaurantsQuery {
    pub category: Option<String>,
    pub active: Option<bool>,
    pub page: Option<i64>,
    pub page_size: Option<i64>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PagedRestaurants {
    pub items: Vec<Restaurant>,
    pub page_number: i64,
    pub page_size: i64,
    pub total_elements: i64,
    pub total_pages: i64,
}

#[derive(Serialize, ToSchema)]
pub struct PagedRestaurantsResponse {
    pub status: String,
    pub data: Option<PagedRestaurants>,
    pub error: Option<String>,
}

#[derive(Serialize, ToSchema)]
pub struct RestaurantResponse {
    pub status: String,
    pub data: Option<Restaurant>,
    pub error: Option<String>,
}

#[derive(Serialize, ToSchema)]
pub struct RestaurantsResponse {
    pub status: String,
    pub data: Vec<Restaurant>,
    pub error: Option<String>,
}
