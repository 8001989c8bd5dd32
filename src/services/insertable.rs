use chrono::NaiveDate;
use diesel::{AsChangeset, Insertable};
use serde::{Deserialize, Serialize};
use serde_with::rust::double_option;

use crate::schema::{menus, payments, reservations, restaurants, users};

// Create payloads. Ids and timestamps are assigned by the store at insert time.

#[derive(Insertable, Serialize, Deserialize, Debug, Clone)]
#[diesel(table_name = menus)]
pub struct NewMenu {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub restaurant_id: Option<String>,
}

#[derive(Insertable, Serialize, Deserialize, Debug, Clone)]
#[diesel(table_name = payments)]
pub struct NewPayment {
    pub amount: i32,
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order_id: Option<String>,
}

#[derive(Insertable, Serialize, Deserialize, Debug, Clone)]
#[diesel(table_name = reservations)]
pub struct NewReservation {
    pub date: NaiveDate,
    pub number_of_guests: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub restaurant_id: Option<String>,
}

#[derive(Insertable, Serialize, Deserialize, Debug, Clone)]
#[diesel(table_name = restaurants)]
pub struct NewRestaurant {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner_id: Option<String>,
}

#[derive(Insertable, Serialize, Deserialize, Debug, Clone)]
#[diesel(table_name = users)]
pub struct NewUser {
    pub role: String,
}

// Update payloads. `None` leaves the column untouched; for nullable columns `Some(None)` sets
// NULL.

#[derive(AsChangeset, Serialize, Deserialize, Default, Debug, Clone)]
#[diesel(table_name = menus)]
pub struct MenuChanges {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none", with = "double_option")]
    pub description: Option<Option<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none", with = "double_option")]
    pub restaurant_id: Option<Option<String>>,
}

#[derive(AsChangeset, Serialize, Deserialize, Default, Debug, Clone)]
#[diesel(table_name = payments)]
pub struct PaymentChanges {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none", with = "double_option")]
    pub order_id: Option<Option<String>>,
}

#[derive(AsChangeset, Serialize, Deserialize, Default, Debug, Clone)]
#[diesel(table_name = reservations)]
pub struct ReservationChanges {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub number_of_guests: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none", with = "double_option")]
    pub customer_id: Option<Option<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none", with = "double_option")]
    pub restaurant_id: Option<Option<String>>,
}

#[derive(AsChangeset, Serialize, Deserialize, Default, Debug, Clone)]
#[diesel(table_name = restaurants)]
pub struct RestaurantChanges {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none", with = "double_option")]
    pub description: Option<Option<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none", with = "double_option")]
    pub owner_id: Option<Option<String>>,
}

#[derive(AsChangeset, Serialize, Deserialize, Default, Debug, Clone)]
#[diesel(table_name = users)]
pub struct UserChanges {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
}
