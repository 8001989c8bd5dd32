use chrono::{NaiveDate, NaiveDateTime};
use diesel::{Queryable, Selectable};
use serde::{Deserialize, Serialize};

use crate::resource::{EntitySchema, FieldKind, FieldSpec, Resource};
use crate::schema::{menus, payments, reservations, restaurants, users};
use crate::services::insertable::{
    MenuChanges, NewMenu, NewPayment, NewReservation, NewRestaurant, NewUser, PaymentChanges,
    ReservationChanges, RestaurantChanges, UserChanges,
};

#[derive(Queryable, Selectable, Serialize, Deserialize, Debug, Clone, PartialEq)]
#[diesel(table_name = menus)]
pub struct Menu {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub restaurant_id: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Queryable, Selectable, Serialize, Deserialize, Debug, Clone, PartialEq)]
#[diesel(table_name = payments)]
pub struct Payment {
    pub id: String,
    pub amount: i32,
    pub status: String,
    /// Orders live outside this service, the id is stored as given.
    pub order_id: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Queryable, Selectable, Serialize, Deserialize, Debug, Clone, PartialEq)]
#[diesel(table_name = reservations)]
pub struct Reservation {
    pub id: String,
    pub date: NaiveDate,
    pub number_of_guests: i32,
    pub customer_id: Option<String>,
    pub restaurant_id: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Queryable, Selectable, Serialize, Deserialize, Debug, Clone, PartialEq)]
#[diesel(table_name = restaurants)]
pub struct Restaurant {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub owner_id: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Queryable, Selectable, Serialize, Deserialize, Debug, Clone, PartialEq)]
#[diesel(table_name = users)]
pub struct User {
    pub id: String,
    pub role: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl Resource for Menu {
    type New = NewMenu;
    type Changes = MenuChanges;

    const SCHEMA: EntitySchema = EntitySchema {
        name: "Menu",
        collection: "menus",
        fields: &[
            FieldSpec::required("name", "Name", FieldKind::Text),
            FieldSpec::optional("description", "Description", FieldKind::Text),
            FieldSpec::optional("restaurant_id", "Restaurant", FieldKind::Reference("restaurants")),
        ],
    };

    fn id(&self) -> &str {
        &self.id
    }

    fn from_new(id: String, new: NewMenu, now: NaiveDateTime) -> Self {
        Self {
            id,
            name: new.name,
            description: new.description,
            restaurant_id: new.restaurant_id,
            created_at: now,
            updated_at: now,
        }
    }

    fn apply(&mut self, changes: MenuChanges, now: NaiveDateTime) {
        if let Some(name) = changes.name {
            self.name = name;
        }
        if let Some(description) = changes.description {
            self.description = description;
        }
        if let Some(restaurant_id) = changes.restaurant_id {
            self.restaurant_id = restaurant_id;
        }
        self.updated_at = now;
    }
}

impl Resource for Payment {
    type New = NewPayment;
    type Changes = PaymentChanges;

    const SCHEMA: EntitySchema = EntitySchema {
        name: "Payment",
        collection: "payments",
        fields: &[
            FieldSpec::required("amount", "Amount", FieldKind::Integer),
            FieldSpec::required("status", "Status", FieldKind::Text),
            FieldSpec::optional("order_id", "Order", FieldKind::Reference("orders")),
        ],
    };

    fn id(&self) -> &str {
        &self.id
    }

    fn from_new(id: String, new: NewPayment, now: NaiveDateTime) -> Self {
        Self {
            id,
            amount: new.amount,
            status: new.status,
            order_id: new.order_id,
            created_at: now,
            updated_at: now,
        }
    }

    fn apply(&mut self, changes: PaymentChanges, now: NaiveDateTime) {
        if let Some(amount) = changes.amount {
            self.amount = amount;
        }
        if let Some(status) = changes.status {
            self.status = status;
        }
        if let Some(order_id) = changes.order_id {
            self.order_id = order_id;
        }
        self.updated_at = now;
    }
}

impl Resource for Reservation {
    type New = NewReservation;
    type Changes = ReservationChanges;

    const SCHEMA: EntitySchema = EntitySchema {
        name: "Reservation",
        collection: "reservations",
        fields: &[
            FieldSpec::required("date", "Date", FieldKind::Date),
            FieldSpec::required("number_of_guests", "Number of guests", FieldKind::Integer),
            FieldSpec::optional("customer_id", "Customer", FieldKind::Reference("users")),
            FieldSpec::optional("restaurant_id", "Restaurant", FieldKind::Reference("restaurants")),
        ],
    };

    fn id(&self) -> &str {
        &self.id
    }

    fn from_new(id: String, new: NewReservation, now: NaiveDateTime) -> Self {
        Self {
            id,
            date: new.date,
            number_of_guests: new.number_of_guests,
            customer_id: new.customer_id,
            restaurant_id: new.restaurant_id,
            created_at: now,
            updated_at: now,
        }
    }

    fn apply(&mut self, changes: ReservationChanges, now: NaiveDateTime) {
        if let Some(date) = changes.date {
            self.date = date;
        }
        if let Some(guests) = changes.number_of_guests {
            self.number_of_guests = guests;
        }
        if let Some(customer_id) = changes.customer_id {
            self.customer_id = customer_id;
        }
        if let Some(restaurant_id) = changes.restaurant_id {
            self.restaurant_id = restaurant_id;
        }
        self.updated_at = now;
    }
}

impl Resource for Restaurant {
    type New = NewRestaurant;
    type Changes = RestaurantChanges;

    const SCHEMA: EntitySchema = EntitySchema {
        name: "Restaurant",
        collection: "restaurants",
        fields: &[
            FieldSpec::required("name", "Name", FieldKind::Text),
            FieldSpec::optional("description", "Description", FieldKind::Text),
            FieldSpec::optional("owner_id", "Owner", FieldKind::Reference("users")),
        ],
    };

    fn id(&self) -> &str {
        &self.id
    }

    fn from_new(id: String, new: NewRestaurant, now: NaiveDateTime) -> Self {
        Self {
            id,
            name: new.name,
            description: new.description,
            owner_id: new.owner_id,
            created_at: now,
            updated_at: now,
        }
    }

    fn apply(&mut self, changes: RestaurantChanges, now: NaiveDateTime) {
        if let Some(name) = changes.name {
            self.name = name;
        }
        if let Some(description) = changes.description {
            self.description = description;
        }
        if let Some(owner_id) = changes.owner_id {
            self.owner_id = owner_id;
        }
        self.updated_at = now;
    }
}

impl Resource for User {
    type New = NewUser;
    type Changes = UserChanges;

    const SCHEMA: EntitySchema = EntitySchema {
        name: "User",
        collection: "users",
        fields: &[FieldSpec::required("role", "Role", FieldKind::Text)],
    };

    fn id(&self) -> &str {
        &self.id
    }

    fn from_new(id: String, new: NewUser, now: NaiveDateTime) -> Self {
        Self {
            id,
            role: new.role,
            created_at: now,
            updated_at: now,
        }
    }

    fn apply(&mut self, changes: UserChanges, now: NaiveDateTime) {
        if let Some(role) = changes.role {
            self.role = role;
        }
        self.updated_at = now;
    }
}
