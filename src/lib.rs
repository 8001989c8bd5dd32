//! Admin backend and client-side pages for restaurants, menus, reservations, payments and users.

pub mod client;
pub mod forms;
pub mod resource;
pub mod schema;
pub mod services;
pub mod settings;
pub mod types;

pub use resource::{EntitySchema, FieldKind, FieldSpec, Resource};
pub use services::db_models::{Menu, Payment, Reservation, Restaurant, User};
