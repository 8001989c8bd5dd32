//! Entity schema descriptors and the contract every administered entity satisfies.
//!
//! The route dispatcher, the stores, the resource client and the form pages are all written
//! once against [`Resource`]; an entity joins the admin by implementing it and describing its
//! fields in an [`EntitySchema`].

use std::fmt::Debug;

use chrono::NaiveDateTime;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Integer,
    /// Calendar date, `YYYY-MM-DD`.
    Date,
    Reference(&'static str),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub label: &'static str,
    pub kind: FieldKind,
    pub required: bool,
}

impl FieldSpec {
    pub const fn required(name: &'static str, label: &'static str, kind: FieldKind) -> Self {
        Self { name, label, kind, required: true }
    }

    pub const fn optional(name: &'static str, label: &'static str, kind: FieldKind) -> Self {
        Self { name, label, kind, required: false }
    }

    pub fn reference(&self) -> Option<&'static str> {
        match self.kind {
            FieldKind::Reference(collection) => Some(collection),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct EntitySchema {
    /// Singular display name, e.g. `Menu`.
    pub name: &'static str,
    /// Collection path segment, e.g. `menus`.
    pub collection: &'static str,
    pub fields: &'static [FieldSpec],
}

impl EntitySchema {
    pub fn field(&self, name: &str) -> Option<&'static FieldSpec> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn references(&self) -> impl Iterator<Item = &'static FieldSpec> {
        let fields: &'static [FieldSpec] = self.fields;
        fields.iter().filter(|f| f.reference().is_some())
    }

    pub fn collection_route(&self) -> String {
        format!("/{}", self.collection)
    }

    /// Renders one field of a serialized record as display text. `null` and missing fields
    /// render empty.
    pub fn field_text(record: &Value, field: &str) -> String {
        match record.get(field) {
            None | Some(Value::Null) => String::new(),
            Some(Value::String(s)) => s.clone(),
            Some(other) => other.to_string(),
        }
    }
}

pub trait Resource: Serialize + DeserializeOwned + Clone + Debug + Send + Sync + Unpin + 'static {
    type New: Serialize + DeserializeOwned + Debug + Send + Sync + 'static;
    /// Partial payload accepted by update; absent fields keep their stored value.
    type Changes: Serialize + DeserializeOwned + Default + Debug + Send + Sync + 'static;

    const SCHEMA: EntitySchema;

    fn id(&self) -> &str;

    fn from_new(id: String, new: Self::New, now: NaiveDateTime) -> Self;

    /// Merges `changes` into the record in place and stamps the modification time.
    fn apply(&mut self, changes: Self::Changes, now: NaiveDateTime);
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::services::db_models::{Menu, Reservation};

    #[test]
    fn references_lists_foreign_keys_only() {
        let refs: Vec<_> = Reservation::SCHEMA.references().map(|f| (f.name, f.reference())).collect();

        assert_eq!(
            refs,
            vec![
                ("customer_id", Some("users")),
                ("restaurant_id", Some("restaurants")),
            ]
        );
    }

    #[test]
    fn field_text_renders_numbers_and_nulls() {
        let record = json!({"amount": 1200, "status": "open", "order_id": null});

        assert_eq!(EntitySchema::field_text(&record, "amount"), "1200");
        assert_eq!(EntitySchema::field_text(&record, "status"), "open");
        assert_eq!(EntitySchema::field_text(&record, "order_id"), "");
        assert_eq!(EntitySchema::field_text(&record, "missing"), "");
    }

    #[test]
    fn collection_route_uses_collection_segment() {
        assert_eq!(Menu::SCHEMA.collection_route(), "/menus");
        assert!(Menu::SCHEMA.field("name").is_some_and(|f| f.required));
    }
}
