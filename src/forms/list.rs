use serde_json::Value;

use crate::client::{ClientResult, ResourceApi};
use crate::forms::cache::RecordCache;
use crate::resource::{EntitySchema, Resource};

#[derive(Debug, Clone, PartialEq)]
pub enum ListStatus<E> {
    Loading,
    Loaded(Vec<E>),
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListRow {
    pub id: String,
    /// One cell per schema field, in schema order.
    pub cells: Vec<String>,
}

#[derive(Debug)]
pub struct ListPage<E> {
    status: ListStatus<E>,
    action_error: Option<String>,
}

impl<E: Resource> Default for ListPage<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: Resource> ListPage<E> {
    pub fn new() -> Self {
        Self {
            status: ListStatus::Loading,
            action_error: None,
        }
    }

    pub fn status(&self) -> &ListStatus<E> {
        &self.status
    }

    /// Error of the last row action, shown above the table.
    pub fn action_error(&self) -> Option<&str> {
        self.action_error.as_deref()
    }

    pub async fn load(&mut self, api: &impl ResourceApi<E>, cache: &mut RecordCache<E>) {
        self.status = ListStatus::Loading;
        self.status = match api.list().await {
            Ok(records) => {
                cache.replace_all(records.iter().cloned());
                ListStatus::Loaded(records)
            }
            Err(err) => ListStatus::Failed(err.to_string()),
        };
    }

    pub fn headers(&self) -> Vec<&'static str> {
        std::iter::once("ID")
            .chain(E::SCHEMA.fields.iter().map(|f| f.label))
            .collect()
    }

    pub fn rows(&self) -> Vec<ListRow> {
        let ListStatus::Loaded(records) = &self.status else {
            return Vec::new();
        };

        records
            .iter()
            .map(|record| {
                let json = serde_json::to_value(record).unwrap_or(Value::Null);
                ListRow {
                    id: record.id().to_owned(),
                    cells: E::SCHEMA
                        .fields
                        .iter()
                        .map(|f| EntitySchema::field_text(&json, f.name))
                        .collect(),
                }
            })
            .collect()
    }

    /// Deletes a row. On failure the row stays and the error is kept for display.
    pub async fn remove(
        &mut self,
        id: &str,
        api: &impl ResourceApi<E>,
        cache: &mut RecordCache<E>,
    ) -> ClientResult<E> {
        match api.delete_by_id(id).await {
            Ok(deleted) => {
                if let ListStatus::Loaded(records) = &mut self.status {
                    records.retain(|record| record.id() != id);
                }
                cache.remove(id);
                self.action_error = None;
                Ok(deleted)
            }
            Err(err) => {
                self.action_error = Some(err.to_string());
                Err(err)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use reqwest::StatusCode;

    use super::*;
    use crate::forms::testing::FakeApi;
    use crate::services::db_models::{Payment, Reservation};
    use crate::services::insertable::NewPayment;

    #[tokio::test]
    async fn loaded_rows_render_schema_fields() {
        let api = FakeApi::<Payment>::default();
        let paid = api.seed(NewPayment { amount: 1200, status: "paid".into(), order_id: Some("o-1".into()) });
        let mut cache = RecordCache::new();
        let mut page = ListPage::<Payment>::new();

        page.load(&api, &mut cache).await;

        assert_eq!(page.headers(), vec!["ID", "Amount", "Status", "Order"]);
        assert_eq!(
            page.rows(),
            vec![ListRow {
                id: paid.id.clone(),
                cells: vec!["1200".into(), "paid".into(), "o-1".into()],
            }]
        );
        assert_eq!(cache.get(&paid.id), Some(&paid));
    }

    #[tokio::test]
    async fn failed_load_has_no_rows() {
        let api = FakeApi::<Reservation>::failing(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error");
        let mut page = ListPage::<Reservation>::new();

        page.load(&api, &mut RecordCache::new()).await;

        assert!(matches!(page.status(), ListStatus::Failed(msg) if msg.contains("Internal server error")));
        assert!(page.rows().is_empty());
    }

    #[tokio::test]
    async fn remove_drops_row_and_cache_entry() {
        let api = FakeApi::<Payment>::default();
        let first = api.seed(NewPayment { amount: 1, status: "open".into(), order_id: None });
        let second = api.seed(NewPayment { amount: 2, status: "open".into(), order_id: None });
        let mut cache = RecordCache::new();
        let mut page = ListPage::<Payment>::new();
        page.load(&api, &mut cache).await;

        let deleted = page.remove(&first.id, &api, &mut cache).await.unwrap();

        assert_eq!(deleted, first);
        assert_eq!(page.rows().len(), 1);
        assert_eq!(page.rows()[0].id, second.id);
        assert!(cache.get(&first.id).is_none());
        assert_eq!(cache.len(), 1);
    }

    #[tokio::test]
    async fn failed_remove_keeps_row() {
        let api = FakeApi::<Payment>::default();
        let kept = api.seed(NewPayment { amount: 1, status: "open".into(), order_id: None });
        let mut cache = RecordCache::new();
        let mut page = ListPage::<Payment>::new();
        page.load(&api, &mut cache).await;

        let result = page.remove("unknown", &api, &mut cache).await;

        assert!(result.is_err());
        assert!(page.action_error().is_some());
        assert_eq!(page.rows()[0].id, kept.id);
    }
}
