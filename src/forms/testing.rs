//! In-memory stand-in for the HTTP client, counting every call.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use reqwest::StatusCode;

use crate::client::{ClientError, ClientResult, OptionSource, ResourceApi};
use crate::resource::Resource;
use crate::services::db_models::Reservation;
use crate::services::insertable::NewReservation;

pub struct FakeApi<E> {
    records: Mutex<Vec<E>>,
    collections: HashMap<String, Vec<String>>,
    failure: Option<(StatusCode, String)>,
    calls: AtomicUsize,
}

impl<E> Default for FakeApi<E> {
    fn default() -> Self {
        Self {
            records: Mutex::new(Vec::new()),
            collections: HashMap::new(),
            failure: None,
            calls: AtomicUsize::new(0),
        }
    }
}

impl<E: Resource> FakeApi<E> {
    pub fn failing(status: StatusCode, message: &str) -> Self {
        Self {
            failure: Some((status, message.to_owned())),
            ..Self::default()
        }
    }

    pub fn with_collection(mut self, collection: &str, ids: &[&str]) -> Self {
        self.collections
            .insert(collection.to_owned(), ids.iter().map(|id| id.to_string()).collect());
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn seed(&self, new: E::New) -> E {
        let record = E::from_new(uuid::Uuid::new_v4().to_string(), new, Utc::now().naive_utc());
        self.records.lock().unwrap().push(record.clone());
        record
    }

    fn begin(&self) -> ClientResult<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.failure {
            Some((status, message)) => Err(ClientError::Status {
                status: *status,
                message: message.clone(),
            }),
            None => Ok(()),
        }
    }

    fn missing(id: &str) -> ClientError {
        ClientError::Status {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: format!("no record {id}"),
        }
    }
}

impl FakeApi<Reservation> {
    pub fn seed_reservation(&self, date: &str, guests: i32) -> Reservation {
        self.seed(NewReservation {
            date: NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
            number_of_guests: guests,
            customer_id: None,
            restaurant_id: None,
        })
    }
}

#[async_trait]
impl<E: Resource> ResourceApi<E> for FakeApi<E> {
    async fn list(&self) -> ClientResult<Vec<E>> {
        self.begin()?;
        Ok(self.records.lock().unwrap().clone())
    }

    async fn create(&self, new: &E::New) -> ClientResult<E> {
        self.begin()?;
        let new: E::New = serde_json::from_value(serde_json::to_value(new)?)?;
        Ok(self.seed(new))
    }

    async fn get_by_id(&self, id: &str) -> ClientResult<Option<E>> {
        self.begin()?;
        Ok(self.records.lock().unwrap().iter().find(|r| r.id() == id).cloned())
    }

    async fn update_by_id(&self, id: &str, changes: &E::Changes) -> ClientResult<E> {
        self.begin()?;
        let changes: E::Changes = serde_json::from_value(serde_json::to_value(changes)?)?;
        let mut records = self.records.lock().unwrap();
        let record = records.iter_mut().find(|r| r.id() == id).ok_or_else(|| Self::missing(id))?;
        record.apply(changes, Utc::now().naive_utc());
        Ok(record.clone())
    }

    async fn delete_by_id(&self, id: &str) -> ClientResult<E> {
        self.begin()?;
        let mut records = self.records.lock().unwrap();
        let idx = records.iter().position(|r| r.id() == id).ok_or_else(|| Self::missing(id))?;
        Ok(records.remove(idx))
    }
}

#[async_trait]
impl<E: Resource> OptionSource for FakeApi<E> {
    async fn option_ids(&self, collection: &str) -> ClientResult<Vec<String>> {
        self.collections.get(collection).cloned().ok_or_else(|| ClientError::Status {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: format!("unknown collection {collection}"),
        })
    }
}
