use std::collections::HashMap;

use crate::resource::Resource;

/// Latest known copy of each record, keyed by id.
#[derive(Debug, Clone)]
pub struct RecordCache<E> {
    records: HashMap<String, E>,
}

impl<E> Default for RecordCache<E> {
    fn default() -> Self {
        Self { records: HashMap::new() }
    }
}

impl<E: Resource> RecordCache<E> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: &str) -> Option<&E> {
        self.records.get(id)
    }

    pub fn put(&mut self, record: E) {
        self.records.insert(record.id().to_owned(), record);
    }

    pub fn remove(&mut self, id: &str) -> Option<E> {
        self.records.remove(id)
    }

    pub fn replace_all(&mut self, records: impl IntoIterator<Item = E>) {
        self.records = records
            .into_iter()
            .map(|record| (record.id().to_owned(), record))
            .collect();
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
