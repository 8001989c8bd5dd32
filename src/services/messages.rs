use std::marker::PhantomData;

use actix::Message;

use crate::resource::Resource;
use crate::types::StoreResult;

pub struct FetchRecords<E>(PhantomData<E>);

impl<E> FetchRecords<E> {
    pub fn new() -> Self {
        Self(PhantomData)
    }
}

impl<E> Default for FetchRecords<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: Resource> Message for FetchRecords<E> {
    type Result = StoreResult<Vec<E>>;
}

pub struct FetchRecord<E> {
    pub id: String,
    _entity: PhantomData<E>,
}

impl<E> FetchRecord<E> {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into(), _entity: PhantomData }
    }
}

impl<E: Resource> Message for FetchRecord<E> {
    type Result = StoreResult<Option<E>>;
}

pub struct CreateRecord<E: Resource>(pub E::New);

impl<E: Resource> Message for CreateRecord<E> {
    type Result = StoreResult<E>;
}

pub struct UpdateRecord<E: Resource> {
    pub id: String,
    pub changes: E::Changes,
}

impl<E: Resource> Message for UpdateRecord<E> {
    type Result = StoreResult<E>;
}

pub struct DeleteRecord<E> {
    pub id: String,
    _entity: PhantomData<E>,
}

impl<E> DeleteRecord<E> {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into(), _entity: PhantomData }
    }
}

impl<E: Resource> Message for DeleteRecord<E> {
    type Result = StoreResult<E>;
}
