use std::any::{Any, TypeId};
use std::collections::HashMap;

use actix::{Actor, Context, Handler};
use chrono::Utc;

use crate::resource::Resource;
use crate::services::messages::{
    CreateRecord, DeleteRecord, FetchRecord, FetchRecords, UpdateRecord,
};
use crate::types::{StoreError, StoreResult};

/// In-process store keeping one insertion-ordered table per entity type.
#[derive(Default)]
pub struct MemoryActor {
    tables: HashMap<TypeId, Box<dyn Any>>,
}

impl Actor for MemoryActor {
    type Context = Context<Self>;
}

impl MemoryActor {
    fn table<E: Resource>(&mut self) -> StoreResult<&mut Vec<E>> {
        self.tables
            .entry(TypeId::of::<E>())
            .or_insert_with(|| Box::new(Vec::<E>::new()))
            .downcast_mut::<Vec<E>>()
            .ok_or(StoreError::Corrupted(E::SCHEMA.name))
    }

    fn position<E: Resource>(table: &[E], id: &str) -> StoreResult<usize> {
        table
            .iter()
            .position(|record| record.id() == id)
            .ok_or_else(|| StoreError::NotFound {
                entity: E::SCHEMA.name,
                id: id.to_owned(),
            })
    }
}

impl<E: Resource> Handler<FetchRecords<E>> for MemoryActor {
    type Result = StoreResult<Vec<E>>;

    fn handle(&mut self, _msg: FetchRecords<E>, _ctx: &mut Self::Context) -> Self::Result {
        Ok(self.table::<E>()?.clone())
    }
}

impl<E: Resource> Handler<FetchRecord<E>> for MemoryActor {
    type Result = StoreResult<Option<E>>;

    fn handle(&mut self, msg: FetchRecord<E>, _ctx: &mut Self::Context) -> Self::Result {
        let table = self.table::<E>()?;

        Ok(table.iter().find(|record| record.id() == msg.id).cloned())
    }
}

impl<E: Resource> Handler<CreateRecord<E>> for MemoryActor {
    type Result = StoreResult<E>;

    fn handle(&mut self, msg: CreateRecord<E>, _ctx: &mut Self::Context) -> Self::Result {
        let record = E::from_new(
            uuid::Uuid::new_v4().to_string(),
            msg.0,
            Utc::now().naive_utc(),
        );
        self.table::<E>()?.push(record.clone());

        Ok(record)
    }
}

impl<E: Resource> Handler<UpdateRecord<E>> for MemoryActor {
    type Result = StoreResult<E>;

    fn handle(&mut self, msg: UpdateRecord<E>, _ctx: &mut Self::Context) -> Self::Result {
        let table = self.table::<E>()?;
        let idx = Self::position(table, &msg.id)?;

        let record = &mut table[idx];
        record.apply(msg.changes, Utc::now().naive_utc());

        Ok(record.clone())
    }
}

impl<E: Resource> Handler<DeleteRecord<E>> for MemoryActor {
    type Result = StoreResult<E>;

    fn handle(&mut self, msg: DeleteRecord<E>, _ctx: &mut Self::Context) -> Self::Result {
        let table = self.table::<E>()?;
        let idx = Self::position(table, &msg.id)?;

        Ok(table.remove(idx))
    }
}
