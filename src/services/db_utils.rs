use actix::{Actor, Addr, SyncArbiter, SyncContext};
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::PgConnection;

use crate::services::memory_handling::MemoryActor;
use crate::services::messages::{
    CreateRecord, DeleteRecord, FetchRecord, FetchRecords, UpdateRecord,
};
use crate::services::pg_handling::PgResource;
use crate::types::{PoolInitializationError, StoreResult};

pub struct PgActor(pub Pool<ConnectionManager<PgConnection>>);

impl Actor for PgActor {
    type Context = SyncContext<Self>;
}

pub struct AppState {
    pub store: Store,
}

pub fn get_db_pool(
    db_url: &str,
    max_size: u32,
) -> Result<Pool<ConnectionManager<PgConnection>>, PoolInitializationError> {
    let manager: ConnectionManager<PgConnection> = ConnectionManager::<PgConnection>::new(db_url);
    Pool::builder()
        .max_size(max_size)
        .build(manager)
        .map_err(|err| PoolInitializationError(err.to_string()))
}

#[derive(Clone)]
pub enum Store {
    Postgres(Addr<PgActor>),
    Memory(Addr<MemoryActor>),
}

impl Store {
    /// Runs `workers` blocking diesel actors sharing `pool`.
    pub fn postgres(pool: Pool<ConnectionManager<PgConnection>>, workers: usize) -> Self {
        Store::Postgres(SyncArbiter::start(workers, move || PgActor(pool.clone())))
    }

    /// Must be called from inside a running actix system.
    pub fn memory() -> Self {
        Store::Memory(MemoryActor::default().start())
    }

    pub async fn list<E: PgResource>(&self) -> StoreResult<Vec<E>> {
        match self {
            Store::Postgres(addr) => addr.send(FetchRecords::<E>::new()).await?,
            Store::Memory(addr) => addr.send(FetchRecords::<E>::new()).await?,
        }
    }

    pub async fn get<E: PgResource>(&self, id: &str) -> StoreResult<Option<E>> {
        match self {
            Store::Postgres(addr) => addr.send(FetchRecord::<E>::new(id)).await?,
            Store::Memory(addr) => addr.send(FetchRecord::<E>::new(id)).await?,
        }
    }

    pub async fn create<E: PgResource>(&self, new: E::New) -> StoreResult<E> {
        match self {
            Store::Postgres(addr) => addr.send(CreateRecord::<E>(new)).await?,
            Store::Memory(addr) => addr.send(CreateRecord::<E>(new)).await?,
        }
    }

    pub async fn update<E: PgResource>(&self, id: &str, changes: E::Changes) -> StoreResult<E> {
        let msg = UpdateRecord::<E> { id: id.to_owned(), changes };
        match self {
            Store::Postgres(addr) => addr.send(msg).await?,
            Store::Memory(addr) => addr.send(msg).await?,
        }
    }

    pub async fn delete<E: PgResource>(&self, id: &str) -> StoreResult<E> {
        match self {
            Store::Postgres(addr) => addr.send(DeleteRecord::<E>::new(id)).await?,
            Store::Memory(addr) => addr.send(DeleteRecord::<E>::new(id)).await?,
        }
    }

    pub fn backend_name(&self) -> &'static str {
        match self {
            Store::Postgres(_) => "postgres",
            Store::Memory(_) => "memory",
        }
    }
}
