use actix::Handler;
use chrono::{NaiveDateTime, Utc};
use diesel::{
    r2d2::{ConnectionManager, Pool, PooledConnection},
    result::Error,
    PgConnection, QueryResult,
};

use crate::resource::Resource;
use crate::services::db_models::{Menu, Payment, Reservation, Restaurant, User};
use crate::services::db_utils::PgActor;
use crate::services::messages::{
    CreateRecord, DeleteRecord, FetchRecord, FetchRecords, UpdateRecord,
};
use crate::types::{StoreError, StoreResult};

/// Diesel queries for one entity table. Implemented for every administered entity by
/// `pg_resource!`.
pub trait PgResource: Resource {
    fn load_all(conn: &mut PgConnection) -> QueryResult<Vec<Self>>;

    fn load(conn: &mut PgConnection, record_id: &str) -> QueryResult<Option<Self>>;

    fn insert(
        conn: &mut PgConnection,
        record_id: String,
        new: Self::New,
        now: NaiveDateTime,
    ) -> QueryResult<Self>;

    fn modify(
        conn: &mut PgConnection,
        record_id: &str,
        changes: Self::Changes,
        now: NaiveDateTime,
    ) -> QueryResult<Self>;

    fn remove(conn: &mut PgConnection, record_id: &str) -> QueryResult<Self>;
}

macro_rules! pg_resource {
    ($entity:ident, $table:ident) => {
        impl PgResource for $entity {
            fn load_all(conn: &mut PgConnection) -> QueryResult<Vec<Self>> {
                use crate::schema::$table as t;
                use diesel::{ExpressionMethods, QueryDsl, RunQueryDsl, SelectableHelper};

                t::table
                    .order((t::created_at.asc(), t::id.asc()))
                    .select($entity::as_select())
                    .load(conn)
            }

            fn load(conn: &mut PgConnection, record_id: &str) -> QueryResult<Option<Self>> {
                use crate::schema::$table as t;
                use diesel::{OptionalExtension, QueryDsl, RunQueryDsl, SelectableHelper};

                t::table
                    .find(record_id)
                    .select($entity::as_select())
                    .first(conn)
                    .optional()
            }

            fn insert(
                conn: &mut PgConnection,
                record_id: String,
                new: Self::New,
                now: NaiveDateTime,
            ) -> QueryResult<Self> {
                use crate::schema::$table as t;
                use diesel::{ExpressionMethods, RunQueryDsl, SelectableHelper};

                diesel::insert_into(t::table)
                    .values((
                        new,
                        t::id.eq(record_id),
                        t::created_at.eq(now),
                        t::updated_at.eq(now),
                    ))
                    .returning($entity::as_returning())
                    .get_result(conn)
            }

            fn modify(
                conn: &mut PgConnection,
                record_id: &str,
                changes: Self::Changes,
                now: NaiveDateTime,
            ) -> QueryResult<Self> {
                use crate::schema::$table as t;
                use diesel::{ExpressionMethods, QueryDsl, RunQueryDsl, SelectableHelper};

                diesel::update(t::table.find(record_id))
                    .set((changes, t::updated_at.eq(now)))
                    .returning($entity::as_returning())
                    .get_result(conn)
            }

            fn remove(conn: &mut PgConnection, record_id: &str) -> QueryResult<Self> {
                use crate::schema::$table as t;
                use diesel::{QueryDsl, RunQueryDsl, SelectableHelper};

                diesel::delete(t::table.find(record_id))
                    .returning($entity::as_returning())
                    .get_result(conn)
            }
        }
    };
}

pg_resource!(Menu, menus);
pg_resource!(Payment, payments);
pg_resource!(Reservation, reservations);
pg_resource!(Restaurant, restaurants);
pg_resource!(User, users);

fn establish_connection(
    pool: &Pool<ConnectionManager<PgConnection>>,
) -> StoreResult<PooledConnection<ConnectionManager<PgConnection>>> {
    pool.get().map_err(|err| StoreError::Connection(err.to_string()))
}

/// Diesel reports a missing row on `UPDATE/DELETE .. RETURNING` as `NotFound`; name the record
/// instead.
fn missing_as_not_found<E: Resource>(err: Error, record_id: &str) -> StoreError {
    match err {
        Error::NotFound => StoreError::NotFound {
            entity: E::SCHEMA.name,
            id: record_id.to_owned(),
        },
        other => StoreError::Query(other),
    }
}

fn now() -> NaiveDateTime {
    Utc::now().naive_utc()
}

impl<E: PgResource> Handler<FetchRecords<E>> for PgActor {
    type Result = StoreResult<Vec<E>>;

    fn handle(&mut self, _msg: FetchRecords<E>, _ctx: &mut Self::Context) -> Self::Result {
        let mut conn = establish_connection(&self.0)?;

        Ok(E::load_all(&mut conn)?)
    }
}

impl<E: PgResource> Handler<FetchRecord<E>> for PgActor {
    type Result = StoreResult<Option<E>>;

    fn handle(&mut self, msg: FetchRecord<E>, _ctx: &mut Self::Context) -> Self::Result {
        let mut conn = establish_connection(&self.0)?;

        Ok(E::load(&mut conn, &msg.id)?)
    }
}

impl<E: PgResource> Handler<CreateRecord<E>> for PgActor {
    type Result = StoreResult<E>;

    fn handle(&mut self, msg: CreateRecord<E>, _ctx: &mut Self::Context) -> Self::Result {
        let mut conn = establish_connection(&self.0)?;
        let record_id = uuid::Uuid::new_v4().to_string();

        Ok(E::insert(&mut conn, record_id, msg.0, now())?)
    }
}

impl<E: PgResource> Handler<UpdateRecord<E>> for PgActor {
    type Result = StoreResult<E>;

    fn handle(&mut self, msg: UpdateRecord<E>, _ctx: &mut Self::Context) -> Self::Result {
        let mut conn = establish_connection(&self.0)?;

        E::modify(&mut conn, &msg.id, msg.changes, now())
            .map_err(|err| missing_as_not_found::<E>(err, &msg.id))
    }
}

impl<E: PgResource> Handler<DeleteRecord<E>> for PgActor {
    type Result = StoreResult<E>;

    fn handle(&mut self, msg: DeleteRecord<E>, _ctx: &mut Self::Context) -> Self::Result {
        let mut conn = establish_connection(&self.0)?;

        E::remove(&mut conn, &msg.id).map_err(|err| missing_as_not_found::<E>(err, &msg.id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::insertable::{MenuChanges, NewMenu};

    #[test]
    fn missing_row_names_the_record() {
        let err = missing_as_not_found::<Payment>(Error::NotFound, "p-1");

        assert_eq!(err.to_string(), "Payment with id 'p-1' not found");
    }

    #[test]
    fn other_query_errors_pass_through() {
        let err = missing_as_not_found::<Menu>(Error::RollbackTransaction, "m-1");

        assert!(matches!(err, StoreError::Query(Error::RollbackTransaction)));
    }

    #[test]
    fn cleared_column_is_set_and_absent_columns_are_skipped() {
        use crate::schema::menus;
        use diesel::{debug_query, pg::Pg, ExpressionMethods, QueryDsl};

        let changes = MenuChanges { description: Some(None), ..Default::default() };
        let query = diesel::update(menus::table.find("m-1")).set((changes, menus::updated_at.eq(now())));
        let sql = debug_query::<Pg, _>(&query).to_string();

        assert!(sql.contains(r#"SET "description" = $1, "updated_at" = $2"#), "{sql}");
        assert!(!sql.contains(r#""name""#), "{sql}");
        assert!(!sql.contains(r#""restaurant_id""#), "{sql}");
        assert!(sql.contains("binds: [None,"), "{sql}");
    }

    // Runs inside a rolled-back test transaction.
    #[test]
    #[ignore = "needs a Postgres database in ADMIN_PG_DATABASE_URL"]
    fn menu_queries_against_postgres() {
        use diesel::{Connection, RunQueryDsl};

        let url = std::env::var("ADMIN_PG_DATABASE_URL").expect("ADMIN_PG_DATABASE_URL");
        let mut conn = PgConnection::establish(&url).unwrap();
        conn.begin_test_transaction().unwrap();
        diesel::sql_query(
            "CREATE TABLE IF NOT EXISTS menus (
                id VARCHAR PRIMARY KEY,
                name VARCHAR NOT NULL,
                description VARCHAR,
                restaurant_id VARCHAR,
                created_at TIMESTAMP NOT NULL,
                updated_at TIMESTAMP NOT NULL
            )",
        )
        .execute(&mut conn)
        .unwrap();

        let new = NewMenu { name: "Lunch".into(), description: Some("old".into()), restaurant_id: None };
        let created = Menu::insert(&mut conn, "m-test".into(), new, now()).unwrap();
        assert_eq!(Menu::load(&mut conn, "m-test").unwrap(), Some(created.clone()));
        assert!(Menu::load_all(&mut conn).unwrap().contains(&created));

        let cleared = MenuChanges { description: Some(None), ..Default::default() };
        let updated = Menu::modify(&mut conn, "m-test", cleared, now()).unwrap();
        assert_eq!(updated.description, None);
        assert_eq!(updated.name, "Lunch");
        assert_eq!(updated.created_at, created.created_at);

        assert_eq!(Menu::remove(&mut conn, "m-test").unwrap(), updated);
        assert_eq!(Menu::load(&mut conn, "m-test").unwrap(), None);
        assert!(matches!(
            Menu::modify(&mut conn, "m-test", MenuChanges::default(), now()),
            Err(Error::NotFound)
        ));
    }
}
