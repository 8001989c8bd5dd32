use actix_web::{get, HttpResponse, Responder};
use serde_json::json;

pub mod db_models;
pub mod db_utils;
pub mod fault;
pub mod insertable;
pub mod memory_handling;
pub mod messages;
pub mod pg_handling;

#[get("/")]
pub async fn home_page() -> impl Responder {
    HttpResponse::Ok().body("Restaurant reservation admin")
}

#[get("/health")]
pub async fn healthcheck() -> impl Responder {
    HttpResponse::Ok().json(json!({ "status": "ok" }))
}

// sub-route "/api/{collection}", one per entity
pub mod resource_route {
    use actix_web::web::{self, Bytes, Data, Path};
    use actix_web::{HttpResponse, Scope};

    use crate::services::db_models::{Menu, Payment, Reservation, Restaurant, User};
    use crate::services::db_utils::AppState;
    use crate::services::fault::{method_not_allowed, AppError};
    use crate::services::pg_handling::PgResource;

    type RouteResult = Result<HttpResponse, AppError>;

    /// Collection endpoint at `""` and item endpoint at `"/{id}"` for `E`, mounted under
    /// `/{collection}`.
    pub fn scope<E: PgResource>() -> Scope {
        web::scope(&E::SCHEMA.collection_route())
            .service(
                web::resource("")
                    .route(web::get().to(list_records::<E>))
                    .route(web::post().to(create_record::<E>))
                    .default_service(web::to(method_not_allowed)),
            )
            .service(
                web::resource("/{id}")
                    .route(web::get().to(get_record::<E>))
                    .route(web::put().to(update_record::<E>))
                    .route(web::delete().to(delete_record::<E>))
                    .default_service(web::to(method_not_allowed)),
            )
    }

    pub fn api_scope() -> Scope {
        web::scope("/api")
            .service(scope::<Menu>())
            .service(scope::<Payment>())
            .service(scope::<Reservation>())
            .service(scope::<Restaurant>())
            .service(scope::<User>())
    }

    pub async fn list_records<E: PgResource>(state: Data<AppState>) -> RouteResult {
        let records = state.store.list::<E>().await?;

        Ok(HttpResponse::Ok().json(records))
    }

    // Malformed bodies answer with the generic 500, not the extractor's 400.
    pub async fn create_record<E: PgResource>(state: Data<AppState>, body: Bytes) -> RouteResult {
        let new: E::New = serde_json::from_slice(&body)?;
        let record = state.store.create::<E>(new).await?;

        tracing::info!(entity = E::SCHEMA.name, id = record.id(), "Record created");
        Ok(HttpResponse::Ok().json(record))
    }

    pub async fn get_record<E: PgResource>(state: Data<AppState>, path: Path<String>) -> RouteResult {
        let record = state.store.get::<E>(&path.into_inner()).await?;

        Ok(HttpResponse::Ok().json(record))
    }

    pub async fn update_record<E: PgResource>(
        state: Data<AppState>,
        path: Path<String>,
        body: Bytes,
    ) -> RouteResult {
        let changes: E::Changes = serde_json::from_slice(&body)?;
        let record = state.store.update::<E>(&path.into_inner(), changes).await?;

        tracing::debug!(entity = E::SCHEMA.name, id = record.id(), "Record updated");
        Ok(HttpResponse::Ok().json(record))
    }

    pub async fn delete_record<E: PgResource>(state: Data<AppState>, path: Path<String>) -> RouteResult {
        let record = state.store.delete::<E>(&path.into_inner()).await?;

        tracing::info!(entity = E::SCHEMA.name, id = record.id(), "Record deleted");
        Ok(HttpResponse::Ok().json(record))
    }
}
