use actix_web::web::Data;
use actix_web::{App, HttpServer};
use reqwest::StatusCode;

use reservation_admin::client::{ApiClient, ClientError, OptionSource, ResourceApi};
use reservation_admin::forms::{FormPage, History, ListPage, RecordCache, SubmitOutcome};
use reservation_admin::services::db_utils::{AppState, Store};
use reservation_admin::services;
use reservation_admin::services::insertable::{NewPayment, NewRestaurant, NewUser, PaymentChanges};
use reservation_admin::{Menu, Payment, Restaurant, User};

/// Serves the admin API from a memory store on an ephemeral port.
fn start_server() -> ApiClient {
    let store = Store::memory();
    let server = HttpServer::new(move || {
        App::new()
            .app_data(Data::new(AppState { store: store.clone() }))
            .service(services::healthcheck)
            .service(services::resource_route::api_scope())
    })
        .workers(1)
        .bind(("127.0.0.1", 0))
        .expect("bind ephemeral port");

    let addr = server.addrs()[0];
    actix_web::rt::spawn(server.run());

    ApiClient::new(reqwest::Client::new(), format!("http://{addr}"))
}

#[actix_web::test]
async fn typed_client_covers_the_resource_lifecycle() {
    let api = start_server();
    let payments = api.resource::<Payment>();

    let created = payments
        .create(&NewPayment { amount: 1500, status: "pending".into(), order_id: None })
        .await
        .unwrap();
    let fetched = payments.get_by_id(&created.id).await.unwrap();
    assert_eq!(fetched.as_ref(), Some(&created));

    let updated = payments
        .update_by_id(&created.id, &PaymentChanges { status: Some("paid".into()), ..Default::default() })
        .await
        .unwrap();
    assert_eq!(updated.status, "paid");
    assert_eq!(updated.amount, 1500);

    assert_eq!(payments.list().await.unwrap(), vec![updated.clone()]);

    let deleted = payments.delete_by_id(&created.id).await.unwrap();
    assert_eq!(deleted, updated);
    assert_eq!(payments.get_by_id(&created.id).await.unwrap(), None);
}

#[actix_web::test]
async fn server_faults_surface_as_status_errors() {
    let api = start_server();

    let err = api.resource::<User>().delete_by_id("missing").await.unwrap_err();

    match err {
        ClientError::Status { status, message } => {
            assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
            assert_eq!(message, "Internal server error");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[actix_web::test]
async fn unsupported_method_is_rejected_with_message() {
    let api = start_server();

    let resp = reqwest::Client::new()
        .patch(format!("{}/api/menus", api.base_url()))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(
        resp.json::<serde_json::Value>().await.unwrap(),
        serde_json::json!({"message": "Method PATCH not allowed"})
    );
}

#[actix_web::test]
async fn option_source_lists_referenced_ids() {
    let api = start_server();
    let users = api.resource::<User>();
    let owner = users.create(&NewUser { role: "owner".into() }).await.unwrap();
    let staff = users.create(&NewUser { role: "staff".into() }).await.unwrap();

    let ids = api.option_ids("users").await.unwrap();

    assert_eq!(ids, vec![owner.id, staff.id]);
}

#[actix_web::test]
async fn create_and_edit_forms_round_trip_through_the_server() {
    let api = start_server();
    let restaurants = api.resource::<Restaurant>();
    let menus = api.resource::<Menu>();
    let restaurant = restaurants
        .create(&NewRestaurant { name: "Osteria".into(), description: None, owner_id: None })
        .await
        .unwrap();
    let mut cache = RecordCache::new();
    let mut history = History::default();

    let mut create = FormPage::<Menu>::create();
    create.load_options(&api).await;
    create.set_value("name", "Dinner");
    create.set_value("restaurant_id", restaurant.id.clone());
    let SubmitOutcome::Saved(menu) = create.submit(&menus, &mut cache, &mut history).await else {
        panic!("create failed: {:?}", create.page_error());
    };
    assert_eq!(menu.restaurant_id.as_deref(), Some(restaurant.id.as_str()));
    assert_eq!(history.current(), Some("/menus"));

    let mut edit = FormPage::<Menu>::edit(menu.id.clone());
    edit.load(&menus).await;
    edit.set_value("description", "Five courses");
    let SubmitOutcome::Saved(edited) = edit.submit(&menus, &mut cache, &mut history).await else {
        panic!("edit failed: {:?}", edit.page_error());
    };
    assert_eq!(edited.name, "Dinner");
    assert_eq!(edited.description.as_deref(), Some("Five courses"));
    assert_eq!(cache.get(&menu.id), Some(&edited));

    let mut list = ListPage::<Menu>::new();
    list.load(&menus, &mut cache).await;
    assert_eq!(list.rows()[0].cells, vec!["Dinner", "Five courses", restaurant.id.as_str()]);
}
