//! End-to-end batch test: rotation → fetch → filter → dispatch → log
//!
//! Requires a Postgres instance; set ZAPOFERTAS_TEST_DATABASE_URL to run.
//! Without it the tests return early, so the suite stays green on machines
//! that only have the mock HTTP servers.

use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use zapofertas::config::Settings;
use zapofertas::database::{connection, DatabaseService};
use zapofertas::models::{CategoryRef, CreateGroupRequest, LogStatus, SortType, UpdateGroupRequest};
use zapofertas::scheduler::{BatchTrigger, Scheduler};
use zapofertas::services::ServiceFactory;

async fn test_database() -> Option<DatabaseService> {
    let url = std::env::var("ZAPOFERTAS_TEST_DATABASE_URL").ok()?;

    let mut config = Settings::default().database;
    config.url = url;
    let pool = connection::create_pool(&config).await.ok()?;
    connection::run_migrations(&pool).await.ok()?;

    Some(DatabaseService::new(pool))
}

fn test_settings(offers_server: &MockServer, gateway: &MockServer) -> Settings {
    let mut settings = Settings::default();
    settings.shopee.api_url = format!("{}/graphql", offers_server.uri());
    settings.shopee.app_id = "test-app".to_string();
    settings.shopee.app_secret = "test-secret".to_string();
    settings.whatsapp.api_url = gateway.uri();
    settings.whatsapp.api_key = "test-key".to_string();
    // Keep the batch fast under test
    settings.scheduler.scheduled_delay_seconds = 0;
    settings.scheduler.manual_delay_seconds = 0;
    settings
}

async fn mount_offers_page(server: &MockServer, title: &str) {
    Mock::given(method("POST"))
        .and(path("/graphql"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {
                "productOfferV2": {
                    "nodes": [{
                        "productName": title,
                        "priceMin": "34.90",
                        "priceMax": "49.90",
                        "priceDiscountRate": 30,
                        "ratingStar": "4.7",
                        "sales": 2300,
                        "offerLink": "https://s.shopee.com.br/xyz",
                        "productCatIds": [100113]
                    }]
                }
            }
        })))
        .mount(server)
        .await;
}

#[tokio::test]
async fn disconnected_channel_logs_error_and_batch_continues() {
    let Some(db) = test_database().await else { return };

    let offers_server = MockServer::start().await;
    let gateway = MockServer::start().await;

    mount_offers_page(&offers_server, "Kit Casa Organização").await;
    Mock::given(method("GET"))
        .and(path("/api/status"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "status": "DISCONNECTED" })))
        .mount(&gateway)
        .await;

    let first = db.groups
        .create(CreateGroupRequest {
            name: format!("batch-test-a-{}", std::process::id()),
            invite_link: None,
            keywords: Some(vec!["casa".to_string()]),
            blacklist: None,
            category_label: None,
            product_categories: Some(vec![CategoryRef::Numeric(100113)]),
            sort_type: Some(SortType::SalesDesc),
        })
        .await
        .unwrap();
    let second = db.groups
        .create(CreateGroupRequest {
            name: format!("batch-test-b-{}", std::process::id()),
            invite_link: None,
            keywords: Some(vec!["casa".to_string()]),
            blacklist: None,
            category_label: None,
            product_categories: Some(vec![CategoryRef::Numeric(100113)]),
            sort_type: Some(SortType::SalesDesc),
        })
        .await
        .unwrap();

    for group in [&first, &second] {
        db.groups
            .update(group.id, UpdateGroupRequest {
                chat_id: Some(format!("chat-{}@g.us", group.id)),
                ..Default::default()
            })
            .await
            .unwrap();
    }
    db.ensure_default_template().await.unwrap();

    let settings = test_settings(&offers_server, &gateway);
    let services = ServiceFactory::new(&settings, db.clone()).unwrap();
    let scheduler = Scheduler::new(settings, db.clone(), services);

    let summary = scheduler.run_batch(BatchTrigger::Manual).await.unwrap();

    // Both groups processed despite the dead channel; each produced an
    // ERROR log row instead of aborting the batch
    assert!(summary.processed >= 2);
    assert_eq!(summary.dispatched, 0);

    let logs = db.logs.list(50, 0).await.unwrap();
    let ours: Vec<_> = logs.iter()
        .filter(|entry| entry.group_name.starts_with("batch-test-"))
        .collect();
    assert!(ours.len() >= 2);
    assert!(ours.iter().all(|entry| entry.status == LogStatus::Error));

    db.groups.delete(first.id).await.unwrap();
    db.groups.delete(second.id).await.unwrap();
}

#[tokio::test]
async fn connected_channel_dispatches_and_records_sent() {
    let Some(db) = test_database().await else { return };

    let offers_server = MockServer::start().await;
    let gateway = MockServer::start().await;

    mount_offers_page(&offers_server, "Kit Casa Premium").await;
    Mock::given(method("GET"))
        .and(path("/api/status"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "status": "CONNECTED" })))
        .mount(&gateway)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/send-message"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "sent": true })))
        .mount(&gateway)
        .await;

    let group = db.groups
        .create(CreateGroupRequest {
            name: format!("batch-test-sent-{}", std::process::id()),
            invite_link: None,
            keywords: Some(vec!["casa".to_string()]),
            blacklist: None,
            category_label: None,
            product_categories: Some(vec![CategoryRef::Numeric(100113)]),
            sort_type: Some(SortType::SalesDesc),
        })
        .await
        .unwrap();
    db.groups
        .update(group.id, UpdateGroupRequest {
            chat_id: Some(format!("chat-{}@g.us", group.id)),
            ..Default::default()
        })
        .await
        .unwrap();
    db.ensure_default_template().await.unwrap();

    let settings = test_settings(&offers_server, &gateway);
    let services = ServiceFactory::new(&settings, db.clone()).unwrap();
    let scheduler = Scheduler::new(settings, db.clone(), services);

    let summary = scheduler.run_batch(BatchTrigger::Manual).await.unwrap();
    assert!(summary.dispatched >= 1);

    let refreshed = db.groups.find_by_id(group.id).await.unwrap().unwrap();
    assert!(refreshed.last_sent_at.is_some());
    // A successful dispatch keeps the pagination cursor where it was
    assert_eq!(refreshed.rotation_state.0.page, 1);

    db.groups.delete(group.id).await.unwrap();
}
