//! Habitica export sync against a mock HTTP server

mod common;

use common::{create_test_db, create_user, stored_values};
use tally_core::models::CredentialRequest;
use tally_core::services::create_credential;
use tally_core::{sync_user_history, Error, HabiticaClient};

const EXPORT: &str = "Date,Task Name,Task ID,Task Type,Value\n\
                      2024-01-05 08:00:00,Run,t-run,daily,2\n\
                      2024-01-05 09:30:00,Meditate,t-med,habit,1.5\n\
                      2024-01-06 08:00:00,Run,t-run,daily,not-a-number\n";

async fn add_habitica_key(db: &tally_core::Database, user_id: &str) {
    create_credential(
        &db.pool,
        user_id,
        &CredentialRequest {
            api_type: "habitica".to_string(),
            api_id: "hab-user".to_string(),
            api_key: "hab-key".to_string(),
        },
    )
    .await
    .unwrap();
}

#[tokio::test]
async fn test_sync_fetches_and_merges_export() {
    let (db, _temp_dir) = create_test_db().await;
    create_user(&db, "u1", "alice").await;
    add_habitica_key(&db, "u1").await;

    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/export/history.csv")
        .match_header("x-api-user", "hab-user")
        .match_header("x-api-key", "hab-key")
        .with_status(200)
        .with_header("content-type", "text/csv")
        .with_body(EXPORT)
        .create_async()
        .await;

    let client = HabiticaClient::new(&server.url()).unwrap();
    let result = sync_user_history(&db.pool, &client, "u1").await.unwrap();

    mock.assert_async().await;
    assert_eq!(result.rows_fetched, 3);
    assert_eq!(result.rows_upserted, 2);
    assert_eq!(result.rows_skipped, 1);

    let stored = stored_values(&db, "u1").await;
    assert_eq!(
        stored,
        vec![
            ("t-med".to_string(), "2024-01-05".to_string(), 1.5),
            ("t-run".to_string(), "2024-01-05".to_string(), 2.0),
        ]
    );
}

#[tokio::test]
async fn test_sync_twice_keeps_one_row_per_task_day() {
    let (db, _temp_dir) = create_test_db().await;
    create_user(&db, "u1", "alice").await;
    add_habitica_key(&db, "u1").await;

    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/export/history.csv")
        .with_status(200)
        .with_body(EXPORT)
        .expect(2)
        .create_async()
        .await;

    let client = HabiticaClient::new(&server.url()).unwrap();
    sync_user_history(&db.pool, &client, "u1").await.unwrap();
    sync_user_history(&db.pool, &client, "u1").await.unwrap();

    mock.assert_async().await;
    assert_eq!(stored_values(&db, "u1").await.len(), 2);
}

#[tokio::test]
async fn test_sync_upstream_rejection_writes_nothing() {
    let (db, _temp_dir) = create_test_db().await;
    create_user(&db, "u1", "alice").await;
    add_habitica_key(&db, "u1").await;

    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/export/history.csv")
        .with_status(401)
        .with_body("{\"success\":false}")
        .create_async()
        .await;

    let client = HabiticaClient::new(&server.url()).unwrap();
    let err = sync_user_history(&db.pool, &client, "u1").await.unwrap_err();

    assert!(matches!(err, Error::Upstream(ref msg) if msg.contains("401")));
    assert!(stored_values(&db, "u1").await.is_empty());
}

#[tokio::test]
async fn test_sync_without_credentials_is_not_found() {
    let (db, _temp_dir) = create_test_db().await;
    create_user(&db, "u1", "alice").await;

    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/export/history.csv")
        .expect(0)
        .create_async()
        .await;

    let client = HabiticaClient::new(&server.url()).unwrap();
    let err = sync_user_history(&db.pool, &client, "u1").await.unwrap_err();

    mock.assert_async().await;
    assert!(matches!(err, Error::NotFound(_)));
}

#[tokio::test]
async fn test_sync_malformed_export_is_upstream_error() {
    let (db, _temp_dir) = create_test_db().await;
    create_user(&db, "u1", "alice").await;
    add_habitica_key(&db, "u1").await;

    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/export/history.csv")
        .with_status(200)
        .with_body("<html>maintenance</html>")
        .create_async()
        .await;

    let client = HabiticaClient::new(&server.url()).unwrap();
    let err = sync_user_history(&db.pool, &client, "u1").await.unwrap_err();

    assert!(matches!(err, Error::Upstream(_)));
    assert!(stored_values(&db, "u1").await.is_empty());
}

#[test]
fn test_client_trims_trailing_slash() {
    let client = HabiticaClient::new("http://localhost:1234/").unwrap();
    assert_eq!(client.base_url(), "http://localhost:1234");
}
