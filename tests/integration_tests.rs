//! Integration tests using wiremock to simulate the Harvest API.

use harvest::{Api, Client, Error, Harvest, Params, Project, ShortDate, Timeframe, User};
use serde_json::json;
use std::time::Duration;
use wiremock::matchers::{body_partial_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn harvest_for(server: &MockServer) -> Harvest {
    init_tracing();
    let api = Api::builder().base_url(server.uri()).unwrap().build().unwrap();
    Harvest::new(api)
}

fn user_json(id: u64, email: &str) -> serde_json::Value {
    json!({"user": {"id": id, "email": email, "first_name": "Test", "is_active": true}})
}

#[tokio::test]
async fn test_all_decodes_envelope_list_in_order() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/people"))
        .and(header("accept", "application/json"))
        .and(header("content-type", "application/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            user_json(3, "c@example.com"),
            user_json(1, "a@example.com"),
            user_json(2, "b@example.com"),
        ])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let users = harvest_for(&mock_server).users().all(None).await.unwrap();

    let ids: Vec<u64> = users.iter().map(|u| u.id).collect();
    assert_eq!(ids, vec![3, 1, 2]);
    assert_eq!(users[1].email, "a@example.com");
}

#[tokio::test]
async fn test_all_sends_query_params() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/projects/42/entries"))
        .and(query_param("from", "2014-02-01"))
        .and(query_param("to", "2014-04-01"))
        .and(query_param("billable", "yes"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"dayentry": {"id": 1, "hours": 2.0, "spent_at": "2014-02-03", "project_id": 42}},
        ])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let timeframe = Timeframe::new(
        ShortDate::from_ymd(2014, 2, 1).unwrap(),
        ShortDate::from_ymd(2014, 4, 1).unwrap(),
    );
    let mut params = Params::new();
    params.for_timeframe(&timeframe).billable(true);

    let entries = harvest_for(&mock_server)
        .day_entries(42)
        .all(Some(&params))
        .await
        .unwrap();

    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].spent_at, ShortDate::from_ymd(2014, 2, 3).unwrap());
}

#[tokio::test]
async fn test_all_classifies_error_payload() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/invoices"))
        .respond_with(
            ResponseTemplate::new(400).set_body_json(json!({"message": "Invalid status filter"})),
        )
        .mount(&mock_server)
        .await;

    let mut params = Params::new();
    params.status("bogus");
    let result = harvest_for(&mock_server).invoices().all(Some(&params)).await;

    match result {
        Err(Error::ResponseError { status, message }) => {
            assert_eq!(status.as_u16(), 400);
            assert_eq!(message, "Invalid status filter");
        }
        other => panic!("Expected ResponseError, got {:?}", other),
    }
}

#[tokio::test]
async fn test_all_with_malformed_list() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/tasks"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"task": {"id": 1}})))
        .mount(&mock_server)
        .await;

    let result = harvest_for(&mock_server).tasks().all(None).await;

    match result {
        Err(Error::DeserializationFailed { status, raw_response, .. }) => {
            assert_eq!(status.as_u16(), 200);
            assert!(raw_response.contains("task"));
        }
        other => panic!("Expected DeserializationFailed, got {:?}", other),
    }
}

#[tokio::test]
async fn test_find_decodes_single_envelope() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/people/7"))
        .respond_with(ResponseTemplate::new(200).set_body_json(user_json(7, "ada@example.com")))
        .mount(&mock_server)
        .await;

    let user = harvest_for(&mock_server).users().find(7, None).await.unwrap();

    assert_eq!(user.id, 7);
    assert_eq!(user.email, "ada@example.com");
    assert!(user.is_active);
}

#[tokio::test]
async fn test_find_missing_resource_is_not_found() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/people/999"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&mock_server)
        .await;

    let error = harvest_for(&mock_server)
        .users()
        .find(999, None)
        .await
        .unwrap_err();

    assert!(error.is_not_found());
    assert!(!error.is_retryable());
    assert_eq!(error.to_string(), "Not found");
}

#[tokio::test]
async fn test_find_with_wrong_shape_is_decode_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/people/7"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"user": {"id": "seven"}})))
        .mount(&mock_server)
        .await;

    let error = harvest_for(&mock_server)
        .users()
        .find(7, None)
        .await
        .unwrap_err();

    assert!(matches!(error, Error::DeserializationFailed { .. }));
    assert!(!error.is_not_found());
}

#[tokio::test]
async fn test_find_unexplained_server_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/clients/3"))
        .respond_with(ResponseTemplate::new(500).set_body_string("<h1>Internal Server Error</h1>"))
        .mount(&mock_server)
        .await;

    let result = harvest_for(&mock_server).clients().find(3, None).await;

    match result {
        Err(Error::DeserializationFailed { status, raw_response, .. }) => {
            assert_eq!(status.as_u16(), 500);
            assert_eq!(raw_response, "<h1>Internal Server Error</h1>");
        }
        other => panic!("Expected DeserializationFailed, got {:?}", other),
    }
}

#[tokio::test]
async fn test_create_recovers_identifier_from_location() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/projects"))
        .and(body_partial_json(json!({"project": {"name": "Apollo", "client_id": 9}})))
        .respond_with(ResponseTemplate::new(201).insert_header("Location", "/projects/42"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let mut project = Project {
        name: "Apollo".to_string(),
        client_id: 9,
        ..Project::default()
    };
    let id = harvest_for(&mock_server)
        .projects()
        .create(&mut project)
        .await
        .unwrap();

    assert_eq!(id, 42);
    assert_eq!(project.id, 42);
}

#[tokio::test]
async fn test_create_without_location_is_bad_request() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/projects"))
        .respond_with(ResponseTemplate::new(201).insert_header("Location", "/projects/new"))
        .mount(&mock_server)
        .await;

    let mut project = Project {
        name: "Apollo".to_string(),
        ..Project::default()
    };
    let result = harvest_for(&mock_server).projects().create(&mut project).await;

    match result {
        Err(Error::MissingIdentifier { location }) => {
            assert_eq!(location.as_deref(), Some("/projects/new"));
        }
        other => panic!("Expected MissingIdentifier, got {:?}", other),
    }
    assert_eq!(project.id, 0);
}

#[tokio::test]
async fn test_create_rejected() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/clients"))
        .respond_with(
            ResponseTemplate::new(422)
                .set_body_json(json!({"message": "Name has already been taken"})),
        )
        .mount(&mock_server)
        .await;

    let mut client = Client {
        name: "Acme".to_string(),
        ..Client::default()
    };
    let error = harvest_for(&mock_server)
        .clients()
        .create(&mut client)
        .await
        .unwrap_err();

    assert_eq!(error.message(), Some("Name has already been taken"));
    assert_eq!(client.id, 0);
}

#[tokio::test]
async fn test_update_puts_envelope_to_member_path() {
    let mock_server = MockServer::start().await;

    Mock::given(method("PUT"))
        .and(path("/people/7"))
        .and(body_partial_json(json!({"user": {"id": 7, "email": "new@example.com"}})))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&mock_server)
        .await;

    let user = User {
        id: 7,
        email: "new@example.com".to_string(),
        ..User::default()
    };
    harvest_for(&mock_server).users().update(&user).await.unwrap();
}

#[tokio::test]
async fn test_update_with_unexpected_success_status() {
    let mock_server = MockServer::start().await;

    Mock::given(method("PUT"))
        .and(path("/people/7"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&mock_server)
        .await;

    let user = User {
        id: 7,
        ..User::default()
    };
    let error = harvest_for(&mock_server).users().update(&user).await.unwrap_err();

    assert!(matches!(error, Error::UnexpectedStatus { status, .. } if status.as_u16() == 204));
}

#[tokio::test]
async fn test_delete_member() {
    let mock_server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/clients/3"))
        .and(body_partial_json(json!({"client": {"id": 3}})))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = Client {
        id: 3,
        ..Client::default()
    };
    harvest_for(&mock_server).clients().delete(&client).await.unwrap();
}

#[tokio::test]
async fn test_delete_not_found_carries_server_message() {
    let mock_server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/clients/3"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({"message": "Client gone"})))
        .mount(&mock_server)
        .await;

    let client = Client {
        id: 3,
        ..Client::default()
    };
    let error = harvest_for(&mock_server)
        .clients()
        .delete(&client)
        .await
        .unwrap_err();

    assert!(error.is_not_found());
    assert_eq!(error.message(), Some("Client gone"));
}

#[tokio::test]
async fn test_toggle_flips_active_state() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/people/7"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&mock_server)
        .await;

    let mut user = User {
        id: 7,
        is_active: true,
        ..User::default()
    };
    let active = harvest_for(&mock_server)
        .users()
        .toggle(&mut user)
        .await
        .unwrap();

    assert!(!active);
    assert!(!user.is_active);
}

#[tokio::test]
async fn test_toggle_rejected_keeps_state() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/projects/5"))
        .respond_with(
            ResponseTemplate::new(400)
                .set_body_json(json!({"message": "Project has unbilled hours"})),
        )
        .mount(&mock_server)
        .await;

    let mut project = Project {
        id: 5,
        active: true,
        ..Project::default()
    };
    let error = harvest_for(&mock_server)
        .projects()
        .toggle(&mut project)
        .await
        .unwrap_err();

    assert_eq!(error.to_string(), "Project has unbilled hours");
    assert!(project.active);
}

#[tokio::test]
async fn test_rate_limit_is_classified_and_not_retried() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/projects"))
        .respond_with(
            ResponseTemplate::new(429)
                .insert_header("retry-after", "30")
                .set_body_json(json!({"message": "Too many requests"})),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let error = harvest_for(&mock_server)
        .projects()
        .all(None)
        .await
        .unwrap_err();

    assert!(error.is_rate_limit_reached());
    assert!(error.is_retryable());
    assert_eq!(error.retry_after(), Some(Duration::from_secs(30)));
    assert_eq!(error.message(), Some("Too many requests"));
}

#[tokio::test]
async fn test_throttled_503_on_find() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/tasks/1"))
        .respond_with(
            ResponseTemplate::new(503)
                .insert_header("retry-after", "5")
                .set_body_string("Throttled"),
        )
        .mount(&mock_server)
        .await;

    let error = harvest_for(&mock_server)
        .tasks()
        .find(1, None)
        .await
        .unwrap_err();

    assert!(error.is_rate_limit_reached());
    assert_eq!(error.retry_after(), Some(Duration::from_secs(5)));
    assert_eq!(error.message(), Some("Rate limit reached"));
}

#[tokio::test]
async fn test_default_headers_are_sent() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/tasks"))
        .and(header("authorization", "Basic dXNlcjpwYXNz"))
        .and(header("user-agent", "harvest-tests"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let api = Api::builder()
        .base_url(mock_server.uri())
        .unwrap()
        .basic_auth("user", "pass")
        .unwrap()
        .default_header("User-Agent", "harvest-tests")
        .unwrap()
        .build()
        .unwrap();

    let tasks = Harvest::new(api).tasks().all(None).await.unwrap();
    assert!(tasks.is_empty());
}

#[tokio::test]
async fn test_timeout_is_reported() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/tasks"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([]))
                .set_delay(Duration::from_millis(500)),
        )
        .mount(&mock_server)
        .await;

    let api = Api::builder()
        .base_url(mock_server.uri())
        .unwrap()
        .timeout(Duration::from_millis(50))
        .build()
        .unwrap();

    let result = Harvest::new(api).tasks().all(None).await;
    assert!(matches!(result, Err(Error::Timeout)), "got {:?}", result);
}

#[tokio::test]
async fn test_connection_failure_is_network_error() {
    let api = Api::builder()
        .base_url("http://127.0.0.1:1")
        .unwrap()
        .build()
        .unwrap();

    let result = Harvest::new(api).users().find(1, None).await;
    assert!(matches!(result, Err(Error::Network(_))), "got {:?}", result);
}

#[tokio::test]
async fn test_account_decodes_plain_body() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/account/who_am_i"))
        .and(header("accept", "application/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "company": {
                "base_uri": "https://acme.harvestapp.com",
                "full_domain": "acme.harvestapp.com",
                "name": "Acme",
                "active": true,
                "time_format": "hours_minutes",
                "modules": {"expenses": true, "invoices": true}
            },
            "user": {"id": 7, "email": "ada@example.com", "is_admin": true}
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let account = harvest_for(&mock_server).account().await.unwrap();

    let company = account.company.unwrap();
    assert_eq!(company.full_domain, "acme.harvestapp.com");
    assert_eq!(company.time_format.as_deref(), Some("hours_minutes"));
    assert!(company.modules.unwrap().expenses);
    assert_eq!(account.user.unwrap().email, "ada@example.com");
}

#[tokio::test]
async fn test_account_failure_is_classified() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/account/who_am_i"))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({"message": "Not authorized"})),
        )
        .mount(&mock_server)
        .await;

    let error = harvest_for(&mock_server).account().await.unwrap_err();

    assert!(matches!(error, Error::ResponseError { .. }), "got {:?}", error);
    assert_eq!(error.message(), Some("Not authorized"));
}

#[tokio::test]
async fn test_task_assignments_are_scoped_to_project() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/projects/3/task_assignments"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"task-assignment": {"id": 1, "task-id": 14, "project-id": 3, "billable": true}},
            {"task-assignment": {"id": 2, "task-id": 15, "project-id": 3, "deactivated": true}},
        ])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let assignments = harvest_for(&mock_server)
        .task_assignments(3)
        .all(None)
        .await
        .unwrap();

    assert_eq!(assignments.len(), 2);
    assert_eq!(assignments[0].task_id, 14);
    assert!(assignments[0].billable);
    assert!(assignments[1].deactivated);
}
