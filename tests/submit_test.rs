//! Submission protocol tests against a mock scheduler

mod common;

use common::{
    CountingGranter, OneShotGranter, REFUSED_URL, RecordingProgress, RejectingGranter, batch_form,
    mock_config,
};
use mockito::Matcher;
use skr_client::auth::ApiKeyCredentials;
use skr_client::error::Error;
use skr_client::submit::{BROWSER_USER_AGENT, SubmissionClient, SubmissionState};
use skr_client::types::ServiceTarget;
use std::sync::{Arc, Mutex};

#[tokio::test]
async fn test_redirect_reposts_identical_request_once() {
    let mut server = mockito::Server::new_async().await;
    let bodies = Arc::new(Mutex::new(Vec::<Vec<u8>>::new()));

    let first = Arc::clone(&bodies);
    let redirect = server
        .mock("POST", "/batch")
        .match_query(Matcher::UrlEncoded("ticket".into(), "ST-1".into()))
        .with_status(302)
        .with_body_from_request(move |req| {
            first
                .lock()
                .unwrap()
                .push(req.body().map(Clone::clone).unwrap_or_default());
            Vec::new()
        })
        .expect(1)
        .create_async()
        .await;

    let second = Arc::clone(&bodies);
    let ok = server
        .mock("POST", "/batch")
        .match_query(Matcher::UrlEncoded("ticket".into(), "ST-1".into()))
        .with_status(200)
        .with_body_from_request(move |req| {
            second
                .lock()
                .unwrap()
                .push(req.body().map(Clone::clone).unwrap_or_default());
            b"result\n".to_vec()
        })
        .expect(1)
        .create_async()
        .await;

    let granter = CountingGranter::new();
    let config = mock_config(&server.url(), 3600);
    let mut client = SubmissionClient::with_granter(
        config,
        ServiceTarget::BatchValidation,
        &ApiKeyCredentials::new("test-key"),
        Box::new(granter.clone()),
    )
    .await
    .unwrap();

    let result = client
        .submit(&batch_form(Some("me@example.org")))
        .await
        .unwrap();

    assert_eq!(result, "result\n");
    redirect.assert_async().await;
    ok.assert_async().await;

    let bodies = bodies.lock().unwrap();
    assert_eq!(bodies.len(), 2);
    assert_eq!(bodies[0], bodies[1]);
    assert!(String::from_utf8_lossy(&bodies[0]).contains("me@example.org"));
    assert_eq!(granter.calls(), 1);
}

#[tokio::test]
async fn test_sentinel_lines_are_removed() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/batch")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body("NOT DONE LOOP\nline1\nNOT DONE LOOP 2\nline2")
        .create_async()
        .await;

    let mut client = SubmissionClient::with_granter(
        mock_config(&server.url(), 0),
        ServiceTarget::BatchValidation,
        &ApiKeyCredentials::new("test-key"),
        Box::new(CountingGranter::new()),
    )
    .await
    .unwrap();

    let result = client
        .submit(&batch_form(Some("me@example.org")))
        .await
        .unwrap();

    assert_eq!(result, "line1\nline2\n");
    mock.assert_async().await;
}

#[tokio::test]
async fn test_zero_timeout_refreshes_ticket_every_submission() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/batch")
        .match_query(Matcher::Any)
        .with_body("ok\n")
        .expect(2)
        .create_async()
        .await;

    let granter = CountingGranter::new();
    let mut client = SubmissionClient::with_granter(
        mock_config(&server.url(), 0),
        ServiceTarget::BatchValidation,
        &ApiKeyCredentials::new("test-key"),
        Box::new(granter.clone()),
    )
    .await
    .unwrap();
    assert_eq!(granter.calls(), 1);

    let form = batch_form(Some("me@example.org"));
    client.submit(&form).await.unwrap();
    client.submit(&form).await.unwrap();

    assert_eq!(granter.calls(), 3);
    mock.assert_async().await;
}

#[tokio::test]
async fn test_ticket_reused_within_timeout() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/mti")
        .match_query(Matcher::UrlEncoded("ticket".into(), "ST-1".into()))
        .with_body("ok\n")
        .expect(2)
        .create_async()
        .await;

    let granter = CountingGranter::new();
    let mut client = SubmissionClient::with_granter(
        mock_config(&server.url(), 3600),
        ServiceTarget::InteractiveMti,
        &ApiKeyCredentials::new("test-key"),
        Box::new(granter.clone()),
    )
    .await
    .unwrap();
    assert!(client.service_url().ends_with("/mti"));

    let form = batch_form(Some("me@example.org"));
    client.submit(&form).await.unwrap();
    client.submit(&form).await.unwrap();

    assert_eq!(granter.calls(), 1);
    mock.assert_async().await;
}

#[tokio::test]
async fn test_missing_email_fails_without_network() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/batch")
        .match_query(Matcher::Any)
        .expect(0)
        .create_async()
        .await;

    let granter = CountingGranter::new();
    let progress = RecordingProgress::default();
    let mut client = SubmissionClient::with_granter(
        mock_config(&server.url(), 0),
        ServiceTarget::BatchValidation,
        &ApiKeyCredentials::new("test-key"),
        Box::new(granter.clone()),
    )
    .await
    .unwrap()
    .with_progress(Box::new(progress.clone()));

    let err = client.submit(&batch_form(None)).await.unwrap_err();

    assert!(matches!(err, Error::Validation(_)));
    assert_eq!(granter.calls(), 1);
    assert_eq!(client.last_state(), SubmissionState::Failed);
    assert_eq!(progress.errors(), 1);
    mock.assert_async().await;
}

#[tokio::test]
async fn test_placeholder_email_rejected() {
    let server = mockito::Server::new_async().await;
    let mut client = SubmissionClient::with_granter(
        mock_config(&server.url(), 0),
        ServiceTarget::BatchValidation,
        &ApiKeyCredentials::new("test-key"),
        Box::new(CountingGranter::new()),
    )
    .await
    .unwrap();

    let err = client
        .submit(&batch_form(Some("youraddress@goeshere")))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Validation(_)));
}

#[tokio::test]
async fn test_request_headers() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/batch")
        .match_query(Matcher::Any)
        .match_header("user-agent", BROWSER_USER_AGENT)
        .match_header(
            "content-type",
            Matcher::Regex("^multipart/form-data; boundary=".to_string()),
        )
        .match_body(Matcher::Regex("name=\"RUN_PROG\"".to_string()))
        .with_body("ok\n")
        .create_async()
        .await;

    let mut client = SubmissionClient::with_granter(
        mock_config(&server.url(), 0),
        ServiceTarget::BatchValidation,
        &ApiKeyCredentials::new("test-key"),
        Box::new(CountingGranter::new()),
    )
    .await
    .unwrap();

    client
        .submit(&batch_form(Some("me@example.org")))
        .await
        .unwrap();
    mock.assert_async().await;
}

#[tokio::test]
async fn test_progress_follows_redirect() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/batch")
        .match_query(Matcher::Any)
        .with_status(302)
        .expect(1)
        .create_async()
        .await;
    server
        .mock("POST", "/batch")
        .match_query(Matcher::Any)
        .with_body("done\n")
        .create_async()
        .await;

    let progress = RecordingProgress::default();
    let mut client = SubmissionClient::with_granter(
        mock_config(&server.url(), 0),
        ServiceTarget::BatchValidation,
        &ApiKeyCredentials::new("test-key"),
        Box::new(CountingGranter::new()),
    )
    .await
    .unwrap()
    .with_progress(Box::new(progress.clone()));

    client
        .submit(&batch_form(Some("me@example.org")))
        .await
        .unwrap();

    assert_eq!(
        progress.states(),
        vec![
            SubmissionState::Idle,
            SubmissionState::Validated,
            SubmissionState::TicketReady,
            SubmissionState::Posted,
            SubmissionState::RedirectRetried,
            SubmissionState::Completed,
        ]
    );
}

#[tokio::test]
async fn test_rejected_credential_fails_construction() {
    let server = mockito::Server::new_async().await;
    let result = SubmissionClient::with_granter(
        mock_config(&server.url(), 0),
        ServiceTarget::BatchValidation,
        &ApiKeyCredentials::new("test-key"),
        Box::new(RejectingGranter),
    )
    .await;

    assert!(matches!(result, Err(Error::Auth(_))));
}

#[tokio::test]
async fn test_second_redirect_is_not_retried() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/batch")
        .match_query(Matcher::Any)
        .with_status(302)
        .with_body("NOT DONE LOOP\nmoved")
        .expect(2)
        .create_async()
        .await;

    let mut client = SubmissionClient::with_granter(
        mock_config(&server.url(), 0),
        ServiceTarget::BatchValidation,
        &ApiKeyCredentials::new("test-key"),
        Box::new(CountingGranter::new()),
    )
    .await
    .unwrap();

    let result = client
        .submit(&batch_form(Some("me@example.org")))
        .await
        .unwrap();

    assert_eq!(result, "moved\n");
    assert_eq!(client.last_state(), SubmissionState::Completed);
    mock.assert_async().await;
}

#[tokio::test]
async fn test_connection_failure_is_transport_error() {
    let progress = RecordingProgress::default();
    let mut client = SubmissionClient::with_granter(
        mock_config(REFUSED_URL, 0),
        ServiceTarget::BatchValidation,
        &ApiKeyCredentials::new("test-key"),
        Box::new(CountingGranter::new()),
    )
    .await
    .unwrap()
    .with_progress(Box::new(progress.clone()));

    let err = client
        .submit(&batch_form(Some("me@example.org")))
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Transport(_)));
    assert_eq!(client.last_state(), SubmissionState::Failed);
    assert_eq!(progress.errors(), 1);
}

#[tokio::test]
async fn test_transport_error_hides_ticket() {
    let mut client = SubmissionClient::with_granter(
        mock_config(REFUSED_URL, 0),
        ServiceTarget::BatchValidation,
        &ApiKeyCredentials::new("test-key"),
        Box::new(CountingGranter::new()),
    )
    .await
    .unwrap();

    let err = client
        .submit(&batch_form(Some("me@example.org")))
        .await
        .unwrap_err();

    let text = err.to_string();
    assert!(!text.contains("ticket="), "{text}");
    assert!(!text.contains("ST-"), "{text}");
}

#[tokio::test]
async fn test_ticket_refresh_failure_skips_post() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/batch")
        .match_query(Matcher::Any)
        .expect(0)
        .create_async()
        .await;

    let granter = OneShotGranter::default();
    let mut client = SubmissionClient::with_granter(
        mock_config(&server.url(), 0),
        ServiceTarget::BatchValidation,
        &ApiKeyCredentials::new("test-key"),
        Box::new(granter.clone()),
    )
    .await
    .unwrap();

    let err = client
        .submit(&batch_form(Some("me@example.org")))
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Auth(_)));
    assert_eq!(client.last_state(), SubmissionState::Failed);
    assert_eq!(granter.calls(), 2);
    mock.assert_async().await;
}
