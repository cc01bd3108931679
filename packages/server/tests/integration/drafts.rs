use serde_json::json;

use crate::common::{TestApp, routes};

#[tokio::test]
async fn draft_requires_a_token() {
    let app = TestApp::spawn().await;

    let res = app.get_without_token(routes::DRAFT).await;

    assert_eq!(res.status, 401);
    assert_eq!(res.code(), "TOKEN_MISSING");
}

#[tokio::test]
async fn draft_starts_empty() {
    let app = TestApp::spawn().await;
    let (_, token) = app.provision_user("user_2blank", "blank@example.com").await;

    let res = app.get_with_token(routes::DRAFT, &token).await;

    assert_eq!(res.status, 200);
    assert!(res.body["draft"].is_null());
}

#[tokio::test]
async fn save_then_fetch_round_trips() {
    let app = TestApp::spawn().await;
    let (_, token) = app.provision_user("user_2save", "save@example.com").await;

    let res = app
        .put_with_token(
            routes::DRAFT,
            &json!({
                "title": "Still thinking",
                "content": "About the trip.",
                "mood": "happy",
            }),
            &token,
        )
        .await;
    assert_eq!(res.status, 200, "save failed: {}", res.text);
    assert_eq!(res.body["title"], "Still thinking");

    let res = app.get_with_token(routes::DRAFT, &token).await;
    assert_eq!(res.status, 200);
    assert_eq!(res.body["draft"]["title"], "Still thinking");
    assert_eq!(res.body["draft"]["content"], "About the trip.");
    assert_eq!(res.body["draft"]["mood"], "happy");
}

#[tokio::test]
async fn a_second_save_replaces_the_whole_draft() {
    let app = TestApp::spawn().await;
    let (_, token) = app.provision_user("user_2replace", "replace@example.com").await;

    let res = app
        .put_with_token(
            routes::DRAFT,
            &json!({"title": "First version", "content": "Everything", "mood": "happy"}),
            &token,
        )
        .await;
    assert_eq!(res.status, 200);

    // Omitted fields clear their previous value.
    let res = app
        .put_with_token(routes::DRAFT, &json!({"content": "Only this"}), &token)
        .await;
    assert_eq!(res.status, 200);

    let res = app.get_with_token(routes::DRAFT, &token).await;
    assert!(res.body["draft"]["title"].is_null());
    assert_eq!(res.body["draft"]["content"], "Only this");
    assert!(res.body["draft"]["mood"].is_null());
}

#[tokio::test]
async fn draft_mood_is_not_validated_until_publish() {
    let app = TestApp::spawn().await;
    let (_, token) = app.provision_user("user_2scratch", "scratch@example.com").await;

    let res = app
        .put_with_token(routes::DRAFT, &json!({"mood": "contemplative"}), &token)
        .await;

    assert_eq!(res.status, 200);
    assert_eq!(res.body["mood"], "contemplative");
}

#[tokio::test]
async fn oversized_draft_content_is_rejected() {
    let app = TestApp::spawn().await;
    let (_, token) = app.provision_user("user_2big", "big@example.com").await;

    let res = app
        .put_with_token(
            routes::DRAFT,
            &json!({"content": "x".repeat(100_001)}),
            &token,
        )
        .await;

    assert_eq!(res.status, 400);
    assert_eq!(res.code(), "VALIDATION_ERROR");
}

#[tokio::test]
async fn drafts_are_per_user() {
    let app = TestApp::spawn().await;
    let (_, alice) = app.provision_user("user_2ad", "ad@example.com").await;
    let (_, bob) = app.provision_user("user_2bd", "bd@example.com").await;

    let res = app
        .put_with_token(routes::DRAFT, &json!({"title": "Alice's draft"}), &alice)
        .await;
    assert_eq!(res.status, 200);

    let res = app.get_with_token(routes::DRAFT, &bob).await;
    assert!(res.body["draft"].is_null());
}
