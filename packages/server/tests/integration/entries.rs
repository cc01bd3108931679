use serde_json::json;

use crate::common::{TestApp, TestAppConfig, routes};

/// Minimal valid publish payload.
fn entry_body(title: &str, mood: &str) -> serde_json::Value {
    json!({
        "title": title,
        "content": "Wrote some thoughts down.",
        "mood": mood,
    })
}

#[tokio::test]
async fn publishing_requires_a_token() {
    let app = TestApp::spawn().await;

    let res = app
        .post_without_token(routes::ENTRIES, &entry_body("No auth", "happy"))
        .await;
    assert_eq!(res.status, 401);
    assert_eq!(res.code(), "TOKEN_MISSING");

    let res = app
        .post_with_token(routes::ENTRIES, &entry_body("Bad auth", "happy"), "garbage")
        .await;
    assert_eq!(res.status, 401);
    assert_eq!(res.code(), "TOKEN_INVALID");
}

#[tokio::test]
async fn publish_creates_the_entry() {
    let app = TestApp::spawn().await;
    let (user_id, token) = app.provision_user("user_2pub", "pub@example.com").await;

    let res = app
        .post_with_token(routes::ENTRIES, &entry_body("A good day", "HAPPY"), &token)
        .await;

    assert_eq!(res.status, 201, "publish failed: {}", res.text);
    assert_eq!(res.body["title"], "A good day");
    assert_eq!(res.body["mood"], "happy");
    assert_eq!(res.body["mood_score"], 8);
    assert_eq!(
        res.body["mood_image_url"],
        "https://cdn.example.com/img/sunny.jpg"
    );
    assert_eq!(res.body["user_id"], user_id);
    assert!(res.body["collection_id"].is_null());
    assert!(res.body["created_at"].is_string());
}

#[tokio::test]
async fn mood_keys_are_matched_case_insensitively() {
    let app = TestApp::spawn().await;
    let (_, token) = app.provision_user("user_2case", "case@example.com").await;

    let res = app
        .post_with_token(routes::ENTRIES, &entry_body("Odd casing", "oVeRjOyEd"), &token)
        .await;

    assert_eq!(res.status, 201);
    assert_eq!(res.body["mood"], "overjoyed");
    assert_eq!(res.body["mood_score"], 10);
}

#[tokio::test]
async fn unknown_mood_is_rejected_with_the_catalog() {
    let app = TestApp::spawn().await;
    let (_, token) = app.provision_user("user_2mood", "mood@example.com").await;

    let res = app
        .post_with_token(routes::ENTRIES, &entry_body("Hmm", "grumpy"), &token)
        .await;

    assert_eq!(res.status, 400);
    assert_eq!(res.code(), "INVALID_MOOD");
    let message = res.body["message"].as_str().unwrap();
    assert!(message.contains("grumpy"));
    assert!(message.contains("overjoyed, happy, neutral, sad, angry"));
}

#[tokio::test]
async fn valid_token_without_an_account_is_not_found() {
    let app = TestApp::spawn().await;
    let token = app.token_for("user_2ghost");

    let res = app
        .post_with_token(routes::ENTRIES, &entry_body("Phantom", "happy"), &token)
        .await;

    assert_eq!(res.status, 404);
    assert_eq!(res.code(), "USER_NOT_FOUND");
}

#[tokio::test]
async fn empty_title_is_rejected() {
    let app = TestApp::spawn().await;
    let (_, token) = app.provision_user("user_2val", "val@example.com").await;

    let res = app
        .post_with_token(routes::ENTRIES, &entry_body("   ", "happy"), &token)
        .await;

    assert_eq!(res.status, 400);
    assert_eq!(res.code(), "VALIDATION_ERROR");
}

#[tokio::test]
async fn entry_is_published_without_an_image_when_the_lookup_is_empty() {
    let app = TestApp::spawn_with(TestAppConfig {
        image_url: None,
        ..Default::default()
    })
    .await;
    let (_, token) = app.provision_user("user_2noimg", "noimg@example.com").await;

    let res = app
        .post_with_token(routes::ENTRIES, &entry_body("No picture", "sad"), &token)
        .await;

    assert_eq!(res.status, 201);
    assert!(res.body["mood_image_url"].is_null());
}

#[tokio::test]
async fn rate_limit_kicks_in_after_capacity() {
    let app = TestApp::spawn_with(TestAppConfig {
        protection_capacity: 2,
        ..Default::default()
    })
    .await;
    let (_, token) = app.provision_user("user_2rl", "rl@example.com").await;

    for i in 0..2 {
        let res = app
            .post_with_token(routes::ENTRIES, &entry_body(&format!("ok {i}"), "happy"), &token)
            .await;
        assert_eq!(res.status, 201);
    }

    let res = app
        .post_with_token(routes::ENTRIES, &entry_body("one too many", "happy"), &token)
        .await;
    assert_eq!(res.status, 429);
    assert_eq!(res.code(), "RATE_LIMITED");
    assert!(res.retry_after.is_some_and(|s| s > 0));

    // The denied publish left no row behind.
    let list = app.get_with_token(routes::ENTRIES, &token).await;
    assert_eq!(list.body["pagination"]["total"], 2);
}

#[tokio::test]
async fn rate_limit_is_per_user() {
    let app = TestApp::spawn_with(TestAppConfig {
        protection_capacity: 1,
        ..Default::default()
    })
    .await;
    let (_, first) = app.provision_user("user_2one", "one@example.com").await;
    let (_, second) = app.provision_user("user_2two", "two@example.com").await;

    let res = app
        .post_with_token(routes::ENTRIES, &entry_body("mine", "happy"), &first)
        .await;
    assert_eq!(res.status, 201);
    let res = app
        .post_with_token(routes::ENTRIES, &entry_body("blocked", "happy"), &first)
        .await;
    assert_eq!(res.status, 429);

    // A different subject still has a full bucket.
    let res = app
        .post_with_token(routes::ENTRIES, &entry_body("theirs", "happy"), &second)
        .await;
    assert_eq!(res.status, 201);
}

#[tokio::test]
async fn automated_user_agents_are_blocked() {
    let app = TestApp::spawn().await;
    let (_, token) = app.provision_user("user_2bot", "bot@example.com").await;
    let res = app
        .put_with_token(
            routes::DRAFT,
            &json!({"title": "wip", "content": "still here", "mood": "neutral"}),
            &token,
        )
        .await;
    assert_eq!(res.status, 200);

    let res = app
        .post_with_token_and_ua(
            routes::ENTRIES,
            &entry_body("scripted", "happy"),
            &token,
            "curl/8.4.0",
        )
        .await;

    assert_eq!(res.status, 403);
    assert_eq!(res.code(), "REQUEST_BLOCKED");

    // Nothing was written and the draft survived.
    let list = app.get_with_token(routes::ENTRIES, &token).await;
    assert_eq!(list.body["pagination"]["total"], 0);
    let res = app.get_with_token(routes::DRAFT, &token).await;
    assert_eq!(res.body["draft"]["title"], "wip");
}

#[tokio::test]
async fn automation_screen_can_be_disabled() {
    let app = TestApp::spawn_with(TestAppConfig {
        block_automated: false,
        ..Default::default()
    })
    .await;
    let (_, token) = app.provision_user("user_2cli", "cli@example.com").await;

    let res = app
        .post_with_token_and_ua(
            routes::ENTRIES,
            &entry_body("scripted but fine", "happy"),
            &token,
            "curl/8.4.0",
        )
        .await;

    assert_eq!(res.status, 201);
}

#[tokio::test]
async fn publishing_clears_the_saved_draft() {
    let app = TestApp::spawn().await;
    let (_, token) = app.provision_user("user_2draft", "draft@example.com").await;

    let res = app
        .put_with_token(
            routes::DRAFT,
            &json!({"title": "wip", "content": "half done", "mood": "neutral"}),
            &token,
        )
        .await;
    assert_eq!(res.status, 200);

    let res = app
        .post_with_token(routes::ENTRIES, &entry_body("Done at last", "happy"), &token)
        .await;
    assert_eq!(res.status, 201);

    let res = app.get_with_token(routes::DRAFT, &token).await;
    assert_eq!(res.status, 200);
    assert!(res.body["draft"].is_null(), "draft survived: {}", res.text);
}

#[tokio::test]
async fn list_is_newest_first_and_paginated() {
    let app = TestApp::spawn().await;
    let (_, token) = app.provision_user("user_2list", "list@example.com").await;

    app.create_entry(&token, "first", "happy").await;
    app.create_entry(&token, "second", "neutral").await;
    app.create_entry(&token, "third", "sad").await;

    let res = app
        .get_with_token(&format!("{}?per_page=2", routes::ENTRIES), &token)
        .await;
    assert_eq!(res.status, 200);
    assert_eq!(res.body["data"].as_array().unwrap().len(), 2);
    assert_eq!(res.body["data"][0]["title"], "third");
    assert_eq!(res.body["data"][1]["title"], "second");
    assert_eq!(res.body["pagination"]["total"], 3);
    assert_eq!(res.body["pagination"]["total_pages"], 2);

    let res = app
        .get_with_token(&format!("{}?per_page=2&page=2", routes::ENTRIES), &token)
        .await;
    assert_eq!(res.body["data"].as_array().unwrap().len(), 1);
    assert_eq!(res.body["data"][0]["title"], "first");
}

#[tokio::test]
async fn list_filters_by_collection_and_unfiled() {
    let app = TestApp::spawn().await;
    let (_, token) = app.provision_user("user_2filter", "filter@example.com").await;
    let collection_id = app.create_collection(&token, "Travel").await;

    let res = app
        .post_with_token(
            routes::ENTRIES,
            &json!({
                "title": "Filed",
                "content": "In the collection.",
                "mood": "happy",
                "collection_id": collection_id,
            }),
            &token,
        )
        .await;
    assert_eq!(res.status, 201);
    app.create_entry(&token, "Loose", "neutral").await;

    let res = app
        .get_with_token(&routes::entries_in_collection(collection_id), &token)
        .await;
    assert_eq!(res.body["pagination"]["total"], 1);
    assert_eq!(res.body["data"][0]["title"], "Filed");

    let res = app
        .get_with_token(&format!("{}?unfiled=true", routes::ENTRIES), &token)
        .await;
    assert_eq!(res.body["pagination"]["total"], 1);
    assert_eq!(res.body["data"][0]["title"], "Loose");
}

#[tokio::test]
async fn unfiled_filter_is_ignored_when_a_collection_is_given() {
    let app = TestApp::spawn().await;
    let (_, token) = app.provision_user("user_2both", "both@example.com").await;
    let collection_id = app.create_collection(&token, "Either way").await;

    let res = app
        .post_with_token(
            routes::ENTRIES,
            &json!({
                "title": "Filed",
                "content": "text",
                "mood": "happy",
                "collection_id": collection_id,
            }),
            &token,
        )
        .await;
    assert_eq!(res.status, 201);

    let res = app
        .get_with_token(
            &format!(
                "{}?collection_id={collection_id}&unfiled=true",
                routes::ENTRIES
            ),
            &token,
        )
        .await;
    assert_eq!(res.body["pagination"]["total"], 1);
}

#[tokio::test]
async fn filing_into_a_foreign_collection_is_not_found() {
    let app = TestApp::spawn().await;
    let (_, owner) = app.provision_user("user_2owner", "owner@example.com").await;
    let (_, intruder) = app
        .provision_user("user_2intruder", "intruder@example.com")
        .await;
    let collection_id = app.create_collection(&owner, "Private").await;

    let res = app
        .post_with_token(
            routes::ENTRIES,
            &json!({
                "title": "Sneaky",
                "content": "Should not land here.",
                "mood": "happy",
                "collection_id": collection_id,
            }),
            &intruder,
        )
        .await;

    assert_eq!(res.status, 404);
    assert_eq!(res.code(), "NOT_FOUND");
}

#[tokio::test]
async fn entries_are_hidden_across_users() {
    let app = TestApp::spawn().await;
    let (_, alice) = app.provision_user("user_2alice", "alice@example.com").await;
    let (_, bob) = app.provision_user("user_2bob", "bob@example.com").await;
    let id = app.create_entry(&alice, "Alice's day", "happy").await;

    let res = app.get_with_token(&routes::entry(id), &bob).await;
    assert_eq!(res.status, 404);
    assert_eq!(res.code(), "NOT_FOUND");

    let res = app
        .patch_with_token(&routes::entry(id), &json!({"title": "Bob's now"}), &bob)
        .await;
    assert_eq!(res.status, 404);

    let res = app.delete_with_token(&routes::entry(id), &bob).await;
    assert_eq!(res.status, 404);

    // Untouched for the owner.
    let res = app.get_with_token(&routes::entry(id), &alice).await;
    assert_eq!(res.status, 200);
    assert_eq!(res.body["title"], "Alice's day");
}

#[tokio::test]
async fn update_edits_fields_in_place() {
    let app = TestApp::spawn().await;
    let (_, token) = app.provision_user("user_2edit", "edit@example.com").await;
    let id = app.create_entry(&token, "Draft thoughts", "happy").await;

    let res = app
        .patch_with_token(
            &routes::entry(id),
            &json!({"title": "Final thoughts", "content": "Polished."}),
            &token,
        )
        .await;
    assert_eq!(res.status, 200);
    assert_eq!(res.body["title"], "Final thoughts");
    assert_eq!(res.body["content"], "Polished.");
    assert_eq!(res.body["mood"], "happy");

    // Mood change without search terms keeps the stored image.
    let res = app
        .patch_with_token(&routes::entry(id), &json!({"mood": "SAD"}), &token)
        .await;
    assert_eq!(res.status, 200);
    assert_eq!(res.body["mood"], "sad");
    assert_eq!(res.body["mood_score"], 3);
    assert_eq!(
        res.body["mood_image_url"],
        "https://cdn.example.com/img/sunny.jpg"
    );
}

#[tokio::test]
async fn update_moves_entries_between_collections() {
    let app = TestApp::spawn().await;
    let (_, token) = app.provision_user("user_2move", "move@example.com").await;
    let collection_id = app.create_collection(&token, "Filed").await;
    let id = app.create_entry(&token, "Wandering", "neutral").await;

    let res = app
        .patch_with_token(
            &routes::entry(id),
            &json!({"collection_id": collection_id}),
            &token,
        )
        .await;
    assert_eq!(res.status, 200);
    assert_eq!(res.body["collection_id"], collection_id);

    // Explicit null unfiles again.
    let res = app
        .patch_with_token(&routes::entry(id), &json!({"collection_id": null}), &token)
        .await;
    assert_eq!(res.status, 200);
    assert!(res.body["collection_id"].is_null());
}

#[tokio::test]
async fn update_with_no_fields_is_rejected() {
    let app = TestApp::spawn().await;
    let (_, token) = app.provision_user("user_2empty", "empty@example.com").await;
    let id = app.create_entry(&token, "Unchanged", "happy").await;

    let res = app.patch_with_token(&routes::entry(id), &json!({}), &token).await;

    assert_eq!(res.status, 400);
    assert_eq!(res.code(), "VALIDATION_ERROR");
}

#[tokio::test]
async fn delete_removes_the_entry() {
    let app = TestApp::spawn().await;
    let (_, token) = app.provision_user("user_2del", "del@example.com").await;
    let id = app.create_entry(&token, "Ephemeral", "neutral").await;

    let res = app.delete_with_token(&routes::entry(id), &token).await;
    assert_eq!(res.status, 204);

    let res = app.get_with_token(&routes::entry(id), &token).await;
    assert_eq!(res.status, 404);

    let res = app.delete_with_token(&routes::entry(id), &token).await;
    assert_eq!(res.status, 404);
}
