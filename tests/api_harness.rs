#![allow(unused)]
//! HTTP API integration harness.
//!
//! # What this covers
//!
//! Every request goes through the real router via
//! `tower::ServiceExt::oneshot`, backed by the in-memory repositories.
//!
//! - **Search endpoints**: blank `q` and malformed coordinates answer
//!   `200 []`; hits are capped and projected.
//! - **Stores**: creation needs a session, slugs de-duplicate, only the
//!   author may edit, updates keep `location.type = "Point"`.
//! - **Tags and hearts**: counts, filtering, toggle semantics.
//! - **Reviews**: validation, store pages listing reviews, the top stores
//!   ranking.
//! - **Accounts**: register, login, logout and the full password reset
//!   flow including expiry of a used token.
//! - **Photos**: non-images are refused, wide images are scaled down and
//!   served from `/uploads`.
//!
//! # Running
//!
//! ```sh
//! cargo test --test api_harness
//! ```

mod common;
use common::*;

use axum::{body::Body, http::StatusCode};
use pretty_assertions::assert_eq;
use serde_json::json;

// ---------------------------------------------------------------------------
// Search endpoints
// ---------------------------------------------------------------------------

#[tokio::test]
async fn blank_query_answers_empty_list() {
    let app = TestApp::new();
    for uri in ["/api/search", "/api/search?q=", "/api/search?q=%20%20"] {
        let (status, body) = app.get(uri, None).await;
        assert_eq!(status, StatusCode::OK, "{uri}");
        assert_eq!(body, json!([]), "{uri}");
    }
}

#[tokio::test]
async fn text_search_is_capped_and_ranked() {
    let app = TestApp::new();
    let (token, _) = app.register("Wes", "wes@example.com").await;
    for draft in coffee_drafts() {
        app.create_store(&token, &draft).await;
    }

    let (status, body) = app.get("/api/search?q=coffee", None).await;
    assert_eq!(status, StatusCode::OK);
    let results: Vec<delicious_core::SearchResult> = serde_json::from_value(body).unwrap();
    assert_eq!(results.len(), 5);
    assert_descending_scores!(results);
    assert_eq!(results[0].slug, "shop-7");
}

#[tokio::test]
async fn malformed_coordinates_answer_empty_list() {
    let app = TestApp::new();
    let (token, _) = app.register("Wes", "wes@example.com").await;
    app.create_store(&token, &StoreDraftBuilder::new("Origin Cafe").build())
        .await;

    for uri in [
        "/api/stores/near",
        "/api/stores/near?lng=0",
        "/api/stores/near?lng=abc&lat=0",
        "/api/stores/near?lng=NaN&lat=0",
        "/api/stores/near?lng=0&lat=95",
        "/stores/within?lng=&lat=",
    ] {
        let (status, body) = app.get(uri, None).await;
        assert_eq!(status, StatusCode::OK, "{uri}");
        assert_eq!(body, json!([]), "{uri}");
    }

    let (status, body) = app.get("/stores/within?lng=0&lat=0", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 1);
    assert_keys!(body[0], ["slug", "name", "description", "location", "photo"]);
}

// ---------------------------------------------------------------------------
// Stores
// ---------------------------------------------------------------------------

#[tokio::test]
async fn creating_a_store_needs_a_session() {
    let app = TestApp::new();
    let draft = serde_json::to_value(StoreDraftBuilder::new("Nope").build()).unwrap();

    let (status, body) = app.post_json("/stores", None, draft.clone()).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "You must be logged in to do that!");

    let (status, _) = app.post_json("/stores", Some("made-up"), draft).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn invalid_drafts_are_rejected() {
    let app = TestApp::new();
    let (token, _) = app.register("Wes", "wes@example.com").await;

    let no_name = serde_json::to_value(StoreDraftBuilder::new("  ").build()).unwrap();
    let (status, body) = app.post_json("/stores", Some(&token), no_name).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Please enter a store name!");

    let no_address =
        serde_json::to_value(StoreDraftBuilder::new("Somewhere").address("").build()).unwrap();
    let (status, _) = app.post_json("/stores", Some(&token), no_address).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn duplicate_names_get_numbered_slugs() {
    let app = TestApp::new();
    let (token, _) = app.register("Wes", "wes@example.com").await;
    let draft = StoreDraftBuilder::new("Taco Stand").build();

    let first = app.create_store(&token, &draft).await;
    let second = app.create_store(&token, &draft).await;
    assert_eq!(first["slug"], "taco-stand");
    assert_eq!(second["slug"], "taco-stand-2");

    let (status, body) = app.get("/store/taco-stand-2", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], second["id"]);

    let (status, _) = app.get("/store/nope", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn numbered_names_and_renames_keep_slugs_unique() {
    let app = TestApp::new();
    let (token, _) = app.register("Wes", "wes@example.com").await;

    let numbered = app.create_store(&token, &StoreDraftBuilder::new("Cafe 2").build()).await;
    let plain = app.create_store(&token, &StoreDraftBuilder::new("Cafe").build()).await;
    let third = app.create_store(&token, &StoreDraftBuilder::new("Cafe").build()).await;
    assert_eq!(numbered["slug"], "cafe-2");
    assert_eq!(plain["slug"], "cafe");
    assert_eq!(third["slug"], "cafe-3");

    let (_, body) = app.get("/store/cafe-2", None).await;
    assert_eq!(body["id"], numbered["id"]);
}

#[tokio::test]
async fn created_stores_are_points() {
    let app = TestApp::new();
    let (token, _) = app.register("Wes", "wes@example.com").await;
    let mut draft = serde_json::to_value(StoreDraftBuilder::new("Shape").build()).unwrap();
    draft["location"]["type"] = json!("Polygon");

    let (status, body) = app.post_json("/stores", Some(&token), draft).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["location"]["type"], "Point");
}

#[tokio::test]
async fn only_the_author_may_edit() {
    let app = TestApp::new();
    let (owner, _) = app.register("Owner", "owner@example.com").await;
    let (other, _) = app.register("Other", "other@example.com").await;
    let store = app
        .create_store(&owner, &StoreDraftBuilder::new("Mine").build())
        .await;
    let id = store["id"].as_str().unwrap();

    let (status, body) = app.get(&format!("/stores/{id}/edit"), Some(&other)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "You must own a store in order to edit it!");

    let update = serde_json::to_value(StoreDraftBuilder::new("Stolen").build()).unwrap();
    let (status, _) = app
        .post_json(&format!("/stores/{id}"), Some(&other), update)
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = app.get(&format!("/stores/{id}/edit"), Some(&owner)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Mine");
}

#[tokio::test]
async fn update_renames_and_keeps_point_geometry() {
    let app = TestApp::new();
    let (token, _) = app.register("Wes", "wes@example.com").await;
    let store = app
        .create_store(&token, &StoreDraftBuilder::new("Old Name").build())
        .await;
    let id = store["id"].as_str().unwrap();

    let mut update = serde_json::to_value(
        StoreDraftBuilder::new("New Name")
            .description("fresh")
            .tag("Wifi")
            .build(),
    )
    .unwrap();
    update["location"]["type"] = json!("Polygon");

    let (status, body) = app
        .post_json(&format!("/stores/{id}"), Some(&token), update)
        .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["slug"], "new-name");
    assert_eq!(body["location"]["type"], "Point");
    assert_eq!(body["tags"], json!(["Wifi"]));
}

// ---------------------------------------------------------------------------
// Tags and hearts
// ---------------------------------------------------------------------------

#[tokio::test]
async fn tags_are_counted_and_filter_stores() {
    let app = TestApp::new();
    let (token, _) = app.register("Wes", "wes@example.com").await;
    for (name, tags) in [
        ("A", vec!["Wifi", "Vegan"]),
        ("B", vec!["Wifi"]),
        ("C", vec!["Licensed"]),
    ] {
        let mut builder = StoreDraftBuilder::new(name);
        for tag in tags {
            builder = builder.tag(tag);
        }
        app.create_store(&token, &builder.build()).await;
    }

    let (status, body) = app.get("/tags", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["tags"][0], json!({ "tag": "Wifi", "count": 2 }));
    assert_eq!(body["stores"].as_array().unwrap().len(), 3);

    let (_, body) = app.get("/tags/Wifi", None).await;
    assert_eq!(body["tag"], "Wifi");
    let names: Vec<&str> = body["stores"]
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, ["A", "B"]);
}

#[tokio::test]
async fn hearts_toggle_and_list() {
    let app = TestApp::new();
    let (token, _) = app.register("Wes", "wes@example.com").await;
    let store = app
        .create_store(&token, &StoreDraftBuilder::new("Loved").build())
        .await;
    let id = store["id"].as_str().unwrap();
    let heart = format!("/api/stores/{id}/heart");

    let (status, user) = app.post_json(&heart, Some(&token), json!(null)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(user["hearts"], json!([id]));

    let (_, hearted) = app.get("/hearts", Some(&token)).await;
    assert_eq!(hearted[0]["slug"], "loved");

    let (_, user) = app.post_json(&heart, Some(&token), json!(null)).await;
    assert_eq!(user["hearts"], json!([]));

    let (status, _) = app.post_json(&heart, None, json!(null)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

// ---------------------------------------------------------------------------
// Reviews
// ---------------------------------------------------------------------------

#[tokio::test]
async fn reviews_show_on_store_page_and_rank_top_stores() {
    let app = TestApp::new();
    let (token, _) = app.register("Wes", "wes@example.com").await;
    let good = app.create_store(&token, &StoreDraftBuilder::new("Good").build()).await;
    let fine = app.create_store(&token, &StoreDraftBuilder::new("Fine").build()).await;
    let once = app.create_store(&token, &StoreDraftBuilder::new("Once").build()).await;

    for (store, rating) in [(&good, 5), (&good, 4), (&fine, 3), (&fine, 3), (&once, 5)] {
        let uri = format!("/reviews/{}", store["id"].as_str().unwrap());
        let (status, body) = app
            .post_json(&uri, Some(&token), json!({ "text": "Lovely", "rating": rating }))
            .await;
        assert_eq!(status, StatusCode::CREATED, "{body}");
    }

    let (status, page) = app.get("/store/good", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(page["id"], good["id"]);
    let ratings: Vec<u64> = page["reviews"]
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["rating"].as_u64().unwrap())
        .collect();
    assert_eq!(ratings, [4, 5]);

    let (status, top) = app.get("/top", None).await;
    assert_eq!(status, StatusCode::OK);
    let slugs: Vec<&str> = top
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["slug"].as_str().unwrap())
        .collect();
    assert_eq!(slugs, ["good", "fine"]);
    assert_eq!(top[0]["average_rating"], json!(4.5));
    assert_eq!(top[0]["review_count"], 2);
}

#[tokio::test]
async fn reviews_are_validated() {
    let app = TestApp::new();
    let (token, _) = app.register("Wes", "wes@example.com").await;
    let store = app.create_store(&token, &StoreDraftBuilder::new("Rated").build()).await;
    let uri = format!("/reviews/{}", store["id"].as_str().unwrap());

    let (status, _) = app.post_json(&uri, None, json!({ "text": "x", "rating": 3 })).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, body) = app
        .post_json(&uri, Some(&token), json!({ "text": "x", "rating": 9 }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Rating must be between 1 and 5!");

    let missing = format!("/reviews/{}", uuid::Uuid::new_v4());
    let (status, _) = app
        .post_json(&missing, Some(&token), json!({ "text": "x", "rating": 3 }))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

// ---------------------------------------------------------------------------
// Accounts
// ---------------------------------------------------------------------------

#[tokio::test]
async fn register_login_logout() {
    let app = TestApp::new();
    let (token, _) = app.register("Wes", "Wes@Example.com").await;

    let (status, body) = app
        .post_json(
            "/register",
            None,
            json!({ "name": "Wes", "email": "wes@example.com", "password": "x", "password-confirm": "x" }),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT, "{body}");

    let (status, _) = app
        .post_json("/login", None, json!({ "email": "wes@example.com", "password": "wrong" }))
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, body) = app
        .post_json("/login", None, json!({ "email": "WES@example.com", "password": "secret" }))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["user"].get("password").is_none());

    let (status, _) = app.post_json("/logout", Some(&token), json!(null)).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, _) = app.get("/hearts", Some(&token)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn mismatched_passwords_are_rejected() {
    let app = TestApp::new();
    let (status, body) = app
        .post_json(
            "/register",
            None,
            json!({ "name": "Wes", "email": "wes@example.com", "password": "a", "password-confirm": "b" }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Passwords do not match!");
}

#[tokio::test]
async fn password_reset_flow() {
    let app = TestApp::new();
    app.register("Wes", "wes@example.com").await;

    let (status, _) = app
        .post_json("/account/forgot", None, json!({ "email": "nobody@example.com" }))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = app
        .post_json("/account/forgot", None, json!({ "email": "wes@example.com" }))
        .await;
    assert_eq!(status, StatusCode::ACCEPTED);

    let outbox = app.mailer.outbox();
    assert_eq!(outbox.len(), 1);
    assert_eq!(outbox[0].to, "wes@example.com");
    let prefix = "http://delicious.test/account/reset/";
    assert!(outbox[0].reset_url.starts_with(prefix), "{}", outbox[0].reset_url);
    let token = &outbox[0].reset_url[prefix.len()..];
    assert_eq!(token.len(), 40);

    let reset = format!("/account/reset/{token}");
    let (status, _) = app.get(&reset, None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = app
        .post_json(&reset, None, json!({ "password": "new", "password-confirm": "other" }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = app
        .post_json(&reset, None, json!({ "password": "new", "password-confirm": "new" }))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["token"].as_str().is_some());

    // The token is single use.
    let (status, _) = app.get(&reset, None).await;
    assert_eq!(status, StatusCode::GONE);

    let (status, _) = app
        .post_json("/login", None, json!({ "email": "wes@example.com", "password": "new" }))
        .await;
    assert_eq!(status, StatusCode::OK);
}

// ---------------------------------------------------------------------------
// Photos
// ---------------------------------------------------------------------------

#[tokio::test]
async fn photo_upload_is_checked_resized_and_served() {
    let app = TestApp::new();
    let (token, _) = app.register("Wes", "wes@example.com").await;
    let store = app
        .create_store(&token, &StoreDraftBuilder::new("Pictured").build())
        .await;
    let uri = format!("/stores/{}/photo", store["id"].as_str().unwrap());

    let (content_type, body) = multipart_body("photo", "text/plain", b"not an image");
    let (status, _) = app
        .send(request("POST", &uri, Some(&token), Body::from(body), Some(&content_type)))
        .await;
    assert_eq!(status, StatusCode::UNSUPPORTED_MEDIA_TYPE);

    let (content_type, body) = multipart_body("photo", "image/png", &png_bytes(1600, 400));
    let (status, updated) = app
        .send(request("POST", &uri, Some(&token), Body::from(body), Some(&content_type)))
        .await;
    assert_eq!(status, StatusCode::OK, "{updated}");

    let photo = updated["photo"].as_str().unwrap().to_string();
    assert!(photo.ends_with(".png"));
    let stored = image::open(app.uploads.path().join(&photo)).unwrap();
    assert_eq!((stored.width(), stored.height()), (800, 200));

    let (status, _) = app.get(&format!("/uploads/{photo}"), None).await;
    assert_eq!(status, StatusCode::OK);
}
