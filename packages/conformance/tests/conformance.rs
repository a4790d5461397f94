//! End-to-end conformance tests for the SocialGraph HTTP API.
//!
//! Each test spawns an ephemeral in-process node (real TCP, real HTTP) via
//! [`socialgraph_conformance::spawn_node`] and exercises the API with a
//! `reqwest` HTTP client. Tests that need a state the API cannot produce
//! (a one-sided subscription entry) seed it directly through the storage
//! handle returned by `spawn_node`.
//!
//! # Coverage
//!
//! | Test | Area |
//! |------|------|
//! | `health_reports_counts` | health |
//! | `create_and_fetch_user` | users |
//! | `unknown_user_returns_404` | users |
//! | `invalid_user_body_returns_400` | users |
//! | `patch_unknown_user_returns_400` | users |
//! | `two_user_subscription_scenario` | subscriptions |
//! | `self_subscription_returns_400` | subscriptions |
//! | `subscribe_to_unknown_user_returns_404` | subscriptions |
//! | `unsubscribe_one_sided_edge_returns_400` | subscriptions |
//! | `subscribers_lists_followers` | subscriptions |
//! | `delete_user_cascades` | cascade |
//! | `delete_unknown_user_leaves_everything` | cascade |
//! | `post_for_unknown_user_returns_404` | posts |
//! | `post_crud` | posts |
//! | `second_profile_returns_400` | profiles |
//! | `concurrent_profile_creates_store_one` | profiles |
//! | `posts_racing_user_deletion_leave_no_orphans` | cascade |
//! | `sqlite_backend_scenario` | storage |

use reqwest::StatusCode;
use serde_json::{json, Value};
use socialgraph::{NewUser, UserPatch};
use socialgraph_api::{error::codes, CollectionCounts, ErrorResponse, HealthResponse};
use socialgraph_conformance::{spawn_node, spawn_sqlite_node};
use socialgraph_node::storage::{PostFilter, Storage};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn make_client() -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(std::time::Duration::from_secs(5))
        .build()
        .unwrap()
}

async fn create_user(client: &reqwest::Client, base: &str, first_name: &str) -> String {
    let resp = client
        .post(format!("{base}/users"))
        .json(&json!({
            "firstName": first_name,
            "lastName": "Conformance",
            "email": format!("{}@example.org", first_name.to_lowercase()),
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);
    let body: Value = resp.json().await.unwrap();
    body["id"].as_str().unwrap().to_string()
}

async fn get_json(client: &reqwest::Client, url: String) -> (StatusCode, Value) {
    let resp = client.get(url).send().await.unwrap();
    let status = resp.status();
    (status, resp.json().await.unwrap())
}

async fn subscription_call(
    client: &reqwest::Client,
    base: &str,
    action: &str,
    subscriber: &str,
    target: &str,
) -> (StatusCode, Value) {
    let resp = client
        .post(format!("{base}/users/{subscriber}/{action}"))
        .json(&json!({ "userId": target }))
        .send()
        .await
        .unwrap();
    let status = resp.status();
    (status, resp.json().await.unwrap())
}

async fn subscribe(client: &reqwest::Client, base: &str, a: &str, b: &str) -> (StatusCode, Value) {
    subscription_call(client, base, "subscribeTo", a, b).await
}

async fn unsubscribe(client: &reqwest::Client, base: &str, a: &str, b: &str) -> (StatusCode, Value) {
    subscription_call(client, base, "unsubscribeFrom", a, b).await
}

async fn list_of(client: &reqwest::Client, base: &str, id: &str) -> Value {
    let (status, body) = get_json(client, format!("{base}/users/{id}")).await;
    assert_eq!(status, StatusCode::OK);
    body["subscribedToUserIds"].clone()
}

async fn health(client: &reqwest::Client, base: &str) -> HealthResponse {
    let resp = client.get(format!("{base}/health")).send().await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    resp.json().await.unwrap()
}

async fn error_body(resp: reqwest::Response) -> ErrorResponse {
    resp.json().await.unwrap()
}

async fn create_profile(client: &reqwest::Client, base: &str, user_id: &str) -> reqwest::Response {
    client
        .post(format!("{base}/profiles"))
        .json(&profile(user_id))
        .send()
        .await
        .unwrap()
}

fn profile(user_id: &str) -> Value {
    json!({
        "avatar": "https://example.org/avatar.png",
        "sex": "female",
        "birthday": 788_918_400,
        "country": "FR",
        "street": "1 Rue de Rivoli",
        "city": "Paris",
        "memberTypeId": "business",
        "userId": user_id,
    })
}

// ---------------------------------------------------------------------------
// Health
// ---------------------------------------------------------------------------

#[tokio::test]
async fn health_reports_counts() {
    let (base, _storage) = spawn_node().await;
    let client = make_client();
    create_user(&client, &base, "Ann").await;

    let body = health(&client, &base).await;
    assert_eq!(body.status, HealthResponse::OK);
    assert_eq!(body.name.as_deref(), Some("conformance-node"));
    assert_eq!(body.counts, CollectionCounts { users: 1, posts: 0, profiles: 0 });
    assert!(body.graph.is_clean());
}

// ---------------------------------------------------------------------------
// Users
// ---------------------------------------------------------------------------

#[tokio::test]
async fn create_and_fetch_user() {
    let (base, _storage) = spawn_node().await;
    let client = make_client();
    let id = create_user(&client, &base, "Ann").await;

    let (status, body) = get_json(&client, format!("{base}/users/{id}")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], id.as_str());
    assert_eq!(body["firstName"], "Ann");
    assert_eq!(body["email"], "ann@example.org");
    assert_eq!(body["subscribedToUserIds"], json!([]));

    let (_, all) = get_json(&client, format!("{base}/users")).await;
    assert_eq!(all.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn unknown_user_returns_404() {
    let (base, _storage) = spawn_node().await;
    let resp = make_client().get(format!("{base}/users/nobody")).send().await.unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body = error_body(resp).await;
    assert_eq!(body.code, codes::NOT_FOUND);
    assert!(body.error.contains("nobody"));
}

#[tokio::test]
async fn invalid_user_body_returns_400() {
    let (base, _storage) = spawn_node().await;
    let resp = make_client()
        .post(format!("{base}/users"))
        .json(&json!({ "firstName": "", "lastName": "X", "email": "x@example.org" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["code"], "invalid_parameter");
}

#[tokio::test]
async fn patch_unknown_user_returns_400() {
    let (base, _storage) = spawn_node().await;
    let resp = make_client()
        .patch(format!("{base}/users/nobody"))
        .json(&json!({ "firstName": "X" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["code"], "store_error");
    assert!(body["error"].as_str().unwrap().contains("nobody"));
}

// ---------------------------------------------------------------------------
// Subscriptions
// ---------------------------------------------------------------------------

#[tokio::test]
async fn two_user_subscription_scenario() {
    let (base, _storage) = spawn_node().await;
    let client = make_client();
    let one = create_user(&client, &base, "One").await;
    let two = create_user(&client, &base, "Two").await;

    let (status, body) = subscribe(&client, &base, &one, &two).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["subscribedToUserIds"], json!([two]));
    assert_eq!(list_of(&client, &base, &one).await, json!([two]));
    assert_eq!(list_of(&client, &base, &two).await, json!([one]));

    let (status, body) = subscribe(&client, &base, &one, &two).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "conflict");
    assert_eq!(list_of(&client, &base, &one).await, json!([two]));
    assert_eq!(list_of(&client, &base, &two).await, json!([one]));

    let (status, _) = unsubscribe(&client, &base, &one, &two).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(list_of(&client, &base, &one).await, json!([]));
    assert_eq!(list_of(&client, &base, &two).await, json!([]));
}

#[tokio::test]
async fn self_subscription_returns_400() {
    let (base, _storage) = spawn_node().await;
    let client = make_client();
    let a = create_user(&client, &base, "A").await;

    let (status, body) = subscribe(&client, &base, &a, &a).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "conflict");
    assert_eq!(list_of(&client, &base, &a).await, json!([]));
}

#[tokio::test]
async fn subscribe_to_unknown_user_returns_404() {
    let (base, _storage) = spawn_node().await;
    let client = make_client();
    let a = create_user(&client, &base, "A").await;

    let (status, _) = subscribe(&client, &base, &a, "nobody").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = subscribe(&client, &base, "nobody", &a).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(list_of(&client, &base, &a).await, json!([]));
}

#[tokio::test]
async fn unsubscribe_one_sided_edge_returns_400() {
    let (base, storage) = spawn_node().await;
    let client = make_client();
    let a = create_user(&client, &base, "A").await;
    let b = create_user(&client, &base, "B").await;

    // Only A's side records the edge.
    storage
        .users()
        .change(&a, UserPatch::subscriptions(vec![b.clone()]))
        .await
        .unwrap();

    let (status, body) = unsubscribe(&client, &base, &a, &b).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "conflict");
    assert_eq!(list_of(&client, &base, &a).await, json!([b]));
    assert_eq!(list_of(&client, &base, &b).await, json!([]));

    let report = health(&client, &base).await;
    assert_eq!(report.status, HealthResponse::DEGRADED);
    assert!(!report.graph.is_clean());
}

#[tokio::test]
async fn subscribers_lists_followers() {
    let (base, _storage) = spawn_node().await;
    let client = make_client();
    let star = create_user(&client, &base, "Star").await;
    let f1 = create_user(&client, &base, "F1").await;
    let f2 = create_user(&client, &base, "F2").await;
    subscribe(&client, &base, &f1, &star).await;
    subscribe(&client, &base, &f2, &star).await;

    let (status, body) = get_json(&client, format!("{base}/users/{star}/subscribers")).await;
    assert_eq!(status, StatusCode::OK);
    let ids: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|u| u["id"].as_str().unwrap())
        .collect();
    assert_eq!(ids, vec![f1.as_str(), f2.as_str()]);
}

// ---------------------------------------------------------------------------
// Cascade deletion
// ---------------------------------------------------------------------------

#[tokio::test]
async fn delete_user_cascades() {
    let (base, storage) = spawn_node().await;
    let client = make_client();
    let u = create_user(&client, &base, "U").await;
    let f1 = create_user(&client, &base, "F1").await;
    let f2 = create_user(&client, &base, "F2").await;
    let other = create_user(&client, &base, "Other").await;

    subscribe(&client, &base, &f1, &u).await;
    subscribe(&client, &base, &f2, &u).await;
    subscribe(&client, &base, &f1, &other).await;

    let resp = client
        .post(format!("{base}/profiles"))
        .json(&profile(&u))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);
    for title in ["Q1", "Q2"] {
        let resp = client
            .post(format!("{base}/posts"))
            .json(&json!({ "title": title, "content": "text", "userId": u }))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::CREATED);
    }

    let resp = client.delete(format!("{base}/users/{u}")).send().await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.headers()["x-cascade-posts"], "2");
    assert_eq!(resp.headers()["x-cascade-followers"], "2");
    assert_eq!(resp.headers()["x-cascade-failures"], "0");
    let deleted: Value = resp.json().await.unwrap();
    assert_eq!(deleted["id"], u.as_str());

    let (status, _) = get_json(&client, format!("{base}/users/{u}")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(storage.posts().find_many(None).await.unwrap().is_empty());
    assert!(storage.profiles().find_many(None).await.unwrap().is_empty());
    assert_eq!(list_of(&client, &base, &f1).await, json!([other]));
    assert_eq!(list_of(&client, &base, &f2).await, json!([]));

    assert_eq!(health(&client, &base).await.status, HealthResponse::OK);
}

#[tokio::test]
async fn delete_unknown_user_leaves_everything() {
    let (base, storage) = spawn_node().await;
    let client = make_client();
    let a = create_user(&client, &base, "A").await;
    let b = create_user(&client, &base, "B").await;
    subscribe(&client, &base, &a, &b).await;
    client
        .post(format!("{base}/posts"))
        .json(&json!({ "title": "t", "content": "c", "userId": a }))
        .send()
        .await
        .unwrap();

    let users_before = storage.users().find_many(None).await.unwrap();
    let posts_before = storage.posts().find_many(None).await.unwrap();

    let resp = client.delete(format!("{base}/users/nobody")).send().await.unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    assert_eq!(storage.users().find_many(None).await.unwrap(), users_before);
    assert_eq!(storage.posts().find_many(None).await.unwrap(), posts_before);
}

// ---------------------------------------------------------------------------
// Posts and profiles
// ---------------------------------------------------------------------------

#[tokio::test]
async fn post_for_unknown_user_returns_404() {
    let (base, _storage) = spawn_node().await;
    let resp = make_client()
        .post(format!("{base}/posts"))
        .json(&json!({ "title": "t", "content": "c", "userId": "nobody" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn post_crud() {
    let (base, _storage) = spawn_node().await;
    let client = make_client();
    let u = create_user(&client, &base, "U").await;

    let resp = client
        .post(format!("{base}/posts"))
        .json(&json!({ "title": "Draft", "content": "text", "userId": u }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);
    let post: Value = resp.json().await.unwrap();
    let id = post["id"].as_str().unwrap();

    let resp = client
        .patch(format!("{base}/posts/{id}"))
        .json(&json!({ "title": "Final" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let (_, fetched) = get_json(&client, format!("{base}/posts/{id}")).await;
    assert_eq!(fetched["title"], "Final");

    let resp = client.delete(format!("{base}/posts/{id}")).send().await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let resp = client.delete(format!("{base}/posts/{id}")).send().await.unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn second_profile_returns_400() {
    let (base, _storage) = spawn_node().await;
    let client = make_client();
    let u = create_user(&client, &base, "U").await;

    let first = create_profile(&client, &base, &u).await;
    assert_eq!(first.status(), StatusCode::CREATED);
    let second = create_profile(&client, &base, &u).await;
    assert_eq!(second.status(), StatusCode::BAD_REQUEST);
    assert_eq!(error_body(second).await.code, codes::CONFLICT);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_profile_creates_store_one() {
    let (base, storage) = spawn_sqlite_node().await;
    let client = make_client();
    let u = create_user(&client, &base, "U").await;

    let mut handles = Vec::new();
    for _ in 0..8 {
        let (client, base, u) = (client.clone(), base.clone(), u.clone());
        handles.push(tokio::spawn(async move {
            create_profile(&client, &base, &u).await
        }));
    }
    let mut created = 0;
    for h in handles {
        let resp = h.await.unwrap();
        if resp.status() == StatusCode::CREATED {
            created += 1;
        } else {
            assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
            assert_eq!(error_body(resp).await.code, codes::CONFLICT);
        }
    }

    assert_eq!(created, 1);
    assert_eq!(storage.profiles().find_many(None).await.unwrap().len(), 1);
    assert_eq!(health(&client, &base).await.counts.profiles, 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn posts_racing_user_deletion_leave_no_orphans() {
    let (base, storage) = spawn_sqlite_node().await;
    let client = make_client();
    let u = create_user(&client, &base, "U").await;

    let mut creates = Vec::new();
    for i in 0..8 {
        let (client, base, u) = (client.clone(), base.clone(), u.clone());
        creates.push(tokio::spawn(async move {
            client
                .post(format!("{base}/posts"))
                .json(&json!({ "title": format!("P{i}"), "content": "c", "userId": u }))
                .send()
                .await
                .unwrap()
                .status()
        }));
    }
    let delete = {
        let (client, base, u) = (client.clone(), base.clone(), u.clone());
        tokio::spawn(async move {
            client.delete(format!("{base}/users/{u}")).send().await.unwrap().status()
        })
    };

    assert_eq!(delete.await.unwrap(), StatusCode::OK);
    for h in creates {
        let status = h.await.unwrap();
        assert!(
            status == StatusCode::CREATED || status == StatusCode::NOT_FOUND,
            "{status}"
        );
    }

    let orphans = storage
        .posts()
        .find_many(Some(&PostFilter::UserId(u.clone())))
        .await
        .unwrap();
    assert!(orphans.is_empty(), "{orphans:?}");
}

// ---------------------------------------------------------------------------
// SQLite backend
// ---------------------------------------------------------------------------

#[tokio::test]
async fn sqlite_backend_scenario() {
    let (base, storage) = spawn_sqlite_node().await;
    let client = make_client();
    let seeded = storage
        .users()
        .create(NewUser {
            first_name: "Seeded".into(),
            last_name: "Directly".into(),
            email: "seeded@example.org".into(),
        })
        .await
        .unwrap();
    let other = create_user(&client, &base, "Other").await;

    let (status, _) = subscribe(&client, &base, &other, &seeded.id).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(list_of(&client, &base, &seeded.id).await, json!([other]));

    let resp = client
        .delete(format!("{base}/users/{}", seeded.id))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(list_of(&client, &base, &other).await, json!([]));
}
