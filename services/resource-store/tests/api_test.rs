mod support;

use axum::http::{Method, StatusCode};
use serde_json::json;
use support::TestApp;

#[tokio::test]
async fn test_healthz_needs_no_credentials() {
    let app = TestApp::new();
    let (status, body) = app.get("/healthz/", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"status": "ok"}));
}

#[tokio::test]
async fn test_creator_lifecycle() {
    let app = TestApp::new();
    let alice = app.user("alice", &["creator"]).await;
    let token = Some(alice.token.as_str());

    let (status, created) = app
        .post("/resources/", token, json!({"title": "Test", "data": {"x": 1}}))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let id = created["id"].as_str().unwrap().to_string();
    assert_eq!(created["owner"], "alice");
    assert_eq!(created["data"], json!({"x": 1}));

    let (status, page) = app.get("/resources/", token).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(page["count"], 1);
    assert_eq!(page["results"][0]["id"], id.as_str());
    assert!(page["next"].is_null());
    assert!(page["previous"].is_null());

    let (status, updated) = app
        .patch(&format!("/resources/{id}/"), token, json!({"title": "Updated"}))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["title"], "Updated");
    assert_eq!(updated["data"], json!({"x": 1}));

    let (status, _) = app.delete(&format!("/resources/{id}/"), token).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = app.get(&format!("/resources/{id}/"), token).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_anonymous_create_is_unauthenticated() {
    let app = TestApp::new();
    let (status, body) = app.post("/resources/", None, json!({"title": "Anon"})).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["status"], 401);
}

#[tokio::test]
async fn test_anonymous_object_access_is_unauthenticated() {
    let app = TestApp::new();
    let alice = app.user("alice", &["creator"]).await;
    let (_, created) = app
        .post("/resources/", Some(&alice.token), json!({"title": "Test"}))
        .await;
    let uri = format!("/resources/{}/", created["id"].as_str().unwrap());

    assert_eq!(app.get(&uri, None).await.0, StatusCode::UNAUTHORIZED);
    assert_eq!(
        app.patch(&uri, None, json!({"title": "x"})).await.0,
        StatusCode::UNAUTHORIZED
    );
    assert_eq!(app.delete(&uri, None).await.0, StatusCode::UNAUTHORIZED);
    assert_eq!(app.get("/resources/", None).await.0, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_invalid_token_is_unauthenticated() {
    let app = TestApp::new();
    let (status, _) = app.get("/resources/", Some("not-a-jwt")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_user_without_roles_is_forbidden() {
    let app = TestApp::new();
    let bob = app.user("bob", &[]).await;

    let (status, body) = app
        .post("/resources/", Some(&bob.token), json!({"title": "Should Fail"}))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["status"], 403);

    let (status, _) = app.get("/resources/", Some(&bob.token)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_admin_sees_all_creator_sees_own() {
    let app = TestApp::new();
    let admin = app.user("root", &["admin"]).await;
    let creator = app.user("carol", &["creator"]).await;

    app.post("/resources/", Some(&admin.token), json!({"title": "Admin's"}))
        .await;
    let (_, own) = app
        .post("/resources/", Some(&creator.token), json!({"title": "Carol's"}))
        .await;

    let (_, all) = app.get("/resources/", Some(&admin.token)).await;
    assert_eq!(all["count"], 2);
    let owners: Vec<&str> = all["results"]
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["owner"].as_str().unwrap())
        .collect();
    assert!(owners.contains(&"root"));
    assert!(owners.contains(&"carol"));

    let (_, mine) = app.get("/resources/", Some(&creator.token)).await;
    assert_eq!(mine["count"], 1);
    assert_eq!(mine["results"][0]["id"], own["id"]);
}

#[tokio::test]
async fn test_non_owner_gets_not_found() {
    let app = TestApp::new();
    let alice = app.user("alice", &["creator"]).await;
    let mallory = app.user("mallory", &["creator"]).await;
    let (_, created) = app
        .post("/resources/", Some(&alice.token), json!({"title": "Private"}))
        .await;
    let uri = format!("/resources/{}/", created["id"].as_str().unwrap());
    let token = Some(mallory.token.as_str());

    assert_eq!(app.get(&uri, token).await.0, StatusCode::NOT_FOUND);
    assert_eq!(
        app.patch(&uri, token, json!({"title": "Hijacked"})).await.0,
        StatusCode::NOT_FOUND
    );
    assert_eq!(app.delete(&uri, token).await.0, StatusCode::NOT_FOUND);

    let (status, unchanged) = app.get(&uri, Some(&alice.token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(unchanged["title"], "Private");
}

#[tokio::test]
async fn test_owner_cannot_be_spoofed() {
    let app = TestApp::new();
    let alice = app.user("alice", &["creator"]).await;
    let bob = app.user("bob", &["creator"]).await;

    let (_, created) = app
        .post(
            "/resources/",
            Some(&alice.token),
            json!({"title": "Mine", "owner": bob.user.id.to_string()}),
        )
        .await;
    assert_eq!(created["owner"], "alice");

    let uri = format!("/resources/{}/", created["id"].as_str().unwrap());
    let (status, updated) = app
        .patch(&uri, Some(&alice.token), json!({"owner": "bob"}))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["owner"], "alice");
}

#[tokio::test]
async fn test_role_revocation_takes_effect_on_next_request() {
    let app = TestApp::new();
    let admin = app.user("root", &["admin"]).await;
    let dave = app.user("dave", &["creator"]).await;

    let (status, _) = app
        .post("/resources/", Some(&dave.token), json!({"title": "Before"}))
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, _) = app
        .request(
            Method::DELETE,
            &format!("/users/{}/roles/creator", dave.user.id),
            Some(&admin.token),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = app
        .post("/resources/", Some(&dave.token), json!({"title": "After"}))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = app
        .request(
            Method::PUT,
            &format!("/users/{}/roles/creator", dave.user.id),
            Some(&admin.token),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = app
        .post("/resources/", Some(&dave.token), json!({"title": "Again"}))
        .await;
    assert_eq!(status, StatusCode::CREATED);
}

#[tokio::test]
async fn test_validation_errors() {
    let app = TestApp::new();
    let alice = app.user("alice", &["creator"]).await;
    let token = Some(alice.token.as_str());

    let (status, body) = app.post("/resources/", token, json!({"data": {}})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["status"], 400);

    let (status, _) = app.post("/resources/", token, json!({"title": "   "})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = app.post("/resources/", token, json!({"title": 42})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_null_title_is_rejected() {
    let app = TestApp::new();
    let alice = app.user("alice", &["creator"]).await;
    let token = Some(alice.token.as_str());

    let (status, _) = app.post("/resources/", token, json!({"title": null})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, created) = app.post("/resources/", token, json!({"title": "Keep"})).await;
    let uri = format!("/resources/{}/", created["id"].as_str().unwrap());

    let (status, body) = app.patch(&uri, token, json!({"title": null})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["status"], 400);

    let (_, stored) = app.get(&uri, token).await;
    assert_eq!(stored["title"], "Keep");
}

#[tokio::test]
async fn test_anonymous_is_rejected_before_input_is_read() {
    let app = TestApp::new();

    let cases = [
        app.get("/resources/?page=abc", None).await,
        app.get("/resources/not-a-uuid/", None).await,
        app.patch("/resources/not-a-uuid/", None, json!({"title": "x"})).await,
        app.delete("/resources/not-a-uuid/", None).await,
        app.send(Method::POST, "/resources/", None, Some("{not json")).await,
        app.send(Method::POST, "/users/", None, Some("{not json")).await,
        app.request(Method::PUT, "/users/not-a-uuid/roles/creator", None, None)
            .await,
    ];
    for (status, body) in cases {
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["status"], 401);
    }
}

#[tokio::test]
async fn test_missing_role_is_reported_before_input_errors() {
    let app = TestApp::new();
    let bob = app.user("bob", &[]).await;
    let carol = app.user("carol", &["creator"]).await;
    let bob_token = Some(bob.token.as_str());

    let (status, _) = app.get("/resources/?page=abc", bob_token).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = app
        .send(Method::POST, "/resources/", bob_token, Some("{not json"))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = app
        .request(
            Method::PUT,
            "/users/not-a-uuid/roles/creator",
            Some(&carol.token),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    // 读取单个对象不要求角色，非法 ID 按不存在处理
    let (status, _) = app.get("/resources/not-a-uuid/", bob_token).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = app
        .send(Method::POST, "/resources/", Some(&carol.token), Some("{not json"))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_malformed_id_is_not_found() {
    let app = TestApp::new();
    let alice = app.user("alice", &["creator"]).await;

    let (status, _) = app.get("/resources/not-a-uuid/", Some(&alice.token)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_pagination_links_and_invalid_page() {
    let app = TestApp::new();
    let alice = app.user("alice", &["creator"]).await;
    let token = Some(alice.token.as_str());

    for title in ["one", "two", "three"] {
        app.post("/resources/", token, json!({"title": title})).await;
    }

    let (status, page) = app.get("/resources/?page_size=2", token).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(page["count"], 3);
    assert_eq!(page["results"].as_array().unwrap().len(), 2);
    assert_eq!(page["results"][0]["title"], "three");
    assert_eq!(page["next"], "/resources/?page=2&page_size=2");
    assert!(page["previous"].is_null());

    let (_, second) = app.get("/resources/?page=2&page_size=2", token).await;
    assert_eq!(second["results"].as_array().unwrap().len(), 1);
    assert_eq!(second["previous"], "/resources/?page_size=2");

    let (status, _) = app.get("/resources/?page=3&page_size=2", token).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = app.get("/resources/?page=abc", token).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_search_and_ordering() {
    let app = TestApp::new();
    let alice = app.user("alice", &["creator"]).await;
    let token = Some(alice.token.as_str());

    for title in ["Beta report", "alpha report", "Gamma"] {
        app.post("/resources/", token, json!({"title": title})).await;
    }

    let (_, page) = app
        .get("/resources/?search=REPORT&ordering=title", token)
        .await;
    assert_eq!(page["count"], 2);
    assert_eq!(page["results"][0]["title"], "Beta report");
    assert_eq!(page["results"][1]["title"], "alpha report");
}

#[tokio::test]
async fn test_login_and_me() {
    let app = TestApp::new();
    app.login_user("alice", &["creator"]).await;

    let (status, body) = app
        .post(
            "/auth/token",
            None,
            json!({"username": "alice", "password": "alice-password"}),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["token_type"], "Bearer");
    let token = body["access_token"].as_str().unwrap().to_string();

    let (status, me) = app.get("/users/me", Some(&token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(me["username"], "alice");
    assert_eq!(me["roles"], json!(["creator"]));

    let (status, _) = app
        .post(
            "/auth/token",
            None,
            json!({"username": "alice", "password": "wrong-password"}),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_user_management_is_admin_only() {
    let app = TestApp::new();
    let admin = app.user("root", &["admin"]).await;
    let creator = app.user("carol", &["creator"]).await;
    let body = json!({"username": "erin", "password": "erin-password", "roles": ["creator"]});

    let (status, _) = app.post("/users/", Some(&creator.token), body.clone()).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, created) = app.post("/users/", Some(&admin.token), body.clone()).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["roles"], json!(["creator"]));

    let (status, _) = app.post("/users/", Some(&admin.token), body).await;
    assert_eq!(status, StatusCode::CONFLICT);
}
