//! HTTP tests for notes, quotas and tenant upgrades

mod common;

use axum::http::{Method, StatusCode};
use common::TestContext;
use serde_json::json;

#[tokio::test]
async fn test_create_and_fetch_note() {
    let ctx = TestContext::new().await.unwrap();
    let token = ctx.login("user@acme.test").await;

    let (status, note) = ctx
        .request(
            Method::POST,
            "/api/notes",
            Some(&token),
            Some(json!({ "title": "Groceries", "content": "milk, eggs" })),
        )
        .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(note["title"], "Groceries");
    assert_eq!(note["content"], "milk, eggs");
    assert!(note["createdAt"].is_string());

    let id = note["id"].as_str().unwrap();
    let (status, fetched) = ctx
        .request(Method::GET, &format!("/api/notes/{}", id), Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched, note);
}

#[tokio::test]
async fn test_create_note_validation() {
    let ctx = TestContext::new().await.unwrap();
    let token = ctx.login("user@acme.test").await;

    for body in [
        json!({ "title": "", "content": "x" }),
        json!({ "title": "x" }),
        json!({ "title": "t".repeat(201), "content": "x" }),
    ] {
        let (status, response) = ctx
            .request(Method::POST, "/api/notes", Some(&token), Some(body.clone()))
            .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY, "body {} gave {}", body, response);
    }
}

#[tokio::test]
async fn test_free_plan_quota_and_upgrade() {
    let ctx = TestContext::new().await.unwrap();
    let member = ctx.login("user@acme.test").await;
    let admin = ctx.login("admin@acme.test").await;

    // Quota is per tenant, so two users share it
    for (token, title) in [(&member, "one"), (&admin, "two"), (&member, "three")] {
        let (status, _) = ctx.create_note(token, title).await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (status, body) = ctx.create_note(&member, "four").await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "quota_exceeded");
    assert_eq!(body["message"], "Note limit reached for Free plan. Please upgrade.");

    // Other tenants are unaffected
    let globex = ctx.login("user@globex.test").await;
    let (status, _) = ctx.create_note(&globex, "elsewhere").await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = ctx
        .request(Method::POST, "/api/tenants/acme/upgrade", Some(&admin), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Tenant Acme upgraded to Pro plan.");
    assert_eq!(body["tenant"]["plan"], "Pro");

    // Tokens issued before the upgrade keep working
    let (status, _) = ctx.create_note(&member, "four").await;
    assert_eq!(status, StatusCode::CREATED);

    let (_, notes) = ctx.request(Method::GET, "/api/notes", Some(&member), None).await;
    assert_eq!(notes.as_array().unwrap().len(), 4);
}

#[tokio::test]
async fn test_delete_frees_quota() {
    let ctx = TestContext::new().await.unwrap();
    let token = ctx.login("user@globex.test").await;

    let mut ids = Vec::new();
    for title in ["a", "b", "c"] {
        let (_, note) = ctx.create_note(&token, title).await;
        ids.push(note["id"].as_str().unwrap().to_string());
    }

    let (status, body) = ctx
        .request(Method::DELETE, &format!("/api/notes/{}", ids[0]), Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Note deleted successfully.");

    let (status, _) = ctx
        .request(Method::GET, &format!("/api/notes/{}", ids[0]), Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = ctx.create_note(&token, "d").await;
    assert_eq!(status, StatusCode::CREATED);
}

#[tokio::test]
async fn test_list_is_newest_first_and_tenant_scoped() {
    let ctx = TestContext::new().await.unwrap();
    let acme = ctx.login("user@acme.test").await;
    let globex = ctx.login("user@globex.test").await;

    ctx.create_note(&acme, "first").await;
    ctx.create_note(&acme, "second").await;
    ctx.create_note(&globex, "private").await;

    let (status, notes) = ctx.request(Method::GET, "/api/notes", Some(&acme), None).await;
    assert_eq!(status, StatusCode::OK);

    let titles: Vec<&str> = notes
        .as_array()
        .unwrap()
        .iter()
        .map(|n| n["title"].as_str().unwrap())
        .collect();
    assert_eq!(titles, vec!["second", "first"]);
}

#[tokio::test]
async fn test_cross_tenant_access_is_forbidden() {
    let ctx = TestContext::new().await.unwrap();
    let acme = ctx.login("user@acme.test").await;
    let globex = ctx.login("admin@globex.test").await;

    let (_, note) = ctx.create_note(&acme, "secret").await;
    let uri = format!("/api/notes/{}", note["id"].as_str().unwrap());

    let (status, body) = ctx.request(Method::GET, &uri, Some(&globex), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["message"], "Access denied: Note does not belong to your tenant.");

    let (status, _) = ctx
        .request(Method::PUT, &uri, Some(&globex), Some(json!({ "title": "mine" })))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = ctx.request(Method::DELETE, &uri, Some(&globex), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    // Still intact for its owner
    let (status, fetched) = ctx.request(Method::GET, &uri, Some(&acme), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["title"], "secret");
}

#[tokio::test]
async fn test_missing_and_malformed_ids() {
    let ctx = TestContext::new().await.unwrap();
    let token = ctx.login("user@acme.test").await;

    for uri in [
        "/api/notes/not-a-uuid".to_string(),
        format!("/api/notes/{}", uuid::Uuid::new_v4()),
    ] {
        let (status, body) = ctx.request(Method::GET, &uri, Some(&token), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND, "{}", uri);
        assert_eq!(body["message"], "Note not found.");

        let (status, _) = ctx.request(Method::DELETE, &uri, Some(&token), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND, "{}", uri);
    }
}

#[tokio::test]
async fn test_update_note() {
    let ctx = TestContext::new().await.unwrap();
    let token = ctx.login("user@acme.test").await;

    let (_, note) = ctx.create_note(&token, "draft").await;
    let uri = format!("/api/notes/{}", note["id"].as_str().unwrap());

    let (status, updated) = ctx
        .request(Method::PUT, &uri, Some(&token), Some(json!({ "title": "final" })))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["title"], "final");
    assert_eq!(updated["content"], note["content"]);
    assert_eq!(updated["owner"], note["owner"]);

    let (status, unchanged) = ctx.request(Method::PUT, &uri, Some(&token), Some(json!({}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(unchanged, updated);

    for body in [
        json!({ "tenant": "someone-else" }),
        json!({ "owner": uuid::Uuid::new_v4() }),
        json!({ "title": "" }),
    ] {
        let (status, _) = ctx
            .request(Method::PUT, &uri, Some(&token), Some(body.clone()))
            .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY, "{}", body);
    }
}

#[tokio::test]
async fn test_upgrade_rules() {
    let ctx = TestContext::new().await.unwrap();
    let acme_admin = ctx.login("admin@acme.test").await;
    let acme_member = ctx.login("user@acme.test").await;

    let (status, body) = ctx
        .request(Method::POST, "/api/tenants/globex/upgrade", Some(&acme_admin), None)
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["message"], "Access denied: You can only upgrade your own tenant.");

    let (status, body) = ctx
        .request(Method::POST, "/api/tenants/acme/upgrade", Some(&acme_member), None)
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["message"], "Access denied: Admin role required.");

    for _ in 0..2 {
        let (status, body) = ctx
            .request(Method::POST, "/api/tenants/acme/upgrade", Some(&acme_admin), None)
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["tenant"]["plan"], "Pro");
    }

    // Globex is still on Free
    let (_, login) = ctx
        .request(
            Method::POST,
            "/api/login",
            None,
            Some(json!({ "email": "admin@globex.test", "password": "password" })),
        )
        .await;
    assert_eq!(login["user"]["tenant"]["plan"], "Free");
}

#[tokio::test]
async fn test_security_headers_present() {
    let ctx = TestContext::new().await.unwrap();

    let response = tower::ServiceExt::oneshot(
        ctx.app.clone(),
        axum::http::Request::builder()
            .uri("/health")
            .body(axum::body::Body::empty())
            .unwrap(),
    )
    .await
    .unwrap();

    assert_eq!(response.headers()["x-content-type-options"], "nosniff");
    assert_eq!(response.headers()["x-frame-options"], "DENY");
    assert!(response.headers().get("strict-transport-security").is_none());
}
