mod common;

use anyhow::Result;
use reqwest::StatusCode;
use serde_json::json;

use common::{data, error_code, requester, TestServer, PASSWORD};

#[tokio::test]
async fn registration_returns_profile_without_password() -> Result<()> {
    let server = TestServer::spawn().await?;
    let id = server.register("alice").await?;

    let profile = data(server.get(&format!("/users/{}", id)).await?).await?;
    assert_eq!(profile["name"], "alice");
    assert!(profile.get("password").is_none());

    let listed = data(server.get("/users").await?).await?;
    assert!(listed[0].get("password").is_none());
    Ok(())
}

#[tokio::test]
async fn duplicate_name_is_conflict() -> Result<()> {
    let server = TestServer::spawn().await?;
    server.register("alice").await?;

    let res = server
        .post(
            "/users",
            json!({ "user": { "name": "alice", "password": "x", "email": "other@example.com" } }),
        )
        .await?;
    assert_eq!(res.status(), StatusCode::CONFLICT);
    Ok(())
}

#[tokio::test]
async fn bad_email_is_validation_error() -> Result<()> {
    let server = TestServer::spawn().await?;

    let res = server
        .post("/users", json!({ "user": { "name": "alice", "password": "x", "email": "nope" } }))
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    assert_eq!(error_code(res).await?, "VALIDATION_ERROR");
    Ok(())
}

#[tokio::test]
async fn unknown_user_and_wrong_password_look_the_same() -> Result<()> {
    let server = TestServer::spawn().await?;
    let id = server.register("alice").await?;
    let path = format!("/users/{}", id);

    let wrong_password = server
        .put(
            &path,
            json!({ "user": { "bio": "x" }, "requester": { "name": "alice", "password": "wrong" } }),
        )
        .await?;
    let unknown_user = server
        .put(
            &path,
            json!({ "user": { "bio": "x" }, "requester": { "name": "nobody", "password": PASSWORD } }),
        )
        .await?;

    assert_eq!(wrong_password.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(unknown_user.status(), StatusCode::UNAUTHORIZED);
    let a: serde_json::Value = wrong_password.json().await?;
    let b: serde_json::Value = unknown_user.json().await?;
    assert_eq!(a, b);
    Ok(())
}

#[tokio::test]
async fn users_edit_themselves_admins_edit_anyone() -> Result<()> {
    let server = TestServer::spawn().await?;
    let alice = server.register("alice").await?;
    server.register("bob").await?;
    server.register_admin("root").await?;
    let path = format!("/users/{}", alice);

    let res = server
        .put(&path, json!({ "user": { "bio": "mine" }, "requester": requester("alice") }))
        .await?;
    assert_eq!(data(res).await?["bio"], "mine");

    let res = server
        .put(&path, json!({ "user": { "bio": "hijack" }, "requester": requester("bob") }))
        .await?;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    let res = server
        .put(&path, json!({ "user": { "bio": "moderated" }, "requester": requester("root") }))
        .await?;
    assert_eq!(data(res).await?["bio"], "moderated");
    Ok(())
}

#[tokio::test]
async fn only_the_account_holder_may_delete() -> Result<()> {
    let server = TestServer::spawn().await?;
    let alice = server.register("alice").await?;
    server.register_admin("root").await?;
    let path = format!("/users/{}", alice);

    let res = server.delete(&path, json!({ "requester": requester("root") })).await?;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    let res = server.delete(&path, json!({ "requester": requester("alice") })).await?;
    assert_eq!(res.status(), StatusCode::NO_CONTENT);

    let res = server.get(&path).await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn admin_grants_require_an_admin() -> Result<()> {
    let server = TestServer::spawn().await?;
    let alice = server.register("alice").await?;
    server.register_admin("root").await?;
    let path = format!("/admins/{}", alice);

    let res = server.put(&path, json!({ "requester": requester("alice") })).await?;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    let res = server.put(&path, json!({ "requester": requester("root") })).await?;
    let change = data(res).await?;
    assert_eq!(change["administrator"], true);
    assert_eq!(change["changed"], true);
    assert!(server.state.admins.is_administrator(alice).await?);

    let res = server.delete(&path, json!({ "requester": requester("root") })).await?;
    assert_eq!(data(res).await?["changed"], true);
    assert!(!server.state.admins.is_administrator(alice).await?);
    Ok(())
}
