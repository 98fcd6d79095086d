mod common;

use anyhow::Result;
use reqwest::StatusCode;
use serde_json::json;

use common::{data, requester, TestServer};

#[tokio::test]
async fn post_author_is_the_requester() -> Result<()> {
    let server = TestServer::spawn().await?;
    server.register("owner").await?;
    let writer = server.register("writer").await?;
    let board = server.create_board("owner", "rust", &[]).await?;

    let post = server.create_post("writer", board, "hello").await?;
    let body = data(server.get(&format!("/boards/{}/posts/{}", board, post)).await?).await?;
    assert_eq!(body["author"], writer.to_string());
    assert_eq!(body["board"], board.to_string());
    assert_eq!(body["bodyType"], "text");
    Ok(())
}

#[tokio::test]
async fn posts_on_missing_board_are_not_found() -> Result<()> {
    let server = TestServer::spawn().await?;
    server.register("writer").await?;

    let res = server
        .post(
            &format!("/boards/{}/posts", uuid::Uuid::new_v4()),
            json!({ "post": { "title": "hello" }, "requester": requester("writer") }),
        )
        .await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn board_moderator_moderates_posts_and_comments() -> Result<()> {
    let server = TestServer::spawn().await?;
    server.register("owner").await?;
    let moderator = server.register("moderator").await?;
    server.register("author").await?;
    server.register("stranger").await?;
    let board = server.create_board("owner", "rust", &[moderator]).await?;
    let post = server.create_post("author", board, "hello").await?;
    let post_path = format!("/boards/{}/posts/{}", board, post);

    let res = server
        .put(&post_path, json!({ "post": { "title": "spam" }, "requester": requester("stranger") }))
        .await?;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    let res = server
        .put(&post_path, json!({ "post": { "title": "cleaned" }, "requester": requester("moderator") }))
        .await?;
    assert_eq!(data(res).await?["title"], "cleaned");

    let res = server
        .post(
            &format!("{}/comments", post_path),
            json!({ "comment": { "body": "first" }, "requester": requester("stranger") }),
        )
        .await?;
    assert_eq!(res.status(), StatusCode::CREATED);
    let comment = data(res).await?["id"].as_str().unwrap_or_default().to_string();
    let comment_path = format!("{}/comments/{}", post_path, comment);

    let res = server
        .put(&comment_path, json!({ "comment": { "body": "edited" }, "requester": requester("author") }))
        .await?;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    let res = server.delete(&comment_path, json!({ "requester": requester("moderator") })).await?;
    assert_eq!(res.status(), StatusCode::NO_CONTENT);

    let comments = data(server.get(&format!("{}/comments", post_path)).await?).await?;
    assert_eq!(comments, json!([]));
    Ok(())
}

#[tokio::test]
async fn popular_posts_rank_by_votes() -> Result<()> {
    let server = TestServer::spawn().await?;
    server.register("owner").await?;
    let board = server.create_board("owner", "rust", &[]).await?;
    let low = server.create_post("owner", board, "low").await?;
    let high = server.create_post("owner", board, "high").await?;

    for (post, votes) in [(low, 1), (high, 9)] {
        let res = server
            .put(
                &format!("/boards/{}/posts/{}", board, post),
                json!({ "post": { "votes": votes }, "requester": requester("owner") }),
            )
            .await?;
        assert_eq!(res.status(), StatusCode::OK);
    }

    let popular = data(server.get("/").await?).await?;
    assert_eq!(popular[0]["title"], "high");
    assert_eq!(popular[0]["author"], "owner");
    assert_eq!(popular[0]["board"], "rust");
    assert_eq!(popular[1]["title"], "low");

    let users = data(server.get("/users/popular").await?).await?;
    assert_eq!(users[0]["name"], "owner");
    assert_eq!(users[0]["votes"], 10);
    Ok(())
}
