mod common;

use anyhow::Result;
use reqwest::StatusCode;
use serde_json::Value;

use common::TestServer;

#[tokio::test]
async fn root_and_health_are_public() -> Result<()> {
    let server = TestServer::spawn().await?;

    let (status, body) = server.get_json("/", None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "fleet-api");

    let (status, body) = server.get_json("/health", None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    Ok(())
}

#[tokio::test]
async fn non_json_bodies_are_unsupported() -> Result<()> {
    let server = TestServer::spawn().await?;

    let res = server
        .client
        .post(server.url("/cargo_items"))
        .header("Content-Type", "text/plain")
        .body("fish")
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
    assert_eq!(res.json::<Value>().await?["status_code"], 415);
    Ok(())
}

#[tokio::test]
async fn non_json_accept_is_not_acceptable() -> Result<()> {
    let server = TestServer::spawn().await?;

    let res = server
        .client
        .get(server.url("/cargo_items"))
        .header("Accept", "text/html")
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::NOT_ACCEPTABLE);

    let res = server
        .client
        .get(server.url("/cargo_items"))
        .header("Accept", "text/html, application/json;q=0.9")
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    Ok(())
}

#[tokio::test]
async fn unsupported_methods_get_a_json_405() -> Result<()> {
    let server = TestServer::spawn().await?;

    for res in [
        server.client.delete(server.url("/cargo_items")).send().await?,
        server.client.put(server.url("/vessels")).bearer_auth("auth0|ada").send().await?,
        server.client.post(server.url("/users")).send().await?,
    ] {
        assert_eq!(res.status(), StatusCode::METHOD_NOT_ALLOWED);
        let body = res.json::<Value>().await?;
        assert_eq!(body["code"], "METHOD_NOT_ALLOWED");
    }
    Ok(())
}

#[tokio::test]
async fn unsupported_vessel_methods_are_405_without_a_token() -> Result<()> {
    let server = TestServer::spawn().await?;

    for res in [
        server.client.put(server.url("/vessels")).send().await?,
        server.client.post(server.url("/vessels/1")).send().await?,
        server.client.get(server.url("/vessels/1/cargo/2")).send().await?,
    ] {
        assert_eq!(res.status(), StatusCode::METHOD_NOT_ALLOWED);
    }

    let res = server.client.get(server.url("/vessels")).send().await?;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    Ok(())
}

#[tokio::test]
async fn unknown_paths_get_a_json_404() -> Result<()> {
    let server = TestServer::spawn().await?;
    let (status, body) = server.get_json("/boats", None).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], true);
    Ok(())
}

#[tokio::test]
async fn users_listing_embeds_vessel_summaries() -> Result<()> {
    let server = TestServer::spawn().await?;
    let vessel = server.create_vessel("auth0|ada", "Orca").await?;

    let (status, body) = server.get_json("/users?limit=1", None).await?;
    assert_eq!(status, StatusCode::OK);
    let user = &body["users"][0];
    assert_eq!(user["subject"], "auth0|ada");
    assert_eq!(user["vessels"][0]["id"], vessel["id"]);
    assert_eq!(user["vessels"][0]["name"], "Orca");
    assert_eq!(user["vessels"][0]["self"], vessel["self"]);
    Ok(())
}
