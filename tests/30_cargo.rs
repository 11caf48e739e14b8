mod common;

use anyhow::Result;
use reqwest::StatusCode;
use serde_json::{json, Value};

use common::{id_of, TestServer};

#[tokio::test]
async fn load_show_and_delete_flow() -> Result<()> {
    let server = TestServer::spawn().await?;
    let vessel = server.create_vessel("auth0|ada", "Orca").await?;
    let cargo = server.create_cargo("fish").await?;
    assert_eq!(cargo["carrier"], Value::Null);

    let cargo_path = format!("/cargo_items/{}", id_of(&cargo));
    let res = server
        .client
        .put(server.url(&format!("/vessels/{}/cargo/{}", id_of(&vessel), id_of(&cargo))))
        .bearer_auth("auth0|ada")
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::NO_CONTENT);

    let (_, loaded) = server.get_json(&cargo_path, None).await?;
    assert_eq!(loaded["carrier"]["id"], id_of(&vessel));
    assert_eq!(loaded["carrier"]["name"], "Orca");
    assert!(loaded["carrier"]["self"].as_str().is_some());

    let (_, carrier) = server.get_json(&format!("/vessels/{}", id_of(&vessel)), Some("auth0|ada")).await?;
    assert_eq!(carrier["cargo"][0]["id"], id_of(&cargo));
    assert_eq!(carrier["cargo"][0]["item"], "fish");

    let res = server
        .client
        .delete(server.url(&format!("/vessels/{}", id_of(&vessel))))
        .bearer_auth("auth0|ada")
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::NO_CONTENT);

    let (status, unloaded) = server.get_json(&cargo_path, None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(unloaded["carrier"], Value::Null);
    Ok(())
}

#[tokio::test]
async fn non_owner_cannot_load_cargo() -> Result<()> {
    let server = TestServer::spawn().await?;
    let vessel = server.create_vessel("auth0|ada", "Orca").await?;
    let cargo = server.create_cargo("fish").await?;

    let res = server
        .client
        .put(server.url(&format!("/vessels/{}/cargo/{}", id_of(&vessel), id_of(&cargo))))
        .bearer_auth("auth0|bob")
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    let (_, cargo) = server.get_json(&format!("/cargo_items/{}", id_of(&cargo)), None).await?;
    assert_eq!(cargo["carrier"], Value::Null);
    let (_, vessel) = server.get_json(&format!("/vessels/{}", id_of(&vessel)), Some("auth0|ada")).await?;
    assert_eq!(vessel["cargo"], json!([]));
    Ok(())
}

#[tokio::test]
async fn cargo_cannot_be_loaded_twice() -> Result<()> {
    let server = TestServer::spawn().await?;
    let orca = server.create_vessel("auth0|ada", "Orca").await?;
    let minke = server.create_vessel("auth0|ada", "Minke").await?;
    let cargo = server.create_cargo("fish").await?;

    let load = |vessel: &Value| {
        server
            .client
            .put(server.url(&format!("/vessels/{}/cargo/{}", id_of(vessel), id_of(&cargo))))
            .bearer_auth("auth0|ada")
            .send()
    };

    assert_eq!(load(&orca).await?.status(), StatusCode::NO_CONTENT);
    for vessel in [&orca, &minke] {
        let res = load(vessel).await?;
        assert_eq!(res.status(), StatusCode::FORBIDDEN);
        assert_eq!(res.json::<Value>().await?["code"], "ALREADY_CARRIED");
    }
    Ok(())
}

#[tokio::test]
async fn unloading_cargo_that_is_not_aboard_is_not_found() -> Result<()> {
    let server = TestServer::spawn().await?;
    let vessel = server.create_vessel("auth0|ada", "Orca").await?;
    let cargo = server.create_cargo("fish").await?;
    let path = format!("/vessels/{}/cargo/{}", id_of(&vessel), id_of(&cargo));

    let res = server.client.delete(server.url(&path)).bearer_auth("auth0|ada").send().await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    server.client.put(server.url(&path)).bearer_auth("auth0|ada").send().await?;
    let res = server.client.delete(server.url(&path)).bearer_auth("auth0|ada").send().await?;
    assert_eq!(res.status(), StatusCode::NO_CONTENT);

    let (_, cargo) = server.get_json(&format!("/cargo_items/{}", id_of(&cargo)), None).await?;
    assert_eq!(cargo["carrier"], Value::Null);
    Ok(())
}

#[tokio::test]
async fn deleting_cargo_removes_it_from_its_carrier() -> Result<()> {
    let server = TestServer::spawn().await?;
    let vessel = server.create_vessel("auth0|ada", "Orca").await?;
    let cargo = server.create_cargo("fish").await?;
    server
        .client
        .put(server.url(&format!("/vessels/{}/cargo/{}", id_of(&vessel), id_of(&cargo))))
        .bearer_auth("auth0|ada")
        .send()
        .await?;

    let res = server.client.delete(server.url(&format!("/cargo_items/{}", id_of(&cargo)))).send().await?;
    assert_eq!(res.status(), StatusCode::NO_CONTENT);

    let (_, vessel) = server.get_json(&format!("/vessels/{}", id_of(&vessel)), Some("auth0|ada")).await?;
    assert_eq!(vessel["cargo"], json!([]));
    let (status, _) = server.get_json(&format!("/cargo_items/{}", id_of(&cargo)), None).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn cargo_updates_keep_the_carrier() -> Result<()> {
    let server = TestServer::spawn().await?;
    let vessel = server.create_vessel("auth0|ada", "Orca").await?;
    let cargo = server.create_cargo("fish").await?;
    let path = format!("/cargo_items/{}", id_of(&cargo));
    server
        .client
        .put(server.url(&format!("/vessels/{}/cargo/{}", id_of(&vessel), id_of(&cargo))))
        .bearer_auth("auth0|ada")
        .send()
        .await?;

    let res = server
        .client
        .put(server.url(&path))
        .json(&json!({"volume": 20, "item": "salted fish", "creation_date": "2020-02-01"}))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let body = res.json::<Value>().await?;
    assert_eq!(body["item"], "salted fish");
    assert_eq!(body["carrier"]["id"], id_of(&vessel));

    let res = server.client.patch(server.url(&path)).json(&json!({"volume": 25})).send().await?;
    assert_eq!(res.status(), StatusCode::OK);
    let body = res.json::<Value>().await?;
    assert_eq!(body["volume"], 25.0);
    assert_eq!(body["item"], "salted fish");

    let res = server.client.patch(server.url(&path)).json(&json!({"carrier": null})).send().await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    Ok(())
}

#[tokio::test]
async fn cargo_listing_is_paginated() -> Result<()> {
    let server = TestServer::spawn().await?;
    for item in ["fish", "nets", "salt"] {
        server.create_cargo(item).await?;
    }

    let (status, page) = server.get_json("/cargo_items?limit=2", None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(page["cargo_items"].as_array().map(Vec::len), Some(2));
    assert_eq!(page["next_offset"], 2);

    let (_, rest) = server.get_json("/cargo_items?limit=2&offset=2", None).await?;
    assert_eq!(rest["cargo_items"][0]["item"], "salt");
    assert!(rest.get("next_offset").is_none());
    Ok(())
}
