mod common;

use anyhow::Result;
use reqwest::StatusCode;
use serde_json::{json, Value};

use common::{id_of, TestServer};

#[tokio::test]
async fn create_and_fetch_vessel() -> Result<()> {
    let server = TestServer::spawn().await?;
    let vessel = server.create_vessel("auth0|ada", "Orca").await?;

    assert_eq!(vessel["name"], "Orca");
    assert_eq!(vessel["owner"], "auth0|ada");
    assert_eq!(vessel["cargo"], json!([]));
    let self_link = vessel["self"].as_str().expect("self link");
    assert!(self_link.ends_with(&format!("/vessels/{}", id_of(&vessel))), "{}", self_link);

    let (status, fetched) = server.get_json(&format!("/vessels/{}", id_of(&vessel)), Some("auth0|ada")).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched, vessel);
    Ok(())
}

#[tokio::test]
async fn missing_attributes_are_rejected() -> Result<()> {
    let server = TestServer::spawn().await?;

    let res = server
        .client
        .post(server.url("/vessels"))
        .bearer_auth("auth0|ada")
        .json(&json!({"name": "Orca"}))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    assert_eq!(res.json::<Value>().await?["code"], "INVALID_ATTRIBUTE");
    Ok(())
}

#[tokio::test]
async fn other_users_cannot_see_or_change_a_vessel() -> Result<()> {
    let server = TestServer::spawn().await?;
    let vessel = server.create_vessel("auth0|ada", "Orca").await?;
    let path = format!("/vessels/{}", id_of(&vessel));

    let (status, body) = server.get_json(&path, Some("auth0|bob")).await?;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["description"], "This vessel is owned by someone else.");

    let res = server.client.delete(server.url(&path)).bearer_auth("auth0|bob").send().await?;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    let (status, _) = server.get_json(&path, Some("auth0|ada")).await?;
    assert_eq!(status, StatusCode::OK);
    Ok(())
}

#[tokio::test]
async fn listing_is_scoped_to_the_owner_and_paginated() -> Result<()> {
    let server = TestServer::spawn().await?;
    for n in 0..5 {
        server.create_vessel("auth0|ada", &format!("Boat {}", n)).await?;
    }
    server.create_vessel("auth0|bob", "Not Ada's").await?;

    let (status, page) = server.get_json("/vessels?limit=2&offset=0", Some("auth0|ada")).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(page["vessels"].as_array().map(Vec::len), Some(2));
    assert_eq!(page["next_offset"], 2);
    assert!(page["next"].as_str().unwrap_or_default().ends_with("/vessels?limit=2&offset=2"));

    let (_, last) = server.get_json("/vessels?limit=2&offset=4", Some("auth0|ada")).await?;
    assert_eq!(last["vessels"].as_array().map(Vec::len), Some(1));
    assert!(last.get("next_offset").is_none());
    assert!(last.get("next").is_none());

    let (_, default_page) = server.get_json("/vessels", Some("auth0|ada")).await?;
    assert_eq!(default_page["vessels"].as_array().map(Vec::len), Some(5));
    assert!(default_page.get("next_offset").is_none());

    let (status, _) = server.get_json("/vessels?limit=0", Some("auth0|ada")).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    Ok(())
}

#[tokio::test]
async fn patch_merges_fields_and_loads_cargo() -> Result<()> {
    let server = TestServer::spawn().await?;
    let vessel = server.create_vessel("auth0|ada", "Orca").await?;
    let fish = server.create_cargo("fish").await?;
    let nets = server.create_cargo("nets").await?;

    let res = server
        .client
        .patch(server.url(&format!("/vessels/{}", id_of(&vessel))))
        .bearer_auth("auth0|ada")
        .json(&json!({"length": 31.0, "loads": [id_of(&fish), {"id": id_of(&nets)}]}))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);

    let body = res.json::<Value>().await?;
    assert_eq!(body["name"], "Orca");
    assert_eq!(body["length"], 31.0);
    let items: Vec<&str> = body["cargo"]
        .as_array()
        .expect("cargo array")
        .iter()
        .filter_map(|c| c["item"].as_str())
        .collect();
    assert_eq!(items, vec!["fish", "nets"]);
    Ok(())
}

#[tokio::test]
async fn patch_skips_cargo_carried_elsewhere() -> Result<()> {
    let server = TestServer::spawn().await?;
    let orca = server.create_vessel("auth0|ada", "Orca").await?;
    let minke = server.create_vessel("auth0|ada", "Minke").await?;
    let fish = server.create_cargo("fish").await?;
    let nets = server.create_cargo("nets").await?;

    let res = server
        .client
        .put(server.url(&format!("/vessels/{}/cargo/{}", id_of(&minke), id_of(&fish))))
        .bearer_auth("auth0|ada")
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::NO_CONTENT);

    let res = server
        .client
        .patch(server.url(&format!("/vessels/{}", id_of(&orca))))
        .bearer_auth("auth0|ada")
        .json(&json!({"cargo": [id_of(&fish), id_of(&nets)]}))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let body = res.json::<Value>().await?;
    assert_eq!(body["cargo"].as_array().map(Vec::len), Some(1));
    assert_eq!(body["cargo"][0]["id"], id_of(&nets));

    let (_, fish) = server.get_json(&format!("/cargo_items/{}", id_of(&fish)), None).await?;
    assert_eq!(fish["carrier"]["id"], id_of(&minke));
    Ok(())
}

#[tokio::test]
async fn put_replaces_fields_and_unloads_everything() -> Result<()> {
    let server = TestServer::spawn().await?;
    let vessel = server.create_vessel("auth0|ada", "Orca").await?;
    let fish = server.create_cargo("fish").await?;
    let vessel_path = format!("/vessels/{}", id_of(&vessel));

    server
        .client
        .put(server.url(&format!("{}/cargo/{}", vessel_path, id_of(&fish))))
        .bearer_auth("auth0|ada")
        .send()
        .await?;

    let res = server
        .client
        .put(server.url(&vessel_path))
        .bearer_auth("auth0|ada")
        .json(&json!({"name": "Orca II", "length": 30.0, "date_built": "2004-06-01"}))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let body = res.json::<Value>().await?;
    assert_eq!(body["name"], "Orca II");
    assert_eq!(body["cargo"], json!([]));

    let (_, fish) = server.get_json(&format!("/cargo_items/{}", id_of(&fish)), None).await?;
    assert_eq!(fish["carrier"], Value::Null);
    Ok(())
}

#[tokio::test]
async fn ownership_transfer_moves_the_vessel_between_users() -> Result<()> {
    let server = TestServer::spawn().await?;
    // Bob needs a user record before he can receive a vessel
    server.get_json("/vessels", Some("auth0|bob")).await?;
    let vessel = server.create_vessel("auth0|ada", "Orca").await?;
    let path = format!("/vessels/{}", id_of(&vessel));

    let res = server
        .client
        .patch(server.url(&path))
        .bearer_auth("auth0|ada")
        .json(&json!({"owner": "auth0|ada"}))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::CONFLICT);

    let res = server
        .client
        .patch(server.url(&path))
        .bearer_auth("auth0|ada")
        .json(&json!({"owner": "auth0|nobody"}))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    let res = server
        .client
        .patch(server.url(&path))
        .bearer_auth("auth0|ada")
        .json(&json!({"owner": "auth0|bob"}))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.json::<Value>().await?["owner"], "auth0|bob");

    let (status, _) = server.get_json(&path, Some("auth0|ada")).await?;
    assert_eq!(status, StatusCode::FORBIDDEN);
    let (status, _) = server.get_json(&path, Some("auth0|bob")).await?;
    assert_eq!(status, StatusCode::OK);

    let (_, users) = server.get_json("/users", None).await?;
    for user in users["users"].as_array().expect("users array") {
        let owned: Vec<u64> = user["vessels"]
            .as_array()
            .expect("vessels array")
            .iter()
            .filter_map(|v| v["id"].as_u64())
            .collect();
        match user["subject"].as_str() {
            Some("auth0|bob") => assert_eq!(owned, vec![id_of(&vessel)]),
            _ => assert!(owned.is_empty()),
        }
    }
    Ok(())
}

#[tokio::test]
async fn unknown_vessel_ids_are_not_found() -> Result<()> {
    let server = TestServer::spawn().await?;
    for path in ["/vessels/999", "/vessels/not-a-number"] {
        let (status, body) = server.get_json(path, Some("auth0|ada")).await?;
        assert_eq!(status, StatusCode::NOT_FOUND, "{}", path);
        assert_eq!(body["code"], "NOT_FOUND");
    }
    Ok(())
}

#[tokio::test]
async fn patch_skips_missing_cargo_and_keeps_other_changes() -> Result<()> {
    let server = TestServer::spawn().await?;
    server.get_json("/vessels", Some("auth0|bob")).await?;
    let vessel = server.create_vessel("auth0|ada", "Orca").await?;
    let fish = server.create_cargo("fish").await?;
    let path = format!("/vessels/{}", id_of(&vessel));

    let res = server
        .client
        .patch(server.url(&path))
        .bearer_auth("auth0|ada")
        .json(&json!({"name": "Renamed", "owner": "auth0|bob", "loads": [9999, id_of(&fish)]}))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let body = res.json::<Value>().await?;
    assert_eq!(body["name"], "Renamed");
    assert_eq!(body["owner"], "auth0|bob");

    let (status, stored) = server.get_json(&path, Some("auth0|bob")).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(stored, body);
    let cargo_ids: Vec<u64> = stored["cargo"]
        .as_array()
        .expect("cargo array")
        .iter()
        .filter_map(|c| c["id"].as_u64())
        .collect();
    assert_eq!(cargo_ids, vec![id_of(&fish)]);

    let (_, fish) = server.get_json(&format!("/cargo_items/{}", id_of(&fish)), None).await?;
    assert_eq!(fish["carrier"]["id"], id_of(&vessel));
    Ok(())
}
