mod common;

use anyhow::Result;
use reqwest::StatusCode;
use serde_json::{json, Value};

#[tokio::test]
async fn create_returns_full_user_with_generated_id() -> Result<()> {
    let server = common::ensure_server().await?;

    let user = common::create_user(server, "Ana", 30, "ana@example.com").await?;
    assert!(user["id"].as_str().is_some_and(|id| !id.is_empty()), "missing id: {}", user);
    assert_eq!(user["name"], "Ana");
    assert_eq!(user["age"], 30);
    assert_eq!(user["email"], "ana@example.com");

    Ok(())
}

#[tokio::test]
async fn get_returns_only_id_and_name() -> Result<()> {
    let server = common::ensure_server().await?;
    let user = common::create_user(server, "Luis", 41, "luis@example.com").await?;
    let id = user["id"].as_str().unwrap_or_default();

    let res = reqwest::get(server.url(&format!("/v1/users/{}", id))).await?;
    assert_eq!(res.status(), StatusCode::OK);
    let body = res.json::<Value>().await?;
    assert_eq!(body, json!({ "id": id, "name": "Luis" }));

    Ok(())
}

#[tokio::test]
async fn update_overwrites_every_field() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();
    let user = common::create_user(server, "Marta", 25, "marta@example.com").await?;
    let id = user["id"].as_str().unwrap_or_default();

    let res = client
        .post(server.url(&format!("/v1/users/{}", id)))
        .json(&json!({ "name": "Marta R.", "age": 26, "email": "marta.r@example.com" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let body = res.json::<Value>().await?;
    assert_eq!(
        body,
        json!({ "id": id, "name": "Marta R.", "age": 26, "email": "marta.r@example.com" })
    );

    Ok(())
}

#[tokio::test]
async fn update_of_unknown_user_is_not_found() -> Result<()> {
    let server = common::ensure_server().await?;

    let res = reqwest::Client::new()
        .post(server.url("/v1/users/999999"))
        .json(&json!({ "name": "Nadie", "age": 1, "email": "nadie@example.com" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    let body = res.json::<Value>().await?;
    assert_eq!(body, json!({ "message": "Usuario no encontrado" }));

    Ok(())
}

#[tokio::test]
async fn delete_twice_reports_not_found_the_second_time() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();
    let user = common::create_user(server, "Pablo", 52, "pablo@example.com").await?;
    let url = server.url(&format!("/v1/users/{}", user["id"].as_str().unwrap_or_default()));

    let res = client.delete(&url).send().await?;
    assert_eq!(res.status(), StatusCode::NO_CONTENT);
    assert!(res.bytes().await?.is_empty());

    let res = client.delete(&url).send().await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    let body = res.json::<Value>().await?;
    assert_eq!(body["message"], "Usuario no encontrado");

    let res = client.get(&url).send().await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    Ok(())
}

#[tokio::test]
async fn ids_are_unique_across_creates() -> Result<()> {
    let server = common::ensure_server().await?;

    let mut ids = Vec::new();
    for i in 0..5 {
        let user = common::create_user(server, "Clon", i, "clon@example.com").await?;
        ids.push(user["id"].as_str().unwrap_or_default().to_string());
    }
    let mut unique = ids.clone();
    unique.sort();
    unique.dedup();
    assert_eq!(unique.len(), ids.len(), "duplicate ids: {:?}", ids);

    Ok(())
}
