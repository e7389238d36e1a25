mod common;

use anyhow::Result;
use reqwest::StatusCode;
use serde_json::{json, Value};

#[tokio::test]
async fn versions_share_one_store() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    let res = client
        .post(server.url("/v2/users"))
        .json(&json!({ "name": "Vera", "age": 33, "email": "vera@example.com" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::CREATED);
    let id = res.json::<Value>().await?["id"].as_str().unwrap_or_default().to_string();

    let res = client.get(server.url(&format!("/v1/users/{}", id))).send().await?;
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.json::<Value>().await?["name"], "Vera");

    Ok(())
}

#[tokio::test]
async fn products_created_on_v1_are_served_by_v2() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    let product = common::create_product(server, json!({ "name": "Shared", "stock": 3 })).await?;
    let id = product["id"].as_str().unwrap_or_default();

    let res = client.get(server.url(&format!("/v2/products/{}", id))).send().await?;
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.json::<Value>().await?, product);

    let res = client.get(server.url("/v2/products")).send().await?;
    let list = res.json::<Vec<Value>>().await?;
    assert!(list.iter().any(|p| p["id"] == id), "v2 list is missing {}", id);

    let res = client.delete(server.url(&format!("/v2/products/{}", id))).send().await?;
    assert_eq!(res.status(), StatusCode::NO_CONTENT);
    let res = client.get(server.url(&format!("/v1/products/{}", id))).send().await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    Ok(())
}

#[tokio::test]
async fn responses_name_the_serving_version() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    for version in ["v1", "v2"] {
        let res = client.get(server.url(&format!("/{}/hello", version))).send().await?;
        assert_eq!(
            res.headers().get("x-api-version").and_then(|v| v.to_str().ok()),
            Some(version)
        );

        let res = client
            .get(server.url(&format!("/{}/products/nope", version)))
            .send()
            .await?;
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            res.headers().get("x-api-version").and_then(|v| v.to_str().ok()),
            Some(version)
        );
    }

    Ok(())
}

#[tokio::test]
async fn unknown_version_is_not_found() -> Result<()> {
    let server = common::ensure_server().await?;

    let res = reqwest::get(server.url("/v3/hello")).await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    Ok(())
}
