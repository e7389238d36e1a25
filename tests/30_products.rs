mod common;

use anyhow::Result;
use reqwest::StatusCode;
use serde_json::{json, Value};

#[tokio::test]
async fn create_echoes_fields_with_a_generated_id() -> Result<()> {
    let server = common::ensure_server().await?;

    let product =
        common::create_product(server, json!({ "name": "Widget", "price": 9.99 })).await?;
    let id = product["id"].as_str().unwrap_or_default().to_string();
    assert!(!id.is_empty());
    assert_eq!(product, json!({ "name": "Widget", "price": 9.99, "id": id }));

    let res = reqwest::get(server.url(&format!("/v1/products/{}", id))).await?;
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(
        res.json::<Value>().await?,
        json!({ "name": "Widget", "price": 9.99, "id": id })
    );

    Ok(())
}

#[tokio::test]
async fn client_supplied_id_is_ignored() -> Result<()> {
    let server = common::ensure_server().await?;

    let product = common::create_product(server, json!({ "id": "mine", "name": "Gadget" })).await?;
    assert_ne!(product["id"], "mine");

    Ok(())
}

#[tokio::test]
async fn list_keeps_creation_order() -> Result<()> {
    let server = common::ensure_server().await?;

    let first = common::create_product(server, json!({ "name": "first" })).await?;
    let second = common::create_product(server, json!({ "name": "second" })).await?;

    let res = reqwest::get(server.url("/v1/products")).await?;
    assert_eq!(res.status(), StatusCode::OK);
    let list = res.json::<Vec<Value>>().await?;

    let position = |id: &Value| list.iter().position(|p| &p["id"] == id);
    let (a, b) = (position(&first["id"]), position(&second["id"]));
    assert!(a.is_some() && b.is_some(), "created products missing from list");
    assert!(a < b, "expected creation order, got {:?} then {:?}", a, b);

    Ok(())
}

#[tokio::test]
async fn replace_swaps_fields_but_keeps_id() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();
    let product = common::create_product(server, json!({ "name": "Lamp", "color": "red" })).await?;
    let id = product["id"].as_str().unwrap_or_default();

    let res = client
        .put(server.url(&format!("/v1/products/{}", id)))
        .json(&json!({ "id": "other", "name": "Desk lamp" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let body = res.json::<Value>().await?;
    assert_eq!(body, json!({ "id": id, "name": "Desk lamp" }));

    Ok(())
}

#[tokio::test]
async fn unknown_product_is_not_found() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    let res = client.get(server.url("/v1/products/missing")).send().await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    assert_eq!(res.json::<Value>().await?, json!({ "message": "Producto no encontrado" }));

    let res = client
        .put(server.url("/v1/products/missing"))
        .json(&json!({ "name": "ghost" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    Ok(())
}

#[tokio::test]
async fn delete_twice_reports_not_found_the_second_time() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();
    let product = common::create_product(server, json!({ "name": "Temp" })).await?;
    let url = server.url(&format!("/v1/products/{}", product["id"].as_str().unwrap_or_default()));

    assert_eq!(client.delete(&url).send().await?.status(), StatusCode::NO_CONTENT);

    let res = client.delete(&url).send().await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    assert_eq!(res.json::<Value>().await?["message"], "Producto no encontrado");

    Ok(())
}
