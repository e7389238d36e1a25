mod common;

use anyhow::Result;
use reqwest::StatusCode;
use serde_json::{json, Value};

#[tokio::test]
async fn hello_greets_on_both_versions() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    for prefix in ["/v1", "/v2"] {
        let res = client.get(server.url(&format!("{}/hello", prefix))).send().await?;
        assert_eq!(res.status(), StatusCode::OK);
        let body = res.json::<Value>().await?;
        assert_eq!(body, json!({ "message": "Hello world" }));
    }

    Ok(())
}

#[tokio::test]
async fn unversioned_paths_are_not_mounted() -> Result<()> {
    let server = common::ensure_server().await?;

    let res = reqwest::get(server.url("/hello")).await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    let body = res.json::<Value>().await?;
    assert_eq!(body["message"], "not found");

    Ok(())
}
