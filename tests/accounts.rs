mod common;

use serde_json::{json, Value};

#[tokio::test]
async fn account_crud_behind_the_gate() {
    let app = match common::spawn_app().await {
        Some(app) => app,
        None => return,
    };
    let token = app.token_for("admin").await;

    let response = app
        .client
        .post(app.url("/api/register-account"))
        .bearer_auth(&token)
        .json(&json!({
            "username": "dave",
            "email": "dave@example.com",
            "password": "password123",
            "full_name": "Dave Lee"
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(201, response.status().as_u16());
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["message"], "User created successfully.");
    assert_eq!(body["data"]["full_name"], "Dave Lee");
    assert!(body["data"].get("password").is_none());
    let id = body["data"]["id"].as_i64().unwrap();

    let response = app
        .client
        .post(app.url("/api/register-account"))
        .bearer_auth(&token)
        .json(&json!({"username": "dave", "email": "x@example.com", "password": "password123"}))
        .send()
        .await
        .unwrap();
    assert_eq!(400, response.status().as_u16());
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["message"], "User already exists (username or email).");

    let response = app
        .client
        .get(app.url("/api/fetch-all-accounts"))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(200, response.status().as_u16());
    let body: Value = response.json().await.unwrap();
    let users = body["data"].as_array().unwrap();
    assert_eq!(users.len(), 2);
    assert_eq!(users[0]["username"], "dave");

    let response = app
        .client
        .get(app.url(&format!("/api/retrieve-account/{}", id)))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(200, response.status().as_u16());

    let response = app
        .client
        .put(app.url(&format!("/api/modify-account/{}", id)))
        .bearer_auth(&token)
        .json(&json!({}))
        .send()
        .await
        .unwrap();
    assert_eq!(400, response.status().as_u16());

    let response = app
        .client
        .put(app.url(&format!("/api/modify-account/{}", id)))
        .bearer_auth(&token)
        .json(&json!({"phone": "555-0100"}))
        .send()
        .await
        .unwrap();
    assert_eq!(200, response.status().as_u16());
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["data"]["phone"], "555-0100");
    assert_eq!(body["data"]["full_name"], "Dave Lee");

    let response = app
        .client
        .delete(app.url(&format!("/api/remove-account/{}", id)))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(200, response.status().as_u16());

    for response in [
        app.client
            .get(app.url(&format!("/api/retrieve-account/{}", id)))
            .bearer_auth(&token)
            .send()
            .await
            .unwrap(),
        app.client
            .delete(app.url(&format!("/api/remove-account/{}", id)))
            .bearer_auth(&token)
            .send()
            .await
            .unwrap(),
    ] {
        assert_eq!(404, response.status().as_u16());
        let body: Value = response.json().await.unwrap();
        assert_eq!(body["message"], "User not found.");
    }
}
