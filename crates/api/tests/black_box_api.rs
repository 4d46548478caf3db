use chrono::Utc;
use jsonwebtoken::{Algorithm, EncodingKey, Header};
use reqwest::StatusCode;
use serde_json::json;

use prepdeck_api::app::build_app;
use prepdeck_api::config::ApiConfig;
use prepdeck_auth::verifier::WireClaims;

struct TestServer {
    base_url: String,
    handle: tokio::task::JoinHandle<()>,
}

impl TestServer {
    async fn spawn(jwt_secret: &str) -> Self {
        // Build app (same router as prod), but bind to an ephemeral port.
        let app = build_app(ApiConfig::for_tests(jwt_secret)).await;
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind ephemeral port");
        let addr = listener.local_addr().unwrap();
        let base_url = format!("http://{}/api", addr);

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { base_url, handle }
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

fn mint_jwt(jwt_secret: &str, subject: &str, role: &str) -> String {
    let now = Utc::now().timestamp();
    let claims = WireClaims {
        sub: subject.to_string(),
        email: Some(format!("{subject}@example.com")),
        role: role.to_string(),
        iat: now - 60,
        exp: now + 600,
    };

    jsonwebtoken::encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(jwt_secret.as_bytes()),
    )
    .expect("failed to encode jwt")
}

async fn register_account(
    client: &reqwest::Client,
    base_url: &str,
    token: &str,
    display_name: &str,
) -> serde_json::Value {
    let res = client
        .post(format!("{}/accounts/register", base_url))
        .bearer_auth(token)
        .json(&json!({ "display_name": display_name }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
    res.json().await.unwrap()
}

#[tokio::test]
async fn auth_required_for_protected_endpoints() {
    let jwt_secret = "test-secret";
    let srv = TestServer::spawn(jwt_secret).await;

    let client = reqwest::Client::new();
    let res = client
        .get(format!("{}/whoami", srv.base_url))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["success"], json!(false));
    assert_eq!(body["error"]["code"], json!("unauthorized"));
}

#[tokio::test]
async fn health_check_is_public() {
    let srv = TestServer::spawn("test-secret").await;

    let client = reqwest::Client::new();
    let res = client
        .get(format!("{}/health", srv.base_url))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::OK);
}

#[tokio::test]
async fn whoami_echoes_the_token_claims() {
    let jwt_secret = "test-secret";
    let srv = TestServer::spawn(jwt_secret).await;
    let token = mint_jwt(jwt_secret, "subject-1", "pro");

    let client = reqwest::Client::new();
    let res = client
        .get(format!("{}/whoami", srv.base_url))
        .bearer_auth(token)
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::OK);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["success"], json!(true));
    assert_eq!(body["data"]["principal_id"], json!("subject-1"));
    assert_eq!(body["data"]["role"], json!("pro"));
}

#[tokio::test]
async fn admin_routes_are_gated_on_the_admin_role() {
    let jwt_secret = "test-secret";
    let srv = TestServer::spawn(jwt_secret).await;
    let client = reqwest::Client::new();

    let user_token = mint_jwt(jwt_secret, "subject-1", "pro");
    let res = client
        .get(format!("{}/admin/stats", srv.base_url))
        .bearer_auth(&user_token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::FORBIDDEN);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["success"], json!(false));
    assert_eq!(body["error"]["code"], json!("forbidden"));

    let admin_token = mint_jwt(jwt_secret, "admin-1", "admin");
    let res = client
        .get(format!("{}/admin/stats", srv.base_url))
        .bearer_auth(&admin_token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["success"], json!(true));
    assert!(body["data"]["total_accounts"].is_number());
}

#[tokio::test]
async fn admin_restart_acknowledges_without_restarting() {
    let jwt_secret = "test-secret";
    let srv = TestServer::spawn(jwt_secret).await;
    let token = mint_jwt(jwt_secret, "admin-1", "admin");

    let client = reqwest::Client::new();
    let res = client
        .post(format!("{}/admin/system/restart", srv.base_url))
        .bearer_auth(token)
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::OK);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["success"], json!(true));
    assert_eq!(body["message"], json!("restart scheduled"));
    assert_eq!(body["data"], json!(null));

    // The server is demonstrably still up.
    let res = client
        .get(format!("{}/health", srv.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
}

#[tokio::test]
async fn quota_reflects_the_pro_tier_figures() {
    let jwt_secret = "test-secret";
    let srv = TestServer::spawn(jwt_secret).await;
    let token = mint_jwt(jwt_secret, "subject-1", "pro");

    let client = reqwest::Client::new();
    let res = client
        .get(format!("{}/quota", srv.base_url))
        .bearer_auth(token)
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::OK);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["data"]["tier"], json!("pro"));
    assert_eq!(body["data"]["limit"], json!(100_000));
    assert_eq!(body["data"]["used"], json!(23_456));
    assert_eq!(body["data"]["remaining"], json!(76_544));
    let percentage = body["data"]["percentage"].as_f64().unwrap();
    assert!((percentage - 23.456).abs() < 1e-9);
}

#[tokio::test]
async fn quota_history_is_an_empty_placeholder() {
    let jwt_secret = "test-secret";
    let srv = TestServer::spawn(jwt_secret).await;
    let token = mint_jwt(jwt_secret, "subject-1", "free");

    let client = reqwest::Client::new();
    let res = client
        .get(format!("{}/quota/history", srv.base_url))
        .bearer_auth(token)
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::OK);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["data"]["entries"], json!([]));
}

#[tokio::test]
async fn settings_round_trip_for_a_registered_account() {
    let jwt_secret = "test-secret";
    let srv = TestServer::spawn(jwt_secret).await;
    let token = mint_jwt(jwt_secret, "subject-1", "standard");
    let client = reqwest::Client::new();

    // Settings before registration answer with the 404 envelope.
    let res = client
        .get(format!("{}/config", srv.base_url))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["error"]["code"], json!("account_not_registered"));

    register_account(&client, &srv.base_url, &token, "Ada").await;

    let res = client
        .put(format!("{}/config", srv.base_url))
        .bearer_auth(&token)
        .json(&json!({ "theme": "dark", "locale": "en" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let res = client
        .get(format!("{}/config", srv.base_url))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["data"]["theme"], json!("dark"));
    assert_eq!(body["data"]["locale"], json!("en"));
}

#[tokio::test]
async fn advanced_settings_are_gated_to_paid_tiers() {
    let jwt_secret = "test-secret";
    let srv = TestServer::spawn(jwt_secret).await;
    let client = reqwest::Client::new();

    let free_token = mint_jwt(jwt_secret, "free-user", "free");
    register_account(&client, &srv.base_url, &free_token, "Freeloader").await;

    let res = client
        .get(format!("{}/config/advanced", srv.base_url))
        .bearer_auth(&free_token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::FORBIDDEN);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["error"]["code"], json!("tier_required"));

    let pro_token = mint_jwt(jwt_secret, "pro-user", "pro");
    register_account(&client, &srv.base_url, &pro_token, "Pro").await;

    let res = client
        .put(format!("{}/config/advanced", srv.base_url))
        .bearer_auth(&pro_token)
        .json(&json!({ "webhooks": { "enabled": true } }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let res = client
        .get(format!("{}/config/advanced", srv.base_url))
        .bearer_auth(&pro_token)
        .send()
        .await
        .unwrap();
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["data"]["webhooks"]["enabled"], json!(true));
}

#[tokio::test]
async fn subscription_lifecycle_over_http() {
    let jwt_secret = "test-secret";
    let srv = TestServer::spawn(jwt_secret).await;
    let token = mint_jwt(jwt_secret, "subject-1", "pro");
    let client = reqwest::Client::new();

    register_account(&client, &srv.base_url, &token, "Ada").await;

    // The dev profile seeds the plan catalog at startup.
    let res = client
        .get(format!("{}/plans", srv.base_url))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: serde_json::Value = res.json().await.unwrap();
    let plans = body["data"].as_array().unwrap();
    assert_eq!(plans.len(), 3);
    let pro_plan_id = plans
        .iter()
        .find(|p| p["tier"] == json!("pro"))
        .unwrap()["id"]
        .as_i64()
        .unwrap();
    let standard_plan_id = plans
        .iter()
        .find(|p| p["tier"] == json!("standard"))
        .unwrap()["id"]
        .as_i64()
        .unwrap();

    // Start.
    let res = client
        .post(format!("{}/subscriptions", srv.base_url))
        .bearer_auth(&token)
        .json(&json!({ "plan_id": pro_plan_id }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
    let body: serde_json::Value = res.json().await.unwrap();
    let subscription_id = body["data"]["id"].as_i64().unwrap();
    assert_eq!(body["data"]["status"], json!("active"));

    // Use a credit: the stub succeeds with a null receipt.
    let res = client
        .post(format!(
            "{}/subscriptions/{}/use",
            srv.base_url, subscription_id
        ))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["success"], json!(true));
    assert_eq!(body["data"], json!(null));

    // Change plan.
    let res = client
        .post(format!(
            "{}/subscriptions/{}/change-plan",
            srv.base_url, subscription_id
        ))
        .bearer_auth(&token)
        .json(&json!({ "plan_id": standard_plan_id }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    // Changing to the same plan conflicts.
    let res = client
        .post(format!(
            "{}/subscriptions/{}/change-plan",
            srv.base_url, subscription_id
        ))
        .bearer_auth(&token)
        .json(&json!({ "plan_id": standard_plan_id }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CONFLICT);

    // Cancel.
    let res = client
        .post(format!(
            "{}/subscriptions/{}/cancel",
            srv.base_url, subscription_id
        ))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["data"]["status"], json!("canceled"));
}

#[tokio::test]
async fn missing_app_answers_with_the_not_found_envelope() {
    let jwt_secret = "test-secret";
    let srv = TestServer::spawn(jwt_secret).await;
    let token = mint_jwt(jwt_secret, "subject-1", "free");

    let client = reqwest::Client::new();
    let res = client
        .get(format!("{}/apps/999", srv.base_url))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["success"], json!(false));
    assert_eq!(body["error"]["code"], json!("not_found"));
}

#[tokio::test]
async fn app_catalog_register_and_update() {
    let jwt_secret = "test-secret";
    let srv = TestServer::spawn(jwt_secret).await;
    let token = mint_jwt(jwt_secret, "subject-1", "pro");
    let client = reqwest::Client::new();

    let res = client
        .post(format!("{}/apps", srv.base_url))
        .bearer_auth(&token)
        .json(&json!({ "name": "Mock Interview Max", "description": "practice rounds" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
    let body: serde_json::Value = res.json().await.unwrap();
    let app_id = body["data"]["id"].as_i64().unwrap();

    let res = client
        .put(format!("{}/apps/{}", srv.base_url, app_id))
        .bearer_auth(&token)
        .json(&json!({ "name": "Mock Interview Max", "description": "more practice rounds" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["data"]["description"], json!("more practice rounds"));
}
