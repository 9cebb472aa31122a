#![allow(dead_code)]

use account_api::configuration::{get_configuration, DatabaseSettings, Settings};
use serde_json::{json, Value};
use sqlx::{Connection, Executor, PgConnection, PgPool};

pub const TEST_SECRET: &str = "integration-test-secret";

pub struct TestApp {
    pub address: String,
    pub db_pool: PgPool,
    pub settings: Settings,
    pub client: reqwest::Client,
}

pub fn test_configuration() -> Settings {
    let mut configuration = get_configuration().expect("Failed to get configuration");
    configuration.database.database_name = uuid::Uuid::new_v4().to_string();
    configuration.auth.secret = TEST_SECRET.to_string();
    configuration.auth.previous_secrets = vec![];
    configuration.auth.bcrypt_cost = 4;
    configuration
}

/// Starts the server on a random port against a fresh database.
/// `None` when Postgres is not reachable.
pub async fn spawn_app() -> Option<TestApp> {
    spawn_app_with_configuration(test_configuration()).await
}

pub async fn spawn_app_with_configuration(configuration: Settings) -> Option<TestApp> {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("Failed to bind random port");
    let port = listener.local_addr().unwrap().port();
    let address = format!("http://127.0.0.1:{}", port);

    let connection_pool = match configure_database(&configuration.database).await {
        Ok(pool) => pool,
        Err(err) => {
            eprintln!("Skipping tests: failed to connect to postgres: {}", err);
            return None;
        }
    };

    let server = account_api::startup::run(listener, connection_pool.clone(), configuration.clone())
        .await
        .expect("Failed to bind address.");
    let _ = tokio::spawn(server);

    Some(TestApp {
        address,
        db_pool: connection_pool,
        settings: configuration,
        client: reqwest::Client::new(),
    })
}

pub async fn configure_database(config: &DatabaseSettings) -> Result<PgPool, sqlx::Error> {
    let mut connection = PgConnection::connect(&config.connection_string_without_db()).await?;

    connection
        .execute(format!(r#"CREATE DATABASE "{}""#, config.database_name).as_str())
        .await?;

    let connection_pool = PgPool::connect(&config.connection_string()).await?;

    sqlx::migrate!("./migrations").run(&connection_pool).await?;

    Ok(connection_pool)
}

impl TestApp {
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.address, path)
    }

    pub async fn signup(&self, username: &str, email: &str, password: &str) -> reqwest::Response {
        self.client
            .post(self.url("/auth/signup"))
            .json(&json!({"username": username, "email": email, "password": password}))
            .send()
            .await
            .expect("Failed to execute request.")
    }

    pub async fn login(&self, body: Value) -> reqwest::Response {
        self.client
            .post(self.url("/auth/login"))
            .json(&body)
            .send()
            .await
            .expect("Failed to execute request.")
    }

    /// Signs up a fresh user and returns its bearer token.
    pub async fn token_for(&self, username: &str) -> String {
        let email = format!("{}@example.com", username);
        let response = self.signup(username, &email, "password123").await;
        assert_eq!(201, response.status().as_u16());

        let response = self
            .login(json!({"email": email, "password": "password123"}))
            .await;
        assert_eq!(200, response.status().as_u16());
        let body: Value = response.json().await.unwrap();
        body["data"]["token"].as_str().unwrap().to_string()
    }
}
