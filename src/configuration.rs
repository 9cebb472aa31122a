use crate::auth::Keyring;

#[derive(Debug, Clone, serde::Deserialize)]
pub struct Settings {
    pub database: DatabaseSettings,
    pub app_port: u16,
    pub app_host: String,
    pub auth: AuthSettings,
}

#[derive(Debug, Clone, serde::Deserialize)]
pub struct DatabaseSettings {
    pub username: String,
    pub password: String,
    pub host: String,
    pub port: u16,
    pub database_name: String,
}

#[derive(Clone, serde::Deserialize)]
pub struct AuthSettings {
    /// Current signing secret.
    pub secret: String,
    /// Retired secrets still accepted for verification, newest first.
    #[serde(default)]
    pub previous_secrets: Vec<String>,
    #[serde(default = "default_issuer")]
    pub issuer: String,
    #[serde(default = "default_token_ttl")]
    pub token_ttl_secs: i64,
    #[serde(default = "default_bcrypt_cost")]
    pub bcrypt_cost: u32,
}

fn default_issuer() -> String {
    "localhost".to_string()
}

fn default_token_ttl() -> i64 {
    60 * 60
}

fn default_bcrypt_cost() -> u32 {
    bcrypt::DEFAULT_COST
}

impl std::fmt::Debug for AuthSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthSettings")
            .field("secret", &"****")
            .field("previous_secrets", &self.previous_secrets.len())
            .field("issuer", &self.issuer)
            .field("token_ttl_secs", &self.token_ttl_secs)
            .field("bcrypt_cost", &self.bcrypt_cost)
            .finish()
    }
}

impl AuthSettings {
    pub fn keyring(&self) -> Keyring {
        self.previous_secrets
            .iter()
            .fold(Keyring::new(self.secret.as_bytes()), |ring, secret| {
                ring.with_previous(secret.as_bytes())
            })
    }

    fn validate(&self) -> Result<(), config::ConfigError> {
        if self.secret.trim().is_empty() {
            return Err(config::ConfigError::Message(
                "auth.secret must not be empty".to_string(),
            ));
        }
        if self.previous_secrets.iter().any(|s| s.trim().is_empty()) {
            return Err(config::ConfigError::Message(
                "auth.previous_secrets must not contain empty secrets".to_string(),
            ));
        }
        if self.token_ttl_secs <= 0 {
            return Err(config::ConfigError::Message(
                "auth.token_ttl_secs must be positive".to_string(),
            ));
        }
        if !(4..=31).contains(&self.bcrypt_cost) {
            return Err(config::ConfigError::Message(
                "auth.bcrypt_cost must be between 4 and 31".to_string(),
            ));
        }
        Ok(())
    }
}

impl DatabaseSettings {
    // Connection string: postgresql://<username>:<password>@<host>:<port>/<database_name>
    pub fn connection_string(&self) -> String {
        format!(
            "postgresql://{}:{}@{}:{}/{}",
            self.username, self.password, self.host, self.port, self.database_name,
        )
    }

    pub fn connection_string_without_db(&self) -> String {
        format!(
            "postgresql://{}:{}@{}:{}",
            self.username, self.password, self.host, self.port,
        )
    }
}

pub fn get_configuration() -> Result<Settings, config::ConfigError> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // configuration.yaml first, then APP_* variables, e.g. APP_AUTH__SECRET
    let settings = config::Config::builder()
        .add_source(config::File::with_name("configuration"))
        .add_source(
            config::Environment::with_prefix("APP")
                .prefix_separator("_")
                .separator("__")
                .list_separator(",")
                .with_list_parse_key("auth.previous_secrets")
                .try_parsing(true),
        )
        .build()?;

    let settings: Settings = settings.try_deserialize()?;
    settings.auth.validate()?;

    Ok(settings)
}
