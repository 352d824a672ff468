use serde::Deserialize;
use std::env;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub jwt: JwtConfig,
    pub mysql: MysqlConfig,
    pub database_url: Option<String>,
    pub identity: IdentityConfig,
    pub storage: StorageConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    pub expiration_hours: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MysqlConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub database: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IdentityBackend {
    Supabase,
    Local,
}

#[derive(Debug, Clone, Deserialize)]
pub struct IdentityConfig {
    pub backend: IdentityBackend,
    pub supabase_url: String,
    pub supabase_anon_key: String,
    /// Public origin of the web front end, used to build the link embedded in
    /// confirmation emails.
    pub site_url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    pub profile_image_bucket: String,
    pub post_image_bucket: String,
    pub local_public_url: String,
}

impl Config {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenv::dotenv().ok();

        let backend = match env::var("IDENTITY_BACKEND")
            .unwrap_or_else(|_| "supabase".to_string())
            .to_lowercase()
            .as_str()
        {
            "supabase" => IdentityBackend::Supabase,
            "local" => IdentityBackend::Local,
            other => anyhow::bail!("Unknown IDENTITY_BACKEND: {}", other),
        };

        Ok(Config {
            server: ServerConfig {
                host: env::var("SERVER_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
                port: env::var("SERVER_PORT")
                    .unwrap_or_else(|_| "8080".to_string())
                    .parse()
                    .unwrap_or(8080),
            },
            jwt: JwtConfig {
                secret: env::var("JWT_SECRET")
                    .unwrap_or_else(|_| "your-secret-key-change-this".to_string()),
                expiration_hours: env::var("JWT_EXPIRATION_HOURS")
                    .unwrap_or_else(|_| "168".to_string())
                    .parse()
                    .unwrap_or(168),
            },
            mysql: MysqlConfig {
                host: env::var("MYSQL_HOST").unwrap_or_else(|_| "localhost".to_string()),
                port: env::var("MYSQL_PORT")
                    .unwrap_or_else(|_| "3306".to_string())
                    .parse()
                    .unwrap_or(3306),
                user: env::var("MYSQL_USER").unwrap_or_else(|_| "root".to_string()),
                password: env::var("MYSQL_PASSWORD").unwrap_or_else(|_| "password".to_string()),
                database: env::var("MYSQL_DATABASE").unwrap_or_else(|_| "beer_salon".to_string()),
            },
            database_url: env::var("DATABASE_URL").ok(),
            identity: IdentityConfig {
                backend,
                supabase_url: env::var("SUPABASE_URL")
                    .unwrap_or_else(|_| "http://localhost:54321".to_string()),
                supabase_anon_key: env::var("SUPABASE_ANON_KEY").unwrap_or_default(),
                site_url: env::var("SITE_URL")
                    .unwrap_or_else(|_| "http://localhost:3000".to_string()),
            },
            storage: StorageConfig {
                profile_image_bucket: env::var("PROFILE_IMAGE_BUCKET")
                    .unwrap_or_else(|_| "profile-images".to_string()),
                post_image_bucket: env::var("POST_IMAGE_BUCKET")
                    .unwrap_or_else(|_| "post-images".to_string()),
                local_public_url: env::var("LOCAL_STORAGE_PUBLIC_URL")
                    .unwrap_or_else(|_| "http://localhost:8080/storage".to_string()),
            },
        })
    }

    /// Connection string for the relational store. `DATABASE_URL` wins over
    /// the individual MySQL settings.
    pub fn database_url(&self) -> String {
        if let Some(url) = &self.database_url {
            return url.clone();
        }
        format!(
            "mysql://{}:{}@{}:{}/{}",
            self.mysql.user,
            self.mysql.password,
            self.mysql.host,
            self.mysql.port,
            self.mysql.database
        )
    }

    /// Where the identity provider should send the user after they click the
    /// confirmation link.
    pub fn confirmation_redirect(&self) -> String {
        format!(
            "{}{}",
            self.identity.site_url.trim_end_matches('/'),
            crate::services::registration::PROFILE_DRAFT_PATH
        )
    }
}
