use anyhow::Result;
use std::env;

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub jwt_secret: String,
    pub jwt_expiration_days: i64,
    pub host: String,
    pub port: u16,
    pub environment: String,
    pub client_base_url: String,
    pub mail: MailConfig,
    pub media_storage: MediaStorageConfig,
}

/// Credentials for the transactional-email HTTP API. Passed into the mailer
/// at construction; nothing reads these from the environment afterwards.
#[derive(Debug, Clone)]
pub struct MailConfig {
    pub api_url: String,
    pub api_key: String,
    pub sender_name: String,
    pub sender_email: String,
}

/// Credentials for the hosted media store that keeps leave attachments.
#[derive(Debug, Clone)]
pub struct MediaStorageConfig {
    pub cloud_name: String,
    pub api_key: String,
    pub api_secret: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        // Load .env file if it exists
        dotenvy::dotenv().ok();

        Ok(Config {
            database_url: env::var("DATABASE_URL")
                .unwrap_or_else(|_| "postgres://@localhost:5432/leavehub".to_string()),
            jwt_secret: env::var("JWT_SECRET").unwrap_or_else(|_| {
                "your-super-secret-jwt-key-change-this-in-production-12345".to_string()
            }),
            jwt_expiration_days: env::var("JWT_EXPIRATION_DAYS")
                .unwrap_or_else(|_| "7".to_string())
                .parse()
                .unwrap_or(7),
            host: env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "8000".to_string())
                .parse()
                .unwrap_or(8000),
            environment: env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string()),
            client_base_url: env::var("CLIENT_URL")
                .unwrap_or_else(|_| "http://localhost:3000".to_string()),
            mail: MailConfig {
                api_url: env::var("MAIL_API_URL")
                    .unwrap_or_else(|_| "https://api.brevo.com/v3/smtp/email".to_string()),
                api_key: env::var("MAIL_API_KEY").unwrap_or_default(),
                sender_name: env::var("MAIL_SENDER_NAME")
                    .unwrap_or_else(|_| "Leave App".to_string()),
                sender_email: env::var("MAIL_SENDER_EMAIL")
                    .unwrap_or_else(|_| "no-reply@leavehub.local".to_string()),
            },
            media_storage: MediaStorageConfig {
                cloud_name: env::var("CLOUD_NAME").unwrap_or_default(),
                api_key: env::var("CLOUD_API_KEY").unwrap_or_default(),
                api_secret: env::var("CLOUD_API_SECRET").unwrap_or_default(),
            },
        })
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }

    pub fn server_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
