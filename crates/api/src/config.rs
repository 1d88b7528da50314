//! Application configuration

use std::env;

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    // Server
    pub bind_address: String,
    pub public_url: String,
    pub client_origin: String,
    pub max_request_body_bytes: usize,

    // Authentication
    pub jwt_secret: String,
    pub jwt_expiry_hours: i64,

    // Image host
    pub image_upload_url: Option<String>,
    pub image_upload_api_key: Option<String>,

    // Feature flags
    pub enable_signup: bool,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            // Server
            bind_address: env::var("BIND_ADDRESS").unwrap_or_else(|_| "0.0.0.0:5001".to_string()),
            public_url: env::var("PUBLIC_URL")
                .unwrap_or_else(|_| "http://localhost:5001".to_string()),
            client_origin: env::var("CLIENT_ORIGIN")
                .unwrap_or_else(|_| "http://localhost:5173".to_string()),
            max_request_body_bytes: env::var("MAX_REQUEST_BODY_BYTES")
                .unwrap_or_else(|_| "10485760".to_string()) // 10MB, inline images are base64
                .parse()
                .unwrap_or(10_485_760),

            // Authentication
            jwt_secret: {
                let secret =
                    env::var("JWT_SECRET").map_err(|_| ConfigError::Missing("JWT_SECRET"))?;
                if secret.len() < 32 {
                    return Err(ConfigError::WeakSecret(
                        "JWT_SECRET must be at least 32 characters",
                    ));
                }
                secret
            },
            jwt_expiry_hours: env::var("JWT_EXPIRY_HOURS")
                .unwrap_or_else(|_| "168".to_string())
                .parse()
                .unwrap_or(168),

            // Image host (optional - image messages and avatars are rejected without it)
            image_upload_url: env::var("IMAGE_UPLOAD_URL").ok().filter(|v| !v.is_empty()),
            image_upload_api_key: env::var("IMAGE_UPLOAD_API_KEY").ok().filter(|v| !v.is_empty()),

            // Feature flags
            enable_signup: env::var("ENABLE_SIGNUP")
                .unwrap_or_else(|_| "true".to_string())
                .parse()
                .unwrap_or(true),
        })
    }

    /// Configuration for tests and local tooling, no environment involved
    pub fn for_secret(jwt_secret: impl Into<String>) -> Self {
        Self {
            bind_address: "127.0.0.1:0".to_string(),
            public_url: "http://localhost:5001".to_string(),
            client_origin: "http://localhost:5173".to_string(),
            max_request_body_bytes: 10_485_760,
            jwt_secret: jwt_secret.into(),
            jwt_expiry_hours: 168,
            image_upload_url: None,
            image_upload_api_key: None,
            enable_signup: true,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),
    #[error("Weak secret: {0}")]
    WeakSecret(&'static str),
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::env;

    const VARS: &[&str] = &[
        "JWT_SECRET",
        "JWT_EXPIRY_HOURS",
        "BIND_ADDRESS",
        "IMAGE_UPLOAD_URL",
        "IMAGE_UPLOAD_API_KEY",
        "ENABLE_SIGNUP",
        "MAX_REQUEST_BODY_BYTES",
    ];

    fn cleanup_config() {
        for var in VARS {
            env::remove_var(var);
        }
    }

    #[test]
    #[serial]
    fn test_missing_secret_fails() {
        cleanup_config();

        let result = Config::from_env();
        assert!(matches!(result, Err(ConfigError::Missing("JWT_SECRET"))));
    }

    #[test]
    #[serial]
    fn test_short_secret_rejected() {
        cleanup_config();
        env::set_var("JWT_SECRET", "too-short");

        let result = Config::from_env();
        assert!(matches!(result, Err(ConfigError::WeakSecret(_))));

        cleanup_config();
    }

    #[test]
    #[serial]
    fn test_defaults_and_fallbacks() {
        cleanup_config();
        env::set_var(
            "JWT_SECRET",
            "test-jwt-secret-must-be-at-least-32-characters-long",
        );
        env::set_var("JWT_EXPIRY_HOURS", "not-a-number");
        env::set_var("IMAGE_UPLOAD_URL", "");

        let config = Config::from_env().unwrap();
        assert_eq!(config.bind_address, "0.0.0.0:5001");
        assert_eq!(config.jwt_expiry_hours, 168);
        assert_eq!(config.max_request_body_bytes, 10_485_760);
        assert!(config.image_upload_url.is_none());
        assert!(config.enable_signup);

        cleanup_config();
    }

    #[test]
    #[serial]
    fn test_overrides() {
        cleanup_config();
        env::set_var(
            "JWT_SECRET",
            "test-jwt-secret-must-be-at-least-32-characters-long",
        );
        env::set_var("BIND_ADDRESS", "127.0.0.1:8080");
        env::set_var("IMAGE_UPLOAD_URL", "https://images.example/upload");
        env::set_var("ENABLE_SIGNUP", "false");

        let config = Config::from_env().unwrap();
        assert_eq!(config.bind_address, "127.0.0.1:8080");
        assert_eq!(
            config.image_upload_url.as_deref(),
            Some("https://images.example/upload")
        );
        assert!(!config.enable_signup);

        cleanup_config();
    }
}
