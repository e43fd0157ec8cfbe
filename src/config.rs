use serde::{Deserialize, Serialize};
use std::env;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    // API gateway configuration
    pub api_base_url: String,
    pub request_timeout_secs: u64,
    pub environment: String,
    pub log_level: String,

    // Notification polling
    pub unread_poll_interval_secs: u64,
    pub notification_page_limit: usize,

    // Content settings
    pub max_comment_length: usize,
    pub max_reply_depth: usize,
    pub max_report_reason_length: usize,

    // Session persistence
    pub session_file: Option<String>,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenv::dotenv().ok();

        Ok(Config {
            api_base_url: env::var("CURIO_API_BASE_URL")
                .unwrap_or_else(|_| "http://localhost:5000/api".to_string()),
            request_timeout_secs: env::var("CURIO_REQUEST_TIMEOUT")
                .unwrap_or_else(|_| "15".to_string())
                .parse()?,
            environment: env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string()),
            log_level: env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),

            unread_poll_interval_secs: env::var("CURIO_UNREAD_POLL_INTERVAL")
                .unwrap_or_else(|_| "30".to_string())
                .parse()?,
            notification_page_limit: env::var("CURIO_NOTIFICATION_PAGE_LIMIT")
                .unwrap_or_else(|_| "20".to_string())
                .parse()?,

            max_comment_length: env::var("CURIO_MAX_COMMENT_LENGTH")
                .unwrap_or_else(|_| "10000".to_string())
                .parse()?,
            max_reply_depth: env::var("CURIO_MAX_REPLY_DEPTH")
                .unwrap_or_else(|_| "3".to_string())
                .parse()?,
            max_report_reason_length: env::var("CURIO_MAX_REPORT_REASON_LENGTH")
                .unwrap_or_else(|_| "500".to_string())
                .parse()?,

            session_file: env::var("CURIO_SESSION_FILE").ok(),
        })
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: "http://localhost:5000/api".to_string(),
            request_timeout_secs: 15,
            environment: "development".to_string(),
            log_level: "info".to_string(),
            unread_poll_interval_secs: 30,
            notification_page_limit: 20,
            max_comment_length: 10000,
            max_reply_depth: 3,
            max_report_reason_length: 500,
            session_file: None,
        }
    }
}
