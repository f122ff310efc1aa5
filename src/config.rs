use std::env;

use anyhow::Context;

#[derive(Debug, Clone)]
pub struct MailConfig {
    pub api_url: String,
    /// Delivery is disabled when no key is configured.
    pub api_key: Option<String>,
    pub from: String,
    pub admin_email: Option<String>,
    /// Upper bound on one provider request, connect included.
    pub timeout_secs: u64,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    pub jwt_secret: String,
    pub site_name: String,
    pub currency: String,
    pub catalog_max_age_secs: u32,
    pub cart_cookie_secure: bool,
    pub mail: MailConfig,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = env::var("DATABASE_URL").context("DATABASE_URL is not set")?;
        let jwt_secret = env::var("JWT_SECRET").context("JWT_SECRET is not set")?;
        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .ok()
            .and_then(|p| p.parse::<u16>().ok())
            .unwrap_or(3000);
        let site_name = env::var("SITE_NAME").unwrap_or_else(|_| "Tea Storefront".to_string());
        let currency = env::var("CURRENCY").unwrap_or_else(|_| "CZK".to_string());
        let catalog_max_age_secs = env::var("CATALOG_MAX_AGE_SECS")
            .ok()
            .and_then(|v| v.parse::<u32>().ok())
            .unwrap_or(300);
        let cart_cookie_secure = env::var("CART_COOKIE_SECURE")
            .map(|v| parse_flag(&v))
            .unwrap_or(false);

        let mail = MailConfig {
            api_url: env::var("MAIL_API_URL")
                .unwrap_or_else(|_| "https://api.resend.com/emails".to_string()),
            api_key: non_empty(env::var("MAIL_API_KEY").ok()),
            from: env::var("MAIL_FROM")
                .unwrap_or_else(|_| format!("{site_name} <noreply@localhost>")),
            admin_email: non_empty(env::var("ADMIN_EMAIL").ok()),
            timeout_secs: env::var("MAIL_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse::<u64>().ok())
                .filter(|secs| *secs > 0)
                .unwrap_or(10),
        };

        Ok(Self {
            database_url,
            host,
            port,
            jwt_secret,
            site_name,
            currency,
            catalog_max_age_secs,
            cart_cookie_secure,
            mail,
        })
    }
}

fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_accept_common_truthy_spellings() {
        assert!(parse_flag("true"));
        assert!(parse_flag(" YES "));
        assert!(parse_flag("1"));
        assert!(!parse_flag("0"));
        assert!(!parse_flag("nope"));
    }

    #[test]
    fn blank_optional_values_are_treated_as_missing() {
        assert_eq!(non_empty(Some("  ".into())), None);
        assert_eq!(non_empty(Some("key".into())), Some("key".into()));
        assert_eq!(non_empty(None), None);
    }
}
