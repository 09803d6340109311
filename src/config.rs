use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Postgres connection string. Optional: when absent the service runs
    /// email-only and inquiries are not persisted.
    pub database_url: Option<String>,
    pub port: u16,
    /// SMTP account the emails are sent from. Also the default notification
    /// recipient unless `admin_email` overrides it.
    pub smtp_email: String,
    pub smtp_app_password: String,
    pub smtp_relay: String,
    /// Where admin notifications are delivered.
    pub admin_email: String,
    pub ping_message: Option<String>,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let smtp_email = std::env::var("SMTP_EMAIL")
            .or_else(|_| std::env::var("GMAIL_EMAIL"))
            .map_err(|_| {
                anyhow::anyhow!("SMTP_EMAIL or GMAIL_EMAIL environment variable required")
            })
            .and_then(|v| {
                if v.trim().is_empty() {
                    anyhow::bail!("SMTP_EMAIL cannot be empty");
                }
                Ok(v)
            })?;

        let config = Self {
            database_url: std::env::var("DATABASE_URL")
                .ok()
                .filter(|s| !s.trim().is_empty())
                .map(|url| {
                    if !url.starts_with("postgresql://") && !url.starts_with("postgres://") {
                        anyhow::bail!("DATABASE_URL must start with postgresql:// or postgres://");
                    }
                    Ok(url)
                })
                .transpose()?,
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("PORT must be a valid number between 1-65535"))?,
            smtp_app_password: std::env::var("SMTP_APP_PASSWORD")
                .or_else(|_| std::env::var("GMAIL_APP_PASSWORD"))
                .map_err(|_| {
                    anyhow::anyhow!(
                        "SMTP_APP_PASSWORD or GMAIL_APP_PASSWORD environment variable required"
                    )
                })
                .and_then(|v| {
                    if v.trim().is_empty() {
                        anyhow::bail!("SMTP_APP_PASSWORD cannot be empty");
                    }
                    Ok(v)
                })?,
            smtp_relay: std::env::var("SMTP_RELAY")
                .ok()
                .filter(|s| !s.trim().is_empty())
                .unwrap_or_else(|| "smtp.gmail.com".to_string()),
            admin_email: std::env::var("ADMIN_EMAIL")
                .ok()
                .filter(|s| !s.trim().is_empty())
                .unwrap_or_else(|| smtp_email.clone()),
            ping_message: std::env::var("PING_MESSAGE")
                .ok()
                .filter(|s| !s.trim().is_empty()),
            smtp_email,
        };

        // Log successful configuration load (without sensitive values)
        tracing::info!("Configuration loaded successfully");
        if let Some(ref url) = config.database_url {
            tracing::debug!("Database URL: {}...", &url[..20.min(url.len())]);
        } else {
            tracing::warn!("DATABASE_URL not set - inquiries will not be persisted");
        }
        tracing::debug!("SMTP relay: {}", config.smtp_relay);
        tracing::debug!("Server Port: {}", config.port);

        Ok(config)
    }
}
