use std::{fmt, str::FromStr, time::Duration};

use anyhow::{anyhow, bail, Context as _};

pub const DEFAULT_ALLOWED_ORIGIN: &str = "http://localhost:3001";

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub database: DatabaseConfig,
    pub watchdog: WatchdogConfig,
    pub allowed_origins: Vec<String>,
    pub notify: NotifyConfig,
}

#[derive(Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub acquire_timeout: Duration,
}

#[derive(Debug, Clone)]
pub struct WatchdogConfig {
    pub interval: Duration,
    pub max_failures: u32,
}

#[derive(Debug, Clone)]
pub enum NotifyConfig {
    Smtp(SmtpConfig),
    Webhook(WebhookConfig),
    None,
}

#[derive(Clone)]
pub struct SmtpConfig {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    pub from: String,
    pub to: String,
}

#[derive(Clone)]
pub struct WebhookConfig {
    pub url: String,
    pub token: Option<String>,
    pub timeout: Duration,
}

// Connection strings and secrets never reach the logs through `{:?}`.
impl fmt::Debug for DatabaseConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DatabaseConfig")
            .field("url", &"<redacted>")
            .field("max_connections", &self.max_connections)
            .field("acquire_timeout", &self.acquire_timeout)
            .finish()
    }
}

impl fmt::Debug for SmtpConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SmtpConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("from", &self.from)
            .field("to", &self.to)
            .finish()
    }
}

impl fmt::Debug for WebhookConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WebhookConfig")
            .field("url", &self.url)
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from any key-value source. Empty values
    /// count as unset.
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let env = Env(lookup);

        let database = DatabaseConfig {
            url: env.required("DATABASE_URL")?,
            max_connections: env.parse_or("DATABASE_MAX_CONNECTIONS", 10)?,
            acquire_timeout: Duration::from_secs(env.parse_or("DATABASE_ACQUIRE_TIMEOUT_SECS", 5)?),
        };

        let watchdog = WatchdogConfig {
            interval: Duration::from_secs(env.parse_or("POOL_WATCHDOG_INTERVAL_SECS", 30)?),
            max_failures: env.parse_or("POOL_WATCHDOG_MAX_FAILURES", 3)?,
        };
        if watchdog.interval.is_zero() {
            bail!("POOL_WATCHDOG_INTERVAL_SECS must be greater than zero");
        }
        if watchdog.max_failures == 0 {
            bail!("POOL_WATCHDOG_MAX_FAILURES must be greater than zero");
        }

        Ok(Self {
            port: env.parse_or("PORT", 3000)?,
            database,
            watchdog,
            allowed_origins: parse_origins(env.get("FRONTEND_URL").as_deref()),
            notify: NotifyConfig::from_env(&env)?,
        })
    }
}

impl NotifyConfig {
    fn from_env<F>(env: &Env<F>) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let strategy = match env.get("NOTIFY_STRATEGY") {
            Some(strategy) => strategy.to_lowercase(),
            None if env.get("SMTP_HOST").is_some() => "smtp".to_string(),
            None if env.get("NOTIFY_WEBHOOK_URL").is_some() => "webhook".to_string(),
            None => "none".to_string(),
        };

        match strategy.as_str() {
            "smtp" => {
                let username = env.required("SMTP_USERNAME")?;
                Ok(NotifyConfig::Smtp(SmtpConfig {
                    host: env.required("SMTP_HOST")?,
                    port: env.parse_or("SMTP_PORT", 587)?,
                    password: env.required("SMTP_PASSWORD")?,
                    from: env.get("MAIL_FROM").unwrap_or_else(|| username.clone()),
                    to: env.required("MAIL_TO")?,
                    username,
                }))
            }
            "webhook" => Ok(NotifyConfig::Webhook(WebhookConfig {
                url: env.required("NOTIFY_WEBHOOK_URL")?,
                token: env.get("NOTIFY_WEBHOOK_TOKEN"),
                timeout: Duration::from_secs(env.parse_or("NOTIFY_WEBHOOK_TIMEOUT_SECS", 10)?),
            })),
            "none" => Ok(NotifyConfig::None),
            other => Err(anyhow!(
                "Unknown NOTIFY_STRATEGY {:?}, expected smtp, webhook or none",
                other
            )),
        }
    }
}

/// Splits a comma-separated origin list. Falls back to the local frontend
/// when nothing usable is configured.
pub fn parse_origins(raw: Option<&str>) -> Vec<String> {
    let origins: Vec<String> = raw
        .unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|origin| !origin.is_empty())
        .map(str::to_string)
        .collect();

    if origins.is_empty() {
        vec![DEFAULT_ALLOWED_ORIGIN.to_string()]
    } else {
        origins
    }
}

struct Env<F>(F);

impl<F> Env<F>
where
    F: Fn(&str) -> Option<String>,
{
    fn get(&self, key: &str) -> Option<String> {
        (self.0)(key)
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
    }

    fn required(&self, key: &str) -> anyhow::Result<String> {
        self.get(key).ok_or_else(|| anyhow!("{} must be set", key))
    }

    fn parse_or<T>(&self, key: &str, default: T) -> anyhow::Result<T>
    where
        T: FromStr,
        T::Err: std::error::Error + Send + Sync + 'static,
    {
        match self.get(key) {
            Some(value) => value
                .parse()
                .with_context(|| format!("{} has an invalid value {:?}", key, value)),
            None => Ok(default),
        }
    }
}
